//! Episode-aware URLs.
//!
//! A tracked link usually embeds the episode number, e.g.
//! `https://example.org/show/episode-12`. The slot holding that number is
//! found once, when the bookmark is created, and the link is re-rendered
//! from it every time the episode changes.

/// A URL split around the digits of its episode number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EpisodeUrl {
    /// The URL does not contain the episode number and is never rewritten.
    Static(String),
    /// `head` + episode + `tail`. A non-zero `width` pads the episode with
    /// leading zeros to that many digits (`e07`).
    Slotted {
        head: String,
        tail: String,
        width: usize,
    },
}

/// Whether the digit run `run` spells `wanted`, ignoring leading zeros.
fn run_matches(run: &str, wanted: &str) -> bool {
    let stripped = run.trim_start_matches('0');
    let stripped = if stripped.is_empty() { "0" } else { stripped };
    stripped == wanted
}

impl EpisodeUrl {
    /// Locates the episode slot in `url`.
    ///
    /// The slot is the last standalone run of ASCII digits whose value is
    /// `episode`. Digits that are part of a longer number never match, so
    /// episode `1` is not found inside `/s12/`. A zero-padded run keeps its
    /// width when re-rendered.
    pub fn parse(url: &str, episode: i64) -> Self {
        let wanted = episode.to_string();
        let bytes = url.as_bytes();
        let mut slot = None;
        let mut i = 0;
        while i < bytes.len() {
            if bytes[i].is_ascii_digit() {
                let start = i;
                while i < bytes.len() && bytes[i].is_ascii_digit() {
                    i += 1;
                }
                if run_matches(&url[start..i], &wanted) {
                    slot = Some((start, i));
                }
            } else {
                i += 1;
            }
        }
        match slot {
            Some((start, end)) => {
                let padded = end - start > 1 && bytes[start] == b'0';
                EpisodeUrl::Slotted {
                    head: url[..start].to_string(),
                    tail: url[end..].to_string(),
                    width: if padded { end - start } else { 0 },
                }
            }
            None => EpisodeUrl::Static(url.to_string()),
        }
    }

    /// Rebuilds a URL from its stored columns. A missing tail means the URL is static.
    pub fn from_parts(head: String, tail: Option<String>, width: usize) -> Self {
        match tail {
            Some(tail) => EpisodeUrl::Slotted { head, tail, width },
            None => EpisodeUrl::Static(head),
        }
    }

    /// Storage columns `(url_head, url_tail, url_width)`.
    pub fn parts(&self) -> (&str, Option<&str>, usize) {
        match self {
            EpisodeUrl::Static(url) => (url, None, 0),
            EpisodeUrl::Slotted { head, tail, width } => (head, Some(tail), *width),
        }
    }

    pub fn has_slot(&self) -> bool {
        matches!(self, EpisodeUrl::Slotted { .. })
    }

    /// The link for `episode`.
    pub fn render(&self, episode: i64) -> String {
        match self {
            EpisodeUrl::Static(url) => url.clone(),
            EpisodeUrl::Slotted { head, tail, width } => {
                format!("{}{:0width$}{}", head, episode, tail, width = *width)
            }
        }
    }
}
