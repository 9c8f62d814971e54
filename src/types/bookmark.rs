use serde::{Deserialize, Serialize};

/// A tracked show: its name, the link to the current episode and the episode counter.
///
/// `name` is the primary key. `has_new` is set when the record was advanced and
/// the viewer has not acknowledged it yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    pub name: String,
    pub url: String,
    pub episode: i64,
    #[serde(default)]
    pub has_new: bool,
}

impl Bookmark {
    pub fn new(name: impl Into<String>, url: impl Into<String>, episode: i64) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            episode,
            has_new: false,
        }
    }
}

/// Direction of a single episode change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpisodeStep {
    Forward,
    Back,
}

impl EpisodeStep {
    /// Signed change applied to the episode counter.
    pub fn delta(self) -> i64 {
        match self {
            EpisodeStep::Forward => 1,
            EpisodeStep::Back => -1,
        }
    }

    /// Value of `has_new` after the step.
    pub fn marks_new(self) -> bool {
        matches!(self, EpisodeStep::Forward)
    }
}
