//! RPC method handler for the Webworm JSON-RPC protocol.
//!
//! Kept apart from `rpc_server.rs` so it can be unit-tested independently.
//! `handle_method` decodes the JSON parameters of a named call, runs the
//! matching `Tracker` operation and encodes the result.

use crate::services::tracker::{Tracker, TrackerTrait};
use crate::types::bookmark::Bookmark;

use serde_json::{json, Value};
use tracing::debug;

/// Extracts the required `name` parameter.
fn name_param(params: &Value) -> Result<&str, String> {
    params
        .get("name")
        .and_then(|v| v.as_str())
        .ok_or_else(|| "missing name".to_string())
}

/// Decodes the `entry` parameter of `insert`.
///
/// Accepts a Bookmark object, or the same object JSON-encoded into a string
/// as older frontends send it.
fn entry_param(params: &Value) -> Result<Bookmark, String> {
    let entry = params.get("entry").ok_or("missing entry")?;
    let decoded = match entry {
        Value::String(encoded) => serde_json::from_str::<Bookmark>(encoded),
        other => serde_json::from_value::<Bookmark>(other.clone()),
    };
    decoded.map_err(|e| format!("could not load bookmark from {}: {}", entry, e))
}

fn to_json(bookmark: &Bookmark) -> Result<Value, String> {
    serde_json::to_value(bookmark).map_err(|e| e.to_string())
}

/// Dispatch a JSON-RPC method call to the tracker.
///
/// Returns `Ok(Value)` on success or `Err(String)` with a message fit to show the user.
pub fn handle_method(tracker: &Tracker, method: &str, params: &Value) -> Result<Value, String> {
    debug!(method, "rpc call");
    match method {
        "fetch_bookmarks" => {
            let bookmarks = tracker.fetch_bookmarks().map_err(|e| e.to_string())?;
            serde_json::to_value(bookmarks).map_err(|e| e.to_string())
        }
        "insert" => {
            let entry = entry_param(params)?;
            let stored = tracker.insert(entry).map_err(|e| e.to_string())?;
            to_json(&stored)
        }
        "advance" => {
            let name = name_param(params)?;
            let bookmark = tracker.advance(name).map_err(|e| e.to_string())?;
            to_json(&bookmark)
        }
        "previous" => {
            let name = name_param(params)?;
            let bookmark = tracker.previous(name).map_err(|e| e.to_string())?;
            to_json(&bookmark)
        }
        "remove" => {
            let name = name_param(params)?;
            tracker.remove(name).map_err(|e| e.to_string())?;
            Ok(Value::Null)
        }
        "mark_seen" => {
            let name = name_param(params)?;
            let bookmark = tracker.mark_seen(name).map_err(|e| e.to_string())?;
            to_json(&bookmark)
        }
        "check_new" => {
            let name = name_param(params)?;
            let bookmark = tracker.check_new(name).map_err(|e| e.to_string())?;
            to_json(&bookmark)
        }

        "ping" => Ok(json!({"pong": true})),

        _ => Err(format!("unknown method: {}", method)),
    }
}
