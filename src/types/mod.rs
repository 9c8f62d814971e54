// Webworm shared type definitions
// Each submodule defines types used across the crate.

pub mod bookmark;
pub mod episode_url;
pub mod errors;
pub mod settings;
