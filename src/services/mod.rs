// Webworm services
// Services provide the tracker operations, the episode probe and configuration loading.

pub mod episode_probe;
pub mod settings_engine;
pub mod tracker;
