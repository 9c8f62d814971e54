//! Webworm — a persistent episode bookmark tracker.
//!
//! The library exposes the SQLite-backed bookmark store, the tracker service
//! and the JSON-RPC handler used by the `webworm-rpc` binary and the
//! integration tests.

pub mod database;
pub mod managers;
pub mod platform;
pub mod rpc_handler;
pub mod services;
pub mod types;
