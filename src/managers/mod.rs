// Webworm state managers
// Managers own persistent state; the bookmark store is the only one.

pub mod bookmark_store;
