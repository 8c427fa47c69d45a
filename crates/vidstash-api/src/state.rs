//! Application state.
//!
//! The repository and data store are constructed once at startup from the
//! configuration and injected into handlers through axum's `State`; there is
//! no module-level mutable state anywhere in the service.

use std::sync::Arc;

use vidstash_core::Config;
use vidstash_db::VideoRepository;
use vidstash_storage::DataStore;

#[derive(Clone)]
pub struct AppState {
    pub videos: Arc<dyn VideoRepository>,
    pub data: Arc<dyn DataStore>,
    pub config: Config,
}

fn _assert_app_state_send_sync() {
    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}
    assert_send::<AppState>();
    assert_sync::<AppState>();
}
