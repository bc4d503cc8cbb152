//! Dependency wiring.
//!
//! The only place that knows both `ks-infra` and `ks-app`: it builds the
//! concrete adapters and hands them to the application layer as ports.

use std::sync::Arc;

use anyhow::Context;
use ks_app::usecases::{CheckStoreHealth, WaitForProcessing};
use ks_app::EditorSession;
use ks_core::config::AppConfig;
use ks_core::ports::{AlignmentStorePort, SessionEventPort};
use ks_infra::HttpAlignmentStore;

use crate::events::LoggingSessionEvents;

/// Everything a command needs, assembled once per process.
pub struct AppRuntime {
    pub config: AppConfig,
    pub store: Arc<dyn AlignmentStorePort>,
    pub session: EditorSession,
}

impl AppRuntime {
    pub fn check_store_health(&self) -> CheckStoreHealth {
        CheckStoreHealth::from_arc(self.store.clone())
    }

    pub fn wait_for_processing(&self) -> WaitForProcessing {
        WaitForProcessing::from_arc(self.store.clone(), &self.config.editor)
    }
}

/// Builds the runtime from config. Must be called inside a tokio runtime.
pub fn wire(config: AppConfig) -> anyhow::Result<AppRuntime> {
    let store: Arc<dyn AlignmentStorePort> = Arc::new(
        HttpAlignmentStore::new(&config.store).context("Failed to create alignment store client")?,
    );
    let events: Arc<dyn SessionEventPort> = Arc::new(LoggingSessionEvents);
    let session = EditorSession::new(store.clone(), events);

    Ok(AppRuntime {
        config,
        store,
        session,
    })
}
