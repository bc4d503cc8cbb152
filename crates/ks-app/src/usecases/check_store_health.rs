use std::sync::Arc;

use ks_core::ports::{AlignmentStorePort, StoreError};

/// Use case for checking that the alignment store answers.
pub struct CheckStoreHealth {
    store: Arc<dyn AlignmentStorePort>,
}

impl CheckStoreHealth {
    pub fn from_arc(store: Arc<dyn AlignmentStorePort>) -> Self {
        Self { store }
    }

    /// Returns the banner message of the store's root endpoint.
    #[tracing::instrument(name = "usecase.check_store_health.execute", skip(self))]
    pub async fn execute(&self) -> Result<String, StoreError> {
        self.store.health().await
    }
}
