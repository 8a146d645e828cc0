//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds the durable store, the live session registry, and the token
//! verifier. Clone is required by Axum, so every field is `Arc`-wrapped or
//! `Copy`.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::services::auth::JwtVerifier;
use crate::services::session::SessionRegistry;
use crate::services::store::Store;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub sessions: Arc<RwLock<SessionRegistry>>,
    pub auth: Arc<JwtVerifier>,
    /// Capacity of each connection's outbound queue.
    pub outbound_capacity: usize,
}

impl AppState {
    #[must_use]
    pub fn new(store: Arc<dyn Store>, auth: JwtVerifier, outbound_capacity: usize) -> Self {
        Self {
            store,
            sessions: Arc::new(RwLock::new(SessionRegistry::new())),
            auth: Arc::new(auth),
            outbound_capacity,
        }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
