//! Dual-client registry
//!
//! Maps a primary admin handle to the shadow handle bound to `/admin/v3`.
//! A single handle cannot address both API versions, and sinks are not
//! answered on `/admin/v2`, so v3-only resources resolve their client here.

use crate::admin::PulsarAdmin;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

/// Primary → shadow handle association, keyed by handle identity
#[derive(Debug, Default)]
pub struct ClientRegistry {
    clients: Mutex<HashMap<Uuid, PulsarAdmin>>,
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Uuid, PulsarAdmin>> {
        // a panic while holding the lock cannot leave the map half-written
        self.clients
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Associate `shadow` with `primary`. Last write wins.
    pub fn register(&self, primary: &PulsarAdmin, shadow: PulsarAdmin) {
        let previous = self.lock().insert(primary.id(), shadow);
        if previous.is_some() {
            tracing::warn!(
                "Replacing shadow client registered for primary client {}",
                primary.id()
            );
        }
    }

    /// Shadow handle of `primary`.
    ///
    /// # Panics
    ///
    /// When `primary` was never registered.
    pub fn resolve(&self, primary: &PulsarAdmin) -> PulsarAdmin {
        match self.lock().get(&primary.id()) {
            Some(shadow) => shadow.clone(),
            None => panic!(
                "no v3 admin client registered for primary client {} ({})",
                primary.id(),
                primary.web_service_url
            ),
        }
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
