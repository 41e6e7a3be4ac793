use std::sync::Arc;

use sw_core::registration::Role;
use sw_core::wizard::WizardState;
use tokio::sync::Mutex;

/// Shared wizard state plus the lock that serializes transitions.
///
/// ## Lock Ordering
/// Acquire `dispatch_lock` first, then `state`. The dispatch lock is held for
/// a transition and its in-process actions only; it is released before any
/// backend call so result events can come back in.
#[derive(Clone)]
pub struct WizardContext {
    state: Arc<Mutex<WizardState>>,
    dispatch_lock: Arc<Mutex<()>>,
}

impl WizardContext {
    pub fn new(initial_state: WizardState) -> Self {
        Self {
            state: Arc::new(Mutex::new(initial_state)),
            dispatch_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn for_role(role: Role) -> Self {
        Self::new(WizardState::new(role))
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Lightweight read; does not take the dispatch lock.
    pub async fn get_state(&self) -> WizardState {
        self.state.lock().await.clone()
    }

    pub async fn acquire_dispatch_lock(&self) -> tokio::sync::MutexGuard<'_, ()> {
        self.dispatch_lock.lock().await
    }

    /// Only call while holding the dispatch lock.
    pub async fn set_state(&self, state: WizardState) {
        let mut guard = self.state.lock().await;
        *guard = state;
    }
}
