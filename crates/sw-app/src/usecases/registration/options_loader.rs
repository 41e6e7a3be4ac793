use std::collections::HashMap;
use std::sync::Arc;

use sw_core::ports::{GatewayOperation, RegistrationGatewayPort};
use sw_core::registration::{CatalogOption, Role};
use tokio::sync::Mutex;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded(Vec<CatalogOption>),
    /// Superseded by a later load (the role changed meanwhile).
    Stale,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("loading options for {role} failed: {message}")]
pub struct OptionsLoadError {
    pub role: Role,
    /// User-facing message.
    pub message: String,
}

#[derive(Default)]
struct LoaderState {
    generation: u64,
    role: Option<Role>,
    current: Vec<CatalogOption>,
    cache: HashMap<Role, Vec<CatalogOption>>,
}

/// Loads role-specific options; only the latest request may publish.
///
/// Successful loads are cached per role for the session. Failures are not.
pub struct OptionsLoader {
    gateway: Arc<dyn RegistrationGatewayPort>,
    state: Mutex<LoaderState>,
}

impl OptionsLoader {
    pub fn new(gateway: Arc<dyn RegistrationGatewayPort>) -> Self {
        Self {
            gateway,
            state: Mutex::new(LoaderState::default()),
        }
    }

    pub async fn load(&self, role: Role) -> Result<LoadOutcome, OptionsLoadError> {
        let generation = {
            let mut state = self.state.lock().await;
            state.generation += 1;
            state.role = Some(role);
            if let Some(cached) = state.cache.get(&role).cloned() {
                debug!(role = %role, "options served from cache");
                state.current = cached.clone();
                return Ok(LoadOutcome::Loaded(cached));
            }
            state.current.clear();
            state.generation
        };

        let result = self.gateway.load_options(role).await;

        let mut state = self.state.lock().await;
        if state.generation != generation {
            debug!(role = %role, generation, "stale options result dropped");
            return Ok(LoadOutcome::Stale);
        }
        match result {
            Ok(options) => {
                debug!(role = %role, count = options.len(), "options loaded");
                state.cache.insert(role, options.clone());
                state.current = options.clone();
                Ok(LoadOutcome::Loaded(options))
            }
            Err(err) => {
                warn!(role = %role, error = %err, "options load failed");
                Err(OptionsLoadError {
                    role,
                    message: err.user_message(GatewayOperation::LoadOptions),
                })
            }
        }
    }

    /// Options currently published for `role`; empty while loading, after a
    /// failure, or when the last load was for the other role.
    pub async fn current(&self, role: Role) -> Vec<CatalogOption> {
        let state = self.state.lock().await;
        if state.role == Some(role) {
            state.current.clone()
        } else {
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use sw_core::ports::GatewayError;
    use sw_core::registration::{SignupPayload, UniqueField};
    use tokio::sync::Notify;

    /// Buyer loads block until released; seller loads answer at once.
    struct SlowBuyerGateway {
        release_buyer: Notify,
        buyer_calls: AtomicUsize,
        fail_buyer: bool,
    }

    impl SlowBuyerGateway {
        fn new(fail_buyer: bool) -> Self {
            Self {
                release_buyer: Notify::new(),
                buyer_calls: AtomicUsize::new(0),
                fail_buyer,
            }
        }
    }

    #[async_trait::async_trait]
    impl RegistrationGatewayPort for SlowBuyerGateway {
        async fn check_unique(&self, _field: UniqueField, _value: &str) -> Result<bool, GatewayError> {
            Ok(false)
        }

        async fn load_options(&self, role: Role) -> Result<Vec<CatalogOption>, GatewayError> {
            match role {
                Role::Buyer => {
                    self.buyer_calls.fetch_add(1, Ordering::SeqCst);
                    self.release_buyer.notified().await;
                    if self.fail_buyer {
                        return Err(GatewayError::Transport("connection reset".into()));
                    }
                    Ok(vec![CatalogOption::new(1, "Electronics")])
                }
                Role::Seller => Ok(vec![CatalogOption::new(7, "Handmade")]),
            }
        }

        async fn signup(&self, _payload: &SignupPayload) -> Result<(), GatewayError> {
            Ok(())
        }

        async fn verify_otp(&self, _email: &str, _otp_code: u32) -> Result<(), GatewayError> {
            Ok(())
        }

        async fn resend_otp(&self, _email: &str) -> Result<(), GatewayError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn stale_load_never_overwrites_newer_role() {
        let gateway = Arc::new(SlowBuyerGateway::new(false));
        let loader = Arc::new(OptionsLoader::new(gateway.clone()));

        let buyer_loader = Arc::clone(&loader);
        let buyer = tokio::spawn(async move { buyer_loader.load(Role::Buyer).await });
        tokio::task::yield_now().await;

        let seller = loader.load(Role::Seller).await.unwrap();
        assert_eq!(
            seller,
            LoadOutcome::Loaded(vec![CatalogOption::new(7, "Handmade")])
        );

        gateway.release_buyer.notify_one();
        assert_eq!(buyer.await.unwrap().unwrap(), LoadOutcome::Stale);
        assert_eq!(
            loader.current(Role::Seller).await,
            vec![CatalogOption::new(7, "Handmade")]
        );
        assert!(loader.current(Role::Buyer).await.is_empty());
    }

    #[tokio::test]
    async fn stale_failure_is_swallowed() {
        let gateway = Arc::new(SlowBuyerGateway::new(true));
        let loader = Arc::new(OptionsLoader::new(gateway.clone()));

        let buyer_loader = Arc::clone(&loader);
        let buyer = tokio::spawn(async move { buyer_loader.load(Role::Buyer).await });
        tokio::task::yield_now().await;
        loader.load(Role::Seller).await.unwrap();

        gateway.release_buyer.notify_one();

        assert_eq!(buyer.await.unwrap(), Ok(LoadOutcome::Stale));
    }

    #[tokio::test]
    async fn failure_is_reported_and_not_cached() {
        let gateway = Arc::new(SlowBuyerGateway::new(true));
        let loader = Arc::new(OptionsLoader::new(gateway.clone()));

        gateway.release_buyer.notify_one();
        let err = loader.load(Role::Buyer).await.unwrap_err();
        assert_eq!(err.message, "Could not load options. Please retry.");
        assert!(loader.current(Role::Buyer).await.is_empty());

        gateway.release_buyer.notify_one();
        let _ = loader.load(Role::Buyer).await;
        assert_eq!(gateway.buyer_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn successful_load_is_cached_per_role() {
        let gateway = Arc::new(SlowBuyerGateway::new(false));
        let loader = OptionsLoader::new(gateway.clone());

        gateway.release_buyer.notify_one();
        loader.load(Role::Buyer).await.unwrap();
        loader.load(Role::Seller).await.unwrap();
        let again = loader.load(Role::Buyer).await.unwrap();

        assert_eq!(
            again,
            LoadOutcome::Loaded(vec![CatalogOption::new(1, "Electronics")])
        );
        assert_eq!(gateway.buyer_calls.load(Ordering::SeqCst), 1);
    }
}
