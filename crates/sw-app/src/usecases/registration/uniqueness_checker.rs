use std::sync::Arc;

use sw_core::ports::RegistrationGatewayPort;
use sw_core::registration::{FieldErrors, Role, UniqueField, UniquenessLedger, UniquenessResult};
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// How a single availability check resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutcome {
    /// Latest check for the field; the ledger now reflects `exists`.
    Applied { exists: bool },
    /// Backend unreachable. Any previous conflict was cleared, nothing injected.
    Unknown,
    /// Value was blank; no backend call was made.
    Skipped,
    /// A newer check for the same field was issued meanwhile; discarded.
    Stale,
    /// Field does not belong to the current draft.
    Ignored,
}

/// Asynchronous "already taken?" checks with last-issued-wins semantics.
pub struct UniquenessChecker {
    gateway: Arc<dyn RegistrationGatewayPort>,
    ledger: Mutex<UniquenessLedger>,
}

impl UniquenessChecker {
    pub fn new(gateway: Arc<dyn RegistrationGatewayPort>) -> Self {
        Self {
            gateway,
            ledger: Mutex::new(UniquenessLedger::new()),
        }
    }

    pub async fn check(&self, field: UniqueField, value: &str) -> CheckOutcome {
        let sequence = self.ledger.lock().await.issue(field);
        let value = value.trim();

        if value.is_empty() {
            self.ledger.lock().await.apply_unknown(field, sequence);
            return CheckOutcome::Skipped;
        }

        match self.gateway.check_unique(field, value).await {
            Ok(exists) => {
                let result = UniquenessResult {
                    field,
                    submitted_value: value.to_string(),
                    exists,
                    sequence,
                };
                if self.ledger.lock().await.apply(&result) {
                    debug!(field = field.as_str(), exists, "uniqueness check applied");
                    CheckOutcome::Applied { exists }
                } else {
                    debug!(field = field.as_str(), sequence, "stale uniqueness result dropped");
                    CheckOutcome::Stale
                }
            }
            Err(err) => {
                warn!(field = field.as_str(), error = %err, "uniqueness check failed; treating as unknown");
                if self.ledger.lock().await.apply_unknown(field, sequence) {
                    CheckOutcome::Unknown
                } else {
                    CheckOutcome::Stale
                }
            }
        }
    }

    /// Drops any conflict for `field` and invalidates checks still in flight.
    pub async fn forget(&self, field: UniqueField) {
        let mut ledger = self.ledger.lock().await;
        let sequence = ledger.issue(field);
        ledger.apply_unknown(field, sequence);
    }

    pub async fn conflicts(&self, role: Role) -> FieldErrors {
        self.ledger.lock().await.field_errors(role)
    }
}
