//! Asynchronous settlement of pending payments against a payment provider.

use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use crate::models::{simulated_provider_response, PaymentStatus};

use super::store::RideStore;

/// A payment provider capable of charging a previously created payment.
///
/// A single method, returning the provider's raw response, is enough for the
/// baseline settlement flow; failure injection (transitioning to `Failed`)
/// is left to a future provider implementation.
#[async_trait::async_trait]
pub trait PaymentProvider: Send + Sync {
    async fn charge(&self, payment_id: i64) -> serde_json::Value;
}

/// Stub provider standing in for a real payment gateway integration.
pub struct SimulatedPaymentProvider;

#[async_trait::async_trait]
impl PaymentProvider for SimulatedPaymentProvider {
    async fn charge(&self, payment_id: i64) -> serde_json::Value {
        simulated_provider_response(payment_id)
    }
}

/// Schedules single-shot, delayed settlement of a payment.
pub struct PaymentSettler {
    store: Arc<dyn RideStore>,
    provider: Arc<dyn PaymentProvider>,
    delay: Duration,
}

impl PaymentSettler {
    pub fn new(store: Arc<dyn RideStore>, provider: Arc<dyn PaymentProvider>, delay: Duration) -> Self {
        Self {
            store,
            provider,
            delay,
        }
    }

    /// Spawns a background task that settles `payment_id` after the
    /// configured delay. Settlement is at-least-once: the store guards the
    /// update with `WHERE status = 'pending'`, so re-running this for an
    /// already-settled payment is a harmless no-op.
    pub fn enqueue(self: &Arc<Self>, payment_id: i64) {
        let settler = Arc::clone(self);
        tokio::spawn(async move {
            tokio::time::sleep(settler.delay).await;
            let response = settler.provider.charge(payment_id).await;
            if let Err(err) = settler
                .store
                .settle_payment(payment_id, PaymentStatus::Success, response)
                .await
            {
                warn!(payment_id, error = %err, "payment settlement failed");
            }
        });
    }
}
