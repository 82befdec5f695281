//! Simulated payment gateway used as the checkout's submit callback.

use async_trait::async_trait;
use payments_core::{PaymentSubmitPayload, SubmitError, SubmitHandler};
use std::cell::{Cell, RefCell};
use std::time::Duration;
use tracing::{debug, info};

/// What the gateway answers to the next submission
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum GatewayReply {
    #[default]
    Approve,
    /// Reject; a blank message falls back to the generic failure text
    Decline(String),
}

/// Answers submissions the way the script tells it to.
///
/// The reply is consumed by the submission it was armed for; later
/// submissions are approved unless armed again.
#[derive(Debug, Default)]
pub struct SimulatedGateway {
    next_reply: RefCell<GatewayReply>,
    latency: Cell<Duration>,
    submissions: Cell<u32>,
}

impl SimulatedGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepare the reply and latency for the next submission
    pub fn arm(&self, reply: GatewayReply, latency: Duration) {
        *self.next_reply.borrow_mut() = reply;
        self.latency.set(latency);
    }

    /// Number of submissions that reached the gateway
    pub fn submissions(&self) -> u32 {
        self.submissions.get()
    }
}

#[async_trait(?Send)]
impl SubmitHandler for SimulatedGateway {
    async fn submit(&self, payload: &PaymentSubmitPayload) -> Result<(), SubmitError> {
        self.submissions.set(self.submissions.get() + 1);
        let reply = self.next_reply.take();
        let latency = self.latency.take();

        if !latency.is_zero() {
            debug!(latency_ms = latency.as_millis() as u64, "gateway processing");
            tokio::time::sleep(latency).await;
        }

        match reply {
            GatewayReply::Approve => {
                info!(method = %payload.method_type(), "gateway approved payment");
                Ok(())
            }
            GatewayReply::Decline(message) => {
                info!(method = %payload.method_type(), reason = %message, "gateway declined payment");
                Err(SubmitError::from_message(Some(message)))
            }
        }
    }

    fn name(&self) -> &'static str {
        "simulated"
    }
}
