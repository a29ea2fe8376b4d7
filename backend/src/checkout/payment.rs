//! Payment gateway seam.
//!
//! The platform never talks to a real processor; checkout charges through
//! the [`PaymentGateway`] trait and production wiring installs the simulated
//! implementation. Tests install a declining gateway to exercise the failure
//! path.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::models::StudentId;

/// Proof of a settled charge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Receipt {
    /// Gateway reference for the charge.
    pub reference: Uuid,
    /// Amount charged, in cents.
    pub amount_cents: u64,
    /// Settlement timestamp.
    pub charged_at: DateTime<Utc>,
}

pub type PaymentResult<T> = Result<T, PaymentError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaymentError {
    #[error("Payment declined: {0}")]
    Declined(String),
}

/// Charges students for lesson purchases.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Charges `amount_cents` to `student`'s payment method.
    async fn charge(&self, student: &StudentId, amount_cents: u64) -> PaymentResult<Receipt>;
}

/// In-process gateway that settles every charge, or declines all of them
/// when built with a decline reason.
#[derive(Debug, Clone, Default)]
pub struct SimulatedGateway {
    decline_reason: Option<String>,
}

impl SimulatedGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gateway that declines every charge with `reason`.
    pub fn declining(reason: impl Into<String>) -> Self {
        Self {
            decline_reason: Some(reason.into()),
        }
    }
}

#[async_trait]
impl PaymentGateway for SimulatedGateway {
    async fn charge(&self, _student: &StudentId, amount_cents: u64) -> PaymentResult<Receipt> {
        if let Some(reason) = &self.decline_reason {
            return Err(PaymentError::Declined(reason.clone()));
        }
        Ok(Receipt {
            reference: Uuid::new_v4(),
            amount_cents,
            charged_at: Utc::now(),
        })
    }
}
