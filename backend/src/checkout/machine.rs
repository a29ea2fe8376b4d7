//! Checkout flow as a typed state machine.
//!
//! The flow a student walks through when buying lessons: pick slots, start
//! the purchase, then settle or fail. Transitions are pure; the service layer
//! drives the machine and performs the actual booking and charging between
//! `BeginPurchase` and the settlement action.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::cart::CartItem;
use super::payment::Receipt;
use crate::models::{Booking, SlotId};

/// Where a student currently stands in the checkout flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CheckoutState {
    /// Looking at availability, nothing selected.
    Browsing,
    /// At least one slot in the cart.
    SlotsSelected { items: Vec<CartItem> },
    /// Purchase started; seats are being booked and the charge submitted.
    Purchasing { items: Vec<CartItem> },
    /// Charge settled and seats held.
    Confirmed {
        receipt: Receipt,
        bookings: Vec<Booking>,
    },
    /// Charge declined; the cart is retained for a retry.
    Failed { items: Vec<CartItem>, reason: String },
}

/// Events that move the checkout flow forward.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckoutAction {
    SelectSlot(CartItem),
    DeselectSlot(SlotId),
    BeginPurchase,
    PaymentSettled {
        receipt: Receipt,
        bookings: Vec<Booking>,
    },
    PaymentDeclined {
        reason: String,
    },
    Reset,
}

pub type CheckoutResult<T> = Result<T, CheckoutError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    #[error("Action {action} is not allowed in state {state}")]
    InvalidTransition {
        state: &'static str,
        action: &'static str,
    },
}

impl CheckoutState {
    /// Applies `action`, consuming the current state.
    ///
    /// Selecting an already-carted slot and deselecting an unknown one are
    /// no-ops rather than errors; every transition not in the table fails
    /// with [`CheckoutError::InvalidTransition`].
    pub fn apply(self, action: CheckoutAction) -> CheckoutResult<CheckoutState> {
        match (self, action) {
            (CheckoutState::Browsing, CheckoutAction::SelectSlot(item)) => {
                Ok(CheckoutState::SlotsSelected { items: vec![item] })
            }
            (CheckoutState::SlotsSelected { mut items }, CheckoutAction::SelectSlot(item)) => {
                if !items.iter().any(|i| i.slot_id == item.slot_id) {
                    items.push(item);
                }
                Ok(CheckoutState::SlotsSelected { items })
            }
            (CheckoutState::SlotsSelected { mut items }, CheckoutAction::DeselectSlot(slot_id)) => {
                items.retain(|i| i.slot_id != slot_id);
                if items.is_empty() {
                    Ok(CheckoutState::Browsing)
                } else {
                    Ok(CheckoutState::SlotsSelected { items })
                }
            }
            (CheckoutState::SlotsSelected { items }, CheckoutAction::BeginPurchase) => {
                Ok(CheckoutState::Purchasing { items })
            }
            (
                CheckoutState::Purchasing { .. },
                CheckoutAction::PaymentSettled { receipt, bookings },
            ) => Ok(CheckoutState::Confirmed { receipt, bookings }),
            (CheckoutState::Purchasing { items }, CheckoutAction::PaymentDeclined { reason }) => {
                Ok(CheckoutState::Failed { items, reason })
            }
            // A declined checkout keeps its cart, so the purchase can be
            // retried directly or abandoned.
            (CheckoutState::Failed { items, .. }, CheckoutAction::BeginPurchase) => {
                Ok(CheckoutState::Purchasing { items })
            }
            (CheckoutState::Failed { .. }, CheckoutAction::Reset)
            | (CheckoutState::Confirmed { .. }, CheckoutAction::Reset) => Ok(CheckoutState::Browsing),
            (state, action) => Err(CheckoutError::InvalidTransition {
                state: state.label(),
                action: action.label(),
            }),
        }
    }

    /// Cart contents visible in the current state.
    pub fn items(&self) -> &[CartItem] {
        match self {
            CheckoutState::SlotsSelected { items }
            | CheckoutState::Purchasing { items }
            | CheckoutState::Failed { items, .. } => items,
            CheckoutState::Browsing | CheckoutState::Confirmed { .. } => &[],
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CheckoutState::Browsing => "browsing",
            CheckoutState::SlotsSelected { .. } => "slots_selected",
            CheckoutState::Purchasing { .. } => "purchasing",
            CheckoutState::Confirmed { .. } => "confirmed",
            CheckoutState::Failed { .. } => "failed",
        }
    }
}

impl CheckoutAction {
    pub fn label(&self) -> &'static str {
        match self {
            CheckoutAction::SelectSlot(_) => "select_slot",
            CheckoutAction::DeselectSlot(_) => "deselect_slot",
            CheckoutAction::BeginPurchase => "begin_purchase",
            CheckoutAction::PaymentSettled { .. } => "payment_settled",
            CheckoutAction::PaymentDeclined { .. } => "payment_declined",
            CheckoutAction::Reset => "reset",
        }
    }
}
