//! Checkout flow
//!
//! Carts, the purchase state machine and the payment seam. The machine is
//! pure; the service layer drives it while booking seats and charging the
//! configured gateway.

pub mod cart;
pub mod machine;
pub mod payment;

pub use cart::{cart_total, CartItem};
pub use machine::{CheckoutAction, CheckoutError, CheckoutResult, CheckoutState};
pub use payment::{PaymentError, PaymentGateway, PaymentResult, Receipt, SimulatedGateway};
