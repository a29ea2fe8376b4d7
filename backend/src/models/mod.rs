pub mod booking;
pub mod macros;
pub mod rule;
pub mod slot;
pub mod time;

pub use booking::*;
pub use rule::*;
pub use slot::*;
pub use time::*;
