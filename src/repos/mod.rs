pub mod guest_cart;
pub use self::guest_cart::*;

pub mod key_value;
pub use self::key_value::*;
