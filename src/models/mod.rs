pub mod common;
pub use self::common::*;

pub mod cart;
pub use self::cart::*;

pub mod order;
pub use self::order::*;

pub mod payment;
pub use self::payment::*;

pub mod user;
pub use self::user::*;
