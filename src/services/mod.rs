pub mod types;
pub use self::types::*;

pub mod cart;
pub use self::cart::*;

pub mod order;
pub use self::order::*;
