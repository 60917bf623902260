pub mod pool;
pub mod trade;

pub use pool::*;
pub use trade::*;
