//! Multi-hop trade routing: path discovery, simulation, selection.

mod simulator;
mod suggester;
mod trade_router;
mod types;

pub use suggester::get_paths;
pub use trade_router::{RouterOptions, TradeRouter};
pub use types::{BuySwap, SellSwap, Swap, SwapHuman, Trade, TradeHuman};
