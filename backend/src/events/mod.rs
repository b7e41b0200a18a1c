//! Per-turn change records and producer change propagation
//!
//! - `types`: the change records handed to the engine every turn
//! - `handler`: applying a change record to the market state
//! - `channel`: queue carrying "producer changed" notices to distributors

pub mod channel;
pub mod handler;
pub mod types;

pub use channel::{ChangeChannel, ChangeNotice};
pub use types::{DistributorChange, ProducerChange, TurnChanges};
