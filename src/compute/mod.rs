//! The evaluation side of the engine: values, numeric kernels, the ledger,
//! and the forward-pass driver.
pub mod engine;
pub mod kernel;
pub mod ledger;
pub mod value;

pub use engine::Engine;
pub use ledger::{ComputationError, Ledger};
pub use value::Value;
