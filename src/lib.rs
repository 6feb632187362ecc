pub mod driver;
pub mod error;
pub mod history;
pub mod types;
pub mod uci;

pub use driver::{run, Driver, EngineCommand, RunSummary, Termination};
pub use error::DriverError;
pub use history::MoveHistory;
pub use types::{DriverConfig, EngineConfig};
