pub mod config;
pub mod error;
pub mod types;

pub use config::GridlbConfig;
pub use error::{CoreError, CoreResult};
pub use types::*;
