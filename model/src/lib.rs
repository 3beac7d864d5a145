pub mod codec;
pub mod error;
mod fcnn;
mod init;
mod provider;

pub use error::{ModelErr, Result};
pub use fcnn::Fcnn;
pub use init::Init;
pub use provider::{ModelProvider, RandProvider};
