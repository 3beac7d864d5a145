pub mod config;
pub mod handler;
pub mod server;
pub mod service;

pub use config::ServerConfig;
pub use server::Server;
pub use service::{Dispatcher, FcnnService};
