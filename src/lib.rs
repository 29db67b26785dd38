//! Reading, editing and writing OpenSSH client configuration files
// (c) 2024 Ross Younger

mod cli;
pub use cli::cli;
/// ssh client configuration
pub mod config;
mod error;
pub use error::{Error, Result};
/// OS abstraction layer
pub mod os;
mod util;
