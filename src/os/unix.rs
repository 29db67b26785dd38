// OS abstraction layer for sshconf - Unix implementation
// (c) 2024 Ross Younger

use std::path::PathBuf;

use super::AbstractPlatform;
use crate::{Error, Result};

#[derive(Debug, Clone, Copy)]
/// Concrete implementation of [`AbstractPlatform`] for Unix-like platforms
pub struct Platform {}

impl AbstractPlatform for Platform {
    fn user_ssh_config() -> Result<PathBuf> {
        let Some(mut pb) = dirs::home_dir() else {
            return Err(Error::HomeDir);
        };
        pb.push(".ssh");
        pb.push("config");
        Ok(pb)
    }
}
