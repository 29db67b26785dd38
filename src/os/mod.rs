//! OS abstraction layer
// (c) 2024 Ross Younger

use std::path::PathBuf;

use crate::Result;

/// General platform abstraction trait.
/// The active implementation should be pulled into this crate
/// Implementations should be called `Platform`, e.g. [unix::Platform].
///
/// Usage:
/// ```
///    use sshconf::os::Platform;
///    use sshconf::os::AbstractPlatform as _;
///    if let Ok(path) = Platform::user_ssh_config() {
///        println!("{}", path.display());
///    }
/// ```
pub trait AbstractPlatform {
    /// Path to the user ssh config file.
    /// On most platforms this will be `${HOME}/.ssh/config`
    /// # Note
    /// This is a _theoretical_ path construction; it does not guarantee that the path actually exists.
    /// That is up to the caller to determine and reason about.
    /// # Errors
    /// If the current user's home directory could not be determined
    fn user_ssh_config() -> Result<PathBuf>;
}

#[cfg(any(unix, doc))]
pub mod unix;

#[cfg(any(unix, doc))]
pub use unix::*;

static_assertions::assert_cfg!(unix, "This OS is not yet supported");
