// (c) 2024 Ross Younger
//! # ssh client configuration files
//!
//! This module reads and writes files in the format of OpenSSH's `~/.ssh/config`:
//! a sequence of `Host` blocks, each applying a set of `Keyword Value` options to
//! the hosts its pattern matches.
//!
//! ```text
//! Host *
//!     User alice
//!
//! Host *.example.com
//!     User bob
//!
//! Host quick
//!     HostName test.case.edu
//! ```
//!
//! ## Model
//!
//! * A [`Host`] is one block. Its pattern is fixed; its options are an ordered,
//!   case-insensitive map from [`Keyword`] to typed [`Value`].
//! * A handful of keywords are typed: the connection counters and timeouts are integers,
//!   `LogLevel` is a [`LogLevel`], `ForwardX11` and `ControlPersist` are [`YesNo`].
//!   Setting a value of the wrong shape is an error. Everything else is free text.
//! * An [`SshConfig`] is a file path plus the blocks read from it, in file order.
//!
//! ## Precedence
//!
//! [`SshConfig::effective_config`] merges every block matching an alias, scanning from
//! the bottom of the file upwards and overwriting as it goes. For each option the
//! first matching block in the file therefore wins, which is also what OpenSSH does.
//!
//! [`SshConfig::read_inheriting_defaults`] additionally takes `Host *` blocks out of the
//! sequence and copies their options into every other block that does not set them.
//!
//! ## Limitations
//!
//! * `Match` and `Include` directives are rejected.
//! * Each keyword holds one value; a repeated keyword replaces the earlier value.
//! * Lines before the first `Host` are ignored (and lost if the file is written back).

mod document;
mod files;
mod host;
mod keyword;
mod lines;
mod matching;
mod values;

pub use document::SshConfig;
pub use host::{Host, MergePolicy};
pub use keyword::{normalize, Keyword, KnownKeyword, ValueKind};
pub use values::{LogLevel, Value, YesNo};

use std::path::Path;

use crate::Result;

/// Reads the blocks of a config file, in file order
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Vec<Host>> {
    let mut config = SshConfig::new(path.as_ref());
    let _ = config.read()?;
    Ok(std::mem::take(config.hosts_mut()))
}

/// Renders blocks in config-file syntax, separated by blank lines
#[must_use]
pub fn serialize(hosts: &[Host]) -> String {
    hosts
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Replaces a config file with the given blocks
pub fn write_file<P: AsRef<Path>>(path: P, hosts: &[Host]) -> Result<()> {
    let mut config = SshConfig::new(path.as_ref());
    config.hosts_mut().extend_from_slice(hosts);
    config.write()
}

/// Reads a config file (by default the user's) and works out the options that apply to `alias`.
///
/// See [`SshConfig::effective_config`].
pub fn effective_config(alias: &str, path: Option<&Path>) -> Result<Host> {
    let mut config = SshConfig::at_or_default(path)?;
    let _ = config.read()?;
    config.effective_config(alias)
}

/// Reads a config file (by default the user's) and finds the alias of the block
/// whose `HostName` is exactly `hostname`.
pub fn alias_for_hostname(hostname: &str, path: Option<&Path>) -> Result<Option<String>> {
    let mut config = SshConfig::at_or_default(path)?;
    let _ = config.read()?;
    Ok(config.alias_for_hostname(hostname).map(str::to_owned))
}

///////////////////////////////////////////////////////////////////////////////////////
