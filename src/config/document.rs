//! A whole config file
// (c) 2024 Ross Younger

use std::{
    fmt::Display,
    fs::File,
    io::Write as _,
    path::{Path, PathBuf},
};

use tracing::debug;

use super::{
    files::{DefaultBlocks, ParsedConfig, Parser},
    Host, MergePolicy,
};
use crate::{
    os::{AbstractPlatform as _, Platform},
    Error, Result,
};

/// An ssh client config file: a path, and the `Host` blocks read from (or to be written to) it.
///
/// Nothing is read until [`read`](Self::read) or
/// [`read_inheriting_defaults`](Self::read_inheriting_defaults) is called.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SshConfig {
    path: PathBuf,
    hosts: Vec<Host>,
    defaults: Option<Host>,
}

static_assertions::assert_impl_all!(SshConfig: Send, Sync);

impl SshConfig {
    /// Refers to a config file at the given path. The file need not exist yet.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            hosts: Vec::new(),
            defaults: None,
        }
    }

    /// Refers to the current user's config file (`~/.ssh/config` on most platforms),
    /// which must exist.
    pub fn user_default() -> Result<Self> {
        let path = Platform::user_ssh_config()?;
        if !path.exists() {
            return Err(Error::NotFound { path });
        }
        Ok(Self::new(path))
    }

    /// Refers to the file at `path` if given, otherwise to [`user_default`](Self::user_default)
    pub fn at_or_default(path: Option<&Path>) -> Result<Self> {
        path.map_or_else(Self::user_default, |p| Ok(Self::new(p)))
    }

    /// The backing file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the file, keeping every block (including `Host *`) in file order.
    ///
    /// Replaces anything previously read. On error, the previous contents are kept.
    pub fn read(&mut self) -> Result<&[Host]> {
        self.load(DefaultBlocks::Keep)
    }

    /// Reads the file, moving `Host *` blocks out of the sequence into [`defaults`](Self::defaults)
    /// and filling every other block's unset options from them.
    ///
    /// The filled options become part of each block, so a later [`write`](Self::write)
    /// writes them out explicitly, followed by the combined defaults.
    pub fn read_inheriting_defaults(&mut self) -> Result<&[Host]> {
        self.load(DefaultBlocks::Inherit)
    }

    fn load(&mut self, defaults: DefaultBlocks) -> Result<&[Host]> {
        let ParsedConfig {
            hosts,
            defaults: default_host,
        } = Parser::for_path(&self.path)?.parse(defaults)?;
        debug!("read {} host blocks from {}", hosts.len(), self.path.display());
        self.hosts = hosts;
        self.defaults = default_host;
        Ok(&self.hosts)
    }

    /// Parses config text without touching the filesystem; the path is only recorded.
    pub fn from_text(path: impl Into<PathBuf>, text: &str) -> Result<Self> {
        let ParsedConfig { hosts, defaults } = Parser::for_str(text).parse(DefaultBlocks::Keep)?;
        Ok(Self {
            path: path.into(),
            hosts,
            defaults,
        })
    }

    /// The blocks, in order
    #[must_use]
    pub fn hosts(&self) -> &[Host] {
        &self.hosts
    }

    /// The blocks, for editing
    pub fn hosts_mut(&mut self) -> &mut Vec<Host> {
        &mut self.hosts
    }

    /// The diverted `Host *` block, if the file was read with
    /// [`read_inheriting_defaults`](Self::read_inheriting_defaults) and had one
    #[must_use]
    pub fn defaults(&self) -> Option<&Host> {
        self.defaults.as_ref()
    }

    /// Appends a block
    pub fn push(&mut self, host: Host) {
        self.hosts.push(host);
    }

    /// The first block whose pattern is exactly `pattern` (no wildcard matching)
    #[must_use]
    pub fn find(&self, pattern: &str) -> Option<&Host> {
        self.hosts.iter().find(|h| h.pattern() == pattern)
    }

    /// As [`find`](Self::find), for editing
    pub fn find_mut(&mut self, pattern: &str) -> Option<&mut Host> {
        self.hosts.iter_mut().find(|h| h.pattern() == pattern)
    }

    /// Writes the blocks out to the backing file, replacing it.
    ///
    /// This is not atomic; a failure part-way through may leave a truncated file.
    pub fn write(&self) -> Result<()> {
        let mut text = self.to_string();
        if !text.is_empty() {
            text.push('\n');
        }
        let mut file = File::create(&self.path).map_err(|e| Error::file("create", &self.path, e))?;
        file.write_all(text.as_bytes())
            .map_err(|e| Error::file("write", &self.path, e))?;
        debug!("wrote {} host blocks to {}", self.hosts.len(), self.path.display());
        Ok(())
    }

    /// Works out the configuration that applies to `alias`.
    ///
    /// Every matching block is merged into a fresh block named `alias`, scanning the file
    /// from the bottom up with later merges overwriting earlier ones; the net effect is
    /// that for each option the first matching block in the file supplies the value.
    /// Any diverted defaults then fill the remaining gaps.
    ///
    /// The alias is only ever a candidate, never a pattern, so any text is accepted.
    pub fn effective_config(&self, alias: &str) -> Result<Host> {
        let mut config = Host::literal(alias);
        for host in self.hosts.iter().rev().filter(|h| h.matches(alias)) {
            debug!("{alias} matches Host {}", host.pattern());
            config.update(host.options(), MergePolicy::Overwrite)?;
        }
        if let Some(defaults) = &self.defaults {
            config.update(defaults.options(), MergePolicy::FillOnly)?;
        }
        Ok(config)
    }

    /// The pattern of the first block whose `HostName` is exactly `hostname`
    #[must_use]
    pub fn alias_for_hostname(&self, hostname: &str) -> Option<&str> {
        self.hosts
            .iter()
            .find(|h| h.hostname() == Some(hostname))
            .map(Host::pattern)
    }
}

impl Display for SshConfig {
    /// Renders every block, separated by blank lines; any diverted defaults go last
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, host) in self.hosts.iter().chain(&self.defaults).enumerate() {
            if i > 0 {
                f.write_str("\n\n")?;
            }
            write!(f, "{host}")?;
        }
        Ok(())
    }
}

///////////////////////////////////////////////////////////////////////////////////////
