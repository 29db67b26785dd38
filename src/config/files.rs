//! File parsing internals
// (c) 2024 Ross Younger

use std::{
    fs::File,
    io::{BufRead, BufReader, Read},
    path::Path,
};

use tracing::{debug, trace, warn};

use super::{
    lines::{is_host_line, parse_line, split_keyword, Line},
    Host, MergePolicy,
};
use crate::{Error, Result};

/// What to do with `Host *` blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DefaultBlocks {
    /// Leave them in the sequence like any other block
    Keep,
    /// Take them out of the sequence and merge their options into every other block
    Inherit,
}

/// The result of parsing an ssh-style configuration file
#[derive(Debug, Default)]
pub(crate) struct ParsedConfig {
    /// Every block, in file order
    pub(crate) hosts: Vec<Host>,
    /// The combined `Host *` blocks, if they were diverted
    pub(crate) defaults: Option<Host>,
}

/// The business end of reading a config file.
///
/// # Note
/// You can only use this struct once. If for some reason you want to re-parse a file,
/// you must create a fresh `Parser` to do so.
pub(crate) struct Parser<R>
where
    R: Read,
{
    line_number: usize,
    reader: BufReader<R>,
    source: String,
}

impl Parser<File> {
    pub(crate) fn for_path<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| Error::file("open", path, e))?;
        let reader = BufReader::new(file);
        Ok(Self::for_reader(reader, path.to_string_lossy().to_string()))
    }
}

impl<'a> Parser<&'a [u8]> {
    pub(crate) fn for_str(s: &'a str) -> Self {
        Self::for_reader(BufReader::new(s.as_bytes()), "<string>".into())
    }
}

impl<R: Read> Parser<R> {
    fn for_reader(reader: BufReader<R>, source: String) -> Self {
        Self {
            line_number: 0,
            reader,
            source,
        }
    }

    fn error(&self, message: impl Into<String>) -> Error {
        Error::Parse {
            origin: self.source.clone(),
            line: self.line_number,
            message: message.into(),
        }
    }

    /// Reads the whole source into a sequence of host blocks.
    /// This consumes the `Parser`.
    pub(crate) fn parse(mut self, defaults: DefaultBlocks) -> Result<ParsedConfig> {
        let mut output = ParsedConfig::default();
        // Index into output.hosts of the block currently open; `None` before the first `Host`
        // or while a diverted default block is open.
        let mut current: Option<usize> = None;
        let mut in_default = false;
        let mut line = String::new();

        loop {
            line.clear();
            self.line_number += 1;
            let n = self.reader.read_line(&mut line).map_err(|e| Error::File {
                action: "read",
                path: self.source.clone().into(),
                source: e,
            })?;
            if n == 0 {
                break; // EOF
            }
            if current.is_none() && !in_default && !is_host_line(&line) {
                // Nothing before the first block is looked at
                if let Some((keyword, _)) = split_keyword(&line) {
                    warn!(
                        "{} line {}: ignoring {keyword} outside of any Host block",
                        self.source, self.line_number
                    );
                }
                continue;
            }
            match parse_line(&line).map_err(|msg| self.error(msg))? {
                Line::Empty => (),
                Line::Host { args } => {
                    let pattern = args.join(" ");
                    if defaults == DefaultBlocks::Inherit && pattern == "*" {
                        debug!("{} line {}: default block", self.source, self.line_number);
                        if output.defaults.is_none() {
                            output.defaults = Some(Host::new("*")?);
                        }
                        in_default = true;
                        current = None;
                    } else {
                        debug!("{} line {}: Host {pattern}", self.source, self.line_number);
                        output.hosts.push(Host::new(&pattern)?);
                        in_default = false;
                        current = Some(output.hosts.len() - 1);
                    }
                }
                Line::Unsupported { keyword } => {
                    return Err(self.error(format!("{keyword} directives are not supported")));
                }
                Line::Generic { keyword, mut args } => {
                    if args.len() != 1 {
                        return Err(self.error(format!(
                            "expected a single value for {keyword}, found {}",
                            args.len()
                        )));
                    }
                    let value = args.remove(0);
                    let target = match current {
                        Some(index) => &mut output.hosts[index],
                        None => {
                            // Inside a diverted default block
                            let Some(defaults) = output.defaults.as_mut() else {
                                continue;
                            };
                            // Several `Host *` blocks combine like ssh does: the first value seen wins.
                            if defaults.contains(&keyword) {
                                trace!("{keyword} already set by an earlier default block");
                                continue;
                            }
                            defaults
                        }
                    };
                    trace!("{keyword} = {value}");
                    target.set(&keyword, &value)?;
                }
            }
        }

        if let Some(defaults) = &output.defaults {
            for host in &mut output.hosts {
                host.update(defaults.options(), MergePolicy::FillOnly)?;
            }
        }
        Ok(output)
    }
}

///////////////////////////////////////////////////////////////////////////////////////
