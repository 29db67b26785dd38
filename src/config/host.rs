//! A single `Host` block
// (c) 2024 Ross Younger

use std::fmt::Display;

use indexmap::{map::Entry, IndexMap};
use tracing::trace;

use super::{
    keyword::{check_option_keyword, normalize, Keyword, KnownKeyword},
    lines::quote_arg,
    matching::HostPattern,
    values::{LogLevel, Value},
};
use crate::Result;

/// How [`Host::update`] treats keywords that are already set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergePolicy {
    /// Incoming values replace existing ones
    Overwrite,
    /// Incoming values only fill keywords that are currently unset
    FillOnly,
}

/// One `Host` block: a pattern and the options that apply to hosts matching it.
///
/// The pattern is fixed at construction. Options are kept in insertion order,
/// which is the order they are written out in.
///
/// ```
/// use sshconf::config::Host;
/// let mut host = Host::new("*.example.com")?;
/// host.set("user", "alice")?;
/// host.set("ConnectTimeout", "30")?;
/// assert!(host.matches("www.example.com"));
/// assert_eq!(host.to_string(), "Host *.example.com\n\tUser alice\n\tConnectTimeout 30");
/// # Ok::<(), sshconf::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Host {
    pattern: HostPattern,
    /// Keyed by [`normalize`]d keyword
    options: IndexMap<String, (Keyword, Value)>,
}

impl Host {
    /// Creates an empty block
    pub fn new(pattern: &str) -> Result<Self> {
        Ok(Self {
            pattern: HostPattern::new(pattern)?,
            options: IndexMap::new(),
        })
    }

    /// Creates an empty block whose pattern is taken literally: it matches only
    /// the exact text given, with no wildcards, classes or negation.
    pub(crate) fn literal(name: &str) -> Self {
        Self {
            pattern: HostPattern::literal(name),
            options: IndexMap::new(),
        }
    }

    /// Creates a block with some initial options, each applied as by [`set`](Self::set)
    pub fn with_options<I, K, V>(pattern: &str, options: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut host = Self::new(pattern)?;
        for (k, v) in options {
            host.set(k.as_ref(), v.as_ref())?;
        }
        Ok(host)
    }

    /// The `Host` line's value, as written
    #[must_use]
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// Does this block apply to the given alias?
    #[must_use]
    pub fn matches(&self, candidate: &str) -> bool {
        self.pattern.matches(candidate)
    }

    /// Sets an option, replacing any existing value.
    ///
    /// The value is coerced to the type the keyword requires; an empty value unsets it.
    pub fn set(&mut self, keyword: &str, value: &str) -> Result<()> {
        check_option_keyword(keyword)?;
        let keyword = Keyword::new(keyword);
        match Value::coerce(&keyword, value)? {
            None => {
                let _ = self.unset(keyword.as_str());
            }
            Some(value) => match self.options.entry(keyword.key()) {
                // keep the spelling and position it was first given with
                Entry::Occupied(mut existing) => existing.get_mut().1 = value,
                Entry::Vacant(slot) => {
                    let _ = slot.insert((keyword, value));
                }
            },
        }
        Ok(())
    }

    /// Removes an option, returning its old value
    pub fn unset(&mut self, keyword: &str) -> Option<Value> {
        self.options
            .shift_remove(&normalize(keyword))
            .map(|(_, value)| value)
    }

    /// Retrieves an option. Unknown or unset keywords give `None`.
    #[must_use]
    pub fn get(&self, keyword: &str) -> Option<&Value> {
        self.options.get(&normalize(keyword)).map(|(_, value)| value)
    }

    /// Is this option set?
    #[must_use]
    pub fn contains(&self, keyword: &str) -> bool {
        self.options.contains_key(&normalize(keyword))
    }

    /// Applies [`set`](Self::set) to each pair in turn, in the order given.
    ///
    /// Stops at the first error; pairs before it will already have been applied.
    pub fn update<I, K, V>(&mut self, pairs: I, policy: MergePolicy) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Display,
    {
        for (k, v) in pairs {
            let k = k.as_ref();
            if policy == MergePolicy::FillOnly && self.contains(k) {
                trace!("{}: keeping own {k}", self.pattern);
                continue;
            }
            self.set(k, &v.to_string())?;
        }
        Ok(())
    }

    /// Every option that is set, in insertion order
    #[must_use]
    pub fn options(&self) -> impl Iterator<Item = (&Keyword, &Value)> {
        self.options.values().map(|(k, v)| (k, v))
    }

    /// The number of options set
    #[must_use]
    pub fn len(&self) -> usize {
        self.options.len()
    }

    /// Does this block have no options?
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    fn text(&self, keyword: KnownKeyword) -> Option<&str> {
        self.get(&keyword.to_string()).and_then(Value::as_str)
    }

    /// The `HostName` option
    #[must_use]
    pub fn hostname(&self) -> Option<&str> {
        self.text(KnownKeyword::HostName)
    }

    /// The `User` option
    #[must_use]
    pub fn user(&self) -> Option<&str> {
        self.text(KnownKeyword::User)
    }

    /// The `LogLevel` option
    #[must_use]
    pub fn log_level(&self) -> Option<LogLevel> {
        match self.get("LogLevel") {
            Some(Value::LogLevel(level)) => Some(*level),
            _ => None,
        }
    }
}

impl Display for Host {
    /// Renders the block in config-file syntax, without a trailing newline
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Host {}", self.pattern)?;
        for (keyword, value) in self.options() {
            write!(f, "\n\t{keyword} {}", quote_arg(&value.to_string()))?;
        }
        Ok(())
    }
}

///////////////////////////////////////////////////////////////////////////////////////
