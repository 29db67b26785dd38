//! Option keywords
// (c) 2024 Ross Younger

use std::{fmt::Display, str::FromStr as _};

use crate::{Error, Result};

/// Folds a keyword to the form used for storage and lookup.
///
/// `ssh_config(5)` keywords are case-insensitive; every map access goes through here.
#[must_use]
pub fn normalize(keyword: &str) -> String {
    keyword.trim().to_ascii_lowercase()
}

/// Keywords that open a block rather than set an option
const BLOCK_DIRECTIVES: &[&str] = &["host", "match", "include"];

pub(crate) fn is_block_directive(keyword: &str) -> bool {
    BLOCK_DIRECTIVES.contains(&normalize(keyword).as_str())
}

/// Checks that a keyword may be stored as an option, and will read back as the same keyword
pub(crate) fn check_option_keyword(keyword: &str) -> Result<()> {
    let keyword = keyword.trim();
    if is_block_directive(keyword) {
        return Err(Error::ReservedKeyword(keyword.to_owned()));
    }
    if keyword.is_empty()
        || keyword.starts_with('#')
        || keyword.contains(|c: char| c.is_whitespace() || c == '=')
    {
        return Err(Error::InvalidKeyword(keyword.to_owned()));
    }
    Ok(())
}

/// The shape of value a keyword accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Anything; stored verbatim
    Text,
    /// An unsigned integer
    Integer,
    /// One of [`LogLevel`](super::LogLevel)
    LogLevel,
    /// `yes` or `no`, for `ForwardX11`
    ForwardX11,
    /// `yes` or `no`, for `ControlPersist`
    ControlPersist,
}

/// Keywords with a well-known spelling.
///
/// Parsing is case-insensitive; `Display` gives the canonical OpenSSH spelling.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
)]
#[strum(ascii_case_insensitive)]
#[allow(missing_docs, clippy::module_name_repetitions)]
pub enum KnownKeyword {
    AddKeysToAgent,
    AddressFamily,
    BatchMode,
    BindAddress,
    CertificateFile,
    Compression,
    ConnectionAttempts,
    ConnectTimeout,
    ControlMaster,
    ControlPath,
    ControlPersist,
    DynamicForward,
    ForwardAgent,
    ForwardX11,
    HostKeyAlgorithms,
    HostName,
    IdentitiesOnly,
    IdentityAgent,
    IdentityFile,
    LocalForward,
    LogLevel,
    NumberOfPasswordPrompts,
    Port,
    PreferredAuthentications,
    ProxyCommand,
    ProxyJump,
    RemoteForward,
    #[strum(serialize = "RequestTTY")]
    RequestTty,
    SendEnv,
    ServerAliveCountMax,
    ServerAliveInterval,
    StrictHostKeyChecking,
    User,
    UserKnownHostsFile,
}

impl KnownKeyword {
    /// What sort of value this keyword takes
    #[must_use]
    pub fn kind(self) -> ValueKind {
        use KnownKeyword as K;
        match self {
            K::ConnectionAttempts
            | K::ConnectTimeout
            | K::NumberOfPasswordPrompts
            | K::ServerAliveCountMax
            | K::ServerAliveInterval => ValueKind::Integer,
            K::LogLevel => ValueKind::LogLevel,
            K::ForwardX11 => ValueKind::ForwardX11,
            K::ControlPersist => ValueKind::ControlPersist,
            _ => ValueKind::Text,
        }
    }
}

/// An option keyword, as it will be written out.
///
/// Equality ignores ASCII case, so `hostname` and `HostName` are the same keyword.
#[derive(Debug, Clone, Eq)]
pub struct Keyword {
    name: String,
    known: Option<KnownKeyword>,
}

impl Keyword {
    /// Recognises a keyword. Known keywords take their canonical spelling;
    /// anything else keeps the spelling given.
    #[must_use]
    pub fn new(keyword: &str) -> Self {
        let keyword = keyword.trim();
        match KnownKeyword::from_str(keyword) {
            Ok(known) => Self {
                name: known.to_string(),
                known: Some(known),
            },
            Err(_) => Self {
                name: keyword.to_owned(),
                known: None,
            },
        }
    }

    /// The keyword as written
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.name
    }

    /// The well-known keyword, if this is one
    #[must_use]
    pub fn known(&self) -> Option<KnownKeyword> {
        self.known
    }

    /// What sort of value this keyword takes
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        self.known.map_or(ValueKind::Text, KnownKeyword::kind)
    }

    pub(crate) fn key(&self) -> String {
        normalize(&self.name)
    }
}

impl From<KnownKeyword> for Keyword {
    fn from(known: KnownKeyword) -> Self {
        Self {
            name: known.to_string(),
            known: Some(known),
        }
    }
}

impl PartialEq for Keyword {
    fn eq(&self, other: &Self) -> bool {
        self.name.eq_ignore_ascii_case(&other.name)
    }
}

impl AsRef<str> for Keyword {
    fn as_ref(&self) -> &str {
        &self.name
    }
}

impl Display for Keyword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

///////////////////////////////////////////////////////////////////////////////////////
