//! Command and request definitions
//!
//! Represents the requests a client sends.

use std::fmt;

use clap::ValueEnum;

/// Operations understood by the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Set,
    Get,
    Del,
}

impl Command {
    /// All commands, in benchmark phase order
    pub const ALL: [Command; 3] = [Command::Set, Command::Get, Command::Del];

    /// Lowercase name as used on the command line
    pub fn name(self) -> &'static str {
        match self {
            Command::Set => "set",
            Command::Get => "get",
            Command::Del => "del",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Mapping between commands and their one-byte wire tags
///
/// The tag carries no self-description, so client and server have to agree
/// on the mapping out of band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum TagScheme {
    /// Set=0, Get=1, Del=2
    #[default]
    Canonical,

    /// Get=0, Set=1, Del=2
    GetFirst,
}

impl TagScheme {
    /// Wire tag for `command`
    pub fn tag(self, command: Command) -> u8 {
        match (self, command) {
            (TagScheme::Canonical, Command::Set) => 0,
            (TagScheme::Canonical, Command::Get) => 1,
            (TagScheme::GetFirst, Command::Get) => 0,
            (TagScheme::GetFirst, Command::Set) => 1,
            (_, Command::Del) => 2,
        }
    }

    /// Command for a wire tag, if the tag is known
    pub fn command(self, tag: u8) -> Option<Command> {
        Command::ALL.into_iter().find(|&c| self.tag(c) == tag)
    }
}

/// A single request
///
/// The value is present exactly when the command is `Set`; the
/// constructors are the only way to build one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    command: Command,
    key: Vec<u8>,
    value: Option<Vec<u8>>,
}

impl Request {
    /// Store `value` under `key`
    pub fn set(key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            command: Command::Set,
            key: key.into(),
            value: Some(value.into()),
        }
    }

    /// Fetch the value for `key`
    pub fn get(key: impl Into<Vec<u8>>) -> Self {
        Self {
            command: Command::Get,
            key: key.into(),
            value: None,
        }
    }

    /// Remove `key`
    pub fn del(key: impl Into<Vec<u8>>) -> Self {
        Self {
            command: Command::Del,
            key: key.into(),
            value: None,
        }
    }

    pub fn command(&self) -> Command {
        self.command
    }

    pub fn key(&self) -> &[u8] {
        &self.key
    }

    pub fn value(&self) -> Option<&[u8]> {
        self.value.as_deref()
    }
}
