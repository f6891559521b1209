//! Site version parsing and comparison.
//!
//! Version strings come from two places: the version recorded on an installed
//! site, and the version a migration task is gated on. Both are compared on
//! their numeric `major.minor.patch` triple only; a pre-release or build suffix
//! (`1.5.0-rc1`, `1.5.0+abc`) is kept for display but never changes ordering.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Sentinel accepted by [`TaskVersion`] for catch-all tasks.
pub const WILDCARD: &str = "*";

static VERSION_REGEX: OnceLock<Regex> = OnceLock::new();

fn version_regex() -> &'static Regex {
    VERSION_REGEX.get_or_init(|| {
        Regex::new(r"^[vV]?(\d+)\.(\d+)(?:\.(\d+))?([-+][0-9A-Za-z.\-+]*)?$")
            .expect("VERSION_REGEX is valid")
    })
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VersionError {
    #[error("invalid version format: {0:?}, expected X.Y.Z")]
    Invalid(String),

    #[error("version component out of range: {0:?}")]
    OutOfRange(String),
}

/// A concrete `major.minor.patch` version.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SiteVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    suffix: Option<String>,
}

impl SiteVersion {
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
            suffix: None,
        }
    }

    pub fn parse(s: &str) -> Result<Self, VersionError> {
        let trimmed = s.trim();
        let caps = version_regex()
            .captures(trimmed)
            .ok_or_else(|| VersionError::Invalid(s.to_string()))?;

        let component = |idx: usize| -> Result<u64, VersionError> {
            match caps.get(idx) {
                Some(m) => m
                    .as_str()
                    .parse::<u64>()
                    .map_err(|_| VersionError::OutOfRange(m.as_str().to_string())),
                None => Ok(0),
            }
        };

        Ok(Self {
            major: component(1)?,
            minor: component(2)?,
            patch: component(3)?,
            suffix: caps.get(4).map(|m| m.as_str().to_string()),
        })
    }

    pub fn suffix(&self) -> Option<&str> {
        self.suffix.as_deref()
    }

    fn triple(&self) -> (u64, u64, u64) {
        (self.major, self.minor, self.patch)
    }

    /// Ordering on the numeric triple, ignoring any suffix.
    pub fn cmp_release(&self, other: &Self) -> Ordering {
        self.triple().cmp(&other.triple())
    }

    pub fn is_equivalent(&self, other: &Self) -> bool {
        self.cmp_release(other) == Ordering::Equal
    }
}

impl FromStr for SiteVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for SiteVersion {
    type Error = VersionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<SiteVersion> for String {
    fn from(value: SiteVersion) -> Self {
        value.to_string()
    }
}

impl fmt::Display for SiteVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(suffix) = &self.suffix {
            f.write_str(suffix)?;
        }
        Ok(())
    }
}

/// The version a task is gated on: a concrete release, or the catch-all
/// wildcard that runs after every version-specific task.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TaskVersion {
    Specific(SiteVersion),
    Wildcard,
}

impl TaskVersion {
    pub fn is_wildcard(&self) -> bool {
        matches!(self, TaskVersion::Wildcard)
    }

    pub fn as_specific(&self) -> Option<&SiteVersion> {
        match self {
            TaskVersion::Specific(v) => Some(v),
            TaskVersion::Wildcard => None,
        }
    }
}

impl FromStr for TaskVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim() == WILDCARD {
            return Ok(TaskVersion::Wildcard);
        }
        SiteVersion::parse(s).map(TaskVersion::Specific)
    }
}

impl From<SiteVersion> for TaskVersion {
    fn from(value: SiteVersion) -> Self {
        TaskVersion::Specific(value)
    }
}

impl fmt::Display for TaskVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskVersion::Specific(v) => fmt::Display::fmt(v, f),
            TaskVersion::Wildcard => f.write_str(WILDCARD),
        }
    }
}

fn parse_pair(a: &str, b: &str) -> Option<(SiteVersion, SiteVersion)> {
    Some((SiteVersion::parse(a).ok()?, SiteVersion::parse(b).ok()?))
}

/// True when `a` is strictly older than `b`. Any unparseable input, the
/// wildcard included, yields `false`.
pub fn less_recent_than(a: &str, b: &str) -> bool {
    parse_pair(a, b).is_some_and(|(a, b)| a.cmp_release(&b) == Ordering::Less)
}

/// True when `a` is strictly newer than `b`. Unparseable input yields `false`.
pub fn more_recent_than(a: &str, b: &str) -> bool {
    parse_pair(a, b).is_some_and(|(a, b)| a.cmp_release(&b) == Ordering::Greater)
}

/// True when both versions share the same numeric triple.
pub fn equivalent(a: &str, b: &str) -> bool {
    parse_pair(a, b).is_some_and(|(a, b)| a.is_equivalent(&b))
}
