//! Structured identifier system using type-prefixed year/sequence ids

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// How the remote document key is chosen for an entity type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyStrategy {
    /// The structured id doubles as the remote document key
    DerivedFromStructuredId,
    /// The remote store assigns its own key on creation
    StoreAssigned,
}

/// Entity type registry: prefix, collection and key policy per type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    /// Client record
    Client,
    /// Project attached to a client
    Project,
    /// Payment transaction attached to a project
    Transaction,
}

impl EntityKind {
    /// Get the string representation of the id prefix
    pub fn prefix(&self) -> &'static str {
        match self {
            EntityKind::Client => "CL",
            EntityKind::Project => "PR",
            EntityKind::Transaction => "TR",
        }
    }

    /// Remote collection name for this entity type
    pub fn collection(&self) -> &'static str {
        match self {
            EntityKind::Client => "clients",
            EntityKind::Project => "projets",
            EntityKind::Transaction => "transactions",
        }
    }

    /// Minimum zero-padded width of the sequence component
    pub fn seq_width(&self) -> usize {
        match self {
            EntityKind::Client => 2,
            EntityKind::Project => 3,
            EntityKind::Transaction => 3,
        }
    }

    /// Document key policy for this entity type
    pub fn key_strategy(&self) -> KeyStrategy {
        match self {
            EntityKind::Client => KeyStrategy::DerivedFromStructuredId,
            EntityKind::Project => KeyStrategy::StoreAssigned,
            EntityKind::Transaction => KeyStrategy::StoreAssigned,
        }
    }

    /// Field names the remote list query orders by
    pub fn order_by(&self) -> &'static [&'static str] {
        match self {
            EntityKind::Client => &["nom", "prenom"],
            EntityKind::Project => &["structuredId"],
            EntityKind::Transaction => &["transactionId"],
        }
    }

    /// Get all entity kinds
    pub fn all() -> &'static [EntityKind] {
        &[
            EntityKind::Client,
            EntityKind::Project,
            EntityKind::Transaction,
        ]
    }

    /// Resolve a kind from its id prefix
    pub fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            "CL" => Some(EntityKind::Client),
            "PR" => Some(EntityKind::Project),
            "TR" => Some(EntityKind::Transaction),
            _ => None,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.prefix())
    }
}

impl FromStr for EntityKind {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntityKind::from_prefix(s).ok_or_else(|| IdParseError::InvalidPrefix(s.to_string()))
    }
}

/// A human-facing structured identifier of the form `PREFIX-YY-NNN`
///
/// `YY` is the two-digit year of allocation and `NNN` a zero-padded
/// sequence number, strictly increasing within one year scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StructuredId {
    kind: EntityKind,
    year: u8,
    seq: u32,
}

impl StructuredId {
    /// Assemble an id from its components
    pub fn from_parts(kind: EntityKind, year: u8, seq: u32) -> Self {
        Self { kind, year, seq }
    }

    /// Get the entity kind
    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Two-digit year scope this id was allocated in
    pub fn year(&self) -> u8 {
        self.year
    }

    /// Sequence number within the year scope
    pub fn seq(&self) -> u32 {
        self.seq
    }

    /// Parse a StructuredId from a string
    pub fn parse(s: &str) -> Result<Self, IdParseError> {
        s.parse()
    }
}

impl fmt::Display for StructuredId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{:02}-{:0width$}",
            self.kind.prefix(),
            self.year,
            self.seq,
            width = self.kind.seq_width()
        )
    }
}

impl FromStr for StructuredId {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, '-');
        let (prefix, year, seq) = match (parts.next(), parts.next(), parts.next()) {
            (Some(p), Some(y), Some(n)) => (p, y, n),
            _ => return Err(IdParseError::MissingDelimiter(s.to_string())),
        };

        let kind = prefix.parse()?;

        if year.len() != 2 || !year.bytes().all(|b| b.is_ascii_digit()) {
            return Err(IdParseError::InvalidYear(year.to_string()));
        }
        let year: u8 = year
            .parse()
            .map_err(|_| IdParseError::InvalidYear(year.to_string()))?;

        if seq.len() < 2 || !seq.bytes().all(|b| b.is_ascii_digit()) {
            return Err(IdParseError::InvalidSequence(seq.to_string()));
        }
        let seq: u32 = seq
            .parse()
            .map_err(|_| IdParseError::InvalidSequence(seq.to_string()))?;

        Ok(Self { kind, year, seq })
    }
}

// Ids order by allocation: year scope first, then sequence.
impl PartialOrd for StructuredId {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for StructuredId {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.kind.prefix(), self.year, self.seq).cmp(&(
            other.kind.prefix(),
            other.year,
            other.seq,
        ))
    }
}

impl Serialize for StructuredId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for StructuredId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Errors that can occur when parsing structured ids
#[derive(Debug, Error)]
pub enum IdParseError {
    #[error("invalid entity prefix: '{0}' (valid: CL, PR, TR)")]
    InvalidPrefix(String),

    #[error("missing '-' delimiter in structured id: '{0}'")]
    MissingDelimiter(String),

    #[error("invalid two-digit year in structured id: '{0}'")]
    InvalidYear(String),

    #[error("invalid sequence number in structured id: '{0}'")]
    InvalidSequence(String),
}
