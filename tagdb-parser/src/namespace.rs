//! Namespaces and raw tag keys
//!
//!     Labels are partitioned into a fixed set of namespaces. The set is closed: adding one
//!     means adding a file to every database, so it is modeled as an enum. The declaration
//!     order is significant, it is the order in which cross-namespace lookups probe the
//!     stores (see [Namespace::ALL]).
//!
//!     A raw tag is the untranslated key of a label. Keys are normalized on the way in so
//!     that two spellings of the same tag collapse to the same key.

use crate::error::{NamespaceError, RawTagError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A label namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Namespace {
    Reclass,
    Language,
    Parody,
    Character,
    Group,
    Artist,
    Cosplayer,
    Male,
    Female,
    Mixed,
    Other,
    /// Reserved for suggestion results in namespaces the database doesn't know.
    /// Never persisted.
    Temp,
}

impl Namespace {
    /// Every persisted namespace, in probe order.
    pub const ALL: [Namespace; 11] = [
        Namespace::Reclass,
        Namespace::Language,
        Namespace::Parody,
        Namespace::Character,
        Namespace::Group,
        Namespace::Artist,
        Namespace::Cosplayer,
        Namespace::Male,
        Namespace::Female,
        Namespace::Mixed,
        Namespace::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Namespace::Reclass => "reclass",
            Namespace::Language => "language",
            Namespace::Parody => "parody",
            Namespace::Character => "character",
            Namespace::Group => "group",
            Namespace::Artist => "artist",
            Namespace::Cosplayer => "cosplayer",
            Namespace::Male => "male",
            Namespace::Female => "female",
            Namespace::Mixed => "mixed",
            Namespace::Other => "other",
            Namespace::Temp => "temp",
        }
    }

    /// Short alias accepted in tag references, e.g. `a:john`.
    pub fn abbreviation(&self) -> &'static str {
        match self {
            Namespace::Reclass => "r",
            Namespace::Language => "l",
            Namespace::Parody => "p",
            Namespace::Character => "c",
            Namespace::Group => "g",
            Namespace::Artist => "a",
            Namespace::Cosplayer => "cos",
            Namespace::Male => "m",
            Namespace::Female => "f",
            Namespace::Mixed => "x",
            Namespace::Other => "o",
            Namespace::Temp => "temp",
        }
    }

    /// Whether records of this namespace live in a file.
    pub fn is_persisted(&self) -> bool {
        !matches!(self, Namespace::Temp)
    }

    /// File name of the namespace inside the database directory.
    pub fn file_name(&self) -> String {
        format!("{}.md", self.as_str())
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Namespace {
    type Err = NamespaceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        let ns = match lowered.as_str() {
            "reclass" | "r" => Namespace::Reclass,
            "language" | "lang" | "l" => Namespace::Language,
            "parody" | "series" | "p" => Namespace::Parody,
            "character" | "char" | "c" => Namespace::Character,
            "group" | "circle" | "g" => Namespace::Group,
            "artist" | "a" => Namespace::Artist,
            "cosplayer" | "cos" => Namespace::Cosplayer,
            "male" | "m" => Namespace::Male,
            "female" | "f" => Namespace::Female,
            "mixed" | "x" => Namespace::Mixed,
            "other" | "misc" | "o" => Namespace::Other,
            "temp" => Namespace::Temp,
            _ => return Err(NamespaceError(s.to_string())),
        };
        Ok(ns)
    }
}

/// Normalized raw tag key.
///
/// Trimmed, lower-cased, and made only of ASCII letters, digits, spaces, `.` and `-`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct RawTag(String);

impl RawTag {
    pub fn parse(raw: &str) -> Result<Self, RawTagError> {
        let normalized = raw.trim().to_lowercase();
        if normalized.is_empty() {
            return Err(RawTagError::Empty);
        }
        if let Some(found) = normalized
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, ' ' | '.' | '-')))
        {
            return Err(RawTagError::InvalidCharacter {
                raw: raw.to_string(),
                found,
            });
        }
        Ok(RawTag(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RawTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for RawTag {
    type Err = RawTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RawTag::parse(s)
    }
}

impl AsRef<str> for RawTag {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for RawTag {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        RawTag::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Split `namespace:raw` text. The prefix only counts when it names a namespace, so
/// `re:zero` stays a bare tag.
pub fn split_qualified(text: &str) -> (Option<Namespace>, &str) {
    if let Some((prefix, rest)) = text.split_once(':') {
        if let Ok(ns) = prefix.parse::<Namespace>() {
            return (Some(ns), rest.trim());
        }
    }
    (None, text.trim())
}
