//! The `CharmUrl` identifier type.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{ParseError, Result};

/// Where a charm URL points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Schema {
    /// The public charm store.
    CharmStore,
    /// A local repository on disk.
    Local,
}

impl Schema {
    /// The prefix used when rendering a URL with this schema.
    pub fn as_str(&self) -> &'static str {
        match self {
            Schema::CharmStore => "cs",
            Schema::Local => "local",
        }
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A charm or bundle identifier, e.g. `cs:~bob/trusty/wordpress-42`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CharmUrl {
    /// Repository schema.
    pub schema: Schema,
    /// Owning user, without the leading `~`.
    pub user: Option<String>,
    /// Series the charm targets. Bundles and multi-series charms have none.
    pub series: Option<String>,
    /// Charm or bundle name.
    pub name: String,
    /// Pinned revision. `None` means unspecified.
    pub revision: Option<u32>,
}

impl CharmUrl {
    /// Build a charm store URL with no user, no series and no revision.
    pub fn new(name: impl Into<String>) -> Self {
        CharmUrl {
            schema: Schema::CharmStore,
            user: None,
            series: None,
            name: name.into(),
            revision: None,
        }
    }

    /// Parse a charm URL. A missing schema defaults to `cs`.
    pub fn parse(s: &str) -> Result<Self> {
        let (schema, rest) = match s.split_once(':') {
            Some(("cs", rest)) => (Schema::CharmStore, rest),
            Some(("local", rest)) => (Schema::Local, rest),
            Some((other, _)) => {
                return Err(ParseError::UnknownSchema {
                    url: s.to_string(),
                    schema: other.to_string(),
                })
            }
            None => (Schema::CharmStore, s),
        };

        let mut parts: Vec<&str> = rest.split('/').collect();

        let user = match parts.first() {
            Some(&first) if first.starts_with('~') => {
                let user = &first[1..];
                if schema == Schema::Local {
                    return Err(ParseError::LocalWithUser { url: s.to_string() });
                }
                if !is_valid_user(user) {
                    return Err(ParseError::InvalidUser {
                        url: s.to_string(),
                        user: user.to_string(),
                    });
                }
                parts.remove(0);
                Some(user.to_string())
            }
            _ => None,
        };

        let (series, last) = match parts.as_slice() {
            [last] => (None, *last),
            [series, last] => {
                if !is_valid_series(series) {
                    return Err(ParseError::InvalidSeries {
                        url: s.to_string(),
                        series: series.to_string(),
                    });
                }
                (Some(series.to_string()), *last)
            }
            _ => return Err(ParseError::InvalidForm { url: s.to_string() }),
        };

        let (name, revision) = split_revision(last);
        if !is_valid_name(name) {
            return Err(ParseError::InvalidName {
                url: s.to_string(),
                name: name.to_string(),
            });
        }

        Ok(CharmUrl {
            schema,
            user,
            series,
            name: name.to_string(),
            revision,
        })
    }

    /// Return a copy of this URL with the revision replaced.
    ///
    /// Passing `None` yields the unrevisioned form.
    pub fn with_revision(&self, revision: Option<u32>) -> Self {
        CharmUrl {
            revision,
            ..self.clone()
        }
    }
}

impl fmt::Display for CharmUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.schema)?;
        if let Some(user) = &self.user {
            write!(f, "~{user}/")?;
        }
        if let Some(series) = &self.series {
            write!(f, "{series}/")?;
        }
        f.write_str(&self.name)?;
        if let Some(rev) = self.revision {
            write!(f, "-{rev}")?;
        }
        Ok(())
    }
}

impl FromStr for CharmUrl {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self> {
        CharmUrl::parse(s)
    }
}

impl Serialize for CharmUrl {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CharmUrl {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        CharmUrl::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Split a trailing `-<digits>` revision off a name segment.
fn split_revision(segment: &str) -> (&str, Option<u32>) {
    if let Some((name, rev)) = segment.rsplit_once('-') {
        if !rev.is_empty() && rev.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(rev) = rev.parse() {
                return (name, Some(rev));
            }
        }
    }
    (segment, None)
}

/// Names are lowercase hyphen-separated words; the first word starts with a
/// letter and every word holds at least one letter.
fn is_valid_name(name: &str) -> bool {
    let mut words = name.split('-');
    let Some(first) = words.next() else {
        return false;
    };
    if !first.starts_with(|c: char| c.is_ascii_lowercase()) || !is_lower_alnum(first) {
        return false;
    }
    words.all(|w| {
        !w.is_empty() && is_lower_alnum(w) && w.bytes().any(|b| b.is_ascii_lowercase())
    })
}

fn is_valid_series(series: &str) -> bool {
    series.starts_with(|c: char| c.is_ascii_lowercase()) && is_lower_alnum(series)
}

fn is_valid_user(user: &str) -> bool {
    let mut chars = user.chars();
    match chars.next() {
        Some(c) if c.is_ascii_lowercase() || c.is_ascii_digit() => {}
        _ => return false,
    }
    let rest = chars.as_str();
    !rest.is_empty()
        && rest
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '.' | '-'))
}

fn is_lower_alnum(s: &str) -> bool {
    s.bytes()
        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
}
