//! Stop and station identifiers.

use std::fmt;

/// Backend identifier of one pole or platform.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FeedId(String);

impl FeedId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FeedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Backend identifier of a railway station.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StationId(String);

impl StationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A named stop aggregating one or more feeds.
///
/// The same feed may belong to several stops; each stop fetches it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stop {
    pub name: String,
    pub feeds: Vec<FeedId>,
}

impl Stop {
    pub fn new<I, S>(name: impl Into<String>, feeds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            feeds: feeds.into_iter().map(FeedId::new).collect(),
        }
    }
}

/// A named railway station shown as its own board page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RailStation {
    pub name: String,
    pub station: StationId,
}

impl RailStation {
    pub fn new(name: impl Into<String>, station: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            station: StationId::new(station),
        }
    }
}
