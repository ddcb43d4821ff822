use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Category tags a captor offers or a capturable accepts.
///
/// A captor may take a point when at least one of its tags is accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CaptureTypes(BTreeSet<String>);

impl CaptureTypes {
    pub fn new<I, S>(types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(types.into_iter().map(Into::into).collect())
    }

    /// Tags accepted by a capturable point unless its rules say otherwise.
    pub fn default_captors() -> Self {
        Self::new(["Player", "Vehicle", "Tank", "Infantry"])
    }

    pub fn overlaps(&self, other: &CaptureTypes) -> bool {
        self.0.iter().any(|t| other.0.contains(t))
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.0.contains(tag)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for CaptureTypes {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}
