use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

pub const SEPARATOR: char = '/';

/// A normalized location inside an archive.
///
/// Always starts with a single `/`, never contains empty segments and has
/// no trailing separator (except the root itself).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArchivePath(String);

impl ArchivePath {
    pub fn new(raw: impl AsRef<str>) -> Self {
        let mut normalized = String::with_capacity(raw.as_ref().len() + 1);
        for segment in raw.as_ref().split(SEPARATOR).filter(|s| !s.is_empty()) {
            normalized.push(SEPARATOR);
            normalized.push_str(segment);
        }
        if normalized.is_empty() {
            normalized.push(SEPARATOR);
        }
        Self(normalized)
    }

    pub fn root() -> Self {
        Self(SEPARATOR.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.len() == 1
    }

    /// Last segment, or `None` for the root.
    pub fn file_name(&self) -> Option<&str> {
        if self.is_root() {
            return None;
        }
        self.0.rsplit(SEPARATOR).next()
    }

    pub fn parent(&self) -> Option<ArchivePath> {
        if self.is_root() {
            return None;
        }
        match self.0.rfind(SEPARATOR) {
            Some(0) | None => Some(Self::root()),
            Some(idx) => Some(Self(self.0[..idx].to_string())),
        }
    }

    pub fn join(&self, child: impl AsRef<str>) -> ArchivePath {
        Self::new(format!("{}{}{}", self.0, SEPARATOR, child.as_ref()))
    }

    /// Segment-aware containment: true for `self == ancestor` and for every
    /// path below it. `/foo` contains `/foo/bar` but not `/foobar`.
    pub fn is_within(&self, ancestor: &ArchivePath) -> bool {
        if ancestor.is_root() || self == ancestor {
            return true;
        }
        self.0
            .strip_prefix(ancestor.as_str())
            .is_some_and(|rest| rest.starts_with(SEPARATOR))
    }
}

impl Default for ArchivePath {
    fn default() -> Self {
        Self::root()
    }
}

impl fmt::Display for ArchivePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ArchivePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ArchivePath {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for ArchivePath {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

impl Serialize for ArchivePath {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ArchivePath {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Self::new(s))
    }
}
