//! JAR manifest model.
//!
//! A manifest is a main attribute section followed by optional named
//! sections. Each section is a run of `Key: value` lines terminated by a
//! blank line; a line starting with a single space continues the previous
//! value. Named sections begin with a `Name:` header.

use crate::error::{ApiError, ApiResult};
use indexmap::IndexMap;
use serde::Serialize;

/// Attribute set of one manifest section. Names compare ASCII
/// case-insensitively but keep the spelling they were first seen with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Attributes {
    entries: IndexMap<String, String>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Insert or replace an attribute, returning the previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let name = name.into();
        let value = value.into();
        match self
            .entries
            .iter_mut()
            .find(|(key, _)| key.eq_ignore_ascii_case(&name))
        {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.insert(name, value);
                None
            }
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Manifest {
    main: Attributes,
    sections: IndexMap<String, Attributes>,
}

impl Manifest {
    /// Conventional location of the manifest inside an archive.
    pub const PATH: &'static str = "/META-INF/MANIFEST.MF";

    const SECTION_NAME: &'static str = "Name";

    pub fn from_bytes(bytes: &[u8]) -> ApiResult<Self> {
        let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
        let text = std::str::from_utf8(bytes)
            .map_err(|e| ApiError::InvalidManifest(format!("not valid UTF-8: {}", e)))?;
        Self::parse(text)
    }

    pub fn parse(text: &str) -> ApiResult<Self> {
        let normalized = text.replace("\r\n", "\n").replace('\r', "\n");

        // Completed header blocks; the first one is the main section even if empty.
        let mut blocks: Vec<Vec<(String, String)>> = Vec::new();
        let mut current: Vec<(String, String)> = Vec::new();

        for (idx, line) in normalized.split('\n').enumerate() {
            let line_no = idx + 1;

            if line.is_empty() {
                if blocks.is_empty() || !current.is_empty() {
                    blocks.push(std::mem::take(&mut current));
                }
                continue;
            }

            if let Some(continued) = line.strip_prefix(' ') {
                match current.last_mut() {
                    Some((_, value)) => value.push_str(continued),
                    None => {
                        return Err(ApiError::InvalidManifest(format!(
                            "line {}: continuation without a preceding header",
                            line_no
                        )));
                    }
                }
                continue;
            }

            let (name, value) = line.split_once(':').ok_or_else(|| {
                ApiError::InvalidManifest(format!("line {}: missing ':' in header", line_no))
            })?;
            if name.is_empty() || name.chars().any(char::is_whitespace) {
                return Err(ApiError::InvalidManifest(format!(
                    "line {}: invalid header name {:?}",
                    line_no, name
                )));
            }
            let value = value.strip_prefix(' ').unwrap_or(value);
            current.push((name.to_string(), value.to_string()));
        }
        if blocks.is_empty() || !current.is_empty() {
            blocks.push(current);
        }

        let mut manifest = Manifest::default();
        let mut blocks = blocks.into_iter();

        if let Some(main) = blocks.next() {
            for (name, value) in main {
                manifest.main.insert(name, value);
            }
        }

        for block in blocks.filter(|b| !b.is_empty()) {
            let mut headers = block.into_iter();
            let section_name = match headers.next() {
                Some((name, value)) if name.eq_ignore_ascii_case(Self::SECTION_NAME) => value,
                Some((name, _)) => {
                    return Err(ApiError::InvalidManifest(format!(
                        "section starts with {:?} instead of Name",
                        name
                    )));
                }
                None => continue,
            };
            let attributes = manifest.sections.entry(section_name).or_default();
            for (name, value) in headers {
                attributes.insert(name, value);
            }
        }

        Ok(manifest)
    }

    pub fn main_attributes(&self) -> &Attributes {
        &self.main
    }

    /// Shortcut for a main-section attribute.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.main.get(name)
    }

    pub fn section(&self, name: &str) -> Option<&Attributes> {
        self.sections.get(name)
    }

    pub fn sections(&self) -> impl Iterator<Item = (&str, &Attributes)> {
        self.sections.iter().map(|(k, v)| (k.as_str(), v))
    }
}
