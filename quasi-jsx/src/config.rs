use std::collections::BTreeSet;
use std::path::Path;

use serde::Deserialize;

use crate::error::Result;
use crate::whitespace::WhitespacePolicy;

pub const DEFAULT_VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "keygen", "link", "meta", "param",
    "source", "track", "wbr",
];

pub const DEFAULT_MERGE_HELPER: &str = "Object.assign";

/// Tags that never receive a closing tag. Built once, read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoidTags(BTreeSet<String>);

impl VoidTags {
    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(tags.into_iter().map(Into::into).collect())
    }

    pub fn with_extra<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.0.extend(tags.into_iter().map(Into::into));
        self
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.0.contains(tag)
    }
}

impl Default for VoidTags {
    fn default() -> Self {
        Self::new(DEFAULT_VOID_TAGS.iter().copied())
    }
}

/// Options of one transform run.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformOptions {
    pub whitespace: WhitespacePolicy,
    /// Callee of the shallow object merge, e.g. `Object.assign`.
    pub merge_helper: String,
    /// Names treated as callable components in addition to the unit's own
    /// declarations.
    pub components: Vec<String>,
    pub void_tags: VoidTags,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            whitespace: WhitespacePolicy::default(),
            merge_helper: DEFAULT_MERGE_HELPER.to_string(),
            components: Vec::new(),
            void_tags: VoidTags::default(),
        }
    }
}

/// On-disk shape (`quasi.toml`).
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawOptions {
    trim: bool,
    whitespace: Option<WhitespacePolicy>,
    merge_helper: Option<String>,
    components: Vec<String>,
    void_tags: Vec<String>,
}

impl From<RawOptions> for TransformOptions {
    fn from(raw: RawOptions) -> Self {
        let whitespace = raw.whitespace.unwrap_or(if raw.trim {
            WhitespacePolicy::Trim
        } else {
            WhitespacePolicy::Preserve
        });
        Self {
            whitespace,
            merge_helper: raw
                .merge_helper
                .unwrap_or_else(|| DEFAULT_MERGE_HELPER.to_string()),
            components: raw.components,
            void_tags: VoidTags::default().with_extra(raw.void_tags),
        }
    }
}

impl TransformOptions {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let raw: RawOptions = toml::from_str(source)?;
        Ok(raw.into())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        let options = Self::from_toml_str(&source)?;
        log::debug!("loaded options from {}: {options:?}", path.display());
        Ok(options)
    }
}
