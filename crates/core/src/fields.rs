use std::collections::HashMap;

use regex::Regex;

// ---------------------------------------------------------------------------
// Required fields
// ---------------------------------------------------------------------------

/// The closed set of metadata columns every accumulator must carry, each
/// with its consistency policy. A fixed table, not open-ended dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredField {
    Depth,
    Well,
    DepthUnit,
    Background,
}

impl RequiredField {
    pub const ALL: [RequiredField; 4] = [
        RequiredField::Depth,
        RequiredField::Well,
        RequiredField::DepthUnit,
        RequiredField::Background,
    ];

    /// Canonical column name; matching against accumulators is
    /// case-insensitive.
    pub fn column_name(&self) -> &'static str {
        match self {
            Self::Depth => "Depth",
            Self::Well => "Well",
            Self::DepthUnit => "Depth unit",
            Self::Background => "Background",
        }
    }

    /// Whether the column must hold a single value within one accumulator.
    /// Depth and background vary per row; the well identifier and depth
    /// unit may not.
    pub fn must_be_uniform(&self) -> bool {
        matches!(self, Self::Well | Self::DepthUnit)
    }
}

// ---------------------------------------------------------------------------
// Field extraction from embedded metadata
// ---------------------------------------------------------------------------

/// One named extraction from an image's metadata blob: the source key to
/// look up and an optional pattern applied to its value.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    name: String,
    key: String,
    pattern: Option<Regex>,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            key: key.into(),
            pattern: None,
        }
    }

    pub fn with_pattern(
        name: impl Into<String>,
        key: impl Into<String>,
        pattern: &str,
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            name: name.into(),
            key: key.into(),
            pattern: Some(Regex::new(pattern)?),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Apply this field to the parsed metadata. Key absent or pattern not
    /// matching yields `None`, never an error. With a pattern, capture
    /// group 1 wins if present, else the whole match.
    pub fn extract(&self, metadata: &HashMap<String, String>) -> Option<String> {
        let value = metadata.get(&self.key)?;
        match &self.pattern {
            None => Some(value.clone()),
            Some(re) => {
                let caps = re.captures(value)?;
                let m = caps.get(1).or_else(|| caps.get(0))?;
                Some(m.as_str().to_string())
            }
        }
    }
}

/// Parse a `key:value;key:value` metadata blob. Tokens are split on the
/// first `:`; tokens without one are dropped silently. Keys and values are
/// trimmed of whitespace and quotes.
pub fn parse_blob(blob: &str) -> HashMap<String, String> {
    blob.split(';')
        .filter_map(|token| {
            let (key, value) = token.split_once(':')?;
            Some((trim(key), trim(value)))
        })
        .collect()
}

fn trim(s: &str) -> String {
    s.trim_matches(|c: char| c.is_whitespace() || c == '\'' || c == '"')
        .to_string()
}
