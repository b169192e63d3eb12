//! Options controlling template discovery and placeholder encoding.

use serde::Deserialize;

use crate::error::ConfigError;
use crate::placeholder::DEFAULT_PREFIX;

/// Configuration for scanning, encoding, and restoring embedded CSS.
///
/// Create with [`LitOptions::new()`] and chain builder methods:
///
/// ```rust
/// use csslit::LitOptions;
///
/// let opts = LitOptions::new()
///     .tags(["css", "styled.div", "createGlobalStyle"])
///     .placeholder_prefix("MY_LIT");
/// assert!(opts.validate().is_ok());
/// ```
///
/// Hosts that keep tool settings in a file can deserialize the same
/// structure from TOML:
///
/// ```rust
/// use csslit::LitOptions;
///
/// let opts = LitOptions::from_toml_str(r#"tags = ["css", "injectGlobal"]"#).unwrap();
/// assert_eq!(opts.tags, vec!["css", "injectGlobal"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LitOptions {
    /// Template tags whose bodies are treated as CSS. A tag matches either
    /// the whole tag expression (`styled.div`) or its final identifier.
    pub tags: Vec<String>,

    /// Reserved prefix used for placeholder comments (`/*PREFIX:N*/`).
    pub placeholder_prefix: String,

    /// Honour `csslit-disable` and `csslit-disable-next-line` comments
    /// in host source.
    pub disable_comments: bool,
}

impl Default for LitOptions {
    fn default() -> Self {
        Self {
            tags: vec!["css".to_string()],
            placeholder_prefix: DEFAULT_PREFIX.to_string(),
            disable_comments: true,
        }
    }
}

impl LitOptions {
    /// Create options with all defaults (`css` tag, `POSTCSS_LIT` prefix).
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the set of recognised template tags.
    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Set the reserved placeholder prefix.
    pub fn placeholder_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.placeholder_prefix = prefix.into();
        self
    }

    /// Enable or disable `csslit-disable` comment handling.
    pub fn disable_comments(mut self, enabled: bool) -> Self {
        self.disable_comments = enabled;
        self
    }

    /// Parse and validate options from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let options: Self = toml::from_str(text).map_err(|e| ConfigError::Toml(e.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    /// Check that the prefix can be embedded in a CSS comment and matched
    /// back unambiguously, and that every tag is a dotted identifier path.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let prefix = &self.placeholder_prefix;
        if prefix.is_empty()
            || !prefix
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(ConfigError::InvalidPrefix(prefix.clone()));
        }

        for tag in &self.tags {
            let valid = !tag.is_empty()
                && tag.split('.').all(|part| {
                    !part.is_empty()
                        && part
                            .chars()
                            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
                });
            if !valid {
                return Err(ConfigError::InvalidTag(tag.clone()));
            }
        }

        Ok(())
    }

    /// Whether `tag` (as written in source, whitespace removed) is one of
    /// the configured CSS tags.
    pub fn matches_tag(&self, tag: &str) -> bool {
        let last = tag.rsplit('.').next().unwrap_or(tag);
        self.tags.iter().any(|t| t == tag || t == last)
    }
}
