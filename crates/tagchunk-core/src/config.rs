//! Engine configuration for limits and output switches.

use serde::{Deserialize, Serialize};

/// Engine configuration controlling match limits and the normalised output.
///
/// # Defaults
///
/// - `max_matches_per_rule`: 10 000
/// - `max_name_bytes`: 256
/// - `attach_documentation`: `true`
/// - `include_text`: `false`
///
/// The type deserialises with per-field defaults so hosts can embed it in
/// their own configuration files and set only the fields they care about.
///
/// # Example
///
/// ```
/// use tagchunk_core::EngineConfig;
///
/// let config = EngineConfig::default().with_include_text(true);
/// assert_eq!(config.max_matches_per_rule(), 10_000);
/// assert!(config.include_text());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Maximum number of matches kept per rule and file.
    max_matches_per_rule: usize,
    /// Maximum bytes kept from a resolved chunk name.
    max_name_bytes: usize,
    /// Whether leading documentation chunks fold into the following chunk.
    attach_documentation: bool,
    /// Whether normalised chunks carry a copy of their source text.
    include_text: bool,
}

impl EngineConfig {
    /// Creates a new engine configuration with explicit values.
    #[must_use]
    pub const fn new(
        max_matches_per_rule: usize,
        max_name_bytes: usize,
        attach_documentation: bool,
        include_text: bool,
    ) -> Self {
        Self {
            max_matches_per_rule,
            max_name_bytes,
            attach_documentation,
            include_text,
        }
    }

    /// Returns the maximum matches per rule.
    #[must_use]
    pub const fn max_matches_per_rule(&self) -> usize {
        self.max_matches_per_rule
    }

    /// Returns the maximum name length in bytes.
    #[must_use]
    pub const fn max_name_bytes(&self) -> usize {
        self.max_name_bytes
    }

    /// Returns whether documentation attachment is enabled.
    #[must_use]
    pub const fn attach_documentation(&self) -> bool {
        self.attach_documentation
    }

    /// Returns whether chunk text is included in the output.
    #[must_use]
    pub const fn include_text(&self) -> bool {
        self.include_text
    }

    /// Sets the maximum matches per rule.
    #[must_use]
    pub const fn with_max_matches_per_rule(mut self, limit: usize) -> Self {
        self.max_matches_per_rule = limit;
        self
    }

    /// Sets the maximum name length in bytes.
    #[must_use]
    pub const fn with_max_name_bytes(mut self, limit: usize) -> Self {
        self.max_name_bytes = limit;
        self
    }

    /// Enables or disables documentation attachment.
    #[must_use]
    pub const fn with_attach_documentation(mut self, enabled: bool) -> Self {
        self.attach_documentation = enabled;
        self
    }

    /// Enables or disables chunk text in the output.
    #[must_use]
    pub const fn with_include_text(mut self, enabled: bool) -> Self {
        self.include_text = enabled;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_matches_per_rule: 10_000,
            max_name_bytes: 256,
            attach_documentation: true,
            include_text: false,
        }
    }
}
