//! Configuration system for footquill.
//!
//! This module provides the configuration structure for footquill with sensible defaults
//! and support for serialization/deserialization via serde. Configuration is loaded
//! from a TOML file and passed by reference to the formatter, the synchronizer and
//! the validation pass.
//!
//! # Example
//!
//! ```
//! use footquill::config::{Config, DisplayStyle, LabelPriority};
//!
//! // Use default configuration
//! let config = Config::default();
//! assert_eq!(config.display_style, DisplayStyle::Brackets);
//! assert_eq!(config.label_priority, LabelPriority::Auto);
//!
//! // Create custom configuration
//! let custom = Config {
//!     display_style: DisplayStyle::Emoji,
//!     custom_emoji: "🔙".to_string(),
//!     ..Config::default()
//! };
//! assert_eq!(custom.debounce_delay, 300);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when reading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("I/O error reading {path}: {error}")]
    Io {
        /// Path to the file that failed to read.
        path: PathBuf,
        /// The underlying I/O error.
        error: std::io::Error,
    },

    /// The file is not valid TOML or holds a value of the wrong type.
    #[error("invalid config {path}: {error}")]
    Parse {
        /// Path to the offending file.
        path: PathBuf,
        /// The underlying TOML error.
        error: toml::de::Error,
    },
}

/// How the label of a footnote is turned into backreference text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelPriority {
    /// Always show the cleaned label.
    Label,
    /// Show the bare label when it contains a digit, the cleaned label otherwise.
    Number,
    /// Bracket labels containing a digit, clean the rest.
    #[default]
    Auto,
}

/// Decoration applied to the backreference text after the label is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayStyle {
    /// `[text]`, unless the text is already bracketed.
    #[default]
    Brackets,
    /// `<emoji> text`.
    Emoji,
    /// `<sup>text</sup>` markup.
    Superscript,
    /// Text unchanged.
    Plain,
}

impl fmt::Display for DisplayStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayStyle::Brackets => write!(f, "brackets"),
            DisplayStyle::Emoji => write!(f, "emoji"),
            DisplayStyle::Superscript => write!(f, "superscript"),
            DisplayStyle::Plain => write!(f, "plain"),
        }
    }
}

/// Configuration for the footquill engine.
///
/// All fields have sensible defaults via `Config::default()`, and every field
/// may be omitted from the TOML file.
///
/// # Fields
///
/// * `enable_custom_labels` - Rewrite backreferences at all (default: true)
/// * `display_style` - Decoration of the backreference text (default: brackets)
/// * `show_both_label_and_number` - Always show `[label]` (default: false)
/// * `label_priority` - Label vs. number policy (default: auto)
/// * `custom_emoji` - Glyph used by the emoji style (default: "↩️")
/// * `debounce_delay` - Milliseconds to coalesce change events (default: 300)
/// * `enable_hover_effects` - Ask the host for hover styling (default: true)
/// * `show_tooltips` - Attach a "Back to footnote" tooltip (default: false)
/// * `enable_performance_mode` - Cap the index and batch element updates (default: false)
/// * `max_footnotes_per_document` - Index cap in performance mode (default: 1000)
/// * `batch_threshold` - Element count above which updates are batched (default: 100)
/// * `batch_size` - Elements per batch (default: 50)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Rewrite backreference elements
    #[serde(default = "default_true")]
    pub enable_custom_labels: bool,

    /// Decoration of the backreference text
    #[serde(default)]
    pub display_style: DisplayStyle,

    /// Always wrap the raw label in brackets
    #[serde(default)]
    pub show_both_label_and_number: bool,

    /// Label vs. number policy when `show_both_label_and_number` is off
    #[serde(default)]
    pub label_priority: LabelPriority,

    /// Glyph used by the emoji display style
    #[serde(default = "default_custom_emoji")]
    pub custom_emoji: String,

    /// Debounce window for change events, in milliseconds
    #[serde(default = "default_debounce_delay")]
    pub debounce_delay: u64,

    /// Ask the host to underline the backreference on hover
    #[serde(default = "default_true")]
    pub enable_hover_effects: bool,

    /// Attach a "Back to footnote" tooltip to rewritten backreferences
    #[serde(default)]
    pub show_tooltips: bool,

    /// Cap the index and process large element sets in batches
    #[serde(default)]
    pub enable_performance_mode: bool,

    /// Maximum number of index entries used in performance mode
    #[serde(default = "default_max_footnotes")]
    pub max_footnotes_per_document: usize,

    /// Number of elements above which updates are batched in performance mode
    #[serde(default = "default_batch_threshold")]
    pub batch_threshold: usize,

    /// Elements per batch
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Offer label suggestions from content analysis
    #[serde(default = "default_true")]
    pub enable_smart_suggestions: bool,

    /// Report labels with characters outside `[A-Za-z0-9_-]`
    #[serde(default = "default_true")]
    pub enable_label_validation: bool,

    /// Report labels defined more than once
    #[serde(default = "default_true")]
    pub enable_duplicate_detection: bool,

    /// Report references without definitions and unused definitions
    #[serde(default = "default_true")]
    pub enable_orphan_detection: bool,
}

fn default_true() -> bool {
    true
}

/// Returns the default emoji glyph.
fn default_custom_emoji() -> String {
    "↩️".to_string()
}

/// Returns the default debounce window (milliseconds).
fn default_debounce_delay() -> u64 {
    300
}

fn default_max_footnotes() -> usize {
    1000
}

fn default_batch_threshold() -> usize {
    100
}

fn default_batch_size() -> usize {
    50
}

impl Default for Config {
    /// Creates a new configuration with default values.
    ///
    /// # Example
    ///
    /// ```
    /// use footquill::config::Config;
    ///
    /// let config = Config::default();
    /// assert!(config.enable_custom_labels);
    /// assert_eq!(config.custom_emoji, "↩️");
    /// assert!(!config.enable_performance_mode);
    /// ```
    fn default() -> Self {
        Self {
            enable_custom_labels: true,
            display_style: DisplayStyle::default(),
            show_both_label_and_number: false,
            label_priority: LabelPriority::default(),
            custom_emoji: default_custom_emoji(),
            debounce_delay: default_debounce_delay(),
            enable_hover_effects: true,
            show_tooltips: false,
            enable_performance_mode: false,
            max_footnotes_per_document: default_max_footnotes(),
            batch_threshold: default_batch_threshold(),
            batch_size: default_batch_size(),
            enable_smart_suggestions: true,
            enable_label_validation: true,
            enable_duplicate_detection: true,
            enable_orphan_detection: true,
        }
    }
}

impl Config {
    /// Returns the path to the config file.
    ///
    /// Uses `~/.config/footquill/config.toml` on all platforms.
    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|mut path| {
            path.push(".config");
            path.push("footquill");
            path.push("config.toml");
            path
        })
    }

    /// The debounce window as a `Duration`.
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_delay)
    }

    /// Loads configuration from the default config file.
    ///
    /// Returns the default configuration if the file doesn't exist or can't be read.
    pub fn load() -> Self {
        let config_path = match Self::config_path() {
            Some(path) => path,
            None => return Self::default(),
        };

        if !config_path.exists() {
            return Self::default();
        }

        Self::load_from(&config_path).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "falling back to default configuration");
            Self::default()
        })
    }

    /// Loads configuration from a specific file.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
            path: path.to_path_buf(),
            error,
        })?;
        toml::from_str(&contents).map_err(|error| ConfigError::Parse {
            path: path.to_path_buf(),
            error,
        })
    }

    /// Saves configuration to the default config file.
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        self.save_to(config_path)
    }

    /// Saves configuration to a specific file.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let toml_string = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_string)?;

        Ok(())
    }

    /// Whether a pass over `element_count` elements should be split into batches.
    pub fn should_batch(&self, element_count: usize) -> bool {
        self.enable_performance_mode && element_count > self.batch_threshold
    }

    /// The number of index entries a synchronization pass may use.
    pub fn index_limit(&self) -> Option<usize> {
        self.enable_performance_mode
            .then_some(self.max_footnotes_per_document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batching_requires_performance_mode() {
        let config = Config::default();
        assert!(!config.should_batch(10_000));

        let config = Config {
            enable_performance_mode: true,
            ..Default::default()
        };
        assert!(!config.should_batch(100));
        assert!(config.should_batch(101));
    }

    #[test]
    fn test_index_limit() {
        assert_eq!(Config::default().index_limit(), None);
        let config = Config {
            enable_performance_mode: true,
            max_footnotes_per_document: 200,
            ..Default::default()
        };
        assert_eq!(config.index_limit(), Some(200));
    }
}
