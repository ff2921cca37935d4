use crate::builder::BuildOptions;
use crate::core::errors::{self, TableError};
use crate::emit::OutputFormat;
use crate::encoders::trie::{DEFAULT_SHIFT1, DEFAULT_SHIFT2, TrieParams};
use crate::oracle::OracleKind;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Trie layout settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrieSettings {
    #[serde(default = "default_shift1")]
    pub shift1: u32,
    #[serde(default = "default_shift2")]
    pub shift2: u32,
    #[serde(default)]
    pub dedupe_leaves: bool,
}

impl Default for TrieSettings {
    fn default() -> Self {
        Self {
            shift1: DEFAULT_SHIFT1,
            shift2: DEFAULT_SHIFT2,
            dedupe_leaves: false,
        }
    }
}

impl TrieSettings {
    /// Validated build options for these settings.
    pub fn build_options(&self) -> Result<BuildOptions, TableError> {
        Ok(BuildOptions {
            params: TrieParams::new(self.shift1, self.shift2)?,
            dedupe_leaves: self.dedupe_leaves,
        })
    }
}

/// Width oracle selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleSettings {
    #[serde(default)]
    pub kind: OracleKind,
    #[serde(default = "default_locale")]
    pub locale: String,
}

impl Default for OracleSettings {
    fn default() -> Self {
        Self {
            kind: OracleKind::default(),
            locale: default_locale(),
        }
    }
}

/// Artifact output settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(default)]
    pub format: OutputFormat,
    /// Destination path (tilde-expanded); stdout when unset
    #[serde(default)]
    pub path: Option<String>,
}

impl OutputSettings {
    /// The destination with `~` expanded, if one is configured.
    pub fn resolved_path(&self) -> Option<PathBuf> {
        self.path
            .as_deref()
            .map(|p| PathBuf::from(shellexpand::tilde(p).as_ref()))
    }
}

/// Effective settings, merged from every configuration layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub trie: TrieSettings,
    #[serde(default)]
    pub oracle: OracleSettings,
    #[serde(default)]
    pub output: OutputSettings,
}

/// One configuration file; every key is optional so a layer only overrides
/// what it names.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SettingsLayer {
    #[serde(default)]
    trie: TrieLayer,
    #[serde(default)]
    oracle: OracleLayer,
    #[serde(default)]
    output: OutputLayer,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct TrieLayer {
    shift1: Option<u32>,
    shift2: Option<u32>,
    dedupe_leaves: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct OracleLayer {
    kind: Option<OracleKind>,
    locale: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct OutputLayer {
    format: Option<OutputFormat>,
    path: Option<String>,
}

fn default_shift1() -> u32 {
    DEFAULT_SHIFT1
}

fn default_shift2() -> u32 {
    DEFAULT_SHIFT2
}

fn default_locale() -> String {
    "C.UTF-8".to_string()
}

impl SettingsLayer {
    /// Parses one configuration layer from TOML content.
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn load_from_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_toml(&content)?)
    }
}

impl Settings {
    /// Loads the built-in defaults bundled with the crate.
    pub fn load_default() -> Result<Self, Box<dyn std::error::Error>> {
        let content = include_str!("../../width-trie.toml");
        let mut settings = Settings::default();
        settings.merge(SettingsLayer::from_toml(content)?);
        Ok(settings)
    }

    /// Loads configuration with user overrides from standard locations.
    ///
    /// Searches in priority order:
    /// 1. Built-in defaults (from library)
    /// 2. `~/.config/width-trie/config.toml` (user overrides)
    /// 3. `./width-trie.toml` (project-local overrides)
    /// 4. `explicit`, when given
    ///
    /// Broken user or local files are reported and skipped; a broken explicit
    /// file is an error.
    pub fn load_with_overrides(explicit: Option<&Path>) -> Result<Self, Box<dyn std::error::Error>> {
        let mut settings = Self::load_default()?;

        if let Some(config_dir) = dirs::config_dir() {
            let user_config_path = config_dir.join("width-trie").join("config.toml");
            settings.merge_optional(&user_config_path, "user");
        }

        settings.merge_optional(Path::new("width-trie.toml"), "local");

        if let Some(path) = explicit {
            let layer = SettingsLayer::load_from_file(path)
                .map_err(|e| format!("Failed to load config from {:?}: {}", path, e))?;
            settings.merge(layer);
        }

        Ok(settings)
    }

    fn merge_optional(&mut self, path: &Path, origin: &str) {
        if !path.exists() {
            return;
        }
        match SettingsLayer::load_from_file(path) {
            Ok(layer) => self.merge(layer),
            Err(e) => errors::warn(&format!(
                "failed to load {} config from {:?}: {}",
                origin, path, e
            )),
        }
    }

    /// Applies every key `layer` sets on top of the current values.
    pub fn merge(&mut self, layer: SettingsLayer) {
        let SettingsLayer {
            trie,
            oracle,
            output,
        } = layer;

        if let Some(shift1) = trie.shift1 {
            self.trie.shift1 = shift1;
        }
        if let Some(shift2) = trie.shift2 {
            self.trie.shift2 = shift2;
        }
        if let Some(dedupe) = trie.dedupe_leaves {
            self.trie.dedupe_leaves = dedupe;
        }
        if let Some(kind) = oracle.kind {
            self.oracle.kind = kind;
        }
        if let Some(locale) = oracle.locale {
            self.oracle.locale = locale;
        }
        if let Some(format) = output.format {
            self.output.format = format;
        }
        if output.path.is_some() {
            self.output.path = output.path;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_default_config() {
        let settings = Settings::load_default().unwrap();
        assert_eq!(settings.trie.shift1, 11);
        assert_eq!(settings.trie.shift2, 5);
        assert!(!settings.trie.dedupe_leaves);
        assert_eq!(settings.oracle.kind, OracleKind::Unicode);
        assert_eq!(settings.oracle.locale, "C.UTF-8");
        assert_eq!(settings.output.format, OutputFormat::Rust);
        assert_eq!(settings.output.path, None);
    }

    #[test]
    fn test_defaults_match_builtin_file() {
        assert_eq!(Settings::load_default().unwrap(), Settings::default());
    }

    #[test]
    fn test_layer_overrides_only_named_keys() {
        let mut settings = Settings::default();
        let layer = SettingsLayer::from_toml(
            r#"
[trie]
dedupe_leaves = true

[output]
format = "binary"
path = "table.bin"
"#,
        )
        .unwrap();
        settings.merge(layer);

        assert!(settings.trie.dedupe_leaves);
        assert_eq!(settings.trie.shift1, 11);
        assert_eq!(settings.output.format, OutputFormat::Binary);
        assert_eq!(settings.output.path.as_deref(), Some("table.bin"));
        assert_eq!(settings.oracle.kind, OracleKind::Unicode);
    }

    #[test]
    fn test_later_layers_win() {
        let mut settings = Settings::default();
        settings.merge(SettingsLayer::from_toml("[oracle]\nkind = \"libc\"\nlocale = \"en_US.UTF-8\"").unwrap());
        settings.merge(SettingsLayer::from_toml("[oracle]\nkind = \"unicode_cjk\"").unwrap());

        assert_eq!(settings.oracle.kind, OracleKind::UnicodeCjk);
        assert_eq!(settings.oracle.locale, "en_US.UTF-8");
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        assert!(SettingsLayer::from_toml("[trie]\nshift3 = 2").is_err());
        assert!(SettingsLayer::from_toml("[oracle]\nkind = \"icu\"").is_err());
    }

    #[test]
    fn test_build_options_validate_shifts() {
        let mut trie = TrieSettings::default();
        assert_eq!(trie.build_options().unwrap().params, TrieParams::default());

        trie.shift2 = 12;
        assert!(matches!(
            trie.build_options(),
            Err(TableError::InvalidParams { .. })
        ));
    }

    #[test]
    fn test_output_path_tilde_expansion() {
        let output = OutputSettings {
            format: OutputFormat::Binary,
            path: Some("~/table.bin".to_string()),
        };
        let resolved = output.resolved_path().unwrap();
        assert!(resolved.ends_with("table.bin"));
        if dirs::home_dir().is_some() {
            assert!(!resolved.starts_with("~"));
        }
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let missing = Path::new("/definitely/not/here/width-trie.toml");
        assert!(Settings::load_with_overrides(Some(missing)).is_err());
    }
}
