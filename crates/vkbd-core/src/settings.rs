// Vkbd Settings Module
// User-configurable knobs for the virtual hardware and the scenario runner

use std::path::{Path, PathBuf};

use crate::clock::DEFAULT_MILLIS_PER_CYCLE;

/// Settings for a virtual keyboard run
///
/// These settings are loaded from a TOML file (default:
/// ~/.config/vkbd/settings.toml):
///
/// ```toml
/// [clock]
/// millis_per_cycle = 5
///
/// [matrix]
/// read_matrix_enabled = true
/// keyscan_interval = 1
///
/// [output]
/// echo_transcript = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Virtual milliseconds per scan cycle
    millis_per_cycle: u64,

    /// Whether scans pull frames from the input source
    read_matrix_enabled: bool,

    keyscan_interval: u8,

    /// Print the event transcript after a scenario run
    echo_transcript: bool,

    /// Path to the settings file (for reload)
    source_path: Option<PathBuf>,
}

/// Errors that can occur when loading settings
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(String),

    #[error("Invalid setting value: {0}")]
    InvalidValue(String),
}

/// TOML representation for deserializing settings
#[derive(Debug, Clone, serde::Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct SettingsToml {
    #[serde(default)]
    clock: Option<ClockSettings>,

    #[serde(default)]
    matrix: Option<MatrixSettings>,

    #[serde(default)]
    output: Option<OutputSettings>,
}

#[derive(Debug, Clone, serde::Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct ClockSettings {
    #[serde(default)]
    millis_per_cycle: Option<u64>,
}

#[derive(Debug, Clone, serde::Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct MatrixSettings {
    #[serde(default)]
    read_matrix_enabled: Option<bool>,

    #[serde(default)]
    keyscan_interval: Option<u8>,
}

#[derive(Debug, Clone, serde::Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct OutputSettings {
    #[serde(default)]
    echo_transcript: Option<bool>,
}

impl Default for Settings {
    fn default() -> Self {
        Self::new()
    }
}

impl Settings {
    pub fn new() -> Self {
        Self {
            millis_per_cycle: DEFAULT_MILLIS_PER_CYCLE,
            read_matrix_enabled: true,
            keyscan_interval: 1,
            echo_transcript: true,
            source_path: None,
        }
    }

    /// Load settings from a TOML file
    #[cfg(feature = "config")]
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(&path)?;
        let mut settings = Self::from_toml(&content)?;
        settings.source_path = Some(path.as_ref().to_path_buf());
        Ok(settings)
    }

    /// Load settings from a TOML string
    #[cfg(feature = "config")]
    pub fn from_toml(content: &str) -> Result<Self, SettingsError> {
        let parsed: SettingsToml =
            toml::from_str(content).map_err(|e| SettingsError::TomlParse(e.to_string()))?;
        Self::from_parsed(parsed)
    }

    fn from_parsed(parsed: SettingsToml) -> Result<Self, SettingsError> {
        let mut settings = Self::new();

        if let Some(clock) = parsed.clock {
            if let Some(millis) = clock.millis_per_cycle {
                settings.set_millis_per_cycle(millis)?;
            }
        }

        if let Some(matrix) = parsed.matrix {
            if let Some(enabled) = matrix.read_matrix_enabled {
                settings.read_matrix_enabled = enabled;
            }
            if let Some(interval) = matrix.keyscan_interval {
                settings.set_keyscan_interval(interval)?;
            }
        }

        if let Some(output) = parsed.output {
            if let Some(echo) = output.echo_transcript {
                settings.echo_transcript = echo;
            }
        }

        Ok(settings)
    }

    /// Get the default settings path
    #[cfg(feature = "config")]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("vkbd").join("settings.toml"))
    }

    /// Load from default location (~/.config/vkbd/settings.toml)
    #[cfg(feature = "config")]
    pub fn load_default() -> Result<Self, SettingsError> {
        if let Some(path) = Self::default_path() {
            if path.exists() {
                return Self::from_file(path);
            }
        }
        log::debug!("no settings file found, using defaults");
        Ok(Self::new())
    }

    /// Reload settings from the file they were loaded from
    #[cfg(feature = "config")]
    pub fn reload(&mut self) -> Result<(), SettingsError> {
        if let Some(path) = self.source_path.clone() {
            *self = Self::from_file(path)?;
        }
        Ok(())
    }

    pub fn millis_per_cycle(&self) -> u64 {
        self.millis_per_cycle
    }

    pub fn set_millis_per_cycle(&mut self, millis: u64) -> Result<(), SettingsError> {
        if millis == 0 {
            return Err(SettingsError::InvalidValue(
                "millis_per_cycle must be at least 1".to_string(),
            ));
        }
        self.millis_per_cycle = millis;
        Ok(())
    }

    pub fn read_matrix_enabled(&self) -> bool {
        self.read_matrix_enabled
    }

    pub fn set_read_matrix_enabled(&mut self, enabled: bool) {
        self.read_matrix_enabled = enabled;
    }

    pub fn keyscan_interval(&self) -> u8 {
        self.keyscan_interval
    }

    pub fn set_keyscan_interval(&mut self, interval: u8) -> Result<(), SettingsError> {
        if interval == 0 {
            return Err(SettingsError::InvalidValue(
                "keyscan_interval must be at least 1".to_string(),
            ));
        }
        self.keyscan_interval = interval;
        Ok(())
    }

    pub fn echo_transcript(&self) -> bool {
        self.echo_transcript
    }

    pub fn set_echo_transcript(&mut self, echo: bool) {
        self.echo_transcript = echo;
    }

    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }
}

#[cfg(all(test, feature = "config"))]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let settings = Settings::new();
        assert_eq!(settings.millis_per_cycle(), 5);
        assert!(settings.read_matrix_enabled());
        assert_eq!(settings.keyscan_interval(), 1);
        assert!(settings.echo_transcript());
        assert!(settings.source_path().is_none());
    }

    #[test]
    fn test_parse_all_sections() {
        let toml = r#"
[clock]
millis_per_cycle = 10

[matrix]
read_matrix_enabled = false
keyscan_interval = 3

[output]
echo_transcript = false
"#;
        let settings = Settings::from_toml(toml).unwrap();
        assert_eq!(settings.millis_per_cycle(), 10);
        assert!(!settings.read_matrix_enabled());
        assert_eq!(settings.keyscan_interval(), 3);
        assert!(!settings.echo_transcript());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let settings = Settings::from_toml("[output]\necho_transcript = false\n").unwrap();
        assert_eq!(settings.millis_per_cycle(), DEFAULT_MILLIS_PER_CYCLE);
        assert!(!settings.echo_transcript());
        assert_eq!(Settings::from_toml("").unwrap(), Settings::new());
    }

    #[test]
    fn test_rejects_zero_cycle_length() {
        let result = Settings::from_toml("[clock]\nmillis_per_cycle = 0\n");
        assert!(matches!(result, Err(SettingsError::InvalidValue(_))));
    }

    #[test]
    fn test_rejects_unknown_keys() {
        let result = Settings::from_toml("[clock]\nmillis = 3\n");
        assert!(matches!(result, Err(SettingsError::TomlParse(_))));
    }

    #[test]
    fn test_from_file_records_path() {
        let path = std::env::temp_dir().join(format!("vkbd-settings-{}.toml", std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[matrix]\nkeyscan_interval = 2").unwrap();
        drop(file);

        let mut settings = Settings::from_file(&path).unwrap();
        assert_eq!(settings.keyscan_interval(), 2);
        assert_eq!(settings.source_path(), Some(path.as_path()));

        std::fs::write(&path, "[matrix]\nkeyscan_interval = 4\n").unwrap();
        settings.reload().unwrap();
        assert_eq!(settings.keyscan_interval(), 4);

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = Settings::from_file("/nonexistent/vkbd/settings.toml");
        assert!(matches!(result, Err(SettingsError::Io(_))));
    }
}
