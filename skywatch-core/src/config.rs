//! Configuration file management for skywatch.
//!
//! Reads/writes `~/.skywatch/config.yaml` with the radio front-end
//! settings and the tracker table capacity. The settings are consumed at
//! startup and passed through to the radio collaborator; they are not part
//! of the decoding core's state.

use std::path::PathBuf;

use crate::table::DEFAULT_CAPACITY;
use crate::types::SkywatchError;

/// Full configuration structure.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub radio: RadioConfig,
    pub tracker: TrackerConfig,
}

/// Radio front-end settings, applied through `RadioControl` at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct RadioConfig {
    pub frequency_hz: u64,
    pub rf_amp: bool,
    pub lna_db: u8,
    pub vga_db: u8,
    pub sample_rate: u32,
    pub baseband_bandwidth: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrackerConfig {
    pub table_capacity: usize,
}

impl Default for RadioConfig {
    fn default() -> Self {
        // 1090 MHz Mode S receive chain defaults
        RadioConfig {
            frequency_hz: 1_090_000_000,
            rf_amp: true,
            lna_db: 40,
            vga_db: 40,
            sample_rate: 2_000_000,
            baseband_bandwidth: 2_500_000,
        }
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        TrackerConfig {
            table_capacity: DEFAULT_CAPACITY,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            radio: RadioConfig::default(),
            tracker: TrackerConfig::default(),
        }
    }
}

/// Get the config directory path (`~/.skywatch/`).
pub fn config_dir() -> PathBuf {
    dirs_home().join(".skywatch")
}

/// Get the config file path.
pub fn config_file() -> PathBuf {
    config_dir().join("config.yaml")
}

fn dirs_home() -> PathBuf {
    std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
}

/// Load config from `~/.skywatch/config.yaml`.
///
/// Returns default config if the file doesn't exist or doesn't parse.
pub fn load_config() -> Config {
    let path = config_file();
    if !path.exists() {
        return Config::default();
    }

    match std::fs::read_to_string(&path) {
        Ok(text) => parse_config(&text),
        Err(_) => Config::default(),
    }
}

/// Save config to `~/.skywatch/config.yaml`.
pub fn save_config(config: &Config) -> Result<PathBuf, SkywatchError> {
    let dir = config_dir();
    std::fs::create_dir_all(&dir).map_err(|e| SkywatchError::Config(e.to_string()))?;

    let path = config_file();
    std::fs::write(&path, serialize_config(config))
        .map_err(|e| SkywatchError::Config(e.to_string()))?;

    Ok(path)
}

/// Parse simple YAML-like config text. Unknown keys are ignored; missing
/// keys keep their defaults.
fn parse_config(text: &str) -> Config {
    let mut config = Config::default();
    let mut current_section: Option<String> = None;

    for line in text.lines() {
        let stripped = line.trim();
        if stripped.is_empty() || stripped.starts_with('#') {
            continue;
        }

        let is_indented = line.starts_with("  ") || line.starts_with('\t');

        if let Some((key, val)) = stripped.split_once(':') {
            let key = key.trim();
            let val = val.trim();

            if !is_indented {
                current_section = if val.is_empty() {
                    Some(key.to_string())
                } else {
                    None
                };
            } else if let Some(ref section) = current_section {
                match section.as_str() {
                    "radio" => match key {
                        "frequency_hz" => {
                            if let Ok(v) = val.parse() {
                                config.radio.frequency_hz = v;
                            }
                        }
                        "rf_amp" => {
                            if let Ok(v) = val.parse() {
                                config.radio.rf_amp = v;
                            }
                        }
                        "lna_db" => {
                            if let Ok(v) = val.parse() {
                                config.radio.lna_db = v;
                            }
                        }
                        "vga_db" => {
                            if let Ok(v) = val.parse() {
                                config.radio.vga_db = v;
                            }
                        }
                        "sample_rate" => {
                            if let Ok(v) = val.parse() {
                                config.radio.sample_rate = v;
                            }
                        }
                        "baseband_bandwidth" => {
                            if let Ok(v) = val.parse() {
                                config.radio.baseband_bandwidth = v;
                            }
                        }
                        _ => {}
                    },
                    "tracker" => {
                        if key == "table_capacity" {
                            if let Ok(v) = val.parse() {
                                config.tracker.table_capacity = v;
                            }
                        }
                    }
                    _ => {}
                }
            }
        }
    }

    config
}

/// Serialize config to YAML-like text.
fn serialize_config(config: &Config) -> String {
    let mut lines = vec!["# skywatch configuration".to_string(), String::new()];

    lines.push("radio:".into());
    lines.push(format!("  frequency_hz: {}", config.radio.frequency_hz));
    lines.push(format!("  rf_amp: {}", config.radio.rf_amp));
    lines.push(format!("  lna_db: {}", config.radio.lna_db));
    lines.push(format!("  vga_db: {}", config.radio.vga_db));
    lines.push(format!("  sample_rate: {}", config.radio.sample_rate));
    lines.push(format!(
        "  baseband_bandwidth: {}",
        config.radio.baseband_bandwidth
    ));
    lines.push(String::new());

    lines.push("tracker:".into());
    lines.push(format!("  table_capacity: {}", config.tracker.table_capacity));
    lines.push(String::new());

    lines.join("\n")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.radio.frequency_hz, 1_090_000_000);
        assert!(config.radio.rf_amp);
        assert_eq!(config.radio.lna_db, 40);
        assert_eq!(config.radio.sample_rate, 2_000_000);
        assert_eq!(config.tracker.table_capacity, DEFAULT_CAPACITY);
    }

    #[test]
    fn test_parse_config() {
        let text = r#"
radio:
  frequency_hz: 1090000500
  rf_amp: false
  lna_db: 32
  vga_db: 24
  sample_rate: 2400000
  baseband_bandwidth: 1750000

tracker:
  table_capacity: 64
"#;
        let config = parse_config(text);
        assert_eq!(config.radio.frequency_hz, 1_090_000_500);
        assert!(!config.radio.rf_amp);
        assert_eq!(config.radio.lna_db, 32);
        assert_eq!(config.radio.vga_db, 24);
        assert_eq!(config.radio.sample_rate, 2_400_000);
        assert_eq!(config.radio.baseband_bandwidth, 1_750_000);
        assert_eq!(config.tracker.table_capacity, 64);
    }

    #[test]
    fn test_parse_partial_keeps_defaults() {
        let text = "radio:\n  lna_db: 16\n";
        let config = parse_config(text);
        assert_eq!(config.radio.lna_db, 16);
        assert_eq!(config.radio.frequency_hz, 1_090_000_000);
        assert_eq!(config.tracker.table_capacity, DEFAULT_CAPACITY);
    }

    #[test]
    fn test_parse_garbage_is_default() {
        assert_eq!(parse_config("!!! not yaml at all"), Config::default());
    }

    #[test]
    fn test_roundtrip() {
        let config = Config {
            radio: RadioConfig {
                frequency_hz: 1_090_100_000,
                rf_amp: false,
                lna_db: 8,
                vga_db: 62,
                sample_rate: 2_400_000,
                baseband_bandwidth: 1_750_000,
            },
            tracker: TrackerConfig { table_capacity: 48 },
        };
        assert_eq!(parse_config(&serialize_config(&config)), config);
    }
}
