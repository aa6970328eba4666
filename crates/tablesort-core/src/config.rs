use crate::columns::MIN_COLUMNS;
use crate::error::TableSortError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Engine configuration. Every field has a default, so `{}` is valid JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SorterConfig {
    /// Tables with fewer header cells are left alone.
    pub min_columns: usize,
    /// Append the control style sheet to `head` on document init.
    pub inject_styles: bool,
    pub controls: ControlConfig,
}

impl Default for SorterConfig {
    fn default() -> Self {
        Self {
            min_columns: MIN_COLUMNS,
            inject_styles: true,
            controls: ControlConfig::default(),
        }
    }
}

/// Look of the sort controls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlConfig {
    pub class_name: String,
    pub active_class: String,
    pub arrow_up: String,
    pub arrow_down: String,
    pub active_color: String,
    pub hover_color: String,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            class_name: "sort-button".into(),
            active_class: "active".into(),
            arrow_up: "\u{25B2}".into(),
            arrow_down: "\u{25BC}".into(),
            active_color: "grey".into(),
            hover_color: "hsl(0deg 0% 50% / 20%)".into(),
        }
    }
}

/// Load a config from a JSON file.
pub fn load_config(path: &Path) -> Result<SorterConfig, TableSortError> {
    let content = std::fs::read_to_string(path).map_err(|e| TableSortError::ConfigLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let config: SorterConfig =
        serde_json::from_str(&content).map_err(|e| TableSortError::ConfigLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
    validate_config(&config)?;
    Ok(config)
}

/// Parse a config from a JSON string (no file path context).
pub fn parse_config_str(json: &str) -> Result<SorterConfig, TableSortError> {
    let config: SorterConfig = serde_json::from_str(json)?;
    validate_config(&config)?;
    Ok(config)
}

pub fn validate_config(config: &SorterConfig) -> Result<(), TableSortError> {
    if config.min_columns < MIN_COLUMNS {
        return Err(TableSortError::ConfigInvalid(format!(
            "min_columns must be at least {MIN_COLUMNS}, got {}",
            config.min_columns
        )));
    }

    let controls = &config.controls;
    for (field, value) in [
        ("class_name", &controls.class_name),
        ("active_class", &controls.active_class),
    ] {
        if value.trim().is_empty() || value.contains(char::is_whitespace) {
            return Err(TableSortError::ConfigInvalid(format!(
                "{field} must be a single non-empty class name, got '{value}'"
            )));
        }
    }

    if controls.arrow_up.is_empty() || controls.arrow_down.is_empty() {
        return Err(TableSortError::ConfigInvalid(
            "arrow_up and arrow_down must not be empty".into(),
        ));
    }

    Ok(())
}
