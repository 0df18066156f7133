use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Hard ceiling on player energy.
pub const ENERGY_CAP: u32 = 100;

#[derive(Debug, Clone, Deserialize)]
pub struct SimulationConfig {
    #[serde(default = "default_max_energy")]
    pub max_energy: u32,
    #[serde(default = "default_step_energy_cost")]
    pub step_energy_cost: u32,
    #[serde(default)]
    pub starting_money: u32,
    #[serde(default = "default_starting_inventory")]
    pub starting_inventory: BTreeMap<String, u32>,
    #[serde(default)]
    pub catalog_file: Option<String>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

fn default_max_energy() -> u32 {
    ENERGY_CAP
}
fn default_step_energy_cost() -> u32 {
    1
}
fn default_starting_inventory() -> BTreeMap<String, u32> {
    [("Potato Seed", 5), ("Kale Seed", 5), ("Berry Seed", 5)]
        .into_iter()
        .map(|(name, count)| (name.to_string(), count))
        .collect()
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "text".to_string()
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            max_energy: default_max_energy(),
            step_energy_cost: default_step_energy_cost(),
            starting_money: 0,
            starting_inventory: default_starting_inventory(),
            catalog_file: None,
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

impl SimulationConfig {
    pub fn from_file(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Cannot read {}: {}", path.display(), e))?;
        Self::from_toml_str(&content, path)
    }

    pub fn from_toml_str(content: &str, source_path: &Path) -> Result<Self, String> {
        let config: SimulationConfig =
            toml::from_str(content).map_err(|e| format!("{}: {}", source_path.display(), e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        let mut errors = Vec::new();

        if !(1..=ENERGY_CAP).contains(&self.max_energy) {
            errors.push(format!(
                "max_energy must be 1-{}, got {}. Example: max_energy = 100",
                ENERGY_CAP, self.max_energy
            ));
        }

        if self.step_energy_cost == 0 || self.step_energy_cost > self.max_energy {
            errors.push(format!(
                "step_energy_cost must be 1-max_energy, got {}. Example: step_energy_cost = 1",
                self.step_energy_cost
            ));
        }

        let valid_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            errors.push(format!(
                "log_level must be one of {:?}, got '{}'. Example: log_level = \"info\"",
                valid_levels, self.log_level
            ));
        }

        let valid_formats = ["text", "json"];
        if !valid_formats.contains(&self.log_format.as_str()) {
            errors.push(format!(
                "log_format must be one of {:?}, got '{}'. Example: log_format = \"text\"",
                valid_formats, self.log_format
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors.join("\n"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::NamedTempFile;

    fn test_path() -> PathBuf {
        PathBuf::from("test-config.toml")
    }

    #[test]
    fn valid_config_loads_all_fields() {
        let toml = r#"
            max_energy = 80
            step_energy_cost = 2
            starting_money = 25
            catalog_file = "./catalog.toml"
            log_level = "debug"
            log_format = "json"

            [starting_inventory]
            "Kale Seed" = 3
        "#;
        let config = SimulationConfig::from_toml_str(toml, &test_path()).unwrap();
        assert_eq!(config.max_energy, 80);
        assert_eq!(config.step_energy_cost, 2);
        assert_eq!(config.starting_money, 25);
        assert_eq!(config.catalog_file.as_deref(), Some("./catalog.toml"));
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.log_format, "json");
        assert_eq!(config.starting_inventory.len(), 1);
        assert_eq!(config.starting_inventory["Kale Seed"], 3);
    }

    #[test]
    fn defaults_applied_for_empty_config() {
        let config = SimulationConfig::from_toml_str("", &test_path()).unwrap();
        assert_eq!(config.max_energy, 100);
        assert_eq!(config.step_energy_cost, 1);
        assert_eq!(config.starting_money, 0);
        assert_eq!(config.starting_inventory["Potato Seed"], 5);
        assert!(config.catalog_file.is_none());
        assert_eq!(config.log_level, "info");
        assert_eq!(config.log_format, "text");
    }

    #[test]
    fn max_energy_above_cap_rejected() {
        let err = SimulationConfig::from_toml_str("max_energy = 150", &test_path()).unwrap_err();
        assert!(err.contains("max_energy"));
        assert!(err.contains("1-100"));
    }

    #[test]
    fn zero_step_cost_rejected() {
        let err =
            SimulationConfig::from_toml_str("step_energy_cost = 0", &test_path()).unwrap_err();
        assert!(err.contains("step_energy_cost"));
    }

    #[test]
    fn invalid_log_settings_rejected() {
        let toml = "log_level = \"verbose\"\nlog_format = \"xml\"";
        let err = SimulationConfig::from_toml_str(toml, &test_path()).unwrap_err();
        assert!(err.contains("log_level"));
        assert!(err.contains("log_format"));
    }

    #[test]
    fn malformed_toml_includes_source_path() {
        let err =
            SimulationConfig::from_toml_str("max_energy = [invalid", &test_path()).unwrap_err();
        assert!(err.contains("test-config.toml"));
    }

    #[test]
    fn from_file_loads_valid_config() {
        let mut tmp = NamedTempFile::new().unwrap();
        use std::io::Write;
        writeln!(tmp, "starting_money = 40").unwrap();
        let config = SimulationConfig::from_file(tmp.path()).unwrap();
        assert_eq!(config.starting_money, 40);
    }

    #[test]
    fn from_file_missing_file_error() {
        let err = SimulationConfig::from_file(Path::new("/nonexistent/farm.toml")).unwrap_err();
        assert!(err.contains("Cannot read"));
    }
}
