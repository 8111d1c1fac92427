use crate::data::persistence::Persistable;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AppSettings {
    /// Habits the grid starts with each time the widget opens.
    #[serde(default = "default_seed_habits")]
    pub seed_habits: Vec<String>,
    /// tracing filter used when HABITS_LOG is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_seed_habits() -> Vec<String> {
    ["sleep before 2", "journal", "gym", "write", "draw"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppSettings {
    fn default() -> Self {
        AppSettings {
            seed_habits: default_seed_habits(),
            log_level: default_log_level(),
        }
    }
}

/// Reads the `settings` key from config.yaml so other top-level keys can
/// live alongside it.
#[derive(Serialize, Deserialize, Default, Debug)]
struct SettingsWrapper {
    #[serde(default)]
    settings: AppSettings,
}

impl Persistable for SettingsWrapper {
    fn filename() -> &'static str {
        "config.yaml"
    }
}

impl AppSettings {
    /// Reads config.yaml from `dir`; a missing file yields the defaults.
    pub fn load_from(dir: &Path) -> Result<Self> {
        Ok(SettingsWrapper::load_from(dir)?.settings)
    }

    pub fn save_to(&self, dir: &Path) -> Result<()> {
        let wrapper = SettingsWrapper {
            settings: self.clone(),
        };
        wrapper.save_to(dir)
    }

    /// True when config.yaml is present in `dir`.
    pub fn exists_in(dir: &Path) -> bool {
        dir.join(SettingsWrapper::filename()).exists()
    }
}
