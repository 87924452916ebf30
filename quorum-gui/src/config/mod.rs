use std::{fs, sync::Arc};

use parking_lot::RwLock;
use quorum_lib::fs::config_dir;
use serde::{Deserialize, Serialize};

use crate::config::theme::Theme;

mod theme;

const FILE_NAME: &str = "gui.toml";

/// Handle to the GUI configuration
pub type Cfg = Arc<RwLock<GuiConfig>>;

/// The GUI configuration, serialized to TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GuiConfig {
    pub theme: Theme,
    /// Base URL of the platform API, also used to resolve avatar paths.
    pub api_domain: String,
}

impl Default for GuiConfig {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            api_domain: "http://localhost:8000".into(),
        }
    }
}

impl GuiConfig {
    pub fn load() -> Self {
        let path = config_dir().join(FILE_NAME);

        if path.exists() {
            let contents = fs::read_to_string(path).unwrap();
            toml::from_str(&contents).unwrap_or_default()
        } else {
            let cfg = Self::default();
            cfg.save();
            cfg
        }
    }

    pub fn save(&self) {
        let contents = toml::to_string_pretty(self).unwrap();

        // Make sure config_dir exists
        fs::create_dir_all(config_dir()).unwrap();

        fs::write(config_dir().join(FILE_NAME), contents).unwrap();
    }

    pub fn theme(&self) -> iced::Theme {
        (&self.theme).into()
    }
}
