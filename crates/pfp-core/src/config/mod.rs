use crate::error::{PfpError, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PfpConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub map: MapConfig,
    #[serde(default)]
    pub web: WebConfig,
    #[serde(default)]
    pub sources: SourcesConfig,
}

/// Where the person search lives and how it is paged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_search_url")]
    pub search_url: String,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            search_url: default_search_url(),
            page: default_page(),
            page_size: default_page_size(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

/// Embedded map preview settings for event locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapConfig {
    #[serde(default = "default_map_base_url")]
    pub base_url: String,
    #[serde(default = "default_map_locale")]
    pub locale: String,
    #[serde(default = "default_map_zoom")]
    pub zoom: u8,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            base_url: default_map_base_url(),
            locale: default_map_locale(),
            zoom: default_map_zoom(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_web_port")]
    pub port: u16,
    #[serde(default = "default_web_host")]
    pub host: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            port: default_web_port(),
            host: default_web_host(),
        }
    }
}

/// Additional source registries, appended after the built-in table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourcesConfig {
    #[serde(default)]
    pub extra: Vec<SourceEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceEntry {
    pub prefix: String,
    pub label: String,
}

/// Highest zoom level the map service accepts.
pub const MAX_MAP_ZOOM: u8 = 21;

// -- Defaults --

fn default_search_url() -> String {
    "https://pfp-api.acdh-ch-dev.oeaw.ac.at/persons".to_string()
}
fn default_page() -> u32 {
    1
}
fn default_page_size() -> u32 {
    100
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_connect_timeout_secs() -> u64 {
    5
}
fn default_map_base_url() -> String {
    "https://maps.google.com/maps".to_string()
}
fn default_map_locale() -> String {
    "en".to_string()
}
fn default_map_zoom() -> u8 {
    12
}
fn default_web_port() -> u16 {
    37838
}
fn default_web_host() -> String {
    "127.0.0.1".to_string()
}

impl PfpConfig {
    /// Load configuration with a layered merge:
    /// 1. ~/.config/pfp/config.toml (global)
    /// 2. .pfp/config.toml (project)
    /// 3. .pfp/config.local.toml (local, gitignored)
    /// 4. `PFP_<SECTION>__<KEY>` environment variables
    pub fn load(project_dir: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        // Layer 1: Global config
        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                builder = builder.add_source(File::from(global_path).required(false));
            }
        }

        // Layer 2: Project config
        if let Some(dir) = project_dir {
            let project_config = dir.join(".pfp").join("config.toml");
            if project_config.exists() {
                builder = builder.add_source(File::from(project_config).required(false));
            }

            // Layer 3: Local config (gitignored)
            let local_config = dir.join(".pfp").join("config.local.toml");
            if local_config.exists() {
                builder = builder.add_source(File::from(local_config).required(false));
            }
        }

        // Layer 4: Environment
        builder = builder.add_source(
            Environment::with_prefix("PFP")
                .prefix_separator("_")
                .separator("__"),
        );

        let config = builder
            .build()
            .map_err(|e| PfpError::Config(e.to_string()))?;

        let mut cfg: Self = config
            .try_deserialize()
            .map_err(|e| PfpError::Config(e.to_string()))?;

        for warning in cfg.validate() {
            tracing::warn!("config: {warning}");
        }
        Ok(cfg)
    }

    /// Load with defaults only (no files).
    pub fn default_config() -> Self {
        Self {
            api: ApiConfig::default(),
            map: MapConfig::default(),
            web: WebConfig::default(),
            sources: SourcesConfig::default(),
        }
    }

    /// The effective configuration as TOML, in the layout the config files use.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| PfpError::Config(format!("failed to serialize config: {e}")))
    }

    /// Validate config values, fixing out-of-range values and returning warnings.
    pub fn validate(&mut self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.api.search_url.trim().is_empty() {
            warnings.push("api.search_url is empty, using default".to_string());
            self.api.search_url = default_search_url();
        }

        let int_checks: Vec<(&str, &mut u32)> = vec![
            ("api.page", &mut self.api.page),
            ("api.page_size", &mut self.api.page_size),
        ];
        for (name, val) in int_checks {
            if *val == 0 {
                warnings.push(format!("{name} = 0 is invalid, using 1"));
                *val = 1;
            }
        }

        let timeout_checks: Vec<(&str, &mut u64)> = vec![
            ("api.timeout_secs", &mut self.api.timeout_secs),
            (
                "api.connect_timeout_secs",
                &mut self.api.connect_timeout_secs,
            ),
        ];
        for (name, val) in timeout_checks {
            if *val == 0 {
                warnings.push(format!("{name} = 0 is invalid, using 1"));
                *val = 1;
            }
        }

        if self.map.zoom > MAX_MAP_ZOOM {
            warnings.push(format!(
                "map.zoom = {} out of range [0, {MAX_MAP_ZOOM}], clamping",
                self.map.zoom
            ));
            self.map.zoom = MAX_MAP_ZOOM;
        }

        let before = self.sources.extra.len();
        self.sources.extra.retain(|e| !e.prefix.trim().is_empty());
        let dropped = before - self.sources.extra.len();
        if dropped > 0 {
            warnings.push(format!(
                "dropped {dropped} sources.extra entr{} with an empty prefix",
                if dropped == 1 { "y" } else { "ies" }
            ));
        }

        warnings
    }
}

fn global_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("pfp").join("config.toml"))
}
