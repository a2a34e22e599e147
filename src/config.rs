use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use url::Url;

use crate::engine::EngineConfig;
use crate::source::HttpSourceConfig;

#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: Config,
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub endpoint: EndpointConfig,
    #[serde(default)]
    pub engine: EngineSection,
    #[serde(default)]
    pub ui: UiConfig,
}

fn default_endpoint_url() -> String {
    "http://127.0.0.1:8000/api/search/suggestions/".to_string()
}

fn default_query_param() -> String {
    "q".to_string()
}

fn default_timeout_ms() -> u64 {
    5_000
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_placeholder() -> String {
    EngineConfig::default().placeholder
}

#[derive(Debug, Clone, Deserialize)]
pub struct EndpointConfig {
    #[serde(default = "default_endpoint_url")]
    pub url: String,
    #[serde(default = "default_query_param")]
    pub query_param: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            url: default_endpoint_url(),
            query_param: default_query_param(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EngineSection {
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl Default for EngineSection {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_placeholder")]
    pub placeholder: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            placeholder: default_placeholder(),
        }
    }
}

impl Config {
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            debounce: Duration::from_millis(self.engine.debounce_ms),
            placeholder: self.ui.placeholder.clone(),
        }
    }

    pub fn source_config(&self) -> Result<HttpSourceConfig> {
        let endpoint = Url::parse(&self.endpoint.url)
            .with_context(|| format!("invalid endpoint url: {}", self.endpoint.url))?;
        if self.endpoint.query_param.trim().is_empty() {
            bail!("endpoint query_param cannot be empty");
        }
        Ok(HttpSourceConfig {
            endpoint,
            query_param: self.endpoint.query_param.clone(),
            timeout: Duration::from_millis(self.endpoint.timeout_ms),
        })
    }
}

pub fn load(cwd: &Path, explicit_path: Option<&Path>) -> Result<LoadedConfig> {
    if let Some(path) = explicit_path {
        return Ok(LoadedConfig {
            config: load_from_path(path)?,
            path: Some(path.to_path_buf()),
        });
    }

    let local_candidates = [cwd.join("typeahead.toml"), cwd.join(".typeahead.toml")];
    for path in &local_candidates {
        if path.exists() {
            return Ok(LoadedConfig {
                config: load_from_path(path)?,
                path: Some(path.to_path_buf()),
            });
        }
    }

    let global_path = global_config_path()?;
    if global_path.exists() {
        return Ok(LoadedConfig {
            config: load_from_path(&global_path)?,
            path: Some(global_path),
        });
    }

    Ok(LoadedConfig {
        config: Config::default(),
        path: None,
    })
}

pub fn global_config_path() -> Result<PathBuf> {
    let config_root = dirs::config_dir().context("unable to resolve OS config directory")?;
    Ok(config_root.join("typeahead").join("config.toml"))
}

pub fn write_example_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "{} already exists. Use --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    fs::write(path, EXAMPLE_CONFIG)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

fn load_from_path(path: &Path) -> Result<Config> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("invalid TOML in {}", path.display()))
}

const EXAMPLE_CONFIG: &str = r#"# typeahead config

# Suggestions endpoint. Must answer GET <url>?<query_param>=<text> with
# {"suggestions": {"providers": [], "services": [], "categories": [], "locations": []}}
[endpoint]
url = "http://127.0.0.1:8000/api/search/suggestions/"
query_param = "q"
timeout_ms = 5000

# Quiet period after the last keystroke before a request is sent.
[engine]
debounce_ms = 300

[ui]
placeholder = "Search providers, services, categories, or locations"
"#;
