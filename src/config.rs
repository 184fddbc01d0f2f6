//! Configuration for yannsnote.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (YANNSNOTE_HOME, GEMINI_API_KEY / API_KEY)
//! 2. Config file (.yannsnote/config.yaml)
//! 3. Defaults (~/.yannsnote)
//!
//! Config file discovery:
//! - Searches current directory and parents for .yannsnote/config.yaml
//! - `paths.home` is relative to the .yannsnote/ directory

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::db::DEFAULT_LOG_CAPACITY;

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<Result<ResolvedConfig, String>> = OnceLock::new();

const CONFIG_DIR: &str = ".yannsnote";
const CONFIG_FILE: &str = "config.yaml";

pub const ENV_HOME: &str = "YANNSNOTE_HOME";
pub const ENV_API_KEY: &str = "GEMINI_API_KEY";
/// Fallback key name used by the web front end
pub const ENV_API_KEY_FALLBACK: &str = "API_KEY";

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub simulation: Option<SimulationConfig>,
    #[serde(default)]
    pub ai: Option<AiConfig>,
    #[serde(default)]
    pub admin: Option<AdminConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathsConfig {
    /// State directory (relative to .yannsnote/)
    pub home: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SimulationConfig {
    pub latency_ms: Option<u64>,
    pub publish_delay_ms: Option<u64>,
    pub log_capacity: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub chat_model: Option<String>,
    pub thinking_model: Option<String>,
    pub image_model: Option<String>,
    pub thinking_budget: Option<u32>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AdminConfig {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Resolved configuration with absolute paths
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Directory holding local storage
    pub home: PathBuf,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
    pub simulation: SimulationSettings,
    pub ai: AiSettings,
    pub admin: AdminSettings,
}

impl ResolvedConfig {
    /// Path of the file-backed local storage
    pub fn storage_path(&self) -> PathBuf {
        self.home.join(crate::storage::file::STORAGE_FILE_NAME)
    }
}

#[derive(Debug, Clone)]
pub struct SimulationSettings {
    pub latency_ms: u64,
    pub publish_delay_ms: u64,
    pub log_capacity: usize,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            latency_ms: 800,
            publish_delay_ms: 1000,
            log_capacity: DEFAULT_LOG_CAPACITY,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AiSettings {
    pub api_key: Option<String>,
    pub base_url: String,
    pub chat_model: String,
    pub thinking_model: String,
    pub image_model: String,
    pub thinking_budget: u32,
    pub timeout_seconds: u64,
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_API_BASE.to_string(),
            chat_model: "gemini-2.5-flash".to_string(),
            thinking_model: "gemini-2.5-pro".to_string(),
            image_model: "gemini-2.5-flash-image".to_string(),
            thinking_budget: 32768,
            timeout_seconds: 120,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AdminSettings {
    pub username: String,
    pub password: String,
}

impl Default for AdminSettings {
    fn default() -> Self {
        Self {
            username: "admin".to_string(),
            password: "admin".to_string(),
        }
    }
}

/// Find config file by searching current directory and parents
fn find_config_file() -> Option<PathBuf> {
    let mut current = std::env::current_dir().ok()?;

    loop {
        let config_path = current.join(CONFIG_DIR).join(CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Resolve a path that may be relative to `base`
fn resolve_path(base: &Path, path_str: &str) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
            .canonicalize()
            .unwrap_or_else(|_| base.join(path_str))
    }
}

/// Merge the config file (if any) and environment over the defaults
fn resolve<F>(config_file: Option<PathBuf>, env: F) -> Result<ResolvedConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let default_home = || -> Result<PathBuf> {
        Ok(dirs::home_dir()
            .context("Failed to determine home directory")?
            .join(CONFIG_DIR))
    };

    let file = match config_file {
        Some(ref path) => Some(load_config_file(path)?),
        None => None,
    };

    let home = if let Some(env_home) = env(ENV_HOME) {
        PathBuf::from(env_home)
    } else if let (Some(path), Some(home_path)) = (
        config_file.as_ref(),
        file.as_ref().and_then(|f| f.paths.home.as_ref()),
    ) {
        let config_dir = path.parent().unwrap_or(Path::new("."));
        resolve_path(config_dir, home_path)
    } else {
        default_home()?
    };

    let mut simulation = SimulationSettings::default();
    let mut ai = AiSettings::default();
    let mut admin = AdminSettings::default();

    if let Some(file) = file {
        if let Some(sim) = file.simulation {
            simulation.latency_ms = sim.latency_ms.unwrap_or(simulation.latency_ms);
            simulation.publish_delay_ms =
                sim.publish_delay_ms.unwrap_or(simulation.publish_delay_ms);
            if let Some(capacity) = sim.log_capacity {
                simulation.log_capacity = capacity.clamp(1, DEFAULT_LOG_CAPACITY);
                if simulation.log_capacity != capacity {
                    tracing::warn!(
                        requested = capacity,
                        used = simulation.log_capacity,
                        "simulation.log_capacity out of range 1..={}",
                        DEFAULT_LOG_CAPACITY
                    );
                }
            }
        }

        if let Some(cfg) = file.ai {
            ai.api_key = cfg.api_key;
            ai.base_url = cfg.base_url.unwrap_or(ai.base_url);
            ai.chat_model = cfg.chat_model.unwrap_or(ai.chat_model);
            ai.thinking_model = cfg.thinking_model.unwrap_or(ai.thinking_model);
            ai.image_model = cfg.image_model.unwrap_or(ai.image_model);
            ai.thinking_budget = cfg.thinking_budget.unwrap_or(ai.thinking_budget);
            ai.timeout_seconds = cfg.timeout_seconds.unwrap_or(ai.timeout_seconds);
        }

        if let Some(cfg) = file.admin {
            admin.username = cfg.username.unwrap_or(admin.username);
            admin.password = cfg.password.unwrap_or(admin.password);
        }
    }

    // Environment wins over the file for the API key
    if let Some(key) = env(ENV_API_KEY).or_else(|| env(ENV_API_KEY_FALLBACK)) {
        ai.api_key = Some(key);
    }
    ai.api_key = ai.api_key.filter(|k| !k.trim().is_empty());

    Ok(ResolvedConfig {
        home,
        config_file,
        simulation,
        ai,
        admin,
    })
}

/// Load configuration from all sources
fn load_config() -> Result<ResolvedConfig> {
    resolve(find_config_file(), |key| std::env::var(key).ok())
}

/// Get the global configuration (loads once, then cached)
pub fn config() -> Result<&'static ResolvedConfig> {
    let result = CONFIG.get_or_init(|| load_config().map_err(|e| e.to_string()));

    match result {
        Ok(config) => Ok(config),
        Err(e) => anyhow::bail!("{}", e),
    }
}

/// Force reload configuration (useful for testing)
pub fn reload_config() -> Result<ResolvedConfig> {
    load_config()
}
