use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Application configuration: process-wide sections plus a per-module
/// configuration bag.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Working directory for logs and other files. Normalized to an absolute
    /// path on load; empty means the platform default.
    #[serde(default)]
    pub home_dir: String,
    /// Logging configuration (optional, uses defaults if None).
    pub logging: Option<LoggingConfig>,
    /// Directory containing per-module YAML files (optional).
    #[serde(default)]
    pub modules_dir: Option<String>,
    /// Per-module configuration bag: module_name → arbitrary JSON/YAML value.
    #[serde(default)]
    pub modules: HashMap<String, serde_json::Value>,
}

/// Logging configuration - maps target prefixes to their logging settings.
/// Key "default" is the catch-all for logs that don't match explicit targets.
pub type LoggingConfig = HashMap<String, Section>;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Section {
    pub console_level: String, // "info", "debug", "error", "off"
    #[serde(default)]
    pub file: String, // "logs/dashboard.log", empty disables file output
    #[serde(default)]
    pub file_level: String,
    #[serde(default)]
    pub max_backups: Option<usize>,
    #[serde(default)]
    pub max_size_mb: Option<u64>,
}

/// Create a default logging configuration.
pub fn default_logging_config() -> LoggingConfig {
    let mut logging = HashMap::new();
    logging.insert(
        "default".to_string(),
        Section {
            console_level: "info".to_string(),
            file: "logs/users-dashboard.log".to_string(),
            file_level: "debug".to_string(),
            max_backups: Some(3),
            max_size_mb: Some(100),
        },
    );
    logging
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            home_dir: String::new(),
            logging: Some(default_logging_config()),
            modules_dir: None,
            modules: HashMap::new(),
        }
    }
}

impl AppConfig {
    /// Load configuration with layered loading: defaults → YAML file → environment variables.
    /// Also normalizes `home_dir` into an absolute path and creates the directory.
    pub fn load_layered<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        use figment::{
            providers::{Env, Format, Serialized, Yaml},
            Figment,
        };

        let config_path = config_path.as_ref();
        anyhow::ensure!(
            config_path.is_file(),
            "Config file not found: {}",
            config_path.display()
        );

        // Optional sections stay None unless YAML/ENV provide them
        let base = AppConfig {
            logging: None,
            ..AppConfig::default()
        };

        let figment = Figment::new()
            .merge(Serialized::defaults(base))
            .merge(Yaml::file(config_path))
            // Example: APP__HOME_DIR=/tmp/dash maps to home_dir
            .merge(Env::prefixed("APP__").split("__"));

        let mut config: AppConfig = figment
            .extract()
            .with_context(|| "Failed to extract config from figment".to_string())?;

        config.normalize_home_dir()?;

        if let Some(dir) = config.modules_dir.clone() {
            merge_module_files(&mut config.modules, dir)?;
        }

        Ok(config)
    }

    /// Load configuration from file or fall back to defaults.
    pub fn load_or_default<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_layered(path),
            None => {
                let mut c = Self::default();
                c.normalize_home_dir()
                    .context("Failed to resolve home_dir (defaults)")?;
                Ok(c)
            }
        }
    }

    /// Serialize configuration to YAML.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize config to YAML")
    }

    /// Typed view of one module's section. Missing section yields the
    /// module's defaults.
    pub fn module_config<T: DeserializeOwned + Default>(&self, module_name: &str) -> Result<T> {
        match self.modules.get(module_name) {
            Some(raw) => serde_json::from_value(raw.clone())
                .with_context(|| format!("Invalid configuration for module '{module_name}'")),
            None => Ok(T::default()),
        }
    }

    /// Set one key inside a module's section, creating the section if needed.
    pub fn set_module_value(&mut self, module_name: &str, key: &str, value: serde_json::Value) {
        let section = self
            .modules
            .entry(module_name.to_string())
            .or_insert_with(|| serde_json::Value::Object(Default::default()));
        if let serde_json::Value::Object(map) = section {
            map.insert(key.to_string(), value);
        }
    }

    /// Apply overrides from command line arguments.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        let logging = self.logging.get_or_insert_with(default_logging_config);
        if let Some(default_section) = logging.get_mut("default") {
            default_section.console_level = match args.verbose {
                0 => default_section.console_level.clone(), // keep
                1 => "debug".to_string(),
                _ => "trace".to_string(),
            };
        }
    }

    fn normalize_home_dir(&mut self) -> Result<()> {
        let opt = if self.home_dir.trim().is_empty() {
            None
        } else {
            Some(self.home_dir.clone())
        };

        let resolved = resolve_home_dir(opt, default_subdir(), true)
            .context("home_dir normalization failed")?;
        self.home_dir = resolved.to_string_lossy().to_string();
        Ok(())
    }
}

/// Command line arguments that affect configuration.
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    pub config: Option<String>,
    pub print_config: bool,
    pub verbose: u8,
}

const fn default_subdir() -> &'static str {
    ".users-dashboard"
}

/// Resolve a home directory: `~` expands to the user's home, relative paths
/// are taken from the current directory, `None` means `<user home>/<subdir>`.
pub fn resolve_home_dir(path: Option<String>, subdir: &str, create: bool) -> Result<PathBuf> {
    let user_home = || dirs::home_dir().context("Cannot determine the user's home directory");

    let resolved = match path {
        None => user_home()?.join(subdir),
        Some(p) if p == "~" => user_home()?,
        Some(p) => match p.strip_prefix("~/") {
            Some(rest) => user_home()?.join(rest),
            None => {
                let pb = PathBuf::from(&p);
                if pb.is_absolute() {
                    pb
                } else {
                    std::env::current_dir()
                        .context("Cannot read the current directory")?
                        .join(pb)
                }
            }
        },
    };

    if create {
        std::fs::create_dir_all(&resolved)
            .with_context(|| format!("Failed to create {}", resolved.display()))?;
    }
    Ok(resolved)
}

fn merge_module_files(
    bag: &mut HashMap<String, serde_json::Value>,
    dir: impl AsRef<Path>,
) -> Result<()> {
    use std::fs;
    let dir = dir.as_ref();
    if !dir.exists() {
        return Ok(());
    }
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        if ext != "yml" && ext != "yaml" {
            continue;
        }
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_string();
        let raw = fs::read_to_string(&path)?;
        let val: serde_yaml::Value = serde_yaml::from_str(&raw)
            .with_context(|| format!("Invalid YAML in {}", path.display()))?;
        bag.insert(name, serde_json::to_value(val)?);
    }
    Ok(())
}
