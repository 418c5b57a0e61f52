use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "labelcrab.toml";
pub const DEFAULT_RULES_PATH: &str = ".github/labeler.yml";

/// CLI settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Rules file used when `--rules` is not given
    pub rules_path: PathBuf,

    /// Log at debug level
    pub debug: bool,

    /// Pretty-print the JSON report
    pub pretty: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            rules_path: PathBuf::from(DEFAULT_RULES_PATH),
            debug: false,
            pretty: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from `labelcrab.toml` and the environment
    ///
    /// Sources, later ones overriding earlier ones:
    /// 1. Default values
    /// 2. labelcrab.toml in the working directory (if present)
    /// 3. Environment variables prefixed with LABELCRAB_ (e.g. LABELCRAB_DEBUG=true)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    /// Same as [`AppConfig::load`] with an explicit config file path
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        Self::load_layered(path, Environment::with_prefix("LABELCRAB").try_parsing(true))
    }

    fn load_layered(path: &Path, env: Environment) -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .set_default("rules_path", DEFAULT_RULES_PATH)?
            .set_default("debug", false)?
            .set_default("pretty", false)?;

        let builder = if path.exists() {
            builder.add_source(File::from(path))
        } else {
            builder
        };

        builder.add_source(env).build()?.try_deserialize()
    }

    /// Apply command-line flags on top of the loaded settings
    pub fn with_overrides(mut self, rules: Option<PathBuf>, debug: bool, pretty: bool) -> Self {
        if let Some(rules) = rules {
            self.rules_path = rules;
        }
        self.debug |= debug;
        self.pretty |= pretty;
        self
    }
}
