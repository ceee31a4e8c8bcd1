//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/claimdoc/claimdoc.toml`
//! 3. Local config: `<project_dir>/.claimdoc.toml`
//! 4. Environment variables: `CLAIMDOC_*` prefix (`__` separates nested keys)

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::{ApplicationError, RenderOptions};

pub const ENV_PREFIX: &str = "CLAIMDOC";
pub const LOCAL_CONFIG_FILE: &str = ".claimdoc.toml";

/// Rendering defaults for `build`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RenderSettings {
    /// Emit `<?xml ...?>` before the root element
    pub xml_declaration: bool,
    /// Indent nested elements, one per line
    pub pretty: bool,
    /// Spaces per nesting level when pretty printing
    pub indent: usize,
}

impl Default for RenderSettings {
    fn default() -> Self {
        let options = RenderOptions::default();
        Self {
            xml_declaration: options.xml_declaration,
            pretty: options.pretty,
            indent: options.indent,
        }
    }
}

impl RenderSettings {
    pub fn options(&self) -> RenderOptions {
        RenderOptions {
            xml_declaration: self.xml_declaration,
            pretty: self.pretty,
            indent: self.indent,
        }
    }
}

/// Raw render config for intermediate parsing (`None` → not specified, inherit).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawRenderSettings {
    pub xml_declaration: Option<bool>,
    pub pretty: Option<bool>,
    pub indent: Option<usize>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub schema: Option<PathBuf>,
    pub render: RawRenderSettings,
}

impl RawSettings {
    /// Resolve a relative schema path against the directory of the config file.
    fn anchored(mut self, dir: &Path) -> Self {
        let anchored = match &self.schema {
            Some(schema) if is_plain_relative(schema) => Some(dir.join(schema)),
            _ => None,
        };
        if anchored.is_some() {
            self.schema = anchored;
        }
        self
    }
}

/// Relative and not starting with `~` or `$`, which are expanded later.
fn is_plain_relative(path: &Path) -> bool {
    let text = path.to_string_lossy();
    path.is_relative() && !text.starts_with('~') && !text.starts_with('$')
}

/// Unified configuration for claimdoc.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Settings {
    /// Schema used when `--schema` is not given
    pub schema: Option<PathBuf>,
    /// Output formatting
    pub render: RenderSettings,
}

/// Get the XDG config directory for claimdoc.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "claimdoc").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("claimdoc.toml"))
}

/// Get the path to the local config file in a project directory.
pub fn local_config_path(project_dir: &Path) -> PathBuf {
    project_dir.join(LOCAL_CONFIG_FILE)
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        if let Some(schema) = self.schema.take() {
            let raw = schema.to_string_lossy();
            let expanded = shellexpand::full(raw.as_ref())
                .map(|s| s.into_owned())
                .unwrap_or_else(|_| raw.to_string());
            self.schema = Some(PathBuf::from(expanded));
        }
    }

    /// Overlay a config layer: specified values win, unspecified ones are inherited.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            schema: overlay.schema.clone().or_else(|| self.schema.clone()),
            render: RenderSettings {
                xml_declaration: overlay
                    .render
                    .xml_declaration
                    .unwrap_or(self.render.xml_declaration),
                pretty: overlay.render.pretty.unwrap_or(self.render.pretty),
                indent: overlay.render.indent.unwrap_or(self.render.indent),
            },
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `project_dir` - Optional directory holding a local `.claimdoc.toml`
    ///
    /// # Precedence (lowest to highest)
    /// 1. Compiled defaults
    /// 2. Global config: `$XDG_CONFIG_HOME/claimdoc/claimdoc.toml`
    /// 3. Local config: `<project_dir>/.claimdoc.toml`
    /// 4. Environment variables: `CLAIMDOC_*`
    pub fn load(project_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 3. Local config, relative schema paths anchored at the project dir
        if let Some(dir) = project_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                let raw = load_raw_settings(&local_path)?.anchored(dir);
                current = current.merge_with(&raw);
            }
        }

        // 4. Environment variables (explicit override)
        current = Self::apply_env_overrides(current, Self::environment())?;

        current.expand_paths();

        Ok(current)
    }

    fn environment() -> Environment {
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
    }

    /// Apply `CLAIMDOC_*` variables from `env` as explicit overrides.
    fn apply_env_overrides(mut settings: Self, env: Environment) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(env)
            .build()
            .map_err(config_err)?;

        if let Some(val) = env_value("schema", config.get_string("schema"))? {
            settings.schema = Some(PathBuf::from(val));
        }
        if let Some(val) = env_value(
            "render.xml_declaration",
            config.get_bool("render.xml_declaration"),
        )? {
            settings.render.xml_declaration = val;
        }
        if let Some(val) = env_value("render.pretty", config.get_bool("render.pretty"))? {
            settings.render.pretty = val;
        }
        if let Some(val) = env_value("render.indent", config.get_int("render.indent"))? {
            settings.render.indent = usize::try_from(val).map_err(|_| ApplicationError::Config {
                message: format!("render.indent must not be negative: {val}"),
            })?;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# claimdoc configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/claimdoc/claimdoc.toml
#   Local:  <project_dir>/.claimdoc.toml
#   Env:    CLAIMDOC_* environment variables, e.g. CLAIMDOC_RENDER__PRETTY=true

# Schema used when --schema is not given (relative to the local config's directory)
# schema = "schema/claim.toml"

[render]
# Emit the <?xml ...?> declaration
# xml_declaration = true

# Indent nested elements
# pretty = false

# Spaces per level when pretty printing
# indent = 2
"#
        .to_string()
    }
}

/// Absent keys are `None`; a present value that does not parse is an error.
fn env_value<T>(key: &str, result: Result<T, ConfigError>) -> Result<Option<T>, ApplicationError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(ConfigError::NotFound(_)) => Ok(None),
        Err(e) => Err(ApplicationError::Config {
            message: format!("{ENV_PREFIX} override for {key}: {e}"),
        }),
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
