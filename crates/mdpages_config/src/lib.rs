use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file looked up in the working directory when none is specified.
pub const DEFAULT_CONFIG_FILE: &str = "mdpages.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

pub struct LoadedConfig {
    pub config: Config,
    pub file_path: PathBuf,
    /// Set when the file exists but could not be used, the defaults are
    /// loaded instead.
    pub maybe_error: Option<ConfigError>,
}

/// Loads the config file, falling back to the defaults.
///
/// A missing file is not an error. An unreadable or malformed one yields the
/// defaults together with the error, so the caller can report it and still
/// start.
pub fn load_config(specified_config_file: Option<PathBuf>) -> LoadedConfig {
    let file_path = specified_config_file.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

    let (config, maybe_error) = match std::fs::read_to_string(&file_path) {
        Ok(contents) => match toml::from_str(&contents) {
            Ok(config) => (config, None),
            Err(source) => (
                Config::default(),
                Some(ConfigError::Parse {
                    path: file_path.clone(),
                    source,
                }),
            ),
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %file_path.display(), "No config file, using defaults");
            (Config::default(), None)
        }
        Err(source) => (
            Config::default(),
            Some(ConfigError::Read {
                path: file_path.clone(),
                source,
            }),
        ),
    };

    LoadedConfig {
        config,
        file_path,
        maybe_error,
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Root of the served markdown tree.
    pub root: PathBuf,

    /// Socket address to listen on.
    pub addr: String,

    /// Files tried, in order, when a directory is requested.
    pub index_files: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            addr: "127.0.0.1:3000".into(),
            index_files: vec!["index.md".into(), "README.md".into()],
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct TemplateConfig {
    /// Directory holding the `<name>.md` templates.
    ///
    /// A relative path is resolved against `server.root`.
    pub dir: PathBuf,

    /// Maximum nesting of templates inside templates.
    pub max_depth: usize,

    /// Maximum number of templates loaded while rendering one page.
    pub max_expansions: usize,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("templates"),
            max_depth: 32,
            max_expansions: 1024,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct RenderConfig {
    pub enable_tables: bool,
    pub enable_strikethrough: bool,
    pub enable_tasklists: bool,
    pub enable_footnotes: bool,
    pub enable_heading_attributes: bool,
    pub enable_smart_punctuation: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            enable_tables: true,
            enable_strikethrough: true,
            enable_tasklists: true,
            enable_footnotes: true,
            enable_heading_attributes: true,
            enable_smart_punctuation: false,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct LogConfig {
    /// Specify the log file path.
    ///
    /// Logs go to stderr when unset.
    pub log_file: Option<String>,

    /// Specify the max log level.
    pub max_level: String,

    /// Specify the log target to enable more detailed logging.
    ///
    /// ```toml
    /// [log]
    /// log-target = "mdpages_core::template=trace,tower_http=debug"
    /// ```
    pub log_target: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_file: None,
            max_level: "info".into(),
            log_target: "".into(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct Config {
    /// Log configuration.
    pub log: LogConfig,

    /// Markdown tree and listener.
    pub server: ServerConfig,

    /// Template expansion.
    pub template: TemplateConfig,

    /// Markdown rendering.
    pub render: RenderConfig,
}

impl Config {
    /// The template directory, with a relative `template.dir` taken relative
    /// to the served root.
    pub fn template_dir(&self) -> PathBuf {
        resolve_against(&self.server.root, &self.template.dir)
    }
}

fn resolve_against(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
