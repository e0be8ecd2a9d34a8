//! Configuration parsing and management.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default configuration file name, looked up in the working directory
pub const CONFIG_FILENAME: &str = "hypertext.yml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    ParseError(#[from] serde_yaml::Error),
}

/// Main configuration struct matching the hypertext.yml schema
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub server: ServerConfig,

    // Directory relative paths resolve against
    #[serde(skip)]
    base_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    #[serde(default = "default_content")]
    pub content: PathBuf,

    #[serde(default = "default_static", rename = "static")]
    pub static_dir: PathBuf,

    #[serde(default = "default_styles")]
    pub styles: PathBuf,

    #[serde(default = "default_templates")]
    pub templates: PathBuf,

    #[serde(default = "default_output")]
    pub output: PathBuf,
}

fn default_content() -> PathBuf {
    PathBuf::from("content")
}

fn default_static() -> PathBuf {
    PathBuf::from("static")
}

fn default_styles() -> PathBuf {
    PathBuf::from("styles")
}

fn default_templates() -> PathBuf {
    PathBuf::from("templates")
}

fn default_output() -> PathBuf {
    PathBuf::from("public")
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            content: default_content(),
            static_dir: default_static(),
            styles: default_styles(),
            templates: default_templates(),
            output: default_output(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    String::from("127.0.0.1")
}

fn default_port() -> u16 {
    8000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let mut config: Config = if contents.trim().is_empty() {
            Config::default()
        } else {
            serde_yaml::from_str(&contents)?
        };

        config.base_dir = path.parent().map(Path::to_path_buf);

        Ok(config)
    }

    /// Load the config file if it exists, otherwise use the default layout
    /// rooted next to where the file would be.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            return Self::from_file(path);
        }

        tracing::debug!("No config at {:?}, using default layout", path);
        let mut config = Config::default();
        config.base_dir = path.parent().map(Path::to_path_buf);
        Ok(config)
    }

    /// Default layout with every directory placed under `root`
    pub fn rooted_at<P: AsRef<Path>>(root: P) -> Self {
        Self {
            base_dir: Some(root.as_ref().to_path_buf()),
            ..Self::default()
        }
    }

    pub fn content_dir(&self) -> PathBuf {
        self.resolve_path(&self.paths.content)
    }

    pub fn static_dir(&self) -> PathBuf {
        self.resolve_path(&self.paths.static_dir)
    }

    pub fn styles_dir(&self) -> PathBuf {
        self.resolve_path(&self.paths.styles)
    }

    pub fn templates_dir(&self) -> PathBuf {
        self.resolve_path(&self.paths.templates)
    }

    pub fn output_dir(&self) -> PathBuf {
        self.resolve_path(&self.paths.output)
    }

    /// Asset trees mirrored into the output, in copy order
    pub fn asset_dirs(&self) -> [PathBuf; 2] {
        [self.static_dir(), self.styles_dir()]
    }

    /// Directories whose changes should trigger a rebuild
    pub fn source_dirs(&self) -> [PathBuf; 4] {
        [
            self.content_dir(),
            self.templates_dir(),
            self.static_dir(),
            self.styles_dir(),
        ]
    }

    /// Resolve a path relative to the config file location
    fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            return path.to_path_buf();
        }
        match &self.base_dir {
            Some(base) if !base.as_os_str().is_empty() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}
