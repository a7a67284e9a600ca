//! Client configuration file format.

use std::path::{Path, PathBuf};

use scsynth_alloc::{DEFAULT_BOUNDARY, NodeIdAllocator};
use scsynth_synthdef::DecodeOptions;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::paths;

/// Settings for one client session.
///
/// # TOML Format
///
/// ```toml
/// client_id = 0
/// id_boundary = 1000
/// synthdef_dir = "/home/me/synthdefs"
///
/// [decode]
/// round_floats = 3
/// ```
///
/// Every key is optional; a missing file section falls back to the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Client number placed in the high bits of every node id (0-31).
    #[serde(default)]
    pub client_id: u32,

    /// Split between permanent and temporary node ids.
    #[serde(default = "default_boundary")]
    pub id_boundary: i32,

    /// Directory searched for `.scsyndef` files before the user directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub synthdef_dir: Option<PathBuf>,

    /// Synth definition decoding.
    #[serde(default)]
    pub decode: DecodeConfig,
}

/// `[decode]` section of the client configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodeConfig {
    /// Round decoded constants and parameter defaults to this many places.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub round_floats: Option<u32>,
}

fn default_boundary() -> i32 {
    DEFAULT_BOUNDARY
}

impl ClientConfig {
    /// Configuration for `client_id` with default settings otherwise.
    pub fn new(client_id: u32) -> Self {
        Self {
            client_id,
            ..Self::default()
        }
    }

    /// Set the permanent/temporary id boundary.
    pub fn with_boundary(mut self, id_boundary: i32) -> Self {
        self.id_boundary = id_boundary;
        self
    }

    /// Set the synth definition directory.
    pub fn with_synthdef_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.synthdef_dir = Some(dir.into());
        self
    }

    /// Round decoded floats to `decimals` places.
    pub fn with_rounding(mut self, decimals: u32) -> Self {
        self.decode.round_floats = Some(decimals);
        self
    }

    /// Load and validate a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        let config = Self::from_toml(&content)?;
        tracing::debug!(
            path = %path.display(),
            client_id = config.client_id,
            "loaded client config"
        );
        Ok(config)
    }

    /// Load the user's configuration file, or defaults if there is none.
    pub fn load_user() -> Result<Self, ConfigError> {
        let path = paths::config_file_path();
        if path.is_file() {
            Self::load(&path)
        } else {
            tracing::debug!(path = %path.display(), "no client config, using defaults");
            Ok(Self::default())
        }
    }

    /// Parse and validate a configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: ClientConfig = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Save the configuration to a TOML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Convert the configuration to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check the client id and boundary against the allocator's rules.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.allocator().map(|_| ())
    }

    /// A fresh node id allocator for this client.
    pub fn allocator(&self) -> Result<NodeIdAllocator, ConfigError> {
        Ok(NodeIdAllocator::new(self.client_id, self.id_boundary)?)
    }

    /// Decode options from the `[decode]` section.
    pub fn decode_options(&self) -> DecodeOptions {
        DecodeOptions {
            round_floats: self.decode.round_floats,
        }
    }

    /// Directory synth definitions are loaded from: the configured one, or
    /// the user directory.
    pub fn synthdef_dir(&self) -> PathBuf {
        self.synthdef_dir
            .clone()
            .unwrap_or_else(paths::user_synthdefs_dir)
    }

    /// Find a synth definition file, searching the configured directory first.
    pub fn find_synthdef(&self, name: &str) -> Result<PathBuf, ConfigError> {
        paths::find_synthdef(name, self.synthdef_dir.as_deref())
            .ok_or_else(|| ConfigError::SynthDefNotFound(name.to_string()))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            client_id: 0,
            id_boundary: DEFAULT_BOUNDARY,
            synthdef_dir: None,
            decode: DecodeConfig::default(),
        }
    }
}
