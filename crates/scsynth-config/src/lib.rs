//! Client configuration for scsynth sessions.
//!
//! Ties the codec and the allocator to files on disk: a TOML client
//! configuration that chooses the client id, node id boundary and decode
//! options, plus platform paths for locating `.scsyndef` files.
//!
//! # Example
//!
//! ```rust,no_run
//! use scsynth_config::{ClientConfig, load_synthdef_dir};
//!
//! let config = ClientConfig::load_user()?;
//! let mut ids = config.allocator()?;
//! let library = load_synthdef_dir(config.synthdef_dir(), &config.decode_options())?;
//!
//! for def in library.iter() {
//!     println!("{} -> node {}", def.name, ids.allocate_temporary(1));
//! }
//! # Ok::<(), scsynth_config::ConfigError>(())
//! ```

mod client_config;
mod error;
mod library;

/// Platform-specific paths for configuration and synth definitions.
pub mod paths;

pub use client_config::{ClientConfig, DecodeConfig};
pub use error::ConfigError;
pub use library::{SynthDefLibrary, load_synthdef_dir};
pub use paths::{
    config_file_path, ensure_user_config_dir, ensure_user_synthdefs_dir, find_synthdef,
    list_synthdefs, synthdef_name_from_path, user_config_dir, user_synthdefs_dir,
};
