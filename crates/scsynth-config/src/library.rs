//! Loading a directory of synth definition files.

use std::path::{Path, PathBuf};

use scsynth_synthdef::{DecodeOptions, Name, SynthDef, SynthDefError, SynthDefFile};

use crate::error::ConfigError;
use crate::paths;

/// Every synth definition decoded from one directory.
///
/// Files are read in path order. When two files define the same name the
/// later one wins, as it would when both are sent to the server.
#[derive(Debug, Default)]
pub struct SynthDefLibrary {
    dir: PathBuf,
    definitions: Vec<SynthDef>,
    failures: Vec<(PathBuf, SynthDefError)>,
}

impl SynthDefLibrary {
    /// Directory the library was loaded from.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Definitions in load order.
    pub fn definitions(&self) -> &[SynthDef] {
        &self.definitions
    }

    /// Files that failed to load, with their errors.
    pub fn failures(&self) -> &[(PathBuf, SynthDefError)] {
        &self.failures
    }

    /// The last loaded definition named `name`.
    pub fn get(&self, name: &str) -> Option<&SynthDef> {
        self.definitions.iter().rev().find(|def| def.name == name)
    }

    /// Definition names in load order, duplicates included.
    pub fn names(&self) -> Vec<&Name> {
        self.definitions.iter().map(|def| &def.name).collect()
    }

    /// Number of loaded definitions.
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Whether no definitions were loaded.
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Iterate over definitions in load order.
    pub fn iter(&self) -> impl Iterator<Item = &SynthDef> {
        self.definitions.iter()
    }
}

/// Decode every `.scsyndef` file in `dir`.
///
/// A file that fails to load is recorded in [`SynthDefLibrary::failures`] and
/// does not stop the others. Only an unreadable directory is an error.
pub fn load_synthdef_dir(
    dir: impl AsRef<Path>,
    options: &DecodeOptions,
) -> Result<SynthDefLibrary, ConfigError> {
    let dir = dir.as_ref();
    std::fs::read_dir(dir).map_err(|e| ConfigError::read_dir(dir, e))?;

    let mut library = SynthDefLibrary {
        dir: dir.to_path_buf(),
        ..SynthDefLibrary::default()
    };

    for path in paths::list_synthdefs(dir) {
        match SynthDefFile::load_with(&path, options) {
            Ok(file) => {
                tracing::debug!(
                    path = %path.display(),
                    count = file.len(),
                    "loaded synth definitions"
                );
                library.definitions.extend(file.definitions);
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), "skipping synth definition file: {e}");
                library.failures.push((path, e));
            }
        }
    }

    Ok(library)
}
