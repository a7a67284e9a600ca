//! `.scsyndef` file container.
//!
//! ```text
//! 4 bytes  magic "SCgf"
//! int32    version (= 2)
//! int16    definition count
//! ...      definitions, back to back
//! ```

use std::path::Path;

use crate::codec::{Reader, Writer};
use crate::error::{DecodeError, EncodeError, Section, SynthDefError};
use crate::name::Name;
use crate::options::DecodeOptions;
use crate::synthdef::SynthDef;

/// Magic bytes written at the start of every file.
pub const MAGIC: [u8; 4] = *b"SCgf";

/// The only supported container version.
pub const VERSION: i32 = 2;

/// Conventional file extension, without the dot.
pub const FILE_EXTENSION: &str = "scsyndef";

/// Smallest encoded definition: a 1-byte name prefix plus five empty counts.
const MIN_SYNTHDEF_SIZE: usize = 19;

/// A decoded `.scsyndef` file.
///
/// This is the unit persisted to disk and sent to the server as a command
/// payload.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SynthDefFile {
    /// Magic bytes, kept as read. [`MAGIC`] for files built in memory.
    pub magic: [u8; 4],
    /// Definitions in file order.
    pub definitions: Vec<SynthDef>,
}

impl SynthDefFile {
    /// Wraps `definitions` with the standard header.
    pub fn new(definitions: Vec<SynthDef>) -> Self {
        Self {
            magic: MAGIC,
            definitions,
        }
    }

    /// Container version. Always [`VERSION`]; other versions never decode.
    pub fn version(&self) -> i32 {
        VERSION
    }

    /// Whether the magic bytes are `"SCgf"`.
    pub fn has_standard_magic(&self) -> bool {
        self.magic == MAGIC
    }

    /// Number of definitions.
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Whether the file holds no definitions.
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// First definition named `name`.
    pub fn get(&self, name: &str) -> Option<&SynthDef> {
        self.definitions.iter().find(|d| d.name == name)
    }

    /// Iterate over definitions.
    pub fn iter(&self) -> impl Iterator<Item = &SynthDef> {
        self.definitions.iter()
    }

    /// Names of all definitions, in file order.
    pub fn names(&self) -> Vec<&Name> {
        self.definitions.iter().map(|d| &d.name).collect()
    }

    /// Decodes a complete file.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        decode_file(bytes)
    }

    /// Decodes a complete file, applying `options`.
    pub fn from_bytes_with(bytes: &[u8], options: &DecodeOptions) -> Result<Self, DecodeError> {
        decode_file_with(bytes, options)
    }

    /// Encodes the file.
    pub fn to_bytes(&self) -> Result<Vec<u8>, EncodeError> {
        encode_file(self)
    }

    /// Load a `.scsyndef` file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SynthDefError> {
        Self::load_with(path, &DecodeOptions::default())
    }

    /// Load a `.scsyndef` file, applying `options`.
    pub fn load_with(path: impl AsRef<Path>, options: &DecodeOptions) -> Result<Self, SynthDefError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| SynthDefError::read_file(path, e))?;
        Ok(decode_file_with(&bytes, options)?)
    }

    /// Save to a `.scsyndef` file, creating parent directories as needed.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SynthDefError> {
        let path = path.as_ref();
        let bytes = self.to_bytes()?;

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| SynthDefError::create_dir(parent, e))?;
        }

        std::fs::write(path, bytes).map_err(|e| SynthDefError::write_file(path, e))?;
        Ok(())
    }
}

impl Default for SynthDefFile {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl From<Vec<SynthDef>> for SynthDefFile {
    fn from(definitions: Vec<SynthDef>) -> Self {
        Self::new(definitions)
    }
}

impl From<SynthDef> for SynthDefFile {
    fn from(def: SynthDef) -> Self {
        Self::new(vec![def])
    }
}

impl<'a> IntoIterator for &'a SynthDefFile {
    type Item = &'a SynthDef;
    type IntoIter = std::slice::Iter<'a, SynthDef>;

    fn into_iter(self) -> Self::IntoIter {
        self.definitions.iter()
    }
}

/// Decodes a complete `.scsyndef` file.
///
/// The version is checked before any definition bytes are read. Bytes after
/// the last declared definition are ignored.
pub fn decode_file(bytes: &[u8]) -> Result<SynthDefFile, DecodeError> {
    decode_file_with(bytes, &DecodeOptions::default())
}

/// Like [`decode_file`], applying `options`.
pub fn decode_file_with(bytes: &[u8], options: &DecodeOptions) -> Result<SynthDefFile, DecodeError> {
    let mut reader = Reader::new(bytes);
    reader.enter(Section::Header);

    let mut magic = [0u8; 4];
    magic.copy_from_slice(reader.read_bytes(MAGIC.len())?);

    let version = reader.read_i32()?;
    if version != VERSION {
        return Err(DecodeError::UnsupportedVersion { version });
    }

    let count = reader.read_short_count()?;
    let mut definitions = Vec::with_capacity(reader.capacity_for(count, MIN_SYNTHDEF_SIZE));
    for _ in 0..count {
        definitions.push(SynthDef::read(&mut reader, options)?);
    }

    #[cfg(feature = "tracing")]
    {
        if magic != MAGIC {
            tracing::debug!(?magic, "synthdef_file: non-standard magic");
        }
        let trailing = reader.remaining().len();
        if trailing > 0 {
            tracing::debug!(trailing, "synthdef_file: ignoring bytes after last definition");
        }
        tracing::debug!(definitions = definitions.len(), "synthdef_file_decode");
    }

    Ok(SynthDefFile { magic, definitions })
}

/// Encodes `file` with version 2 and a count derived from its definitions.
pub fn encode_file(file: &SynthDefFile) -> Result<Vec<u8>, EncodeError> {
    write_file(&file.magic, &file.definitions)
}

/// Encodes `definitions` as a file with the standard header.
pub fn encode_definitions(definitions: &[SynthDef]) -> Result<Vec<u8>, EncodeError> {
    write_file(&MAGIC, definitions)
}

fn write_file(magic: &[u8; 4], definitions: &[SynthDef]) -> Result<Vec<u8>, EncodeError> {
    let mut writer = Writer::new();
    writer.put_bytes(magic);
    writer.put_i32(VERSION);
    writer.put_short_count(definitions.len(), Section::Header)?;
    for def in definitions {
        def.write(&mut writer)?;
    }
    Ok(writer.into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ugen::{Rate, UGen};

    #[test]
    fn empty_file_layout() {
        let bytes = encode_definitions(&[]).unwrap();
        assert_eq!(bytes, vec![b'S', b'C', b'g', b'f', 0, 0, 0, 2, 0, 0]);
        let file = decode_file(&bytes).unwrap();
        assert!(file.is_empty());
        assert!(file.has_standard_magic());
        assert_eq!(file.version(), 2);
    }

    #[test]
    fn version_is_checked_before_definitions() {
        let mut bytes = encode_definitions(&[SynthDef::new("a")]).unwrap();
        bytes[4..8].copy_from_slice(&1i32.to_be_bytes());
        // Chop the definition so any attempt to read it would be Truncated.
        bytes.truncate(10);
        assert_eq!(
            decode_file(&bytes),
            Err(DecodeError::UnsupportedVersion { version: 1 })
        );
    }

    #[test]
    fn foreign_magic_is_kept() {
        let mut bytes = encode_definitions(&[SynthDef::new("a")]).unwrap();
        bytes[..4].copy_from_slice(b"XXXX");
        let file = decode_file(&bytes).unwrap();
        assert_eq!(&file.magic, b"XXXX");
        assert!(!file.has_standard_magic());
        assert_eq!(file.to_bytes().unwrap(), bytes);
    }

    #[test]
    fn patched_non_utf8_name_reencodes_byte_identical() {
        let mut bytes = encode_definitions(&[SynthDef::new("ab")]).unwrap();
        // Name pstring starts right after the 10-byte header.
        bytes[11..13].copy_from_slice(&[0xE9, b'x']);
        let file = decode_file(&bytes).unwrap();
        assert_eq!(file.definitions[0].name.as_bytes(), &[0xE9, b'x']);
        assert_eq!(encode_file(&file).unwrap(), bytes);
    }

    #[test]
    fn long_non_utf8_name_survives_round_trip() {
        let def = SynthDef::new(vec![0xE9u8; 200]);
        let bytes = encode_definitions(std::slice::from_ref(&def)).unwrap();
        let file = decode_file(&bytes).unwrap();
        assert_eq!(file.definitions, vec![def]);
        assert_eq!(file.to_bytes().unwrap(), bytes);
    }

    #[test]
    fn trailing_bytes_are_ignored() {
        let mut bytes = encode_definitions(&[SynthDef::new("a")]).unwrap();
        bytes.extend_from_slice(&[1, 2, 3]);
        let file = decode_file(&bytes).unwrap();
        assert_eq!(file.names(), vec!["a"]);
    }

    #[test]
    fn inner_failure_aborts_whole_file() {
        let defs = vec![
            SynthDef::new("a"),
            SynthDef::new("b").with_ugen(UGen::new("Out", Rate::Audio)),
        ];
        let bytes = encode_definitions(&defs).unwrap();
        let err = decode_file(&bytes[..bytes.len() - 3]).unwrap_err();
        assert!(matches!(err, DecodeError::Truncated { .. }));
    }

    #[test]
    fn negative_definition_count_is_invalid() {
        let mut bytes = encode_definitions(&[]).unwrap();
        bytes[8..10].copy_from_slice(&(-1i16).to_be_bytes());
        assert_eq!(
            decode_file(&bytes),
            Err(DecodeError::InvalidCount {
                section: Section::Header,
                count: -1,
                offset: 8,
            })
        );
    }

    #[test]
    fn short_header_is_truncated() {
        assert!(matches!(
            decode_file(b"SCg"),
            Err(DecodeError::Truncated {
                section: Section::Header,
                offset: 0,
                needed: 4,
                available: 3,
            })
        ));
    }

    #[test]
    fn conversions_and_lookup() {
        let file = SynthDefFile::from(SynthDef::new("solo"));
        assert_eq!(file.len(), 1);
        assert!(file.get("solo").is_some());
        assert!(file.get("duo").is_none());
        assert_eq!((&file).into_iter().count(), 1);
    }
}
