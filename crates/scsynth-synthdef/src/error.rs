//! Error types for synth definition encoding and decoding.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Region of the `.scsyndef` layout being read or written.
///
/// Carried by errors so a failure can be located without re-parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    /// File magic, version and definition count.
    Header,
    /// Synth definition name.
    Name,
    /// Constant table.
    Constants,
    /// Initial parameter values.
    Parameters,
    /// Parameter name table.
    ParameterNames,
    /// Unit generator records (class name, rate, counts, special index).
    UGens,
    /// Input operands of a unit generator.
    Inputs,
    /// Output rates of a unit generator.
    Outputs,
    /// Variant overrides.
    Variants,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Section::Header => "header",
            Section::Name => "name",
            Section::Constants => "constants",
            Section::Parameters => "parameters",
            Section::ParameterNames => "parameter names",
            Section::UGens => "ugens",
            Section::Inputs => "ugen inputs",
            Section::Outputs => "ugen outputs",
            Section::Variants => "variants",
        };
        f.write_str(name)
    }
}

/// Errors produced while decoding synth definition bytes.
///
/// Decoding stops at the first error; no partially decoded value is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Fewer bytes remain than the next field requires.
    #[error("truncated {section} at byte {offset}: needed {needed} bytes, {available} available")]
    Truncated {
        /// Section being decoded.
        section: Section,
        /// Byte offset of the field that could not be read.
        offset: usize,
        /// Width of the field.
        needed: usize,
        /// Bytes left in the input.
        available: usize,
    },

    /// The file header declares a version other than 2.
    #[error("unsupported synthdef file version {version} (expected 2)")]
    UnsupportedVersion {
        /// Version found in the header.
        version: i32,
    },

    /// An input operand's discriminator is neither -1 nor a unit generator index.
    #[error("invalid ugen index {index} in input spec at byte {offset}")]
    InvalidUGenIndex {
        /// Raw discriminator value.
        index: i32,
        /// Byte offset of the input spec.
        offset: usize,
    },

    /// A count field is negative.
    #[error("invalid {section} count {count} at byte {offset}")]
    InvalidCount {
        /// Section the count belongs to.
        section: Section,
        /// Raw count value.
        count: i32,
        /// Byte offset of the count field.
        offset: usize,
    },
}

/// Errors produced while encoding synth definitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// A string does not fit the 1-byte length prefix.
    #[error("{section} string is {len} bytes, pstrings hold at most 255")]
    StringTooLong {
        /// Section holding the string.
        section: Section,
        /// Length of the string in bytes.
        len: usize,
    },

    /// A list is longer than its count field can represent.
    #[error("{section} has {len} entries, more than its count field can hold")]
    CountOverflow {
        /// Section holding the list.
        section: Section,
        /// Length of the list.
        len: usize,
    },

    /// A unit generator reference is negative and would collide with the constant sentinel.
    #[error("invalid ugen index {index} in input spec")]
    InvalidUGenIndex {
        /// Offending index.
        index: i32,
    },
}

/// Errors from file-level synth definition operations.
#[derive(Debug, Error)]
pub enum SynthDefError {
    /// The bytes could not be decoded.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// The definitions could not be encoded.
    #[error(transparent)]
    Encode(#[from] EncodeError),

    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    ReadFile {
        /// Path of the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a file
    #[error("failed to write file '{path}': {source}")]
    WriteFile {
        /// Path of the file that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to create directory
    #[error("failed to create directory '{path}': {source}")]
    CreateDir {
        /// Path of the directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl SynthDefError {
    /// Create a read file error.
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SynthDefError::ReadFile {
            path: path.into(),
            source,
        }
    }

    /// Create a write file error.
    pub fn write_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SynthDefError::WriteFile {
            path: path.into(),
            source,
        }
    }

    /// Create a create directory error.
    pub fn create_dir(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SynthDefError::CreateDir {
            path: path.into(),
            source,
        }
    }
}
