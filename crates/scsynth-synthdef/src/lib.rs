//! Codec for the scsynth binary synth definition format (`.scsyndef`, version 2).
//!
//! A synth definition is a named graph of unit generators (UGens). The
//! server receives definitions as a compact big-endian byte layout in which
//! every section is count-prefixed and every UGen input is either a constant
//! reference or a reference to another UGen's output.
//!
//! # Layers
//!
//! - [`codec`] - big-endian primitives and pstrings over a byte cursor
//! - [`ugen`] - UGen records: [`UGen`], [`InputSpec`], [`OutputSpec`], [`Rate`]
//! - [`synthdef`] - complete definitions: [`SynthDef`]
//! - [`file`] - the `"SCgf"` file container: [`SynthDefFile`]
//!
//! Names are kept as the raw bytes of their pstrings ([`Name`]); they are
//! not required to be UTF-8, and re-encoding writes them back unchanged.
//!
//! # Leniency
//!
//! Decoding is as permissive as the server itself. It does not check that
//! UGen inputs point backwards, or that constant and UGen indices are in
//! range. Referential integrity belongs to whatever layer builds graphs.
//!
//! # Example
//!
//! ```rust
//! use scsynth_synthdef::{InputSpec, Rate, SynthDef, SynthDefFile, UGen};
//!
//! let def = SynthDef::new("noise")
//!     .with_constant(0.2)
//!     .with_ugen(UGen::new("BrownNoise", Rate::Audio).with_output(Rate::Audio))
//!     .with_ugen(
//!         UGen::new("BinaryOpUGen", Rate::Audio)
//!             .with_special_index(2)
//!             .with_inputs([InputSpec::ugen(0, 0), InputSpec::constant(0)])
//!             .with_output(Rate::Audio),
//!     );
//!
//! let bytes = SynthDefFile::from(def.clone()).to_bytes().unwrap();
//! let file = SynthDefFile::from_bytes(&bytes).unwrap();
//! assert_eq!(file.definitions, vec![def]);
//! ```
//!
//! # Features
//!
//! - `tracing` - debug events for decoded and encoded definitions
//! - `serde` - `Serialize`/`Deserialize` for the data model

pub mod codec;
mod error;
pub mod file;
mod name;
mod options;
pub mod synthdef;
pub mod ugen;

pub use error::{DecodeError, EncodeError, Section, SynthDefError};
pub use file::{
    FILE_EXTENSION, MAGIC, SynthDefFile, VERSION, decode_file, decode_file_with,
    encode_definitions, encode_file,
};
pub use name::Name;
pub use options::DecodeOptions;
pub use synthdef::{
    ParamName, SynthDef, Variant, decode_synthdef, decode_synthdef_with, decode_synthdefs,
    decode_synthdefs_with, encode_synthdef, encode_synthdefs,
};
pub use ugen::{InputSpec, OutputSpec, Rate, UGen, decode_ugens, encode_ugens};
