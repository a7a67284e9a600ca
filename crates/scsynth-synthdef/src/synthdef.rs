//! Synth definitions and their graph codec.
//!
//! A definition on the wire is a sequence of count-prefixed sections:
//!
//! ```text
//! pstring name
//! int32 constant_count   | constant_count   * float32
//! int32 parameter_count  | parameter_count  * float32
//! int32 param_name_count | param_name_count * (pstring name, int32 index)
//! int32 ugen_count       | ugen_count       * ugen record
//! int16 variant_count    | variant_count    * (pstring name, float32 value)
//! ```
//!
//! Definitions carry no terminator, so several can be concatenated and read
//! back one after another. Counts are always derived from the list lengths
//! when encoding.

use crate::codec::{Reader, Writer};
use crate::error::{DecodeError, EncodeError, Section};
use crate::name::Name;
use crate::options::DecodeOptions;
use crate::ugen::{self, UGen};

const FLOAT_SIZE: usize = 4;
const MIN_PARAM_NAME_SIZE: usize = 5;
const MIN_VARIANT_SIZE: usize = 5;

/// A name bound to a parameter slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParamName {
    /// Control name, e.g. `"freq"`.
    pub name: Name,
    /// Index into [`SynthDef::parameters`].
    pub index: i32,
}

impl ParamName {
    /// Binds `name` to parameter `index`.
    pub fn new(name: impl Into<Name>, index: i32) -> Self {
        Self {
            name: name.into(),
            index,
        }
    }
}

/// A named override of a single parameter value.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Variant {
    /// Variant name.
    pub name: Name,
    /// Override value.
    pub value: f32,
}

impl Variant {
    /// Creates a variant.
    pub fn new(name: impl Into<Name>, value: f32) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// A named graph of unit generators.
///
/// Constants and UGens are addressed by position: [`InputSpec`](crate::InputSpec)
/// values index into [`constants`](Self::constants) and
/// [`ugens`](Self::ugens). Nothing here checks that those indices are in
/// range or point backwards.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SynthDef {
    /// Definition name, used by the server to instantiate synths.
    pub name: Name,
    /// Constant table.
    pub constants: Vec<f32>,
    /// Initial parameter values.
    pub parameters: Vec<f32>,
    /// Names bound to parameter slots. A slot may have any number of names.
    pub parameter_names: Vec<ParamName>,
    /// Unit generators in evaluation order.
    pub ugens: Vec<UGen>,
    /// Named parameter overrides.
    pub variants: Vec<Variant>,
}

impl SynthDef {
    /// Creates an empty definition.
    pub fn new(name: impl Into<Name>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Appends a constant.
    pub fn with_constant(mut self, value: f32) -> Self {
        self.constants.push(value);
        self
    }

    /// Appends a parameter slot with its initial value.
    pub fn with_parameter(mut self, value: f32) -> Self {
        self.parameters.push(value);
        self
    }

    /// Binds a name to parameter `index`.
    pub fn with_parameter_name(mut self, name: impl Into<Name>, index: i32) -> Self {
        self.parameter_names.push(ParamName::new(name, index));
        self
    }

    /// Appends a unit generator.
    pub fn with_ugen(mut self, ugen: UGen) -> Self {
        self.ugens.push(ugen);
        self
    }

    /// Appends a variant.
    pub fn with_variant(mut self, name: impl Into<Name>, value: f32) -> Self {
        self.variants.push(Variant::new(name, value));
        self
    }

    /// Constant at `index`.
    pub fn constant(&self, index: i32) -> Option<f32> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.constants.get(i).copied())
    }

    /// UGen at `index`.
    pub fn ugen(&self, index: i32) -> Option<&UGen> {
        usize::try_from(index).ok().and_then(|i| self.ugens.get(i))
    }

    /// Parameter index bound to `name`, taking the first binding.
    pub fn parameter_index(&self, name: &str) -> Option<i32> {
        self.parameter_names
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.index)
    }

    /// Initial value of the parameter bound to `name`.
    pub fn parameter_default(&self, name: &str) -> Option<f32> {
        let index = usize::try_from(self.parameter_index(name)?).ok()?;
        self.parameters.get(index).copied()
    }

    /// Variant named `name`.
    pub fn variant(&self, name: &str) -> Option<&Variant> {
        self.variants.iter().find(|v| v.name == name)
    }

    /// Encodes this definition.
    pub fn to_bytes(&self) -> Result<Vec<u8>, EncodeError> {
        encode_synthdef(self)
    }

    /// Decodes one definition from the front of `bytes`.
    pub fn from_bytes(bytes: &[u8]) -> Result<(Self, &[u8]), DecodeError> {
        decode_synthdef(bytes)
    }

    pub(crate) fn read(reader: &mut Reader<'_>, options: &DecodeOptions) -> Result<Self, DecodeError> {
        reader.enter(Section::Name);
        let name = reader.read_name()?;

        reader.enter(Section::Constants);
        let constants = read_floats(reader, options)?;

        reader.enter(Section::Parameters);
        let parameters = read_floats(reader, options)?;

        reader.enter(Section::ParameterNames);
        let count = reader.read_count()?;
        let mut parameter_names = Vec::with_capacity(reader.capacity_for(count, MIN_PARAM_NAME_SIZE));
        for _ in 0..count {
            let name = reader.read_name()?;
            let index = reader.read_i32()?;
            parameter_names.push(ParamName { name, index });
        }

        reader.enter(Section::UGens);
        let count = reader.read_count()?;
        let ugens = ugen::read_ugens(reader, count)?;

        reader.enter(Section::Variants);
        let count = reader.read_short_count()?;
        let mut variants = Vec::with_capacity(reader.capacity_for(count, MIN_VARIANT_SIZE));
        for _ in 0..count {
            let name = reader.read_name()?;
            let value = reader.read_f32()?;
            variants.push(Variant { name, value });
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            synthdef = %name,
            constants = constants.len(),
            parameters = parameters.len(),
            ugens = ugens.len(),
            variants = variants.len(),
            "synthdef_decode"
        );

        Ok(Self {
            name,
            constants,
            parameters,
            parameter_names,
            ugens,
            variants,
        })
    }

    pub(crate) fn write(&self, writer: &mut Writer) -> Result<(), EncodeError> {
        writer.put_pstring(self.name.as_bytes(), Section::Name)?;

        writer.put_count(self.constants.len(), Section::Constants)?;
        for &value in &self.constants {
            writer.put_f32(value);
        }

        writer.put_count(self.parameters.len(), Section::Parameters)?;
        for &value in &self.parameters {
            writer.put_f32(value);
        }

        writer.put_count(self.parameter_names.len(), Section::ParameterNames)?;
        for param in &self.parameter_names {
            writer.put_pstring(param.name.as_bytes(), Section::ParameterNames)?;
            writer.put_i32(param.index);
        }

        writer.put_count(self.ugens.len(), Section::UGens)?;
        ugen::write_ugens(writer, &self.ugens)?;

        writer.put_short_count(self.variants.len(), Section::Variants)?;
        for variant in &self.variants {
            writer.put_pstring(variant.name.as_bytes(), Section::Variants)?;
            writer.put_f32(variant.value);
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(synthdef = %self.name, ugens = self.ugens.len(), "synthdef_encode");

        Ok(())
    }
}

fn read_floats(reader: &mut Reader<'_>, options: &DecodeOptions) -> Result<Vec<f32>, DecodeError> {
    let count = reader.read_count()?;
    let mut values = Vec::with_capacity(reader.capacity_for(count, FLOAT_SIZE));
    for _ in 0..count {
        values.push(options.normalize(reader.read_f32()?));
    }
    Ok(values)
}

/// Decodes one definition from the front of `bytes`.
///
/// Returns the definition and the bytes that follow it. Any malformed
/// section aborts the whole decode.
pub fn decode_synthdef(bytes: &[u8]) -> Result<(SynthDef, &[u8]), DecodeError> {
    decode_synthdef_with(bytes, &DecodeOptions::default())
}

/// Like [`decode_synthdef`], applying `options`.
pub fn decode_synthdef_with<'a>(
    bytes: &'a [u8],
    options: &DecodeOptions,
) -> Result<(SynthDef, &'a [u8]), DecodeError> {
    let mut reader = Reader::new(bytes);
    let def = SynthDef::read(&mut reader, options)?;
    Ok((def, reader.remaining()))
}

/// Decodes every definition in `bytes` until the input is exhausted.
///
/// This reads a bare concatenation as produced by [`encode_synthdefs`], with
/// no file header.
pub fn decode_synthdefs(bytes: &[u8]) -> Result<Vec<SynthDef>, DecodeError> {
    decode_synthdefs_with(bytes, &DecodeOptions::default())
}

/// Like [`decode_synthdefs`], applying `options`.
pub fn decode_synthdefs_with(
    bytes: &[u8],
    options: &DecodeOptions,
) -> Result<Vec<SynthDef>, DecodeError> {
    let mut reader = Reader::new(bytes);
    let mut defs = Vec::new();
    while !reader.remaining().is_empty() {
        defs.push(SynthDef::read(&mut reader, options)?);
    }
    Ok(defs)
}

/// Encodes one definition.
pub fn encode_synthdef(def: &SynthDef) -> Result<Vec<u8>, EncodeError> {
    encode_synthdefs(std::slice::from_ref(def))
}

/// Encodes definitions back to back with no separator and no count.
pub fn encode_synthdefs(defs: &[SynthDef]) -> Result<Vec<u8>, EncodeError> {
    let mut writer = Writer::new();
    for def in defs {
        def.write(&mut writer)?;
    }
    Ok(writer.into_bytes())
}
