//! Unit generator records.
//!
//! Each record on the wire is:
//!
//! ```text
//! pstring class_name
//! uint8   calculation_rate
//! int32   input_count
//! int32   output_count
//! int16   special_index
//! input_count  * (int32 a, int32 b)   a == -1 => Constant(b), else UGen(a, b)
//! output_count * uint8 calculation_rate
//! ```
//!
//! References are not checked against the surrounding definition: a UGen
//! input may point forward, or at a constant that does not exist. That is a
//! concern for whatever builds the graph.

use crate::codec::{Reader, Writer};
use crate::error::{DecodeError, EncodeError, Section};
use crate::name::Name;

/// Discriminator value marking an input as a constant reference.
pub const CONSTANT_SENTINEL: i32 = -1;

/// Smallest possible encoded UGen record (empty class name, no inputs or outputs).
const MIN_UGEN_SIZE: usize = 12;
const INPUT_SPEC_SIZE: usize = 8;
const OUTPUT_SPEC_SIZE: usize = 1;

/// How often a unit generator's output updates.
///
/// The codec does not validate rates: any byte decodes, and bytes outside
/// the three known rates are kept in [`Rate::Other`] so they re-encode
/// unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Rate {
    /// Computed once at initialization (wire value 0).
    #[default]
    Scalar,
    /// Computed once per control block (wire value 1).
    Control,
    /// Computed per sample (wire value 2).
    Audio,
    /// Any other wire value. Holds values above 2.
    Other(u8),
}

impl Rate {
    /// Wire value of this rate.
    #[inline]
    pub fn as_u8(self) -> u8 {
        match self {
            Rate::Scalar => 0,
            Rate::Control => 1,
            Rate::Audio => 2,
            Rate::Other(v) => v,
        }
    }
}

impl From<u8> for Rate {
    fn from(value: u8) -> Self {
        match value {
            0 => Rate::Scalar,
            1 => Rate::Control,
            2 => Rate::Audio,
            v => Rate::Other(v),
        }
    }
}

impl From<Rate> for u8 {
    fn from(rate: Rate) -> Self {
        rate.as_u8()
    }
}

/// An operand feeding a unit generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InputSpec {
    /// Index into the definition's constant table.
    Constant {
        /// Constant table index.
        index: i32,
    },
    /// A numbered output of another unit generator in the same definition.
    UGen {
        /// Position of the source UGen in the definition's UGen list.
        ugen_index: i32,
        /// Output slot on the source UGen.
        output_index: i32,
    },
}

impl InputSpec {
    /// Reference to constant `index`.
    #[inline]
    pub fn constant(index: i32) -> Self {
        InputSpec::Constant { index }
    }

    /// Reference to output `output_index` of UGen `ugen_index`.
    #[inline]
    pub fn ugen(ugen_index: i32, output_index: i32) -> Self {
        InputSpec::UGen {
            ugen_index,
            output_index,
        }
    }

    fn read(reader: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let offset = reader.offset();
        let a = reader.read_i32()?;
        let b = reader.read_i32()?;
        match a {
            CONSTANT_SENTINEL => Ok(InputSpec::Constant { index: b }),
            a if a >= 0 => Ok(InputSpec::UGen {
                ugen_index: a,
                output_index: b,
            }),
            index => Err(DecodeError::InvalidUGenIndex { index, offset }),
        }
    }

    fn write(&self, writer: &mut Writer) -> Result<(), EncodeError> {
        match *self {
            InputSpec::Constant { index } => {
                writer.put_i32(CONSTANT_SENTINEL);
                writer.put_i32(index);
            }
            InputSpec::UGen {
                ugen_index,
                output_index,
            } => {
                if ugen_index < 0 {
                    return Err(EncodeError::InvalidUGenIndex { index: ugen_index });
                }
                writer.put_i32(ugen_index);
                writer.put_i32(output_index);
            }
        }
        Ok(())
    }
}

/// One output slot of a unit generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OutputSpec {
    /// Update rate of this output.
    pub rate: Rate,
}

impl OutputSpec {
    /// Output at `rate`.
    #[inline]
    pub fn new(rate: Rate) -> Self {
        Self { rate }
    }
}

/// One node of a synth definition graph.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UGen {
    /// Generator kind, e.g. `"SinOsc"`.
    pub class_name: Name,
    /// Calculation rate of the generator.
    pub rate: Rate,
    /// Operator selector for generators such as `BinaryOpUGen`; zero otherwise.
    pub special_index: i16,
    /// Input operands in order.
    pub inputs: Vec<InputSpec>,
    /// Output slots in order.
    pub outputs: Vec<OutputSpec>,
}

impl UGen {
    /// Creates a UGen with no inputs or outputs.
    pub fn new(class_name: impl Into<Name>, rate: Rate) -> Self {
        Self {
            class_name: class_name.into(),
            rate,
            special_index: 0,
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }

    /// Sets the special index.
    pub fn with_special_index(mut self, special_index: i16) -> Self {
        self.special_index = special_index;
        self
    }

    /// Appends an input operand.
    pub fn with_input(mut self, input: InputSpec) -> Self {
        self.inputs.push(input);
        self
    }

    /// Appends several input operands.
    pub fn with_inputs(mut self, inputs: impl IntoIterator<Item = InputSpec>) -> Self {
        self.inputs.extend(inputs);
        self
    }

    /// Appends an output at `rate`.
    pub fn with_output(mut self, rate: Rate) -> Self {
        self.outputs.push(OutputSpec::new(rate));
        self
    }

    /// Appends several outputs.
    pub fn with_outputs(mut self, rates: impl IntoIterator<Item = Rate>) -> Self {
        self.outputs.extend(rates.into_iter().map(OutputSpec::new));
        self
    }

    /// Number of output slots.
    pub fn num_outputs(&self) -> usize {
        self.outputs.len()
    }

    pub(crate) fn read(reader: &mut Reader<'_>) -> Result<Self, DecodeError> {
        reader.enter(Section::UGens);
        let class_name = reader.read_name()?;
        let rate = Rate::from(reader.read_u8()?);
        let input_count = reader.read_count()?;
        let output_count = reader.read_count()?;
        let special_index = reader.read_i16()?;

        reader.enter(Section::Inputs);
        let mut inputs = Vec::with_capacity(reader.capacity_for(input_count, INPUT_SPEC_SIZE));
        for _ in 0..input_count {
            inputs.push(InputSpec::read(reader)?);
        }

        reader.enter(Section::Outputs);
        let mut outputs = Vec::with_capacity(reader.capacity_for(output_count, OUTPUT_SPEC_SIZE));
        for _ in 0..output_count {
            outputs.push(OutputSpec::new(Rate::from(reader.read_u8()?)));
        }

        Ok(Self {
            class_name,
            rate,
            special_index,
            inputs,
            outputs,
        })
    }

    pub(crate) fn write(&self, writer: &mut Writer) -> Result<(), EncodeError> {
        writer.put_pstring(self.class_name.as_bytes(), Section::UGens)?;
        writer.put_u8(self.rate.as_u8());
        writer.put_count(self.inputs.len(), Section::Inputs)?;
        writer.put_count(self.outputs.len(), Section::Outputs)?;
        writer.put_i16(self.special_index);
        for input in &self.inputs {
            input.write(writer)?;
        }
        for output in &self.outputs {
            writer.put_u8(output.rate.as_u8());
        }
        Ok(())
    }
}

pub(crate) fn read_ugens(reader: &mut Reader<'_>, count: usize) -> Result<Vec<UGen>, DecodeError> {
    let mut ugens = Vec::with_capacity(reader.capacity_for(count, MIN_UGEN_SIZE));
    for _ in 0..count {
        ugens.push(UGen::read(reader)?);
    }
    Ok(ugens)
}

pub(crate) fn write_ugens(writer: &mut Writer, ugens: &[UGen]) -> Result<(), EncodeError> {
    for ugen in ugens {
        ugen.write(writer)?;
    }
    Ok(())
}

/// Decodes `count` consecutive UGen records from the front of `bytes`.
///
/// Returns the records in order and the bytes following the last one.
pub fn decode_ugens(bytes: &[u8], count: usize) -> Result<(Vec<UGen>, &[u8]), DecodeError> {
    let mut reader = Reader::new(bytes);
    let ugens = read_ugens(&mut reader, count)?;
    Ok((ugens, reader.remaining()))
}

/// Encodes UGen records back to back, with no leading count.
pub fn encode_ugens(ugens: &[UGen]) -> Result<Vec<u8>, EncodeError> {
    let mut writer = Writer::new();
    write_ugens(&mut writer, ugens)?;
    Ok(writer.into_bytes())
}
