//! Decode-time options.

/// Largest number of decimal places rounding honours; f32 carries no more.
const MAX_DECIMALS: u32 = 9;

/// Options applied while decoding synth definitions.
///
/// The default decodes every value exactly as stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DecodeOptions {
    /// Round constants and parameter defaults to this many decimal places.
    ///
    /// Variants and UGen fields are never rounded. Encoding never rounds, so
    /// enabling this makes decode lossy.
    #[cfg_attr(feature = "serde", serde(default))]
    pub round_floats: Option<u32>,
}

impl DecodeOptions {
    /// Exact decoding.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rounds constants and parameters to `decimals` places.
    pub fn with_rounding(mut self, decimals: u32) -> Self {
        self.round_floats = Some(decimals);
        self
    }

    pub(crate) fn normalize(&self, value: f32) -> f32 {
        match self.round_floats {
            Some(decimals) if value.is_finite() => {
                let scale = 10f64.powi(decimals.min(MAX_DECIMALS) as i32);
                ((f64::from(value) * scale).round() / scale) as f32
            }
            _ => value,
        }
    }
}
