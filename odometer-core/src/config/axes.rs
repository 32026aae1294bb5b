//! Axis configuration types
//!
//! The host owns the machine settings; the odometer keeps a copy of the
//! per-axis scale and refreshes it whenever the host reports a settings
//! change.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum number of axes (X, Y, Z, A, B, C)
pub const MAX_AXES: usize = 6;

/// Axis letters in index order
pub const AXIS_LETTERS: [&str; MAX_AXES] = ["X", "Y", "Z", "A", "B", "C"];

/// Letter for an axis index, `"?"` past [`MAX_AXES`]
pub fn axis_letter(index: usize) -> &'static str {
    AXIS_LETTERS.get(index).copied().unwrap_or("?")
}

/// Per-axis scale settings
///
/// `steps_per_mm[i]` is the number of step pulses that move axis `i` by one
/// distance unit. The unit is millimeters for linear axes; distance reports
/// divide by 1000 and print meters.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AxisSettings<const N: usize> {
    /// Step pulses per distance unit, one entry per axis
    #[cfg_attr(feature = "serde", serde(with = "serde_steps"))]
    pub steps_per_mm: [f32; N],
}

impl<const N: usize> AxisSettings<N> {
    /// Create settings from per-axis scales
    pub const fn new(steps_per_mm: [f32; N]) -> Self {
        Self { steps_per_mm }
    }

    /// Create settings with the same scale on every axis
    pub const fn uniform(steps_per_mm: f32) -> Self {
        Self {
            steps_per_mm: [steps_per_mm; N],
        }
    }

    /// Scale for `axis`, if it is usable for a distance conversion
    ///
    /// A zero, negative or non-finite scale yields `None`.
    pub fn scale(&self, axis: usize) -> Option<f32> {
        self.steps_per_mm
            .get(axis)
            .copied()
            .filter(|s| s.is_finite() && *s > 0.0)
    }
}

/// serde for `[f32; N]` with a const generic length
#[cfg(feature = "serde")]
mod serde_steps {
    use serde::de::{Error, SeqAccess, Visitor};
    use serde::ser::SerializeTuple;
    use serde::{Deserializer, Serializer};

    pub fn serialize<S: Serializer, const N: usize>(
        value: &[f32; N],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(N)?;
        for v in value {
            tuple.serialize_element(v)?;
        }
        tuple.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>, const N: usize>(
        deserializer: D,
    ) -> Result<[f32; N], D::Error> {
        struct StepsVisitor<const N: usize>;

        impl<'de, const N: usize> Visitor<'de> for StepsVisitor<N> {
            type Value = [f32; N];

            fn expecting(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{} axis scales", N)
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
                let mut out = [0.0f32; N];
                for (i, slot) in out.iter_mut().enumerate() {
                    *slot = seq
                        .next_element()?
                        .ok_or_else(|| A::Error::invalid_length(i, &self))?;
                }
                Ok(out)
            }
        }

        deserializer.deserialize_tuple(N, StepsVisitor::<N>)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_letters() {
        assert_eq!(axis_letter(0), "X");
        assert_eq!(axis_letter(2), "Z");
        assert_eq!(axis_letter(5), "C");
        assert_eq!(axis_letter(6), "?");
    }

    #[test]
    fn test_scale_rejects_invalid() {
        let settings = AxisSettings::new([80.0, 0.0, -5.0, f32::NAN]);
        assert_eq!(settings.scale(0), Some(80.0));
        assert_eq!(settings.scale(1), None);
        assert_eq!(settings.scale(2), None);
        assert_eq!(settings.scale(3), None);
        assert_eq!(settings.scale(4), None);
    }

    #[test]
    fn test_uniform() {
        let settings = AxisSettings::<3>::uniform(250.0);
        assert_eq!(settings.steps_per_mm, [250.0; 3]);
    }
}
