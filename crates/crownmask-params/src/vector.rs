//! The nine-slot parameter vector and its collection from text fields.

use std::ops::Index;

use serde::{Deserialize, Serialize};

use crate::parameter::{PARAMETER_COUNT, Parameter};
use crate::settings::{DefaultParameters, SettingsError, SettingsMap};

/// Errors raised while collecting a vector from text sources.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CollectError {
    /// A field did not hold a parseable number.
    #[error("{parameter} field does not hold a number: {text:?}")]
    Parse {
        /// The slot whose text failed to parse.
        parameter: Parameter,
        /// The offending text.
        text: String,
    },
}

/// Ordered parameter values, one per [`Parameter`].
///
/// Serializes as a plain 9-element array in vector order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParameterVector([f64; PARAMETER_COUNT]);

impl ParameterVector {
    /// Wrap raw values given in vector order.
    #[must_use]
    pub const fn new(values: [f64; PARAMETER_COUNT]) -> Self {
        Self(values)
    }

    /// Parse one value per parameter from text sources in vector order.
    ///
    /// Leading and trailing whitespace is ignored. The iteration count is
    /// truncated toward zero. Parsing stops at the first field that is not
    /// a number; no partial vector is ever produced.
    ///
    /// # Errors
    ///
    /// Returns [`CollectError::Parse`] naming the first unparseable field.
    pub fn collect<S: AsRef<str>>(sources: &[S; PARAMETER_COUNT]) -> Result<Self, CollectError> {
        let mut values = [0.0; PARAMETER_COUNT];
        for (parameter, source) in Parameter::ALL.into_iter().zip(sources) {
            let text = source.as_ref();
            let value = text
                .trim()
                .parse::<f64>()
                .map_err(|_| CollectError::Parse {
                    parameter,
                    text: text.to_owned(),
                })?;
            values[parameter.index()] = if parameter.is_integral() {
                value.trunc()
            } else {
                value
            };
        }
        Ok(Self(values))
    }

    /// Value of one parameter.
    #[must_use]
    pub const fn get(&self, parameter: Parameter) -> f64 {
        self.0[parameter.index()]
    }

    /// Overwrite one parameter.
    pub const fn set(&mut self, parameter: Parameter, value: f64) {
        self.0[parameter.index()] = value;
    }

    /// All values in vector order.
    #[must_use]
    pub const fn as_array(&self) -> &[f64; PARAMETER_COUNT] {
        &self.0
    }

    /// `(parameter, value)` pairs in vector order.
    pub fn iter(&self) -> impl Iterator<Item = (Parameter, f64)> + '_ {
        Parameter::ALL.into_iter().zip(self.0.iter().copied())
    }

    /// Exact slot-by-slot comparison on the bit patterns.
    ///
    /// Unlike `==`, a `NaN` slot equals itself and `-0.0` differs from
    /// `0.0`.
    #[must_use]
    pub fn same_as(&self, other: &Self) -> bool {
        self.0
            .iter()
            .zip(&other.0)
            .all(|(a, b)| a.to_bits() == b.to_bits())
    }

    /// Encode into a settings map through `codec`, starting from the
    /// codec's defaults.
    #[must_use]
    pub fn to_settings_map(&self, codec: &dyn DefaultParameters) -> SettingsMap {
        let mut settings = codec.default_settings();
        codec.encode(self, &mut settings);
        settings
    }

    /// Decode from a settings map through `codec`.
    ///
    /// # Errors
    ///
    /// Propagates the codec's [`SettingsError`].
    pub fn from_settings_map(
        settings: &SettingsMap,
        codec: &dyn DefaultParameters,
    ) -> Result<Self, SettingsError> {
        codec.decode(settings)
    }
}

impl From<[f64; PARAMETER_COUNT]> for ParameterVector {
    fn from(values: [f64; PARAMETER_COUNT]) -> Self {
        Self(values)
    }
}

impl Index<Parameter> for ParameterVector {
    type Output = f64;

    fn index(&self, parameter: Parameter) -> &f64 {
        &self.0[parameter.index()]
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::settings::StandardDefaults;

    const DEFAULTS: [f64; PARAMETER_COUNT] = [2.0, 3.0, 50.0, 2.0, 0.0, 5.0, 2.0, 2.0, 1.0];

    fn texts(values: [&str; PARAMETER_COUNT]) -> [String; PARAMETER_COUNT] {
        values.map(str::to_owned)
    }

    #[test]
    fn collect_parses_in_order() {
        let sources = texts(["2.5", "3", "50", "2", "-1.5", "5", "2", "2", "1"]);
        let vector = ParameterVector::collect(&sources).unwrap();
        assert_eq!(
            vector.as_array(),
            &[2.5, 3.0, 50.0, 2.0, -1.5, 5.0, 2.0, 2.0, 1.0]
        );
    }

    #[test]
    fn collect_truncates_iteration_count_toward_zero() {
        let sources = ["2", "3.9", "50", "2", "0", "5", "2", "2", "1"];
        let vector = ParameterVector::collect(&sources).unwrap();
        assert!((vector[Parameter::NIterDiffusion] - 3.0).abs() < f64::EPSILON);

        let sources = ["2", "-2.7", "50", "2", "0", "5", "2", "2", "1"];
        let vector = ParameterVector::collect(&sources).unwrap();
        assert!((vector[Parameter::NIterDiffusion] + 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn collect_does_not_truncate_other_slots() {
        let sources = ["2.7", "3", "50.5", "2", "0", "5", "2", "2", "1"];
        let vector = ParameterVector::collect(&sources).unwrap();
        assert!((vector[Parameter::SigmaFilter] - 2.7).abs() < f64::EPSILON);
        assert!((vector[Parameter::KappaDiffusion] - 50.5).abs() < f64::EPSILON);
    }

    #[test]
    fn collect_ignores_surrounding_whitespace() {
        let sources = [" 2 ", "3", "50", "2", "0", "5", "2", "2", "1\t"];
        let vector = ParameterVector::collect(&sources).unwrap();
        assert_eq!(vector.as_array(), &DEFAULTS);
    }

    #[test]
    fn collect_reports_first_malformed_field() {
        let sources = ["2", "3", "50", "oops", "0", "5", "bad", "2", "1"];
        let err = ParameterVector::collect(&sources).unwrap_err();
        assert_eq!(
            err,
            CollectError::Parse {
                parameter: Parameter::SigmaGradient,
                text: "oops".to_owned(),
            }
        );
    }

    #[test]
    fn collect_fails_for_every_slot() {
        for k in 0..PARAMETER_COUNT {
            let mut sources = ["2", "3", "50", "2", "0", "5", "2", "2", "1"];
            sources[k] = "";
            let err = ParameterVector::collect(&sources).unwrap_err();
            let CollectError::Parse { parameter, .. } = err;
            assert_eq!(parameter.index(), k);
        }
    }

    #[test]
    fn parse_error_display() {
        let err = CollectError::Parse {
            parameter: Parameter::Gamma,
            text: "x".to_owned(),
        };
        assert_eq!(err.to_string(), "gamma field does not hold a number: \"x\"");
    }

    #[test]
    fn same_as_is_bitwise() {
        let a = ParameterVector::new(DEFAULTS);
        let mut b = a;
        assert!(a.same_as(&b));

        b.set(Parameter::Gamma, -0.0);
        assert!(!a.same_as(&b), "-0.0 must differ from 0.0");

        let mut c = a;
        c.set(Parameter::Beta, f64::NAN);
        assert!(c.same_as(&c), "NaN slot must equal itself");
    }

    #[test]
    fn get_set_and_index_agree() {
        let mut vector = ParameterVector::new(DEFAULTS);
        vector.set(Parameter::Delta, 4.5);
        assert!((vector.get(Parameter::Delta) - 4.5).abs() < f64::EPSILON);
        assert!((vector[Parameter::Delta] - 4.5).abs() < f64::EPSILON);
    }

    #[test]
    fn iter_pairs_names_with_values() {
        let vector = ParameterVector::new(DEFAULTS);
        let pairs: Vec<_> = vector.iter().collect();
        assert_eq!(pairs.len(), PARAMETER_COUNT);
        assert_eq!(pairs[2], (Parameter::KappaDiffusion, 50.0));
    }

    #[test]
    fn settings_map_round_trip() {
        let codec = StandardDefaults;
        let vector = ParameterVector::new([1.5, 7.0, 12.0, 0.3, -2.5, 11.0, 0.0, 19.9, 4.4]);
        let settings = vector.to_settings_map(&codec);
        let decoded = ParameterVector::from_settings_map(&settings, &codec).unwrap();
        assert!(decoded.same_as(&vector));
    }

    #[test]
    fn serializes_as_array() {
        let vector = ParameterVector::new(DEFAULTS);
        let json = serde_json::to_string(&vector).unwrap();
        assert_eq!(json, "[2.0,3.0,50.0,2.0,0.0,5.0,2.0,2.0,1.0]");
        let back: ParameterVector = serde_json::from_str(&json).unwrap();
        assert_eq!(back, vector);
    }
}
