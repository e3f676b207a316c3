//! Default parameters and the key-value settings contract.
//!
//! The segmentation pipeline exchanges its configuration as a loosely
//! typed string-keyed map. The panel owns only the nine masking
//! parameters; the rest of the map (target channel, threshold factor, ...)
//! belongs to the pipeline and is passed through from its defaults.
//!
//! [`DefaultParameters`] is the seam to that pipeline: it supplies the
//! initial vector and knows how the nine values are named in the map.
//! [`StandardDefaults`] is the stock implementation.

use serde_json::{Map, Value};

use crate::parameter::{PARAMETER_COUNT, Parameter};
use crate::vector::ParameterVector;

/// Generic settings mapping exchanged with the pipeline.
pub type SettingsMap = Map<String, Value>;

/// Errors raised while decoding parameters from a [`SettingsMap`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    /// A required key is absent.
    #[error("missing settings key {0}")]
    MissingKey(&'static str),

    /// A key is present but does not hold a number.
    #[error("settings key {key} is not a number: {value}")]
    NotANumber {
        /// The offending key.
        key: &'static str,
        /// The stored value, rendered as JSON.
        value: String,
    },
}

/// Provider of default parameters and codec for the settings map.
pub trait DefaultParameters {
    /// Initial parameter vector.
    fn default_vector(&self) -> ParameterVector;

    /// Pipeline default settings, including keys this crate does not own.
    fn default_settings(&self) -> SettingsMap;

    /// Write the nine values of `vector` into `settings`.
    fn encode(&self, vector: &ParameterVector, settings: &mut SettingsMap);

    /// Read the nine values back from `settings`.
    ///
    /// # Errors
    ///
    /// Returns a [`SettingsError`] if a key is missing or not numeric.
    fn decode(&self, settings: &SettingsMap) -> Result<ParameterVector, SettingsError>;
}

/// Key of the target channel setting.
pub const KEY_TARGET_CHANNEL: &str = "TARGET_CHANNEL";

/// Key of the threshold factor setting.
pub const KEY_THRESHOLD_FACTOR: &str = "THRESHOLD_FACTOR";

/// Default value for each parameter, in vector order.
pub const DEFAULT_MASKING_PARAMETERS: [f64; PARAMETER_COUNT] =
    [2.0, 3.0, 50.0, 2.0, 0.0, 5.0, 2.0, 2.0, 1.0];

const DEFAULT_TARGET_CHANNEL: u64 = 1;
const DEFAULT_THRESHOLD_FACTOR: f64 = 1.6;

/// Stock defaults and key names.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardDefaults;

impl StandardDefaults {
    /// Settings key for one parameter.
    #[must_use]
    pub const fn key(parameter: Parameter) -> &'static str {
        match parameter {
            Parameter::SigmaFilter => "SIGMA_FILTER",
            Parameter::NIterDiffusion => "N_ITER_DIFFUSION",
            Parameter::KappaDiffusion => "KAPPA_DIFFUSION",
            Parameter::SigmaGradient => "SIGMA_GRADIENT",
            Parameter::Gamma => "GAMMA",
            Parameter::Alpha => "ALPHA",
            Parameter::Beta => "BETA",
            Parameter::Epsilon => "EPSILON",
            Parameter::Delta => "DELTA",
        }
    }
}

impl DefaultParameters for StandardDefaults {
    fn default_vector(&self) -> ParameterVector {
        ParameterVector::new(DEFAULT_MASKING_PARAMETERS)
    }

    fn default_settings(&self) -> SettingsMap {
        let mut settings = SettingsMap::new();
        settings.insert(
            KEY_TARGET_CHANNEL.to_owned(),
            Value::from(DEFAULT_TARGET_CHANNEL),
        );
        settings.insert(
            KEY_THRESHOLD_FACTOR.to_owned(),
            Value::from(DEFAULT_THRESHOLD_FACTOR),
        );
        self.encode(&self.default_vector(), &mut settings);
        settings
    }

    fn encode(&self, vector: &ParameterVector, settings: &mut SettingsMap) {
        for (parameter, value) in vector.iter() {
            // Non-finite values have no JSON representation and are stored as null.
            settings.insert(Self::key(parameter).to_owned(), Value::from(value));
        }
    }

    fn decode(&self, settings: &SettingsMap) -> Result<ParameterVector, SettingsError> {
        let mut vector = self.default_vector();
        for parameter in Parameter::ALL {
            let key = Self::key(parameter);
            let value = settings.get(key).ok_or(SettingsError::MissingKey(key))?;
            let number = value.as_f64().ok_or_else(|| SettingsError::NotANumber {
                key,
                value: value.to_string(),
            })?;
            vector.set(parameter, number);
        }
        Ok(vector)
    }
}
