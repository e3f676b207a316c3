//! The nine semantic parameter roles.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::control::ControlSpec;
use crate::stage::Stage;

/// Number of slots in a [`ParameterVector`](crate::ParameterVector).
pub const PARAMETER_COUNT: usize = 9;

/// Common scale for the continuous parameters (one decimal of resolution).
const DECIMAL_SCALE: i32 = 10;

/// A named slot of the parameter vector.
///
/// Variants are declared in vector order; [`index`](Self::index) is the
/// slot each one occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Parameter {
    /// σ of the gaussian filter (step 1).
    SigmaFilter,
    /// Number of anisotropic diffusion iterations (step 2). Integer valued.
    NIterDiffusion,
    /// κ, the gradient threshold of the anisotropic diffusion (step 2).
    KappaDiffusion,
    /// σ of the gaussian derivatives (step 3).
    SigmaGradient,
    /// γ, the *tanh* shift (step 4).
    Gamma,
    /// α, the gradient prefactor (step 4).
    Alpha,
    /// β, the positive laplacian magnitude prefactor (step 4).
    Beta,
    /// ε, the negative hessian magnitude prefactor (step 4).
    Epsilon,
    /// δ, the derivatives sum scale (step 4).
    Delta,
}

impl Parameter {
    /// All parameters in vector order.
    pub const ALL: [Self; PARAMETER_COUNT] = [
        Self::SigmaFilter,
        Self::NIterDiffusion,
        Self::KappaDiffusion,
        Self::SigmaGradient,
        Self::Gamma,
        Self::Alpha,
        Self::Beta,
        Self::Epsilon,
        Self::Delta,
    ];

    /// Slot of this parameter in the vector.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Parameter at `index`, or `None` past the last slot.
    #[must_use]
    pub const fn from_index(index: usize) -> Option<Self> {
        if index < PARAMETER_COUNT {
            Some(Self::ALL[index])
        } else {
            None
        }
    }

    /// Identifier used in scripts and logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::SigmaFilter => "sigma_filter",
            Self::NIterDiffusion => "n_iter_diffusion",
            Self::KappaDiffusion => "kappa_diffusion",
            Self::SigmaGradient => "sigma_gradient",
            Self::Gamma => "gamma",
            Self::Alpha => "alpha",
            Self::Beta => "beta",
            Self::Epsilon => "epsilon",
            Self::Delta => "delta",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::SigmaFilter => "Gaussian filter \u{03C3}",
            Self::NIterDiffusion => "Number of iterations",
            Self::KappaDiffusion => "Gradient diffusion threshold \u{03BA}",
            Self::SigmaGradient => "Gaussian gradient \u{03C3}",
            Self::Gamma => "\u{03B3}: tanh shift",
            Self::Alpha => "\u{03B1}: gradient prefactor",
            Self::Beta => "\u{03B2}: positive laplacian magnitude prefactor",
            Self::Epsilon => "\u{03B5}: negative hessian magnitude",
            Self::Delta => "\u{03B4}: derivatives sum scale",
        }
    }

    /// The stage whose notification this parameter raises.
    #[must_use]
    pub const fn stage(self) -> Stage {
        match self {
            Self::SigmaFilter => Stage::Filtering,
            Self::NIterDiffusion | Self::KappaDiffusion => Stage::Diffusion,
            Self::SigmaGradient => Stage::Derivatives,
            Self::Gamma | Self::Alpha | Self::Beta | Self::Epsilon | Self::Delta => Stage::Masking,
        }
    }

    /// Whether the value is truncated to an integer on collection.
    #[must_use]
    pub const fn is_integral(self) -> bool {
        matches!(self, Self::NIterDiffusion)
    }

    /// Range and quantization of the bounded control for this parameter.
    #[must_use]
    pub const fn control_spec(self) -> ControlSpec {
        match self {
            Self::SigmaFilter | Self::SigmaGradient | Self::Delta => {
                ControlSpec::new(0, 5 * DECIMAL_SCALE, DECIMAL_SCALE)
            }
            Self::NIterDiffusion => ControlSpec::new(1, 10, 1),
            Self::KappaDiffusion => ControlSpec::new(1, 100, 1),
            Self::Gamma => ControlSpec::new(-5 * DECIMAL_SCALE, 5 * DECIMAL_SCALE, DECIMAL_SCALE),
            Self::Alpha | Self::Beta | Self::Epsilon => {
                ControlSpec::new(0, 20 * DECIMAL_SCALE, DECIMAL_SCALE)
            }
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
