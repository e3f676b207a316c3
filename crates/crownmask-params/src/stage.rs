//! Pipeline stage identifiers and change-event identities.
//!
//! The nine parameters are partitioned into four [`Stage`]s. Each stage
//! owns one notification identity; editing any control that belongs to a
//! stage raises that stage's [`ChangeEvent`]. Two further identities,
//! [`ChangeEvent::SelectionChanged`] and [`ChangeEvent::GoPressed`], come
//! from the panel itself and carry no parameter semantics.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::parameter::Parameter;

/// Tab holding the filtering, diffusion and derivatives controls.
pub const FIRST_PARAMETER_TAB: usize = 1;

/// Tab holding the masking controls.
pub const SECOND_PARAMETER_TAB: usize = 2;

/// A pipeline stage grouping related parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Step 1: gaussian filtering.
    Filtering,
    /// Step 2: anisotropic diffusion.
    Diffusion,
    /// Step 3: gaussian derivatives.
    Derivatives,
    /// Step 4: combining derivatives into the final mask.
    Masking,
}

impl Stage {
    /// All stages in pipeline order.
    pub const ALL: [Self; 4] = [
        Self::Filtering,
        Self::Diffusion,
        Self::Derivatives,
        Self::Masking,
    ];

    /// Display label, numbered by pipeline step.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Filtering => "1. Filtering",
            Self::Diffusion => "2. Anisotropic diffusion",
            Self::Derivatives => "3. Derivatives calculation",
            Self::Masking => "4. Masking",
        }
    }

    /// Parameters owned by this stage, in vector order.
    #[must_use]
    pub const fn parameters(self) -> &'static [Parameter] {
        match self {
            Self::Filtering => &[Parameter::SigmaFilter],
            Self::Diffusion => &[Parameter::NIterDiffusion, Parameter::KappaDiffusion],
            Self::Derivatives => &[Parameter::SigmaGradient],
            Self::Masking => &[
                Parameter::Gamma,
                Parameter::Alpha,
                Parameter::Beta,
                Parameter::Epsilon,
                Parameter::Delta,
            ],
        }
    }

    /// Index of the panel tab showing this stage's controls.
    #[must_use]
    pub const fn tab(self) -> usize {
        match self {
            Self::Filtering | Self::Diffusion | Self::Derivatives => FIRST_PARAMETER_TAB,
            Self::Masking => SECOND_PARAMETER_TAB,
        }
    }

    /// Stages whose controls are on tab `tab`, in pipeline order. Empty
    /// for tabs without parameters.
    pub fn on_tab(tab: usize) -> impl Iterator<Item = Self> {
        Self::ALL.into_iter().filter(move |stage| stage.tab() == tab)
    }

    /// The notification identity raised when this stage's controls change.
    #[must_use]
    pub const fn event(self) -> ChangeEvent {
        match self {
            Self::Filtering => ChangeEvent::Filtering,
            Self::Diffusion => ChangeEvent::Diffusion,
            Self::Derivatives => ChangeEvent::Derivatives,
            Self::Masking => ChangeEvent::Masking,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Change notification identity delivered to listeners.
///
/// Events carry no payload. Listeners re-read the committed vector
/// (through [`ListenerContext::parameters`](crate::ListenerContext::parameters)
/// or [`ParameterPanel::parameters`](crate::ParameterPanel::parameters))
/// to observe the new values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeEvent {
    /// The gaussian filter sigma changed.
    Filtering,
    /// An anisotropic diffusion parameter changed.
    Diffusion,
    /// The gaussian derivatives sigma changed.
    Derivatives,
    /// A masking parameter changed.
    Masking,
    /// The operator switched to another tab.
    SelectionChanged,
    /// The operator asked to launch the segmentation.
    GoPressed,
}

impl ChangeEvent {
    /// All identities, ordered by [`id`](Self::id).
    pub const ALL: [Self; 6] = [
        Self::Filtering,
        Self::Diffusion,
        Self::Derivatives,
        Self::Masking,
        Self::GoPressed,
        Self::SelectionChanged,
    ];

    /// Stable numeric identifier.
    #[must_use]
    pub const fn id(self) -> u8 {
        match self {
            Self::Filtering => 0,
            Self::Diffusion => 1,
            Self::Derivatives => 2,
            Self::Masking => 3,
            Self::GoPressed => 4,
            Self::SelectionChanged => 5,
        }
    }

    /// Action command name used in logs and CLI output.
    #[must_use]
    pub const fn command(self) -> &'static str {
        match self {
            Self::Filtering => "GaussianFilteringParameterChanged",
            Self::Diffusion => "AnisotropicDiffusionParameterChanged",
            Self::Derivatives => "DerivativesParameterChanged",
            Self::Masking => "MaskingParameterChanged",
            Self::GoPressed => "GoButtonPressed",
            Self::SelectionChanged => "TabChanged",
        }
    }

    /// The stage behind a parameter event, or `None` for the two
    /// panel-level identities.
    #[must_use]
    pub const fn stage(self) -> Option<Stage> {
        match self {
            Self::Filtering => Some(Stage::Filtering),
            Self::Diffusion => Some(Stage::Diffusion),
            Self::Derivatives => Some(Stage::Derivatives),
            Self::Masking => Some(Stage::Masking),
            Self::SelectionChanged | Self::GoPressed => None,
        }
    }
}

impl fmt::Display for ChangeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.command())
    }
}
