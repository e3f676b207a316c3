//! crownmask-params: parameter synchronization and change dispatch (sans-IO).
//!
//! Keeps the nine masking parameters of the nuclei segmentation pipeline
//! consistent across their slider and text representations, and tells
//! subscribers when the committed vector actually changes:
//!
//! control sync -> collect -> compare to snapshot -> commit -> fan-out
//!
//! Malformed input never surfaces as an error. It is ignored, and the
//! committed vector stays where it was.
//!
//! This crate has **no I/O dependencies**. The pipeline itself, its
//! settings persistence and any rendering of the panel live elsewhere.

pub mod control;
pub mod dispatch;
pub mod listener;
pub mod panel;
pub mod parameter;
pub mod settings;
pub mod stage;
pub mod vector;

pub use control::{ControlSpec, ScaledControl};
pub use dispatch::{ChangeDispatcher, Outcome};
pub use listener::{ChangeListener, Edit, ListenerContext, ListenerRegistry};
pub use panel::{DurationEstimator, ParameterPanel};
pub use parameter::{PARAMETER_COUNT, Parameter};
pub use settings::{DefaultParameters, SettingsError, SettingsMap, StandardDefaults};
pub use stage::{ChangeEvent, FIRST_PARAMETER_TAB, SECOND_PARAMETER_TAB, Stage};
pub use vector::{CollectError, ParameterVector};
