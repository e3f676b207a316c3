//! The parameter panel: controls, dispatch and listeners wired together.
//!
//! [`ParameterPanel`] is the composition root. Every operator input goes
//! through the same path:
//!
//! ```text
//! edit -> control sync -> collect all nine fields -> compare to snapshot
//!      -> (commit) -> fan-out -> queued write-backs
//! ```
//!
//! Slider moves and keystrokes raise the event of the stage that owns the
//! edited parameter. Tab switches and the go button raise their own
//! events and never touch the vector.

use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

use tracing::{debug, warn};

use crate::control::ScaledControl;
use crate::dispatch::ChangeDispatcher;
use crate::listener::{ChangeListener, Edit, ListenerContext, ListenerRegistry};
use crate::parameter::{PARAMETER_COUNT, Parameter};
use crate::settings::{DefaultParameters, SettingsMap, StandardDefaults};
use crate::stage::ChangeEvent;
use crate::vector::{CollectError, ParameterVector};

/// Label shown before any duration estimate is available.
pub const NO_ESTIMATE_LABEL: &str = "Tune parameters to get a duration estimate";

/// External estimate of how long the pipeline will run.
pub trait DurationEstimator {
    /// Estimated processing time for `parameters`, in minutes.
    fn estimate_minutes(&self, parameters: &ParameterVector) -> f64;
}

impl<F> DurationEstimator for F
where
    F: Fn(&ParameterVector) -> f64,
{
    fn estimate_minutes(&self, parameters: &ParameterVector) -> f64 {
        self(parameters)
    }
}

/// Configuration panel state for the nine masking parameters.
pub struct ParameterPanel {
    title: String,
    controls: [ScaledControl; PARAMETER_COUNT],
    dispatcher: ChangeDispatcher,
    listeners: ListenerRegistry,
    defaults: Box<dyn DefaultParameters>,
    selected_tab: usize,
    duration_label: String,
}

impl ParameterPanel {
    /// Build a panel for the image titled `title`, initialized from
    /// `defaults`.
    pub fn new(title: impl Into<String>, defaults: impl DefaultParameters + 'static) -> Self {
        let initial = defaults.default_vector();
        let controls = controls_showing(&initial);
        let committed = read_back(&controls).unwrap_or(initial);
        Self {
            title: title.into(),
            controls,
            dispatcher: ChangeDispatcher::new(committed),
            listeners: ListenerRegistry::new(),
            defaults: Box::new(defaults),
            selected_tab: 0,
            duration_label: NO_ESTIMATE_LABEL.to_owned(),
        }
    }

    /// Build a panel using [`StandardDefaults`].
    pub fn with_standard_defaults(title: impl Into<String>) -> Self {
        Self::new(title, StandardDefaults)
    }

    // ── Listeners ────────────────────────────────────────────────────

    /// Register a listener. Keep a clone of the handle to remove it later.
    pub fn add_listener(&mut self, listener: Rc<dyn ChangeListener>) {
        self.listeners.add(listener);
    }

    /// Unregister the first registration of `listener`.
    pub fn remove_listener(&mut self, listener: &Rc<dyn ChangeListener>) -> bool {
        self.listeners.remove(listener)
    }

    /// Registered listeners in notification order.
    #[must_use]
    pub fn listeners(&self) -> &[Rc<dyn ChangeListener>] {
        self.listeners.list()
    }

    // ── Read access ──────────────────────────────────────────────────

    /// The live committed vector.
    #[must_use]
    pub const fn parameters(&self) -> &ParameterVector {
        self.dispatcher.committed()
    }

    /// The control bound to `parameter`.
    #[must_use]
    pub const fn control(&self, parameter: Parameter) -> &ScaledControl {
        &self.controls[parameter.index()]
    }

    /// All controls in vector order.
    #[must_use]
    pub const fn controls(&self) -> &[ScaledControl; PARAMETER_COUNT] {
        &self.controls
    }

    /// Title of the target image.
    #[must_use]
    pub fn target_title(&self) -> &str {
        &self.title
    }

    /// Index of the selected tab.
    #[must_use]
    pub const fn selected_index(&self) -> usize {
        self.selected_tab
    }

    /// Current duration estimate label.
    #[must_use]
    pub fn duration_label(&self) -> &str {
        &self.duration_label
    }

    // ── Operator input ───────────────────────────────────────────────

    /// Move the slider of `parameter`. Nothing fires if it does not move.
    pub fn move_slider(&mut self, parameter: Parameter, position: i32) {
        self.apply(Edit::Slide {
            parameter,
            position,
        });
    }

    /// Replace the text field content of `parameter`, as on key release.
    pub fn type_text(&mut self, parameter: Parameter, text: impl Into<String>) {
        self.apply(Edit::Type {
            parameter,
            text: text.into(),
        });
    }

    /// Switch to tab `index`. Nothing fires if it is already selected.
    pub fn select_tab(&mut self, index: usize) {
        self.apply(Edit::Select { tab: index });
    }

    /// Press the go button.
    pub fn press_go(&mut self) {
        self.apply(Edit::Go);
    }

    /// Apply an edit, then every write-back queued by listeners, in order.
    ///
    /// Write-backs go through the same path as operator input, so one
    /// that reproduces the committed vector fires nothing.
    pub fn apply(&mut self, edit: Edit) {
        let mut pending = VecDeque::from([edit]);
        while let Some(edit) = pending.pop_front() {
            if let Some(event) = self.apply_one(edit) {
                pending.extend(self.notify(event));
            }
        }
    }

    fn apply_one(&mut self, edit: Edit) -> Option<ChangeEvent> {
        match edit {
            Edit::Slide {
                parameter,
                position,
            } => {
                if !self.controls[parameter.index()].set_from_bounded(position) {
                    return None;
                }
                self.stage_activity(parameter.stage().event())
            }
            Edit::Type { parameter, text } => {
                self.controls[parameter.index()].set_from_text(&text);
                self.stage_activity(parameter.stage().event())
            }
            Edit::Select { tab } => {
                if tab == self.selected_tab {
                    return None;
                }
                self.selected_tab = tab;
                self.stage_activity(ChangeEvent::SelectionChanged)
            }
            Edit::Go => self.stage_activity(ChangeEvent::GoPressed),
        }
    }

    fn stage_activity(&mut self, event: ChangeEvent) -> Option<ChangeEvent> {
        self.dispatcher
            .dispatch(event, &field_texts(&self.controls))
            .notifies()
            .then_some(event)
    }

    fn notify(&self, event: ChangeEvent) -> Vec<Edit> {
        let mut queued = Vec::new();
        let mut ctx = ListenerContext::new(
            self.dispatcher.committed(),
            self.selected_tab,
            &mut queued,
        );
        self.listeners.fan_out(event, &mut ctx);
        if !queued.is_empty() {
            debug!(event = %event, write_backs = queued.len(), "listeners queued edits");
        }
        queued
    }

    // ── Settings ─────────────────────────────────────────────────────

    /// Pipeline settings with the committed vector encoded.
    #[must_use]
    pub fn settings(&self) -> SettingsMap {
        self.parameters().to_settings_map(self.defaults.as_ref())
    }

    /// Hard reset from a settings map.
    ///
    /// On success every control is overwritten and the committed vector
    /// becomes what the reset fields read back as, so off-grid values are
    /// held at display precision and the iteration count is truncated. No
    /// listener is notified. A map that cannot be decoded changes nothing;
    /// the return value reports which happened.
    pub fn set_settings(&mut self, settings: &SettingsMap) -> bool {
        let decoded = ParameterVector::from_settings_map(settings, self.defaults.as_ref());
        let vector = match decoded {
            Ok(vector) => vector,
            Err(err) => {
                warn!(error = %err, "settings ignored");
                return false;
            }
        };
        let controls = controls_showing(&vector);
        match read_back(&controls) {
            Ok(committed) => {
                self.controls = controls;
                self.dispatcher.reset(committed);
                debug!(parameters = ?committed.as_array(), "settings applied");
                true
            }
            Err(err) => {
                warn!(error = %err, "settings ignored");
                false
            }
        }
    }

    // ── Duration estimate ────────────────────────────────────────────

    /// Show an externally computed duration estimate.
    pub fn set_duration_estimate(&mut self, minutes: f64) {
        self.duration_label = format!("Processing duration estimate: {minutes:.0} min.");
    }

    /// Estimate the duration for the committed vector and show it.
    pub fn estimate_duration<E: DurationEstimator + ?Sized>(&mut self, estimator: &E) -> f64 {
        let minutes = estimator.estimate_minutes(self.parameters());
        self.set_duration_estimate(minutes);
        minutes
    }
}

/// One control per parameter, each showing its slot of `vector`.
fn controls_showing(vector: &ParameterVector) -> [ScaledControl; PARAMETER_COUNT] {
    Parameter::ALL.map(|p| ScaledControl::new(p.control_spec(), vector[p]))
}

fn field_texts(controls: &[ScaledControl; PARAMETER_COUNT]) -> [&str; PARAMETER_COUNT] {
    std::array::from_fn(|i| controls[i].text())
}

/// The vector a dispatch would collect from `controls`.
fn read_back(
    controls: &[ScaledControl; PARAMETER_COUNT],
) -> Result<ParameterVector, CollectError> {
    ParameterVector::collect(&field_texts(controls))
}

impl fmt::Debug for ParameterPanel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParameterPanel")
            .field("title", &self.title)
            .field("controls", &self.controls)
            .field("dispatcher", &self.dispatcher)
            .field("listeners", &self.listeners)
            .field("selected_tab", &self.selected_tab)
            .field("duration_label", &self.duration_label)
            .finish_non_exhaustive()
    }
}
