//! De-duplicating change dispatch.
//!
//! [`ChangeDispatcher`] owns the committed parameter vector. Every commit
//! is announced, so the committed vector doubles as the snapshot that new
//! input is compared against. On stage activity it
//! re-collects the full vector from all nine text fields and reports
//! whether listeners should hear about it. Any difference in any slot
//! counts, not only the slots of the stage that triggered the dispatch.

use tracing::debug;

use crate::parameter::PARAMETER_COUNT;
use crate::stage::ChangeEvent;
use crate::vector::{CollectError, ParameterVector};

/// What a dispatch did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Panel-level event, forwarded without touching the vector.
    Forward,
    /// A field could not be parsed; nothing changed.
    Rejected(CollectError),
    /// The collected vector equals the snapshot.
    Unchanged,
    /// A new vector was committed.
    Committed,
}

impl Outcome {
    /// Whether listeners must be notified.
    #[must_use]
    pub const fn notifies(&self) -> bool {
        matches!(self, Self::Forward | Self::Committed)
    }
}

/// Owner of the committed vector.
#[derive(Debug, Clone)]
pub struct ChangeDispatcher {
    committed: ParameterVector,
}

impl ChangeDispatcher {
    /// Start with `initial` committed.
    #[must_use]
    pub const fn new(initial: ParameterVector) -> Self {
        Self { committed: initial }
    }

    /// The live committed vector.
    #[must_use]
    pub const fn committed(&self) -> &ParameterVector {
        &self.committed
    }

    /// The last vector that was announced to listeners, or the initial
    /// or reset vector if none was announced since. Always the committed
    /// vector.
    #[must_use]
    pub const fn snapshot(&self) -> &ParameterVector {
        &self.committed
    }

    /// Handle `event` given the current text of all nine fields.
    pub fn dispatch<S: AsRef<str>>(
        &mut self,
        event: ChangeEvent,
        sources: &[S; PARAMETER_COUNT],
    ) -> Outcome {
        if event.stage().is_none() {
            return Outcome::Forward;
        }

        let collected = match ParameterVector::collect(sources) {
            Ok(vector) => vector,
            Err(err) => {
                debug!(event = %event, error = %err, "collection rejected");
                return Outcome::Rejected(err);
            }
        };

        if collected.same_as(&self.committed) {
            debug!(event = %event, "parameters unchanged, suppressed");
            return Outcome::Unchanged;
        }

        self.committed = collected;
        debug!(event = %event, parameters = ?collected.as_array(), "committed");
        Outcome::Committed
    }

    /// Overwrite the committed vector without dispatching.
    pub const fn reset(&mut self, vector: ParameterVector) {
        self.committed = vector;
    }
}
