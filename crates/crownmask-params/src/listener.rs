//! Change listeners and their registry.
//!
//! Listeners are shared handles (`Rc<dyn ChangeListener>`); the handle
//! returned to the caller is the identity used by
//! [`ListenerRegistry::remove`]. Fan-out is synchronous and follows
//! registration order.
//!
//! A listener cannot borrow the panel while it is being notified. Edits
//! it wants to make in response are queued on the [`ListenerContext`]
//! and applied by the panel once the fan-out is complete.

use std::fmt;
use std::rc::Rc;

use tracing::debug;

use crate::parameter::Parameter;
use crate::stage::ChangeEvent;
use crate::vector::ParameterVector;

/// An operator edit, either direct or queued by a listener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    /// Move a slider to a bounded position.
    Slide {
        /// Target control.
        parameter: Parameter,
        /// New bounded position.
        position: i32,
    },
    /// Type into a text field.
    Type {
        /// Target control.
        parameter: Parameter,
        /// Full field content after the keystroke.
        text: String,
    },
    /// Switch to another tab.
    Select {
        /// New tab index.
        tab: usize,
    },
    /// Press the go button.
    Go,
}

/// View handed to a listener during fan-out.
pub struct ListenerContext<'a> {
    parameters: &'a ParameterVector,
    selected_tab: usize,
    queued: &'a mut Vec<Edit>,
}

impl<'a> ListenerContext<'a> {
    pub(crate) const fn new(
        parameters: &'a ParameterVector,
        selected_tab: usize,
        queued: &'a mut Vec<Edit>,
    ) -> Self {
        Self {
            parameters,
            selected_tab,
            queued,
        }
    }

    /// The committed vector at the time of the notification.
    #[must_use]
    pub const fn parameters(&self) -> &ParameterVector {
        self.parameters
    }

    /// Index of the tab shown at the time of the notification.
    ///
    /// Compare with [`Stage::tab`](crate::Stage::tab) or the parameter tab
    /// constants to tell whether parameters are on screen.
    #[must_use]
    pub const fn selected_index(&self) -> usize {
        self.selected_tab
    }

    /// Queue a slider move.
    pub fn move_slider(&mut self, parameter: Parameter, position: i32) {
        self.queued.push(Edit::Slide {
            parameter,
            position,
        });
    }

    /// Queue typed text.
    pub fn type_text(&mut self, parameter: Parameter, text: impl Into<String>) {
        self.queued.push(Edit::Type {
            parameter,
            text: text.into(),
        });
    }

    /// Queue a tab switch.
    pub fn select_tab(&mut self, tab: usize) {
        self.queued.push(Edit::Select { tab });
    }

    /// Queue a go-button press.
    pub fn press_go(&mut self) {
        self.queued.push(Edit::Go);
    }
}

/// Subscriber to panel change notifications.
pub trait ChangeListener {
    /// Called once per dispatched event.
    fn on_change(&self, event: ChangeEvent, ctx: &mut ListenerContext<'_>);
}

impl<F> ChangeListener for F
where
    F: Fn(ChangeEvent, &mut ListenerContext<'_>),
{
    fn on_change(&self, event: ChangeEvent, ctx: &mut ListenerContext<'_>) {
        self(event, ctx);
    }
}

/// Ordered collection of listeners.
#[derive(Default, Clone)]
pub struct ListenerRegistry {
    listeners: Vec<Rc<dyn ChangeListener>>,
}

impl ListenerRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a listener. The same handle may be registered more than once.
    pub fn add(&mut self, listener: Rc<dyn ChangeListener>) {
        self.listeners.push(listener);
    }

    /// Remove the first registration of `listener`.
    ///
    /// Handles are compared by allocation address. Returns `true` if a
    /// registration was removed.
    pub fn remove(&mut self, listener: &Rc<dyn ChangeListener>) -> bool {
        let found = self
            .listeners
            .iter()
            .position(|l| std::ptr::addr_eq(Rc::as_ptr(l), Rc::as_ptr(listener)));
        found.is_some_and(|i| {
            self.listeners.remove(i);
            true
        })
    }

    /// Registered listeners in notification order.
    #[must_use]
    pub fn list(&self) -> &[Rc<dyn ChangeListener>] {
        &self.listeners
    }

    /// Number of registrations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Whether no listener is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Notify every listener of `event`, in registration order.
    pub fn fan_out(&self, event: ChangeEvent, ctx: &mut ListenerContext<'_>) {
        debug!(event = %event, listeners = self.listeners.len(), "fan-out");
        for listener in &self.listeners {
            listener.on_change(event, ctx);
        }
    }
}

impl fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("len", &self.listeners.len())
            .finish()
    }
}
