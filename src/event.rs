//! External reconfiguration events
//!
//! Events are produced by the transport adapters (see [`crate::topics`]),
//! queued on an [`EventChannel`] and consumed once by a
//! [`Surface`](crate::Surface).

use alloc::string::String;

use crate::channel::{Channel, Receiver, Sender};

/// Logical script channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    /// Started as soon as it is installed. The panel configuration also
    /// lives in this slot.
    Init,
    /// Held until a trigger edge starts it
    Event,
}

impl Slot {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Event => "event",
        }
    }
}

/// A reconfiguration request from outside the render loop
#[derive(Debug, Clone, PartialEq)]
pub enum ExternalEvent {
    /// New script text for a slot
    ScriptReplaced { slot: Slot, text: String },
    /// New visible strip length
    LengthChanged(i32),
    /// New strip brightness (0.0-1.0)
    BrightnessChanged(f32),
    /// Raw value of the trigger channel
    TriggerEdge(String),
    /// Panel: new turnout state
    NamedStateChanged(String),
    /// Panel: block occupancy changed
    BlockActivityChanged { name: String, active: bool },
}

impl ExternalEvent {
    /// Short name used in logs and diagnostics
    pub const fn name(&self) -> &'static str {
        match self {
            Self::ScriptReplaced { .. } => "script",
            Self::LengthChanged(_) => "length",
            Self::BrightnessChanged(_) => "brightness",
            Self::TriggerEdge(_) => "trigger",
            Self::NamedStateChanged(_) => "state",
            Self::BlockActivityChanged { .. } => "block",
        }
    }
}

/// What applying an event changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// A new program was parsed and installed
    Installed,
    /// Same value as before; nothing changed
    Unchanged,
    /// A scalar setting was updated
    Updated,
    /// The event program was (re)started
    Started,
    /// The panel was redrawn
    Rendered,
}

/// Type alias for event sender
pub type EventSender<'a, const SIZE: usize> = Sender<'a, ExternalEvent, SIZE>;

/// Type alias for event receiver
pub type EventReceiver<'a, const SIZE: usize> = Receiver<'a, ExternalEvent, SIZE>;

/// Type alias for the event channel
pub type EventChannel<const SIZE: usize> = Channel<ExternalEvent, SIZE>;
