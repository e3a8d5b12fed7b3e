//! Diagnostic reports for rejected events
//!
//! Rejected events never stop the render loop. They are queued here so the
//! transport layer can publish them for remote debugging.

use core::fmt;

use crate::channel::{Channel, Receiver, Sender};
use crate::error::ReconfigError;

/// A rejected event and the reason it was rejected
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    /// Short event name, see [`ExternalEvent::name`](crate::ExternalEvent::name)
    pub event: &'static str,
    pub error: ReconfigError,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} rejected: {}", self.event, self.error)
    }
}

/// Type alias for diagnostic sender
pub type DiagnosticSender<'a, const SIZE: usize> = Sender<'a, Diagnostic, SIZE>;

/// Type alias for diagnostic receiver
pub type DiagnosticReceiver<'a, const SIZE: usize> = Receiver<'a, Diagnostic, SIZE>;

/// Type alias for the diagnostic channel
pub type DiagnosticChannel<const SIZE: usize> = Channel<Diagnostic, SIZE>;
