//! Event pump
//!
//! Drains queued external events into a [`Surface`] between steps.

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::Surface;
use crate::diagnostics::{Diagnostic, DiagnosticSender};
use crate::event::EventReceiver;

/// Counters for one [`EventPump::pump`] call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PumpReport {
    pub applied: usize,
    pub rejected: usize,
}

impl PumpReport {
    pub const fn is_empty(&self) -> bool {
        self.applied == 0 && self.rejected == 0
    }
}

/// Applies pending events in arrival order
pub struct EventPump<'a, const EVENTS: usize, const DIAGNOSTICS: usize> {
    events: EventReceiver<'a, EVENTS>,
    diagnostics: Option<DiagnosticSender<'a, DIAGNOSTICS>>,
}

impl<'a, const EVENTS: usize, const DIAGNOSTICS: usize> EventPump<'a, EVENTS, DIAGNOSTICS> {
    /// Create a pump that only logs rejected events
    pub const fn new(events: EventReceiver<'a, EVENTS>) -> Self {
        Self {
            events,
            diagnostics: None,
        }
    }

    /// Create a pump that also reports rejected events on `diagnostics`
    pub const fn with_diagnostics(
        events: EventReceiver<'a, EVENTS>,
        diagnostics: DiagnosticSender<'a, DIAGNOSTICS>,
    ) -> Self {
        Self {
            events,
            diagnostics: Some(diagnostics),
        }
    }

    /// Process all pending events (non-blocking)
    ///
    /// A rejected event never stops the pump; the surface keeps its last
    /// good configuration.
    pub fn pump<S: Surface + ?Sized>(&mut self, surface: &mut S) -> PumpReport {
        let mut report = PumpReport::default();
        for event in self.events.drain() {
            let name = event.name();
            match surface.on_event(event) {
                Ok(_applied) => {
                    #[cfg(feature = "esp32-log")]
                    println!("[EventPump.pump] {}: {:?}", name, _applied);
                    report.applied += 1;
                }
                Err(error) => {
                    #[cfg(feature = "esp32-log")]
                    println!("[EventPump.pump] {} rejected: {}", name, error);
                    report.rejected += 1;
                    if let Some(diagnostics) = &self.diagnostics {
                        let _ = diagnostics.send_evicting(Diagnostic { event: name, error });
                    }
                }
            }
        }
        report
    }
}
