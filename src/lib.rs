#![no_std]

extern crate alloc;

pub mod buffer;
pub mod channel;
pub mod color;
pub mod coordinator;
pub mod diagnostics;
pub mod error;
pub mod event;
pub mod event_pump;
pub mod frame_scheduler;
pub mod math8;
pub mod nvm;
pub mod panel;
pub mod script;
pub mod stepper;
pub mod topics;

pub use buffer::PixelBuffer;
pub use coordinator::{Coordinator, StripConfig};
pub use diagnostics::{Diagnostic, DiagnosticChannel, DiagnosticReceiver, DiagnosticSender};
pub use error::{BindingError, ConfigError, ParseError, ParseErrorKind, ReconfigError};
pub use event::{Applied, EventChannel, EventReceiver, EventSender, ExternalEvent, Slot};
pub use event_pump::{EventPump, PumpReport};
pub use frame_scheduler::{FrameResult, FrameScheduler};
pub use panel::{PanelCoordinator, TextRenderer};
pub use script::{Instruction, Pattern, PatternRun, Program, SlideDirection};
pub use stepper::{Step, Stepper, StepperState};
pub use topics::{TopicConfig, TopicRouter, Variant};

pub use color::Rgb;
pub use embassy_time::{Duration, Instant};

/// Abstract LED driver trait
///
/// Implement this trait to support different hardware platforms.
/// The frame scheduler is generic over this trait.
pub trait OutputDriver {
    /// Write colors to the LED strip or panel
    fn write(&mut self, colors: &[Rgb]);
}

/// Something that accepts reconfiguration events and produces frames
///
/// Implemented by the strip [`Coordinator`] and the [`PanelCoordinator`].
pub trait Surface {
    /// Apply one event. Failures leave the surface unchanged.
    fn on_event(&mut self, event: ExternalEvent) -> Result<Applied, ReconfigError>;

    /// Advance running programs by at most one step. Returns true while
    /// work is pending.
    fn step(&mut self, now: Instant) -> bool;

    /// Current frame, ready for an [`OutputDriver`]
    fn frame(&mut self) -> &[Rgb];
}
