//! Frame scheduling and timing utilities.
//!
//! Provides portable frame pacing without async/await or platform-specific timers.
//! The caller is responsible for sleeping/waiting between frames.

use embassy_time::{Duration, Instant};

use crate::event_pump::EventPump;
use crate::{OutputDriver, Surface};

/// Default target frame rate (50 FPS).
pub const DEFAULT_FPS: u32 = 50;

/// Default frame duration based on target FPS.
pub const DEFAULT_FRAME_DURATION: Duration = Duration::from_millis(1000 / DEFAULT_FPS as u64);

/// Result of a frame tick operation.
#[derive(Debug, Clone, Copy)]
pub struct FrameResult {
    /// The deadline for the next frame.
    pub next_deadline: Instant,
    /// How long to wait until the next frame (may be zero if behind schedule).
    pub sleep_duration: Duration,
    /// Whether a program still has pending work.
    pub busy: bool,
}

/// Portable frame scheduler that manages timing without async.
///
/// Each tick drains pending events, steps the surface once, and writes the
/// resulting frame to the output driver.
///
/// # Usage
///
/// ```ignore
/// let mut scheduler = FrameScheduler::new(coordinator, pump, driver);
///
/// loop {
///     let now = get_current_time_ms();
///     let result = scheduler.tick(Instant::from_millis(now));
///
///     // Platform-specific sleep
///     sleep_ms(result.sleep_duration.as_millis() as u64);
/// }
/// ```
pub struct FrameScheduler<'a, O, S, const EVENTS: usize, const DIAGNOSTICS: usize>
where
    O: OutputDriver,
    S: Surface,
{
    output: O,
    surface: S,
    pump: EventPump<'a, EVENTS, DIAGNOSTICS>,
    next_frame: Instant,
    frame_duration: Duration,
}

impl<'a, O, S, const EVENTS: usize, const DIAGNOSTICS: usize>
    FrameScheduler<'a, O, S, EVENTS, DIAGNOSTICS>
where
    O: OutputDriver,
    S: Surface,
{
    /// Create a new frame scheduler.
    ///
    /// Uses `DEFAULT_FRAME_DURATION` (50 FPS) for frame timing.
    pub fn new(surface: S, pump: EventPump<'a, EVENTS, DIAGNOSTICS>, driver: O) -> Self {
        Self::with_frame_duration(surface, pump, driver, DEFAULT_FRAME_DURATION)
    }

    /// Create a new frame scheduler with custom frame duration.
    pub fn with_frame_duration(
        surface: S,
        pump: EventPump<'a, EVENTS, DIAGNOSTICS>,
        driver: O,
        frame_duration: Duration,
    ) -> Self {
        Self {
            output: driver,
            surface,
            pump,
            next_frame: Instant::from_millis(0),
            frame_duration,
        }
    }

    /// Process one frame and return timing information.
    ///
    /// This method:
    /// 1. Applies drift correction if we've fallen too far behind
    /// 2. Applies pending events
    /// 3. Steps the surface once
    /// 4. Writes the frame to the output driver
    pub fn tick(&mut self, now: Instant) -> FrameResult {
        // Skip the backlog after long stalls instead of catching up
        let max_drift = self.frame_duration * 2;
        if now > self.next_frame + max_drift {
            self.next_frame = now;
        }

        self.pump.pump(&mut self.surface);
        let busy = self.surface.step(now);
        self.output.write(self.surface.frame());

        self.next_frame += self.frame_duration;
        let sleep_duration = if self.next_frame > now {
            self.next_frame - now
        } else {
            Duration::from_millis(0)
        };

        FrameResult {
            next_deadline: self.next_frame,
            sleep_duration,
            busy,
        }
    }

    pub const fn surface(&self) -> &S {
        &self.surface
    }

    pub const fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }
}
