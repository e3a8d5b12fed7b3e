//! Cooperative program executor
//!
//! [`Stepper::step`] performs at most one visible unit of work per call and
//! never blocks. Timed instructions wait by returning [`Step::Pending`]
//! until they are due, so the caller's loop stays free to service events.

use alloc::vec::Vec;

use embassy_time::Instant;

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::buffer::PixelBuffer;
use crate::script::{Instruction, Program};

/// Lifecycle of the installed program
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepperState {
    /// Installed (or empty) but not started
    Idle,
    Running,
    /// Ran to the end; the buffer keeps the final frame
    Completed,
    /// Cursor discarded before the end
    Interrupted,
}

/// Outcome of one [`Stepper::step`] call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// More work remains (possibly not due yet)
    Pending,
    /// The `Trigger` clause at `index` was reached; the owner decides what
    /// to restart
    Trigger { index: usize },
    /// Nothing left to do
    Done,
}

impl Step {
    /// Whether the caller should keep stepping
    pub const fn is_pending(self) -> bool {
        !matches!(self, Self::Done)
    }
}

/// Sub-state of the instruction under the cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Start,
    SlowFill { offset: usize, next_due: Instant },
    Slide { remaining: u32, next_due: Instant },
}

/// Executes one [`Program`] against a [`PixelBuffer`]
#[derive(Debug, Clone)]
pub struct Stepper {
    program: Program,
    state: StepperState,
    index: usize,
    phase: Phase,
    /// Trigger clauses that already fired in this installation
    retired_triggers: Vec<usize>,
}

impl Default for Stepper {
    fn default() -> Self {
        Self::new()
    }
}

impl Stepper {
    /// Create an idle stepper with an empty program
    pub const fn new() -> Self {
        Self {
            program: Program::new(Vec::new()),
            state: StepperState::Idle,
            index: 0,
            phase: Phase::Start,
            retired_triggers: Vec::new(),
        }
    }

    pub const fn state(&self) -> StepperState {
        self.state
    }

    pub const fn program(&self) -> &Program {
        &self.program
    }

    /// Index of the instruction under the cursor
    pub const fn cursor(&self) -> usize {
        self.index
    }

    pub const fn is_running(&self) -> bool {
        matches!(self.state, StepperState::Running)
    }

    /// Replace the program. The new one is idle until [`Self::start`].
    pub fn install(&mut self, program: Program) {
        self.interrupt();
        self.program = program;
        self.state = StepperState::Idle;
        self.retired_triggers.clear();
    }

    /// (Re)start the installed program from its first instruction
    pub fn start(&mut self) {
        self.index = 0;
        self.phase = Phase::Start;
        self.state = if self.program.is_empty() {
            StepperState::Completed
        } else {
            StepperState::Running
        };
    }

    /// Discard the cursor of a running program
    pub fn interrupt(&mut self) {
        if self.is_running() {
            #[cfg(feature = "esp32-log")]
            println!("[Stepper.interrupt] stopped at instruction {}", self.index);
            self.state = StepperState::Interrupted;
        }
        self.index = 0;
        self.phase = Phase::Start;
    }

    /// Stop the `Trigger` clause at `index` from firing again
    pub fn retire_trigger(&mut self, index: usize) {
        if !self.retired_triggers.contains(&index) {
            self.retired_triggers.push(index);
        }
    }

    /// Advance the program by at most one unit of visible work
    pub fn step<const MAX_LEDS: usize>(
        &mut self,
        buffer: &mut PixelBuffer<MAX_LEDS>,
        now: Instant,
    ) -> Step {
        if !self.is_running() {
            return Step::Done;
        }
        let Some(instruction) = self.program.get(self.index) else {
            return self.advance();
        };

        let index = self.index;
        let mut fired = false;
        match instruction {
            Instruction::SetLength(length) => buffer.set_length(*length),
            Instruction::SetBrightness(brightness) => buffer.set_brightness(*brightness),
            Instruction::Fill(pattern) => buffer.fill_pattern(pattern),
            Instruction::SlowFill { interval, pattern } => {
                let (offset, next_due) = match self.phase {
                    Phase::SlowFill { offset, next_due } => (offset, next_due),
                    _ => (0, now),
                };
                if now < next_due {
                    return Step::Pending;
                }
                buffer.write(offset, pattern.color_at(offset));
                let offset = offset + 1;
                if offset < buffer.len() {
                    self.phase = Phase::SlowFill {
                        offset,
                        next_due: now + *interval,
                    };
                    return Step::Pending;
                }
            }
            Instruction::Slide {
                interval,
                direction,
                count,
            } => {
                let (remaining, next_due) = match self.phase {
                    Phase::Slide {
                        remaining,
                        next_due,
                    } => (remaining, next_due),
                    _ => (*count, now),
                };
                if now < next_due {
                    return Step::Pending;
                }
                buffer.rotate(direction.offset());
                let remaining = remaining.saturating_sub(1);
                if remaining > 0 {
                    self.phase = Phase::Slide {
                        remaining,
                        next_due: now + *interval,
                    };
                    return Step::Pending;
                }
            }
            Instruction::Trigger => {
                fired = !self.retired_triggers.contains(&index);
            }
            Instruction::BindState { .. } | Instruction::BindBlock { .. } => {
                // Declarations, resolved when the panel program is installed
            }
        }

        let status = self.advance();
        if fired { Step::Trigger { index } } else { status }
    }

    /// Move the cursor to the next instruction
    fn advance(&mut self) -> Step {
        self.index += 1;
        self.phase = Phase::Start;
        if self.index >= self.program.len() {
            self.state = StepperState::Completed;
            #[cfg(feature = "esp32-log")]
            println!("[Stepper.advance] program completed");
            return Step::Done;
        }
        Step::Pending
    }
}
