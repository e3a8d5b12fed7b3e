//! LED strip reconfiguration coordinator
//!
//! Owns the pixel buffer and one [`Stepper`] per script slot, and applies
//! [`ExternalEvent`]s to them in arrival order.

use alloc::string::String;

use embassy_time::Instant;
use serde::Deserialize;

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::Surface;
use crate::buffer::PixelBuffer;
use crate::color::{BLACK, Rgb};
use crate::error::{ConfigError, ReconfigError};
use crate::event::{Applied, ExternalEvent, Slot};
use crate::script;
use crate::stepper::{Step, Stepper};

/// Initial strip settings
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StripConfig {
    /// Visible length at boot, clamped to the buffer capacity
    pub length: usize,
    /// Brightness at boot (0.0-1.0)
    pub brightness: f32,
}

impl Default for StripConfig {
    fn default() -> Self {
        Self {
            length: 30,
            brightness: 1.0,
        }
    }
}

/// Program and last applied text of one slot
#[derive(Debug, Default)]
struct ScriptSlot {
    stepper: Stepper,
    applied: Option<String>,
}

/// Strip coordinator
///
/// The event program has priority: while it runs, the init program is
/// paused and resumes once the event program completes.
pub struct Coordinator<const MAX_LEDS: usize> {
    buffer: PixelBuffer<MAX_LEDS>,
    init: ScriptSlot,
    event: ScriptSlot,
    last_trigger: Option<String>,
    frame: [Rgb; MAX_LEDS],
}

impl<const MAX_LEDS: usize> Coordinator<MAX_LEDS> {
    pub fn new(config: &StripConfig) -> Self {
        Self {
            buffer: PixelBuffer::new(config.length, config.brightness),
            init: ScriptSlot::default(),
            event: ScriptSlot::default(),
            last_trigger: None,
            frame: [BLACK; MAX_LEDS],
        }
    }

    pub const fn buffer(&self) -> &PixelBuffer<MAX_LEDS> {
        &self.buffer
    }

    pub const fn stepper(&self, slot: Slot) -> &Stepper {
        match slot {
            Slot::Init => &self.init.stepper,
            Slot::Event => &self.event.stepper,
        }
    }

    /// Last successfully applied script text of `slot`
    pub fn applied_script(&self, slot: Slot) -> Option<&str> {
        match slot {
            Slot::Init => self.init.applied.as_deref(),
            Slot::Event => self.event.applied.as_deref(),
        }
    }

    /// Apply one external event
    pub fn on_event(&mut self, event: ExternalEvent) -> Result<Applied, ReconfigError> {
        match event {
            ExternalEvent::ScriptReplaced { slot, text } => self.replace_script(slot, text),
            ExternalEvent::LengthChanged(length) => self.set_length(length),
            ExternalEvent::BrightnessChanged(brightness) => self.set_brightness(brightness),
            ExternalEvent::TriggerEdge(value) => Ok(self.trigger_edge(value)),
            ExternalEvent::NamedStateChanged(_) | ExternalEvent::BlockActivityChanged { .. } => {
                Err(ReconfigError::Unsupported("panel events on a strip"))
            }
        }
    }

    /// Advance the active program by one step
    ///
    /// Returns true while any program still has work pending.
    pub fn step(&mut self, now: Instant) -> bool {
        if self.event.stepper.is_running() {
            if let Step::Trigger { index } = self.event.stepper.step(&mut self.buffer, now) {
                // A trigger inside the event program restarts it once.
                self.event.stepper.retire_trigger(index);
                self.event.stepper.start();
            }
        } else if let Step::Trigger { .. } = self.init.stepper.step(&mut self.buffer, now) {
            self.start_event();
        }
        self.init.stepper.is_running() || self.event.stepper.is_running()
    }

    fn replace_script(&mut self, slot: Slot, text: String) -> Result<Applied, ReconfigError> {
        let target = match slot {
            Slot::Init => &mut self.init,
            Slot::Event => &mut self.event,
        };
        if target.applied.as_deref() == Some(text.as_str()) {
            return Ok(Applied::Unchanged);
        }

        let program = script::parse(&text, MAX_LEDS)?;
        #[cfg(feature = "esp32-log")]
        println!(
            "[Coordinator.replace_script] {} script: {} instructions",
            slot.as_str(),
            program.len()
        );
        target.stepper.install(program);
        target.applied = Some(text);
        if slot == Slot::Init {
            target.stepper.start();
        }
        Ok(Applied::Installed)
    }

    fn set_length(&mut self, length: i32) -> Result<Applied, ReconfigError> {
        let valid = usize::try_from(length)
            .ok()
            .filter(|length| (1..=MAX_LEDS).contains(length))
            .ok_or(ConfigError::LengthOutOfRange {
                value: length,
                max: MAX_LEDS,
            })?;
        if valid == self.buffer.len() {
            return Ok(Applied::Unchanged);
        }
        self.buffer.set_length(valid);
        Ok(Applied::Updated)
    }

    #[allow(clippy::float_cmp)]
    fn set_brightness(&mut self, brightness: f32) -> Result<Applied, ReconfigError> {
        if !(0.0..=1.0).contains(&brightness) {
            return Err(ConfigError::BrightnessOutOfRange(brightness).into());
        }
        if brightness == self.buffer.brightness() {
            return Ok(Applied::Unchanged);
        }
        self.buffer.set_brightness(brightness);
        Ok(Applied::Updated)
    }

    fn trigger_edge(&mut self, value: String) -> Applied {
        if self.last_trigger.as_deref() == Some(value.as_str()) {
            return Applied::Unchanged;
        }
        self.last_trigger = Some(value);
        if self.start_event() {
            Applied::Started
        } else {
            Applied::Updated
        }
    }

    /// Start the held event program from its first instruction
    fn start_event(&mut self) -> bool {
        if self.event.applied.is_none() {
            #[cfg(feature = "esp32-log")]
            println!("[Coordinator.start_event] no event program");
            return false;
        }
        self.event.stepper.start();
        true
    }
}

impl<const MAX_LEDS: usize> Surface for Coordinator<MAX_LEDS> {
    fn on_event(&mut self, event: ExternalEvent) -> Result<Applied, ReconfigError> {
        Coordinator::on_event(self, event)
    }

    fn step(&mut self, now: Instant) -> bool {
        Coordinator::step(self, now)
    }

    fn frame(&mut self) -> &[Rgb] {
        self.buffer.render_into(&mut self.frame)
    }
}
