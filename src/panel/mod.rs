//! Signal panel variant
//!
//! The panel shows a title, the visual bound to the active turnout state
//! and, for every block whose occupancy is known, the visual bound to its
//! activity. Any change re-renders the whole canvas.

mod canvas;
mod config;
mod shape;

use alloc::collections::BTreeMap;
use alloc::string::String;

use embassy_time::Instant;

#[cfg(feature = "esp32-log")]
use esp_println::println;

pub use canvas::{Canvas, NoText, TextRenderer};
pub use config::{MAX_TEMPLATE_DEPTH, PanelScript, parse};
pub use shape::{Area, BlockVisual, Point, Shape, ShapeKind, TextShape, Visual};

use crate::Surface;
use crate::color::Rgb;
use crate::error::{BindingError, ReconfigError};
use crate::event::{Applied, ExternalEvent, Slot};

/// Panel coordinator for a `W` x `H` matrix
pub struct PanelCoordinator<const W: usize, const H: usize, T: TextRenderer = NoText> {
    canvas: Canvas<W, H>,
    text: T,
    script: Option<PanelScript>,
    applied: Option<String>,
    active_state: Option<String>,
    /// Known activity per block; blocks without an entry stay hidden
    blocks: BTreeMap<String, bool>,
}

impl<const W: usize, const H: usize> PanelCoordinator<W, H, NoText> {
    /// Panel without text rendering
    pub fn new() -> Self {
        Self::with_text_renderer(NoText)
    }
}

impl<const W: usize, const H: usize> Default for PanelCoordinator<W, H, NoText> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const W: usize, const H: usize, T: TextRenderer> PanelCoordinator<W, H, T> {
    pub fn with_text_renderer(text: T) -> Self {
        Self {
            canvas: Canvas::new(),
            text,
            script: None,
            applied: None,
            active_state: None,
            blocks: BTreeMap::new(),
        }
    }

    pub const fn canvas(&self) -> &Canvas<W, H> {
        &self.canvas
    }

    pub const fn script(&self) -> Option<&PanelScript> {
        self.script.as_ref()
    }

    /// Last successfully applied configuration text
    pub fn applied_script(&self) -> Option<&str> {
        self.applied.as_deref()
    }

    pub fn active_state(&self) -> Option<&str> {
        self.active_state.as_deref()
    }

    /// Known activity of `block`, `None` until an update arrives
    pub fn block_activity(&self, block: &str) -> Option<bool> {
        self.blocks.get(block).copied()
    }

    pub fn on_event(&mut self, event: ExternalEvent) -> Result<Applied, ReconfigError> {
        match event {
            ExternalEvent::ScriptReplaced {
                slot: Slot::Init,
                text,
            } => self.replace_script(text),
            ExternalEvent::NamedStateChanged(name) => self.set_state(name),
            ExternalEvent::BlockActivityChanged { name, active } => self.set_block(name, active),
            ExternalEvent::ScriptReplaced {
                slot: Slot::Event, ..
            } => Err(ReconfigError::Unsupported("event scripts on a panel")),
            ExternalEvent::LengthChanged(_)
            | ExternalEvent::BrightnessChanged(_)
            | ExternalEvent::TriggerEdge(_) => {
                Err(ReconfigError::Unsupported("strip events on a panel"))
            }
        }
    }

    fn replace_script(&mut self, text: String) -> Result<Applied, ReconfigError> {
        if self.applied.as_deref() == Some(text.as_str()) {
            return Ok(Applied::Unchanged);
        }
        let script = parse(&text, W, H)?;

        self.active_state = script.initial_state.clone().or_else(|| {
            self.active_state
                .take()
                .filter(|name| script.state(name).is_some())
        });
        self.blocks.retain(|name, _| script.block(name).is_some());

        #[cfg(feature = "esp32-log")]
        println!(
            "[PanelCoordinator.replace_script] {} states, {} blocks",
            script.states().count(),
            script.blocks().count()
        );
        self.script = Some(script);
        self.applied = Some(text);
        self.render();
        Ok(Applied::Installed)
    }

    fn set_state(&mut self, name: String) -> Result<Applied, ReconfigError> {
        let known = self
            .script
            .as_ref()
            .is_some_and(|script| script.state(&name).is_some());
        if !known {
            return Err(BindingError::UnknownState(name).into());
        }
        if self.active_state.as_deref() == Some(name.as_str()) {
            return Ok(Applied::Unchanged);
        }
        self.active_state = Some(name);
        self.render();
        Ok(Applied::Rendered)
    }

    fn set_block(&mut self, name: String, active: bool) -> Result<Applied, ReconfigError> {
        let known = self
            .script
            .as_ref()
            .is_some_and(|script| script.block(&name).is_some());
        if !known {
            return Err(BindingError::UnknownBlock(name).into());
        }
        if self.blocks.get(&name) == Some(&active) {
            return Ok(Applied::Unchanged);
        }
        self.blocks.insert(name, active);
        self.render();
        Ok(Applied::Rendered)
    }

    /// Clear, then draw the title, the active state and the known blocks
    fn render(&mut self) {
        self.canvas.clear();
        let Some(script) = &self.script else {
            return;
        };
        self.canvas.draw_all(&script.title, &mut self.text);
        if let Some(visual) = self
            .active_state
            .as_deref()
            .and_then(|name| script.state(name))
        {
            self.canvas.draw_all(visual, &mut self.text);
        }
        for (name, visual) in script.blocks() {
            if let Some(&active) = self.blocks.get(name) {
                let shapes = visual.for_activity(active);
                self.canvas.draw_all(shapes, &mut self.text);
            }
        }
    }
}

impl<const W: usize, const H: usize, T: TextRenderer> Surface for PanelCoordinator<W, H, T> {
    fn on_event(&mut self, event: ExternalEvent) -> Result<Applied, ReconfigError> {
        PanelCoordinator::on_event(self, event)
    }

    /// The panel redraws on events only
    fn step(&mut self, _now: Instant) -> bool {
        false
    }

    fn frame(&mut self) -> &[Rgb] {
        self.canvas.as_slice()
    }
}
