//! Instruction set and script parsing
//!
//! A script is a `;`-separated list of clauses such as
//!
//! ```text
//! # warm white base
//! Length 30; Brightness 0.5;
//! Fill #FF0000 3 #00FF00 2;
//! SlowFill 0.1 #000000 1;
//! Slide -0.05 30;
//! ```
//!
//! Parsing produces an immutable [`Program`]. Programs never reference one
//! another; a running program is replaced wholesale.

mod lexer;
mod parser;

use alloc::string::String;
use alloc::vec::Vec;
use core::iter;

use embassy_time::Duration;

use crate::color::{BLACK, Rgb};
use crate::panel::{BlockVisual, Visual};

pub use parser::parse;

/// One run of a fill pattern: `count` consecutive pixels of `color`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternRun {
    pub color: Rgb,
    pub count: u16,
}

impl PatternRun {
    pub const fn new(color: Rgb, count: u16) -> Self {
        Self { color, count }
    }
}

/// Non-empty sequence of color runs, repeated over the strip
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    runs: Vec<PatternRun>,
    period: usize,
}

impl Pattern {
    /// Build a pattern. Returns `None` if there are no runs or a run is
    /// empty.
    pub fn new(runs: Vec<PatternRun>) -> Option<Self> {
        if runs.is_empty() || runs.iter().any(|run| run.count == 0) {
            return None;
        }
        let period = runs.iter().map(|run| usize::from(run.count)).sum();
        Some(Self { runs, period })
    }

    pub fn runs(&self) -> &[PatternRun] {
        &self.runs
    }

    /// Number of pixels before the pattern repeats
    pub const fn period(&self) -> usize {
        self.period
    }

    /// Color of pixel `index` when the pattern is repeated from pixel 0
    pub fn color_at(&self, index: usize) -> Rgb {
        let mut offset = index % self.period;
        for run in &self.runs {
            let count = usize::from(run.count);
            if offset < count {
                return run.color;
            }
            offset -= count;
        }
        BLACK
    }

    /// Endless iterator over the repeated pattern
    pub fn cycle(&self) -> impl Iterator<Item = Rgb> + '_ {
        self.runs
            .iter()
            .flat_map(|run| iter::repeat_n(run.color, usize::from(run.count)))
            .cycle()
    }
}

/// Direction of a slide, taken from the sign of its delay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideDirection {
    /// Content moves toward higher indices
    Forward,
    /// Content moves toward lower indices
    Backward,
}

impl SlideDirection {
    /// Rotation offset for one slide unit
    pub const fn offset(self) -> isize {
        match self {
            Self::Forward => 1,
            Self::Backward => -1,
        }
    }
}

/// A single script instruction
#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    /// Set the visible strip length
    SetLength(usize),
    /// Set the strip brightness (0.0-1.0)
    SetBrightness(f32),
    /// Write the whole pattern at once
    Fill(Pattern),
    /// Write the pattern one pixel per `interval`
    SlowFill { interval: Duration, pattern: Pattern },
    /// Rotate the strip by one pixel per `interval`, `count` times
    Slide {
        interval: Duration,
        direction: SlideDirection,
        count: u32,
    },
    /// Restart the event program from its first instruction
    Trigger,
    /// Panel: visual shown while the turnout is in state `name`
    BindState { name: String, visual: Visual },
    /// Panel: visuals shown for block `name` once its activity is known
    BindBlock { name: String, visual: BlockVisual },
}

/// Parsed, immutable instruction sequence
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    instructions: Vec<Instruction>,
}

impl Program {
    pub const fn new(instructions: Vec<Instruction>) -> Self {
        Self { instructions }
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn get(&self, index: usize) -> Option<&Instruction> {
        self.instructions.get(index)
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}
