//! Panel configuration parser
//!
//! Turns the panel JSON document into a [`PanelScript`]: a title visual,
//! an optional initial state and a [`Program`] of `BindState`/`BindBlock`
//! instructions.
//!
//! Reserved top-level keys are `regions`, `initial`, `title`, `states` and
//! `blocks`. Any other top-level array can be expanded as a template with
//! `{ "tmpl": "<name>", "x": .., "y": .., "vars": { .. } }`.

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use serde::Deserialize;
use serde_json::{Map, Value};

use super::shape::{Area, BlockVisual, Point, Shape, ShapeKind, TextShape, Visual};
use crate::color::{Rgb, parse_hex};
use crate::error::{ParseError, ParseErrorKind};
use crate::script::{Instruction, Program};

/// Maximum template nesting
pub const MAX_TEMPLATE_DEPTH: usize = 8;

const KEY_REGIONS: &str = "regions";
const KEY_INITIAL: &str = "initial";
const KEY_TITLE: &str = "title";
const KEY_STATES: &str = "states";
const KEY_BLOCKS: &str = "blocks";

/// Parsed panel configuration
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PanelScript {
    pub title: Visual,
    pub initial_state: Option<String>,
    pub program: Program,
}

impl PanelScript {
    /// Visual bound to turnout state `name`
    pub fn state(&self, name: &str) -> Option<&Visual> {
        self.program.instructions().iter().find_map(|inst| match inst {
            Instruction::BindState { name: n, visual } if n == name => Some(visual),
            _ => None,
        })
    }

    /// Visuals bound to block `name`
    pub fn block(&self, name: &str) -> Option<&BlockVisual> {
        self.blocks().find_map(|(n, visual)| (n == name).then_some(visual))
    }

    /// Declared blocks, in program order
    pub fn blocks(&self) -> impl Iterator<Item = (&str, &BlockVisual)> {
        self.program.instructions().iter().filter_map(|inst| match inst {
            Instruction::BindBlock { name, visual } => Some((name.as_str(), visual)),
            _ => None,
        })
    }

    /// Declared state names, in program order
    pub fn states(&self) -> impl Iterator<Item = &str> {
        self.program.instructions().iter().filter_map(|inst| match inst {
            Instruction::BindState { name, .. } => Some(name.as_str()),
            _ => None,
        })
    }
}

/// Integer coordinate, given as a JSON number or a numeric string
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum Coord {
    Int(i64),
    Text(String),
}

#[derive(Debug, Deserialize)]
struct RawArea {
    x: Coord,
    y: Coord,
    w: Coord,
    h: Coord,
}

#[derive(Debug, Deserialize)]
struct RawPoint {
    x: Coord,
    y: Coord,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
enum RawShape {
    Fill {
        rgb: String,
        region: String,
    },
    Rect {
        x: Coord,
        y: Coord,
        w: Coord,
        h: Coord,
        rgb: String,
        region: Option<String>,
    },
    Line {
        x1: Coord,
        y1: Coord,
        x2: Coord,
        y2: Coord,
        rgb: String,
        region: Option<String>,
    },
    Poly {
        pts: Vec<RawPoint>,
        rgb: String,
        region: Option<String>,
    },
    Text {
        x: Coord,
        y: Coord,
        t: Value,
        rgb: String,
        scale: Option<u8>,
        font: Option<u8>,
        region: Option<String>,
    },
}

const SHAPE_OPS: [&str; 5] = ["fill", "rect", "line", "poly", "text"];

#[derive(Debug, Default, Deserialize)]
struct RawBlock {
    #[serde(default)]
    active: Vec<Value>,
    #[serde(default)]
    inactive: Vec<Value>,
}

/// Coordinate frame: origin plus the size used to wrap negative values
#[derive(Debug, Clone, Copy)]
struct Frame {
    origin: Point,
    w: i32,
    h: i32,
    clip: Option<Area>,
}

struct Parser<'a> {
    root: &'a Map<String, Value>,
    regions: BTreeMap<String, Area>,
    panel: Frame,
    /// Index of the instruction being parsed within its section
    clause: usize,
}

/// Parse a panel JSON configuration for a `width` x `height` panel.
pub fn parse(json: &str, width: usize, height: usize) -> Result<PanelScript, ParseError> {
    let root: Value =
        serde_json::from_str(json).map_err(|err| ParseError::new(invalid_json(&err), 0))?;
    let Value::Object(root) = root else {
        return Err(ParseError::new(
            ParseErrorKind::InvalidJson("top level must be an object".to_string()),
            0,
        ));
    };

    let mut parser = Parser {
        root: &root,
        regions: BTreeMap::new(),
        panel: Frame {
            origin: Point::default(),
            w: i32::try_from(width).unwrap_or(i32::MAX),
            h: i32::try_from(height).unwrap_or(i32::MAX),
            clip: None,
        },
        clause: 0,
    };
    parser.parse_regions()?;

    let title = match root.get(KEY_TITLE) {
        Some(title) => parser.section(title)?,
        None => Visual::new(),
    };

    let mut instructions = Vec::new();
    if let Some(states) = root.get(KEY_STATES) {
        let states = object(states, KEY_STATES)?;
        for (name, insts) in states {
            instructions.push(Instruction::BindState {
                name: name.clone(),
                visual: parser.section(insts)?,
            });
        }
    }
    if let Some(blocks) = root.get(KEY_BLOCKS) {
        let blocks = object(blocks, KEY_BLOCKS)?;
        for (name, block) in blocks {
            let raw: RawBlock = serde_json::from_value(block.clone())
                .map_err(|err| ParseError::new(invalid_json(&err), 0))?;
            let active = parser.list(&raw.active)?;
            let inactive = parser.list(&raw.inactive)?;
            instructions.push(Instruction::BindBlock {
                name: name.clone(),
                visual: BlockVisual { active, inactive },
            });
        }
    }

    let initial_state = match root.get(KEY_INITIAL) {
        None | Some(Value::Null) => None,
        Some(Value::String(name)) => {
            let declared = instructions.iter().any(
                |inst| matches!(inst, Instruction::BindState { name: n, .. } if n == name),
            );
            if !declared {
                return Err(ParseError::new(
                    ParseErrorKind::UndefinedState(name.clone()),
                    0,
                ));
            }
            Some(name.clone())
        }
        Some(_) => {
            return Err(ParseError::new(
                ParseErrorKind::InvalidJson("'initial' must be a string".to_string()),
                0,
            ));
        }
    };

    Ok(PanelScript {
        title,
        initial_state,
        program: Program::new(instructions),
    })
}

impl Parser<'_> {
    fn error(&self, kind: ParseErrorKind) -> ParseError {
        ParseError::new(kind, self.clause)
    }

    /// Regions are clipped to the panel; a region with nothing left is an
    /// error
    fn parse_regions(&mut self) -> Result<(), ParseError> {
        let Some(regions) = self.root.get(KEY_REGIONS) else {
            return Ok(());
        };
        let raw: BTreeMap<String, RawArea> = serde_json::from_value(regions.clone())
            .map_err(|err| ParseError::new(invalid_json(&err), 0))?;
        let frame = self.panel;
        let panel = Area::new(frame.origin.x, frame.origin.y, frame.w, frame.h);
        for (index, (name, raw)) in raw.into_iter().enumerate() {
            self.clause = index;
            let area = self.area(&raw, frame)?.intersect(panel);
            if area.is_empty() {
                return Err(self.error(ParseErrorKind::OutOfRange {
                    what: "region",
                    value: name,
                }));
            }
            self.regions.insert(name, area);
        }
        Ok(())
    }

    /// Parse a top-level section (an array of instructions)
    fn section(&mut self, value: &Value) -> Result<Visual, ParseError> {
        let Value::Array(list) = value else {
            return Err(ParseError::new(
                ParseErrorKind::InvalidJson("instructions must be an array".to_string()),
                0,
            ));
        };
        self.list(list)
    }

    fn list(&mut self, list: &[Value]) -> Result<Visual, ParseError> {
        let mut visual = Visual::new();
        let panel = self.panel;
        self.expand(list, &BTreeMap::new(), panel, 0, &mut visual)?;
        Ok(visual)
    }

    fn expand(
        &mut self,
        list: &[Value],
        vars: &BTreeMap<String, Value>,
        frame: Frame,
        depth: usize,
        out: &mut Visual,
    ) -> Result<(), ParseError> {
        for (index, inst) in list.iter().enumerate() {
            if depth == 0 {
                self.clause = index;
            }
            let Value::Object(fields) = inst else {
                return Err(self.error(ParseErrorKind::InvalidJson(
                    "instruction must be an object".to_string(),
                )));
            };
            let fields = substitute(fields, vars);

            if let Some(template) = fields.get("tmpl") {
                self.template(template, &fields, vars, frame, depth, out)?;
            } else {
                out.push(self.shape(fields, frame)?);
            }
        }
        Ok(())
    }

    fn template(
        &mut self,
        template: &Value,
        fields: &Map<String, Value>,
        vars: &BTreeMap<String, Value>,
        frame: Frame,
        depth: usize,
        out: &mut Visual,
    ) -> Result<(), ParseError> {
        if depth >= MAX_TEMPLATE_DEPTH {
            return Err(self.error(ParseErrorKind::TemplateDepth(MAX_TEMPLATE_DEPTH)));
        }
        let name = template.as_str().unwrap_or_default();
        let root = self.root;
        let body = root
            .get(name)
            .filter(|_| !is_reserved(name))
            .and_then(Value::as_array)
            .ok_or_else(|| self.error(ParseErrorKind::UndefinedTemplate(name.to_string())))?;

        let mut inner_vars = vars.clone();
        if let Some(Value::Object(extra)) = fields.get("vars") {
            inner_vars.extend(extra.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        let dx = self.field_coord(fields, "x", frame.w)?;
        let dy = self.field_coord(fields, "y", frame.h)?;
        let inner = Frame {
            origin: Point::new(
                frame.origin.x.saturating_add(dx),
                frame.origin.y.saturating_add(dy),
            ),
            ..frame
        };
        self.expand(body, &inner_vars, inner, depth + 1, out)
    }

    fn field_coord(
        &self,
        fields: &Map<String, Value>,
        key: &str,
        size: i32,
    ) -> Result<i32, ParseError> {
        match fields.get(key) {
            None => Ok(0),
            Some(value) => {
                let coord: Coord = serde_json::from_value(value.clone())
                    .map_err(|err| self.error(invalid_json(&err)))?;
                self.coord(&coord, size)
            }
        }
    }

    fn shape(&self, fields: Map<String, Value>, frame: Frame) -> Result<Shape, ParseError> {
        let op = fields.get("op").and_then(Value::as_str).unwrap_or_default();
        if !SHAPE_OPS.contains(&op) {
            return Err(self.error(ParseErrorKind::UnknownShape(op.to_string())));
        }
        let raw: RawShape = serde_json::from_value(Value::Object(fields))
            .map_err(|err| self.error(invalid_json(&err)))?;

        let shape = match raw {
            RawShape::Fill { rgb, region } => {
                let area = self.region(&region)?;
                Shape {
                    kind: ShapeKind::Fill,
                    color: self.color(&rgb)?,
                    clip: Some(area),
                }
            }
            RawShape::Rect {
                x,
                y,
                w,
                h,
                rgb,
                region,
            } => {
                let frame = self.frame_for(region.as_deref(), frame)?;
                let area = RawArea { x, y, w, h };
                Shape {
                    kind: ShapeKind::Rect(self.area(&area, frame)?),
                    color: self.color(&rgb)?,
                    clip: frame.clip,
                }
            }
            RawShape::Line {
                x1,
                y1,
                x2,
                y2,
                rgb,
                region,
            } => {
                let frame = self.frame_for(region.as_deref(), frame)?;
                Shape {
                    kind: ShapeKind::Line {
                        from: self.point(&x1, &y1, frame)?,
                        to: self.point(&x2, &y2, frame)?,
                    },
                    color: self.color(&rgb)?,
                    clip: frame.clip,
                }
            }
            RawShape::Poly { pts, rgb, region } => {
                if pts.len() < 3 {
                    return Err(self.error(ParseErrorKind::UnknownShape(
                        "poly needs at least 3 points".to_string(),
                    )));
                }
                let frame = self.frame_for(region.as_deref(), frame)?;
                let points = pts
                    .iter()
                    .map(|pt| self.point(&pt.x, &pt.y, frame))
                    .collect::<Result<Vec<_>, _>>()?;
                Shape {
                    kind: ShapeKind::Polygon(points),
                    color: self.color(&rgb)?,
                    clip: frame.clip,
                }
            }
            RawShape::Text {
                x,
                y,
                t,
                rgb,
                scale,
                font,
                region,
            } => {
                let frame = self.frame_for(region.as_deref(), frame)?;
                let text = match t {
                    Value::String(text) => text,
                    other => other.to_string(),
                };
                Shape {
                    kind: ShapeKind::Text(TextShape {
                        origin: self.point(&x, &y, frame)?,
                        text,
                        scale: scale.unwrap_or(1).clamp(1, 2),
                        font: font.unwrap_or(1).clamp(1, 2) - 1,
                    }),
                    color: self.color(&rgb)?,
                    clip: frame.clip,
                }
            }
        };
        Ok(shape)
    }

    /// Frame of a named region, or `frame` when no region is given
    fn frame_for(&self, region: Option<&str>, frame: Frame) -> Result<Frame, ParseError> {
        let Some(name) = region else {
            return Ok(frame);
        };
        let area = self.region(name)?;
        Ok(Frame {
            origin: Point::new(area.x, area.y),
            w: area.w,
            h: area.h,
            clip: Some(area),
        })
    }

    fn region(&self, name: &str) -> Result<Area, ParseError> {
        self.regions
            .get(name)
            .copied()
            .ok_or_else(|| self.error(ParseErrorKind::UndefinedRegion(name.to_string())))
    }

    fn area(&self, raw: &RawArea, frame: Frame) -> Result<Area, ParseError> {
        let origin = self.point(&raw.x, &raw.y, frame)?;
        Ok(Area::new(
            origin.x,
            origin.y,
            self.coord(&raw.w, frame.w)?,
            self.coord(&raw.h, frame.h)?,
        ))
    }

    fn point(&self, x: &Coord, y: &Coord, frame: Frame) -> Result<Point, ParseError> {
        Ok(Point::new(
            frame.origin.x.saturating_add(self.coord(x, frame.w)?),
            frame.origin.y.saturating_add(self.coord(y, frame.h)?),
        ))
    }

    /// Resolve a coordinate; negative values count back from `size`
    fn coord(&self, coord: &Coord, size: i32) -> Result<i32, ParseError> {
        let value = match coord {
            Coord::Int(value) => *value,
            Coord::Text(text) => text
                .trim()
                .parse::<i64>()
                .map_err(|_| self.error(ParseErrorKind::InvalidNumber(text.clone())))?,
        };
        let value = i32::try_from(value)
            .map_err(|_| self.error(ParseErrorKind::InvalidNumber(value.to_string())))?;
        Ok(wrap(value, size))
    }

    fn color(&self, literal: &str) -> Result<Rgb, ParseError> {
        parse_hex(literal)
            .ok_or_else(|| self.error(ParseErrorKind::InvalidColor(literal.to_string())))
    }
}

fn object<'v>(value: &'v Value, key: &str) -> Result<&'v Map<String, Value>, ParseError> {
    value.as_object().ok_or_else(|| {
        ParseError::new(
            ParseErrorKind::InvalidJson(alloc::format!("'{key}' must be an object")),
            0,
        )
    })
}

/// Fold `value` into `0..=size`
fn wrap(value: i32, size: i32) -> i32 {
    if size <= 0 {
        return value;
    }
    if value < 0 {
        value.rem_euclid(size)
    } else if value > size {
        (value - 1).rem_euclid(size) + 1
    } else {
        value
    }
}

/// Replace field values that name a template variable
fn substitute(fields: &Map<String, Value>, vars: &BTreeMap<String, Value>) -> Map<String, Value> {
    fields
        .iter()
        .map(|(key, value)| {
            let value = value
                .as_str()
                .and_then(|name| vars.get(name))
                .unwrap_or(value);
            (key.clone(), value.clone())
        })
        .collect()
}

fn is_reserved(key: &str) -> bool {
    [KEY_REGIONS, KEY_INITIAL, KEY_TITLE, KEY_STATES, KEY_BLOCKS].contains(&key)
}

fn invalid_json(err: &serde_json::Error) -> ParseErrorKind {
    ParseErrorKind::InvalidJson(err.to_string())
}
