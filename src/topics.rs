//! Topic routing
//!
//! Maps pub/sub messages to [`ExternalEvent`]s. The transport itself is
//! external; it only has to hand `(topic, payload)` pairs to
//! [`TopicRouter::route`] and queue the result.

use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use serde::Deserialize;

use crate::error::{ConfigError, ReconfigError};
use crate::event::{ExternalEvent, Slot};

const BLOCK_PREFIX: &str = "block/";
const STATE_SUFFIX: &str = "/state";

/// Which surface the device drives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    Strip,
    Panel,
}

/// Topic layout
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TopicConfig {
    /// Prefix of the device's own topics, e.g. `distantsignal/T330`
    pub root: String,
    /// Turnout whose state the panel follows
    pub turnout: Option<String>,
}

impl Default for TopicConfig {
    fn default() -> Self {
        Self {
            root: "ambilight".to_string(),
            turnout: None,
        }
    }
}

/// Turns incoming messages into events
#[derive(Debug, Clone)]
pub struct TopicRouter {
    config: TopicConfig,
    variant: Variant,
}

impl TopicRouter {
    pub const fn new(config: TopicConfig, variant: Variant) -> Self {
        Self { config, variant }
    }

    pub const fn variant(&self) -> Variant {
        self.variant
    }

    /// Route one message
    ///
    /// Returns `Ok(None)` for topics this device does not handle.
    pub fn route(&self, topic: &str, payload: &str) -> Result<Option<ExternalEvent>, ReconfigError> {
        let event = match self.variant {
            Variant::Strip => self.route_strip(topic, payload)?,
            Variant::Panel => self.route_panel(topic, payload)?,
        };
        Ok(event)
    }

    /// Topics to subscribe to; `blocks` are the block names of the
    /// installed panel program
    pub fn subscriptions<'b>(&self, blocks: impl IntoIterator<Item = &'b str>) -> Vec<String> {
        let root = &self.config.root;
        match self.variant {
            Variant::Strip => ["script/init", "script/event", "length", "brightness", "event/trigger"]
                .iter()
                .map(|leaf| format!("{root}/{leaf}"))
                .collect(),
            Variant::Panel => {
                let mut topics = Vec::new();
                topics.push(format!("{root}/script"));
                if let Some(turnout) = &self.config.turnout {
                    topics.push(format!("turnout/{turnout}{STATE_SUFFIX}"));
                }
                topics.extend(
                    blocks
                        .into_iter()
                        .map(|block| format!("{BLOCK_PREFIX}{block}{STATE_SUFFIX}")),
                );
                topics
            }
        }
    }

    fn route_strip(&self, topic: &str, payload: &str) -> Result<Option<ExternalEvent>, ConfigError> {
        let Some(leaf) = self.leaf(topic) else {
            return Ok(None);
        };
        let event = match leaf {
            "script/init" => ExternalEvent::ScriptReplaced {
                slot: Slot::Init,
                text: payload.to_string(),
            },
            "script/event" => ExternalEvent::ScriptReplaced {
                slot: Slot::Event,
                text: payload.to_string(),
            },
            "length" => ExternalEvent::LengthChanged(
                payload
                    .trim()
                    .parse()
                    .map_err(|_| invalid_payload(topic, payload))?,
            ),
            "brightness" => ExternalEvent::BrightnessChanged(
                payload
                    .trim()
                    .parse()
                    .map_err(|_| invalid_payload(topic, payload))?,
            ),
            "event/trigger" => ExternalEvent::TriggerEdge(payload.to_string()),
            _ => return Ok(None),
        };
        Ok(Some(event))
    }

    fn route_panel(&self, topic: &str, payload: &str) -> Result<Option<ExternalEvent>, ConfigError> {
        if self.leaf(topic) == Some("script") {
            return Ok(Some(ExternalEvent::ScriptReplaced {
                slot: Slot::Init,
                text: payload.to_string(),
            }));
        }
        if let Some(turnout) = &self.config.turnout {
            let turnout_topic = topic
                .strip_prefix("turnout/")
                .and_then(|rest| rest.strip_suffix(STATE_SUFFIX));
            if turnout_topic == Some(turnout.as_str()) {
                return Ok(Some(ExternalEvent::NamedStateChanged(
                    payload.trim().to_string(),
                )));
            }
        }
        if let Some(block) = topic
            .strip_prefix(BLOCK_PREFIX)
            .and_then(|rest| rest.strip_suffix(STATE_SUFFIX))
            .filter(|block| !block.is_empty() && !block.contains('/'))
        {
            let state = payload.trim();
            let active = if state.eq_ignore_ascii_case("active") {
                true
            } else if state.eq_ignore_ascii_case("inactive") {
                false
            } else {
                return Err(invalid_payload(topic, payload));
            };
            return Ok(Some(ExternalEvent::BlockActivityChanged {
                name: block.to_string(),
                active,
            }));
        }
        Ok(None)
    }

    /// Topic relative to the device root
    fn leaf<'t>(&self, topic: &'t str) -> Option<&'t str> {
        topic
            .strip_prefix(self.config.root.as_str())
            .and_then(|rest| rest.strip_prefix('/'))
    }
}

fn invalid_payload(topic: &str, payload: &str) -> ConfigError {
    ConfigError::InvalidPayload {
        topic: topic.to_string(),
        payload: payload.to_string(),
    }
}
