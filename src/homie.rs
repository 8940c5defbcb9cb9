//! # Homie Convention
//!
//! Topic layout and advertisement messages of the Homie 3.0.0 convention, under which the
//! meter is exposed as device `linky` with a single node `tic` carrying one property per
//! field.

use crate::constants::{
    HOMIE_BASE_TOPIC, HOMIE_DEVICE_CONVENTION_VERSION, HOMIE_DEVICE_EXTENSIONS, HOMIE_DEVICE_ID,
    HOMIE_DEVICE_IMPLEMENTATION, HOMIE_DEVICE_NAME, HOMIE_NODE_ID, HOMIE_NODE_NAME,
    HOMIE_NODE_TYPE,
};
use crate::tic::fields::{FieldDescriptor, HomieDatatype};

/// A retained message to publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomieMessage {
    pub topic: String,
    pub payload: String,
}

impl HomieMessage {
    fn new(topic: String, payload: impl Into<String>) -> Self {
        HomieMessage {
            topic,
            payload: payload.into(),
        }
    }
}

/// Device/node identity used to build topics.
#[derive(Debug, Clone)]
pub struct HomieDevice {
    pub base_topic: String,
    pub device_id: String,
    pub device_name: String,
    pub implementation: String,
    pub node_id: String,
    pub node_name: String,
    pub node_type: String,
}

impl Default for HomieDevice {
    fn default() -> Self {
        HomieDevice {
            base_topic: HOMIE_BASE_TOPIC.to_string(),
            device_id: HOMIE_DEVICE_ID.to_string(),
            device_name: HOMIE_DEVICE_NAME.to_string(),
            implementation: HOMIE_DEVICE_IMPLEMENTATION.to_string(),
            node_id: HOMIE_NODE_ID.to_string(),
            node_name: HOMIE_NODE_NAME.to_string(),
            node_type: HOMIE_NODE_TYPE.to_string(),
        }
    }
}

impl HomieDevice {
    /// `homie/linky/`
    pub fn device_prefix(&self) -> String {
        format!("{}{}/", self.base_topic, self.device_id)
    }

    /// `homie/linky/tic/`
    pub fn node_prefix(&self) -> String {
        format!("{}{}/", self.device_prefix(), self.node_id)
    }

    pub fn state_topic(&self) -> String {
        format!("{}$state", self.device_prefix())
    }

    /// Topic carrying the value of a property.
    pub fn property_topic(&self, field: &FieldDescriptor) -> String {
        format!("{}{}", self.node_prefix(), field.prop_id)
    }

    /// Registered with the broker as last will.
    pub fn last_will(&self) -> HomieMessage {
        HomieMessage::new(self.state_topic(), "lost")
    }

    pub fn disconnected(&self) -> HomieMessage {
        HomieMessage::new(self.state_topic(), "disconnected")
    }

    /// Device, node and property attributes announced after connecting.
    pub fn advertisement<'a, I>(&self, fields: I) -> Vec<HomieMessage>
    where
        I: IntoIterator<Item = &'a FieldDescriptor>,
    {
        let fields: Vec<&FieldDescriptor> = fields.into_iter().collect();
        let device = self.device_prefix();
        let node = self.node_prefix();

        let mut messages = vec![
            HomieMessage::new(format!("{device}$homie"), HOMIE_DEVICE_CONVENTION_VERSION),
            HomieMessage::new(format!("{device}$name"), self.device_name.as_str()),
            HomieMessage::new(format!("{device}$state"), "ready"),
            HomieMessage::new(format!("{device}$nodes"), self.node_id.as_str()),
            HomieMessage::new(format!("{device}$extensions"), HOMIE_DEVICE_EXTENSIONS),
            HomieMessage::new(format!("{device}$implementation"), self.implementation.as_str()),
            HomieMessage::new(format!("{node}$name"), self.node_name.as_str()),
            HomieMessage::new(format!("{node}$type"), self.node_type.as_str()),
            HomieMessage::new(
                format!("{node}$properties"),
                fields
                    .iter()
                    .map(|f| f.prop_id.as_str())
                    .collect::<Vec<_>>()
                    .join(","),
            ),
        ];

        for field in fields {
            let property = format!("{node}{}/", field.prop_id);
            messages.push(HomieMessage::new(format!("{property}$name"), field.name.as_str()));
            messages.push(HomieMessage::new(
                format!("{property}$datatype"),
                field.datatype.as_str(),
            ));
            messages.push(HomieMessage::new(format!("{property}$unit"), field.unit.as_str()));
            if field.datatype == HomieDatatype::Enum {
                messages.push(HomieMessage::new(
                    format!("{property}$format"),
                    field.values.join(","),
                ));
            }
        }

        messages
    }
}
