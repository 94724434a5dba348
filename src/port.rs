//! Port metadata shared by all connection points.
//!
//! Every connection point on a node (input, output, property) carries the
//! same descriptive record: a required name plus unit, free-text info, a
//! data example, and arbitrary extra key/value pairs. The record is fixed
//! at construction and treated as read-mostly afterwards.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Default unit for ports that do not declare one.
pub const UNIT_UNDEFINED: &str = "undefined";

/// Placeholder for unset free-text metadata fields.
pub const INFO_NONE: &str = "-";

/// Descriptive record attached to every port.
///
/// Construct with [`PortInfo::new`] and chain the `with_*` methods for the
/// optional fields:
///
/// ```
/// use patchbay::PortInfo;
///
/// let info = PortInfo::new("flow_rate")
///     .with_unit("l/min")
///     .with_info("volumetric flow through the valve")
///     .with_example("4.2")
///     .with_extra("min", 0);
///
/// assert_eq!(info.name, "flow_rate");
/// assert_eq!(info.unit, "l/min");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortInfo {
    /// Port name, unique within the owning node's namespace (uniqueness is
    /// enforced by the node, not here)
    pub name: String,

    /// Unit of the data flowing through the port
    pub unit: String,

    /// Free-text description
    pub info: String,

    /// Example of the data
    pub example: String,

    /// Arbitrary additional descriptive key/value pairs
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub extra: HashMap<String, Value>,
}

impl PortInfo {
    /// Create a record with the given name and default metadata
    /// (`unit = "undefined"`, `info = "-"`, `example = "-"`).
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            unit: UNIT_UNDEFINED.to_string(),
            info: INFO_NONE.to_string(),
            example: INFO_NONE.to_string(),
            extra: HashMap::new(),
        }
    }

    /// Set the unit of the data
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }

    /// Set the free-text description
    pub fn with_info(mut self, info: impl Into<String>) -> Self {
        self.info = info.into();
        self
    }

    /// Set the data example
    pub fn with_example(mut self, example: impl Into<String>) -> Self {
        self.example = example.into();
        self
    }

    /// Attach an extra descriptive key/value pair
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

/// Common accessor implemented by all port kinds.
pub trait Port {
    /// The port's descriptive record. Callers must treat it as read-mostly
    /// and must not mutate it destructively.
    fn port_info(&self) -> &PortInfo;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let info = PortInfo::new("pressure");
        assert_eq!(info.name, "pressure");
        assert_eq!(info.unit, "undefined");
        assert_eq!(info.info, "-");
        assert_eq!(info.example, "-");
        assert!(info.extra.is_empty());
    }

    #[test]
    fn test_builder_fields() {
        let info = PortInfo::new("pressure")
            .with_unit("bar")
            .with_info("line pressure")
            .with_example("2.5")
            .with_extra("max", 10)
            .with_extra("source", "sensor_3");

        assert_eq!(info.unit, "bar");
        assert_eq!(info.info, "line pressure");
        assert_eq!(info.example, "2.5");
        assert_eq!(info.extra.get("max"), Some(&json!(10)));
        assert_eq!(info.extra.get("source"), Some(&json!("sensor_3")));
    }

    #[test]
    fn test_serde_round_trip() {
        let info = PortInfo::new("level").with_unit("m").with_extra("tank", "T1");
        let text = serde_json::to_string(&info).unwrap();
        let parsed: PortInfo = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, info);
    }
}
