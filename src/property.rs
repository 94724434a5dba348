//! Property port: a locally-owned, typed configuration value.
//!
//! Unlike inputs and outputs, properties are independent of the link graph.
//! Each property declares a [`PropertyType`]; writes go through an explicit
//! coercion function for that type, and a failed coercion leaves the
//! previous value untouched. A two-phase write (stage via
//! `set_amend_property`, commit via `amend`) lets hosts collect edits and
//! apply them at a safe point.

use crate::error::PortError;
use crate::port::{Port, PortInfo};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Declared type of a property value.
///
/// Each variant carries its own coercion rules; see
/// [`coerce`](PropertyType::coerce).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyType {
    /// Whole number (JSON integer)
    Integer,

    /// Floating-point number
    Float,

    /// Text string
    String,

    /// Boolean value
    Boolean,

    /// Array of values
    Array,

    /// Arbitrary JSON data, accepted verbatim
    Json,
}

impl PropertyType {
    /// Name used in error messages and the port-info record
    pub fn name(&self) -> &'static str {
        match self {
            PropertyType::Integer => "integer",
            PropertyType::Float => "float",
            PropertyType::String => "string",
            PropertyType::Boolean => "boolean",
            PropertyType::Array => "array",
            PropertyType::Json => "json",
        }
    }

    /// Whether `value` already has this type, making coercion unnecessary.
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            PropertyType::Integer => value.is_i64() || value.is_u64(),
            PropertyType::Float => value.is_f64(),
            PropertyType::String => value.is_string(),
            PropertyType::Boolean => value.is_boolean(),
            PropertyType::Array => value.is_array(),
            PropertyType::Json => true,
        }
    }

    /// Convert `value` to this type.
    ///
    /// A matching value is returned verbatim, with no normalization.
    /// Otherwise the declared conversion for this type is applied:
    ///
    /// * `Integer` — from float (truncating), bool (0/1), or numeric string
    /// * `Float` — from integer, bool, or numeric string
    /// * `String` — from anything; scalars are formatted, composites
    ///   rendered as JSON text (never fails)
    /// * `Boolean` — from numbers (zero is false) or the strings
    ///   `"true"`/`"false"` (ASCII case-insensitive)
    /// * `Array` — arrays only
    /// * `Json` — anything, verbatim (never fails)
    ///
    /// Everything else fails with [`PortError::Coercion`].
    pub fn coerce(&self, value: Value) -> Result<Value, PortError> {
        if self.matches(&value) {
            return Ok(value);
        }

        let coerced = match self {
            PropertyType::Integer => match &value {
                Value::Number(n) => n
                    .as_f64()
                    .filter(|f| f.is_finite() && (i64::MIN as f64..=i64::MAX as f64).contains(f))
                    .map(|f| Value::from(f.trunc() as i64)),
                Value::Bool(b) => Some(Value::from(*b as i64)),
                Value::String(s) => s.trim().parse::<i64>().ok().map(Value::from),
                _ => None,
            },
            PropertyType::Float => match &value {
                Value::Number(n) => n.as_f64().map(Value::from),
                Value::Bool(b) => Some(Value::from(if *b { 1.0 } else { 0.0 })),
                Value::String(s) => s
                    .trim()
                    .parse::<f64>()
                    .ok()
                    .and_then(serde_json::Number::from_f64)
                    .map(Value::Number),
                _ => None,
            },
            PropertyType::String => Some(Value::String(match &value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })),
            PropertyType::Boolean => match &value {
                Value::Number(n) => n.as_f64().map(|f| Value::Bool(f != 0.0)),
                Value::String(s) if s.trim().eq_ignore_ascii_case("true") => {
                    Some(Value::Bool(true))
                }
                Value::String(s) if s.trim().eq_ignore_ascii_case("false") => {
                    Some(Value::Bool(false))
                }
                _ => None,
            },
            // a non-array never coerces to one
            PropertyType::Array => None,
            // unreachable: matches() accepts everything for Json
            PropertyType::Json => Some(value.clone()),
        };

        coerced.ok_or_else(|| PortError::Coercion {
            expected: self.name(),
            value: value.to_string(),
        })
    }
}

/// Property port holding a typed, mutable configuration value.
///
/// The default is pushed through the coercion path at construction, so a
/// property always holds a value of its declared type (or the unconverted
/// value if it already matched).
#[derive(Debug)]
pub struct Property {
    info: PortInfo,
    data_type: PropertyType,
    default: Value,
    value: Value,
    amend_value: Option<Value>,
}

impl Property {
    /// Create a property with the given declared type and default value.
    ///
    /// The default is applied through [`set_property`](Property::set_property);
    /// an incoercible default is a construction error. The default and type
    /// name are also recorded in the port-info extras so descriptive
    /// consumers see them alongside the rest of the metadata.
    pub fn new(
        mut info: PortInfo,
        data_type: PropertyType,
        default: impl Into<Value>,
    ) -> Result<Self, PortError> {
        let default = default.into();
        let value = data_type.coerce(default.clone())?;

        info.extra.insert("default".to_string(), default.clone());
        info.extra
            .insert("data_type".to_string(), Value::from(data_type.name()));

        Ok(Self {
            info,
            data_type,
            default,
            value,
            amend_value: None,
        })
    }

    /// Current value, no side effects.
    pub fn get_property(&self) -> &Value {
        &self.value
    }

    /// The declared type.
    pub fn data_type(&self) -> PropertyType {
        self.data_type
    }

    /// The default value as supplied at construction (before coercion).
    pub fn default(&self) -> &Value {
        &self.default
    }

    /// Set the value, coercing to the declared type if necessary.
    ///
    /// On coercion failure the previous value is untouched.
    pub fn set_property(&mut self, value: impl Into<Value>) -> Result<(), PortError> {
        self.value = self.data_type.coerce(value.into())?;
        Ok(())
    }

    /// Stage a value for a later [`amend`](Property::amend), verbatim and
    /// without coercion, overwriting any previous stage.
    pub fn set_amend_property(&mut self, value: impl Into<Value>) {
        self.amend_value = Some(value.into());
    }

    /// Apply the staged value through the normal coercion path.
    ///
    /// One-shot: the stage is consumed regardless of outcome, so callers
    /// must re-stage to amend again.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` — a staged value was applied
    /// * `Ok(false)` — nothing was staged; no-op
    /// * `Err(PortError::Coercion)` — the staged value was rejected; the
    ///   current value is unchanged and the stage is cleared anyway
    pub fn amend(&mut self) -> Result<bool, PortError> {
        match self.amend_value.take() {
            Some(staged) => {
                self.set_property(staged)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

impl Port for Property {
    fn port_info(&self) -> &PortInfo {
        &self.info
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn int_property(default: i64) -> Property {
        Property::new(PortInfo::new("count"), PropertyType::Integer, default).unwrap()
    }

    #[test]
    fn test_default_applied() {
        let property = int_property(5);
        assert_eq!(property.get_property(), &json!(5));
        assert_eq!(property.default(), &json!(5));
        assert_eq!(property.data_type(), PropertyType::Integer);
    }

    #[test]
    fn test_default_coerced_at_construction() {
        let property =
            Property::new(PortInfo::new("count"), PropertyType::Integer, "12").unwrap();
        assert_eq!(property.get_property(), &json!(12));
        // the raw default is kept as supplied
        assert_eq!(property.default(), &json!("12"));
    }

    #[test]
    fn test_incoercible_default_fails_construction() {
        let result = Property::new(PortInfo::new("count"), PropertyType::Integer, "abc");
        assert!(matches!(result, Err(PortError::Coercion { .. })));
    }

    #[test]
    fn test_info_records_default_and_type() {
        let property = int_property(5);
        let info = property.port_info();
        assert_eq!(info.extra.get("default"), Some(&json!(5)));
        assert_eq!(info.extra.get("data_type"), Some(&json!("integer")));
    }

    #[test]
    fn test_set_property_coerces_string() {
        let mut property = int_property(5);
        property.set_property("7").unwrap();
        assert_eq!(property.get_property(), &json!(7));
    }

    #[test]
    fn test_failed_coercion_keeps_value() {
        let mut property = int_property(5);
        property.set_property("7").unwrap();

        let result = property.set_property("x");
        assert!(matches!(result, Err(PortError::Coercion { .. })));
        assert_eq!(property.get_property(), &json!(7));
    }

    #[test]
    fn test_matching_value_stored_verbatim() {
        let mut property =
            Property::new(PortInfo::new("tags"), PropertyType::Array, json!([])).unwrap();
        property.set_property(json!([1, "two", 3.0])).unwrap();
        assert_eq!(property.get_property(), &json!([1, "two", 3.0]));
    }

    #[test]
    fn test_amend_round_trip() {
        let mut property = int_property(1);

        property.set_amend_property(2);
        assert_eq!(property.amend().unwrap(), true);
        assert_eq!(property.get_property(), &json!(2));

        // no stage left: no-op, no error
        assert_eq!(property.amend().unwrap(), false);
        assert_eq!(property.get_property(), &json!(2));
    }

    #[test]
    fn test_amend_consumes_stage_on_error() {
        let mut property = int_property(1);
        property.set_amend_property(2);
        property.amend().unwrap();

        property.set_amend_property("not a number");
        assert!(matches!(property.amend(), Err(PortError::Coercion { .. })));
        assert_eq!(property.get_property(), &json!(2));

        // the stage was consumed despite the error
        assert_eq!(property.amend().unwrap(), false);
    }

    #[test]
    fn test_amend_restage_overwrites() {
        let mut property = int_property(1);
        property.set_amend_property(2);
        property.set_amend_property(3);
        property.amend().unwrap();
        assert_eq!(property.get_property(), &json!(3));
    }

    #[test]
    fn test_integer_coercions() {
        let ty = PropertyType::Integer;
        assert_eq!(ty.coerce(json!(7.9)).unwrap(), json!(7));
        assert_eq!(ty.coerce(json!(true)).unwrap(), json!(1));
        assert_eq!(ty.coerce(json!(" 42 ")).unwrap(), json!(42));
        assert!(ty.coerce(json!("4.2")).is_err());
        assert!(ty.coerce(json!(null)).is_err());
        assert!(ty.coerce(json!([1])).is_err());
    }

    #[test]
    fn test_float_coercions() {
        let ty = PropertyType::Float;
        assert_eq!(ty.coerce(json!(7)).unwrap(), json!(7.0));
        assert_eq!(ty.coerce(json!("2.5")).unwrap(), json!(2.5));
        assert_eq!(ty.coerce(json!(false)).unwrap(), json!(0.0));
        assert!(ty.coerce(json!("NaN")).is_err());
        assert!(ty.coerce(json!({})).is_err());
    }

    #[test]
    fn test_string_coercion_never_fails() {
        let ty = PropertyType::String;
        assert_eq!(ty.coerce(json!(7)).unwrap(), json!("7"));
        assert_eq!(ty.coerce(json!(true)).unwrap(), json!("true"));
        assert_eq!(ty.coerce(json!([1, 2])).unwrap(), json!("[1,2]"));
        assert_eq!(ty.coerce(json!(null)).unwrap(), json!("null"));
    }

    #[test]
    fn test_boolean_coercions() {
        let ty = PropertyType::Boolean;
        assert_eq!(ty.coerce(json!(0)).unwrap(), json!(false));
        assert_eq!(ty.coerce(json!(2)).unwrap(), json!(true));
        assert_eq!(ty.coerce(json!("True")).unwrap(), json!(true));
        assert_eq!(ty.coerce(json!("false")).unwrap(), json!(false));
        assert!(ty.coerce(json!("yes")).is_err());
        assert!(ty.coerce(json!(null)).is_err());
    }

    #[test]
    fn test_json_accepts_anything() {
        let ty = PropertyType::Json;
        let value = json!({"nested": [1, 2, {"deep": true}]});
        assert_eq!(ty.coerce(value.clone()).unwrap(), value);
    }
}
