use crate::errors::{Error, Result};
use crate::model::NewReading;
use serde_json::{Map, Value};

pub const MISSING_FIELDS: &str = "Missing temperature or humidity data";
pub const NOT_NUMERIC: &str = "Temperature and humidity must be numeric";
pub const INVALID_JSON: &str = "Invalid JSON payload";

/// Parses and validates a device payload such as `{"temp": 23.4, "hum": 55.1}`.
///
/// Both fields must be present and numeric; `null` counts as missing.
/// Unknown keys are ignored. Values are not range checked.
pub fn parse_reading(payload: &[u8]) -> Result<NewReading> {
    let value: Value =
        serde_json::from_slice(payload).map_err(|_| Error::Validation(INVALID_JSON.to_string()))?;

    let object = value
        .as_object()
        .ok_or_else(|| Error::Validation(INVALID_JSON.to_string()))?;

    validate(object)
}

pub fn validate(object: &Map<String, Value>) -> Result<NewReading> {
    let (temp, hum) = match (present(object, "temp"), present(object, "hum")) {
        (Some(temp), Some(hum)) => (temp, hum),
        _ => return Err(Error::Validation(MISSING_FIELDS.to_string())),
    };

    match (temp.as_f64(), hum.as_f64()) {
        (Some(temperature), Some(humidity)) => Ok(NewReading {
            temperature,
            humidity,
        }),
        _ => Err(Error::Validation(NOT_NUMERIC.to_string())),
    }
}

fn present<'a>(object: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    object.get(key).filter(|v| !v.is_null())
}
