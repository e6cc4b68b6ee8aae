// Data structures for the availability JSON payload
//
// Every level of the payload is optional and decoded leniently: a level with the
// wrong shape reads as absent, a room entry that is not a list reads as no data for
// that room only, and a record that is not an object reads as an empty record.
// Records whose date is not a string or whose quantity is not a non-negative
// integer keep their other fields but never match a night. Restriction flags that
// are not booleans read as false.
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AvailabilityError {
    #[error("JSON parse error: {0}")]
    JsonParseError(String),
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AvailabilityResponse {
    #[serde(deserialize_with = "lenient")]
    pub availability: Option<AvailabilityEnvelope>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AvailabilityEnvelope {
    #[serde(deserialize_with = "lenient_rooms")]
    pub availability: Option<HashMap<String, Option<Vec<DayRecord>>>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DayRecord {
    #[serde(deserialize_with = "lenient_date")]
    pub date: Option<String>,
    #[serde(deserialize_with = "lenient_quantity")]
    pub quantity: Option<u32>,
    #[serde(deserialize_with = "lenient")]
    pub restrictions: Option<Restrictions>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Restrictions {
    #[serde(deserialize_with = "lenient_flag")]
    pub no_arrival: bool,
    #[serde(deserialize_with = "lenient_flag")]
    pub no_departure: bool,
}

impl AvailabilityResponse {
    pub fn from_json(json_str: &str) -> Result<Self, AvailabilityError> {
        serde_json::from_str(json_str).map_err(|e| AvailabilityError::JsonParseError(e.to_string()))
    }

    // Day records for a room type, None when any level is missing or the list is empty
    pub fn room_days(&self, room_type_id: &str) -> Option<&[DayRecord]> {
        self.availability
            .as_ref()?
            .availability
            .as_ref()?
            .get(room_type_id)?
            .as_deref()
            .filter(|days| !days.is_empty())
    }
}

impl DayRecord {
    pub fn new(date: &str, quantity: u32) -> Self {
        Self {
            date: Some(date.to_string()),
            quantity: Some(quantity),
            restrictions: None,
        }
    }

    pub fn with_restrictions(mut self, no_arrival: bool, no_departure: bool) -> Self {
        self.restrictions = Some(Restrictions {
            no_arrival,
            no_departure,
        });
        self
    }

    pub fn no_arrival(&self) -> bool {
        self.restrictions.as_ref().map_or(false, |r| r.no_arrival)
    }

    pub fn no_departure(&self) -> bool {
        self.restrictions.as_ref().map_or(false, |r| r.no_departure)
    }
}

// Any value that does not decode as T reads as absent
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).ok())
}

fn lenient_rooms<'de, D>(
    deserializer: D,
) -> Result<Option<HashMap<String, Option<Vec<DayRecord>>>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Value::Object(rooms) = Value::deserialize(deserializer)? else {
        return Ok(None);
    };

    let rooms = rooms
        .into_iter()
        .map(|(id, days)| {
            let days = match days {
                Value::Array(items) => Some(
                    items
                        .into_iter()
                        .map(|item| DayRecord::deserialize(item).unwrap_or_default())
                        .collect(),
                ),
                _ => None,
            };
            (id, days)
        })
        .collect();

    Ok(Some(rooms))
}

fn lenient_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(matches!(Value::deserialize(deserializer)?, Value::Bool(true)))
}

fn lenient_date<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(date) => Some(date),
        _ => None,
    })
}

fn lenient_quantity<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_u64().and_then(|q| u32::try_from(q).ok()),
        _ => None,
    })
}
