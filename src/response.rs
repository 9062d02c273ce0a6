//! Response models.
//!
//! The server is the source of truth for record shapes, so every model keeps the
//! fields it does not name in a flattened `extra` map. Nothing the server sends
//! is dropped.

use crate::request::Recurrence;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Admin account created by first-run setup.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminCredentials {
    pub email: String,
    pub password: String,
}

/// Token grant returned by `/oauth/login`.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub username: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl std::fmt::Debug for LoginResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginResponse")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .field("username", &self.username)
            .field("extra", &self.extra)
            .finish()
    }
}

/// The authenticated user.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_admin: Option<bool>,
    #[serde(default)]
    pub settings: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A venue.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Place {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A published (or pending) event.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: u64,
    pub title: String,
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Unix timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_datetime: Option<i64>,
    /// Unix timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_datetime: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multidate: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrent: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_visible: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place: Option<Place>,
    #[serde(default, deserialize_with = "tag_names")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub online_locations: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub media: Vec<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Event {
    /// Start time, if the server sent one.
    #[must_use]
    pub fn start(&self) -> Option<DateTime<Utc>> {
        self.start_datetime
            .and_then(|ts| Utc.timestamp_opt(ts, 0).single())
    }

    /// End time, if the server sent one.
    #[must_use]
    pub fn end(&self) -> Option<DateTime<Utc>> {
        self.end_datetime
            .and_then(|ts| Utc.timestamp_opt(ts, 0).single())
    }

    /// Recurrence rule, if the event repeats.
    ///
    /// Non-recurring events carry `null` or `false` here, which yields `None`.
    #[must_use]
    pub fn recurrence(&self) -> Option<Recurrence> {
        self.recurrent
            .as_ref()
            .filter(|rule| rule.is_object())
            .and_then(|rule| serde_json::from_value(rule.clone()).ok())
    }

    /// Returns true if the event carries at least one media item.
    #[must_use]
    pub fn has_media(&self) -> bool {
        !self.media.is_empty()
    }
}

/// A place together with its upcoming events.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PlaceEvents {
    pub place: Place,
    pub events: Vec<Event>,
}

// Accepts both `{"place": {...}, "events": [...]}` and a place object that
// embeds its `events` list.
#[derive(Deserialize)]
#[serde(untagged)]
enum PlaceEventsWire {
    Nested {
        place: Place,
        #[serde(default, deserialize_with = "null_as_empty")]
        events: Vec<Event>,
    },
    Flat(Place),
}

impl<'de> Deserialize<'de> for PlaceEvents {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match PlaceEventsWire::deserialize(deserializer)? {
            PlaceEventsWire::Nested { place, events } => Ok(Self { place, events }),
            PlaceEventsWire::Flat(mut place) => {
                let events = match place.extra.remove("events") {
                    Some(Value::Null) | None => Vec::new(),
                    Some(events) => {
                        serde_json::from_value(events).map_err(serde::de::Error::custom)?
                    }
                };
                Ok(Self { place, events })
            }
        }
    }
}

/// A static content page.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

// Tags arrive as plain names on most endpoints and as `{"tag": name}` objects on
// a few older ones.
fn tag_names<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum TagWire {
        Name(String),
        Object { tag: String },
    }

    let tags: Vec<TagWire> = null_as_empty(deserializer)?;
    Ok(tags
        .into_iter()
        .map(|t| match t {
            TagWire::Name(name) | TagWire::Object { tag: name } => name,
        })
        .collect())
}
