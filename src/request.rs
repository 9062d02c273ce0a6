//! Request option types.
//!
//! Every optional parameter is an `Option`. Encoding follows one rule across the
//! crate: a key is emitted only when its field is `Some`, so anything the caller
//! leaves unset falls back to the server-side default.

use crate::builder_traits::HasEventFields;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

/// Storage path used by a stock Gancio install.
pub const DEFAULT_SQLITE_STORAGE: &str = "/opt/gancio/db.sqlite";

/// Database settings sent during first-run setup.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "dialect", rename_all = "lowercase")]
pub enum DatabaseConfig {
    /// SQLite file at `storage`.
    Sqlite { storage: String },
    /// PostgreSQL. The instance reads the connection details from its own config.
    Postgres,
}

impl DatabaseConfig {
    /// SQLite database stored at `storage`.
    #[must_use]
    pub fn sqlite(storage: impl Into<String>) -> Self {
        Self::Sqlite {
            storage: storage.into(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self::sqlite(DEFAULT_SQLITE_STORAGE)
    }
}

/// Filters for listing events.
///
/// With every field unset the server returns upcoming events.
///
/// # Example
///
/// ```
/// use gancio_rs::EventFilter;
///
/// let filter = EventFilter::new()
///     .with_tags(["music", "free"])
///     .with_max(20);
/// assert_eq!(filter.max, Some(20));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EventFilter {
    /// Only events starting after this Unix timestamp
    pub start: Option<i64>,
    /// Only events starting before this Unix timestamp
    pub end: Option<i64>,
    /// Tag names
    pub tags: Option<Vec<String>>,
    /// Place names
    pub places: Option<Vec<String>>,
    /// Free-text search
    pub query: Option<String>,
    /// Maximum number of events returned
    pub max: Option<u32>,
    /// Page number for pagination
    pub page: Option<u32>,
    /// Include recurring events
    pub show_recurrent: Option<bool>,
    /// Include multi-day events
    pub show_multidate: Option<bool>,
}

impl EventFilter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_start(mut self, start: i64) -> Self {
        self.start = Some(start);
        self
    }

    #[must_use]
    pub fn with_end(mut self, end: i64) -> Self {
        self.end = Some(end);
        self
    }

    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn with_places<I, S>(mut self, places: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.places = Some(places.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    #[must_use]
    pub fn with_max(mut self, max: u32) -> Self {
        self.max = Some(max);
        self
    }

    #[must_use]
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    #[must_use]
    pub fn with_show_recurrent(mut self, show: bool) -> Self {
        self.show_recurrent = Some(show);
        self
    }

    #[must_use]
    pub fn with_show_multidate(mut self, show: bool) -> Self {
        self.show_multidate = Some(show);
        self
    }

    /// Query-string pairs. Lists repeat their key once per element.
    pub(crate) fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        push_opt(&mut pairs, "start", self.start);
        push_opt(&mut pairs, "end", self.end);
        push_list(&mut pairs, "tags", self.tags.as_deref());
        push_list(&mut pairs, "places", self.places.as_deref());
        push_opt(&mut pairs, "query", self.query.as_deref());
        push_opt(&mut pairs, "max", self.max);
        push_opt(&mut pairs, "page", self.page);
        push_opt(&mut pairs, "show_recurrent", self.show_recurrent);
        push_opt(&mut pairs, "show_multidate", self.show_multidate);
        pairs
    }
}

/// How an event repeats.
///
/// Sent to the server as a JSON string in the `recurrent` form field. Its
/// [`Display`](std::fmt::Display) impl renders that JSON. Rule keys without a
/// named field live in `extra`, so a rule read back from
/// [`Event::recurrence`](crate::Event::recurrence) is re-sent unchanged.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recurrence {
    /// Repeat interval, e.g. `1w`, `2w` or `1m`.
    pub frequency: String,
    /// Monthly anchoring (`ordinal` or a weekday offset).
    #[serde(
        rename = "type",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub kind: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Recurrence {
    #[must_use]
    pub fn new(frequency: impl Into<String>) -> Self {
        Self {
            frequency: frequency.into(),
            kind: None,
            extra: Map::new(),
        }
    }

    #[must_use]
    pub fn weekly() -> Self {
        Self::new("1w")
    }

    #[must_use]
    pub fn biweekly() -> Self {
        Self::new("2w")
    }

    #[must_use]
    pub fn monthly() -> Self {
        Self::new("1m")
    }

    #[must_use]
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    /// Sets a rule key that has no named field.
    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

impl std::fmt::Display for Recurrence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| std::fmt::Error)?;
        f.write_str(&json)
    }
}

/// Image attached to an event as a multipart file part.
#[derive(Clone, PartialEq, Eq)]
pub struct Image {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub mime: Option<String>,
}

impl std::fmt::Debug for Image {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Image")
            .field("bytes", &format_args!("<{} bytes>", self.bytes.len()))
            .field("file_name", &self.file_name)
            .field("mime", &self.mime)
            .finish()
    }
}

impl Image {
    /// Wraps raw image bytes. The part's file name defaults to `image`.
    #[must_use]
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
            file_name: "image".to_string(),
            mime: None,
        }
    }

    /// Reads an image from disk, taking the file name and a MIME type guessed
    /// from the extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub async fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let mut image = Self::new(bytes);
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            image.file_name = name.to_string();
        }
        image.mime = path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(mime_for_extension)
            .map(String::from);
        Ok(image)
    }

    #[must_use]
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }

    #[must_use]
    pub fn with_mime(mut self, mime: impl Into<String>) -> Self {
        self.mime = Some(mime.into());
        self
    }
}

fn mime_for_extension(ext: &str) -> Option<&'static str> {
    match ext.to_ascii_lowercase().as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "svg" => Some("image/svg+xml"),
        _ => None,
    }
}

/// Optional event fields shared by [`NewEvent`] and [`EventUpdate`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EventFields {
    /// Description (HTML allowed)
    pub description: Option<String>,
    /// End time as a Unix timestamp
    pub end_datetime: Option<i64>,
    pub place_latitude: Option<f64>,
    pub place_longitude: Option<f64>,
    /// Tag names. On update this replaces the existing tags.
    pub tags: Option<Vec<String>>,
    /// URLs for online participation
    pub online_locations: Option<Vec<String>>,
    pub image: Option<Image>,
    /// URL of an image the server should fetch
    pub image_url: Option<String>,
    /// Whether the event spans multiple days
    pub multidate: Option<bool>,
    pub recurrent: Option<Recurrence>,
}

impl EventFields {
    /// Text form fields. The image travels separately as a file part.
    pub(crate) fn push_form_fields(&self, fields: &mut Vec<(&'static str, String)>) {
        push_opt(fields, "description", self.description.as_deref());
        push_opt(fields, "end_datetime", self.end_datetime);
        push_opt(fields, "place_latitude", self.place_latitude);
        push_opt(fields, "place_longitude", self.place_longitude);
        push_list(fields, "tags[]", self.tags.as_deref());
        push_list(fields, "online_locations[]", self.online_locations.as_deref());
        push_opt(fields, "image_url", self.image_url.as_deref());
        push_opt(fields, "multidate", self.multidate);
        push_opt(
            fields,
            "recurrent",
            self.recurrent.as_ref(),
        );
    }
}

/// A new event.
///
/// # Example
///
/// ```
/// use gancio_rs::{NewEvent, WithEventFields};
///
/// let event = NewEvent::new("Open mic", 1_767_200_400, "The Cellar", "1 Main St")
///     .with_description("<p>Bring your guitar</p>")
///     .with_tags(["music"]);
/// assert_eq!(event.title, "Open mic");
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct NewEvent {
    pub title: String,
    /// Start time as a Unix timestamp
    pub start_datetime: i64,
    pub place_name: String,
    pub place_address: String,
    pub fields: EventFields,
}

impl NewEvent {
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        start_datetime: i64,
        place_name: impl Into<String>,
        place_address: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            start_datetime,
            place_name: place_name.into(),
            place_address: place_address.into(),
            fields: EventFields::default(),
        }
    }

    pub(crate) fn form_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("title", self.title.clone()),
            ("start_datetime", self.start_datetime.to_string()),
            ("place_name", self.place_name.clone()),
            ("place_address", self.place_address.clone()),
        ];
        self.fields.push_form_fields(&mut fields);
        fields
    }
}

impl HasEventFields for NewEvent {
    fn event_fields_mut(&mut self) -> &mut EventFields {
        &mut self.fields
    }
}

/// A partial update of an existing event. Unset fields keep their server-side value.
#[derive(Clone, Debug, PartialEq)]
pub struct EventUpdate {
    pub id: u64,
    pub title: Option<String>,
    /// Start time as a Unix timestamp
    pub start_datetime: Option<i64>,
    pub place_name: Option<String>,
    pub place_address: Option<String>,
    pub fields: EventFields,
}

impl EventUpdate {
    #[must_use]
    pub fn new(id: u64) -> Self {
        Self {
            id,
            title: None,
            start_datetime: None,
            place_name: None,
            place_address: None,
            fields: EventFields::default(),
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_start_datetime(mut self, start_datetime: i64) -> Self {
        self.start_datetime = Some(start_datetime);
        self
    }

    #[must_use]
    pub fn with_place_name(mut self, place_name: impl Into<String>) -> Self {
        self.place_name = Some(place_name.into());
        self
    }

    #[must_use]
    pub fn with_place_address(mut self, place_address: impl Into<String>) -> Self {
        self.place_address = Some(place_address.into());
        self
    }

    pub(crate) fn form_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![("id", self.id.to_string())];
        push_opt(&mut fields, "title", self.title.as_deref());
        push_opt(&mut fields, "start_datetime", self.start_datetime);
        push_opt(&mut fields, "place_name", self.place_name.as_deref());
        push_opt(&mut fields, "place_address", self.place_address.as_deref());
        self.fields.push_form_fields(&mut fields);
        fields
    }
}

impl HasEventFields for EventUpdate {
    fn event_fields_mut(&mut self) -> &mut EventFields {
        &mut self.fields
    }
}

/// Changes to a static page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageUpdate {
    /// Page content (HTML)
    pub content: String,
    pub title: Option<String>,
    /// Whether the page is shown in the navigation
    pub visible: Option<bool>,
}

impl PageUpdate {
    #[must_use]
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            title: None,
            visible: None,
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = Some(visible);
        self
    }

    pub(crate) fn form_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![("content", self.content.clone())];
        push_opt(&mut fields, "title", self.title.as_deref());
        push_opt(&mut fields, "visible", self.visible);
        fields
    }
}

fn push_opt<T: ToString>(pairs: &mut Vec<(&'static str, String)>, key: &'static str, value: Option<T>) {
    if let Some(value) = value {
        pairs.push((key, value.to_string()));
    }
}

fn push_list(pairs: &mut Vec<(&'static str, String)>, key: &'static str, values: Option<&[String]>) {
    if let Some(values) = values {
        pairs.extend(values.iter().map(|v| (key, v.clone())));
    }
}
