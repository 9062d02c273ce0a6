//! Builder traits for the optional event fields shared by create and update requests.
//!
//! # Architecture
//!
//! [`NewEvent`] and [`EventUpdate`] both carry an [`EventFields`] block. By
//! implementing [`HasEventFields`], a request type automatically gets the
//! [`WithEventFields`] setters through a blanket impl.
//!
//! ```text
//! HasEventFields (accessor trait)
//!       ↓
//! WithEventFields (blanket impl for all T: HasEventFields)
//!       ↓
//! NewEvent, EventUpdate
//! ```
//!
//! # Example
//!
//! ```
//! use gancio_rs::{EventUpdate, Recurrence, WithEventFields};
//!
//! let update = EventUpdate::new(7)
//!     .with_tags(["jazz", "free"])
//!     .with_recurrent(Recurrence::weekly());
//! assert_eq!(update.fields.tags.as_ref().map(Vec::len), Some(2));
//! ```
//!
//! [`NewEvent`]: crate::NewEvent
//! [`EventUpdate`]: crate::EventUpdate
use crate::request::{EventFields, Image, Recurrence};

/// Gives mutable access to a request's [`EventFields`].
///
/// Implement this and [`WithEventFields`] comes for free.
pub trait HasEventFields {
    fn event_fields_mut(&mut self) -> &mut EventFields;
}

/// Fluent setters for [`EventFields`].
///
/// You should not implement this trait directly. Implement [`HasEventFields`]
/// instead.
pub trait WithEventFields: Sized {
    /// Sets the description (HTML allowed).
    #[must_use]
    fn with_description(self, description: impl Into<String>) -> Self;

    /// Sets the end time as a Unix timestamp.
    #[must_use]
    fn with_end_datetime(self, end_datetime: i64) -> Self;

    /// Sets the venue coordinates.
    #[must_use]
    fn with_coordinates(self, latitude: f64, longitude: f64) -> Self;

    /// Sets only the venue latitude.
    #[must_use]
    fn with_place_latitude(self, latitude: f64) -> Self;

    /// Sets only the venue longitude.
    #[must_use]
    fn with_place_longitude(self, longitude: f64) -> Self;

    /// Sets the tag names. On update this replaces the existing tags.
    #[must_use]
    fn with_tags<I, S>(self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>;

    /// Sets the URLs for online participation.
    #[must_use]
    fn with_online_locations<I, S>(self, locations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>;

    /// Attaches an image file.
    #[must_use]
    fn with_image(self, image: Image) -> Self;

    /// Points the server at an image to fetch.
    #[must_use]
    fn with_image_url(self, image_url: impl Into<String>) -> Self;

    /// Marks whether the event spans multiple days.
    #[must_use]
    fn with_multidate(self, multidate: bool) -> Self;

    /// Sets the recurrence rule.
    #[must_use]
    fn with_recurrent(self, recurrent: Recurrence) -> Self;
}

impl<T: HasEventFields> WithEventFields for T {
    fn with_description(mut self, description: impl Into<String>) -> Self {
        self.event_fields_mut().description = Some(description.into());
        self
    }

    fn with_end_datetime(mut self, end_datetime: i64) -> Self {
        self.event_fields_mut().end_datetime = Some(end_datetime);
        self
    }

    fn with_coordinates(mut self, latitude: f64, longitude: f64) -> Self {
        let fields = self.event_fields_mut();
        fields.place_latitude = Some(latitude);
        fields.place_longitude = Some(longitude);
        self
    }

    fn with_place_latitude(mut self, latitude: f64) -> Self {
        self.event_fields_mut().place_latitude = Some(latitude);
        self
    }

    fn with_place_longitude(mut self, longitude: f64) -> Self {
        self.event_fields_mut().place_longitude = Some(longitude);
        self
    }

    fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.event_fields_mut().tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    fn with_online_locations<I, S>(mut self, locations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.event_fields_mut().online_locations =
            Some(locations.into_iter().map(Into::into).collect());
        self
    }

    fn with_image(mut self, image: Image) -> Self {
        self.event_fields_mut().image = Some(image);
        self
    }

    fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        self.event_fields_mut().image_url = Some(image_url.into());
        self
    }

    fn with_multidate(mut self, multidate: bool) -> Self {
        self.event_fields_mut().multidate = Some(multidate);
        self
    }

    fn with_recurrent(mut self, recurrent: Recurrence) -> Self {
        self.event_fields_mut().recurrent = Some(recurrent);
        self
    }
}
