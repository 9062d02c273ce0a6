//! # gancio-rs
//!
//! A Rust client library for the [Gancio](https://gancio.org) event-publishing API.
//!
//! The async [`Gancio`] client covers first-run setup, login, events, places and
//! pages. [`blocking::Gancio`] offers the same calls for synchronous code.
//!
//! ## Quick Start
//!
//! ```no_run
//! use gancio_rs::{Gancio, NewEvent, WithEventFields};
//!
//! # async fn example() -> Result<(), gancio_rs::GancioError> {
//! let mut client = Gancio::new("https://gancio.example.org");
//! client.login("admin@example.org", "password").await?;
//!
//! let created = client
//!     .create_event(
//!         NewEvent::new("Open mic", 1_767_200_400, "The Cellar", "1 Main St")
//!             .with_tags(["music", "free"]),
//!     )
//!     .await?;
//!
//! let fetched = client.get_event(&created.slug).await?;
//! assert_eq!(fetched.title, "Open mic");
//! # Ok(())
//! # }
//! ```
//!
//! ## Errors
//!
//! A response with status 400 or above becomes [`GancioError::Api`] carrying the
//! status code and body. Set `LOUD_WIRE=1` to print every request and response
//! to stderr.

pub mod blocking;
mod builder_traits;
mod client;
mod errors;
mod http;
mod request;
mod response;


pub use builder_traits::{HasEventFields, WithEventFields};
pub use client::{Gancio, GancioBuilder};
pub use errors::GancioError;
pub use request::{
    DEFAULT_SQLITE_STORAGE, DatabaseConfig, EventFields, EventFilter, EventUpdate, Image,
    NewEvent, PageUpdate, Recurrence,
};
pub use response::{AdminCredentials, Event, LoginResponse, Page, Place, PlaceEvents, User};
