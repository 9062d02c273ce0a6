//! Blocking client.
//!
//! [`Gancio`] wraps the async [`crate::Gancio`] and drives each call to
//! completion on its own current-thread tokio runtime, so it can be used from
//! plain synchronous code. Do not call it from inside an async runtime.
//!
//! # Example
//!
//! ```no_run
//! use gancio_rs::blocking::Gancio;
//! use gancio_rs::EventFilter;
//!
//! # fn main() -> Result<(), gancio_rs::GancioError> {
//! let mut client = Gancio::new("http://localhost:13120")?;
//! client.login("admin@example.org", "password")?;
//! for event in client.get_events(&EventFilter::new().with_max(5))? {
//!     println!("{}", event.title);
//! }
//! # Ok(())
//! # }
//! ```

use crate::errors::GancioError;
use crate::request::{DatabaseConfig, EventFilter, EventUpdate, NewEvent, PageUpdate};
use crate::response::{AdminCredentials, Event, LoginResponse, Page, Place, PlaceEvents, User};
use std::future::Future;
use tokio::runtime::{Builder as RuntimeBuilder, Runtime};

/// Synchronous client for the Gancio API.
#[derive(Debug)]
pub struct Gancio {
    inner: crate::Gancio,
    runtime: Runtime,
}

impl Gancio {
    /// Creates an unauthenticated blocking client.
    ///
    /// # Errors
    ///
    /// Returns [`GancioError::ClientBuild`] if the runtime cannot be created.
    pub fn new(url: impl Into<String>) -> Result<Self, GancioError> {
        Self::from_async(crate::Gancio::new(url))
    }

    /// Creates a blocking client that authenticates with an existing access token.
    ///
    /// # Errors
    ///
    /// Returns [`GancioError::ClientBuild`] if the runtime cannot be created.
    pub fn with_access_token(
        url: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Result<Self, GancioError> {
        Self::from_async(crate::Gancio::with_access_token(url, access_token))
    }

    /// Wraps an async client, e.g. one made with [`crate::Gancio::builder`].
    ///
    /// # Errors
    ///
    /// Returns [`GancioError::ClientBuild`] if the runtime cannot be created.
    pub fn from_async(inner: crate::Gancio) -> Result<Self, GancioError> {
        let runtime = RuntimeBuilder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| GancioError::ClientBuild(format!("blocking runtime: {e}")))?;
        Ok(Self { inner, runtime })
    }

    /// The wrapped async client.
    #[must_use]
    pub fn inner(&self) -> &crate::Gancio {
        &self.inner
    }

    #[must_use]
    pub fn url(&self) -> &str {
        self.inner.url()
    }

    #[must_use]
    pub fn access_token(&self) -> Option<&str> {
        self.inner.access_token()
    }

    #[must_use]
    pub fn refresh_token(&self) -> Option<&str> {
        self.inner.refresh_token()
    }

    pub fn set_access_token(&mut self, access_token: Option<String>) {
        self.inner.set_access_token(access_token);
    }

    fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    /// See [`crate::Gancio::setup_db`].
    pub fn setup_db(&self, db: &DatabaseConfig) -> Result<(), GancioError> {
        self.block_on(self.inner.setup_db(db))
    }

    /// See [`crate::Gancio::setup_restart`].
    pub fn setup_restart(&self) -> Result<AdminCredentials, GancioError> {
        self.block_on(self.inner.setup_restart())
    }

    /// See [`crate::Gancio::login`].
    pub fn login(&mut self, username: &str, password: &str) -> Result<LoginResponse, GancioError> {
        // `self.block_on` would borrow all of `self` while `inner` is mutably borrowed.
        self.runtime.block_on(self.inner.login(username, password))
    }

    /// See [`crate::Gancio::get_user`].
    pub fn get_user(&self) -> Result<User, GancioError> {
        self.block_on(self.inner.get_user())
    }

    /// See [`crate::Gancio::get_events`].
    pub fn get_events(&self, filter: &EventFilter) -> Result<Vec<Event>, GancioError> {
        self.block_on(self.inner.get_events(filter))
    }

    /// See [`crate::Gancio::get_event`].
    pub fn get_event(&self, slug: &str) -> Result<Event, GancioError> {
        self.block_on(self.inner.get_event(slug))
    }

    /// See [`crate::Gancio::create_event`].
    pub fn create_event(&self, event: NewEvent) -> Result<Event, GancioError> {
        self.block_on(self.inner.create_event(event))
    }

    /// See [`crate::Gancio::update_event`].
    pub fn update_event(&self, update: EventUpdate) -> Result<Event, GancioError> {
        self.block_on(self.inner.update_event(update))
    }

    /// See [`crate::Gancio::delete_event`].
    pub fn delete_event(&self, event_id: u64) -> Result<(), GancioError> {
        self.block_on(self.inner.delete_event(event_id))
    }

    /// See [`crate::Gancio::confirm_event`].
    pub fn confirm_event(&self, event_id: u64) -> Result<(), GancioError> {
        self.block_on(self.inner.confirm_event(event_id))
    }

    /// See [`crate::Gancio::search_place`].
    pub fn search_place(&self, query: &str) -> Result<Vec<Place>, GancioError> {
        self.block_on(self.inner.search_place(query))
    }

    /// See [`crate::Gancio::get_place`].
    pub fn get_place(&self, place_name: &str) -> Result<Option<Place>, GancioError> {
        self.block_on(self.inner.get_place(place_name))
    }

    /// See [`crate::Gancio::get_place_events`].
    pub fn get_place_events(&self, place_name: &str) -> Result<Option<PlaceEvents>, GancioError> {
        self.block_on(self.inner.get_place_events(place_name))
    }

    /// See [`crate::Gancio::update_page`].
    pub fn update_page(&self, page_id: u64, update: PageUpdate) -> Result<Page, GancioError> {
        self.block_on(self.inner.update_page(page_id, update))
    }
}
