use crate::errors::GancioError;
use crate::http::common::{Endpoint, construct_endpoint_url};
use crate::http::error_helpers::{check_response, deserialize_with_context};
use crate::http::loud_wire;
use crate::http::payload::Payload;
use crate::request::{DatabaseConfig, EventFilter, EventUpdate, NewEvent, PageUpdate};
use crate::response::{AdminCredentials, Event, LoginResponse, Page, Place, PlaceEvents, User};
use reqwest::{Client as ReqwestClient, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info};

/// OAuth grant type used by [`Gancio::login`].
const GRANT_TYPE: &str = "password";

/// OAuth client id Gancio reserves for its own frontend.
const CLIENT_ID: &str = "self";

/// Async client for the Gancio API.
///
/// Holds the instance URL and, once set by the constructor or [`Gancio::login`],
/// the OAuth tokens. Every request carries `Authorization: Bearer <token>` while
/// an access token is present.
#[derive(Clone)]
pub struct Gancio {
    url: String,
    access_token: Option<String>,
    refresh_token: Option<String>,
    #[allow(clippy::struct_field_names)]
    http_client: ReqwestClient,
}

impl std::fmt::Debug for Gancio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gancio")
            .field("url", &self.url)
            .field("authenticated", &self.is_authenticated())
            .finish_non_exhaustive()
    }
}

/// Builder for [`Gancio`] instances.
///
/// # Example
///
/// ```
/// use gancio_rs::Gancio;
/// use std::time::Duration;
///
/// let client = Gancio::builder("https://gancio.example.org/")
///     .timeout(Duration::from_secs(30))
///     .connect_timeout(Duration::from_secs(5))
///     .build()
///     .expect("client should build");
/// assert_eq!(client.url(), "https://gancio.example.org");
/// ```
#[derive(Debug)]
pub struct GancioBuilder {
    url: String,
    access_token: Option<String>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl GancioBuilder {
    /// Authenticates every request with this OAuth access token.
    #[must_use]
    pub fn access_token(mut self, access_token: impl Into<String>) -> Self {
        self.access_token = Some(access_token.into());
        self
    }

    /// Sets the total request timeout.
    ///
    /// If not set, uses reqwest's default (no timeout).
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the connection timeout.
    #[must_use]
    pub const fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Overrides the `User-Agent` header.
    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Builds the [`Gancio`] client.
    ///
    /// # Errors
    ///
    /// Returns [`GancioError::ClientBuild`] if the HTTP client cannot be created
    /// (for example when the TLS backend fails to initialize).
    pub fn build(self) -> Result<Gancio, GancioError> {
        let mut builder = ReqwestClient::builder().user_agent(
            self.user_agent
                .unwrap_or_else(|| concat!("gancio-rs/", env!("CARGO_PKG_VERSION")).to_string()),
        );

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        if let Some(connect_timeout) = self.connect_timeout {
            builder = builder.connect_timeout(connect_timeout);
        }

        let http_client = builder
            .build()
            .map_err(|e| GancioError::ClientBuild(e.to_string()))?;

        Ok(Gancio {
            url: normalize_url(self.url),
            access_token: self.access_token,
            refresh_token: None,
            http_client,
        })
    }
}

/// Removes exactly one trailing slash.
fn normalize_url(url: String) -> String {
    match url.strip_suffix('/') {
        Some(stripped) => stripped.to_string(),
        None => url,
    }
}

impl Gancio {
    /// Creates a new builder for the instance at `url`.
    #[must_use]
    pub fn builder(url: impl Into<String>) -> GancioBuilder {
        GancioBuilder {
            url: url.into(),
            access_token: None,
            timeout: None,
            connect_timeout: None,
            user_agent: None,
        }
    }

    /// Creates an unauthenticated client with default HTTP settings.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: normalize_url(url.into()),
            access_token: None,
            refresh_token: None,
            http_client: ReqwestClient::new(),
        }
    }

    /// Creates a client that authenticates with an existing access token.
    #[must_use]
    pub fn with_access_token(url: impl Into<String>, access_token: impl Into<String>) -> Self {
        let mut client = Self::new(url);
        client.access_token = Some(access_token.into());
        client
    }

    /// Base URL without its trailing slash.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    #[must_use]
    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    /// Refresh token from the last successful [`Gancio::login`].
    #[must_use]
    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref()
    }

    /// Replaces the access token used for subsequent requests.
    pub fn set_access_token(&mut self, access_token: Option<String>) {
        self.access_token = access_token;
    }

    /// Returns true if requests will carry a bearer token.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.bearer().is_some()
    }

    fn bearer(&self) -> Option<&str> {
        self.access_token.as_deref().filter(|t| !t.is_empty())
    }

    /// Sends one request and returns the response if its status is below 400.
    async fn execute(
        &self,
        endpoint: Endpoint<'_>,
        payload: Payload,
    ) -> Result<(usize, Response), GancioError> {
        let method = endpoint.method();
        let url = construct_endpoint_url(&self.url, &endpoint);

        let request_id = loud_wire::next_request_id();
        loud_wire::log_request(
            request_id,
            method.as_str(),
            &url,
            self.is_authenticated(),
            &payload,
        );
        debug!("Sending {} {}", method, url);

        let mut request = self.http_client.request(method.clone(), &url);
        if let Some(token) = self.bearer() {
            request = request.bearer_auth(token);
        }

        let response = payload.apply(request)?.send().await?;
        loud_wire::log_response_status(request_id, response.status().as_u16());

        match check_response(method.as_str(), response).await {
            Ok(response) => Ok((request_id, response)),
            Err(err) => {
                if let Some(body) = err.response_body() {
                    loud_wire::log_response_body(request_id, body);
                }
                debug!("Request failed: {}", err);
                Err(err)
            }
        }
    }

    async fn request_json<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint<'_>,
        payload: Payload,
        context: &str,
    ) -> Result<T, GancioError> {
        let (request_id, response) = self.execute(endpoint, payload).await?;
        let text = response.text().await?;
        loud_wire::log_response_body(request_id, &text);
        deserialize_with_context(&text, context)
    }

    async fn request_empty(
        &self,
        endpoint: Endpoint<'_>,
        payload: Payload,
    ) -> Result<(), GancioError> {
        self.execute(endpoint, payload).await.map(|_| ())
    }

    // --- Setup ---

    /// Configures the database during first-run setup.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the instance is already set up.
    pub async fn setup_db(&self, db: &DatabaseConfig) -> Result<(), GancioError> {
        debug!("Configuring database: {:?}", db);
        let body = serde_json::json!({ "db": db });
        self.request_empty(Endpoint::SetupDb, Payload::Json(body))
            .await
    }

    /// Completes first-run setup. The instance creates an admin account and
    /// restarts, so allow it a moment before the next call.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is not the
    /// expected credentials object.
    pub async fn setup_restart(&self) -> Result<AdminCredentials, GancioError> {
        let credentials: AdminCredentials = self
            .request_json(
                Endpoint::SetupRestart,
                Payload::Empty,
                "AdminCredentials from setup",
            )
            .await?;
        info!("Setup complete, admin account {}", credentials.email);
        Ok(credentials)
    }

    // --- Auth ---

    /// Logs in with a password grant and stores both tokens on the client.
    ///
    /// # Errors
    ///
    /// Returns [`GancioError::Api`] if the credentials are rejected.
    pub async fn login(
        &mut self,
        username: &str,
        password: &str,
    ) -> Result<LoginResponse, GancioError> {
        let form = vec![
            ("username", username.to_string()),
            ("password", password.to_string()),
            ("grant_type", GRANT_TYPE.to_string()),
            ("client_id", CLIENT_ID.to_string()),
        ];
        let login: LoginResponse = self
            .request_json(Endpoint::Login, Payload::Form(form), "LoginResponse")
            .await?;

        self.access_token = Some(login.access_token.clone());
        self.refresh_token = Some(login.refresh_token.clone());
        info!("Logged in as '{}' @ {}", login.username, self.url);

        Ok(login)
    }

    // --- User ---

    /// Returns the currently authenticated user.
    ///
    /// # Errors
    ///
    /// Returns [`GancioError::Api`] if the client is not authenticated.
    pub async fn get_user(&self) -> Result<User, GancioError> {
        self.request_json(Endpoint::CurrentUser, Payload::Empty, "User")
            .await
    }

    // --- Events ---

    /// Fetches events matching `filter`. An empty filter returns upcoming events.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is not an event list.
    pub async fn get_events(&self, filter: &EventFilter) -> Result<Vec<Event>, GancioError> {
        let events: Vec<Event> = self
            .request_json(
                Endpoint::Events,
                Payload::Query(filter.to_query_pairs()),
                "Vec<Event> from list",
            )
            .await?;
        debug!("Fetched {} events", events.len());
        Ok(events)
    }

    /// Fetches an event by its slug.
    ///
    /// # Errors
    ///
    /// Returns [`GancioError::Api`] with status 404 if no event has this slug.
    pub async fn get_event(&self, slug: &str) -> Result<Event, GancioError> {
        self.request_json(
            Endpoint::EventDetail { slug },
            Payload::Empty,
            "Event from detail",
        )
        .await
    }

    /// Creates an event.
    ///
    /// # Errors
    ///
    /// Returns an error if the request is rejected or cannot be encoded.
    pub async fn create_event(&self, event: NewEvent) -> Result<Event, GancioError> {
        let payload = Payload::Multipart {
            fields: event.form_fields(),
            image: event.fields.image,
        };
        let created: Event = self
            .request_json(Endpoint::CreateEvent, payload, "Event from create")
            .await?;
        info!("Created event {} ({})", created.id, created.slug);
        Ok(created)
    }

    /// Updates an event. Only the fields set on `update` change.
    ///
    /// # Errors
    ///
    /// Returns an error if the request is rejected or cannot be encoded.
    pub async fn update_event(&self, update: EventUpdate) -> Result<Event, GancioError> {
        let payload = Payload::Multipart {
            fields: update.form_fields(),
            image: update.fields.image,
        };
        let updated: Event = self
            .request_json(Endpoint::UpdateEvent, payload, "Event from update")
            .await?;
        info!("Updated event {} ({})", updated.id, updated.slug);
        Ok(updated)
    }

    /// Deletes an event.
    ///
    /// # Errors
    ///
    /// Returns [`GancioError::Api`] if the server refuses the deletion.
    pub async fn delete_event(&self, event_id: u64) -> Result<(), GancioError> {
        self.request_empty(Endpoint::DeleteEvent { id: event_id }, Payload::Empty)
            .await?;
        info!("Deleted event with ID '{}'", event_id);
        Ok(())
    }

    /// Confirms a pending event.
    ///
    /// # Errors
    ///
    /// Returns [`GancioError::Api`] if the server refuses the confirmation.
    pub async fn confirm_event(&self, event_id: u64) -> Result<(), GancioError> {
        self.request_empty(Endpoint::ConfirmEvent { id: event_id }, Payload::Empty)
            .await?;
        info!("Confirmed event '{}'", event_id);
        Ok(())
    }

    // --- Places ---

    /// Searches places by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is not a place list.
    pub async fn search_place(&self, query: &str) -> Result<Vec<Place>, GancioError> {
        self.request_json(
            Endpoint::SearchPlace,
            Payload::Query(vec![("search", query.to_string())]),
            "Vec<Place> from search",
        )
        .await
    }

    /// Returns the first place matching `place_name`, or `None` when the search
    /// comes back empty.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`Gancio::search_place`].
    pub async fn get_place(&self, place_name: &str) -> Result<Option<Place>, GancioError> {
        Ok(self.search_place(place_name).await?.into_iter().next())
    }

    /// Fetches a place with its upcoming events, or `None` if the place does not
    /// exist.
    ///
    /// # Errors
    ///
    /// Any error other than a 404 is returned unchanged.
    pub async fn get_place_events(
        &self,
        place_name: &str,
    ) -> Result<Option<PlaceEvents>, GancioError> {
        match self
            .request_json(
                Endpoint::PlaceEvents { name: place_name },
                Payload::Empty,
                "PlaceEvents",
            )
            .await
        {
            Ok(place_events) => Ok(Some(place_events)),
            Err(err) if err.is_not_found() => {
                debug!("Place '{}' not found", place_name);
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    // --- Pages ---

    /// Updates a static page.
    ///
    /// # Errors
    ///
    /// Returns an error if the request is rejected.
    pub async fn update_page(&self, page_id: u64, update: PageUpdate) -> Result<Page, GancioError> {
        let page: Page = self
            .request_json(
                Endpoint::UpdatePage { id: page_id },
                Payload::Form(update.form_fields()),
                "Page from update",
            )
            .await?;
        info!("Updated page {}", page.id);
        Ok(page)
    }
}
