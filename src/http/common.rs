use reqwest::Method;

/// Represents the Gancio API endpoints this client talks to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint<'a> {
    /// Configure the database during first-run setup
    SetupDb,
    /// Finish first-run setup and create the admin account
    SetupRestart,
    /// Password grant
    Login,
    /// The authenticated user
    CurrentUser,
    /// List events
    Events,
    /// Fetch one event by slug
    EventDetail { slug: &'a str },
    /// Create an event
    CreateEvent,
    /// Update an event (the id travels in the form body)
    UpdateEvent,
    /// Delete an event by id
    DeleteEvent { id: u64 },
    /// Confirm a pending event
    ConfirmEvent { id: u64 },
    /// Search places by name
    SearchPlace,
    /// A place and its upcoming events
    PlaceEvents { name: &'a str },
    /// Update a static page
    UpdatePage { id: u64 },
}

impl Endpoint<'_> {
    /// HTTP method used for this endpoint
    pub fn method(&self) -> Method {
        match self {
            Self::SetupDb | Self::SetupRestart | Self::Login | Self::CreateEvent => Method::POST,
            Self::CurrentUser
            | Self::Events
            | Self::EventDetail { .. }
            | Self::SearchPlace
            | Self::PlaceEvents { .. } => Method::GET,
            Self::UpdateEvent | Self::ConfirmEvent { .. } | Self::UpdatePage { .. } => Method::PUT,
            Self::DeleteEvent { .. } => Method::DELETE,
        }
    }

    /// Constructs the URL path for this endpoint. Caller-supplied segments are
    /// percent-encoded.
    pub fn to_path(&self) -> String {
        match self {
            Self::SetupDb => "/api/setup/db".to_string(),
            Self::SetupRestart => "/api/setup/restart".to_string(),
            Self::Login => "/oauth/login".to_string(),
            Self::CurrentUser => "/api/user".to_string(),
            Self::Events => "/api/events".to_string(),
            Self::EventDetail { slug } => {
                format!("/api/event/detail/{}", urlencoding::encode(slug))
            }
            Self::CreateEvent | Self::UpdateEvent => "/api/event".to_string(),
            Self::DeleteEvent { id } => format!("/api/event/{id}"),
            Self::ConfirmEvent { id } => format!("/api/event/confirm/{id}"),
            Self::SearchPlace => "/api/place".to_string(),
            Self::PlaceEvents { name } => format!("/api/place/{}", urlencoding::encode(name)),
            Self::UpdatePage { id } => format!("/api/pages/{id}"),
        }
    }
}

/// Joins a base URL (already stripped of its trailing slash) with an endpoint path.
#[must_use]
pub fn construct_endpoint_url(base_url: &str, endpoint: &Endpoint) -> String {
    format!("{base_url}{}", endpoint.to_path())
}
