//! Client for the activities REST API.
//!
//! The API is consumed through the [`ActivitiesApi`] trait. [`RosterSession`] is the HTTP
//! implementation; hosts and tests may provide their own.
use reqwest::{Client, Url};
use std::rc::Rc;
use std::time::Duration;

pub mod api;

pub use crate::api::activities::{Activity, MutationResponse, Roster};
pub use crate::api::{ActivitiesApi, ApiError, Result};
pub use reqwest::StatusCode;

/// The session configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Origin of the activities API, e.g. `http://localhost:8000/`
    pub base_url: Url,
    /// Upper bound for a single request, connect phase included
    pub timeout: Duration,
}

/// A session with the activities API
///
/// Holds the reusable connection pool, all requests of the client go through it.
#[derive(Debug)]
pub struct RosterSession {
    /// Reusable reqwest connection pool
    pub http_client: Client,
    /// Configuration for this session
    pub config: Rc<Config>,
}

impl RosterSession {
    /// Creates a new session
    pub fn new(config: Rc<Config>) -> Result<Self> {
        let http_client = Client::builder().timeout(config.timeout).build()?;

        Ok(RosterSession {
            http_client,
            config,
        })
    }
}
