use std::fmt;

use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::{Error, Response, StatusCode, Url};
use serde::de::DeserializeOwned;

use crate::api::activities::{MutationResponse, Roster};

pub mod activities;

pub type Result<T> = std::result::Result<T, ApiError>;

/// Characters left untouched by JavaScript's `encodeURIComponent`
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

#[derive(Debug)]
pub struct HttpError {
    status: StatusCode,
    reason: String,
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(error {}: {})", self.status, self.reason)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Url error: {0}")]
    InvalidUrl(String),
    #[error("Reqwest error: {0}")]
    ReqwestError(String),
    #[error("Http error: {0}")]
    NonSuccess(HttpError),
    #[error("Malformed response body: {0}")]
    MalformedBody(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(e: Error) -> Self {
        Self::ReqwestError(e.to_string())
    }
}

/// The operations the roster client needs from the activities API
///
/// Implementations are driven from a single threaded event loop, hence no `Send` bound.
#[async_trait(?Send)]
pub trait ActivitiesApi {
    /// Calls *GET '/activities'*, bypassing every cache on the way
    async fn activities(&self) -> Result<Roster>;

    /// Calls *POST '/activities/{activity}/signup?email={email}'*
    async fn signup(&self, activity: &str, email: &str) -> Result<MutationResponse>;

    /// Calls *DELETE '/activities/{activity}/participants?email={email}'*
    async fn unregister(&self, activity: &str, email: &str) -> Result<MutationResponse>;
}

pub(crate) async fn parse_json_response<T>(response: Response) -> Result<T>
where
    T: DeserializeOwned,
{
    if !response.status().is_success() {
        return Err(ApiError::NonSuccess(HttpError {
            status: response.status(),
            reason: response.text().await?,
        }));
    }

    let body = response.bytes().await?;

    serde_json::from_slice(&body).map_err(|e| ApiError::MalformedBody(e.to_string()))
}

pub(crate) async fn parse_mutation_response(response: Response) -> Result<MutationResponse> {
    let status = response.status();
    let body = response.bytes().await?;

    Ok(MutationResponse::decode(status, &body))
}

/// Builds the URL of a per-activity endpoint
///
/// Both the activity name and the email are percent-encoded the way browsers encode URI components.
pub fn activity_url(base_url: &Url, activity: &str, endpoint: &str, email: &str) -> Result<Url> {
    let path = format!(
        "/activities/{}/{}?email={}",
        utf8_percent_encode(activity, COMPONENT),
        endpoint,
        utf8_percent_encode(email, COMPONENT)
    );

    base_url
        .join(&path)
        .map_err(|e| ApiError::InvalidUrl(e.to_string()))
}
