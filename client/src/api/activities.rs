use async_trait::async_trait;
use indexmap::IndexMap;
use reqwest::header::{CACHE_CONTROL, PRAGMA};
use reqwest::StatusCode;
use serde::Deserialize;

use crate::api::{
    activity_url, parse_json_response, parse_mutation_response, ActivitiesApi, ApiError, Result,
};
use crate::RosterSession;

/// A single activity as reported by *GET '/activities'*
///
/// Additional fields sent by the server are ignored.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Activity {
    pub description: String,
    pub schedule: String,
    pub max_participants: u32,
    /// Participant identifiers in server order
    pub participants: Vec<String>,
}

impl Activity {
    /// Remaining capacity, negative when the server over-allocated
    pub fn spots_left(&self) -> i64 {
        i64::from(self.max_participants) - self.participants.len() as i64
    }
}

/// Snapshot of all activities keyed by name, in the order the server sent them
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Roster(IndexMap<String, Activity>);

impl Roster {
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Activity)> {
        self.0.iter().map(|(name, activity)| (name.as_str(), activity))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn get(&self, name: &str) -> Option<&Activity> {
        self.0.get(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, Activity)> for Roster {
    fn from_iter<I: IntoIterator<Item = (String, Activity)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Decoded answer of a signup or unregister request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationResponse {
    /// 2xx with a `message` body
    Confirmed { message: String },
    /// Non-success status, `detail` is only kept if the server sent it as a string
    Rejected {
        status: StatusCode,
        detail: Option<String>,
    },
    /// The body did not match the schema for its status
    Undecodable { status: StatusCode },
}

#[derive(Deserialize)]
struct Confirmation {
    message: String,
}

#[derive(Deserialize)]
struct Rejection {
    #[serde(default)]
    detail: Option<serde_json::Value>,
}

impl MutationResponse {
    pub fn decode(status: StatusCode, body: &[u8]) -> Self {
        if status.is_success() {
            match serde_json::from_slice::<Confirmation>(body) {
                Ok(confirmation) => Self::Confirmed {
                    message: confirmation.message,
                },
                Err(_) => Self::Undecodable { status },
            }
        } else {
            match serde_json::from_slice::<Rejection>(body) {
                Ok(rejection) => Self::Rejected {
                    status,
                    detail: rejection
                        .detail
                        .and_then(|detail| detail.as_str().map(str::to_owned)),
                },
                Err(_) => Self::Undecodable { status },
            }
        }
    }
}

#[async_trait(?Send)]
impl ActivitiesApi for RosterSession {
    async fn activities(&self) -> Result<Roster> {
        let url = self
            .config
            .base_url
            .join("/activities")
            .map_err(|e| ApiError::InvalidUrl(e.to_string()))?;

        let response = self
            .http_client
            .get(url)
            .header(CACHE_CONTROL, "no-cache, no-store")
            .header(PRAGMA, "no-cache")
            .send()
            .await?;

        parse_json_response(response).await
    }

    async fn signup(&self, activity: &str, email: &str) -> Result<MutationResponse> {
        let url = activity_url(&self.config.base_url, activity, "signup", email)?;

        log::debug!("POST {}", url);
        let response = self.http_client.post(url).send().await?;

        parse_mutation_response(response).await
    }

    async fn unregister(&self, activity: &str, email: &str) -> Result<MutationResponse> {
        let url = activity_url(&self.config.base_url, activity, "participants", email)?;

        log::debug!("DELETE {}", url);
        let response = self.http_client.delete(url).send().await?;

        parse_mutation_response(response).await
    }
}
