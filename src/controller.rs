//! Signup and unregister, the two mutations a user can trigger.
//!
//! Both follow the same sequence: issue the mutating request, on success refetch and re-render
//! the roster, then report the outcome through the banner. The success message is only shown
//! once the refreshed roster is visible.

use async_trait::async_trait;
use roster_api_client::MutationResponse;
use validator::Validate;

use crate::banner::OutcomeMessage;
use crate::App;

/// A user intent, produced by the signup form or a rendered removal control
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Signup { activity: String, email: String },
    Unregister { activity: String, email: String },
}

/// Asks the user a yes/no question before a destructive action
#[async_trait(?Send)]
pub trait Confirm {
    async fn confirm(&self, question: &str) -> bool;
}

#[derive(Debug, Validate)]
struct SignupIntent {
    #[validate(email)]
    email: String,
    #[validate(length(min = 1))]
    activity: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mutation {
    Signup,
    Unregister,
}

impl Mutation {
    /// Shown when the server rejected the request without a usable `detail`
    fn fallback_detail(self) -> &'static str {
        match self {
            Mutation::Signup => "An error occurred",
            Mutation::Unregister => "An error occurred while unregistering",
        }
    }

    /// Shown when the request did not complete or the answer made no sense
    fn failure(self) -> &'static str {
        match self {
            Mutation::Signup => "Failed to sign up. Please try again.",
            Mutation::Unregister => "Failed to unregister. Please try again.",
        }
    }

    fn gerund(self) -> &'static str {
        match self {
            Mutation::Signup => "signing up",
            Mutation::Unregister => "unregistering",
        }
    }
}

impl App {
    /// Runs a command to completion
    ///
    /// Returns the reported outcome, or `None` if the command was abandoned before any request
    /// was made.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a [`tokio::task::LocalSet`], see
    /// [`Banner::show`](crate::banner::Banner::show).
    pub async fn dispatch(&self, command: Command) -> Option<OutcomeMessage> {
        match command {
            Command::Signup { activity, email } => {
                Some(self.submit_signup(&email, &activity).await)
            }
            Command::Unregister { activity, email } => {
                self.submit_unregister(&email, &activity).await
            }
        }
    }

    /// Signs `email` up for `activity`
    ///
    /// # Panics
    ///
    /// Panics if called outside of a [`tokio::task::LocalSet`], see
    /// [`Banner::show`](crate::banner::Banner::show).
    pub async fn submit_signup(&self, email: &str, activity: &str) -> OutcomeMessage {
        let intent = SignupIntent {
            email: email.trim().to_owned(),
            activity: activity.to_owned(),
        };

        if let Err(errors) = intent.validate() {
            log::debug!("rejected signup form: {}", errors);

            let text = if errors.field_errors().contains_key("email") {
                "Please enter a valid email address."
            } else {
                "Please select an activity."
            };

            let outcome = OutcomeMessage::error(text);
            self.banner.show(outcome.clone());
            return outcome;
        }

        let result = self.api.signup(&intent.activity, &intent.email).await;

        self.settle(Mutation::Signup, result).await
    }

    /// Removes `email` from `activity` after the user confirmed it
    ///
    /// # Panics
    ///
    /// Panics if called outside of a [`tokio::task::LocalSet`], see
    /// [`Banner::show`](crate::banner::Banner::show).
    pub async fn submit_unregister(&self, email: &str, activity: &str) -> Option<OutcomeMessage> {
        if email.is_empty() || activity.is_empty() {
            return None;
        }

        let question = format!("Unregister {} from {}?", email, activity);

        if !self.confirm.confirm(&question).await {
            log::debug!("unregister of {} from {} declined", email, activity);
            return None;
        }

        let result = self.api.unregister(activity, email).await;

        Some(self.settle(Mutation::Unregister, result).await)
    }

    async fn settle(
        &self,
        mutation: Mutation,
        result: roster_api_client::Result<MutationResponse>,
    ) -> OutcomeMessage {
        let outcome = match result {
            Ok(MutationResponse::Confirmed { message }) => {
                if mutation == Mutation::Signup {
                    self.document.borrow_mut().signup_form.reset();
                }

                self.store.refresh().await;

                OutcomeMessage::success(message)
            }
            Ok(MutationResponse::Rejected { status, detail }) => {
                log::warn!(
                    "server rejected {} with status {}: {:?}",
                    mutation.gerund(),
                    status,
                    detail
                );

                OutcomeMessage::error(
                    detail.unwrap_or_else(|| mutation.fallback_detail().to_owned()),
                )
            }
            Ok(MutationResponse::Undecodable { status }) => {
                log::error!(
                    "Error {}: undecodable response body (status {})",
                    mutation.gerund(),
                    status
                );

                OutcomeMessage::error(mutation.failure())
            }
            Err(e) => {
                log::error!("Error {}: {}", mutation.gerund(), e);

                OutcomeMessage::error(mutation.failure())
            }
        };

        self.banner.show(outcome.clone());

        outcome
    }
}
