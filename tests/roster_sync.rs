use pretty_assertions::assert_eq;
use roster_api_client::{ApiError, MutationResponse, StatusCode};
use roster_client::banner::{OutcomeKind, OutcomeMessage};
use roster_client::controller::Command;
use roster_client::render::LOAD_FAILED;
use roster_client::view::SignupForm;
use tokio::task::LocalSet;

mod common;

use common::{activity, app, confirmed, roster, until, Answer, Reply, Request, ScriptedApi};

fn signup(activity: &str, email: &str) -> Command {
    Command::Signup {
        activity: activity.into(),
        email: email.into(),
    }
}

fn unregister(activity: &str, email: &str) -> Command {
    Command::Unregister {
        activity: activity.into(),
        email: email.into(),
    }
}

#[tokio::test]
async fn initial_load_renders_roster() {
    let api = ScriptedApi::new();
    api.push_roster(Reply::Ready(Ok(roster(&[
        ("Chess Club", activity(12, &["michael@mergington.edu"])),
        ("Choir", activity(40, &[])),
    ]))));

    let app = app(&api, Answer::new(true));

    LocalSet::new()
        .run_until(async {
            let loaded = app.load().await;

            assert_eq!(loaded.map(|roster| roster.len()), Some(2));
            assert_eq!(app.document().cards().len(), 2);
            assert_eq!(app.document().activity_options(), vec!["Chess Club", "Choir"]);
            assert_eq!(api.requests(), vec![Request::Activities]);
        })
        .await;
}

#[tokio::test]
async fn failed_load_shows_error_and_keeps_snapshot() {
    let api = ScriptedApi::new();
    api.push_roster(Reply::Ready(Ok(roster(&[(
        "Chess Club",
        activity(12, &["michael@mergington.edu"]),
    )]))));
    api.push_roster(Reply::Ready(Err(ApiError::ReqwestError(
        "connection refused".into(),
    ))));

    let app = app(&api, Answer::new(true));

    LocalSet::new()
        .run_until(async {
            let first = app.load().await;
            assert!(app.load().await.is_none());

            assert!(app.document().cards().is_empty());
            assert_eq!(app.document().activities_list.text_content(), LOAD_FAILED);
            assert_eq!(app.store().snapshot(), first);
        })
        .await;
}

#[tokio::test]
async fn signup_success_refreshes_before_reporting() {
    let api = ScriptedApi::new();
    api.push_roster(Reply::Ready(Ok(roster(&[(
        "Chess Club",
        activity(12, &[]),
    )]))));
    api.push_mutation(confirmed("Signed up"));

    let (refreshed, deliver) = Reply::deferred();
    api.push_roster(refreshed);

    let app = app(&api, Answer::new(true));

    LocalSet::new()
        .run_until(async {
            app.load().await;
            app.fill_signup_form("jane.doe@mergington.edu", "Chess Club");

            let task = tokio::task::spawn_local({
                let app = app.clone();
                async move {
                    app.dispatch(signup("Chess Club", "jane.doe@mergington.edu"))
                        .await
                }
            });

            until(|| api.count(&Request::Activities) == 2).await;

            assert_eq!(
                api.requests(),
                vec![
                    Request::Activities,
                    Request::Signup {
                        activity: "Chess Club".into(),
                        email: "jane.doe@mergington.edu".into()
                    },
                    Request::Activities,
                ]
            );
            // the refresh is still pending, nothing reported yet
            assert!(app.document().message.visible().is_none());
            assert_eq!(app.document().signup_form, SignupForm::default());

            deliver
                .send(Ok(roster(&[(
                    "Chess Club",
                    activity(12, &["jane.doe@mergington.edu"]),
                )])))
                .unwrap();

            let outcome = task.await.unwrap();

            assert_eq!(outcome, Some(OutcomeMessage::success("Signed up")));
            assert_eq!(
                app.document().message.visible(),
                Some(&OutcomeMessage::success("Signed up"))
            );
            assert_eq!(
                app.document().removal_controls(),
                vec![unregister("Chess Club", "jane.doe@mergington.edu")]
            );
        })
        .await;
}

#[tokio::test]
async fn signup_rejection_does_not_refresh() {
    let api = ScriptedApi::new();
    api.push_roster(Reply::Ready(Ok(roster(&[("Chess Club", activity(1, &["a@x.com"]))]))));
    api.push_mutation(Reply::Ready(Ok(MutationResponse::Rejected {
        status: StatusCode::BAD_REQUEST,
        detail: Some("Activity full".into()),
    })));

    let app = app(&api, Answer::new(true));

    LocalSet::new()
        .run_until(async {
            app.load().await;
            app.fill_signup_form("jane@mergington.edu", "Chess Club");

            let outcome = app.dispatch(signup("Chess Club", "jane@mergington.edu")).await;

            assert_eq!(outcome, Some(OutcomeMessage::error("Activity full")));
            assert_eq!(api.count(&Request::Activities), 1);
            // the form keeps what the user typed
            assert_eq!(app.document().signup_form.email, "jane@mergington.edu");
            assert_eq!(
                app.document().message.visible().map(|m| m.kind),
                Some(OutcomeKind::Error)
            );
        })
        .await;
}

#[tokio::test]
async fn signup_rejection_without_detail_uses_fallback() {
    let api = ScriptedApi::new();
    api.push_mutation(Reply::Ready(Ok(MutationResponse::Rejected {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        detail: None,
    })));

    let app = app(&api, Answer::new(true));

    LocalSet::new()
        .run_until(async {
            let outcome = app.submit_signup("jane@mergington.edu", "Chess Club").await;

            assert_eq!(outcome, OutcomeMessage::error("An error occurred"));
        })
        .await;
}

#[tokio::test]
async fn signup_transport_failure() {
    let api = ScriptedApi::new();
    api.push_mutation(Reply::Ready(Err(ApiError::ReqwestError(
        "connection reset".into(),
    ))));
    api.push_mutation(Reply::Ready(Ok(MutationResponse::Undecodable {
        status: StatusCode::OK,
    })));

    let app = app(&api, Answer::new(true));

    LocalSet::new()
        .run_until(async {
            let network = app.submit_signup("jane@mergington.edu", "Chess Club").await;
            let malformed = app.submit_signup("jane@mergington.edu", "Chess Club").await;

            let expected = OutcomeMessage::error("Failed to sign up. Please try again.");
            assert_eq!(network, expected);
            assert_eq!(malformed, expected);
            assert_eq!(api.count(&Request::Activities), 0);
        })
        .await;
}

#[tokio::test]
async fn invalid_signup_form_makes_no_request() {
    let api = ScriptedApi::new();
    let app = app(&api, Answer::new(true));

    LocalSet::new()
        .run_until(async {
            let bad_email = app.submit_signup("not-an-email", "Chess Club").await;
            let no_activity = app.submit_signup("jane@mergington.edu", "").await;

            assert_eq!(
                bad_email,
                OutcomeMessage::error("Please enter a valid email address.")
            );
            assert_eq!(no_activity, OutcomeMessage::error("Please select an activity."));
            assert!(api.requests().is_empty());
        })
        .await;
}

#[tokio::test]
async fn declined_unregister_does_nothing() {
    let api = ScriptedApi::new();
    api.push_roster(Reply::Ready(Ok(roster(&[(
        "Drama Club",
        activity(25, &["mia@mergington.edu"]),
    )]))));

    let answer = Answer::new(false);
    let asked = answer.asked.clone();
    let question = answer.last_question.clone();
    let app = app(&api, answer);

    LocalSet::new()
        .run_until(async {
            app.load().await;
            let before = app.document().clone();

            let command = app.document().removal_controls().remove(0);
            let outcome = app.dispatch(command).await;

            assert_eq!(outcome, None);
            assert_eq!(asked.get(), 1);
            assert_eq!(
                question.borrow().as_deref(),
                Some("Unregister mia@mergington.edu from Drama Club?")
            );
            assert_eq!(api.requests(), vec![Request::Activities]);
            assert_eq!(*app.document(), before);
        })
        .await;
}

#[tokio::test]
async fn confirmed_unregister_refreshes() {
    let api = ScriptedApi::new();
    api.push_roster(Reply::Ready(Ok(roster(&[(
        "Drama Club",
        activity(25, &["mia@mergington.edu", "charlotte@mergington.edu"]),
    )]))));
    api.push_mutation(confirmed("Unregistered mia@mergington.edu from Drama Club"));
    api.push_roster(Reply::Ready(Ok(roster(&[(
        "Drama Club",
        activity(25, &["charlotte@mergington.edu"]),
    )]))));

    let app = app(&api, Answer::new(true));

    LocalSet::new()
        .run_until(async {
            app.load().await;

            let command = app.document().removal_controls().remove(0);
            assert_eq!(command, unregister("Drama Club", "mia@mergington.edu"));

            let outcome = app.dispatch(command).await;

            assert_eq!(
                outcome,
                Some(OutcomeMessage::success(
                    "Unregistered mia@mergington.edu from Drama Club"
                ))
            );
            assert_eq!(
                api.requests(),
                vec![
                    Request::Activities,
                    Request::Unregister {
                        activity: "Drama Club".into(),
                        email: "mia@mergington.edu".into()
                    },
                    Request::Activities,
                ]
            );
            assert_eq!(
                app.document().removal_controls(),
                vec![unregister("Drama Club", "charlotte@mergington.edu")]
            );
        })
        .await;
}

#[tokio::test]
async fn unregister_failures() {
    let api = ScriptedApi::new();
    api.push_mutation(Reply::Ready(Ok(MutationResponse::Rejected {
        status: StatusCode::NOT_FOUND,
        detail: Some("Participant not found for this activity".into()),
    })));
    api.push_mutation(Reply::Ready(Ok(MutationResponse::Rejected {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        detail: None,
    })));
    api.push_mutation(Reply::Ready(Err(ApiError::ReqwestError("timed out".into()))));

    let app = app(&api, Answer::new(true));

    LocalSet::new()
        .run_until(async {
            let command = unregister("Drama Club", "mia@mergington.edu");

            let rejected = app.dispatch(command.clone()).await;
            let fallback = app.dispatch(command.clone()).await;
            let failed = app.dispatch(command).await;

            assert_eq!(
                rejected,
                Some(OutcomeMessage::error("Participant not found for this activity"))
            );
            assert_eq!(
                fallback,
                Some(OutcomeMessage::error("An error occurred while unregistering"))
            );
            assert_eq!(
                failed,
                Some(OutcomeMessage::error("Failed to unregister. Please try again."))
            );
            assert_eq!(api.count(&Request::Activities), 0);
        })
        .await;
}

#[tokio::test]
async fn last_resolved_refresh_wins() {
    let api = ScriptedApi::new();
    api.push_roster(Reply::Ready(Ok(roster(&[(
        "Drama Club",
        activity(25, &["mia@mergington.edu", "charlotte@mergington.edu"]),
    )]))));
    api.push_mutation(confirmed("Unregistered mia@mergington.edu from Drama Club"));
    api.push_mutation(confirmed("Unregistered charlotte@mergington.edu from Drama Club"));

    let (first_refresh, deliver_first) = Reply::deferred();
    let (second_refresh, deliver_second) = Reply::deferred();
    api.push_roster(first_refresh);
    api.push_roster(second_refresh);

    let app = app(&api, Answer::new(true));

    // what the server answered to each refresh
    let after_first = roster(&[("Drama Club", activity(25, &["charlotte@mergington.edu"]))]);
    let after_both = roster(&[("Drama Club", activity(25, &[]))]);

    LocalSet::new()
        .run_until(async {
            app.load().await;

            let controls = app.document().removal_controls();
            let tasks: Vec<_> = controls
                .into_iter()
                .map(|command| {
                    let app = app.clone();
                    tokio::task::spawn_local(async move { app.dispatch(command).await })
                })
                .collect();

            until(|| api.count(&Request::Activities) == 3).await;

            // the later refresh resolves first
            deliver_second.send(Ok(after_both.clone())).unwrap();
            until(|| app.store().snapshot().as_ref() == Some(&after_both)).await;

            deliver_first.send(Ok(after_first.clone())).unwrap();

            for task in tasks {
                assert!(task.await.unwrap().is_some());
            }

            assert_eq!(app.store().snapshot(), Some(after_first));
            assert_eq!(
                app.document().removal_controls(),
                vec![unregister("Drama Club", "charlotte@mergington.edu")]
            );
        })
        .await;
}

#[tokio::test]
async fn outcome_inside_local_set_is_shown() {
    let api = ScriptedApi::new();
    let app = app(&api, Answer::new(true));

    LocalSet::new()
        .run_until(async {
            let outcome = app.submit_signup("not-an-email", "Chess Club").await;

            assert_eq!(app.document().message.visible(), Some(&outcome));
            assert_eq!(app.banner().generation(), 1);
        })
        .await;
}

#[tokio::test]
#[should_panic]
async fn outcome_outside_local_set_panics() {
    let api = ScriptedApi::new();
    let app = app(&api, Answer::new(true));

    app.submit_signup("not-an-email", "Chess Club").await;
}
