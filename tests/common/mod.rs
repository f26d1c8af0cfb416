use async_trait::async_trait;
use roster_api_client::{ActivitiesApi, Activity, ApiError, MutationResponse, Roster};
use roster_client::controller::Confirm;
use roster_client::App;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;
use tokio::sync::oneshot;

/// A request as seen by the scripted API
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Activities,
    Signup { activity: String, email: String },
    Unregister { activity: String, email: String },
}

/// A scripted answer, either available right away or delivered later through a channel
pub enum Reply<T> {
    Ready(roster_api_client::Result<T>),
    Deferred(oneshot::Receiver<roster_api_client::Result<T>>),
}

impl<T> Reply<T> {
    /// A reply which resolves once the returned sender is used
    pub fn deferred() -> (Self, oneshot::Sender<roster_api_client::Result<T>>) {
        let (tx, rx) = oneshot::channel();
        (Reply::Deferred(rx), tx)
    }

    async fn resolve(self) -> roster_api_client::Result<T> {
        match self {
            Reply::Ready(result) => result,
            Reply::Deferred(rx) => rx
                .await
                .unwrap_or_else(|_| Err(ApiError::ReqwestError("reply dropped".into()))),
        }
    }
}

/// In memory stand-in for the activities API
///
/// Replies are handed out in the order requests arrive. Every request is recorded.
#[derive(Default)]
pub struct ScriptedApi {
    requests: RefCell<Vec<Request>>,
    rosters: RefCell<VecDeque<Reply<Roster>>>,
    mutations: RefCell<VecDeque<Reply<MutationResponse>>>,
}

impl ScriptedApi {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn push_roster(&self, reply: Reply<Roster>) {
        self.rosters.borrow_mut().push_back(reply);
    }

    pub fn push_mutation(&self, reply: Reply<MutationResponse>) {
        self.mutations.borrow_mut().push_back(reply);
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.borrow().clone()
    }

    pub fn count(&self, request: &Request) -> usize {
        self.requests.borrow().iter().filter(|r| *r == request).count()
    }

    fn next<T>(queue: &RefCell<VecDeque<Reply<T>>>) -> Reply<T> {
        queue.borrow_mut().pop_front().unwrap_or_else(|| {
            Reply::Ready(Err(ApiError::ReqwestError("no scripted reply".into())))
        })
    }
}

#[async_trait(?Send)]
impl ActivitiesApi for ScriptedApi {
    async fn activities(&self) -> roster_api_client::Result<Roster> {
        self.requests.borrow_mut().push(Request::Activities);
        let reply = Self::next(&self.rosters);
        reply.resolve().await
    }

    async fn signup(
        &self,
        activity: &str,
        email: &str,
    ) -> roster_api_client::Result<MutationResponse> {
        self.requests.borrow_mut().push(Request::Signup {
            activity: activity.into(),
            email: email.into(),
        });
        let reply = Self::next(&self.mutations);
        reply.resolve().await
    }

    async fn unregister(
        &self,
        activity: &str,
        email: &str,
    ) -> roster_api_client::Result<MutationResponse> {
        self.requests.borrow_mut().push(Request::Unregister {
            activity: activity.into(),
            email: email.into(),
        });
        let reply = Self::next(&self.mutations);
        reply.resolve().await
    }
}

/// Answers every confirmation the same way and remembers the questions
pub struct Answer {
    yes: bool,
    pub asked: Rc<Cell<usize>>,
    pub last_question: Rc<RefCell<Option<String>>>,
}

impl Answer {
    pub fn new(yes: bool) -> Self {
        Self {
            yes,
            asked: Rc::new(Cell::new(0)),
            last_question: Rc::new(RefCell::new(None)),
        }
    }
}

#[async_trait(?Send)]
impl Confirm for Answer {
    async fn confirm(&self, question: &str) -> bool {
        self.asked.set(self.asked.get() + 1);
        *self.last_question.borrow_mut() = Some(question.to_owned());
        self.yes
    }
}

pub fn app(api: &Rc<ScriptedApi>, confirm: Answer) -> Rc<App> {
    Rc::new(App::new(api.clone(), Box::new(confirm), Duration::from_secs(5)))
}

pub fn activity(max_participants: u32, participants: &[&str]) -> Activity {
    Activity {
        description: "Learn strategies and compete in chess tournaments".into(),
        schedule: "Fridays, 3:30 PM - 5:00 PM".into(),
        max_participants,
        participants: participants.iter().map(|p| p.to_string()).collect(),
    }
}

pub fn roster(entries: &[(&str, Activity)]) -> Roster {
    entries
        .iter()
        .map(|(name, activity)| (name.to_string(), activity.clone()))
        .collect()
}

pub fn confirmed(message: &str) -> Reply<MutationResponse> {
    Reply::Ready(Ok(MutationResponse::Confirmed {
        message: message.into(),
    }))
}

/// Yields until `condition` holds, letting spawned local tasks make progress
pub async fn until(condition: impl Fn() -> bool) {
    for _ in 0..1000 {
        if condition() {
            return;
        }
        tokio::task::yield_now().await;
    }

    panic!("condition not reached");
}
