//! Client for an activity roster.
//!
//! Displays the activities known to the server and lets a user sign an email address up for an
//! activity or remove it again. After every successful mutation the whole roster is fetched
//! again, the displayed state is never predicted locally.
//!
//! Outcome messages hide themselves through timers spawned with [`tokio::task::spawn_local`],
//! so the [`App`] has to be driven from within a [`tokio::task::LocalSet`].
//!
//! # Example
//!
//! ```no_run
//! use roster_client::{App, controller::Confirm};
//! use roster_api_client::{Config, RosterSession};
//! use std::rc::Rc;
//! use std::time::Duration;
//!
//! struct Always;
//!
//! #[async_trait::async_trait(?Send)]
//! impl Confirm for Always {
//!     async fn confirm(&self, _question: &str) -> bool {
//!         true
//!     }
//! }
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = Config {
//!     base_url: "http://localhost:8000/".parse()?,
//!     timeout: Duration::from_secs(10),
//! };
//! let session = RosterSession::new(Rc::new(config))?;
//! let app = App::new(Rc::new(session), Box::new(Always), Duration::from_secs(5));
//!
//! tokio::task::LocalSet::new()
//!     .run_until(async {
//!         app.load().await;
//!         app.submit_signup("jane.doe@mergington.edu", "Chess Club").await;
//!     })
//!     .await;
//! # Ok(())
//! # }
//! ```

use anyhow::Result;
use roster_api_client::{ActivitiesApi, Roster};
use std::cell::{Ref, RefCell};
use std::rc::Rc;
use std::time::Duration;

use crate::banner::Banner;
use crate::controller::Confirm;
use crate::store::RosterStore;
use crate::view::Document;

pub mod banner;
pub mod cli;
pub mod controller;
pub mod format;
pub mod logging;
pub mod render;
pub mod settings;
pub mod shell;
pub mod store;
pub mod view;

/// Runs the given future, on error the error is logged and the process exits
pub async fn try_or_exit<T, F>(f: F) -> T
where
    F: std::future::Future<Output = Result<T>>,
{
    match f.await {
        Ok(ok) => ok,
        Err(err) => {
            if log::log_enabled!(log::Level::Error) {
                log::error!("Crashed with error: {:?}", err);
            } else {
                eprintln!("Crashed with error: {err:?}");
            }

            std::process::exit(1);
        }
    }
}

/// The roster client with everything it draws into
///
/// All state lives behind `Rc<RefCell<_>>` and is only touched from the thread driving the
/// client. No borrow is held across an await point, so multiple commands may be in flight at
/// the same time.
pub struct App {
    pub(crate) api: Rc<dyn ActivitiesApi>,
    pub(crate) document: Rc<RefCell<Document>>,
    pub(crate) store: RosterStore,
    pub(crate) banner: Banner,
    pub(crate) confirm: Box<dyn Confirm>,
}

impl App {
    pub fn new(
        api: Rc<dyn ActivitiesApi>,
        confirm: Box<dyn Confirm>,
        hide_after: Duration,
    ) -> Self {
        let document = Rc::new(RefCell::new(Document::new()));

        Self {
            store: RosterStore::new(api.clone(), document.clone()),
            banner: Banner::new(document.clone(), hide_after),
            api,
            document,
            confirm,
        }
    }

    /// Initial fetch and render
    pub async fn load(&self) -> Option<Roster> {
        self.store.refresh().await
    }

    pub fn document(&self) -> Ref<'_, Document> {
        self.document.borrow()
    }

    /// Puts values into the signup form as a user typing them would
    pub fn fill_signup_form(&self, email: &str, activity: &str) {
        let mut document = self.document.borrow_mut();
        document.signup_form.email = email.to_owned();
        document.signup_form.activity = activity.to_owned();
    }

    pub fn store(&self) -> &RosterStore {
        &self.store
    }

    pub fn banner(&self) -> &Banner {
        &self.banner
    }
}
