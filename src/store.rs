//! Holds the roster snapshot and keeps the document in sync with it.

use std::cell::RefCell;
use std::rc::Rc;

use roster_api_client::{ActivitiesApi, Roster};

use crate::render;
use crate::view::Document;

/// Fetches the authoritative roster and renders it
///
/// The store keeps at most one snapshot. A successful fetch replaces it wholesale, a failed fetch
/// leaves it untouched and puts the document into the failed state.
pub struct RosterStore {
    api: Rc<dyn ActivitiesApi>,
    document: Rc<RefCell<Document>>,
    snapshot: RefCell<Option<Roster>>,
}

impl RosterStore {
    pub fn new(api: Rc<dyn ActivitiesApi>, document: Rc<RefCell<Document>>) -> Self {
        Self {
            api,
            document,
            snapshot: RefCell::new(None),
        }
    }

    /// Fetches the roster and re-renders the document
    ///
    /// Returns `None` if the roster could not be fetched. The failure is logged and shown in the
    /// document, it is never propagated to the caller.
    pub async fn refresh(&self) -> Option<Roster> {
        match self.api.activities().await {
            Ok(roster) => {
                log::debug!("fetched roster with {} activities", roster.len());

                self.document.borrow_mut().apply(render::render(&roster));
                *self.snapshot.borrow_mut() = Some(roster.clone());

                Some(roster)
            }
            Err(e) => {
                log::error!("Error fetching activities: {}", e);

                self.document.borrow_mut().show_load_failure();

                None
            }
        }
    }

    /// The last successfully fetched roster
    pub fn snapshot(&self) -> Option<Roster> {
        self.snapshot.borrow().clone()
    }
}
