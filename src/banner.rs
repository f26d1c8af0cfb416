//! Outcome notifications which hide themselves after a while.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use tokio::time::sleep;

use crate::view::Document;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeKind {
    Success,
    Error,
}

impl OutcomeKind {
    pub fn as_class(self) -> &'static str {
        match self {
            OutcomeKind::Success => "success",
            OutcomeKind::Error => "error",
        }
    }
}

/// The result of a user action as presented to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutcomeMessage {
    pub text: String,
    pub kind: OutcomeKind,
}

impl OutcomeMessage {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: OutcomeKind::Success,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: OutcomeKind::Error,
        }
    }
}

/// Shows outcome messages in the document's message element
///
/// Each [`Banner::show`] starts a hide timer. A timer only hides the banner if no newer message
/// was shown in the meantime, see [`Banner::generation`].
///
/// Timers are spawned with [`tokio::task::spawn_local`], so the banner must be used from within
/// a [`tokio::task::LocalSet`].
#[derive(Debug, Clone)]
pub struct Banner {
    document: Rc<RefCell<Document>>,
    generation: Rc<Cell<u64>>,
    hide_after: Duration,
}

impl Banner {
    pub fn new(document: Rc<RefCell<Document>>, hide_after: Duration) -> Self {
        Self {
            document,
            generation: Rc::new(Cell::new(0)),
            hide_after,
        }
    }

    /// Shows `message` and starts its hide timer
    ///
    /// # Panics
    ///
    /// Panics if called outside of a [`tokio::task::LocalSet`].
    pub fn show(&self, message: OutcomeMessage) {
        let generation = self.generation.get().wrapping_add(1);
        self.generation.set(generation);

        log::debug!(
            "showing {} message #{}: {}",
            message.kind.as_class(),
            generation,
            message.text
        );

        self.document.borrow_mut().message.show(message);

        let document = Rc::downgrade(&self.document);
        let current = self.generation.clone();
        let hide_after = self.hide_after;

        tokio::task::spawn_local(async move {
            sleep(hide_after).await;

            // A newer message owns the banner now
            if current.get() != generation {
                log::trace!("hide timer of message #{} expired after being superseded", generation);
                return;
            }

            if let Some(document) = document.upgrade() {
                document.borrow_mut().message.hide();
            }
        });
    }

    /// Number of messages shown so far, identifies the message currently owning the banner
    pub fn generation(&self) -> u64 {
        self.generation.get()
    }

    pub fn hide_after(&self) -> Duration {
        self.hide_after
    }
}
