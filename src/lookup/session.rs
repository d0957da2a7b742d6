use std::sync::Arc;

use tracing::debug;

use crate::lookup::{LookupState, LookupTask, ProgramLookup};

/// Tracks the single live lookup behind an "add program" dialog.
///
/// Starting a new query supersedes the previous one, and closing the dialog
/// cancels whatever is in flight. Only the live task may update the state.
pub struct LookupSession {
    lookup: Arc<dyn ProgramLookup>,
    active: Option<LookupTask>,
    state: LookupState,
}

impl LookupSession {
    pub fn new(lookup: Arc<dyn ProgramLookup>) -> Self {
        Self {
            lookup,
            active: None,
            state: LookupState::Idle,
        }
    }

    pub fn state(&self) -> LookupState {
        self.state
    }

    pub fn active_query(&self) -> Option<&str> {
        self.active.as_ref().map(LookupTask::query)
    }

    pub fn begin(&mut self, query: &str) -> LookupState {
        if query.trim().is_empty() {
            return self.state;
        }
        if let Some(previous) = self.active.take() {
            debug!("lookup for {:?} superseded", previous.query());
            previous.cancel();
        }
        self.active = Some(LookupTask::spawn(self.lookup.clone(), query));
        self.state = LookupState::Pending;
        self.state
    }

    pub fn cancel(&mut self) {
        if let Some(task) = self.active.take() {
            task.cancel();
        }
        self.state = LookupState::Idle;
    }

    pub async fn settle(&mut self) -> LookupState {
        let Some(task) = self.active.take() else {
            return self.state;
        };
        let outcome = task.outcome().await;
        if outcome != LookupState::Cancelled {
            self.state = outcome;
        }
        self.state
    }
}
