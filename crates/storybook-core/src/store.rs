use crate::action::Action;
use crate::model::RootState;
use crate::reducer::{Change, Outcome, ReduceError, reduce_root};
use tracing::{debug, warn};

/// What each slice made of one dispatched action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchReport {
    pub kind: String,
    pub story: Outcome,
    pub word: Outcome,
    pub quiz: Outcome,
}

impl DispatchReport {
    fn outcomes(&self) -> [&Outcome; 3] {
        [&self.story, &self.word, &self.quiz]
    }

    /// True when at least one slice produced a new state.
    pub fn changed(&self) -> bool {
        self.outcomes()
            .iter()
            .any(|o| matches!(o, Ok(Change::Applied | Change::StoryCompleted)))
    }

    pub fn story_completed(&self) -> bool {
        self.story == Ok(Change::StoryCompleted)
    }

    pub fn errors(&self) -> impl Iterator<Item = &ReduceError> + '_ {
        self.outcomes().into_iter().filter_map(|o| o.as_ref().err())
    }

    pub fn is_ok(&self) -> bool {
        self.errors().next().is_none()
    }
}

/// Owner of the root state. All mutation goes through `dispatch`.
#[derive(Debug, Clone, Default)]
pub struct Store {
    state: RootState,
    dispatched: u64,
}

impl Store {
    pub fn new(state: RootState) -> Self {
        Self {
            state,
            dispatched: 0,
        }
    }

    pub fn state(&self) -> &RootState {
        &self.state
    }

    /// Number of actions dispatched so far.
    pub fn dispatched(&self) -> u64 {
        self.dispatched
    }

    pub fn dispatch(&mut self, action: Action) -> DispatchReport {
        let (next, report) = reduce_root(&self.state, &action);
        self.dispatched += 1;
        self.state = next;
        for err in report.errors() {
            warn!(kind = %report.kind, seq = self.dispatched, "Action rejected: {err}");
        }
        debug!(
            kind = %report.kind,
            seq = self.dispatched,
            changed = report.changed(),
            "Dispatched action"
        );
        report
    }
}
