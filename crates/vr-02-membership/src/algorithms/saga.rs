//! # Reassignment Saga
//!
//! Tracks a two-step move between lists: remove from the source list, then
//! register for the target. A failed second step is undone by re-inserting
//! into the source list.

use uuid::Uuid;

use crate::domain::{InvalidTransition, ReassignmentKind, SagaState};

/// Saga state holder.
#[derive(Clone, Debug)]
pub struct ReassignmentSaga {
    id: Uuid,
    kind: ReassignmentKind,
    state: SagaState,
}

impl ReassignmentSaga {
    /// Start a saga in `Pending` with a fresh correlation id.
    pub fn new(kind: ReassignmentKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            state: SagaState::Pending,
        }
    }

    /// Correlation id.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Direction.
    pub fn kind(&self) -> ReassignmentKind {
        self.kind
    }

    /// Current state.
    pub fn state(&self) -> SagaState {
        self.state
    }

    /// Removal step committed.
    pub fn removed(&mut self) -> Result<(), InvalidTransition> {
        self.advance(SagaState::Removed)
    }

    /// Removal step failed.
    pub fn abort(&mut self) -> Result<(), InvalidTransition> {
        self.advance(SagaState::Aborted)
    }

    /// Registration step committed.
    pub fn complete(&mut self) -> Result<(), InvalidTransition> {
        self.advance(SagaState::Completed)
    }

    /// Registration step failed; `restored` tells whether the undo succeeded.
    pub fn compensate(&mut self, restored: bool) -> Result<(), InvalidTransition> {
        if restored {
            self.advance(SagaState::Compensated)
        } else {
            self.advance(SagaState::CompensationFailed)
        }
    }

    fn advance(&mut self, next: SagaState) -> Result<(), InvalidTransition> {
        if !self.state.can_transition_to(next) {
            return Err(InvalidTransition {
                from: self.state,
                to: next,
            });
        }
        self.state = next;
        Ok(())
    }
}
