//! Single-flight mutation state shared by the generation controllers.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use holonet_genai::GenAiError;

use crate::error::AssetError;

/// State of the most recent generation call.
#[derive(Debug)]
pub enum MutationState<T> {
    Idle,
    Pending,
    Success(Arc<T>),
    Error(GenAiError),
}

impl<T> Clone for MutationState<T> {
    fn clone(&self) -> Self {
        match self {
            MutationState::Idle => MutationState::Idle,
            MutationState::Pending => MutationState::Pending,
            MutationState::Success(data) => MutationState::Success(Arc::clone(data)),
            MutationState::Error(e) => MutationState::Error(e.clone()),
        }
    }
}

impl<T> MutationState<T> {
    pub fn is_pending(&self) -> bool {
        matches!(self, MutationState::Pending)
    }

    pub fn data(&self) -> Option<Arc<T>> {
        match self {
            MutationState::Success(data) => Some(Arc::clone(data)),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&GenAiError> {
        match self {
            MutationState::Error(e) => Some(e),
            _ => None,
        }
    }
}

/// Shared mutation slot. Clones observe the same state.
#[derive(Debug)]
pub(crate) struct Mutation<T> {
    state: Arc<Mutex<MutationState<T>>>,
}

impl<T> Clone for Mutation<T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<T> Mutation<T> {
    pub(crate) fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MutationState::Idle)),
        }
    }

    pub(crate) fn state(&self) -> MutationState<T> {
        lock(&self.state).clone()
    }

    /// Claim the slot for one call, refusing while another is pending.
    pub(crate) fn begin(&self) -> Result<MutationGuard<T>, AssetError> {
        let mut state = lock(&self.state);
        if state.is_pending() {
            return Err(AssetError::GenerationPending);
        }
        *state = MutationState::Pending;
        Ok(MutationGuard {
            state: Arc::clone(&self.state),
            settled: false,
        })
    }

    pub(crate) fn reset(&self) {
        let mut state = lock(&self.state);
        if !state.is_pending() {
            *state = MutationState::Idle;
        }
    }
}

/// Held for the duration of one call. Dropping it unsettled (the caller's
/// future was dropped) returns the slot to `Idle`.
#[derive(Debug)]
pub(crate) struct MutationGuard<T> {
    state: Arc<Mutex<MutationState<T>>>,
    settled: bool,
}

impl<T> MutationGuard<T> {
    pub(crate) fn succeed(mut self, data: Arc<T>) {
        *lock(&self.state) = MutationState::Success(data);
        self.settled = true;
    }

    pub(crate) fn fail(mut self, error: GenAiError) {
        *lock(&self.state) = MutationState::Error(error);
        self.settled = true;
    }
}

impl<T> Drop for MutationGuard<T> {
    fn drop(&mut self) {
        if !self.settled {
            *lock(&self.state) = MutationState::Idle;
        }
    }
}

fn lock<T>(state: &Mutex<MutationState<T>>) -> MutexGuard<'_, MutationState<T>> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn second_begin_is_refused_while_pending() {
        let mutation = Mutation::<u32>::new();
        let guard = mutation.begin().unwrap();
        assert_matches!(mutation.begin(), Err(AssetError::GenerationPending));

        guard.succeed(Arc::new(1));
        assert_eq!(mutation.state().data().as_deref(), Some(&1));
        assert!(mutation.begin().is_ok());
    }

    #[test]
    fn dropped_guard_returns_to_idle() {
        let mutation = Mutation::<u32>::new();
        drop(mutation.begin().unwrap());
        assert_matches!(mutation.state(), MutationState::Idle);
    }

    #[test]
    fn failure_is_recorded_and_retryable() {
        let mutation = Mutation::<u32>::new();
        mutation.begin().unwrap().fail(GenAiError::Backend {
            status: 500,
            message: "Failed to generate image".into(),
        });
        assert_eq!(
            mutation.state().error().map(ToString::to_string).as_deref(),
            Some("Failed to generate image")
        );

        let retry = mutation.begin().unwrap();
        assert!(mutation.state().is_pending());
        drop(retry);
    }

    #[test]
    fn reset_clears_settled_state() {
        let mutation = Mutation::<u32>::new();
        mutation.begin().unwrap().succeed(Arc::new(2));
        mutation.reset();
        assert!(mutation.state().data().is_none());
    }
}
