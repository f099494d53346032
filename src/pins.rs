use crate::store::{PromptStore, StoreError};

/// Maximum number of concurrently pinned prompts
pub const MAX_PINNED: usize = 5;

/// A pinned prompt offered as a replacement candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinCandidate {
    pub index: usize,
    pub title: String,
}

/// Outcome of a pin toggle request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PinRequest {
    /// The toggle applied and persisted immediately
    Toggled { pinned: bool },
    /// Stale index, nothing happened
    Ignored,
    /// Ceiling reached: the caller must pick one of these currently
    /// pinned prompts to unpin, then commit or cancel
    NeedsReplacement(Vec<PinCandidate>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum FlowState {
    #[default]
    Idle,
    AwaitingReplacementChoice {
        target: usize,
    },
}

/// Pin policy: gates pinning behind the ceiling
///
/// Unpinning is always allowed. Pinning past the ceiling enters the
/// replacement sub-flow: the flow parks in `AwaitingReplacementChoice`
/// until the caller commits a replacement choice or cancels. Commit
/// applies both toggles as one composite persisted operation; cancel
/// leaves the pinned set untouched.
#[derive(Debug, Default)]
pub struct PinFlow {
    state: FlowState,
}

impl PinFlow {
    pub fn new() -> Self {
        PinFlow::default()
    }

    /// Whether a replacement choice is pending
    pub fn is_awaiting(&self) -> bool {
        matches!(self.state, FlowState::AwaitingReplacementChoice { .. })
    }

    /// The prompt waiting to be pinned, while a choice is pending
    pub fn target(&self) -> Option<usize> {
        match self.state {
            FlowState::AwaitingReplacementChoice { target } => Some(target),
            FlowState::Idle => None,
        }
    }

    /// Request a pin toggle for the prompt at `index`
    ///
    /// A request made while a previous replacement choice is pending
    /// abandons that flow first, with no side effects.
    pub fn request_toggle(
        &mut self,
        store: &mut PromptStore,
        index: usize,
    ) -> Result<PinRequest, StoreError> {
        if self.is_awaiting() {
            log::debug!("Abandoning pending replacement choice");
            self.state = FlowState::Idle;
        }

        let Some(prompt) = store.get(index) else {
            log::debug!("Pin toggle ignored, no prompt at index {}", index);
            return Ok(PinRequest::Ignored);
        };

        // Unpinning never hits the ceiling
        if prompt.pinned {
            store.toggle_pin(index)?;
            return Ok(PinRequest::Toggled { pinned: false });
        }

        if store.pinned_count() < MAX_PINNED {
            store.toggle_pin(index)?;
            return Ok(PinRequest::Toggled { pinned: true });
        }

        let candidates = store
            .pinned_indices()
            .into_iter()
            .filter_map(|i| {
                store.get(i).map(|p| PinCandidate {
                    index: i,
                    title: p.title.clone(),
                })
            })
            .collect();

        self.state = FlowState::AwaitingReplacementChoice { target: index };
        Ok(PinRequest::NeedsReplacement(candidates))
    }

    /// Commit the pending replacement: unpin `chosen`, pin the target
    ///
    /// Both toggles persist together via the store's composite operation.
    /// Indices that went stale while the choice was pending (store
    /// mutated or reloaded) fail with `IndexOutOfRange` and nothing
    /// changes. With no choice pending this is a no-op.
    pub fn commit(&mut self, store: &mut PromptStore, chosen: usize) -> Result<(), StoreError> {
        let FlowState::AwaitingReplacementChoice { target } = self.state else {
            log::debug!("Replacement commit ignored, no choice pending");
            return Ok(());
        };

        // The flow ends here whether or not the commit lands
        self.state = FlowState::Idle;

        if !store.get(chosen).is_some_and(|p| p.pinned) {
            return Err(StoreError::IndexOutOfRange(chosen));
        }
        if !store.get(target).is_some_and(|p| !p.pinned) {
            return Err(StoreError::IndexOutOfRange(target));
        }

        store.replace_pin(chosen, target)
    }

    /// Abandon the pending replacement choice, touching nothing
    pub fn cancel(&mut self) {
        if self.is_awaiting() {
            log::debug!("Replacement choice canceled");
        }
        self.state = FlowState::Idle;
    }
}
