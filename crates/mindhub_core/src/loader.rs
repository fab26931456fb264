use thiserror::Error;

use crate::PageSize;

/// Fetch readiness of a paged list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoaderState {
    /// A page request is in flight.
    #[default]
    Loading,
    /// Idle; another page is believed to exist.
    More,
    /// The server returned a short page. Loading the next page is a no-op.
    Exhausted,
}

impl LoaderState {
    /// State after a page of `fetched` items arrived.
    pub fn after_page(fetched: usize, page_size: PageSize) -> Self {
        if fetched < page_size.get() {
            LoaderState::Exhausted
        } else {
            LoaderState::More
        }
    }

    /// State after a request failed.
    pub fn after_failure(failure: &LoadFailure, policy: FailurePolicy) -> Self {
        match (failure, policy) {
            (LoadFailure::EmptyPage, _) => LoaderState::Exhausted,
            (LoadFailure::Network { .. }, FailurePolicy::Retry) => LoaderState::More,
            (LoadFailure::Network { .. }, FailurePolicy::Terminal) => LoaderState::Exhausted,
        }
    }

    pub fn accepts_load(self) -> bool {
        self == LoaderState::More
    }
}

/// What a network failure during pagination does to the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Go back to `More` so the consumer can try again.
    #[default]
    Retry,
    /// End the list as if it were exhausted.
    Terminal,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadFailure {
    #[error("network failure: {message}")]
    Network { message: String },
    #[error("server returned an empty page")]
    EmptyPage,
}

impl LoadFailure {
    pub fn network(message: impl Into<String>) -> Self {
        LoadFailure::Network {
            message: message.into(),
        }
    }
}
