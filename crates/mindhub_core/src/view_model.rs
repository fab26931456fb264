use crate::{LoadFailure, LoaderState, TagChoice};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListViewModel {
    pub state: LoaderState,
    pub item_count: usize,
    pub page_count: usize,
    /// Set after a failed or empty fetch until the next successful one, so a
    /// view can tell a network error apart from a finished list.
    pub failure: Option<LoadFailure>,
    pub dirty: bool,
}

impl ListViewModel {
    /// Footer affordance for the list.
    pub fn footer(&self) -> Footer {
        match (self.state, &self.failure) {
            (LoaderState::Loading, _) => Footer::Spinner,
            (_, Some(LoadFailure::Network { message })) => Footer::Error(message.clone()),
            (LoaderState::More, _) => Footer::LoadMore,
            (LoaderState::Exhausted, _) => Footer::NoMore,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Footer {
    Spinner,
    LoadMore,
    NoMore,
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QueueViewModel {
    pub list: ListViewModel,
    pub pending_total: Option<u64>,
    pub panel: Option<PanelView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelView {
    pub id: String,
    pub tags: Vec<TagChoice>,
    pub query: String,
}
