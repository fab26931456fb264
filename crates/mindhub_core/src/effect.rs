use crate::{Decision, Notice, RequestId};

/// A page fetch the runtime must perform and answer with
/// `ListMsg::PageFetched` or `ListMsg::FetchFailed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub request: RequestId,
    pub resource: String,
    pub index: usize,
    pub query: Vec<(String, String)>,
}

impl PageRequest {
    /// `<resource>/page/<index>`
    pub fn path(&self) -> String {
        format!("{}/page/{}", self.resource.trim_end_matches('/'), self.index)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListEffect {
    FetchPage(PageRequest),
}

#[derive(Debug, Clone, PartialEq)]
pub enum QueueEffect<T> {
    FetchPage(PageRequest),
    /// Send the reviewer's decision to the backend, then answer with
    /// `QueueMsg::Settled`.
    Submit(Decision<T>),
    Notify(Notice),
}

impl<T> From<ListEffect> for QueueEffect<T> {
    fn from(effect: ListEffect) -> Self {
        match effect {
            ListEffect::FetchPage(request) => QueueEffect::FetchPage(request),
        }
    }
}
