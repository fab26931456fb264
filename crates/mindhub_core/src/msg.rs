use crate::{DecisionKind, LoadFailure, RequestId, TagChoice};

#[derive(Debug, Clone, PartialEq)]
pub enum ListMsg<T> {
    /// Consumer asked for the next page ("load more").
    LoadNextPage,
    /// Drop everything and fetch from page 0.
    Reload,
    /// Refetch the tail of an exhausted list to pick up new items.
    Recheck,
    /// Runtime answered a page request.
    PageFetched { request: RequestId, items: Vec<T> },
    /// Runtime could not complete a page request.
    FetchFailed {
        request: RequestId,
        failure: LoadFailure,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum QueueMsg<T> {
    List(ListMsg<T>),
    /// Reviewer opened a submission.
    Open { id: String },
    Close,
    AddTag(TagChoice),
    RemoveTag(usize),
    /// Tag picker text changed.
    SetQuery(String),
    Verify,
    Reject { reason: Option<String> },
    /// Backend answered a submitted decision.
    Settled {
        id: String,
        kind: DecisionKind,
        result: Result<(), String>,
    },
    /// Number of submissions still waiting for review.
    TotalLoaded(u64),
}

impl<T> From<ListMsg<T>> for QueueMsg<T> {
    fn from(msg: ListMsg<T>) -> Self {
        QueueMsg::List(msg)
    }
}
