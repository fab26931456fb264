use mindhub_logging::{hub_debug, hub_error, hub_warn};

use crate::effect::PageRequest;
use crate::view_model::ListViewModel;
use crate::{FailurePolicy, LoadFailure, LoaderState, PageCollection, PageSize};

pub type RequestId = u64;

/// How a paged list talks to its endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListConfig {
    pub resource: String,
    pub page_size: PageSize,
    pub policy: FailurePolicy,
    pub query: Vec<(String, String)>,
}

impl ListConfig {
    pub fn new(resource: impl Into<String>, page_size: PageSize) -> Self {
        Self {
            resource: resource.into(),
            page_size,
            policy: FailurePolicy::default(),
            query: Vec::new(),
        }
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct InFlight {
    request: RequestId,
    index: usize,
}

/// Page cache plus loader state for one list view.
///
/// Only `update_list` drives fetches; consumers mutate items through
/// [`PagedList::retain`] and [`PagedList::replace_where`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagedList<T> {
    config: ListConfig,
    pages: PageCollection<T>,
    state: LoaderState,
    in_flight: Option<InFlight>,
    next_request: RequestId,
    last_failure: Option<LoadFailure>,
    dirty: bool,
}

impl<T> PagedList<T> {
    /// Creates the list in `Loading` together with the initial fetch effect.
    pub fn open(config: ListConfig) -> (Self, Vec<crate::ListEffect>) {
        let mut list = Self {
            pages: PageCollection::new(config.page_size),
            config,
            state: LoaderState::Loading,
            in_flight: None,
            next_request: 1,
            last_failure: None,
            dirty: true,
        };
        let effect = list.begin_fetch(0);
        (list, vec![effect])
    }

    pub fn config(&self) -> &ListConfig {
        &self.config
    }

    pub fn state(&self) -> LoaderState {
        self.state
    }

    pub fn pages(&self) -> &PageCollection<T> {
        &self.pages
    }

    pub fn items(&self) -> impl Iterator<Item = &T> + '_ {
        self.pages.iter()
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn last_failure(&self) -> Option<&LoadFailure> {
        self.last_failure.as_ref()
    }

    pub fn in_flight_request(&self) -> Option<RequestId> {
        self.in_flight.map(|in_flight| in_flight.request)
    }

    pub fn view(&self) -> ListViewModel {
        ListViewModel {
            state: self.state,
            item_count: self.pages.len(),
            page_count: self.pages.page_count(),
            failure: self.last_failure.clone(),
            dirty: self.dirty,
        }
    }

    /// Returns and clears the dirty flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }

    /// Drops every item the predicate rejects, e.g. after a remote delete.
    pub fn retain<F>(&mut self, keep: F) -> usize
    where
        F: FnMut(&T) -> bool,
    {
        let removed = self.pages.retain(keep);
        if removed > 0 {
            self.dirty = true;
        }
        removed
    }

    /// Swaps matching items for an updated copy.
    pub fn replace_where<F>(&mut self, matches: F, item: &T) -> usize
    where
        F: FnMut(&T) -> bool,
        T: Clone,
    {
        let replaced = self.pages.replace_where(matches, item);
        if replaced > 0 {
            self.dirty = true;
        }
        replaced
    }

    pub(crate) fn begin_fetch(&mut self, index: usize) -> crate::ListEffect {
        let request = self.next_request;
        self.next_request += 1;
        self.in_flight = Some(InFlight { request, index });
        self.state = LoaderState::Loading;
        self.dirty = true;
        crate::ListEffect::FetchPage(PageRequest {
            request,
            resource: self.config.resource.clone(),
            index,
            query: self.config.query.clone(),
        })
    }

    pub(crate) fn reset(&mut self) {
        self.pages.clear();
        self.last_failure = None;
        self.dirty = true;
    }

    /// Takes the in-flight slot if `request` owns it.
    fn settle(&mut self, request: RequestId) -> Option<InFlight> {
        match self.in_flight {
            Some(in_flight) if in_flight.request == request => {
                self.in_flight = None;
                Some(in_flight)
            }
            _ => {
                hub_debug!(
                    "discarding stale response resource={} request={}",
                    self.config.resource,
                    request
                );
                None
            }
        }
    }

    pub(crate) fn apply_page(&mut self, request: RequestId, items: Vec<T>) {
        let Some(in_flight) = self.settle(request) else {
            return;
        };
        self.dirty = true;

        if items.is_empty() {
            self.fail(LoadFailure::EmptyPage);
            return;
        }

        let fetched = items.len();
        if let Err(err) = self.pages.store(in_flight.index, items) {
            hub_error!("resource={} {}", self.config.resource, err);
            self.fail(LoadFailure::network(err.to_string()));
            return;
        }
        self.state = LoaderState::after_page(fetched, self.config.page_size);
        self.last_failure = None;
    }

    pub(crate) fn apply_failure(&mut self, request: RequestId, failure: LoadFailure) {
        if self.settle(request).is_none() {
            return;
        }
        self.dirty = true;
        self.fail(failure);
    }

    fn fail(&mut self, failure: LoadFailure) {
        if matches!(failure, LoadFailure::Network { .. }) {
            hub_warn!("resource={} {}", self.config.resource, failure);
        }
        self.state = LoaderState::after_failure(&failure, self.config.policy);
        self.last_failure = Some(failure);
    }
}
