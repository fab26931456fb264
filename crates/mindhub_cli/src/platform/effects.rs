use std::collections::HashMap;
use std::time::Duration;

use anyhow::{anyhow, Result};
use mindhub_client::{
    ApiRequest, ApiResponse, EngineEvent, EngineHandle, FetchError, Reviewable, Ticket, ViewScope,
};
use mindhub_core::{
    DecisionKind, ListEffect, ListMsg, PageRequest, QueueEffect, QueueMsg, RequestId,
    SessionContext, Submission,
};
use mindhub_logging::{hub_debug, hub_info, hub_warn};
use serde::de::DeserializeOwned;

/// What a submitted ticket answers.
enum Pending {
    Page(RequestId),
    Decision { id: String, kind: DecisionKind },
}

/// Turns core effects into engine tickets and engine completions back into
/// core messages. Everything runs under one view scope, so dropping the
/// runner discards whatever is still in flight.
pub struct EffectRunner {
    engine: EngineHandle,
    scope: ViewScope,
    pending: HashMap<Ticket, Pending>,
    wait: Duration,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle, wait: Duration) -> Self {
        let scope = engine.scope();
        Self {
            engine,
            scope,
            pending: HashMap::new(),
            wait,
        }
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn run_list(&mut self, effects: Vec<ListEffect>) {
        for effect in effects {
            match effect {
                ListEffect::FetchPage(page) => self.fetch_page(&page),
            }
        }
    }

    pub fn run_queue<T: Reviewable>(
        &mut self,
        effects: Vec<QueueEffect<T>>,
        session: &mut SessionContext,
    ) {
        for effect in effects {
            match effect {
                QueueEffect::FetchPage(page) => self.fetch_page(&page),
                QueueEffect::Submit(decision) => {
                    let id = decision.item().id().to_string();
                    let kind = decision.kind();
                    hub_info!("Submit {:?} id={}", kind, id);
                    let ticket = self
                        .engine
                        .submit(T::decision_requests(&decision), &self.scope);
                    self.pending.insert(ticket, Pending::Decision { id, kind });
                }
                QueueEffect::Notify(notice) => session.notify(notice),
            }
        }
    }

    fn fetch_page(&mut self, page: &PageRequest) {
        hub_debug!("FetchPage request={} path={}", page.request, page.path());
        let ticket = self.engine.send(ApiRequest::from(page), &self.scope);
        self.pending.insert(ticket, Pending::Page(page.request));
    }

    /// Sends one request that belongs to no list and waits for its answer.
    pub fn call(&mut self, request: ApiRequest) -> Result<ApiResponse> {
        let ticket = self.engine.send(request, &self.scope);
        loop {
            let (got, result) = self.recv()?;
            if got == ticket {
                return Ok(result?);
            }
            self.pending.remove(&got);
            hub_warn!("Dropped answer for ticket {} while waiting for {}", got, ticket);
        }
    }

    pub fn call_json<R: DeserializeOwned>(&mut self, request: ApiRequest) -> Result<R> {
        Ok(self.call(request)?.json()?)
    }

    /// Waits for the next answer to a page fetch.
    pub fn next_list_msg<T: DeserializeOwned>(&mut self) -> Result<ListMsg<T>> {
        loop {
            let (ticket, result) = self.recv()?;
            match self.pending.remove(&ticket) {
                Some(Pending::Page(request)) => return Ok(page_msg(request, result)),
                Some(Pending::Decision { id, .. }) => {
                    hub_warn!("Decision for {} settled outside a review queue", id);
                }
                None => hub_debug!("Ignoring unknown ticket {}", ticket),
            }
        }
    }

    /// Waits for the next answer to a page fetch or a submitted decision.
    pub fn next_queue_msg<T: DeserializeOwned>(&mut self) -> Result<QueueMsg<T>> {
        loop {
            let (ticket, result) = self.recv()?;
            match self.pending.remove(&ticket) {
                Some(Pending::Page(request)) => return Ok(QueueMsg::List(page_msg(request, result))),
                Some(Pending::Decision { id, kind }) => {
                    return Ok(QueueMsg::Settled {
                        id,
                        kind,
                        result: result.map(|_| ()).map_err(|err| err.to_string()),
                    });
                }
                None => hub_debug!("Ignoring unknown ticket {}", ticket),
            }
        }
    }

    fn recv(&mut self) -> Result<(Ticket, Result<ApiResponse, FetchError>)> {
        match self.engine.recv_timeout(self.wait) {
            Some(EngineEvent::Completed { ticket, result }) => Ok((ticket, result)),
            None => Err(anyhow!(
                "no answer from the backend within {}s",
                self.wait.as_secs()
            )),
        }
    }
}

fn page_msg<T: DeserializeOwned>(
    request: RequestId,
    result: Result<ApiResponse, FetchError>,
) -> ListMsg<T> {
    match result.and_then(|response| response.json::<Vec<T>>()) {
        Ok(items) => ListMsg::PageFetched { request, items },
        Err(err) => {
            hub_warn!("Page request {} failed: {}", request, err);
            ListMsg::FetchFailed {
                request,
                failure: err.into(),
            }
        }
    }
}
