use mindhub_logging::{hub_debug, hub_info, hub_warn};

use crate::verify::lift;
use crate::{
    DecisionKind, ListEffect, ListMsg, LoaderState, Notice, PagedList, QueueEffect, QueueMsg,
    Submission, VerifyError, VerifyPanel, VerifyQueue,
};

/// Pure update function for a paged list: applies a message and returns the
/// fetches to perform. At most one fetch is ever in flight.
pub fn update_list<T>(mut list: PagedList<T>, msg: ListMsg<T>) -> (PagedList<T>, Vec<ListEffect>) {
    let effects = match msg {
        ListMsg::LoadNextPage => {
            if list.state().accepts_load() {
                let index = list.pages().next_index();
                vec![list.begin_fetch(index)]
            } else {
                hub_debug!(
                    "load ignored resource={} state={:?}",
                    list.config().resource,
                    list.state()
                );
                Vec::new()
            }
        }
        ListMsg::Reload => {
            // Supersedes any in-flight request; its answer becomes stale.
            list.reset();
            vec![list.begin_fetch(0)]
        }
        ListMsg::Recheck => {
            if list.state() == LoaderState::Exhausted {
                let index = list.pages().next_index();
                vec![list.begin_fetch(index)]
            } else {
                Vec::new()
            }
        }
        ListMsg::PageFetched { request, items } => {
            list.apply_page(request, items);
            Vec::new()
        }
        ListMsg::FetchFailed { request, failure } => {
            list.apply_failure(request, failure);
            Vec::new()
        }
    };

    (list, effects)
}

/// Pure update function for the admin review queue.
pub fn update_queue<T>(
    mut queue: VerifyQueue<T>,
    msg: QueueMsg<T>,
) -> (VerifyQueue<T>, Vec<QueueEffect<T>>)
where
    T: Submission + Clone,
{
    let effects = match msg {
        QueueMsg::List(msg) => {
            let (list, effects) = update_list(queue.list, msg);
            queue.list = list;
            lift(effects)
        }
        QueueMsg::Open { id } => {
            let found = queue.list.items().find(|item| item.id() == id).cloned();
            match found {
                Some(item) => {
                    let (panel, warnings) = VerifyPanel::open(item, &queue.catalog);
                    queue.panel = Some(panel);
                    warnings
                        .into_iter()
                        .map(|warning| QueueEffect::Notify(Notice::warning(warning.to_string())))
                        .collect()
                }
                None => vec![QueueEffect::Notify(Notice::error(
                    VerifyError::NotFound(id).to_string(),
                ))],
            }
        }
        QueueMsg::Close => {
            queue.panel = None;
            Vec::new()
        }
        QueueMsg::AddTag(tag) => {
            with_panel(&mut queue, |panel| {
                panel.add_tag(tag);
            });
            Vec::new()
        }
        QueueMsg::RemoveTag(index) => {
            with_panel(&mut queue, |panel| {
                panel.remove_tag(index);
            });
            Vec::new()
        }
        QueueMsg::SetQuery(query) => {
            with_panel(&mut queue, |panel| panel.set_query(query));
            Vec::new()
        }
        QueueMsg::Verify => match queue.panel.as_ref().map(VerifyPanel::verify) {
            Some(Ok(decision)) => {
                queue.panel = None;
                vec![QueueEffect::Submit(decision)]
            }
            Some(Err(err)) => vec![QueueEffect::Notify(Notice::warning(err.to_string()))],
            None => vec![QueueEffect::Notify(Notice::error(
                VerifyError::NoOpenPanel.to_string(),
            ))],
        },
        QueueMsg::Reject { reason } => match queue.panel.take() {
            Some(panel) => vec![QueueEffect::Submit(panel.reject(reason))],
            None => vec![QueueEffect::Notify(Notice::error(
                VerifyError::NoOpenPanel.to_string(),
            ))],
        },
        QueueMsg::Settled { id, kind, result } => {
            // The item leaves the queue whether or not the backend accepted it.
            queue.list.retain(|item| item.id() != id);
            let action = match kind {
                DecisionKind::Verify => "verify",
                DecisionKind::Reject => "reject",
            };
            match result {
                Ok(()) => {
                    hub_info!("{} succeeded id={}", action, id);
                    queue.pending_total = queue.pending_total.map(|n| n.saturating_sub(1));
                    vec![QueueEffect::Notify(Notice::info(format!(
                        "{action} succeeded: {id}"
                    )))]
                }
                Err(message) => {
                    hub_warn!("{} failed id={}: {}", action, id, message);
                    vec![QueueEffect::Notify(Notice::error(format!(
                        "{action} failed: {message}"
                    )))]
                }
            }
        }
        QueueMsg::TotalLoaded(total) => {
            queue.pending_total = Some(total);
            Vec::new()
        }
    };

    (queue, effects)
}

fn with_panel<T>(queue: &mut VerifyQueue<T>, edit: impl FnOnce(&mut VerifyPanel<T>)) {
    match queue.panel.as_mut() {
        Some(panel) => edit(panel),
        None => hub_debug!("panel edit ignored: no submission open"),
    }
}
