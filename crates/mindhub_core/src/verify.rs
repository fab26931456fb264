use thiserror::Error;

use crate::view_model::{PanelView, QueueViewModel};
use crate::{
    join_tags, parse_tags, ListConfig, ListEffect, PagedList, QueueEffect, TagCatalog, TagChoice,
    TagWarning,
};

/// An item an admin can verify or reject.
pub trait Submission {
    fn id(&self) -> &str;
    fn author_id(&self) -> &str;
    /// Tags as the uploader sent them, `name:value` each.
    fn raw_tags(&self) -> &[String];
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerifyError {
    #[error("at least one tag is required")]
    NoTags,
    #[error("submission {0} is not loaded")]
    NotFound(String),
    #[error("no submission is open")]
    NoOpenPanel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionKind {
    Verify,
    Reject,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Decision<T> {
    Verify { item: T, tags: Vec<TagChoice> },
    Reject { item: T, reason: Option<String> },
}

impl<T> Decision<T> {
    pub fn kind(&self) -> DecisionKind {
        match self {
            Decision::Verify { .. } => DecisionKind::Verify,
            Decision::Reject { .. } => DecisionKind::Reject,
        }
    }

    pub fn item(&self) -> &T {
        match self {
            Decision::Verify { item, .. } | Decision::Reject { item, .. } => item,
        }
    }

    /// Comma-joined tags for a verify, `None` for a reject.
    pub fn tag_string(&self) -> Option<String> {
        match self {
            Decision::Verify { tags, .. } => Some(join_tags(tags)),
            Decision::Reject { .. } => None,
        }
    }
}

/// Review state for one open submission: editable copy plus working tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyPanel<T> {
    item: T,
    tags: Vec<TagChoice>,
    query: String,
}

impl<T: Submission> VerifyPanel<T> {
    pub fn open(item: T, catalog: &TagCatalog) -> (Self, Vec<TagWarning>) {
        let parsed = parse_tags(item.raw_tags(), catalog);
        let panel = Self {
            item,
            tags: parsed.tags,
            query: String::new(),
        };
        (panel, parsed.warnings)
    }
}

impl<T> VerifyPanel<T> {
    pub fn item(&self) -> &T {
        &self.item
    }

    /// Posts can be edited before they are verified.
    pub fn item_mut(&mut self) -> &mut T {
        &mut self.item
    }

    pub fn tags(&self) -> &[TagChoice] {
        &self.tags
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Adds a tag unless it is already present. Clears the picker text.
    pub fn add_tag(&mut self, tag: TagChoice) -> bool {
        if self.tags.iter().any(|known| known.same_tag(&tag)) {
            return false;
        }
        self.tags.push(tag);
        self.query.clear();
        true
    }

    pub fn remove_tag(&mut self, index: usize) -> Option<TagChoice> {
        (index < self.tags.len()).then(|| self.tags.remove(index))
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn suggestions<'a>(&self, catalog: &'a TagCatalog) -> Vec<&'a TagChoice> {
        catalog.search(&self.query, &self.tags)
    }

    pub fn verify(&self) -> Result<Decision<T>, VerifyError>
    where
        T: Clone,
    {
        if self.tags.is_empty() {
            return Err(VerifyError::NoTags);
        }
        Ok(Decision::Verify {
            item: self.item.clone(),
            tags: self.tags.clone(),
        })
    }

    pub fn reject(&self, reason: Option<String>) -> Decision<T>
    where
        T: Clone,
    {
        Decision::Reject {
            item: self.item.clone(),
            reason: reason.filter(|reason| !reason.trim().is_empty()),
        }
    }
}

/// Admin review queue: pending submissions, at most one open panel and the
/// count of submissions still waiting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyQueue<T> {
    pub(crate) list: PagedList<T>,
    pub(crate) catalog: TagCatalog,
    pub(crate) panel: Option<VerifyPanel<T>>,
    pub(crate) pending_total: Option<u64>,
}

impl<T> VerifyQueue<T> {
    pub fn open(config: ListConfig, catalog: TagCatalog) -> (Self, Vec<QueueEffect<T>>) {
        let (list, effects) = PagedList::open(config);
        let queue = Self {
            list,
            catalog,
            panel: None,
            pending_total: None,
        };
        (queue, lift(effects))
    }

    pub fn list(&self) -> &PagedList<T> {
        &self.list
    }

    pub fn list_mut(&mut self) -> &mut PagedList<T> {
        &mut self.list
    }

    pub fn catalog(&self) -> &TagCatalog {
        &self.catalog
    }

    pub fn panel(&self) -> Option<&VerifyPanel<T>> {
        self.panel.as_ref()
    }

    pub fn panel_mut(&mut self) -> Option<&mut VerifyPanel<T>> {
        self.panel.as_mut()
    }

    pub fn pending_total(&self) -> Option<u64> {
        self.pending_total
    }

    pub fn view(&self) -> QueueViewModel
    where
        T: Submission,
    {
        QueueViewModel {
            list: self.list.view(),
            pending_total: self.pending_total,
            panel: self.panel.as_ref().map(|panel| PanelView {
                id: panel.item.id().to_string(),
                tags: panel.tags.clone(),
                query: panel.query.clone(),
            }),
        }
    }
}

pub(crate) fn lift<T>(effects: Vec<ListEffect>) -> Vec<QueueEffect<T>> {
    effects.into_iter().map(QueueEffect::from).collect()
}
