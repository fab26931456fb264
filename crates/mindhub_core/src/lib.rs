//! Mindhub core: pure paged-list state machine, tag parsing and the admin
//! review workflow. No IO happens here; fetches leave as effects.
mod context;
mod effect;
mod list;
mod loader;
mod model;
mod msg;
mod page;
mod tag;
mod update;
mod verify;
mod view_model;

pub use context::{Notice, NoticeLevel, SessionContext};
pub use effect::{ListEffect, PageRequest, QueueEffect};
pub use list::{ListConfig, PagedList, RequestId};
pub use loader::{FailurePolicy, LoadFailure, LoaderState};
pub use model::{
    sort_servers_named_first, ItemRequirement, MindustryServer, Post, SchematicUpload, User,
};
pub use msg::{ListMsg, QueueMsg};
pub use page::{Page, PageCollection, PageGap, PageSize};
pub use tag::{
    join_tags, parse_tag_string, parse_tags, CustomTag, TagCatalog, TagChoice, TagParse,
    TagWarning,
};
pub use update::{update_list, update_queue};
pub use verify::{Decision, DecisionKind, Submission, VerifyError, VerifyPanel, VerifyQueue};
pub use view_model::{Footer, ListViewModel, PanelView, QueueViewModel};
