//! Request builders for the backend routes the client uses.

use mindhub_core::{Decision, Post, SchematicUpload, Submission};

use crate::ApiRequest;

pub const SCHEMATIC_UPLOADS: &str = "schematic-upload";
pub const POST_UPLOADS: &str = "posts/upload";
pub const MINDUSTRY_SERVERS: &str = "mindustry-server";

pub const SCHEMATIC_UPLOAD_TAGS: &str = "schematic-upload-tag";
pub const POST_UPLOAD_TAGS: &str = "post-upload-tag";

pub fn ping() -> ApiRequest {
    ApiRequest::get("ping")
}

pub fn me() -> ApiRequest {
    ApiRequest::get("user/me")
}

/// Tag categories of one kind, e.g. [`SCHEMATIC_UPLOAD_TAGS`].
pub fn tags(kind: &str) -> ApiRequest {
    ApiRequest::get(format!("tag/{kind}"))
}

/// Number of items in a resource, e.g. submissions still waiting for review.
pub fn total(resource: &str) -> ApiRequest {
    ApiRequest::get(format!("{}/total", resource.trim_end_matches('/')))
}

pub fn add_server(address: &str) -> ApiRequest {
    ApiRequest::post_form(MINDUSTRY_SERVERS, [("address", address)])
}

pub fn remove_server(address: &str) -> ApiRequest {
    ApiRequest::delete(format!("{MINDUSTRY_SERVERS}/{address}"))
}

pub fn notify_user(user_id: &str, header: &str, message: &str) -> ApiRequest {
    ApiRequest::post_form(
        "notification",
        [("userId", user_id), ("header", header), ("message", message)],
    )
}

/// Items whose review decision maps onto backend calls.
pub trait Reviewable: Submission + Sized {
    /// Calls to run in order; the first failure aborts the rest.
    fn decision_requests(decision: &Decision<Self>) -> Vec<ApiRequest>;
}

impl Reviewable for SchematicUpload {
    fn decision_requests(decision: &Decision<Self>) -> Vec<ApiRequest> {
        match decision {
            Decision::Verify { item, .. } => {
                let tags = decision.tag_string().unwrap_or_default();
                vec![ApiRequest::post_form(
                    "schematic",
                    [
                        ("id", item.id.as_str()),
                        ("authorId", item.author_id.as_str()),
                        ("data", item.data.as_str()),
                        ("tags", tags.as_str()),
                    ],
                )]
            }
            Decision::Reject { item, .. } => {
                vec![ApiRequest::delete(format!("{SCHEMATIC_UPLOADS}/{}", item.id))]
            }
        }
    }
}

impl Reviewable for Post {
    fn decision_requests(decision: &Decision<Self>) -> Vec<ApiRequest> {
        match decision {
            Decision::Verify { item, .. } => {
                let tags = decision.tag_string().unwrap_or_default();
                vec![
                    ApiRequest::post_form(
                        "post",
                        [
                            ("id", item.id.as_str()),
                            ("authorId", item.author_id.as_str()),
                            ("header", item.header.as_str()),
                            ("content", item.content.as_str()),
                            ("tags", tags.as_str()),
                        ],
                    ),
                    notify_user(
                        &item.author_id,
                        "Post accepted",
                        "Your post submission has been accepted",
                    ),
                ]
            }
            Decision::Reject { item, reason } => {
                let request = ApiRequest::delete(format!("{POST_UPLOADS}/{}", item.id));
                vec![match reason {
                    Some(reason) => request.with_query("reason", reason.as_str()),
                    None => request,
                }]
            }
        }
    }
}
