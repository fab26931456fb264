//! Backend records. Field names follow the API's camelCase JSON.

use serde::{Deserialize, Serialize};

use crate::Submission;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.roles
            .iter()
            .any(|role| role.eq_ignore_ascii_case("admin"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRequirement {
    pub name: String,
    pub amount: u32,
}

/// A schematic waiting in the upload queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchematicUpload {
    pub id: String,
    pub name: String,
    pub author_id: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Base64 schematic payload, passed through untouched on verify.
    #[serde(default)]
    pub data: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub requirement: Vec<ItemRequirement>,
}

impl Submission for SchematicUpload {
    fn id(&self) -> &str {
        &self.id
    }

    fn author_id(&self) -> &str {
        &self.author_id
    }

    fn raw_tags(&self) -> &[String] {
        &self.tags
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub header: String,
    #[serde(default)]
    pub content: String,
    pub author_id: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Milliseconds since the Unix epoch.
    #[serde(default)]
    pub time: Option<i64>,
}

impl Submission for Post {
    fn id(&self) -> &str {
        &self.id
    }

    fn author_id(&self) -> &str {
        &self.author_id
    }

    fn raw_tags(&self) -> &[String] {
        &self.tags
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MindustryServer {
    pub address: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// The backend sends this one all lowercase.
    #[serde(default, rename = "mapname")]
    pub map_name: Option<String>,
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub mode_name: Option<String>,
    #[serde(default)]
    pub wave: Option<u32>,
    #[serde(default)]
    pub players: Option<u32>,
    #[serde(default)]
    pub player_limit: Option<u32>,
    /// `-1` for custom builds; `version_type` names the build then.
    #[serde(default)]
    pub version: Option<i32>,
    #[serde(default)]
    pub version_type: Option<String>,
    #[serde(default)]
    pub ping: Option<u64>,
}

impl MindustryServer {
    /// Online servers report a non-empty name.
    pub fn display_name(&self) -> Option<&str> {
        self.name.as_deref().filter(|name| !name.is_empty())
    }

    /// Game mode label: the custom mode name if set, otherwise the mode.
    pub fn mode_label(&self) -> Option<&str> {
        self.mode_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .or(self.mode.as_deref())
    }

    /// Build label: the version number, or the build type for custom builds.
    pub fn version_label(&self) -> Option<String> {
        match self.version {
            Some(-1) => self.version_type.clone(),
            Some(version) => Some(version.to_string()),
            None => None,
        }
    }
}

/// Named (online, reporting) servers first, original order otherwise.
pub fn sort_servers_named_first(servers: &mut [MindustryServer]) {
    servers.sort_by_key(|server| server.display_name().is_none());
}
