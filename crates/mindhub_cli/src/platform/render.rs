//! Plain-text rendering of view models and records.

use chrono::DateTime;
use mindhub_core::{
    CustomTag, Footer, ListViewModel, MindustryServer, Notice, NoticeLevel, Post, QueueViewModel,
    SchematicUpload, TagParse, User,
};

/// One-line summary of a submission in the review queue.
pub trait Describe {
    fn headline(&self) -> String;
}

impl Describe for SchematicUpload {
    fn headline(&self) -> String {
        let mut line = format!("{}  {}  by {}", self.id, self.name, self.author_id);
        if !self.requirement.is_empty() {
            let cost: Vec<String> = self
                .requirement
                .iter()
                .map(|req| format!("{}x{}", req.amount, req.name))
                .collect();
            line.push_str(&format!("  [{}]", cost.join(" ")));
        }
        line
    }
}

impl Describe for Post {
    fn headline(&self) -> String {
        let mut line = format!("{}  {}  by {}", self.id, self.header, self.author_id);
        if let Some(time) = self.time.and_then(format_time) {
            line.push_str(&format!("  {time}"));
        }
        line
    }
}

/// Milliseconds since the epoch as a UTC timestamp.
pub fn format_time(millis: i64) -> Option<String> {
    DateTime::from_timestamp_millis(millis).map(|time| time.format("%Y-%m-%d %H:%M UTC").to_string())
}

pub fn footer_line(view: &ListViewModel) -> String {
    match view.footer() {
        Footer::Spinner => "loading".to_string(),
        Footer::LoadMore => format!(
            "{} items in {} pages, more available",
            view.item_count, view.page_count
        ),
        Footer::NoMore => format!("{} items, end of list", view.item_count),
        Footer::Error(message) => format!("load failed: {message}"),
    }
}

pub fn queue_summary(view: &QueueViewModel) -> String {
    match view.pending_total {
        Some(total) => format!("{} ({total} pending)", footer_line(&view.list)),
        None => footer_line(&view.list),
    }
}

pub fn tag_lines(parse: &TagParse) -> Vec<String> {
    let mut lines = Vec::new();
    if !parse.tags.is_empty() {
        let tags: Vec<String> = parse.tags.iter().map(ToString::to_string).collect();
        lines.push(format!("    tags: {}", tags.join(", ")));
    }
    lines.extend(
        parse
            .warnings
            .iter()
            .map(|warning| format!("    warning: {warning}")),
    );
    lines
}

pub fn server_line(server: &MindustryServer) -> String {
    let Some(name) = server.display_name() else {
        return format!("{}  (offline)", server.address);
    };
    let mut line = format!("{name}  {}", server.address);
    if let Some(players) = server.players {
        match server.player_limit {
            Some(limit) if limit > 0 => line.push_str(&format!("  {players}/{limit}")),
            _ => line.push_str(&format!("  {players} players")),
        }
    }
    if let Some(mode) = server.mode_label() {
        line.push_str(&format!("  {mode}"));
    }
    if let Some(map) = &server.map_name {
        line.push_str(&format!("  map {map}"));
    }
    if let Some(wave) = server.wave {
        line.push_str(&format!("  wave {wave}"));
    }
    if let Some(version) = server.version_label() {
        line.push_str(&format!("  version {version}"));
    }
    if let Some(ping) = server.ping {
        line.push_str(&format!("  {ping}ms"));
    }
    line
}

pub fn category_line(tag: &CustomTag) -> String {
    let color = tag.color.as_deref().unwrap_or("-");
    format!("{} ({color}): {}", tag.name, tag.value.join(", "))
}

pub fn user_line(user: &User) -> String {
    if user.roles.is_empty() {
        format!("{} ({})", user.name, user.id)
    } else {
        format!("{} ({}) roles: {}", user.name, user.id, user.roles.join(", "))
    }
}

pub fn notice_line(notice: &Notice) -> String {
    let level = match notice.level {
        NoticeLevel::Info => "info",
        NoticeLevel::Warning => "warning",
        NoticeLevel::Error => "error",
    };
    format!("[{level}] {}", notice.message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mindhub_core::{ItemRequirement, LoadFailure, LoaderState, TagChoice, TagWarning};
    use pretty_assertions::assert_eq;

    fn view(state: LoaderState, failure: Option<LoadFailure>) -> ListViewModel {
        ListViewModel {
            state,
            item_count: 47,
            page_count: 3,
            failure,
            dirty: false,
        }
    }

    #[test]
    fn footer_distinguishes_error_from_end() {
        assert_eq!(
            footer_line(&view(LoaderState::Exhausted, None)),
            "47 items, end of list"
        );
        assert_eq!(
            footer_line(&view(
                LoaderState::More,
                Some(LoadFailure::network("http status 502"))
            )),
            "load failed: http status 502"
        );
        assert_eq!(
            footer_line(&view(LoaderState::Exhausted, Some(LoadFailure::EmptyPage))),
            "47 items, end of list"
        );
    }

    #[test]
    fn post_headline_includes_utc_time() {
        let post = Post {
            id: "p1".to_string(),
            header: "Logic guide".to_string(),
            content: String::new(),
            author_id: "u9".to_string(),
            tags: Vec::new(),
            time: Some(1_700_000_000_000),
        };
        assert_eq!(post.headline(), "p1  Logic guide  by u9  2023-11-14 22:13 UTC");
    }

    #[test]
    fn schematic_headline_lists_cost() {
        let upload = SchematicUpload {
            id: "s1".to_string(),
            name: "Drill array".to_string(),
            author_id: "u1".to_string(),
            description: None,
            data: String::new(),
            tags: Vec::new(),
            requirement: vec![ItemRequirement {
                name: "copper".to_string(),
                amount: 40,
            }],
        };
        assert_eq!(upload.headline(), "s1  Drill array  by u1  [40xcopper]");
    }

    #[test]
    fn offline_server_shows_address_only() {
        let server = MindustryServer {
            address: "1.2.3.4:6567".to_string(),
            players: Some(3),
            ..MindustryServer::default()
        };
        assert_eq!(server_line(&server), "1.2.3.4:6567  (offline)");

        let blank = MindustryServer {
            name: Some(String::new()),
            ..server.clone()
        };
        assert_eq!(server_line(&blank), "1.2.3.4:6567  (offline)");

        let online = MindustryServer {
            name: Some("Alpha".to_string()),
            map_name: Some("Ancient Caldera".to_string()),
            player_limit: Some(20),
            ping: Some(41),
            ..server
        };
        assert_eq!(
            server_line(&online),
            "Alpha  1.2.3.4:6567  3/20  map Ancient Caldera  41ms"
        );

        let custom = MindustryServer {
            mode: Some("survival".to_string()),
            wave: Some(12),
            version: Some(-1),
            version_type: Some("bleeding-edge".to_string()),
            ..online
        };
        assert_eq!(
            server_line(&custom),
            "Alpha  1.2.3.4:6567  3/20  survival  map Ancient Caldera  wave 12  version bleeding-edge  41ms"
        );
    }

    #[test]
    fn tag_lines_show_warnings() {
        let parse = TagParse {
            tags: vec![TagChoice::new("mode", "pvp", None)],
            warnings: vec![TagWarning::Malformed {
                raw: "nonsense".to_string(),
            }],
        };
        assert_eq!(
            tag_lines(&parse),
            vec![
                "    tags: mode: pvp".to_string(),
                "    warning: malformed tag \"nonsense\"".to_string(),
            ]
        );
    }
}
