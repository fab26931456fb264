use std::sync::Once;

use mindhub_core::{
    update_queue, CustomTag, Decision, DecisionKind, ListConfig, ListMsg, NoticeLevel, PageSize,
    Post, QueueEffect, QueueMsg, SchematicUpload, TagCatalog, TagChoice, VerifyQueue,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(mindhub_logging::initialize_for_tests);
}

fn catalog() -> TagCatalog {
    TagCatalog::from_categories(vec![CustomTag {
        name: "mode".to_string(),
        value: vec!["pvp".to_string(), "attack".to_string()],
        color: Some("#ff0000".to_string()),
    }])
}

fn upload(id: &str, tags: &[&str]) -> SchematicUpload {
    SchematicUpload {
        id: id.to_string(),
        name: format!("schematic {id}"),
        author_id: "author-1".to_string(),
        description: None,
        data: "bXNja".to_string(),
        tags: tags.iter().map(|tag| tag.to_string()).collect(),
        requirement: Vec::new(),
    }
}

fn loaded_queue(
    uploads: Vec<SchematicUpload>,
) -> VerifyQueue<SchematicUpload> {
    let size = PageSize::new(20).unwrap();
    let (queue, effects) = VerifyQueue::open(ListConfig::new("schematic-upload", size), catalog());
    let request = match &effects[..] {
        [QueueEffect::FetchPage(request)] => request.request,
        other => panic!("unexpected effects {other:?}"),
    };
    let (queue, effects) = update_queue(
        queue,
        QueueMsg::List(ListMsg::PageFetched {
            request,
            items: uploads,
        }),
    );
    assert!(effects.is_empty());
    let (queue, _) = update_queue(queue, QueueMsg::TotalLoaded(2));
    queue
}

fn notices<T>(effects: &[QueueEffect<T>]) -> Vec<NoticeLevel> {
    effects
        .iter()
        .filter_map(|effect| match effect {
            QueueEffect::Notify(notice) => Some(notice.level),
            _ => None,
        })
        .collect()
}

#[test]
fn open_parses_tags_and_warns_on_unknown_category() {
    init_logging();
    let queue = loaded_queue(vec![upload("s1", &["mode:pvp", "planet:erekir"])]);

    let (queue, effects) = update_queue(queue, QueueMsg::Open { id: "s1".into() });
    assert_eq!(notices(&effects), vec![NoticeLevel::Warning]);

    let view = queue.view();
    let panel = view.panel.expect("panel open");
    assert_eq!(panel.id, "s1");
    assert_eq!(panel.tags.len(), 2);
}

#[test]
fn open_unknown_id_reports_error() {
    init_logging();
    let queue = loaded_queue(vec![upload("s1", &[])]);
    let (queue, effects) = update_queue(queue, QueueMsg::Open { id: "zz".into() });
    assert_eq!(notices(&effects), vec![NoticeLevel::Error]);
    assert!(queue.panel().is_none());
}

#[test]
fn verify_without_tags_is_refused() {
    init_logging();
    let queue = loaded_queue(vec![upload("s1", &[])]);
    let (queue, _) = update_queue(queue, QueueMsg::Open { id: "s1".into() });
    let (queue, effects) = update_queue(queue, QueueMsg::Verify);

    assert_eq!(notices(&effects), vec![NoticeLevel::Warning]);
    assert!(queue.panel().is_some());
}

#[test]
fn verify_submits_edited_tags_and_settle_removes_item() {
    init_logging();
    let queue = loaded_queue(vec![upload("s1", &["mode:pvp"]), upload("s2", &[])]);
    let (queue, _) = update_queue(queue, QueueMsg::Open { id: "s1".into() });
    let (queue, _) = update_queue(queue, QueueMsg::SetQuery("att".into()));

    let suggestion = {
        let panel = queue.panel().unwrap();
        let hits = panel.suggestions(queue.catalog());
        assert_eq!(hits.len(), 1);
        hits[0].clone()
    };
    let (queue, _) = update_queue(queue, QueueMsg::AddTag(suggestion));
    let (queue, _) = update_queue(queue, QueueMsg::RemoveTag(0));
    let (queue, effects) = update_queue(queue, QueueMsg::Verify);

    let decision = match &effects[..] {
        [QueueEffect::Submit(decision)] => decision.clone(),
        other => panic!("unexpected effects {other:?}"),
    };
    assert_eq!(decision.kind(), DecisionKind::Verify);
    assert_eq!(decision.tag_string().as_deref(), Some("mode:attack"));
    assert!(queue.panel().is_none());

    let (queue, effects) = update_queue(
        queue,
        QueueMsg::Settled {
            id: "s1".into(),
            kind: DecisionKind::Verify,
            result: Ok(()),
        },
    );
    assert_eq!(notices(&effects), vec![NoticeLevel::Info]);
    assert_eq!(queue.pending_total(), Some(1));
    let ids: Vec<_> = queue.list().items().map(|item| item.id.clone()).collect();
    assert_eq!(ids, vec!["s2"]);
}

#[test]
fn failed_settle_still_removes_but_keeps_total() {
    init_logging();
    let queue = loaded_queue(vec![upload("s1", &["mode:pvp"])]);
    let (queue, _) = update_queue(queue, QueueMsg::Open { id: "s1".into() });
    let (queue, effects) = update_queue(
        queue,
        QueueMsg::Reject {
            reason: Some("   ".into()),
        },
    );
    match &effects[..] {
        [QueueEffect::Submit(Decision::Reject { reason, .. })] => assert_eq!(reason, &None),
        other => panic!("unexpected effects {other:?}"),
    }

    let (queue, effects) = update_queue(
        queue,
        QueueMsg::Settled {
            id: "s1".into(),
            kind: DecisionKind::Reject,
            result: Err("500 Internal Server Error".into()),
        },
    );
    assert_eq!(notices(&effects), vec![NoticeLevel::Error]);
    assert_eq!(queue.pending_total(), Some(2));
    assert!(queue.list().is_empty());
}

#[test]
fn post_panel_allows_editing_before_verify() {
    init_logging();
    let size = PageSize::new(20).unwrap();
    let (queue, effects) =
        VerifyQueue::<Post>::open(ListConfig::new("posts/upload", size), catalog());
    let request = match &effects[..] {
        [QueueEffect::FetchPage(request)] => request.request,
        other => panic!("unexpected effects {other:?}"),
    };
    let post = Post {
        id: "p1".into(),
        header: "Guide".into(),
        content: "draft".into(),
        author_id: "a".into(),
        tags: vec!["mode:pvp".into()],
        time: None,
    };
    let (queue, _) = update_queue(
        queue,
        QueueMsg::List(ListMsg::PageFetched {
            request,
            items: vec![post],
        }),
    );
    let (mut queue, _) = update_queue(queue, QueueMsg::Open { id: "p1".into() });
    queue.panel_mut().unwrap().item_mut().content = "final".into();

    let (_queue, effects) = update_queue(queue, QueueMsg::Verify);
    match &effects[..] {
        [QueueEffect::Submit(Decision::Verify { item, tags })] => {
            assert_eq!(item.content, "final");
            assert_eq!(
                tags,
                &vec![TagChoice::new("mode", "pvp", Some("#ff0000".into()))]
            );
        }
        other => panic!("unexpected effects {other:?}"),
    }
}
