use super::{opportunity, person, Fixture};
use crate::{
    models::{
        Contact, ContactMergeLog, Deal, NewContactMergeLog, NewTag, NewTaggable, NewTask,
        NewTaskReminder,
        Opportunity, People, Tag, Taggable, Task, TaskReminder,
    },
    query::Direction,
    tasks::ReminderState,
    EntityKind, Error, WriteAction, WriteEvent,
};
use std::sync::{Arc, Mutex};

fn tag(slug: &str) -> NewTag {
    NewTag {
        team_id: 0,
        name: slug.to_uppercase(),
        slug: slug.into(),
        color: None,
    }
}

async fn task(fx: &Fixture) -> Task {
    fx.store
        .insert::<Task>(&fx.acme_scope(), NewTask {
            team_id: 0,
            title: "Call back".into(),
            description: None,
            status: "open".into(),
            priority: None,
            due_at: None,
            completed_at: None,
            assignee_id: Some(fx.user.id),
            creator_id: None,
        })
        .await
        .expect("should insert task")
}

fn reminder(task_id: i64) -> NewTaskReminder {
    NewTaskReminder {
        team_id: 0,
        task_id,
        user_id: None,
        remind_at: jiff::Timestamp::UNIX_EPOCH.into(),
        channel: "email".into(),
        sent_at: None,
        canceled_at: None,
    }
}

#[tokio::test]
async fn soft_deleted_rows_are_hidden_until_restored() {
    let fx = Fixture::new().await;
    let scope = fx.acme_scope();
    let jane = fx.store.insert::<People>(&scope, person("Jane Doe")).await.unwrap();

    fx.store.delete::<People>(&scope, jane.id).await.unwrap();
    assert_eq!(fx.store.find::<People>(&scope, jane.id).await.unwrap(), None);
    let trashed = fx.store.find_with_trashed::<People>(&scope, jane.id).await.unwrap().unwrap();
    assert!(trashed.is_trashed());
    assert_eq!(fx.store.query::<People>(&scope).only_trashed().count().await.unwrap(), 1);
    assert_eq!(fx.store.query::<People>(&scope).with_trashed().count().await.unwrap(), 1);
    assert_eq!(fx.store.query::<People>(&scope).count().await.unwrap(), 0);

    let restored = fx.store.restore::<People>(&scope, jane.id).await.unwrap();
    assert!(!restored.is_trashed());
    assert_eq!(restored.created_at, jane.created_at);
    assert!(fx.store.find::<People>(&scope, jane.id).await.unwrap().is_some());
}

#[tokio::test]
async fn force_delete_removes_trashed_rows() {
    let fx = Fixture::new().await;
    let scope = fx.acme_scope();
    let jane = fx.store.insert::<People>(&scope, person("Jane Doe")).await.unwrap();
    fx.store.delete::<People>(&scope, jane.id).await.unwrap();
    fx.store.force_delete::<People>(&scope, jane.id).await.unwrap();
    assert_eq!(fx.store.find_with_trashed::<People>(&scope, jane.id).await.unwrap(), None);
}

#[tokio::test]
async fn trash_modes_need_soft_deletes() {
    let fx = Fixture::new().await;
    let scope = fx.acme_scope();
    let vip = fx.store.insert::<Tag>(&scope, tag("vip")).await.unwrap();
    assert!(matches!(
        fx.store.query::<Tag>(&scope).only_trashed().load().await,
        Err(Error::NotSoftDeletable("tags"))
    ));
    assert!(matches!(
        fx.store.restore::<Tag>(&scope, vip.id).await,
        Err(Error::NotSoftDeletable("tags"))
    ));
    assert_eq!(fx.store.query::<Tag>(&scope).with_trashed().count().await.unwrap(), 1);
}

#[tokio::test]
async fn duplicate_tag_slugs_are_rejected_per_team() {
    let fx = Fixture::new().await;
    fx.store.insert::<Tag>(&fx.acme_scope(), tag("vip")).await.unwrap();
    fx.store.insert::<Tag>(&fx.globex_scope(), tag("vip")).await.unwrap();
    let err = fx.store.insert::<Tag>(&fx.acme_scope(), tag("vip")).await.unwrap_err();
    assert!(matches!(err, Error::Duplicate { entity: "tags", .. }));
}

#[tokio::test]
async fn referenced_rows_cannot_be_hard_deleted() {
    let fx = Fixture::new().await;
    let scope = fx.acme_scope();
    let vip = fx.store.insert::<Tag>(&scope, tag("vip")).await.unwrap();
    let jane = fx.store.insert::<People>(&scope, person("Jane Doe")).await.unwrap();
    let link = fx
        .store
        .insert::<Taggable>(&scope, NewTaggable {
            team_id: 0,
            tag_id: vip.id,
            taggable_type: "contact".into(),
            taggable_id: jane.id,
        })
        .await
        .unwrap();
    assert_eq!(link.taggable_type, "people");

    let err = fx.store.delete::<Tag>(&scope, vip.id).await.unwrap_err();
    assert!(matches!(
        err,
        Error::InUse { entity: "tags", ref referenced_by, .. }
            if referenced_by == "taggables.tag_id"
    ));
    assert!(matches!(
        fx.store.force_delete::<People>(&scope, jane.id).await,
        Err(Error::InUse { entity: "people", .. })
    ));

    fx.store.delete::<Taggable>(&scope, link.id).await.unwrap();
    fx.store.delete::<Tag>(&scope, vip.id).await.unwrap();
    assert_eq!(fx.store.find::<Tag>(&scope, vip.id).await.unwrap(), None);
}

#[tokio::test]
async fn unknown_morph_types_are_errors() {
    let fx = Fixture::new().await;
    let scope = fx.acme_scope();
    let vip = fx.store.insert::<Tag>(&scope, tag("vip")).await.unwrap();
    let err = fx
        .store
        .insert::<Taggable>(&scope, NewTaggable {
            team_id: 0,
            tag_id: vip.id,
            taggable_type: "spaceship".into(),
            taggable_id: 1,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, Error::UnknownMorphType(ref name) if name == "spaceship"));

    let err = fx
        .store
        .insert::<Taggable>(&scope, NewTaggable {
            team_id: 0,
            tag_id: vip.id,
            taggable_type: "App\\Models\\Company".into(),
            taggable_id: 404,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, Error::ReferentialIntegrity { entity: "taggables", .. }));
}

#[tokio::test]
async fn aliases_share_one_table() {
    let fx = Fixture::new().await;
    let scope = fx.acme_scope();
    let jane = fx.store.insert::<Contact>(&scope, person("Jane Doe")).await.unwrap();
    assert_eq!(fx.store.get::<People>(&scope, jane.id).await.unwrap(), jane);

    let deal = fx
        .store
        .insert::<Deal>(&scope, opportunity("Renewal", Some(jane.id)))
        .await
        .unwrap();
    let read_back = fx.store.get::<Opportunity>(&scope, deal.id).await.unwrap();
    assert_eq!(read_back.name, "Renewal");
    assert_eq!(EntityKind::from_discriminator("deal").unwrap(), EntityKind::Opportunity);

    let mut renamed: Deal = read_back;
    renamed.name = "Renewal 2025".into();
    fx.store.update::<Deal>(&scope, renamed).await.unwrap();
    let read_back = fx.store.get::<Opportunity>(&scope, deal.id).await.unwrap();
    assert_eq!(read_back.name, "Renewal 2025");

    fx.store.delete::<Contact>(&scope, jane.id).await.unwrap();
    assert_eq!(fx.store.find::<People>(&scope, jane.id).await.unwrap(), None);
    let trashed = fx.store.find_with_trashed::<People>(&scope, jane.id).await.unwrap().unwrap();
    assert!(trashed.is_trashed());
    fx.store.restore::<Contact>(&scope, jane.id).await.unwrap();
    assert!(fx.store.find::<People>(&scope, jane.id).await.unwrap().is_some());
}

#[tokio::test]
async fn validation_uses_reference_data() {
    let fx = Fixture::new().await;
    let scope = fx.acme_scope();
    let mut draft = opportunity("Yen deal", None);
    draft.currency = "XTS".into();
    assert!(matches!(
        fx.store.insert::<Opportunity>(&scope, draft.clone()).await,
        Err(Error::Validation { entity: "opportunities", .. })
    ));

    fx.store
        .reference()
        .rebuild_from_json(
            r#"{"countries": [], "currencies": [{"code": "xts", "name": "Testing"}]}"#,
        )
        .unwrap();
    fx.store.insert::<Opportunity>(&scope, draft).await.unwrap();
    assert!(matches!(
        fx.store.insert::<Opportunity>(&scope, opportunity("Dollar deal", None)).await,
        Err(Error::Validation { .. })
    ));
}

#[tokio::test]
async fn probability_is_bounded() {
    let fx = Fixture::new().await;
    let mut draft = opportunity("Sure thing", None);
    draft.probability = Some(140);
    assert!(matches!(
        fx.store.insert::<Opportunity>(&fx.acme_scope(), draft).await,
        Err(Error::Validation { .. })
    ));
}

#[tokio::test]
async fn reminders_are_sent_or_canceled_never_both() {
    let fx = Fixture::new().await;
    let scope = fx.acme_scope();
    let task = task(&fx).await;

    let mut both = reminder(task.id);
    both.sent_at = Some(jiff::Timestamp::UNIX_EPOCH.into());
    both.canceled_at = Some(jiff::Timestamp::UNIX_EPOCH.into());
    assert!(matches!(
        fx.store.insert::<TaskReminder>(&scope, both).await,
        Err(Error::Validation { .. })
    ));

    let mut scheduled = fx.store.insert::<TaskReminder>(&scope, reminder(task.id)).await.unwrap();
    assert_eq!(scheduled.state(), ReminderState::Scheduled);
    scheduled.mark_sent(jiff::Timestamp::now()).unwrap();
    let sent = fx.store.update(&scope, scheduled).await.unwrap();
    assert_eq!(sent.state(), ReminderState::Sent);

    let mut sent = sent;
    assert!(sent.cancel(jiff::Timestamp::now()).is_err());
    sent.canceled_at = Some(jiff::Timestamp::now().into());
    assert!(matches!(fx.store.update(&scope, sent).await, Err(Error::Validation { .. })));
}

#[tokio::test]
async fn merge_logs_are_append_only() {
    let fx = Fixture::new().await;
    let scope = fx.acme_scope();
    let jane = fx.store.insert::<People>(&scope, person("Jane Doe")).await.unwrap();
    let janet = fx.store.insert::<People>(&scope, person("Janet Doe")).await.unwrap();
    let log = fx
        .store
        .insert::<ContactMergeLog>(&scope, NewContactMergeLog {
            team_id: 0,
            primary_contact_id: jane.id,
            duplicate_contact_id: janet.id,
            merged_by: fx.user.id,
            merge_data: serde_json::json!({"note": "imported"}),
        })
        .await
        .unwrap();
    assert!(matches!(
        fx.store.update(&scope, log.clone()).await,
        Err(Error::AppendOnly("contact_merge_logs"))
    ));
    assert!(matches!(
        fx.store.delete::<ContactMergeLog>(&scope, log.id).await,
        Err(Error::AppendOnly("contact_merge_logs"))
    ));
}

#[tokio::test]
async fn queries_reject_unknown_columns_and_sort() {
    let fx = Fixture::new().await;
    let scope = fx.acme_scope();
    for name in ["Bea", "Cal", "Abe"] {
        fx.store.insert::<People>(&scope, person(name)).await.unwrap();
    }
    let names: Vec<String> = fx
        .store
        .query::<People>(&scope)
        .order_by("name", Direction::Desc)
        .limit(2)
        .load()
        .await
        .unwrap()
        .into_iter()
        .map(|person| person.name)
        .collect();
    assert_eq!(names, ["Cal", "Bea"]);

    assert!(matches!(
        fx.store.query::<People>(&scope).where_eq("shoe_size", 42).load().await,
        Err(Error::UnknownColumn { entity: "people", .. })
    ));
}

#[tokio::test]
async fn observers_run_after_commit() {
    let fx = Fixture::new().await;
    let scope = fx.acme_scope();
    let seen: Arc<Mutex<Vec<WriteEvent>>> = Arc::default();
    let sink = seen.clone();
    fx.store
        .hooks()
        .observe(EntityKind::People, move |event| sink.lock().unwrap().push(event.clone()));

    let jane = fx.store.insert::<People>(&scope, person("Jane Doe")).await.unwrap();
    fx.store.delete::<People>(&scope, jane.id).await.unwrap();
    let _ = fx.store.insert::<People>(&scope, {
        let mut draft = person("Ghost");
        draft.creator_id = Some(404);
        draft
    })
    .await
    .unwrap_err();

    let actions: Vec<WriteAction> = seen.lock().unwrap().iter().map(|event| event.action).collect();
    assert_eq!(actions, [WriteAction::Created, WriteAction::Deleted]);
    assert!(seen.lock().unwrap().iter().all(|event| event.team_id == Some(fx.acme.id)));
}
