use super::{company, opportunity, person, Fixture};
use crate::{
    models::{
        Company, ContactMergeLog, Email, Group, GroupPeople, NewCompanyPeople, NewEmail, NewGroup,
        NewGroupPeople, Opportunity, People,
    },
    Error, MergeRequest, WriteAction,
};
use std::sync::{Arc, Mutex};

fn group(name: &str) -> NewGroup {
    NewGroup {
        team_id: 0,
        name: name.into(),
        description: None,
    }
}

#[tokio::test]
async fn merging_moves_everything_to_the_primary() {
    let fx = Fixture::new().await;
    let scope = fx.acme_scope();
    let jane = fx.store.insert::<People>(&scope, person("Jane Doe")).await.unwrap();
    let dupe = fx.store.insert::<People>(&scope, person("Jane D")).await.unwrap();

    let deal = fx
        .store
        .insert::<Opportunity>(&scope, opportunity("Renewal", Some(dupe.id)))
        .await
        .unwrap();
    let email = fx
        .store
        .insert::<Email>(&scope, NewEmail {
            team_id: 0,
            emailable_type: "contact".into(),
            emailable_id: dupe.id,
            address: "jd@example.com".into(),
            label: None,
            is_primary: false,
        })
        .await
        .unwrap();
    let acme = fx.store.insert::<Company>(&scope, company("Acme Corp")).await.unwrap();
    Company::PEOPLE
        .attach(&fx.store, &scope, &acme, dupe.id, NewCompanyPeople::with_role("buyer"))
        .await
        .unwrap();
    let board = fx.store.insert::<Group>(&scope, group("Board")).await.unwrap();
    for member in [jane.id, dupe.id] {
        Group::PEOPLE
            .attach(&fx.store, &scope, &board, member, NewGroupPeople::default())
            .await
            .unwrap();
    }

    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();
    fx.store.hooks().observe(crate::EntityKind::People, move |event| {
        sink.lock().unwrap().push((event.id, event.action))
    });

    let log = fx
        .store
        .merge_contacts(&scope, MergeRequest {
            primary_id: jane.id,
            duplicate_id: dupe.id,
            merged_by: fx.user.id,
        })
        .await
        .unwrap();
    assert_eq!((log.primary_contact_id, log.duplicate_contact_id), (jane.id, dupe.id));
    assert_eq!(log.team_id, fx.acme.id);

    let deal = fx.store.get::<Opportunity>(&scope, deal.id).await.unwrap();
    assert_eq!(deal.contact_id, Some(jane.id));
    let email = fx.store.get::<Email>(&scope, email.id).await.unwrap();
    assert_eq!((email.emailable_type.as_str(), email.emailable_id), ("people", jane.id));
    let companies = People::COMPANIES.load(&fx.store, &scope, &jane).await.unwrap();
    assert_eq!(companies.len(), 1);
    assert_eq!(companies[0].1.role.as_deref(), Some("buyer"));
    let memberships = fx.store.query::<GroupPeople>(&scope).load().await.unwrap();
    assert_eq!(memberships.len(), 1);
    assert_eq!(memberships[0].people_id, jane.id);

    assert_eq!(fx.store.find::<People>(&scope, dupe.id).await.unwrap(), None);
    assert!(fx.store.find_with_trashed::<People>(&scope, dupe.id).await.unwrap().is_some());

    let payload = log.payload().unwrap();
    assert_eq!(payload.duplicate["name"], serde_json::json!("Jane D"));
    assert_eq!(payload.moved_ids("opportunities"), [deal.id]);
    assert_eq!(payload.moved_ids("emails"), [email.id]);
    assert_eq!(payload.dropped.len(), 1);
    assert_eq!(payload.dropped[0].table, "group_people");

    let logs = fx.store.query::<ContactMergeLog>(&scope).load().await.unwrap();
    assert_eq!(logs, vec![log]);
    assert_eq!(
        *events.lock().unwrap(),
        [(dupe.id, WriteAction::Deleted), (jane.id, WriteAction::Merged)]
    );
}

#[tokio::test]
async fn a_contact_cannot_merge_into_itself() {
    let fx = Fixture::new().await;
    let scope = fx.acme_scope();
    let jane = fx.store.insert::<People>(&scope, person("Jane Doe")).await.unwrap();
    let err = fx
        .store
        .merge_contacts(&scope, MergeRequest {
            primary_id: jane.id,
            duplicate_id: jane.id,
            merged_by: fx.user.id,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation { .. }));
}

#[tokio::test]
async fn merges_stay_inside_one_team() {
    let fx = Fixture::new().await;
    let jane = fx.store.insert::<People>(&fx.acme_scope(), person("Jane Doe")).await.unwrap();
    let hans = fx.store.insert::<People>(&fx.globex_scope(), person("Hans Gruber")).await.unwrap();
    let request = MergeRequest {
        primary_id: jane.id,
        duplicate_id: hans.id,
        merged_by: fx.user.id,
    };
    assert!(matches!(
        fx.store.merge_contacts(&fx.acme_scope(), request).await,
        Err(Error::NotFound { .. })
    ));
    assert!(matches!(
        fx.store.merge_contacts(&fx.admin, request).await,
        Err(Error::CrossTenantWrite { .. })
    ));
    assert!(fx.store.find::<People>(&fx.admin, hans.id).await.unwrap().is_some());
}

#[tokio::test]
async fn merged_by_must_be_a_user() {
    let fx = Fixture::new().await;
    let scope = fx.acme_scope();
    let jane = fx.store.insert::<People>(&scope, person("Jane Doe")).await.unwrap();
    let dupe = fx.store.insert::<People>(&scope, person("Jane D")).await.unwrap();
    let err = fx
        .store
        .merge_contacts(&scope, MergeRequest {
            primary_id: jane.id,
            duplicate_id: dupe.id,
            merged_by: 4040,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, Error::ReferentialIntegrity { entity: "contact_merge_logs", .. }));
    assert!(fx.store.find::<People>(&scope, dupe.id).await.unwrap().is_some());
}
