use super::{company, opportunity, person, Fixture};
use crate::{
    models::{
        Company, CompanyPeople, FeatureFlagSegment, Group, GroupPeople, NewCompanyPeople,
        NewFeatureFlagSegment, NewGroup, NewGroupPeople, NewTag, NewTaggable, Opportunity, People,
        Tag, Taggable,
    },
    Error, Scope,
};
use serde_json::json;

#[tokio::test]
async fn reads_only_see_the_scope_team() {
    let fx = Fixture::new().await;
    let jane = fx.store.insert::<People>(&fx.acme_scope(), person("Jane Doe")).await.unwrap();
    let hans = fx.store.insert::<People>(&fx.globex_scope(), person("Hans Gruber")).await.unwrap();
    assert_eq!(jane.team_id, fx.acme.id);
    assert_eq!(hans.team_id, fx.globex.id);

    let acme = fx.acme_scope();
    let visible = fx.store.query::<People>(&acme).load().await.unwrap();
    assert_eq!(visible, vec![jane.clone()]);
    assert_eq!(fx.store.find::<People>(&acme, hans.id).await.unwrap(), None);
    assert!(matches!(
        fx.store.get::<People>(&acme, hans.id).await,
        Err(Error::NotFound { entity: "people", .. })
    ));

    let everyone = fx.store.query::<People>(&fx.admin).count().await.unwrap();
    assert_eq!(everyone, 2);
}

#[tokio::test]
async fn inserts_are_stamped_with_the_scope_team() {
    let fx = Fixture::new().await;
    let mut draft = person("Jane Doe");
    draft.team_id = fx.globex.id;
    let jane = fx.store.insert::<People>(&fx.acme_scope(), draft).await.unwrap();
    assert_eq!(jane.team_id, fx.acme.id);
}

#[tokio::test]
async fn rows_cannot_move_between_teams() {
    let fx = Fixture::new().await;
    let acme = fx.acme_scope();
    let mut jane = fx.store.insert::<People>(&acme, person("Jane Doe")).await.unwrap();
    jane.team_id = fx.globex.id;
    assert!(matches!(
        fx.store.update(&fx.admin, jane.clone()).await,
        Err(Error::CrossTenantWrite { entity: "people" })
    ));
    assert!(matches!(
        fx.store.update(&acme, jane).await,
        Err(Error::CrossTenantWrite { entity: "people" })
    ));
}

#[tokio::test]
async fn rows_of_another_team_cannot_be_updated_or_deleted() {
    let fx = Fixture::new().await;
    let hans = fx.store.insert::<People>(&fx.globex_scope(), person("Hans Gruber")).await.unwrap();
    let acme = fx.acme_scope();
    assert!(matches!(
        fx.store.update(&acme, hans.clone()).await,
        Err(Error::NotFound { .. })
    ));
    assert!(matches!(
        fx.store.delete::<People>(&acme, hans.id).await,
        Err(Error::NotFound { .. })
    ));
    assert!(fx.store.find::<People>(&fx.globex_scope(), hans.id).await.unwrap().is_some());
}

#[tokio::test]
async fn references_must_stay_inside_the_team() {
    let fx = Fixture::new().await;
    let hans = fx.store.insert::<People>(&fx.globex_scope(), person("Hans Gruber")).await.unwrap();
    let err = fx
        .store
        .insert::<Opportunity>(&fx.acme_scope(), opportunity("Nakatomi tower", Some(hans.id)))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        Error::ReferentialIntegrity { entity: "opportunities", ref column, .. }
            if column == "contact_id"
    ));
}

#[tokio::test]
async fn unknown_teams_are_rejected() {
    let fx = Fixture::new().await;
    let mut draft = person("Nobody");
    draft.team_id = 999;
    assert!(matches!(
        fx.store.insert::<People>(&fx.admin, draft).await,
        Err(Error::ReferentialIntegrity { ref column, .. }) if column == "team_id"
    ));
}

#[tokio::test]
async fn feature_segments_apply_to_listed_teams() {
    let fx = Fixture::new().await;
    let segment = fx
        .store
        .insert::<FeatureFlagSegment>(&fx.admin, NewFeatureFlagSegment {
            feature: "forecasting".into(),
            scope: "team".into(),
            values: json!([fx.acme.id]),
            active: true,
        })
        .await
        .unwrap();
    assert!(segment.applies_to(fx.acme.id));

    let for_acme = fx.store.query::<FeatureFlagSegment>(&fx.acme_scope()).load().await.unwrap();
    assert_eq!(for_acme.len(), 1);
    let for_globex = fx.store.query::<FeatureFlagSegment>(&fx.globex_scope()).load().await.unwrap();
    assert!(for_globex.is_empty());

    let err = fx
        .store
        .insert::<FeatureFlagSegment>(&fx.globex_scope(), NewFeatureFlagSegment {
            feature: "territories".into(),
            scope: "team".into(),
            values: json!([fx.acme.id]),
            active: true,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, Error::CrossTenantWrite { entity: "feature_segments" }));
}

#[tokio::test]
async fn feature_segments_of_other_teams_cannot_be_changed() {
    let fx = Fixture::new().await;
    let segment = fx
        .store
        .insert::<FeatureFlagSegment>(&fx.acme_scope(), NewFeatureFlagSegment {
            feature: "forecasting".into(),
            scope: "team".into(),
            values: json!([fx.acme.id]),
            active: true,
        })
        .await
        .unwrap();

    let mut disabled = segment.clone();
    disabled.active = false;
    assert!(matches!(
        fx.store.update(&fx.globex_scope(), disabled).await,
        Err(Error::NotFound { entity: "feature_segments", .. })
    ));
    assert!(matches!(
        fx.store.delete::<FeatureFlagSegment>(&fx.globex_scope(), segment.id).await,
        Err(Error::NotFound { entity: "feature_segments", .. })
    ));

    let mut handed_over = segment.clone();
    handed_over.values = json!([fx.globex.id]);
    assert!(matches!(
        fx.store.update(&fx.acme_scope(), handed_over).await,
        Err(Error::CrossTenantWrite { entity: "feature_segments" })
    ));
    let stored = fx.store.get::<FeatureFlagSegment>(&fx.acme_scope(), segment.id).await.unwrap();
    assert_eq!(stored, segment);
}

#[tokio::test]
async fn pivot_rows_stay_inside_their_team() {
    let fx = Fixture::new().await;
    let acme = fx.acme_scope();
    let globex = fx.globex_scope();
    let acme_corp = fx.store.insert::<Company>(&acme, company("Acme Corp")).await.unwrap();
    let jane = fx.store.insert::<People>(&acme, person("Jane Doe")).await.unwrap();
    let link = Company::PEOPLE
        .attach(&fx.store, &acme, &acme_corp, jane.id, NewCompanyPeople::with_role("owner"))
        .await
        .unwrap();
    assert_eq!(link.team_id, fx.acme.id);

    assert_eq!(fx.store.query::<CompanyPeople>(&globex).count().await.unwrap(), 0);
    assert_eq!(fx.store.find::<CompanyPeople>(&globex, link.id).await.unwrap(), None);
    let mut hijacked = link.clone();
    hijacked.role = Some("hijacked".into());
    assert!(matches!(
        fx.store.update(&globex, hijacked).await,
        Err(Error::NotFound { entity: "company_people", .. })
    ));
    assert!(matches!(
        fx.store.delete::<CompanyPeople>(&globex, link.id).await,
        Err(Error::NotFound { entity: "company_people", .. })
    ));

    let companies = People::COMPANIES.load(&fx.store, &acme, &jane).await.unwrap();
    assert_eq!(companies.len(), 1);
    assert_eq!(companies[0].1.role.as_deref(), Some("owner"));
}

#[tokio::test]
async fn pivots_cannot_link_rows_of_another_team() {
    let fx = Fixture::new().await;
    let acme = fx.acme_scope();
    let acme_corp = fx.store.insert::<Company>(&acme, company("Acme Corp")).await.unwrap();
    let hans = fx.store.insert::<People>(&fx.globex_scope(), person("Hans Gruber")).await.unwrap();
    let err = Company::PEOPLE
        .attach(&fx.store, &acme, &acme_corp, hans.id, NewCompanyPeople::with_role("spy"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        Error::ReferentialIntegrity { entity: "company_people", ref column, .. }
            if column == "people_id"
    ));
}

#[tokio::test]
async fn tag_links_are_confined_to_the_team() {
    let fx = Fixture::new().await;
    let acme = fx.acme_scope();
    let jane = fx.store.insert::<People>(&acme, person("Jane Doe")).await.unwrap();
    let vip = fx
        .store
        .insert::<Tag>(&acme, NewTag {
            team_id: 0,
            name: "VIP".into(),
            slug: "vip".into(),
            color: None,
        })
        .await
        .unwrap();
    let link = fx
        .store
        .insert::<Taggable>(&acme, NewTaggable {
            team_id: 0,
            tag_id: vip.id,
            taggable_type: "people".into(),
            taggable_id: jane.id,
        })
        .await
        .unwrap();

    let globex = fx.globex_scope();
    assert!(fx.store.query::<Taggable>(&globex).load().await.unwrap().is_empty());
    assert!(matches!(
        fx.store.delete::<Taggable>(&globex, link.id).await,
        Err(Error::NotFound { entity: "taggables", .. })
    ));
    assert_eq!(People::TAGS.load(&fx.store, &acme, &jane).await.unwrap(), vec![vip]);
}

#[tokio::test]
async fn cross_tenant_attach_uses_the_owner_team() {
    let fx = Fixture::new().await;
    let acme = fx.acme_scope();
    let jane = fx.store.insert::<People>(&acme, person("Jane Doe")).await.unwrap();
    let board = fx
        .store
        .insert::<Group>(&acme, NewGroup {
            team_id: 0,
            name: "Board".into(),
            description: None,
        })
        .await
        .unwrap();
    let member = Group::PEOPLE
        .attach(&fx.store, &fx.admin, &board, jane.id, NewGroupPeople::default())
        .await
        .unwrap();
    assert_eq!(member.team_id, fx.acme.id);
    assert_eq!(fx.store.query::<GroupPeople>(&acme).count().await.unwrap(), 1);
    assert_eq!(fx.store.query::<GroupPeople>(&fx.globex_scope()).count().await.unwrap(), 0);
}

#[tokio::test]
async fn cross_tenant_scope_is_explicit() {
    let scope = Scope::cross_tenant("nightly export");
    assert_eq!(scope.team_id(), None);
    assert_eq!(Scope::tenant(3).team_id(), Some(3));
    assert_eq!(Scope::tenant_user(3, 8).user_id(), Some(8));
}
