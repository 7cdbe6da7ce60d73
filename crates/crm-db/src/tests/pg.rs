use super::person;
use crate::{
    models::{NewTask, NewTeam, NewUser, People, Task, Team, User},
    Config, Scope,
};

/// Connects to `DATABASE_URL` with the migrations applied, or skips.
async fn store() -> Option<crate::Store> {
    dotenvy::dotenv().ok();
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set, skipping");
        return None;
    };
    let config: Config = serde_json::from_value(serde_json::json!({
        "db-url": database_url,
        "max-open": 4,
        "max-idle": 2,
        "timeout-for-get": "5s",
    }))
    .expect("config should deserialize");
    Some(crate::create(&config).await.expect("should create store"))
}

#[tokio::test]
async fn round_trip_against_postgres() {
    let Some(store) = store().await else {
        return;
    };
    let admin = Scope::cross_tenant("pg round trip");
    let stamp = jiff::Timestamp::now().as_millisecond();
    let user = store
        .insert::<User>(&admin, NewUser {
            name: "Round Trip".into(),
            email: format!("round-trip-{stamp}@example.com"),
            current_team_id: None,
        })
        .await
        .expect("should insert user");
    let team = store
        .insert::<Team>(&admin, NewTeam {
            owner_id: user.id,
            name: format!("Round Trip {stamp}"),
            personal_team: true,
        })
        .await
        .expect("should insert team");

    let scope = Scope::tenant_user(team.id, user.id);
    let jane = store
        .insert::<People>(&scope, person("Jane Doe"))
        .await
        .expect("should insert person");
    assert_eq!(store.get::<People>(&scope, jane.id).await.unwrap(), jane);

    store.delete::<People>(&scope, jane.id).await.unwrap();
    assert_eq!(store.find::<People>(&scope, jane.id).await.unwrap(), None);
    store.restore::<People>(&scope, jane.id).await.unwrap();

    let uid = format!("people-{}", jane.id);
    let customer = store.customers(&scope).find(&uid).await.unwrap();
    assert_eq!(customer.map(|c| c.name), Some("Jane Doe".to_owned()));

    let task = store
        .insert::<Task>(&scope, NewTask {
            team_id: 0,
            title: "Follow up".into(),
            description: None,
            status: "open".into(),
            priority: None,
            due_at: None,
            completed_at: None,
            assignee_id: Some(user.id),
            creator_id: Some(user.id),
        })
        .await
        .expect("should insert task");
    assert_eq!(task.team_id, team.id);
    assert_eq!(store.get::<Task>(&scope, task.id).await.unwrap(), task);
    store.force_delete::<Task>(&scope, task.id).await.unwrap();

    store.force_delete::<People>(&scope, jane.id).await.unwrap();
    store.force_delete::<Team>(&admin, team.id).await.unwrap();
    store.force_delete::<User>(&admin, user.id).await.unwrap();
}
