use crate::{
    models::{NewCompany, NewOpportunity, NewPeople, NewTeam, NewUser, Team, User},
    reference, MemoryBackend, Scope, Store,
};

mod lifecycle;
mod merge;
mod pg;
mod tenancy;

pub(crate) struct Fixture {
    pub store: Store<MemoryBackend>,
    pub admin: Scope,
    pub user: User,
    pub acme: Team,
    pub globex: Team,
}

impl Fixture {
    pub async fn new() -> Self {
        let store = Store::new(
            MemoryBackend::new(),
            reference::Cache::builtin().expect("builtin reference data should parse"),
        );
        let admin = Scope::cross_tenant("test setup");
        let user = store
            .insert::<User>(&admin, NewUser {
                name: "Ada Admin".into(),
                email: "ada@example.com".into(),
                current_team_id: None,
            })
            .await
            .expect("should insert user");
        let acme = store
            .insert::<Team>(&admin, team(user.id, "Acme"))
            .await
            .expect("should insert team");
        let globex = store
            .insert::<Team>(&admin, team(user.id, "Globex"))
            .await
            .expect("should insert team");
        Self {
            store,
            admin,
            user,
            acme,
            globex,
        }
    }

    pub fn acme_scope(&self) -> Scope {
        Scope::tenant_user(self.acme.id, self.user.id)
    }

    pub fn globex_scope(&self) -> Scope {
        Scope::tenant_user(self.globex.id, self.user.id)
    }
}

fn team(owner_id: i64, name: &str) -> NewTeam {
    NewTeam {
        owner_id,
        name: name.into(),
        personal_team: false,
    }
}

/// A person draft; `team_id` is stamped from the scope on insert.
pub(crate) fn person(name: &str) -> NewPeople {
    NewPeople {
        team_id: 0,
        name: name.into(),
        email: Some(format!("{}@example.com", name.to_lowercase().replace(' ', "."))),
        job_title: None,
        phone: None,
        contact_persona_id: None,
        creator_id: None,
    }
}

pub(crate) fn company(name: &str) -> NewCompany {
    NewCompany {
        team_id: 0,
        name: name.into(),
        email: None,
        domain: None,
        industry: None,
        employee_count: None,
        account_owner_id: None,
        creator_id: None,
    }
}

pub(crate) fn opportunity(name: &str, contact_id: Option<i64>) -> NewOpportunity {
    NewOpportunity {
        team_id: 0,
        name: name.into(),
        company_id: None,
        contact_id,
        owner_id: None,
        stage: "qualification".into(),
        amount: Some(bigdecimal::BigDecimal::from(1200)),
        currency: "USD".into(),
        probability: Some(40),
        expected_close_on: None,
    }
}
