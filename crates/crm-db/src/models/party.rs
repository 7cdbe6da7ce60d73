use crate::{
    entity::entity,
    relation::{BelongsTo, BelongsToMany, HasMany, MorphMany, MorphToMany},
    rules,
};

use super::{
    Address, ContactPersona, ContactRole, ContactRolePeople, Email, Group, GroupPeople,
    NotableEntry, Tag, Taggable, TerritoryRecord,
};

entity! {
    /// A tenant. Every tenant-scoped row carries the id of one of these.
    pub struct Team / NewTeam in teams as Team {
        tenancy: [none],
        soft_deletes: no,
        mutability: Mutable,
        unique: [],
        references: [owner_id => User],
        morphs: [],
    }
    {
        pub owner_id: i64,
        pub name: String,
        pub personal_team: bool,
    }
}

entity! {
    pub struct User / NewUser in users as User {
        tenancy: [none],
        soft_deletes: no,
        mutability: Mutable,
        unique: [[email]],
        references: [current_team_id => Team],
        morphs: [],
        validate: rules::user,
    }
    {
        pub name: String,
        pub email: String,
        pub current_team_id: Option<i64>,
    }
}

entity! {
    pub struct TeamUser / NewTeamUser in team_user as TeamUser {
        tenancy: [team],
        soft_deletes: no,
        mutability: Mutable,
        unique: [[team_id, user_id]],
        references: [team_id => Team, user_id => User],
        morphs: [],
    }
    {
        pub team_id: i64,
        pub user_id: i64,
        pub role: Option<String>,
    }
}

entity! {
    /// An individual. Also reachable as [`Contact`] and [`Person`].
    pub struct People / NewPeople in people as People {
        tenancy: [team],
        soft_deletes: yes,
        mutability: Mutable,
        unique: [],
        references: [contact_persona_id => ContactPersona, creator_id => User],
        morphs: [],
    }
    {
        pub team_id: i64,
        pub name: String,
        pub email: Option<String>,
        pub job_title: Option<String>,
        pub phone: Option<String>,
        pub contact_persona_id: Option<i64>,
        pub creator_id: Option<i64>,
    }
}

pub type Contact = People;
pub type NewContact = NewPeople;
pub type Person = People;
pub type NewPerson = NewPeople;

impl People {
    pub const COMPANIES: BelongsToMany<People, Company, CompanyPeople> =
        BelongsToMany::new("people_id", "company_id");
    pub const PERSONA: BelongsTo<People, ContactPersona> = BelongsTo::new("contact_persona_id");
    pub const ROLES: BelongsToMany<People, ContactRole, ContactRolePeople> =
        BelongsToMany::new("people_id", "contact_role_id");
    pub const GROUPS: BelongsToMany<People, Group, GroupPeople> =
        BelongsToMany::new("people_id", "group_id");
    pub const EMAILS: MorphMany<People, Email> = MorphMany::new("emailable_type", "emailable_id");
    pub const ADDRESSES: MorphMany<People, Address> =
        MorphMany::new("addressable_type", "addressable_id");
    pub const NOTES: MorphMany<People, NotableEntry> =
        MorphMany::new("notable_type", "notable_id");
    pub const TERRITORY_RECORDS: MorphMany<People, TerritoryRecord> =
        MorphMany::new("record_type", "record_id");
    pub const TAGS: MorphToMany<People, Tag, Taggable> =
        MorphToMany::new("taggable_type", "taggable_id", "tag_id");
    pub const PORTAL_USERS: HasMany<People, PortalUser> = HasMany::new("people_id");
}

entity! {
    /// An organisation. Also reachable as [`Organisation`].
    pub struct Company / NewCompany in companies as Company {
        tenancy: [team],
        soft_deletes: yes,
        mutability: Mutable,
        unique: [],
        references: [account_owner_id => User, creator_id => User],
        morphs: [],
    }
    {
        pub team_id: i64,
        pub name: String,
        pub email: Option<String>,
        pub domain: Option<String>,
        pub industry: Option<String>,
        pub employee_count: Option<i32>,
        pub account_owner_id: Option<i64>,
        pub creator_id: Option<i64>,
    }
}

pub type Organisation = Company;
pub type NewOrganisation = NewCompany;

impl Company {
    pub const PEOPLE: BelongsToMany<Company, People, CompanyPeople> =
        BelongsToMany::new("company_id", "people_id");
    pub const ACCOUNT_OWNER: BelongsTo<Company, User> = BelongsTo::new("account_owner_id");
    pub const ADDRESSES: MorphMany<Company, Address> =
        MorphMany::new("addressable_type", "addressable_id");
    pub const EMAILS: MorphMany<Company, Email> = MorphMany::new("emailable_type", "emailable_id");
    pub const NOTES: MorphMany<Company, NotableEntry> =
        MorphMany::new("notable_type", "notable_id");
    pub const TAGS: MorphToMany<Company, Tag, Taggable> =
        MorphToMany::new("taggable_type", "taggable_id", "tag_id");
}

entity! {
    /// Pivot between [`Company`] and [`People`].
    pub struct CompanyPeople / NewCompanyPeople in company_people as CompanyPeople {
        tenancy: [team],
        soft_deletes: no,
        mutability: Mutable,
        unique: [[company_id, people_id]],
        references: [company_id => Company, people_id => People],
        morphs: [],
    }
    {
        pub team_id: i64,
        pub company_id: i64,
        pub people_id: i64,
        pub is_primary: bool,
        pub role: Option<String>,
    }
}

impl NewCompanyPeople {
    /// A pivot draft carrying only the pivot attributes; the ids are filled in
    /// by [`BelongsToMany::attach`].
    pub fn with_role(role: impl Into<String>) -> Self {
        Self {
            team_id: 0,
            company_id: 0,
            people_id: 0,
            is_primary: false,
            role: Some(role.into()),
        }
    }
}

entity! {
    pub struct PortalUser / NewPortalUser in portal_users as PortalUser {
        tenancy: [team],
        soft_deletes: no,
        mutability: Mutable,
        unique: [[email]],
        references: [people_id => People],
        morphs: [],
        validate: rules::portal_user,
    }
    {
        pub team_id: i64,
        pub people_id: i64,
        pub email: String,
        pub is_active: bool,
        pub last_login_at: Option<jiff_diesel::Timestamp>,
    }
}

impl PortalUser {
    pub const PEOPLE: BelongsTo<PortalUser, People> = BelongsTo::new("people_id");
}

impl Team {
    pub const OWNER: BelongsTo<Team, User> = BelongsTo::new("owner_id");
    pub const MEMBERS: BelongsToMany<Team, User, TeamUser> =
        BelongsToMany::new("team_id", "user_id");
}
