use crate::{
    backend::Backend,
    entity::{Entity, EntityKind},
    models::{Company, People},
    query::{Condition, Filter},
    store::Store,
    tenant::Scope,
    value::{Columns, IntoValue, Value},
    Error,
};
use std::{fmt, str::FromStr, sync::atomic::Ordering};

const VIEW: &str = "customers_view";

#[derive(Clone, Debug, PartialEq, Eq, diesel::QueryableByName)]
#[diesel(table_name = crate::schema::crm::customers_view)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Customer {
    pub uid: String,
    pub source_type: String,
    pub source_id: i64,
    pub team_id: i64,
    pub name: String,
    pub email: Option<String>,
}

impl Customer {
    pub(crate) fn from_company(company: &Company) -> Self {
        Self {
            uid: CustomerUid::Company(company.id).to_string(),
            source_type: EntityKind::Company.discriminator().to_owned(),
            source_id: company.id,
            team_id: company.team_id,
            name: company.name.clone(),
            email: company.email.clone(),
        }
    }

    pub(crate) fn from_people(person: &People) -> Self {
        Self {
            uid: CustomerUid::People(person.id).to_string(),
            source_type: EntityKind::People.discriminator().to_owned(),
            source_id: person.id,
            team_id: person.team_id,
            name: person.name.clone(),
            email: person.email.clone(),
        }
    }

    pub fn source(&self) -> Result<CustomerUid, Error> {
        self.uid.parse()
    }
}

impl Columns for Customer {
    fn column(&self, name: &str) -> Option<Value> {
        match name {
            "uid" => Some(self.uid.to_value()),
            "source_type" => Some(self.source_type.to_value()),
            "source_id" => Some(self.source_id.to_value()),
            "team_id" => Some(self.team_id.to_value()),
            "name" => Some(self.name.to_value()),
            "email" => Some(self.email.to_value()),
            _ => None,
        }
    }
}

/// A customer identifier, `company-<id>` or `people-<id>`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CustomerUid {
    Company(i64),
    People(i64),
}

impl CustomerUid {
    pub fn kind(self) -> EntityKind {
        match self {
            CustomerUid::Company(_) => EntityKind::Company,
            CustomerUid::People(_) => EntityKind::People,
        }
    }

    pub fn id(self) -> i64 {
        match self {
            CustomerUid::Company(id) | CustomerUid::People(id) => id,
        }
    }

    pub fn for_source(kind: EntityKind, id: i64) -> Result<Self, Error> {
        match kind {
            EntityKind::Company => Ok(CustomerUid::Company(id)),
            EntityKind::People => Ok(CustomerUid::People(id)),
            other => Err(Error::InvalidCustomerUid(format!("{}-{id}", other.discriminator()))),
        }
    }
}

impl fmt::Display for CustomerUid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.kind().discriminator(), self.id())
    }
}

impl FromStr for CustomerUid {
    type Err = Error;

    fn from_str(uid: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidCustomerUid(uid.to_owned());
        let (prefix, id) = uid.split_once('-').ok_or_else(invalid)?;
        let id: i64 = id.parse().map_err(|_| invalid())?;
        match prefix {
            "company" => Ok(CustomerUid::Company(id)),
            "people" => Ok(CustomerUid::People(id)),
            _ => Err(invalid()),
        }
    }
}

pub struct Customers<'s, B: Backend> {
    store: &'s Store<B>,
    scope: &'s Scope,
}

impl<'s, B: Backend> Customers<'s, B> {
    pub(crate) fn new(store: &'s Store<B>, scope: &'s Scope) -> Self {
        Self { store, scope }
    }

    async fn load(&self, mut filter: Filter) -> Result<Vec<Customer>, Error> {
        if self.store.customers_stale().swap(false, Ordering::AcqRel) {
            if let Err(err) = self.store.backend().refresh_customers().await {
                self.store.customers_stale().store(true, Ordering::Release);
                return Err(err);
            }
        }
        if let Some(team_id) = self.scope.team_id() {
            filter.push(Condition::Eq("team_id".into(), Value::Int(team_id)));
        }
        self.store.backend().customers(&filter).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Customer>, Error> {
        self.load(Filter::new()).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn find(&self, uid: &str) -> Result<Option<Customer>, Error> {
        let uid: CustomerUid = uid.parse()?;
        self.find_uid(uid).await
    }

    pub async fn find_uid(&self, uid: CustomerUid) -> Result<Option<Customer>, Error> {
        let filter = Filter::new().and(Condition::Eq("uid".into(), Value::Text(uid.to_string())));
        Ok(self.load(filter).await?.into_iter().next())
    }

    pub async fn for_source(&self, kind: EntityKind, id: i64) -> Result<Option<Customer>, Error> {
        self.find_uid(CustomerUid::for_source(kind, id)?).await
    }

    /// Rebuilds the projection now instead of on the next read.
    #[tracing::instrument(skip(self))]
    pub async fn refresh(&self) -> Result<(), Error> {
        self.store.backend().refresh_customers().await?;
        self.store.customers_stale().store(false, Ordering::Release);
        Ok(())
    }

    pub async fn insert(&self, _customer: Customer) -> Result<Customer, Error> {
        read_only("insert")
    }

    pub async fn update(&self, _customer: Customer) -> Result<Customer, Error> {
        read_only("update")
    }

    pub async fn delete(&self, _uid: &str) -> Result<(), Error> {
        read_only("delete")
    }
}

fn read_only<T>(operation: &str) -> Result<T, Error> {
    tracing::warn!(operation, view = VIEW, "write against read-only projection rejected");
    Err(Error::ReadOnly(VIEW))
}

impl<B: Backend> Store<B> {
    pub fn customers<'s>(&'s self, scope: &'s Scope) -> Customers<'s, B> {
        Customers::new(self, scope)
    }
}

/// The kinds whose writes invalidate the projection.
pub(crate) const SOURCES: [EntityKind; 2] = [Company::KIND, People::KIND];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uids_carry_their_source() {
        assert_eq!("company-12".parse::<CustomerUid>().unwrap(), CustomerUid::Company(12));
        assert_eq!(CustomerUid::People(4).to_string(), "people-4");
        assert_eq!(
            CustomerUid::for_source(EntityKind::People, 4).unwrap().kind(),
            EntityKind::People
        );
    }

    #[test]
    fn malformed_uids_are_rejected() {
        for uid in ["company", "company-x", "deal-3", "-3", ""] {
            assert!(
                matches!(uid.parse::<CustomerUid>(), Err(Error::InvalidCustomerUid(_))),
                "{uid}"
            );
        }
        assert!(CustomerUid::for_source(EntityKind::Tag, 1).is_err());
    }
}
