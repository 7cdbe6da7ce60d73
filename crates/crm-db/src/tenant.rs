use crate::{
    entity::{Descriptor, Tenancy},
    query::{Condition, Filter},
    value::{Columns, Value},
    Error,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TenantContext {
    pub team_id: i64,
    pub user_id: Option<i64>,
}

/// Who a store call runs as.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Scope {
    Tenant(TenantContext),
    CrossTenant { reason: String },
}

impl Scope {
    pub fn tenant(team_id: i64) -> Self {
        Scope::Tenant(TenantContext {
            team_id,
            user_id: None,
        })
    }

    pub fn tenant_user(team_id: i64, user_id: i64) -> Self {
        Scope::Tenant(TenantContext {
            team_id,
            user_id: Some(user_id),
        })
    }

    pub fn cross_tenant(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        tracing::warn!(%reason, "cross-tenant scope acquired");
        Scope::CrossTenant { reason }
    }

    pub fn team_id(&self) -> Option<i64> {
        match self {
            Scope::Tenant(context) => Some(context.team_id),
            Scope::CrossTenant { .. } => None,
        }
    }

    pub fn user_id(&self) -> Option<i64> {
        match self {
            Scope::Tenant(context) => context.user_id,
            Scope::CrossTenant { .. } => None,
        }
    }

    /// Appends the tenant restriction for `descriptor` to `filter`.
    pub(crate) fn restrict(&self, descriptor: &Descriptor, filter: &mut Filter) {
        let Some(team_id) = self.team_id() else {
            return;
        };
        match descriptor.tenancy {
            Tenancy::None => {}
            Tenancy::Team => filter.push(Condition::Eq("team_id".into(), Value::Int(team_id))),
            Tenancy::JsonMembership(column) => filter.push(Condition::JsonContains(
                column.into(),
                serde_json::json!([team_id]),
            )),
        }
    }

    /// Checks that a row about to be written stays visible to this scope.
    pub(crate) fn check_write(
        &self,
        descriptor: &Descriptor,
        row: &dyn Columns,
    ) -> Result<(), Error> {
        let Some(team_id) = self.team_id() else {
            return Ok(());
        };
        let visible = match descriptor.tenancy {
            Tenancy::None => true,
            Tenancy::Team => row.column("team_id") == Some(Value::Int(team_id)),
            Tenancy::JsonMembership(column) => {
                Condition::JsonContains(column.into(), serde_json::json!([team_id])).matches(row)
            }
        };
        if visible {
            Ok(())
        } else {
            tracing::warn!(entity = descriptor.table, team_id, "write outside tenant rejected");
            Err(Error::CrossTenantWrite {
                entity: descriptor.table,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EntityKind;

    #[test]
    fn tenant_scope_filters_team_entities_by_team_id() {
        let mut filter = Filter::default();
        Scope::tenant(7).restrict(&EntityKind::People.descriptor(), &mut filter);
        assert_eq!(
            filter.conditions(),
            &[Condition::Eq("team_id".into(), Value::Int(7))]
        );
    }

    #[test]
    fn feature_segments_are_filtered_by_membership() {
        let mut filter = Filter::default();
        Scope::tenant(7).restrict(&EntityKind::FeatureFlagSegment.descriptor(), &mut filter);
        assert_eq!(
            filter.conditions(),
            &[Condition::JsonContains(
                "values".into(),
                serde_json::json!([7])
            )]
        );
    }

    #[test]
    fn cross_tenant_and_untenanted_reads_are_unfiltered() {
        let mut filter = Filter::default();
        Scope::cross_tenant("test").restrict(&EntityKind::People.descriptor(), &mut filter);
        Scope::tenant(7).restrict(&EntityKind::User.descriptor(), &mut filter);
        assert!(filter.conditions().is_empty());
    }
}
