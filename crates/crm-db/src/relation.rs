use crate::{
    backend::Backend,
    entity::{Entity, Morph, Tenancy},
    models::AnyRecord,
    morph::MorphRef,
    store::Store,
    tenant::Scope,
    value::{Columns, ColumnsMut, Value},
    Error,
};
use std::{collections::HashMap, marker::PhantomData};

fn foreign_id(row: &dyn Columns, column: &str) -> Option<i64> {
    row.column(column).and_then(|value| value.as_int())
}

/// Team-owned rows created through a relation belong to the owner's team.
fn inherit_team<C: Entity>(draft: &mut C::Draft, owner: &dyn Columns) -> Result<(), Error> {
    if C::TENANCY == Tenancy::Team {
        if let Some(team_id) = owner.column("team_id") {
            ColumnsMut::set_column(draft, "team_id", team_id)?;
        }
    }
    Ok(())
}

pub struct BelongsTo<C, P> {
    foreign_key: &'static str,
    marker: PhantomData<fn() -> (C, P)>,
}

impl<C, P> BelongsTo<C, P> {
    pub const fn new(foreign_key: &'static str) -> Self {
        Self {
            foreign_key,
            marker: PhantomData,
        }
    }

    pub fn foreign_key(&self) -> &'static str {
        self.foreign_key
    }
}

impl<C: Entity, P: Entity> BelongsTo<C, P> {
    pub async fn load<B: Backend>(
        &self,
        store: &Store<B>,
        scope: &Scope,
        child: &C,
    ) -> Result<Option<P>, Error> {
        match foreign_id(child, self.foreign_key) {
            Some(id) => store.find::<P>(scope, id).await,
            None => Ok(None),
        }
    }
}

pub struct HasMany<P, C> {
    foreign_key: &'static str,
    marker: PhantomData<fn() -> (P, C)>,
}

impl<P, C> HasMany<P, C> {
    pub const fn new(foreign_key: &'static str) -> Self {
        Self {
            foreign_key,
            marker: PhantomData,
        }
    }

    pub fn foreign_key(&self) -> &'static str {
        self.foreign_key
    }
}

impl<P: Entity, C: Entity> HasMany<P, C> {
    pub async fn load<B: Backend>(
        &self,
        store: &Store<B>,
        scope: &Scope,
        parent: &P,
    ) -> Result<Vec<C>, Error> {
        store
            .query::<C>(scope)
            .where_eq(self.foreign_key, parent.id())
            .load()
            .await
    }
}

pub struct HasOne<P, C> {
    foreign_key: &'static str,
    marker: PhantomData<fn() -> (P, C)>,
}

impl<P, C> HasOne<P, C> {
    pub const fn new(foreign_key: &'static str) -> Self {
        Self {
            foreign_key,
            marker: PhantomData,
        }
    }
}

impl<P: Entity, C: Entity> HasOne<P, C> {
    pub async fn load<B: Backend>(
        &self,
        store: &Store<B>,
        scope: &Scope,
        parent: &P,
    ) -> Result<Option<C>, Error> {
        store
            .query::<C>(scope)
            .where_eq(self.foreign_key, parent.id())
            .first()
            .await
    }
}

/// `L` and `R` joined through the `Pivot` table.
pub struct BelongsToMany<L, R, Pivot> {
    pivot_local: &'static str,
    pivot_related: &'static str,
    marker: PhantomData<fn() -> (L, R, Pivot)>,
}

impl<L, R, Pivot> BelongsToMany<L, R, Pivot> {
    pub const fn new(pivot_local: &'static str, pivot_related: &'static str) -> Self {
        Self {
            pivot_local,
            pivot_related,
            marker: PhantomData,
        }
    }
}

impl<L: Entity, R: Entity, Pivot: Entity> BelongsToMany<L, R, Pivot> {
    pub async fn load<B: Backend>(
        &self,
        store: &Store<B>,
        scope: &Scope,
        local: &L,
    ) -> Result<Vec<(R, Pivot)>, Error> {
        let pivots = store
            .query::<Pivot>(scope)
            .where_eq(self.pivot_local, local.id())
            .load()
            .await?;
        let ids: Vec<i64> = pivots
            .iter()
            .filter_map(|pivot| foreign_id(pivot, self.pivot_related))
            .collect();
        let mut related: HashMap<i64, R> = store
            .query::<R>(scope)
            .where_in("id", ids)
            .load()
            .await?
            .into_iter()
            .map(|row| (row.id(), row))
            .collect();
        Ok(pivots
            .into_iter()
            .filter_map(|pivot| {
                let row = related.remove(&foreign_id(&pivot, self.pivot_related)?)?;
                Some((row, pivot))
            })
            .collect())
    }

    /// Links `local` to `related_id`. `pivot` carries the pivot attributes;
    /// its key columns are overwritten.
    #[tracing::instrument(skip(self, store, scope, local, pivot), fields(pivot = Pivot::TABLE))]
    pub async fn attach<B: Backend>(
        &self,
        store: &Store<B>,
        scope: &Scope,
        local: &L,
        related_id: i64,
        mut pivot: Pivot::Draft,
    ) -> Result<Pivot, Error> {
        inherit_team::<Pivot>(&mut pivot, local)?;
        ColumnsMut::set_column(&mut pivot, self.pivot_local, Value::Int(local.id()))?;
        ColumnsMut::set_column(&mut pivot, self.pivot_related, Value::Int(related_id))?;
        store.insert::<Pivot>(scope, pivot).await
    }

    pub async fn detach<B: Backend>(
        &self,
        store: &Store<B>,
        scope: &Scope,
        local: &L,
        related_id: i64,
    ) -> Result<usize, Error> {
        let pivots = store
            .query::<Pivot>(scope)
            .where_eq(self.pivot_local, local.id())
            .where_eq(self.pivot_related, related_id)
            .load()
            .await?;
        for pivot in &pivots {
            store.delete::<Pivot>(scope, pivot.id()).await?;
        }
        Ok(pivots.len())
    }
}

/// `C` rows whose morph pair points at a `P`.
pub struct MorphMany<P, C> {
    morph: Morph,
    marker: PhantomData<fn() -> (P, C)>,
}

impl<P, C> MorphMany<P, C> {
    pub const fn new(type_column: &'static str, id_column: &'static str) -> Self {
        Self {
            morph: Morph {
                type_column,
                id_column,
            },
            marker: PhantomData,
        }
    }
}

impl<P: Entity, C: Entity> MorphMany<P, C> {
    /// Matches every stored spelling of `P`'s type, aliases included.
    pub async fn load<B: Backend>(
        &self,
        store: &Store<B>,
        scope: &Scope,
        parent: &P,
    ) -> Result<Vec<C>, Error> {
        store
            .query::<C>(scope)
            .where_in(self.morph.type_column, P::KIND.stored_names())
            .where_eq(self.morph.id_column, parent.id())
            .load()
            .await
    }

    pub async fn create<B: Backend>(
        &self,
        store: &Store<B>,
        scope: &Scope,
        parent: &P,
        mut child: C::Draft,
    ) -> Result<C, Error> {
        inherit_team::<C>(&mut child, parent)?;
        let kind = Value::from(P::KIND.discriminator());
        ColumnsMut::set_column(&mut child, self.morph.type_column, kind)?;
        ColumnsMut::set_column(&mut child, self.morph.id_column, Value::Int(parent.id()))?;
        store.insert::<C>(scope, child).await
    }
}

pub struct MorphTo<C> {
    morph: Morph,
    marker: PhantomData<fn() -> C>,
}

impl<C> MorphTo<C> {
    pub const fn new(type_column: &'static str, id_column: &'static str) -> Self {
        Self {
            morph: Morph {
                type_column,
                id_column,
            },
            marker: PhantomData,
        }
    }
}

impl<C: Entity> MorphTo<C> {
    pub fn target(&self, child: &C) -> Result<Option<MorphRef>, Error> {
        MorphRef::from_row(child, &self.morph)
    }

    pub async fn load<B: Backend>(
        &self,
        store: &Store<B>,
        scope: &Scope,
        child: &C,
    ) -> Result<Option<AnyRecord>, Error> {
        match self.target(child)? {
            Some(target) => store.resolve(scope, &target).await,
            None => Ok(None),
        }
    }
}

/// `R` rows linked to a `P` through a polymorphic `Pivot`.
pub struct MorphToMany<P, R, Pivot> {
    morph: Morph,
    related_column: &'static str,
    marker: PhantomData<fn() -> (P, R, Pivot)>,
}

impl<P, R, Pivot> MorphToMany<P, R, Pivot> {
    pub const fn new(
        type_column: &'static str,
        id_column: &'static str,
        related_column: &'static str,
    ) -> Self {
        Self {
            morph: Morph {
                type_column,
                id_column,
            },
            related_column,
            marker: PhantomData,
        }
    }
}

impl<P: Entity, R: Entity, Pivot: Entity> MorphToMany<P, R, Pivot> {
    async fn pivots<B: Backend>(
        &self,
        store: &Store<B>,
        scope: &Scope,
        parent: &P,
    ) -> Result<Vec<Pivot>, Error> {
        store
            .query::<Pivot>(scope)
            .where_in(self.morph.type_column, P::KIND.stored_names())
            .where_eq(self.morph.id_column, parent.id())
            .load()
            .await
    }

    pub async fn load<B: Backend>(
        &self,
        store: &Store<B>,
        scope: &Scope,
        parent: &P,
    ) -> Result<Vec<R>, Error> {
        let ids: Vec<i64> = self
            .pivots(store, scope, parent)
            .await?
            .iter()
            .filter_map(|pivot| foreign_id(pivot, self.related_column))
            .collect();
        store.query::<R>(scope).where_in("id", ids).load().await
    }

    #[tracing::instrument(skip(self, store, scope, parent, pivot), fields(pivot = Pivot::TABLE))]
    pub async fn attach<B: Backend>(
        &self,
        store: &Store<B>,
        scope: &Scope,
        parent: &P,
        related_id: i64,
        mut pivot: Pivot::Draft,
    ) -> Result<Pivot, Error> {
        inherit_team::<Pivot>(&mut pivot, parent)?;
        let kind = Value::from(P::KIND.discriminator());
        ColumnsMut::set_column(&mut pivot, self.morph.type_column, kind)?;
        ColumnsMut::set_column(&mut pivot, self.morph.id_column, Value::Int(parent.id()))?;
        ColumnsMut::set_column(&mut pivot, self.related_column, Value::Int(related_id))?;
        store.insert::<Pivot>(scope, pivot).await
    }

    pub async fn detach<B: Backend>(
        &self,
        store: &Store<B>,
        scope: &Scope,
        parent: &P,
        related_id: i64,
    ) -> Result<usize, Error> {
        let pivots: Vec<Pivot> = self
            .pivots(store, scope, parent)
            .await?
            .into_iter()
            .filter(|pivot| foreign_id(pivot, self.related_column) == Some(related_id))
            .collect();
        for pivot in &pivots {
            store.delete::<Pivot>(scope, pivot.id()).await?;
        }
        Ok(pivots.len())
    }
}
