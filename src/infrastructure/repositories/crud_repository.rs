//! Generic CRUD over a single SeaORM entity
//!
//! `CrudRepository<A, C, U>` is written once and specialised per entity by
//! wrapping it (see `SeaOrmUserRepository`). `A` is the entity's active model,
//! `C` the create shape turned into a full active model, and `U` the update
//! shape applied as a sparse patch onto the stored row.

use std::marker::PhantomData;

use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    Iterable, PrimaryKeyToColumn, PrimaryKeyTrait, QueryOrder, QuerySelect, Select,
    TransactionTrait,
};

use crate::domain::DomainError;

type EntityOf<A> = <A as ActiveModelTrait>::Entity;
type ModelOf<A> = <EntityOf<A> as EntityTrait>::Model;
type PrimaryKeyOf<A> = <EntityOf<A> as EntityTrait>::PrimaryKey;

/// Update shape that knows how to apply itself to an active model.
///
/// Implementations must only `Set` the fields that were actually provided.
pub trait Patch<A: ActiveModelTrait> {
    fn apply(self, active: &mut A);
}

pub struct CrudRepository<A, C, U> {
    db: DatabaseConnection,
    _shapes: PhantomData<fn(C, U) -> A>,
}

impl<A, C, U> Clone for CrudRepository<A, C, U> {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
            _shapes: PhantomData,
        }
    }
}

impl<A, C, U> CrudRepository<A, C, U>
where
    A: ActiveModelTrait + ActiveModelBehavior + Send,
    ModelOf<A>: IntoActiveModel<A>,
    <PrimaryKeyOf<A> as PrimaryKeyTrait>::ValueType: From<i32>,
    C: IntoActiveModel<A>,
    U: Patch<A>,
{
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            _shapes: PhantomData,
        }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Insert a row built from every field of `input`.
    pub async fn create(&self, input: C) -> Result<ModelOf<A>, DomainError> {
        let model = input.into_active_model().insert(&self.db).await?;
        Ok(model)
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Option<ModelOf<A>>, DomainError> {
        Ok(EntityOf::<A>::find_by_id(id).one(&self.db).await?)
    }

    pub async fn get_all(&self, skip: u64, limit: u64) -> Result<Vec<ModelOf<A>>, DomainError> {
        Ok(Self::paginate(EntityOf::<A>::find(), skip, limit)
            .all(&self.db)
            .await?)
    }

    /// Order by primary key and window the query.
    ///
    /// Specialisations that add filters go through here so every listing
    /// pages over the same order.
    pub fn paginate(select: Select<EntityOf<A>>, skip: u64, limit: u64) -> Select<EntityOf<A>> {
        <PrimaryKeyOf<A> as Iterable>::iter()
            .fold(select, |query, key| query.order_by_asc(key.into_column()))
            .offset(skip)
            .limit(limit)
    }

    /// Apply `patch` to the row with `id` and return the stored result.
    ///
    /// Load, patch and save run in one transaction.
    pub async fn update(&self, id: i32, patch: U) -> Result<ModelOf<A>, DomainError> {
        let txn = self.db.begin().await?;

        let existing = EntityOf::<A>::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("no row with id {}", id)))?;

        let mut active: A = existing.into_active_model();
        patch.apply(&mut active);

        let model = active.update(&txn).await?;
        txn.commit().await?;

        Ok(model)
    }

    /// Returns whether a row was removed.
    pub async fn delete(&self, id: i32) -> Result<bool, DomainError> {
        let result = EntityOf::<A>::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }
}
