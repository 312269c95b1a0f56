//! SeaORM implementation of UserRepository

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, Select,
};

use super::crud_repository::CrudRepository;
use crate::domain::{DomainError, UserRepository};
use crate::models::user::{
    ActiveModel, Column, CreateUser, Entity as UserEntity, UpdateUser, User,
};

type UserCrud = CrudRepository<ActiveModel, CreateUser, UpdateUser>;

/// SeaORM-based implementation of UserRepository
#[derive(Clone)]
pub struct SeaOrmUserRepository {
    crud: UserCrud,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            crud: CrudRepository::new(db),
        }
    }

    /// Base query with the search predicate applied, shared by listing and counting.
    fn filtered(search: Option<&str>) -> Select<UserEntity> {
        let query = UserEntity::find();

        match search.map(str::trim) {
            Some(term) if !term.is_empty() => {
                let pattern = format!("%{}%", term.to_lowercase());
                query.filter(
                    Condition::any()
                        .add(Expr::expr(Func::lower(Expr::col(Column::Name))).like(pattern.clone()))
                        .add(Expr::expr(Func::lower(Expr::col(Column::Email))).like(pattern)),
                )
            }
            _ => query,
        }
    }
}

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn create(&self, input: CreateUser) -> Result<User, DomainError> {
        self.crud.create(input).await
    }

    async fn get_by_id(&self, id: i32) -> Result<Option<User>, DomainError> {
        self.crud.get_by_id(id).await
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let user = UserEntity::find()
            .filter(Column::Email.eq(email))
            .one(self.crud.db())
            .await?;

        Ok(user)
    }

    async fn get_all(
        &self,
        skip: u64,
        limit: u64,
        search: Option<&str>,
    ) -> Result<Vec<User>, DomainError> {
        if search.is_none() {
            return self.crud.get_all(skip, limit).await;
        }

        let users = UserCrud::paginate(Self::filtered(search), skip, limit)
            .all(self.crud.db())
            .await?;

        Ok(users)
    }

    async fn count(&self, search: Option<&str>) -> Result<u64, DomainError> {
        // SELECT COUNT(*) at the store; rows are never materialised
        let total = Self::filtered(search).count(self.crud.db()).await?;
        Ok(total)
    }

    async fn update(&self, id: i32, patch: UpdateUser) -> Result<User, DomainError> {
        self.crud.update(id, patch).await
    }

    async fn delete(&self, id: i32) -> Result<bool, DomainError> {
        self.crud.delete(id).await
    }
}
