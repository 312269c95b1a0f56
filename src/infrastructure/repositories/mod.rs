//! Repository implementations using SeaORM

pub mod crud_repository;
pub mod user_repository;

pub use crud_repository::{CrudRepository, Patch};
pub use user_repository::SeaOrmUserRepository;
