pub mod pagination;
pub mod response;
pub mod user;

pub use pagination::{Page, PageParams};
pub use response::{ErrorResponse, SuccessResponse};
pub use user::{CreateUser, UpdateUser, User, UserResponse};
