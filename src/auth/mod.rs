pub mod auth;
pub mod jwt;
pub mod middleware;

pub use auth::AuthUser;
pub use jwt::{Claims, TokenType, verify_token};
