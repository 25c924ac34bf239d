//! Authentication and authorization module

pub mod identity;
pub mod jwt;
pub mod middleware;
pub mod password;

pub use identity::{AdminIdentity, Identity, IdentityContext};
pub use jwt::{Claims, TokenCodec, BEARER_PREFIX};
pub use middleware::authorization_middleware;
pub use password::PasswordHasher;
