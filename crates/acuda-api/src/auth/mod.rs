pub mod jwt;
pub mod models;

pub use jwt::{JwtService, INVALID_TOKEN};
pub use models::{AuthenticatedUser, Claims};
