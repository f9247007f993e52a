//! Identity provider adapters.

mod jwt;

pub use jwt::{JwtIdentityProvider, TOKEN_VALIDITY_DAYS};
