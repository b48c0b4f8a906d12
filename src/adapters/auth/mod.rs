//! Implementations of the `SessionValidator` port.
//!
//! - `JwtSessionValidator` - HS256 tokens signed by the staff portal
//! - `MockSessionValidator` - fixed token table for tests

mod jwt;
mod mock;

pub use jwt::JwtSessionValidator;
pub use mock::MockSessionValidator;
