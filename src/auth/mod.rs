//! Authentication for foyer: password hashing and the cookie session.

mod password;
mod session;

pub use password::{hash_password, verify_password, PasswordError};
pub use session::{Session, SESSION_COOKIE};
