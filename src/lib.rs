//! foyer - a small user-account web application.
//!
//! Registration, login, session-bound profile viewing and editing, and
//! avatar uploads, served as plain HTML pages.

pub mod auth;
pub mod avatar;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod web;

pub use auth::{hash_password, verify_password, PasswordError, Session, SESSION_COOKIE};
pub use avatar::AvatarStore;
pub use config::Config;
pub use db::{Account, AccountRepository, AccountUpdate, Avatar, Database, NewAccount};
pub use error::{FoyerError, Result};
pub use web::{AppState, WebServer};
