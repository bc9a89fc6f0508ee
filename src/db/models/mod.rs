//! Database models split into domain-specific modules.

pub mod login;
pub mod user;

pub use login::*;
pub use user::*;
