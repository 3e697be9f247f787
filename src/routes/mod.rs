mod auth;
mod health_check;

pub use auth::{get_profile, login, refresh, register};
pub use health_check::health_check;
