pub mod app_state;
pub mod clients;
pub mod repositories;
pub mod security;
pub mod services;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use app_state::AppState;
pub use security::{AdminGate, AuthIdentity, Claims, SecurityConfig};
