pub mod factory;
pub mod gate;
pub mod paths;
pub mod token;

pub use factory::build_auth_gate;
pub use gate::{AuthGate, Decision, DenyReason};
pub use paths::ProtectedPaths;
pub use token::{Claims, TokenPolicy, TokenVerifier};
