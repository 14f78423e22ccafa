//! Authentication session state and its collaborators

pub mod models;
pub mod navigation;
pub mod session;

pub use models::{ProfilePayload, SessionPhase, SessionState, User, UserinfoResponse};
pub use navigation::{LoginPrompt, MemoryNavigator, Navigator};
pub use session::{SessionController, SessionControllerBuilder};
