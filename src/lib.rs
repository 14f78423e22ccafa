//! authsession - client-side authentication session controller
//!
//! Tracks login state, exposes the current user to the rest of the
//! application and wraps the sign-in/sign-out side effects: token storage,
//! redirect navigation and the persisted remember-me flag.

pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod identity;
pub mod storage;

pub use auth::{SessionController, SessionPhase, SessionState, User};
pub use config::Config;
pub use error::Error;
