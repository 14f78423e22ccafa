//! Session models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Authenticated profile as seen by the rest of the application.
///
/// `id == 0` marks the anonymous placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: u64,
    pub avatar_url_id: u64,
    pub avatar_url: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intro: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fans_num: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub follower_num: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub like_num: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_img_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_img: Option<String>,
}

impl User {
    /// The placeholder used while nobody is signed in
    pub fn anonymous() -> Self {
        Self {
            id: 0,
            avatar_url_id: 0,
            avatar_url: String::new(),
            name: String::new(),
            note: None,
            intro: None,
            fans_num: None,
            follower_num: None,
            like_num: None,
            background_img_id: None,
            background_img: None,
        }
    }

    pub fn is_anonymous(&self) -> bool {
        self.id == 0
    }
}

impl Default for User {
    fn default() -> Self {
        Self::anonymous()
    }
}

/// Profile as returned by the identity endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfilePayload {
    pub id: u64,
    pub avatar_id: u64,
    pub avatar: String,
    pub name: String,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub intro: Option<String>,
    #[serde(default)]
    pub background_image_id: Option<u64>,
    #[serde(default)]
    pub background_image: Option<String>,
}

/// `{ "data": ... }` envelope around the identity payload
#[derive(Debug, Serialize, Deserialize)]
pub struct UserinfoResponse {
    pub data: ProfilePayload,
}

impl From<ProfilePayload> for User {
    fn from(p: ProfilePayload) -> Self {
        Self {
            id: p.id,
            avatar_url_id: p.avatar_id,
            avatar_url: p.avatar,
            name: p.name,
            note: p.note,
            intro: p.intro,
            fans_num: None,
            follower_num: None,
            like_num: None,
            background_img_id: p.background_image_id,
            background_img: p.background_image,
        }
    }
}

/// Where the session is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionPhase {
    /// Nobody signed in
    Anonymous,
    /// Signed in optimistically, profile fetch in flight
    Pending,
    /// Profile confirmed by the identity endpoint
    Authenticated,
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionPhase::Anonymous => write!(f, "anonymous"),
            SessionPhase::Pending => write!(f, "pending"),
            SessionPhase::Authenticated => write!(f, "authenticated"),
        }
    }
}

/// Snapshot of the in-memory session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionState {
    pub phase: SessionPhase,
    pub user: User,
    /// Advances on every signin and on each signout that ends a session; fetches
    /// from older generations are dropped
    pub generation: u64,
    pub authenticated_at: Option<DateTime<Utc>>,
}

impl SessionState {
    /// Initial state, optimistic when a token is already persisted
    pub fn initial(has_token: bool) -> Self {
        Self {
            phase: if has_token {
                SessionPhase::Pending
            } else {
                SessionPhase::Anonymous
            },
            user: User::anonymous(),
            generation: 0,
            authenticated_at: None,
        }
    }

    /// Boolean login flag, true while pending as well as once confirmed
    pub fn is_login(&self) -> bool {
        self.phase != SessionPhase::Anonymous
    }

    pub fn is_authenticated(&self) -> bool {
        self.phase == SessionPhase::Authenticated
    }
}
