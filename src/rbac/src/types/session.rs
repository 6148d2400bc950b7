//! Session entity

use super::role::{UserAdminRole, UserRole};
use super::user::User;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An authenticated session with its activated role set.
///
/// Sessions are ephemeral values built by the activation engine and
/// returned to the caller; the engine never persists them. A session
/// with zero active roles is still a valid, authenticated session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Unique session identifier
    pub session_id: Uuid,

    /// The authenticated user
    pub user: User,

    /// RBAC role assignments that passed activation, in activation order
    pub roles: Vec<UserRole>,

    /// Admin role assignments that passed activation, in activation order
    pub admin_roles: Vec<UserAdminRole>,

    /// Whether authentication succeeded for this session
    pub authenticated: bool,

    /// Non-fatal activation notes (roles skipped and why)
    #[serde(default)]
    pub warnings: Vec<String>,

    /// Effective inactivity timeout in seconds; 0 means none.
    ///
    /// Smallest non-zero timeout among the user constraint and the
    /// effective constraints of the activated roles.
    pub timeout: u64,

    /// Creation instant
    pub created_at: DateTime<Utc>,

    /// Last access instant, advanced by [`Session::touch`]
    pub last_access: DateTime<Utc>,
}

impl Session {
    /// Fresh unactivated session for an authenticated user.
    pub fn new(user: User) -> Self {
        let now = Utc::now();
        Self {
            session_id: Uuid::new_v4(),
            user,
            roles: Vec::new(),
            admin_roles: Vec::new(),
            authenticated: false,
            warnings: Vec::new(),
            timeout: 0,
            created_at: now,
            last_access: now,
        }
    }

    /// The user this session belongs to.
    pub fn user_id(&self) -> &str {
        &self.user.user_id
    }

    /// Names of the active RBAC roles, in activation order.
    pub fn active_roles(&self) -> Vec<&str> {
        self.roles.iter().map(|r| r.name.as_str()).collect()
    }

    /// Names of the active admin roles, in activation order.
    pub fn active_admin_roles(&self) -> Vec<&str> {
        self.admin_roles.iter().map(|r| r.name.as_str()).collect()
    }

    /// Whether the named RBAC role is active.
    pub fn is_active(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r.name == role)
    }

    /// Record activity, resetting the inactivity clock.
    pub fn touch(&mut self) {
        self.last_access = Utc::now();
    }

    /// Whether the session has exceeded its inactivity timeout at `now`.
    /// Always false when no timeout is in effect.
    pub fn expired(&self, now: DateTime<Utc>) -> bool {
        if self.timeout == 0 {
            return false;
        }
        let idle = now.signed_duration_since(self.last_access);
        idle.num_seconds() > self.timeout as i64
    }
}
