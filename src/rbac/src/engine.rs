//! Session activation engine
//!
//! Orchestrates authentication, user- and role-level constraint
//! validation, and dynamic separation-of-duty checks into the
//! session-creation and role-activation operations. All collaborators
//! are injected; the engine keeps no mutable state of its own beyond
//! its read access to the shared hierarchy graphs.

use crate::error::{RbacError, Result};
use crate::sod::SodChecker;
use crate::store::{Authenticator, RoleStore, SdSetStore, UserStore};
use crate::types::{Credentials, Permission, SdSet, SdType, Session, UserRole};
use crate::validator::{self, TimeContext};
use rolegate_hierarchy::RoleGraph;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// The RBAC decision engine.
///
/// Stateless with respect to sessions: every call operates on the
/// caller's session value, and independent sessions activate fully in
/// parallel. Hierarchy graphs are shared handles; one engine serves
/// both the RBAC and the admin role type.
pub struct AccessEngine {
    users: Arc<dyn UserStore>,
    roles: Arc<dyn RoleStore>,
    sd_sets: Arc<dyn SdSetStore>,
    authenticator: Arc<dyn Authenticator>,
    hierarchy: Arc<RoleGraph>,
    admin_hierarchy: Arc<RoleGraph>,
    sod: SodChecker,
}

impl AccessEngine {
    /// Wire up an engine from its collaborators and the two hierarchy
    /// graph handles (RBAC roles, admin roles).
    pub fn new(
        users: Arc<dyn UserStore>,
        roles: Arc<dyn RoleStore>,
        sd_sets: Arc<dyn SdSetStore>,
        authenticator: Arc<dyn Authenticator>,
        hierarchy: Arc<RoleGraph>,
        admin_hierarchy: Arc<RoleGraph>,
    ) -> Self {
        let sod = SodChecker::new(Arc::clone(&hierarchy));
        Self {
            users,
            roles,
            sd_sets,
            authenticator,
            hierarchy,
            admin_hierarchy,
            sod,
        }
    }

    /// The RBAC role hierarchy this engine consults.
    pub fn hierarchy(&self) -> &Arc<RoleGraph> {
        &self.hierarchy
    }

    /// The admin role hierarchy this engine consults.
    pub fn admin_hierarchy(&self) -> &Arc<RoleGraph> {
        &self.admin_hierarchy
    }

    /// Rebuild both hierarchy graphs from the role store. Called at
    /// startup and after administrative hierarchy changes.
    pub async fn rebuild_hierarchy(&self) -> Result<()> {
        Self::rebuild(&self.hierarchy, self.roles.list_roles().await?)?;
        Self::rebuild(&self.admin_hierarchy, self.roles.list_admin_roles().await?)?;
        info!("role hierarchies rebuilt from store");
        Ok(())
    }

    fn rebuild(graph: &RoleGraph, roles: Vec<crate::types::Role>) -> Result<()> {
        graph.clear()?;
        for role in &roles {
            graph.add_role(&role.name)?;
        }
        for role in &roles {
            for parent in &role.parents {
                graph.add_role(parent)?;
                graph.add_inheritance(parent, &role.name)?;
            }
        }
        // Child lists mirror parent lists when both sides are stored;
        // only add relations not already derived above.
        for role in &roles {
            for child in &role.children {
                graph.add_role(child)?;
                match graph.add_inheritance(&role.name, child) {
                    Ok(()) | Err(rolegate_hierarchy::HierarchyError::EdgeExists { .. }) => {}
                    Err(e) => return Err(e.into()),
                }
            }
        }
        Ok(())
    }

    /// Create a session activating all assigned roles.
    pub async fn create_session(
        &self,
        credentials: &Credentials,
        trusted: bool,
    ) -> Result<Session> {
        self.create_session_with_roles(credentials, None, trusted)
            .await
    }

    /// Create a session activating only the requested subset of the
    /// user's assigned RBAC roles. Requested roles the user is not
    /// assigned are silently dropped (selective activation, not an
    /// error). `None` activates every assignment.
    ///
    /// Fatal failures: authentication (when not trusted), missing user,
    /// user-level constraint violation, collaborator errors. Per-role
    /// constraint or dynamic SoD failures skip the role and leave a
    /// warning on the session.
    pub async fn create_session_with_roles(
        &self,
        credentials: &Credentials,
        requested: Option<&[String]>,
        trusted: bool,
    ) -> Result<Session> {
        // Credential check comes first: an unauthenticated caller
        // learns nothing about the user, not even whether it exists.
        if !trusted {
            self.authenticator
                .authenticate(&credentials.user_id, &credentials.password)
                .await?;
        }

        let user = self.users.get_user(&credentials.user_id).await?;
        let assigned = self.users.get_assigned_roles(&credentials.user_id).await?;
        let now = TimeContext::now();

        // Coarse gate: the user's own constraint is fatal.
        if let Some(constraint) = &user.constraint {
            if let Err(check) = validator::validate(constraint, &now) {
                warn!(user_id = %user.user_id, %check, "session rejected by user constraint");
                return Err(RbacError::ConstraintViolation {
                    entity: user.user_id.clone(),
                    check,
                });
            }
        }

        let mut session = Session::new(user);
        session.authenticated = true;

        let candidates: Vec<UserRole> = match requested {
            Some(names) => assigned
                .into_iter()
                .filter(|r| names.iter().any(|n| n == &r.name))
                .collect(),
            None => assigned,
        };

        let dsd_sets = self.sd_sets.list_sd_sets(SdType::Dynamic).await?;
        for entry in candidates {
            match self.try_activate(&session, &entry, &dsd_sets, &now).await {
                Ok(()) => session.roles.push(entry),
                // Business-level skips only; collaborator errors stay fatal.
                Err(
                    reason @ (RbacError::ConstraintViolation { .. }
                    | RbacError::SodViolation { .. }),
                ) => {
                    debug!(user_id = %session.user_id(), role = %entry.name, %reason, "role skipped");
                    session
                        .warnings
                        .push(format!("role {} skipped: {reason}", entry.name));
                }
                Err(fatal) => return Err(fatal),
            }
        }

        // Admin roles run the same constraint gate against the admin
        // hierarchy; dynamic SD sets govern RBAC roles only.
        let admin_assigned = session.user.admin_roles.clone();
        for entry in admin_assigned {
            let role = self.roles.get_admin_role(&entry.name).await?;
            match entry
                .effective_constraint(&role)
                .map_or(Ok(()), |c| validator::validate(&c, &now))
            {
                Ok(()) => session.admin_roles.push(entry),
                Err(check) => {
                    debug!(user_id = %session.user_id(), role = %entry.name, %check, "admin role skipped");
                    session
                        .warnings
                        .push(format!("admin role {} skipped: {check} check failed", entry.name));
                }
            }
        }

        session.timeout = self.effective_timeout(&session).await?;

        info!(
            user_id = %session.user_id(),
            session_id = %session.session_id,
            active = session.roles.len(),
            admin_active = session.admin_roles.len(),
            skipped = session.warnings.len(),
            "session created"
        );
        Ok(session)
    }

    /// One candidate role through the fine-grained gates: effective
    /// constraint, then dynamic separation of duty.
    async fn try_activate(
        &self,
        session: &Session,
        entry: &UserRole,
        dsd_sets: &[SdSet],
        now: &TimeContext,
    ) -> std::result::Result<(), RbacError> {
        let role = self.roles.get_role(&entry.name).await?;
        if let Some(constraint) = entry.effective_constraint(&role) {
            if let Err(check) = validator::validate(&constraint, now) {
                return Err(RbacError::ConstraintViolation {
                    entity: entry.name.clone(),
                    check,
                });
            }
        }
        self.sod
            .check(session.active_roles(), &entry.name, dsd_sets)?;
        Ok(())
    }

    /// Activate one more assigned role into an existing session.
    ///
    /// Unlike session creation, the caller asked for this specific
    /// role, so constraint and SoD failures are returned as errors
    /// rather than skipped.
    pub async fn activate_role(&self, session: &mut Session, role: &str) -> Result<()> {
        if session.is_active(role) {
            return Err(RbacError::AlreadyActive {
                role: role.to_string(),
            });
        }

        let assigned = self.users.get_assigned_roles(session.user_id()).await?;
        let entry = assigned
            .into_iter()
            .find(|r| r.name == role)
            .ok_or_else(|| RbacError::NotAssigned {
                user_id: session.user_id().to_string(),
                role: role.to_string(),
            })?;

        let now = TimeContext::now();
        let dsd_sets = self.sd_sets.list_sd_sets(SdType::Dynamic).await?;
        self.try_activate(session, &entry, &dsd_sets, &now).await?;

        debug!(user_id = %session.user_id(), role, "role activated");
        session.roles.push(entry);
        session.timeout = self.effective_timeout(session).await?;
        session.touch();
        Ok(())
    }

    /// Drop an active role from the session.
    pub async fn deactivate_role(&self, session: &mut Session, role: &str) -> Result<()> {
        let index = session
            .roles
            .iter()
            .position(|r| r.name == role)
            .ok_or_else(|| RbacError::NotActive {
                role: role.to_string(),
            })?;
        session.roles.remove(index);
        session.timeout = self.effective_timeout(session).await?;
        session.touch();
        debug!(user_id = %session.user_id(), role, "role deactivated");
        Ok(())
    }

    /// Whether the session may perform the permission's operation.
    ///
    /// Grants resolve through inherited membership: a permission
    /// granted to a role a session's active role inherits from is
    /// satisfied. Direct user grants short-circuit the role check.
    pub async fn check_access(&self, session: &Session, permission: &Permission) -> Result<bool> {
        if permission.users.contains(session.user_id()) {
            return Ok(true);
        }
        let closure = self.hierarchy.ascendants_of_set(session.active_roles())?;
        Ok(permission.roles.iter().any(|r| closure.contains(r)))
    }

    /// Static separation-of-duty gate for administrative role grants.
    ///
    /// Checks the candidate against the user's full assignment set
    /// under every static SD set. A violation rejects the assignment
    /// outright; persistence of accepted assignments stays with the
    /// administrative caller.
    pub async fn validate_assignment(&self, user_id: &str, candidate: &str) -> Result<()> {
        // Candidate must be a known role.
        self.roles.get_role(candidate).await?;

        let assigned = self.users.get_assigned_roles(user_id).await?;
        let ssd_sets = self.sd_sets.list_sd_sets(SdType::Static).await?;
        self.sod.check(
            assigned.iter().map(|r| r.name.as_str()),
            candidate,
            &ssd_sets,
        )
    }

    /// Smallest non-zero timeout among the user constraint and the
    /// effective constraints of the activated roles.
    async fn effective_timeout(&self, session: &Session) -> Result<u64> {
        let mut timeouts: Vec<u64> = Vec::new();
        if let Some(c) = &session.user.constraint {
            timeouts.push(c.timeout);
        }
        for entry in &session.roles {
            let role = self.roles.get_role(&entry.name).await?;
            if let Some(c) = entry.effective_constraint(&role) {
                timeouts.push(c.timeout);
            }
        }
        Ok(timeouts.into_iter().filter(|t| *t > 0).min().unwrap_or(0))
    }
}
