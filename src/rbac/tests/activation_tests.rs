//! End-to-end activation tests: session creation, separation of duty,
//! constraint gating, and post-creation role activation.

use rolegate_hierarchy::RoleGraph;
use rolegate_rbac::{
    AccessEngine, Constraint, Credentials, MemoryAuthenticator, MemoryRoleStore,
    MemorySdSetStore, MemoryUserStore, Permission, RbacError, Role, SdSet, SdType, User,
    UserRole,
};
use std::sync::Arc;

struct Fixture {
    users: Arc<MemoryUserStore>,
    roles: Arc<MemoryRoleStore>,
    sd_sets: Arc<MemorySdSetStore>,
    auth: Arc<MemoryAuthenticator>,
    engine: AccessEngine,
}

fn fixture() -> Fixture {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let users = Arc::new(MemoryUserStore::new());
    let roles = Arc::new(MemoryRoleStore::new());
    let sd_sets = Arc::new(MemorySdSetStore::new());
    let auth = Arc::new(MemoryAuthenticator::new());
    let engine = AccessEngine::new(
        Arc::clone(&users) as _,
        Arc::clone(&roles) as _,
        Arc::clone(&sd_sets) as _,
        Arc::clone(&auth) as _,
        Arc::new(RoleGraph::new()),
        Arc::new(RoleGraph::new()),
    );
    Fixture {
        users,
        roles,
        sd_sets,
        auth,
        engine,
    }
}

/// A date window entirely in the past: fails for any current date.
fn expired_constraint() -> Constraint {
    Constraint::new().with_date_window("19990101", "19991231")
}

// Scenario A: hierarchy rebuilt from the store yields the documented
// closure direction.
#[tokio::test]
async fn hierarchy_rebuild_direction() {
    let f = fixture();
    f.roles.insert(Role::new("Employee"));
    f.roles.insert(Role::new("Developer").with_parent("Employee"));
    f.roles.insert(Role::new("Engineer").with_parent("Developer"));
    f.engine.rebuild_hierarchy().await.unwrap();

    let asc = f.engine.hierarchy().ascendants("Engineer").unwrap();
    assert_eq!(asc.len(), 2);
    assert!(asc.contains("Developer") && asc.contains("Employee"));

    let desc = f.engine.hierarchy().descendants("Employee").unwrap();
    assert_eq!(desc.len(), 2);
    assert!(desc.contains("Developer") && desc.contains("Engineer"));
}

// Scenario B: static SD set with cardinality 2 blocks the second
// member at assignment time; non-members pass.
#[tokio::test]
async fn static_sod_blocks_assignment() {
    let f = fixture();
    for name in ["RoleA", "RoleB", "RoleC"] {
        f.roles.insert(Role::new(name));
    }
    f.users
        .insert(User::new("alice").with_role(UserRole::new("RoleA")));
    f.sd_sets
        .insert(
            SdSet::new("pair", SdType::Static, 2)
                .with_member("RoleA")
                .with_member("RoleB"),
        )
        .unwrap();
    f.engine.rebuild_hierarchy().await.unwrap();

    let err = f
        .engine
        .validate_assignment("alice", "RoleB")
        .await
        .unwrap_err();
    match err {
        RbacError::SodViolation { sd_set, conflicting, .. } => {
            assert_eq!(sd_set, "pair");
            assert_eq!(conflicting, vec!["RoleA".to_string(), "RoleB".to_string()]);
        }
        other => panic!("expected SodViolation, got {other:?}"),
    }

    f.engine.validate_assignment("alice", "RoleC").await.unwrap();
}

// Scenario C: a role whose constraint fails is skipped, the session is
// still created, and the skip is recorded as a warning.
#[tokio::test]
async fn failing_role_constraint_skips_role_only() {
    let f = fixture();
    f.roles.insert(Role::new("RoleX"));
    f.roles
        .insert(Role::new("RoleY").with_constraint(expired_constraint()));
    f.users.insert(
        User::new("alice")
            .with_role(UserRole::new("RoleX"))
            .with_role(UserRole::new("RoleY")),
    );
    f.auth.set_password("alice", "secret");
    f.engine.rebuild_hierarchy().await.unwrap();

    let session = f
        .engine
        .create_session(&Credentials::new("alice", "secret"), false)
        .await
        .unwrap();

    assert!(session.authenticated);
    assert_eq!(session.active_roles(), vec!["RoleX"]);
    assert_eq!(session.warnings.len(), 1);
    assert!(session.warnings[0].contains("RoleY"));
}

// Scenario D: bad credential aborts before any user load; the user is
// deliberately absent from the store to prove no lookup happened.
#[tokio::test]
async fn authentication_failure_is_terminal() {
    let f = fixture();
    let err = f
        .engine
        .create_session(&Credentials::new("ghost", "wrong"), false)
        .await
        .unwrap_err();
    assert!(matches!(err, RbacError::AuthenticationFailure { .. }));
}

#[tokio::test]
async fn trusted_session_skips_authentication() {
    let f = fixture();
    f.roles.insert(Role::new("RoleX"));
    f.users
        .insert(User::new("alice").with_role(UserRole::new("RoleX")));
    f.engine.rebuild_hierarchy().await.unwrap();

    // No password registered at all; trusted callers vouch themselves.
    let session = f
        .engine
        .create_session(&Credentials::new("alice", ""), true)
        .await
        .unwrap();
    assert!(session.is_active("RoleX"));
}

#[tokio::test]
async fn dynamic_sod_skips_second_member_in_order() {
    let f = fixture();
    for name in ["RoleA", "RoleB", "RoleC"] {
        f.roles.insert(Role::new(name));
    }
    f.users.insert(
        User::new("alice")
            .with_role(UserRole::new("RoleA"))
            .with_role(UserRole::new("RoleB"))
            .with_role(UserRole::new("RoleC")),
    );
    f.sd_sets
        .insert(
            SdSet::new("pair", SdType::Dynamic, 2)
                .with_member("RoleA")
                .with_member("RoleB"),
        )
        .unwrap();
    f.auth.set_password("alice", "secret");
    f.engine.rebuild_hierarchy().await.unwrap();

    let session = f
        .engine
        .create_session(&Credentials::new("alice", "secret"), false)
        .await
        .unwrap();

    // Assignment order is activation order: RoleA wins, RoleB is the
    // one skipped, RoleC is untouched by the set.
    assert_eq!(session.active_roles(), vec!["RoleA", "RoleC"]);
    assert_eq!(session.warnings.len(), 1);
    assert!(session.warnings[0].contains("RoleB"));
}

#[tokio::test]
async fn selective_activation_intersects_assignments() {
    let f = fixture();
    for name in ["RoleX", "RoleY"] {
        f.roles.insert(Role::new(name));
    }
    f.users.insert(
        User::new("alice")
            .with_role(UserRole::new("RoleX"))
            .with_role(UserRole::new("RoleY")),
    );
    f.auth.set_password("alice", "secret");
    f.engine.rebuild_hierarchy().await.unwrap();

    // "Ghost" is not assigned; it is dropped silently, not an error.
    let requested = vec!["RoleY".to_string(), "Ghost".to_string()];
    let session = f
        .engine
        .create_session_with_roles(&Credentials::new("alice", "secret"), Some(&requested), false)
        .await
        .unwrap();

    assert_eq!(session.active_roles(), vec!["RoleY"]);
    assert!(session.warnings.is_empty());
}

#[tokio::test]
async fn session_with_zero_roles_is_still_valid() {
    let f = fixture();
    f.roles
        .insert(Role::new("RoleX").with_constraint(expired_constraint()));
    f.users
        .insert(User::new("alice").with_role(UserRole::new("RoleX")));
    f.auth.set_password("alice", "secret");
    f.engine.rebuild_hierarchy().await.unwrap();

    let session = f
        .engine
        .create_session(&Credentials::new("alice", "secret"), false)
        .await
        .unwrap();
    assert!(session.authenticated);
    assert!(session.roles.is_empty());
}

#[tokio::test]
async fn user_constraint_failure_is_fatal() {
    let f = fixture();
    f.roles.insert(Role::new("RoleX"));
    f.users.insert(
        User::new("alice")
            .with_role(UserRole::new("RoleX"))
            .with_constraint(expired_constraint()),
    );
    f.auth.set_password("alice", "secret");
    f.engine.rebuild_hierarchy().await.unwrap();

    let err = f
        .engine
        .create_session(&Credentials::new("alice", "secret"), false)
        .await
        .unwrap_err();
    match err {
        RbacError::ConstraintViolation { entity, .. } => assert_eq!(entity, "alice"),
        other => panic!("expected ConstraintViolation, got {other:?}"),
    }
}

#[tokio::test]
async fn assignment_constraint_overrides_role_default() {
    let f = fixture();
    // Role default would fail, but the assignment override is open.
    f.roles
        .insert(Role::new("RoleX").with_constraint(expired_constraint()));
    f.users.insert(
        User::new("alice")
            .with_role(UserRole::new("RoleX").with_constraint(Constraint::new())),
    );
    f.auth.set_password("alice", "secret");
    f.engine.rebuild_hierarchy().await.unwrap();

    let session = f
        .engine
        .create_session(&Credentials::new("alice", "secret"), false)
        .await
        .unwrap();
    assert!(session.is_active("RoleX"));
}

#[tokio::test]
async fn activate_and_deactivate_role() {
    let f = fixture();
    for name in ["RoleA", "RoleB"] {
        f.roles.insert(Role::new(name));
    }
    f.users.insert(
        User::new("alice")
            .with_role(UserRole::new("RoleA"))
            .with_role(UserRole::new("RoleB")),
    );
    f.sd_sets
        .insert(
            SdSet::new("pair", SdType::Dynamic, 2)
                .with_member("RoleA")
                .with_member("RoleB"),
        )
        .unwrap();
    f.auth.set_password("alice", "secret");
    f.engine.rebuild_hierarchy().await.unwrap();

    // Start with nothing active.
    let requested: Vec<String> = Vec::new();
    let mut session = f
        .engine
        .create_session_with_roles(&Credentials::new("alice", "secret"), Some(&requested), false)
        .await
        .unwrap();
    assert!(session.roles.is_empty());

    f.engine.activate_role(&mut session, "RoleA").await.unwrap();
    assert!(session.is_active("RoleA"));

    let err = f
        .engine
        .activate_role(&mut session, "RoleA")
        .await
        .unwrap_err();
    assert!(matches!(err, RbacError::AlreadyActive { .. }));

    // Explicit activation of a DSD conflict is an error, not a skip.
    let err = f
        .engine
        .activate_role(&mut session, "RoleB")
        .await
        .unwrap_err();
    assert!(matches!(err, RbacError::SodViolation { .. }));

    let err = f
        .engine
        .activate_role(&mut session, "Unassigned")
        .await
        .unwrap_err();
    assert!(matches!(err, RbacError::NotAssigned { .. }));

    f.engine
        .deactivate_role(&mut session, "RoleA")
        .await
        .unwrap();
    assert!(!session.is_active("RoleA"));
    let err = f
        .engine
        .deactivate_role(&mut session, "RoleA")
        .await
        .unwrap_err();
    assert!(matches!(err, RbacError::NotActive { .. }));

    // With RoleA gone, RoleB no longer conflicts.
    f.engine.activate_role(&mut session, "RoleB").await.unwrap();
}

#[tokio::test]
async fn check_access_resolves_inherited_grants() {
    let f = fixture();
    f.roles.insert(Role::new("Employee"));
    f.roles.insert(Role::new("Engineer").with_parent("Employee"));
    f.users
        .insert(User::new("alice").with_role(UserRole::new("Engineer")));
    f.auth.set_password("alice", "secret");
    f.engine.rebuild_hierarchy().await.unwrap();

    let session = f
        .engine
        .create_session(&Credentials::new("alice", "secret"), false)
        .await
        .unwrap();

    // Granted to the junior role; satisfied via inheritance.
    let junior_perm = Permission::new("timesheet", "submit").with_role("Employee");
    assert!(f.engine.check_access(&session, &junior_perm).await.unwrap());

    let direct_perm = Permission::new("payroll", "export").with_user("alice");
    assert!(f.engine.check_access(&session, &direct_perm).await.unwrap());

    let other_perm = Permission::new("ledger", "close").with_role("Accountant");
    assert!(!f.engine.check_access(&session, &other_perm).await.unwrap());
}

#[tokio::test]
async fn session_timeout_is_minimum_nonzero() {
    let f = fixture();
    f.roles
        .insert(Role::new("RoleX").with_constraint(Constraint::new().with_timeout(300)));
    f.users.insert(
        User::new("alice")
            .with_role(UserRole::new("RoleX"))
            .with_constraint(Constraint::new().with_timeout(600)),
    );
    f.auth.set_password("alice", "secret");
    f.engine.rebuild_hierarchy().await.unwrap();

    let session = f
        .engine
        .create_session(&Credentials::new("alice", "secret"), false)
        .await
        .unwrap();
    assert_eq!(session.timeout, 300);
}

#[tokio::test]
async fn deactivation_recomputes_timeout() {
    let f = fixture();
    f.roles
        .insert(Role::new("Short").with_constraint(Constraint::new().with_timeout(300)));
    f.roles
        .insert(Role::new("Long").with_constraint(Constraint::new().with_timeout(600)));
    f.users.insert(
        User::new("alice")
            .with_role(UserRole::new("Short"))
            .with_role(UserRole::new("Long")),
    );
    f.auth.set_password("alice", "secret");
    f.engine.rebuild_hierarchy().await.unwrap();

    let mut session = f
        .engine
        .create_session(&Credentials::new("alice", "secret"), false)
        .await
        .unwrap();
    assert_eq!(session.timeout, 300);

    // Dropping the role that contributed the minimum loosens the
    // session to the next smallest timeout.
    f.engine
        .deactivate_role(&mut session, "Short")
        .await
        .unwrap();
    assert_eq!(session.timeout, 600);

    f.engine.deactivate_role(&mut session, "Long").await.unwrap();
    assert_eq!(session.timeout, 0);
}

#[tokio::test]
async fn unknown_user_is_not_found() {
    let f = fixture();
    let err = f
        .engine
        .create_session(&Credentials::new("ghost", ""), true)
        .await
        .unwrap_err();
    assert!(matches!(err, RbacError::NotFound { entity: "user", .. }));
}

#[tokio::test]
async fn missing_role_entity_is_fatal() {
    let f = fixture();
    // Assignment references a role absent from the role store.
    f.users
        .insert(User::new("alice").with_role(UserRole::new("Phantom")));
    f.auth.set_password("alice", "secret");

    let err = f
        .engine
        .create_session(&Credentials::new("alice", "secret"), false)
        .await
        .unwrap_err();
    assert!(matches!(err, RbacError::NotFound { entity: "role", .. }));
}
