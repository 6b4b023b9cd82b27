use std::sync::Arc;

use tenantry_app::{BlogService, ServiceError, UserService};
use tenantry_auth::{Anonymous, FixedIdentity, NewUser, Role};
use tenantry_blog::BlogDraft;
use tenantry_core::{BlogId, Tenant, TenantId, TenantScoped, UserId};
use tenantry_infra::{InMemoryDatabase, IsolationSettings};

// ─────────────────────────────────────────────────────────────────────────────
// Fixtures
// ─────────────────────────────────────────────────────────────────────────────

struct World {
    acme: TenantId,
    globex: TenantId,
    users: UserService,
    blogs: BlogService,
}

fn world(settings: IsolationSettings) -> World {
    let db = Arc::new(InMemoryDatabase::new());
    let acme = db.save_tenant(Tenant::new("Acme").unwrap()).unwrap().id;
    let globex = db.save_tenant(Tenant::new("Globex").unwrap()).unwrap().id;

    let users = UserService::new(db.clone(), &settings);
    let blogs = BlogService::new(db, &settings);

    // Bootstrap: an anonymous caller registers the first member of each tenant.
    for (login, tenant) in [("alice", acme), ("bob", globex)] {
        users
            .register_user(
                &Anonymous,
                &NewUser {
                    login: login.to_string(),
                    tenant_id: Some(tenant),
                    ..Default::default()
                },
            )
            .unwrap();
    }
    // Global administrator without a tenant.
    users
        .create_user(
            &Anonymous,
            &NewUser {
                login: "root".to_string(),
                authorities: vec![Role::ADMIN],
                ..Default::default()
            },
        )
        .unwrap();

    World {
        acme,
        globex,
        users,
        blogs,
    }
}

fn both_modes() -> [IsolationSettings; 2] {
    [
        IsolationSettings {
            row_filter_enabled: true,
        },
        IsolationSettings {
            row_filter_enabled: false,
        },
    ]
}

fn alice() -> FixedIdentity {
    FixedIdentity::new("alice")
}

fn bob() -> FixedIdentity {
    FixedIdentity::new("bob")
}

fn root() -> FixedIdentity {
    FixedIdentity::new("root")
}

// ─────────────────────────────────────────────────────────────────────────────
// Scenario
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn acme_and_globex_scenario() {
    for settings in both_modes() {
        let w = world(settings);

        let a1 = w.blogs.create(&alice(), &BlogDraft::new("A1 blog", "a1")).unwrap();
        assert_eq!(a1.tenant_id(), Some(w.acme));

        assert_eq!(w.blogs.get(&bob(), a1.id_typed()).unwrap_err(), ServiceError::NotFound);
        assert!(
            !w.blogs
                .list_all(&bob())
                .unwrap()
                .iter()
                .any(|b| b.id_typed() == a1.id_typed())
        );

        w.blogs.delete(&alice(), a1.id_typed()).unwrap();
        for caller in [alice(), bob(), root()] {
            assert_eq!(w.blogs.get(&caller, a1.id_typed()).unwrap_err(), ServiceError::NotFound);
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Properties
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn stamping_ignores_the_payload_tenant() {
    let w = world(IsolationSettings::default());

    let spoofed = BlogDraft::new("Spoofed", "sp").with_tenant(w.globex);
    let blog = w.blogs.create(&alice(), &spoofed).unwrap();

    assert_eq!(blog.tenant_id(), Some(w.acme));
    assert_eq!(w.blogs.get(&bob(), blog.id_typed()).unwrap_err(), ServiceError::NotFound);
}

#[test]
fn foreign_read_looks_exactly_like_absence() {
    for settings in both_modes() {
        let w = world(settings);
        let theirs = w.blogs.create(&bob(), &BlogDraft::new("Globex", "gx")).unwrap();
        let ghost = w.blogs.create(&alice(), &BlogDraft::new("Temp", "tp")).unwrap();
        w.blogs.delete(&alice(), ghost.id_typed()).unwrap();

        let foreign = w.blogs.get(&alice(), theirs.id_typed()).unwrap_err();
        let absent = w.blogs.get(&alice(), ghost.id_typed()).unwrap_err();
        assert_eq!(foreign, absent);
        assert_eq!(foreign.to_string(), absent.to_string());
    }
}

#[test]
fn foreign_delete_leaves_the_record_untouched() {
    for settings in both_modes() {
        let w = world(settings);
        let a1 = w.blogs.create(&alice(), &BlogDraft::new("A1 blog", "a1")).unwrap();

        assert_eq!(w.blogs.delete(&bob(), a1.id_typed()).unwrap_err(), ServiceError::NotFound);
        assert_eq!(w.blogs.get(&alice(), a1.id_typed()).unwrap(), a1);
    }
}

#[test]
fn list_returns_exactly_the_callers_tenant() {
    for settings in both_modes() {
        let w = world(settings);
        for name in ["Acme one", "Acme two"] {
            w.blogs.create(&alice(), &BlogDraft::new(name, "ac")).unwrap();
        }
        w.blogs.create(&bob(), &BlogDraft::new("Globex one", "gx")).unwrap();

        let acme_list = w.blogs.list_all(&alice()).unwrap();
        assert_eq!(acme_list.len(), 2);
        assert!(acme_list.iter().all(|b| b.tenant_id() == Some(w.acme)));

        let globex_list = w.blogs.list_all(&bob()).unwrap();
        assert_eq!(globex_list.len(), 1);
        assert!(globex_list.iter().all(|b| b.tenant_id() == Some(w.globex)));
    }
}

#[test]
fn tenant_less_caller_sees_and_does_everything() {
    let w = world(IsolationSettings::default());
    let a1 = w.blogs.create(&alice(), &BlogDraft::new("A1 blog", "a1")).unwrap();
    let g1 = w.blogs.create(&bob(), &BlogDraft::new("G1 blog", "g1")).unwrap();

    assert_eq!(w.blogs.list_all(&root()).unwrap().len(), 2);
    assert_eq!(w.blogs.get(&root(), a1.id_typed()).unwrap(), a1);

    let admin_made = w
        .blogs
        .create(&root(), &BlogDraft::new("Ops notes", "ops").with_tenant(w.globex))
        .unwrap();
    assert_eq!(admin_made.tenant_id(), Some(w.globex));

    w.blogs.delete(&root(), g1.id_typed()).unwrap();
    assert_eq!(w.blogs.list_all(&bob()).unwrap(), vec![admin_made]);
}

#[test]
fn anonymous_callers_bypass_isolation() {
    let w = world(IsolationSettings::default());
    w.blogs.create(&alice(), &BlogDraft::new("A1 blog", "a1")).unwrap();
    w.blogs.create(&bob(), &BlogDraft::new("G1 blog", "g1")).unwrap();

    assert_eq!(w.blogs.list_all(&Anonymous).unwrap().len(), 2);
}

#[test]
fn creation_hand_off_follows_the_creator() {
    let w = world(IsolationSettings::default());

    // Self-registration keeps the requested tenant.
    let registered = w
        .users
        .register_user(
            &Anonymous,
            &NewUser {
                login: "newbie".to_string(),
                tenant_id: Some(w.globex),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(registered.tenant_id, Some(w.globex));

    // A tenant member always creates into its own tenant.
    let created = w
        .users
        .create_user(
            &alice(),
            &NewUser {
                login: "carol".to_string(),
                tenant_id: Some(w.globex),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(created.tenant_id, Some(w.acme));

    // A global admin picks the tenant.
    let placed = w
        .users
        .create_user(
            &root(),
            &NewUser {
                login: "dave".to_string(),
                tenant_id: Some(w.globex),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(placed.tenant_id, Some(w.globex));
}

// ─────────────────────────────────────────────────────────────────────────────
// User directory
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn user_lookups_hide_other_tenants() {
    for settings in both_modes() {
        let w = world(settings);
        let bob_record = w.users.get_user_with_authorities_by_login(&root(), "bob").unwrap();

        assert_eq!(
            w.users.get_user_with_authorities_by_login(&alice(), "bob").unwrap_err(),
            ServiceError::NotFound
        );
        assert_eq!(
            w.users.get_user_with_authorities(&alice(), bob_record.id).unwrap_err(),
            ServiceError::NotFound
        );
        // The global admin has no tenant, so tenant members cannot see it.
        assert_eq!(
            w.users.get_user_with_authorities_by_login(&alice(), "root").unwrap_err(),
            ServiceError::NotFound
        );
        assert_eq!(
            w.users.get_user_with_authorities_by_login(&alice(), "alice").unwrap().tenant_id,
            Some(w.acme)
        );
    }
}

#[test]
fn caller_without_a_user_record_is_a_consistency_fault() {
    for settings in both_modes() {
        let w = world(settings);
        let existing = w.blogs.create(&alice(), &BlogDraft::new("A1 blog", "a1")).unwrap();
        let ghost = FixedIdentity::new("ghost");
        let fault = ServiceError::DataConsistency {
            login: "ghost".to_string(),
        };

        assert_eq!(
            w.blogs.create(&ghost, &BlogDraft::new("Haunted", "hh")).unwrap_err(),
            fault
        );
        assert_eq!(w.blogs.list_all(&ghost).unwrap_err(), fault);

        // Absent and existing targets alike.
        for id in [BlogId::new(), existing.id_typed()] {
            assert_eq!(w.blogs.get(&ghost, id).unwrap_err(), fault);
            assert_eq!(w.blogs.delete(&ghost, id).unwrap_err(), fault);
        }
        for login in ["nobody", "alice"] {
            assert_eq!(
                w.users.get_user_with_authorities_by_login(&ghost, login).unwrap_err(),
                fault
            );
        }
        assert_eq!(
            w.users.get_user_with_authorities(&ghost, UserId::new()).unwrap_err(),
            fault
        );
        assert_eq!(w.users.get_current_user(&ghost).unwrap_err(), fault);
        assert_eq!(w.users.get_all_managed_users(&ghost).unwrap_err(), fault);

        // Nothing was deleted on the way.
        assert_eq!(w.blogs.get(&alice(), existing.id_typed()).unwrap(), existing);
    }
}
