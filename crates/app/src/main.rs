use std::sync::Arc;

use anyhow::Context;

use tenantry_app::{BlogService, ServiceError, UserService};
use tenantry_auth::{Anonymous, FixedIdentity, NewUser, Role};
use tenantry_blog::BlogDraft;
use tenantry_core::Tenant;
use tenantry_infra::{InMemoryDatabase, Settings};

/// Walks two tenants through the blog workflow against the in-memory store.
fn main() -> anyhow::Result<()> {
    let settings = Settings::from_env().context("loading settings")?;
    tenantry_observability::init_with(
        settings.observability.json_logs,
        &settings.observability.default_filter,
    );

    let db = Arc::new(InMemoryDatabase::new());
    let acme = db.save_tenant(Tenant::new("Acme")?)?;
    let globex = db.save_tenant(Tenant::new("Globex")?)?;

    let users = UserService::new(db.clone(), &settings.isolation);
    let blogs = BlogService::new(db, &settings.isolation);

    for (login, tenant) in [("alice", acme.id), ("bob", globex.id)] {
        users.register_user(
            &Anonymous,
            &NewUser {
                login: login.to_string(),
                tenant_id: Some(tenant),
                authorities: vec![Role::ADMIN],
                ..Default::default()
            },
        )?;
    }

    let alice = FixedIdentity::new("alice");
    let bob = FixedIdentity::new("bob");

    let a1 = blogs.create(&alice, &BlogDraft::new("Acme engineering", "acme-eng"))?;
    tracing::info!(blog_id = %a1.id_typed(), tenant = %acme.name, "alice created a blog");

    match blogs.get(&bob, a1.id_typed()) {
        Err(ServiceError::NotFound) => tracing::info!("bob cannot see alice's blog"),
        other => anyhow::bail!("cross-tenant read was not hidden: {other:?}"),
    }

    let visible = blogs.list_all(&bob)?;
    tracing::info!(count = visible.len(), tenant = %globex.name, "blogs visible to bob");

    blogs.delete(&alice, a1.id_typed())?;
    anyhow::ensure!(
        matches!(blogs.get(&alice, a1.id_typed()), Err(ServiceError::NotFound)),
        "deleted blog is still readable"
    );
    tracing::info!("alice deleted her blog");

    Ok(())
}
