//! In-memory storage for tests/dev.
//!
//! `InMemoryDatabase` is the long-lived, shared part (`Send + Sync`, one
//! `RwLock` per table). `Session` is the per-call part: it owns the installed
//! row filter in a `Cell`, so a session cannot be shared between threads and
//! a filter installed for one call can never leak into another.

use std::cell::Cell;
use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tenantry_auth::{User, normalize_login};
use tenantry_blog::Blog;
use tenantry_core::{Entity, Tenant, TenantId, TenantScoped};

use super::{EntityStore, FilteredSession, RowFilter, StoreError, UserStore};

type UniqueKey<E> = fn(&E) -> String;

/// A single table keyed by primary id, with an optional unique column.
#[derive(Debug)]
pub struct InMemoryTable<E: Entity> {
    rows: RwLock<BTreeMap<E::Id, E>>,
    unique: Option<(&'static str, UniqueKey<E>)>,
}

impl<E: Entity> InMemoryTable<E> {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(BTreeMap::new()),
            unique: None,
        }
    }

    /// A table enforcing uniqueness of `key` across all rows.
    pub fn with_unique_key(column: &'static str, key: UniqueKey<E>) -> Self {
        Self {
            rows: RwLock::new(BTreeMap::new()),
            unique: Some((column, key)),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, BTreeMap<E::Id, E>>, StoreError> {
        self.rows
            .read()
            .map_err(|_| StoreError::Unavailable(format!("{} table lock poisoned", E::KIND)))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, BTreeMap<E::Id, E>>, StoreError> {
        self.rows
            .write()
            .map_err(|_| StoreError::Unavailable(format!("{} table lock poisoned", E::KIND)))
    }
}

impl<E: Entity> Default for InMemoryTable<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity + Clone> InMemoryTable<E> {
    pub fn get(&self, id: &E::Id) -> Result<Option<E>, StoreError> {
        Ok(self.read()?.get(id).cloned())
    }

    /// Insert or replace by primary id.
    pub fn upsert(&self, row: E) -> Result<E, StoreError> {
        let mut rows = self.write()?;

        if let Some((column, key)) = self.unique {
            let value = key(&row);
            let taken = rows
                .values()
                .any(|existing| existing.id() != row.id() && key(existing) == value);
            if taken {
                return Err(StoreError::Conflict(format!(
                    "{} {column} '{value}' already exists",
                    E::KIND
                )));
            }
        }

        rows.insert(*row.id(), row.clone());
        Ok(row)
    }

    pub fn remove(&self, id: &E::Id) -> Result<Option<E>, StoreError> {
        Ok(self.write()?.remove(id))
    }

    /// All rows matching `predicate`, in primary-key order.
    pub fn scan<P>(&self, predicate: P) -> Result<Vec<E>, StoreError>
    where
        P: Fn(&E) -> bool,
    {
        Ok(self
            .read()?
            .values()
            .filter(|row| predicate(row))
            .cloned()
            .collect())
    }

    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Database
// ─────────────────────────────────────────────────────────────────────────────

/// In-memory database: one table per domain object.
#[derive(Debug)]
pub struct InMemoryDatabase {
    tenants: InMemoryTable<Tenant>,
    users: InMemoryTable<User>,
    blogs: InMemoryTable<Blog>,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self {
            tenants: InMemoryTable::new(),
            users: InMemoryTable::with_unique_key("login", |user| user.login.clone()),
            blogs: InMemoryTable::new(),
        }
    }

    /// Open a storage session for one call. No row filter is installed.
    pub fn session(&self) -> Session<'_> {
        Session {
            db: self,
            filter: Cell::new(None),
        }
    }

    pub fn save_tenant(&self, tenant: Tenant) -> Result<Tenant, StoreError> {
        self.tenants.upsert(tenant)
    }

    pub fn find_tenant(&self, id: &TenantId) -> Result<Option<Tenant>, StoreError> {
        self.tenants.get(id)
    }
}

impl Default for InMemoryDatabase {
    fn default() -> Self {
        Self::new()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Session
// ─────────────────────────────────────────────────────────────────────────────

/// A call-scoped storage session.
#[derive(Debug)]
pub struct Session<'db> {
    db: &'db InMemoryDatabase,
    filter: Cell<Option<RowFilter>>,
}

impl<'db> Session<'db> {
    pub fn blogs(&self) -> TableView<'_, Blog> {
        TableView {
            table: &self.db.blogs,
            session_filter: &self.filter,
        }
    }

    pub fn users(&self) -> TableView<'_, User> {
        TableView {
            table: &self.db.users,
            session_filter: &self.filter,
        }
    }
}

impl FilteredSession for Session<'_> {
    fn install_row_filter(&self, filter: RowFilter) {
        self.filter.set(Some(filter));
    }

    fn clear_row_filter(&self) {
        self.filter.set(None);
    }

    fn row_filter(&self) -> Option<RowFilter> {
        self.filter.get()
    }
}

/// A table seen through a session: queries honour the session's row filter.
#[derive(Debug)]
pub struct TableView<'s, E: Entity> {
    table: &'s InMemoryTable<E>,
    session_filter: &'s Cell<Option<RowFilter>>,
}

impl<E: TenantScoped> TableView<'_, E> {
    fn effective_filter(&self, filter: Option<&RowFilter>) -> Option<RowFilter> {
        RowFilter::combine(filter.copied(), self.session_filter.get())
    }
}

impl<E> EntityStore<E> for TableView<'_, E>
where
    E: TenantScoped + Clone,
{
    fn save(&self, entity: E) -> Result<E, StoreError> {
        if E::TENANT_REQUIRED && entity.tenant_id().is_none() {
            return Err(StoreError::Constraint(format!(
                "{} {} requires a tenant",
                E::KIND,
                entity.id()
            )));
        }
        self.table.upsert(entity)
    }

    fn find_by_id(&self, id: &E::Id) -> Result<Option<E>, StoreError> {
        self.table.get(id)
    }

    fn delete_by_id(&self, id: &E::Id) -> Result<(), StoreError> {
        self.table.remove(id).map(|_| ())
    }

    fn find_all(&self, filter: Option<&RowFilter>) -> Result<Vec<E>, StoreError> {
        let effective = self.effective_filter(filter);
        tracing::trace!(entity = E::KIND, filter = ?effective, "scanning table");
        self.table
            .scan(|row| effective.is_none_or(|f| f.matches(row)))
    }
}

impl UserStore for TableView<'_, User> {
    fn find_by_login(&self, login: &str) -> Result<Option<User>, StoreError> {
        // Logins that cannot be valid cannot be stored either.
        let Ok(login) = normalize_login(login) else {
            return Ok(None);
        };
        let effective = self.effective_filter(None);
        Ok(self
            .table
            .scan(|user| user.login == login && effective.is_none_or(|f| f.matches(user)))?
            .into_iter()
            .next())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tenantry_auth::NewUser;
    use tenantry_blog::BlogDraft;

    fn blog(tenant: Option<TenantId>, name: &str) -> Blog {
        let mut draft = BlogDraft::new(name, "hd");
        draft.tenant_id = tenant;
        Blog::from_draft(&draft).unwrap()
    }

    fn user(login: &str, tenant: Option<TenantId>) -> User {
        let mut user = User::from_request(&NewUser {
            login: login.to_string(),
            ..Default::default()
        })
        .unwrap();
        user.tenant_id = tenant;
        user
    }

    #[test]
    fn tenant_owned_rows_require_a_tenant() {
        let db = InMemoryDatabase::new();
        let session = db.session();

        let err = session.blogs().save(blog(None, "Orphan")).unwrap_err();
        assert!(matches!(err, StoreError::Constraint(_)));

        // Users may be tenant-less.
        session.users().save(user("root", None)).unwrap();
    }

    #[test]
    fn logins_are_unique_across_tenants() {
        let db = InMemoryDatabase::new();
        let session = db.session();

        session.users().save(user("alice", Some(TenantId::new()))).unwrap();
        let err = session
            .users()
            .save(user("alice", Some(TenantId::new())))
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[test]
    fn resaving_the_same_user_is_not_a_conflict() {
        let db = InMemoryDatabase::new();
        let session = db.session();

        let mut alice = session.users().save(user("alice", None)).unwrap();
        alice.first_name = Some("Alice".to_string());
        session.users().save(alice.clone()).unwrap();

        assert_eq!(session.users().find_by_id(&alice.id).unwrap(), Some(alice));
    }

    #[test]
    fn session_filter_restricts_queries_but_not_primary_key_loads() {
        let db = InMemoryDatabase::new();
        let a = TenantId::new();
        let b = TenantId::new();

        let session = db.session();
        let in_a = session.blogs().save(blog(Some(a), "Blog A")).unwrap();
        let in_b = session.blogs().save(blog(Some(b), "Blog B")).unwrap();

        session.install_row_filter(RowFilter::tenant(a));
        let listed = session.blogs().find_all(None).unwrap();
        assert_eq!(listed, vec![in_a.clone()]);

        assert_eq!(session.blogs().find_by_id(in_b.id()).unwrap(), Some(in_b));

        session.clear_row_filter();
        assert_eq!(session.blogs().find_all(None).unwrap().len(), 2);
    }

    #[test]
    fn explicit_filter_and_session_filter_intersect() {
        let db = InMemoryDatabase::new();
        let a = TenantId::new();
        let b = TenantId::new();

        let session = db.session();
        session.blogs().save(blog(Some(a), "Blog A")).unwrap();
        session.blogs().save(blog(Some(b), "Blog B")).unwrap();

        session.install_row_filter(RowFilter::tenant(a));
        let listed = session.blogs().find_all(Some(&RowFilter::tenant(b))).unwrap();
        assert!(listed.is_empty());
    }

    #[test]
    fn sessions_do_not_share_filters() {
        let db = InMemoryDatabase::new();
        let a = TenantId::new();

        let first = db.session();
        let second = db.session();
        first.install_row_filter(RowFilter::tenant(a));

        assert_eq!(first.row_filter(), Some(RowFilter::tenant(a)));
        assert_eq!(second.row_filter(), None);
    }

    #[test]
    fn find_by_login_is_case_insensitive_and_filtered() {
        let db = InMemoryDatabase::new();
        let a = TenantId::new();
        let b = TenantId::new();

        let session = db.session();
        session.users().save(user("bob", Some(b))).unwrap();

        assert!(session.users().find_by_login("BOB").unwrap().is_some());

        session.install_row_filter(RowFilter::tenant(a));
        assert!(session.users().find_by_login("bob").unwrap().is_none());
    }

    #[test]
    fn deleting_an_absent_id_is_a_no_op() {
        let db = InMemoryDatabase::new();
        let session = db.session();
        let ghost = blog(Some(TenantId::new()), "Ghost");

        session.blogs().delete_by_id(ghost.id()).unwrap();
        assert!(db.blogs.is_empty().unwrap());
    }

    #[test]
    fn tenants_are_stored_outside_sessions() {
        let db = InMemoryDatabase::new();
        let acme = db.save_tenant(Tenant::new("Acme").unwrap()).unwrap();
        assert_eq!(db.find_tenant(&acme.id).unwrap(), Some(acme));
    }
}
