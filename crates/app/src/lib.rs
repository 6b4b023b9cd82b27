//! `tenantry-app` — guarded service surfaces.
//!
//! Every public service method runs as one call: it opens a storage session,
//! resolves the caller's tenant, enters the row-filter gate and routes its
//! storage access through the isolation decorators. Nothing call-scoped
//! outlives the method.

pub mod blogs;
pub mod error;
pub mod users;

pub use blogs::BlogService;
pub use error::{ServiceError, ServiceResult};
pub use users::UserService;
