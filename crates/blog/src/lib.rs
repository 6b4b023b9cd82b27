//! Blog domain module.
//!
//! This crate contains the blog record and its validation rules, implemented
//! purely as deterministic domain logic (no IO, no storage, no tenancy checks).

pub mod blog;

pub use blog::{Blog, BlogDraft};
