//! `fablink-auth` — pure authorization boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage. The
//! identity provider is external; what the domain sees is an [`Actor`]
//! (id + name + role) passed explicitly into every guarded operation.

pub mod actor;
pub mod role;

pub use actor::Actor;
pub use role::Role;
