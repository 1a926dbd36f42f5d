//! Safe bindings to libzfs, plus the pieces of the `zetta-agent` HTTP agent.
//!
//! The [`zfs`] module is the binding proper: open a [`zfs::Session`], then
//! pools and datasets borrowed from it. The other modules build the agent,
//! which exposes the same operations as JSON routes.

pub mod auth;
pub mod handlers;
pub mod manager;
pub mod models;
pub mod routes;
pub mod settings;
pub mod utils;
pub mod zfs;
