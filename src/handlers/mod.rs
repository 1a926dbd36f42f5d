// handlers/mod.rs
// Re-exports all handlers - routes.rs uses `use crate::handlers::*`

mod datasets;
mod library;
mod pools;
mod sharing;
mod snapshots;

pub use datasets::*;
pub use library::*;
pub use pools::*;
pub use sharing::*;
pub use snapshots::*;
