// Application layer: process context and the HTTP surface over the core.

pub mod context;
pub mod routes;

pub use context::AppContext;
pub use routes::{router, serve};
