//! The gateway's HTTP surface (C12): router assembly, the streaming request
//! dispatcher, shared application state, and the concrete adapters binding
//! the core crates' trait seams to plain HTTP/filesystem backends.

pub mod adapters;
pub mod app;
pub mod dispatcher;
pub mod sse;
pub mod state;

pub use app::build_router;
pub use state::AppState;
