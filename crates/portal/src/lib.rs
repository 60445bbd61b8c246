//! Client-side core of the QA evidence portal.
//!
//! Everything here runs on the user's side of the wire: it talks to the
//! backend through [`api::ApiClient`], keeps the bearer token and UI
//! preferences in a [`store::SessionStore`], and exposes one controller per
//! page that a presentation layer can render.

pub mod api;
pub mod app;
pub mod config;
pub mod mount;
pub mod notice;
pub mod pages;
pub mod role;
pub mod session;
pub mod store;
pub mod telemetry;

#[cfg(test)]
pub(crate) mod testing;

pub use app::{Portal, PortalView};
pub use mount::MountScope;
pub use notice::Notice;
pub use session::{ensure_session, Session, SessionOutcome};
pub use store::{FileStore, MemoryStore, SessionStore};
