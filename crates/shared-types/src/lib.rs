pub mod common;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod export;
pub mod filter;
pub mod models;
pub mod requests;
pub mod submission;

pub use common::*;
pub use config::*;
pub use dashboard::*;
pub use error::*;
pub use export::*;
pub use filter::*;
pub use models::*;
pub use requests::*;
pub use submission::*;
