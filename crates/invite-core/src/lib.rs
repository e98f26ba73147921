//! invite-core
//!
//! The progressive-override customization engine.
//! Depends on invite-domain. No CLI, no terminal I/O, no filesystem access; durable
//! drafts go through the [`storage::DraftStorage`] trait.

pub mod defaults;
pub mod error;
pub mod merge;
pub mod mode_filter;
pub mod persistence;
pub mod sections;
pub mod session;
pub mod storage;
pub mod time;
pub mod touched;
pub mod transform;


pub use defaults::*;
pub use error::CoreError;
pub use merge::*;
pub use mode_filter::*;
pub use persistence::*;
pub use sections::*;
pub use session::*;
pub use storage::*;
pub use time::*;
pub use touched::*;
pub use transform::*;
