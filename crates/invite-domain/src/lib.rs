//! invite-domain
//!
//! Pure domain models for template customization (fields, sections, values,
//! templates, catalogs). No I/O, no CLI, no storage. Only data types and core enums.

pub mod catalog;
pub mod catalogs;
pub mod field;
pub mod mode;
pub mod section;
pub mod template;
pub mod value;

pub use catalog::*;
pub use field::*;
pub use mode::*;
pub use section::*;
pub use template::*;
pub use value::*;
