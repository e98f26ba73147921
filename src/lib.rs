#![doc(test(attr(deny(warnings))))]

//! Invite Studio hosts the template customization engine: it loads template
//! definitions, opens editing sessions backed by durable JSON drafts and exposes
//! them through the `invite_studio_cli` binary.

pub mod cli;
pub mod config;
pub mod errors;
pub mod template;
pub mod utils;

pub use errors::StudioError;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing with the default filter.
pub fn init() {
    init_with_filter(None);
}

/// Initializes global tracing, adding `directive` (e.g. from the user config) to
/// the default filter. Later calls are no-ops.
pub fn init_with_filter(directive: Option<&str>) {
    INIT_TRACING.call_once(|| {
        utils::init_tracing(directive);
        tracing::debug!(version = utils::build_info::CLI_VERSION, "Invite Studio tracing initialized.");
    });
}
