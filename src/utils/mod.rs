pub mod build_info;

use tracing_subscriber::{fmt, EnvFilter};

pub const DEFAULT_LOG_DIRECTIVE: &str = "invite_studio=info";

/// Installs the global fmt subscriber on stderr.
///
/// `RUST_LOG` is honoured first; the default directive and `extra` are layered on top.
pub fn init_tracing(extra: Option<&str>) {
    let mut filter = EnvFilter::from_default_env();
    for directive in std::iter::once(DEFAULT_LOG_DIRECTIVE).chain(extra) {
        match directive.parse() {
            Ok(parsed) => filter = filter.add_directive(parsed),
            Err(err) => eprintln!("ignoring invalid log directive `{directive}`: {err}"),
        }
    }

    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
