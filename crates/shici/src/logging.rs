//! tracing subscriber setup shared by the binaries

use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

/// Filter directives used when `RUST_LOG` is not set
pub fn default_directives(verbose: bool) -> &'static str {
  if verbose {
    "shici=debug,tower_http=debug,info"
  } else {
    "shici=info,warn"
  }
}

/// Install the global subscriber. `RUST_LOG` wins over the defaults.
pub fn init(verbose: bool) {
  let filter = EnvFilter::try_from_default_env()
    .unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)));

  // A second init (e.g. from tests) is not an error worth surfacing
  let _ = tracing_subscriber::registry().with(fmt::layer().with_target(false)).with(filter).try_init();
}
