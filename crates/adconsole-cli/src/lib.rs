//! Terminal console for the screensaver ad platform.
//!
//! Pages are plain structs that load their data through the API client and
//! render to a `String`; the binary decides where that text goes.

pub mod components;
pub mod pages;
pub mod router;
pub mod view;

pub use router::Route;
pub use view::{ViewMode, ViewState};

/// Initialize tracing for the console binary. Logs go to stderr so page
/// output on stdout stays clean.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}
