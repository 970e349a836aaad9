//! Admin tooling for the Cabo FitPass database.
//!
//! Each binary under `src/bin` runs one fixed task from [`cmd`] against the
//! project's PostgREST endpoint. The tasks only need a [`TableStore`], so
//! everything here also runs against [`table_store::MemoryStore`].
//!
//! [`TableStore`]: table_store::TableStore

pub mod catalog;
pub mod cmd;
pub mod config;
pub mod context;
pub mod probe;
pub mod report;
pub mod scripts;
pub mod seed;
pub mod sweep;

pub use config::{Config, OwnerProfile};
pub use context::AppContext;
pub use sweep::{run_sweep, sweep_dangling_bookings, SweepError, SweepReport, SweepTarget, Verdict};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install the log subscriber. Console reports go to stdout; logs are for
/// `RUST_LOG=fitpass_admin=debug` style digging.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
