use tracing_subscriber::EnvFilter;
use tracing_subscriber::util::SubscriberInitExt;

use crate::commands::Verbosity;

fn log_filter(verbosity: Verbosity) -> &'static str {
    match verbosity {
        // Show only errors
        Verbosity::Quiet => "off,catalog_query=error,category_catalog=error",
        // Only show warnings
        Verbosity::Verbose(0) => "off,catalog_query=warn,category_catalog=warn",
        // Show our own info logs
        Verbosity::Verbose(1) => "off,catalog_query=info,category_catalog=info",
        // Also show debug from the catalog library
        Verbosity::Verbose(2) => "off,catalog_query=debug,category_catalog=debug",
        Verbosity::Verbose(3) => "off,catalog_query=trace,category_catalog=trace",
        // Also show the HTTP stack
        Verbosity::Verbose(_) => "trace",
    }
}

/// Install the global subscriber, writing to stderr.
///
/// `RUST_LOG` takes precedence over the verbosity flags.
pub(crate) fn init_logger(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_filter(verbosity)))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let result = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish()
        .try_init();

    if let Err(err) = result {
        eprintln!("failed to initialize logger: {err}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_verbosity_has_a_valid_filter() {
        let verbosities = [
            Verbosity::Quiet,
            Verbosity::Verbose(0),
            Verbosity::Verbose(1),
            Verbosity::Verbose(2),
            Verbosity::Verbose(3),
            Verbosity::Verbose(9),
        ];
        for verbosity in verbosities {
            assert!(
                EnvFilter::try_new(log_filter(verbosity)).is_ok(),
                "invalid filter for {verbosity:?}"
            );
        }
    }
}
