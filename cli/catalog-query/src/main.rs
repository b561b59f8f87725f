use std::process::ExitCode;

use anyhow::Result;
use bpaf::ParseFailure;
use commands::CatalogQueryArgs;
use tracing::debug;

mod commands;
mod config;
mod logger;

async fn run(args: CatalogQueryArgs) -> Result<()> {
    let config = config::Config::parse(args.config.as_deref())?;
    args.handle(config).await
}

fn main() -> ExitCode {
    let args = match commands::catalog_query_args().run_inner(bpaf::Args::current_args()) {
        Ok(args) => args,
        // `--help` and completions
        Err(ParseFailure::Stdout(m, _)) => {
            print!("{m:80}");
            return ExitCode::from(0);
        },
        Err(ParseFailure::Completion(c)) => {
            print!("{c}");
            return ExitCode::from(0);
        },
        Err(ParseFailure::Stderr(m)) => {
            eprintln!("{m:80}");
            return ExitCode::from(1);
        },
    };

    logger::init_logger(args.verbosity);

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("ERROR: failed to start async runtime: {err}");
            return ExitCode::from(1);
        },
    };

    match runtime.block_on(run(args)) {
        Ok(()) => ExitCode::from(0),
        Err(e) => {
            debug!("{:#}", e);

            let err_str = e
                .chain()
                .skip(1)
                .fold(e.to_string(), |acc, cause| format!("{}: {}", acc, cause));

            eprintln!("ERROR: {err_str}");
            ExitCode::from(1)
        },
    }
}
