use clap::Parser;
use fd_watcher::cli::Args;
use fd_watcher::inspector::ProcFs;
use fd_watcher::utils::logger::setup_logger;
use fd_watcher::watcher::watch;
use log::{error, info, warn};
use std::process::ExitCode;
use std::sync::Arc;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    setup_logger(args.verbosity());

    let inspector = Arc::new(ProcFs::default());
    let config = match args.into_run_config(inspector.as_ref()) {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    // The sampler itself cannot be cancelled; dropping its future is the only way out
    tokio::select! {
        result = watch(config, inspector) => match result {
            Ok(_) => {
                info!("Program ended successfully.");
                ExitCode::SUCCESS
            }
            Err(e) => {
                error!("{}", e);
                ExitCode::FAILURE
            }
        },
        _ = tokio::signal::ctrl_c() => {
            warn!("Interrupted before the run finished");
            ExitCode::from(130)
        }
    }
}
