use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use clap::Parser;
use color_eyre::eyre::Result;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use iur::application::dto::FailurePayload;
use iur::application::{BulkReplaceUseCase, ProcessPostUseCase};
use iur::domain::entities::{META_UPLOAD_STATUS, PostId};
use iur::domain::errors::ProcessError;
use iur::domain::ports::ContentStorePort;
use iur::infrastructure::{
    CliArgs, Command, FileFailureLog, HttpImageFetcher, JsonContentStore, StorageManager,
    build_image_host,
};

fn init_logging(args: &CliArgs) -> Result<()> {
    let level = args.log_level.unwrap_or_default();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .init();

    Ok(())
}

/// Prints the trigger surface's failure payload and exits non-zero.
fn exit_with_failure(e: &ProcessError) -> ! {
    let payload = FailurePayload::from(e);
    let body = serde_json::to_string_pretty(&payload)
        .unwrap_or_else(|_| format!("{{\"message\":\"{}\",\"code\":{}}}", payload.message, payload.code));
    eprintln!("{body}");
    std::process::exit(1);
}

fn failure_log(args: &CliArgs, storage: &StorageManager) -> Arc<FileFailureLog> {
    let path: PathBuf = args
        .log_path
        .clone()
        .unwrap_or_else(|| storage.default_log_path());
    let log = Arc::new(FileFailureLog::new(path));
    if !log.verify_writable() {
        warn!(
            path = %log.path().display(),
            "Failure log is not writable, entries will be dropped"
        );
    }
    log
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = CliArgs::parse();
    init_logging(&args)?;

    info!(version = iur::VERSION, "Starting IUR");

    let storage = StorageManager::new()?;
    let settings = storage.load_settings(args.config.as_deref())?;
    let failure_log = failure_log(&args, &storage);

    match args.command {
        Command::Process { post_id } => {
            let store = Arc::new(JsonContentStore::open(&args.catalog).await?);
            let host = match build_image_host(&settings) {
                Ok(host) => host,
                Err(e) => exit_with_failure(&e),
            };
            let fetcher = Arc::new(HttpImageFetcher::new(settings.fetch_timeout_secs)?);
            let processor = ProcessPostUseCase::new(store, host, fetcher, failure_log);

            match processor.execute(PostId::new(post_id), &settings).await {
                Ok(report) => println!("{}", serde_json::to_string_pretty(&report)?),
                Err(e) => exit_with_failure(&e),
            }
        }

        Command::Bulk { force } => {
            let store = Arc::new(JsonContentStore::open(&args.catalog).await?);
            let host = match build_image_host(&settings) {
                Ok(host) => host,
                Err(e) => exit_with_failure(&e),
            };
            let fetcher = Arc::new(HttpImageFetcher::new(settings.fetch_timeout_secs)?);
            let processor = Arc::new(ProcessPostUseCase::new(
                store.clone(),
                host,
                fetcher,
                failure_log,
            ));

            let cancel = Arc::new(AtomicBool::new(false));
            {
                let cancel = cancel.clone();
                tokio::spawn(async move {
                    if tokio::signal::ctrl_c().await.is_ok() {
                        info!("Cancellation requested, stopping at the next group boundary");
                        cancel.store(true, Ordering::SeqCst);
                    }
                });
            }

            let bulk = BulkReplaceUseCase::new(store, processor);
            match bulk.execute(&settings, force, &cancel).await {
                Ok(report) => println!("{}", serde_json::to_string_pretty(&report)?),
                Err(e) => exit_with_failure(&e),
            }
        }

        Command::Status { post_id } => {
            let store = Arc::new(JsonContentStore::open(&args.catalog).await?);
            match store.get_meta(PostId::new(post_id), META_UPLOAD_STATUS).await? {
                Some(status) => println!("{}", serde_json::to_string_pretty(&status)?),
                None => println!("null"),
            }
        }

        Command::ClearErrors => {
            failure_log.clear()?;
            info!(path = %failure_log.path().display(), "Failure log cleared");
        }
    }

    Ok(())
}
