use anyhow::Context;
use bank_orchestrator::app::bootstrap::build_registry;
use bank_orchestrator::app::config::Config;
use bank_orchestrator::models::NormalizedPayment;
use bank_orchestrator::queue::payment_queue::create_queue;
use bank_orchestrator::repository::memory::{InMemoryBatchRepository, InMemoryStatusRepository};
use bank_orchestrator::repository::{BatchRepositoryRef, StatusRepository, StatusRepositoryRef};
use bank_orchestrator::services::{AggregationService, BatchReconciler, BatchSubmissionService, PaymentConsumer};
use clap::{Parser, Subcommand};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Aggregates banking providers and submits payments", long_about = None)]
struct Cli {
    /// TOML configuration file. Environment variables are used when absent.
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List accounts of every provider
    Accounts,
    /// List transactions of every provider
    Transactions,
    /// Submit payments from a JSON file mapping provider to payment list
    Pay {
        file: PathBuf,

        /// Push directly instead of going through the queue
        #[arg(long)]
        sync: bool,

        /// How long to wait for the batch to be reconciled
        #[arg(long, default_value_t = 60)]
        wait_secs: u64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::from_env(),
    };

    let statuses: StatusRepositoryRef = Arc::new(InMemoryStatusRepository::new());
    let batches: BatchRepositoryRef = Arc::new(InMemoryBatchRepository::new());
    let registry = build_registry(&config, statuses.clone())?;
    let aggregation = AggregationService::new(registry.clone());

    match cli.command {
        Command::Accounts => {
            let accounts = aggregation.collect_accounts().await?;
            println!("{}", serde_json::to_string_pretty(&accounts)?);
        }
        Command::Transactions => {
            let transactions = aggregation.collect_transactions().await?;
            println!("{}", serde_json::to_string_pretty(&transactions)?);
        }
        Command::Pay { file, sync, wait_secs } => {
            let content = std::fs::read_to_string(&file).with_context(|| format!("reading {}", file.display()))?;
            let params: HashMap<String, Option<Vec<NormalizedPayment>>> =
                serde_json::from_str(&content).context("decoding payment request")?;
            let params: HashMap<String, Vec<NormalizedPayment>> = params
                .into_iter()
                .map(|(provider, payments)| (provider, payments.unwrap_or_default()))
                .collect();

            if sync {
                let responses = aggregation.initiate_payment_requests(params).await?;
                println!("{}", serde_json::to_string_pretty(&responses)?);
                println!("{}", serde_json::to_string_pretty(&statuses.find_all().await?)?);
                return Ok(());
            }

            let (publisher, receiver) = create_queue(config.consumer.queue_buffer_size);
            let consumer = Arc::new(PaymentConsumer::new(
                registry.clone(),
                BatchReconciler::new(batches.clone(), statuses.clone()),
            ));
            let workers = consumer.spawn_workers(receiver, config.consumer.workers);

            let submission = BatchSubmissionService::new(batches.clone(), statuses.clone(), publisher);
            let receipt = submission.submit(params).await?;
            info!("Queued batch {} with {} payments", receipt.batch_id, receipt.total_payments);

            let deadline = Instant::now() + Duration::from_secs(wait_secs);
            loop {
                let (batch, _) = submission.batch_status(receipt.batch_id).await?;
                if batch.is_complete() {
                    break;
                }
                if Instant::now() >= deadline {
                    warn!(
                        "Batch {} not complete after {}s: {}/{}",
                        batch.id, wait_secs, batch.processed_payments, batch.total_payments
                    );
                    break;
                }
                sleep(Duration::from_millis(200)).await;
            }

            let (batch, records) = submission.batch_status(receipt.batch_id).await?;
            println!("{}", serde_json::to_string_pretty(&batch)?);
            println!("{}", serde_json::to_string_pretty(&records)?);

            drop(submission);
            for worker in workers {
                worker.await?;
            }
        }
    }

    Ok(())
}
