//! Main entry point for the giftlock command-line interface.
//!
//! This binary wires the gifting engine together from a TOML configuration
//! file and exposes the batch pipeline as subcommands: print the batch
//! template, validate a batch file, send a validated batch, or inspect a
//! stored gift and its derived status.

use alloy_primitives::U256;
use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use giftlock_approvals::ApprovalManager;
use giftlock_batch::{template_table, AssetTemplate, BatchParser};
use giftlock_config::Config;
use giftlock_core::{BatchEngine, BatchHandle, EventBus};
use giftlock_resolver::{
	implementations::registry::RegistryLookup, ResolverOptions, ResolverService,
};
use giftlock_session::{SessionInterface, SessionService};
use giftlock_types::utils::current_timestamp;
use giftlock_types::{
	format_units, BatchEvent, BatchSummary, BulkEntry, EntryEvent, EntryStatus, GiftlockEvent,
	NATIVE_DECIMALS,
};
use giftlock_vault::VaultClient;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::time::Duration;

/// Command-line arguments for the giftlock CLI.
#[derive(Parser, Debug)]
#[command(name = "giftlock", author, version, about = "Time-locked gifting engine", long_about = None)]
struct Cli {
	/// Log level (trace, debug, info, warn, error)
	#[arg(short, long, default_value = "info")]
	log_level: String,

	#[command(subcommand)]
	command: Command,
}

/// Subcommands exposed by the giftlock binary.
#[derive(Subcommand, Debug)]
enum Command {
	/// Print the batch template table to stdout.
	Template,
	/// Parse and validate a batch file without sending anything.
	Validate(BatchArgs),
	/// Validate a batch file, then send every valid entry in order.
	Send(BatchArgs),
	/// Look up a stored gift and show its derived status.
	Status {
		/// Gift id assigned by the vault.
		#[arg(long)]
		gift_id: String,
		/// Path to the configuration file.
		#[arg(short, long)]
		config: PathBuf,
	},
}

/// Shared arguments for the validate and send subcommands.
#[derive(clap::Args, Debug)]
struct BatchArgs {
	/// Path to the batch file.
	#[arg(short, long)]
	file: PathBuf,
	/// Path to the configuration file.
	#[arg(short, long)]
	config: PathBuf,
	/// Symbol of a configured ERC-20 to gift instead of the native coin.
	#[arg(long)]
	token: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();

	// Initialize tracing with env filter
	use tracing_subscriber::{fmt, EnvFilter};
	let env_filter = EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| EnvFilter::new(cli.log_level.clone()));
	fmt().with_env_filter(env_filter).with_target(true).init();

	match cli.command {
		Command::Template => {
			println!("{}", template_table());
			Ok(())
		},
		Command::Validate(args) => validate(args).await,
		Command::Send(args) => send(args).await,
		Command::Status { gift_id, config } => status(&gift_id, &config).await,
	}
}

/// Loads configuration from the given path.
async fn load_config(path: &PathBuf) -> anyhow::Result<Config> {
	let path = path
		.to_str()
		.ok_or_else(|| anyhow!("Configuration path is not valid UTF-8"))?;
	let config = Config::from_file(path)
		.await
		.with_context(|| format!("Failed to load configuration from {}", path))?;
	tracing::info!("Loaded configuration [{}]", config.gifting.id);
	Ok(config)
}

/// Builds the per-chain session service from configuration.
fn build_sessions(config: &Config) -> anyhow::Result<Arc<SessionService>> {
	let factories: HashMap<&str, giftlock_session::SessionFactory> =
		giftlock_session::get_all_implementations()
			.into_iter()
			.collect();
	let factory = factories
		.get(config.session.primary.as_str())
		.ok_or_else(|| {
			anyhow!(
				"Unknown session implementation '{}'",
				config.session.primary
			)
		})?;
	let impl_config = config
		.session
		.implementations
		.get(&config.session.primary)
		.ok_or_else(|| {
			anyhow!(
				"No configuration for session implementation '{}'",
				config.session.primary
			)
		})?;

	let mut implementations: HashMap<u64, Arc<dyn SessionInterface>> = HashMap::new();
	for (chain_id, network) in &config.networks {
		let session = factory(impl_config, *chain_id, network)
			.with_context(|| format!("Failed to create session for chain {}", chain_id))?;
		implementations.insert(*chain_id, Arc::from(session));
	}

	Ok(Arc::new(SessionService::new(
		implementations,
		config.gifting.min_confirmations,
		config.gifting.confirmation_timeout_seconds,
	)))
}

/// Builds the full engine stack over the configured services.
fn build_engine(config: &Config) -> anyhow::Result<Arc<BatchEngine>> {
	let session = build_sessions(config)?;

	let lookup = Arc::new(RegistryLookup::new(
		session.clone(),
		config.resolver.canonical_chain_id,
		config.resolver.registry_address.clone(),
	));
	let resolver = Arc::new(ResolverService::new(
		lookup,
		ResolverOptions {
			alias_suffix: config.resolver.alias_suffix.clone(),
			cache_ttl: Duration::from_secs(config.resolver.cache_ttl_seconds),
			fallback: config.resolver.fallback.clone(),
		},
	));
	let approvals = Arc::new(ApprovalManager::new(session.clone()));
	let vault = Arc::new(VaultClient::new(session.clone(), config.networks.clone()));

	Ok(Arc::new(BatchEngine::new(
		resolver,
		approvals,
		session,
		vault,
		config.gifting.default_chain_id,
		config.batch.validation_concurrency,
		EventBus::new(256),
	)))
}

/// Picks the asset template every row of the batch gifts.
fn asset_template(config: &Config, token: Option<&str>) -> anyhow::Result<AssetTemplate> {
	let Some(symbol) = token else {
		return Ok(AssetTemplate::Native);
	};
	let network = config
		.networks
		.get(&config.gifting.default_chain_id)
		.ok_or_else(|| {
			anyhow!(
				"Default chain {} not found in networks config",
				config.gifting.default_chain_id
			)
		})?;
	let token = network.token_by_symbol(symbol).ok_or_else(|| {
		anyhow!(
			"Token '{}' is not configured on chain {}",
			symbol,
			config.gifting.default_chain_id
		)
	})?;
	Ok(AssetTemplate::Fungible {
		token: token.address.clone(),
		decimals: token.decimals,
	})
}

/// Parses the batch file and runs the validation phase.
async fn load_and_validate(
	args: &BatchArgs,
	config: &Config,
	engine: &BatchEngine,
) -> anyhow::Result<BatchSummary> {
	let content = tokio::fs::read_to_string(&args.file)
		.await
		.with_context(|| format!("Failed to read batch file {}", args.file.display()))?;
	let template = asset_template(config, args.token.as_deref())?;
	let parser = BatchParser::new(template, config.resolver.alias_suffix.clone());
	let outcome = parser.parse(&content);

	let report = engine.load(outcome).await?;
	for warning in &report.warnings {
		println!("warning: {}", warning);
	}
	for error in &report.errors {
		println!("error: {}", error);
	}
	if report.accepted == 0 {
		return Err(anyhow!("Batch file produced no usable entries"));
	}

	let summary = engine.validate_all().await?;
	Ok(summary)
}

/// Runs the validate subcommand.
async fn validate(args: BatchArgs) -> anyhow::Result<()> {
	let config = load_config(&args.config).await?;
	let engine = build_engine(&config)?;
	let summary = load_and_validate(&args, &config, &engine).await?;

	print_entries(&engine.entries().await);
	print_summary(&summary);
	Ok(())
}

/// Runs the send subcommand: validate, then sequential send with
/// streaming progress. Ctrl-C stops the batch before the next entry;
/// the entry in flight always completes.
async fn send(args: BatchArgs) -> anyhow::Result<()> {
	let config = load_config(&args.config).await?;
	let engine = build_engine(&config)?;
	let summary = load_and_validate(&args, &config, &engine).await?;
	print_entries(&engine.entries().await);

	if summary.valid == 0 {
		print_summary(&summary);
		return Err(anyhow!("No valid entries to send"));
	}

	let progress = {
		let mut events = engine.subscribe();
		tokio::spawn(async move {
			while let Ok(event) = events.recv().await {
				match event {
					GiftlockEvent::Entry(EntryEvent::StatusChanged {
						row,
						status: EntryStatus::Sending,
						..
					}) => {
						println!("row {}: sending...", row);
					},
					GiftlockEvent::Entry(EntryEvent::StatusChanged {
						row,
						status: EntryStatus::Failed,
						error,
						..
					}) => {
						println!(
							"row {}: failed ({})",
							row,
							error.unwrap_or_else(|| "unknown error".to_string())
						);
					},
					GiftlockEvent::Entry(EntryEvent::Sent { row, tx_hash, .. }) => {
						println!("row {}: sent in tx {}", row, tx_hash);
					},
					GiftlockEvent::Batch(BatchEvent::Cancelled) => {
						println!("cancelled; remaining entries were not started");
					},
					_ => {},
				}
			}
		})
	};

	let handle = BatchHandle::new();
	{
		let handle = handle.clone();
		tokio::spawn(async move {
			if tokio::signal::ctrl_c().await.is_ok() {
				tracing::info!("Ctrl-C received, stopping before the next entry");
				handle.cancel();
			}
		});
	}

	let summary = engine.send_all(&handle).await?;
	progress.abort();

	print_entries(&engine.entries().await);
	print_summary(&summary);
	if summary.failed > 0 {
		return Err(anyhow!("{} entries failed to send", summary.failed));
	}
	Ok(())
}

/// Runs the status subcommand.
async fn status(gift_id: &str, config_path: &PathBuf) -> anyhow::Result<()> {
	let config = load_config(config_path).await?;
	let session = build_sessions(&config)?;
	let vault = VaultClient::new(session, config.networks.clone());

	let id = match gift_id.strip_prefix("0x") {
		Some(hex_id) => U256::from_str_radix(hex_id, 16),
		None => U256::from_str_radix(gift_id, 10),
	}
	.map_err(|_| anyhow!("Invalid gift id '{}'", gift_id))?;

	let chain_id = config.gifting.default_chain_id;
	let record = vault
		.get_gift(chain_id, id)
		.await?
		.ok_or_else(|| anyhow!("Gift {} not found on chain {}", gift_id, chain_id))?;

	println!("gift {}", record.id);
	println!("  sender:    {}", record.sender);
	println!("  recipient: {}", record.recipient);
	println!("  asset:     {}", record.asset_kind);
	if let Some(token) = &record.token {
		println!("  token:     {}", token);
	}
	if let Some(token_id) = &record.token_id {
		println!("  token id:  {}", token_id);
	}
	// Token amounts stay in base units; only the native coin has a
	// decimal count known without an extra token lookup.
	let amount = match record.asset_kind {
		giftlock_types::AssetKind::Native => format_units(record.amount, NATIVE_DECIMALS),
		_ => record.amount.to_string(),
	};
	println!("  amount:    {}", amount);
	println!("  unlocks:   {}", record.unlock_timestamp);
	if !record.message.is_empty() {
		println!("  message:   {}", record.message);
	}
	println!("  status:    {}", record.status(current_timestamp()));
	Ok(())
}

/// Prints a per-entry outcome table.
fn print_entries(entries: &[BulkEntry]) {
	for entry in entries {
		let recipient = entry.intent.recipient.as_input();
		let amount = entry.intent.asset.amount_str();
		match (&entry.status, &entry.error) {
			(EntryStatus::Invalid | EntryStatus::Failed, Some(error)) => {
				println!(
					"row {}: {} {} -> {} ({})",
					entry.row, recipient, amount, entry.status, error
				);
			},
			_ => {
				println!(
					"row {}: {} {} -> {}",
					entry.row, recipient, amount, entry.status
				);
			},
		}
	}
}

/// Prints the batch summary.
fn print_summary(summary: &BatchSummary) {
	println!(
		"summary: {} entries, {} valid, {} invalid, {} sent, {} failed",
		summary.total, summary.valid, summary.invalid, summary.sent, summary.failed
	);
	println!(
		"         total amount {}, estimated fee {}",
		summary.total_amount, summary.estimated_fee
	);
}
