//! Demo entry point for the batch invoker.
//!
//! Builds an in-memory substrate, places an engine variant and a mock
//! callee on it (reusing a previously recorded deployment when one exists),
//! then signs and submits a sponsored two-call batch and logs the outcome.
//! The scripted scenario is the bundling flow: two value-carrying increments
//! against the mock, funded entirely by the sponsor's attached value.

use clap::Parser;
use invoker_config::Config;
use invoker_engine::{Invoker, InvokerVariant, SubmissionContext};
use invoker_host::{
	implementations::mock::{self, MockCallee, INCREMENT_SELECTOR},
	SharedChain,
};
use invoker_signer::{implementations::local::LocalSigner, SigningService};
use invoker_store::{implementations::file::FileStore, DeploymentRecord, TrackingService};
use invoker_types::{BatchMessage, CallPayload};

use alloy_primitives::{Address, Bytes, U256};
use std::path::PathBuf;

/// Command-line arguments for the invoker demo.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
	/// Path to configuration file
	#[arg(short, long, default_value = "config.toml")]
	config: PathBuf,

	/// Log level (trace, debug, info, warn, error)
	#[arg(short, long, default_value = "info")]
	log_level: String,
}

/// Well-known demo addresses on the in-memory substrate.
fn demo_address(tag: u8) -> Address {
	let mut bytes = [0u8; 20];
	bytes[19] = tag;
	Address::from(bytes)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	// Initialize tracing with env filter
	use tracing_subscriber::{fmt, EnvFilter};

	let default_directive = args.log_level.to_string();
	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

	fmt().with_env_filter(env_filter).with_target(true).init();

	tracing::info!("Started invoker demo");

	let config = Config::from_file(&args.config)?;
	let variant: InvokerVariant = config.invoker.variant.parse()?;
	let chain_id = config.invoker.chain_id;
	tracing::info!("Loaded configuration [{} on chain {}]", variant, chain_id);

	// Reuse the recorded deployment when one matches; set up fresh otherwise.
	let tracking = TrackingService::new(Box::new(FileStore::new(&config.store.path)));
	let (invoker_address, mock_address) =
		match tracking.reusable(chain_id, config.store.redeploy).await {
			Some(record) => {
				tracing::info!("Reusing recorded deployment at {}", record.invoker);
				(record.invoker, record.mock)
			},
			None => {
				let record = DeploymentRecord {
					chain_id,
					invoker: demo_address(0x10),
					mock: demo_address(0x20),
				};
				tracking.remember(&record).await?;
				tracing::info!("Recorded fresh deployment at {}", record.invoker);
				(record.invoker, record.mock)
			},
		};

	let chain = SharedChain::default();
	chain.register(mock_address, Box::new(MockCallee::new())).await;
	let invoker = Invoker::new(variant, chain_id, invoker_address, chain.clone());

	// The principal signs; a separately funded sponsor submits.
	let signer = SigningService::new(Box::new(LocalSigner::from_hex_key(
		&config.signer.private_key,
	)?));
	let principal = signer.address();
	let sponsor = demo_address(0x30);
	chain.fund(sponsor, U256::from(1_000u64)).await;

	let increment = |value: u64| CallPayload {
		to: mock_address,
		value: U256::from(value),
		gas_limit: U256::from(1_000_000u64),
		data: Bytes::from(INCREMENT_SELECTOR.to_vec()),
	};

	let message = BatchMessage {
		from: invoker.schema().declares_principal.then_some(principal),
		nonce: invoker.nonce_of(principal).await,
		payload: vec![increment(1), increment(1)],
	};
	let signature = signer.sign_digest(&invoker.signing_digest(&message)).await?;

	let receipt = invoker
		.invoke(
			&signature,
			&message,
			SubmissionContext {
				caller: sponsor,
				value: U256::from(2u64),
				authority: None,
			},
		)
		.await?;

	tracing::info!(
		principal = %receipt.principal,
		nonce = %receipt.nonce,
		calls = receipt.calls,
		"Batch settled"
	);

	{
		let world = chain.read().await;
		if let Some(state) = mock::state_of(&world, &mock_address) {
			tracing::info!(
				counter = %state.counter(),
				balance = %world.balance_of(&mock_address),
				"Mock callee state"
			);
		}
	}
	tracing::info!(
		sponsor_balance = %chain.balance_of(sponsor).await,
		next_nonce = %invoker.nonce_of(principal).await,
		"Stopped invoker demo"
	);

	Ok(())
}
