//! The batch execution engine.
//!
//! One engine instance is long-lived and stateless between invocations
//! except for its nonce registry. `invoke` is the sole state-mutating
//! entrypoint: it validates the payload, binds the signature to a
//! principal, checks and advances the nonce, executes the calls in order
//! against the substrate, and enforces value conservation — committing
//! everything or nothing.

use crate::{
	nonce::NonceRegistry,
	policy::{DelegatedAuthorization, ExplicitSigner, PrincipalPolicy},
	typed_data::{MessageSchema, TypedData},
	InvokeError,
};
use alloy_primitives::{Address, B256, U256};
use invoker_host::{CallFrame, Chain, SharedChain};
use invoker_types::{BatchMessage, SignatureData};
use tokio::sync::Mutex;

/// The engine variants.
///
/// Each fixes a signing domain, a message schema and a principal-resolution
/// policy; the execution core is shared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvokerVariant {
	/// Explicit signer; the message declares `from`; array field `payload`.
	AccountAbstraction,
	/// Delegated authorization; the principal is implicit in the grant;
	/// array field `payload`.
	Transaction,
	/// Explicit signer; the message declares `from`; array field `payloads`.
	Batch,
}

impl InvokerVariant {
	/// Signing-domain name and version of this variant.
	fn domain(&self) -> (&'static str, &'static str) {
		match self {
			Self::AccountAbstraction => ("Account Abstraction Invoker", "1.0.0"),
			Self::Transaction => ("Transaction Invoker", "0.1.0"),
			Self::Batch => ("Batch Invoker", "1.0.0"),
		}
	}

	/// Message schema of this variant.
	fn schema(&self) -> MessageSchema {
		match self {
			Self::AccountAbstraction => MessageSchema {
				declares_principal: true,
				payload_field: "payload",
			},
			Self::Transaction => MessageSchema {
				declares_principal: false,
				payload_field: "payload",
			},
			Self::Batch => MessageSchema {
				declares_principal: true,
				payload_field: "payloads",
			},
		}
	}

	/// Principal-resolution policy of this variant.
	fn policy(&self) -> Box<dyn PrincipalPolicy> {
		match self {
			Self::Transaction => Box::new(DelegatedAuthorization),
			Self::AccountAbstraction | Self::Batch => Box::new(ExplicitSigner),
		}
	}

	/// Configuration name of this variant.
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::AccountAbstraction => "account_abstraction",
			Self::Transaction => "transaction",
			Self::Batch => "batch",
		}
	}
}

impl std::str::FromStr for InvokerVariant {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"account_abstraction" => Ok(Self::AccountAbstraction),
			"transaction" => Ok(Self::Transaction),
			"batch" => Ok(Self::Batch),
			other => Err(format!("unknown invoker variant: {}", other)),
		}
	}
}

impl std::fmt::Display for InvokerVariant {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Context the submitter provides alongside the signed message.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubmissionContext {
	/// The account submitting and funding the invocation. Never trusted
	/// for authorization.
	pub caller: Address,
	/// Native value attached to fund the batch. Must be fully consumed by
	/// the batch's calls.
	pub value: U256,
	/// The principal the calling context designates, for policies that
	/// accept delegated authority.
	pub authority: Option<Address>,
}

/// Receipt of a settled invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvokeReceipt {
	/// The principal the batch executed for.
	pub principal: Address,
	/// The nonce this invocation consumed.
	pub nonce: U256,
	/// Number of calls executed.
	pub calls: usize,
}

/// One engine instance.
pub struct Invoker {
	address: Address,
	typed: TypedData,
	policy: Box<dyn PrincipalPolicy>,
	chain: SharedChain,
	nonces: Mutex<NonceRegistry>,
}

impl Invoker {
	/// Creates an engine instance of the given variant at `address`.
	///
	/// The domain separator and type hashes are fixed here for the
	/// instance's lifetime.
	pub fn new(variant: InvokerVariant, chain_id: u64, address: Address, chain: SharedChain) -> Self {
		let (name, version) = variant.domain();
		Self::with_policy(
			name,
			version,
			chain_id,
			address,
			variant.schema(),
			variant.policy(),
			chain,
		)
	}

	/// Creates an engine instance with an explicit domain, schema and
	/// principal-resolution policy.
	pub fn with_policy(
		name: &str,
		version: &str,
		chain_id: u64,
		address: Address,
		schema: MessageSchema,
		policy: Box<dyn PrincipalPolicy>,
		chain: SharedChain,
	) -> Self {
		Self {
			address,
			typed: TypedData::new(name, version, chain_id, address, schema),
			policy,
			chain,
			nonces: Mutex::new(NonceRegistry::new()),
		}
	}

	/// This instance's own address on the substrate.
	pub fn address(&self) -> Address {
		self.address
	}

	/// The cached domain separator.
	pub fn domain_separator(&self) -> B256 {
		self.typed.domain_separator()
	}

	/// Type hash of the EIP-712 domain.
	pub fn eip712_domain_type_hash(&self) -> B256 {
		self.typed.domain_type_hash()
	}

	/// Type hash of this instance's message schema.
	pub fn transaction_type_hash(&self) -> B256 {
		self.typed.transaction_type_hash()
	}

	/// Type hash of a single payload element.
	pub fn transaction_payload_type_hash(&self) -> B256 {
		self.typed.payload_type_hash()
	}

	/// The message schema this instance hashes against.
	pub fn schema(&self) -> MessageSchema {
		self.typed.schema()
	}

	/// The digest a principal must sign to authorize `message` for this
	/// instance, under this instance's policy.
	pub fn signing_digest(&self, message: &BatchMessage) -> B256 {
		self.policy.digest(&self.typed, message)
	}

	/// Current nonce of `principal`; zero when never seen.
	pub async fn nonce_of(&self, principal: Address) -> U256 {
		self.nonces.lock().await.current(&principal)
	}

	/// Executes a signed batch.
	///
	/// All-or-nothing: any failure reverses every effect of this
	/// invocation, including the nonce advance and any value already moved.
	/// The attached value in `ctx` funds the batch and must be exactly
	/// consumed by its calls.
	pub async fn invoke(
		&self,
		signature: &SignatureData,
		message: &BatchMessage,
		ctx: SubmissionContext,
	) -> Result<InvokeReceipt, InvokeError> {
		if message.payload.is_empty() {
			return Err(InvokeError::EmptyPayload);
		}

		let principal = self.policy.resolve(&self.typed, message, signature, &ctx)?;

		// The write guard serializes whole invocations; it is also what
		// makes the nonce check-and-advance linearizable across racing
		// submissions for the same principal.
		let mut chain = self.chain.write().await;
		let mut nonces = self.nonces.lock().await;

		let prior_nonce = nonces.current(&principal);
		nonces.validate_and_advance(principal, message.nonce)?;

		let snapshot = chain.snapshot();

		match self.execute_batch(&mut chain, principal, message, &ctx) {
			Ok(()) => {
				tracing::info!(
					principal = %principal,
					nonce = %message.nonce,
					calls = message.payload.len(),
					"Batch settled"
				);
				Ok(InvokeReceipt {
					principal,
					nonce: message.nonce,
					calls: message.payload.len(),
				})
			},
			Err(err) => {
				chain.restore(snapshot);
				nonces.reset(principal, prior_nonce);
				tracing::debug!(principal = %principal, error = %err, "Batch reverted");
				Err(err)
			},
		}
	}

	/// Runs the funded call sequence and the closing conservation check.
	/// Mutates `chain` freely; the caller rolls back on error.
	fn execute_batch(
		&self,
		chain: &mut Chain,
		principal: Address,
		message: &BatchMessage,
		ctx: &SubmissionContext,
	) -> Result<(), InvokeError> {
		let balance_before = chain.balance_of(&self.address);

		// The sponsor's attached value funds the batch through the
		// engine's own account.
		chain
			.transfer(ctx.caller, self.address, ctx.value)
			.map_err(|err| InvokeError::CallFailed(err.to_string()))?;

		for payload in &message.payload {
			let frame = CallFrame {
				sender: principal,
				value: payload.value,
				gas_limit: payload.gas_limit,
				data: payload.data.clone(),
			};
			chain
				.execute(self.address, payload.to, frame)
				.map_err(|err| InvokeError::CallFailed(err.to_string()))?;
		}

		// Every unit the caller attached must have been forwarded to
		// exactly one call; nothing may stay trapped in the engine.
		let residual = chain.balance_of(&self.address).saturating_sub(balance_before);
		if !residual.is_zero() {
			return Err(InvokeError::ValueNotConserved { residual });
		}

		Ok(())
	}
}
