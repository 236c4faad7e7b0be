//! Base Bounty Q&A - post bounties on Base Sepolia
//!
//! A small client for the Base Bounty contract. It reads the public bounty
//! counter and posts new bounties through a connected wallet.
//!
//! # How it works
//!
//! 1. [`session::WalletSession`] asks the wallet for account authorization
//! 2. [`flow::BountyFlow`] reads `bountyCount()` for display
//! 3. Posting sends `approve(bounty, allowance)` to the payment token
//! 4. Once the approval is included, `postBounty(amount, questionId)` is sent
//! 5. The counter is refreshed
//!
//! # Notes
//!
//! - Calldata is produced by typed `sol!` encoders, including the dynamic
//!   `string` argument of `postBounty`
//! - The approval amount is an explicit [`config::ApprovalPolicy`]
//! - Waiting between the two transactions goes through an
//!   [`inclusion::InclusionWatcher`] with a timeout

pub mod amount;
pub mod config;
pub mod contracts;
pub mod error;
pub mod flow;
pub mod inclusion;
pub mod provider;
pub mod reader;
pub mod rpc;
pub mod session;

pub use amount::{format_units, parse_units};
pub use config::{ApprovalPolicy, Config, InclusionMode};
pub use error::{BountyError, TxStep};
pub use flow::{BountyFlow, CounterState, FlowSettings, PostReceipt, SubmissionForm};
pub use inclusion::{FixedDelay, Inclusion, InclusionWatcher, ReceiptPoller};
pub use provider::{HttpWalletProvider, TransactionRequest, WalletProvider};
pub use reader::{ContractReader, RpcContractReader};
pub use rpc::RpcClient;
pub use session::{ConnectionState, HttpWalletSdkFactory, WalletSession};
