//! Bounty transaction flow
//!
//! Reads the bounty counter for display and drives the two-transaction post:
//!
//! 1. `approve(bounty, allowance)` on the payment token
//! 2. wait for the approval to be included
//! 3. `postBounty(amount, questionId)` on the bounty contract
//! 4. refresh the counter
//!
//! Every dependency (reader, provider, inclusion watcher) is injected so each
//! step can be observed in isolation. Failures are recorded in the display
//! state and also returned to the caller.

use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::{Address, B256, U256};
use parking_lot::Mutex;
use tracing::{debug, error, info, warn};

use crate::amount::{format_units, parse_units};
use crate::config::{ApprovalConfig, Config};
use crate::contracts::{approve_calldata, post_bounty_calldata};
use crate::error::{BountyError, TxStep};
use crate::inclusion::InclusionWatcher;
use crate::provider::{TransactionRequest, WalletProvider};
use crate::reader::ContractReader;

/// Addresses and policies the flow needs
#[derive(Debug, Clone)]
pub struct FlowSettings {
    pub bounty: Address,
    pub token: Address,
    pub decimals: u8,
    pub approval: ApprovalConfig,
    pub inclusion_timeout: Duration,
}

impl FlowSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            bounty: config.contracts.bounty,
            token: config.contracts.token,
            decimals: config.token.decimals,
            approval: config.approval.clone(),
            inclusion_timeout: config.inclusion.timeout(),
        }
    }
}

/// Counter display state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterState {
    pub value: String,
    pub loading: bool,
    pub error: Option<String>,
}

impl Default for CounterState {
    fn default() -> Self {
        Self {
            value: "0".to_string(),
            loading: false,
            error: None,
        }
    }
}

/// Submission form state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionForm {
    pub amount: String,
    pub question_id: String,
    pub posting: bool,
    pub result: Option<String>,
    pub error: Option<String>,
}

/// Hashes and amounts of a completed post
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostReceipt {
    pub account: Address,
    pub approval_tx: B256,
    pub post_tx: B256,
    pub amount: U256,
    pub allowance: U256,
}

pub struct BountyFlow {
    reader: Arc<dyn ContractReader>,
    watcher: Arc<dyn InclusionWatcher>,
    provider: Mutex<Option<Arc<dyn WalletProvider>>>,
    settings: FlowSettings,
    counter: Mutex<CounterState>,
    form: Mutex<SubmissionForm>,
}

impl BountyFlow {
    pub fn new(
        reader: Arc<dyn ContractReader>,
        watcher: Arc<dyn InclusionWatcher>,
        settings: FlowSettings,
    ) -> Self {
        Self {
            reader,
            watcher,
            provider: Mutex::new(None),
            settings,
            counter: Mutex::new(CounterState::default()),
            form: Mutex::new(SubmissionForm::default()),
        }
    }

    pub fn with_provider(self, provider: Arc<dyn WalletProvider>) -> Self {
        self.set_provider(Some(provider));
        self
    }

    /// Inject (or remove) the wallet provider used for submissions
    pub fn set_provider(&self, provider: Option<Arc<dyn WalletProvider>>) {
        *self.provider.lock() = provider;
    }

    pub fn counter(&self) -> CounterState {
        self.counter.lock().clone()
    }

    pub fn form(&self) -> SubmissionForm {
        self.form.lock().clone()
    }

    pub fn set_amount(&self, amount: impl Into<String>) {
        self.form.lock().amount = amount.into();
    }

    pub fn set_question_id(&self, question_id: impl Into<String>) {
        self.form.lock().question_id = question_id.into();
    }

    /// Read `bountyCount()` into the counter state.
    ///
    /// On failure the previous value is kept and the error message is shown.
    pub async fn read_bounty_count(&self) -> Result<U256, BountyError> {
        {
            let mut counter = self.counter.lock();
            counter.loading = true;
            counter.error = None;
        }

        let result = self.reader.bounty_count().await;

        let mut counter = self.counter.lock();
        counter.loading = false;
        match &result {
            Ok(count) => {
                debug!("Bounty count is {}", count);
                counter.value = count.to_string();
            }
            Err(e) => {
                error!("Failed to read bounty count: {}", e);
                let message = e.to_string();
                counter.error = Some(if message.is_empty() {
                    "Failed to read".to_string()
                } else {
                    message
                });
            }
        }
        result
    }

    /// Post using the current form fields
    pub async fn submit(&self) -> Result<PostReceipt, BountyError> {
        let (amount, question_id) = {
            let form = self.form.lock();
            (form.amount.clone(), form.question_id.clone())
        };
        self.post_bounty(&amount, &question_id).await
    }

    /// Approve, wait for inclusion, post, then refresh the counter.
    ///
    /// The form fields are cleared only when both transactions were accepted.
    pub async fn post_bounty(
        &self,
        amount: &str,
        question_id: &str,
    ) -> Result<PostReceipt, BountyError> {
        {
            let mut form = self.form.lock();
            if form.posting {
                return Err(BountyError::Busy);
            }
            form.posting = true;
            form.result = None;
            form.error = None;
        }

        let outcome = self.run_post(amount, question_id).await;

        {
            let mut form = self.form.lock();
            form.posting = false;
            match &outcome {
                Ok(receipt) => {
                    form.result = Some(format!("Bounty posted: {}", receipt.post_tx));
                    form.amount.clear();
                    form.question_id.clear();
                }
                Err(e) => {
                    error!("Post bounty failed: {}", e);
                    form.error = Some(e.to_string());
                }
            }
        }

        if outcome.is_ok() {
            // The counter keeps its own error state
            let _ = self.read_bounty_count().await;
        }
        outcome
    }

    async fn run_post(&self, amount: &str, question_id: &str) -> Result<PostReceipt, BountyError> {
        let amount = amount.trim();
        let question_id = question_id.trim();
        if amount.is_empty() || question_id.is_empty() {
            return Err(BountyError::Validation(
                "Please fill in both fields".to_string(),
            ));
        }

        let settings = &self.settings;
        let units = parse_units(amount, settings.decimals)?;
        if units.is_zero() {
            return Err(BountyError::InvalidAmount(
                "amount must be greater than zero".to_string(),
            ));
        }

        let provider = self
            .provider
            .lock()
            .clone()
            .ok_or(BountyError::NoProvider)?;

        let accounts = provider.request_accounts().await?;
        let account = accounts
            .first()
            .copied()
            .ok_or(BountyError::NoAccountConnected)?;

        let allowance = settings.approval.allowance(units, settings.decimals)?;
        if allowance < units {
            warn!(
                "Allowance {} is below the posted amount {}",
                format_units(allowance, settings.decimals),
                format_units(units, settings.decimals)
            );
        }

        info!(
            "Approving {} units for {} from {}",
            allowance, settings.bounty, account
        );
        let approve = TransactionRequest {
            from: account,
            to: settings.token,
            data: approve_calldata(settings.bounty, allowance),
        };
        let approval_tx = provider
            .send_transaction(&approve)
            .await
            .map_err(|e| BountyError::submission(TxStep::Approve, e))?;
        info!("Approval sent: {}", approval_tx);
        self.form.lock().result = Some(format!("Approval sent: {}", approval_tx));

        self.watcher
            .await_inclusion(approval_tx, settings.inclusion_timeout)
            .await?;

        let post = TransactionRequest {
            from: account,
            to: settings.bounty,
            data: post_bounty_calldata(units, question_id),
        };
        let post_tx = provider
            .send_transaction(&post)
            .await
            .map_err(|e| BountyError::submission(TxStep::Post, e))?;
        info!("Bounty posted: {}", post_tx);

        Ok(PostReceipt {
            account,
            approval_tx,
            post_tx,
            amount: units,
            allowance,
        })
    }
}
