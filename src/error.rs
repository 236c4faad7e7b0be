//! Error taxonomy shared by the session manager and the transaction flow

use thiserror::Error;

/// Which transaction of the two-step post failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxStep {
    Approve,
    Post,
}

impl std::fmt::Display for TxStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TxStep::Approve => write!(f, "approval"),
            TxStep::Post => write!(f, "bounty post"),
        }
    }
}

#[derive(Debug, Error)]
pub enum BountyError {
    /// The wallet SDK could not be constructed
    #[error("Failed to initialize wallet SDK")]
    SdkInit(String),

    #[error("SDK not ready yet")]
    NotInitialized,

    #[error("{0}")]
    Connection(String),

    #[error("No accounts returned")]
    NoAccounts,

    #[error("No account connected")]
    NoAccountConnected,

    #[error("No wallet provider available")]
    NoProvider,

    #[error("{0}")]
    Read(String),

    #[error("{0}")]
    Validation(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("A submission is already in progress")]
    Busy,

    /// A provider request failed while sending one of the two transactions
    #[error("{step} transaction failed: {message}")]
    Submission { step: TxStep, message: String },

    #[error("Transaction {0} was not included: {1}")]
    Inclusion(String, String),

    #[error("Transaction {0} reverted")]
    Reverted(String),

    #[error("Timed out after {secs}s waiting for transaction {tx_hash}")]
    Timeout { tx_hash: String, secs: u64 },

    /// JSON-RPC error object returned by a node or wallet
    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Abi(#[from] alloy_sol_types::Error),
}

impl BountyError {
    /// Wraps a provider failure with the step it happened in.
    pub fn submission(step: TxStep, err: BountyError) -> Self {
        BountyError::Submission {
            step,
            message: err.to_string(),
        }
    }

    /// JSON-RPC "method not found" / "unsupported method" codes
    pub fn is_unsupported_method(&self) -> bool {
        matches!(self, BountyError::Rpc { code, .. } if *code == -32601 || *code == 4200)
    }
}

pub type Result<T, E = BountyError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submission_message_names_step() {
        let err = BountyError::submission(
            TxStep::Post,
            BountyError::Rpc {
                code: -32000,
                message: "insufficient funds".to_string(),
            },
        );
        assert_eq!(
            err.to_string(),
            "bounty post transaction failed: RPC error -32000: insufficient funds"
        );
    }

    #[test]
    fn test_rpc_code_classification() {
        let unsupported = BountyError::Rpc {
            code: -32601,
            message: "method not found".to_string(),
        };
        assert!(unsupported.is_unsupported_method());

        let rejected = BountyError::Rpc {
            code: 4001,
            message: "User rejected the request.".to_string(),
        };
        assert!(!rejected.is_unsupported_method());
    }
}
