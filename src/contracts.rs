//! Typed call encoders for the bounty and payment-token contracts

use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::{sol, SolCall};

use crate::error::BountyError;

sol! {
    /// ERC-20 allowance grant on the payment token
    function approve(address spender, uint256 amount) external returns (bool);

    /// Posts a bounty of `amount` token units for `questionId`
    function postBounty(uint256 amount, string questionId) external;

    /// Number of bounties posted so far
    function bountyCount() external view returns (uint256);
}

/// `approve(bounty_contract, allowance)` calldata for the token contract.
pub fn approve_calldata(spender: Address, allowance: U256) -> Bytes {
    approveCall {
        spender,
        amount: allowance,
    }
    .abi_encode()
    .into()
}

/// `postBounty(amount, question_id)` calldata with the string ABI-encoded as a
/// dynamic type (offset word, length word, padded bytes).
pub fn post_bounty_calldata(amount: U256, question_id: &str) -> Bytes {
    postBountyCall {
        amount,
        questionId: question_id.to_string(),
    }
    .abi_encode()
    .into()
}

/// The fixed-slot layout older clients produced: selector, amount word, then the
/// identifier bytes right-padded to a 32-byte boundary with no offset or length
/// word. Contracts decoding `string` reject or misread it, so it is never sent;
/// it only exists so the difference can be inspected.
pub fn legacy_post_bounty_calldata(amount: U256, question_id: &str) -> Bytes {
    let id = question_id.as_bytes();
    let padded_len = id.len().div_ceil(32).max(1) * 32;

    let mut data = Vec::with_capacity(4 + 32 + padded_len);
    data.extend_from_slice(&postBountyCall::SELECTOR);
    data.extend_from_slice(&amount.to_be_bytes::<32>());
    data.extend_from_slice(id);
    data.resize(4 + 32 + padded_len, 0);
    data.into()
}

pub fn bounty_count_calldata() -> Bytes {
    bountyCountCall {}.abi_encode().into()
}

/// Decodes the `uint256` returned by `bountyCount()`.
pub fn decode_bounty_count(data: &[u8]) -> Result<U256, BountyError> {
    if data.len() < 32 {
        return Err(BountyError::Decode(format!(
            "bountyCount() returned {} bytes, expected 32",
            data.len()
        )));
    }
    Ok(bountyCountCall::abi_decode_returns(data)?)
}
