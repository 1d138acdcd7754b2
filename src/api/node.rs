//! Purpose: Describe the node-client and identity capabilities the shim consumes.
//! Exports: `NodeClient`, `IdentityCodec`, `ContractQuery`, `Transaction`, `TxRequest`, `TxReceipt`.
//! Role: Boundary to the external node library; this crate never implements it.
//! Invariants: Queries carry only the request bytes the contract expects (little endian).
//! Invariants: Responses are raw bytes; decoding happens in `core::wire`.

use super::ApiResult;
use crate::core::slots::BettorKey;
use crate::core::wire::{IssueBetInput, JoinBetInput};

/// Smart-contract index of Quottery on the ledger.
pub const QTRY_CONTRACT_INDEX: u32 = 2;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ContractQuery {
    BasicInfo,
    BetInfo { bet_id: u32 },
    BetOptionDetail { bet_id: u32, option: u32 },
    ActiveBets,
    BetsByCreator { creator: BettorKey },
}

impl ContractQuery {
    pub fn input_type(&self) -> u32 {
        match self {
            ContractQuery::BasicInfo => 1,
            ContractQuery::BetInfo { .. } => 2,
            ContractQuery::BetOptionDetail { .. } => 3,
            ContractQuery::ActiveBets => 4,
            ContractQuery::BetsByCreator { .. } => 5,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ContractQuery::BasicInfo => "GetBasicInfo",
            ContractQuery::BetInfo { .. } => "GetBetInfo",
            ContractQuery::BetOptionDetail { .. } => "GetBetOptionDetail",
            ContractQuery::ActiveBets => "GetActiveBet",
            ContractQuery::BetsByCreator { .. } => "GetBetByCreator",
        }
    }

    pub fn request_bytes(&self) -> Vec<u8> {
        match self {
            ContractQuery::BasicInfo | ContractQuery::ActiveBets => Vec::new(),
            ContractQuery::BetInfo { bet_id } => bet_id.to_le_bytes().to_vec(),
            ContractQuery::BetOptionDetail { bet_id, option } => {
                let mut out = bet_id.to_le_bytes().to_vec();
                out.extend_from_slice(&option.to_le_bytes());
                out
            }
            ContractQuery::BetsByCreator { creator } => creator.as_bytes().to_vec(),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Transaction {
    JoinBet { input: JoinBetInput, amount: u64 },
    IssueBet { input: IssueBetInput, amount: u64 },
}

impl Transaction {
    pub fn input_type(&self) -> u16 {
        match self {
            Transaction::IssueBet { .. } => 1,
            Transaction::JoinBet { .. } => 2,
        }
    }

    /// Amount transferred with the transaction.
    pub fn amount(&self) -> u64 {
        match self {
            Transaction::JoinBet { amount, .. } | Transaction::IssueBet { amount, .. } => *amount,
        }
    }

    pub fn payload(&self) -> Vec<u8> {
        match self {
            Transaction::JoinBet { input, .. } => input.encode().to_vec(),
            Transaction::IssueBet { input, .. } => input.encode().to_vec(),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TxRequest {
    pub seed: String,
    pub tx: Transaction,
    pub scheduled_tick_offset: u32,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TxReceipt {
    pub tx_hash: String,
    pub tick: u32,
}

/// Session with a ledger node; connection handling and retries belong to the implementor.
pub trait NodeClient {
    fn query(&self, query: &ContractQuery) -> ApiResult<Vec<u8>>;

    fn tick_number(&self) -> ApiResult<u32>;

    fn submit(&self, request: &TxRequest) -> ApiResult<TxReceipt>;
}

/// Mapping between public keys and the human-readable identities shown to users.
pub trait IdentityCodec {
    fn identity_from_public_key(&self, key: &BettorKey) -> ApiResult<String>;

    fn public_key_from_identity(&self, identity: &str) -> ApiResult<BettorKey>;
}

#[cfg(test)]
mod tests {
    use super::{ContractQuery, Transaction};
    use crate::core::slots::BettorKey;
    use crate::core::wire::JoinBetInput;

    #[test]
    fn query_request_bytes_are_little_endian() {
        let query = ContractQuery::BetOptionDetail {
            bet_id: 52,
            option: 1,
        };
        assert_eq!(query.input_type(), 3);
        assert_eq!(query.request_bytes(), vec![52, 0, 0, 0, 1, 0, 0, 0]);
        assert!(ContractQuery::ActiveBets.request_bytes().is_empty());
        assert_eq!(
            ContractQuery::BetsByCreator {
                creator: BettorKey([7; 32])
            }
            .request_bytes()
            .len(),
            32
        );
    }

    #[test]
    fn join_transaction_carries_amount_and_payload() {
        let tx = Transaction::JoinBet {
            input: JoinBetInput {
                bet_id: 1,
                number_of_slot: 2,
                option: 0,
            },
            amount: 500,
        };
        assert_eq!(tx.amount(), 500);
        assert_eq!(tx.input_type(), 2);
        assert_eq!(tx.payload().len(), 16);
    }
}
