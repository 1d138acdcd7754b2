//! Purpose: Define the stable public Rust API boundary for the Quottery shim.
//! Exports: Client, capability traits, request carriers, and caller views.
//! Role: Public, additive-only surface used by the C ABI and Rust callers.
//! Invariants: Node access and identity derivation stay behind traits.
//! Invariants: Core codecs are re-exported here rather than reached through `core`.

mod client;
mod node;
mod views;

pub use crate::core::error::{Error, ErrorKind, to_status_code};
pub use crate::core::packed_date::{CalendarTimestamp, PackedDate, decode, encode};
pub use crate::core::slots::{
    BettorKey, BettorSlots, BettorSummary, SummaryOutcome, SummaryStatus, summarize,
};
pub use client::{
    ApiResult, DEFAULT_SCHEDULE_TICK_OFFSET, IssueBet, JoinBet, OracleSpec, QuotteryClient,
};
pub use node::{
    ContractQuery, IdentityCodec, NodeClient, QTRY_CONTRACT_INDEX, Transaction, TxReceipt,
    TxRequest,
};
pub use views::{
    BasicInfoView, BetSnapshot, BetView, BettorView, DateTimeView, OptionBettors, OracleView,
};
