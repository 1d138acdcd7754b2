//! Purpose: Compose node queries, wire decoding and identity mapping into caller views.
//! Exports: `QuotteryClient`, `JoinBet`, `IssueBet`, `OracleSpec`, `ApiResult`.
//! Role: Stable Rust boundary over the external node library.
//! Invariants: Every response is decoded through `core::wire`; no field-by-field copies here.
//! Invariants: Failed bet fetches in `all_bets` are logged and reported, never fatal.
#![allow(clippy::result_large_err)]

use super::node::{ContractQuery, IdentityCodec, NodeClient, Transaction, TxReceipt, TxRequest};
use super::views::{
    BasicInfoView, BetSnapshot, BetView, BettorView, DateTimeView, OptionBettors, OracleView,
    percent,
};
use crate::core::error::{Error, ErrorKind};
use crate::core::oracle::{oracle_votes, resolve_outcome};
use crate::core::packed_date::{CalendarTimestamp, PackedDate};
use crate::core::slots::{BettorKey, MAX_BETTORS_PER_OPTION, SummaryOutcome, summarize};
use crate::core::wire::{
    BasicInfo, BetInfoRecord, DESC_LEN, IssueBetInput, JoinBetInput, MAX_OPTIONS,
    MAX_ORACLE_PROVIDERS, decode_active_bets, fixed_field,
};
use tracing::{debug, warn};

pub type ApiResult<T> = Result<T, Error>;

pub const DEFAULT_SCHEDULE_TICK_OFFSET: u32 = 5;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct JoinBet {
    pub bet_id: u32,
    pub option: u32,
    pub slots: i32,
    pub amount_per_slot: u64,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OracleSpec {
    pub identity: String,
    /// Hundredths of a percent: 1234 is 12.34%.
    pub fee_hundredths: u32,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IssueBet {
    pub description: String,
    pub options: Vec<String>,
    pub oracles: Vec<OracleSpec>,
    pub close: CalendarTimestamp,
    pub end: CalendarTimestamp,
    pub amount_per_slot: u64,
    pub max_slot_per_option: u32,
}

#[derive(Clone, Debug)]
pub struct QuotteryClient<N, I> {
    node: N,
    identities: I,
    schedule_tick_offset: u32,
    summary_capacity: usize,
}

impl<N: NodeClient, I: IdentityCodec> QuotteryClient<N, I> {
    pub fn new(node: N, identities: I) -> Self {
        Self {
            node,
            identities,
            schedule_tick_offset: DEFAULT_SCHEDULE_TICK_OFFSET,
            summary_capacity: MAX_BETTORS_PER_OPTION,
        }
    }

    pub fn with_schedule_tick_offset(mut self, ticks: u32) -> Self {
        self.schedule_tick_offset = ticks;
        self
    }

    pub fn with_summary_capacity(mut self, capacity: usize) -> Self {
        self.summary_capacity = capacity;
        self
    }

    pub fn node(&self) -> &N {
        &self.node
    }

    pub fn basic_info(&self) -> ApiResult<BasicInfoView> {
        let raw = self.fetch(&ContractQuery::BasicInfo)?;
        let info = BasicInfo::decode(&raw)?;
        Ok(BasicInfoView {
            fee_per_slot_per_hour: info.fee_per_slot_per_hour,
            game_operator_fee: percent(info.game_operator_fee),
            share_holder_fee: percent(info.shareholder_fee),
            min_bet_slot_amount: info.min_bet_slot_amount,
            burn_fee: percent(info.burn_fee),
            n_issued_bet: info.n_issued_bet,
            money_flow: info.money_flow,
            money_flow_through_issue_bet: info.money_flow_through_issue_bet,
            money_flow_through_join_bet: info.money_flow_through_join_bet,
            money_flow_through_finalize_bet: info.money_flow_through_finalize_bet,
            earned_amount_for_share_holder: info.earned_amount_for_share_holder,
            paid_amount_for_share_holder: info.paid_amount_for_share_holder,
            earned_amount_for_bet_winner: info.earned_amount_for_bet_winner,
            distributed_amount: info.distributed_amount,
            burned_amount: info.burned_amount,
            game_operator: self.identity(&info.game_operator)?,
        })
    }

    pub fn active_bets(&self) -> ApiResult<Vec<u32>> {
        let raw = self.fetch(&ContractQuery::ActiveBets)?;
        decode_active_bets(&raw)
    }

    pub fn bets_by_creator(&self, creator: &str) -> ApiResult<Vec<u32>> {
        let creator = self.identities.public_key_from_identity(creator)?;
        let raw = self.fetch(&ContractQuery::BetsByCreator { creator })?;
        decode_active_bets(&raw)
    }

    pub fn bet(&self, bet_id: u32) -> ApiResult<BetView> {
        let raw = self.fetch(&ContractQuery::BetInfo { bet_id })?;
        let record = BetInfoRecord::decode(&raw)?;
        self.bet_view(bet_id, &record)
    }

    pub fn all_bets(&self) -> ApiResult<BetSnapshot> {
        let ids = self.active_bets()?;
        debug!(count = ids.len(), "node listed active bets");

        let mut bets = Vec::with_capacity(ids.len());
        let mut failed = Vec::new();
        for bet_id in ids {
            match self.bet(bet_id) {
                Ok(view) => bets.push(view),
                Err(err) => {
                    warn!(bet_id, error = %err, "skipping bet; info fetch failed");
                    failed.push(bet_id);
                }
            }
        }

        let tick_number = if failed.is_empty() {
            match self.node.tick_number() {
                Ok(tick) => Some(tick),
                Err(err) => {
                    warn!(error = %err, "current tick number unavailable");
                    None
                }
            }
        } else {
            None
        };

        Ok(BetSnapshot {
            bets,
            failed,
            tick_number,
        })
    }

    pub fn option_bettors(&self, bet_id: u32, option: u32) -> ApiResult<OptionBettors> {
        let raw = self.fetch(&ContractQuery::BetOptionDetail { bet_id, option })?;
        let summary = match summarize(&raw, self.summary_capacity)? {
            SummaryOutcome::NoData => {
                debug!(bet_id, option, "option has no bettors yet");
                return Ok(OptionBettors::NoData);
            }
            SummaryOutcome::Summary(summary) => summary,
        };
        debug!(bet_id, option, bettors = summary.len(), "summarized option");

        let bettors = summary
            .entries
            .iter()
            .map(|entry| {
                Ok(BettorView {
                    identity: self.identity(&entry.owner)?,
                    slots: entry.slots,
                })
            })
            .collect::<ApiResult<Vec<_>>>()?;
        Ok(OptionBettors::Bettors(bettors))
    }

    pub fn join_bet(&self, seed: &str, join: &JoinBet) -> ApiResult<TxReceipt> {
        if join.slots <= 0 {
            return Err(Error::new(ErrorKind::Usage).with_message("slots must be positive"));
        }
        if join.option as usize >= MAX_OPTIONS {
            return Err(Error::new(ErrorKind::Usage)
                .with_message(format!("option {} out of range", join.option)));
        }
        let amount = join
            .amount_per_slot
            .checked_mul(join.slots as u64)
            .ok_or_else(|| Error::new(ErrorKind::Usage).with_message("bet amount overflows"))?;
        let tx = Transaction::JoinBet {
            input: JoinBetInput {
                bet_id: join.bet_id,
                number_of_slot: join.slots,
                option: join.option,
            },
            amount,
        };
        self.submit(seed, tx)
    }

    pub fn issue_bet(&self, seed: &str, issue: &IssueBet) -> ApiResult<TxReceipt> {
        let input = self.issue_input(issue)?;
        let tx = Transaction::IssueBet {
            input,
            amount: 0,
        };
        self.submit(seed, tx)
    }

    fn issue_input(&self, issue: &IssueBet) -> ApiResult<IssueBetInput> {
        if issue.options.len() < 2 || issue.options.len() > MAX_OPTIONS {
            return Err(Error::new(ErrorKind::Usage).with_message(format!(
                "a bet needs 2 to {MAX_OPTIONS} options, got {}",
                issue.options.len()
            )));
        }
        if issue.oracles.is_empty() || issue.oracles.len() > MAX_ORACLE_PROVIDERS {
            return Err(Error::new(ErrorKind::Usage).with_message(format!(
                "a bet needs 1 to {MAX_ORACLE_PROVIDERS} oracle providers, got {}",
                issue.oracles.len()
            )));
        }
        let close = issue.close.to_datetime()?;
        let end = issue.end.to_datetime()?;
        if end < close {
            return Err(Error::new(ErrorKind::Usage).with_message("end date precedes close date"));
        }

        let mut option_desc = [[0u8; DESC_LEN]; MAX_OPTIONS];
        for (slot, text) in option_desc.iter_mut().zip(&issue.options) {
            *slot = fixed_field(text, "option description")?;
        }
        let mut oracle_provider_id = [BettorKey::EMPTY; MAX_ORACLE_PROVIDERS];
        let mut oracle_fees = [0u32; MAX_ORACLE_PROVIDERS];
        for (index, oracle) in issue.oracles.iter().enumerate() {
            oracle_provider_id[index] = self
                .identities
                .public_key_from_identity(&oracle.identity)?;
            oracle_fees[index] = oracle.fee_hundredths;
        }

        Ok(IssueBetInput {
            bet_desc: fixed_field(&issue.description, "bet description")?,
            option_desc,
            oracle_provider_id,
            oracle_fees,
            close_date: PackedDate::from(issue.close),
            end_date: PackedDate::from(issue.end),
            amount_per_slot: issue.amount_per_slot,
            max_bet_slot_per_option: issue.max_slot_per_option,
            number_of_option: issue.options.len() as u32,
        })
    }

    fn submit(&self, seed: &str, tx: Transaction) -> ApiResult<TxReceipt> {
        let request = TxRequest {
            seed: seed.to_string(),
            tx,
            scheduled_tick_offset: self.schedule_tick_offset,
        };
        self.node.submit(&request).inspect_err(|err| {
            warn!(error = %err, input_type = request.tx.input_type(), "transaction not submitted");
        })
    }

    fn bet_view(&self, bet_id: u32, record: &BetInfoRecord) -> ApiResult<BetView> {
        let providers = record.oracle_providers();
        let votes = oracle_votes(
            providers.len(),
            &record.bet_result_won_option,
            &record.bet_result_op_id,
        );
        let oracles = providers
            .iter()
            .zip(votes.iter())
            .map(|((_, key, fee), vote)| {
                Ok(OracleView {
                    identity: self.identity(key)?,
                    fee: percent(u64::from(*fee)),
                    vote: *vote,
                })
            })
            .collect::<ApiResult<Vec<_>>>()?;

        Ok(BetView {
            bet_id,
            bet_desc: record.description(),
            no_options: record.n_option,
            creator: self.identity(&record.creator)?,
            amount_per_bet_slot: record.min_bet_amount,
            option_desc: record.option_descriptions(),
            current_bet_state: record.option_states().to_vec(),
            max_slot_per_option: record.max_bet_slot_per_option,
            open: DateTimeView::from(record.open_date),
            close: DateTimeView::from(record.close_date),
            end: DateTimeView::from(record.end_date),
            oracles,
            result: resolve_outcome(&votes),
        })
    }

    fn fetch(&self, query: &ContractQuery) -> ApiResult<Vec<u8>> {
        self.node.query(query).map_err(|err| {
            warn!(query = query.name(), error = %err, "contract query failed");
            err
        })
    }

    fn identity(&self, key: &BettorKey) -> ApiResult<String> {
        self.identities.identity_from_public_key(key)
    }
}
