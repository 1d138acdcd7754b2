// Canonical little-endian layouts for Quottery contract responses and transaction inputs.
//
// Offsets follow C natural alignment, so 8-byte fields may be preceded by padding.
use crate::core::error::{Error, ErrorKind};
use crate::core::packed_date::PackedDate;
use crate::core::slots::{BettorKey, KEY_LEN};
use bstr::ByteSlice;

pub const MAX_OPTIONS: usize = 8;
pub const MAX_ORACLE_PROVIDERS: usize = 8;
pub const DESC_LEN: usize = 32;
pub const MAX_ACTIVE_BETS: usize = 1024;

pub const BASIC_INFO_LEN: usize = 152;
pub const BET_INFO_LEN: usize = 696;
pub const JOIN_BET_INPUT_LEN: usize = 16;
pub const ISSUE_BET_INPUT_LEN: usize = 600;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BasicInfo {
    pub fee_per_slot_per_hour: u64,
    /// Hundredths of a percent: 1234 is 12.34%.
    pub game_operator_fee: u64,
    pub shareholder_fee: u64,
    pub min_bet_slot_amount: u64,
    pub burn_fee: u64,
    pub n_issued_bet: u64,
    pub money_flow: u64,
    pub money_flow_through_issue_bet: u64,
    pub money_flow_through_join_bet: u64,
    pub money_flow_through_finalize_bet: u64,
    pub earned_amount_for_share_holder: u64,
    pub paid_amount_for_share_holder: u64,
    pub earned_amount_for_bet_winner: u64,
    pub distributed_amount: u64,
    pub burned_amount: u64,
    pub game_operator: BettorKey,
}

impl BasicInfo {
    pub fn decode(buf: &[u8]) -> Result<Self, Error> {
        ensure_len(buf, BASIC_INFO_LEN, "basic info")?;
        let mut words = [0u64; 15];
        for (index, word) in words.iter_mut().enumerate() {
            *word = read_u64(buf, index * 8);
        }
        let [
            fee_per_slot_per_hour,
            game_operator_fee,
            shareholder_fee,
            min_bet_slot_amount,
            burn_fee,
            n_issued_bet,
            money_flow,
            money_flow_through_issue_bet,
            money_flow_through_join_bet,
            money_flow_through_finalize_bet,
            earned_amount_for_share_holder,
            paid_amount_for_share_holder,
            earned_amount_for_bet_winner,
            distributed_amount,
            burned_amount,
        ] = words;
        Ok(Self {
            fee_per_slot_per_hour,
            game_operator_fee,
            shareholder_fee,
            min_bet_slot_amount,
            burn_fee,
            n_issued_bet,
            money_flow,
            money_flow_through_issue_bet,
            money_flow_through_join_bet,
            money_flow_through_finalize_bet,
            earned_amount_for_share_holder,
            paid_amount_for_share_holder,
            earned_amount_for_bet_winner,
            distributed_amount,
            burned_amount,
            game_operator: read_key(buf, 120),
        })
    }

    pub fn encode(&self) -> [u8; BASIC_INFO_LEN] {
        let mut buf = [0u8; BASIC_INFO_LEN];
        let words = [
            self.fee_per_slot_per_hour,
            self.game_operator_fee,
            self.shareholder_fee,
            self.min_bet_slot_amount,
            self.burn_fee,
            self.n_issued_bet,
            self.money_flow,
            self.money_flow_through_issue_bet,
            self.money_flow_through_join_bet,
            self.money_flow_through_finalize_bet,
            self.earned_amount_for_share_holder,
            self.paid_amount_for_share_holder,
            self.earned_amount_for_bet_winner,
            self.distributed_amount,
            self.burned_amount,
        ];
        for (index, word) in words.iter().enumerate() {
            write_u64(&mut buf, index * 8, *word);
        }
        buf[120..152].copy_from_slice(self.game_operator.as_bytes());
        buf
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BetInfoRecord {
    pub bet_id: u32,
    pub n_option: u32,
    pub creator: BettorKey,
    pub bet_desc: [u8; DESC_LEN],
    pub option_desc: [[u8; DESC_LEN]; MAX_OPTIONS],
    pub oracle_provider_id: [BettorKey; MAX_ORACLE_PROVIDERS],
    /// Hundredths of a percent per provider.
    pub oracle_fees: [u32; MAX_ORACLE_PROVIDERS],
    pub open_date: PackedDate,
    pub close_date: PackedDate,
    pub end_date: PackedDate,
    /// Amount per bet slot, despite the name used on the node.
    pub min_bet_amount: u64,
    pub max_bet_slot_per_option: u32,
    pub current_bet_state: [u32; MAX_OPTIONS],
    /// Option each voting provider chose; -1 when unset.
    pub bet_result_won_option: [i8; MAX_ORACLE_PROVIDERS],
    /// Provider index for the matching vote; -1 when unset.
    pub bet_result_op_id: [i8; MAX_ORACLE_PROVIDERS],
}

impl BetInfoRecord {
    pub fn decode(buf: &[u8]) -> Result<Self, Error> {
        ensure_len(buf, BET_INFO_LEN, "bet info")?;
        let mut option_desc = [[0u8; DESC_LEN]; MAX_OPTIONS];
        for (index, slot) in option_desc.iter_mut().enumerate() {
            let start = 72 + index * DESC_LEN;
            slot.copy_from_slice(&buf[start..start + DESC_LEN]);
        }
        let oracle_provider_id =
            std::array::from_fn(|index| read_key(buf, 328 + index * KEY_LEN));
        let oracle_fees = std::array::from_fn(|index| read_u32(buf, 584 + index * 4));
        let current_bet_state = std::array::from_fn(|index| read_u32(buf, 644 + index * 4));
        let bet_result_won_option = std::array::from_fn(|index| buf[676 + index] as i8);
        let bet_result_op_id = std::array::from_fn(|index| buf[684 + index] as i8);

        let mut bet_desc = [0u8; DESC_LEN];
        bet_desc.copy_from_slice(&buf[40..72]);

        Ok(Self {
            bet_id: read_u32(buf, 0),
            n_option: read_u32(buf, 4),
            creator: read_key(buf, 8),
            bet_desc,
            option_desc,
            oracle_provider_id,
            oracle_fees,
            open_date: PackedDate(read_u32(buf, 616)),
            close_date: PackedDate(read_u32(buf, 620)),
            end_date: PackedDate(read_u32(buf, 624)),
            min_bet_amount: read_u64(buf, 632),
            max_bet_slot_per_option: read_u32(buf, 640),
            current_bet_state,
            bet_result_won_option,
            bet_result_op_id,
        })
    }

    pub fn encode(&self) -> [u8; BET_INFO_LEN] {
        let mut buf = [0u8; BET_INFO_LEN];
        write_u32(&mut buf, 0, self.bet_id);
        write_u32(&mut buf, 4, self.n_option);
        buf[8..40].copy_from_slice(self.creator.as_bytes());
        buf[40..72].copy_from_slice(&self.bet_desc);
        for (index, desc) in self.option_desc.iter().enumerate() {
            let start = 72 + index * DESC_LEN;
            buf[start..start + DESC_LEN].copy_from_slice(desc);
        }
        for (index, key) in self.oracle_provider_id.iter().enumerate() {
            let start = 328 + index * KEY_LEN;
            buf[start..start + KEY_LEN].copy_from_slice(key.as_bytes());
        }
        for (index, fee) in self.oracle_fees.iter().enumerate() {
            write_u32(&mut buf, 584 + index * 4, *fee);
        }
        write_u32(&mut buf, 616, self.open_date.raw());
        write_u32(&mut buf, 620, self.close_date.raw());
        write_u32(&mut buf, 624, self.end_date.raw());
        write_u64(&mut buf, 632, self.min_bet_amount);
        write_u32(&mut buf, 640, self.max_bet_slot_per_option);
        for (index, state) in self.current_bet_state.iter().enumerate() {
            write_u32(&mut buf, 644 + index * 4, *state);
        }
        for index in 0..MAX_ORACLE_PROVIDERS {
            buf[676 + index] = self.bet_result_won_option[index] as u8;
            buf[684 + index] = self.bet_result_op_id[index] as u8;
        }
        buf
    }

    pub fn description(&self) -> String {
        fixed_str(&self.bet_desc)
    }

    /// Non-empty option descriptions in slot order.
    pub fn option_descriptions(&self) -> Vec<String> {
        self.option_desc
            .iter()
            .map(|desc| fixed_str(desc))
            .filter(|desc| !desc.is_empty())
            .collect()
    }

    /// Configured providers as `(slot index, key, fee)`; zero keys are skipped.
    pub fn oracle_providers(&self) -> Vec<(usize, BettorKey, u32)> {
        self.oracle_provider_id
            .iter()
            .zip(self.oracle_fees.iter())
            .enumerate()
            .filter(|(_, (key, _))| !key.is_empty())
            .map(|(index, (key, fee))| (index, *key, *fee))
            .collect()
    }

    /// Fill counts for the options the bet actually has.
    pub fn option_states(&self) -> &[u32] {
        let n = (self.n_option as usize).min(MAX_OPTIONS);
        &self.current_bet_state[..n]
    }
}

/// Decodes `count: u32` followed by `count` little-endian bet ids.
pub fn decode_active_bets(buf: &[u8]) -> Result<Vec<u32>, Error> {
    ensure_len(buf, 4, "active bets")?;
    let count = read_u32(buf, 0) as usize;
    if count > MAX_ACTIVE_BETS {
        return Err(Error::new(ErrorKind::Corrupt)
            .with_message(format!(
                "active bet count {count} exceeds {MAX_ACTIVE_BETS}"
            ))
            .with_offset(0));
    }
    ensure_len(buf, 4 + count * 4, "active bets")?;
    Ok((0..count).map(|index| read_u32(buf, 4 + index * 4)).collect())
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct JoinBetInput {
    pub bet_id: u32,
    pub number_of_slot: i32,
    pub option: u32,
}

impl JoinBetInput {
    pub fn encode(&self) -> [u8; JOIN_BET_INPUT_LEN] {
        let mut buf = [0u8; JOIN_BET_INPUT_LEN];
        write_u32(&mut buf, 0, self.bet_id);
        buf[4..8].copy_from_slice(&self.number_of_slot.to_le_bytes());
        write_u32(&mut buf, 8, self.option);
        buf
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IssueBetInput {
    pub bet_desc: [u8; DESC_LEN],
    pub option_desc: [[u8; DESC_LEN]; MAX_OPTIONS],
    pub oracle_provider_id: [BettorKey; MAX_ORACLE_PROVIDERS],
    pub oracle_fees: [u32; MAX_ORACLE_PROVIDERS],
    pub close_date: PackedDate,
    pub end_date: PackedDate,
    pub amount_per_slot: u64,
    pub max_bet_slot_per_option: u32,
    pub number_of_option: u32,
}

impl IssueBetInput {
    pub fn encode(&self) -> [u8; ISSUE_BET_INPUT_LEN] {
        let mut buf = [0u8; ISSUE_BET_INPUT_LEN];
        buf[0..32].copy_from_slice(&self.bet_desc);
        for (index, desc) in self.option_desc.iter().enumerate() {
            let start = 32 + index * DESC_LEN;
            buf[start..start + DESC_LEN].copy_from_slice(desc);
        }
        for (index, key) in self.oracle_provider_id.iter().enumerate() {
            let start = 288 + index * KEY_LEN;
            buf[start..start + KEY_LEN].copy_from_slice(key.as_bytes());
        }
        for (index, fee) in self.oracle_fees.iter().enumerate() {
            write_u32(&mut buf, 544 + index * 4, *fee);
        }
        write_u32(&mut buf, 576, self.close_date.raw());
        write_u32(&mut buf, 580, self.end_date.raw());
        write_u64(&mut buf, 584, self.amount_per_slot);
        write_u32(&mut buf, 592, self.max_bet_slot_per_option);
        write_u32(&mut buf, 596, self.number_of_option);
        buf
    }
}

/// Null-padded byte string to text; invalid UTF-8 is replaced, not rejected.
pub fn fixed_str(bytes: &[u8]) -> String {
    bytes.trim_end_with(|ch| ch == '\0').to_str_lossy().into_owned()
}

/// Copies `text` into a null-padded fixed field, failing if it does not fit.
pub fn fixed_field(text: &str, what: &str) -> Result<[u8; DESC_LEN], Error> {
    let bytes = text.as_bytes();
    if bytes.len() > DESC_LEN {
        return Err(Error::new(ErrorKind::Usage).with_message(format!(
            "{what} is {} bytes; at most {DESC_LEN} fit",
            bytes.len()
        )));
    }
    let mut out = [0u8; DESC_LEN];
    out[..bytes.len()].copy_from_slice(bytes);
    Ok(out)
}

fn ensure_len(buf: &[u8], need: usize, what: &str) -> Result<(), Error> {
    if buf.len() < need {
        return Err(Error::new(ErrorKind::Corrupt)
            .with_message(format!("{what} needs {need} bytes, got {}", buf.len()))
            .with_offset(buf.len() as u64));
    }
    Ok(())
}

fn read_key(buf: &[u8], offset: usize) -> BettorKey {
    let mut out = [0u8; KEY_LEN];
    out.copy_from_slice(&buf[offset..offset + KEY_LEN]);
    BettorKey(out)
}

fn read_u32(buf: &[u8], offset: usize) -> u32 {
    let mut out = [0u8; 4];
    out.copy_from_slice(&buf[offset..offset + 4]);
    u32::from_le_bytes(out)
}

fn read_u64(buf: &[u8], offset: usize) -> u64 {
    let mut out = [0u8; 8];
    out.copy_from_slice(&buf[offset..offset + 8]);
    u64::from_le_bytes(out)
}

fn write_u32(buf: &mut [u8], offset: usize, value: u32) {
    buf[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

fn write_u64(buf: &mut [u8], offset: usize, value: u64) {
    buf[offset..offset + 8].copy_from_slice(&value.to_le_bytes());
}
