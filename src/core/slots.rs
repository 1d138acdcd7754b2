//! Purpose: Collapse a bet option's raw bettor table into per-owner slot counts.
//! Exports: `BettorKey`, `BettorSlots`, `BettorSummary`, `SummaryOutcome`, `summarize`.
//! Role: Backs the "bet option detail" summary returned to C and Rust callers.
//! Invariants: Output order is each owner's first index in the raw scan.
//! Invariants: All-zero tables report `NoData`; too many owners is an `Overflow` error.
use crate::core::error::{Error, ErrorKind};
use crate::core::tally::OrderedTally;
use serde::Serialize;
use std::fmt;

pub const KEY_LEN: usize = 32;
pub const MAX_BETTORS_PER_OPTION: usize = 1024;
pub const SLOT_TABLE_LEN: usize = KEY_LEN * MAX_BETTORS_PER_OPTION;

/// 32-byte public key of a bettor; all zeroes marks an unused slot.
#[derive(Clone, Copy, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub struct BettorKey(pub [u8; KEY_LEN]);

impl BettorKey {
    pub const EMPTY: BettorKey = BettorKey([0u8; KEY_LEN]);

    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        let bytes: [u8; KEY_LEN] = bytes.try_into().ok()?;
        Some(Self(bytes))
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|byte| *byte == 0)
    }

    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl fmt::Debug for BettorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BettorKey(")?;
        for byte in &self.0[..4] {
            write!(f, "{byte:02x}")?;
        }
        write!(f, "..)")
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct BettorSlots {
    pub owner: BettorKey,
    pub slots: u32,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct BettorSummary {
    pub entries: Vec<BettorSlots>,
}

impl BettorSummary {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_slots(&self) -> u64 {
        self.entries.iter().map(|entry| u64::from(entry.slots)).sum()
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryStatus {
    Success,
    NoData,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SummaryOutcome {
    /// Nothing has been recorded for this option yet.
    NoData,
    Summary(BettorSummary),
}

impl SummaryOutcome {
    pub fn status(&self) -> SummaryStatus {
        match self {
            SummaryOutcome::NoData => SummaryStatus::NoData,
            SummaryOutcome::Summary(_) => SummaryStatus::Success,
        }
    }

    pub fn entries(&self) -> &[BettorSlots] {
        match self {
            SummaryOutcome::NoData => &[],
            SummaryOutcome::Summary(summary) => &summary.entries,
        }
    }
}

/// Summarizes a raw table of `KEY_LEN`-byte owner keys, one key per purchased slot.
pub fn summarize(raw: &[u8], capacity: usize) -> Result<SummaryOutcome, Error> {
    if raw.len() % KEY_LEN != 0 {
        return Err(Error::new(ErrorKind::Corrupt)
            .with_message(format!(
                "bettor table length {} is not a multiple of {KEY_LEN}",
                raw.len()
            ))
            .with_offset(raw.len() as u64));
    }
    if raw.iter().all(|byte| *byte == 0) {
        return Ok(SummaryOutcome::NoData);
    }

    let mut tally = OrderedTally::new();
    for (index, chunk) in raw.chunks_exact(KEY_LEN).enumerate() {
        let Some(owner) = BettorKey::from_slice(chunk) else {
            continue;
        };
        if owner.is_empty() {
            continue;
        }
        if !tally.contains(&owner) && tally.len() == capacity {
            return Err(Error::new(ErrorKind::Overflow)
                .with_message(format!(
                    "more than {capacity} distinct bettors in option table"
                ))
                .with_offset((index * KEY_LEN) as u64));
        }
        tally.bump(owner);
    }

    let entries = tally
        .into_entries()
        .into_iter()
        .map(|(owner, slots)| BettorSlots { owner, slots })
        .collect();
    Ok(SummaryOutcome::Summary(BettorSummary { entries }))
}

#[cfg(test)]
mod tests {
    use super::{
        BettorKey, BettorSlots, KEY_LEN, MAX_BETTORS_PER_OPTION, SLOT_TABLE_LEN, SummaryOutcome,
        SummaryStatus, summarize,
    };
    use crate::core::error::ErrorKind;

    fn key(tag: u8) -> BettorKey {
        let mut bytes = [0u8; KEY_LEN];
        bytes[0] = tag;
        bytes[KEY_LEN - 1] = tag;
        BettorKey(bytes)
    }

    fn key_wide(n: u16) -> BettorKey {
        let mut bytes = [0u8; KEY_LEN];
        bytes[..2].copy_from_slice(&(n + 1).to_le_bytes());
        BettorKey(bytes)
    }

    fn table(keys: &[Option<BettorKey>], len: usize) -> Vec<u8> {
        let mut raw = vec![0u8; len * KEY_LEN];
        for (index, slot) in keys.iter().enumerate() {
            if let Some(owner) = slot {
                raw[index * KEY_LEN..(index + 1) * KEY_LEN].copy_from_slice(owner.as_bytes());
            }
        }
        raw
    }

    fn entries(outcome: SummaryOutcome) -> Vec<(BettorKey, u32)> {
        match outcome {
            SummaryOutcome::Summary(summary) => summary
                .entries
                .into_iter()
                .map(|BettorSlots { owner, slots }| (owner, slots))
                .collect(),
            SummaryOutcome::NoData => panic!("expected a summary"),
        }
    }

    #[test]
    fn scenario_with_gap_and_repeat() {
        let (a, b) = (key(1), key(2));
        let raw = table(&[Some(a), None, Some(a), Some(b)], 4);
        let outcome = summarize(&raw, 4).expect("summary");
        assert_eq!(outcome.status(), SummaryStatus::Success);
        assert_eq!(entries(outcome), vec![(a, 2), (b, 1)]);
    }

    #[test]
    fn full_size_table_counts_scattered_repeats() {
        let (a, b) = (key(0xaa), key(0xbb));
        let mut keys = vec![None; MAX_BETTORS_PER_OPTION];
        for index in [0, 5, 9] {
            keys[index] = Some(a);
        }
        keys[2] = Some(b);
        let raw = table(&keys, MAX_BETTORS_PER_OPTION);
        assert_eq!(raw.len(), SLOT_TABLE_LEN);

        let outcome = summarize(&raw, MAX_BETTORS_PER_OPTION).expect("summary");
        assert_eq!(entries(outcome), vec![(a, 3), (b, 1)]);
    }

    #[test]
    fn only_first_occurrence_decides_order() {
        let (a, b) = (key(1), key(2));
        let forward = table(&[Some(a), Some(b), Some(a), Some(b), Some(b)], 5);
        let shuffled = table(&[Some(a), Some(b), Some(b), Some(b), Some(a)], 5);
        let first = entries(summarize(&forward, 8).expect("forward"));
        let second = entries(summarize(&shuffled, 8).expect("shuffled"));
        assert_eq!(first, vec![(a, 2), (b, 3)]);
        assert_eq!(first, second);
    }

    #[test]
    fn all_zero_table_is_no_data() {
        let raw = vec![0u8; SLOT_TABLE_LEN];
        let outcome = summarize(&raw, MAX_BETTORS_PER_OPTION).expect("outcome");
        assert_eq!(outcome, SummaryOutcome::NoData);
        assert_eq!(outcome.status(), SummaryStatus::NoData);
        assert!(outcome.entries().is_empty());

        assert_eq!(summarize(&[], 4).expect("empty"), SummaryOutcome::NoData);
    }

    #[test]
    fn single_entry_is_success() {
        let raw = table(&[None, None, Some(key(9))], 8);
        let outcome = summarize(&raw, 8).expect("summary");
        assert_eq!(outcome.status(), SummaryStatus::Success);
        assert_eq!(entries(outcome), vec![(key(9), 1)]);
    }

    #[test]
    fn capacity_boundary() {
        let keys: Vec<_> = (0..4).map(|n| Some(key_wide(n))).collect();
        let raw = table(&keys, 4);
        let exact = summarize(&raw, 4).expect("exact capacity");
        assert_eq!(exact.entries().len(), 4);

        let err = summarize(&raw, 3).expect_err("overflow");
        assert_eq!(err.kind(), ErrorKind::Overflow);
        assert_eq!(err.offset(), Some(3 * KEY_LEN as u64));
    }

    #[test]
    fn repeats_do_not_count_against_capacity() {
        let (a, b) = (key(1), key(2));
        let raw = table(&[Some(a), Some(b), Some(a), Some(b), Some(a)], 5);
        let outcome = summarize(&raw, 2).expect("two owners fit");
        assert_eq!(entries(outcome), vec![(a, 3), (b, 2)]);
    }

    #[test]
    fn ragged_table_is_corrupt() {
        let err = summarize(&[1u8; KEY_LEN + 1], 4).expect_err("ragged");
        assert_eq!(err.kind(), ErrorKind::Corrupt);
    }

    #[test]
    fn debug_key_is_abbreviated() {
        assert_eq!(format!("{:?}", key(0xab)), "BettorKey(ab000000..)");
    }
}
