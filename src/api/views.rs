//! Purpose: Caller-facing, serializable views of decoded contract data.
//! Exports: `BasicInfoView`, `BetView`, `DateTimeView`, `OracleView`, `BettorView`,
//!          `OptionBettors`, `BetSnapshot`.
//! Role: Stable shapes for JSON output; identities are already resolved to text.
//! Invariants: Fees expressed in hundredths on the wire are reported as percent.
//! Invariants: Dates keep both raw fields and `YY-MM-DD` / `HH:MM:SS` strings.

use crate::core::packed_date::{CalendarTimestamp, PackedDate};
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BasicInfoView {
    pub fee_per_slot_per_hour: u64,
    pub game_operator_fee: f64,
    pub share_holder_fee: f64,
    pub min_bet_slot_amount: u64,
    pub burn_fee: f64,
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
    pub game_operator: String,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct DateTimeView {
    pub date: String,
    pub time: String,
    pub fields: CalendarTimestamp,
}

impl From<PackedDate> for DateTimeView {
    fn from(packed: PackedDate) -> Self {
        let fields = packed.decode();
        Self {
            date: fields.date_string(),
            time: fields.time_string(),
            fields,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OracleView {
    pub identity: String,
    pub fee: f64,
    pub vote: Option<u8>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BetView {
    pub bet_id: u32,
    pub bet_desc: String,
    pub no_options: u32,
    pub creator: String,
    pub amount_per_bet_slot: u64,
    pub option_desc: Vec<String>,
    pub current_bet_state: Vec<u32>,
    pub max_slot_per_option: u32,
    pub open: DateTimeView,
    pub close: DateTimeView,
    pub end: DateTimeView,
    pub oracles: Vec<OracleView>,
    pub result: Option<u8>,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct BettorView {
    pub identity: String,
    pub slots: u32,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "status", content = "bettors", rename_all = "snake_case")]
pub enum OptionBettors {
    NoData,
    Bettors(Vec<BettorView>),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BetSnapshot {
    pub bets: Vec<BetView>,
    /// Bets listed as active whose details could not be fetched.
    pub failed: Vec<u32>,
    /// Only reported when every listed bet was fetched.
    pub tick_number: Option<u32>,
}

pub(crate) fn percent(hundredths: u64) -> f64 {
    hundredths as f64 / 100.0
}

#[cfg(test)]
mod tests {
    use super::{BettorView, DateTimeView, OptionBettors, percent};
    use crate::core::packed_date::{CalendarTimestamp, PackedDate};
    use serde_json::json;

    #[test]
    fn date_view_formats_fields() {
        let view = DateTimeView::from(PackedDate::from(CalendarTimestamp::new(
            24, 12, 5, 7, 3, 9,
        )));
        assert_eq!(view.date, "24-12-05");
        assert_eq!(view.time, "07:03:09");
        assert_eq!(view.fields.month, 12);
    }

    #[test]
    fn option_bettors_json_shape() {
        let bettors = OptionBettors::Bettors(vec![BettorView {
            identity: "AAAA".to_string(),
            slots: 2,
        }]);
        assert_eq!(
            serde_json::to_value(&bettors).expect("json"),
            json!({"status": "bettors", "bettors": [{"identity": "AAAA", "slots": 2}]})
        );
        assert_eq!(
            serde_json::to_value(&OptionBettors::NoData).expect("json"),
            json!({"status": "no_data"})
        );
    }

    #[test]
    fn percent_from_hundredths() {
        assert_eq!(percent(1234), 12.34);
        assert_eq!(percent(0), 0.0);
    }
}
