//! Purpose: C ABI bridge for callers linking libquottery_shim.
//! Exports: `qtry_*` decode/encode/summarize functions and error helpers.
//! Role: Stable ABI surface mirrored by `include/quottery_shim.h`.
//! Invariants: Callers own every buffer; the library allocates only `qtry_error`.
//! Invariants: Every entry point returns a `qtry_status`; errors fill `out_err` when given.
//! Notes: Error kind codes match `core::error::to_status_code`.
#![allow(clippy::not_unsafe_ptr_arg_deref)]

use crate::core::error::{Error, ErrorKind, to_status_code};
use crate::core::format::check_wire_version;
use crate::core::packed_date::{CalendarTimestamp, decode, encode};
use crate::core::slots::{KEY_LEN, MAX_BETTORS_PER_OPTION, SLOT_TABLE_LEN, SummaryOutcome, summarize};
use crate::core::wire::{
    BasicInfo, BetInfoRecord, DESC_LEN, MAX_OPTIONS, MAX_ORACLE_PROVIDERS, decode_active_bets,
};
use std::ffi::CString;
use std::os::raw::c_char;
use std::ptr;

#[repr(C)]
#[allow(non_camel_case_types)]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum qtry_status {
    QTRY_OK = 0,
    QTRY_ERROR = 1,
    QTRY_NO_DATA = 2,
}

#[repr(C)]
#[allow(non_camel_case_types)]
pub struct qtry_error {
    pub kind: i32,
    pub message: *mut c_char,
    pub hint: *mut c_char,
    pub offset: u64,
    pub has_offset: u8,
}

#[repr(C)]
#[allow(non_camel_case_types)]
#[derive(Clone, Copy)]
pub struct qtry_bettor_summary {
    pub bettor: [u8; SLOT_TABLE_LEN],
    pub slots: [u32; MAX_BETTORS_PER_OPTION],
    pub count: u32,
}

#[repr(C)]
#[allow(non_camel_case_types)]
#[derive(Clone, Copy, Debug, Default)]
pub struct qtry_basic_info {
    pub fee_per_slot_per_hour: u64,
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
    pub game_operator: [u8; KEY_LEN],
}

#[repr(C)]
#[allow(non_camel_case_types)]
#[derive(Clone, Copy, Debug)]
pub struct qtry_bet_info {
    pub bet_id: u32,
    pub n_option: u32,
    pub creator: [u8; KEY_LEN],
    pub bet_desc: [u8; DESC_LEN],
    pub option_desc: [u8; DESC_LEN * MAX_OPTIONS],
    pub oracle_provider_id: [u8; KEY_LEN * MAX_ORACLE_PROVIDERS],
    pub oracle_fees: [u32; MAX_ORACLE_PROVIDERS],
    /// `[YY, MM, DD, HH, MM, SS]`
    pub open_date_time: [u8; 6],
    pub close_date_time: [u8; 6],
    pub end_date_time: [u8; 6],
    pub min_bet_amount: u64,
    pub max_bet_slot_per_option: u32,
    pub current_bet_state: [u32; MAX_OPTIONS],
    pub bet_result_won_option: [i8; MAX_ORACLE_PROVIDERS],
    pub bet_result_op_id: [i8; MAX_ORACLE_PROVIDERS],
}

impl qtry_bettor_summary {
    /// Boxed, zeroed summary; too large to build on small stacks.
    pub fn boxed() -> Box<Self> {
        Box::new(Self {
            bettor: [0u8; SLOT_TABLE_LEN],
            slots: [0u32; MAX_BETTORS_PER_OPTION],
            count: 0,
        })
    }
}

#[unsafe(no_mangle)]
pub extern "C" fn qtry_packed_date_decode(
    raw: u32,
    out_fields: *mut u8,
    out_err: *mut *mut qtry_error,
) -> qtry_status {
    if out_fields.is_null() {
        return fail(out_err, usage("out_fields is null"));
    }
    let fields = decode(raw).to_array();
    unsafe {
        ptr::copy_nonoverlapping(fields.as_ptr(), out_fields, fields.len());
    }
    qtry_status::QTRY_OK
}

#[unsafe(no_mangle)]
pub extern "C" fn qtry_packed_date_encode(
    fields: *const u8,
    out_raw: *mut u32,
    out_err: *mut *mut qtry_error,
) -> qtry_status {
    if fields.is_null() {
        return fail(out_err, usage("fields is null"));
    }
    if out_raw.is_null() {
        return fail(out_err, usage("out_raw is null"));
    }
    let mut buf = [0u8; 6];
    unsafe {
        ptr::copy_nonoverlapping(fields, buf.as_mut_ptr(), buf.len());
        *out_raw = encode(CalendarTimestamp::from_array(buf));
    }
    qtry_status::QTRY_OK
}

#[unsafe(no_mangle)]
pub extern "C" fn qtry_bet_option_summarize(
    raw: *const u8,
    raw_len: usize,
    out_summary: *mut qtry_bettor_summary,
    out_err: *mut *mut qtry_error,
) -> qtry_status {
    let raw = match borrow_bytes(raw, raw_len, "raw") {
        Ok(raw) => raw,
        Err(err) => return fail(out_err, err),
    };
    if out_summary.is_null() {
        return fail(out_err, usage("out_summary is null"));
    }
    let outcome = match summarize(raw, MAX_BETTORS_PER_OPTION) {
        Ok(outcome) => outcome,
        Err(err) => return fail(out_err, err),
    };

    let out = unsafe { &mut *out_summary };
    out.bettor.fill(0);
    out.slots.fill(0);
    out.count = 0;
    let summary = match outcome {
        SummaryOutcome::NoData => return qtry_status::QTRY_NO_DATA,
        SummaryOutcome::Summary(summary) => summary,
    };
    for (index, entry) in summary.entries.iter().enumerate() {
        out.bettor[index * KEY_LEN..(index + 1) * KEY_LEN].copy_from_slice(entry.owner.as_bytes());
        out.slots[index] = entry.slots;
    }
    out.count = summary.len() as u32;
    qtry_status::QTRY_OK
}

#[unsafe(no_mangle)]
pub extern "C" fn qtry_bet_info_decode(
    version: u32,
    bytes: *const u8,
    len: usize,
    out_info: *mut qtry_bet_info,
    out_err: *mut *mut qtry_error,
) -> qtry_status {
    if let Err(err) = check_wire_version(version) {
        return fail(out_err, err);
    }
    let bytes = match borrow_bytes(bytes, len, "bytes") {
        Ok(bytes) => bytes,
        Err(err) => return fail(out_err, err),
    };
    if out_info.is_null() {
        return fail(out_err, usage("out_info is null"));
    }
    let record = match BetInfoRecord::decode(bytes) {
        Ok(record) => record,
        Err(err) => return fail(out_err, err),
    };
    unsafe {
        *out_info = bet_info_from_record(&record);
    }
    qtry_status::QTRY_OK
}

#[unsafe(no_mangle)]
pub extern "C" fn qtry_basic_info_decode(
    bytes: *const u8,
    len: usize,
    out_info: *mut qtry_basic_info,
    out_err: *mut *mut qtry_error,
) -> qtry_status {
    let bytes = match borrow_bytes(bytes, len, "bytes") {
        Ok(bytes) => bytes,
        Err(err) => return fail(out_err, err),
    };
    if out_info.is_null() {
        return fail(out_err, usage("out_info is null"));
    }
    let info = match BasicInfo::decode(bytes) {
        Ok(info) => info,
        Err(err) => return fail(out_err, err),
    };
    unsafe {
        *out_info = qtry_basic_info {
            fee_per_slot_per_hour: info.fee_per_slot_per_hour,
            game_operator_fee: info.game_operator_fee,
            shareholder_fee: info.shareholder_fee,
            min_bet_slot_amount: info.min_bet_slot_amount,
            burn_fee: info.burn_fee,
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
            game_operator: *info.game_operator.as_bytes(),
        };
    }
    qtry_status::QTRY_OK
}

#[unsafe(no_mangle)]
pub extern "C" fn qtry_active_bets_decode(
    bytes: *const u8,
    len: usize,
    out_ids: *mut u32,
    ids_cap: usize,
    out_count: *mut u32,
    out_err: *mut *mut qtry_error,
) -> qtry_status {
    let bytes = match borrow_bytes(bytes, len, "bytes") {
        Ok(bytes) => bytes,
        Err(err) => return fail(out_err, err),
    };
    if out_count.is_null() {
        return fail(out_err, usage("out_count is null"));
    }
    let ids = match decode_active_bets(bytes) {
        Ok(ids) => ids,
        Err(err) => return fail(out_err, err),
    };
    if ids.len() > ids_cap {
        return fail(
            out_err,
            Error::new(ErrorKind::Overflow)
                .with_message(format!("{} active bets exceed ids_cap {ids_cap}", ids.len())),
        );
    }
    if !ids.is_empty() && out_ids.is_null() {
        return fail(out_err, usage("out_ids is null"));
    }
    unsafe {
        if !ids.is_empty() {
            ptr::copy_nonoverlapping(ids.as_ptr(), out_ids, ids.len());
        }
        *out_count = ids.len() as u32;
    }
    qtry_status::QTRY_OK
}

#[unsafe(no_mangle)]
pub extern "C" fn qtry_error_free(err: *mut qtry_error) {
    if err.is_null() {
        return;
    }
    unsafe {
        let err = Box::from_raw(err);
        if !err.message.is_null() {
            drop(CString::from_raw(err.message));
        }
        if !err.hint.is_null() {
            drop(CString::from_raw(err.hint));
        }
    }
}

fn bet_info_from_record(record: &BetInfoRecord) -> qtry_bet_info {
    let mut option_desc = [0u8; DESC_LEN * MAX_OPTIONS];
    for (chunk, desc) in option_desc.chunks_exact_mut(DESC_LEN).zip(&record.option_desc) {
        chunk.copy_from_slice(desc);
    }
    let mut oracle_provider_id = [0u8; KEY_LEN * MAX_ORACLE_PROVIDERS];
    for (chunk, key) in oracle_provider_id
        .chunks_exact_mut(KEY_LEN)
        .zip(&record.oracle_provider_id)
    {
        chunk.copy_from_slice(key.as_bytes());
    }
    qtry_bet_info {
        bet_id: record.bet_id,
        n_option: record.n_option,
        creator: *record.creator.as_bytes(),
        bet_desc: record.bet_desc,
        option_desc,
        oracle_provider_id,
        oracle_fees: record.oracle_fees,
        open_date_time: record.open_date.decode().to_array(),
        close_date_time: record.close_date.decode().to_array(),
        end_date_time: record.end_date.decode().to_array(),
        min_bet_amount: record.min_bet_amount,
        max_bet_slot_per_option: record.max_bet_slot_per_option,
        current_bet_state: record.current_bet_state,
        bet_result_won_option: record.bet_result_won_option,
        bet_result_op_id: record.bet_result_op_id,
    }
}

fn borrow_bytes<'a>(bytes: *const u8, len: usize, name: &str) -> Result<&'a [u8], Error> {
    if bytes.is_null() {
        return Err(usage(&format!("{name} is null")));
    }
    Ok(unsafe { std::slice::from_raw_parts(bytes, len) })
}

fn usage(message: &str) -> Error {
    Error::new(ErrorKind::Usage).with_message(message)
}

fn fail(out_err: *mut *mut qtry_error, err: Error) -> qtry_status {
    if out_err.is_null() {
        return qtry_status::QTRY_ERROR;
    }
    let error = Box::new(qtry_error {
        kind: to_status_code(err.kind()),
        message: to_c_string(err.message().unwrap_or("")),
        hint: err.hint().map(to_c_string).unwrap_or(ptr::null_mut()),
        offset: err.offset().unwrap_or(0),
        has_offset: if err.offset().is_some() { 1 } else { 0 },
    });
    unsafe {
        *out_err = Box::into_raw(error);
    }
    qtry_status::QTRY_ERROR
}

fn to_c_string(input: &str) -> *mut c_char {
    CString::new(input)
        .map(|s| s.into_raw())
        .unwrap_or(ptr::null_mut())
}

#[cfg(test)]
mod tests {
    use super::{
        qtry_bet_info_decode, qtry_error, qtry_error_free, qtry_packed_date_decode,
        qtry_packed_date_encode, qtry_status,
    };
    use crate::core::error::{ErrorKind, to_status_code};
    use crate::core::format::WIRE_FORMAT_VERSION;
    use crate::core::wire::tests::sample_bet;
    use std::ffi::CStr;
    use std::mem::MaybeUninit;
    use std::ptr;

    #[test]
    fn date_decode_writes_six_fields() {
        let mut fields = [0u8; 6];
        let status = qtry_packed_date_decode(u32::MAX, fields.as_mut_ptr(), ptr::null_mut());
        assert_eq!(status, qtry_status::QTRY_OK);
        assert_eq!(fields, [87, 15, 31, 31, 63, 63]);
    }

    #[test]
    fn date_encode_inverts_decode() {
        let fields = [24u8, 6, 15, 13, 45, 30];
        let mut raw = 0u32;
        let status = qtry_packed_date_encode(fields.as_ptr(), &mut raw, ptr::null_mut());
        assert_eq!(status, qtry_status::QTRY_OK);
        let mut back = [0u8; 6];
        qtry_packed_date_decode(raw, back.as_mut_ptr(), ptr::null_mut());
        assert_eq!(back, fields);
    }

    #[test]
    fn null_output_reports_usage_error() {
        let mut err: *mut qtry_error = ptr::null_mut();
        let status = qtry_packed_date_decode(0, ptr::null_mut(), &mut err);
        assert_eq!(status, qtry_status::QTRY_ERROR);
        assert!(!err.is_null());
        unsafe {
            assert_eq!((*err).kind, to_status_code(ErrorKind::Usage));
            let message = CStr::from_ptr((*err).message).to_str().expect("utf8");
            assert_eq!(message, "out_fields is null");
        }
        qtry_error_free(err);
    }

    #[test]
    fn bet_info_dates_are_unpacked() {
        let buf = sample_bet().encode();
        let mut info = MaybeUninit::uninit();
        let status = qtry_bet_info_decode(
            WIRE_FORMAT_VERSION,
            buf.as_ptr(),
            buf.len(),
            info.as_mut_ptr(),
            ptr::null_mut(),
        );
        assert_eq!(status, qtry_status::QTRY_OK);
        let info = unsafe { info.assume_init() };
        assert_eq!(info.bet_id, 53);
        assert_eq!(info.open_date_time, [24, 6, 1, 8, 0, 0]);
        assert_eq!(info.end_date_time, [24, 6, 3, 23, 59, 59]);
        assert_eq!(&info.option_desc[32..34], b"no");
        assert_eq!(info.oracle_provider_id[64], 0x12);
    }

    #[test]
    fn bet_info_rejects_unknown_version() {
        let buf = sample_bet().encode();
        let mut info = MaybeUninit::uninit();
        let mut err: *mut qtry_error = ptr::null_mut();
        let status = qtry_bet_info_decode(1, buf.as_ptr(), buf.len(), info.as_mut_ptr(), &mut err);
        assert_eq!(status, qtry_status::QTRY_ERROR);
        unsafe {
            assert_eq!((*err).kind, to_status_code(ErrorKind::Usage));
            assert!(!(*err).hint.is_null());
        }
        qtry_error_free(err);
    }
}
