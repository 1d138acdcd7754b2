//! Purpose: Convert between the 32-bit packed date used on the wire and calendar fields.
//! Exports: `PackedDate`, `CalendarTimestamp`, `decode`, `encode`, bit-width constants.
//! Role: Pure bit transform behind bet open/close/end timestamps.
//! Invariants: Layout is year(6) month(4) day(5) hour(5) minute(6) second(6), MSB first.
//! Invariants: Decode never validates; `decode(encode(t)) == t` for in-range fields.
use crate::core::error::{Error, ErrorKind};
use serde::Serialize;
use time::{Date, Month, PrimitiveDateTime, Time};

pub const SECOND_BITS: u32 = 6;
pub const MINUTE_BITS: u32 = 6;
pub const HOUR_BITS: u32 = 5;
pub const DAY_BITS: u32 = 5;
pub const MONTH_BITS: u32 = 4;
pub const YEAR_BITS: u32 = 6;

/// Raw year field 0 is 2024, stored as the two-digit year 24.
pub const YEAR_OFFSET: u8 = 24;

const SECOND_SHIFT: u32 = 0;
const MINUTE_SHIFT: u32 = SECOND_SHIFT + SECOND_BITS;
const HOUR_SHIFT: u32 = MINUTE_SHIFT + MINUTE_BITS;
const DAY_SHIFT: u32 = HOUR_SHIFT + HOUR_BITS;
const MONTH_SHIFT: u32 = DAY_SHIFT + DAY_BITS;
const YEAR_SHIFT: u32 = MONTH_SHIFT + MONTH_BITS;

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PackedDate(pub u32);

impl PackedDate {
    pub fn from_le_bytes(bytes: [u8; 4]) -> Self {
        Self(u32::from_le_bytes(bytes))
    }

    pub fn raw(self) -> u32 {
        self.0
    }

    pub fn decode(self) -> CalendarTimestamp {
        decode(self.0)
    }
}

impl From<CalendarTimestamp> for PackedDate {
    fn from(ts: CalendarTimestamp) -> Self {
        Self(encode(ts))
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize)]
pub struct CalendarTimestamp {
    pub year: u8,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl CalendarTimestamp {
    pub fn new(year: u8, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        }
    }

    /// `[YY, MM, DD, HH, MM, SS]`, the order used by the C records.
    pub fn to_array(self) -> [u8; 6] {
        [
            self.year,
            self.month,
            self.day,
            self.hour,
            self.minute,
            self.second,
        ]
    }

    pub fn from_array(fields: [u8; 6]) -> Self {
        let [year, month, day, hour, minute, second] = fields;
        Self::new(year, month, day, hour, minute, second)
    }

    pub fn date_string(&self) -> String {
        format!("{:02}-{:02}-{:02}", self.year, self.month, self.day)
    }

    pub fn time_string(&self) -> String {
        format!("{:02}:{:02}:{:02}", self.hour, self.minute, self.second)
    }

    /// Calendar-checked view of the fields; the two-digit year is taken as 20YY.
    pub fn to_datetime(&self) -> Result<PrimitiveDateTime, Error> {
        let month = Month::try_from(self.month).map_err(|err| {
            Error::new(ErrorKind::Usage)
                .with_message(format!("invalid month {}", self.month))
                .with_source(err)
        })?;
        let date = Date::from_calendar_date(2000 + i32::from(self.year), month, self.day)
            .map_err(|err| {
                Error::new(ErrorKind::Usage)
                    .with_message(format!("invalid date {}", self.date_string()))
                    .with_source(err)
            })?;
        let time = Time::from_hms(self.hour, self.minute, self.second).map_err(|err| {
            Error::new(ErrorKind::Usage)
                .with_message(format!("invalid time {}", self.time_string()))
                .with_source(err)
        })?;
        Ok(PrimitiveDateTime::new(date, time))
    }
}

// Fields come off the top of the remaining window: second first, year last.
fn take_bits(raw: u32, cursor: &mut u32, width: u32) -> u8 {
    *cursor -= width;
    ((raw << *cursor) >> (32 - width)) as u8
}

pub fn decode(raw: u32) -> CalendarTimestamp {
    let mut cursor = 32;
    let second = take_bits(raw, &mut cursor, SECOND_BITS);
    let minute = take_bits(raw, &mut cursor, MINUTE_BITS);
    let hour = take_bits(raw, &mut cursor, HOUR_BITS);
    let day = take_bits(raw, &mut cursor, DAY_BITS);
    let month = take_bits(raw, &mut cursor, MONTH_BITS);
    let year = take_bits(raw, &mut cursor, YEAR_BITS) + YEAR_OFFSET;
    CalendarTimestamp {
        year,
        month,
        day,
        hour,
        minute,
        second,
    }
}

pub fn encode(ts: CalendarTimestamp) -> u32 {
    let year = ts.year.wrapping_sub(YEAR_OFFSET);
    field(year, YEAR_BITS, YEAR_SHIFT)
        | field(ts.month, MONTH_BITS, MONTH_SHIFT)
        | field(ts.day, DAY_BITS, DAY_SHIFT)
        | field(ts.hour, HOUR_BITS, HOUR_SHIFT)
        | field(ts.minute, MINUTE_BITS, MINUTE_SHIFT)
        | field(ts.second, SECOND_BITS, SECOND_SHIFT)
}

fn field(value: u8, width: u32, shift: u32) -> u32 {
    (u32::from(value) & ((1 << width) - 1)) << shift
}

#[cfg(test)]
mod tests {
    use super::{CalendarTimestamp, PackedDate, YEAR_OFFSET, decode, encode};
    use crate::core::error::ErrorKind;

    #[test]
    fn zero_decodes_to_epoch() {
        assert_eq!(decode(0), CalendarTimestamp::new(24, 0, 0, 0, 0, 0));
    }

    #[test]
    fn all_ones_decodes_to_field_maxima() {
        assert_eq!(
            decode(u32::MAX),
            CalendarTimestamp::new(YEAR_OFFSET + 63, 15, 31, 31, 63, 63)
        );
    }

    #[test]
    fn single_field_bits_land_in_place() {
        assert_eq!(decode(0b111111).second, 63);
        assert_eq!(decode(0b111111 << 6).minute, 63);
        assert_eq!(decode(0b11111 << 12).hour, 31);
        assert_eq!(decode(0b11111 << 17).day, 31);
        assert_eq!(decode(0b1111 << 22).month, 15);
        assert_eq!(decode(1 << 26).year, 25);
    }

    #[test]
    fn known_wire_value_decodes() {
        // 2024-06-15 13:45:30
        let raw = (6 << 22) | (15 << 17) | (13 << 12) | (45 << 6) | 30;
        let ts = decode(raw);
        assert_eq!(ts, CalendarTimestamp::new(24, 6, 15, 13, 45, 30));
        assert_eq!(ts.date_string(), "24-06-15");
        assert_eq!(ts.time_string(), "13:45:30");
    }

    #[test]
    fn encode_inverts_decode_for_in_range_fields() {
        let samples = [
            CalendarTimestamp::new(24, 1, 1, 0, 0, 0),
            CalendarTimestamp::new(25, 12, 31, 23, 59, 59),
            CalendarTimestamp::new(87, 2, 29, 12, 30, 1),
            CalendarTimestamp::new(40, 7, 4, 9, 5, 17),
        ];
        for ts in samples {
            assert_eq!(decode(encode(ts)), ts, "{ts:?}");
        }
    }

    #[test]
    fn encode_masks_out_of_range_fields() {
        let ts = CalendarTimestamp::new(24, 16, 0, 0, 0, 64);
        assert_eq!(encode(ts), 0);
    }

    #[test]
    fn packed_date_reads_little_endian_bytes() {
        let raw = encode(CalendarTimestamp::new(26, 3, 9, 8, 7, 6));
        let packed = PackedDate::from_le_bytes(raw.to_le_bytes());
        assert_eq!(packed.raw(), raw);
        assert_eq!(packed.decode(), CalendarTimestamp::new(26, 3, 9, 8, 7, 6));
        assert_eq!(PackedDate::from(packed.decode()), packed);
    }

    #[test]
    fn array_layout_is_year_first() {
        let ts = CalendarTimestamp::new(24, 5, 6, 7, 8, 9);
        assert_eq!(ts.to_array(), [24, 5, 6, 7, 8, 9]);
        assert_eq!(CalendarTimestamp::from_array(ts.to_array()), ts);
    }

    #[test]
    fn to_datetime_rejects_calendar_invalid_fields() {
        let feb30 = CalendarTimestamp::new(24, 2, 30, 0, 0, 0);
        assert_eq!(feb30.to_datetime().expect_err("err").kind(), ErrorKind::Usage);

        let month0 = decode(0);
        assert_eq!(month0.to_datetime().expect_err("err").kind(), ErrorKind::Usage);

        let ok = CalendarTimestamp::new(24, 2, 29, 23, 59, 59)
            .to_datetime()
            .expect("leap day");
        assert_eq!(ok.year(), 2024);
        assert_eq!(ok.day(), 29);
    }
}
