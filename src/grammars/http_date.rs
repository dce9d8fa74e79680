//! HTTP dates: RFC 1123, RFC 850 and asctime.
//!
//! ```text
//! HTTP-date    = rfc1123-date | rfc850-date | asctime-date
//! rfc1123-date = wkday "," SP 2DIGIT SP month SP 4DIGIT SP time SP "GMT"
//! rfc850-date  = weekday "," SP 2DIGIT "-" month "-" 2DIGIT SP time SP "GMT"
//! asctime-date = wkday SP month SP ( 2DIGIT | ( SP 1DIGIT )) SP time SP 4DIGIT
//! time         = 2DIGIT ":" 2DIGIT ":" 2DIGIT
//! ```
//!
//! Every field is filled in by a callback whose argument names the field,
//! so the tables stay plain data.

use crate::core::{Cursor, Table};
use crate::engine::{Engine, RunError};
use crate::table;
use chrono::{Month, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

const DIGIT: &[u8] = b"0123456789";

/// Which of the three HTTP date layouts matched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Format {
    Rfc1123,
    Rfc850,
    Asctime,
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Rfc1123 => "RFC 1123",
            Self::Rfc850 => "RFC 850",
            Self::Asctime => "asctime",
        })
    }
}

/// Argument attached to a transition: the field its callback writes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Part {
    Day,
    Year,
    Hour,
    Minute,
    Second,
    Month(Month),
    Weekday(Weekday),
    Format(Format),
}

static DAY: Part = Part::Day;
static YEAR: Part = Part::Year;
static HOUR: Part = Part::Hour;
static MINUTE: Part = Part::Minute;
static SECOND: Part = Part::Second;

static MON: Part = Part::Weekday(Weekday::Mon);
static TUE: Part = Part::Weekday(Weekday::Tue);
static WED: Part = Part::Weekday(Weekday::Wed);
static THU: Part = Part::Weekday(Weekday::Thu);
static FRI: Part = Part::Weekday(Weekday::Fri);
static SAT: Part = Part::Weekday(Weekday::Sat);
static SUN: Part = Part::Weekday(Weekday::Sun);

static JANUARY: Part = Part::Month(Month::January);
static FEBRUARY: Part = Part::Month(Month::February);
static MARCH: Part = Part::Month(Month::March);
static APRIL: Part = Part::Month(Month::April);
static MAY: Part = Part::Month(Month::May);
static JUNE: Part = Part::Month(Month::June);
static JULY: Part = Part::Month(Month::July);
static AUGUST: Part = Part::Month(Month::August);
static SEPTEMBER: Part = Part::Month(Month::September);
static OCTOBER: Part = Part::Month(Month::October);
static NOVEMBER: Part = Part::Month(Month::November);
static DECEMBER: Part = Part::Month(Month::December);

static AS_RFC1123: Part = Part::Format(Format::Rfc1123);
static AS_RFC850: Part = Part::Format(Format::Rfc850);
static AS_ASCTIME: Part = Part::Format(Format::Asctime);

/// Fields collected while a date is recognized.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DateFields {
    pub weekday: Option<Weekday>,
    pub day: u32,
    pub month: Option<Month>,
    pub year: i32,
    pub year_digits: u8,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    pub format: Option<Format>,
}

impl DateFields {
    fn push_digit(&mut self, part: Part, digit: u8) {
        let digit = u32::from(digit);
        match part {
            Part::Day => self.day = self.day * 10 + digit,
            Part::Hour => self.hour = self.hour * 10 + digit,
            Part::Minute => self.minute = self.minute * 10 + digit,
            Part::Second => self.second = self.second * 10 + digit,
            Part::Year => {
                self.year = self.year * 10 + digit as i32;
                self.year_digits += 1;
            }
            Part::Month(_) | Part::Weekday(_) | Part::Format(_) => {}
        }
    }

    fn set(&mut self, part: Part) {
        match part {
            Part::Month(month) => self.month = Some(month),
            Part::Weekday(weekday) => self.weekday = Some(weekday),
            Part::Format(format) => self.format = Some(format),
            Part::Day | Part::Year | Part::Hour | Part::Minute | Part::Second => {}
        }
    }

    /// Four-digit year, expanding the two-digit RFC 850 form.
    ///
    /// Two-digit years below 70 fall in the 2000s, the rest in the 1900s.
    pub fn full_year(&self) -> i32 {
        match self.year_digits {
            2 if self.year < 70 => 2000 + self.year,
            2 => 1900 + self.year,
            _ => self.year,
        }
    }
}

fn digit(cursor: Cursor<'_>, _: usize, fields: &mut DateFields, part: Option<&'static Part>) {
    if let (Some(byte), Some(part)) = (cursor.peek(), part) {
        fields.push_digit(*part, byte - b'0');
    }
}

fn set(_: Cursor<'_>, _: usize, fields: &mut DateFields, part: Option<&'static Part>) {
    if let Some(part) = part {
        fields.set(*part);
    }
}

table! {
    /// `HH:MM:SS`
    pub static TIME: Table<DateFields, Part> = "time" {
        0 => one_of(DIGIT).to(1).then(digit).arg(&HOUR),
        1 => one_of(DIGIT).to(2).then(digit).arg(&HOUR),
        2 => exact(b":").to(3),
        3 => one_of(DIGIT).to(4).then(digit).arg(&MINUTE),
        4 => one_of(DIGIT).to(5).then(digit).arg(&MINUTE),
        5 => exact(b":").to(6),
        6 => one_of(DIGIT).to(7).then(digit).arg(&SECOND),
        7 => one_of(DIGIT).accept().then(digit).arg(&SECOND),
    };

    /// Three-letter day names.
    pub static WKDAY: Table<DateFields, Part> = "wkday" {
        0 => exact(b"Mon").accept().then(set).arg(&MON),
        0 => exact(b"Tue").accept().then(set).arg(&TUE),
        0 => exact(b"Wed").accept().then(set).arg(&WED),
        0 => exact(b"Thu").accept().then(set).arg(&THU),
        0 => exact(b"Fri").accept().then(set).arg(&FRI),
        0 => exact(b"Sat").accept().then(set).arg(&SAT),
        0 => exact(b"Sun").accept().then(set).arg(&SUN),
    };

    /// Full day names.
    pub static WEEKDAY: Table<DateFields, Part> = "weekday" {
        0 => exact(b"Monday").accept().then(set).arg(&MON),
        0 => exact(b"Tuesday").accept().then(set).arg(&TUE),
        0 => exact(b"Wednesday").accept().then(set).arg(&WED),
        0 => exact(b"Thursday").accept().then(set).arg(&THU),
        0 => exact(b"Friday").accept().then(set).arg(&FRI),
        0 => exact(b"Saturday").accept().then(set).arg(&SAT),
        0 => exact(b"Sunday").accept().then(set).arg(&SUN),
    };

    pub static MONTH: Table<DateFields, Part> = "month" {
        0 => exact(b"Jan").accept().then(set).arg(&JANUARY),
        0 => exact(b"Feb").accept().then(set).arg(&FEBRUARY),
        0 => exact(b"Mar").accept().then(set).arg(&MARCH),
        0 => exact(b"Apr").accept().then(set).arg(&APRIL),
        0 => exact(b"May").accept().then(set).arg(&MAY),
        0 => exact(b"Jun").accept().then(set).arg(&JUNE),
        0 => exact(b"Jul").accept().then(set).arg(&JULY),
        0 => exact(b"Aug").accept().then(set).arg(&AUGUST),
        0 => exact(b"Sep").accept().then(set).arg(&SEPTEMBER),
        0 => exact(b"Oct").accept().then(set).arg(&OCTOBER),
        0 => exact(b"Nov").accept().then(set).arg(&NOVEMBER),
        0 => exact(b"Dec").accept().then(set).arg(&DECEMBER),
    };

    /// `Sun, 06 Nov 1994 08:49:37 GMT`
    pub static RFC1123: Table<DateFields, Part> = "rfc1123-date" {
        0 => automaton(&WKDAY).to(1),
        1 => exact(b", ").to(2),
        2 => one_of(DIGIT).to(3).then(digit).arg(&DAY),
        3 => one_of(DIGIT).to(4).then(digit).arg(&DAY),
        4 => exact(b" ").to(5),
        5 => automaton(&MONTH).to(6),
        6 => exact(b" ").to(7),
        7 => one_of(DIGIT).to(8).then(digit).arg(&YEAR),
        8 => one_of(DIGIT).to(9).then(digit).arg(&YEAR),
        9 => one_of(DIGIT).to(10).then(digit).arg(&YEAR),
        10 => one_of(DIGIT).to(11).then(digit).arg(&YEAR),
        11 => exact(b" ").to(12),
        12 => automaton(&TIME).to(13),
        13 => exact(b" GMT").accept(),
    };

    /// `Sunday, 06-Nov-94 08:49:37 GMT`
    pub static RFC850: Table<DateFields, Part> = "rfc850-date" {
        0 => automaton(&WEEKDAY).to(1),
        1 => exact(b", ").to(2),
        2 => one_of(DIGIT).to(3).then(digit).arg(&DAY),
        3 => one_of(DIGIT).to(4).then(digit).arg(&DAY),
        4 => exact(b"-").to(5),
        5 => automaton(&MONTH).to(6),
        6 => exact(b"-").to(7),
        7 => one_of(DIGIT).to(8).then(digit).arg(&YEAR),
        8 => one_of(DIGIT).to(9).then(digit).arg(&YEAR),
        9 => exact(b" ").to(10),
        10 => automaton(&TIME).to(11),
        11 => exact(b" GMT").accept(),
    };

    /// `Sun Nov  6 08:49:37 1994`
    ///
    /// The day is two digits, or a space then one digit.
    pub static ASCTIME: Table<DateFields, Part> = "asctime-date" {
        0 => automaton(&WKDAY).to(1),
        1 => exact(b" ").to(2),
        2 => automaton(&MONTH).to(3),
        3 => exact(b" ").to(4),
        4 => exact(b" ").to(5),
        4 => one_of(DIGIT).to(5).then(digit).arg(&DAY),
        5 => one_of(DIGIT).to(6).then(digit).arg(&DAY),
        6 => exact(b" ").to(7),
        7 => automaton(&TIME).to(8),
        8 => exact(b" ").to(9),
        9 => one_of(DIGIT).to(10).then(digit).arg(&YEAR),
        10 => one_of(DIGIT).to(11).then(digit).arg(&YEAR),
        11 => one_of(DIGIT).to(12).then(digit).arg(&YEAR),
        12 => one_of(DIGIT).accept().then(digit).arg(&YEAR),
    };

    /// Any HTTP date. The matched layout is recorded in [`DateFields::format`].
    pub static HTTP_DATE: Table<DateFields, Part> = "http-date" {
        0 => automaton(&RFC1123).accept().then(set).arg(&AS_RFC1123),
        0 => automaton(&RFC850).accept().then(set).arg(&AS_RFC850),
        0 => automaton(&ASCTIME).accept().then(set).arg(&AS_ASCTIME),
    };
}

/// Failure to read an HTTP date.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DateError {
    #[error("Not an HTTP date: {0}")]
    Syntax(#[from] RunError),

    #[error("{year:04}-{month:02}-{day:02} is not a calendar date")]
    InvalidDate { year: i32, month: u32, day: u32 },

    #[error("{hour:02}:{minute:02}:{second:02} is not a valid time of day")]
    InvalidTime { hour: u32, minute: u32, second: u32 },
}

/// A parsed HTTP date.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpDate {
    /// Day name as written; not checked against the date.
    pub weekday: Weekday,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub format: Format,
    /// Bytes of input the date occupied.
    pub consumed: usize,
}

impl HttpDate {
    pub fn month(&self) -> Month {
        use chrono::Datelike;
        // `month()` is always within 1..=12.
        Month::try_from(self.date.month() as u8).unwrap_or(Month::January)
    }

    /// Whether the written day name agrees with the calendar.
    pub fn weekday_matches(&self) -> bool {
        use chrono::Datelike;
        self.date.weekday() == self.weekday
    }

    /// The date as a UTC instant. HTTP dates are always GMT.
    pub fn to_utc(&self) -> chrono::DateTime<Utc> {
        Utc.from_utc_datetime(&NaiveDateTime::new(self.date, self.time))
    }
}

impl TryFrom<(DateFields, usize)> for HttpDate {
    type Error = DateError;

    fn try_from((fields, consumed): (DateFields, usize)) -> Result<Self, Self::Error> {
        let year = fields.full_year();
        let month = fields.month.map_or(0, |m| m.number_from_month());
        let date = NaiveDate::from_ymd_opt(year, month, fields.day).ok_or(DateError::InvalidDate {
            year,
            month,
            day: fields.day,
        })?;
        let time = NaiveTime::from_hms_opt(fields.hour, fields.minute, fields.second).ok_or(
            DateError::InvalidTime {
                hour: fields.hour,
                minute: fields.minute,
                second: fields.second,
            },
        )?;

        Ok(Self {
            weekday: fields.weekday.unwrap_or(Weekday::Mon),
            date,
            time,
            format: fields.format.unwrap_or(Format::Rfc1123),
            consumed,
        })
    }
}

/// Parse an HTTP date at the start of `input`.
///
/// # Example
///
/// ```rust
/// use chrono::{Month, Weekday};
/// use tablefsm::grammars::http_date::{parse, Format};
///
/// let date = parse(b"Sunday, 06-Nov-94 08:49:37 GMT").unwrap();
/// assert_eq!(date.weekday, Weekday::Sun);
/// assert_eq!(date.month(), Month::November);
/// assert_eq!(date.date.to_string(), "1994-11-06");
/// assert_eq!(date.format, Format::Rfc850);
/// ```
pub fn parse(input: &[u8]) -> Result<HttpDate, DateError> {
    let mut fields = DateFields::default();
    let consumed = Engine::cloning().run(&HTTP_DATE, &mut Cursor::new(input), &mut fields)?;
    HttpDate::try_from((fields, consumed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::{collect_issues, validate_reachable};
    use chrono::Timelike;

    #[test]
    fn tables_are_well_formed() {
        assert_eq!(collect_issues(&validate_reachable(&HTTP_DATE)), vec![]);
    }

    #[test]
    fn parses_rfc1123() {
        let input = b"Mon, 01 Jan 2010 12:34:56 GMT";
        let date = parse(input).unwrap();

        assert_eq!(date.consumed, input.len());
        assert_eq!(date.weekday, Weekday::Mon);
        assert_eq!(date.month(), Month::January);
        assert_eq!(date.date, NaiveDate::from_ymd_opt(2010, 1, 1).unwrap());
        assert_eq!(
            (date.time.hour(), date.time.minute(), date.time.second()),
            (12, 34, 56)
        );
        assert_eq!(date.format, Format::Rfc1123);
    }

    #[test]
    fn month_is_read_back_from_the_date() {
        let names = [
            "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
        ];
        for (index, name) in names.iter().enumerate() {
            let input = format!("Sat, 01 {name} 2000 00:00:00 GMT");
            let date = parse(input.as_bytes()).unwrap();
            assert_eq!(date.month().number_from_month(), index as u32 + 1);
        }
    }

    #[test]
    fn weekday_is_reported_as_written() {
        // 2010-01-01 was a Friday.
        let date = parse(b"Mon, 01 Jan 2010 12:34:56 GMT").unwrap();
        assert!(!date.weekday_matches());

        let date = parse(b"Sun, 06 Nov 1994 08:49:37 GMT").unwrap();
        assert!(date.weekday_matches());
    }

    #[test]
    fn parses_rfc850_with_two_digit_year() {
        let date = parse(b"Sunday, 06-Nov-94 08:49:37 GMT").unwrap();
        assert_eq!(date.date, NaiveDate::from_ymd_opt(1994, 11, 6).unwrap());
        assert_eq!(date.format, Format::Rfc850);

        let date = parse(b"Thursday, 01-Jan-15 00:00:00 GMT").unwrap();
        assert_eq!(date.date, NaiveDate::from_ymd_opt(2015, 1, 1).unwrap());
    }

    #[test]
    fn parses_asctime_with_padded_day() {
        let date = parse(b"Sun Nov  6 08:49:37 1994").unwrap();
        assert_eq!(date.date, NaiveDate::from_ymd_opt(1994, 11, 6).unwrap());
        assert_eq!(date.format, Format::Asctime);
        assert_eq!(date.consumed, 24);

        let date = parse(b"Mon Jan 11 12:34:45 2010").unwrap();
        assert_eq!(date.date, NaiveDate::from_ymd_opt(2010, 1, 11).unwrap());
    }

    #[test]
    fn leaves_trailing_input() {
        let date = parse(b"Sun, 06 Nov 1994 08:49:37 GMT\r\n").unwrap();
        assert_eq!(date.consumed, 29);
    }

    #[test]
    fn rejects_malformed_dates() {
        for input in [
            "Mon, 1 Jan 2010 12:34:56 GMT",
            "Mon, 01 Jan 2010 12:34:56 UTC",
            "Mon, 01 Foo 2010 12:34:56 GMT",
            "Monday, 01 Jan 2010 12:34:56 GMT",
            "Mon Jan 1 12:34:45 2010",
            "",
        ] {
            assert!(
                matches!(parse(input.as_bytes()), Err(DateError::Syntax(_))),
                "{input}"
            );
        }
    }

    #[test]
    fn rejects_impossible_calendar_values() {
        assert_eq!(
            parse(b"Mon, 31 Feb 2010 12:34:56 GMT"),
            Err(DateError::InvalidDate {
                year: 2010,
                month: 2,
                day: 31
            })
        );
        assert_eq!(
            parse(b"Mon, 01 Feb 2010 25:00:00 GMT"),
            Err(DateError::InvalidTime {
                hour: 25,
                minute: 0,
                second: 0
            })
        );
    }

    #[test]
    fn converts_to_utc() {
        let date = parse(b"Sun, 06 Nov 1994 08:49:37 GMT").unwrap();
        assert_eq!(date.to_utc().timestamp(), 784_111_777);
    }

    #[test]
    fn failed_alternatives_leave_no_fields_behind() {
        // RFC 1123 reads the day name before failing on the comma.
        let mut fields = DateFields::default();
        let mut cursor = Cursor::new(b"Sun Nov  6 08:49:37 1994");

        let consumed = Engine::cloning()
            .run(&HTTP_DATE, &mut cursor, &mut fields)
            .unwrap();

        assert_eq!(consumed, 24);
        assert_eq!(fields.day, 6);
        assert_eq!(fields.year, 1994);
        assert_eq!(fields.format, Some(Format::Asctime));
    }

    #[test]
    fn full_year_expands_only_two_digit_years() {
        let fields = |year, year_digits| DateFields {
            year,
            year_digits,
            ..DateFields::default()
        };
        assert_eq!(fields(69, 2).full_year(), 2069);
        assert_eq!(fields(70, 2).full_year(), 1970);
        assert_eq!(fields(2010, 4).full_year(), 2010);
    }
}
