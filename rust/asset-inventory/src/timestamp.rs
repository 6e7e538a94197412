/*
 * Copyright 2025 Carver Automation Corporation.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

//! Timestamp normalization.
//!
//! Every timestamp in the exported document is RFC 3339 in UTC with
//! millisecond precision, e.g. `2024-03-15T10:30:00.000+00:00`. Missing or
//! unparseable values are replaced by the run instant, which is sampled once
//! from a [`Clock`] so that a whole document shares one "now".

use chrono::{
    DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, TimeZone,
    Utc,
};

use crate::table::CellValue;

/// Source of the current instant.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Offset-aware layouts, tried before the naive ones.
const OFFSET_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%z"];

const ISO_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

const DAY_FIRST_DATETIME_FORMATS: &[&str] = &[
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%d-%m-%Y %H:%M:%S",
    "%d-%m-%Y %H:%M",
    "%d.%m.%Y %H:%M:%S",
];

const MONTH_FIRST_DATETIME_FORMATS: &[&str] = &[
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%m-%d-%Y %H:%M:%S",
    "%m-%d-%Y %H:%M",
];

const ISO_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

const DAY_FIRST_DATE_FORMATS: &[&str] = &["%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y", "%d/%m/%y"];

const MONTH_FIRST_DATE_FORMATS: &[&str] = &["%m/%d/%Y", "%m-%d-%Y", "%m/%d/%y"];

/// Smallest year accepted from a `%Y` field.
const MIN_FULL_YEAR: i32 = 1000;

/// Largest serial Excel can represent (9999-12-31).
const MAX_EXCEL_SERIAL: f64 = 2_958_465.0;

/// Formats cell values as canonical document timestamps.
#[derive(Debug, Clone, Copy)]
pub struct TimestampNormalizer {
    now: DateTime<Utc>,
    day_first: bool,
}

impl TimestampNormalizer {
    /// Sample `clock` once; every defaulted value reuses that instant.
    pub fn new(clock: &dyn Clock, day_first: bool) -> Self {
        Self {
            now: clock.now(),
            day_first,
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    /// The run instant in canonical form.
    pub fn now_string(&self) -> String {
        format_timestamp(&self.now)
    }

    /// Normalize a cell, falling back to the run instant.
    pub fn normalize(&self, value: &CellValue) -> String {
        match self.parse(value) {
            Some(dt) => format_timestamp(&dt),
            None => {
                if !value.is_empty() {
                    tracing::debug!(?value, "unparseable timestamp, using run instant");
                }
                self.now_string()
            }
        }
    }

    /// Interpret a cell as a UTC instant. Naive values are taken as UTC.
    pub fn parse(&self, value: &CellValue) -> Option<DateTime<Utc>> {
        match value {
            CellValue::Empty | CellValue::Bool(_) => None,
            CellValue::DateTime(naive) => Some(Utc.from_utc_datetime(naive)),
            CellValue::Number(serial) => from_excel_serial(*serial),
            CellValue::Text(raw) => self.parse_text(raw),
        }
    }

    fn parse_text(&self, raw: &str) -> Option<DateTime<Utc>> {
        let value = raw.trim();
        if value.is_empty() {
            return None;
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
            return Some(dt.with_timezone(&Utc));
        }
        for fmt in OFFSET_FORMATS {
            if let Ok(dt) = DateTime::parse_from_str(value, fmt) {
                return Some(dt.with_timezone(&Utc));
            }
        }

        let (datetime_locale, date_locale) = if self.day_first {
            (DAY_FIRST_DATETIME_FORMATS, DAY_FIRST_DATE_FORMATS)
        } else {
            (MONTH_FIRST_DATETIME_FORMATS, MONTH_FIRST_DATE_FORMATS)
        };

        for fmt in ISO_DATETIME_FORMATS.iter().chain(datetime_locale) {
            if let Ok(naive) = NaiveDateTime::parse_from_str(value, fmt) {
                if has_full_year(&naive.date()) {
                    return Some(Utc.from_utc_datetime(&naive));
                }
            }
        }
        for fmt in ISO_DATE_FORMATS.iter().chain(date_locale) {
            if let Ok(date) = NaiveDate::parse_from_str(value, fmt) {
                if has_full_year(&date) {
                    return Some(Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)));
                }
            }
        }

        // Serials exported as text, e.g. "45000" or "45000.5".
        value
            .parse::<f64>()
            .ok()
            .and_then(from_excel_serial)
    }
}

/// `%Y` also accepts one or two digits, so "05/03/23" matches `%Y/%m/%d`
/// as year 5 and `%d/%m/%Y` as year 23. Such matches are rejected so the
/// two-digit `%y` layouts get their turn.
fn has_full_year(date: &NaiveDate) -> bool {
    date.year() >= MIN_FULL_YEAR
}

/// Canonical document form of an instant.
pub fn format_timestamp(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, false)
}

/// Convert an Excel serial day number (1900 date system) to UTC.
pub fn from_excel_serial(serial: f64) -> Option<DateTime<Utc>> {
    if !serial.is_finite() || serial <= 0.0 || serial > MAX_EXCEL_SERIAL {
        return None;
    }
    // Day 0 is 1899-12-30 once the fictitious 1900-02-29 is accounted for.
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_time(NaiveTime::MIN);
    let millis = (serial * 86_400_000.0).round() as i64;
    let naive = epoch.checked_add_signed(Duration::milliseconds(millis))?;
    Some(Utc.from_utc_datetime(&naive))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frozen() -> TimestampNormalizer {
        let now = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();
        TimestampNormalizer::new(&FixedClock(now), true)
    }

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    #[test]
    fn test_empty_uses_run_instant() {
        let n = frozen();
        assert_eq!(n.normalize(&CellValue::Empty), "2025-01-02T03:04:05.000+00:00");
        assert_eq!(n.normalize(&text("  ")), "2025-01-02T03:04:05.000+00:00");
    }

    #[test]
    fn test_garbage_uses_run_instant() {
        let n = frozen();
        assert_eq!(n.normalize(&text("not a date")), n.now_string());
        assert_eq!(n.normalize(&CellValue::Bool(true)), n.now_string());
        assert_eq!(n.normalize(&CellValue::Number(-3.0)), n.now_string());
    }

    #[test]
    fn test_typed_datetime_is_utc() {
        let n = frozen();
        let naive = NaiveDate::from_ymd_opt(2023, 6, 1)
            .unwrap()
            .and_hms_milli_opt(8, 15, 30, 250)
            .unwrap();
        assert_eq!(
            n.normalize(&CellValue::DateTime(naive)),
            "2023-06-01T08:15:30.250+00:00"
        );
    }

    #[test]
    fn test_offset_is_converted_to_utc() {
        let n = frozen();
        assert_eq!(
            n.normalize(&text("2023-06-01T10:00:00+02:00")),
            "2023-06-01T08:00:00.000+00:00"
        );
        assert_eq!(
            n.normalize(&text("2023-06-01 10:00:00+02:00")),
            "2023-06-01T08:00:00.000+00:00"
        );
    }

    #[test]
    fn test_iso_and_day_first_text() {
        let n = frozen();
        assert_eq!(n.normalize(&text("2023-03-15")), "2023-03-15T00:00:00.000+00:00");
        assert_eq!(
            n.normalize(&text("2023-03-15 10:30:00")),
            "2023-03-15T10:30:00.000+00:00"
        );
        assert_eq!(n.normalize(&text("05/03/2023")), "2023-03-05T00:00:00.000+00:00");
        assert_eq!(
            n.normalize(&text("15/03/2023 10:30")),
            "2023-03-15T10:30:00.000+00:00"
        );
    }

    #[test]
    fn test_two_digit_year_is_day_first() {
        let n = frozen();
        assert_eq!(n.normalize(&text("05/03/23")), "2023-03-05T00:00:00.000+00:00");
        assert_eq!(n.normalize(&text("15/03/23")), "2023-03-15T00:00:00.000+00:00");
        assert_eq!(
            n.normalize(&text("2023/03/05")),
            "2023-03-05T00:00:00.000+00:00"
        );
    }

    #[test]
    fn test_two_digit_year_month_first() {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let n = TimestampNormalizer::new(&FixedClock(now), false);
        assert_eq!(n.normalize(&text("05/03/23")), "2023-05-03T00:00:00.000+00:00");
    }

    #[test]
    fn test_month_first_locale() {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let n = TimestampNormalizer::new(&FixedClock(now), false);
        assert_eq!(n.normalize(&text("05/03/2023")), "2023-05-03T00:00:00.000+00:00");
    }

    #[test]
    fn test_excel_serial() {
        let n = frozen();
        // 45000 is 2023-03-15 in the 1900 date system.
        assert_eq!(
            n.normalize(&CellValue::Number(45000.0)),
            "2023-03-15T00:00:00.000+00:00"
        );
        assert_eq!(
            n.normalize(&CellValue::Number(45000.5)),
            "2023-03-15T12:00:00.000+00:00"
        );
        assert_eq!(n.normalize(&text("45000")), "2023-03-15T00:00:00.000+00:00");
    }

    #[test]
    fn test_now_is_sampled_once() {
        let n = TimestampNormalizer::new(&SystemClock, true);
        let first = n.now_string();
        std::thread::sleep(std::time::Duration::from_millis(5));
        assert_eq!(n.normalize(&CellValue::Empty), first);
    }
}
