//! Calendar dates and business-timezone day boundaries
//!
//! Dates cross the API as canonical `YYYY-MM-DD`. Date to timestamp
//! conversion happens in the handlers; repositories only see Unix millis.

use chrono::{NaiveDate, NaiveTime};
use chrono_tz::Tz;

use super::{AppError, AppResult, ErrorCode};

/// Parse a canonical `YYYY-MM-DD` date. Non-padded or otherwise
/// non-canonical spellings are rejected.
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    let parsed = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok();
    match parsed {
        Some(d) if format_date(d) == date => Ok(d),
        _ => Err(AppError::with_message(
            ErrorCode::InvalidMenuDate,
            format!("Invalid date: {date} (expected YYYY-MM-DD)"),
        )
        .with_detail("date", date)),
    }
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Today in the business timezone
pub fn today(tz: Tz) -> NaiveDate {
    chrono::Utc::now().with_timezone(&tz).date_naive()
}

/// Local midnight of `date` as Unix millis.
///
/// DST gap fallback: if local midnight does not exist, UTC midnight is used.
pub fn day_start_millis(date: NaiveDate, tz: Tz) -> i64 {
    let naive = date.and_time(NaiveTime::MIN);
    naive
        .and_local_timezone(tz)
        .earliest()
        .map(|dt| dt.timestamp_millis())
        .unwrap_or_else(|| naive.and_utc().timestamp_millis())
}

/// Start of the following day; callers use `< end`.
///
/// `[day_start, day_end)` covers 00:00:00.000 through 23:59:59.999.
pub fn day_end_millis(date: NaiveDate, tz: Tz) -> i64 {
    match date.succ_opt() {
        Some(next) => day_start_millis(next, tz),
        None => i64::MAX,
    }
}

/// A resolved calendar range with its millisecond bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub start: Option<i64>,
    pub end: Option<i64>,
}

/// Resolve optional `from`/`to` query values.
///
/// Neither: all time. One of them: that single day. Both: inclusive range.
pub fn resolve_range(from: Option<&str>, to: Option<&str>, tz: Tz) -> AppResult<DateRange> {
    let from = from.map(parse_date).transpose()?;
    let to = to.map(parse_date).transpose()?;

    let (from, to) = match (from, to) {
        (None, None) => {
            return Ok(DateRange {
                from: None,
                to: None,
                start: None,
                end: None,
            });
        }
        (Some(d), None) | (None, Some(d)) => (d, d),
        (Some(f), Some(t)) => (f, t),
    };

    if to < from {
        return Err(AppError::new(ErrorCode::InvalidDateRange)
            .with_detail("from", format_date(from))
            .with_detail("to", format_date(to)));
    }

    Ok(DateRange {
        from: Some(from),
        to: Some(to),
        start: Some(day_start_millis(from, tz)),
        end: Some(day_end_millis(to, tz)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_is_strict() {
        assert_eq!(
            parse_date("2024-03-01").unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
        );
        for bad in ["2024-3-1", "2024-03-01T00:00:00Z", "01/03/2024", "2024-02-30", ""] {
            let err = parse_date(bad).unwrap_err();
            assert_eq!(err.code, ErrorCode::InvalidMenuDate, "{bad}");
        }
    }

    #[test]
    fn test_day_bounds_utc() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let start = day_start_millis(date, Tz::UTC);
        let end = day_end_millis(date, Tz::UTC);
        assert_eq!(start, 1_709_251_200_000);
        assert_eq!(end - start, 86_400_000);
    }

    #[test]
    fn test_day_bounds_budapest() {
        // CET is UTC+1 in March before DST
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let tz: Tz = "Europe/Budapest".parse().unwrap();
        assert_eq!(day_start_millis(date, tz), 1_709_251_200_000 - 3_600_000);
    }

    #[test]
    fn test_dst_day_is_23_hours() {
        let tz: Tz = "Europe/Budapest".parse().unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
        assert_eq!(
            day_end_millis(date, tz) - day_start_millis(date, tz),
            23 * 3_600_000
        );
    }

    #[test]
    fn test_resolve_range() {
        let tz = Tz::UTC;
        let all = resolve_range(None, None, tz).unwrap();
        assert_eq!(all.start, None);
        assert_eq!(all.end, None);

        let single = resolve_range(Some("2024-03-01"), None, tz).unwrap();
        assert_eq!(single.from, single.to);
        assert_eq!(single.end.unwrap() - single.start.unwrap(), 86_400_000);

        let week = resolve_range(Some("2024-03-01"), Some("2024-03-07"), tz).unwrap();
        assert_eq!(week.end.unwrap() - week.start.unwrap(), 7 * 86_400_000);

        let err = resolve_range(Some("2024-03-07"), Some("2024-03-01"), tz).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidDateRange);
    }
}
