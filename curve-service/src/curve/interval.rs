use time::{Date, Month, OffsetDateTime, PrimitiveDateTime, Time, UtcOffset};

use super::CurveError;

pub const DEFAULT_INTERVAL_COUNT: u8 = 12;
pub const MAX_INTERVAL_COUNT: u8 = 12;
pub const MIN_INTERVAL_COUNT: u8 = 1;

/// Half-open `[start, end)` range of a curve query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryWindow {
    pub start: OffsetDateTime,
    pub end: OffsetDateTime,
}

impl QueryWindow {
    pub fn contains(&self, ts: OffsetDateTime) -> bool {
        self.start <= ts && ts < self.end
    }
}

/// Calendar month the window ends with, parsed from `YYYYMM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnchorPeriod {
    pub year: i32,
    pub month: Month,
}

impl AnchorPeriod {
    pub fn parse(period: &str) -> Result<Self, CurveError> {
        let invalid = || CurveError::InvalidPeriod(period.to_string());

        if period.len() != 6 || !period.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let year: i32 = period[..4].parse().map_err(|_| invalid())?;
        let month: u8 = period[4..].parse().map_err(|_| invalid())?;
        let month = Month::try_from(month).map_err(|_| invalid())?;

        Ok(Self { year, month })
    }

    /// Months since year 0, used for month arithmetic.
    fn month_index(self) -> i32 {
        self.year * 12 + i32::from(u8::from(self.month)) - 1
    }

    fn from_month_index(index: i32) -> Self {
        let year = index.div_euclid(12);
        let month = (index.rem_euclid(12) + 1) as u8;
        Self {
            year,
            month: Month::try_from(month).unwrap_or(Month::January),
        }
    }

    fn first_day(self) -> Option<Date> {
        Date::from_calendar_date(self.year, self.month, 1).ok()
    }
}

/// Parse the optional `interval` query parameter.
///
/// Absent or unparsable input yields the default of 12; anything else is
/// clamped to `[1, 12]`.
pub fn parse_interval_count(raw: Option<&str>) -> u8 {
    match raw.map(str::trim).and_then(|s| s.parse::<i64>().ok()) {
        Some(n) => n.clamp(i64::from(MIN_INTERVAL_COUNT), i64::from(MAX_INTERVAL_COUNT)) as u8,
        None => DEFAULT_INTERVAL_COUNT,
    }
}

/// Window covering `interval_count` months ending with the anchor month.
///
/// Boundaries are local midnights on the first day of the month at `offset`.
pub fn query_window(
    anchor: AnchorPeriod,
    interval_count: u8,
    offset: UtcOffset,
) -> Result<QueryWindow, CurveError> {
    let out_of_range = || {
        CurveError::InvalidPeriod(format!("{:04}{:02}", anchor.year, u8::from(anchor.month)))
    };

    let end_month = AnchorPeriod::from_month_index(anchor.month_index() + 1);
    let start_month = AnchorPeriod::from_month_index(end_month.month_index() - i32::from(interval_count));

    let at_midnight = |period: AnchorPeriod| {
        period
            .first_day()
            .map(|date| PrimitiveDateTime::new(date, Time::MIDNIGHT).assume_offset(offset))
    };

    Ok(QueryWindow {
        start: at_midnight(start_month).ok_or_else(out_of_range)?,
        end: at_midnight(end_month).ok_or_else(out_of_range)?,
    })
}
