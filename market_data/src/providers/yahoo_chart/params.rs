use chrono::{Days, NaiveDate, NaiveTime};
use serde::Serialize;

use crate::models::request::BarsRequest;

/// Query string for one chart request.
///
/// The endpoint treats `period2` as exclusive, so it points at midnight UTC
/// of the day after the requested end; the inclusive end day stays in range.
#[derive(Debug, Serialize)]
pub(crate) struct ChartQuery {
    period1: i64,
    period2: i64,
    interval: &'static str,
}

impl ChartQuery {
    /// Daily-interval query covering the request's inclusive date range.
    pub(crate) fn daily(request: &BarsRequest) -> Self {
        Self {
            period1: unix_midnight(request.start),
            period2: unix_midnight(day_after(request.end)),
            interval: "1d",
        }
    }
}

fn unix_midnight(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp()
}

fn day_after(date: NaiveDate) -> NaiveDate {
    // Saturates at the calendar boundary instead of panicking.
    date.checked_add_days(Days::new(1)).unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn period_bounds_cover_the_end_day() {
        let request = BarsRequest::new("AAPL", day(2024, 1, 2), day(2024, 1, 5));
        let query = ChartQuery::daily(&request);

        // 2024-01-02T00:00:00Z and 2024-01-06T00:00:00Z.
        assert_eq!(query.period1, 1_704_153_600);
        assert_eq!(query.period2, 1_704_499_200);
        assert_eq!(query.interval, "1d");
    }

    #[test]
    fn single_day_request_spans_one_day() {
        let request = BarsRequest::new("AAPL", day(2024, 1, 2), day(2024, 1, 2));
        let query = ChartQuery::daily(&request);
        assert_eq!(query.period2 - query.period1, 86_400);
    }

    #[test]
    fn query_serializes_to_wire_names() {
        let request = BarsRequest::new("AAPL", day(2024, 1, 2), day(2024, 1, 5));
        let encoded = serde_urlencoded::to_string(ChartQuery::daily(&request)).unwrap();
        assert_eq!(
            encoded,
            "period1=1704153600&period2=1704499200&interval=1d"
        );
    }
}
