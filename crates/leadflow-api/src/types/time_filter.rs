//! 생성 시각 기준 기간 필터.
//!
//! 날짜 경계는 UTC 자정입니다.

use chrono::{DateTime, Days, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 리드 목록 기간 필터.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TimeFilter {
    #[default]
    All,
    Today,
    Yesterday,
    #[serde(rename = "last3days")]
    Last3Days,
    #[serde(rename = "last7days")]
    Last7Days,
    #[serde(rename = "lastmonth")]
    LastMonth,
}

/// `[from, until)` 구간. 없는 쪽은 열려 있습니다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeRange {
    pub from: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
}

impl TimeFilter {
    /// 쿼리 문자열 값 해석. 알 수 없는 값은 필터 없음으로 취급합니다.
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "today" => TimeFilter::Today,
            "yesterday" => TimeFilter::Yesterday,
            "last3days" => TimeFilter::Last3Days,
            "last7days" => TimeFilter::Last7Days,
            "lastmonth" => TimeFilter::LastMonth,
            _ => TimeFilter::All,
        }
    }

    /// 기준 시각 `now`에 대한 구간을 계산합니다.
    pub fn range(&self, now: DateTime<Utc>) -> TimeRange {
        let today = now.date_naive();

        match self {
            TimeFilter::All => TimeRange::default(),
            TimeFilter::Today => TimeRange::since(today),
            TimeFilter::Yesterday => TimeRange {
                from: today.checked_sub_days(Days::new(1)).map(start_of_day),
                until: Some(start_of_day(today)),
            },
            TimeFilter::Last3Days => TimeRange::since_opt(today.checked_sub_days(Days::new(3))),
            TimeFilter::Last7Days => TimeRange::since_opt(today.checked_sub_days(Days::new(7))),
            TimeFilter::LastMonth => {
                TimeRange::since_opt(today.checked_sub_months(Months::new(1)))
            }
        }
    }
}

impl TimeRange {
    fn since(day: NaiveDate) -> Self {
        Self {
            from: Some(start_of_day(day)),
            until: None,
        }
    }

    fn since_opt(day: Option<NaiveDate>) -> Self {
        day.map(Self::since).unwrap_or_default()
    }
}

fn start_of_day(day: NaiveDate) -> DateTime<Utc> {
    day.and_time(chrono::NaiveTime::MIN).and_utc()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 30, 0).unwrap()
    }

    #[test]
    fn test_parse_unknown_is_all() {
        assert_eq!(TimeFilter::parse("last7days"), TimeFilter::Last7Days);
        assert_eq!(TimeFilter::parse("fortnight"), TimeFilter::All);
        assert_eq!(TimeFilter::parse(""), TimeFilter::All);
    }

    #[test]
    fn test_today_and_yesterday_boundaries() {
        let now = at(2024, 3, 15, 14);

        let today = TimeFilter::Today.range(now);
        assert_eq!(
            today.from,
            Some(Utc.with_ymd_and_hms(2024, 3, 15, 0, 0, 0).unwrap())
        );
        assert_eq!(today.until, None);

        let yesterday = TimeFilter::Yesterday.range(now);
        assert_eq!(
            yesterday.from,
            Some(Utc.with_ymd_and_hms(2024, 3, 14, 0, 0, 0).unwrap())
        );
        assert_eq!(
            yesterday.until,
            Some(Utc.with_ymd_and_hms(2024, 3, 15, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_day_windows() {
        let now = at(2024, 3, 1, 9);
        assert_eq!(
            TimeFilter::Last3Days.range(now).from,
            Some(Utc.with_ymd_and_hms(2024, 2, 27, 0, 0, 0).unwrap())
        );
        assert_eq!(
            TimeFilter::Last7Days.range(now).from,
            Some(Utc.with_ymd_and_hms(2024, 2, 23, 0, 0, 0).unwrap())
        );
        assert_eq!(
            TimeFilter::LastMonth.range(now).from,
            Some(Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(TimeFilter::All.range(now), TimeRange::default());
    }
}
