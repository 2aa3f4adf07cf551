//! Calendar-day resolution for learners in fixed UTC offsets.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};

/// UTC-12:00
pub const MIN_OFFSET_MINUTES: i32 = -12 * 60;
/// UTC+14:00
pub const MAX_OFFSET_MINUTES: i32 = 14 * 60;

pub fn is_valid_offset(offset_minutes: i32) -> bool {
    (MIN_OFFSET_MINUTES..=MAX_OFFSET_MINUTES).contains(&offset_minutes)
}

/// The learner's calendar date at `now`
pub fn local_today(now: DateTime<Utc>, offset_minutes: i32) -> NaiveDate {
    (now + Duration::minutes(i64::from(offset_minutes))).date_naive()
}

/// UTC instants bounding the learner's local `day`, as `[start, end)`
pub fn local_day_bounds(day: NaiveDate, offset_minutes: i32) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = Utc.from_utc_datetime(&day.and_time(NaiveTime::MIN)) - Duration::minutes(i64::from(offset_minutes));
    (start, start + Duration::days(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn test_local_today_east_of_utc() {
        // 23:30 UTC is already the next day in UTC+08:00
        let now = at(2024, 6, 1, 23, 30);
        assert_eq!(local_today(now, 480), NaiveDate::from_ymd_opt(2024, 6, 2).unwrap());
        assert_eq!(local_today(now, 0), NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
    }

    #[test]
    fn test_local_today_west_of_utc() {
        let now = at(2024, 6, 1, 3, 0);
        assert_eq!(local_today(now, -300), NaiveDate::from_ymd_opt(2024, 5, 31).unwrap());
    }

    #[test]
    fn test_day_bounds_contain_now() {
        for offset in [-720, -300, 0, 330, 480, 840] {
            let now = at(2024, 2, 29, 18, 45);
            let (start, end) = local_day_bounds(local_today(now, offset), offset);
            assert!(start <= now && now < end, "offset {offset}");
            assert_eq!(end - start, Duration::days(1));
        }
    }

    #[test]
    fn test_offset_range() {
        assert!(is_valid_offset(0));
        assert!(is_valid_offset(-720));
        assert!(is_valid_offset(840));
        assert!(!is_valid_offset(841));
        assert!(!is_valid_offset(-721));
    }
}
