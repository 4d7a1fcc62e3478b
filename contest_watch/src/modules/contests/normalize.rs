use chrono::{DateTime, NaiveDate, NaiveDateTime};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("unrecognized datetime format: `{0}`")]
pub struct DateTimeParseError(pub String);

/// データソースに現れる表記ゆれを吸収するためのフォーマット一覧
const DATETIME_FORMATS: [&str; 6] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%d.%m.%Y %H:%M:%S",
    "%d.%m.%Y %H:%M",
];

/// 日時文字列をUTCの壁時計時刻としてパースする関数
///
/// オフセット付きの入力でもオフセット変換は行わず、表記上の時刻をそのまま採用する
/// (データソースの挙動に合わせている)。
pub fn parse_datetime(value: &str) -> Result<NaiveDateTime, DateTimeParseError> {
    let value = value.trim();

    if let Ok(instant) = DateTime::parse_from_rfc3339(value) {
        return Ok(instant.naive_local());
    }
    if let Ok(instant) = DateTime::parse_from_rfc2822(value) {
        return Ok(instant.naive_local());
    }
    for format in DATETIME_FORMATS {
        if let Ok(instant) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(instant);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        if let Some(instant) = date.and_hms_opt(0, 0, 0) {
            return Ok(instant);
        }
    }

    Err(DateTimeParseError(String::from(value)))
}

/// 正規形`YYYY-MM-DDTHH:MM:SS.ffffffZ`に整形する関数
pub fn format_timestamp(instant: NaiveDateTime) -> String {
    instant.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string()
}

pub fn elapsed_seconds(start: NaiveDateTime, end: NaiveDateTime) -> i64 {
    (end - start).num_seconds()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_canonical_round_trip() {
        let instant = parse_datetime("2023-01-01T12:00:00").unwrap();
        assert_eq!(format_timestamp(instant), "2023-01-01T12:00:00.000000Z");
    }

    #[test]
    fn test_space_separated_format() {
        let instant = parse_datetime("2023-06-15 09:30:00").unwrap();
        assert_eq!(format_timestamp(instant), "2023-06-15T09:30:00.000000Z");
    }

    #[test]
    fn test_offset_keeps_wall_clock() {
        let instant = parse_datetime("2023-01-01T12:00:00+09:00").unwrap();
        assert_eq!(format_timestamp(instant), "2023-01-01T12:00:00.000000Z");
    }

    #[test]
    fn test_fractional_seconds_preserved() {
        let instant = parse_datetime("2023-01-01T12:00:00.250").unwrap();
        assert_eq!(format_timestamp(instant), "2023-01-01T12:00:00.250000Z");
    }

    #[test]
    fn test_date_only_becomes_midnight() {
        let instant = parse_datetime("2023-01-01").unwrap();
        assert_eq!(format_timestamp(instant), "2023-01-01T00:00:00.000000Z");
    }

    #[test]
    fn test_unparsable_input_is_rejected() {
        let err = parse_datetime("next tuesday").unwrap_err();
        assert_eq!(err.to_string(), "unrecognized datetime format: `next tuesday`");
    }

    #[test]
    fn test_elapsed_seconds_is_signed() {
        let start = parse_datetime("2023-01-01T12:00:00").unwrap();
        let end = parse_datetime("2023-01-01T15:00:00").unwrap();

        assert_eq!(elapsed_seconds(start, end), 10800);
        assert_eq!(elapsed_seconds(end, start), -10800);
    }
}
