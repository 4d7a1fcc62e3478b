use crate::modules::contests::normalize::{
    elapsed_seconds, format_timestamp, parse_datetime, DateTimeParseError,
};
use crate::modules::utils::format_duration;
use crate::types::contest::{ContestJson, ContestRecord};
use chrono::{Duration, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

type Result<T> = std::result::Result<T, ExtractError>;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("failed to decode contest fragment")]
    Decode(#[from] serde_json::Error),
    #[error(transparent)]
    Timestamp(#[from] DateTimeParseError),
}

/// 文字列値の開始位置(キーの閉じ引用符 + コロン + 値の開き引用符)
static VALUE_OPENING: Lazy<Regex> = Lazy::new(|| Regex::new(r#""\s*:\s*""#).unwrap());

/// フラグメント中の文字列値に紛れ込んだ生の二重引用符をエスケープする関数
///
/// 引用符は直後の非空白文字が`,` `}` `]`または入力末尾のときだけ閉じ引用符とみなし、
/// それ以外は値の一部としてエスケープする。あくまでベストエフォートの修復であり、
/// このヒューリスティックで直せないフラグメントはデコード段階で落ちる。
pub fn repair_json(raw: &str) -> String {
    let bytes = raw.as_bytes();
    let mut repaired = String::with_capacity(raw.len());
    let mut cursor = 0;

    while let Some(m) = VALUE_OPENING.find_at(raw, cursor) {
        repaired.push_str(&raw[cursor..m.end()]);

        let mut i = m.end();
        while i < bytes.len() {
            match bytes[i] {
                b'\\' => {
                    repaired.push('\\');
                    i += 1;
                    if let Some(c) = raw[i..].chars().next() {
                        repaired.push(c);
                        i += c.len_utf8();
                    }
                }
                b'"' => {
                    if is_closing_quote(bytes, i) {
                        repaired.push('"');
                        i += 1;
                        break;
                    }
                    repaired.push_str("\\\"");
                    i += 1;
                }
                _ => {
                    let start = i;
                    while i < bytes.len() && bytes[i] != b'\\' && bytes[i] != b'"' {
                        i += 1;
                    }
                    repaired.push_str(&raw[start..i]);
                }
            }
        }
        cursor = i;
    }
    repaired.push_str(&raw[cursor..]);

    repaired
}

fn is_closing_quote(bytes: &[u8], at: usize) -> bool {
    let mut i = at + 1;
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    i >= bytes.len() || matches!(bytes[i], b',' | b'}' | b']')
}

/// 1フラグメントを正規化済みレコードへ変換する関数
///
/// `now`は呼び出し側(オーケストレータ)が実行ごとに1回だけ採取して渡す。
/// 失敗はこの関数の境界を越えず、`ExtractError`として返る。
pub fn extract_record(raw: &str, now: NaiveDateTime) -> Result<ContestRecord> {
    let repaired = repair_json(raw);
    let contest: ContestJson = serde_json::from_str(&repaired)?;

    let start = contest
        .time
        .start
        .as_deref()
        .map(parse_datetime)
        .transpose()?;
    let end = contest.time.end.as_deref().map(parse_datetime).transpose()?;

    let elapsed = match (start, end) {
        (Some(start), Some(end)) => elapsed_seconds(start, end),
        _ => 0,
    };

    let in_24_hours = match start {
        Some(start) if start - now <= Duration::hours(24) => "Yes",
        _ => "No",
    };
    let status = match (start, end) {
        (Some(start), Some(end)) if start <= now && now <= end => "CODING",
        _ => "BEFORE",
    };

    let url = match contest.desc {
        Some(desc) => match desc.strip_prefix("url: ") {
            Some(stripped) => String::from(stripped),
            None => desc,
        },
        None => String::from("Unknown"),
    };

    Ok(ContestRecord {
        name: contest.title.unwrap_or_else(|| String::from("Unknown")),
        url,
        start_time: start
            .map(format_timestamp)
            .unwrap_or_else(|| String::from("-")),
        end_time: end
            .map(format_timestamp)
            .unwrap_or_else(|| String::from("-")),
        duration: format_duration(elapsed),
        type_: String::from("Unknown"),
        in_24_hours: String::from(in_24_hours),
        status: String::from(status),
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn test_well_formed_fragment_is_untouched() {
        let raw = r#"{"title": "Sample Contest", "desc": "url: https://example.com"}"#;
        assert_eq!(repair_json(raw), raw);
    }

    #[test]
    fn test_interior_quotes_are_escaped() {
        let raw = r#"{"title": "The "Grand" Final", "desc": "url: https://example.com"}"#;
        let repaired = repair_json(raw);

        assert_eq!(
            repaired,
            r#"{"title": "The \"Grand\" Final", "desc": "url: https://example.com"}"#
        );
        assert!(serde_json::from_str::<serde_json::Value>(&repaired).is_ok());
    }

    #[test]
    fn test_already_escaped_quotes_are_preserved() {
        let raw = r#"{"title": "The \"Grand\" Final"}"#;
        assert_eq!(repair_json(raw), raw);
    }

    #[test]
    fn test_sample_contest() {
        let raw = r#"{"title": "Sample Contest", "desc": "url: https://example.com", "time": {"start": "2023-01-01T12:00:00", "end": "2023-01-01T15:00:00"}}"#;
        let record = extract_record(raw, at(2022, 12, 31, 0, 0)).unwrap();

        assert_eq!(record.name, "Sample Contest");
        assert!(record.url.contains("example.com"));
        assert_eq!(record.start_time, "2023-01-01T12:00:00.000000Z");
        assert_eq!(record.end_time, "2023-01-01T15:00:00.000000Z");
        assert_eq!(record.duration, "3 hours");
        assert_eq!(record.type_, "Unknown");
        assert_eq!(record.in_24_hours, "No");
        assert_eq!(record.status, "BEFORE");
    }

    #[test]
    fn test_running_contest_is_coding() {
        let raw = r#"{"title": "Sample Contest", "desc": "url: https://example.com", "time": {"start": "2023-01-01T12:00:00", "end": "2023-01-01T15:00:00"}}"#;
        let record = extract_record(raw, at(2023, 1, 1, 13, 0)).unwrap();

        assert_eq!(record.status, "CODING");
        assert_eq!(record.in_24_hours, "Yes");
    }

    #[test]
    fn test_imminent_contest_is_within_24_hours() {
        let raw = r#"{"title": "Sample Contest", "desc": "url: https://example.com", "time": {"start": "2023-01-01T12:00:00", "end": "2023-01-01T15:00:00"}}"#;
        let record = extract_record(raw, at(2023, 1, 1, 0, 0)).unwrap();

        assert_eq!(record.in_24_hours, "Yes");
        assert_eq!(record.status, "BEFORE");
    }

    #[test]
    fn test_missing_fields_fall_back_to_sentinels() {
        let raw = r#"{"time": {}}"#;
        let record = extract_record(raw, at(2023, 1, 1, 0, 0)).unwrap();

        assert_eq!(record.name, "Unknown");
        assert_eq!(record.url, "Unknown");
        assert_eq!(record.start_time, "-");
        assert_eq!(record.end_time, "-");
        assert_eq!(record.duration, "0 minutes");
        assert_eq!(record.in_24_hours, "No");
        assert_eq!(record.status, "BEFORE");
    }

    #[test]
    fn test_reversed_window_is_invalid_duration() {
        let raw = r#"{"title": "Backwards", "desc": "url: https://example.com", "time": {"start": "2023-01-01T15:00:00", "end": "2023-01-01T12:00:00"}}"#;
        let record = extract_record(raw, at(2023, 1, 1, 0, 0)).unwrap();

        assert_eq!(record.duration, "Invalid duration");
    }

    #[test]
    fn test_desc_without_prefix_is_kept() {
        let raw = r#"{"title": "Sample", "desc": "https://example.com", "time": {}}"#;
        let record = extract_record(raw, at(2023, 1, 1, 0, 0)).unwrap();

        assert_eq!(record.url, "https://example.com");
    }

    #[test]
    fn test_undecodable_fragment_is_an_error() {
        let result = extract_record("not a contest", at(2023, 1, 1, 0, 0));
        assert!(matches!(result, Err(ExtractError::Decode(_))));
    }

    #[test]
    fn test_missing_time_object_is_an_error() {
        let raw = r#"{"title": "Sample Contest", "desc": "url: https://example.com"}"#;
        let result = extract_record(raw, at(2023, 1, 1, 0, 0));

        assert!(matches!(result, Err(ExtractError::Decode(_))));
    }

    #[test]
    fn test_unparsable_timestamp_is_an_error() {
        let raw = r#"{"title": "Sample", "desc": "url: https://example.com", "time": {"start": "whenever", "end": "2023-01-01T15:00:00"}}"#;
        let result = extract_record(raw, at(2023, 1, 1, 0, 0));

        assert!(matches!(result, Err(ExtractError::Timestamp(_))));
    }
}
