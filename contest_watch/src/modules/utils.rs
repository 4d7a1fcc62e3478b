/// 経過秒数を人間可読な文字列に変換する関数
///
/// 負の秒数は`Invalid duration`、1分未満は`0 minutes`になる。
/// 秒の端数は切り捨てられる。
pub fn format_duration(seconds: i64) -> String {
    if seconds < 0 {
        return String::from("Invalid duration");
    }

    let days = seconds / 86400;
    let hours = (seconds % 86400) / 3600;
    let minutes = (seconds % 3600) / 60;

    let mut parts: Vec<String> = Vec::with_capacity(3);
    for (value, unit) in [(days, "day"), (hours, "hour"), (minutes, "minute")] {
        if value > 0 {
            if value == 1 {
                parts.push(format!("1 {}", unit));
            } else {
                parts.push(format!("{} {}s", value, unit));
            }
        }
    }

    if parts.is_empty() {
        String::from("0 minutes")
    } else {
        parts.join(", ")
    }
}
