use crate::types::contest::ContestRecord;
use std::collections::HashMap;

/// 振り分け対象のプラットフォーム一覧
///
/// 各識別子はレコードのURLに対する大文字小文字区別ありの部分文字列リテラルで、
/// 並び順がそのまま振り分けの優先順位になる。
pub const DEFAULT_PLATFORMS: [&str; 8] = [
    "codeforces",
    "topcoder",
    "atcoder",
    "codechef",
    "leetcode",
    "hackerrank",
    "hackerearth",
    "kickstart",
];

/// レコードをプラットフォームごとのバケットへ振り分ける関数
///
/// URLに最初にマッチした識別子のバケットにだけ入る(first-match-wins)。
/// どの識別子にもマッチしないレコードは黙って捨てられる。
/// マッチが0件のプラットフォームにも空のバケットが作られる。
pub fn route_by_platform(
    contests: Vec<ContestRecord>,
    platforms: &[String],
) -> HashMap<String, Vec<ContestRecord>> {
    let mut buckets: HashMap<String, Vec<ContestRecord>> = platforms
        .iter()
        .map(|platform| (platform.clone(), Vec::new()))
        .collect();

    for contest in contests {
        let matched = platforms
            .iter()
            .find(|platform| contest.url.contains(platform.as_str()));
        if let Some(platform) = matched {
            if let Some(bucket) = buckets.get_mut(platform.as_str()) {
                bucket.push(contest);
            }
        }
    }

    buckets
}
