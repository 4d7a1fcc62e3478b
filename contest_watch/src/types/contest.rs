use serde::{Deserialize, Serialize};

/// 正規化済みのコンテスト情報
///
/// フィールドの宣言順がそのままスナップショットJSONのキー順になる。
/// `type_`はデータソース由来のキー名をそのまま踏襲している。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContestRecord {
    pub name: String,
    pub url: String,
    pub start_time: String,
    pub end_time: String,
    pub duration: String,
    pub type_: String,
    pub in_24_hours: String,
    pub status: String,
}

/// `data-ace`属性に埋め込まれた生のコンテスト情報
///
/// `time`オブジェクト自体が欠けているフラグメントはデコード段階で弾かれる。
/// `start`/`end`は個別に欠けることがある。
#[derive(Debug, Deserialize)]
pub struct ContestJson {
    pub title: Option<String>,
    pub desc: Option<String>,
    pub time: ContestTime,
}

#[derive(Debug, Deserialize)]
pub struct ContestTime {
    pub start: Option<String>,
    pub end: Option<String>,
}
