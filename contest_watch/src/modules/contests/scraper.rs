use crate::modules::contests::extractor::extract_record;
use crate::modules::contests::router::route_by_platform;
use crate::types::contest::ContestRecord;
use anyhow::{Context, Result};
use chrono::{NaiveDateTime, Utc};
use contest_watch_libs::snapshot::SnapshotStore;
use reqwest::Client;
use scraper::{Html, Selector};
use tokio::time::Duration;
use url::Url;

/// オーケストレータに注入する不変の設定値
pub struct ScrapeConfig {
    pub base_url: Url,
    pub platforms: Vec<String>,
}

/// コンテスト一覧ページからdata-ace属性の生フラグメントを取り出すスクレイパ
///
/// セレクタは第三者のマークアップ構造(`contest row`クラス、`subcontest`でない行、
/// 入れ子の`data-ace`付きアンカー)に依存しており、このシステムで最も壊れやすい境界。
pub struct ContestPageScraper {
    row_anchor: Selector,
}

impl ContestPageScraper {
    pub fn new() -> Self {
        let row_anchor =
            Selector::parse(".contest.row:not(.subcontest) > div + div > i + a").unwrap();

        Self { row_anchor }
    }

    /// ドキュメント順で生フラグメントを収集するメソッド
    ///
    /// マッチする要素がなければ空のまま返す。エラーにはならない。
    pub fn locate_fragments(&self, html: &str) -> Vec<String> {
        let html = Html::parse_document(html);

        html.select(&self.row_anchor)
            .filter_map(|anchor| anchor.value().attr("data-ace"))
            .map(String::from)
            .collect()
    }
}

impl Default for ContestPageScraper {
    fn default() -> Self {
        Self::new()
    }
}

pub struct ContestScraper<'a> {
    url: Url,
    platforms: &'a [String],
    store: &'a SnapshotStore,
    client: Client,
    page: ContestPageScraper,
}

impl<'a> ContestScraper<'a> {
    pub fn new(config: &'a ScrapeConfig, store: &'a SnapshotStore) -> Self {
        ContestScraper {
            url: config.base_url.clone(),
            platforms: &config.platforms,
            store,
            client: Client::builder()
                .gzip(true)
                .timeout(Duration::from_secs(10))
                .build()
                .unwrap(),
            page: ContestPageScraper::new(),
        }
    }

    /// コンテスト一覧ページを1回だけ取得するメソッド
    ///
    /// ネットワークエラーと非2xx応答はログに残すだけで伝播させない。
    /// その実行は0件として扱われる。
    pub async fn fetch_page(&self) -> Option<String> {
        let res = match self.client.get(self.url.clone()).send().await {
            Ok(res) => res,
            Err(e) => {
                tracing::error!("failed to fetch contest page: {}", e);
                return None;
            }
        };

        if !res.status().is_success() {
            tracing::error!("contest page responded with status {}", res.status());
            return None;
        }

        match res.text().await {
            Ok(body) => Some(body),
            Err(e) => {
                tracing::error!("failed to read contest page body: {}", e);
                None
            }
        }
    }

    /// ページ全体からレコードの一覧を組み立てるメソッド
    ///
    /// デコードに失敗したフラグメントは警告を出して捨て、バッチは継続する。
    pub fn extract_contests(&self, html: &str, now: NaiveDateTime) -> Vec<ContestRecord> {
        let fragments = self.page.locate_fragments(html);
        let mut contests: Vec<ContestRecord> = Vec::with_capacity(fragments.len());

        for fragment in fragments {
            match extract_record(&fragment, now) {
                Ok(record) => contests.push(record),
                Err(e) => {
                    tracing::warn!("dropping contest fragment: {}", e);
                }
            }
        }

        contests
    }

    /// 取得からスナップショット保存までの一連の処理を行うメソッド
    ///
    /// マッチが0件のプラットフォームにも空配列のスナップショットを書き出す。
    /// 伝播するのはストレージへの書き込み失敗だけ。
    pub async fn run(&self) -> Result<()> {
        tracing::info!("Start to scrape contest data from {}", self.url);

        let contests = match self.fetch_page().await {
            Some(html) => self.extract_contests(&html, Utc::now().naive_utc()),
            None => Vec::new(),
        };
        tracing::info!("Scraping completed, found {} contests", contests.len());

        let mut buckets = route_by_platform(contests, self.platforms);
        for platform in self.platforms {
            let records = buckets.remove(platform).unwrap_or_default();
            self.store.write(platform, &records).with_context(|| {
                let message = format!("failed to write snapshot for {}", platform);
                tracing::error!(message);
                message
            })?;
            tracing::info!("{} contests saved for {}", records.len(), platform);
        }
        tracing::info!("Contest snapshots saved successfully");

        Ok(())
    }
}
