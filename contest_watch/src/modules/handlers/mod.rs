use axum::{
    extract::{Extension, Path},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use contest_watch_libs::snapshot::{SnapshotError, SnapshotStore};
use serde_json::json;
use std::sync::Arc;

/// スナップショットの中身をそのまま応答ボディとして返すハンドラ
///
/// スナップショットが存在しないプラットフォームは404と固定のエラーペイロードを返す。
pub async fn contests_by_platform(
    Path(platform): Path<String>,
    Extension(store): Extension<Arc<SnapshotStore>>,
) -> Response {
    // プラットフォーム名はファイル名の一部になるので英数字以外は受け付けない
    if platform.is_empty() || !platform.chars().all(|c| c.is_ascii_alphanumeric()) {
        return not_found();
    }

    match store.read_raw(&platform) {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            body,
        )
            .into_response(),
        Err(SnapshotError::NotFound(_)) => not_found(),
        Err(e) => {
            tracing::error!("failed to read snapshot for {}: {}", platform, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Failed to read snapshot"})),
            )
                .into_response()
        }
    }
}

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"error": "File not found"})),
    )
        .into_response()
}

pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

pub async fn readiness(Extension(store): Extension<Arc<SnapshotStore>>) -> StatusCode {
    if store.available() {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}
