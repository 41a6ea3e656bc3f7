//! Mock lookup service backed by a small built-in disease dataset.
//!
//! Serves `GET /sick?q=<text>` with the same wire format as the real
//! service: a JSON array of `{"sickCd": ..., "sickNm": ...}` objects whose
//! name contains the query. A blank query yields `[]`.
//!
//! ```text
//! $ typeahead serve --addr 127.0.0.1:4000
//! $ curl 'http://127.0.0.1:4000/sick?q=%EC%95%94'
//! ```

use axum::{extract::Query, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::net::TcpListener;

/// `(code, name)` pairs, in service order.
pub const DISEASES: &[(&str, &str)] = &[
    ("C22", "간암"),
    ("C44", "피부암"),
    ("C16", "위암"),
    ("C34", "폐암"),
    ("C18", "대장암"),
    ("C50", "유방암"),
    ("C73", "갑상선암"),
    ("C25", "췌장암"),
    ("C61", "전립선암"),
    ("C53", "자궁경부암"),
    ("C67", "방광암"),
    ("C64", "신장암"),
    ("C71", "뇌암"),
    ("K70", "알코올성 간질환"),
    ("K74", "간경변증"),
    ("B18", "만성 바이러스 간염"),
    ("K76", "지방간"),
    ("L40", "건선"),
    ("L20", "아토피 피부염"),
    ("L70", "여드름"),
    ("J45", "천식"),
    ("J18", "폐렴"),
    ("E11", "2형 당뇨병"),
    ("I10", "본태성 고혈압"),
    ("I21", "급성 심근경색증"),
    ("I63", "뇌경색증"),
    ("M81", "골다공증"),
    ("F32", "우울에피소드"),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SickRecord {
    pub sick_cd: String,
    pub sick_nm: String,
}

#[derive(Debug, Deserialize)]
struct SickQuery {
    #[serde(default)]
    q: String,
}

/// Records whose name contains `query`, in dataset order.
pub fn matching(query: &str) -> Vec<SickRecord> {
    let query = query.trim();
    if query.is_empty() {
        return Vec::new();
    }
    DISEASES
        .iter()
        .filter(|(_, name)| name.contains(query))
        .map(|(code, name)| SickRecord {
            sick_cd: code.to_string(),
            sick_nm: name.to_string(),
        })
        .collect()
}

async fn sick(Query(params): Query<SickQuery>) -> Json<Vec<SickRecord>> {
    let records = matching(&params.q);
    tracing::debug!(q = %params.q, hits = records.len(), "mock: /sick");
    Json(records)
}

pub fn router() -> Router {
    Router::new().route("/sick", get(sick))
}

/// Serve on an already-bound listener until the task is dropped.
pub async fn serve_on(listener: TcpListener) -> anyhow::Result<()> {
    axum::serve(listener, router()).await?;
    Ok(())
}

pub async fn serve(addr: SocketAddr) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "mock lookup service listening");
    serve_on(listener).await
}
