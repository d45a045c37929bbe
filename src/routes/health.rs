//! # 헬스체크(Health Check) 핸들러
//!
//! ## 엔드포인트
//! - `GET /healthcheck` → `{ "status": "ok" }`
//!
//! 인증 없이 호출할 수 있으며, 로드밸런서나 Docker 헬스체크가 서버 가동 여부를 확인할 때 씁니다.

use axum::Json;
use serde_json::{json, Value};

/// `GET /healthcheck`: 서버가 요청을 처리할 수 있으면 항상 200을 반환합니다.
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok"
    }))
}
