//! # 요청 본문 추출기
//!
//! axum의 `Json`/`Form` 추출기를 감싸서, 본문 파싱에 실패했을 때도
//! `{ "error": { "code", "message" } }` 형식의 `AppError` 응답을 돌려줍니다.

use axum::{
    extract::FromRequest,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::error::AppError;

#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct Json<T>(pub T);

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

#[derive(Debug, FromRequest)]
#[from_request(via(axum::Form), rejection(AppError))]
pub struct Form<T>(pub T);
