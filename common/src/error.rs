//! エラー型定義

use crate::form::FieldErrors;
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// メッセージ抽出に失敗したときの表示文字列
pub const GENERIC_REQUEST_FAILURE: &str = "Request failed";

/// HTTPレベルのエラー
///
/// `status` は転送エラー（オフライン・CORS・DNS）の場合 None。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: Option<u16>,
    pub message: String,
}

impl ApiError {
    pub fn new(status: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// 非2xxレスポンスからエラーを組み立てる
    ///
    /// 優先順位:
    /// 1. JSONボディの `detail`
    /// 2. JSONボディの `error`（旧エンドポイント）
    /// 3. ステータステキスト
    /// 4. "Request failed"
    pub fn from_response(status: u16, status_text: &str, body: &str) -> Self {
        let message = serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|payload| message_from_payload(&payload))
            .or_else(|| {
                let text = status_text.trim();
                (!text.is_empty()).then(|| text.to_string())
            })
            .unwrap_or_else(|| GENERIC_REQUEST_FAILURE.to_string());

        Self::new(Some(status), message)
    }
}

/// エラーボディから表示メッセージを取り出す
pub fn message_from_payload(payload: &Value) -> Option<String> {
    ["detail", "error"].iter().find_map(|key| match payload.get(key) {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.clone()),
        // FastAPIのバリデーションエラーは detail が配列になる
        Some(Value::Array(items)) if !items.is_empty() => Some(Value::Array(items.clone()).to_string()),
        Some(Value::Object(map)) if !map.is_empty() => Some(Value::Object(map.clone()).to_string()),
        _ => None,
    })
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ApiError {}

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("{0}")]
    Validation(FieldErrors),

    #[error("{0}")]
    Api(#[from] ApiError),

    #[error("Job submission failed")]
    MissingIdentifier,

    #[error("Network error: {0}")]
    Transport(String),

    /// 2xxだがボディが期待した形でない
    #[error("Unexpected response from server: {0}")]
    Decode(String),

    #[error("Job ID missing from URL.")]
    MissingJobId,
}

impl Error {
    /// 画面にそのまま出せるメッセージ
    pub fn user_message(&self) -> String {
        match self {
            Error::Api(api) => api.message.clone(),
            Error::Transport(_) => {
                "Unable to reach the server. Please try again in a moment.".to_string()
            }
            other => other.to_string(),
        }
    }

    /// HTTPステータス（サーバー由来のエラーのみ）
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api(api) => api.status,
            _ => None,
        }
    }
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
