use thiserror::Error;

#[derive(Error, Debug)]
pub enum DaraError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("入力エラー: {0}")]
    Prompt(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] dara_local_common::Error),
}

impl DaraError {
    /// 利用者向けの1行メッセージ
    pub fn user_message(&self) -> String {
        match self {
            DaraError::Common(inner) => inner.user_message(),
            other => other.to_string(),
        }
    }
}

impl From<dara_local_common::ApiError> for DaraError {
    fn from(err: dara_local_common::ApiError) -> Self {
        DaraError::Common(err.into())
    }
}

pub type Result<T> = std::result::Result<T, DaraError>;
