use thiserror::Error;

#[derive(Error, Debug)]
pub enum SafetyAiError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("APIキーが設定されていません。`safety-ai config --set-api-key YOUR_KEY` で設定してください")]
    MissingApiKey,

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("画像が指定されていません")]
    NoImage,

    #[error("画像サイズが上限を超えています: {size} bytes（上限 {limit} bytes）")]
    ImageTooLarge { size: usize, limit: usize },

    #[error("画像ではないファイル形式です: {0}")]
    InvalidMediaType(String),

    #[error("本日の解析上限（{0}回/日）に達しました。明日また利用するか、アップグレードをご検討ください")]
    QuotaExceeded(u32),

    #[error("履歴が見つかりません: {0}")]
    HistoryNotFound(String),

    #[error("API呼び出しエラー: {0}")]
    ApiCall(String),

    #[error("APIエラー (status {status}): {message}")]
    ApiStatus { status: u16, message: String },

    #[error("ストレージエラー: {0}")]
    Store(#[from] safety_ai_common::Error),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SafetyAiError>;
