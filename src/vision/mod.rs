//! Vision APIクライアント
//!
//! 外部のマルチモーダルAPIは「テキスト+画像 → テキスト」の契約としてのみ
//! 扱う。テストでモック実装に差し替えられるよう trait で切る。

mod openai;

pub use openai::OpenAiVision;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::error::Result;

/// 画像1枚+プロンプト1本の単発リクエストを送るモデル
#[async_trait]
pub trait VisionModel: Send + Sync {
    /// プロンプトと画像（Data URL）を送り、モデルの生テキストを返す
    ///
    /// 正常完了で本文が空の場合は空文字を返す（呼び出し側で
    /// degraded-successとして処理する）
    async fn describe_image(&self, prompt: &str, image_data_url: &str) -> Result<String>;
}

/// 画像バイト列をData URLにエンコードする
pub fn to_data_url(media_type: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", media_type, STANDARD.encode(bytes))
}
