//! 解析パイプライン
//!
//! 入力検証 → プロンプト生成 → Vision API呼び出し → セクション抽出・
//! リスク正規化、の一本道。検証エラーは外部呼び出しの前に確定させる。

use safety_ai_common::{build_analysis_prompt, parse_analysis_response, AnalysisMode, AnalysisResult};

use crate::error::{Result, SafetyAiError};
use crate::vision::{to_data_url, VisionModel};

/// 受け付ける画像サイズの上限（10 MiB）
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// アップロードされた画像
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub bytes: Vec<u8>,
    pub media_type: String,
    pub file_name: String,
}

/// 解析の完了結果
///
/// note はdegraded-success（モデルが空応答を返した等）の説明。
/// ハード失敗とは区別され、結果自体は有効として扱う
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub result: AnalysisResult,
    pub note: Option<String>,
}

/// 入力検証
///
/// 順序は固定: 画像なし → サイズ超過 → メディアタイプ不正。
/// いずれも即時失敗で、外部APIは呼ばれない
pub fn validate_upload(upload: &ImageUpload) -> Result<()> {
    if upload.bytes.is_empty() {
        return Err(SafetyAiError::NoImage);
    }

    if upload.bytes.len() > MAX_IMAGE_BYTES {
        return Err(SafetyAiError::ImageTooLarge {
            size: upload.bytes.len(),
            limit: MAX_IMAGE_BYTES,
        });
    }

    if !upload.media_type.starts_with("image/") {
        return Err(SafetyAiError::InvalidMediaType(upload.media_type.clone()));
    }

    Ok(())
}

/// 画像1枚を解析する
///
/// 外部呼び出しが成功したのに本文が空の場合は、空フィールド+LOWの
/// 結果に説明noteを付けて成功として返す（上流の課金・クォータ問題の
/// シグナルであり、フロー自体は壊さない）
pub async fn analyze_image(
    model: &dyn VisionModel,
    mode: AnalysisMode,
    upload: &ImageUpload,
) -> Result<AnalysisOutcome> {
    validate_upload(upload)?;

    let prompt = build_analysis_prompt(mode);
    let data_url = to_data_url(&upload.media_type, &upload.bytes);

    let raw = model.describe_image(&prompt, &data_url).await?;

    if raw.trim().is_empty() {
        return Ok(AnalysisOutcome {
            result: AnalysisResult::default(),
            note: Some(
                "モデルから空の応答が返されました。APIの利用枠・課金状態を確認してください"
                    .to_string(),
            ),
        });
    }

    Ok(AnalysisOutcome {
        result: parse_analysis_response(&raw),
        note: None,
    })
}
