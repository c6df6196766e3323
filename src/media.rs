//! 画像ファイルのメディアタイプ判定

use std::path::Path;

use crate::error::{Result, SafetyAiError};

/// 対応する拡張子とMIMEタイプ
const MEDIA_TYPES: &[(&str, &str)] = &[
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("webp", "image/webp"),
    ("gif", "image/gif"),
];

/// 拡張子からメディアタイプを引く
pub fn media_type_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_string_lossy().to_lowercase();
    MEDIA_TYPES
        .iter()
        .find(|(e, _)| *e == ext)
        .map(|(_, mime)| *mime)
}

/// 画像ファイルであることを確認してメディアタイプを返す
pub fn require_image_media_type(path: &Path) -> Result<&'static str> {
    media_type_for_path(path).ok_or_else(|| {
        SafetyAiError::InvalidMediaType(
            path.extension()
                .map(|e| e.to_string_lossy().to_string())
                .unwrap_or_else(|| path.display().to_string()),
        )
    })
}
