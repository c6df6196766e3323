//! 履歴用サムネイル生成
//!
//! 履歴からの再表示で元ファイルを参照せずに済むよう、縮小JPEGを
//! Data URLとして埋め込む。生成失敗は履歴保存を妨げない（None）。

use image::codecs::jpeg::JpegEncoder;

use crate::vision::to_data_url;

/// サムネイルの最大辺長（px）
const THUMBNAIL_MAX_EDGE: u32 = 240;

/// サムネイルJPEGの品質
const THUMBNAIL_JPEG_QUALITY: u8 = 70;

/// 画像バイト列からサムネイルData URLを生成する（ベストエフォート）
pub fn make_thumbnail(image_bytes: &[u8]) -> Option<String> {
    let img = image::load_from_memory(image_bytes).ok()?;
    let thumb = img.thumbnail(THUMBNAIL_MAX_EDGE, THUMBNAIL_MAX_EDGE);

    let mut buf = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut buf, THUMBNAIL_JPEG_QUALITY);
    // JPEGはアルファ非対応のためRGBへ落とす
    thumb.to_rgb8().write_with_encoder(encoder).ok()?;

    Some(to_data_url("image/jpeg", &buf))
}
