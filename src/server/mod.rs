//! 解析HTTPサーバ
//!
//! `POST /api/analyze` にmultipartで画像とモードを受け取り、
//! 構造化された解析結果JSONを返す。利用回数の制限はクライアント側の
//! 責務であり、サーバでは行わない。

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tokio::net::TcpListener;
use tracing::{error, info};

use safety_ai_common::{AnalysisMode, AnalysisResult};

use crate::analyzer::{analyze_image, ImageUpload, MAX_IMAGE_BYTES};
use crate::error::SafetyAiError;
use crate::vision::VisionModel;

/// ルート間で共有する状態
#[derive(Clone)]
pub struct ServerState {
    pub model: Arc<dyn VisionModel>,
}

/// 解析エンドポイントの成功レスポンス
///
/// degraded-success時はHTTP 200のまま error に説明を載せる。
/// 呼び出し側はステータスコードとerrorフィールドの両方を見る契約
#[derive(Serialize)]
struct AnalyzeResponse {
    #[serde(flatten)]
    result: AnalysisResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// 失敗レスポンス
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

/// ルータを構築する
pub fn app(state: ServerState) -> Router {
    Router::new()
        .route("/api/analyze", post(analyze_handler))
        .route("/api/health", get(|| async { "OK" }))
        // 画像上限10MiB+multipartのオーバーヘッド分
        .layer(DefaultBodyLimit::max(MAX_IMAGE_BYTES + 1024 * 1024))
        .with_state(state)
}

/// HTTPサーバを起動する
pub async fn start_server(addr: SocketAddr, state: ServerState) -> anyhow::Result<()> {
    let router = app(state);

    info!("解析サーバを起動: http://{}", addr);
    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

/// エラー種別からHTTPステータスへの対応
///
/// ユーザー入力エラーは4xx、設定エラーは5xx、上流APIのエラーは
/// 可能な限りプロバイダのステータスをそのまま返す
fn http_status_for(err: &SafetyAiError) -> StatusCode {
    match err {
        SafetyAiError::NoImage
        | SafetyAiError::ImageTooLarge { .. }
        | SafetyAiError::InvalidMediaType(_) => StatusCode::BAD_REQUEST,
        SafetyAiError::MissingApiKey | SafetyAiError::Config(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
        SafetyAiError::ApiStatus { status, .. } => {
            StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
        }
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_reply(err: SafetyAiError) -> (StatusCode, Json<ErrorResponse>) {
    (
        http_status_for(&err),
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
}

/// multipart本体の読み取り失敗（ユーザー入力エラー扱い）
fn bad_request(message: String) -> (StatusCode, Json<ErrorResponse>) {
    (StatusCode::BAD_REQUEST, Json(ErrorResponse { error: message }))
}

/// Handler for `POST /api/analyze`
async fn analyze_handler(
    State(state): State<ServerState>,
    mut multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, (StatusCode, Json<ErrorResponse>)> {
    let mut upload: Option<ImageUpload> = None;
    let mut mode = AnalysisMode::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| bad_request(format!("multipart読み取り失敗: {}", e)))?
    {
        match field.name() {
            Some("image") => {
                let media_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| bad_request(format!("画像の受信に失敗: {}", e)))?;

                upload = Some(ImageUpload {
                    bytes: bytes.to_vec(),
                    media_type,
                    file_name,
                });
            }
            Some("mode") => {
                let tag = field.text().await.unwrap_or_default();
                mode = AnalysisMode::from_tag(&tag);
            }
            _ => {}
        }
    }

    let upload = upload.ok_or_else(|| error_reply(SafetyAiError::NoImage))?;

    info!(
        mode = mode.as_tag(),
        size = upload.bytes.len(),
        file = %upload.file_name,
        "解析リクエスト受信"
    );

    match analyze_image(state.model.as_ref(), mode, &upload).await {
        Ok(outcome) => Ok(Json(AnalyzeResponse {
            result: outcome.result,
            error: outcome.note,
        })),
        Err(err) => {
            // 上流の詳細はサーバ側ログに残す
            error!(mode = mode.as_tag(), error = %err, "解析失敗");
            Err(error_reply(err))
        }
    }
}
