//! OpenAI互換 chat/completions クライアント
//!
//! Data URL化した画像をimage_urlパートとして添付し、単発の
//! マルチモーダルリクエストを送る。応答長は max_tokens で固定上限を掛ける。

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::Config;
use crate::error::{Result, SafetyAiError};

use super::VisionModel;

/// chat/completions リクエスト
#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    max_tokens: u32,
}

#[derive(Serialize)]
struct Message {
    role: &'static str,
    content: Vec<ContentPart>,
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Serialize)]
struct ImageUrl {
    url: String,
}

/// chat/completions レスポンス
#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize, Default)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// エラーレスポンス（ベストエフォートで読む）
#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

pub struct OpenAiVision {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
    model: String,
    max_output_tokens: u32,
}

impl OpenAiVision {
    /// 設定からクライアントを構築する
    ///
    /// APIキーの解決はここで行い、未設定なら外部呼び出し前に
    /// 設定エラーとして失敗する
    pub fn from_config(config: &Config) -> Result<Self> {
        let api_key = config.get_api_key()?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| SafetyAiError::ApiCall(e.to_string()))?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_key,
            model: config.model.clone(),
            max_output_tokens: config.max_output_tokens,
        })
    }
}

#[async_trait]
impl VisionModel for OpenAiVision {
    async fn describe_image(&self, prompt: &str, image_data_url: &str) -> Result<String> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![Message {
                role: "user",
                content: vec![
                    ContentPart::Text {
                        text: prompt.to_string(),
                    },
                    ContentPart::ImageUrl {
                        image_url: ImageUrl {
                            url: image_data_url.to_string(),
                        },
                    },
                ],
            }],
            max_tokens: self.max_output_tokens,
        };

        let url = format!("{}/chat/completions", self.api_base);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| SafetyAiError::ApiCall(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            // プロバイダのエラーメッセージを可能なら取り出す
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|b| b.error.message)
                .unwrap_or(body);
            return Err(SafetyAiError::ApiStatus {
                status: status.as_u16(),
                message,
            });
        }

        let payload: ChatResponse = response
            .json()
            .await
            .map_err(|e| SafetyAiError::ApiCall(format!("レスポンスの読み取りに失敗: {}", e)))?;

        // 本文が欠けていても成功扱い（空文字を返す）
        Ok(payload
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =============================================
    // リクエスト/レスポンス シリアライズテスト
    // =============================================

    #[test]
    fn test_chat_request_serialize() {
        let request = ChatRequest {
            model: "gpt-4o-mini".to_string(),
            messages: vec![Message {
                role: "user",
                content: vec![ContentPart::Text {
                    text: "テストプロンプト".to_string(),
                }],
            }],
            max_tokens: 1000,
        };

        let json = serde_json::to_string(&request).expect("シリアライズ失敗");
        assert!(json.contains("\"model\":\"gpt-4o-mini\""));
        assert!(json.contains("\"max_tokens\":1000"));
        assert!(json.contains("\"role\":\"user\""));
    }

    #[test]
    fn test_content_part_text_serialize() {
        let part = ContentPart::Text {
            text: "Hello".to_string(),
        };
        let json = serde_json::to_string(&part).expect("シリアライズ失敗");
        assert_eq!(json, r#"{"type":"text","text":"Hello"}"#);
    }

    #[test]
    fn test_content_part_image_url_serialize() {
        let part = ContentPart::ImageUrl {
            image_url: ImageUrl {
                url: "data:image/jpeg;base64,/9j/4AAQ".to_string(),
            },
        };
        let json = serde_json::to_string(&part).expect("シリアライズ失敗");
        assert!(json.contains("\"type\":\"image_url\""));
        assert!(json.contains("\"url\":\"data:image/jpeg;base64,/9j/4AAQ\""));
    }

    #[test]
    fn test_chat_response_deserialize() {
        let json = r#"{
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": "[WHAT_I_SEE]\nA kitchen."
                }
            }]
        }"#;

        let response: ChatResponse = serde_json::from_str(json).expect("デシリアライズ失敗");
        assert_eq!(response.choices.len(), 1);
        assert!(response.choices[0]
            .message
            .content
            .as_deref()
            .unwrap()
            .contains("A kitchen."));
    }

    #[test]
    fn test_chat_response_deserialize_empty_content() {
        // contentがnull・choicesが空でもデシリアライズできること
        let json = r#"{"choices": [{"message": {"role": "assistant", "content": null}}]}"#;
        let response: ChatResponse = serde_json::from_str(json).expect("デシリアライズ失敗");
        assert!(response.choices[0].message.content.is_none());

        let json = r#"{"choices": []}"#;
        let response: ChatResponse = serde_json::from_str(json).expect("デシリアライズ失敗");
        assert!(response.choices.is_empty());
    }

    #[test]
    fn test_api_error_body_deserialize() {
        let json = r#"{"error": {"message": "Rate limit exceeded", "type": "requests"}}"#;
        let body: ApiErrorBody = serde_json::from_str(json).expect("デシリアライズ失敗");
        assert_eq!(body.error.message, "Rate limit exceeded");
    }
}
