//! 解析結果の型定義
//!
//! CLIとHTTPサーバで共有される型:
//! - AnalysisMode: 解析モード（職場の種類）
//! - RiskLevel: リスクレベル（LOW/MEDIUM/HIGH）
//! - AnalysisResult: 1回の解析の最終出力
//! - HistoryItem: ローカル履歴のエントリ
//! - DailyUsage: 日次利用カウンタ

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 解析モード（職場の種類）
///
/// プロンプトのテンプレートとドメイン向けの観点を選択する。
/// 未知のタグは kitchen にフォールバックする。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisMode {
    #[default]
    Kitchen,
    Warehouse,
    Office,
}

impl AnalysisMode {
    /// ワイヤ表現（"kitchen" / "warehouse" / "office"）
    pub fn as_tag(&self) -> &'static str {
        match self {
            AnalysisMode::Kitchen => "kitchen",
            AnalysisMode::Warehouse => "warehouse",
            AnalysisMode::Office => "office",
        }
    }

    /// タグ文字列からモードを決定。未知のタグは kitchen 扱い
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_lowercase().as_str() {
            "warehouse" => AnalysisMode::Warehouse,
            "office" => AnalysisMode::Office,
            _ => AnalysisMode::Kitchen,
        }
    }
}

impl std::fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_tag())
    }
}

/// リスクレベル
///
/// 不明・空文字は LOW 扱い（normalize_risk 参照）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    #[default]
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// AI解析結果
///
/// 成功した解析1回につき1つ生成され、以後変更されない。
/// raw はモデルの生テキスト全文（監査・デバッグ用）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalysisResult {
    pub what_i_see: String,
    pub what_this_means: String,
    pub possible_issues: String,
    pub what_you_can_do_next: String,
    pub risk_level: RiskLevel,
    pub raw: String,
}

/// ローカル履歴のエントリ
///
/// image_data はサムネイルのData URL（再表示用、ベストエフォート）
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryItem {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub mode: AnalysisMode,
    pub result: AnalysisResult,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_data: Option<String>,
}

/// 日次利用カウンタ
///
/// date が今日と異なれば count は無効（0扱い）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DailyUsage {
    pub date: String,
    pub count: u32,
}
