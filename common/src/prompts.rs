//! プロンプト生成モジュール
//!
//! モデルには構造化出力の保証がないため、ブラケット付きセクションマーカー
//! （例: `[WHAT_I_SEE]`）をテキスト上のプロトコルとして指示する。
//! マーカーの文字列は parser.rs の抽出ロジックと対で管理する。

use crate::types::AnalysisMode;

/// レスポンスのセクションタグ（固定セット）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionTag {
    WhatISee,
    WhatThisMeans,
    PossibleIssues,
    WhatYouCanDoNext,
    RiskLevel,
}

/// 全セクションタグ（出力順）
pub const SECTION_TAGS: &[SectionTag] = &[
    SectionTag::WhatISee,
    SectionTag::WhatThisMeans,
    SectionTag::PossibleIssues,
    SectionTag::WhatYouCanDoNext,
    SectionTag::RiskLevel,
];

impl SectionTag {
    /// タグ名（ブラケットなし）
    pub fn name(&self) -> &'static str {
        match self {
            SectionTag::WhatISee => "WHAT_I_SEE",
            SectionTag::WhatThisMeans => "WHAT_THIS_MEANS",
            SectionTag::PossibleIssues => "POSSIBLE_ISSUES",
            SectionTag::WhatYouCanDoNext => "WHAT_YOU_CAN_DO_NEXT",
            SectionTag::RiskLevel => "RISK_LEVEL",
        }
    }

    /// レスポンス中のマーカー表現（ブラケット付き）
    pub fn marker(&self) -> &'static str {
        match self {
            SectionTag::WhatISee => "[WHAT_I_SEE]",
            SectionTag::WhatThisMeans => "[WHAT_THIS_MEANS]",
            SectionTag::PossibleIssues => "[POSSIBLE_ISSUES]",
            SectionTag::WhatYouCanDoNext => "[WHAT_YOU_CAN_DO_NEXT]",
            SectionTag::RiskLevel => "[RISK_LEVEL]",
        }
    }
}

impl AnalysisMode {
    /// ドメインの呼称（プロンプト・フォールバック文で使用）
    pub fn domain_noun(&self) -> &'static str {
        match self {
            AnalysisMode::Kitchen => "kitchen",
            AnalysisMode::Warehouse => "warehouse",
            AnalysisMode::Office => "office",
        }
    }
}

/// ゲート節のフォールバック文（モード別、固定文字列）
///
/// 画像が対象ドメインでないとモデルが判断したとき、WHAT_I_SEE に
/// そのまま出力させる一文。テストはこの文字列との一致を検証する。
pub fn fallback_sentence(mode: AnalysisMode) -> String {
    format!(
        "This image does not appear to show a {}.",
        mode.domain_noun()
    )
}

/// モード別の着眼点（POSSIBLE_ISSUES の指針）
fn focus_points(mode: AnalysisMode) -> &'static str {
    match mode {
        AnalysisMode::Kitchen => {
            "grease buildup and fire risk near heat sources, knife and sharp-tool storage, \
             wet or greasy floors, food left in the temperature danger zone, blocked fire \
             extinguishers, overloaded electrical outlets near water"
        }
        AnalysisMode::Warehouse => {
            "unstable or overloaded racking, forklift travel paths and pedestrian separation, \
             blocked emergency exits and aisles, improper manual lifting, unsecured pallets or \
             stacked loads, missing PPE, trailing cables or spills on walkways"
        }
        AnalysisMode::Office => {
            "trailing cables and trip hazards, blocked fire exits and extinguishers, unstable \
             shelving or top-heavy storage, daisy-chained power strips, poor desk ergonomics, \
             boxes stored in walkways"
        }
    }
}

/// 解析プロンプトを生成
///
/// 構成:
/// 1. ロール設定（対象ドメインの安全点検員）
/// 2. ゲート節: 画像がドメイン外なら固定のフォールバックブロックを出力して終了
/// 3. 5セクションのマーカー付き出力指示とドメイン別の着眼点
/// 4. 不確実な場合は保守的に指摘する旨の締め
pub fn build_analysis_prompt(mode: AnalysisMode) -> String {
    let noun = mode.domain_noun();
    let focus = focus_points(mode);
    let fallback = fallback_sentence(mode);

    format!(
        r#"You are a professional workplace safety inspector specializing in {noun} environments.

First, check whether the photo plausibly shows a {noun}. If it does not, output EXACTLY the following block and stop:

[WHAT_I_SEE]
{fallback}
[WHAT_THIS_MEANS]
Not applicable.
[POSSIBLE_ISSUES]
Not applicable.
[WHAT_YOU_CAN_DO_NEXT]
Please upload a photo of a {noun} to receive a safety assessment.
[RISK_LEVEL]
LOW

Otherwise, assess the safety of the scene and answer in EXACTLY these five labeled sections, keeping every marker on its own line:

[WHAT_I_SEE]
A short, objective description of the scene and the equipment visible.

[WHAT_THIS_MEANS]
What the observed conditions mean for the people working there, in plain language.

[POSSIBLE_ISSUES]
A numbered list of concrete safety issues you can actually see. Pay particular attention to: {focus}. One issue per line, most serious first. If nothing is wrong, say so.

[WHAT_YOU_CAN_DO_NEXT]
A numbered list of practical actions, matching the issues above where possible.

[RISK_LEVEL]
Exactly one word: LOW, MEDIUM, or HIGH.

Rules:
- Use short sentences and numbered bullets, no markdown headings.
- Only describe what is visible in the photo; do not invent hazards.
- When you are uncertain whether something is hazardous, err on the side of flagging it."#
    )
}
