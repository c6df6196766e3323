//! レスポンスのセクション抽出
//!
//! モデルの自由テキスト応答から `[TAG]` マーカー区切りのセクションを
//! 取り出す。マーカーが欠けていても並びが崩れていてもエラーにしない
//! （モデル出力は半信頼のため、欠損は空文字として扱う）。

use lazy_static::lazy_static;
use regex::Regex;

use crate::prompts::SectionTag;
use crate::risk::normalize_risk;
use crate::types::AnalysisResult;

/// 次セクションの区切りとして認識するマーカー名の選択肢
const MARKER_ALTERNATION: &str =
    "WHAT_I_SEE|WHAT_THIS_MEANS|POSSIBLE_ISSUES|WHAT_YOU_CAN_DO_NEXT|RISK_LEVEL";

fn section_pattern(name: &str) -> Regex {
    // マーカーは大文字小文字を区別しない。本文は次のマーカーか末尾まで
    Regex::new(&format!(
        r"(?is)\[{name}\]\s*(.*?)\s*(?:\[(?:{MARKER_ALTERNATION})\]|\z)"
    ))
    .unwrap()
}

lazy_static! {
    static ref WHAT_I_SEE_RE: Regex = section_pattern("WHAT_I_SEE");
    static ref WHAT_THIS_MEANS_RE: Regex = section_pattern("WHAT_THIS_MEANS");
    static ref POSSIBLE_ISSUES_RE: Regex = section_pattern("POSSIBLE_ISSUES");
    static ref WHAT_YOU_CAN_DO_NEXT_RE: Regex = section_pattern("WHAT_YOU_CAN_DO_NEXT");
    static ref RISK_LEVEL_RE: Regex = section_pattern("RISK_LEVEL");
}

fn section_regex(tag: SectionTag) -> &'static Regex {
    match tag {
        SectionTag::WhatISee => &WHAT_I_SEE_RE,
        SectionTag::WhatThisMeans => &WHAT_THIS_MEANS_RE,
        SectionTag::PossibleIssues => &POSSIBLE_ISSUES_RE,
        SectionTag::WhatYouCanDoNext => &WHAT_YOU_CAN_DO_NEXT_RE,
        SectionTag::RiskLevel => &RISK_LEVEL_RE,
    }
}

/// レスポンスから1セクションを抽出
///
/// マーカーが見つからない場合は空文字を返す（エラーにしない）
///
/// # Arguments
/// * `text` - モデルの生テキスト応答
/// * `tag` - 抽出するセクションタグ
pub fn extract_section(text: &str, tag: SectionTag) -> String {
    section_regex(tag)
        .captures(text)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}

/// 生テキスト応答を AnalysisResult に変換
///
/// 4つの本文セクションを抽出し、RISK_LEVEL セクションを正規化する。
/// raw には応答全文をそのまま保持する
pub fn parse_analysis_response(raw: &str) -> AnalysisResult {
    AnalysisResult {
        what_i_see: extract_section(raw, SectionTag::WhatISee),
        what_this_means: extract_section(raw, SectionTag::WhatThisMeans),
        possible_issues: extract_section(raw, SectionTag::PossibleIssues),
        what_you_can_do_next: extract_section(raw, SectionTag::WhatYouCanDoNext),
        risk_level: normalize_risk(&extract_section(raw, SectionTag::RiskLevel)),
        raw: raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RiskLevel;

    // =============================================
    // extract_section テスト
    // =============================================

    #[test]
    fn test_extract_section_basic() {
        let text = "[WHAT_I_SEE]\nFoo bar.\n[WHAT_THIS_MEANS]\nBaz.";

        assert_eq!(extract_section(text, SectionTag::WhatISee), "Foo bar.");
        assert_eq!(extract_section(text, SectionTag::WhatThisMeans), "Baz.");
    }

    #[test]
    fn test_extract_section_missing_marker() {
        let text = "The model decided to answer free-form instead.";

        // マーカーなし → 全タグで空文字（エラーにならない）
        for tag in crate::prompts::SECTION_TAGS {
            assert_eq!(extract_section(text, *tag), "");
        }
    }

    #[test]
    fn test_extract_section_empty_input() {
        assert_eq!(extract_section("", SectionTag::WhatISee), "");
    }

    #[test]
    fn test_extract_section_case_insensitive() {
        let text = "[what_i_see]\nlowercase marker.\n[Risk_Level]\nmedium";

        assert_eq!(
            extract_section(text, SectionTag::WhatISee),
            "lowercase marker."
        );
        assert_eq!(extract_section(text, SectionTag::RiskLevel), "medium");
    }

    #[test]
    fn test_extract_section_last_section_to_end() {
        let text = "[WHAT_I_SEE]\nScene.\n[RISK_LEVEL]\nHIGH\n";

        assert_eq!(extract_section(text, SectionTag::RiskLevel), "HIGH");
    }

    #[test]
    fn test_extract_section_reordered_sections() {
        // モデルがセクション順を崩しても個別に取れること
        let text = "[RISK_LEVEL]\nMEDIUM\n[WHAT_I_SEE]\nA storage aisle.";

        assert_eq!(extract_section(text, SectionTag::RiskLevel), "MEDIUM");
        assert_eq!(
            extract_section(text, SectionTag::WhatISee),
            "A storage aisle."
        );
    }

    #[test]
    fn test_extract_section_multiline_body() {
        let text = "[POSSIBLE_ISSUES]\n1. Blocked exit.\n2. Wet floor.\n[WHAT_YOU_CAN_DO_NEXT]\n1. Clear the exit.";

        assert_eq!(
            extract_section(text, SectionTag::PossibleIssues),
            "1. Blocked exit.\n2. Wet floor."
        );
    }

    #[test]
    fn test_extract_section_surrounding_prose() {
        // マーカーの前に前置きがあっても無視される
        let text = "Sure, here is my assessment:\n\n[WHAT_I_SEE]\nA kitchen counter.\n[WHAT_THIS_MEANS]\nGenerally tidy.";

        assert_eq!(
            extract_section(text, SectionTag::WhatISee),
            "A kitchen counter."
        );
    }

    // =============================================
    // parse_analysis_response テスト
    // =============================================

    #[test]
    fn test_parse_analysis_response_full() {
        let raw = "[WHAT_I_SEE]\nA busy kitchen.\n[WHAT_THIS_MEANS]\nHigh activity.\n[POSSIBLE_ISSUES]\n1. Grease near burner.\n[WHAT_YOU_CAN_DO_NEXT]\n1. Clean the burner area.\n[RISK_LEVEL]\nHIGH";

        let result = parse_analysis_response(raw);
        assert_eq!(result.what_i_see, "A busy kitchen.");
        assert_eq!(result.what_this_means, "High activity.");
        assert_eq!(result.possible_issues, "1. Grease near burner.");
        assert_eq!(result.what_you_can_do_next, "1. Clean the burner area.");
        assert_eq!(result.risk_level, RiskLevel::High);
        assert_eq!(result.raw, raw);
    }

    #[test]
    fn test_parse_analysis_response_partial() {
        // 一部セクションが欠けた応答 → 欠けは空、リスクはLOW
        let raw = "[WHAT_I_SEE]\nSomething.\n";

        let result = parse_analysis_response(raw);
        assert_eq!(result.what_i_see, "Something.");
        assert_eq!(result.what_this_means, "");
        assert_eq!(result.risk_level, RiskLevel::Low);
    }

    #[test]
    fn test_parse_analysis_response_no_markers() {
        let raw = "Completely unstructured reply.";

        let result = parse_analysis_response(raw);
        assert_eq!(result.what_i_see, "");
        assert_eq!(result.risk_level, RiskLevel::Low);
        assert_eq!(result.raw, raw); // 原文は保持される
    }

    #[test]
    fn test_parse_matches_prompt_fallback_block() {
        // プロンプトのゲート節が指示するフォールバックブロックを
        // そのままパースしたときの結果（プロンプトとパーサの同期検証）
        use crate::prompts::{build_analysis_prompt, fallback_sentence};
        use crate::types::AnalysisMode;

        let mode = AnalysisMode::Kitchen;
        let prompt = build_analysis_prompt(mode);
        let sentence = fallback_sentence(mode);

        // プロンプト中のフォールバックブロックを模したモデル出力
        let reply = format!(
            "[WHAT_I_SEE]\n{sentence}\n[WHAT_THIS_MEANS]\nNot applicable.\n[POSSIBLE_ISSUES]\nNot applicable.\n[WHAT_YOU_CAN_DO_NEXT]\nPlease upload a photo of a kitchen to receive a safety assessment.\n[RISK_LEVEL]\nLOW"
        );

        assert!(prompt.contains(&sentence));

        let result = parse_analysis_response(&reply);
        assert_eq!(result.what_i_see, sentence);
        assert_eq!(result.what_this_means, "Not applicable.");
        assert_eq!(result.risk_level, RiskLevel::Low);
    }
}
