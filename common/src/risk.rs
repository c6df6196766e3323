//! リスクレベルの正規化

use crate::types::RiskLevel;

/// RISK_LEVEL セクションのテキストを3値に正規化
///
/// 大文字小文字を区別しない部分一致で、HIGH → MEDIUM の優先順で判定。
/// どちらにも一致しない場合（空文字・欠損含む）は LOW
pub fn normalize_risk(text: &str) -> RiskLevel {
    let upper = text.to_uppercase();

    if upper.contains("HIGH") {
        RiskLevel::High
    } else if upper.contains("MEDIUM") {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_risk_high_with_detail() {
        assert_eq!(
            normalize_risk("HIGH - visible grease fire risk"),
            RiskLevel::High
        );
    }

    #[test]
    fn test_normalize_risk_lowercase() {
        assert_eq!(normalize_risk("medium"), RiskLevel::Medium);
        assert_eq!(normalize_risk("high"), RiskLevel::High);
        assert_eq!(normalize_risk("low"), RiskLevel::Low);
    }

    #[test]
    fn test_normalize_risk_priority_high_over_medium() {
        // 両方含む場合は HIGH が勝つ
        assert_eq!(
            normalize_risk("somewhere between MEDIUM and HIGH"),
            RiskLevel::High
        );
    }

    #[test]
    fn test_normalize_risk_empty_and_garbage() {
        assert_eq!(normalize_risk(""), RiskLevel::Low);
        assert_eq!(normalize_risk("banana"), RiskLevel::Low);
        assert_eq!(normalize_risk("unknown severity"), RiskLevel::Low);
    }

    #[test]
    fn test_normalize_risk_embedded_word() {
        assert_eq!(normalize_risk("Risk level: High."), RiskLevel::High);
    }
}
