//! Safety AI Common Library
//!
//! CLIとHTTPサーバで共有される型とユーティリティ

pub mod error;
pub mod history;
pub mod parser;
pub mod prompts;
pub mod risk;
pub mod store;
pub mod types;
pub mod usage;

pub use error::{Error, Result};
pub use history::{append_history, clear_history, find_history, list_history, HISTORY_CAPACITY};
pub use parser::{extract_section, parse_analysis_response};
pub use prompts::{build_analysis_prompt, fallback_sentence, SectionTag, SECTION_TAGS};
pub use risk::normalize_risk;
pub use store::{KvStore, MemoryStore};
pub use types::{AnalysisMode, AnalysisResult, DailyUsage, HistoryItem, RiskLevel};
pub use usage::{
    current_usage, is_quota_available, record_analysis, remaining_quota, DAILY_QUOTA,
};
