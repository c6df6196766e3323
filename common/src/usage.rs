//! 日次利用ゲート
//!
//! デバイスローカルな1日あたりの解析回数制限。日付はローカルの暦日で、
//! ストアの日付が今日と異なればカウンタは0から数え直す。
//! サーバ側の強制はない（ストアを消せばリセットされるソフトな制限）。

use crate::error::Result;
use crate::store::KvStore;
use crate::types::DailyUsage;

/// 1日あたりの解析上限
pub const DAILY_QUOTA: u32 = 2;

/// 利用カウンタのストアキー
pub const USAGE_KEY: &str = "safetyAi.dailyUsage";

/// 今日の利用状況を読み出す
///
/// 保存された日付が `today` と異なる場合、および保存値が壊れている場合は
/// count=0 として扱う
pub fn current_usage(store: &impl KvStore, today: &str) -> Result<DailyUsage> {
    let stored = match store.get(USAGE_KEY)? {
        Some(json) => serde_json::from_str::<DailyUsage>(&json).unwrap_or_default(),
        None => DailyUsage::default(),
    };

    if stored.date == today {
        Ok(stored)
    } else {
        Ok(DailyUsage {
            date: today.to_string(),
            count: 0,
        })
    }
}

/// 今日まだ解析できるか
pub fn is_quota_available(store: &impl KvStore, today: &str) -> Result<bool> {
    Ok(current_usage(store, today)?.count < DAILY_QUOTA)
}

/// 今日の残り回数
pub fn remaining_quota(store: &impl KvStore, today: &str) -> Result<u32> {
    Ok(DAILY_QUOTA.saturating_sub(current_usage(store, today)?.count))
}

/// 解析成功を1回分記録する
///
/// 日付が変わっていればカウンタをリセットしてから加算する。
/// 更新後の利用状況を返す
pub fn record_analysis(store: &mut impl KvStore, today: &str) -> Result<DailyUsage> {
    let mut usage = current_usage(store, today)?;
    usage.count += 1;

    store.set(USAGE_KEY, &serde_json::to_string(&usage)?)?;
    Ok(usage)
}
