//! ローカル履歴キャッシュ
//!
//! 直近の解析結果を固定件数だけ保持する。新しい順の有界リストで、
//! 追加のたびに容量を超えた分を末尾から追い出す。

use crate::error::Result;
use crate::store::KvStore;
use crate::types::HistoryItem;

/// 保持する履歴の最大件数
pub const HISTORY_CAPACITY: usize = 20;

/// 履歴リストのストアキー
pub const HISTORY_KEY: &str = "safetyAi.history";

fn load(store: &impl KvStore) -> Result<Vec<HistoryItem>> {
    Ok(match store.get(HISTORY_KEY)? {
        // 壊れた保存値は空扱い
        Some(json) => serde_json::from_str(&json).unwrap_or_default(),
        None => Vec::new(),
    })
}

fn save(store: &mut impl KvStore, items: &[HistoryItem]) -> Result<()> {
    store.set(HISTORY_KEY, &serde_json::to_string(items)?)
}

/// 履歴の先頭に追加し、容量を超えた分を末尾から削除する
pub fn append_history(store: &mut impl KvStore, item: HistoryItem) -> Result<()> {
    let mut items = load(store)?;
    items.insert(0, item);
    items.truncate(HISTORY_CAPACITY);
    save(store, &items)
}

/// 履歴を新しい順で返す
pub fn list_history(store: &impl KvStore) -> Result<Vec<HistoryItem>> {
    load(store)
}

/// IDで過去の結果を取り出す（再表示用、ネットワーク呼び出しなし）
pub fn find_history(store: &impl KvStore, id: &str) -> Result<Option<HistoryItem>> {
    Ok(load(store)?.into_iter().find(|item| item.id == id))
}

/// 履歴を全削除する
pub fn clear_history(store: &mut impl KvStore) -> Result<()> {
    store.remove(HISTORY_KEY)
}
