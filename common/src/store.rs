//! キー・バリューストア抽象
//!
//! 利用カウンタと履歴はデバイスローカルな可変状態なので、
//! 永続化層を差し替え可能にしておく（テストではインメモリ実装を使う）。

use std::collections::HashMap;

use crate::error::Result;

/// 文字列キー・バリューの永続ストア
///
/// 値はJSON文字列。get/set/remove は1操作ずつ完結し、
/// 呼び出し側で read-modify-write を構成する
pub trait KvStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// インメモリ実装（テスト・フォールバック用）
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}
