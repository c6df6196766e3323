//! ローカルストレージ
//!
//! 利用カウンタと履歴を1つのJSONファイルに保持する KvStore 実装。
//! ブラウザのlocal storage相当で、ベストエフォート・デバイスローカル。

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{Result, SafetyAiError};
use safety_ai_common::store::KvStore;

const STORE_FILE_NAME: &str = "store.json";

/// ストアファイルの構造
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoreFile {
    /// バージョン（互換性チェック用）
    version: u32,
    /// キー → JSON文字列のマップ
    entries: HashMap<String, String>,
}

impl StoreFile {
    const CURRENT_VERSION: u32 = 1;
}

impl Default for StoreFile {
    fn default() -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            entries: HashMap::new(),
        }
    }
}

/// JSONファイルを永続化先とする KvStore
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    data: StoreFile,
}

impl FileStore {
    /// 既定の保存先（~/.config/safety-ai/store.json）で開く
    pub fn open_default() -> Result<Self> {
        let home = dirs::home_dir()
            .ok_or_else(|| SafetyAiError::Config("ホームディレクトリが見つかりません".into()))?;
        let dir = home.join(".config").join("safety-ai");
        Ok(Self::open(&dir))
    }

    /// 指定ディレクトリ配下のストアファイルを開く
    ///
    /// ファイルがない・壊れている・バージョン不一致の場合は空として扱う
    pub fn open(dir: &Path) -> Self {
        let path = dir.join(STORE_FILE_NAME);
        let data = Self::load_file(&path);
        Self { path, data }
    }

    fn load_file(path: &Path) -> StoreFile {
        if !path.exists() {
            return StoreFile::default();
        }

        let file = match File::open(path) {
            Ok(f) => f,
            Err(_) => return StoreFile::default(),
        };

        let reader = BufReader::new(file);
        match serde_json::from_reader::<_, StoreFile>(reader) {
            Ok(data) if data.version == StoreFile::CURRENT_VERSION => data,
            Ok(_) => {
                eprintln!("ストアのバージョン不一致、初期化します");
                StoreFile::default()
            }
            Err(_) => StoreFile::default(),
        }
    }

    fn save(&self) -> safety_ai_common::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = File::create(&self.path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, &self.data)?;
        Ok(())
    }
}

impl KvStore for FileStore {
    fn get(&self, key: &str) -> safety_ai_common::Result<Option<String>> {
        Ok(self.data.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> safety_ai_common::Result<()> {
        self.data.entries.insert(key.to_string(), value.to_string());
        self.save()
    }

    fn remove(&mut self, key: &str) -> safety_ai_common::Result<()> {
        self.data.entries.remove(key);
        self.save()
    }
}

/// 履歴エントリのID生成
///
/// 画像バイト列と作成時刻のハッシュ先頭16桁（hex）
pub fn make_history_id(image_bytes: &[u8], created_at: &DateTime<Utc>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(image_bytes);
    hasher.update(created_at.timestamp_nanos_opt().unwrap_or_default().to_le_bytes());
    let digest = hasher.finalize();
    hex::encode(&digest[..8])
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_file_store_roundtrip() {
        let dir = tempdir().expect("Failed to create temp dir");

        let mut store = FileStore::open(dir.path());
        store.set("key", "value").unwrap();

        // 再読み込みしても値が残っている
        let reopened = FileStore::open(dir.path());
        assert_eq!(reopened.get("key").unwrap().as_deref(), Some("value"));
    }

    #[test]
    fn test_file_store_missing_file_is_empty() {
        let dir = tempdir().expect("Failed to create temp dir");
        let store = FileStore::open(dir.path());
        assert!(store.get("anything").unwrap().is_none());
    }

    #[test]
    fn test_file_store_corrupted_file_is_empty() {
        let dir = tempdir().expect("Failed to create temp dir");
        std::fs::write(dir.path().join(STORE_FILE_NAME), "{ invalid json }").unwrap();

        let store = FileStore::open(dir.path());
        assert!(store.get("anything").unwrap().is_none());
    }

    #[test]
    fn test_file_store_remove() {
        let dir = tempdir().expect("Failed to create temp dir");

        let mut store = FileStore::open(dir.path());
        store.set("key", "value").unwrap();
        store.remove("key").unwrap();

        let reopened = FileStore::open(dir.path());
        assert!(reopened.get("key").unwrap().is_none());
    }

    #[test]
    fn test_make_history_id_depends_on_input() {
        let now = Utc::now();
        let id1 = make_history_id(b"image-a", &now);
        let id2 = make_history_id(b"image-b", &now);

        assert_eq!(id1.len(), 16);
        assert_ne!(id1, id2);
    }
}
