//! Append-only flat-file cache medium.
//!
//! One JSON object per line:
//! `{"key":{"namespace":"quote","id":"42"},"value":"..."}`. JSON string
//! escaping keeps separators, quotes and newlines inside values from
//! breaking record boundaries. A line that does not decode (a write torn by
//! a crash, say) is logged and skipped; the records around it stay readable.

use async_trait::async_trait;
use std::io::{ErrorKind, SeekFrom};
use std::path::{Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt};

use crate::domain::errors::{CacheError, CacheResult};
use crate::domain::models::CacheEntry;
use crate::domain::ports::CacheMedium;

/// Cache medium stored as a JSON-lines file.
#[derive(Debug, Clone)]
pub struct FileMedium {
    path: PathBuf,
}

impl FileMedium {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn ensure_parent_dir(&self) -> CacheResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        Ok(())
    }
}

/// Parse the contents of a cache file.
///
/// Blank lines are ignored. Undecodable lines are logged and skipped.
fn parse_records(contents: &str) -> Vec<CacheEntry> {
    contents
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .filter_map(|(idx, line)| match serde_json::from_str::<CacheEntry>(line) {
            Ok(entry) => Some(entry),
            Err(e) => {
                let err = CacheError::Corrupt {
                    line: idx + 1,
                    reason: e.to_string(),
                };
                tracing::warn!(error = %err, "skipping unreadable cache record");
                None
            }
        })
        .collect()
}

#[async_trait]
impl CacheMedium for FileMedium {
    async fn scan(&self) -> CacheResult<Vec<CacheEntry>> {
        // Lossy decoding: a write torn inside a multi-byte character only
        // spoils its own line.
        match fs::read(&self.path).await {
            Ok(bytes) => Ok(parse_records(&String::from_utf8_lossy(&bytes))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn append(&self, entry: &CacheEntry) -> CacheResult<()> {
        let record =
            serde_json::to_string(entry).map_err(|e| CacheError::Medium(e.to_string()))?;

        self.ensure_parent_dir().await?;
        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&self.path)
            .await?;

        // A torn previous write leaves no trailing newline; start a fresh line.
        let mut line = String::with_capacity(record.len() + 2);
        if file.metadata().await?.len() > 0 {
            file.seek(SeekFrom::End(-1)).await?;
            if file.read_u8().await? != b'\n' {
                line.push('\n');
            }
        }
        line.push_str(&record);
        line.push('\n');

        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::CacheKey;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_file_scans_empty() {
        let dir = TempDir::new().unwrap();
        let medium = FileMedium::new(dir.path().join("absent.jsonl"));
        assert!(medium.scan().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_append_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/deeper/cache.jsonl");
        let medium = FileMedium::new(&path);

        let key = CacheKey::new("quote", "1").unwrap();
        medium.append(&CacheEntry::new(key.clone(), "A quote.")).await.unwrap();

        assert!(path.exists());
        let entries = medium.scan().await.unwrap();
        assert_eq!(entries, vec![CacheEntry::new(key, "A quote.")]);
    }

    #[tokio::test]
    async fn test_delimiters_and_newlines_survive() {
        let dir = TempDir::new().unwrap();
        let medium = FileMedium::new(dir.path().join("cache.jsonl"));
        let value = "quote.1;a;b\n\"second line\"\r\n\u{1F600}";

        let key = CacheKey::new("quote", "1;2").unwrap();
        medium.append(&CacheEntry::new(key.clone(), value)).await.unwrap();
        medium
            .append(&CacheEntry::new(CacheKey::new("quote", "2").unwrap(), "plain"))
            .await
            .unwrap();

        let entries = medium.scan().await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].key, key);
        assert_eq!(entries[0].value, value);
    }

    #[tokio::test]
    async fn test_reopened_medium_sees_prior_entries() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cache.jsonl");
        let key = CacheKey::new("quote", "7").unwrap();

        FileMedium::new(&path)
            .append(&CacheEntry::new(key.clone(), "persisted"))
            .await
            .unwrap();

        let reopened = FileMedium::new(&path);
        assert_eq!(reopened.scan().await.unwrap()[0].value, "persisted");
    }

    #[test]
    fn test_parse_skips_blank_lines() {
        let contents = "\n{\"key\":{\"namespace\":\"quote\",\"id\":\"1\"},\"value\":\"x\"}\n\n";
        assert_eq!(parse_records(contents).len(), 1);
    }

    #[test]
    fn test_parse_skips_corrupt_lines_and_keeps_the_rest() {
        let contents = concat!(
            "{\"key\":{\"namespace\":\"quote\",\"id\":\"1\"},\"value\":\"x\"}\n",
            "quote.2;oops\n",
            "{\"key\":{\"namespace\":\"quote\",\"id\":\"3\"},\"value\":\"z\"}\n",
        );
        let ids: Vec<_> = parse_records(contents)
            .iter()
            .map(|e| e.key.id().to_string())
            .collect();
        assert_eq!(ids, vec!["1", "3"]);
    }

    #[tokio::test]
    async fn test_torn_multibyte_character_spoils_only_its_line() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cache.jsonl");
        let medium = FileMedium::new(&path);

        let first = CacheEntry::new(CacheKey::new("quote", "1").unwrap(), "one");
        medium.append(&first).await.unwrap();
        {
            let mut file = OpenOptions::new().append(true).open(&path).await.unwrap();
            let crab = "🦀".as_bytes();
            file.write_all(b"{\"key\":{\"namespace\":\"quote\",\"id\":\"2\"},\"value\":\"")
                .await
                .unwrap();
            file.write_all(&crab[..2]).await.unwrap();
        }

        assert_eq!(medium.scan().await.unwrap(), vec![first]);
    }

    #[tokio::test]
    async fn test_append_after_torn_line_starts_fresh_line() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cache.jsonl");
        let medium = FileMedium::new(&path);

        let first = CacheEntry::new(CacheKey::new("quote", "1").unwrap(), "one");
        medium.append(&first).await.unwrap();
        {
            let mut file = OpenOptions::new().append(true).open(&path).await.unwrap();
            file.write_all(b"{\"key\":{\"names").await.unwrap();
        }

        let second = CacheEntry::new(CacheKey::new("quote", "2").unwrap(), "two");
        medium.append(&second).await.unwrap();

        assert_eq!(medium.scan().await.unwrap(), vec![first, second]);
    }
}
