//! SQLite implementation of the quote backing store.

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::adapters::sqlite::parse_datetime;
use crate::domain::errors::{StoreError, StoreResult};
use crate::domain::models::Quote;
use crate::domain::ports::BackingStore;

#[derive(Clone)]
pub struct SqliteQuoteStore {
    pool: SqlitePool,
}

impl SqliteQuoteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new quote. Existing ids are never overwritten.
    pub async fn add(&self, quote: &Quote) -> StoreResult<()> {
        let result = sqlx::query(
            r#"INSERT INTO quotes (id, text, author, created_at)
               VALUES (?, ?, ?, ?)
               ON CONFLICT(id) DO NOTHING"#,
        )
        .bind(&quote.id)
        .bind(&quote.text)
        .bind(&quote.author)
        .bind(quote.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Duplicate(quote.id.clone()));
        }
        Ok(())
    }

    pub async fn get(&self, id: &str) -> StoreResult<Option<Quote>> {
        let row: Option<QuoteRow> = sqlx::query_as("SELECT * FROM quotes WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(row_to_quote).transpose()
    }

    /// All quotes, oldest first.
    pub async fn list(&self) -> StoreResult<Vec<Quote>> {
        let rows: Vec<QuoteRow> = sqlx::query_as("SELECT * FROM quotes ORDER BY created_at, id")
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(row_to_quote).collect()
    }
}

#[derive(Debug, sqlx::FromRow)]
struct QuoteRow {
    id: String,
    text: String,
    author: Option<String>,
    created_at: String,
}

fn row_to_quote(row: QuoteRow) -> StoreResult<Quote> {
    Ok(Quote {
        id: row.id,
        text: row.text,
        author: row.author,
        created_at: parse_datetime(&row.created_at)?,
    })
}

#[async_trait]
impl BackingStore for SqliteQuoteStore {
    async fn lookup(&self, id: &str) -> StoreResult<String> {
        let row: Option<(String,)> = sqlx::query_as("SELECT text FROM quotes WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|(text,)| text)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sqlite::create_migrated_test_pool;

    async fn setup_store() -> SqliteQuoteStore {
        let pool = create_migrated_test_pool().await.expect("failed to create test pool");
        SqliteQuoteStore::new(pool)
    }

    #[tokio::test]
    async fn test_add_and_lookup() {
        let store = setup_store().await;
        store
            .add(&Quote::new("1", "A quote.").with_author("Anon"))
            .await
            .unwrap();

        assert_eq!(store.lookup("1").await.unwrap(), "A quote.");
        let quote = store.get("1").await.unwrap().unwrap();
        assert_eq!(quote.author.as_deref(), Some("Anon"));
    }

    #[tokio::test]
    async fn test_lookup_missing_is_not_found() {
        let store = setup_store().await;
        assert!(matches!(store.lookup("99").await, Err(StoreError::NotFound(id)) if id == "99"));
        assert!(store.get("99").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_add_keeps_original() {
        let store = setup_store().await;
        store.add(&Quote::new("1", "first")).await.unwrap();

        let err = store.add(&Quote::new("1", "second")).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(id) if id == "1"));
        assert_eq!(store.lookup("1").await.unwrap(), "first");
    }

    #[tokio::test]
    async fn test_list_returns_all() {
        let store = setup_store().await;
        store.add(&Quote::new("1", "one")).await.unwrap();
        store.add(&Quote::new("2", "two; with a semicolon")).await.unwrap();

        let quotes = store.list().await.unwrap();
        assert_eq!(quotes.len(), 2);
        assert!(quotes.iter().any(|q| q.text == "two; with a semicolon"));
    }
}
