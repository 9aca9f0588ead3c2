//! Index engine backed by a SQLite file

use super::{Category, IndexEngine, MatchMode, Matcher, RawRecord};
use crate::error::ScriptdexError;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

const SCHEMA_VERSION: i32 = 1;

/// Index stored in SQLite.
///
/// Words are stored as blobs so delimiter bytes (including NUL) survive
/// comparisons untouched. The connection sits behind a mutex so one handle
/// can serve concurrent readers.
pub struct SqliteIndex {
    conn: Mutex<Connection>,
}

impl SqliteIndex {
    /// Open or create an index file
    pub fn open(path: &Path) -> crate::Result<Self> {
        let conn = Connection::open(path)?;
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn open_in_memory() -> crate::Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn init_schema(conn: &Connection) -> crate::Result<()> {
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA busy_timeout = 5000;
            PRAGMA synchronous = NORMAL;
            ",
        )?;

        let version: i32 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;

        if version != 0 && version != SCHEMA_VERSION {
            return Err(ScriptdexError::SchemaVersionMismatch {
                found: version,
                expected: SCHEMA_VERSION,
            });
        }

        if version == 0 {
            conn.execute_batch(
                "
                CREATE TABLE IF NOT EXISTS entries (
                    id INTEGER PRIMARY KEY,
                    category TEXT NOT NULL,
                    word BLOB NOT NULL,
                    UNIQUE (category, word)
                );

                -- position keeps documents in the order they were recorded
                CREATE TABLE IF NOT EXISTS entry_documents (
                    entry_id INTEGER NOT NULL REFERENCES entries(id) ON DELETE CASCADE,
                    document TEXT NOT NULL,
                    position INTEGER NOT NULL,
                    PRIMARY KEY (entry_id, document)
                );

                CREATE INDEX IF NOT EXISTS idx_entries_category ON entries(category);
                CREATE INDEX IF NOT EXISTS idx_entry_documents_document ON entry_documents(document);
                ",
            )?;
            conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
        }

        Ok(())
    }

    fn lock(&self) -> crate::Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| ScriptdexError::Backend("index connection lock poisoned".to_string()))
    }

    /// Record that `document` contributed `word` under `category`
    pub fn add_record(&self, category: Category, word: &str, document: &str) -> crate::Result<()> {
        self.add_records([(category, word, document)])
    }

    /// Add many (category, word, document) triples in one transaction
    pub fn add_records<'a, I>(&self, records: I) -> crate::Result<()>
    where
        I: IntoIterator<Item = (Category, &'a str, &'a str)>,
    {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        {
            let mut insert_entry =
                tx.prepare("INSERT OR IGNORE INTO entries (category, word) VALUES (?1, ?2)")?;
            let mut find_entry =
                tx.prepare("SELECT id FROM entries WHERE category = ?1 AND word = ?2")?;
            let mut insert_document = tx.prepare(
                "INSERT OR IGNORE INTO entry_documents (entry_id, document, position)
                 VALUES (?1, ?2, (SELECT COALESCE(MAX(position), -1) + 1
                                  FROM entry_documents WHERE entry_id = ?1))",
            )?;

            for (category, word, document) in records {
                insert_entry.execute(params![category.as_str(), word.as_bytes()])?;
                let entry_id: i64 = find_entry
                    .query_row(params![category.as_str(), word.as_bytes()], |row| row.get(0))?;
                insert_document.execute(params![entry_id, document])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    /// Drop `document` from every entry, removing entries left without documents.
    /// Returns the number of entries removed.
    pub fn remove_document(&self, document: &str) -> crate::Result<usize> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        tx.execute(
            "DELETE FROM entry_documents WHERE document = ?1",
            params![document],
        )?;
        let removed = tx.execute(
            "DELETE FROM entries WHERE id NOT IN (SELECT entry_id FROM entry_documents)",
            [],
        )?;
        tx.commit()?;
        Ok(removed)
    }

    /// Number of stored entries across all categories
    pub fn entry_count(&self) -> crate::Result<usize> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM entries", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

impl IndexEngine for SqliteIndex {
    fn query(
        &self,
        categories: &[Category],
        pattern: &str,
        mode: MatchMode,
    ) -> crate::Result<Vec<RawRecord>> {
        if categories.is_empty() {
            return Ok(Vec::new());
        }

        let matcher = Matcher::new(pattern, mode)?;

        let placeholders = vec!["?"; categories.len()].join(", ");
        let mut sql = format!(
            "SELECT e.id, e.word, d.document
             FROM entries e
             LEFT JOIN entry_documents d ON d.entry_id = e.id
             WHERE e.category IN ({placeholders})"
        );
        let mut values: Vec<Value> = categories
            .iter()
            .map(|c| Value::Text(c.as_str().to_string()))
            .collect();

        // Case-sensitive prefixes compare bytewise, so SQLite can narrow them itself
        if let Matcher::Prefix {
            prefix,
            case_sensitive: true,
        } = &matcher
        {
            sql.push_str(" AND substr(e.word, 1, ?) = ?");
            values.push(Value::Integer(prefix.len() as i64));
            values.push(Value::Blob(prefix.as_bytes().to_vec()));
        }
        sql.push_str(" ORDER BY e.id, d.position");

        let conn = self.lock()?;
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(values.iter()), |row| {
            let id: i64 = row.get(0)?;
            let word: Vec<u8> = row.get(1)?;
            let document: Option<String> = row.get(2)?;
            Ok((id, word, document))
        })?;

        let mut results: Vec<RawRecord> = Vec::new();
        let mut current_id: Option<i64> = None;
        let mut current_matches = false;

        for row in rows {
            let (id, word, document) = row?;

            if current_id != Some(id) {
                current_id = Some(id);
                let word = String::from_utf8(word).map_err(|e| {
                    ScriptdexError::Backend(format!("entry {id} holds a non-UTF-8 word: {e}"))
                })?;
                current_matches = matcher.is_match(&word);
                if current_matches {
                    results.push(RawRecord::new(word, Vec::new()));
                }
            }

            if current_matches {
                if let (Some(document), Some(record)) = (document, results.last_mut()) {
                    record.documents.push(document);
                }
            }
        }

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::MATCH_ALL;
    use tempfile::TempDir;

    #[test]
    fn test_records_round_trip_with_nul_delimiters() {
        let index = SqliteIndex::open_in_memory().unwrap();
        index
            .add_records([
                (Category::Type, "Widget\0\0A UI widget", "w.js"),
                (Category::Type, "Widget\0\0A UI widget", "x.js"),
                (Category::Property, "Widget\0visible\0Boolean", "w.js"),
            ])
            .unwrap();

        let types = index
            .query(&[Category::Type], MATCH_ALL, MatchMode::PATTERN_MATCH)
            .unwrap();
        assert_eq!(
            types,
            vec![RawRecord::new(
                "Widget\0\0A UI widget",
                vec!["w.js".to_string(), "x.js".to_string()]
            )]
        );
    }

    #[test]
    fn test_case_sensitive_prefix_pushdown() {
        let index = SqliteIndex::open_in_memory().unwrap();
        index
            .add_records([
                (Category::Property, "Foo\0bar\0", "a.js"),
                (Category::Property, "Foo\0barista\0", "a.js"),
                (Category::Property, "foo\0bar\0", "a.js"),
            ])
            .unwrap();

        let exact = index
            .query(
                &[Category::Property],
                "Foo\0bar\0",
                MatchMode::PREFIX_MATCH | MatchMode::CASE_SENSITIVE,
            )
            .unwrap();
        assert_eq!(exact.len(), 1);
        assert_eq!(exact[0].word, "Foo\0bar\0");

        let folded = index
            .query(&[Category::Property], "foo\0bar\0", MatchMode::PREFIX_MATCH)
            .unwrap();
        assert_eq!(folded.len(), 2);
    }

    #[test]
    fn test_remove_document_prunes_orphans() {
        let index = SqliteIndex::open_in_memory().unwrap();
        index
            .add_records([
                (Category::Require, "lib/a", "main.js"),
                (Category::Require, "lib/b", "main.js"),
                (Category::Require, "lib/b", "other.js"),
            ])
            .unwrap();

        assert_eq!(index.remove_document("main.js").unwrap(), 1);
        assert_eq!(index.entry_count().unwrap(), 1);
    }

    #[test]
    fn test_reopen_keeps_schema() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("index.db");
        {
            let index = SqliteIndex::open(&path).unwrap();
            index.add_record(Category::Type, "Foo\0", "a.js").unwrap();
        }
        let index = SqliteIndex::open(&path).unwrap();
        assert_eq!(index.entry_count().unwrap(), 1);
    }

    #[test]
    fn test_schema_version_mismatch() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("index.db");
        {
            let conn = Connection::open(&path).unwrap();
            conn.pragma_update(None, "user_version", 99).unwrap();
        }
        assert!(matches!(
            SqliteIndex::open(&path),
            Err(ScriptdexError::SchemaVersionMismatch { found: 99, .. })
        ));
    }
}
