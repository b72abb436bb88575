use crate::error::StoreError;
use crate::media::{ExternalRef, MediaKind};
use rusqlite::{params, Connection, OpenFlags, OptionalExtension};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Default)]
pub struct BatchLookup {
    /// One entry per requested id, in request order. The target id is
    /// `None` while the tracker has not mapped the entry yet.
    pub entries: Vec<(ExternalRef, Option<i64>)>,
}

impl BatchLookup {
    pub fn pending(&self) -> usize {
        self.entries.iter().filter(|(_, t)| t.is_none()).count()
    }
}

#[derive(Deserialize)]
struct StoredToken {
    access_token: String,
}

/// Read-only view of the tracker's database: one `anime` row per mal id.
pub struct IdentifierStore {
    conn: Connection,
}

impl IdentifierStore {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;
        conn.busy_timeout(Duration::from_secs(1))?;
        Ok(Self::from_connection(conn))
    }

    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    /// A missing row aborts the batch with [`StoreError::MissingRow`]; a NULL
    /// or non-positive target id is reported as `None`.
    pub fn resolve_batch(&self, ids: &[i64], kind: MediaKind) -> Result<BatchLookup, StoreError> {
        let sql = format!(
            "SELECT title, {} FROM anime WHERE mal_id = ?1",
            kind.store_column()
        );

        let tx = self.conn.unchecked_transaction()?;
        let mut lookup = BatchLookup::default();
        {
            let mut stmt = tx.prepare(&sql)?;
            for &id in ids {
                let row = stmt
                    .query_row(params![id], |row| {
                        Ok((row.get::<_, String>(0)?, row.get::<_, Option<i64>>(1)?))
                    })
                    .optional()?;

                let Some((title, target_id)) = row else {
                    return Err(StoreError::MissingRow { external_id: id });
                };

                lookup
                    .entries
                    .push((ExternalRef { id, title }, target_id.filter(|t| *t > 0)));
            }
        }
        tx.commit()?;

        debug!(
            %kind,
            rows = lookup.entries.len(),
            pending = lookup.pending(),
            "local store lookup finished"
        );
        Ok(lookup)
    }

    pub fn mal_access_token(&self) -> Result<String, StoreError> {
        let raw: Option<String> = self
            .conn
            .query_row("SELECT access_token FROM malauth LIMIT 1", [], |row| {
                row.get(0)
            })
            .optional()?;

        let raw = raw.ok_or(StoreError::MissingCredentials)?;
        let token: StoredToken = serde_json::from_str(&raw)?;
        Ok(token.access_token)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn seeded_store(rows: &[(i64, &str, Option<i64>, Option<i64>)]) -> IdentifierStore {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE anime (
                mal_id INTEGER PRIMARY KEY,
                title TEXT NOT NULL,
                tvdb_id INTEGER,
                tmdb_id INTEGER
            );
            CREATE TABLE malauth (
                client_id TEXT,
                client_secret TEXT,
                access_token TEXT
            );",
        )
        .unwrap();
        for (mal_id, title, tvdb_id, tmdb_id) in rows {
            conn.execute(
                "INSERT INTO anime (mal_id, title, tvdb_id, tmdb_id) VALUES (?1, ?2, ?3, ?4)",
                params![mal_id, title, tvdb_id, tmdb_id],
            )
            .unwrap();
        }
        IdentifierStore::from_connection(conn)
    }

    #[test]
    fn test_resolve_batch_keeps_request_order() {
        let store = seeded_store(&[
            (1, "Show A", Some(100), None),
            (2, "Show B", Some(0), None),
            (3, "Show C", None, None),
        ]);

        let lookup = store.resolve_batch(&[3, 1, 2], MediaKind::Series).unwrap();
        let entries: Vec<(i64, Option<i64>)> =
            lookup.entries.iter().map(|(e, t)| (e.id, *t)).collect();
        assert_eq!(entries, vec![(3, None), (1, Some(100)), (2, None)]);
        assert_eq!(lookup.entries[1].0.title, "Show A");
        assert_eq!(lookup.pending(), 2);
    }

    #[test]
    fn test_resolve_batch_reads_column_for_kind() {
        let store = seeded_store(&[(1, "Film", Some(5), Some(900))]);

        let lookup = store.resolve_batch(&[1], MediaKind::Movie).unwrap();
        assert_eq!(lookup.entries[0].1, Some(900));
    }

    #[test]
    fn test_resolve_batch_missing_row_is_hard_error() {
        let store = seeded_store(&[(1, "Show A", Some(100), None)]);

        let err = store.resolve_batch(&[1, 777], MediaKind::Series).unwrap_err();
        assert!(matches!(err, StoreError::MissingRow { external_id: 777 }));
    }

    #[test]
    fn test_mal_access_token() {
        let store = seeded_store(&[]);
        assert!(matches!(
            store.mal_access_token(),
            Err(StoreError::MissingCredentials)
        ));

        store
            .conn
            .execute(
                "INSERT INTO malauth VALUES ('id', 'secret', ?1)",
                params![r#"{"access_token":"abc","token_type":"Bearer"}"#],
            )
            .unwrap();
        assert_eq!(store.mal_access_token().unwrap(), "abc");
    }
}
