pub mod filter;
pub mod migrations;
pub mod queries;
pub mod seed;

use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Context};
use rusqlite::functions::FunctionFlags;
use rusqlite::types::ValueRef;
use rusqlite::Connection;
use serde::Serialize;

/// A stored record: a JSON object whose `_id` field carries the document id.
pub type Document = serde_json::Map<String, serde_json::Value>;

pub const SERVICES: &str = "services";
pub const BOOKINGS: &str = "bookings";

/// Handle to the document store, opened once at startup and shared by all handlers.
#[derive(Clone)]
pub struct Store {
    conn: Arc<Mutex<Connection>>,
}

impl Store {
    pub fn open(path: &str) -> anyhow::Result<Self> {
        let conn = Connection::open(path).context("failed to open database")?;

        conn.execute_batch("PRAGMA journal_mode=WAL;")
            .context("failed to set database pragmas")?;

        register_functions(&conn)?;
        migrations::run_migrations(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Runs `f` while holding the connection, so multi-statement work sees a consistent view.
    pub fn with_conn<T, E>(&self, f: impl FnOnce(&Connection) -> Result<T, E>) -> Result<T, E>
    where
        E: From<anyhow::Error>,
    {
        let conn = self
            .conn
            .lock()
            .map_err(|_| anyhow!("store connection mutex poisoned"))?;
        f(&conn)
    }

    pub fn ping(&self) -> anyhow::Result<()> {
        self.with_conn(|conn| -> anyhow::Result<()> {
            conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
                .context("store ping failed")?;
            Ok(())
        })
    }
}

/// Adds `unicode_lower(x)`, a full Unicode lowercase; SQLite's own `lower()` folds ASCII only.
pub(crate) fn register_functions(conn: &Connection) -> anyhow::Result<()> {
    conn.create_scalar_function(
        "unicode_lower",
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let lowered = match ctx.get_raw(0) {
                ValueRef::Text(bytes) => Some(String::from_utf8_lossy(bytes).to_lowercase()),
                ValueRef::Integer(i) => Some(i.to_string()),
                ValueRef::Real(f) => Some(f.to_string()),
                ValueRef::Null | ValueRef::Blob(_) => None,
            };
            Ok(lowered)
        },
    )
    .context("failed to register unicode_lower")?;
    Ok(())
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InsertOneResult {
    pub acknowledged: bool,
    pub inserted_id: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResult {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
    pub upserted_id: Option<String>,
    pub upserted_count: u64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResult {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

/// Converts a stored document into a typed record.
pub fn decode<T: serde::de::DeserializeOwned>(doc: Document) -> anyhow::Result<T> {
    serde_json::from_value(serde_json::Value::Object(doc)).context("stored document does not match its schema")
}
