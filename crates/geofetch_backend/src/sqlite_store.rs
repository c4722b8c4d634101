use anyhow::Context as _;
use geofetch_domain::PreferenceStore;
use rusqlite::{Connection, OptionalExtension as _, params};
use std::path::Path;

const MIGRATIONS: &[(u32, &str)] = &[(
    1,
    include_str!(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/migrations/0001_init.sql"
    )),
)];

/// SQLite-backed preference store. The `PreferenceStore` trait is
/// infallible by design (preferences are best-effort); IO errors are logged
/// and read as absent keys.
pub struct SqlitePreferenceStore {
    conn: Connection,
}

impl SqlitePreferenceStore {
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create preference dir {}", parent.display()))?;
        }
        let conn = Connection::open(path)
            .with_context(|| format!("open preference db {}", path.display()))?;
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> anyhow::Result<Self> {
        Self::from_connection(Connection::open_in_memory().context("open in-memory db")?)
    }

    fn from_connection(conn: Connection) -> anyhow::Result<Self> {
        conn.pragma_update(None, "journal_mode", "WAL")
            .context("enable WAL")?;
        migrate(&conn)?;
        Ok(Self { conn })
    }

    fn read(&self, key: &str) -> anyhow::Result<Option<String>> {
        self.conn
            .query_row(
                "SELECT value FROM preferences WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .with_context(|| format!("read preference {key}"))
    }

    fn write(&self, key: &str, value: &str) -> anyhow::Result<()> {
        self.conn
            .execute(
                "INSERT INTO preferences (key, value) VALUES (?1, ?2)
                 ON CONFLICT (key) DO UPDATE SET value = excluded.value",
                params![key, value],
            )
            .with_context(|| format!("write preference {key}"))?;
        Ok(())
    }
}

impl PreferenceStore for SqlitePreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        match self.read(key) {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(key, error = %err, "preference read failed");
                None
            }
        }
    }

    fn put(&mut self, key: &str, value: &str) {
        if let Err(err) = self.write(key, value) {
            tracing::warn!(key, error = %err, "preference write failed");
        }
    }
}

fn migrate(conn: &Connection) -> anyhow::Result<()> {
    let version: u32 = conn
        .query_row("PRAGMA user_version", [], |row| row.get(0))
        .context("read schema version")?;
    for (target, sql) in MIGRATIONS {
        if *target > version {
            conn.execute_batch(sql)
                .with_context(|| format!("apply migration {target}"))?;
            conn.pragma_update(None, "user_version", target)
                .with_context(|| format!("bump schema version to {target}"))?;
        }
    }
    Ok(())
}
