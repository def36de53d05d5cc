use super::{GameBlob, GameRecord, GameStore, StoreError};
use rusqlite::{params, Connection, OpenFlags, OptionalExtension, TransactionBehavior};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

const BUSY_TIMEOUT_MS: u64 = 5_000;

/// Games persisted in a SQLite file. Every call opens its own connection, so
/// requests share nothing but the database.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    db_path: PathBuf,
}

impl SqliteStore {
    pub fn open(db_path: &Path) -> Result<Self, StoreError> {
        let conn = open_connection(db_path, true)?;
        initialize_schema(&conn)?;
        debug!(path = %db_path.display(), "opened game store");
        Ok(Self {
            db_path: db_path.to_path_buf(),
        })
    }

    fn connect(&self) -> Result<Connection, StoreError> {
        open_connection(&self.db_path, false)
    }
}

impl GameStore for SqliteStore {
    fn get(&self, id: &str) -> Result<Option<GameRecord>, StoreError> {
        let conn = self.connect()?;
        load_record(&conn, id)
    }

    fn insert(&self, record: &GameRecord) -> Result<(), StoreError> {
        let mut conn = self.connect()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        insert_record(&tx, record)?;
        tx.commit()?;
        Ok(())
    }

    fn replace(&self, old_id: &str, record: &GameRecord) -> Result<(), StoreError> {
        let mut conn = self.connect()?;
        // Dropping the transaction on an early return rolls it back.
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let deleted = tx.execute("DELETE FROM mahjong_game WHERE id = ?1", params![old_id])?;
        if deleted == 0 {
            warn!(old_id, new_id = %record.id, "replaced a record that was already gone");
        }
        insert_record(&tx, record)?;
        tx.commit()?;
        Ok(())
    }

    fn remove(&self, id: &str) -> Result<bool, StoreError> {
        let mut conn = self.connect()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let deleted = tx.execute("DELETE FROM mahjong_game WHERE id = ?1", params![id])?;
        tx.commit()?;
        Ok(deleted > 0)
    }

    fn len(&self) -> Result<usize, StoreError> {
        let conn = self.connect()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM mahjong_game", [], |row| row.get(0))?;
        Ok(count.max(0) as usize)
    }
}

fn open_connection(path: &Path, create: bool) -> Result<Connection, StoreError> {
    let mut flags = OpenFlags::SQLITE_OPEN_READ_WRITE;
    if create {
        flags |= OpenFlags::SQLITE_OPEN_CREATE;
    }
    let conn = Connection::open_with_flags(path, flags)?;
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "synchronous", "FULL")?;
    conn.busy_timeout(Duration::from_millis(BUSY_TIMEOUT_MS))?;
    Ok(conn)
}

fn initialize_schema(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS mahjong_game (
           id TEXT PRIMARY KEY NOT NULL,
           npub TEXT NOT NULL,
           data TEXT NOT NULL,
           count INTEGER NOT NULL,
           created_at INTEGER NOT NULL
         );",
    )?;
    Ok(())
}

fn load_record(conn: &Connection, id: &str) -> Result<Option<GameRecord>, StoreError> {
    let row = conn
        .query_row(
            "SELECT id, npub, data, count, created_at FROM mahjong_game WHERE id = ?1",
            params![id],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, u32>(3)?,
                    row.get::<_, i64>(4)?,
                ))
            },
        )
        .optional()?;
    let Some((id, owner, data, count, created_at)) = row else {
        return Ok(None);
    };
    Ok(Some(GameRecord {
        id,
        owner,
        state: GameBlob::decode(&data, count)?,
        created_at,
    }))
}

fn insert_record(conn: &Connection, record: &GameRecord) -> Result<(), StoreError> {
    let exists: Option<i64> = conn
        .query_row(
            "SELECT 1 FROM mahjong_game WHERE id = ?1",
            params![record.id],
            |row| row.get(0),
        )
        .optional()?;
    if exists.is_some() {
        return Err(StoreError::Duplicate(record.id.clone()));
    }
    let data = GameBlob::encode(&record.state)?;
    conn.execute(
        "INSERT INTO mahjong_game (id, npub, data, count, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            record.id,
            record.owner,
            data,
            record.state.turn,
            record.created_at
        ],
    )?;
    Ok(())
}
