use std::{collections::BTreeMap, path::Path, sync::Arc};

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use stackd_model::ApplicationState;
use tracing::debug;

use crate::{Props, RecordKind, StateError, StateRecord, StateResult, StateStorage};

/// Lifecycle rows keyed by `<kind>/<id>`; values are JSON-encoded [`StateRecord`]s.
const STATES: TableDefinition<&str, &[u8]> = TableDefinition::new("states");

macro_rules! map_err {
    ($variant:ident) => {
        |e| StateError::$variant(e.to_string())
    };
}

/// Durable state storage on an embedded redb database.
#[derive(Clone)]
pub struct RedbStateStorage {
    db: Arc<Database>,
}

impl RedbStateStorage {
    /// Open (or create) the database file at `path`.
    pub fn open(path: &Path) -> StateResult<Self> {
        let db = Database::create(path).map_err(map_err!(Open))?;
        let store = Self { db: Arc::new(db) };
        store.ensure_tables()?;
        debug!(?path, "state storage opened");
        Ok(store)
    }

    /// Ephemeral database, for tests.
    pub fn open_in_memory() -> StateResult<Self> {
        let backend = redb::backends::InMemoryBackend::new();
        let db = Database::builder()
            .create_with_backend(backend)
            .map_err(map_err!(Open))?;
        let store = Self { db: Arc::new(db) };
        store.ensure_tables()?;
        debug!("in-memory state storage opened");
        Ok(store)
    }

    fn ensure_tables(&self) -> StateResult<()> {
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        txn.open_table(STATES).map_err(map_err!(Table))?;
        txn.commit().map_err(map_err!(Transaction))?;
        Ok(())
    }

    fn put(&self, record: &StateRecord) -> StateResult<()> {
        let key = record.key();
        let value = serde_json::to_vec(record).map_err(map_err!(Serialize))?;
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        {
            let mut table = txn.open_table(STATES).map_err(map_err!(Table))?;
            table
                .insert(key.as_str(), value.as_slice())
                .map_err(map_err!(Write))?;
        }
        txn.commit().map_err(map_err!(Transaction))?;
        debug!(%key, state = record.state, "state recorded");
        Ok(())
    }

    /// Latest record for `kind`/`id`.
    pub fn get(&self, kind: RecordKind, id: &str) -> StateResult<Option<StateRecord>> {
        let key = format!("{kind}/{id}");
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(STATES).map_err(map_err!(Table))?;
        match table.get(key.as_str()).map_err(map_err!(Read))? {
            Some(guard) => {
                let record = serde_json::from_slice(guard.value()).map_err(map_err!(Deserialize))?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    /// Every application record, in key order.
    fn applications(&self) -> StateResult<Vec<StateRecord>> {
        let prefix = format!("{}/", RecordKind::Application);
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(STATES).map_err(map_err!(Table))?;
        let mut out = Vec::new();
        for entry in table.iter().map_err(map_err!(Read))? {
            let (key, value) = entry.map_err(map_err!(Read))?;
            if !key.value().starts_with(&prefix) {
                continue;
            }
            let record: StateRecord =
                serde_json::from_slice(value.value()).map_err(map_err!(Deserialize))?;
            out.push(record);
        }
        Ok(out)
    }
}

impl StateStorage for RedbStateStorage {
    fn save_task_state(&self, task: &Props, context: &Props, state: ApplicationState) -> StateResult<()> {
        self.put(&StateRecord::task(task, context, state)?)
    }

    fn save_application_state(&self, id: &str, parent: &str, state: ApplicationState) -> StateResult<()> {
        self.put(&StateRecord::application(id, parent, state))
    }

    fn save_stack_state(&self, id: &str, state: ApplicationState) -> StateResult<()> {
        self.put(&StateRecord::stack(id, state))
    }

    fn get_stack_state(&self, stack_id: &str) -> StateResult<BTreeMap<String, ApplicationState>> {
        self.applications()?
            .into_iter()
            .filter(|r| r.parent == stack_id)
            .map(|r| Ok((r.id.clone(), r.application_state()?)))
            .collect()
    }
}
