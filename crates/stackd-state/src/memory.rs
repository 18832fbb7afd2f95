use std::{
    collections::BTreeMap,
    sync::{Mutex, PoisonError},
};

use stackd_model::ApplicationState;

use crate::{Props, RecordKind, StateRecord, StateResult, StateStorage};

/// In-process store keyed like the durable one. Intended for tests and
/// single-run agents.
#[derive(Debug, Default)]
pub struct MemoryStateStorage {
    records: Mutex<BTreeMap<String, StateRecord>>,
}

impl MemoryStateStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn put(&self, record: StateRecord) {
        let mut records = self.records.lock().unwrap_or_else(PoisonError::into_inner);
        records.insert(record.key(), record);
    }

    /// Latest record for `kind`/`id`.
    pub fn get(&self, kind: RecordKind, id: &str) -> Option<StateRecord> {
        let records = self.records.lock().unwrap_or_else(PoisonError::into_inner);
        records.get(&format!("{kind}/{id}")).cloned()
    }

    /// Snapshot of every record, ordered by key.
    pub fn records(&self) -> Vec<StateRecord> {
        let records = self.records.lock().unwrap_or_else(PoisonError::into_inner);
        records.values().cloned().collect()
    }
}

impl StateStorage for MemoryStateStorage {
    fn save_task_state(&self, task: &Props, context: &Props, state: ApplicationState) -> StateResult<()> {
        self.put(StateRecord::task(task, context, state)?);
        Ok(())
    }

    fn save_application_state(&self, id: &str, parent: &str, state: ApplicationState) -> StateResult<()> {
        self.put(StateRecord::application(id, parent, state));
        Ok(())
    }

    fn save_stack_state(&self, id: &str, state: ApplicationState) -> StateResult<()> {
        self.put(StateRecord::stack(id, state));
        Ok(())
    }

    fn get_stack_state(&self, stack_id: &str) -> StateResult<BTreeMap<String, ApplicationState>> {
        let records = self.records.lock().unwrap_or_else(PoisonError::into_inner);
        records
            .values()
            .filter(|r| r.kind == RecordKind::Application && r.parent == stack_id)
            .map(|r| Ok((r.id.clone(), r.application_state()?)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latest_write_wins() {
        let s = MemoryStateStorage::new();
        s.save_application_state("foo", "stack", ApplicationState::Staging)
            .unwrap();
        s.save_application_state("foo", "stack", ApplicationState::Running)
            .unwrap();

        let rec = s.get(RecordKind::Application, "foo").unwrap();
        assert_eq!(rec.application_state().unwrap(), ApplicationState::Running);
        assert_eq!(s.records().len(), 1);
    }

    #[test]
    fn stack_state_lists_children_only() {
        let s = MemoryStateStorage::new();
        s.save_application_state("a", "stack-1", ApplicationState::Running)
            .unwrap();
        s.save_application_state("b", "stack-1", ApplicationState::Fail)
            .unwrap();
        s.save_application_state("c", "stack-2", ApplicationState::Running)
            .unwrap();
        s.save_stack_state("stack-1", ApplicationState::Running).unwrap();

        let state = s.get_stack_state("stack-1").unwrap();
        assert_eq!(state.len(), 2);
        assert_eq!(state["a"], ApplicationState::Running);
        assert_eq!(state["b"], ApplicationState::Fail);
    }

    #[test]
    fn task_without_id_is_rejected() {
        let s = MemoryStateStorage::new();
        assert!(
            s.save_task_state(&Props::new(), &Props::new(), ApplicationState::Running)
                .is_err()
        );
        assert!(s.records().is_empty());
    }
}
