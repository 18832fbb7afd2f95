use std::collections::BTreeMap;

use stackd_model::ApplicationState;

use crate::{Props, StateResult, StateStorage};

/// Discards every write. Used before a real store is available.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopStateStorage;

impl StateStorage for NoopStateStorage {
    fn save_task_state(&self, _: &Props, _: &Props, _: ApplicationState) -> StateResult<()> {
        Ok(())
    }

    fn save_application_state(&self, _: &str, _: &str, _: ApplicationState) -> StateResult<()> {
        Ok(())
    }

    fn save_stack_state(&self, _: &str, _: ApplicationState) -> StateResult<()> {
        Ok(())
    }

    fn get_stack_state(&self, _: &str) -> StateResult<BTreeMap<String, ApplicationState>> {
        Ok(BTreeMap::new())
    }
}
