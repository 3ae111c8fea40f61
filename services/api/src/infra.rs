use ace_motivation::assessment::{ResultStore, StoreError, StoreKey};
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local result store; contents are lost on restart.
#[derive(Default, Clone)]
pub(crate) struct InMemoryResultStore {
    values: Arc<Mutex<HashMap<StoreKey, Value>>>,
}

impl ResultStore for InMemoryResultStore {
    fn put(&self, key: &StoreKey, value: Value) -> Result<(), StoreError> {
        let mut guard = self.values.lock().expect("result store mutex poisoned");
        guard.insert(key.clone(), value);
        Ok(())
    }

    fn get(&self, key: &StoreKey) -> Result<Option<Value>, StoreError> {
        let guard = self.values.lock().expect("result store mutex poisoned");
        Ok(guard.get(key).cloned())
    }

    fn delete(&self, key: &StoreKey) -> Result<bool, StoreError> {
        let mut guard = self.values.lock().expect("result store mutex poisoned");
        Ok(guard.remove(key).is_some())
    }
}

impl InMemoryResultStore {
    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.values.lock().expect("result store mutex poisoned").len()
    }
}
