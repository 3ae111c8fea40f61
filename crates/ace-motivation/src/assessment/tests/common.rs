use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::assessment::domain::{QuestionId, Role};
use crate::assessment::responses::RawResponses;
use crate::assessment::service::AssessmentService;
use crate::assessment::store::{ResultStore, StoreError, StoreKey};
use crate::assessment::assessment_router;

/// Answers for every item of `role`, in A, C, E order.
pub(super) fn answers(role: Role, values: [i64; 12]) -> RawResponses {
    QuestionId::all_for(role)
        .zip(values)
        .map(|(id, value)| (id.to_string(), value))
        .collect()
}

/// Same value for the four items of each dimension.
pub(super) fn uniform_answers(role: Role, autonomy: i64, competence: i64, engagement: i64) -> RawResponses {
    let mut values = [0; 12];
    values[..4].fill(autonomy);
    values[4..8].fill(competence);
    values[8..].fill(engagement);
    answers(role, values)
}

pub(super) fn build_service() -> (AssessmentService<MemoryStore>, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::default());
    let service = AssessmentService::new(store.clone());
    (service, store)
}

pub(super) fn router_with_service(service: AssessmentService<MemoryStore>) -> axum::Router {
    assessment_router(Arc::new(service))
}

#[derive(Default, Clone)]
pub(super) struct MemoryStore {
    pub(super) values: Arc<Mutex<HashMap<String, Value>>>,
}

impl MemoryStore {
    pub(super) fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .values
            .lock()
            .expect("store mutex poisoned")
            .keys()
            .cloned()
            .collect();
        keys.sort();
        keys
    }
}

impl ResultStore for MemoryStore {
    fn put(&self, key: &StoreKey, value: Value) -> Result<(), StoreError> {
        self.values
            .lock()
            .expect("store mutex poisoned")
            .insert(key.to_string(), value);
        Ok(())
    }

    fn get(&self, key: &StoreKey) -> Result<Option<Value>, StoreError> {
        let guard = self.values.lock().expect("store mutex poisoned");
        Ok(guard.get(&key.to_string()).cloned())
    }

    fn delete(&self, key: &StoreKey) -> Result<bool, StoreError> {
        let mut guard = self.values.lock().expect("store mutex poisoned");
        Ok(guard.remove(&key.to_string()).is_some())
    }
}

pub(super) struct UnavailableStore;

impl ResultStore for UnavailableStore {
    fn put(&self, _key: &StoreKey, _value: Value) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("store offline".to_string()))
    }

    fn get(&self, _key: &StoreKey) -> Result<Option<Value>, StoreError> {
        Err(StoreError::Unavailable("store offline".to_string()))
    }

    fn delete(&self, _key: &StoreKey) -> Result<bool, StoreError> {
        Err(StoreError::Unavailable("store offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
