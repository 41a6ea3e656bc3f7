//! In-process lookup and collaborator doubles.
//!
//! [`FakeLookup`] records every query it receives and can *hold* a query so
//! that its response only arrives when the test calls [`FakeLookup::release`].
//! That is how harnesses force out-of-order completion.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;
use typeahead_core::{ErrorReporter, Lookup, LookupError, Navigator, Suggestion};

#[derive(Default)]
pub struct FakeLookup {
    responses: Mutex<HashMap<String, Vec<Suggestion>>>,
    failures: Mutex<HashMap<String, LookupError>>,
    gates: Mutex<HashMap<String, Arc<Notify>>>,
    calls: Mutex<Vec<String>>,
}

impl FakeLookup {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Answer `query` with `suggestions`. Unknown queries get `[]`.
    pub fn respond(&self, query: &str, suggestions: Vec<Suggestion>) {
        self.responses.lock().unwrap().insert(query.to_string(), suggestions);
    }

    pub fn fail(&self, query: &str, error: LookupError) {
        self.failures.lock().unwrap().insert(query.to_string(), error);
    }

    /// Block responses for `query` until [`release`](Self::release).
    pub fn hold(&self, query: &str) {
        self.gates
            .lock()
            .unwrap()
            .insert(query.to_string(), Arc::new(Notify::new()));
    }

    pub fn release(&self, query: &str) {
        if let Some(gate) = self.gates.lock().unwrap().get(query) {
            gate.notify_one();
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Lookup for FakeLookup {
    async fn lookup(&self, query: &str) -> Result<Vec<Suggestion>, LookupError> {
        self.calls.lock().unwrap().push(query.to_string());

        let gate = self.gates.lock().unwrap().get(query).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        if let Some(err) = self.failures.lock().unwrap().get(query) {
            return Err(err.clone());
        }
        Ok(self
            .responses
            .lock()
            .unwrap()
            .get(query)
            .cloned()
            .unwrap_or_default())
    }
}

/// Records navigations and reported errors.
#[derive(Default)]
pub struct Recorder {
    routes: Mutex<Vec<String>>,
    errors: Mutex<Vec<LookupError>>,
}

impl Recorder {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn routes(&self) -> Vec<String> {
        self.routes.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<LookupError> {
        self.errors.lock().unwrap().clone()
    }
}

impl Navigator for Recorder {
    fn navigate(&self, path: &str) {
        self.routes.lock().unwrap().push(path.to_string());
    }
}

impl ErrorReporter for Recorder {
    fn report(&self, error: &LookupError) {
        self.errors.lock().unwrap().push(error.clone());
    }
}
