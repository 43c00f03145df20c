#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::Notify;

use users_dashboard::contract::client::RemoteUserService;
use users_dashboard::contract::error::RemoteError;
use users_dashboard::contract::model::{UpdateResponse, UserDraft, UserRecord};
use users_dashboard::domain::ids::OriginPolicy;
use users_dashboard::domain::ports::Notifier;
use users_dashboard::UserStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    List,
    Create,
    Update,
    Delete,
}

/// Scriptable remote service with a call log
pub struct MockRemote {
    users: Mutex<Vec<UserRecord>>,
    fail_list: Mutex<bool>,
    list_gate: Mutex<Option<Arc<Notify>>>,
    echo_ids: Mutex<VecDeque<u64>>,
    fail_create: Mutex<bool>,
    update_reply: Mutex<Result<u16, RemoteError>>,
    fail_delete: Mutex<bool>,
    calls: Mutex<Vec<(Op, Option<u64>)>>,
    created: Mutex<Vec<UserRecord>>,
}

impl MockRemote {
    pub fn new() -> Self {
        Self {
            users: Mutex::new(Vec::new()),
            fail_list: Mutex::new(false),
            list_gate: Mutex::new(None),
            echo_ids: Mutex::new(VecDeque::new()),
            fail_create: Mutex::new(false),
            update_reply: Mutex::new(Ok(200)),
            fail_delete: Mutex::new(false),
            calls: Mutex::new(Vec::new()),
            created: Mutex::new(Vec::new()),
        }
    }

    pub fn with_users(self, users: Vec<UserRecord>) -> Self {
        *self.users.lock() = users;
        self
    }

    pub fn failing_list(self) -> Self {
        *self.fail_list.lock() = true;
        self
    }

    /// Hold every list call until the gate is notified
    pub fn gated_list(self, gate: Arc<Notify>) -> Self {
        *self.list_gate.lock() = Some(gate);
        self
    }

    /// Ids the service assigns to created users, in order. Once exhausted the
    /// draft's own id is echoed.
    pub fn echoing_ids(self, ids: impl IntoIterator<Item = u64>) -> Self {
        self.echo_ids.lock().extend(ids);
        self
    }

    pub fn failing_create(self) -> Self {
        *self.fail_create.lock() = true;
        self
    }

    pub fn update_status(self, status: u16) -> Self {
        *self.update_reply.lock() = Ok(status);
        self
    }

    pub fn failing_update(self) -> Self {
        *self.update_reply.lock() = Err(RemoteError::status(500));
        self
    }

    pub fn failing_delete(self) -> Self {
        *self.fail_delete.lock() = true;
        self
    }

    /// Replace what the next list call returns
    pub fn set_users(&self, users: Vec<UserRecord>) {
        *self.users.lock() = users;
    }

    pub fn set_fail_list(&self, fail: bool) {
        *self.fail_list.lock() = fail;
    }

    pub fn call_count(&self, op: Op) -> usize {
        self.calls.lock().iter().filter(|(o, _)| *o == op).count()
    }

    pub fn calls(&self) -> Vec<(Op, Option<u64>)> {
        self.calls.lock().clone()
    }

    /// Drafts received by `create_user`
    pub fn created_drafts(&self) -> Vec<UserRecord> {
        self.created.lock().clone()
    }

    fn record(&self, op: Op, id: Option<u64>) {
        self.calls.lock().push((op, id));
    }
}

#[async_trait]
impl RemoteUserService for MockRemote {
    async fn list_users(&self) -> Result<Vec<UserRecord>, RemoteError> {
        self.record(Op::List, None);
        let gate = self.list_gate.lock().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        if *self.fail_list.lock() {
            return Err(RemoteError::transport("connection refused"));
        }
        Ok(self.users.lock().clone())
    }

    async fn create_user(&self, draft: &UserRecord) -> Result<UserRecord, RemoteError> {
        self.record(Op::Create, Some(draft.id));
        self.created.lock().push(draft.clone());
        if *self.fail_create.lock() {
            return Err(RemoteError::status(500));
        }
        let mut echoed = draft.clone();
        if let Some(id) = self.echo_ids.lock().pop_front() {
            echoed.id = id;
        }
        Ok(echoed)
    }

    async fn update_user(
        &self,
        id: u64,
        record: &UserRecord,
    ) -> Result<UpdateResponse, RemoteError> {
        self.record(Op::Update, Some(id));
        let status = self.update_reply.lock().clone()?;
        Ok(UpdateResponse {
            status,
            body: Some(record.clone()),
        })
    }

    async fn delete_user(&self, id: u64) -> Result<(), RemoteError> {
        self.record(Op::Delete, Some(id));
        if *self.fail_delete.lock() {
            return Err(RemoteError::status(404));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Toast {
    Success(String),
    Error(String),
}

/// Notifier that remembers every toast
#[derive(Default)]
pub struct RecordingNotifier {
    toasts: Mutex<Vec<Toast>>,
}

impl RecordingNotifier {
    pub fn toasts(&self) -> Vec<Toast> {
        self.toasts.lock().clone()
    }

    pub fn last(&self) -> Option<Toast> {
        self.toasts.lock().last().cloned()
    }
}

impl Notifier for RecordingNotifier {
    fn success(&self, message: &str) {
        self.toasts.lock().push(Toast::Success(message.to_string()));
    }

    fn error(&self, message: &str) {
        self.toasts.lock().push(Toast::Error(message.to_string()));
    }
}

pub fn success(message: &str) -> Toast {
    Toast::Success(message.to_string())
}

pub fn error(message: &str) -> Toast {
    Toast::Error(message.to_string())
}

/// `n` placeholder users with ids 1..=n
pub fn seed_users(n: u64) -> Vec<UserRecord> {
    (1..=n)
        .map(|id| {
            UserRecord::new(id, format!("User{id} Last{id}"), format!("user{id}@example.com"))
        })
        .collect()
}

pub fn draft(name: &str, email: &str, department: &str) -> UserDraft {
    UserDraft {
        name: name.to_string(),
        email: email.to_string(),
        department: Some(department.to_string()),
    }
}

pub struct Harness {
    pub remote: Arc<MockRemote>,
    pub notifier: Arc<RecordingNotifier>,
    pub store: Arc<UserStore>,
}

pub fn harness(remote: MockRemote) -> Harness {
    let remote = Arc::new(remote);
    let notifier = Arc::new(RecordingNotifier::default());
    let store = Arc::new(UserStore::new(
        remote.clone(),
        notifier.clone(),
        OriginPolicy::default(),
    ));
    Harness {
        remote,
        notifier,
        store,
    }
}

/// Harness whose store already holds `users`
pub async fn loaded_harness(users: Vec<UserRecord>, remote: MockRemote) -> Harness {
    let h = harness(remote.with_users(users));
    h.store.load().await.expect("seed load");
    h
}
