use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info, instrument, warn};

use crate::contract::client::RemoteUserService;
use crate::contract::model::{UserDraft, UserRecord};
use crate::domain::error::{messages, DashboardError};
use crate::domain::ids::{IdOrigin, OriginPolicy, SyntheticIds};
use crate::domain::ports::Notifier;

/// Status a remote update must return to count as confirmed
pub const UPDATE_CONFIRMED_STATUS: u16 = 200;

/// Authoritative in-memory user list.
///
/// Every mutation goes through the remote service first and is applied to
/// the list only after the call resolves. Each apply step is a pure
/// transform of the previous list run under the write lock; the lock is
/// never held across an `.await`, so overlapping operations compose and the
/// last one to resume wins.
///
/// Every operation reports its own outcome through the [`Notifier`]. The
/// returned `Result` is informational and may be ignored.
pub struct UserStore {
    remote: Arc<dyn RemoteUserService>,
    notifier: Arc<dyn Notifier>,
    policy: OriginPolicy,
    ids: SyntheticIds,
    users: RwLock<Vec<UserRecord>>,
    loads_in_flight: AtomicUsize,
}

/// Keeps the loading flag raised while a load is pending, including when the
/// load future is dropped halfway.
struct LoadingGuard<'a>(&'a AtomicUsize);

impl<'a> LoadingGuard<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl UserStore {
    /// Create an empty store.
    pub fn new(
        remote: Arc<dyn RemoteUserService>,
        notifier: Arc<dyn Notifier>,
        policy: OriginPolicy,
    ) -> Self {
        Self::with_id_source(remote, notifier, policy, SyntheticIds::new())
    }

    pub fn with_id_source(
        remote: Arc<dyn RemoteUserService>,
        notifier: Arc<dyn Notifier>,
        policy: OriginPolicy,
        ids: SyntheticIds,
    ) -> Self {
        Self {
            remote,
            notifier,
            policy,
            ids,
            users: RwLock::new(Vec::new()),
            loads_in_flight: AtomicUsize::new(0),
        }
    }

    // --- reads ---

    /// Snapshot of the current list, in display order
    pub fn users(&self) -> Vec<UserRecord> {
        self.users.read().clone()
    }

    pub fn len(&self) -> usize {
        self.users.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.read().is_empty()
    }

    pub fn find(&self, id: u64) -> Option<UserRecord> {
        self.users.read().iter().find(|u| u.id == id).cloned()
    }

    /// True while at least one load is pending
    pub fn is_loading(&self) -> bool {
        self.loads_in_flight.load(Ordering::SeqCst) > 0
    }

    pub fn policy(&self) -> OriginPolicy {
        self.policy
    }

    // --- operations ---

    /// Replace the whole list with the remote one. Anything synthesized
    /// locally and not known to the service is dropped.
    #[instrument(name = "users_dashboard.store.load", skip(self))]
    pub async fn load(&self) -> Result<usize, DashboardError> {
        let _loading = LoadingGuard::enter(&self.loads_in_flight);
        debug!("Loading users");

        match self.remote.list_users().await {
            Ok(fetched) => {
                if let Some(id) = first_duplicate_id(&fetched) {
                    warn!(user_id = id, "Duplicate id in fetched list, keeping current list");
                    return Err(self.reject(DashboardError::load(format!(
                        "duplicate user id {id} in response"
                    ))));
                }
                let count = fetched.len();
                self.apply(|users| *users = fetched);
                info!(count, "Loaded users");
                Ok(count)
            }
            Err(e) => {
                warn!(error = %e, "Load failed, keeping current list");
                Err(self.reject(DashboardError::load(e)))
            }
        }
    }

    /// Create a user and prepend what the service returned.
    #[instrument(
        name = "users_dashboard.store.create",
        skip(self, draft),
        fields(email = %draft.email)
    )]
    pub async fn create(&self, draft: UserDraft) -> Result<UserRecord, DashboardError> {
        let synthetic_id = self.ids.next_id();
        let outgoing = UserRecord::from_draft(synthetic_id, draft);
        debug!(synthetic_id, "Creating user");

        let created = match self.remote.create_user(&outgoing).await {
            Ok(created) => created,
            Err(e) => {
                warn!(error = %e, "Create failed, nothing inserted");
                return Err(self.reject(DashboardError::create(e)));
            }
        };

        let record = self.apply(|users| {
            let mut record = created;
            if record.id == 0 || users.iter().any(|u| u.id == record.id) {
                // Missing or colliding echo id: keep the list unique
                debug!(echoed_id = record.id, synthetic_id, "Re-keying created user");
                record.id = synthetic_id;
            }
            users.insert(0, record.clone());
            record
        });

        self.notifier.success(messages::CREATED);
        info!(user_id = record.id, "Created user");
        Ok(record)
    }

    /// Update a user in place. Remote-origin ids go through the service and
    /// need a confirmed status; local-origin ids are applied directly.
    #[instrument(
        name = "users_dashboard.store.update",
        skip(self, record),
        fields(user_id = record.id)
    )]
    pub async fn update(&self, record: UserRecord) -> Result<(), DashboardError> {
        let id = record.id;

        match self.policy.classify(id) {
            IdOrigin::Local => {
                debug!("Local-origin id, skipping remote call");
                self.replace_in_place(&record);
                self.notifier.success(messages::UPDATED_LOCALLY);
                info!("Updated user locally");
                Ok(())
            }
            IdOrigin::Remote => match self.remote.update_user(id, &record).await {
                Ok(response) if response.status == UPDATE_CONFIRMED_STATUS => {
                    debug!(echo = ?response.body, "Remote update confirmed");
                    self.replace_in_place(&record);
                    self.notifier.success(messages::UPDATED_REMOTELY);
                    info!("Updated user remotely");
                    Ok(())
                }
                Ok(response) => {
                    warn!(status = response.status, "Unexpected response from server");
                    Err(self.reject(DashboardError::update(
                        id,
                        format!("unexpected status {}", response.status),
                    )))
                }
                Err(e) => {
                    warn!(error = %e, "Update failed, keeping current record");
                    Err(self.reject(DashboardError::update(id, e)))
                }
            },
        }
    }

    /// Delete a user. The service is always called, whatever the id's origin.
    #[instrument(name = "users_dashboard.store.delete", skip(self), fields(user_id = id))]
    pub async fn delete(&self, id: u64) -> Result<(), DashboardError> {
        debug!("Deleting user");

        if let Err(e) = self.remote.delete_user(id).await {
            warn!(error = %e, "Delete failed, keeping current list");
            return Err(self.reject(DashboardError::delete(id, e)));
        }

        let removed = self.apply(|users| {
            let before = users.len();
            users.retain(|u| u.id != id);
            before - users.len()
        });
        if removed == 0 {
            debug!("Deleted id was not in the list");
        }

        self.notifier.success(messages::DELETED);
        info!("Deleted user");
        Ok(())
    }

    // --- helpers ---

    /// Run one atomic transform of the list
    fn apply<R>(&self, f: impl FnOnce(&mut Vec<UserRecord>) -> R) -> R {
        let mut users = self.users.write();
        f(&mut users)
    }

    fn replace_in_place(&self, incoming: &UserRecord) {
        let replaced = self.apply(|users| {
            users
                .iter_mut()
                .find(|u| u.id == incoming.id)
                .map(|current| *current = current.merged_with(incoming))
                .is_some()
        });
        if !replaced {
            debug!("Updated id was not in the list");
        }
    }

    fn reject(&self, error: DashboardError) -> DashboardError {
        self.notifier.error(error.user_message());
        error
    }
}

fn first_duplicate_id(users: &[UserRecord]) -> Option<u64> {
    let mut seen = HashSet::with_capacity(users.len());
    users.iter().map(|u| u.id).find(|id| !seen.insert(*id))
}
