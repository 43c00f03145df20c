use std::sync::Arc;

use tracing::{debug, instrument};

use crate::contract::model::UserRecord;
use crate::domain::form::{FieldError, FormInput, UserForm};
use crate::domain::store::UserStore;

pub const DEFAULT_PAGE_SIZE: usize = 5;

/// Placeholder shown for a missing department
pub const DEPARTMENT_PLACEHOLDER: &str = "N/A";

/// State of the add/edit modal
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FormState {
    #[default]
    Closed,
    Creating,
    Editing(UserRecord),
}

impl FormState {
    pub fn is_open(&self) -> bool {
        !matches!(self, FormState::Closed)
    }
}

/// One table row. Derived on every render, never cached on the record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRow {
    pub id: u64,
    pub first_name: String,
    pub last_name: Option<String>,
    pub email: String,
    pub department: String,
}

impl From<&UserRecord> for UserRow {
    fn from(user: &UserRecord) -> Self {
        let parts = user.name_parts();
        Self {
            id: user.id,
            first_name: parts.first.to_string(),
            last_name: parts.last.map(str::to_string),
            email: user.email.clone(),
            department: user
                .department
                .clone()
                .filter(|d| !d.is_empty())
                .unwrap_or_else(|| DEPARTMENT_PLACEHOLDER.to_string()),
        }
    }
}

/// A window over the list with its navigation state
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page_info: PageInfo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    /// 1-based
    pub page: usize,
    pub page_size: usize,
    pub total: usize,
    pub has_prev: bool,
    pub has_next: bool,
}

impl<T> Page<T> {
    /// Map items while preserving page_info
    pub fn map_items<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page_info: self.page_info,
        }
    }
}

/// Slice `items` to the 1-based `page`. Out-of-range pages are empty.
pub fn paginate<T: Clone>(items: &[T], page: usize, page_size: usize) -> Page<T> {
    let page = page.max(1);
    let total = items.len();
    let start = (page - 1).saturating_mul(page_size).min(total);
    let end = page.saturating_mul(page_size).min(total);

    Page {
        items: items[start..end].to_vec(),
        page_info: PageInfo {
            page,
            page_size,
            total,
            has_prev: page > 1,
            has_next: page.saturating_mul(page_size) < total,
        },
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScreenBody {
    /// Shown instead of the table while a load is pending
    Loading,
    Table(Page<UserRow>),
}

/// Everything needed to draw the dashboard once
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardScreen {
    pub body: ScreenBody,
    pub page: usize,
    pub has_prev: bool,
    pub has_next: bool,
    pub form: FormState,
}

/// Paginated projection of the store plus gesture routing.
pub struct UserListView {
    store: Arc<UserStore>,
    page: usize,
    page_size: usize,
    form: FormState,
}

impl UserListView {
    pub fn new(store: Arc<UserStore>, page_size: usize) -> Self {
        Self {
            store,
            page: 1,
            page_size: page_size.max(1),
            form: FormState::Closed,
        }
    }

    pub fn store(&self) -> &Arc<UserStore> {
        &self.store
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    /// Initial load
    pub async fn mount(&mut self) {
        let _ = self.store.load().await;
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page * self.page_size < self.store.len()
    }

    pub fn next_page(&mut self) {
        if self.has_next() {
            self.page += 1;
        }
    }

    pub fn prev_page(&mut self) {
        if self.has_prev() {
            self.page -= 1;
        }
    }

    /// Records of the current page. The page is not clamped when the list
    /// shrinks underneath it.
    pub fn current_page(&self) -> Page<UserRecord> {
        paginate(&self.store.users(), self.page, self.page_size)
    }

    pub fn render(&self) -> DashboardScreen {
        let body = if self.store.is_loading() {
            ScreenBody::Loading
        } else {
            ScreenBody::Table(self.current_page().map_items(|u| UserRow::from(&u)))
        };

        DashboardScreen {
            body,
            page: self.page,
            has_prev: self.has_prev(),
            has_next: self.has_next(),
            form: self.form.clone(),
        }
    }

    // --- gestures ---

    pub fn click_add(&mut self) {
        self.form = FormState::Creating;
    }

    /// Open the form on the selected record. Returns false if the id is not
    /// in the list.
    pub fn click_edit(&mut self, id: u64) -> bool {
        match self.store.find(id) {
            Some(record) => {
                self.form = FormState::Editing(record);
                true
            }
            None => {
                debug!(user_id = id, "Edit requested for unknown user");
                false
            }
        }
    }

    /// Delete right away, no confirmation step.
    pub async fn click_delete(&mut self, id: u64) {
        let _ = self.store.delete(id).await;
    }

    pub fn cancel_form(&mut self) {
        self.form = FormState::Closed;
    }

    /// Validate and submit the open form.
    ///
    /// Invalid input keeps the form open and returns the field errors. Valid
    /// input is sent to `create` or `update` and the form closes whatever the
    /// outcome of that call; the outcome surfaces through notifications and
    /// the list.
    #[instrument(name = "users_dashboard.view.submit_form", skip_all)]
    pub async fn submit_form(&mut self, input: FormInput) -> Result<(), Vec<FieldError>> {
        let draft = UserForm::validate(&input)?;

        match std::mem::take(&mut self.form) {
            FormState::Closed => {
                debug!("Submit with no open form ignored");
            }
            FormState::Creating => {
                let _ = self.store.create(draft).await;
            }
            FormState::Editing(selected) => {
                let edited = UserRecord {
                    name: draft.name,
                    email: draft.email,
                    department: draft.department,
                    ..selected
                };
                let _ = self.store.update(edited).await;
            }
        }
        Ok(())
    }
}
