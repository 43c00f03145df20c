// === PUBLIC CONTRACT ===
// Collaborator traits and models shared with adapters and the binary
pub mod contract;

// Re-export the public contract components
pub use contract::{client, error, model};

// === CONFIGURATION ===
pub mod config;
pub use config::UsersDashboardConfig;

// === CORE ===
// Store reconciliation, list view, form rules
pub mod domain;
pub use domain::store::UserStore;
pub use domain::view::UserListView;

// === ADAPTERS ===
// HTTP remote service and notifier implementations
pub mod infra;
