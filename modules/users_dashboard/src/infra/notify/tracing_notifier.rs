use crate::domain::ports::Notifier;

/// Notifier that turns toasts into log events under `users_dashboard::toast`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn success(&self, message: &str) {
        tracing::info!(target: "users_dashboard::toast", kind = "success", "{message}");
    }

    fn error(&self, message: &str) {
        tracing::warn!(target: "users_dashboard::toast", kind = "error", "{message}");
    }
}
