/// Output port: user-visible feedback (toasts). Fire and forget.
pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
}
