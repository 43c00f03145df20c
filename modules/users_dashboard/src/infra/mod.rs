pub mod http;
pub mod notify;

pub use http::HttpUserService;
pub use notify::TracingNotifier;
