pub mod error;
pub mod form;
pub mod ids;
pub mod ports;
pub mod store;
pub mod view;
