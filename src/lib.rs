pub mod application;
pub mod client;
pub mod domain;
pub mod http;
pub mod infrastructure;
