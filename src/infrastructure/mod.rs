pub mod page;
pub mod relay_client;
pub mod source;
