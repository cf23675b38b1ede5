pub mod init;
pub mod registry;
pub mod resolve;
pub mod spec;
pub mod validate;
