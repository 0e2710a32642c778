pub mod config_io;
pub mod slot;
pub mod store;
