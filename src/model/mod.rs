pub mod pin;
pub mod state;
pub mod config;

pub use pin::*;
pub use state::*;
pub use config::*;
