pub mod check;
pub mod completion;
pub mod mutation;
pub mod stats;
pub mod transfer;
pub mod view;
