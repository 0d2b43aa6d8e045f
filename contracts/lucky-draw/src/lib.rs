pub mod contract;
pub mod error;
pub mod execute;
pub mod hooks;
pub mod msg;
pub mod query;
pub mod state;
