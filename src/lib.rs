pub mod error;
pub mod inet;
pub mod search;

pub use error::NetError;
