// Domain atoms: logic that takes service clients as arguments.
// Nothing in here owns global state; handles are constructed at startup
// and passed down from the lambda entry point.

pub mod clients;
pub mod crop;
pub mod error;
pub mod media;
pub mod reorder;
pub mod storage;

pub use error::DomainError;
