//! Concrete repository implementations.

pub mod account;

pub use account::AccountRepository;
