//! Adapters implementing domain ports and persistence.

pub mod storage;
pub mod tools;
