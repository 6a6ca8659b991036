//! Persistent store backends.

pub mod redb;

pub use self::redb::RedbStore;
