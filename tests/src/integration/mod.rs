//! # Integration Tests
//!
//! Full stack flows: `TransactionManager` → `DataAccessService` → `FileStorage`.

pub mod flows;
