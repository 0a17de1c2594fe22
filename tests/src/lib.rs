//! # Invoice-Ledger Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── benches/          # criterion benchmarks (block index, channel replay)
//! └── src/integration/  # data access + transaction manager over file storage
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p il-tests integration::
//! cargo bench -p il-tests
//! ```

pub mod integration;
