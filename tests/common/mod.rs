//! Common test infrastructure
//!
//! Tests should only import from this module, not from internal submodules.
//!
//! # Example
//!
//! ```no_run
//! mod common;
//! use common::{TestCatalog, FLASH_GAME_1_ID};
//!
//! #[tokio::test]
//! async fn test_get_record() {
//!     let catalog = TestCatalog::create().await;
//!     let (manager, problems) = catalog.load().await;
//!     assert!(problems.is_empty());
//!     assert!(manager.record(FLASH_GAME_1_ID).is_some());
//! }
//! ```

mod constants;
mod fixtures;

pub use constants::*;
pub use fixtures::TestCatalog;

#[allow(unused_imports)]
pub use fixtures::{assert_mirrored, game_entry, ids_of, test_record};
