//! Shared constants for integration tests
//!
//! When the fixture catalog changes, update only this file and fixtures.rs.

#![allow(dead_code)]

// ============================================================================
// Libraries and platforms
// ============================================================================

pub const ARCADE: &str = "arcade";
pub const THEATRE: &str = "theatre";

pub const FLASH: &str = "Flash";
pub const HTML5: &str = "HTML5";
pub const SHOCKWAVE: &str = "Shockwave";

// ============================================================================
// Fixture game IDs
// ============================================================================

/// "Alpha Blaster" on arcade/Flash
pub const FLASH_GAME_1_ID: &str = "8a1d0b52-5a0e-4d4f-9f3c-1b1e8c7d0001";

/// "Bravo's Quest" on arcade/Flash, title holds an apostrophe
pub const FLASH_GAME_2_ID: &str = "8a1d0b52-5a0e-4d4f-9f3c-1b1e8c7d0002";

/// "Charlie & Co" on arcade/Flash, entry carries an opaque "Favorite" key
pub const FLASH_GAME_3_ID: &str = "8a1d0b52-5a0e-4d4f-9f3c-1b1e8c7d0003";

/// "Delta Run" on arcade/HTML5
pub const HTML5_GAME_1_ID: &str = "8a1d0b52-5a0e-4d4f-9f3c-1b1e8c7d0004";

/// "Echo Park" on arcade/HTML5
pub const HTML5_GAME_2_ID: &str = "8a1d0b52-5a0e-4d4f-9f3c-1b1e8c7d0005";

/// "Foxtrot" on theatre/Shockwave
pub const SHOCKWAVE_GAME_1_ID: &str = "8a1d0b52-5a0e-4d4f-9f3c-1b1e8c7d0006";

pub const FIXTURE_PLATFORM_COUNT: usize = 3;
pub const FIXTURE_GAME_COUNT: usize = 6;
