//! Shared constants for end-to-end tests
//!
//! The dataset written by the fixtures uses these titles in this order,
//! so the catalog index of each song is its position below.

// ============================================================================
// Test Catalog
// ============================================================================

pub const SONG_0: (&str, &str) = ("Yellow", "Coldplay");
pub const SONG_1: (&str, &str) = ("Fix You", "Coldplay");
pub const SONG_2: (&str, &str) = ("Karma Police", "Radiohead");
pub const SONG_3: (&str, &str) = ("Creep", "Radiohead");
pub const SONG_4: (&str, &str) = ("Fade Into You", "Mazzy Star");
pub const SONG_5: (&str, &str) = ("Everlong", "Foo Fighters");

pub const ALL_SONGS: [(&str, &str); 6] = [SONG_0, SONG_1, SONG_2, SONG_3, SONG_4, SONG_5];

/// Symmetric, ones on the diagonal, no ties within a row.
pub const SIMILARITY: [[f32; 6]; 6] = [
    [1.0, 0.1, 0.9, 0.3, 0.5, 0.7],
    [0.1, 1.0, 0.2, 0.8, 0.4, 0.6],
    [0.9, 0.2, 1.0, 0.35, 0.45, 0.15],
    [0.3, 0.8, 0.35, 1.0, 0.25, 0.05],
    [0.5, 0.4, 0.45, 0.25, 1.0, 0.55],
    [0.7, 0.6, 0.15, 0.05, 0.55, 1.0],
];

/// Expected ranking for SONG_0.
pub const SONG_0_RECOMMENDATIONS: [&str; 5] = [
    "Karma Police",
    "Everlong",
    "Fade Into You",
    "Creep",
    "Fix You",
];

/// The fake metadata provider reports this song as missing from the service.
pub const UNKNOWN_TO_SERVICE: &str = "Creep";

pub const COVERS_BASE_URL: &str = "https://covers.test";
pub const LISTEN_BASE_URL: &str = "https://listen.test";

// ============================================================================
// Timeouts
// ============================================================================

pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;
pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 20;
pub const REQUEST_TIMEOUT_SECS: u64 = 10;
