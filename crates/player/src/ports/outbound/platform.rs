//! Platform abstraction ports
//!
//! Storage, time and the interactive resume prompt. Implementations live in
//! `infrastructure`; tests use in-memory versions.

/// Persistent key/value storage (file-based on desktop)
pub trait StorageProvider: Send + Sync {
    /// Save a string value with the given key
    fn save(&self, key: &str, value: &str);

    /// Load a string value by key, returns None if not found
    fn load(&self, key: &str) -> Option<String>;

    /// Remove a value by key
    fn remove(&self, key: &str);
}

/// Wall clock
pub trait TimeProvider: Send + Sync {
    /// Milliseconds since the Unix epoch
    fn now_millis(&self) -> i64;
}

/// Asks the player whether to continue from a saved scene.
pub trait ResumeConsent {
    fn confirm_resume(&self, scene_title: &str) -> bool;
}

impl<F> ResumeConsent for F
where
    F: Fn(&str) -> bool,
{
    fn confirm_resume(&self, scene_title: &str) -> bool {
        self(scene_title)
    }
}

/// Storage keys used across the player
pub mod storage_keys {
    pub const SESSION_ID: &str = "cq_session_id";
    pub const PLAYER_NAME: &str = "cq_player_name";
}
