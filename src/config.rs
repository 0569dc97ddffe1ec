//! Application-level configuration constants.

// Frame-rate watchdog (reference policy)
pub const FPS_WINDOW_MS: f64 = 1000.0;
pub const STRUGGLE_BELOW_FPS: u32 = 28;
pub const STRUGGLE_AFTER_WINDOWS: u32 = 2;
pub const RECOVER_ABOVE_FPS: u32 = 50;
pub const RECOVER_AFTER_WINDOWS: u32 = 5;
pub const DOWNGRADE_FPS_FLOOR: u32 = 24;
pub const DOWNGRADE_EVERY_N_WINDOWS: u32 = 3;

// UI behavior
pub const RESIZE_DEBOUNCE_MS: u32 = 150;
pub const PARTICLE_LINK_DISTANCE_PX: f64 = 120.0;

// Chat relay
pub const CHAT_HISTORY_TURNS: usize = 6;
pub const CHAT_MAX_MESSAGE_CHARS: usize = 1_000;

// Live activity
pub const ACTIVITY_EVENT_PAGE: usize = 30;
pub const ACTIVITY_MAX_PUSHES: usize = 5;
pub const ACTIVITY_MAX_REPOS: usize = 4;
pub const ACTIVITY_CACHE_TTL_MS: f64 = 5.0 * 60.0 * 1000.0;

/// Deploy-time settings, baked in when the wasm bundle is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteConfig {
    /// Path (or absolute URL) of the chat relay endpoint
    pub chat_endpoint: String,
    /// GitHub handle whose public activity is shown
    pub github_user: String,
    pub github_api_base: String,
    /// Show the tier override overlay
    pub dev_overlay: bool,
}

impl SiteConfig {
    pub fn from_env() -> Self {
        Self {
            chat_endpoint: option_env!("FOLIO_CHAT_ENDPOINT")
                .unwrap_or("/api/chat")
                .to_string(),
            github_user: option_env!("FOLIO_GITHUB_USER")
                .unwrap_or("octocat")
                .to_string(),
            github_api_base: option_env!("FOLIO_GITHUB_API")
                .unwrap_or("https://api.github.com")
                .trim_end_matches('/')
                .to_string(),
            dev_overlay: cfg!(debug_assertions)
                || matches!(option_env!("FOLIO_DEV_OVERLAY"), Some("1") | Some("true")),
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self::from_env()
    }
}
