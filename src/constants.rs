// Settings file
pub const SETTINGS_FILE_NAME: &str = "Settings.config";
pub const SETTINGS_ROOT_ELEMENT: &str = "Settings";
pub const SETTINGS_PATH_ENV: &str = "GAMECONF_SETTINGS";
pub const LOG_FILE_NAME: &str = "gameconf.log";

// Project directory identity (see directories::ProjectDirs)
pub const PROJECT_QUALIFIER: &str = "";
pub const PROJECT_ORGANIZATION: &str = "";
pub const PROJECT_APPLICATION: &str = "gameconf";

// Rebind capture
pub const REBIND_SETTLE_DELAY_MS: u64 = 100;
pub const REBIND_PENDING_LABEL: &str = "...";
pub const EXCLUDED_CONTROLS: [&str; 4] = [
    "<Mouse>/position",
    "<Mouse>/delta",
    "<Keyboard>/escape",
    "<Keyboard>/anyKey",
];

// Audio mixer
pub const MUTE_THRESHOLD_DB: f32 = -20.0;
pub const MUTED_DB: f32 = -80.0;

// Headless display fallback
pub const DEFAULT_WIDTH: u32 = 1920;
pub const DEFAULT_HEIGHT: u32 = 1080;
pub const DEFAULT_REFRESH_RATE: u32 = 60;

// Versioning
pub const VERSION_FILE_NAME: &str = "Version.json";
pub const GIT_TIMEOUT_SECONDS: u64 = 10;
