pub const PRFLOW_IDENTIFIER: &str = "prflow";
pub const CONFIG_DIR_NAME: &str = PRFLOW_IDENTIFIER;
pub const TEMP_DIR_NAME: &str = PRFLOW_IDENTIFIER;
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const LOCAL_CONFIG_FILE_NAME: &str = ".prflow";
pub const ENV_PREFIX: &str = "PRFLOW";
pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_REMOTE: &str = "origin";
pub const DEFAULT_EDITOR: &str = "vi";

// Maintenance gate
pub const MAINTENANCE_STAMP_FILE: &str = "last-update-check";
pub const MAINTENANCE_INTERVAL_HOURS: u64 = 48;

// Branch naming
pub const MAX_BRANCH_SLUG_LEN: usize = 40;

// Display constants
pub const DEFAULT_TABLE_WIDTH: u16 = 120;
pub const HELP_FLAG: &str = "-h";
