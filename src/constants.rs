// Fundamental configuration constants
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_USER_SERVICE_PORT: u16 = 8081;
pub const DEFAULT_TASK_SERVICE_PORT: u16 = 8082;

// Token lifetime
pub const DEFAULT_TOKEN_TTL_HOURS: u64 = 24;

// Minimum wall-clock duration of a login attempt, in milliseconds
pub const DEFAULT_MIN_AUTH_MILLIS: u64 = 100;

// Bearer scheme prefix of the Authorization header
pub const BEARER_PREFIX: &str = "Bearer ";

// Uniform message for every authentication failure
pub const UNAUTHENTICATED_MESSAGE: &str = "Invalid or missing token";
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid username or password!";
pub const TASK_NOT_FOUND_MESSAGE: &str = "Task not found or access denied";

// Task payload limits
pub const MAX_TITLE_LENGTH: usize = 255;
pub const MAX_DESCRIPTION_LENGTH: usize = 1000;

// Registration payload limits
pub const MIN_USERNAME_LENGTH: usize = 3;
pub const MAX_USERNAME_LENGTH: usize = 50;
pub const MIN_PASSWORD_LENGTH: usize = 6;

// Maximum accepted JSON request body, in bytes
pub const MAX_BODY_BYTES: u64 = 16 * 1024;
