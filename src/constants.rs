// Messages
pub const MESSAGE_PASSWORD_MISMATCH: &str = "Passwords do not match!";
pub const MESSAGE_USERNAME_TAKEN: &str = "Username already exists!";
pub const MESSAGE_SIGNUP_SUCCESS: &str = "Signup successful! Please login.";
pub const MESSAGE_LOGIN_SUCCESS: &str = "Login successful!";
pub const MESSAGE_LOGIN_FAILED: &str = "Invalid credentials!";
pub const MESSAGE_LOGIN_REQUIRED: &str = "Please login first!";
pub const MESSAGE_LOGOUT_SUCCESS: &str = "You have been logged out.";
pub const MESSAGE_NO_FILES: &str = "No files selected";
pub const MESSAGE_UPLOAD_TOO_LARGE: &str = "Upload too large";
pub const MESSAGE_UPLOAD_SUCCESS: &str = "Files uploaded and compressed successfully!";
pub const MESSAGE_FILE_NOT_FOUND: &str = "File not found!";
pub const MESSAGE_DELETE_DENIED: &str = "File not found or unauthorized action!";
pub const MESSAGE_DELETE_SUCCESS: &str = "File deleted successfully!";
pub const MESSAGE_INTERNAL_SERVER_ERROR: &str = "Internal Server Error";

// Session keys
pub const SESSION_USERNAME: &str = "username";
pub const SESSION_FLASHES: &str = "_flashes";

// Routes
pub const ROUTE_HOME: &str = "/";
pub const ROUTE_SIGNUP: &str = "/signup";
pub const ROUTE_LOGIN: &str = "/login";
pub const ROUTE_MY_FILES: &str = "/myfiles";

// Multipart
pub const UPLOAD_FIELD: &str = "files[]";
pub const FALLBACK_FILENAME: &str = "upload.bin";

// Misc
pub const MIME_ZIP: &str = "application/zip";
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
