//! Cloud Session Types
//!
//! Data carried across the vendor SDK seam: authentication material handed
//! to the session factory and the per-camera metadata the service reports.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Authentication material for creating a cloud session.
pub enum SessionAuth {
    /// Resume a prior session from the persisted login-attribute blob.
    /// No verification code is required on this path.
    Token(serde_json::Value),
    /// Fresh login with account credentials. The service will demand a
    /// one-time verification code before the account is usable.
    Credentials { username: String, password: String },
}

impl fmt::Debug for SessionAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Token blobs and passwords never reach logs
        match self {
            SessionAuth::Token(_) => f.write_str("SessionAuth::Token(..)"),
            SessionAuth::Credentials { username, .. } => f
                .debug_struct("SessionAuth::Credentials")
                .field("username", username)
                .field("password", &"***MASKED***")
                .finish(),
        }
    }
}

/// Metadata the cloud service reports for one camera
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraInfo {
    /// Display name as configured in the vendor app
    pub name: String,
    /// Stable camera identifier
    pub camera_id: String,
    /// Hardware model string
    pub product_type: String,
    /// Firmware version string
    pub firmware_version: String,
    /// Serial number
    pub serial: String,
}
