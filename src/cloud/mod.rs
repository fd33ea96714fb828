//! Cloud Session - Vendor SDK Seam
//!
//! ## Responsibilities
//!
//! - Define the stable interface the bridge consumes from the vendor SDK
//! - Session lifecycle: start, verification-code submission, post-verify setup
//! - Camera enumeration and per-camera operations (snapshot, live stream)
//!
//! The cloud wire protocol itself lives behind these traits; nothing in this
//! crate speaks it directly.

pub mod types;

use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

pub use types::{CameraInfo, SessionAuth};

/// One authenticated connection to the vendor cloud service.
#[async_trait]
pub trait CloudSession: Send + Sync {
    /// Drive the login handshake. Returns false when the service refuses
    /// the supplied credentials or token without raising a transport error.
    async fn start(&self) -> Result<bool>;

    /// Opaque login-attribute blob to persist for non-interactive resume.
    /// Only meaningful after a successful [`start`](Self::start).
    fn login_attributes(&self) -> serde_json::Value;

    /// Submit the one-time verification code for a pending login.
    async fn send_auth_key(&self, code: &str) -> Result<()>;

    /// Complete account setup after code verification.
    async fn setup_post_verify(&self) -> Result<()>;

    /// All cameras known to the account.
    async fn cameras(&self) -> Result<Vec<Arc<dyn CameraHandle>>>;
}

/// One physical camera as exposed by the cloud service.
#[async_trait]
pub trait CameraHandle: Send + Sync {
    fn info(&self) -> CameraInfo;

    /// Ask the camera to capture a fresh still frame.
    async fn snap_picture(&self) -> Result<()>;

    /// Fetch the most recent captured frame as JPEG bytes.
    async fn get_media(&self) -> Result<Vec<u8>>;

    /// Negotiate a push-based live stream session.
    async fn init_livestream(&self) -> Result<Arc<dyn LiveStream>>;

    /// Pull-based live view URL, served over RTSP.
    async fn get_liveview(&self) -> Result<String>;
}

/// A negotiated push-based live stream.
#[async_trait]
pub trait LiveStream: Send + Sync {
    /// Begin the stream on the vendor side.
    async fn start(&self) -> Result<()>;

    /// Pump stream data until the feed ends or errors. Runs for the life
    /// of the stream; callers supervise it on a background task.
    async fn feed(&self) -> Result<()>;

    /// Local URL the transport container is served from.
    fn url(&self) -> String;
}

/// Builds cloud sessions from stored or freshly entered auth material.
#[async_trait]
pub trait SessionFactory: Send + Sync {
    async fn create(&self, auth: SessionAuth) -> Result<Arc<dyn CloudSession>>;
}
