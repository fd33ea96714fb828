//! Device Hub Seam
//!
//! ## Responsibilities
//!
//! - Define the interface the bridge consumes from the device-management hub
//!   (manifest publication, device-event notification)
//! - Define the capability interfaces the bridge's devices implement for the
//!   hub (Camera, VideoCamera, Settings, DeviceProvider)
//!
//! The hub's own device-management protocol stays on the far side of these
//! traits; the bridge only produces manifests and media objects for it.

pub mod types;

use crate::error::Result;
use crate::media::{MediaObject, MediaStreamOptions};
use async_trait::async_trait;
use std::sync::Arc;

pub use types::{
    DeviceInfo, DeviceInterface, DeviceManifest, DeviceType, PictureOption, PictureRequest,
    Setting, SettingType, StreamRequest,
};

/// Callbacks into the device-management hub.
#[async_trait]
pub trait DeviceHub: Send + Sync {
    /// Publish the full set of discovered devices in one batch.
    async fn on_devices_changed(&self, devices: Vec<DeviceManifest>) -> Result<()>;

    /// Notify the hub that a device interface changed state. A `None`
    /// native id refers to the provider itself.
    async fn on_device_event(
        &self,
        interface: DeviceInterface,
        native_id: Option<&str>,
    ) -> Result<()>;
}

/// Still-picture capability.
#[async_trait]
pub trait Camera: Send + Sync {
    async fn get_picture_options(&self) -> Result<Vec<PictureOption>>;
    async fn take_picture(&self, options: Option<PictureRequest>) -> Result<MediaObject>;
}

/// Live-video capability.
#[async_trait]
pub trait VideoCamera: Send + Sync {
    async fn get_video_stream_options(&self) -> Result<Vec<MediaStreamOptions>>;
    async fn get_video_stream(&self, options: Option<StreamRequest>) -> Result<MediaObject>;
}

/// User-facing settings capability.
#[async_trait]
pub trait Settings: Send + Sync {
    async fn get_settings(&self) -> Result<Vec<Setting>>;
    async fn put_setting(&self, key: &str, value: &str) -> Result<()>;
}

/// A device exposing both camera capabilities.
pub trait CameraDevice: Camera + VideoCamera + Send + Sync {}

impl<T: Camera + VideoCamera + Send + Sync> CameraDevice for T {}

impl std::fmt::Debug for dyn CameraDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("CameraDevice")
    }
}

/// Lazy device acquisition capability.
#[async_trait]
pub trait DeviceProvider: Send + Sync {
    async fn get_device(&self, native_id: &str) -> Result<Arc<dyn CameraDevice>>;
}
