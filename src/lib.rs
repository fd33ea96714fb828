//! Blink Bridge Library
//!
//! Exposes cloud-connected Blink security cameras as generic camera and
//! video-source devices inside a smart-home device-management hub.
//!
//! ## Architecture (6 Components)
//!
//! 1. BlinkProvider - auth bootstrap, camera discovery, device registry
//! 2. BlinkCamera - still-picture and live-stream operations per camera
//! 3. Cloud seam - trait interface over the vendor cloud SDK
//! 4. Hub seam - trait interface over the device-management hub
//! 5. Media - picture/stream media objects and the supervised feed session
//! 6. SettingsStore - persisted credentials and auth-token blob
//!
//! ## Design Principles
//!
//! - The vendor protocol, the hub protocol, and the media relay stay behind
//!   trait seams; this crate only maps one set of calls onto the other
//! - Collaborators are injected; no process-wide state

pub mod camera;
pub mod cloud;
pub mod error;
pub mod hub;
pub mod media;
pub mod picture_cache;
pub mod provider;
pub mod settings_store;

pub use camera::BlinkCamera;
pub use error::{Error, Result};
pub use provider::BlinkProvider;
