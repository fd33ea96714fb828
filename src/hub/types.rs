//! Hub Types
//!
//! Device manifests and setting descriptors exchanged with the
//! device-management hub. Field names follow the hub's camelCase JSON.

use serde::{Deserialize, Serialize};

/// Device manifest published to the hub for one discovered camera
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceManifest {
    pub name: String,
    /// Stable identifier the hub uses to request this device
    pub native_id: String,
    pub info: DeviceInfo,
    #[serde(rename = "type")]
    pub device_type: DeviceType,
    pub interfaces: Vec<DeviceInterface>,
}

/// Hardware metadata block of a manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceInfo {
    pub manufacturer: String,
    pub model: String,
    pub firmware: String,
    pub serial_number: String,
}

/// Device category as understood by the hub
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceType {
    Camera,
}

/// Capability interfaces a device advertises
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceInterface {
    Camera,
    VideoCamera,
    MotionSensor,
    Settings,
    DeviceProvider,
}

/// One user-facing setting descriptor
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Setting {
    pub key: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(rename = "type")]
    pub setting_type: SettingType,
}

/// Rendering hint for a setting value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingType {
    /// Plain text input
    Text,
    /// Masked secret input
    Password,
}

/// Picture variant offered by a camera (none are offered here, but the
/// hub contract requires the list shape)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PictureOption {
    pub id: String,
    pub name: String,
}

/// Hub request for a still picture
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PictureRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// Hub request for a video stream
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}
