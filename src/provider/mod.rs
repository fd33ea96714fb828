//! Blink Provider
//!
//! ## Responsibilities
//!
//! - Own the cloud session, credentials, and persisted auth token
//! - Drive the authentication bootstrap, including the two-factor flow
//! - Discover cameras and publish their manifests to the hub
//! - Hand out camera devices lazily, one instance per camera identifier
//!
//! ## Authentication lifecycle
//!
//! Unauthenticated -> AwaitingTwoFactor (fresh login) or Authenticated
//! (resumed from a persisted token). A rejected code or session error goes
//! through Failed, which clears session and token, back to Unauthenticated.

use crate::camera::BlinkCamera;
use crate::cloud::{CameraHandle, CloudSession, SessionAuth, SessionFactory};
use crate::error::{Error, Result};
use crate::hub::{
    CameraDevice, DeviceHub, DeviceInfo, DeviceInterface, DeviceManifest, DeviceProvider,
    DeviceType, Setting, SettingType, Settings,
};
use crate::settings_store::SettingsStore;
use async_trait::async_trait;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// Setting key for the account username
pub const SETTING_USERNAME: &str = "username";
/// Setting key for the account password
pub const SETTING_PASSWORD: &str = "password";
/// Setting key for the one-time verification code
pub const SETTING_TWO_FACTOR: &str = "2fa";

/// Storage key for the persisted login-attribute blob
const STORE_AUTH_DATA: &str = "auth_data";

/// Provider-level tunables
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Manufacturer label stamped into device manifests
    pub manufacturer: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            manufacturer: "Blink".to_string(),
        }
    }
}

/// Authentication lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthPhase {
    /// No usable session; credentials may or may not be stored
    Unauthenticated,
    /// Fresh login started; a one-time verification code must be submitted
    AwaitingTwoFactor,
    /// Session usable; devices published
    Authenticated,
    /// Login or verification failed; state is being reset
    Failed,
}

/// Registry entry for one discovered camera
enum DeviceSlot {
    /// Discovered but not yet requested by the hub
    Unresolved(Arc<dyn CameraHandle>),
    /// Live device instance, reused for the rest of the process
    Resolved(Arc<BlinkCamera>),
}

/// Provider owning the cloud session and the camera registry.
pub struct BlinkProvider {
    store: Arc<dyn SettingsStore>,
    hub: Arc<dyn DeviceHub>,
    sessions: Arc<dyn SessionFactory>,
    config: ProviderConfig,
    session: RwLock<Option<Arc<dyn CloudSession>>>,
    devices: Mutex<HashMap<String, DeviceSlot>>,
    phase: RwLock<AuthPhase>,
}

impl BlinkProvider {
    pub fn new(
        store: Arc<dyn SettingsStore>,
        hub: Arc<dyn DeviceHub>,
        sessions: Arc<dyn SessionFactory>,
    ) -> Self {
        Self::with_config(store, hub, sessions, ProviderConfig::default())
    }

    pub fn with_config(
        store: Arc<dyn SettingsStore>,
        hub: Arc<dyn DeviceHub>,
        sessions: Arc<dyn SessionFactory>,
        config: ProviderConfig,
    ) -> Self {
        Self {
            store,
            hub,
            sessions,
            config,
            session: RwLock::new(None),
            devices: Mutex::new(HashMap::new()),
            phase: RwLock::new(AuthPhase::Unauthenticated),
        }
    }

    /// Current authentication phase.
    pub async fn auth_phase(&self) -> AuthPhase {
        *self.phase.read().await
    }

    /// Kick off the authentication bootstrap in the background, e.g. at
    /// plugin load when credentials may already be stored. The outcome is
    /// logged; a failure leaves the provider waiting for new settings.
    pub fn spawn_bootstrap(self: &Arc<Self>) {
        let provider = self.clone();
        tokio::spawn(async move {
            if let Err(e) = provider.start_init().await {
                tracing::warn!(error = %e, "Startup bootstrap did not complete");
            }
        });
    }

    /// Start the authentication bootstrap.
    ///
    /// Requires username and password; nothing is sent to the cloud without
    /// them. Resumes non-interactively from a persisted token when one
    /// exists, otherwise starts a fresh login that will demand a one-time
    /// verification code.
    pub async fn start_init(&self) -> Result<()> {
        let username = self.get_credential(SETTING_USERNAME).await?;
        let password = self.get_credential(SETTING_PASSWORD).await?;
        let (Some(username), Some(password)) = (username, password) else {
            return Err(Error::Configuration(
                "username and password must be set before initializing".to_string(),
            ));
        };

        match self.run_bootstrap(username, password).await {
            Ok(()) => Ok(()),
            Err(e) => {
                tracing::error!(error = %e, "Cloud bootstrap failed");
                self.fail_auth().await;
                Err(e)
            }
        }
    }

    /// Complete a pending authentication and publish discovered devices.
    ///
    /// A non-empty `code` is submitted to the cloud service first; rejection
    /// clears all auth state.
    pub async fn finish_init(&self, code: &str) -> Result<()> {
        let session = self.session.read().await.clone().ok_or_else(|| {
            Error::Authentication(
                "no active cloud session; submit credentials first".to_string(),
            )
        })?;

        if !code.is_empty() {
            if let Err(e) = self.verify_code(session.as_ref(), code).await {
                tracing::error!(error = %e, "Two-factor verification failed");
                self.fail_auth().await;
                return Err(e);
            }
        }

        self.set_phase(AuthPhase::Authenticated).await;
        self.publish_devices(&session).await
    }

    async fn run_bootstrap(&self, username: String, password: String) -> Result<()> {
        let stored = self.auth_data().await;
        let interactive = stored.is_none();

        let auth = match stored {
            Some(blob) => SessionAuth::Token(blob),
            None => SessionAuth::Credentials { username, password },
        };

        let session = self
            .sessions
            .create(auth)
            .await
            .map_err(|e| Error::Authentication(format!("cloud session setup failed: {e}")))?;

        let started = session
            .start()
            .await
            .map_err(|e| Error::Authentication(format!("cloud session start failed: {e}")))?;
        if !started {
            return Err(Error::Authentication(
                "cloud session refused to start; check username and password".to_string(),
            ));
        }

        self.persist_auth_data(&session.login_attributes()).await?;
        *self.session.write().await = Some(session);

        if interactive {
            self.set_phase(AuthPhase::AwaitingTwoFactor).await;
            tracing::info!("Fresh login started, awaiting one-time verification code");
            Ok(())
        } else {
            self.finish_init("").await
        }
    }

    async fn verify_code(&self, session: &dyn CloudSession, code: &str) -> Result<()> {
        session
            .send_auth_key(code)
            .await
            .map_err(|e| Error::Authentication(format!("verification code rejected: {e}")))?;
        session
            .setup_post_verify()
            .await
            .map_err(|e| Error::Authentication(format!("post-verification setup failed: {e}")))?;
        Ok(())
    }

    /// Build one manifest per discovered camera, register a lazy slot for
    /// each, and publish the whole batch to the hub.
    async fn publish_devices(&self, session: &Arc<dyn CloudSession>) -> Result<()> {
        let handles = session.cameras().await?;

        let mut manifests = Vec::with_capacity(handles.len());
        {
            let mut devices = self.devices.lock().await;
            for handle in handles {
                let info = handle.info();
                manifests.push(DeviceManifest {
                    name: info.name,
                    native_id: info.camera_id.clone(),
                    info: DeviceInfo {
                        manufacturer: self.config.manufacturer.clone(),
                        model: info.product_type,
                        firmware: info.firmware_version,
                        serial_number: info.serial,
                    },
                    device_type: DeviceType::Camera,
                    interfaces: vec![
                        DeviceInterface::Camera,
                        DeviceInterface::VideoCamera,
                        DeviceInterface::MotionSensor,
                    ],
                });
                // re-publication must not downgrade an already-live device
                devices
                    .entry(info.camera_id)
                    .or_insert(DeviceSlot::Unresolved(handle));
            }
        }

        tracing::info!(camera_count = manifests.len(), "Publishing discovered cameras");
        self.hub.on_devices_changed(manifests).await
    }

    async fn get_credential(&self, key: &str) -> Result<Option<String>> {
        Ok(self.store.get_item(key).await?.filter(|v| !v.is_empty()))
    }

    /// Persisted login-attribute blob, if present and readable.
    async fn auth_data(&self) -> Option<serde_json::Value> {
        let raw = match self.store.get_item(STORE_AUTH_DATA).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read persisted auth data");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                // an unreadable blob is the same as no blob
                tracing::warn!(error = %e, "Persisted auth data unreadable, ignoring");
                None
            }
        }
    }

    async fn persist_auth_data(&self, blob: &serde_json::Value) -> Result<()> {
        self.store
            .set_item(STORE_AUTH_DATA, &serde_json::to_string(blob)?)
            .await
    }

    /// Reset after a login or verification failure: drop the session, clear
    /// the persisted token, and wait for the user to resubmit credentials.
    async fn fail_auth(&self) {
        self.set_phase(AuthPhase::Failed).await;

        *self.session.write().await = None;
        if let Err(e) = self.store.remove_item(STORE_AUTH_DATA).await {
            tracing::warn!(error = %e, "Failed to clear persisted auth data");
        }

        self.set_phase(AuthPhase::Unauthenticated).await;
    }

    async fn set_phase(&self, next: AuthPhase) {
        let mut phase = self.phase.write().await;
        if *phase != next {
            tracing::info!(from = ?*phase, to = ?next, "Auth phase transition");
            *phase = next;
        }
    }
}

#[async_trait]
impl Settings for BlinkProvider {
    async fn get_settings(&self) -> Result<Vec<Setting>> {
        Ok(vec![
            Setting {
                key: SETTING_USERNAME.to_string(),
                title: "Blink Username".to_string(),
                value: self.store.get_item(SETTING_USERNAME).await?,
                setting_type: SettingType::Text,
            },
            Setting {
                key: SETTING_PASSWORD.to_string(),
                title: "Blink Password".to_string(),
                value: self.store.get_item(SETTING_PASSWORD).await?,
                setting_type: SettingType::Password,
            },
            Setting {
                key: SETTING_TWO_FACTOR.to_string(),
                title: "2FA Code".to_string(),
                value: Some(String::new()),
                setting_type: SettingType::Text,
            },
        ])
    }

    async fn put_setting(&self, key: &str, value: &str) -> Result<()> {
        let outcome = match key {
            SETTING_USERNAME | SETTING_PASSWORD => self.store.set_item(key, value).await,
            SETTING_TWO_FACTOR => self.finish_init(value).await,
            _ => {
                return Err(Error::InvalidArgument(format!(
                    "unknown setting key: {key}"
                )))
            }
        };

        // a credential change without a usable token restarts the bootstrap
        let bootstrap = match &outcome {
            Ok(()) if self.auth_data().await.is_none() => Some(self.start_init().await),
            _ => None,
        };

        if let Err(e) = self
            .hub
            .on_device_event(DeviceInterface::Settings, None)
            .await
        {
            tracing::warn!(error = %e, "Failed to notify hub of settings change");
        }

        outcome?;
        bootstrap.unwrap_or(Ok(()))
    }
}

#[async_trait]
impl DeviceProvider for BlinkProvider {
    async fn get_device(&self, native_id: &str) -> Result<Arc<dyn CameraDevice>> {
        let mut devices = self.devices.lock().await;
        let slot = devices
            .get_mut(native_id)
            .ok_or_else(|| Error::NotFound(format!("camera with id {native_id} not found")))?;

        match slot {
            DeviceSlot::Resolved(camera) => Ok(camera.clone()),
            DeviceSlot::Unresolved(handle) => {
                let camera = Arc::new(BlinkCamera::new(native_id, handle.clone()));
                tracing::debug!(camera_id = %native_id, "Instantiated camera device");
                *slot = DeviceSlot::Resolved(camera.clone());
                Ok(camera)
            }
        }
    }
}
