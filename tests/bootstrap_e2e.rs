//! End-to-end bootstrap scenarios against a mocked cloud service and hub:
//! fresh install through two-factor login to a working camera device, and
//! a non-interactive restart resuming from the persisted token.

use async_trait::async_trait;
use blinkbridge::cloud::{
    CameraHandle, CameraInfo, CloudSession, LiveStream, SessionAuth, SessionFactory,
};
use blinkbridge::hub::{
    Camera, DeviceHub, DeviceInterface, DeviceManifest, DeviceProvider, Settings, VideoCamera,
};
use blinkbridge::provider::AuthPhase;
use blinkbridge::settings_store::{MemorySettingsStore, SettingsStore};
use blinkbridge::{BlinkProvider, Error, Result};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

struct FakeStream;

#[async_trait]
impl LiveStream for FakeStream {
    async fn start(&self) -> Result<()> {
        Ok(())
    }

    async fn feed(&self) -> Result<()> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(())
    }

    fn url(&self) -> String {
        "tcp://127.0.0.1:41595".to_string()
    }
}

struct FakeCamera {
    info: CameraInfo,
    snap_calls: AtomicUsize,
}

impl FakeCamera {
    fn new(id: &str, name: &str) -> Arc<Self> {
        Arc::new(Self {
            info: CameraInfo {
                name: name.to_string(),
                camera_id: id.to_string(),
                product_type: "outdoor".to_string(),
                firmware_version: "10.52".to_string(),
                serial: format!("SER-{id}"),
            },
            snap_calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl CameraHandle for FakeCamera {
    fn info(&self) -> CameraInfo {
        self.info.clone()
    }

    async fn snap_picture(&self) -> Result<()> {
        self.snap_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn get_media(&self) -> Result<Vec<u8>> {
        Ok(vec![0xff, 0xd8, 0xff, 0xe0])
    }

    async fn init_livestream(&self) -> Result<Arc<dyn LiveStream>> {
        Ok(Arc::new(FakeStream))
    }

    async fn get_liveview(&self) -> Result<String> {
        Ok(format!("rtsps://cloud.example/live/{}", self.info.camera_id))
    }
}

struct FakeSession {
    cameras: Vec<Arc<FakeCamera>>,
    verified: AtomicUsize,
}

#[async_trait]
impl CloudSession for FakeSession {
    async fn start(&self) -> Result<bool> {
        Ok(true)
    }

    fn login_attributes(&self) -> serde_json::Value {
        json!({"token": "tok-1", "region": "e001"})
    }

    async fn send_auth_key(&self, code: &str) -> Result<()> {
        if code == "123456" {
            self.verified.fetch_add(1, Ordering::SeqCst);
            Ok(())
        } else {
            Err(Error::Authentication(
                "verification code rejected".to_string(),
            ))
        }
    }

    async fn setup_post_verify(&self) -> Result<()> {
        Ok(())
    }

    async fn cameras(&self) -> Result<Vec<Arc<dyn CameraHandle>>> {
        Ok(self
            .cameras
            .iter()
            .map(|c| c.clone() as Arc<dyn CameraHandle>)
            .collect())
    }
}

struct FakeFactory {
    session: Arc<FakeSession>,
    interactive_creates: AtomicUsize,
    resumed_creates: AtomicUsize,
}

#[async_trait]
impl SessionFactory for FakeFactory {
    async fn create(&self, auth: SessionAuth) -> Result<Arc<dyn CloudSession>> {
        match auth {
            SessionAuth::Credentials { .. } => {
                self.interactive_creates.fetch_add(1, Ordering::SeqCst);
            }
            SessionAuth::Token(_) => {
                self.resumed_creates.fetch_add(1, Ordering::SeqCst);
            }
        }
        Ok(self.session.clone())
    }
}

#[derive(Default)]
struct RecordingHub {
    manifests: Mutex<Vec<Vec<DeviceManifest>>>,
}

#[async_trait]
impl DeviceHub for RecordingHub {
    async fn on_devices_changed(&self, devices: Vec<DeviceManifest>) -> Result<()> {
        self.manifests.lock().unwrap().push(devices);
        Ok(())
    }

    async fn on_device_event(&self, _: DeviceInterface, _: Option<&str>) -> Result<()> {
        Ok(())
    }
}

struct World {
    provider: Arc<BlinkProvider>,
    store: Arc<MemorySettingsStore>,
    hub: Arc<RecordingHub>,
    factory: Arc<FakeFactory>,
    front_door: Arc<FakeCamera>,
}

fn world() -> World {
    let front_door = FakeCamera::new("cam-1", "Front Door");
    let session = Arc::new(FakeSession {
        cameras: vec![front_door.clone(), FakeCamera::new("cam-2", "Garage")],
        verified: AtomicUsize::new(0),
    });
    let factory = Arc::new(FakeFactory {
        session,
        interactive_creates: AtomicUsize::new(0),
        resumed_creates: AtomicUsize::new(0),
    });
    let store = Arc::new(MemorySettingsStore::new());
    let hub = Arc::new(RecordingHub::default());
    let provider = Arc::new(BlinkProvider::new(
        store.clone(),
        hub.clone(),
        factory.clone(),
    ));

    World {
        provider,
        store,
        hub,
        factory,
        front_door,
    }
}

#[tokio::test]
async fn fresh_install_through_two_factor_to_working_camera() {
    let w = world();

    // submitting the username alone cannot start the login
    let err = w.provider.put_setting("username", "a").await.unwrap_err();
    assert!(matches!(err, Error::Configuration(_)));

    // the password completes the pair; the fresh login now waits for a code
    w.provider.put_setting("password", "b").await.unwrap();
    assert_eq!(w.provider.auth_phase().await, AuthPhase::AwaitingTwoFactor);
    assert_eq!(w.factory.interactive_creates.load(Ordering::SeqCst), 1);
    assert!(w.hub.manifests.lock().unwrap().is_empty());

    // accepted code publishes the discovered cameras in one batch
    w.provider.put_setting("2fa", "123456").await.unwrap();
    assert_eq!(w.provider.auth_phase().await, AuthPhase::Authenticated);
    {
        let manifests = w.hub.manifests.lock().unwrap();
        assert_eq!(manifests.len(), 1);
        let ids: Vec<_> = manifests[0].iter().map(|m| m.native_id.as_str()).collect();
        assert_eq!(ids, vec!["cam-1", "cam-2"]);
    }

    // the device works and a single vendor capture backs the picture
    let device = w.provider.get_device("cam-1").await.unwrap();
    let media = device.take_picture(None).await.unwrap();
    assert_eq!(media.picture_data(), Some(&[0xff, 0xd8, 0xff, 0xe0][..]));
    assert_eq!(w.front_door.snap_calls.load(Ordering::SeqCst), 1);

    // a second picture inside the freshness window reuses the capture
    device.take_picture(None).await.unwrap();
    assert_eq!(w.front_door.snap_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn restart_resumes_from_persisted_token() {
    let w = world();
    w.store.set_item("username", "a").await.unwrap();
    w.store.set_item("password", "b").await.unwrap();
    w.store
        .set_item("auth_data", "{\"token\":\"tok-0\"}")
        .await
        .unwrap();

    w.provider.start_init().await.unwrap();

    assert_eq!(w.provider.auth_phase().await, AuthPhase::Authenticated);
    assert_eq!(w.factory.resumed_creates.load(Ordering::SeqCst), 1);
    assert_eq!(w.factory.interactive_creates.load(Ordering::SeqCst), 0);
    assert_eq!(w.hub.manifests.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn background_bootstrap_reaches_authenticated() {
    let w = world();
    w.store.set_item("username", "a").await.unwrap();
    w.store.set_item("password", "b").await.unwrap();
    w.store
        .set_item("auth_data", "{\"token\":\"tok-0\"}")
        .await
        .unwrap();

    w.provider.spawn_bootstrap();

    tokio::time::timeout(Duration::from_secs(2), async {
        while w.provider.auth_phase().await != AuthPhase::Authenticated {
            tokio::task::yield_now().await;
        }
    })
    .await
    .expect("bootstrap did not complete");
}

#[tokio::test]
async fn streaming_prefers_the_push_feed() {
    let w = world();
    w.store.set_item("username", "a").await.unwrap();
    w.store.set_item("password", "b").await.unwrap();
    w.store
        .set_item("auth_data", "{\"token\":\"tok-0\"}")
        .await
        .unwrap();
    w.provider.start_init().await.unwrap();

    let device = w.provider.get_device("cam-2").await.unwrap();
    let media = device.get_video_stream(None).await.unwrap();
    let input = media.ffmpeg_input().unwrap();

    assert_eq!(input.url, "tcp://127.0.0.1:41595");
    assert_eq!(
        input.media_stream_options.container.as_deref(),
        Some("mpegts")
    );
    assert_eq!(input.input_arguments[0], "-i");
}
