//! Blink Camera Device
//!
//! ## Responsibilities
//!
//! - Expose one physical camera's still-picture and live-stream operations
//! - Cache the last capture and serve it while fresh
//! - Prefer the push-based live stream, fall back to the live-view URL
//!
//! Each device is independent; the provider hands out one instance per
//! camera identifier.

use crate::cloud::CameraHandle;
use crate::error::Result;
use crate::hub::{Camera, PictureOption, PictureRequest, StreamRequest, VideoCamera};
use crate::media::{
    FfmpegInput, MediaObject, MediaStreamOptions, StreamSession, VideoStreamOptions,
};
use crate::picture_cache::PictureCache;
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;

/// Per-camera tunables
#[derive(Debug, Clone)]
pub struct CameraConfig {
    /// Seconds a cached capture stays reusable
    pub picture_max_age_secs: i64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            picture_max_age_secs: 60,
        }
    }
}

/// One Blink camera exposed to the hub.
pub struct BlinkCamera {
    native_id: String,
    handle: Arc<dyn CameraHandle>,
    cache: PictureCache,
}

impl BlinkCamera {
    pub fn new(native_id: &str, handle: Arc<dyn CameraHandle>) -> Self {
        Self::with_config(native_id, handle, CameraConfig::default())
    }

    pub fn with_config(
        native_id: &str,
        handle: Arc<dyn CameraHandle>,
        config: CameraConfig,
    ) -> Self {
        Self {
            native_id: native_id.to_string(),
            handle,
            cache: PictureCache::new(config.picture_max_age_secs),
        }
    }

    pub fn native_id(&self) -> &str {
        &self.native_id
    }

    /// The single stream variant this camera offers.
    fn stream_options(&self) -> MediaStreamOptions {
        MediaStreamOptions {
            id: "default".to_string(),
            name: "Cloud Video Stream".to_string(),
            audio: None,
            video: Some(VideoStreamOptions {
                codec: "h264".to_string(),
            }),
            source: "cloud".to_string(),
            tool: "ffmpeg".to_string(),
            user_configurable: false,
            container: None,
        }
    }

    /// Negotiate and start the push-based live stream, returning its URL
    /// and the supervised feed session.
    async fn start_livestream(&self) -> Result<(String, StreamSession)> {
        let stream = self.handle.init_livestream().await?;
        stream.start().await?;

        let url = stream.url();
        let session = StreamSession::supervise(&self.native_id, stream);
        Ok((url, session))
    }
}

#[async_trait]
impl Camera for BlinkCamera {
    async fn get_picture_options(&self) -> Result<Vec<PictureOption>> {
        // No configurable picture variants
        Ok(Vec::new())
    }

    async fn take_picture(&self, _options: Option<PictureRequest>) -> Result<MediaObject> {
        if let Some(data) = self.cache.fresh().await {
            tracing::debug!(
                camera_id = %self.native_id,
                size = data.len(),
                "Serving cached picture"
            );
            return Ok(MediaObject::jpeg(data));
        }

        self.handle.snap_picture().await?;
        let data = self.handle.get_media().await?;
        self.cache.store(data.clone(), Utc::now()).await;

        tracing::debug!(
            camera_id = %self.native_id,
            size = data.len(),
            "Captured fresh picture"
        );

        Ok(MediaObject::jpeg(data))
    }
}

#[async_trait]
impl VideoCamera for BlinkCamera {
    async fn get_video_stream_options(&self) -> Result<Vec<MediaStreamOptions>> {
        Ok(vec![self.stream_options()])
    }

    async fn get_video_stream(&self, _options: Option<StreamRequest>) -> Result<MediaObject> {
        let mut options = self.stream_options();

        let (url, session) = match self.start_livestream().await {
            Ok((url, session)) => {
                options.container = Some("mpegts".to_string());
                (url, Some(session))
            }
            Err(e) => {
                // Expected alternate path, not an error: any live-stream
                // failure downgrades to the pull-based live view.
                tracing::warn!(
                    camera_id = %self.native_id,
                    error = %e,
                    "Live stream unavailable, falling back to live view"
                );
                let url = self.handle.get_liveview().await?;
                options.container = Some("rtsp".to_string());
                (url, None)
            }
        };

        let input = FfmpegInput {
            url: url.clone(),
            input_arguments: vec!["-i".to_string(), url],
            media_stream_options: options,
        };

        Ok(MediaObject::stream(input, session))
    }
}
