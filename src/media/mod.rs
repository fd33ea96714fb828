//! Media Objects
//!
//! ## Responsibilities
//!
//! - Wrap raw picture bytes or a streaming-transport descriptor for the hub
//! - Describe stream variants (codec, source, container) to the hub
//! - Supervise the background feed task of a push-based live stream
//!
//! The descriptor is handed to an external media-relay process; no transport
//! is performed here.

use crate::cloud::LiveStream;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Stream descriptor advertised to the hub
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaStreamOptions {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio: Option<AudioStreamOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video: Option<VideoStreamOptions>,
    /// Where the stream originates ("cloud", "local", ...)
    pub source: String,
    /// Relay tool expected to consume the descriptor
    pub tool: String,
    pub user_configurable: bool,
    /// Container format, filled in once the transport is known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container: Option<String>,
}

/// Audio track descriptor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioStreamOptions {
    pub codec: String,
}

/// Video track descriptor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoStreamOptions {
    pub codec: String,
}

/// Input descriptor for the external media-relay process
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FfmpegInput {
    pub url: String,
    pub input_arguments: Vec<String>,
    pub media_stream_options: MediaStreamOptions,
}

/// Opaque wrapper the hub consumes: either raw image bytes or a
/// streaming-transport descriptor.
#[derive(Debug)]
pub enum MediaObject {
    Picture {
        data: Vec<u8>,
        mime_type: &'static str,
    },
    Stream {
        input: FfmpegInput,
        /// Present while a push-based feed task is running for this stream.
        /// Dropping the media object tears the feed down.
        session: Option<StreamSession>,
    },
}

impl MediaObject {
    /// Wrap JPEG picture bytes.
    pub fn jpeg(data: Vec<u8>) -> Self {
        MediaObject::Picture {
            data,
            mime_type: "image/jpeg",
        }
    }

    /// Wrap a relay transport descriptor, optionally owning a feed session.
    pub fn stream(input: FfmpegInput, session: Option<StreamSession>) -> Self {
        MediaObject::Stream { input, session }
    }

    /// Picture bytes, if this object wraps a picture.
    pub fn picture_data(&self) -> Option<&[u8]> {
        match self {
            MediaObject::Picture { data, .. } => Some(data),
            MediaObject::Stream { .. } => None,
        }
    }

    /// Transport descriptor, if this object wraps a stream.
    pub fn ffmpeg_input(&self) -> Option<&FfmpegInput> {
        match self {
            MediaObject::Picture { .. } => None,
            MediaObject::Stream { input, .. } => Some(input),
        }
    }
}

/// Supervised feed task for one push-based live stream.
///
/// The task is owned by the stream's media object and aborted when it is
/// dropped, so a feed can never outlive the stream it belongs to. Feed
/// termination and errors are logged rather than silently discarded.
#[derive(Debug)]
pub struct StreamSession {
    task: JoinHandle<()>,
}

impl StreamSession {
    /// Spawn the stream's feed on a background task under supervision.
    pub fn supervise(camera_id: &str, stream: Arc<dyn LiveStream>) -> Self {
        let label = camera_id.to_string();
        let task = tokio::spawn(async move {
            match stream.feed().await {
                Ok(()) => {
                    tracing::debug!(camera_id = %label, "live stream feed ended");
                }
                Err(e) => {
                    tracing::warn!(camera_id = %label, error = %e, "live stream feed failed");
                }
            }
        });

        Self { task }
    }

    /// Whether the feed task has run to completion or been torn down.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Tear the feed down explicitly.
    pub fn abort(&self) {
        self.task.abort();
    }
}

impl Drop for StreamSession {
    fn drop(&mut self) {
        self.task.abort();
    }
}
