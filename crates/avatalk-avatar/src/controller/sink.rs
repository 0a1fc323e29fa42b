use std::sync::Mutex;

use async_trait::async_trait;

use crate::{AvatarError, MediaStream};

/// Where the avatar's media stream is rendered.
#[async_trait]
pub trait PlaybackSink: Send + Sync {
    fn bind(&self, stream: MediaStream);

    /// Start playback of the bound stream. May be refused by the host
    /// (autoplay policy); callers treat that as a warning.
    async fn play(&self) -> Result<(), AvatarError>;

    fn clear(&self);

    fn current(&self) -> Option<MediaStream>;
}

/// Sink that only remembers the bound stream.
#[derive(Default)]
pub struct MemorySink {
    stream: Mutex<Option<MediaStream>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PlaybackSink for MemorySink {
    fn bind(&self, stream: MediaStream) {
        if let Ok(mut slot) = self.stream.lock() {
            *slot = Some(stream);
        }
    }

    async fn play(&self) -> Result<(), AvatarError> {
        match self.current() {
            Some(_) => Ok(()),
            None => Err(AvatarError::Playback("no stream bound".into())),
        }
    }

    fn clear(&self) {
        if let Ok(mut slot) = self.stream.lock() {
            *slot = None;
        }
    }

    fn current(&self) -> Option<MediaStream> {
        self.stream.lock().ok().and_then(|s| s.clone())
    }
}
