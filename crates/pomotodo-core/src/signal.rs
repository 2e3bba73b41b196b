//! Completion signal: the notification and audio cue fired when a
//! countdown reaches zero.
//!
//! Both capabilities sit behind traits so the timers run without any real
//! desktop environment. Every failure is swallowed here; a broken speaker
//! or a denied permission never reaches the timer state machines.

use std::path::{Path, PathBuf};

use crate::error::SignalError;
use crate::events::Completion;

/// Default audio cue played on completion.
pub const DEFAULT_CLIP: &str = "bomb_timer.mp3";

/// Outcome of a notification permission request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Granted,
    Denied,
}

/// Desktop (or terminal) notification capability.
pub trait Notifier: Send + Sync {
    /// Ask for permission to show notifications. Called once per signal.
    fn request_permission(&self) -> Permission;

    fn notify(&self, title: &str, body: &str) -> Result<(), SignalError>;
}

/// Fire-and-forget audio playback capability.
pub trait AudioCue: Send + Sync {
    fn play(&self, clip: &Path) -> Result<(), SignalError>;
}

impl<N: Notifier + ?Sized> Notifier for Box<N> {
    fn request_permission(&self) -> Permission {
        (**self).request_permission()
    }

    fn notify(&self, title: &str, body: &str) -> Result<(), SignalError> {
        (**self).notify(title, body)
    }
}

impl<A: AudioCue + ?Sized> AudioCue for Box<A> {
    fn play(&self, clip: &Path) -> Result<(), SignalError> {
        (**self).play(clip)
    }
}

/// Notifier that never shows anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn request_permission(&self) -> Permission {
        Permission::Denied
    }

    fn notify(&self, _title: &str, _body: &str) -> Result<(), SignalError> {
        Ok(())
    }
}

/// Audio cue that plays nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentCue;

impl AudioCue for SilentCue {
    fn play(&self, _clip: &Path) -> Result<(), SignalError> {
        Ok(())
    }
}

/// Paired notification + audio side effect.
///
/// The notification permission is requested once, when the signal is
/// built, and cached for its whole lifetime.
pub struct CompletionSignal {
    notifier: Box<dyn Notifier>,
    audio: Box<dyn AudioCue>,
    permission: Permission,
    clip: PathBuf,
}

impl CompletionSignal {
    pub fn new(notifier: impl Notifier + 'static, audio: impl AudioCue + 'static) -> Self {
        let permission = notifier.request_permission();
        tracing::debug!(?permission, "notification permission resolved");
        Self {
            notifier: Box::new(notifier),
            audio: Box::new(audio),
            permission,
            clip: PathBuf::from(DEFAULT_CLIP),
        }
    }

    /// A signal with no observable effect.
    pub fn silent() -> Self {
        Self::new(NoopNotifier, SilentCue)
    }

    pub fn with_clip(mut self, clip: impl Into<PathBuf>) -> Self {
        self.clip = clip.into();
        self
    }

    pub fn permission(&self) -> Permission {
        self.permission
    }

    pub fn clip(&self) -> &Path {
        &self.clip
    }

    /// Notify (when permitted) and play the cue. Never fails.
    pub fn fire(&self, completion: &Completion) {
        if self.permission == Permission::Granted {
            if let Err(e) = self.notifier.notify(&completion.title, &completion.body) {
                tracing::debug!(error = %e, "notification dropped");
            }
        }
        if let Err(e) = self.audio.play(&self.clip) {
            tracing::debug!(error = %e, "audio cue dropped");
        }
    }
}

impl std::fmt::Debug for CompletionSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionSignal")
            .field("permission", &self.permission)
            .field("clip", &self.clip)
            .finish_non_exhaustive()
    }
}
