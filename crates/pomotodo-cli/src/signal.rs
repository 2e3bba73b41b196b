//! Terminal-side capabilities behind the core completion signal.

use std::io::Write;
use std::path::Path;

use pomotodo_core::signal::{AudioCue, Notifier, Permission, SilentCue};
use pomotodo_core::{CompletionSignal, Config, SignalError};

/// Prints the notification on stderr.
#[derive(Debug, Clone, Copy)]
pub struct TerminalNotifier {
    enabled: bool,
}

impl Notifier for TerminalNotifier {
    fn request_permission(&self) -> Permission {
        if self.enabled {
            Permission::Granted
        } else {
            Permission::Denied
        }
    }

    fn notify(&self, title: &str, body: &str) -> Result<(), SignalError> {
        let mut err = std::io::stderr().lock();
        writeln!(err, "\n[{title}] {body}").map_err(|e| SignalError::Notification(e.to_string()))
    }
}

/// Rings the terminal bell in place of an audio clip.
#[derive(Debug, Clone, Copy, Default)]
pub struct BellCue;

impl AudioCue for BellCue {
    fn play(&self, _clip: &Path) -> Result<(), SignalError> {
        let mut out = std::io::stdout().lock();
        out.write_all(b"\x07")
            .and_then(|()| out.flush())
            .map_err(|e| SignalError::Playback(e.to_string()))
    }
}

/// Shows the notification through the desktop notification service on a
/// detached thread, falling back to [`TerminalNotifier`] when that fails.
#[cfg(feature = "desktop-notify")]
pub struct DesktopNotifier {
    fallback: TerminalNotifier,
}

#[cfg(feature = "desktop-notify")]
impl Notifier for DesktopNotifier {
    fn request_permission(&self) -> Permission {
        self.fallback.request_permission()
    }

    fn notify(&self, title: &str, body: &str) -> Result<(), SignalError> {
        let mut notification = notify_rust::Notification::new();
        notification.summary(title).body(body).appname("pomotodo");
        let fallback = self.fallback;
        let (title, body) = (title.to_string(), body.to_string());
        std::thread::spawn(move || {
            if let Err(e) = notification.show() {
                tracing::debug!(error = %e, "desktop notification failed");
                if let Err(e) = fallback.notify(&title, &body) {
                    tracing::debug!(error = %e, "terminal notification failed");
                }
            }
        });
        Ok(())
    }
}

/// Decodes and plays the clip on a detached thread, ringing the bell
/// instead when the clip or the audio device is unusable.
#[cfg(feature = "sound")]
pub struct RodioCue {
    fallback: BellCue,
}

#[cfg(feature = "sound")]
impl AudioCue for RodioCue {
    fn play(&self, clip: &Path) -> Result<(), SignalError> {
        let file = std::fs::File::open(clip).map_err(|e| {
            let _ = self.fallback.play(clip);
            SignalError::Playback(format!("{}: {e}", clip.display()))
        })?;
        let fallback = self.fallback;
        let clip = clip.to_path_buf();
        std::thread::spawn(move || {
            let ring = |what: &str, e: &dyn std::fmt::Display| {
                tracing::debug!(error = %e, "{what}");
                let _ = fallback.play(&clip);
            };
            let (_stream, handle) = match rodio::OutputStream::try_default() {
                Ok(output) => output,
                Err(e) => return ring("no audio output", &e),
            };
            let sink = match rodio::Sink::try_new(&handle) {
                Ok(sink) => sink,
                Err(e) => return ring("failed to open sink", &e),
            };
            match rodio::Decoder::new(std::io::BufReader::new(file)) {
                Ok(source) => {
                    sink.append(source);
                    sink.sleep_until_end();
                }
                Err(e) => ring("failed to decode clip", &e),
            }
        });
        Ok(())
    }
}

fn notifier(enabled: bool) -> Box<dyn Notifier> {
    #[cfg(feature = "desktop-notify")]
    {
        Box::new(DesktopNotifier {
            fallback: TerminalNotifier { enabled },
        })
    }
    #[cfg(not(feature = "desktop-notify"))]
    {
        Box::new(TerminalNotifier { enabled })
    }
}

fn cue(sound: bool) -> Box<dyn AudioCue> {
    if !sound {
        return Box::new(SilentCue);
    }
    #[cfg(feature = "sound")]
    {
        Box::new(RodioCue { fallback: BellCue })
    }
    #[cfg(not(feature = "sound"))]
    {
        Box::new(BellCue)
    }
}

/// Build the completion signal described by the `[notifications]` table.
pub fn from_config(config: &Config) -> CompletionSignal {
    let notifications = &config.notifications;
    CompletionSignal::new(
        notifier(notifications.enabled),
        cue(notifications.sound),
    )
    .with_clip(&notifications.clip)
}
