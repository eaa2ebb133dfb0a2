//! Logging of render events
use idcard::compose::{RenderEvent, Reporter};
use log::warn;

/// Forwards render events to the log
pub struct LogReporter;

impl Reporter for LogReporter {
    fn report(&mut self, event: RenderEvent<'_>) {
        match event {
            RenderEvent::AssetUnavailable {
                slot,
                path: Some(path),
                cause,
            } => warn!(
                "Cannot use {} image `{}` ({}), drawing a placeholder",
                slot,
                path.display(),
                cause
            ),
            RenderEvent::AssetUnavailable {
                slot, path: None, ..
            } => warn!("No {} image configured, drawing a placeholder", slot),
            RenderEvent::StyleUnrecognized { role, style } => {
                warn!("Unknown {} font style {:?}, using Regular", role, style)
            }
        }
    }
}
