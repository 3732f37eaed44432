//! Rebuild observer trait for progress reporting.

use log::info;

/// Callbacks invoked by [`rebuild`][crate::rebuild] while it applies a
/// congestion snapshot.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.  An observer never influences the rebuild.
///
/// # Example: chat progress message
///
/// ```rust,ignore
/// struct EditMessage<'a> { chat: &'a Chat, message: MessageId }
///
/// impl RebuildObserver for EditMessage<'_> {
///     fn on_progress(&mut self, percent: u8) {
///         self.chat.edit(self.message, &format!("{percent}%"));
///     }
/// }
/// ```
pub trait RebuildObserver {
    /// Coarse progress, at most 7 calls per rebuild, the last one with 100.
    fn on_progress(&mut self, _percent: u8) {}

    /// Called once the generation is fully built, before it is published.
    fn on_complete(&mut self, _generation: u64) {}
}

/// A [`RebuildObserver`] that does nothing.
pub struct NoopObserver;

impl RebuildObserver for NoopObserver {}

/// Logs progress at `info` level.
pub struct LogObserver;

impl RebuildObserver for LogObserver {
    fn on_progress(&mut self, percent: u8) {
        info!("{percent}%");
    }

    fn on_complete(&mut self, generation: u64) {
        info!("100%, graph updated (generation {generation})");
    }
}
