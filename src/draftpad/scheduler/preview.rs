use super::Debouncer;
use crate::buffer::SharedBuffer;
use crate::render::{PreviewContent, PreviewSurface, Renderer};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Default)]
struct PreviewState {
    surface: PreviewSurface,
    // Generation of the most recently started render.
    latest: u64,
}

/// Debounced preview rendering with supersede-and-discard semantics.
///
/// Every render is tagged with the generation current when it started. When it
/// completes, its output (or its error) reaches the surface only if no newer
/// render has started in the meantime. Older renders still run to completion,
/// their results are simply dropped.
pub struct PreviewScheduler<R: Renderer> {
    renderer: Arc<R>,
    state: Arc<Mutex<PreviewState>>,
    timer: Debouncer,
}

impl<R: Renderer> PreviewScheduler<R> {
    pub fn new(renderer: Arc<R>, window: Duration) -> Self {
        Self {
            renderer,
            state: Arc::new(Mutex::new(PreviewState::default())),
            timer: Debouncer::new(window),
        }
    }

    /// Schedule a render of `buffer`. The text is read when the timer fires,
    /// not now, so input arriving during the quiet period is included.
    pub fn request_preview(&self, buffer: &SharedBuffer) {
        let renderer = Arc::clone(&self.renderer);
        let state = Arc::clone(&self.state);
        let buffer = buffer.clone();
        self.timer.schedule(move || render_latest(renderer, state, buffer));
    }

    pub fn cancel_pending(&self) -> bool {
        self.timer.cancel()
    }

    pub fn is_pending(&self) -> bool {
        self.timer.is_pending()
    }

    pub fn surface(&self) -> PreviewSurface {
        self.state.lock().surface.clone()
    }

    /// Generation of the most recently started render
    pub fn generation(&self) -> u64 {
        self.state.lock().latest
    }
}

async fn render_latest<R: Renderer>(
    renderer: Arc<R>,
    shared: Arc<Mutex<PreviewState>>,
    buffer: SharedBuffer,
) {
    let (generation, text) = {
        let mut state = shared.lock();
        state.latest += 1;
        (state.latest, buffer.snapshot())
    };
    debug!(generation, bytes = text.len(), "rendering preview");

    let result = renderer.render(&text).await;

    let mut state = shared.lock();
    if state.latest != generation {
        debug!(generation, latest = state.latest, "discarding stale preview");
        return;
    }
    let content = match result {
        Ok(rendered) => PreviewContent::Rendered(rendered),
        Err(err) => {
            warn!(generation, error = %err, "preview render failed");
            PreviewContent::Failed(err.to_string())
        }
    };
    state.surface.apply(generation, content);
}
