//! # Rendering
//!
//! The [`Renderer`] turns buffer text into preview markup. Renders are
//! asynchronous, may fail, and cannot be cancelled, so a renderer never writes
//! to the shared [`PreviewSurface`] itself: it returns a scratch [`Rendered`]
//! and the preview scheduler decides whether that output is still current.

use crate::error::RenderError;
use std::future::Future;

pub mod markdown;

pub use markdown::MarkdownRenderer;

/// Output of one render, not yet visible to anyone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub html: String,
    pub word_count: usize,
}

pub trait Renderer: Send + Sync + 'static {
    fn render(&self, text: &str) -> impl Future<Output = Result<Rendered, RenderError>> + Send;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PreviewContent {
    #[default]
    Empty,
    Rendered(Rendered),
    /// Fallback state shown after a renderer failure
    Failed(String),
}

/// The shared preview surface. Written only by the preview scheduler.
#[derive(Debug, Clone, Default)]
pub struct PreviewSurface {
    content: PreviewContent,
    generation: u64,
    applied: usize,
}

impl PreviewSurface {
    pub fn content(&self) -> &PreviewContent {
        &self.content
    }

    /// Generation of the render currently on display (0 before the first one)
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// How many renders have been applied so far
    pub fn applied(&self) -> usize {
        self.applied
    }

    pub fn html(&self) -> Option<&str> {
        match &self.content {
            PreviewContent::Rendered(r) => Some(&r.html),
            _ => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.content, PreviewContent::Failed(_))
    }

    pub(crate) fn apply(&mut self, generation: u64, content: PreviewContent) {
        self.content = content;
        self.generation = generation;
        self.applied += 1;
    }
}

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use parking_lot::Mutex;
    use std::collections::VecDeque;
    use std::time::Duration;

    /// One scripted reaction of the [`ScriptedRenderer`].
    #[derive(Debug, Clone)]
    pub struct Step {
        pub delay: Duration,
        pub fail: bool,
    }

    impl Step {
        pub fn ok(delay_ms: u64) -> Self {
            Self {
                delay: Duration::from_millis(delay_ms),
                fail: false,
            }
        }

        pub fn fail(delay_ms: u64) -> Self {
            Self {
                delay: Duration::from_millis(delay_ms),
                fail: true,
            }
        }
    }

    /// Renderer whose calls take scripted (virtual) time and can be told to fail.
    ///
    /// Output html is `<p>{text}</p>` so tests can tell which buffer was rendered.
    /// Once the script runs out every call succeeds immediately.
    #[derive(Default)]
    pub struct ScriptedRenderer {
        script: Mutex<VecDeque<Step>>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedRenderer {
        pub fn new(steps: impl IntoIterator<Item = Step>) -> Self {
            Self {
                script: Mutex::new(steps.into_iter().collect()),
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().clone()
        }
    }

    impl Renderer for ScriptedRenderer {
        async fn render(&self, text: &str) -> Result<Rendered, RenderError> {
            self.calls.lock().push(text.to_string());
            let step = self.script.lock().pop_front().unwrap_or(Step::ok(0));
            if !step.delay.is_zero() {
                tokio::time::sleep(step.delay).await;
            }
            if step.fail {
                return Err(RenderError(format!("diagram layout failed for '{}'", text)));
            }
            Ok(Rendered {
                html: format!("<p>{}</p>", text),
                word_count: text.split_whitespace().count(),
            })
        }
    }
}
