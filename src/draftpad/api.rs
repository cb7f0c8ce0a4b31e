//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer and the session.
//! It is the single entry point UI clients use, whatever the UI is.
//!
//! ## Role and Responsibilities
//!
//! The API facade:
//! - **Dispatches** to the appropriate command function
//! - **Normalizes inputs** (display indexes and id prefixes → `DocumentId`s)
//! - **Builds sessions** wired to the same store
//! - **Returns structured types** (`Result<CmdResult>`)
//!
//! It does no printing and holds no business logic of its own.
//!
//! ## Generic Over DocumentStore
//!
//! - Production: `DraftApi<FileStore>`
//! - Testing: `DraftApi<InMemoryStore>`

use crate::commands;
use crate::config::DraftConfig;
use crate::error::{DraftError, Result};
use crate::index::{DisplayDocument, DocSelector};
use crate::render::{MarkdownRenderer, Rendered, Renderer};
use crate::session::Session;
use crate::store::DocumentStore;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub use crate::commands::config::ConfigAction;
pub use crate::commands::{CmdMessage, CmdResult, MessageLevel};

/// The main API facade for draftpad operations.
pub struct DraftApi<S: DocumentStore> {
    store: Arc<S>,
    data_dir: PathBuf,
}

impl<S: DocumentStore> DraftApi<S> {
    pub fn new(store: S, data_dir: PathBuf) -> Self {
        Self {
            store: Arc::new(store),
            data_dir,
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn config(&self) -> Result<DraftConfig> {
        DraftConfig::load(&self.data_dir)
    }

    pub async fn list_documents(&self) -> Result<CmdResult> {
        commands::list::run(&*self.store).await
    }

    pub async fn search_documents(&self, query: &str) -> Result<CmdResult> {
        commands::search::run(&*self.store, query).await
    }

    pub async fn view_document(&self, selector: &str) -> Result<CmdResult> {
        let selector = parse_selector(selector)?;
        commands::view::run(&*self.store, &selector).await
    }

    pub async fn rename_document(&self, selector: &str, title: &str) -> Result<CmdResult> {
        let dp = self.resolve(selector).await?;
        commands::rename::run(&*self.store, dp.document.id, title).await
    }

    pub async fn delete_document(&self, selector: &str) -> Result<CmdResult> {
        let dp = self.resolve(selector).await?;
        commands::delete::run(&*self.store, dp.document.id).await
    }

    pub async fn recover_autosave(&self) -> Result<CmdResult> {
        commands::recover::run(&*self.store).await
    }

    pub fn configure(&self, action: ConfigAction) -> Result<CmdResult> {
        commands::config::run(&self.data_dir, action)
    }

    /// One-off markdown render, outside any session.
    pub async fn render(&self, text: &str) -> Result<Rendered> {
        Ok(MarkdownRenderer::new().render(text).await?)
    }

    pub async fn resolve(&self, selector: &str) -> Result<DisplayDocument> {
        let selector = parse_selector(selector)?;
        commands::helpers::resolve_selector(&*self.store, &selector).await
    }

    /// Starts an editing session on this API's store, using the saved config.
    pub fn session(&self) -> Result<Session<S, MarkdownRenderer>> {
        let config = self.config()?;
        Ok(self.session_with(Arc::new(MarkdownRenderer::new()), &config))
    }

    pub fn session_with<R: Renderer>(
        &self,
        renderer: Arc<R>,
        config: &DraftConfig,
    ) -> Session<S, R> {
        Session::new(Arc::clone(&self.store), renderer, config)
    }
}

fn parse_selector(input: &str) -> Result<DocSelector> {
    input.parse().map_err(DraftError::Api)
}
