//! # Draftpad Architecture
//!
//! Draftpad is a **UI-agnostic markdown drafting library**. The hard part is
//! not storing documents, it is keeping three things consistent while the user
//! keeps typing: the live edit buffer, the rendered preview, and the persisted
//! copy. The bundled CLI is one client of that core, nothing more.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, formats output, drives `edit` from     │
//! │    stdin; the ONLY place that knows about the terminal      │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade: selectors → ids, builds sessions            │
//! └─────────────────────────────────────────────────────────────┘
//!                 │                            │
//!                 ▼                            ▼
//! ┌───────────────────────────┐  ┌──────────────────────────────┐
//! │  Session (session/)       │  │  Commands (commands/*.rs)    │
//! │  - buffer + identity      │─►│  - store-level operations    │
//! │  - confirm protocol       │  │  - return `CmdResult`        │
//! └───────────────────────────┘  └──────────────────────────────┘
//!        │               │                     │
//!        ▼               ▼                     ▼
//! ┌──────────────┐ ┌───────────────┐ ┌─────────────────────────┐
//! │ scheduler/   │ │ render/       │ │ store/                  │
//! │ debounced    │ │ Renderer      │ │ DocumentStore           │
//! │ preview and  │ │ (markdown)    │ │ (FileStore, InMemory)   │
//! │ autosave     │ │               │ │                         │
//! └──────────────┘ └───────────────┘ └─────────────────────────┘
//! ```
//!
//! ## Asynchrony
//!
//! Rendering and every store call are async and cannot be cancelled once
//! started. Everything runs on Tokio. Two rules keep the session consistent:
//!
//! - **Supersede and discard**: renders are tagged with a generation number and
//!   their output is dropped if a newer render started meanwhile.
//! - **Cancel before replace**: a pending autosave is cancelled synchronously
//!   before the buffer is replaced wholesale.
//!
//! Shared state lives behind `parking_lot` locks that are never held across an
//! `.await`.
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! From `api.rs` inward, code never writes to stdout/stderr and never exits the
//! process. User-facing notices are returned as [`commands::CmdMessage`]s, or
//! queued on the session for the UI to drain. Diagnostics go through `tracing`.
//!
//! ## Testing Strategy
//!
//! 1. **Schedulers and session**: paused-clock tests
//!    (`#[tokio::test(start_paused = true)]`) with scripted renderers and
//!    flaky stores, so timing races are deterministic.
//! 2. **Commands**: unit tests against `InMemoryStore`.
//! 3. **CLI**: `tests/` drives the binary with `assert_cmd`.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade
//! - [`session`]: Session controller and confirmation protocol
//! - [`scheduler`]: Debouncer, preview and autosave schedulers
//! - [`render`]: Renderer trait, preview surface, markdown renderer
//! - [`commands`]: Store-level operations and user messages
//! - [`store`]: Storage abstraction and implementations
//! - [`model`]: `Document`, `AutosaveRecord`, title derivation
//! - [`index`]: Display indexes and document selectors
//! - [`buffer`]: The shared edit buffer
//! - [`config`]: Configuration management
//! - [`error`]: Error types
//! - `cli`: Argument parsing, printing and the `edit` loop (binary only)

pub mod api;
pub mod buffer;
pub mod commands;
pub mod config;
pub mod error;
pub mod index;
pub mod model;
pub mod render;
pub mod scheduler;
pub mod session;
pub mod store;
