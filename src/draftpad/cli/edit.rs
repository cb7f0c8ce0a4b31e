//! Line-based editing session.
//!
//! Each stdin line is appended to the buffer, except lines starting with `:`,
//! which are session commands. `::text` appends a literal `:text`. End of
//! input behaves like `:quit`.

use super::print::{print_documents, print_messages, print_preview};
use colored::Colorize;
use draftpad::api::DraftApi;
use draftpad::config::DraftConfig;
use draftpad::error::{DraftError, Result};
use draftpad::render::Renderer;
use draftpad::session::{Binding, NavigationOutcome, NavigationState, SaveOutcome, Session};
use draftpad::store::DocumentStore;
use std::str::FromStr;
use tokio::io::{AsyncBufReadExt, BufReader};

const HELP: &str = "\
:open <sel>     open a document (index, id prefix or title)
:new            start a new document
:save [title]   save the buffer
:discard        confirm: drop unsaved changes and continue
:save-open      confirm: save, then continue
:cancel         confirm: stay on the current buffer
:rename <sel> <title>
                rename a document (selector without spaces)
:delete <sel>   delete a document
:list           list documents
:preview        print the rendered preview
:status         show binding and unsaved state
:quit           flush autosave and exit";

#[derive(Debug, PartialEq, Eq)]
enum EditorInput {
    Text(String),
    Open(String),
    New,
    Save(String),
    Discard,
    SaveOpen,
    Cancel,
    Rename(String, String),
    Delete(String),
    List,
    Preview,
    Status,
    Help,
    Quit,
}

impl FromStr for EditorInput {
    type Err = String;

    fn from_str(line: &str) -> std::result::Result<Self, Self::Err> {
        if let Some(literal) = line.strip_prefix("::") {
            return Ok(EditorInput::Text(format!(":{}", literal)));
        }
        let Some(command) = line.strip_prefix(':') else {
            return Ok(EditorInput::Text(line.to_string()));
        };

        let (name, arg) = match command.trim().split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim().to_string()),
            None => (command.trim(), String::new()),
        };
        let needs_arg = |input: fn(String) -> EditorInput| {
            if arg.is_empty() {
                Err(format!(":{} needs a document selector", name))
            } else {
                Ok(input(arg.clone()))
            }
        };

        match name {
            "open" | "o" => needs_arg(EditorInput::Open),
            "new" | "n" => Ok(EditorInput::New),
            "save" | "w" => Ok(EditorInput::Save(arg)),
            "discard" => Ok(EditorInput::Discard),
            "save-open" => Ok(EditorInput::SaveOpen),
            "cancel" => Ok(EditorInput::Cancel),
            "rename" | "mv" => match arg.split_once(char::is_whitespace) {
                Some((selector, title)) if !title.trim().is_empty() => Ok(EditorInput::Rename(
                    selector.to_string(),
                    title.trim().to_string(),
                )),
                _ => Err(":rename needs a document selector and a title".to_string()),
            },
            "delete" | "rm" => needs_arg(EditorInput::Delete),
            "list" | "ls" => Ok(EditorInput::List),
            "preview" | "p" => Ok(EditorInput::Preview),
            "status" => Ok(EditorInput::Status),
            "help" | "h" => Ok(EditorInput::Help),
            "quit" | "q" => Ok(EditorInput::Quit),
            other => Err(format!("Unknown command :{} (try :help)", other)),
        }
    }
}

enum Flow {
    Continue,
    Quit,
}

pub(super) async fn run_editor<S: DocumentStore>(
    api: &DraftApi<S>,
    selector: Option<String>,
) -> Result<()> {
    let config = api.config()?;
    let session = api.session()?;

    match selector {
        Some(selector) => {
            let dp = api.resolve(&selector).await?;
            session.open_by_id(dp.document.id).await?;
        }
        None => {
            session.restore_autosave().await?;
        }
    }
    print_messages(&session.take_messages());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let flow = match line.parse::<EditorInput>() {
            Ok(input) => handle_input(api, &session, input, &config).await,
            Err(msg) => Err(DraftError::Api(msg)),
        };

        let queued = session.take_messages();
        match flow {
            Ok(Flow::Continue) => print_messages(&queued),
            Ok(Flow::Quit) => {
                print_messages(&queued);
                break;
            }
            // Session operations queue their own error message.
            Err(err) => {
                if queued.is_empty() {
                    println!("{}", err.to_string().red());
                }
                print_messages(&queued);
            }
        }
    }

    session.flush_autosave().await?;
    print_messages(&session.take_messages());
    Ok(())
}

async fn handle_input<S: DocumentStore, R: Renderer>(
    api: &DraftApi<S>,
    session: &Session<S, R>,
    input: EditorInput,
    config: &DraftConfig,
) -> Result<Flow> {
    match input {
        EditorInput::Text(text) => {
            let mut buffer = session.buffer();
            if !buffer.is_empty() {
                buffer.push('\n');
            }
            buffer.push_str(&text);
            session.buffer_changed(buffer);
        }
        EditorInput::Open(selector) => {
            let dp = api.resolve(&selector).await?;
            let outcome = session.open_by_id(dp.document.id).await?;
            print_navigation(outcome);
        }
        EditorInput::New => print_navigation(session.request_new()),
        EditorInput::Save(title) => {
            if let SaveOutcome::Ignored = session.explicit_save(&title).await? {
                println!("{}", "Finish the pending confirmation first.".yellow());
            }
        }
        EditorInput::Discard => print_navigation(session.discard()),
        EditorInput::SaveOpen => print_navigation(session.save_and_open().await?),
        EditorInput::Cancel => print_navigation(session.cancel()),
        EditorInput::Rename(selector, title) => {
            let dp = api.resolve(&selector).await?;
            session.rename(dp.document.id, &title).await?;
        }
        EditorInput::Delete(selector) => {
            let dp = api.resolve(&selector).await?;
            session.delete(dp.document.id).await?;
        }
        EditorInput::List => print_documents(&session.list_documents().await?),
        EditorInput::Preview => {
            // let a pending render land first
            tokio::time::sleep(config.preview_window() * 2).await;
            print_preview(session.preview().content());
        }
        EditorInput::Status => print_status(session),
        EditorInput::Help => println!("{}", HELP),
        EditorInput::Quit => return Ok(Flow::Quit),
    }
    Ok(Flow::Continue)
}

fn print_navigation(outcome: NavigationOutcome) {
    match outcome {
        NavigationOutcome::Applied | NavigationOutcome::Cancelled => {}
        NavigationOutcome::ConfirmRequired => println!(
            "{}",
            "Unsaved changes. :discard, :save-open or :cancel".yellow()
        ),
        NavigationOutcome::Ignored => println!("{}", "Not now, the session is busy.".yellow()),
    }
}

fn print_status<S: DocumentStore, R: Renderer>(session: &Session<S, R>) {
    let binding = match session.binding() {
        Binding::Unbound => "unsaved draft".to_string(),
        Binding::Bound(id) => format!("document {}", id),
    };
    let navigation = match session.navigation_state() {
        NavigationState::Idle => "idle",
        NavigationState::ConfirmPending(_) => "awaiting confirmation",
        NavigationState::SaveModalOpen => "saving",
        NavigationState::Busy => "busy",
    };
    let changes = if session.has_unsaved_changes() {
        "unsaved changes".yellow()
    } else {
        "no unsaved changes".green()
    };
    println!("{}, {}, {}", binding, navigation, changes);
}
