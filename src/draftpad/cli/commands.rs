use super::edit::run_editor;
use super::print::{
    print_autosave, print_documents, print_full_document, print_messages, print_rendered,
};
use super::setup::{Cli, Commands};
use clap::Parser;
use directories::ProjectDirs;
use draftpad::api::{ConfigAction, DraftApi};
use draftpad::error::{DraftError, Result};
use draftpad::store::fs::FileStore;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

const HOME_ENV: &str = "DRAFTPAD_HOME";
const LOG_ENV: &str = "DRAFTPAD_LOG";

struct AppContext {
    api: DraftApi<FileStore>,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let ctx = init_context()?;
    debug!(data_dir = %ctx.api.data_dir().display(), "starting");

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(dispatch(ctx, cli.command))
}

async fn dispatch(ctx: AppContext, command: Option<Commands>) -> Result<()> {
    match command {
        Some(Commands::List { search }) => handle_list(&ctx, search).await,
        Some(Commands::Search { term }) => handle_list(&ctx, Some(term)).await,
        Some(Commands::View { selector }) => handle_view(&ctx, selector).await,
        Some(Commands::Rename { selector, title }) => {
            handle_rename(&ctx, selector, title.join(" ")).await
        }
        Some(Commands::Delete { selector }) => handle_delete(&ctx, selector).await,
        Some(Commands::Recover) => handle_recover(&ctx).await,
        Some(Commands::Render { file }) => handle_render(&ctx, file).await,
        Some(Commands::Config { key, value }) => handle_config(&ctx, key, value),
        Some(Commands::Edit { selector }) => run_editor(&ctx.api, selector).await,
        None => handle_list(&ctx, None).await,
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("draftpad=debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    // A subscriber may already be installed when embedded; keep it.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn init_context() -> Result<AppContext> {
    let data_dir = data_dir()?;
    let store = FileStore::new(data_dir.clone());
    Ok(AppContext {
        api: DraftApi::new(store, data_dir),
    })
}

fn data_dir() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os(HOME_ENV) {
        return Ok(PathBuf::from(dir));
    }
    ProjectDirs::from("com", "draftpad", "draftpad")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| DraftError::Config("Could not determine data directory".into()))
}

async fn handle_list(ctx: &AppContext, search: Option<String>) -> Result<()> {
    let result = match search {
        Some(term) => ctx.api.search_documents(&term).await?,
        None => ctx.api.list_documents().await?,
    };
    if !result.listed_documents.is_empty() || result.messages.is_empty() {
        print_documents(&result.listed_documents);
    }
    print_messages(&result.messages);
    Ok(())
}

async fn handle_view(ctx: &AppContext, selector: String) -> Result<()> {
    let result = ctx.api.view_document(&selector).await?;
    for dp in &result.listed_documents {
        print_full_document(dp);
    }
    print_messages(&result.messages);
    Ok(())
}

async fn handle_rename(ctx: &AppContext, selector: String, title: String) -> Result<()> {
    let result = ctx.api.rename_document(&selector, &title).await?;
    print_messages(&result.messages);
    Ok(())
}

async fn handle_delete(ctx: &AppContext, selector: String) -> Result<()> {
    let result = ctx.api.delete_document(&selector).await?;
    print_messages(&result.messages);
    Ok(())
}

async fn handle_recover(ctx: &AppContext) -> Result<()> {
    let result = ctx.api.recover_autosave().await?;
    if let Some(record) = &result.autosave {
        print_autosave(record);
    }
    print_messages(&result.messages);
    Ok(())
}

async fn handle_render(ctx: &AppContext, file: PathBuf) -> Result<()> {
    let text = tokio::fs::read_to_string(&file).await?;
    let rendered = ctx.api.render(&text).await?;
    print_rendered(&rendered);
    Ok(())
}

fn handle_config(ctx: &AppContext, key: Option<String>, value: Option<String>) -> Result<()> {
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(k), None) => ConfigAction::Get(k),
        (Some(k), Some(v)) => ConfigAction::Set(k, v),
    };
    let result = ctx.api.configure(action)?;
    print_messages(&result.messages);
    Ok(())
}
