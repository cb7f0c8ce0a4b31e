use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::index::{index_documents, DisplayDocument};
use crate::store::DocumentStore;

/// Title search. Results keep their positions from the full listing so the
/// numbers shown can be fed straight back into other commands.
pub async fn run<S: DocumentStore>(store: &S, query: &str) -> Result<CmdResult> {
    let all = index_documents(store.list().await?);
    let hits = store.search(query).await?;

    let listed: Vec<DisplayDocument> = hits
        .into_iter()
        .filter_map(|doc| all.iter().find(|dp| dp.document.id == doc.id).cloned())
        .collect();

    let mut result = CmdResult::default();
    if listed.is_empty() {
        result.add_message(CmdMessage::info(format!("No titles match \"{}\"", query)));
    }
    Ok(result.with_listed_documents(listed))
}
