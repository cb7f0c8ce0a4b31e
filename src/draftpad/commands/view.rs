use crate::commands::CmdResult;
use crate::error::Result;
use crate::index::DocSelector;
use crate::store::DocumentStore;

use super::helpers::resolve_selector;

pub async fn run<S: DocumentStore>(store: &S, selector: &DocSelector) -> Result<CmdResult> {
    let dp = resolve_selector(store, selector).await?;
    Ok(CmdResult::default().with_listed_documents(vec![dp]))
}
