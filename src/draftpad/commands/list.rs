use crate::commands::CmdResult;
use crate::error::Result;
use crate::store::DocumentStore;

use super::helpers::indexed_documents;

pub async fn run<S: DocumentStore>(store: &S) -> Result<CmdResult> {
    let listed = indexed_documents(store).await?;
    Ok(CmdResult::default().with_listed_documents(listed))
}
