use crate::commands::{CmdMessage, CmdResult};
use crate::error::{Result, StoreError};
use crate::model::DocumentId;
use crate::store::DocumentStore;

pub async fn run<S: DocumentStore>(store: &S, id: DocumentId) -> Result<CmdResult> {
    let doc = store.get(id).await?.ok_or(StoreError::NotFound(id))?;
    store.delete(id).await?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Document deleted: {}",
        doc.title
    )));
    Ok(result.with_affected_documents(vec![doc]))
}
