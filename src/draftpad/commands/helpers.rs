use crate::error::{DraftError, Result};
use crate::index::{index_documents, DisplayDocument, DocSelector};
use crate::store::DocumentStore;

pub async fn indexed_documents<S: DocumentStore>(store: &S) -> Result<Vec<DisplayDocument>> {
    let docs = store.list().await?;
    Ok(index_documents(docs))
}

/// Resolves a selector to exactly one document.
pub async fn resolve_selector<S: DocumentStore>(
    store: &S,
    selector: &DocSelector,
) -> Result<DisplayDocument> {
    let indexed = indexed_documents(store).await?;

    let mut matches: Vec<DisplayDocument> = match selector {
        DocSelector::Index(n) => indexed.into_iter().filter(|dp| dp.index == *n).collect(),
        DocSelector::IdPrefix(prefix) => indexed
            .into_iter()
            .filter(|dp| dp.document.id.to_string().starts_with(prefix.as_str()))
            .collect(),
        DocSelector::Title(term) => {
            let term_lower = term.to_lowercase();
            let exact: Vec<_> = indexed
                .iter()
                .filter(|dp| dp.document.title.to_lowercase() == term_lower)
                .cloned()
                .collect();
            if exact.is_empty() {
                indexed
                    .into_iter()
                    .filter(|dp| dp.document.title.to_lowercase().contains(&term_lower))
                    .collect()
            } else {
                exact
            }
        }
    };

    match matches.len() {
        0 => Err(DraftError::Api(format!("No document matches {}", selector))),
        1 => Ok(matches.remove(0)),
        n => Err(DraftError::Api(format!(
            "{} documents match {}, be more specific",
            n, selector
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::fixtures::StoreFixture;

    async fn fixture() -> StoreFixture {
        StoreFixture::new()
            .with_documents(&[("Notes", "a"), ("Meeting Notes", "b"), ("Budget", "c")])
            .await
    }

    #[tokio::test]
    async fn resolves_by_index() {
        let fixture = fixture().await;
        let dp = resolve_selector(&fixture.store, &DocSelector::Index(1))
            .await
            .unwrap();
        assert_eq!(dp.document.title, "Budget");
    }

    #[tokio::test]
    async fn exact_title_beats_substring() {
        let fixture = fixture().await;
        let dp = resolve_selector(&fixture.store, &DocSelector::Title("notes".into()))
            .await
            .unwrap();
        assert_eq!(dp.document.title, "Notes");
    }

    #[tokio::test]
    async fn ambiguous_and_missing_are_errors() {
        let fixture = fixture().await;
        assert!(resolve_selector(&fixture.store, &DocSelector::Title("e".into()))
            .await
            .is_err());
        assert!(resolve_selector(&fixture.store, &DocSelector::Index(9))
            .await
            .is_err());
    }

    #[tokio::test]
    async fn resolves_by_id_prefix() {
        let fixture = fixture().await;
        let docs = fixture.store.list().await.unwrap();
        let prefix = docs[2].id.to_string()[..8].to_string();
        let dp = resolve_selector(&fixture.store, &DocSelector::IdPrefix(prefix))
            .await
            .unwrap();
        assert_eq!(dp.document.id, docs[2].id);
    }
}
