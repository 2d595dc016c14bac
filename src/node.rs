use serde::{Deserialize, Serialize};

use crate::credentials::CredentialSet;
use crate::error::Error;
use crate::types::*;
use crate::upload::UploadRequest;

/// Node parameters, either shared by every item or resolved per item.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterSet {
    PerItem(Vec<UploadParameters>),
    Shared(UploadParameters),
}

impl ParameterSet {
    pub fn for_item(&self, index: usize) -> Result<&UploadParameters, Error> {
        match self {
            ParameterSet::Shared(params) => Ok(params),
            ParameterSet::PerItem(list) => list.get(index).ok_or_else(|| {
                Error::BadRequest(format!("no parameters given for item {index}"))
            }),
        }
    }
}

async fn execute_item(
    item: &WorkflowItem,
    params: &UploadParameters,
    credentials: &CredentialSet,
) -> Result<serde_json::Value, Error> {
    let request = UploadRequest::build(item, params)?;
    request.send(credentials).await
}

/// Run the upload once per input item, in order.
///
/// With `continue_on_fail` a failing item yields `{"error": msg}` paired with
/// its index and the run goes on; otherwise the first failure aborts the run
/// with the item index attached.
pub async fn execute(
    items: &[WorkflowItem],
    params: &ParameterSet,
    credentials: &CredentialSet,
    continue_on_fail: bool,
) -> Result<Vec<NodeOutput>, Error> {
    let mut outputs = Vec::with_capacity(items.len());

    for (index, item) in items.iter().enumerate() {
        let result = match params.for_item(index) {
            Ok(p) => execute_item(item, p, credentials).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(json) => outputs.push(NodeOutput {
                json,
                paired_item: index,
            }),
            Err(e) if continue_on_fail => {
                tracing::warn!("Item {index} failed, continuing: {e}");
                outputs.push(NodeOutput {
                    json: serde_json::json!({ "error": e.message() }),
                    paired_item: index,
                });
            }
            Err(e) => return Err(e.at_item(index)),
        }
    }

    tracing::debug!("Executed {} item(s)", items.len());
    Ok(outputs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::spawn_receiver;

    fn item(files: &[&str]) -> WorkflowItem {
        WorkflowItem {
            json: serde_json::json!({}),
            binary: Some(
                files
                    .iter()
                    .map(|k| (k.to_string(), BinaryData::from_bytes(b"bytes", None, None)))
                    .collect(),
            ),
        }
    }

    #[test]
    fn shared_parameters_apply_to_every_item() {
        let set = ParameterSet::Shared(UploadParameters::new("https://a"));
        assert_eq!(set.for_item(0).unwrap().url, "https://a");
        assert_eq!(set.for_item(7).unwrap().url, "https://a");
    }

    #[test]
    fn per_item_parameters_out_of_range() {
        let set = ParameterSet::PerItem(vec![UploadParameters::new("https://a")]);
        assert!(set.for_item(0).is_ok());
        assert!(matches!(set.for_item(1), Err(Error::BadRequest(_))));
    }

    #[test]
    fn parameter_set_deserializes_both_shapes() {
        let shared: ParameterSet = serde_json::from_str(r#"{"url": "https://a"}"#).unwrap();
        assert!(matches!(shared, ParameterSet::Shared(_)));
        let per_item: ParameterSet =
            serde_json::from_str(r#"[{"url": "https://a"}, {"url": "https://b"}]"#).unwrap();
        assert!(matches!(per_item, ParameterSet::PerItem(ref v) if v.len() == 2));
    }

    #[tokio::test]
    async fn execute_pairs_outputs_with_items() {
        let base = spawn_receiver().await;
        let params = ParameterSet::Shared(UploadParameters::new(&format!("{base}/text")));
        let items = vec![item(&["a.png"]), item(&["b.png"])];
        let out = execute(&items, &params, &CredentialSet::default(), false)
            .await
            .unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].paired_item, 0);
        assert_eq!(out[1].paired_item, 1);
        assert_eq!(out[1].json["data"], "uploaded");
    }

    #[tokio::test]
    async fn execute_aborts_with_item_index() {
        let base = spawn_receiver().await;
        let mut params = UploadParameters::new(&format!("{base}/text"));
        params.file_pattern = "*.png".into();
        let items = vec![item(&["a.png"]), item(&["b.pdf"])];
        let err = execute(
            &items,
            &ParameterSet::Shared(params),
            &CredentialSet::default(),
            false,
        )
        .await
        .unwrap_err();
        match err {
            Error::Item { index, source } => {
                assert_eq!(index, 1);
                assert!(matches!(*source, Error::NoMatch(_)));
            }
            other => panic!("expected item error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn execute_continue_on_fail_records_error() {
        let base = spawn_receiver().await;
        let mut params = UploadParameters::new(&format!("{base}/text"));
        params.file_pattern = "*.png".into();
        let items = vec![WorkflowItem::default(), item(&["b.pdf"]), item(&["c.png"])];
        let out = execute(
            &items,
            &ParameterSet::Shared(params),
            &CredentialSet::default(),
            true,
        )
        .await
        .unwrap();
        assert_eq!(out.len(), 3);
        assert!(
            out[0].json["error"]
                .as_str()
                .unwrap()
                .starts_with("No binary data found")
        );
        assert_eq!(
            out[1].json["error"],
            "No binary files match the pattern: *.png"
        );
        assert_eq!(out[2].json["data"], "uploaded");
        assert_eq!(out[2].paired_item, 2);
    }

    #[tokio::test]
    async fn execute_empty_items() {
        let params = ParameterSet::Shared(UploadParameters::new("https://a"));
        let out = execute(&[], &params, &CredentialSet::default(), false)
            .await
            .unwrap();
        assert!(out.is_empty());
    }
}
