use crate::http::{read_empty, read_json, transport_error};
use crate::value::{decode_fields, encode_field, encode_fields};
use crate::{FirebaseAuth, FirebaseSettings};

use std::sync::Arc;

use async_trait::async_trait;
use carti_core::{BackendError, BackendResult, Document, DocumentStore, Fields, Query};
use log::debug;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde_json::{Value, json};

/// [`DocumentStore`] over the Firestore REST API.
///
/// Requests carry the signed-in user's id token when an auth provider is
/// attached, so security rules see the caller.
pub struct FirestoreStore {
    http: Client,
    settings: FirebaseSettings,
    auth: Option<Arc<FirebaseAuth>>,
}

impl FirestoreStore {
    pub fn new(http: Client, settings: FirebaseSettings, auth: Option<Arc<FirebaseAuth>>) -> Self {
        Self {
            http,
            settings,
            auth,
        }
    }

    fn document_url(&self, collection: &str, id: &str) -> String {
        format!(
            "{}/{}/{}",
            self.settings.documents_url(),
            urlencoding::encode(collection),
            urlencoding::encode(id)
        )
    }

    async fn send(&self, request: RequestBuilder) -> BackendResult<Response> {
        let request = match &self.auth {
            Some(auth) => match auth.id_token().await? {
                Some(token) => request.bearer_auth(token),
                None => request,
            },
            None => request,
        };
        request.send().await.map_err(transport_error)
    }

    async fn run_query(&self, body: Value) -> BackendResult<Vec<Document>> {
        let url = format!("{}:runQuery", self.settings.documents_url());
        let response = self.send(self.http.post(url).json(&body)).await?;
        let results: Vec<Value> = read_json(response).await?;

        // Rows without a document only report the read time
        results
            .iter()
            .filter_map(|row| row.get("document"))
            .map(|resource| {
                if !resource.is_object() {
                    return Err(BackendError::decode("runQuery document is not an object"));
                }
                parse_document(resource, "")
            })
            .collect()
    }
}

/// `:runQuery` request body for `query`.
fn structured_query(query: &Query, limit: Option<u32>) -> Value {
    let mut structured = json!({ "from": [{ "collectionId": query.collection }] });
    if let Some((field, value)) = &query.filter {
        structured["where"] = json!({
            "fieldFilter": {
                "field": { "fieldPath": field_path(field) },
                "op": "EQUAL",
                "value": encode_field(field, value),
            }
        });
    }
    if let Some(field) = &query.order_by {
        structured["orderBy"] = json!([{
            "field": { "fieldPath": field_path(field) },
            "direction": "ASCENDING",
        }]);
    }
    if let Some(limit) = limit {
        structured["limit"] = json!(limit);
    }
    json!({ "structuredQuery": structured })
}

/// Field path segment; names outside `[A-Za-z_][A-Za-z0-9_]*` are quoted.
fn field_path(name: &str) -> String {
    let simple = name
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if simple {
        name.to_string()
    } else {
        format!("`{}`", name.replace('\\', "\\\\").replace('`', "\\`"))
    }
}

/// Build a [`Document`] from a Firestore document resource. The id is the
/// last segment of `name`, else `fallback_id`.
fn parse_document(resource: &Value, fallback_id: &str) -> BackendResult<Document> {
    let id = resource
        .get("name")
        .and_then(Value::as_str)
        .and_then(|name| name.rsplit('/').next())
        .unwrap_or(fallback_id);
    let fields = decode_fields(resource.get("fields"))?;
    Ok(Document::new(id, fields))
}

#[async_trait]
impl DocumentStore for FirestoreStore {
    async fn get_document(&self, collection: &str, id: &str) -> BackendResult<Option<Document>> {
        let response = self
            .send(self.http.get(self.document_url(collection, id)))
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!("{collection}/{id} not found");
            return Ok(None);
        }

        let resource: Value = read_json(response).await?;
        parse_document(&resource, id).map(Some)
    }

    async fn merge_document(
        &self,
        collection: &str,
        id: &str,
        fields: &Fields,
    ) -> BackendResult<()> {
        if fields.is_empty() {
            return Ok(());
        }

        let mask: Vec<String> = fields
            .keys()
            .map(|name| format!("updateMask.fieldPaths={}", urlencoding::encode(&field_path(name))))
            .collect();
        let url = format!(
            "{}?{}&currentDocument.exists=true",
            self.document_url(collection, id),
            mask.join("&")
        );

        let body = json!({ "fields": encode_fields(fields) });
        let response = self.send(self.http.patch(url).json(&body)).await?;
        read_empty(response).await?;

        debug!("Merged {:?} into {collection}/{id}", fields.keys().collect::<Vec<_>>());
        Ok(())
    }

    async fn set_document(&self, collection: &str, id: &str, fields: &Fields) -> BackendResult<()> {
        let body = json!({ "fields": encode_fields(fields) });
        let response = self
            .send(self.http.patch(self.document_url(collection, id)).json(&body))
            .await?;
        read_empty(response).await?;

        debug!("Wrote {collection}/{id}");
        Ok(())
    }

    async fn find_first(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> BackendResult<Option<Document>> {
        let query = Query::collection(collection).where_eq(field, value.clone());
        let documents = self.run_query(structured_query(&query, Some(1))).await?;
        Ok(documents.into_iter().next())
    }

    async fn query(&self, query: &Query) -> BackendResult<Vec<Document>> {
        let documents = self.run_query(structured_query(query, None)).await?;
        debug!("{} document(s) from {}", documents.len(), query.collection);
        Ok(documents)
    }
}
