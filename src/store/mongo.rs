//! MongoDB-backed record store
//!
//! Requests live in one collection and records in another, both keyed by
//! `request_id`. Records are streamed from a cursor in insertion order.

use chrono::{DateTime, Utc};
use mongodb::bson::{self, Document, doc};
use mongodb::sync::{Client, Collection};
use tracing::{debug, info};

use super::{RecordIter, RecordStore};
use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::model::{ExportRecord, ExportRequest};

/// Record store over MongoDB collections
pub struct MongoStore {
    requests: Collection<Document>,
    records: Collection<ExportRecord>,
}

impl MongoStore {
    /// Connect to MongoDB and bind the configured collections
    ///
    /// # Arguments
    /// * `config` - Store configuration
    ///
    /// # Returns
    /// * `Result<Self, StoreError>` - Store or driver error
    pub fn connect(config: &StoreConfig) -> Result<Self, StoreError> {
        let client = Client::with_uri_str(&config.uri)?;
        let db = client.database(&config.database);

        info!(
            "Using MongoDB store: database '{}', collections '{}' / '{}'",
            config.database, config.requests_collection, config.records_collection
        );

        Ok(Self {
            requests: db.collection(&config.requests_collection),
            records: db.collection(&config.records_collection),
        })
    }

    fn request_from_document(request_id: &str, doc: &Document) -> Result<ExportRequest, StoreError> {
        let status = doc
            .get_str("status")
            .map_err(|e| StoreError::InvalidDocument(format!("request '{}': {}", request_id, e)))?;
        let updated_at = doc
            .get_datetime("updated_at")
            .ok()
            .and_then(|dt| DateTime::<Utc>::from_timestamp_millis(dt.timestamp_millis()));

        Ok(ExportRequest {
            request_id: request_id.to_string(),
            status: status.to_string(),
            updated_at,
        })
    }
}

impl RecordStore for MongoStore {
    fn records(&self, request_id: &str) -> Result<RecordIter<'_>, StoreError> {
        let cursor = self
            .records
            .find(doc! { "request_id": request_id })
            .sort(doc! { "_id": 1 })
            .run()?;

        debug!("Opened record cursor for request '{}'", request_id);
        Ok(Box::new(cursor.map(|r| r.map_err(StoreError::from))))
    }

    fn request(&self, request_id: &str) -> Result<ExportRequest, StoreError> {
        let doc = self
            .requests
            .find_one(doc! { "request_id": request_id })
            .run()?
            .ok_or_else(|| StoreError::RequestNotFound(request_id.to_string()))?;
        Self::request_from_document(request_id, &doc)
    }

    fn commit_request(&mut self, request: &ExportRequest) -> Result<(), StoreError> {
        let updated_at = request.updated_at.unwrap_or_else(Utc::now);
        let result = self
            .requests
            .update_one(
                doc! { "request_id": request.request_id.as_str() },
                doc! {
                    "$set": {
                        "status": request.status.as_str(),
                        "updated_at": bson::DateTime::from_millis(updated_at.timestamp_millis()),
                    }
                },
            )
            .run()?;

        if result.matched_count == 0 {
            return Err(StoreError::RequestNotFound(request.request_id.clone()));
        }

        debug!(
            "Committed status '{}' for request '{}'",
            request.status, request.request_id
        );
        Ok(())
    }
}
