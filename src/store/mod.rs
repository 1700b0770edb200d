//! Request store access
//!
//! The exporter reads records and, on failure, writes one request status
//! through the [`RecordStore`] trait:
//! - [`MongoStore`]: MongoDB collections via the sync driver
//! - [`MemoryStore`]: in-process store for tests and embedding

use std::collections::HashMap;

use crate::error::StoreError;
use crate::model::{ExportRecord, ExportRequest};

pub mod mongo;

pub use mongo::MongoStore;

/// Iterator over the records of one request
pub type RecordIter<'a> = Box<dyn Iterator<Item = Result<ExportRecord, StoreError>> + 'a>;

/// Data collaborator for export invocations
pub trait RecordStore {
    /// All records for a request, in insertion order
    ///
    /// # Arguments
    /// * `request_id` - Request identifier
    ///
    /// # Returns
    /// * `Result<RecordIter, StoreError>` - Single-pass record iterator
    fn records(&self, request_id: &str) -> Result<RecordIter<'_>, StoreError>;

    /// Load a request
    fn request(&self, request_id: &str) -> Result<ExportRequest, StoreError>;

    /// Durably persist the request's status
    fn commit_request(&mut self, request: &ExportRequest) -> Result<(), StoreError>;
}

/// In-memory record store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    requests: HashMap<String, ExportRequest>,
    records: HashMap<String, Vec<ExportRecord>>,
    commits: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a request
    pub fn insert_request(&mut self, request: ExportRequest) {
        self.requests.insert(request.request_id.clone(), request);
    }

    /// Append a record to a request
    pub fn push_record(&mut self, request_id: &str, record: ExportRecord) {
        self.records
            .entry(request_id.to_string())
            .or_default()
            .push(record);
    }

    /// Current status of a request
    pub fn status(&self, request_id: &str) -> Option<&str> {
        self.requests.get(request_id).map(|r| r.status.as_str())
    }

    /// Number of committed status changes
    pub fn commits(&self) -> usize {
        self.commits
    }
}

impl RecordStore for MemoryStore {
    fn records(&self, request_id: &str) -> Result<RecordIter<'_>, StoreError> {
        let records = self.records.get(request_id).map(Vec::as_slice).unwrap_or(&[]);
        Ok(Box::new(records.iter().cloned().map(Ok)))
    }

    fn request(&self, request_id: &str) -> Result<ExportRequest, StoreError> {
        self.requests
            .get(request_id)
            .cloned()
            .ok_or_else(|| StoreError::RequestNotFound(request_id.to_string()))
    }

    fn commit_request(&mut self, request: &ExportRequest) -> Result<(), StoreError> {
        match self.requests.get_mut(&request.request_id) {
            Some(stored) => {
                *stored = request.clone();
                self.commits += 1;
                Ok(())
            }
            None => Err(StoreError::RequestNotFound(request.request_id.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_records_in_order() {
        let mut store = MemoryStore::new();
        for status in ["a", "b", "c"] {
            store.push_record(
                "r1",
                ExportRecord {
                    status: status.to_string(),
                    ..Default::default()
                },
            );
        }

        let statuses: Vec<String> = store
            .records("r1")
            .unwrap()
            .map(|r| r.unwrap().status)
            .collect();
        assert_eq!(statuses, ["a", "b", "c"]);
        assert_eq!(store.records("other").unwrap().count(), 0);
    }

    #[test]
    fn test_memory_store_commit() {
        let mut store = MemoryStore::new();
        store.insert_request(ExportRequest::new("r1", "completed"));

        let mut request = store.request("r1").unwrap();
        request.set_status("failed");
        store.commit_request(&request).unwrap();

        assert_eq!(store.status("r1"), Some("failed"));
        assert_eq!(store.commits(), 1);
    }

    #[test]
    fn test_memory_store_unknown_request() {
        let mut store = MemoryStore::new();
        assert!(matches!(
            store.request("nope"),
            Err(StoreError::RequestNotFound(_))
        ));
        assert!(store.commit_request(&ExportRequest::new("nope", "x")).is_err());
    }
}
