//! Failure taxonomy for export invocations
//!
//! A failed export never surfaces as an error to the caller. It is classified
//! into one of the kinds below and persisted as the request status.

use std::fmt;
use std::io;

use super::kinds::ExportError;

/// Classified reason an export invocation failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFailure {
    /// Permission denied while creating the directory or the file
    DiskPermission,
    /// Out of disk space while writing
    DiskSpace,
    /// Any other I/O failure
    UnknownIo,
    /// Everything else: parse failures, template errors, store errors
    UnknownException,
}

impl ExportFailure {
    /// Classify an export error
    ///
    /// # Arguments
    /// * `err` - Error raised while writing the export
    ///
    /// # Returns
    /// * `ExportFailure` - Failure kind to record on the request
    pub fn classify(err: &ExportError) -> Self {
        match err {
            ExportError::Io(e) => match e.kind() {
                io::ErrorKind::PermissionDenied => ExportFailure::DiskPermission,
                io::ErrorKind::StorageFull => ExportFailure::DiskSpace,
                _ => ExportFailure::UnknownIo,
            },
            _ => ExportFailure::UnknownException,
        }
    }

    /// Status code persisted on the export request
    pub fn status_code(&self) -> &'static str {
        match self {
            ExportFailure::DiskPermission => "error_creating_download_disk_permission_error",
            ExportFailure::DiskSpace => "error_creating_download_disk_space_error",
            ExportFailure::UnknownIo => "error_creating_download_unknown_io_error",
            ExportFailure::UnknownException => "error_creating_download_unknown_exception",
        }
    }
}

impl fmt::Display for ExportFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.status_code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{StoreError, TemplateError};

    fn io_err(kind: io::ErrorKind) -> ExportError {
        ExportError::Io(io::Error::from(kind))
    }

    #[test]
    fn test_classify_io_errors() {
        assert_eq!(
            ExportFailure::classify(&io_err(io::ErrorKind::PermissionDenied)),
            ExportFailure::DiskPermission
        );
        assert_eq!(
            ExportFailure::classify(&io_err(io::ErrorKind::StorageFull)),
            ExportFailure::DiskSpace
        );
        assert_eq!(
            ExportFailure::classify(&io_err(io::ErrorKind::BrokenPipe)),
            ExportFailure::UnknownIo
        );
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_classify_enospc() {
        // ENOSPC
        let err = ExportError::Io(io::Error::from_raw_os_error(28));
        assert_eq!(ExportFailure::classify(&err), ExportFailure::DiskSpace);
    }

    #[test]
    fn test_classify_non_io_errors() {
        let err = ExportError::from(TemplateError::NotAnObject);
        assert_eq!(ExportFailure::classify(&err), ExportFailure::UnknownException);

        let err = ExportError::from(StoreError::RequestNotFound("r1".to_string()));
        assert_eq!(ExportFailure::classify(&err), ExportFailure::UnknownException);

        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = ExportError::from(json_err);
        assert_eq!(ExportFailure::classify(&err), ExportFailure::UnknownException);
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ExportFailure::DiskSpace.to_string(),
            "error_creating_download_disk_space_error"
        );
        assert_eq!(
            ExportFailure::UnknownIo.status_code(),
            "error_creating_download_unknown_io_error"
        );
        assert_eq!(
            ExportFailure::UnknownException.status_code(),
            "error_creating_download_unknown_exception"
        );
    }
}
