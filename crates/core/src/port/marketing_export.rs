// Marketing Export Port
// Receives contact details of customers who opted into marketing

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Row appended to the marketing list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketingRecord {
    pub name: String,
    pub phone: String,
    /// RFC 3339 check-in time
    pub timestamp: String,
}

/// Export errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExportError {
    #[error("Invalid sheet URL: {0}")]
    InvalidTarget(String),

    #[error("Export not configured")]
    NotConfigured,

    #[error("Append failed: {0}")]
    AppendFailed(String),
}

/// Marketing export trait
///
/// Only called for customers with marketing consent. Failures are logged by
/// the caller and never block a check-in.
#[async_trait]
pub trait MarketingExport: Send + Sync {
    async fn append(&self, record: &MarketingRecord) -> Result<(), ExportError>;

    /// Send later records to `target` instead. Invalid targets are rejected
    /// and the current one is kept.
    fn retarget(&self, target: &str) -> Result<(), ExportError>;
}

pub mod mocks {
    use super::*;
    use std::sync::Mutex;

    /// Recording export, optionally failing every call
    pub struct MockMarketingExport {
        fail_with: Option<ExportError>,
        records: Mutex<Vec<MarketingRecord>>,
        target: Mutex<Option<String>>,
    }

    impl MockMarketingExport {
        pub fn new_success() -> Self {
            Self {
                fail_with: None,
                records: Mutex::new(Vec::new()),
                target: Mutex::new(None),
            }
        }

        pub fn new_fail(error: ExportError) -> Self {
            Self {
                fail_with: Some(error),
                ..Self::new_success()
            }
        }

        /// Last accepted target
        pub fn target(&self) -> Option<String> {
            self.target.lock().unwrap().clone()
        }

        /// Records received, including those whose append failed
        pub fn records(&self) -> Vec<MarketingRecord> {
            self.records.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl MarketingExport for MockMarketingExport {
        async fn append(&self, record: &MarketingRecord) -> Result<(), ExportError> {
            self.records.lock().unwrap().push(record.clone());
            match &self.fail_with {
                Some(err) => Err(err.clone()),
                None => Ok(()),
            }
        }

        fn retarget(&self, target: &str) -> Result<(), ExportError> {
            if let Some(err) = &self.fail_with {
                return Err(err.clone());
            }
            *self.target.lock().unwrap() = Some(target.to_string());
            Ok(())
        }
    }
}
