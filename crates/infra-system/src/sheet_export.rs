// Marketing sheet export
// Validates the sheet URL and records consenting contacts in the log.
// The URL can be swapped while the desk is running.
// No spreadsheet protocol is spoken; the sheet itself is owned elsewhere.
use std::sync::RwLock;

use async_trait::async_trait;
use tracing::info;

use walkin_core::port::marketing_export::{ExportError, MarketingExport, MarketingRecord};

const SPREADSHEET_PATH_MARKER: &str = "/spreadsheets/d/";

/// Extract the spreadsheet id from a sheet URL
/// (`https://docs.google.com/spreadsheets/d/<id>/edit`)
pub fn extract_spreadsheet_id(url: &str) -> Option<&str> {
    let start = url.find(SPREADSHEET_PATH_MARKER)? + SPREADSHEET_PATH_MARKER.len();
    let rest = &url[start..];
    let end = rest
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
        .unwrap_or(rest.len());

    if end == 0 {
        None
    } else {
        Some(&rest[..end])
    }
}

/// Marketing export writing to a sheet URL that staff can change at runtime
pub struct SheetMarketingExport {
    sheet_url: RwLock<Option<String>>,
}

impl SheetMarketingExport {
    pub fn new(sheet_url: Option<String>) -> Self {
        Self {
            sheet_url: RwLock::new(sheet_url.filter(|u| !u.trim().is_empty())),
        }
    }

    /// Spreadsheet the next row goes to
    pub fn destination(&self) -> Result<String, ExportError> {
        let guard = self.sheet_url.read().unwrap_or_else(|e| e.into_inner());
        let url = guard.as_deref().ok_or(ExportError::NotConfigured)?;
        extract_spreadsheet_id(url)
            .map(str::to_string)
            .ok_or_else(|| ExportError::InvalidTarget(url.to_string()))
    }
}

#[async_trait]
impl MarketingExport for SheetMarketingExport {
    async fn append(&self, record: &MarketingRecord) -> Result<(), ExportError> {
        let spreadsheet_id = self.destination()?;

        let row = serde_json::to_string(record)
            .map_err(|e| ExportError::AppendFailed(e.to_string()))?;

        info!(spreadsheet_id = %spreadsheet_id, row = %row, "Marketing contact recorded");
        Ok(())
    }

    fn retarget(&self, target: &str) -> Result<(), ExportError> {
        if extract_spreadsheet_id(target).is_none() {
            return Err(ExportError::InvalidTarget(target.to_string()));
        }
        *self.sheet_url.write().unwrap_or_else(|e| e.into_inner()) = Some(target.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> MarketingRecord {
        MarketingRecord {
            name: "Ana".to_string(),
            phone: "555-0100".to_string(),
            timestamp: "2026-10-15T09:00:00+00:00".to_string(),
        }
    }

    #[test]
    fn test_extract_spreadsheet_id() {
        assert_eq!(
            extract_spreadsheet_id("https://docs.google.com/spreadsheets/d/1AbC-d_9/edit#gid=0"),
            Some("1AbC-d_9")
        );
        assert_eq!(
            extract_spreadsheet_id("https://docs.google.com/spreadsheets/d/xyz"),
            Some("xyz")
        );
        assert_eq!(extract_spreadsheet_id("https://example.com/sheet"), None);
        assert_eq!(
            extract_spreadsheet_id("https://docs.google.com/spreadsheets/d//edit"),
            None
        );
    }

    #[tokio::test]
    async fn test_append_requires_configuration() {
        let export = SheetMarketingExport::new(Some("  ".to_string()));
        assert_eq!(export.append(&record()).await, Err(ExportError::NotConfigured));
    }

    #[tokio::test]
    async fn test_append_rejects_invalid_url() {
        let export = SheetMarketingExport::new(Some("https://example.com".to_string()));
        assert!(matches!(
            export.append(&record()).await,
            Err(ExportError::InvalidTarget(_))
        ));
    }

    #[tokio::test]
    async fn test_append_accepts_valid_sheet() {
        let export = SheetMarketingExport::new(Some(
            "https://docs.google.com/spreadsheets/d/abc123/edit".to_string(),
        ));
        assert!(export.append(&record()).await.is_ok());
        assert_eq!(export.destination(), Ok("abc123".to_string()));
    }

    #[tokio::test]
    async fn test_retarget_moves_later_rows_to_new_sheet() {
        let export = SheetMarketingExport::new(Some(
            "https://docs.google.com/spreadsheets/d/old-sheet/edit".to_string(),
        ));

        export
            .retarget("https://docs.google.com/spreadsheets/d/new-sheet/edit#gid=0")
            .unwrap();

        assert_eq!(export.destination(), Ok("new-sheet".to_string()));
        assert!(export.append(&record()).await.is_ok());
    }

    #[tokio::test]
    async fn test_retarget_configures_unset_export() {
        let export = SheetMarketingExport::new(None);
        assert_eq!(export.append(&record()).await, Err(ExportError::NotConfigured));

        export
            .retarget("https://docs.google.com/spreadsheets/d/first/edit")
            .unwrap();
        assert!(export.append(&record()).await.is_ok());
    }

    #[test]
    fn test_retarget_rejects_invalid_url_and_keeps_current() {
        let export = SheetMarketingExport::new(Some(
            "https://docs.google.com/spreadsheets/d/keep-me/edit".to_string(),
        ));

        assert_eq!(
            export.retarget("https://example.com/sheet"),
            Err(ExportError::InvalidTarget("https://example.com/sheet".to_string()))
        );
        assert_eq!(export.destination(), Ok("keep-me".to_string()));
    }
}
