//! CSV exporter.

use freight_admin_db::Record;
use serde_json::Value;

use super::{ExportError, ExportFile, Exporter, ExporterId};

/// Writes the exporter's columns as a CSV file with a header row.
#[derive(Debug, Clone, Copy)]
pub struct CsvExporter {
    id: ExporterId,
}

impl CsvExporter {
    #[must_use]
    pub const fn new(id: ExporterId) -> Self {
        Self { id }
    }
}

/// Render a JSON value as a CSV cell.
fn cell(value: Option<Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s,
        Some(Value::Bool(b)) => if b { "yes" } else { "no" }.to_string(),
        Some(other) => other.to_string(),
    }
}

impl Exporter for CsvExporter {
    fn id(&self) -> ExporterId {
        self.id
    }

    fn export(&self, base_name: &str, records: &[Record]) -> Result<ExportFile, ExportError> {
        let columns = self.id.columns();
        let mut writer = csv::Writer::from_writer(Vec::new());

        writer.write_record(columns.iter().map(|c| c.label))?;
        for record in records {
            writer.write_record(columns.iter().map(|c| cell(record.value(c.name))))?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| ExportError::Io(e.into_error()))?;

        Ok(ExportFile {
            file_name: format!("{base_name}.csv"),
            content_type: "text/csv; charset=utf-8",
            bytes,
        })
    }
}
