//! Exporters serialize a resource collection to a downloadable file.
//!
//! Each exportable resource has exactly one designated exporter, identified by
//! [`ExporterId`]. The [`ExporterRegistry`] is built once at startup and looked
//! up by the Export header action.

mod csv;

use std::collections::HashMap;
use std::sync::Arc;

use freight_admin_db::Record;
use serde::Serialize;

pub use self::csv::CsvExporter;
use crate::panel::Resource;

/// Named exporter types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ExporterId {
    #[serde(rename = "CarbonFootprintExporter")]
    CarbonFootprint,
    #[serde(rename = "CompanyExporter")]
    Company,
    #[serde(rename = "InvoiceExporter")]
    Invoice,
    #[serde(rename = "PaymentTransactionExporter")]
    PaymentTransaction,
    #[serde(rename = "ShipmentExporter")]
    Shipment,
    #[serde(rename = "TenderExporter")]
    Tender,
    #[serde(rename = "TenderBidExporter")]
    TenderBid,
}

impl ExporterId {
    pub const ALL: [Self; 7] = [
        Self::CarbonFootprint,
        Self::Company,
        Self::Invoice,
        Self::PaymentTransaction,
        Self::Shipment,
        Self::Tender,
        Self::TenderBid,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::CarbonFootprint => "CarbonFootprintExporter",
            Self::Company => "CompanyExporter",
            Self::Invoice => "InvoiceExporter",
            Self::PaymentTransaction => "PaymentTransactionExporter",
            Self::Shipment => "ShipmentExporter",
            Self::Tender => "TenderExporter",
            Self::TenderBid => "TenderBidExporter",
        }
    }

    /// Resource whose collection this exporter serializes.
    #[must_use]
    pub const fn resource(self) -> Resource {
        match self {
            Self::CarbonFootprint => Resource::CarbonFootprint,
            Self::Company => Resource::Company,
            Self::Invoice => Resource::Invoice,
            Self::PaymentTransaction => Resource::PaymentTransaction,
            Self::Shipment => Resource::Shipment,
            Self::Tender => Resource::Tender,
            Self::TenderBid => Resource::TenderBid,
        }
    }

    /// Exported columns, in file order.
    #[must_use]
    pub const fn columns(self) -> &'static [ExportColumn] {
        match self {
            Self::CarbonFootprint => &[
                ExportColumn { name: "id", label: "ID" },
                ExportColumn { name: "shipment_id", label: "Shipment" },
                ExportColumn { name: "transport_mode", label: "Transport mode" },
                ExportColumn { name: "distance_km", label: "Distance (km)" },
                ExportColumn { name: "co2e_kg", label: "CO2e (kg)" },
                ExportColumn { name: "calculated_on", label: "Calculated on" },
            ],
            Self::Company => &[
                ExportColumn { name: "id", label: "ID" },
                ExportColumn { name: "name", label: "Name" },
                ExportColumn { name: "vat_number", label: "VAT number" },
                ExportColumn { name: "country_code", label: "Country" },
                ExportColumn { name: "email", label: "Email" },
                ExportColumn { name: "verified", label: "Verified" },
                ExportColumn { name: "created_at", label: "Created at" },
            ],
            Self::Invoice => &[
                ExportColumn { name: "id", label: "ID" },
                ExportColumn { name: "number", label: "Number" },
                ExportColumn { name: "company_id", label: "Company" },
                ExportColumn { name: "amount", label: "Amount" },
                ExportColumn { name: "currency", label: "Currency" },
                ExportColumn { name: "status", label: "Status" },
                ExportColumn { name: "due_on", label: "Due on" },
                ExportColumn { name: "created_at", label: "Created at" },
            ],
            Self::PaymentTransaction => &[
                ExportColumn { name: "id", label: "ID" },
                ExportColumn { name: "invoice_id", label: "Invoice" },
                ExportColumn { name: "amount", label: "Amount" },
                ExportColumn { name: "currency", label: "Currency" },
                ExportColumn { name: "provider", label: "Provider" },
                ExportColumn { name: "status", label: "Status" },
                ExportColumn { name: "created_at", label: "Created at" },
            ],
            Self::Shipment => &[
                ExportColumn { name: "id", label: "ID" },
                ExportColumn { name: "reference", label: "Reference" },
                ExportColumn { name: "origin", label: "Origin" },
                ExportColumn { name: "destination", label: "Destination" },
                ExportColumn { name: "weight_kg", label: "Weight (kg)" },
                ExportColumn { name: "status", label: "Status" },
                ExportColumn { name: "pickup_on", label: "Pickup on" },
                ExportColumn { name: "created_at", label: "Created at" },
            ],
            Self::Tender => &[
                ExportColumn { name: "id", label: "ID" },
                ExportColumn { name: "title", label: "Title" },
                ExportColumn { name: "status", label: "Status" },
                ExportColumn { name: "budget", label: "Budget" },
                ExportColumn { name: "closes_on", label: "Closes on" },
                ExportColumn { name: "created_at", label: "Created at" },
            ],
            Self::TenderBid => &[
                ExportColumn { name: "id", label: "ID" },
                ExportColumn { name: "tender_id", label: "Tender" },
                ExportColumn { name: "company_id", label: "Company" },
                ExportColumn { name: "amount", label: "Amount" },
                ExportColumn { name: "currency", label: "Currency" },
                ExportColumn { name: "created_at", label: "Created at" },
            ],
        }
    }
}

impl std::fmt::Display for ExporterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A column in an export file: record key and header label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExportColumn {
    pub name: &'static str,
    pub label: &'static str,
}

/// Export failures.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("CSV write failed: {0}")]
    Csv(#[from] ::csv::Error),
    #[error("CSV buffer flush failed: {0}")]
    Io(#[from] std::io::Error),
}

/// A downloadable file produced by an exporter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Serializes a resource collection into a file.
pub trait Exporter: Send + Sync {
    fn id(&self) -> ExporterId;

    /// Render `records` with the given base file name (no extension).
    ///
    /// # Errors
    /// Returns `ExportError` when the writer fails.
    fn export(&self, base_name: &str, records: &[Record]) -> Result<ExportFile, ExportError>;
}

/// Exporters keyed by id. Immutable after construction.
#[derive(Clone)]
pub struct ExporterRegistry {
    exporters: HashMap<ExporterId, Arc<dyn Exporter>>,
}

impl ExporterRegistry {
    /// Registry with a CSV exporter for every exporter id.
    #[must_use]
    pub fn new() -> Self {
        let exporters = ExporterId::ALL
            .into_iter()
            .map(|id| (id, Arc::new(CsvExporter::new(id)) as Arc<dyn Exporter>))
            .collect();
        Self { exporters }
    }

    #[must_use]
    pub fn get(&self, id: ExporterId) -> Option<Arc<dyn Exporter>> {
        self.exporters.get(&id).cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.exporters.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.exporters.is_empty()
    }
}

impl Default for ExporterRegistry {
    fn default() -> Self {
        Self::new()
    }
}
