//! Resource descriptors for every marketplace entity managed by the panel.

use freight_admin_core::{Rule, RuleSet};
use serde::Serialize;

use crate::export::ExporterId;

const CURRENCIES: &[&str] = &["EUR", "USD", "GBP", "CHF", "PLN"];

/// A form field: name, label and validation rules.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Field {
    pub name: &'static str,
    pub label: &'static str,
    pub rules: &'static [Rule],
}

impl Field {
    const fn new(name: &'static str, label: &'static str, rules: &'static [Rule]) -> Self {
        Self { name, label, rules }
    }

    #[must_use]
    pub fn is_required(&self) -> bool {
        self.rules.contains(&Rule::Required)
    }
}

/// Entity types managed through generated CRUD pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Resource {
    CarbonFootprint,
    Company,
    DrivingBan,
    InsuranceQuote,
    Invoice,
    LexiconArticle,
    PaymentTransaction,
    Shipment,
    Tender,
    TenderBid,
    Warehouse,
}

impl Resource {
    pub const ALL: [Self; 11] = [
        Self::CarbonFootprint,
        Self::Company,
        Self::DrivingBan,
        Self::InsuranceQuote,
        Self::Invoice,
        Self::LexiconArticle,
        Self::PaymentTransaction,
        Self::Shipment,
        Self::Tender,
        Self::TenderBid,
        Self::Warehouse,
    ];

    /// URL segment and storage key.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::CarbonFootprint => "carbon-footprints",
            Self::Company => "companies",
            Self::DrivingBan => "driving-bans",
            Self::InsuranceQuote => "insurance-quotes",
            Self::Invoice => "invoices",
            Self::LexiconArticle => "lexicon-articles",
            Self::PaymentTransaction => "payment-transactions",
            Self::Shipment => "shipments",
            Self::Tender => "tenders",
            Self::TenderBid => "tender-bids",
            Self::Warehouse => "warehouses",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::CarbonFootprint => "Carbon Footprint",
            Self::Company => "Company",
            Self::DrivingBan => "Driving Ban",
            Self::InsuranceQuote => "Insurance Quote",
            Self::Invoice => "Invoice",
            Self::LexiconArticle => "Lexicon Article",
            Self::PaymentTransaction => "Payment Transaction",
            Self::Shipment => "Shipment",
            Self::Tender => "Tender",
            Self::TenderBid => "Tender Bid",
            Self::Warehouse => "Warehouse",
        }
    }

    #[must_use]
    pub const fn plural_label(self) -> &'static str {
        match self {
            Self::CarbonFootprint => "Carbon Footprints",
            Self::Company => "Companies",
            Self::DrivingBan => "Driving Bans",
            Self::InsuranceQuote => "Insurance Quotes",
            Self::Invoice => "Invoices",
            Self::LexiconArticle => "Lexicon Articles",
            Self::PaymentTransaction => "Payment Transactions",
            Self::Shipment => "Shipments",
            Self::Tender => "Tenders",
            Self::TenderBid => "Tender Bids",
            Self::Warehouse => "Warehouses",
        }
    }

    /// Exporter designated for this resource, if it supports export.
    #[must_use]
    pub const fn exporter(self) -> Option<ExporterId> {
        match self {
            Self::CarbonFootprint => Some(ExporterId::CarbonFootprint),
            Self::Company => Some(ExporterId::Company),
            Self::Invoice => Some(ExporterId::Invoice),
            Self::PaymentTransaction => Some(ExporterId::PaymentTransaction),
            Self::Shipment => Some(ExporterId::Shipment),
            Self::Tender => Some(ExporterId::Tender),
            Self::TenderBid => Some(ExporterId::TenderBid),
            Self::DrivingBan | Self::InsuranceQuote | Self::LexiconArticle | Self::Warehouse => {
                None
            }
        }
    }

    /// Form fields in display order.
    #[must_use]
    pub const fn fields(self) -> &'static [Field] {
        match self {
            Self::CarbonFootprint => CARBON_FOOTPRINT,
            Self::Company => COMPANY,
            Self::DrivingBan => DRIVING_BAN,
            Self::InsuranceQuote => INSURANCE_QUOTE,
            Self::Invoice => INVOICE,
            Self::LexiconArticle => LEXICON_ARTICLE,
            Self::PaymentTransaction => PAYMENT_TRANSACTION,
            Self::Shipment => SHIPMENT,
            Self::Tender => TENDER,
            Self::TenderBid => TENDER_BID,
            Self::Warehouse => WAREHOUSE,
        }
    }

    /// Field that titles a record on its edit page.
    #[must_use]
    pub const fn title_field(self) -> &'static str {
        self.fields()[0].name
    }

    /// Validation rules derived from the form fields.
    #[must_use]
    pub fn rules(self) -> RuleSet {
        self.fields()
            .iter()
            .fold(RuleSet::new(), |set, f| set.field(f.name, f.rules))
    }
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

const CARBON_FOOTPRINT: &[Field] = &[
    Field::new("shipment_id", "Shipment", &[Rule::Required, Rule::String, Rule::Max(36)]),
    Field::new("co2e_kg", "CO2e (kg)", &[Rule::Required, Rule::Numeric, Rule::Min(0)]),
    Field::new("distance_km", "Distance (km)", &[Rule::Nullable, Rule::Numeric, Rule::Min(0)]),
    Field::new(
        "transport_mode",
        "Transport mode",
        &[Rule::Required, Rule::In(&["road", "rail", "sea", "air"])],
    ),
    Field::new("calculated_on", "Calculated on", &[Rule::Nullable, Rule::Date]),
];

const COMPANY: &[Field] = &[
    Field::new("name", "Name", &[Rule::Required, Rule::String, Rule::Max(255)]),
    Field::new("vat_number", "VAT number", &[Rule::Nullable, Rule::String, Rule::Max(32)]),
    Field::new(
        "country_code",
        "Country",
        &[Rule::Required, Rule::String, Rule::Min(2), Rule::Max(2)],
    ),
    Field::new("email", "Email", &[Rule::Nullable, Rule::String, Rule::Max(255)]),
    Field::new("verified", "Verified", &[Rule::Nullable, Rule::Boolean]),
];

const DRIVING_BAN: &[Field] = &[
    Field::new(
        "country_code",
        "Country",
        &[Rule::Required, Rule::String, Rule::Min(2), Rule::Max(2)],
    ),
    Field::new("region", "Region", &[Rule::Nullable, Rule::String, Rule::Max(255)]),
    Field::new("starts_on", "Starts on", &[Rule::Required, Rule::Date]),
    Field::new("ends_on", "Ends on", &[Rule::Nullable, Rule::Date]),
    Field::new("description", "Description", &[Rule::Nullable, Rule::String]),
];

const INSURANCE_QUOTE: &[Field] = &[
    Field::new("shipment_id", "Shipment", &[Rule::Required, Rule::String, Rule::Max(36)]),
    Field::new("insurer", "Insurer", &[Rule::Required, Rule::String, Rule::Max(255)]),
    Field::new("premium", "Premium", &[Rule::Required, Rule::Numeric, Rule::Min(0)]),
    Field::new("currency", "Currency", &[Rule::Required, Rule::In(CURRENCIES)]),
    Field::new("valid_until", "Valid until", &[Rule::Nullable, Rule::Date]),
];

const INVOICE: &[Field] = &[
    Field::new("number", "Number", &[Rule::Required, Rule::String, Rule::Max(64)]),
    Field::new("company_id", "Company", &[Rule::Required, Rule::String, Rule::Max(36)]),
    Field::new("amount", "Amount", &[Rule::Required, Rule::Numeric]),
    Field::new("currency", "Currency", &[Rule::Required, Rule::In(CURRENCIES)]),
    Field::new(
        "status",
        "Status",
        &[Rule::Required, Rule::In(&["draft", "issued", "paid", "cancelled"])],
    ),
    Field::new("due_on", "Due on", &[Rule::Nullable, Rule::Date]),
];

const LEXICON_ARTICLE: &[Field] = &[
    Field::new("title", "Title", &[Rule::Required, Rule::String, Rule::Max(255)]),
    Field::new("slug", "Slug", &[Rule::Required, Rule::String, Rule::Max(255)]),
    Field::new("body", "Body", &[Rule::Required, Rule::String]),
    Field::new("published", "Published", &[Rule::Nullable, Rule::Boolean]),
];

const PAYMENT_TRANSACTION: &[Field] = &[
    Field::new("invoice_id", "Invoice", &[Rule::Required, Rule::String, Rule::Max(36)]),
    Field::new("amount", "Amount", &[Rule::Required, Rule::Numeric]),
    Field::new("currency", "Currency", &[Rule::Required, Rule::In(CURRENCIES)]),
    Field::new("provider", "Provider", &[Rule::Nullable, Rule::String, Rule::Max(64)]),
    Field::new(
        "status",
        "Status",
        &[
            Rule::Required,
            Rule::In(&["pending", "completed", "failed", "refunded"]),
        ],
    ),
];

const SHIPMENT: &[Field] = &[
    Field::new("reference", "Reference", &[Rule::Required, Rule::String, Rule::Max(64)]),
    Field::new("origin", "Origin", &[Rule::Required, Rule::String, Rule::Max(255)]),
    Field::new("destination", "Destination", &[Rule::Required, Rule::String, Rule::Max(255)]),
    Field::new("weight_kg", "Weight (kg)", &[Rule::Nullable, Rule::Numeric, Rule::Min(0)]),
    Field::new(
        "status",
        "Status",
        &[
            Rule::Required,
            Rule::In(&["draft", "booked", "in_transit", "delivered", "cancelled"]),
        ],
    ),
    Field::new("pickup_on", "Pickup on", &[Rule::Nullable, Rule::Date]),
];

const TENDER: &[Field] = &[
    Field::new("title", "Title", &[Rule::Required, Rule::String, Rule::Max(255)]),
    Field::new("shipment_id", "Shipment", &[Rule::Nullable, Rule::String, Rule::Max(36)]),
    Field::new(
        "status",
        "Status",
        &[Rule::Required, Rule::In(&["open", "closed", "awarded"])],
    ),
    Field::new("budget", "Budget", &[Rule::Nullable, Rule::Numeric, Rule::Min(0)]),
    Field::new("closes_on", "Closes on", &[Rule::Nullable, Rule::Date]),
];

const TENDER_BID: &[Field] = &[
    Field::new("tender_id", "Tender", &[Rule::Required, Rule::String, Rule::Max(36)]),
    Field::new("company_id", "Company", &[Rule::Required, Rule::String, Rule::Max(36)]),
    Field::new("amount", "Amount", &[Rule::Required, Rule::Numeric, Rule::Min(0)]),
    Field::new("currency", "Currency", &[Rule::Required, Rule::In(CURRENCIES)]),
    Field::new("note", "Note", &[Rule::Nullable, Rule::String]),
];

const WAREHOUSE: &[Field] = &[
    Field::new("name", "Name", &[Rule::Required, Rule::String, Rule::Max(255)]),
    Field::new("city", "City", &[Rule::Required, Rule::String, Rule::Max(255)]),
    Field::new(
        "country_code",
        "Country",
        &[Rule::Required, Rule::String, Rule::Min(2), Rule::Max(2)],
    ),
    Field::new("capacity_m2", "Capacity (m²)", &[Rule::Nullable, Rule::Integer, Rule::Min(0)]),
];

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use serde_json::json;

    use super::*;

    #[test]
    fn slugs_are_unique_and_round_trip() {
        let slugs: HashSet<_> = Resource::ALL.iter().map(|r| r.slug()).collect();
        assert_eq!(slugs.len(), Resource::ALL.len());
        let panel = crate::panel::Panel::default();
        for resource in Resource::ALL {
            assert_eq!(panel.resource(resource.slug()), Some(resource));
        }
        assert_eq!(panel.resource("users"), None);
    }

    #[test]
    fn every_resource_has_a_required_title_field() {
        for resource in Resource::ALL {
            let first = resource.fields()[0];
            assert_eq!(resource.title_field(), first.name);
            assert!(first.is_required(), "{resource} title must be required");
        }
    }

    #[test]
    fn rules_follow_field_definitions() {
        let rules = Resource::Shipment.rules();
        let input = json!({
            "reference": "SHP-2041",
            "origin": "Rotterdam",
            "destination": "Milan",
            "status": "teleported",
        });
        let errors = rules.validate(input.as_object().unwrap()).unwrap_err();
        assert!(errors.has("status"));
        assert_eq!(errors.len(), 1);
    }
}
