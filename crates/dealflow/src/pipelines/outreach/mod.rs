//! Outreach drafting: prices every lead, classifies it, and drafts the
//! first SMS touch.
//!
//! The offer basis is decided once per run from the headers. When the input
//! already carries an offer column the pipeline trusts it row by row; when
//! it only has a value column the offer is derived from value and size. The
//! two branches treat bad cells differently on purpose: a non-numeric cell
//! under an offer column means "no offer here", while a non-numeric value
//! cell prices as zero and sinks the row to ASK_CONDITION on arithmetic.

mod message;
mod offer;
mod phone;

pub use offer::{classify, OfferAction, OfferBasis, OfferRules};
pub use phone::normalize_phone;

use crate::columns::{Binding, ColumnRole, SchemaError};
use crate::config::LoadConfig;
use crate::pipelines::cell;
use crate::table::writer::{self, WriteError};
use crate::table::{LeadTable, TableError, TableOrigin};
use std::path::Path;
use tracing::{info, warn};

/// Column order of the outreach export.
pub const EXPORT_HEADERS: [&str; 6] = [
    "Owner_Name",
    "Property_Address",
    "Phone",
    "Offer_Proxy",
    "Action",
    "Message_Draft",
];

#[derive(Debug, thiserror::Error)]
pub enum OutreachError {
    #[error(transparent)]
    Table(#[from] TableError),
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error(transparent)]
    Write(#[from] WriteError),
}

/// Where each row's offer figure will come from, fixed at resolution time.
#[derive(Debug, Clone)]
enum OfferSource {
    Existing { offer: Binding },
    Heuristic { value: Binding, sqft: Option<Binding> },
}

/// The input columns this run reads. Owner and address are mandatory;
/// phone is optional and the export cell stays blank without it.
#[derive(Debug, Clone)]
pub struct OutreachBindings {
    pub owner: Binding,
    pub address: Binding,
    pub phone: Option<Binding>,
    offer_source: OfferSource,
}

impl OutreachBindings {
    fn resolve(headers: &[String]) -> Result<Self, SchemaError> {
        let owner = ColumnRole::Owner
            .bind(headers)
            .ok_or_else(|| SchemaError::for_role("owner", headers))?;
        let address = ColumnRole::Address
            .bind(headers)
            .ok_or_else(|| SchemaError::for_role("address", headers))?;
        let phone = ColumnRole::Phone.bind(headers);

        let offer_source = if let Some(offer) = ColumnRole::Offer.bind(headers) {
            OfferSource::Existing { offer }
        } else if let Some(value) = ColumnRole::Value.bind(headers) {
            OfferSource::Heuristic {
                value,
                sqft: ColumnRole::Sqft.bind(headers),
            }
        } else {
            return Err(SchemaError::for_role("offer or value", headers));
        };

        Ok(Self {
            owner,
            address,
            phone,
            offer_source,
        })
    }

    pub fn basis(&self) -> OfferBasis {
        match self.offer_source {
            OfferSource::Existing { .. } => OfferBasis::Existing,
            OfferSource::Heuristic { .. } => OfferBasis::Heuristic,
        }
    }
}

/// One processed lead, ready for the export file.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLead {
    pub owner_name: String,
    pub property_address: String,
    pub phone: String,
    pub offer_proxy: Option<f64>,
    pub action: OfferAction,
    pub message_draft: String,
}

impl ResolvedLead {
    /// Missing offers export as an empty cell, never as a zero.
    pub fn export_row(&self) -> Vec<String> {
        vec![
            self.owner_name.clone(),
            self.property_address.clone(),
            self.phone.clone(),
            self.offer_proxy
                .map(|amount| amount.to_string())
                .unwrap_or_default(),
            self.action.label().to_string(),
            self.message_draft.clone(),
        ]
    }
}

/// Everything a run produced, kept in input row order.
#[derive(Debug)]
pub struct OutreachRun {
    pub origin: TableOrigin,
    pub bindings: OutreachBindings,
    pub leads: Vec<ResolvedLead>,
}

impl OutreachRun {
    pub fn send_offer_count(&self) -> usize {
        self.leads
            .iter()
            .filter(|lead| lead.action == OfferAction::SendOffer)
            .count()
    }

    pub fn write_csv(&self, path: &Path) -> Result<(), WriteError> {
        let headers: Vec<String> = EXPORT_HEADERS.iter().map(|h| h.to_string()).collect();
        let rows: Vec<Vec<String>> = self.leads.iter().map(ResolvedLead::export_row).collect();
        writer::write_csv(path, &headers, &rows)
    }
}

#[derive(Debug, Clone, Default)]
pub struct OutreachPipeline {
    rules: OfferRules,
}

impl OutreachPipeline {
    pub fn new(rules: OfferRules) -> Self {
        Self { rules }
    }

    /// Loads, processes, and exports in one step.
    pub fn run_file(
        &self,
        input: &Path,
        output: &Path,
        load: &LoadConfig,
    ) -> Result<OutreachRun, OutreachError> {
        let table = LeadTable::from_path(input, load)?;
        let run = self.process(&table)?;
        run.write_csv(output)?;
        Ok(run)
    }

    /// Resolves columns and drafts a message per row. Row order and count
    /// are preserved: every input row yields exactly one lead.
    pub fn process(&self, table: &LeadTable) -> Result<OutreachRun, OutreachError> {
        let bindings = OutreachBindings::resolve(table.headers())?;

        match &bindings.phone {
            Some(binding) => info!(
                owner = %bindings.owner.header,
                address = %bindings.address.header,
                phone = %binding.header,
                basis = bindings.basis().describe(),
                "outreach columns resolved"
            ),
            None => warn!("no phone column detected; export will leave the Phone cell blank"),
        }

        let leads: Vec<ResolvedLead> = table
            .rows()
            .iter()
            .map(|row| self.lead_from_row(row, &bindings))
            .collect();

        let run = OutreachRun {
            origin: table.origin().clone(),
            bindings,
            leads,
        };
        info!(
            rows = run.leads.len(),
            send_offer = run.send_offer_count(),
            "outreach drafting complete"
        );

        Ok(run)
    }

    fn lead_from_row(&self, row: &[String], bindings: &OutreachBindings) -> ResolvedLead {
        let owner_name = cell(row, bindings.owner.index).trim().to_string();
        let property_address = cell(row, bindings.address.index).trim().to_string();
        let phone = match &bindings.phone {
            Some(binding) => normalize_phone(cell(row, binding.index)),
            None => String::new(),
        };

        let offer_proxy = match &bindings.offer_source {
            OfferSource::Existing { offer } => offer::existing_offer(cell(row, offer.index)),
            OfferSource::Heuristic { value, sqft } => Some(offer::heuristic_offer(
                cell(row, value.index),
                sqft.as_ref().map(|binding| cell(row, binding.index)),
                &self.rules,
            )),
        };

        let action = classify(offer_proxy, &self.rules);
        let message_draft = match (action, offer_proxy) {
            (OfferAction::SendOffer, Some(amount)) => {
                message::send_offer_draft(&owner_name, &property_address, amount)
            }
            _ => message::ask_condition_draft(&owner_name, &property_address),
        };

        ResolvedLead {
            owner_name,
            property_address,
            phone,
            offer_proxy,
            action,
            message_draft,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn table_from(csv: &str) -> LeadTable {
        LeadTable::from_reader(Cursor::new(csv), &LoadConfig::default()).expect("table parses")
    }

    fn process(csv: &str) -> OutreachRun {
        OutreachPipeline::default()
            .process(&table_from(csv))
            .expect("pipeline runs")
    }

    #[test]
    fn heuristic_prices_each_row_from_value_and_sqft() {
        let run = process(
            "Owner Name,Property Address,Phone,Est Value,Building Sqft\n\
             Maria,12 Oak St,5551234567,150000,2000\n\
             James,9 Elm St,5550000001,400000,1000\n",
        );

        assert_eq!(run.bindings.basis(), OfferBasis::Heuristic);
        // 150000 * 0.70 - 2000 * 25 - 10000
        assert_eq!(run.leads[0].offer_proxy, Some(45_000.0));
        assert_eq!(run.leads[0].action, OfferAction::AskCondition);
        // 400000 * 0.70 - 1000 * 25 - 10000
        assert_eq!(run.leads[1].offer_proxy, Some(245_000.0));
        assert_eq!(run.leads[1].action, OfferAction::SendOffer);
        assert!(run.leads[1].message_draft.contains("$245,000"));
    }

    #[test]
    fn existing_offer_column_wins_over_value() {
        let run = process(
            "Owner Name,Property Address,MAO,Est Value\n\
             Maria,12 Oak St,95000,500000\n",
        );

        assert_eq!(run.bindings.basis(), OfferBasis::Existing);
        assert_eq!(run.leads[0].offer_proxy, Some(95_000.0));
        assert_eq!(run.leads[0].action, OfferAction::SendOffer);
    }

    #[test]
    fn non_numeric_offer_cell_misses_only_its_own_row() {
        let run = process(
            "Owner Name,Property Address,Offer\n\
             Maria,12 Oak St,95000\n\
             James,9 Elm St,TBD\n\
             Lena,3 Pine Rd,81000\n",
        );

        assert_eq!(run.leads[0].offer_proxy, Some(95_000.0));
        assert_eq!(run.leads[1].offer_proxy, None);
        assert_eq!(run.leads[1].action, OfferAction::AskCondition);
        assert_eq!(run.leads[2].offer_proxy, Some(81_000.0));
    }

    #[test]
    fn offer_at_the_threshold_sends() {
        // 200000 * 0.70 - 2000 * 25 - 10000 lands exactly on 80000.
        let run = process(
            "Owner Name,Property Address,Est Value,Sqft\n\
             Maria,12 Oak St,200000,2000\n",
        );

        assert_eq!(run.leads[0].offer_proxy, Some(80_000.0));
        assert_eq!(run.leads[0].action, OfferAction::SendOffer);
    }

    #[test]
    fn value_without_sqft_uses_the_fallback_repair_ratio() {
        let run = process(
            "Owner Name,Property Address,Est Value\n\
             Maria,12 Oak St,200000\n",
        );

        // 200000 * 0.70 - 200000 * 0.30 - 10000
        assert_eq!(run.leads[0].offer_proxy, Some(70_000.0));
    }

    #[test]
    fn missing_owner_column_is_a_schema_error() {
        let table = table_from("Property Address,Est Value\n12 Oak St,150000\n");
        let err = OutreachPipeline::default()
            .process(&table)
            .expect_err("owner is mandatory");

        match err {
            OutreachError::Schema(schema) => {
                assert_eq!(schema.role, "owner");
                assert!(schema.available.contains(&"Est Value".to_string()));
            }
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn missing_offer_and_value_is_a_schema_error() {
        let table = table_from("Owner Name,Property Address\nMaria,12 Oak St\n");
        let err = OutreachPipeline::default()
            .process(&table)
            .expect_err("some pricing column is mandatory");

        match err {
            OutreachError::Schema(schema) => assert_eq!(schema.role, "offer or value"),
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn absent_phone_column_leaves_the_cell_blank() {
        let run = process(
            "Owner Name,Property Address,Est Value\n\
             Maria,12 Oak St,400000\n",
        );

        assert!(run.bindings.phone.is_none());
        assert_eq!(run.leads[0].phone, "");
        assert_eq!(run.leads[0].export_row()[2], "");
    }

    #[test]
    fn blank_owner_cell_greets_there() {
        let run = process(
            "Owner Name,Property Address,Est Value\n\
             ,12 Oak St,150000\n",
        );

        assert!(run.leads[0].message_draft.starts_with("Hi there,"));
    }

    #[test]
    fn rows_keep_input_order_and_count() {
        let run = process(
            "Owner Name,Property Address,Est Value\n\
             First,1 A St,100000\n\
             Second,2 B St,100000\n\
             Third,3 C St,100000\n",
        );

        let owners: Vec<&str> = run
            .leads
            .iter()
            .map(|lead| lead.owner_name.as_str())
            .collect();
        assert_eq!(owners, ["First", "Second", "Third"]);
    }

    #[test]
    fn export_rows_follow_the_header_order() {
        let run = process(
            "Owner Name,Property Address,Phone,MAO\n\
             Maria,12 Oak St,8325550101,TBD\n",
        );

        let row = run.leads[0].export_row();
        assert_eq!(row.len(), EXPORT_HEADERS.len());
        assert_eq!(row[0], "Maria");
        assert_eq!(row[1], "12 Oak St");
        assert_eq!(row[2], "(832) 555-0101");
        assert_eq!(row[3], "");
        assert_eq!(row[4], "ASK_CONDITION");
        assert!(row[5].starts_with("Hi Maria,"));
    }

    #[test]
    fn send_offer_count_tallies_actions() {
        let run = process(
            "Owner Name,Property Address,Offer\n\
             A,1 A St,95000\n\
             B,2 B St,10000\n\
             C,3 C St,80000\n",
        );

        assert_eq!(run.send_offer_count(), 2);
    }
}
