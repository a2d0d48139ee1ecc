//! Quotation form <-> ERP `Quotation` document.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{present, DocumentIdentity, MappingContext};
use crate::calendar::{LineItem, LineItemInput};
use crate::error::MappingError;
use crate::format::erp_date;
use crate::resolver::ResolverIndex;

/// Quotation form values as the UI submits them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotationForm {
    #[serde(default)]
    pub erp_name: Option<String>,
    /// Doctor (lead) the quotation is addressed to.
    pub party_id: String,
    #[serde(with = "erp_date")]
    pub transaction_date: NaiveDate,
    #[serde(with = "erp_date")]
    pub valid_till: NaiveDate,
    #[serde(default)]
    pub items: Vec<LineItemInput>,
}

/// ERP `Quotation` document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErpQuotation {
    #[serde(flatten)]
    pub identity: DocumentIdentity,
    pub quotation_to: String,
    pub party_name: String,
    #[serde(with = "erp_date")]
    pub transaction_date: NaiveDate,
    #[serde(with = "erp_date")]
    pub valid_till: NaiveDate,
    pub company: String,
    pub currency: String,
    pub selling_price_list: String,
    #[serde(default)]
    pub items: Vec<LineItem>,
}

/// Quotation as the UI shows it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotationView {
    pub erp_name: Option<String>,
    pub party_id: String,
    /// Doctor display name, when the id resolves.
    pub party_name: Option<String>,
    pub transaction_date: NaiveDate,
    pub valid_till: NaiveDate,
    pub items: Vec<LineItem>,
    pub grand_total: f64,
}

/// Build the ERP document for a quotation form.
///
/// Rows without an item code are dropped; numbers are coerced the same way
/// as visit order bookings.
///
/// # Errors
/// Returns an error when the party is blank or the validity ends before the
/// transaction date.
pub fn quotation_to_erp(
    form: &QuotationForm,
    ctx: &MappingContext<'_>,
) -> Result<ErpQuotation, MappingError> {
    let party = present(Some(form.party_id.as_str()))
        .ok_or(MappingError::MissingField { field: "party_name" })?;
    if form.valid_till < form.transaction_date {
        return Err(MappingError::InvalidDateRange {
            field: "valid_till",
            start: form.transaction_date,
            end: form.valid_till,
        });
    }

    let org = ctx.organization;
    Ok(ErpQuotation {
        identity: DocumentIdentity::for_form(form.erp_name.as_deref(), ctx.user),
        quotation_to: org.quotation_to.clone(),
        party_name: party.to_string(),
        transaction_date: form.transaction_date,
        valid_till: form.valid_till,
        company: org.company.clone(),
        currency: org.currency.clone(),
        selling_price_list: org.selling_price_list.clone(),
        items: form
            .items
            .iter()
            .map(LineItemInput::coerce)
            .filter(|item| !item.item_code.is_empty())
            .collect(),
    })
}

/// Project a fetched quotation for display.
pub fn quotation_from_erp(node: &ErpQuotation, doctors: &ResolverIndex) -> QuotationView {
    QuotationView {
        erp_name: node.identity.name.clone(),
        party_id: node.party_name.clone(),
        party_name: doctors.id_to_name(&node.party_name).map(str::to_string),
        transaction_date: node.transaction_date,
        valid_till: node.valid_till,
        items: node.items.clone(),
        grand_total: node.items.iter().map(|i| i.amount).sum(),
    }
}

impl QuotationView {
    /// Form values for editing this quotation.
    pub fn to_form(&self) -> QuotationForm {
        QuotationForm {
            erp_name: self.erp_name.clone(),
            party_id: self.party_id.clone(),
            transaction_date: self.transaction_date,
            valid_till: self.valid_till,
            items: self
                .items
                .iter()
                .map(|i| LineItemInput {
                    item_code: i.item_code.clone(),
                    qty: Some(i.qty.into()),
                    rate: Some(i.rate.into()),
                    amount: Some(i.amount.into()),
                })
                .collect(),
        }
    }
}
