//! Contract form: parties, campaign, payment terms and document numbers.

use std::fmt;

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::amounts::{compute_amounts, AmountBreakdown};
use crate::numbering::{DocumentKind, NumberingScheme};
use crate::rates::{derive_rates, Rates, TaxScheme, TaxSchemeKind, DEFAULT_CUSTOM_RATE, MAX_CUSTOM_RATE};
use crate::storage::{KeyValueStore, FORM_KEY};

pub const DEFAULT_COMPANY_NAME: &str = "PT Sarana Visi Internasional";
pub const DEFAULT_COMPANY_ADDRESS: &str =
    "Gedung Artha Graha, Jl. Jend. Sudirman Kav 52-53, Senayan, Kebayoran Baru, Jakarta 12190";
pub const DEFAULT_REPRESENTATIVE: &str = "David Jr. M";
pub const DEFAULT_BRAND: &str = "Savvy Digital";
pub const DEFAULT_DELIVERABLE: &str = "1 (satu) Video TikTok pada akun @...";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeeBasis {
    #[default]
    Gross,
    Net,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentTerm {
    #[default]
    Full,
    Dp50,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContractForm {
    // KOL
    pub kol_name: String,
    pub kol_address: String,
    pub kol_ktp: String,
    pub kol_npwp: String,
    /// VAT-registered (PKP); switches PPN on.
    pub kol_pkp: bool,
    pub kol_bank_name: String,
    pub kol_bank_acc: String,
    pub kol_bank_holder: String,
    pub kol_email: String,

    // Company
    pub company_name: String,
    pub company_address: String,
    pub company_representative: String,
    pub company_brand: String,

    // Campaign
    pub campaign_name: String,
    pub deliverable_desc: String,
    pub script_deadline: NaiveDate,
    pub upload_deadline: NaiveDate,
    pub spk_issue_date: NaiveDate,

    // Payment
    pub fee_basis: FeeBasis,
    pub fee_input: f64,
    pub reimburse: f64,
    pub payment_term: PaymentTerm,
    pub tax_scheme: TaxSchemeKind,
    pub pph21_rate: f64,
    pub gross_up: bool,

    // Numbering, assigned once and kept
    pub spk_number: String,
    pub invoice_number: String,
}

impl Default for ContractForm {
    fn default() -> Self {
        let today = Local::now().date_naive();
        ContractForm {
            kol_name: String::new(),
            kol_address: String::new(),
            kol_ktp: String::new(),
            kol_npwp: String::new(),
            kol_pkp: false,
            kol_bank_name: String::new(),
            kol_bank_acc: String::new(),
            kol_bank_holder: String::new(),
            kol_email: String::new(),
            company_name: DEFAULT_COMPANY_NAME.to_string(),
            company_address: DEFAULT_COMPANY_ADDRESS.to_string(),
            company_representative: DEFAULT_REPRESENTATIVE.to_string(),
            company_brand: DEFAULT_BRAND.to_string(),
            campaign_name: String::new(),
            deliverable_desc: DEFAULT_DELIVERABLE.to_string(),
            script_deadline: today,
            upload_deadline: today,
            spk_issue_date: today,
            fee_basis: FeeBasis::Gross,
            fee_input: 0.0,
            reimburse: 0.0,
            payment_term: PaymentTerm::Full,
            tax_scheme: TaxSchemeKind::FinalTurnover,
            pph21_rate: DEFAULT_CUSTOM_RATE,
            gross_up: false,
            spk_number: String::new(),
            invoice_number: String::new(),
        }
    }
}

impl ContractForm {
    pub fn tax_scheme(&self) -> TaxScheme {
        self.tax_scheme.with_rate(self.pph21_rate)
    }

    pub fn rates(&self) -> Rates {
        derive_rates(&self.tax_scheme(), self.kol_pkp)
    }

    pub fn amounts(&self) -> AmountBreakdown {
        compute_amounts(self.fee_input, self.gross_up, self.rates())
    }

    /// Name printed on the bank-transfer line; falls back to the KOL name.
    pub fn account_holder(&self) -> &str {
        if !self.kol_bank_holder.is_empty() {
            &self.kol_bank_holder
        } else {
            &self.kol_name
        }
    }

    pub fn number(&self, kind: DocumentKind) -> &str {
        match kind {
            DocumentKind::Spk => &self.spk_number,
            DocumentKind::Invoice => &self.invoice_number,
        }
    }

    /// Return the document number for `kind`, generating it only if the form
    /// does not carry one yet. A sequence number is drawn from `store` at most
    /// once per form.
    pub fn assign_number(
        &mut self,
        kind: DocumentKind,
        scheme: NumberingScheme,
        store: &mut dyn KeyValueStore,
    ) -> String {
        if self.number(kind).is_empty() {
            let number = scheme.generate(kind, self, store);
            log::info!("assigned {} number {}", kind.prefix(), number);
            match kind {
                DocumentKind::Spk => self.spk_number = number,
                DocumentKind::Invoice => self.invoice_number = number,
            }
        }
        self.number(kind).to_string()
    }

    /// Move the agreement to another issue date. Numbers issued for the old
    /// date carry its year and month, so they are dropped.
    pub fn set_issue_date(&mut self, date: NaiveDate) {
        if self.spk_issue_date == date {
            return;
        }
        if !self.spk_number.is_empty() || !self.invoice_number.is_empty() {
            log::info!(
                "issue date changed from {} to {}; numbers will be reissued",
                self.spk_issue_date,
                date
            );
        }
        self.spk_issue_date = date;
        self.spk_number.clear();
        self.invoice_number.clear();
    }

    /// Keep the numbers already issued for the same agreement (same KOL,
    /// campaign and issue date) when this form does not carry its own.
    pub fn inherit_numbers(&mut self, previous: &ContractForm) {
        let same_agreement = self.kol_name == previous.kol_name
            && self.campaign_name == previous.campaign_name
            && self.spk_issue_date == previous.spk_issue_date;
        if !same_agreement {
            return;
        }
        if self.spk_number.is_empty() {
            self.spk_number = previous.spk_number.clone();
        }
        if self.invoice_number.is_empty() {
            self.invoice_number = previous.invoice_number.clone();
        }
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();

        errors.require(&self.kol_name, "kol_name", "Nama KOL wajib.");
        errors.require(&self.kol_address, "kol_address", "Alamat KTP wajib.");
        errors.require(&self.kol_ktp, "kol_ktp", "Nomor KTP wajib.");
        errors.require(&self.campaign_name, "campaign_name", "Nama campaign wajib.");
        errors.require(&self.deliverable_desc, "deliverable_desc", "Deskripsi deliverable wajib.");

        if !(self.fee_input > 0.0) {
            errors.push("fee_input", "Nominal fee harus > 0.");
        }
        if self.tax_scheme == TaxSchemeKind::Service && self.kol_npwp.trim().is_empty() {
            errors.push("kol_npwp", "NPWP disarankan untuk PPh23.");
        }
        if self.tax_scheme == TaxSchemeKind::Custom
            && !(self.pph21_rate > 0.0 && self.pph21_rate <= MAX_CUSTOM_RATE)
        {
            errors.push("pph21_rate", "Tarif PPh21 tidak valid.");
        }

        errors.into_result()
    }

    /// Last saved form, or defaults when nothing usable is stored.
    pub fn load_snapshot(store: &dyn KeyValueStore) -> Self {
        match store.get(FORM_KEY) {
            Some(json) => serde_json::from_str(&json).unwrap_or_else(|e| {
                log::warn!("discarding unreadable form snapshot: {}", e);
                ContractForm::default()
            }),
            None => ContractForm::default(),
        }
    }

    pub fn save_snapshot(&self, store: &mut dyn KeyValueStore) {
        match serde_json::to_string(self) {
            Ok(json) => store.set(FORM_KEY, &json),
            Err(e) => log::warn!("form snapshot not saved: {}", e),
        }
    }

    pub fn clear_snapshot(store: &mut dyn KeyValueStore) {
        store.remove(FORM_KEY);
    }
}

// ============================================================================
// Validation
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    fn push(&mut self, field: &'static str, message: &'static str) {
        self.errors.push(FieldError { field, message });
    }

    fn require(&mut self, value: &str, field: &'static str, message: &'static str) {
        if value.trim().is_empty() {
            self.push(field, message);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.errors.iter().map(|e| e.field)
    }

    fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "  - {}: {}", e.field, e.message)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn complete_form() -> ContractForm {
        ContractForm {
            kol_name: "Budi Santoso".into(),
            kol_address: "Jl. Melati No. 5, Bandung".into(),
            kol_ktp: "3273010101900001".into(),
            campaign_name: "Glow Up".into(),
            fee_input: 10_000_000.0,
            ..ContractForm::default()
        }
    }

    #[test]
    fn test_defaults_match_company_profile() {
        let form = ContractForm::default();
        assert_eq!(form.company_name, DEFAULT_COMPANY_NAME);
        assert_eq!(form.tax_scheme, TaxSchemeKind::FinalTurnover);
        assert_eq!(form.pph21_rate, 0.03);
        assert!(!form.gross_up);
    }

    #[test]
    fn test_partial_json_merges_onto_defaults() {
        let form: ContractForm =
            serde_json::from_str(r#"{"kol_name": "Sari", "tax_scheme": "PPH23_2", "kol_pkp": true}"#).unwrap();
        assert_eq!(form.kol_name, "Sari");
        assert_eq!(form.company_brand, DEFAULT_BRAND);
        assert_eq!(form.rates(), Rates { withholding: 0.02, vat: 0.11 });
    }

    #[test]
    fn test_validation_lists_missing_fields() {
        let errors = ContractForm::default().validate().unwrap_err();
        let fields: Vec<_> = errors.fields().collect();
        assert!(fields.contains(&"kol_name"));
        assert!(fields.contains(&"fee_input"));
        assert!(!fields.contains(&"deliverable_desc"));
        assert!(complete_form().validate().is_ok());
    }

    #[test]
    fn test_validation_checks_custom_rate_and_npwp() {
        let mut form = complete_form();
        form.tax_scheme = TaxSchemeKind::Custom;
        form.pph21_rate = 0.6;
        let fields: Vec<_> = form.validate().unwrap_err().fields().collect();
        assert_eq!(fields, vec!["pph21_rate"]);

        form.tax_scheme = TaxSchemeKind::Service;
        let fields: Vec<_> = form.validate().unwrap_err().fields().collect();
        assert_eq!(fields, vec!["kol_npwp"]);
    }

    #[test]
    fn test_number_is_assigned_once() {
        let mut store = MemoryStore::new();
        let mut form = complete_form();
        let first = form.assign_number(DocumentKind::Spk, NumberingScheme::Sequence, &mut store);
        let again = form.assign_number(DocumentKind::Spk, NumberingScheme::Sequence, &mut store);
        assert_eq!(first, again);
        assert!(first.ends_with("/0001/SVY"));
        assert_eq!(form.spk_number, first);
        assert!(form.invoice_number.is_empty());
    }

    #[test]
    fn test_numbers_carry_over_for_same_agreement() {
        let mut previous = complete_form();
        previous.spk_number = "SPK/2026/10/0003/SVY".into();

        let mut same = complete_form();
        same.spk_issue_date = previous.spk_issue_date;
        same.inherit_numbers(&previous);
        assert_eq!(same.spk_number, "SPK/2026/10/0003/SVY");

        let mut other = complete_form();
        other.campaign_name = "Lebaran".into();
        other.inherit_numbers(&previous);
        assert!(other.spk_number.is_empty());
    }

    #[test]
    fn test_new_issue_date_drops_frozen_numbers() {
        let mut store = MemoryStore::new();
        let mut form = complete_form();
        form.spk_issue_date = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        let march = form.assign_number(DocumentKind::Spk, NumberingScheme::Sequence, &mut store);
        form.invoice_number = "INV/2026/03/0001/SVY".into();

        form.set_issue_date(NaiveDate::from_ymd_opt(2026, 3, 2).unwrap());
        assert_eq!(form.spk_number, march);

        form.set_issue_date(NaiveDate::from_ymd_opt(2026, 10, 1).unwrap());
        assert!(form.spk_number.is_empty());
        assert!(form.invoice_number.is_empty());
        let october = form.assign_number(DocumentKind::Spk, NumberingScheme::Sequence, &mut store);
        assert_eq!(october, "SPK/2026/10/0002/SVY");
    }

    #[test]
    fn test_snapshot_round_trip_and_reset() {
        let mut store = MemoryStore::new();
        let mut form = complete_form();
        form.spk_number = "SPK/2026/10/0007/SVY".into();
        form.save_snapshot(&mut store);
        let restored = ContractForm::load_snapshot(&store);
        assert_eq!(restored.spk_number, form.spk_number);
        assert_eq!(restored.kol_name, form.kol_name);
        assert_eq!(restored.fee_input, form.fee_input);
        assert_eq!(restored.spk_issue_date, form.spk_issue_date);

        ContractForm::clear_snapshot(&mut store);
        assert!(ContractForm::load_snapshot(&store).kol_name.is_empty());
    }

    #[test]
    fn test_corrupt_snapshot_yields_defaults() {
        let mut store = MemoryStore::new();
        store.set(FORM_KEY, "{not json");
        assert!(ContractForm::load_snapshot(&store).kol_name.is_empty());
    }

    #[test]
    fn test_account_holder_falls_back_to_kol_name() {
        let mut form = complete_form();
        assert_eq!(form.account_holder(), "Budi Santoso");
        form.kol_bank_holder = "PT Budi Kreatif".into();
        assert_eq!(form.account_holder(), "PT Budi Kreatif");
    }
}
