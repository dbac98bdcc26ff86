//! Document numbers for agreements and invoices.
//!
//! Sequence numbers look like `SPK/2026/10/0007/SVY` and consume one value of
//! a persisted counter per document. Composite numbers like
//! `SPK/20261018/BUDISANTOS/GLOWUP` are derived from the form alone.

use chrono::{Datelike, NaiveDate};
use clap::ValueEnum;

use crate::form::ContractForm;
use crate::storage::{CounterStore, KeyValueStore, INV_SEQ_KEY, SPK_SEQ_KEY};

pub const NUMBER_SUFFIX: &str = "SVY";
const COMPOSITE_NAME_LEN: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Spk,
    Invoice,
}

impl DocumentKind {
    pub fn prefix(self) -> &'static str {
        match self {
            DocumentKind::Spk => "SPK",
            DocumentKind::Invoice => "INV",
        }
    }

    pub fn counter_key(self) -> &'static str {
        match self {
            DocumentKind::Spk => SPK_SEQ_KEY,
            DocumentKind::Invoice => INV_SEQ_KEY,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum NumberingScheme {
    #[default]
    Sequence,
    Composite,
}

impl NumberingScheme {
    pub fn generate(self, kind: DocumentKind, form: &ContractForm, store: &mut dyn KeyValueStore) -> String {
        match self {
            NumberingScheme::Sequence => sequence_number(kind, &form.spk_issue_date, store),
            NumberingScheme::Composite => composite_number(
                kind,
                &form.spk_issue_date,
                &form.kol_name,
                &form.campaign_name,
            ),
        }
    }
}

/// Draws the next counter value for `kind`. Every call burns a number, so
/// call it only for documents that are actually issued.
pub fn sequence_number<S: CounterStore + ?Sized>(kind: DocumentKind, date: &NaiveDate, store: &mut S) -> String {
    let seq = store.next(kind.counter_key());
    format_sequence_number(kind, date, seq)
}

pub fn format_sequence_number(kind: DocumentKind, date: &NaiveDate, seq: u64) -> String {
    format!(
        "{}/{}/{:02}/{:04}/{}",
        kind.prefix(),
        date.year(),
        date.month(),
        seq,
        NUMBER_SUFFIX
    )
}

/// Deterministic; two campaigns with the same names on the same day collide.
pub fn composite_number(kind: DocumentKind, date: &NaiveDate, party: &str, campaign: &str) -> String {
    format!(
        "{}/{}/{}/{}",
        kind.prefix(),
        date.format("%Y%m%d"),
        name_token(party),
        name_token(campaign)
    )
}

fn name_token(name: &str) -> String {
    let token: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_uppercase())
        .take(COMPOSITE_NAME_LEN)
        .collect();
    if token.is_empty() {
        "-".to_string()
    } else {
        token
    }
}
