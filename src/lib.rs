//! spk-pdf: influencer cooperation agreements (SPK) and invoices as PDF.
//!
//! The pipeline is form → rates → amounts → document number → layout → PDF.
//! Everything up to the layout is pure; only numbering touches the state store.

pub mod amounts;
pub mod compose;
pub mod error;
pub mod form;
pub mod format;
pub mod layout;
pub mod metrics;
pub mod numbering;
pub mod pdf;
pub mod rates;
pub mod storage;

pub use amounts::{compute_amounts, AmountBreakdown, InvoiceTotals};
pub use compose::{compose_invoice, compose_spk};
pub use error::AppError;
pub use form::{ContractForm, ValidationErrors};
pub use layout::{Document, LayoutEngine, PageGeometry};
pub use numbering::{DocumentKind, NumberingScheme};
pub use rates::{derive_rates, Rates, TaxScheme, TaxSchemeKind};
pub use storage::{open_store, CounterStore, FileStore, KeyValueStore, MemoryStore};
