//! Fee, withholding and VAT computation.
//!
//! Two modes exist. In direct mode the fee is the pre-tax gross (DPP). In
//! gross-up mode the fee is the net the KOL must receive, and the gross is
//! solved from `net = gross * (1 - r + v)`.

use crate::rates::Rates;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AmountBreakdown {
    pub gross: f64,
    pub withholding: f64,
    pub vat_amount: f64,
    pub net_to_party: f64,
}

impl AmountBreakdown {
    fn from_gross(gross: f64, rates: Rates) -> Self {
        let withholding = gross * rates.withholding;
        let vat_amount = gross * rates.vat;
        AmountBreakdown {
            gross,
            withholding,
            vat_amount,
            net_to_party: gross - withholding + vat_amount,
        }
    }
}

pub fn compute_amounts(fee: f64, gross_up: bool, rates: Rates) -> AmountBreakdown {
    // Also rejects NaN.
    if !(fee > 0.0) || !fee.is_finite() {
        return AmountBreakdown::default();
    }

    if !gross_up {
        return AmountBreakdown::from_gross(fee, rates);
    }

    let factor = 1.0 - rates.withholding + rates.vat;
    if factor <= 0.0 {
        // Nothing can be solved for; the target is taken as the gross.
        return AmountBreakdown::from_gross(fee, rates);
    }
    AmountBreakdown::from_gross(fee / factor, rates)
}

/// Invoice footer figures. Reimbursements pass through untaxed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InvoiceTotals {
    pub subtotal: f64,
    pub total_payable: f64,
}

impl InvoiceTotals {
    pub fn new(fee: f64, reimburse: f64, amounts: &AmountBreakdown) -> Self {
        let reimburse = if reimburse.is_finite() { reimburse.max(0.0) } else { 0.0 };
        let fee = if fee.is_finite() { fee } else { 0.0 };
        InvoiceTotals {
            subtotal: fee + reimburse,
            total_payable: amounts.net_to_party + reimburse,
        }
    }
}
