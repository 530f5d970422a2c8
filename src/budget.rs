//! Money math for cost lines. Inputs that are NaN or infinite are treated
//! as zero so spreadsheet garbage can never poison a total.

/// Totals for a quantity times unit price line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineTotals {
    pub total_price: f64,
    pub vat_amount: f64,
    pub total_with_vat: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarianceClass {
    Saving,
    Overrun,
    Exact,
    NoEstimate,
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

pub fn line_totals(quantity: f64, unit_price: f64, vat_rate: f64) -> LineTotals {
    let quantity = finite_or_zero(quantity);
    let unit_price = finite_or_zero(unit_price);
    let vat_rate = finite_or_zero(vat_rate);

    let total_price = quantity * unit_price;
    let vat_amount = total_price * vat_rate;
    LineTotals {
        total_price,
        vat_amount,
        total_with_vat: total_price + vat_amount,
    }
}

/// Classifies actual-vs-estimate variance. An item with no estimate (absent
/// or zero) cannot be judged, so it gets its own class rather than showing
/// a 100% overrun.
pub fn classify_variance(estimate: Option<f64>, variance: f64) -> VarianceClass {
    let estimate = finite_or_zero(estimate.unwrap_or(0.0));
    if estimate == 0.0 {
        return VarianceClass::NoEstimate;
    }
    let variance = finite_or_zero(variance);
    if variance < 0.0 {
        VarianceClass::Saving
    } else if variance > 0.0 {
        VarianceClass::Overrun
    } else {
        VarianceClass::Exact
    }
}
