//! Salary arithmetic: structure totals, the quick calculator, loss of pay
//! and amounts in words.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::config::PayrollPolicy;
use crate::entities::{CalculationType, ComponentType};

/// One earning or deduction line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalaryLine {
    /// Catalogue component, if the line came from one.
    pub component_id: Option<i32>,
    /// Display name.
    pub name: String,
    /// Earning or deduction.
    pub component_type: ComponentType,
    /// Monthly amount.
    pub amount: Decimal,
}

/// Totals of a salary structure or payslip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SalaryTotals {
    /// Basic plus earnings.
    pub gross: Decimal,
    /// Sum of deductions.
    pub deductions: Decimal,
    /// Gross minus deductions.
    pub net: Decimal,
}

/// Gross is basic plus every earning line; net is gross minus deductions.
pub fn salary_totals(basic: Decimal, lines: &[SalaryLine]) -> SalaryTotals {
    let earnings: Decimal = lines
        .iter()
        .filter(|l| l.component_type == ComponentType::Earning)
        .map(|l| l.amount)
        .sum();
    let deductions: Decimal = lines
        .iter()
        .filter(|l| l.component_type == ComponentType::Deduction)
        .map(|l| l.amount)
        .sum();
    let gross = basic + earnings;
    SalaryTotals {
        gross,
        deductions,
        net: gross - deductions,
    }
}

/// Standard salary breakdown derived from a basic salary.
#[derive(Debug, Clone, Serialize)]
pub struct QuickSalary {
    /// Basic salary.
    pub basic: Decimal,
    /// House rent allowance.
    pub hra: Decimal,
    /// Conveyance allowance.
    pub conveyance: Decimal,
    /// Medical allowance.
    pub medical: Decimal,
    /// Basic plus allowances.
    pub gross: Decimal,
    /// Provident fund.
    pub pf: Decimal,
    /// Professional tax.
    pub professional_tax: Decimal,
    /// PF plus professional tax.
    pub total_deductions: Decimal,
    /// Gross minus deductions.
    pub net: Decimal,
}

fn percent_of(base: Decimal, percent: Decimal) -> Decimal {
    (base * percent / Decimal::ONE_HUNDRED).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Breaks a basic salary into the standard allowances and deductions.
///
/// # Example
///
/// ```
/// use rust_decimal::Decimal;
/// use hrms_engine::config::PayrollPolicy;
/// use hrms_engine::rules::quick_salary;
///
/// let policy = PayrollPolicy {
///     hra_percent_of_basic: Decimal::from(40),
///     conveyance_allowance: Decimal::from(1600),
///     medical_allowance: Decimal::from(1250),
///     pf_percent_of_basic: Decimal::from(12),
///     professional_tax: Decimal::from(200),
/// };
/// let salary = quick_salary(Decimal::from(20000), &policy);
/// assert_eq!(salary.gross, Decimal::from(30850));
/// assert_eq!(salary.net, Decimal::from(28250));
/// ```
pub fn quick_salary(basic: Decimal, policy: &PayrollPolicy) -> QuickSalary {
    let hra = percent_of(basic, policy.hra_percent_of_basic);
    let gross = basic + hra + policy.conveyance_allowance + policy.medical_allowance;
    let pf = percent_of(basic, policy.pf_percent_of_basic);
    let total_deductions = pf + policy.professional_tax;
    QuickSalary {
        basic,
        hra,
        conveyance: policy.conveyance_allowance,
        medical: policy.medical_allowance,
        gross,
        pf,
        professional_tax: policy.professional_tax,
        total_deductions,
        net: gross - total_deductions,
    }
}

/// Default monthly amount of a catalogue component for a basic salary.
pub fn component_default_amount(
    calculation_type: CalculationType,
    value: Decimal,
    basic: Decimal,
) -> Decimal {
    match calculation_type {
        CalculationType::Fixed | CalculationType::Formula => value,
        CalculationType::Percentage => percent_of(basic, value),
    }
}

/// Loss-of-pay deduction: gross per working day times unpaid days.
///
/// Returns zero when the month has no working days.
pub fn loss_of_pay(gross: Decimal, working_days: u32, lop_days: Decimal) -> Decimal {
    if working_days == 0 || lop_days <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    let days = lop_days.min(Decimal::from(working_days));
    (gross / Decimal::from(working_days) * days)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

const UNITS: [&str; 20] = [
    "", "One", "Two", "Three", "Four", "Five", "Six", "Seven", "Eight", "Nine", "Ten", "Eleven",
    "Twelve", "Thirteen", "Fourteen", "Fifteen", "Sixteen", "Seventeen", "Eighteen", "Nineteen",
];
const TENS: [&str; 10] = [
    "", "", "Twenty", "Thirty", "Forty", "Fifty", "Sixty", "Seventy", "Eighty", "Ninety",
];

fn below_hundred(n: u64) -> String {
    if n < 20 {
        UNITS[n as usize].to_string()
    } else if n % 10 == 0 {
        TENS[(n / 10) as usize].to_string()
    } else {
        format!("{} {}", TENS[(n / 10) as usize], UNITS[(n % 10) as usize])
    }
}

fn below_thousand(n: u64) -> String {
    match (n / 100, n % 100) {
        (0, rest) => below_hundred(rest),
        (h, 0) => format!("{} Hundred", UNITS[h as usize]),
        (h, rest) => format!("{} Hundred {}", UNITS[h as usize], below_hundred(rest)),
    }
}

fn integer_in_words(mut n: u64) -> String {
    if n == 0 {
        return "Zero".to_string();
    }
    let mut parts = Vec::new();
    let crore = n / 10_000_000;
    n %= 10_000_000;
    if crore > 0 {
        parts.push(format!("{} Crore", integer_in_words(crore)));
    }
    for (divisor, label) in [(100_000, "Lakh"), (1_000, "Thousand")] {
        let chunk = n / divisor;
        n %= divisor;
        if chunk > 0 {
            parts.push(format!("{} {}", below_hundred(chunk), label));
        }
    }
    if n > 0 {
        parts.push(below_thousand(n));
    }
    parts.join(" ")
}

/// Spells an amount in rupees using the Indian numbering system.
///
/// # Example
///
/// ```
/// use rust_decimal::Decimal;
/// use hrms_engine::rules::amount_in_words;
///
/// assert_eq!(
///     amount_in_words(Decimal::from(125_450)),
///     "One Lakh Twenty Five Thousand Four Hundred Fifty rupees only"
/// );
/// ```
pub fn amount_in_words(amount: Decimal) -> String {
    let amount = amount
        .abs()
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let rupees = amount.trunc();
    let paise = ((amount - rupees) * Decimal::ONE_HUNDRED).trunc();
    let rupees = u64::try_from(rupees).unwrap_or(u64::MAX);
    let paise = u64::try_from(paise).unwrap_or(0);

    if paise == 0 {
        format!("{} rupees only", integer_in_words(rupees))
    } else {
        format!(
            "{} rupees and {} paise only",
            integer_in_words(rupees),
            below_hundred(paise)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn line(name: &str, component_type: ComponentType, amount: &str) -> SalaryLine {
        SalaryLine {
            component_id: None,
            name: name.to_string(),
            component_type,
            amount: dec(amount),
        }
    }

    #[test]
    fn test_salary_totals() {
        let lines = vec![
            line("HRA", ComponentType::Earning, "8000"),
            line("Conveyance", ComponentType::Earning, "1600"),
            line("PF", ComponentType::Deduction, "2400"),
            line("PT", ComponentType::Deduction, "200"),
        ];
        let totals = salary_totals(dec("20000"), &lines);
        assert_eq!(totals.gross, dec("29600"));
        assert_eq!(totals.deductions, dec("2600"));
        assert_eq!(totals.net, dec("27000"));
    }

    #[test]
    fn test_loss_of_pay_prorates_gross() {
        assert_eq!(loss_of_pay(dec("26000"), 26, dec("2")), dec("2000"));
        assert_eq!(loss_of_pay(dec("25000"), 25, dec("0.5")), dec("500"));
        assert_eq!(loss_of_pay(dec("25000"), 0, dec("3")), Decimal::ZERO);
    }

    #[test]
    fn test_loss_of_pay_capped_at_working_days() {
        assert_eq!(loss_of_pay(dec("26000"), 26, dec("30")), dec("26000"));
    }

    #[test]
    fn test_percentage_component_amount() {
        assert_eq!(
            component_default_amount(CalculationType::Percentage, dec("40"), dec("25000")),
            dec("10000")
        );
        assert_eq!(
            component_default_amount(CalculationType::Fixed, dec("1600"), dec("25000")),
            dec("1600")
        );
    }

    #[test]
    fn test_amount_in_words() {
        assert_eq!(amount_in_words(Decimal::ZERO), "Zero rupees only");
        assert_eq!(amount_in_words(dec("15")), "Fifteen rupees only");
        assert_eq!(amount_in_words(dec("1000")), "One Thousand rupees only");
        assert_eq!(
            amount_in_words(dec("28250")),
            "Twenty Eight Thousand Two Hundred Fifty rupees only"
        );
        assert_eq!(
            amount_in_words(dec("12345678.50")),
            "One Crore Twenty Three Lakh Forty Five Thousand Six Hundred Seventy Eight rupees and Fifty paise only"
        );
    }
}
