//! Ledger row classification into income, expense and balance maps

use rust_decimal::Decimal;

use crate::accounts::is_liability;
use crate::types::{BalanceMap, BalanceSide, CategoryMap, LedgerRow};

/// Sum strictly positive amounts per name
pub fn classify_income(rows: &[LedgerRow]) -> CategoryMap {
    let mut income = CategoryMap::new();
    for row in rows.iter().filter(|r| r.amount > Decimal::ZERO) {
        let total = income.entry(row.name.clone()).or_insert(Decimal::ZERO);
        *total = total.saturating_add(row.amount);
    }
    income
}

/// Sum strictly negative amounts per name, stored as absolute values
pub fn classify_expense(rows: &[LedgerRow]) -> CategoryMap {
    let mut expenses = CategoryMap::new();
    for row in rows.iter().filter(|r| r.amount < Decimal::ZERO) {
        let total = expenses.entry(row.name.clone()).or_insert(Decimal::ZERO);
        *total = total.saturating_add(row.amount.abs());
    }
    expenses
}

/// Collect asset accounts and loan liabilities keyed by trimmed name.
///
/// A later row with the same name replaces an earlier one.
pub fn classify_balances(rows: &[LedgerRow]) -> BalanceMap {
    let mut balances = BalanceMap::new();
    for row in rows {
        let name = row.name.trim();
        let keep = match row.side {
            Some(BalanceSide::Aktiva) => true,
            Some(BalanceSide::Passiva) => is_liability(name),
            None => false,
        };
        if keep {
            balances.insert(name.to_string(), row.amount);
        }
    }
    balances
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn row(name: &str, amount: &str, side: Option<BalanceSide>) -> LedgerRow {
        LedgerRow {
            name: name.to_string(),
            amount: Decimal::from_str(amount).unwrap(),
            side,
        }
    }

    #[test]
    fn test_income_scenario() {
        let income = classify_income(&[row("Spenden", "1234.56", None)]);
        assert_eq!(income.get("Spenden"), Some(&Decimal::from_str("1234.56").unwrap()));
    }

    #[test]
    fn test_expense_scenario() {
        let expenses = classify_expense(&[row("Miete", "-500.00", None)]);
        assert_eq!(expenses.get("Miete"), Some(&Decimal::from_str("500.00").unwrap()));
        assert!(classify_income(&[row("Miete", "-500.00", None)]).is_empty());
    }

    #[test]
    fn test_same_name_is_summed() {
        let rows = [
            row("Kollekte", "100", None),
            row("Kollekte", "50.5", None),
            row("Kollekte", "-20", None),
            row("Null", "0", None),
        ];
        let income = classify_income(&rows);
        assert_eq!(income.get("Kollekte"), Some(&Decimal::from_str("150.5").unwrap()));
        assert!(!income.contains_key("Null"));

        let expenses = classify_expense(&rows);
        assert_eq!(expenses.get("Kollekte"), Some(&Decimal::from(20)));
        assert!(!expenses.contains_key("Null"));
    }

    #[test]
    fn test_totals_never_negative() {
        let rows = [
            row("A", "-10", None),
            row("B", "25", None),
            row("A", "-0.01", None),
        ];
        assert!(classify_income(&rows).values().all(|v| *v >= Decimal::ZERO));
        assert!(classify_expense(&rows).values().all(|v| *v >= Decimal::ZERO));
    }

    #[test]
    fn test_exponent_amounts_saturate() {
        let huge = Decimal::from_scientific("5e28").unwrap();
        let rows: Vec<LedgerRow> = [("Spenden", huge), ("Spenden", huge), ("Miete", -huge), ("Miete", -huge)]
            .iter()
            .map(|(name, amount)| LedgerRow {
                name: name.to_string(),
                amount: *amount,
                side: None,
            })
            .collect();
        assert_eq!(classify_income(&rows)["Spenden"], Decimal::MAX);
        assert_eq!(classify_expense(&rows)["Miete"], Decimal::MAX);
    }

    #[test]
    fn test_balances_filter() {
        let rows = [
            row(" Girokonto SKB -Konto 700- ", "1500", Some(BalanceSide::Aktiva)),
            row("Darlehenskonto SKB", "-2000", Some(BalanceSide::Passiva)),
            row("Eigenkapital", "-300", Some(BalanceSide::Passiva)),
            row("Kasse", "12", None),
        ];
        let balances = classify_balances(&rows);
        assert_eq!(balances.len(), 2);
        assert_eq!(balances.get("Girokonto SKB -Konto 700-"), Some(&Decimal::from(1500)));
        assert_eq!(balances.get("Darlehenskonto SKB"), Some(&Decimal::from(-2000)));
    }
}
