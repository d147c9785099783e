//! Column names of the financial dataset

/// Name of the date index column
pub const DATE_COLUMN: &str = "Date";

/// Consumer price inflation, in percent
pub const INFLATION_RATE: &str = "Inflation_Rate";
/// Policy interest rate, in percent
pub const INTEREST_RATE: &str = "Interest_Rate";
/// Revenue growth metric
pub const REVENUE_GROWTH: &str = "Revenue_Growth";
/// Profit margin metric
pub const PROFIT_MARGIN: &str = "Profit_Margin";
/// Cash flow metric
pub const CASH_FLOW: &str = "Cash_Flow";

/// Columns every uploaded table must carry, in schema order
pub const REQUIRED_COLUMNS: [&str; 6] = [
    DATE_COLUMN,
    INFLATION_RATE,
    INTEREST_RATE,
    REVENUE_GROWTH,
    PROFIT_MARGIN,
    CASH_FLOW,
];

/// Metrics that are forecast and adjusted
pub const TARGET_METRICS: [&str; 3] = [REVENUE_GROWTH, PROFIT_MARGIN, CASH_FLOW];

/// Required columns missing from `present`, in schema order
pub fn missing_columns<S: AsRef<str>>(present: &[S]) -> Vec<String> {
    REQUIRED_COLUMNS
        .iter()
        .filter(|required| !present.iter().any(|name| name.as_ref() == **required))
        .map(|required| required.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_columns_is_case_sensitive() {
        let present = ["Date", "inflation_rate", "Interest_Rate", "Cash_Flow"];
        assert_eq!(
            missing_columns(&present),
            vec!["Inflation_Rate", "Revenue_Growth", "Profit_Margin"]
        );
        assert!(missing_columns(&REQUIRED_COLUMNS).is_empty());
    }
}
