mod common;

use common::{monthly_csv, HEADER};
use macro_forecast::{DataLoader, ForecastError, SourceFormat, UserParameters, Validator};
use rstest::rstest;

fn validate(csv: &str) -> macro_forecast::Result<macro_forecast::FinancialSeries> {
    let table = DataLoader::from_bytes(csv.as_bytes(), SourceFormat::DelimitedText)?;
    Validator::validate_table(&table)
}

#[test]
fn test_valid_table_produces_series() {
    let series = validate(&monthly_csv(24)).unwrap();

    assert_eq!(series.len(), 24);
    assert_eq!(series.columns().len(), 5);
    assert!(series.dates().windows(2).all(|pair| pair[0] < pair[1]));
}

#[test]
fn test_missing_value_rejected() {
    let csv = format!(
        "{}\n2023-01-01,2.0,3.0,5.0,12.0,1000\n2023-02-01,2.1,,5.1,12.1,1010\n",
        HEADER
    );

    match validate(&csv).unwrap_err() {
        ForecastError::InvalidData(msg) => assert!(msg.contains("Interest_Rate")),
        other => panic!("expected InvalidData, got {:?}", other),
    }
}

#[test]
fn test_non_numeric_value_rejected() {
    let csv = format!(
        "{}\n2023-01-01,2.0,3.0,5.0,12.0,1000\n2023-02-01,2.1,3.0,n/a,12.1,1010\n",
        HEADER
    );

    match validate(&csv).unwrap_err() {
        ForecastError::InvalidData(msg) => assert!(msg.contains("Revenue_Growth")),
        other => panic!("expected InvalidData, got {:?}", other),
    }
}

#[test]
fn test_empty_table_rejected() {
    let csv = format!("{}\n", HEADER);
    let err = validate(&csv).unwrap_err();
    assert!(matches!(err, ForecastError::InvalidData(_)));
}

#[test]
fn test_default_parameters() {
    let params = UserParameters::parse(None, None, None).unwrap();
    assert_eq!(params.inflation_rate(), 0.0);
    assert_eq!(params.interest_rate(), 0.0);
    assert_eq!(params.growth_factor(), 1.0);
    assert_eq!(params, UserParameters::default());
}

#[test]
fn test_parameters_are_trimmed() {
    let params = UserParameters::parse(Some(" 5 "), Some("3.5"), Some("1.1 ")).unwrap();
    assert_eq!(params.inflation_rate(), 5.0);
    assert_eq!(params.interest_rate(), 3.5);
    assert_eq!(params.growth_factor(), 1.1);
}

#[rstest]
#[case(Some("abc"), None, None)]
#[case(None, Some("3%"), None)]
#[case(None, None, Some(""))]
#[case(Some("NaN"), None, None)]
#[case(None, Some("inf"), None)]
fn test_unparseable_parameters(
    #[case] inflation: Option<&str>,
    #[case] interest: Option<&str>,
    #[case] growth: Option<&str>,
) {
    let err = UserParameters::parse(inflation, interest, growth).unwrap_err();
    assert!(matches!(err, ForecastError::InvalidParameters(_)));
}

#[rstest]
#[case(-0.1, 0.0, 1.0, "inflation_rate")]
#[case(0.0, -2.0, 1.0, "interest_rate")]
#[case(0.0, 0.0, -0.5, "growth_factor")]
#[case(0.0, 0.0, 2.01, "growth_factor")]
fn test_out_of_range_parameters(
    #[case] inflation: f64,
    #[case] interest: f64,
    #[case] growth: f64,
    #[case] expected_field: &str,
) {
    match UserParameters::new(inflation, interest, growth).unwrap_err() {
        ForecastError::ParameterOutOfRange { field, .. } => assert_eq!(field, expected_field),
        other => panic!("expected ParameterOutOfRange, got {:?}", other),
    }
}

#[rstest]
#[case(0.0, 0.0, 0.0)]
#[case(0.0, 0.0, 2.0)]
#[case(25.0, 15.0, 1.5)]
fn test_boundary_parameters_accepted(#[case] inflation: f64, #[case] interest: f64, #[case] growth: f64) {
    assert!(UserParameters::new(inflation, interest, growth).is_ok());
}
