use econ_math::MathError;
use macro_forecast::ForecastError;
use rstest::rstest;
use std::io;

#[rstest]
#[case(ForecastError::UnsupportedFormat("docx".into()), 400)]
#[case(ForecastError::MissingColumns(vec!["Cash_Flow".into()]), 400)]
#[case(ForecastError::InvalidData("bad".into()), 400)]
#[case(ForecastError::InvalidParameters("bad".into()), 400)]
#[case(ForecastError::ParameterOutOfRange { field: "growth_factor".into(), reason: "must be between 0 and 2".into() }, 400)]
#[case(ForecastError::InsufficientData("short".into()), 500)]
#[case(ForecastError::ZeroBaseline("Cash_Flow".into()), 500)]
#[case(ForecastError::RenderError("disk full".into()), 500)]
#[case(ForecastError::InternalError("oops".into()), 500)]
#[case(ForecastError::ConfigError("bad toml".into()), 500)]
fn test_status_codes(#[case] error: ForecastError, #[case] status: u16) {
    assert_eq!(error.status_code(), status);
    assert_eq!(error.is_client_error(), status == 400);
}

#[test]
fn test_error_messages() {
    let err = ForecastError::MissingColumns(vec!["Interest_Rate".into(), "Cash_Flow".into()]);
    assert_eq!(err.to_string(), "Missing columns: Interest_Rate, Cash_Flow");

    let err = ForecastError::ParameterOutOfRange {
        field: "inflation_rate".into(),
        reason: "cannot be negative".into(),
    };
    assert_eq!(err.to_string(), "Parameter out of range: inflation_rate cannot be negative");
}

#[test]
fn test_io_error_conversion() {
    let err: ForecastError = io::Error::new(io::ErrorKind::NotFound, "gone").into();
    assert!(matches!(err, ForecastError::IoError(_)));
    assert_eq!(err.status_code(), 500);
}

#[test]
fn test_math_error_conversion() {
    let err: ForecastError = MathError::InsufficientData("need 2 points".into()).into();
    assert!(matches!(err, ForecastError::InsufficientData(_)));

    let err: ForecastError = MathError::CalculationError("constant series".into()).into();
    assert!(matches!(err, ForecastError::InternalError(_)));
}

#[test]
fn test_config_error_conversion() {
    let parse_err = toml::from_str::<toml::Value>("train_ratio = = 1").unwrap_err();
    let err: ForecastError = parse_err.into();
    assert!(matches!(err, ForecastError::ConfigError(_)));
}
