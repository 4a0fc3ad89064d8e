use pretty_assertions::assert_eq;
use std::time::Duration;
use texcmp_core::{
    compare::{compare, CompareError, CompareResponse, ComparisonConfig, ErrorResponse},
    search::{Side, Status},
};
use texcmp_latex::FunctionTable;

fn config(max_iterations: usize) -> ComparisonConfig {
    ComparisonConfig { max_iterations, ..ComparisonConfig::default() }
}

#[test]
fn commuted_sum_is_exact() {
    let result = compare("x+y", "y+x", &ComparisonConfig::default()).unwrap();
    assert_eq!(result.similarity_percent(), "100.00%");
    assert_eq!(result.status, Status::ConvergedExact);
    assert_eq!(result.grammar1, result.grammar2);
    assert_eq!(result.latex1, result.latex2);
}

#[test]
fn identical_inputs_need_no_iterations() {
    let result = compare("x", "x", &ComparisonConfig::default()).unwrap();
    assert_eq!(result.similarity_percent(), "100.00%");
    assert_eq!(result.iterations, 0);
    assert_eq!(result.latex1, "x");
}

#[test]
fn square_and_product_improve() {
    let untouched = compare(r"x^2", r"x \cdot x", &config(0)).unwrap();
    let searched = compare(r"x^2", r"x \cdot x", &ComparisonConfig::default()).unwrap();
    assert_eq!(untouched.status, Status::ConvergedPartial);
    assert!(searched.similarity > untouched.similarity);
    assert_eq!(searched.status, Status::ConvergedExact);
}

#[test]
fn zero_iterations_reports_inputs() {
    let result = compare("a + b", "c", &config(0)).unwrap();
    assert_eq!(result.iterations, 0);
    assert_eq!(result.status, Status::ConvergedPartial);
    assert_eq!(result.grammar1, "sum(var(a), var(b))");
    assert_eq!(result.grammar2, "var(c)");
    assert_eq!(result.similarity_percent(), "0.00%");
}

#[test]
fn zero_timeout_stops_at_the_first_snapshot() {
    let config = ComparisonConfig { timeout: Duration::ZERO, ..ComparisonConfig::default() };
    let result = compare("x+y", "y+x", &config).unwrap();
    assert_eq!(result.status, Status::ConvergedPartial);
    assert_eq!(result.iterations, 0);
    assert_eq!(result.grammar1, "sum(var(x), var(y))");
    assert_eq!(result.grammar2, "sum(var(y), var(x))");
}

#[test]
fn extreme_exponents_are_not_folded() {
    let result = compare("2^{-2147483648}", "x", &ComparisonConfig::default()).unwrap();
    assert_eq!(result.grammar1, "pow(num(2), num(-2147483648))");
    assert_eq!(result.status, Status::ConvergedPartial);

    let tower = r"\int_{0}^{((10^{64})^{64})^{64}} t \,dt";
    let result = compare(tower, r"\int_{0}^{1} t \,dt", &ComparisonConfig::default()).unwrap();
    assert!(result.status.is_terminal());
    assert!(result.grammar1.contains("pow("));
}

#[test]
fn equations_compare_as_differences() {
    let result = compare("y = 2x", "y - 2x = 0", &ComparisonConfig::default()).unwrap();
    assert_eq!(result.grammar1, "sub(var(y), mul(num(2), var(x)))");
    assert!(result.similarity > 0.0);
}

#[test]
fn fractions_and_decimals() {
    let result = compare(r"\frac{1}{2}x", "0.5x", &ComparisonConfig::default()).unwrap();
    assert_eq!(result.similarity_percent(), "100.00%");
    assert_eq!(result.latex1, r"\frac{1}{2} \cdot x");
}

#[test]
fn custom_operations() {
    let config = ComparisonConfig {
        operations: FunctionTable::new(["sin", "sgn"]),
        ..ComparisonConfig::default()
    };
    let result = compare(r"\sgn x", r"\sgn(x)", &config).unwrap();
    assert_eq!(result.grammar1, "udf(sgn, var(x))");
    assert_eq!(result.latex1, r"\sgn(x)");

    let err = compare(r"\sgn x", "x", &ComparisonConfig::default()).unwrap_err();
    assert!(matches!(err, CompareError::Parse(Side::Left, _)));
}

#[test]
fn empty_input_is_missing() {
    let err = compare("x", "   ", &ComparisonConfig::default()).unwrap_err();
    assert!(matches!(err, CompareError::MissingInput(Side::Right)));
    assert_eq!(err.status_code(), 400);
    assert_eq!(err.to_string(), "missing LaTeX string: latex2");
}

#[test]
fn parse_error_names_the_input() {
    let err = compare(r"\frac{1}{}", "x", &ComparisonConfig::default()).unwrap_err();
    assert!(matches!(err, CompareError::Parse(Side::Left, _)));
    assert_eq!(err.status_code(), 409);
    assert!(err.to_string().starts_with("latex1: "));
}

#[test]
fn unsupported_constant() {
    let err = compare("x", r"2\pi", &ComparisonConfig::default()).unwrap_err();
    assert!(matches!(err, CompareError::Unsupported(Side::Right, _)));
    assert_eq!(err.status_code(), 409);
    assert!(err.report_to_string("x", r"2\pi").contains("cannot compare"));
}

#[test]
fn response_shapes() {
    let result = compare("x+y", "y+x", &ComparisonConfig::default()).unwrap();
    let json = serde_json::to_value(result.to_response()).unwrap();
    assert_eq!(json["similarity"], "100.00%");
    assert!(json["latex1"].is_string());
    assert!(json["latex2"].is_string());

    let response: CompareResponse = serde_json::from_value(json).unwrap();
    assert_eq!(response, result.to_response());

    let err = compare("", "x", &ComparisonConfig::default()).unwrap_err();
    let json = serde_json::to_string(&ErrorResponse::from(&err)).unwrap();
    assert_eq!(json, r#"{"error":"missing LaTeX string: latex1"}"#);
}

#[test]
fn logging_does_not_change_results() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("texcmp_core=trace,search=trace")
        .with_test_writer()
        .try_init();

    let result = compare(r"2(x + 1)", r"2x + 2", &ComparisonConfig::default()).unwrap();
    assert_eq!(result.status, Status::ConvergedExact);
}
