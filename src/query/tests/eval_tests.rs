//! Evaluation tests for query expressions.

use crate::query::{
    ArithmeticOp, CompareOp, QueryError, QueryExpr, SubstringPosition, ValueExpr,
};
use rstest::{fixture, rstest};
use serde_json::{Value, json};
use std::collections::BTreeMap;

#[fixture]
fn queue() -> BTreeMap<String, Value> {
    BTreeMap::from([
        ("Count".to_owned(), json!(5)),
        ("Capacity".to_owned(), json!(10)),
        ("Load".to_owned(), json!(0.5)),
        ("State".to_owned(), json!("running")),
        ("Paused".to_owned(), json!(false)),
        ("Tags".to_owned(), json!(["a", "b"])),
    ])
}

fn attr(name: &str) -> ValueExpr {
    ValueExpr::attribute(name)
}

fn lit(value: impl Into<Value>) -> ValueExpr {
    ValueExpr::constant(value)
}

#[rstest]
#[case(CompareOp::Eq, 5, true)]
#[case(CompareOp::Ne, 5, false)]
#[case(CompareOp::Lt, 6, true)]
#[case(CompareOp::Le, 5, true)]
#[case(CompareOp::Gt, 5, false)]
#[case(CompareOp::Ge, 5, true)]
fn compares_integer_attributes(
    queue: BTreeMap<String, Value>,
    #[case] op: CompareOp,
    #[case] constant: i64,
    #[case] expected: bool,
) {
    let expr = QueryExpr::compare(attr("Count"), op, lit(constant));
    assert_eq!(expr.evaluate(&queue).expect("evaluates"), expected);
}

#[rstest]
fn integers_and_floats_compare_numerically(queue: BTreeMap<String, Value>) {
    let equal = QueryExpr::compare(attr("Count"), CompareOp::Eq, lit(5.0));
    let less = QueryExpr::compare(attr("Load"), CompareOp::Lt, lit(1));

    assert!(equal.evaluate(&queue).expect("evaluates"));
    assert!(less.evaluate(&queue).expect("evaluates"));
}

#[rstest]
fn values_of_different_kinds_are_unequal_but_not_ordered(queue: BTreeMap<String, Value>) {
    let equality = QueryExpr::attribute_equals("State", 5);
    let ordering = QueryExpr::compare(attr("State"), CompareOp::Gt, lit(5));

    assert!(!equality.evaluate(&queue).expect("evaluates"));
    assert_eq!(
        ordering.evaluate(&queue),
        Err(QueryError::Incomparable {
            left: "string",
            right: "number",
        })
    );
}

#[rstest]
fn between_is_inclusive(queue: BTreeMap<String, Value>) {
    let inside = QueryExpr::between(attr("Count"), lit(5), lit(10));
    let outside = QueryExpr::between(attr("Count"), lit(6), lit(10));

    assert!(inside.evaluate(&queue).expect("evaluates"));
    assert!(!outside.evaluate(&queue).expect("evaluates"));
}

#[rstest]
fn in_checks_membership(queue: BTreeMap<String, Value>) {
    let member = QueryExpr::is_in(attr("State"), [lit("stopped"), lit("running")]);
    let stranger = QueryExpr::is_in(attr("State"), [lit("stopped")]);

    assert!(member.evaluate(&queue).expect("evaluates"));
    assert!(!stranger.evaluate(&queue).expect("evaluates"));
}

#[rstest]
#[case(ArithmeticOp::Add, 10, true)]
#[case(ArithmeticOp::Subtract, 0, true)]
#[case(ArithmeticOp::Multiply, 25, true)]
#[case(ArithmeticOp::Divide, 1, true)]
#[case(ArithmeticOp::Add, 11, false)]
fn arithmetic_over_attributes(
    queue: BTreeMap<String, Value>,
    #[case] op: ArithmeticOp,
    #[case] expected_value: i64,
    #[case] expected: bool,
) {
    let expr = QueryExpr::compare(
        ValueExpr::arithmetic(op, attr("Count"), attr("Count")),
        CompareOp::Eq,
        lit(expected_value),
    );
    assert_eq!(expr.evaluate(&queue).expect("evaluates"), expected);
}

#[rstest]
fn mixed_arithmetic_is_performed_in_floating_point(queue: BTreeMap<String, Value>) {
    let expr = QueryExpr::compare(
        ValueExpr::arithmetic(ArithmeticOp::Multiply, attr("Capacity"), attr("Load")),
        CompareOp::Eq,
        lit(5),
    );
    assert!(expr.evaluate(&queue).expect("evaluates"));
}

#[rstest]
fn division_by_zero_is_an_error(queue: BTreeMap<String, Value>) {
    let expr = QueryExpr::compare(
        ValueExpr::arithmetic(ArithmeticOp::Divide, attr("Count"), lit(0)),
        CompareOp::Eq,
        lit(0),
    );
    assert_eq!(expr.evaluate(&queue), Err(QueryError::DivisionByZero));
}

#[rstest]
fn integer_overflow_is_an_error(queue: BTreeMap<String, Value>) {
    let expr = QueryExpr::compare(
        ValueExpr::arithmetic(ArithmeticOp::Multiply, attr("Count"), lit(i64::MAX)),
        CompareOp::Gt,
        lit(0),
    );
    assert_eq!(expr.evaluate(&queue), Err(QueryError::Overflow("*")));
}

#[rstest]
fn strings_concatenate_with_plus(queue: BTreeMap<String, Value>) {
    let expr = QueryExpr::compare(
        ValueExpr::arithmetic(ArithmeticOp::Add, attr("State"), lit("!")),
        CompareOp::Eq,
        lit("running!"),
    );
    assert!(expr.evaluate(&queue).expect("evaluates"));
}

#[rstest]
fn arithmetic_rejects_unsupported_operands(queue: BTreeMap<String, Value>) {
    let expr = QueryExpr::compare(
        ValueExpr::arithmetic(ArithmeticOp::Subtract, attr("State"), lit(1)),
        CompareOp::Eq,
        lit(0),
    );
    assert_eq!(
        expr.evaluate(&queue),
        Err(QueryError::InvalidOperands {
            operator: "-",
            left: "string",
            right: "number",
        })
    );
}

#[rstest]
#[case("run*", true)]
#[case("r?nning", true)]
#[case("[rs]unning", true)]
#[case("[!r]unning", false)]
#[case("stop*", false)]
fn match_applies_wildcards(
    queue: BTreeMap<String, Value>,
    #[case] pattern: &str,
    #[case] expected: bool,
) {
    let expr = QueryExpr::matches("State", pattern).expect("valid pattern");
    assert_eq!(expr.evaluate(&queue).expect("evaluates"), expected);
}

#[rstest]
#[case(SubstringPosition::Initial, "run", true)]
#[case(SubstringPosition::Initial, "ning", false)]
#[case(SubstringPosition::Final, "ning", true)]
#[case(SubstringPosition::Any, "nni", true)]
#[case(SubstringPosition::Any, "xyz", false)]
fn substring_respects_position(
    queue: BTreeMap<String, Value>,
    #[case] position: SubstringPosition,
    #[case] needle: &str,
    #[case] expected: bool,
) {
    let expr = QueryExpr::substring("State", position, needle);
    assert_eq!(expr.evaluate(&queue).expect("evaluates"), expected);
}

#[rstest]
fn string_operators_require_string_attributes(queue: BTreeMap<String, Value>) {
    let expr = QueryExpr::substring("Count", SubstringPosition::Any, "5");
    assert_eq!(
        expr.evaluate(&queue),
        Err(QueryError::NotAString {
            attribute: "Count".to_owned(),
            kind: "number",
        })
    );
}

#[rstest]
fn present_reports_readability(queue: BTreeMap<String, Value>) {
    assert!(QueryExpr::present("Tags").evaluate(&queue).expect("evaluates"));
    assert!(!QueryExpr::present("Missing").evaluate(&queue).expect("evaluates"));
}

#[rstest]
fn missing_attributes_propagate_as_errors(queue: BTreeMap<String, Value>) {
    let expr = QueryExpr::attribute_equals("Missing", 1);
    assert!(matches!(
        expr.evaluate(&queue),
        Err(QueryError::AttributeUnavailable { attribute, .. }) if attribute == "Missing"
    ));
}

#[rstest]
fn conjunction_short_circuits_before_failing_operand(queue: BTreeMap<String, Value>) {
    let expr = QueryExpr::constant(false).and(QueryExpr::attribute_equals("Missing", 1));
    assert!(!expr.evaluate(&queue).expect("evaluates"));
}

#[rstest]
fn disjunction_short_circuits_before_failing_operand(queue: BTreeMap<String, Value>) {
    let expr = QueryExpr::constant(true).or(QueryExpr::attribute_equals("Missing", 1));
    assert!(expr.evaluate(&queue).expect("evaluates"));
}

#[rstest]
fn empty_junctions_have_identity_values(queue: BTreeMap<String, Value>) {
    let all = QueryExpr::And {
        operands: Vec::new(),
    };
    let any = QueryExpr::Or {
        operands: Vec::new(),
    };

    assert!(all.evaluate(&queue).expect("evaluates"));
    assert!(!any.evaluate(&queue).expect("evaluates"));
}

#[rstest]
fn negation_inverts_result(queue: BTreeMap<String, Value>) {
    let expr = !QueryExpr::attribute_equals("Paused", true);
    assert!(expr.evaluate(&queue).expect("evaluates"));
}

#[rstest]
fn evaluation_is_repeatable(queue: BTreeMap<String, Value>) {
    let expr = QueryExpr::parse("Count between 1 and 9 and State startswith 'run'")
        .expect("valid query");

    let first = expr.evaluate(&queue).expect("evaluates");
    let second = expr.evaluate(&queue).expect("evaluates");

    assert!(first);
    assert_eq!(first, second);
}
