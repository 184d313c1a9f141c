//! Operator semantics and the `int`/`bool` coercion rules (spec §4.6, §8).

use brewin_engine::{ErrorKind, Interpreter};

fn run(source: &str) -> Vec<String> {
    let mut interpreter = Interpreter::new(false, None);
    interpreter.run(source).unwrap_or_else(|err| panic!("run failed: {err}"));
    interpreter.get_output().to_vec()
}

#[test]
fn string_concatenation_vs_integer_addition() {
    let output = run(
        r#"
        func main() {
            print("foo" + "bar");
            print(1 + 2);
        }
        "#,
    );
    assert_eq!(output, vec!["foobar", "3"]);
}

#[test]
fn arithmetic_coerces_bool_operands_to_int() {
    let output = run(
        r#"
        func main() {
            print(true + 1);
            print(false - 1);
        }
        "#,
    );
    assert_eq!(output, vec!["2", "-1"]);
}

#[test]
fn division_truncates_toward_zero() {
    let output = run(
        r#"
        func main() {
            print(7 / 2);
            print(0 - 7 / 2);
        }
        "#,
    );
    assert_eq!(output, vec!["3", "-3"]);
}

#[test]
fn division_by_zero_is_a_type_error() {
    let mut interpreter = Interpreter::new(false, None);
    let result = interpreter.run("func main() { print(1 / 0); }");
    assert!(result.is_err());
    assert_eq!(interpreter.get_error_type_and_line().0, Some(ErrorKind::Type));
}

#[test]
fn comparisons_require_both_operands_int() {
    let mut interpreter = Interpreter::new(false, None);
    let result = interpreter.run(r#"func main() { print(1 < "a"); }"#);
    assert!(result.is_err());
    assert_eq!(interpreter.get_error_type_and_line().0, Some(ErrorKind::Type));
}

#[test]
fn logical_operators_are_strict_not_short_circuiting() {
    let output = run(
        r#"
        func side(ref x) {
            x = 1;
            return false;
        }
        func main() {
            x = 0;
            r = false && side(x);
            print(x);
        }
        "#,
    );
    assert_eq!(output, vec!["1"]);
}

#[test]
fn if_condition_must_be_bool_coercible() {
    let mut interpreter = Interpreter::new(false, None);
    let result = interpreter.run(r#"func main() { if ("yes") { } }"#);
    assert!(result.is_err());
    assert_eq!(interpreter.get_error_type_and_line().0, Some(ErrorKind::Type));
}

#[test]
fn negation_and_not() {
    let output = run(
        r#"
        func main() {
            print(-5);
            print(!true);
            print(!0);
        }
        "#,
    );
    assert_eq!(output, vec!["-5", "false", "true"]);
}
