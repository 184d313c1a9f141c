//! Overload resolution by arity, and the ambiguity rule for first-class
//! references to a multi-arity name (spec §3.4, §4.5, §8).

use brewin_engine::{ErrorKind, Interpreter};

fn run(source: &str) -> Vec<String> {
    let mut interpreter = Interpreter::new(false, None);
    interpreter.run(source).unwrap_or_else(|err| panic!("run failed: {err}"));
    interpreter.get_output().to_vec()
}

#[test]
fn calls_resolve_by_argument_count() {
    let output = run(
        r#"
        func f(a) { return a; }
        func f(a, b) { return a + b; }
        func main() {
            print(f(3));
            print(f(3, 4));
        }
        "#,
    );
    assert_eq!(output, vec!["3", "7"]);
}

#[test]
fn single_overload_name_is_usable_as_a_first_class_value() {
    let output = run(
        r#"
        func square(a) { return a * a; }
        func main() {
            f = square;
            print(f(5));
        }
        "#,
    );
    assert_eq!(output, vec!["25"]);
}

#[test]
fn multi_overload_name_is_ambiguous_as_a_value() {
    let mut interpreter = Interpreter::new(false, None);
    let result = interpreter.run(
        r#"
        func f(a) { return a; }
        func f(a, b) { return a + b; }
        func main() {
            g = f;
        }
        "#,
    );
    assert!(result.is_err());
    assert_eq!(interpreter.get_error_type_and_line().0, Some(ErrorKind::Name));
}

#[test]
fn calling_through_an_obtained_value_does_not_re_resolve_by_arity() {
    // Once `f` is bound to the one-argument overload, calling the captured
    // value with the wrong arity is a type error, not a lookup of the other
    // overload.
    let mut interpreter = Interpreter::new(false, None);
    let result = interpreter.run(
        r#"
        func f(a) { return a; }
        func main() {
            g = f;
            print(g(1, 2));
        }
        "#,
    );
    assert!(result.is_err());
    assert_eq!(interpreter.get_error_type_and_line().0, Some(ErrorKind::Type));
}

#[test]
fn unknown_function_name_is_a_name_error_naming_the_arity() {
    let mut interpreter = Interpreter::new(false, None);
    let result = interpreter.run(
        r#"
        func main() {
            mystery(1, 2);
        }
        "#,
    );
    assert!(result.is_err());
    assert_eq!(interpreter.get_error_type_and_line().0, Some(ErrorKind::Name));
}
