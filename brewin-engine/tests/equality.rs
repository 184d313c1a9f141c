//! `==`/`!=` semantics: int/bool cross-coercion, cross-kind mismatch, and
//! identity comparison for functions/closures (spec §4.5, §4.6, §8).

use brewin_engine::Interpreter;

fn run(source: &str) -> Vec<String> {
    let mut interpreter = Interpreter::new(false, None);
    interpreter.run(source).unwrap_or_else(|err| panic!("run failed: {err}"));
    interpreter.get_output().to_vec()
}

#[test]
fn int_bool_cross_coercion_and_string_int_mismatch() {
    let output = run(
        r#"
        func main() {
            print(1 == true);
            print(0 == false);
            print("1" == 1);
        }
        "#,
    );
    assert_eq!(output, vec!["true", "true", "false"]);
}

#[test]
fn nil_equals_nil_and_nothing_else() {
    let output = run(
        r#"
        func main() {
            print(nil == nil);
            print(nil == 0);
            print(nil != "nil");
        }
        "#,
    );
    assert_eq!(output, vec!["true", "false", "true"]);
}

#[test]
fn strings_compare_by_value() {
    let output = run(
        r#"
        func main() {
            print("abc" == "abc");
            print("abc" == "abd");
        }
        "#,
    );
    assert_eq!(output, vec!["true", "false"]);
}

#[test]
fn function_values_compare_by_identity() {
    let output = run(
        r#"
        func square(a) { return a * a; }
        func cube(a) { return a * a * a; }
        func main() {
            f = square;
            g = square;
            h = cube;
            print(f == g);
            print(f == h);
        }
        "#,
    );
    assert_eq!(output, vec!["true", "false"]);
}
