//! Scope-frame discipline: shadowing inside blocks, assignment mutating the
//! existing binding rather than shadowing it, and clean teardown after
//! `run` (spec §3.3, §4.2, §8).

use brewin_engine::Interpreter;

fn run(source: &str) -> Vec<String> {
    let mut interpreter = Interpreter::new(false, None);
    interpreter.run(source).unwrap_or_else(|err| panic!("run failed: {err}"));
    interpreter.get_output().to_vec()
}

#[test]
fn assignment_mutates_rather_than_shadows() {
    let output = run(
        r#"
        func main() {
            x = 1;
            if (true) {
                x = 2;
            }
            print(x);
        }
        "#,
    );
    assert_eq!(output, vec!["2"]);
}

#[test]
fn declaring_inside_a_block_does_not_leak_out() {
    let output = run(
        r#"
        func main() {
            x = 1;
            if (true) {
                y = 5;
                print(y);
            }
            print(x);
        }
        "#,
    );
    assert_eq!(output, vec!["5", "1"]);
}

#[test]
fn a_name_declared_in_a_sibling_block_is_not_visible() {
    let mut interpreter = Interpreter::new(false, None);
    let result = interpreter.run(
        r#"
        func main() {
            if (true) {
                y = 5;
            }
            print(y);
        }
        "#,
    );
    assert!(result.is_err());
    assert_eq!(interpreter.get_error_type_and_line().0, Some(brewin_engine::ErrorKind::Name));
}

#[test]
fn while_loop_body_is_a_fresh_scope_each_pass() {
    let output = run(
        r#"
        func main() {
            i = 0;
            while (i < 3) {
                doubled = i * 2;
                print(doubled);
                i = i + 1;
            }
        }
        "#,
    );
    assert_eq!(output, vec!["0", "2", "4"]);
}
