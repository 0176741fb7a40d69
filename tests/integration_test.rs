use std::{cell::RefCell, rc::Rc};

use tinybasic::{
    interpreter::{ExecutionError, ExecutionErrorKind, Interpreter},
    parser::ParseError,
    RunError,
};

fn run(source: &str) -> (Result<(), RunError>, String) {
    let output = Rc::new(RefCell::new(Vec::<u8>::new()));
    let result = tinybasic::run(source, output.clone());
    let output = String::from_utf8(output.take()).expect("Output should be valid UTF-8");
    (result, output)
}

fn test_valid_program(source: &str, expected_output: &str) {
    let tokens = tinybasic::tokenizer::tokens(source);
    let program = tinybasic::parser::program(&tokens).expect("Parse should work on valid program");
    let output = Rc::new(RefCell::new(Vec::<u8>::new()));
    let mut interpreter = Interpreter::new(output.clone());
    interpreter
        .interpret(&program)
        .expect("Interpret should work on valid program");
    let output = String::from_utf8(output.take()).expect("Output should be valid UTF-8");
    assert_eq!(output, expected_output);
}

#[test]
fn test_counting_loop() {
    let source = "x = 0\nloop\nprint x\nx = x + 1\nif x < 3 then loop\n";
    test_valid_program(source, "0.0\n1.0\n2.0\n");
}

#[test]
fn test_demo_count() {
    test_valid_program(include_str!("../demos/count.bas"), "0.0\n1.0\n2.0\n");
}

#[test]
fn test_demo_fib() {
    test_valid_program(
        include_str!("../demos/fib.bas"),
        "0.0\n1.0\n1.0\n2.0\n3.0\n5.0\n8.0\n13.0\n21.0\n34.0\n",
    );
}

#[test]
fn test_demo_greeting() {
    test_valid_program(
        include_str!("../demos/greeting.bas"),
        "hello, world\nn is 3.0\nn is 2.0\nn is 1.0\nbye\n",
    );
}

#[test]
fn test_missing_label_falls_through() {
    let source = r#"
    if 1 then missing
    print "reached"
    "#;
    test_valid_program(source, "reached\n");
}

#[test]
fn test_unbound_variable_is_zero() {
    test_valid_program("print never_set\n", "0.0\n");
}

#[test]
fn test_text_left_operand_wins() {
    let source = r#"
    print "5" + 3
    print 3 + "5"
    "#;
    test_valid_program(source, "53.0\n8.0\n");
}

#[test]
fn test_no_operator_precedence() {
    let source = r#"
    print 1 + 2 * 3
    print 1 + (2 * 3)
    print 10 - 4 - 3
    "#;
    test_valid_program(source, "9.0\n7.0\n3.0\n");
}

#[test]
fn test_equality_after_assignment() {
    let source = r#"
    y = 2
    x = y = 2
    print x
    "#;
    test_valid_program(source, "1.0\n");
}

#[test]
fn test_division() {
    let source = r#"
    print 7 / 2
    print 1 / 0
    "#;
    test_valid_program(source, "3.5\ninf\n");
}

#[test]
fn test_string_comparison() {
    let source = r#"
    if "apple" < "banana" then yes
    print "no"
    yes
    print "yes"
    "#;
    test_valid_program(source, "yes\n");
}

#[test]
fn test_comments_and_blank_lines() {
    let source = "' header\n\n\nx = 1 ' trailing\n\nprint x\n";
    test_valid_program(source, "1.0\n");
}

#[test]
fn test_label_at_end_terminates() {
    let source = r#"
    if 1 then finish
    print "skipped"
    finish
    "#;
    test_valid_program(source, "");
}

#[test]
fn test_trailing_word_ends_program() {
    // `again` trails a statement, so it is neither a label nor a statement
    let source = "x = 0\nprint x again\nx = x + 1\nif x < 3 then again\n";
    test_valid_program(source, "0.0\n");
}

#[test]
fn test_long_expression() {
    let source = format!("print 1{}\n", " + 1".repeat(100_000));
    test_valid_program(&source, "100001.0\n");
}

#[test]
fn test_deep_parentheses_fail_to_parse() {
    let source = format!("print {}1{}\n", "(".repeat(50_000), ")".repeat(50_000));
    let (result, output) = run(&source);
    assert_eq!(output, "");
    let Err(RunError::Parse(err)) = result else {
        panic!("Run should fail to parse");
    };
    assert!(matches!(err.error, ParseError::TooDeeplyNested));
}

#[test]
fn test_parse_error_missing_then() {
    let (result, output) = run("print 1\nif 1 loop\n");
    assert_eq!(output, "");
    let Err(RunError::Parse(err)) = result else {
        panic!("Run should fail to parse");
    };
    assert!(matches!(err.error, ParseError::ExpectedWord(_)));
}

#[test]
fn test_parse_error_unbalanced_paren() {
    let (result, _) = run("print (1 + 2\n");
    assert!(matches!(result, Err(RunError::Parse(_))));
}

#[test]
fn test_runtime_error_halts() {
    let (result, output) = run("print \"a\"\nx = \"abc\" - 1\nprint \"b\"\n");
    assert_eq!(output, "a\n");
    let Err(RunError::Execution(ExecutionError::Execution {
        kind,
        program_counter,
        ..
    })) = result
    else {
        panic!("Run should fail during execution");
    };
    assert!(matches!(kind, ExecutionErrorKind::NotANumber(s) if s == "abc"));
    assert_eq!(program_counter, 1);
}
