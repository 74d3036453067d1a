// Tests for syntax error reporting

use crate::*;

fn syntax_error(input: &str) -> ParseError {
    match parse_program(input) {
        Ok(program) => panic!("Expected syntax error, parsed: {:?}", program),
        Err(error) => error,
    }
}

#[test]
fn test_missing_assignment_target() {
    let error = syntax_error("var = 1");

    assert!(matches!(error, ParseError::Syntax { .. }));
    assert_eq!(error.location(), (1, 4));
}

#[test]
fn test_error_line_is_reported() {
    let error = syntax_error("var x = 1\nout x *");
    assert_eq!(error.location().0, 2);
}

#[test]
fn test_keyword_is_not_an_identifier() {
    syntax_error("var map = 1");
    syntax_error("var out = 1");
}

#[test]
fn test_unterminated_string() {
    syntax_error("print \"never closed");
}

#[test]
fn test_print_requires_a_string() {
    syntax_error("print 42");
}

#[test]
fn test_bare_expression_is_not_a_statement() {
    syntax_error("1 + 2");
}

#[test]
fn test_incomplete_forms() {
    syntax_error("out {1, }");
    syntax_error("out map({1, 2}, -> 1)");
    syntax_error("out reduce({1, 2}, 0, acc -> acc)");
    syntax_error("out (1 + 2");
}

#[test]
fn test_number_forms() {
    syntax_error("out 1.");
    syntax_error("out .5");
}

#[test]
fn test_syntax_error_message() {
    let error = syntax_error("var = 1");
    assert_eq!(error.to_string(), "Syntax error at 1:4");
}
