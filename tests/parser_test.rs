//! Parser tests
//!
//! Grammar coverage (precedence, assignment, functions, control flow and
//! blocks) and per-item error recovery.

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use quill::ast::*;
    use quill::error::{ParserError, QuillError};
    use quill::parser::{Parser, MAX_DEPTH};
    use test_case::test_case;

    /// Parse `source`, asserting that no error was recorded
    fn parse_items(source: &str) -> Vec<Expression> {
        let mut parser = Parser::from_string(source);
        let program = parser.parse().expect("parse should not be abandoned");
        assert!(!parser.has_errors(), "unexpected errors: {:?}", parser.errors());
        assert_eq!(program.kind(), ExprKind::Block);
        program.items().to_vec()
    }

    fn parse_one(source: &str) -> Expression {
        let mut items = parse_items(source);
        assert_eq!(items.len(), 1, "expected one item in {:?}", source);
        items.remove(0)
    }

    #[test_case("1 + 2 * 3", "(binary + (real 1) (binary * (real 2) (real 3)))" ; "product binds tighter")]
    #[test_case("(1 + 2) * 3", "(binary * (binary + (real 1) (real 2)) (real 3))" ; "parentheses")]
    #[test_case("a - b - c", "(binary - (binary - (id a) (id b)) (id c))" ; "left associative")]
    #[test_case("a ^ b || c", "(binary || (binary ^ (id a) (id b)) (id c))" ; "xor above or")]
    #[test_case("a || b && c", "(binary || (id a) (binary && (id b) (id c)))" ; "and above or")]
    #[test_case("a = b .. c", "(binary = (id a) (binary .. (id b) (id c)))" ; "concat above comparison")]
    #[test_case("a .. b + 1", "(binary .. (id a) (binary + (id b) (real 1)))" ; "sum above concat")]
    #[test_case("x /= 2", "(binary /= (id x) (real 2))" ; "not equal")]
    #[test_case("!a && b", "(binary && (unary ! (id a)) (id b))" ; "not binds tightest")]
    #[test_case("!!a", "(unary ! (unary ! (id a)))" ; "double not")]
    #[test_case("x <- y <- 1", "(assign x (assign y (real 1)))" ; "assignment is right associative")]
    #[test_case("x <- a < b", "(assign x (binary < (id a) (id b)))" ; "assignment takes a whole expression")]
    fn test_expression_shapes(source: &str, expected: &str) {
        assert_eq!(parse_one(source).inspect(), expected);
    }

    #[test]
    fn test_named_function() {
        let expr = parse_one("fn add (a b:real, c) a + b");
        let Expression::Function(func) = &expr else {
            panic!("expected a function");
        };

        assert_eq!(func.name.as_deref(), Some("add"));
        assert_eq!(func.nargs(), 3);
        assert_eq!(func.args[0].name, "a");
        assert_eq!(func.args[0].ty, None);
        assert_eq!(func.args[1].ty, Some(ExprKind::Real));
        assert_eq!(func.args[2].name, "c");
        assert_eq!(
            func.body.as_deref(),
            Some(&Expression::binary(
                BinaryOp::Add,
                Expression::identifier("a"),
                Expression::identifier("b")
            ))
        );
    }

    #[test]
    fn test_anonymous_function() {
        let expr = parse_one("fn () { 1 }");
        let Expression::Function(func) = &expr else {
            panic!("expected a function");
        };
        assert!(func.is_anonymous());
        assert_eq!(func.nargs(), 0);
        assert_eq!(expr.to_string(), "fn <fn> () { 1 }");
    }

    #[test]
    fn test_function_value_assignment() {
        let expr = parse_one("inc <- fn (n:real) n + 1");
        assert_eq!(expr.to_string(), "inc <- fn <fn> (n:real) n + 1");
    }

    #[test]
    fn test_if_else() {
        assert_eq!(
            parse_one("if a b else c"),
            Expression::if_else(
                Expression::identifier("a"),
                Expression::identifier("b"),
                Some(Expression::identifier("c"))
            )
        );
    }

    #[test]
    fn test_dangling_else_binds_innermost() {
        assert_eq!(
            parse_one("if a if b c else d").inspect(),
            "(conditional (id a) (conditional (id b) (id c) (id d)))"
        );
    }

    #[test]
    fn test_while() {
        assert_eq!(
            parse_one("while x < 10 x <- x + 1").inspect(),
            "(loop (binary < (id x) (real 10)) (assign x (binary + (id x) (real 1))))"
        );
    }

    #[test]
    fn test_blocks_and_commas() {
        let items = parse_items("{ a, b c }, { }");
        assert_eq!(
            items,
            vec![
                Expression::block(vec![
                    Expression::identifier("a"),
                    Expression::identifier("b"),
                    Expression::identifier("c"),
                ]),
                Expression::block(vec![]),
            ]
        );
    }

    #[test]
    fn test_strings() {
        let items = parse_items(r#"greeting <- "hi\n" .. """raw "text" here""""#);
        assert_eq!(
            items[0],
            Expression::assign(
                "greeting",
                Expression::binary(
                    BinaryOp::Concat,
                    Expression::string("hi\n"),
                    Expression::string("raw \"text\" here")
                )
            )
        );
    }

    #[test]
    fn test_empty_program() {
        assert!(parse_items("").is_empty());
        assert!(parse_items("  -- only a comment\n").is_empty());
    }

    #[test]
    fn test_top_level_recovery() {
        let mut parser = Parser::from_string("1 ) 2 ) 3");
        let program = parser.parse().unwrap();

        assert_eq!(parser.error_count(), 2);
        assert_eq!(
            program,
            Expression::block(vec![
                Expression::real(1.0),
                Expression::real(2.0),
                Expression::real(3.0),
            ])
        );
    }

    #[test]
    fn test_block_recovery_keeps_block() {
        let mut parser = Parser::from_string("{ a ) b } c");
        let program = parser.parse().unwrap();

        assert_eq!(parser.error_count(), 1);
        assert_eq!(
            program,
            Expression::block(vec![
                Expression::block(vec![Expression::identifier("a"), Expression::identifier("b")]),
                Expression::identifier("c"),
            ])
        );
    }

    #[test]
    fn test_unclosed_block() {
        let mut parser = Parser::from_string("{ a");
        let program = parser.parse().unwrap();

        assert_eq!(program, Expression::block(vec![]));
        assert!(matches!(
            parser.errors()[0],
            QuillError::Parser(ParserError::UnexpectedEof { .. })
        ));
    }

    #[test]
    fn test_missing_assignment_value() {
        let mut parser = Parser::from_string("x <-");
        parser.parse().unwrap();
        assert_eq!(
            parser.errors()[0].to_string(),
            "syntax error: unexpected end of input, expected an expression"
        );
    }

    #[test]
    fn test_error_message_names_token() {
        let mut parser = Parser::from_string(")");
        parser.parse().unwrap();
        assert_eq!(
            parser.errors()[0].to_string(),
            "syntax error: expected an expression, found ')'"
        );
    }

    #[test]
    fn test_error_line() {
        let mut parser = Parser::from_string("a\n\n)");
        parser.parse().unwrap();
        assert_eq!(parser.errors()[0].line(), Some(3));
    }

    #[test]
    fn test_lexical_errors_are_absorbed() {
        let mut parser = Parser::from_string("a @ b");
        let program = parser.parse().unwrap();

        assert_eq!(
            program,
            Expression::block(vec![Expression::identifier("a"), Expression::identifier("b")])
        );
        assert_eq!(parser.error_count(), 1);
        assert!(matches!(parser.errors()[0], QuillError::Lexer(_)));
    }

    #[test]
    fn test_unknown_type_tag() {
        let mut parser = Parser::from_string("fn f (a:foo) a");
        parser.parse().unwrap();
        assert_eq!(parser.errors()[0].to_string(), "syntax error: unknown type 'foo'");
    }

    #[test]
    fn test_parse_expression_one_at_a_time() {
        let mut parser = Parser::from_string("x <- 1 2");
        assert_eq!(
            parser.parse_expression().unwrap(),
            Expression::assign("x", Expression::real(1.0))
        );
        assert_eq!(parser.parse_expression().unwrap(), Expression::real(2.0));
    }

    #[test]
    fn test_nesting_within_limit() {
        let depth = MAX_DEPTH - 1;
        let source = format!("{}x{}", "(".repeat(depth), ")".repeat(depth));
        assert_eq!(parse_one(&source), Expression::identifier("x"));

        let source = format!("{}x", "!".repeat(MAX_DEPTH / 2));
        assert_eq!(parse_one(&source).kind(), ExprKind::Unary);
    }

    #[test]
    fn test_nesting_too_deep_is_an_error() {
        let source = format!("{}x", "(".repeat(MAX_DEPTH + 1));
        let mut parser = Parser::from_string(source);
        let program = parser.parse().unwrap();

        assert_eq!(program.items(), &[Expression::identifier("x")]);
        assert_eq!(parser.error_count(), 1);
        assert_eq!(
            parser.errors()[0].to_string(),
            format!("syntax error: expression nested deeper than {} levels", MAX_DEPTH)
        );
    }

    #[test_case("(", ")" ; "parentheses")]
    #[test_case("{", "}" ; "blocks")]
    #[test_case("!", "" ; "negations")]
    #[test_case("x <- ", "" ; "assignments")]
    #[test_case("if a ", "" ; "conditionals")]
    fn test_pathological_nesting_does_not_overflow(open: &str, close: &str) {
        let depth = 200_000;
        let source = format!("{}x{}", open.repeat(depth), close.repeat(depth));
        let mut parser = Parser::from_string(source);

        let result = parser.parse();
        assert!(parser.has_errors());
        assert!(parser
            .errors()
            .iter()
            .any(|e| e.to_string().contains("nested deeper than")));
        if result.is_err() {
            assert!(parser.is_aborted());
        }
    }
}
