#[cfg(test)]
mod tests {
    use sprig::config::Limits;
    use sprig::interpreter::cursor::TokenCursor;
    use sprig::interpreter::debug::{Error, ParserError};
    use sprig::interpreter::lexer::{tokenize, DebugToken, Lexer, TokenKind};
    use sprig::interpreter::parser::*;

    /// Reads top-level statements, stepping over every conditional's blocks.
    fn walk(tokens: &[DebugToken]) -> (Vec<Statement>, Vec<Error>) {
        let mut parser = Parser::new(tokens, None);
        let mut statements = vec![];
        while !parser.cursor().at_end() {
            if let Some(statement) = parser.parse_statement() {
                if let Statement::If(_) = statement {
                    parser.skip_block();
                    parser.skip_else_chain();
                }
                statements.push(statement);
            }
        }
        (statements, parser.take_diagnostics())
    }

    fn parse(source: &str) -> (Vec<Statement>, Vec<Error>) {
        walk(&tokenize(source).tokens)
    }

    fn parser_errors(diagnostics: &[Error]) -> Vec<&ParserError> {
        diagnostics
            .iter()
            .filter_map(|d| match d {
                Error::ParserError(_, e) => Some(e),
                _ => None,
            })
            .collect()
    }

    fn condition(source: &str) -> (Condition, Vec<Error>, Option<String>) {
        let lexed = tokenize(source);
        let mut parser = Parser::new(&lexed.tokens, None);
        let condition = parser.parse_logical_expression();
        let rest = parser.cursor().current().map(|t| t.text.clone());
        (condition, parser.take_diagnostics(), rest)
    }

    #[test]
    fn test_on_file() {
        let lexed = match Lexer::lex_file("./working_files/test.sprig", &Limits::default()) {
            Ok(l) => l,
            Err(e) => panic!("{}", e),
        };
        let (statements, diagnostics) = walk(&lexed.tokens);

        println!("{:#?}", statements);
        assert!(diagnostics.is_empty());

        let declared: Vec<&str> = statements
            .iter()
            .filter_map(|s| match s {
                Statement::Declaration(d) => Some(d.name.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(declared, vec!["count", "limit", "greeting", "ratio"]);
        assert_eq!(
            statements.iter().filter(|s| matches!(s, Statement::If(_))).count(),
            2
        );
    }

    #[test]
    fn cursor_primitives() {
        let lexed = tokenize("else if");
        let mut cursor = TokenCursor::new(&lexed.tokens);
        assert!(!cursor.is_empty());

        assert!(cursor.peek_is(TokenKind::Keyword, Some("else")));
        assert!(!cursor.peek_is(TokenKind::Keyword, Some("if")));
        assert!(!cursor.match_token(TokenKind::Keyword, Some("if")));
        assert_eq!(cursor.position(), 0);
        assert!(cursor.match_token(TokenKind::Keyword, None));
        assert_eq!(cursor.current().unwrap().text, "if");

        cursor.advance();
        assert!(cursor.at_end());
        cursor.advance();
        cursor.advance();
        assert_eq!(cursor.position(), cursor.len());
        assert!(cursor.current().is_none());
        assert!(!cursor.match_token(TokenKind::Eof, None));
    }

    #[test]
    fn declaration_with_initializer() {
        let (statements, diagnostics) = parse("int count = 42;");
        assert!(diagnostics.is_empty());
        match &statements[..] {
            [Statement::Declaration(d)] => {
                assert_eq!(d.var_type, VarType::Int);
                assert_eq!(d.name, "count");
                assert_eq!(d.initializer, Some(Literal::Number("42".into())));
            }
            other => panic!("unexpected statements {:?}", other),
        }
    }

    #[test]
    fn declaration_without_initializer() {
        let (statements, _) = parse("double ratio;");
        match &statements[..] {
            [Statement::Declaration(d)] => {
                assert_eq!(d.var_type, VarType::Double);
                assert_eq!(d.initializer, None);
            }
            other => panic!("unexpected statements {:?}", other),
        }
    }

    #[test]
    fn missing_semicolon_keeps_declaration() {
        let (statements, diagnostics) = parse("int a = 1 int b = 2;");
        assert_eq!(statements.len(), 2);
        assert!(matches!(
            parser_errors(&diagnostics)[..],
            [ParserError::MissingToken { .. }]
        ));
    }

    #[test]
    fn missing_name_abandons_declaration() {
        let (statements, diagnostics) = parse("int = 5; string s;");
        assert_eq!(parser_errors(&diagnostics), vec![&ParserError::MissingVariableName]);
        // recovery resumes at `=`, `5` and `;`, each ignored
        let ignored = statements
            .iter()
            .filter(|s| matches!(s, Statement::Ignored(_)))
            .count();
        assert_eq!(ignored, 3);
        assert!(matches!(
            statements.last(),
            Some(Statement::Declaration(d)) if d.name == "s"
        ));
    }

    #[test]
    fn invalid_initializer_declares_nothing() {
        let (statements, diagnostics) = parse("int a = b;");
        assert_eq!(
            parser_errors(&diagnostics),
            vec![&ParserError::InvalidInitialValue("\"b\"".into())]
        );
        assert!(!statements
            .iter()
            .any(|s| matches!(s, Statement::Declaration(_))));
    }

    #[test]
    fn print_forms() {
        let (statements, diagnostics) = parse("print(\"hello\"); print(name); print(\"x\", y);");
        assert!(diagnostics.is_empty());
        let args: Vec<&Vec<PrintArg>> = statements
            .iter()
            .map(|s| match s {
                Statement::Print(p) => &p.args,
                other => panic!("unexpected statement {:?}", other),
            })
            .collect();
        assert_eq!(args[0], &vec![PrintArg::String("hello".into())]);
        assert_eq!(args[1], &vec![PrintArg::Identifier("name".into())]);
        assert_eq!(
            args[2],
            &vec![PrintArg::String("x".into()), PrintArg::Identifier("y".into())]
        );
    }

    #[test]
    fn print_second_argument_must_be_identifier() {
        let (statements, diagnostics) = parse("print(\"a\", \"b\");");
        assert!(matches!(
            parser_errors(&diagnostics)[..],
            [ParserError::InvalidPrintArgument(..)]
        ));
        assert!(!statements.iter().any(|s| matches!(s, Statement::Print(_))));
    }

    #[test]
    fn print_requires_parentheses_and_semicolon() {
        for source in ["print \"a\";", "print(\"a\";", "print(\"a\")"] {
            let (_, diagnostics) = parse(source);
            assert!(
                matches!(parser_errors(&diagnostics)[..], [ParserError::MissingToken { .. }]),
                "{}",
                source
            );
        }
    }

    #[test]
    fn unknown_keyword_consumes_one_token() {
        let lexed = tokenize("while (x > 1) { }");
        let mut parser = Parser::new(&lexed.tokens, None);
        let statement = parser.parse_statement();
        assert_eq!(parser.cursor().position(), 1);
        match statement {
            Some(Statement::Ignored(i)) => assert_eq!(i.token.text, "while"),
            other => panic!("unexpected statement {:?}", other),
        }
    }

    #[test]
    fn if_head_stops_before_the_block() {
        let lexed = tokenize("if (x > 1 && y < 2) { int a; }");
        let mut parser = Parser::new(&lexed.tokens, None);
        match parser.parse_statement() {
            Some(Statement::If(i)) => assert_eq!(i.condition.to_string(), "x > 1 && y < 2"),
            other => panic!("unexpected statement {:?}", other),
        }
        assert!(parser.cursor().peek_is(TokenKind::Symbol, Some("{")));
        assert!(parser.take_diagnostics().is_empty());
    }

    #[test]
    fn if_head_requires_closing_paren() {
        let lexed = tokenize("if ((x > 1) { int a; }");
        let mut parser = Parser::new(&lexed.tokens, None);
        assert_eq!(parser.parse_statement(), None);
        assert_eq!(parser.take_diagnostics().len(), 1);
        assert!(parser.cursor().peek_is(TokenKind::Symbol, Some("{")));
    }

    #[test]
    fn skipped_block_ends_at_matching_brace() {
        let lexed = tokenize("{ { print(\"a\"); } print(\"b\"); } int after;");
        let mut parser = Parser::new(&lexed.tokens, None);
        parser.skip_block();
        assert!(parser.take_diagnostics().is_empty());
        assert_eq!(parser.cursor().current().unwrap().text, "int");
    }

    #[test]
    fn skipped_block_needs_opening_brace() {
        let lexed = tokenize("print(\"a\");");
        let mut parser = Parser::new(&lexed.tokens, None);
        parser.skip_block();
        assert!(matches!(
            parser_errors(&parser.take_diagnostics())[..],
            [ParserError::MissingToken { .. }]
        ));
        assert_eq!(parser.cursor().position(), 0);
    }

    #[test]
    fn skipped_block_runs_out_of_input() {
        let lexed = tokenize("{ { }");
        let mut parser = Parser::new(&lexed.tokens, None);
        parser.skip_block();
        assert_eq!(
            parser_errors(&parser.take_diagnostics()),
            vec![&ParserError::UnterminatedBlock]
        );
        assert!(parser.cursor().at_end());
    }

    #[test]
    fn running_block_ends_at_first_closing_brace() {
        let lexed = tokenize("{ { int a; } int b; }");
        let mut parser = Parser::new(&lexed.tokens, None);
        assert!(parser.enter_block());

        let mut statements = vec![];
        while !parser.close_block() {
            statements.extend(parser.parse_statement());
        }
        assert_eq!(statements.len(), 2);
        assert!(matches!(statements[0], Statement::Ignored(_)));
        assert_eq!(parser.cursor().current().unwrap().text, "int");
    }

    #[test]
    fn running_block_runs_out_of_input() {
        let lexed = tokenize("{ int a;");
        let mut parser = Parser::new(&lexed.tokens, None);
        assert!(parser.enter_block());
        assert!(!parser.close_block());
        assert!(parser.parse_statement().is_some());
        assert!(parser.close_block());
        assert_eq!(
            parser_errors(&parser.take_diagnostics()),
            vec![&ParserError::UnterminatedBlock]
        );
    }

    #[test]
    fn else_clauses_in_order() {
        let lexed = tokenize("else if (x < 0) { } else { } int after;");
        let mut parser = Parser::new(&lexed.tokens, None);

        match parser.parse_else_clause() {
            Some(ElseClause::ElseIf(c)) => assert_eq!(c.to_string(), "x < 0"),
            other => panic!("unexpected clause {:?}", other),
        }
        parser.skip_block();
        assert_eq!(parser.parse_else_clause(), Some(ElseClause::Else));
        parser.skip_block();
        assert_eq!(parser.parse_else_clause(), None);
        assert!(parser.take_diagnostics().is_empty());
    }

    #[test]
    fn malformed_else_if_head_ends_the_chain() {
        let lexed = tokenize("else if x < 0 { }");
        let mut parser = Parser::new(&lexed.tokens, None);
        assert_eq!(parser.parse_else_clause(), None);
        assert!(matches!(
            parser_errors(&parser.take_diagnostics())[..],
            [ParserError::MissingToken { .. }]
        ));
    }

    #[test]
    fn skipped_else_chain_is_not_validated() {
        let lexed = tokenize("else if (x) { print(\"b\"); } else if (y ! z) { } else { { } } int after;");
        let mut parser = Parser::new(&lexed.tokens, None);
        parser.skip_else_chain();
        assert!(parser.take_diagnostics().is_empty());
        assert_eq!(parser.cursor().current().unwrap().text, "int");
    }

    #[test]
    fn skipped_else_if_condition_may_nest_parentheses() {
        let lexed = tokenize("else if ((x > 1) || y < 0) { print(\"b\"); } int after;");
        let mut parser = Parser::new(&lexed.tokens, None);
        parser.skip_else_chain();
        assert!(parser.take_diagnostics().is_empty());
        assert_eq!(parser.cursor().current().unwrap().text, "int");
    }

    #[test]
    fn skipped_else_chain_needs_parentheses() {
        let lexed = tokenize("else if x { } int after;");
        let mut parser = Parser::new(&lexed.tokens, None);
        parser.skip_else_chain();
        assert_eq!(parser.take_diagnostics().len(), 1);
        assert_eq!(parser.cursor().current().unwrap().text, "x");
    }

    #[test]
    fn logical_operators_group_to_the_right() {
        let (c, diagnostics, _) = condition("a > 1 && b > 2 || c > 3");
        assert!(diagnostics.is_empty());
        assert_eq!(c.to_string(), "a > 1 && b > 2 || c > 3");
        match c {
            Condition::Logical(l) => {
                assert_eq!(l.op_type, LogicalOperatorType::And);
                assert!(matches!(l.left.as_ref(), Condition::Comparison(_)));
                match l.right.as_ref() {
                    Condition::Logical(r) => assert_eq!(r.op_type, LogicalOperatorType::Or),
                    other => panic!("unexpected right side {:?}", other),
                }
            }
            other => panic!("unexpected condition {:?}", other),
        }
    }

    #[test]
    fn grouped_conditions() {
        match condition("(a > 1 || b > 2) && c == 3").0 {
            Condition::Logical(l) => {
                assert_eq!(l.op_type, LogicalOperatorType::And);
                assert_eq!(l.left.to_string(), "(a > 1 || b > 2)");
            }
            other => panic!("unexpected condition {:?}", other),
        }
    }

    #[test]
    fn group_without_closing_paren_is_reported() {
        let (c, diagnostics, rest) = condition("(a > 1 {");
        assert_eq!(c.to_string(), "(a > 1)");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(rest.as_deref(), Some("{"));
    }

    #[test]
    fn comparison_accepts_any_operator_token() {
        match condition("a + 1").0 {
            Condition::Comparison(c) => {
                assert_eq!(c.operator, ComparisonOperator::Unrecognized("+".into()))
            }
            other => panic!("unexpected condition {:?}", other),
        }
    }

    #[test]
    fn malformed_term_is_invalid() {
        let (c, diagnostics, rest) = condition("x ) {");
        assert_eq!(c, Condition::Invalid);
        match &diagnostics[..] {
            [Error::ParserError(_, ParserError::MissingToken { expected, .. })] => {
                assert_eq!(expected, "a comparison operator")
            }
            other => panic!("unexpected diagnostics {:?}", other),
        }
        assert_eq!(rest.as_deref(), Some(")"));

        let (c, diagnostics, rest) = condition("a > b");
        assert_eq!(c, Condition::Invalid);
        assert!(matches!(
            &diagnostics[..],
            [Error::ParserError(_, ParserError::MissingToken { expected, .. })] if expected == "a numeric literal"
        ));
        assert_eq!(rest.as_deref(), Some("b"));
    }

    #[test]
    fn malformed_right_hand_side_is_invalid() {
        let (c, diagnostics, rest) = condition("x > 0 && y ) {");
        match c {
            Condition::Logical(l) => {
                assert!(matches!(l.left.as_ref(), Condition::Comparison(_)));
                assert_eq!(l.right.as_ref(), &Condition::Invalid);
            }
            other => panic!("unexpected condition {:?}", other),
        }
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(rest.as_deref(), Some(")"));
    }
}
