use mq_diagnostic::{CancellationFlag, CommonError, LocalizationTemplates};
use mq_ir::{AstNode, Keyword, NodeId, NodeIdMapCollection, NodeKind, TokenKind};
use mq_lexer::LexerSnapshot;

use crate::{
    try_read, CsvContinuationKind, InnerParseError, ParseError, ParseOk, ParseResult, Parser,
    ParserState,
};

fn with_ok<R>(text: &str, f: impl FnOnce(&LexerSnapshot, &ParseOk<'_>) -> R) -> R {
    let snapshot = mq_lexer::try_lex(text).unwrap();
    let state = ParserState::new(&snapshot, LocalizationTemplates::en(), None);
    match try_read(state, &Parser::default()) {
        Ok(ok) => f(&snapshot, &ok),
        Err(error) => panic!("expected `{text}` to parse, got {:?}", error.inner),
    }
}

fn with_err<R>(text: &str, f: impl FnOnce(&LexerSnapshot, &ParseError<'_>) -> R) -> R {
    let snapshot = mq_lexer::try_lex(text).unwrap();
    let state = ParserState::new(&snapshot, LocalizationTemplates::en(), None);
    match try_read(state, &Parser::default()) {
        Ok(_) => panic!("expected `{text}` to fail"),
        Err(error) => f(&snapshot, &error),
    }
}

fn child_kinds(collection: &NodeIdMapCollection, id: NodeId) -> Vec<NodeKind> {
    collection
        .child_ids(id)
        .iter()
        .map(|&child| collection.xor(child).unwrap().node_kind())
        .collect()
}

fn assert_parent_child_symmetry(collection: &NodeIdMapCollection) {
    for id in collection.ast_ids().chain(collection.context_ids()) {
        if let Some(parent) = collection.maybe_parent_id(id) {
            assert!(
                collection.child_ids(parent).contains(&id),
                "{id} missing from its parent's children"
            );
        }
        for &child in collection.child_ids(id) {
            assert_eq!(collection.maybe_parent_id(child), Some(id));
        }
    }
}

/// In the final tree every child was started after its parent.
fn assert_id_monotonicity(collection: &NodeIdMapCollection) {
    for id in collection.ast_ids().chain(collection.context_ids()) {
        for &child in collection.child_ids(id) {
            assert!(child > id, "child {child} is not newer than parent {id}");
        }
    }
}

mod documents {
    use super::*;

    #[test]
    fn literal_document() {
        with_ok("1", |_, ok| {
            let root = ok.node_id_map_collection().ast(ok.root).unwrap();
            assert_eq!(root.kind, NodeKind::LiteralExpression);
            assert_eq!(root.maybe_attribute_index, None);
        });
    }

    #[test]
    fn let_expression_shape() {
        with_ok("let x = 1 in x", |_, ok| {
            let collection = ok.node_id_map_collection();
            assert_eq!(
                child_kinds(collection, ok.root),
                vec![
                    NodeKind::Constant,
                    NodeKind::ArrayWrapper,
                    NodeKind::Constant,
                    NodeKind::IdentifierExpression,
                ]
            );
            let wrapper = collection.child_ids(ok.root)[1];
            assert_eq!(child_kinds(collection, wrapper), vec![NodeKind::Csv]);
            let csv = collection.child_ids(wrapper)[0];
            let paired = collection.child_ids(csv)[0];
            assert_eq!(
                child_kinds(collection, paired),
                vec![
                    NodeKind::Identifier,
                    NodeKind::Constant,
                    NodeKind::LiteralExpression,
                ]
            );
            assert_parent_child_symmetry(collection);
            assert_id_monotonicity(collection);
        });
    }

    #[test]
    fn collapsed_tiers_leave_no_trace() {
        // Every bin-op tier opens a context and collapses when no operator
        // follows; the root literal must sit at the top with no attribute.
        with_ok("x", |_, ok| {
            let collection = ok.node_id_map_collection();
            let root = collection.ast(ok.root).unwrap();
            assert_eq!(root.kind, NodeKind::IdentifierExpression);
            assert_eq!(root.maybe_attribute_index, None);
            assert_eq!(collection.maybe_parent_id(ok.root), None);
            assert_eq!(collection.context_count(), 0);
        });
    }

    #[test]
    fn binary_operator_shape_is_three_children() {
        with_ok("(x) + 1", |_, ok| {
            let collection = ok.node_id_map_collection();
            let root = collection.ast(ok.root).unwrap();
            assert_eq!(root.kind, NodeKind::ArithmeticExpression);
            assert_eq!(
                child_kinds(collection, ok.root),
                vec![
                    NodeKind::ParenthesizedExpression,
                    NodeKind::Constant,
                    NodeKind::LiteralExpression,
                ]
            );
        });
    }

    #[test]
    fn function_expression_shape() {
        with_ok("(x) => x", |_, ok| {
            let collection = ok.node_id_map_collection();
            let root = collection.ast(ok.root).unwrap();
            assert_eq!(root.kind, NodeKind::FunctionExpression);
            assert_eq!(
                child_kinds(collection, ok.root),
                vec![
                    NodeKind::ParameterList,
                    NodeKind::Constant,
                    NodeKind::IdentifierExpression,
                ]
            );
            // The skipped return type consumed attribute slot 1.
            let body = collection.child_ids(ok.root)[2];
            assert_eq!(
                collection.ast(body).unwrap().maybe_attribute_index,
                Some(3)
            );
        });
    }

    #[test]
    fn typed_parameters() {
        with_ok("(x as number, optional y as nullable text) => x", |_, ok| {
            let collection = ok.node_id_map_collection();
            let list = collection.child_ids(ok.root)[0];
            let wrapper = collection.child_ids(list)[1];
            let csvs = collection.child_ids(wrapper).to_vec();
            assert_eq!(csvs.len(), 2);
            let first = collection.child_ids(csvs[0])[0];
            assert_eq!(
                child_kinds(collection, first),
                vec![NodeKind::Identifier, NodeKind::AsNullablePrimitiveType]
            );
            let second = collection.child_ids(csvs[1])[0];
            assert_eq!(
                child_kinds(collection, second),
                vec![
                    NodeKind::Constant,
                    NodeKind::Identifier,
                    NodeKind::AsNullablePrimitiveType,
                ]
            );
        });
    }

    #[test]
    fn is_expression_reads_a_nullable_primitive_type() {
        with_ok("x is nullable number", |_, ok| {
            let collection = ok.node_id_map_collection();
            assert_eq!(
                child_kinds(collection, ok.root),
                vec![
                    NodeKind::IdentifierExpression,
                    NodeKind::Constant,
                    NodeKind::NullablePrimitiveType,
                ]
            );
        });
    }

    #[test]
    fn recursive_primary_suffixes() {
        with_ok("f(1){0}[col]", |_, ok| {
            let collection = ok.node_id_map_collection();
            let root = collection.ast(ok.root).unwrap();
            assert_eq!(root.kind, NodeKind::RecursivePrimaryExpression);
            let wrapper = collection.child_ids(ok.root)[1];
            assert_eq!(
                child_kinds(collection, wrapper),
                vec![
                    NodeKind::InvokeExpression,
                    NodeKind::ItemAccessExpression,
                    NodeKind::FieldSelector,
                ]
            );
        });
    }

    #[test]
    fn try_otherwise_shape() {
        with_ok("try 1 otherwise 2", |_, ok| {
            let collection = ok.node_id_map_collection();
            assert_eq!(
                child_kinds(collection, ok.root),
                vec![
                    NodeKind::Constant,
                    NodeKind::LiteralExpression,
                    NodeKind::OtherwiseExpression,
                ]
            );
        });
    }

    #[test]
    fn section_document_shape() {
        with_ok("section foo; x = 1; shared y = 2;", |_, ok| {
            let collection = ok.node_id_map_collection();
            let root = collection.ast(ok.root).unwrap();
            assert_eq!(root.kind, NodeKind::Section);
            let members = collection.child_ids(ok.root)[3];
            assert_eq!(
                child_kinds(collection, members),
                vec![NodeKind::SectionMember, NodeKind::SectionMember]
            );
            let shared_member = collection.child_ids(members)[1];
            assert_eq!(
                child_kinds(collection, shared_member),
                vec![
                    NodeKind::Constant,
                    NodeKind::IdentifierPairedExpression,
                    NodeKind::Constant,
                ]
            );
        });
    }

    #[test]
    fn unary_expression_shape() {
        with_ok("not -x", |_, ok| {
            let collection = ok.node_id_map_collection();
            let root = collection.ast(ok.root).unwrap();
            assert_eq!(root.kind, NodeKind::UnaryExpression);
            let operators = collection.child_ids(ok.root)[0];
            assert_eq!(
                child_kinds(collection, operators),
                vec![NodeKind::Constant, NodeKind::Constant]
            );
        });
    }

    #[test]
    fn type_primary_type_shape() {
        with_ok("type number", |_, ok| {
            let collection = ok.node_id_map_collection();
            assert_eq!(
                child_kinds(collection, ok.root),
                vec![NodeKind::Constant, NodeKind::PrimitiveType]
            );
        });
    }
}

mod round_trip {
    use super::*;

    fn assert_leaves_reproduce_tokens(text: &str) {
        with_ok(text, |snapshot, ok| {
            let collection = ok.node_id_map_collection();
            let mut leaves: Vec<&AstNode> = ok
                .leaf_ids()
                .iter()
                .map(|&id| collection.ast(id).unwrap())
                .collect();
            leaves.sort_by_key(|node| node.token_range.token_index_start);
            let leaf_texts: Vec<&str> = leaves
                .iter()
                .map(|node| node.maybe_leaf_text().unwrap())
                .collect();
            let token_texts: Vec<&str> = snapshot
                .tokens()
                .iter()
                .map(|token| snapshot.token_text(token))
                .collect();
            assert_eq!(leaf_texts, token_texts);
        });
    }

    #[test]
    fn leaves_cover_every_token_exactly_once() {
        assert_leaves_reproduce_tokens("let x = 1 in x");
        assert_leaves_reproduce_tokens("{1, 2, [a = null]}");
        assert_leaves_reproduce_tokens("(x as number) => if x then 1 else 2");
        assert_leaves_reproduce_tokens("try f(1) otherwise error \"boom\"");
    }
}

mod errors {
    use super::*;

    #[test]
    fn missing_in_reports_expected_token() {
        with_err("let x = 1", |_, error| {
            match &error.inner {
                InnerParseError::ExpectedTokenKind {
                    expected,
                    maybe_found,
                } => {
                    assert_eq!(expected, &TokenKind::Keyword(Keyword::In));
                    assert!(maybe_found.is_none());
                }
                other => panic!("unexpected error {other:?}"),
            }
            // The partial parse is preserved for inspection.
            assert!(error.state.node_id_map_collection().context_count() > 0);
        });
    }

    #[test]
    fn trailing_identifier_is_the_error_token() {
        with_err("let x = 1 a", |snapshot, error| {
            let token = error.inner.maybe_token().unwrap();
            assert_eq!(snapshot.token_text(token), "a");
            assert_eq!(error.maybe_column_number(), Some(10));
        });
    }

    #[test]
    fn comma_before_in_is_a_csv_continuation_error() {
        with_err("let x = 1, in x", |_, error| match &error.inner {
            InnerParseError::ExpectedCsvContinuation { kind, .. } => {
                assert_eq!(kind, &CsvContinuationKind::LetExpression);
            }
            other => panic!("unexpected error {other:?}"),
        });
    }

    #[test]
    fn dangling_comma_is_a_csv_continuation_error() {
        with_err("{1, }", |_, error| match &error.inner {
            InnerParseError::ExpectedCsvContinuation { kind, .. } => {
                assert_eq!(kind, &CsvContinuationKind::DanglingComma);
            }
            other => panic!("unexpected error {other:?}"),
        });
    }

    #[test]
    fn unused_tokens_remain() {
        with_err("1 1", |_, error| {
            assert!(matches!(
                error.inner,
                InnerParseError::UnusedTokensRemain { .. }
            ));
        });
    }

    #[test]
    fn unterminated_parentheses() {
        with_err("(1", |_, error| {
            assert!(matches!(
                error.inner,
                InnerParseError::UnterminatedParentheses { .. }
            ));
        });
    }

    #[test]
    fn unterminated_bracket() {
        with_err("[a = 1", |_, error| {
            assert!(matches!(
                error.inner,
                InnerParseError::UnterminatedBracket { .. }
            ));
        });
    }

    #[test]
    fn invalid_primitive_type() {
        with_err("1 as foo", |_, error| match &error.inner {
            InnerParseError::InvalidPrimitiveType { text, .. } => assert_eq!(text, "foo"),
            other => panic!("unexpected error {other:?}"),
        });
    }

    #[test]
    fn required_parameter_after_optional() {
        with_err("(optional x, y) => 1", |_, error| {
            assert!(matches!(
                error.inner,
                InnerParseError::RequiredParameterAfterOptionalParameter { .. }
            ));
        });
    }

    #[test]
    fn error_messages_format_through_templates() {
        with_err("let x = 1", |_, error| {
            assert_eq!(error.message(), "expected in, found the end of input");
        });
    }
}

mod rollback {
    use super::*;

    #[test]
    fn rollback_restores_the_map_observationally() {
        let snapshot = mq_lexer::try_lex("1 + 2 * 3").unwrap();
        let mut state = ParserState::new(&snapshot, LocalizationTemplates::en(), None);
        let parser = Parser::default();

        let backup = state.fast_state_backup();
        let baseline = state.node_id_map_collection().clone();

        (parser.read_expression)(&mut state, &parser).unwrap();
        let parsed = state.node_id_map_collection().clone();
        assert!(parsed.ast_count() > 0);

        state.apply_fast_state_backup(&backup).unwrap();
        assert_eq!(state.node_id_map_collection(), &baseline);
        assert_eq!(state.token_index(), 0);

        // Determinism: replaying after a rollback rebuilds the same graph,
        // ids included.
        (parser.read_expression)(&mut state, &parser).unwrap();
        assert_eq!(state.node_id_map_collection(), &parsed);
    }

    #[test]
    fn mid_parse_rollback_only_deletes_new_ids() {
        let snapshot = mq_lexer::try_lex("[a = 1, b = 2]").unwrap();
        let mut state = ParserState::new(&snapshot, LocalizationTemplates::en(), None);
        let parser = Parser::default();

        // Read the record; then roll a speculative read of nothing back.
        (parser.read_expression)(&mut state, &parser).unwrap();
        let parsed = state.node_id_map_collection().clone();
        let backup = state.fast_state_backup();
        state.apply_fast_state_backup(&backup).unwrap();
        assert_eq!(state.node_id_map_collection(), &parsed);
    }

    #[test]
    fn failed_speculative_function_read_is_invisible() {
        // `(1` forces the speculative function attempt to fail and roll
        // back before the parenthesized-expression attempt reports its
        // own error. No parameter-list debris may survive.
        with_err("(1", |_, error| {
            let collection = error.state.node_id_map_collection();
            for id in collection.ast_ids().chain(collection.context_ids()) {
                let kind = collection.xor(id).unwrap().node_kind();
                assert!(
                    !matches!(kind, NodeKind::ParameterList | NodeKind::FunctionExpression),
                    "speculative node {kind} survived rollback"
                );
            }
            assert_parent_child_symmetry(collection);
        });
    }
}

mod invariants {
    use super::*;

    #[test]
    fn symmetry_and_monotonicity_hold_after_parses() {
        for text in [
            "let x = 1 in x",
            "(x) => x",
            "{1, {2, 3}}",
            "[a = [b = 1]]",
            "if true then 1 else 2",
            "each x + 1",
        ] {
            with_ok(text, |_, ok| {
                assert_parent_child_symmetry(ok.node_id_map_collection());
                assert_id_monotonicity(ok.node_id_map_collection());
            });
        }
    }

    #[test]
    fn symmetry_holds_after_failed_parses() {
        for text in ["let x = 1", "if x", "(x as ) => 0", "{1, "] {
            with_err(text, |_, error| {
                assert_parent_child_symmetry(error.state.node_id_map_collection());
                assert_id_monotonicity(error.state.node_id_map_collection());
            });
        }
    }

    #[test]
    fn right_most_leaf_cache_tracks_the_last_token() {
        with_ok("let x = 1 in x", |_, ok| {
            let right_most = ok.node_id_map_collection().maybe_right_most_leaf().unwrap();
            assert_eq!(right_most.kind, NodeKind::Identifier);
            assert_eq!(right_most.token_range.token_index_start, 5);
        });
    }

    #[test]
    fn leaf_ids_are_exactly_the_terminal_nodes() {
        with_ok("let x = 1 in x", |_, ok| {
            let collection = ok.node_id_map_collection();
            for &id in ok.leaf_ids() {
                assert!(collection.ast(id).unwrap().kind.is_leaf());
            }
            let terminal_count = collection
                .ast_ids()
                .filter(|&id| collection.ast(id).unwrap().kind.is_leaf())
                .count();
            assert_eq!(terminal_count, ok.leaf_ids().len());
        });
    }
}

mod capabilities {
    use super::*;

    fn refuse_literals(state: &mut ParserState<'_>, _parser: &Parser) -> ParseResult<NodeId> {
        Err(state.expected_token_kind_error(TokenKind::NumericLiteral))
    }

    #[test]
    fn a_single_production_can_be_overridden() {
        let snapshot = mq_lexer::try_lex("1").unwrap();
        let state = ParserState::new(&snapshot, LocalizationTemplates::en(), None);
        let parser = Parser {
            read_literal_expression: refuse_literals,
            ..Parser::default()
        };
        assert!(try_read(state, &parser).is_err());

        let state = ParserState::new(&snapshot, LocalizationTemplates::en(), None);
        assert!(try_read(state, &Parser::default()).is_ok());
    }
}

mod cancellation {
    use super::*;

    #[test]
    fn cancelled_parse_reports_cancellation_with_state() {
        let flag = CancellationFlag::new();
        flag.cancel();
        let snapshot = mq_lexer::try_lex("let x = 1 in x").unwrap();
        let state = ParserState::new(&snapshot, LocalizationTemplates::en(), Some(&flag));
        match try_read(state, &Parser::default()) {
            Err(error) => assert!(matches!(
                error.inner,
                InnerParseError::Common(CommonError::Cancellation(_))
            )),
            Ok(_) => panic!("expected cancellation"),
        }
    }
}
