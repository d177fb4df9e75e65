use mq_diagnostic::{CancellationFlag, CommonError, LocalizationTemplates};
use mq_ir::{Keyword, NodeId, NodeIdMapCollection, NodeKind, Position, PrimitiveTypeConstant};
use mq_lexer::{try_lex, LexerSnapshot};
use mq_parse::{try_read, Parser, ParserState};
use mq_types::{FieldMap, Type, TypeKind};

use crate::{
    autocomplete, maybe_active_node, try_expected_type, ActiveNodeLeafKind, TrailingToken,
    TypeInspector,
};

/// Split `|` out of a scenario string, returning the source and caret.
fn split_caret(text: &str) -> (String, Position) {
    let caret_offset = text.find('|').expect("scenario text must contain a caret");
    let source = text.replacen('|', "", 1);
    let before = &source[..caret_offset];
    let line_number = before.matches('\n').count() as u32;
    let line_start = before.rfind('\n').map(|index| index + 1).unwrap_or(0);
    (
        source,
        Position::new(line_number, (caret_offset - line_start) as u32),
    )
}

fn with_inspection<R>(
    text_with_caret: &str,
    f: impl FnOnce(&NodeIdMapCollection, &LexerSnapshot, Position, Option<TrailingToken>) -> R,
) -> R {
    let (source, position) = split_caret(text_with_caret);
    let snapshot = try_lex(source).unwrap();
    let state = ParserState::new(&snapshot, LocalizationTemplates::en(), None);
    match try_read(state, &Parser::default()) {
        Ok(ok) => f(ok.node_id_map_collection(), &snapshot, position, None),
        Err(error) => {
            let trailing = error
                .inner
                .maybe_token()
                .cloned()
                .map(|token| TrailingToken::new(&snapshot, token, position));
            f(
                error.state.node_id_map_collection(),
                &snapshot,
                position,
                trailing,
            )
        }
    }
}

fn keywords_at(text_with_caret: &str) -> Vec<Keyword> {
    with_inspection(text_with_caret, |collection, snapshot, position, trailing| {
        let active = maybe_active_node(collection, snapshot, position).unwrap();
        autocomplete(collection, snapshot, active.as_ref(), trailing.as_ref())
            .unwrap()
            .keywords
    })
}

fn primitive_types_at(text_with_caret: &str) -> Vec<PrimitiveTypeConstant> {
    with_inspection(text_with_caret, |collection, snapshot, position, trailing| {
        let active = maybe_active_node(collection, snapshot, position).unwrap();
        autocomplete(collection, snapshot, active.as_ref(), trailing.as_ref())
            .unwrap()
            .primitive_types
    })
}

fn expected_type_at(text_with_caret: &str) -> Option<Type> {
    with_inspection(text_with_caret, |collection, snapshot, position, _| {
        let active = maybe_active_node(collection, snapshot, position)
            .unwrap()
            .expect("scenario must resolve an active node");
        try_expected_type(collection, &active).unwrap()
    })
}

/// The bin-op node surrounding the (possibly partial) parse: the one that
/// actually read an operator.
fn find_bin_op(collection: &NodeIdMapCollection) -> NodeId {
    let mut candidates: Vec<NodeId> = collection
        .ast_ids()
        .chain(collection.context_ids())
        .filter(|&id| {
            collection.xor(id).unwrap().node_kind().is_bin_op()
                && collection.child_ids(id).len() >= 2
        })
        .collect();
    candidates.sort_unstable();
    *candidates.first().expect("no bin-op node in the parse")
}

fn bin_op_type_of(text: &str) -> Type {
    let snapshot = try_lex(text).unwrap();
    let state = ParserState::new(&snapshot, LocalizationTemplates::en(), None);
    let collection_owner = try_read(state, &Parser::default());
    let collection = match &collection_owner {
        Ok(ok) => ok.node_id_map_collection(),
        Err(error) => error.state.node_id_map_collection(),
    };
    let id = find_bin_op(collection);
    let inspector = TypeInspector::new(collection, None);
    inspector
        .try_infer_bin_op_type(collection.xor(id).unwrap())
        .unwrap()
}

mod active_node {
    use super::*;

    #[test]
    fn caret_inside_an_identifier_is_on_it() {
        with_inspection("let x = 1 in fo|o", |collection, snapshot, position, _| {
            let active = maybe_active_node(collection, snapshot, position)
                .unwrap()
                .unwrap();
            assert_eq!(active.leaf_kind, ActiveNodeLeafKind::OnAstNode);
            assert_eq!(active.leaf().node_kind(), NodeKind::Identifier);
            assert_eq!(
                active.maybe_identifier_under_position.unwrap().literal,
                "foo"
            );
        });
    }

    #[test]
    fn caret_at_an_identifier_end_is_after_it() {
        with_inspection("let x = 1 in x|", |collection, snapshot, position, _| {
            let active = maybe_active_node(collection, snapshot, position)
                .unwrap()
                .unwrap();
            assert_eq!(active.leaf_kind, ActiveNodeLeafKind::AfterAstNode);
            assert_eq!(active.maybe_identifier_under_position.unwrap().literal, "x");
            // Ancestry is leaf-first and ends at the root.
            let last = *active.ancestry.last().unwrap();
            assert_eq!(collection.maybe_parent_id(last.node_id()), None);
        });
    }

    #[test]
    fn partially_parsed_constructs_win() {
        with_inspection("(x as |) => 0", |collection, snapshot, position, _| {
            let active = maybe_active_node(collection, snapshot, position)
                .unwrap()
                .unwrap();
            assert_eq!(active.leaf_kind, ActiveNodeLeafKind::ContextNode);
            assert_eq!(active.leaf().node_kind(), NodeKind::PrimitiveType);
        });
    }
}

mod keyword_autocomplete {
    use super::*;

    #[test]
    fn completed_identifier_offers_nothing_matching() {
        // S1: conjunctions are proposed but the typed prefix filters all.
        assert_eq!(keywords_at("let x = 1 in x|"), vec![]);
    }

    #[test]
    fn conjunctions_filter_by_trailing_prefix() {
        // S2
        assert_eq!(
            keywords_at("let x = 1 a|"),
            vec![Keyword::And, Keyword::As]
        );
    }

    #[test]
    fn trailing_identifier_in_a_parameter_list_offers_as() {
        // S4
        assert_eq!(keywords_at("(foo a|) => foo"), vec![Keyword::As]);
    }

    #[test]
    fn caret_after_a_parameter_name_offers_as() {
        assert_eq!(keywords_at("(x |) => x"), vec![Keyword::As]);
    }

    #[test]
    fn lone_identifier_offers_document_starters() {
        // S10
        assert_eq!(keywords_at("l|"), vec![Keyword::Let]);
        assert_eq!(keywords_at("s|"), vec![Keyword::Section]);
    }

    #[test]
    fn empty_document_offers_every_starter() {
        assert_eq!(keywords_at("|"), Keyword::START_OF_DOCUMENT.to_vec());
    }

    #[test]
    fn after_the_last_binding_in_is_among_the_suggestions() {
        assert_eq!(
            keywords_at("let x = 1 |"),
            vec![
                Keyword::In,
                Keyword::And,
                Keyword::As,
                Keyword::Is,
                Keyword::Meta,
                Keyword::Or,
            ]
        );
    }

    #[test]
    fn unfilled_binding_value_offers_expression_starters() {
        assert_eq!(keywords_at("let x = |"), Keyword::EXPRESSION.to_vec());
    }

    #[test]
    fn otherwise_and_or_survive_the_trailing_o() {
        assert_eq!(
            keywords_at("try 1 o|"),
            vec![Keyword::Otherwise, Keyword::Or]
        );
    }

    #[test]
    fn list_interior_offers_expression_starters() {
        assert_eq!(keywords_at("{ |"), Keyword::EXPRESSION.to_vec());
    }

    #[test]
    fn after_a_section_member_shared_is_offered() {
        assert_eq!(keywords_at("section s; x = 1; |"), vec![Keyword::Shared]);
    }

    #[test]
    fn suggestions_are_always_real_keywords() {
        for text in ["let x = 1 a|", "try 1 o|", "let x = 1 |", "{ |"] {
            for keyword in keywords_at(text) {
                assert!(Keyword::ALL.contains(&keyword));
            }
        }
    }

    #[test]
    fn suggestions_honor_the_typed_prefix() {
        for (text, prefix) in [("let x = 1 a|", "a"), ("try 1 o|", "o"), ("l|", "l")] {
            for keyword in keywords_at(text) {
                assert!(
                    keyword.as_str().starts_with(prefix),
                    "{keyword} does not extend {prefix}"
                );
            }
        }
    }
}

mod primitive_type_autocomplete {
    use super::*;

    #[test]
    fn parameter_type_slot_offers_every_primitive_type() {
        // S3
        assert_eq!(
            primitive_types_at("(x as |) => 0"),
            PrimitiveTypeConstant::ALL.to_vec()
        );
    }

    #[test]
    fn type_keyword_offers_every_primitive_type() {
        assert_eq!(primitive_types_at("type |"), PrimitiveTypeConstant::ALL.to_vec());
    }

    #[test]
    fn nullable_slot_offers_every_primitive_type() {
        assert_eq!(
            primitive_types_at("(x as nullable |) => 0"),
            PrimitiveTypeConstant::ALL.to_vec()
        );
    }

    #[test]
    fn trailing_text_narrows_primitive_types() {
        assert_eq!(
            primitive_types_at("(x as nu|) => 0"),
            vec![PrimitiveTypeConstant::Null, PrimitiveTypeConstant::Number]
        );
    }

    #[test]
    fn no_type_slot_means_no_primitive_types() {
        assert_eq!(primitive_types_at("let x = 1 in x|"), vec![]);
        assert_eq!(primitive_types_at("{ |"), vec![]);
    }
}

mod expected_type {
    use super::*;

    #[test]
    fn if_condition_expects_logical() {
        // S5
        assert_eq!(
            expected_type_at("if |"),
            Some(Type::primitive(TypeKind::Logical, false))
        );
    }

    #[test]
    fn unfilled_right_operand_expects_the_partial_lookup() {
        assert_eq!(
            expected_type_at("1 + |"),
            Some(Type::primitive(TypeKind::Number, true))
        );
    }

    #[test]
    fn unconstrained_positions_expect_nothing() {
        assert_eq!(expected_type_at("let x = 1 in x|"), None);
    }
}

mod bin_op_types {
    use super::*;

    #[test]
    fn text_concatenation_is_text() {
        // S7
        assert_eq!(
            bin_op_type_of("\"abc\" & \"def\""),
            Type::primitive(TypeKind::Text, false)
        );
    }

    #[test]
    fn record_concatenation_merges_fields() {
        // S8
        let mut fields = FieldMap::default();
        fields.insert("a".to_string(), Type::primitive(TypeKind::Number, false));
        fields.insert("b".to_string(), Type::primitive(TypeKind::Number, false));
        assert_eq!(
            bin_op_type_of("[a=1] & [b=2]"),
            Type::DefinedRecord {
                fields,
                is_open: false,
                is_nullable: false,
            }
        );
    }

    #[test]
    fn record_concatenation_is_right_biased() {
        let mut fields = FieldMap::default();
        fields.insert("a".to_string(), Type::primitive(TypeKind::Text, false));
        assert_eq!(
            bin_op_type_of("[a=1] & [a=\"x\"]"),
            Type::DefinedRecord {
                fields,
                is_open: false,
                is_nullable: false,
            }
        );
    }

    #[test]
    fn partial_singleton_lookup_is_nullable() {
        // S9
        assert_eq!(
            bin_op_type_of("1 +"),
            Type::primitive(TypeKind::Number, true)
        );
    }

    #[test]
    fn partial_multi_lookup_is_a_nullable_union() {
        assert_eq!(
            bin_op_type_of("1 *"),
            Type::any_union(vec![
                Type::primitive(TypeKind::Duration, true),
                Type::primitive(TypeKind::Number, true),
            ])
        );
    }

    #[test]
    fn arithmetic_and_comparisons() {
        assert_eq!(
            bin_op_type_of("1 + 2"),
            Type::primitive(TypeKind::Number, false)
        );
        assert_eq!(
            bin_op_type_of("1 = 2"),
            Type::primitive(TypeKind::Logical, false)
        );
        assert_eq!(
            bin_op_type_of("1 < 2"),
            Type::primitive(TypeKind::Logical, false)
        );
    }

    #[test]
    fn undefined_combinations_are_none() {
        assert_eq!(bin_op_type_of("\"a\" + 1"), Type::NONE);
        assert_eq!(bin_op_type_of("null & \"x\""), Type::NONE);
    }

    #[test]
    fn equality_over_asserted_any_is_logical() {
        // The asserted `any` operands reach the full lookup, which must
        // answer for every kind, not just the ordered ones.
        assert_eq!(
            bin_op_type_of("(x as any) = (y as any)"),
            Type::primitive(TypeKind::Logical, false)
        );
        assert_eq!(
            bin_op_type_of("(x as anynonnull) <> (y as anynonnull)"),
            Type::primitive(TypeKind::Logical, false)
        );
    }

    #[test]
    fn is_expressions_are_logical() {
        assert_eq!(
            bin_op_type_of("x is number"),
            Type::primitive(TypeKind::Logical, false)
        );
    }

    #[test]
    fn as_expressions_take_the_asserted_type() {
        assert_eq!(
            bin_op_type_of("x as nullable number"),
            Type::primitive(TypeKind::Number, true)
        );
    }

    #[test]
    fn metadata_keeps_the_left_type() {
        assert_eq!(
            bin_op_type_of("1 meta \"note\""),
            Type::primitive(TypeKind::Number, false)
        );
    }

    #[test]
    fn cancellation_reaches_inference() {
        let snapshot = try_lex("1 + 2").unwrap();
        let state = ParserState::new(&snapshot, LocalizationTemplates::en(), None);
        let ok = try_read(state, &Parser::default()).unwrap();
        let flag = CancellationFlag::new();
        flag.cancel();
        let inspector = TypeInspector::new(ok.node_id_map_collection(), Some(&flag));
        let result = inspector
            .try_infer_bin_op_type(ok.node_id_map_collection().xor(ok.root).unwrap());
        assert!(matches!(result, Err(CommonError::Cancellation(_))));
    }
}
