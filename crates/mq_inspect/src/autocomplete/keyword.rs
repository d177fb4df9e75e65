//! Keyword autocomplete.
//!
//! The pipeline, in order: position-name resolution, edge cases, the
//! pairwise ancestry walk, the conjunction step, trailing-text
//! adjustment, and the final prefix filter. Edge cases and walk routines
//! either produce a suggestion list (halting the walk) or stay absent.

use mq_diagnostic::CommonError;
use mq_ir::{Keyword, NodeIdMapCollection, NodeKind, XorNode};
use mq_lexer::LexerSnapshot;

use crate::active_node::right_most_leaf_before;
use crate::{ActiveNode, TrailingToken};

pub(crate) fn autocomplete_keyword(
    collection: &NodeIdMapCollection,
    snapshot: &LexerSnapshot,
    active: &ActiveNode<'_>,
    maybe_trailing: Option<&TrailingToken>,
) -> Result<Vec<Keyword>, CommonError> {
    let maybe_position_name = position_name(active, maybe_trailing);

    if let Some(edge_case) = maybe_edge_case(collection, active)? {
        return Ok(finalize(edge_case, maybe_position_name.as_deref()));
    }

    let mut inspected = walk_ancestry(collection, active)?.unwrap_or_default();
    add_conjunctions(collection, snapshot, active, maybe_trailing, &mut inspected)?;

    if let Some(trailing) = maybe_trailing {
        if trailing.is_in_or_on_position {
            if let Some(word) = trailing.maybe_word() {
                inspected = autocomplete_keyword_trailing_text(inspected, word, None);
            }
        }
    }

    Ok(finalize(inspected, maybe_position_name.as_deref()))
}

/// The prefix the user has typed at the caret: the identifier under the
/// caret, or the trailing token's word when the caret sits in it.
fn position_name(active: &ActiveNode<'_>, maybe_trailing: Option<&TrailingToken>) -> Option<String> {
    if let Some(identifier) = &active.maybe_identifier_under_position {
        return Some(identifier.literal.clone());
    }
    let trailing = maybe_trailing?;
    if trailing.is_in_or_on_position {
        trailing.maybe_word().map(str::to_string)
    } else {
        None
    }
}

/// Narrow a suggestion list by the trailing token's text. When a
/// previously-selected set is supplied it is the filter's input instead
/// of the pipeline's current set.
fn autocomplete_keyword_trailing_text(
    inspected: Vec<Keyword>,
    trailing_text: &str,
    maybe_inspected_bias: Option<&[Keyword]>,
) -> Vec<Keyword> {
    let pool = match maybe_inspected_bias {
        Some(bias) => bias.to_vec(),
        None => inspected,
    };
    pool.into_iter()
        .filter(|keyword| keyword.as_str().starts_with(trailing_text))
        .collect()
}

/// Highest-priority checks, before any ancestry walk.
fn maybe_edge_case(
    collection: &NodeIdMapCollection,
    active: &ActiveNode<'_>,
) -> Result<Option<Vec<Keyword>>, CommonError> {
    let ancestry = &active.ancestry;

    // Nothing finished yet: the whole document is still open, so every
    // document-starting keyword applies.
    if collection.leaf_ids().is_empty() {
        return Ok(Some(Keyword::START_OF_DOCUMENT.to_vec()));
    }

    // A lone identifier at the document root: the user has typed the
    // start of a document-level keyword.
    if ancestry[0].node_kind() == NodeKind::Identifier {
        if let Some(parent) =
            mq_ir::maybe_nth_next(ancestry, 0, 1, Some(&[NodeKind::IdentifierExpression]))
        {
            if parent.maybe_attribute_index().is_none()
                && collection.maybe_parent_id(parent.node_id()).is_none()
            {
                return Ok(Some(Keyword::START_OF_DOCUMENT.to_vec()));
            }
        }
    }

    // Caret right after a parameter name (with or without a trailing
    // token): the only legal continuation is `as`.
    if let Some(parameter) = ancestry
        .iter()
        .find(|node| node.node_kind() == NodeKind::Parameter)
    {
        let children = collection.child_ids(parameter.node_id());
        if let Some(&last) = children.last() {
            let name_is_last = collection.xor(last)?.node_kind() == NodeKind::Identifier;
            if name_is_last && active.leaf().node_id() == last {
                return Ok(Some(vec![Keyword::As]));
            }
        }
    }

    Ok(None)
}

/// Walk (parent, child) pairs from the leaf upward, dispatching on the
/// parent's kind. The first routine to answer wins.
fn walk_ancestry(
    collection: &NodeIdMapCollection,
    active: &ActiveNode<'_>,
) -> Result<Option<Vec<Keyword>>, CommonError> {
    let ancestry = &active.ancestry;
    for index in 1..ancestry.len() {
        let parent = ancestry[index];
        let child = ancestry[index - 1];
        let maybe_inspected = match parent.node_kind() {
            NodeKind::ErrorHandlingExpression => error_handling_expression(active, child),
            NodeKind::IdentifierPairedExpression
            | NodeKind::GeneralizedIdentifierPairedExpression => identifier_paired_expression(child),
            NodeKind::LetExpression => let_expression(collection, child),
            NodeKind::ListExpression => list_expression(child),
            NodeKind::SectionMember => section_member(child),
            _ => None,
        };
        if let Some(inspected) = maybe_inspected {
            return Ok(Some(inspected));
        }
    }
    Ok(None)
}

/// After a completed protected expression, `otherwise` may follow.
fn error_handling_expression(active: &ActiveNode<'_>, child: XorNode<'_>) -> Option<Vec<Keyword>> {
    let ast = child.maybe_ast()?;
    if child.maybe_attribute_index() == Some(1)
        && active.position.is_on_or_after(&ast.token_range.position_end)
    {
        Some(vec![Keyword::Otherwise])
    } else {
        None
    }
}

/// An unfilled value slot admits every expression-starting keyword.
fn identifier_paired_expression(child: XorNode<'_>) -> Option<Vec<Keyword>> {
    if child.maybe_attribute_index() == Some(2) && child.is_context() {
        Some(Keyword::EXPRESSION.to_vec())
    } else {
        None
    }
}

/// After the last complete (and uncontinued) binding, `in` may follow.
fn let_expression(collection: &NodeIdMapCollection, child: XorNode<'_>) -> Option<Vec<Keyword>> {
    if child.maybe_attribute_index() != Some(1) {
        return None;
    }
    let csv_ids = collection.child_ids(child.node_id());
    let &last_csv = csv_ids.last()?;
    // A trailing comma means the next binding, not `in`.
    if collection.child_ids(last_csv).len() == 1 {
        Some(vec![Keyword::In])
    } else {
        None
    }
}

/// Between the braces of a list, an element may start.
fn list_expression(child: XorNode<'_>) -> Option<Vec<Keyword>> {
    match child.maybe_attribute_index() {
        Some(0) | Some(1) => Some(Keyword::EXPRESSION.to_vec()),
        _ => None,
    }
}

/// After a member's closing `;`, the next member may be `shared`.
fn section_member(child: XorNode<'_>) -> Option<Vec<Keyword>> {
    if child.maybe_attribute_index() == Some(2) && child.node_kind() == NodeKind::Constant {
        Some(vec![Keyword::Shared])
    } else {
        None
    }
}

/// When the caret sits directly after a completed unary expression the
/// binary-operator keywords apply in addition to whatever the ancestry
/// walk produced.
fn add_conjunctions(
    collection: &NodeIdMapCollection,
    snapshot: &LexerSnapshot,
    active: &ActiveNode<'_>,
    maybe_trailing: Option<&TrailingToken>,
    inspected: &mut Vec<Keyword>,
) -> Result<(), CommonError> {
    let Some(leaf) = right_most_leaf_before(collection, active.position)? else {
        return Ok(());
    };

    // The leaf must terminate a unary expression.
    let leaf_end = leaf.token_range.position_end;
    let terminates_unary = mq_ir::ancestry(collection, leaf.id)?.iter().any(|node| {
        node.maybe_ast().is_some_and(|ast| {
            ast.token_range.position_end == leaf_end && ast.kind.is_unary_terminating()
        })
    });
    if !terminates_unary {
        return Ok(());
    }

    // Adjacent: no token follows the leaf, or the only one following is
    // the trailing token the caret sits in.
    let next_index = leaf.token_range.token_index_end as usize;
    let adjacent = next_index >= snapshot.token_count()
        || matches!(
            maybe_trailing,
            Some(trailing)
                if trailing.is_in_or_on_position && trailing.token_index == Some(next_index)
        );
    if !adjacent {
        return Ok(());
    }

    for keyword in Keyword::CONJUNCTIONS {
        if !inspected.contains(&keyword) {
            inspected.push(keyword);
        }
    }
    Ok(())
}

/// Prefix-filter and dedupe, first occurrence winning.
pub(crate) fn finalize(inspected: Vec<Keyword>, maybe_name: Option<&str>) -> Vec<Keyword> {
    let mut result = Vec::new();
    for keyword in inspected {
        if let Some(name) = maybe_name {
            if !keyword.as_str().starts_with(name) {
                continue;
            }
        }
        if !result.contains(&keyword) {
            result.push(keyword);
        }
    }
    result
}
