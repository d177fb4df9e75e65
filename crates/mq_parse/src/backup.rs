//! Speculative read and O(delta) rollback.
//!
//! A backup is three integers captured immediately before a tentative
//! parse. Restoring deletes exactly the ids allocated since the backup:
//! strict id monotonicity guarantees they form the contiguous range
//! `(backup.id_counter, current]` and belong to no older subtree.

use mq_diagnostic::CommonError;
use mq_ir::NodeId;

use crate::ParserState;

/// O(1) snapshot of a parser state.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct FastStateBackup {
    pub token_index: usize,
    pub id_counter: u32,
    pub maybe_current_context_id: Option<NodeId>,
}

impl ParserState<'_> {
    /// Capture a backup. Must be taken before the tentative read begins.
    pub fn fast_state_backup(&self) -> FastStateBackup {
        FastStateBackup {
            token_index: self.token_index(),
            id_counter: self.context_state.id_counter,
            maybe_current_context_id: self.context_state.maybe_current_context_id,
        }
    }

    /// Roll the state back to `backup`.
    ///
    /// Every id strictly greater than the backup's counter is deleted:
    /// AST ids first, then context ids, each descending so children go
    /// before parents. The graph ends up as if the tentative read had
    /// never happened, at cost proportional to the failed branch only.
    pub fn apply_fast_state_backup(&mut self, backup: &FastStateBackup) -> Result<(), CommonError> {
        self.set_token_index(backup.token_index);
        let threshold = NodeId(backup.id_counter);
        let collection = &mut self.context_state.node_id_map_collection;
        let (ast_ids, context_ids) = collection.ids_above(threshold);
        tracing::trace!(
            ast = ast_ids.len(),
            contexts = context_ids.len(),
            "rolling back speculative read"
        );
        for &id in &ast_ids {
            let parent_will_be_deleted =
                matches!(collection.maybe_parent_id(id), Some(parent) if parent > threshold);
            collection.delete_ast_node(id, parent_will_be_deleted)?;
        }
        for &id in &context_ids {
            let parent_will_be_deleted =
                matches!(collection.maybe_parent_id(id), Some(parent) if parent > threshold);
            collection.delete_context_node(id, parent_will_be_deleted)?;
        }
        self.context_state.id_counter = backup.id_counter;
        self.context_state.maybe_current_context_id = backup.maybe_current_context_id;
        if matches!(self.context_state.maybe_root_id, Some(root) if root > threshold) {
            self.context_state.maybe_root_id = None;
        }
        Ok(())
    }
}
