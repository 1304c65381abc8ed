use crate::api::types::Document;

/// A submittal can be edited only by its owner while it is still in the
/// initial draft state. Both comparisons are exact.
pub fn can_edit(current_user: &str, document: &Document) -> bool {
    current_user == document.owner && document.workflow_state.is_draft()
}
