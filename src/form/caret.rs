use tracing::trace;

use crate::dom::dom_model::{Document, NodeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerDownEffect {
    /// preventDefault() was called
    pub default_prevented: bool,
    pub focused: bool,
    /// Caret offset after the fix, when selection is supported
    pub caret: Option<usize>,
}

impl PointerDownEffect {
    pub(crate) fn untouched() -> Self {
        Self {
            default_prevented: false,
            focused: false,
            caret: None,
        }
    }
}

/// Focus text inputs on pointer-down and park the caret at the end of the
/// value. Selection failures are swallowed.
pub fn handle_pointer_down(doc: &mut Document, target: NodeId) -> PointerDownEffect {
    let Some(element) = doc.element(target) else {
        return PointerDownEffect::untouched();
    };
    if !element.is_text_entry() {
        return PointerDownEffect::untouched();
    }
    let len = element.value.chars().count();

    let focused = doc.focus(target).is_ok();
    let caret = match doc.set_selection_range(target, len, len) {
        Ok(()) => Some(len),
        Err(e) => {
            trace!(error = %e, "caret fix skipped");
            None
        }
    };

    PointerDownEffect {
        default_prevented: true,
        focused,
        caret,
    }
}
