pub mod vect;

use core::ptr::NonNull;

use crate::consts::Word;

/// Clear the stack used by the exception dispatcher and return its base, the
/// highest word of the stack.
///
/// Returns `None` if `stack` is empty.
pub fn init_except_stack(stack: &mut [Word]) -> Option<NonNull<Word>> {
    stack.fill(0);
    let base = stack.last_mut().map(NonNull::from);
    log::debug!(
        "intr::init_except_stack: {} words, base = {:?}",
        stack.len(),
        base
    );
    base
}
