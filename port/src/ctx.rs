mod frame;

use core::fmt;

pub use self::frame::{Frame, Mode, Slot, LAYOUT};
use crate::consts::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// The stack cannot hold one [`Frame`].
    StackTooSmall { need: usize, have: usize },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::StackTooSmall { need, have } => {
                write!(f, "stack of {} words cannot hold a {}-word frame", have, need)
            }
        }
    }
}

/// The word offset of the initial stack pointer from the base of a stack of
/// `stack_size` words.
#[inline]
pub const fn sp_offset(stack_size: usize) -> usize {
    stack_size - FRAME_SLOTS
}

/// Builds the initial stacks of new tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StackBuilder {
    task_return: Word,
}

impl StackBuilder {
    /// `task_return` is where a task lands if its entry function returns.
    pub const fn new(task_return: Word) -> Self {
        StackBuilder { task_return }
    }

    /// The builder bound to the kernel's task return handler.
    #[cfg(target_arch = "arm")]
    pub fn kernel() -> Self {
        extern "C" {
            fn task_returned();
        }
        StackBuilder::new(task_returned as usize as Word)
    }

    #[inline]
    pub fn task_return(&self) -> Word {
        self.task_return
    }

    /// Push the initial frame of a task onto its stack and return the new
    /// stack pointer, to be stored in the task's control block.
    ///
    /// The returned pointer is `stack_base + stack_size - FRAME_SLOTS` words
    /// and points to the status word, the first one the context switch
    /// routine pops.
    ///
    /// # Safety
    ///
    /// 1. `stack_base..stack_base + stack_size` must be a writable, word
    /// aligned region exclusively owned by the new task.
    /// 2. `stack_size` must be at least [`FRAME_SLOTS`].
    /// 3. The task must not be visible to the scheduler until this function
    /// returns.
    pub unsafe fn build(
        &self,
        entry: Word,
        arg: Word,
        stack_base: *mut Word,
        stack_size: usize,
    ) -> *mut Word {
        let frame = Frame::new(entry, arg, self.task_return);

        let mut sp = stack_base.add(stack_size);
        for &slot in LAYOUT.iter().rev() {
            sp = sp.sub(1);
            sp.write(frame[slot]);
        }
        debug_assert_eq!(sp, stack_base.add(sp_offset(stack_size)));

        log::trace!(
            "ctx::build: entry = {:#010x}, arg = {:#010x}, sp = {:?}, mode = {:?}",
            entry,
            arg,
            sp,
            frame.mode()
        );
        sp
    }

    /// Build the initial frame at the top of `stack`.
    ///
    /// Returns the index of the initial stack pointer in `stack`.
    pub fn build_in(&self, stack: &mut [Word], entry: Word, arg: Word) -> Result<usize, Error> {
        let have = stack.len();
        if have < FRAME_SLOTS {
            return Err(Error::StackTooSmall {
                need: FRAME_SLOTS,
                have,
            });
        }
        // SAFETY: the slice is exclusively borrowed and long enough.
        unsafe { self.build(entry, arg, stack.as_mut_ptr(), have) };
        Ok(sp_offset(have))
    }
}
