use core::{
    mem::size_of,
    ops::{Index, IndexMut},
};

use static_assertions::*;

use crate::consts::*;

/// One position of the saved register image, named after what it restores.
///
/// The discriminant is the distance from the stack pointer in words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(usize)]
pub enum Slot {
    Cpsr = 0,
    R0,
    R1,
    R2,
    R3,
    R4,
    R5,
    R6,
    R7,
    R8,
    R9,
    R10,
    R11,
    R12,
    Lr,
    Pc,
}

/// The frame layout in restore order, from the stack pointer upward.
pub const LAYOUT: [Slot; FRAME_SLOTS] = [
    Slot::Cpsr,
    Slot::R0,
    Slot::R1,
    Slot::R2,
    Slot::R3,
    Slot::R4,
    Slot::R5,
    Slot::R6,
    Slot::R7,
    Slot::R8,
    Slot::R9,
    Slot::R10,
    Slot::R11,
    Slot::R12,
    Slot::Lr,
    Slot::Pc,
];

impl Slot {
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The fill pattern of the slot in a fresh frame, if it is a scratch
    /// register.
    pub const fn sentinel(self) -> Option<Word> {
        match self {
            Slot::R1
            | Slot::R2
            | Slot::R3
            | Slot::R4
            | Slot::R5
            | Slot::R6
            | Slot::R7
            | Slot::R8
            | Slot::R9
            | Slot::R10
            | Slot::R11
            | Slot::R12 => Some(SENTINELS[self as usize - Slot::R1 as usize]),
            _ => None,
        }
    }
}

/// The instruction set a task starts in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Arm,
    Thumb,
}

impl Mode {
    /// Read the mode selector of a code address.
    #[inline]
    pub const fn of_entry(entry: Word) -> Mode {
        if entry & THUMB_BIT == THUMB_BIT {
            Mode::Thumb
        } else {
            Mode::Arm
        }
    }

    #[inline]
    pub const fn status_word(self) -> Word {
        match self {
            Mode::Arm => MODE_ARM,
            Mode::Thumb => MODE_THUMB,
        }
    }
}

/// The register image popped by the context switch routine when a task is
/// first scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub struct Frame([Word; FRAME_SLOTS]);
const_assert_eq!(size_of::<Frame>(), FRAME_SLOTS * WORD_SIZE);
const_assert_eq!(LAYOUT.len(), FRAME_SLOTS);

impl Frame {
    const CPSR: &'static str = "M0 M1 M2 M3 M4 T F I";

    /// Construct the image of a task entering `entry` with `arg`, returning
    /// into `task_return`.
    ///
    /// The slots are filled from the top of the image down, in the same order
    /// they are pushed onto the stack.
    pub fn new(entry: Word, arg: Word, task_return: Word) -> Frame {
        let mut frame = Frame([0; FRAME_SLOTS]);

        let task_addr = entry & !THUMB_BIT;
        frame[Slot::Pc] = task_addr;
        frame[Slot::Lr] = task_return;
        for &slot in LAYOUT.iter().rev() {
            if let Some(sentinel) = slot.sentinel() {
                frame[slot] = sentinel;
            }
        }
        frame[Slot::R0] = arg;
        // Tested on `entry`, not `task_addr`: the latter has lost the bit.
        frame[Slot::Cpsr] = Mode::of_entry(entry).status_word();

        frame
    }

    /// View the frame sitting at a task's saved stack pointer.
    ///
    /// # Safety
    ///
    /// `sp` must point to [`FRAME_SLOTS`] readable, aligned words that stay
    /// untouched for `'a`.
    pub unsafe fn from_stack<'a>(sp: *const Word) -> &'a Frame {
        &*sp.cast::<Frame>()
    }

    #[inline]
    pub fn slot(&self, slot: Slot) -> Word {
        self[slot]
    }

    /// The address the task resumes at.
    #[inline]
    pub fn resume_addr(&self) -> Word {
        self[Slot::Pc]
    }

    #[inline]
    pub fn return_link(&self) -> Word {
        self[Slot::Lr]
    }

    #[inline]
    pub fn arg(&self) -> Word {
        self[Slot::R0]
    }

    #[inline]
    pub fn cpsr(&self) -> Word {
        self[Slot::Cpsr]
    }

    /// Decode the instruction set from the status word.
    pub fn mode(&self) -> Mode {
        if archop::reg::Cpsr::from_bits_truncate(self.cpsr()).is_thumb() {
            Mode::Thumb
        } else {
            Mode::Arm
        }
    }

    /// Check if every scratch register still holds its fill pattern.
    ///
    /// Only meaningful before the task first runs.
    pub fn sentinels_intact(&self) -> bool {
        LAYOUT
            .iter()
            .filter_map(|&slot| slot.sentinel().map(|s| (slot, s)))
            .all(|(slot, sentinel)| self[slot] == sentinel)
    }

    pub fn dump(&self) {
        use log::info;

        use crate::log::flags::Flags;

        info!("Task frame dump (ABI rev {})", FRAME_ABI);
        info!("> Resume addr = {:#010x}", self.resume_addr());
        info!("> Return link = {:#010x}", self.return_link());
        info!(
            "> CPSR        = {:#010x} ({})",
            self.cpsr(),
            Flags::new(self.cpsr() as u64, Self::CPSR)
        );
        info!("> GPRs: ");
        info!("  r0  = {:#010x}, r1  = {:#010x}", self[Slot::R0], self[Slot::R1]);
        info!("  r2  = {:#010x}, r3  = {:#010x}", self[Slot::R2], self[Slot::R3]);
        info!("  r4  = {:#010x}, r5  = {:#010x}", self[Slot::R4], self[Slot::R5]);
        info!("  r6  = {:#010x}, r7  = {:#010x}", self[Slot::R6], self[Slot::R7]);
        info!("  r8  = {:#010x}, r9  = {:#010x}", self[Slot::R8], self[Slot::R9]);
        info!("  r10 = {:#010x}, r11 = {:#010x}", self[Slot::R10], self[Slot::R11]);
        info!("  r12 = {:#010x}", self[Slot::R12]);
        if !self.sentinels_intact() {
            log::warn!("> Scratch register fill patterns are damaged");
        }
    }
}

impl Index<Slot> for Frame {
    type Output = Word;

    fn index(&self, index: Slot) -> &Self::Output {
        &self.0[index.index()]
    }
}

impl IndexMut<Slot> for Frame {
    fn index_mut(&mut self, index: Slot) -> &mut Self::Output {
        &mut self.0[index.index()]
    }
}
