use archop::reg::Cpsr;

/// One stack element. Every frame slot and vector table entry is one word.
pub type Word = u32;

pub const WORD_SIZE: usize = core::mem::size_of::<Word>();

/// Revision of the frame layout shared with the context switch routine.
///
/// Bump it together with the assembly whenever [`FRAME_SLOTS`] or the slot
/// order changes.
pub const FRAME_ABI: u32 = 1;

/// The count of words the context switch routine pops for a task.
pub const FRAME_SLOTS: usize = 16;

/// The low bit of a code address selecting the Thumb instruction set.
pub const THUMB_BIT: Word = 1;

/// SVC mode, ARM state, IRQ and FIQ enabled.
pub const MODE_ARM: Word = Cpsr::MODE_SVC.bits();

/// SVC mode, Thumb state, IRQ and FIQ enabled.
pub const MODE_THUMB: Word = Cpsr::MODE_SVC.bits() | Cpsr::T.bits();

/// Fill patterns of `R1` to `R12` in a fresh frame.
pub const SENTINELS: [Word; 12] = [
    0x0101_0101,
    0x0202_0202,
    0x0303_0303,
    0x0404_0404,
    0x0505_0505,
    0x0606_0606,
    0x0707_0707,
    0x0808_0808,
    0x0909_0909,
    0x1010_1010,
    0x1111_1111,
    0x1212_1212,
];

/// `LDR PC, [PC, #0x18]`: jump through the word 0x20 bytes above the vector.
pub const JUMP_TO_HANDLER: Word = 0xE59F_F018;

/// Distance between a vector slot and the handler address it loads.
pub const HANDLER_OFFSET: usize = 0x20;

/// The count of exception categories routed to the kernel.
pub const NR_EXCEPTIONS: usize = 6;
