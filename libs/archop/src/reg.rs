//! The program status register.

bitflags::bitflags! {
    /// Bits of the CPSR / SPSR.
    ///
    /// The mode field `M[4:0]` is a value, not a set of flags; use
    /// [`Cpsr::mode`] to compare it.
    pub struct Cpsr: u32 {
        const M0 = 1 << 0;
        const M1 = 1 << 1;
        const M2 = 1 << 2;
        const M3 = 1 << 3;
        const M4 = 1 << 4;
        /// Thumb state.
        const T = 1 << 5;
        /// FIQ disabled.
        const F = 1 << 6;
        /// IRQ disabled.
        const I = 1 << 7;

        const MODE_USR = 0x10;
        const MODE_FIQ = 0x11;
        const MODE_IRQ = 0x12;
        const MODE_SVC = 0x13;
        const MODE_ABT = 0x17;
        const MODE_UND = 0x1B;
        const MODE_SYS = 0x1F;
    }
}

/// Mask of the mode field.
pub const MODE_MASK: u32 = 0x1F;

impl Cpsr {
    /// The raw mode field.
    #[inline]
    pub const fn mode(self) -> u32 {
        self.bits() & MODE_MASK
    }

    /// Whether the word selects the Thumb instruction set.
    #[inline]
    pub const fn is_thumb(self) -> bool {
        self.bits() & Self::T.bits() != 0
    }

    /// Take the IRQ and FIQ mask bits of `saved`, keeping everything else.
    #[inline]
    pub fn with_intr_of(self, saved: Cpsr) -> Cpsr {
        let mask = Self::I | Self::F;
        (self - mask) | (saved & mask)
    }
}
