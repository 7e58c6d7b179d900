use crate::reg::Cpsr;

pub mod cpsr {
    use core::arch::asm;

    /// Read the CPSR of the current CPU.
    ///
    /// # Safety
    ///
    /// The CPU must be executing in the ARM state.
    #[inline]
    pub unsafe fn read() -> u32 {
        let ret;
        asm!("mrs {}, cpsr", out(reg) ret);
        ret
    }

    /// Write the control field of the CPSR of the current CPU.
    ///
    /// # Safety
    ///
    /// The caller must ensure the operation won't influence other modules,
    /// and that the mode bits of `val` are the current mode.
    #[inline]
    pub unsafe fn write_c(val: u32) {
        asm!("msr cpsr_c, {}", in(reg) val);
    }
}

/// # Safety
///
/// Invalid use of this function can cause CPU unrecoverable fault.
#[inline]
pub unsafe fn pause_intr() -> u32 {
    let cpsr = cpsr::read();
    cpsr::write_c(cpsr | (Cpsr::I | Cpsr::F).bits());
    cpsr
}

/// # Safety
///
/// Invalid use of this function can cause CPU unrecoverable fault.
#[inline]
pub unsafe fn resume_intr(saved: Option<u32>) {
    let cur = Cpsr::from_bits_truncate(cpsr::read());
    let new = match saved {
        Some(saved) => cur.with_intr_of(Cpsr::from_bits_truncate(saved)),
        None => cur - (Cpsr::I | Cpsr::F),
    };
    cpsr::write_c(new.bits());
}
