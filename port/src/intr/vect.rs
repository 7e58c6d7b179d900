//! The exception vector table.
//!
//! Each vector slot of the table holds the same `LDR PC, [PC, #0x18]`
//! instruction, which jumps through a handler slot `0x20` bytes above it.
//! The kernel routes an exception by writing both words.

use archop::io::Io;

use crate::consts::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(usize)]
pub enum Exception {
    UndefInstr = 0x04,
    Swi = 0x08,
    PrefetchAbort = 0x0C,
    DataAbort = 0x10,
    Irq = 0x18,
    Fiq = 0x1C,
}

impl Exception {
    /// Every category routed to the kernel, in vector order.
    pub const ALL: [Exception; NR_EXCEPTIONS] = [
        Exception::UndefInstr,
        Exception::Swi,
        Exception::PrefetchAbort,
        Exception::DataAbort,
        Exception::Irq,
        Exception::Fiq,
    ];

    /// The address of the vector slot.
    #[inline]
    pub const fn vect_addr(self) -> usize {
        self as usize
    }

    /// The address of the handler slot the vector jumps through.
    #[inline]
    pub const fn handler_addr(self) -> usize {
        self as usize + HANDLER_OFFSET
    }

    /// The position of the category in [`Exception::ALL`].
    pub const fn index(self) -> usize {
        match self {
            Exception::UndefInstr => 0,
            Exception::Swi => 1,
            Exception::PrefetchAbort => 2,
            Exception::DataAbort => 3,
            Exception::Irq => 4,
            Exception::Fiq => 5,
        }
    }
}

/// The dispatch entry of every exception category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Handlers([Word; NR_EXCEPTIONS]);

impl Handlers {
    /// `addrs` is indexed in the order of [`Exception::ALL`].
    pub const fn new(addrs: [Word; NR_EXCEPTIONS]) -> Self {
        Handlers(addrs)
    }

    #[inline]
    pub fn get(&self, ex: Exception) -> Word {
        self.0[ex.index()]
    }

    /// The (address, value) pairs of a fully routed table, vector slot first
    /// for each category.
    pub fn words(&self) -> impl Iterator<Item = (usize, Word)> + '_ {
        Exception::ALL.into_iter().flat_map(move |ex| {
            [
                (ex.vect_addr(), JUMP_TO_HANDLER),
                (ex.handler_addr(), self.get(ex)),
            ]
        })
    }
}

cfg_if::cfg_if! {
    if #[cfg(target_arch = "arm")] {
        macro_rules! kernel_handlers {
            ($($name:ident),*) => {
                paste::paste! {
                    extern "C" {
                        $(fn [<except_hdl_ $name>]();)*
                    }

                    impl Handlers {
                        /// The assembly dispatch entries of the kernel.
                        pub fn kernel() -> Self {
                            Handlers::new([$([<except_hdl_ $name>] as usize as Word),*])
                        }
                    }
                }
            };
        }

        kernel_handlers!(undef_instr, swi, prefetch_abort, data_abort, irq, fiq);

        /// Route every exception to the kernel.
        ///
        /// IRQ and FIQ are masked while the table is written and left as the
        /// caller had them; unmasking is up to the boot sequence.
        ///
        /// # Safety
        ///
        /// Must be called once during single-threaded startup, with the vector
        /// table mapped writable at address 0.
        pub unsafe fn init() {
            let saved = archop::pause_intr();
            install(&mut archop::io::Mmio::<Word>::new(), &Handlers::kernel());
            archop::resume_intr(Some(saved));
        }
    }
}

/// Route every exception category to its handler in `handlers`.
///
/// Writing the same table again changes nothing.
///
/// # Safety
///
/// 1. `io` must reach the vector table of the running CPU.
/// 2. Interrupts must stay masked until this function returns: a trap taken
/// while the table is half written lands on a stale vector.
pub unsafe fn install<I: Io<Val = Word>>(io: &mut I, handlers: &Handlers) {
    for (addr, value) in handlers.words() {
        io.write(addr, value);
    }
    log::debug!("intr::vect::install: routed {} exceptions", NR_EXCEPTIONS);
}

/// Check if every category is routed to its handler in `handlers`.
///
/// # Safety
///
/// `io` must reach the vector table of the running CPU.
pub unsafe fn is_installed<I: Io<Val = Word>>(io: &I, handlers: &Handlers) -> bool {
    handlers.words().all(|(addr, value)| io.read(addr) == value)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[derive(Default)]
    struct Mem {
        words: BTreeMap<usize, Word>,
        writes: usize,
    }

    impl Io for Mem {
        type Val = Word;

        unsafe fn read(&self, addr: usize) -> Word {
            self.words.get(&addr).copied().unwrap_or(0)
        }

        unsafe fn write(&mut self, addr: usize, value: Word) {
            self.writes += 1;
            self.words.insert(addr, value);
        }
    }

    const HANDLERS: Handlers = Handlers::new([
        0x0010_0000,
        0x0010_0100,
        0x0010_0200,
        0x0010_0300,
        0x0010_0400,
        0x0010_0500,
    ]);

    #[test]
    fn addresses() {
        let vects: Vec<usize> = Exception::ALL.iter().map(|ex| ex.vect_addr()).collect();
        assert_eq!(vects, [0x04, 0x08, 0x0C, 0x10, 0x18, 0x1C]);
        for (i, ex) in Exception::ALL.into_iter().enumerate() {
            assert_eq!(ex.index(), i);
            assert_eq!(ex.handler_addr(), ex.vect_addr() + 0x20);
        }
    }

    #[test]
    fn install_table() {
        let mut mem = Mem::default();
        assert!(!unsafe { is_installed(&mem, &HANDLERS) });

        unsafe { install(&mut mem, &HANDLERS) };
        assert_eq!(mem.writes, 2 * NR_EXCEPTIONS);
        assert_eq!(mem.words.len(), 2 * NR_EXCEPTIONS);
        for ex in Exception::ALL {
            assert_eq!(mem.words[&ex.vect_addr()], JUMP_TO_HANDLER);
            assert_eq!(mem.words[&ex.handler_addr()], HANDLERS.get(ex));
        }
        assert_eq!(mem.words[&0x18], 0xE59F_F018);
        assert_eq!(mem.words[&0x38], 0x0010_0400);
        // Reset and the reserved vector stay untouched.
        assert!(!mem.words.contains_key(&0x00));
        assert!(!mem.words.contains_key(&0x14));
        assert!(unsafe { is_installed(&mem, &HANDLERS) });
    }

    #[test]
    fn idempotent() {
        let mut mem = Mem::default();
        unsafe { install(&mut mem, &HANDLERS) };
        let first = mem.words.clone();
        unsafe { install(&mut mem, &HANDLERS) };
        assert_eq!(mem.words, first);
    }

    #[test]
    fn detects_stale_handler() {
        let mut mem = Mem::default();
        unsafe { install(&mut mem, &HANDLERS) };
        mem.words.insert(Exception::Fiq.handler_addr(), 0);
        assert!(!unsafe { is_installed(&mem, &HANDLERS) });
    }
}
