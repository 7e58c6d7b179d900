use core::marker::PhantomData;

use num_traits::PrimInt;

/// Raw word access at fixed physical addresses.
///
/// Every hardware table the port touches goes through this trait, so the
/// logic above it can run against a fake memory in tests.
pub trait Io {
    type Val: PrimInt;

    /// Read the word at `addr`.
    ///
    /// # Safety
    ///
    /// `addr` must be a valid, aligned location for `Self::Val`.
    unsafe fn read(&self, addr: usize) -> Self::Val;

    /// Write `value` to the word at `addr`.
    ///
    /// # Safety
    ///
    /// `addr` must be a valid, aligned location for `Self::Val`, and the write
    /// must not break any invariant the hardware or other code relies on.
    unsafe fn write(&mut self, addr: usize, value: Self::Val);
}

/// Volatile memory-mapped access.
#[derive(Debug, Default, Clone, Copy)]
pub struct Mmio<T>(PhantomData<T>);

impl<T> Mmio<T> {
    pub const fn new() -> Self {
        Mmio(PhantomData)
    }
}

impl<T: PrimInt> Io for Mmio<T> {
    type Val = T;

    #[inline]
    unsafe fn read(&self, addr: usize) -> T {
        (addr as *const T).read_volatile()
    }

    #[inline]
    unsafe fn write(&mut self, addr: usize, value: T) {
        (addr as *mut T).write_volatile(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mmio_round_trip() {
        let mut cell = [0u32; 4];
        let base = cell.as_mut_ptr() as usize;
        let mut io = Mmio::<u32>::new();
        unsafe {
            io.write(base + 4, 0xDEAD_BEEF);
            io.write(base + 12, 7);
            assert_eq!(io.read(base + 4), 0xDEAD_BEEF);
            assert_eq!(io.read(base + 12), 7);
            assert_eq!(io.read(base), 0);
        }
        assert_eq!(cell, [0, 0xDEAD_BEEF, 0, 7]);
    }
}
