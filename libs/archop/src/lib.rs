#![cfg_attr(not(test), no_std)]

pub mod io;
pub mod reg;

cfg_if::cfg_if! {
    if #[cfg(target_arch = "arm")] {
        mod arm;
        pub use self::arm::*;
    }
}
