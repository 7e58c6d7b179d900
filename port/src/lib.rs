//! The ARM7/ARM9 port of the real-time kernel.
//!
//! This crate owns the parts of the kernel that know the processor: the
//! initial register image of a new task ([`ctx`]), the exception vector table
//! ([`intr`]) and the lifecycle hook glue ([`hook`]).

#![cfg_attr(not(test), no_std)]

pub mod consts;
pub mod ctx;
pub mod hook;
pub mod intr;
pub mod log;

pub use self::consts::Word;
