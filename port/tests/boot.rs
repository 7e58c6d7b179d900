use std::{cell::Cell, collections::BTreeMap};

use archop::io::Io;
use arm_port::{
    consts::*,
    ctx::{Frame, Mode, Slot, StackBuilder},
    hook::{Features, Hooks, Measure, Profile, Task, Ts},
    intr::{
        init_except_stack,
        vect::{self, Exception, Handlers},
    },
    Word,
};

/// A flat word-addressed memory standing in for the low vector page.
struct VectorPage([Word; 32]);

impl Io for VectorPage {
    type Val = Word;

    unsafe fn read(&self, addr: usize) -> Word {
        self.0[addr / WORD_SIZE]
    }

    unsafe fn write(&mut self, addr: usize, value: Word) {
        self.0[addr / WORD_SIZE] = value;
    }
}

struct Tcb {
    sp: *mut Word,
    profile: Profile,
}

impl Task for Tcb {
    fn profile(&self) -> &Profile {
        &self.profile
    }
}

struct Cycles(Cell<Ts>);

impl Measure for Cycles {
    fn timestamp(&self) -> Ts {
        self.0.get()
    }

    fn int_dis_max_cur_reset(&self) -> Ts {
        0
    }

    fn sched_lock_max_cur_reset(&self) -> Ts {
        0
    }
}

const TASK_RETURN: Word = 0x0000_0F00;

#[test]
fn startup_sequence() {
    let mut isr_stack = [0xA5A5_A5A5; 64];
    let base = init_except_stack(&mut isr_stack).unwrap();
    assert_eq!(unsafe { *base.as_ptr() }, 0);

    let handlers = Handlers::new([0x100, 0x200, 0x300, 0x400, 0x500, 0x600]);
    let mut page = VectorPage([0; 32]);
    unsafe { vect::install(&mut page, &handlers) };
    assert!(unsafe { vect::is_installed(&page, &handlers) });
    assert_eq!(page.0[0], 0, "reset vector");
    assert_eq!(page.0[5], 0, "reserved vector");
    for ex in Exception::ALL {
        assert_eq!(page.0[ex.vect_addr() / WORD_SIZE], JUMP_TO_HANDLER);
    }
    assert_eq!(page.0[Exception::Irq.handler_addr() / WORD_SIZE], 0x500);

    let before = page.0;
    unsafe { vect::install(&mut page, &handlers) };
    assert_eq!(page.0, before);
}

#[test]
fn create_and_switch() {
    let builder = StackBuilder::new(TASK_RETURN);
    let mut stk_a = vec![0; 128];
    let mut stk_b = vec![0; 256];

    let a = Tcb {
        sp: unsafe { builder.build(0x0001_0000, 0x11, stk_a.as_mut_ptr(), stk_a.len()) },
        profile: Profile::new(),
    };
    let b = Tcb {
        sp: unsafe { builder.build(0x0002_0001, 0x22, stk_b.as_mut_ptr(), stk_b.len()) },
        profile: Profile::new(),
    };
    assert_eq!(a.sp, unsafe { stk_a.as_mut_ptr().add(128 - FRAME_SLOTS) });
    assert_eq!(b.sp, unsafe { stk_b.as_mut_ptr().add(256 - FRAME_SLOTS) });

    let fa = unsafe { Frame::from_stack(a.sp) };
    let fb = unsafe { Frame::from_stack(b.sp) };
    assert_eq!((fa.mode(), fa.resume_addr(), fa.arg()), (Mode::Arm, 0x0001_0000, 0x11));
    assert_eq!((fb.mode(), fb.resume_addr(), fb.arg()), (Mode::Thumb, 0x0002_0000, 0x22));
    assert_eq!(fa[Slot::Lr], TASK_RETURN);
    assert_eq!(fb[Slot::Lr], TASK_RETURN);

    let hooks = Hooks::<Tcb>::new();
    let clock = Cycles(Cell::new(10));
    let profile = Features {
        task_profile: true,
        ..Features::NONE
    };
    hooks.task_switch_with(profile, &a, &b, &clock);
    clock.0.set(75);
    hooks.task_switch_with(profile, &b, &a, &clock);
    assert_eq!(a.profile.cycles_total(), 10);
    assert_eq!(b.profile.cycles_total(), 65);
}

#[test]
fn restore_order_by_slot() {
    let builder = StackBuilder::new(TASK_RETURN);
    let mut stack = [0; 48];
    let sp = builder.build_in(&mut stack, 0x8000, 0xAAAA).unwrap();

    let image: BTreeMap<Slot, Word> = arm_port::ctx::LAYOUT
        .iter()
        .zip(&stack[sp..])
        .map(|(&slot, &word)| (slot, word))
        .collect();
    assert_eq!(image.len(), FRAME_SLOTS);
    assert_eq!(image[&Slot::Cpsr], MODE_ARM);
    assert_eq!(image[&Slot::R0], 0xAAAA);
    assert_eq!(image[&Slot::Lr], TASK_RETURN);
    assert_eq!(image[&Slot::Pc], 0x8000);
    for (slot, word) in image {
        if let Some(sentinel) = slot.sentinel() {
            assert_eq!(word, sentinel, "{:?}", slot);
        }
    }
}
