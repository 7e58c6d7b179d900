use core::cell::Cell;

/// A timestamp of the free-running cycle counter.
pub type Ts = u32;
/// An accumulated count of cycles.
pub type Cycles = u64;

/// Measurements of one task, kept in its control block.
///
/// Only the task switch hook writes these, with interrupts disabled, so plain
/// cells are enough.
#[derive(Debug, Default)]
pub struct Profile {
    cycles_start: Cell<Ts>,
    cycles_delta: Cell<Ts>,
    cycles_total: Cell<Cycles>,
    int_dis_time_max: Cell<Ts>,
    sched_lock_time_max: Cell<Ts>,
}

impl Profile {
    pub const fn new() -> Self {
        Profile {
            cycles_start: Cell::new(0),
            cycles_delta: Cell::new(0),
            cycles_total: Cell::new(0),
            int_dis_time_max: Cell::new(0),
            sched_lock_time_max: Cell::new(0),
        }
    }

    /// When the task was last switched in.
    #[inline]
    pub fn cycles_start(&self) -> Ts {
        self.cycles_start.get()
    }

    /// The length of the task's last run.
    #[inline]
    pub fn cycles_delta(&self) -> Ts {
        self.cycles_delta.get()
    }

    #[inline]
    pub fn cycles_total(&self) -> Cycles {
        self.cycles_total.get()
    }

    #[inline]
    pub fn int_dis_time_max(&self) -> Ts {
        self.int_dis_time_max.get()
    }

    #[inline]
    pub fn sched_lock_time_max(&self) -> Ts {
        self.sched_lock_time_max.get()
    }

    fn switch_out(&self, now: Ts) {
        let delta = now.wrapping_sub(self.cycles_start.get());
        self.cycles_delta.set(delta);
        self.cycles_total
            .set(self.cycles_total.get().wrapping_add(Cycles::from(delta)));
    }

    fn keep_max(cell: &Cell<Ts>, value: Ts) {
        if cell.get() < value {
            cell.set(value);
        }
    }
}

/// The kernel's time sources consumed on a task switch.
pub trait Measure {
    /// Read the free-running cycle counter.
    fn timestamp(&self) -> Ts;

    /// Return the longest interrupt-disabled section since the last call,
    /// and restart the measurement.
    fn int_dis_max_cur_reset(&self) -> Ts;

    /// Return the longest scheduler-locked section since the last call, and
    /// restart the measurement.
    fn sched_lock_max_cur_reset(&self) -> Ts;
}

/// Which measurements the task switch hook performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Features {
    pub task_profile: bool,
    pub int_dis_meas: bool,
    pub sched_lock_meas: bool,
}

impl Features {
    pub const NONE: Features = Features {
        task_profile: false,
        int_dis_meas: false,
        sched_lock_meas: false,
    };

    pub const ALL: Features = Features {
        task_profile: true,
        int_dis_meas: true,
        sched_lock_meas: true,
    };

    /// The measurements enabled at build time.
    pub const BUILD: Features = Features {
        task_profile: cfg!(feature = "task-profile"),
        int_dis_meas: cfg!(feature = "int-dis-meas"),
        sched_lock_meas: cfg!(feature = "sched-lock-meas"),
    };
}

/// Account a switch from `cur` to `next`. `same` tells if they are the same
/// task.
pub(super) fn on_switch(
    features: Features,
    cur: &Profile,
    next: &Profile,
    same: bool,
    meas: &impl Measure,
) {
    if features.task_profile {
        let now = meas.timestamp();
        if !same {
            cur.switch_out(now);
        }
        next.cycles_start.set(now);
    }

    if features.int_dis_meas {
        Profile::keep_max(&cur.int_dis_time_max, meas.int_dis_max_cur_reset());
    }

    if features.sched_lock_meas {
        Profile::keep_max(&cur.sched_lock_time_max, meas.sched_lock_max_cur_reset());
    }
}
