//! Lifecycle hooks.
//!
//! The kernel calls into [`Hooks`] on every task lifecycle event. The
//! registry is built once, usually as a `static`, and never changes
//! afterwards:
//!
//! ```
//! use arm_port::hook::{Hooks, Profile, Task};
//!
//! struct Tcb {
//!     profile: Profile,
//! }
//!
//! impl Task for Tcb {
//!     fn profile(&self) -> &Profile {
//!         &self.profile
//!     }
//! }
//!
//! fn on_tick() {}
//!
//! static HOOKS: Hooks<Tcb> = Hooks::new().on_tick(on_tick);
//! HOOKS.time_tick();
//! ```

mod profile;

use core::ptr;

pub use self::profile::{Cycles, Features, Measure, Profile, Ts};

/// A task control block as seen by the hooks.
pub trait Task {
    fn profile(&self) -> &Profile;
}

/// The registered application callbacks. Absent ones are skipped silently.
pub struct Hooks<T> {
    create: Option<fn(&T)>,
    delete: Option<fn(&T)>,
    ret: Option<fn(&T)>,
    switch: Option<fn()>,
    tick: Option<fn()>,
    idle: Option<fn()>,
    stat: Option<fn()>,
}

impl<T> Hooks<T> {
    /// A registry without any callback.
    pub const fn new() -> Self {
        Hooks {
            create: None,
            delete: None,
            ret: None,
            switch: None,
            tick: None,
            idle: None,
            stat: None,
        }
    }

    pub const fn on_create(self, f: fn(&T)) -> Self {
        Hooks {
            create: Some(f),
            ..self
        }
    }

    pub const fn on_delete(self, f: fn(&T)) -> Self {
        Hooks {
            delete: Some(f),
            ..self
        }
    }

    /// Called when a task's entry function returns instead of deleting the
    /// task.
    pub const fn on_return(self, f: fn(&T)) -> Self {
        Hooks { ret: Some(f), ..self }
    }

    pub const fn on_switch(self, f: fn()) -> Self {
        Hooks {
            switch: Some(f),
            ..self
        }
    }

    pub const fn on_tick(self, f: fn()) -> Self {
        Hooks {
            tick: Some(f),
            ..self
        }
    }

    pub const fn on_idle(self, f: fn()) -> Self {
        Hooks {
            idle: Some(f),
            ..self
        }
    }

    pub const fn on_stat(self, f: fn()) -> Self {
        Hooks {
            stat: Some(f),
            ..self
        }
    }

    pub fn task_create(&self, task: &T) {
        if let Some(f) = self.create {
            f(task)
        }
    }

    pub fn task_delete(&self, task: &T) {
        if let Some(f) = self.delete {
            f(task)
        }
    }

    pub fn task_return(&self, task: &T) {
        if let Some(f) = self.ret {
            f(task)
        }
    }

    /// Called from the tick interrupt.
    pub fn time_tick(&self) {
        if let Some(f) = self.tick {
            f()
        }
    }

    /// Called by the idle task on every loop.
    pub fn idle(&self) {
        if let Some(f) = self.idle {
            f()
        }
    }

    /// Called by the statistics task once per second.
    pub fn stat(&self) {
        if let Some(f) = self.stat {
            f()
        }
    }
}

impl<T: Task> Hooks<T> {
    /// Called on every context switch from `cur` to `next`, with the
    /// measurements enabled at build time.
    ///
    /// Interrupts must be disabled. The hook never blocks.
    #[inline]
    pub fn task_switch(&self, cur: &T, next: &T, meas: &impl Measure) {
        self.task_switch_with(Features::BUILD, cur, next, meas)
    }

    pub fn task_switch_with(&self, features: Features, cur: &T, next: &T, meas: &impl Measure) {
        if let Some(f) = self.switch {
            f()
        }
        let same = ptr::eq(cur, next);
        profile::on_switch(features, cur.profile(), next.profile(), same, meas);
    }
}

impl<T> Default for Hooks<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Hooks<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Hooks<T> {}

impl<T> core::fmt::Debug for Hooks<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Hooks")
            .field("create", &self.create.is_some())
            .field("delete", &self.delete.is_some())
            .field("ret", &self.ret.is_some())
            .field("switch", &self.switch.is_some())
            .field("tick", &self.tick.is_some())
            .field("idle", &self.idle.is_some())
            .field("stat", &self.stat.is_some())
            .finish()
    }
}
