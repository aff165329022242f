//! Best-effort cleanup at process termination.
//!
//! Destinations that hold process-visible resources (a hidden cursor, an open
//! file) attach one hook under their [`DestinationId`]. Hooks run at most once:
//! on a normal exit (`atexit`), on SIGINT/SIGTERM/SIGHUP/SIGQUIT, or when
//! [`run`]/[`run_all`] is called explicitly. Attach and detach are idempotent.

use crate::writer::DestinationId;
use once_cell::sync::Lazy;
use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard, Once, PoisonError},
};

pub type ExitHook = Box<dyn FnOnce() + Send>;

/// hooks keyed by destination; each hook leaves the registry when it runs
#[derive(Default)]
pub struct HookRegistry {
    hooks: Mutex<HashMap<DestinationId, ExitHook>>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn hooks(&self) -> MutexGuard<'_, HashMap<DestinationId, ExitHook>> {
        self.hooks.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// a second attach under the same id keeps the first hook
    pub fn attach(&self, id: DestinationId, hook: ExitHook) -> bool {
        let mut hooks = self.hooks();
        if hooks.contains_key(&id) {
            return false;
        }
        hooks.insert(id, hook);
        true
    }

    pub fn detach(&self, id: DestinationId) -> bool {
        self.hooks().remove(&id).is_some()
    }

    pub fn is_attached(&self, id: DestinationId) -> bool {
        self.hooks().contains_key(&id)
    }

    /// run one hook now; false when none is attached under `id`
    pub fn run(&self, id: DestinationId) -> bool {
        // taken out of the lock first so the hook may touch the registry
        let hook = self.hooks().remove(&id);
        match hook {
            Some(hook) => {
                hook();
                true
            }
            None => false,
        }
    }

    /// run and drop every attached hook; returns how many ran
    pub fn run_all(&self) -> usize {
        let drained: Vec<ExitHook> = self.hooks().drain().map(|(_, hook)| hook).collect();
        let count = drained.len();
        for hook in drained {
            hook();
        }
        count
    }
}

static HOOKS: Lazy<HookRegistry> = Lazy::new(HookRegistry::new);

static INSTALL: Once = Once::new();

/// register a process-wide hook; installs the exit and signal handlers once
pub fn attach(id: DestinationId, hook: ExitHook) -> bool {
    INSTALL.call_once(install);

    let attached = HOOKS.attach(id, hook);
    if attached {
        log::debug!("Exit hook attached for {}", id);
    }
    attached
}

/// remove a hook without running it; detaching twice is a no-op
pub fn detach(id: DestinationId) -> bool {
    let removed = HOOKS.detach(id);
    if removed {
        log::debug!("Exit hook detached for {}", id);
    }
    removed
}

pub fn is_attached(id: DestinationId) -> bool {
    HOOKS.is_attached(id)
}

/// run the hook attached under `id` ahead of process exit
pub fn run(id: DestinationId) -> bool {
    HOOKS.run(id)
}

/// run and drop every process-wide hook
pub fn run_all() {
    let count = HOOKS.run_all();
    if count > 0 {
        log::debug!("Ran {} exit hooks", count);
    }
}

#[cfg(unix)]
fn install() {
    extern "C" fn run_at_exit() {
        run_all();
    }

    // SAFETY: registering a plain extern "C" fn with no captured state
    if unsafe { libc::atexit(run_at_exit) } != 0 {
        log::debug!("Failed to register atexit handler");
    }

    install_signal_listener();
}

#[cfg(unix)]
fn install_signal_listener() {
    use signal_hook::{
        consts::{SIGHUP, SIGINT, SIGQUIT, SIGTERM},
        iterator::Signals,
        low_level,
    };

    let mut signals = match Signals::new([SIGINT, SIGTERM, SIGHUP, SIGQUIT]) {
        Ok(signals) => signals,
        Err(e) => {
            log::debug!("Failed to register signal listener: {}", e);
            return;
        }
    };

    let spawned = std::thread::Builder::new()
        .name("taglog-exit-hooks".to_string())
        .spawn(move || {
            if let Some(signal) = signals.forever().next() {
                log::debug!("Received signal {}, running exit hooks", signal);
                run_all();
                if let Err(e) = low_level::emulate_default_handler(signal) {
                    log::error!("Failed to re-raise signal {}: {}", signal, e);
                    std::process::exit(128 + signal);
                }
            }
        });

    if let Err(e) = spawned {
        log::debug!("Failed to spawn signal listener thread: {}", e);
    }
}

#[cfg(not(unix))]
fn install() {}
