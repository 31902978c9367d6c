//! The run loop: sessions of worker threads driving rounds of a test module.
//!
//! A run is a sequence of sessions. Each session spawns one OS thread per
//! test thread, pins the thread-id assignment chosen by the permuter, and
//! drives rounds until a halt rule fires: `Rotate` tears the session down
//! and starts a fresh one (new threads, permuted ids), `Exit` ends the run.

use crate::collector::Collector;
use crate::config::RunConfig;
use crate::error::{HarnessError, Result};
use crate::halt::{HaltKind, Rule};
use crate::sync::{Role, Synchroniser};
use litmus_core::{Environment, Manifest, Report, TestModule};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::thread;
use std::time::Instant;
use tracing::debug;

/// State shared by every worker of a run, across sessions.
struct Shared {
    env: Environment,
    manifest: Manifest,
    collector: Collector,
    rules: Vec<Rule>,
    started: Instant,
}

impl Shared {
    /// The leader's phase-B step: record the round, reset the environment
    /// for the next one, and consult the halt rules.
    fn observe(&self, module: &dyn TestModule) -> Option<HaltKind> {
        let summary = self.collector.observe(&self.env, module);
        self.env.reset(&self.manifest);
        let elapsed = self.started.elapsed();
        self.rules
            .iter()
            .filter_map(|rule| rule.fires(&summary, elapsed))
            .max()
    }
}

enum GateState {
    Waiting,
    Open,
    Aborted,
}

/// Holds workers at the start of a session until every sibling has spawned.
///
/// If any spawn fails the gate aborts instead, so already-spawned workers
/// bail out without ever touching the synchroniser. Without the gate a
/// partial session would deadlock: the synchroniser waits for workers that
/// will never exist.
struct StartGate {
    state: Mutex<GateState>,
    cond: Condvar,
}

impl StartGate {
    fn new() -> Self {
        Self {
            state: Mutex::new(GateState::Waiting),
            cond: Condvar::new(),
        }
    }

    /// Blocks until the gate resolves. `true` means run the session,
    /// `false` means bail out immediately.
    fn enter(&self) -> bool {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        while matches!(*state, GateState::Waiting) {
            state = self
                .cond
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
        matches!(*state, GateState::Open)
    }

    fn open(&self) {
        self.resolve(GateState::Open);
    }

    fn abort(&self) {
        self.resolve(GateState::Aborted);
    }

    fn resolve(&self, to: GateState) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = to;
        self.cond.notify_all();
    }
}

/// Executes a test module according to a [`RunConfig`].
pub struct Runner {
    module: Arc<dyn TestModule>,
    manifest: Manifest,
    config: RunConfig,
}

impl Runner {
    /// Validates the module's manifest and prepares a run.
    pub fn new(module: Arc<dyn TestModule>, config: RunConfig) -> Result<Self> {
        let manifest = module.manifest();
        manifest.validate()?;
        Ok(Self {
            module,
            manifest,
            config,
        })
    }

    /// Runs the module to completion and reports every distinct state seen.
    pub fn run(self) -> Result<Report> {
        let shared = Shared {
            env: Environment::for_manifest(&self.manifest)?,
            manifest: self.manifest.clone(),
            collector: Collector::new(),
            rules: self.config.halt_rules(),
            started: Instant::now(),
        };
        let mut permuter = self.config.permute.build(self.config.seed);
        let mut tids: Vec<usize> = (0..self.manifest.threads).collect();

        debug!(
            threads = self.manifest.threads,
            iterations = self.config.iterations,
            rotation_period = self.config.rotation_period,
            "run starting"
        );
        loop {
            permuter.permute(&mut tids);
            debug!(?tids, "session starting");
            match self.session(&shared, &tids)? {
                HaltKind::Rotate => continue,
                HaltKind::Exit => break,
            }
        }
        debug!(
            iterations = shared.collector.iterations(),
            distinct = shared.collector.distinct_states(),
            "run finished"
        );
        Ok(shared.collector.report(&self.manifest))
    }

    /// Spawns one worker per test thread and drives rounds until a halt
    /// rule fires. Returns the session's verdict.
    fn session(&self, shared: &Shared, tids: &[usize]) -> Result<HaltKind> {
        let sync = self.config.sync.build(self.manifest.threads)?;
        let sync: &dyn Synchroniser = sync.as_ref();
        let gate = &StartGate::new();
        let halt = &AtomicU8::new(0);
        let faulted = &AtomicBool::new(false);

        thread::scope(|scope| {
            let mut handles = Vec::with_capacity(tids.len());
            for &tid in tids {
                let spawned = thread::Builder::new()
                    .name(format!("litmus-worker-{tid}"))
                    .spawn_scoped(scope, move || {
                        self.worker_loop(tid, shared, sync, gate, halt, faulted)
                    });
                match spawned {
                    Ok(handle) => handles.push((tid, handle)),
                    Err(source) => {
                        gate.abort();
                        for (_, handle) in handles {
                            let _ = handle.join();
                        }
                        return Err(HarnessError::Spawn { tid, source });
                    }
                }
            }
            gate.open();

            let mut verdict = HaltKind::Rotate;
            for (tid, handle) in handles {
                let kind = handle
                    .join()
                    .map_err(|_| HarnessError::WorkerPanic { tid })??;
                verdict = verdict.max(kind);
            }
            Ok(verdict)
        })
    }

    /// One worker's session: rounds of body + synchronised observation,
    /// until the leader publishes a halt verdict.
    ///
    /// Panics in the module's body or postcondition are caught so that the
    /// worker still completes the round's phases; bailing out mid-round
    /// would strand the other workers on the synchroniser.
    fn worker_loop(
        &self,
        tid: usize,
        shared: &Shared,
        sync: &dyn Synchroniser,
        gate: &StartGate,
        halt: &AtomicU8,
        faulted: &AtomicBool,
    ) -> Result<HaltKind> {
        if !gate.enter() {
            return Ok(HaltKind::Exit);
        }
        loop {
            let body = catch_unwind(AssertUnwindSafe(|| self.module.run(tid, &shared.env)));
            if body.is_err() {
                faulted.store(true, Ordering::Release);
            }

            let mut check_panicked = false;
            match sync.run() {
                Role::Leader => {
                    let verdict = if faulted.load(Ordering::Acquire) {
                        Some(HaltKind::Exit)
                    } else {
                        match catch_unwind(AssertUnwindSafe(|| {
                            shared.observe(self.module.as_ref())
                        })) {
                            Ok(verdict) => verdict,
                            Err(_) => {
                                check_panicked = true;
                                Some(HaltKind::Exit)
                            }
                        }
                    };
                    halt.store(verdict.map_or(0, HaltKind::as_u8), Ordering::Release);
                    sync.observe();
                }
                Role::Follower => sync.wait(),
            }

            if body.is_err() || check_panicked {
                return Err(HarnessError::WorkerPanic { tid });
            }
            if let Some(kind) = HaltKind::from_u8(halt.load(Ordering::Acquire)) {
                return Ok(kind);
            }
        }
    }
}
