use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread::{self, JoinHandle},
    time::Duration,
};

use log::{debug, warn};
use parking_lot::{RwLock, RwLockReadGuard};

use super::{PhysicsWorld, TickReport};

/// Drives a world on a dedicated thread.
///
/// Each loop iteration checks the pause gate once and, when running, executes
/// one full tick under the write lock. Readers such as a renderer take the
/// read lock between ticks and never observe a half-finished tick.
pub struct SimulationRunner {
    world: Arc<RwLock<PhysicsWorld>>,
    paused: Arc<AtomicBool>,
    shutdown: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl SimulationRunner {
    /// Starts ticking immediately, sleeping `interval` between ticks.
    pub fn start(world: PhysicsWorld, interval: Duration) -> Self {
        Self::spawn(world, interval, false)
    }

    /// Starts with the pause gate closed; use [`Self::resume`] or [`Self::step_once`].
    pub fn start_paused(world: PhysicsWorld, interval: Duration) -> Self {
        Self::spawn(world, interval, true)
    }

    fn spawn(world: PhysicsWorld, interval: Duration, paused: bool) -> Self {
        let world = Arc::new(RwLock::new(world));
        let paused = Arc::new(AtomicBool::new(paused));
        let shutdown = Arc::new(AtomicBool::new(false));

        let handle = {
            let world = Arc::clone(&world);
            let paused = Arc::clone(&paused);
            let shutdown = Arc::clone(&shutdown);
            thread::spawn(move || {
                debug!("simulation thread started");
                while !shutdown.load(Ordering::Acquire) {
                    if !paused.load(Ordering::Acquire) {
                        world.write().step();
                    }
                    thread::sleep(interval);
                }
                debug!("simulation thread stopped");
            })
        };

        Self {
            world,
            paused,
            shutdown,
            handle: Some(handle),
        }
    }

    pub fn pause(&self) {
        self.paused.store(true, Ordering::Release);
    }

    pub fn resume(&self) {
        self.paused.store(false, Ordering::Release);
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Acquire)
    }

    /// Runs exactly one tick on the caller's thread. Only honoured while paused.
    pub fn step_once(&self) -> Option<TickReport> {
        if !self.is_paused() {
            return None;
        }
        Some(self.world.write().step())
    }

    /// Read access for presentation.
    pub fn world(&self) -> RwLockReadGuard<'_, PhysicsWorld> {
        self.world.read()
    }

    pub fn shared_world(&self) -> Arc<RwLock<PhysicsWorld>> {
        Arc::clone(&self.world)
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// Signals the loop to finish its current iteration and joins it.
    pub fn stop(&mut self) {
        self.shutdown.store(true, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("simulation thread panicked");
            }
        }
    }
}

impl Drop for SimulationRunner {
    fn drop(&mut self) {
        self.stop();
    }
}
