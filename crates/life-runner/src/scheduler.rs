//! Fixed-cadence tick driver.
//!
//! The scheduler owns the [`Simulation`] and is the only writer of the published
//! snapshot. Each timer firing computes a whole tick and then swaps the snapshot,
//! so readers only ever see committed worlds. Pausing drops the timer; starting
//! again creates a fresh one, so no ticks pile up while paused.

use life_core::{Error, Result, SimulationConfig};
use life_world::{Simulation, World};
use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::{interval_at, Duration, Instant, Interval, MissedTickBehavior};
use tracing::{debug, error, info, instrument};

#[derive(Debug)]
enum Command {
    Start,
    Pause,
    SetSpeed(u32),
    Reset(Box<SimulationConfig>),
    Shutdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerStatus {
    pub running: bool,
    pub ticks_per_second: u32,
}

#[derive(Debug, Clone)]
pub struct SchedulerOptions {
    /// Begin ticking immediately instead of waiting for `start`
    pub start_running: bool,
    /// Stop after this many ticks of the current world
    pub max_ticks: Option<u64>,
    /// Emit a population summary every N ticks; 0 disables it
    pub log_every: u64,
}

impl Default for SchedulerOptions {
    fn default() -> Self {
        Self {
            start_running: true,
            max_ticks: None,
            log_every: 100,
        }
    }
}

/// Cloneable control and read access to a running scheduler
#[derive(Clone)]
pub struct SchedulerHandle {
    commands: mpsc::UnboundedSender<Command>,
    published: Arc<RwLock<Arc<World>>>,
    status: Arc<RwLock<SchedulerStatus>>,
}

impl SchedulerHandle {
    /// Latest committed world
    pub fn snapshot(&self) -> Arc<World> {
        self.published.read().clone()
    }

    pub fn status(&self) -> SchedulerStatus {
        *self.status.read()
    }

    pub fn start(&self) -> Result<()> {
        self.send(Command::Start)
    }

    pub fn pause(&self) -> Result<()> {
        self.send(Command::Pause)
    }

    pub fn set_speed(&self, ticks_per_second: u32) -> Result<()> {
        if ticks_per_second == 0 {
            return Err(Error::InvalidConfig(
                "ticks_per_second must be positive".to_string(),
            ));
        }
        self.send(Command::SetSpeed(ticks_per_second))
    }

    /// Replace the world with a freshly generated one
    pub fn reset(&self, config: SimulationConfig) -> Result<()> {
        config.validate()?;
        self.send(Command::Reset(Box::new(config)))
    }

    pub fn shutdown(&self) -> Result<()> {
        self.send(Command::Shutdown)
    }

    fn send(&self, command: Command) -> Result<()> {
        self.commands
            .send(command)
            .map_err(|_| Error::InvalidState("scheduler has stopped".to_string()))
    }
}

pub struct Scheduler {
    simulation: Simulation,
    options: SchedulerOptions,
    commands: mpsc::UnboundedReceiver<Command>,
    published: Arc<RwLock<Arc<World>>>,
    status: Arc<RwLock<SchedulerStatus>>,
}

impl Scheduler {
    pub fn new(simulation: Simulation, options: SchedulerOptions) -> (Self, SchedulerHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        let published = Arc::new(RwLock::new(simulation.snapshot()));
        let status = Arc::new(RwLock::new(SchedulerStatus {
            running: false,
            ticks_per_second: simulation.config().ticks_per_second,
        }));

        let handle = SchedulerHandle {
            commands: tx,
            published: Arc::clone(&published),
            status: Arc::clone(&status),
        };

        let scheduler = Self {
            simulation,
            options,
            commands: rx,
            published,
            status,
        };

        (scheduler, handle)
    }

    /// Drive the simulation until shutdown, the tick limit, or every handle is dropped.
    /// Returns the final snapshot.
    pub async fn run(mut self) -> Arc<World> {
        let mut ticker = None;
        if self.options.start_running {
            ticker = Some(self.ticker());
        }
        self.set_running(ticker.is_some());

        loop {
            tokio::select! {
                command = self.commands.recv() => {
                    let Some(command) = command else { break };
                    if !self.handle_command(command, &mut ticker) {
                        break;
                    }
                }
                _ = next_tick(&mut ticker) => {
                    self.tick();
                    if self.limit_reached() {
                        info!(tick = self.simulation.tick(), "Tick limit reached");
                        break;
                    }
                }
            }
        }

        self.set_running(false);
        self.simulation.snapshot()
    }

    /// Returns false when the loop should stop
    #[instrument(skip(self, ticker))]
    fn handle_command(&mut self, command: Command, ticker: &mut Option<Interval>) -> bool {
        match command {
            Command::Start => {
                if ticker.is_none() {
                    *ticker = Some(self.ticker());
                    info!(tick = self.simulation.tick(), "Simulation started");
                }
            }
            Command::Pause => {
                if ticker.take().is_some() {
                    info!(tick = self.simulation.tick(), "Simulation paused");
                }
            }
            Command::SetSpeed(ticks_per_second) => {
                self.status.write().ticks_per_second = ticks_per_second;
                if ticker.is_some() {
                    *ticker = Some(self.ticker());
                }
                debug!(ticks_per_second, "Speed changed");
            }
            Command::Reset(config) => match Simulation::new(*config) {
                Ok(simulation) => {
                    self.status.write().ticks_per_second = simulation.config().ticks_per_second;
                    self.simulation = simulation;
                    self.publish(self.simulation.snapshot());
                    if ticker.is_some() {
                        *ticker = Some(self.ticker());
                    }
                    info!("Simulation reset");
                }
                Err(e) => error!("Failed to reset simulation: {}", e),
            },
            Command::Shutdown => {
                info!("Scheduler shutting down");
                return false;
            }
        }
        self.set_running(ticker.is_some());
        true
    }

    fn tick(&mut self) {
        let world = self.simulation.step();
        let stats = &world.stats;

        if self.options.log_every > 0 && stats.step % self.options.log_every == 0 {
            info!(
                event = "population_metrics",
                tick = stats.step,
                population = stats.organism_count,
                population_trend = ?stats.history.population_trend(),
                food = stats.food_count,
                food_trend = ?stats.history.food_trend(),
                total_energy = stats.total_energy,
                species = stats.species_count,
                "Population metrics snapshot"
            );
        }

        self.publish(world);
    }

    fn publish(&self, world: Arc<World>) {
        *self.published.write() = world;
    }

    fn limit_reached(&self) -> bool {
        self.options
            .max_ticks
            .map_or(false, |max| self.simulation.tick() >= max)
    }

    fn set_running(&self, running: bool) {
        self.status.write().running = running;
    }

    /// A new timer whose first tick is one period away
    fn ticker(&self) -> Interval {
        let period = Duration::from_secs(1) / self.status.read().ticks_per_second.max(1);
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker
    }
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simulation(ticks_per_second: u32) -> Simulation {
        let config = SimulationConfig {
            seed: Some(42),
            ticks_per_second,
            ..Default::default()
        };
        Simulation::new(config).unwrap()
    }

    fn options(start_running: bool, max_ticks: Option<u64>) -> SchedulerOptions {
        SchedulerOptions {
            start_running,
            max_ticks,
            log_every: 0,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_follow_speed() {
        let (scheduler, handle) = Scheduler::new(simulation(2), options(true, None));
        let task = tokio::spawn(scheduler.run());

        tokio::time::sleep(Duration::from_millis(1600)).await;
        assert_eq!(handle.snapshot().stats.step, 3);

        handle.shutdown().unwrap();
        let world = task.await.unwrap();
        assert_eq!(world.stats.step, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_does_not_queue_ticks() {
        let (scheduler, handle) = Scheduler::new(simulation(2), options(true, None));
        let task = tokio::spawn(scheduler.run());

        tokio::time::sleep(Duration::from_millis(1100)).await;
        handle.pause().unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(!handle.status().running);
        assert_eq!(handle.snapshot().stats.step, 2);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(handle.snapshot().stats.step, 2);

        handle.start().unwrap();
        tokio::time::sleep(Duration::from_millis(600)).await;
        assert!(handle.status().running);
        assert_eq!(handle.snapshot().stats.step, 3);

        handle.shutdown().unwrap();
        task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_starts_paused_when_asked() {
        let (scheduler, handle) = Scheduler::new(simulation(10), options(false, None));
        let task = tokio::spawn(scheduler.run());

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(handle.snapshot().stats.step, 0);
        assert!(!handle.status().running);

        handle.shutdown().unwrap();
        task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_speed_change() {
        let (scheduler, handle) = Scheduler::new(simulation(1), options(true, None));
        let task = tokio::spawn(scheduler.run());

        handle.set_speed(10).unwrap();
        tokio::time::sleep(Duration::from_millis(1050)).await;
        assert_eq!(handle.status().ticks_per_second, 10);
        assert_eq!(handle.snapshot().stats.step, 10);

        assert!(handle.set_speed(0).is_err());

        handle.shutdown().unwrap();
        task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_stops_at_tick_limit() {
        let (scheduler, handle) = Scheduler::new(simulation(20), options(true, Some(25)));

        let world = scheduler.run().await;

        assert_eq!(world.stats.step, 25);
        assert_eq!(handle.snapshot().stats.step, 25);
        assert!(handle.start().is_err());
        assert!(matches!(handle.shutdown(), Err(Error::InvalidState(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_replaces_world() {
        let (scheduler, handle) = Scheduler::new(simulation(4), options(true, None));
        let task = tokio::spawn(scheduler.run());

        tokio::time::sleep(Duration::from_millis(1100)).await;
        assert_eq!(handle.snapshot().stats.step, 4);

        let mut config = SimulationConfig {
            seed: Some(7),
            ticks_per_second: 4,
            ..Default::default()
        };
        config.world.grid_size = 12;
        handle.reset(config.clone()).unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;

        let world = handle.snapshot();
        assert_eq!(world.size(), 12);
        assert_eq!(world.stats.step, 0);

        config.world.grid_size = 0;
        assert!(handle.reset(config).is_err());

        handle.shutdown().unwrap();
        task.await.unwrap();
    }

    #[tokio::test]
    async fn test_dropping_handles_stops_scheduler() {
        let (scheduler, handle) = Scheduler::new(simulation(2), options(false, None));
        drop(handle);

        let world = scheduler.run().await;
        assert_eq!(world.stats.step, 0);
    }
}
