//! Simulation engine: the core of the simulation.
//!
//! `SimulationEngine` owns the hecs ECS world, processes commands, runs all
//! systems, and produces `SimSnapshot`s. Completely headless, enabling
//! deterministic testing.

use std::collections::VecDeque;

use hecs::{Entity, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use skyshield_core::commands::SimCommand;
use skyshield_core::components::AaBattery;
use skyshield_core::config::SimConfig;
use skyshield_core::enums::{FireMode, SimPhase};
use skyshield_core::error::{ConfigError, ImpactError};
use skyshield_core::events::{AudioEvent, SimEvent};
use skyshield_core::state::{ScoreView, SimSnapshot};
use skyshield_core::types::{Position, SimTime};

use crate::engagement::RadarLink;
use crate::environment::{Environment, FlatGround};
use crate::notify::NotificationSink;
use crate::scenario;
use crate::systems;
use crate::systems::radar::ImpactEstimate;
use crate::systems::snapshot::TickOutput;
use crate::tracking::DetectionRecord;
use crate::world_setup;

/// Upper bound for `SetTimeScale`.
const MAX_TIME_SCALE: f64 = 8.0;

/// The simulation engine. Owns the ECS world and all sim state.
pub struct SimulationEngine {
    world: World,
    config: SimConfig,
    time: SimTime,
    phase: SimPhase,
    fire_mode: FireMode,
    time_scale: f64,
    rng: ChaCha8Rng,
    command_queue: VecDeque<SimCommand>,
    despawn_buffer: Vec<Entity>,
    events: Vec<SimEvent>,
    audio_events: Vec<AudioEvent>,
    score: ScoreView,
    environment: Box<dyn Environment>,
    sink: Option<Box<dyn NotificationSink>>,
}

impl SimulationEngine {
    /// Create a new simulation engine with the given config. The world starts
    /// empty; flat ground at height 0 is the default environment.
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            world: World::new(),
            time: SimTime::default(),
            phase: SimPhase::default(),
            fire_mode: config.battery.fire_mode,
            time_scale: 1.0,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            command_queue: VecDeque::new(),
            despawn_buffer: Vec::new(),
            events: Vec::new(),
            audio_events: Vec::new(),
            score: ScoreView::default(),
            environment: Box::new(FlatGround::default()),
            sink: None,
            config,
        })
    }

    /// Replace the collision environment.
    pub fn with_environment(mut self, environment: impl Environment + 'static) -> Self {
        self.environment = Box::new(environment);
        self
    }

    /// Install the sink that receives each tick's alerts and audio cues.
    pub fn set_notification_sink(&mut self, sink: impl NotificationSink + 'static) {
        self.sink = Some(Box::new(sink));
    }

    /// Queue a command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: SimCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = SimCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance the simulation by one tick and return the resulting snapshot.
    pub fn tick(&mut self) -> SimSnapshot {
        self.process_commands();

        if self.phase == SimPhase::Running {
            self.run_systems();
            self.time.advance(self.config.dt());
        }

        let events = std::mem::take(&mut self.events);
        let audio_events = std::mem::take(&mut self.audio_events);
        let alerts: Vec<_> = events.iter().map(|e| e.to_alert(self.time.tick)).collect();

        if let Some(sink) = self.sink.as_mut() {
            for alert in &alerts {
                sink.alert(alert);
            }
            for cue in &audio_events {
                sink.audio(cue);
            }
        }

        systems::snapshot::build_snapshot(
            &self.world,
            &self.time,
            self.phase,
            self.config.battery.fire_interval,
            self.fire_mode,
            TickOutput {
                events,
                alerts,
                audio_events,
            },
            &self.score,
        )
    }

    /// Get the current run phase.
    pub fn phase(&self) -> SimPhase {
        self.phase
    }

    /// Get the current simulation time.
    pub fn time(&self) -> SimTime {
        self.time
    }

    /// Get the current time scale.
    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    pub fn fire_mode(&self) -> FireMode {
        self.fire_mode
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn score(&self) -> ScoreView {
        self.score
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Mutable world access for scripted setups.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Launch a missile immediately (outside the command queue).
    pub fn launch_missile(&mut self, from: Position, target: Position) -> Entity {
        self.score.missiles_launched += 1;
        world_setup::spawn_missile(&mut self.world, from, target, &self.config.flight)
    }

    /// Launch a salvo from random map edges using the engine's seeded RNG.
    pub fn spawn_salvo(&mut self) -> Vec<Entity> {
        let missiles = scenario::spawn_salvo(
            &mut self.world,
            &mut self.rng,
            &self.config.scenario,
            &self.config.flight,
        );
        self.score.missiles_launched += missiles.len() as u32;
        missiles
    }

    /// Place a radar and a linked AA battery at `position`.
    pub fn setup_defense_site(&mut self, position: Position) -> (Entity, Entity) {
        world_setup::setup_defense_site(&mut self.world, position)
    }

    /// Remove an entity. Destroying a dead handle is a no-op.
    pub fn destroy(&mut self, entity: Entity) {
        let _ = self.world.despawn(entity);
    }

    /// Copy of a radar's detection table, highest threat first as of the
    /// last scan. Empty for an unknown radar.
    pub fn detections(&self, radar: Entity) -> Vec<DetectionRecord> {
        systems::radar::top_threats(&self.world, radar, usize::MAX)
    }

    /// Live missiles the radar has seen at least `count` times.
    pub fn missiles_detected_at_least(&self, radar: Entity, count: u32) -> Vec<Entity> {
        systems::radar::missiles_detected_at_least(&self.world, radar, count)
    }

    /// The target `select_target` would pick for a battery right now.
    pub fn select_target(&self, battery: Entity) -> Option<Entity> {
        let own_pos = *self.world.get::<&Position>(battery).ok()?;
        let radar = self
            .world
            .get::<&RadarLink>(battery)
            .ok()?
            .radar?;
        systems::fire_control::select_target(&self.world, radar, &own_pos).map(|(e, _)| e)
    }

    /// On-demand ground impact estimate for a tracked missile.
    pub fn impact_estimate(
        &self,
        radar: Entity,
        missile: Entity,
    ) -> Result<ImpactEstimate, ImpactError> {
        systems::radar::impact_estimate(&self.world, radar, missile)
    }

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    /// Handle a single command.
    fn handle_command(&mut self, command: SimCommand) {
        match command {
            SimCommand::LaunchMissile { from, target } => {
                self.launch_missile(from, target);
            }
            SimCommand::Fire => {
                for (_entity, battery) in self.world.query_mut::<&mut AaBattery>() {
                    battery.fire_requested = true;
                }
            }
            SimCommand::SetFireMode { mode } => {
                self.fire_mode = mode;
            }
            SimCommand::Pause => {
                if self.phase == SimPhase::Running {
                    self.phase = SimPhase::Paused;
                }
            }
            SimCommand::Resume => {
                if self.phase == SimPhase::Paused {
                    self.phase = SimPhase::Running;
                }
            }
            SimCommand::SetTimeScale { scale } => {
                if scale.is_finite() {
                    self.time_scale = scale.clamp(0.0, MAX_TIME_SCALE);
                }
            }
        }
    }

    /// Run all systems in order.
    fn run_systems(&mut self) {
        let dt = self.config.dt();
        let now = self.time.elapsed_secs;

        // 1. Missile flight, integration, ground impact
        systems::flight::run(
            &mut self.world,
            &self.config.flight,
            dt,
            self.environment.as_ref(),
            &mut self.events,
            &mut self.audio_events,
            &mut self.score,
            &mut self.despawn_buffer,
        );
        // 2. Radar sweep, scan passes, aging
        systems::radar::run(
            &mut self.world,
            &self.config.radar,
            dt,
            now,
            &mut self.events,
            &mut self.audio_events,
        );
        // 3. Fire control
        systems::fire_control::run(
            &mut self.world,
            &self.config.battery,
            &self.config.interceptor,
            self.fire_mode,
            dt,
            &mut self.events,
            &mut self.audio_events,
            &mut self.score,
        );
        // 4. Interceptor guidance and detonation
        systems::intercept::run(
            &mut self.world,
            &self.config.interceptor,
            dt,
            &mut self.events,
            &mut self.audio_events,
            &mut self.score,
            &mut self.despawn_buffer,
        );
        // 5. Cleanup (out of bounds, pending despawns)
        systems::cleanup::run(
            &mut self.world,
            self.config.scenario.world_radius,
            &mut self.despawn_buffer,
        );
    }
}
