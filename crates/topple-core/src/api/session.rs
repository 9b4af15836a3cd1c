//! Top-level orchestration: piece lifecycle, lives, score and terminal
//! state, advanced one fixed tick at a time.
//!
//! Tick order is load-bearing: commands, physics step, landing and fall
//! evaluation against the post-step state, due scheduled actions, then
//! camera/stability/score recomputation and the published snapshot.

use anyhow::{Context, Result};
use glam::Vec2;

use crate::api::commands::{Command, CommandQueue};
use crate::api::config::TowerConfig;
use crate::api::snapshot::{PieceView, TickSnapshot};
use crate::api::types::{BodyId, Direction, GameEvent, Rect, SoundCue};
use crate::components::arena::Arena;
use crate::components::piece::Piece;
use crate::components::shape::Tetromino;
use crate::core::physics::{ContactEvent, PhysicsBody, PhysicsWorld};
use crate::core::rng::Rng;
use crate::core::schedule::{DueAction, Scheduler};
use crate::core::time::FixedTimestep;
use crate::persist::{Profile, ScoreStore};
use crate::systems::{camera, factory, falloff, landing, spawn, stability};
use crate::systems::camera::CameraScroll;

/// Session phase. Lives hitting zero is terminal: no further spawns, no
/// further landing or fall evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Running,
    Paused,
    GameOver,
}

const FIRST_FIXTURE_ID: u32 = 1;
const FIRST_PIECE_ID: u32 = 10;

fn cooled(last: Option<u64>, now: u64, cooldown: u32) -> bool {
    last.map_or(true, |t| now.saturating_sub(t) >= cooldown as u64)
}

/// One game session: owns the physics world, all pieces, derived view state
/// and the command/event plumbing to the outside.
pub struct TowerSession {
    cfg: TowerConfig,
    physics: PhysicsWorld,
    timestep: FixedTimestep,
    scheduler: Scheduler,
    commands: CommandQueue,
    rng: Rng,
    arena: Arena,
    /// All live pieces in spawn order.
    pieces: Vec<Piece>,
    /// The single falling piece, if any.
    active: Option<BodyId>,
    next_kind: Tetromino,
    next_id: u32,
    ticks: u64,
    phase: Phase,
    lives: u32,
    height_blocks: u32,
    bonus_score: u32,
    score: u32,
    next_milestone_blocks: u32,
    camera: CameraScroll,
    stability_pct: f32,
    snapshot: TickSnapshot,
    events: Vec<GameEvent>,
    sounds: Vec<SoundCue>,
    contact_events: Vec<ContactEvent>,
    last_move_tick: Option<u64>,
    last_rotate_tick: Option<u64>,
    store: Option<Box<dyn ScoreStore>>,
    profile: Profile,
}

impl TowerSession {
    /// Start a session without persistence.
    pub fn new(cfg: TowerConfig) -> Result<Self> {
        Self::build(cfg, None)
    }

    /// Start a session backed by a profile store. The store is read once
    /// here and written at game over; its failures never block gameplay.
    pub fn with_store(cfg: TowerConfig, store: Box<dyn ScoreStore>) -> Result<Self> {
        Self::build(cfg, Some(store))
    }

    fn build(cfg: TowerConfig, store: Option<Box<dyn ScoreStore>>) -> Result<Self> {
        cfg.validate().context("invalid tower configuration")?;

        let mut physics = PhysicsWorld::new(Vec2::new(0.0, cfg.gravity));
        physics.set_dt(cfg.fixed_dt);
        let arena = Arena::build(&cfg, &mut physics, FIRST_FIXTURE_ID);
        let profile = store.as_ref().and_then(|s| s.load()).unwrap_or_default();
        let mut rng = Rng::new(cfg.rng_seed);
        let next_kind = Tetromino::pick(&mut rng);
        let timestep = FixedTimestep::new(cfg.fixed_dt);
        let camera = CameraScroll::new(&cfg);
        let lives = cfg.starting_lives;
        let next_milestone_blocks = cfg.milestone_blocks;

        let mut session = Self {
            cfg,
            physics,
            timestep,
            scheduler: Scheduler::new(),
            commands: CommandQueue::new(),
            rng,
            arena,
            pieces: Vec::new(),
            active: None,
            next_kind,
            next_id: FIRST_PIECE_ID,
            ticks: 0,
            phase: Phase::Running,
            lives,
            height_blocks: 0,
            bonus_score: 0,
            score: 0,
            next_milestone_blocks,
            camera,
            stability_pct: 100.0,
            snapshot: TickSnapshot::default(),
            events: Vec::new(),
            sounds: Vec::new(),
            contact_events: Vec::new(),
            last_move_tick: None,
            last_rotate_tick: None,
            store,
            profile,
        };
        session.spawn_piece();
        session.rebuild_snapshot();
        log::info!(
            "session started: platform {:?}, {} lives",
            session.arena.platform.rect,
            session.lives
        );
        Ok(session)
    }

    // -- external surface --

    /// Feed variable frame time; runs zero or more fixed ticks.
    pub fn advance(&mut self, frame_dt: f32) {
        let steps = self.timestep.accumulate(frame_dt);
        for _ in 0..steps {
            self.tick();
        }
    }

    /// Run exactly one fixed tick.
    pub fn tick(&mut self) {
        self.handle_commands();
        if self.phase != Phase::Running {
            self.rebuild_snapshot();
            return;
        }
        self.ticks += 1;

        self.contact_events.clear();
        self.physics.step_into(&mut self.contact_events);
        self.evaluate_landing();
        self.evaluate_falls();
        self.run_due_actions();
        self.recompute_derived();
        self.rebuild_snapshot();
    }

    pub fn push_command(&mut self, command: Command) {
        self.commands.push(command);
    }

    /// Freeze stepping and all detectors.
    pub fn pause(&mut self) {
        if self.phase == Phase::Running {
            self.phase = Phase::Paused;
            self.rebuild_snapshot();
        }
    }

    pub fn resume(&mut self) {
        if self.phase == Phase::Paused {
            self.phase = Phase::Running;
            self.rebuild_snapshot();
        }
    }

    /// The state published after the most recent tick.
    pub fn snapshot(&self) -> &TickSnapshot {
        &self.snapshot
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn drain_sounds(&mut self) -> Vec<SoundCue> {
        std::mem::take(&mut self.sounds)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn height_blocks(&self) -> u32 {
        self.height_blocks
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn high_score(&self) -> u32 {
        self.profile.high_score
    }

    // -- commands --

    fn handle_commands(&mut self) {
        for command in self.commands.drain() {
            match command {
                Command::Restart => self.restart(),
                Command::Move(dir) => self.nudge_active(dir),
                Command::Rotate => self.rotate_active(),
                Command::Drop => self.drop_active(),
            }
        }
    }

    fn active_body(&self) -> Option<PhysicsBody> {
        let id = self.active?;
        self.pieces.iter().find(|p| p.id == id).map(|p| p.body.clone())
    }

    fn nudge_active(&mut self, dir: Direction) {
        if self.phase != Phase::Running {
            return;
        }
        if !cooled(self.last_move_tick, self.ticks, self.cfg.move_cooldown_ticks) {
            return;
        }
        let Some(body) = self.active_body() else {
            return;
        };
        let vel = self.physics.velocity(&body);
        self.physics
            .set_velocity(&body, Vec2::new(dir.sign() * self.cfg.move_speed, vel.y));
        self.last_move_tick = Some(self.ticks);
    }

    fn rotate_active(&mut self) {
        if self.phase != Phase::Running {
            return;
        }
        if !cooled(self.last_rotate_tick, self.ticks, self.cfg.rotate_cooldown_ticks) {
            return;
        }
        let Some(body) = self.active_body() else {
            return;
        };
        let (_, rotation) = self.physics.body_position(&body);
        self.physics
            .set_rotation(&body, rotation + std::f32::consts::FRAC_PI_2);
        self.physics.set_angvel(&body, 0.0);
        self.last_rotate_tick = Some(self.ticks);
    }

    fn drop_active(&mut self) {
        if self.phase != Phase::Running {
            return;
        }
        let Some(body) = self.active_body() else {
            return;
        };
        let vel = self.physics.velocity(&body);
        self.physics
            .set_velocity(&body, Vec2::new(vel.x, self.cfg.drop_speed.max(vel.y)));
    }

    // -- piece lifecycle --

    fn piece_index(&self, id: BodyId) -> Option<usize> {
        self.pieces.iter().position(|p| p.id == id)
    }

    fn spawn_piece(&mut self) {
        if self.phase != Phase::Running || self.active.is_some() {
            return;
        }
        let kind = self.next_kind;
        let pos = {
            let physics = &self.physics;
            let pieces = &self.pieces;
            spawn::plan_spawn(&self.cfg, self.camera.offset, kind, |candidate| {
                physics
                    .bodies_in_region(candidate)
                    .into_iter()
                    .any(|hit| pieces.iter().any(|p| p.id == hit && p.is_landed()))
            })
        };
        let id = BodyId(self.next_id);
        self.next_id += 1;
        let piece = factory::build_piece(&self.cfg, &mut self.physics, id, kind, pos);
        self.pieces.push(piece);
        self.active = Some(id);
        self.next_kind = Tetromino::pick(&mut self.rng);
        self.events.push(GameEvent::PieceSpawned { id });
        log::info!("spawned {:?} as piece {:?} at {:?}", kind, id, pos);
    }

    fn evaluate_landing(&mut self) {
        let Some(active_id) = self.active else {
            return;
        };
        let Some(active_idx) = self.piece_index(active_id) else {
            log::warn!("active piece {:?} missing from piece list", active_id);
            self.active = None;
            return;
        };

        let mut landed = false;
        {
            let active = &self.pieces[active_idx];
            for ev in self.contact_events.iter().filter(|e| e.started) {
                let Some(other) = ev.other(active_id) else {
                    continue;
                };
                if other == self.arena.platform.id {
                    if landing::event_rest(
                        &self.cfg,
                        &self.physics,
                        active,
                        &self.arena.platform.body,
                        true,
                    ) {
                        landed = true;
                        break;
                    }
                } else if let Some(support) =
                    self.pieces.iter().find(|p| p.id == other && p.is_landed())
                {
                    if landing::event_rest(&self.cfg, &self.physics, active, &support.body, false) {
                        landed = true;
                        break;
                    }
                }
            }
            if !landed {
                landed = landing::poll_rest(
                    &self.cfg,
                    &self.physics,
                    active,
                    self.arena.platform.rect,
                    self.pieces.iter().filter(|p| p.is_landed()),
                );
            }
        }

        if landed {
            self.lock_active(active_idx);
        }
    }

    fn lock_active(&mut self, idx: usize) {
        let id = self.pieces[idx].id;
        // Write-once: a second qualifying detection changes nothing.
        if !self.pieces[idx].mark_landed() {
            return;
        }
        self.active = None;
        self.scheduler.schedule(
            self.ticks,
            self.cfg.settle_delay_ticks,
            DueAction::SettlePiece(id),
        );
        if !self.scheduler.has_pending_spawn() {
            self.scheduler
                .schedule(self.ticks, self.cfg.spawn_delay_ticks, DueAction::SpawnNext);
        }
        self.events.push(GameEvent::PieceLocked {
            id,
            height_blocks: self.height_blocks,
        });
        self.sounds.push(SoundCue::Land);
        log::info!("piece {:?} locked at tick {}", id, self.ticks);
    }

    fn evaluate_falls(&mut self) {
        let platform = self.arena.platform.rect;
        let mut fallen: Vec<BodyId> = Vec::new();
        for piece in &self.pieces {
            match self.physics.body_aabb(&piece.body) {
                Some(aabb) => {
                    if falloff::has_fallen(&self.cfg, aabb, platform) {
                        fallen.push(piece.id);
                    }
                }
                None => {
                    // Desync between piece list and simulation; skip this
                    // tick rather than charging a life for it.
                    log::warn!("piece {:?} has no simulation body", piece.id);
                }
            }
        }
        for id in fallen {
            if self.phase == Phase::GameOver {
                break;
            }
            self.remove_fallen_piece(id);
        }
    }

    fn remove_fallen_piece(&mut self, id: BodyId) {
        let Some(idx) = self.piece_index(id) else {
            return;
        };
        let piece = self.pieces.remove(idx);
        self.physics.remove_body(&piece.body);
        self.scheduler.cancel_piece(id);
        if self.active == Some(id) {
            self.active = None;
        }
        self.lives = self.lives.saturating_sub(1);
        self.events.push(GameEvent::PieceLost {
            id,
            lives_left: self.lives,
        });
        self.sounds.push(SoundCue::Fall);
        log::info!("piece {:?} fell off, {} lives left", id, self.lives);

        if self.lives == 0 {
            self.enter_game_over();
        } else if self.active.is_none() && !self.scheduler.has_pending_spawn() {
            self.scheduler.schedule(
                self.ticks,
                self.cfg.respawn_delay_ticks,
                DueAction::SpawnNext,
            );
        }
    }

    fn run_due_actions(&mut self) {
        let mut due = Vec::new();
        self.scheduler.drain_due(self.ticks, &mut due);
        for action in due {
            match action {
                DueAction::SpawnNext => self.spawn_piece(),
                DueAction::SettlePiece(id) => {
                    let body = self
                        .pieces
                        .iter()
                        .find(|p| p.id == id && p.is_landed())
                        .map(|p| p.body.clone());
                    if let Some(body) = body {
                        self.physics.sleep(&body);
                    }
                }
            }
        }
    }

    fn enter_game_over(&mut self) {
        self.phase = Phase::GameOver;
        // Final score from the tallest remaining piece.
        self.update_height_and_score();
        if self.score > self.profile.high_score {
            self.profile.high_score = self.score;
        }
        if self.height_blocks > self.profile.best_height_blocks {
            self.profile.best_height_blocks = self.height_blocks;
        }
        if let Some(store) = &self.store {
            store.save(&self.profile);
        }
        self.events.push(GameEvent::GameOver {
            score: self.score,
            height_blocks: self.height_blocks,
        });
        self.sounds.push(SoundCue::GameOver);
        log::info!(
            "game over: score {}, height {} blocks",
            self.score,
            self.height_blocks
        );
    }

    fn restart(&mut self) {
        log::info!("session restart");
        // Cancel every pending deferred action before anything else, so
        // nothing scheduled against the old session can ever fire.
        self.scheduler.clear();
        self.physics = PhysicsWorld::new(Vec2::new(0.0, self.cfg.gravity));
        self.physics.set_dt(self.cfg.fixed_dt);
        self.arena = Arena::build(&self.cfg, &mut self.physics, FIRST_FIXTURE_ID);
        self.pieces.clear();
        self.active = None;
        self.next_id = FIRST_PIECE_ID;
        self.ticks = 0;
        self.phase = Phase::Running;
        self.lives = self.cfg.starting_lives;
        self.height_blocks = 0;
        self.bonus_score = 0;
        self.score = 0;
        self.next_milestone_blocks = self.cfg.milestone_blocks;
        self.camera.reset();
        self.stability_pct = 100.0;
        self.contact_events.clear();
        self.last_move_tick = None;
        self.last_rotate_tick = None;
        self.spawn_piece();
        self.rebuild_snapshot();
    }

    // -- derived state --

    fn locked_aabbs(&self) -> Vec<Rect> {
        self.pieces
            .iter()
            .filter(|p| p.is_landed())
            .filter_map(|p| self.physics.body_aabb(&p.body))
            .collect()
    }

    fn update_height_and_score(&mut self) {
        let locked = self.locked_aabbs();
        let height_px =
            camera::tower_height(self.arena.platform.top(), locked.iter().map(|a| a.top()));
        self.height_blocks = (height_px / self.cfg.block_size).floor() as u32;
        while self.height_blocks >= self.next_milestone_blocks {
            let bonus = self.cfg.milestone_bonus;
            self.bonus_score += bonus;
            self.events.push(GameEvent::Milestone {
                height_blocks: self.next_milestone_blocks,
                bonus,
            });
            self.sounds.push(SoundCue::Milestone);
            log::info!("milestone: {} blocks", self.next_milestone_blocks);
            self.next_milestone_blocks += self.cfg.milestone_blocks;
        }
        self.score = self.height_blocks * 100 + self.bonus_score;
    }

    fn recompute_derived(&mut self) {
        let locked = self.locked_aabbs();
        let height_px =
            camera::tower_height(self.arena.platform.top(), locked.iter().map(|a| a.top()));
        self.camera.retarget(height_px);
        self.camera.tick();
        self.stability_pct =
            stability::aggregate_stability(&self.cfg, &locked, self.arena.platform.rect);
        self.update_height_and_score();
    }

    fn piece_view(&self, piece: &Piece) -> Option<PieceView> {
        let aabb = self.physics.body_aabb(&piece.body)?;
        let (pos, rotation) = self.physics.body_position(&piece.body);
        Some(PieceView {
            id: piece.id,
            kind: piece.kind,
            color: piece.color,
            pos,
            rotation,
            aabb,
            landed: piece.is_landed(),
        })
    }

    fn rebuild_snapshot(&mut self) {
        let mut active_view = None;
        let mut locked = Vec::with_capacity(self.pieces.len());
        for piece in &self.pieces {
            let Some(view) = self.piece_view(piece) else {
                continue;
            };
            if Some(piece.id) == self.active {
                active_view = Some(view);
            } else if piece.is_landed() {
                locked.push(view);
            }
        }
        self.snapshot = TickSnapshot {
            tick: self.ticks,
            score: self.score,
            height_blocks: self.height_blocks,
            lives: self.lives,
            stability_pct: self.stability_pct,
            camera_offset: self.camera.offset,
            paused: self.phase == Phase::Paused,
            game_over: self.phase == Phase::GameOver,
            high_score: self.profile.high_score,
            next_kind: self.next_kind,
            active: active_view,
            locked,
        };
    }
}
