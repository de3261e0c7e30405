#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! The authoritative simulation aggregate: owns the grid, entities, portal,
//! wave scheduler, and sun/RNG state, and drives one tick's data flow across
//! every `systems/*` crate.

mod generation;
pub mod query;
mod spawn;

use std::collections::BTreeMap;

use glam::Vec2;

use holdfast_core::{
    Aabb, Cell, ChangeLog, Command, Config, Coord, DamageOutcome, DeterministicRng, Entity, EntityId, EntityKind,
    Event, Grid, Intent, Inventory, MaterialKind, Portal, RecoveredErrorTally, SimError, TickInput,
};
use holdfast_system_waves::{SchedulerEvent, WaveScheduler};

use spawn::EntityIdAllocator;

/// Minimum grid dimensions `World::new` will accept; anything smaller
/// cannot fit a portal and its safety region.
const MIN_GRID_WIDTH: u32 = 20;
const MIN_GRID_HEIGHT: u32 = 20;

/// Creatures spawned per sub-wave, scaled by wave index. Not a pinned
/// constant; an implementation choice recorded in DESIGN.md.
fn creatures_for_sub_wave(wave_index: u32) -> u32 {
    2 + wave_index
}

/// The simulation's authoritative state, orchestrating the grid, entities,
/// portal, and wave scheduler each tick.
pub struct World {
    config: Config,
    grid: Grid,
    entities: BTreeMap<EntityId, Entity>,
    entity_ids: EntityIdAllocator,
    change_log: ChangeLog,
    portal: Portal,
    wave_scheduler: WaveScheduler,
    sun_column: u32,
    aging_rng: DeterministicRng,
    world_rng: DeterministicRng,
    tally: RecoveredErrorTally,
    player_id: EntityId,
    player_inventory: Inventory,
    pending_move: Vec2,
    pending_jump: bool,
    player_climbing: bool,
    wave_in_progress: bool,
}

impl World {
    /// Builds a fresh world from `config`: generates terrain, carves a
    /// portal chamber, places the player, and seeds both RNG streams from
    /// `config.world.seed`.
    pub fn new(config: Config) -> Result<Self, SimError> {
        if config.world.width < MIN_GRID_WIDTH || config.world.height < MIN_GRID_HEIGHT {
            return Err(SimError::FatalInvariantBroken(format!(
                "grid {}x{} is smaller than the minimum {}x{}",
                config.world.width, config.world.height, MIN_GRID_WIDTH, MIN_GRID_HEIGHT
            )));
        }

        let mut grid = generation::generate(&config.world);
        let mut tally = RecoveredErrorTally::default();

        let portal_center = Coord::new(config.world.width / 2, config.world.height - 6);
        carve_portal_chamber(&mut grid, portal_center, &mut tally);
        let portal = Portal::new(
            portal_center,
            Aabb::new(
                portal_center.column() as f32 - 1.5,
                portal_center.row() as f32 - 1.5,
                3.0,
                3.0,
            ),
            4,
            config.waves.portal_max_health,
        );

        let mut entity_ids = EntityIdAllocator::default();
        let player_id = entity_ids.allocate();
        let player_position = Vec2::new(portal_center.column() as f32, portal_center.row() as f32 - 2.0);
        let mut entities = BTreeMap::new();
        let _ = entities.insert(player_id, spawn::spawn_entity(EntityKind::Player, player_position));

        Ok(Self {
            aging_rng: DeterministicRng::new(config.world.seed, "aging"),
            world_rng: DeterministicRng::new(config.world.seed, "world"),
            config,
            grid,
            entities,
            entity_ids,
            change_log: ChangeLog::new(),
            portal,
            wave_scheduler: WaveScheduler::new(),
            sun_column: 0,
            tally,
            player_id,
            player_inventory: Inventory::new(64),
            pending_move: Vec2::ZERO,
            pending_jump: false,
            player_climbing: false,
            wave_in_progress: false,
        })
    }

    /// Applies a single externally-sourced [`Command`], returning any
    /// events it immediately produced.
    pub fn apply(&mut self, command: Command) -> Vec<Event> {
        match command {
            Command::MovePlayer { direction_x, direction_y } => {
                self.pending_move = Vec2::new(direction_x.clamp(-1.0, 1.0), direction_y.clamp(-1.0, 1.0));
                Vec::new()
            }
            Command::PlayerJump => {
                self.pending_jump = true;
                Vec::new()
            }
            Command::PlayerToggleClimb => {
                self.player_climbing = !self.player_climbing;
                Vec::new()
            }
            Command::PlaceBlock { coord, material } => self.place_block(coord, material),
            Command::MineBlock { coord, damage } => self.mine_block(coord, damage),
            Command::FireArrow { origin, direction, speed } => {
                self.fire_arrow(origin, direction, speed);
                Vec::new()
            }
        }
    }

    fn place_block(&mut self, coord: Coord, material: MaterialKind) -> Vec<Event> {
        let Some(cell) = self.grid.get(coord).copied() else {
            self.tally.record_bounds_violation();
            return Vec::new();
        };
        if !cell.is_air() {
            return Vec::new();
        }
        if !self.player_inventory.remove(material) {
            return Vec::new();
        }
        self.grid.set(coord, Cell::new_material(material, true), &mut self.tally);
        self.change_log.record(coord, None, Some(material));
        Vec::new()
    }

    fn mine_block(&mut self, coord: Coord, damage: u32) -> Vec<Event> {
        let Some(mut cell) = self.grid.get(coord).copied() else {
            self.tally.record_bounds_violation();
            return Vec::new();
        };
        let old_kind = cell.kind();
        let outcome = cell.apply_damage(damage);
        self.grid.set(coord, cell, &mut self.tally);
        match outcome {
            DamageOutcome::Destroyed { kind, dropped } => {
                self.change_log.record(coord, old_kind, None);
                if let Some(holdfast_core::ItemKind::Material(material)) = dropped {
                    let item_position = Vec2::new(coord.column() as f32, coord.row() as f32);
                    let id = self.entity_ids.allocate();
                    let _ = self
                        .entities
                        .insert(id, spawn::spawn_entity(EntityKind::Item { material }, item_position));
                }
                vec![Event::BlockDestroyed { coord, kind }]
            }
            DamageOutcome::Damaged { .. } | DamageOutcome::NoEffect => Vec::new(),
        }
    }

    fn fire_arrow(&mut self, origin: Vec2, direction: Vec2, speed: f32) {
        let id = self.entity_ids.allocate();
        let mut arrow = spawn::spawn_entity(EntityKind::Arrow, origin);
        let normalized = if direction.length_squared() > 0.0 {
            direction.normalize()
        } else {
            Vec2::new(1.0, 0.0)
        };
        arrow.velocity = normalized * speed;
        let _ = self.entities.insert(id, arrow);
    }

    /// Advances the simulation by one tick: applies `input`'s commands,
    /// steps physics/AI/projectiles for every entity, recomputes lighting,
    /// runs an aging pass, and advances the wave scheduler, in that order.
    pub fn tick(&mut self, input: TickInput) -> Vec<Event> {
        let mut events = Vec::new();
        for command in input.commands {
            events.extend(self.apply(command));
        }

        let dt = input.delta_seconds.clamp(0.0, self.config.physics.max_delta_time * 4.0);

        self.step_player(dt);
        self.step_creatures(dt);
        self.step_arrows();
        self.resolve_contact_damage(&mut events);
        self.resolve_item_pickups();
        self.resolve_deaths(&mut events);

        self.sun_column = holdfast_system_lighting::advance_sun_column(self.sun_column, self.grid.width(), &self.config.lighting);
        holdfast_system_lighting::recompute(&mut self.grid, self.sun_column, &self.config.lighting);

        self.run_aging_pass();
        self.step_wave_scheduler(&mut events, dt);

        self.pending_jump = false;
        events
    }

    fn step_player(&mut self, dt: f32) {
        let Some(mut player) = self.entities.get(&self.player_id).copied() else {
            return;
        };

        let on_rope = self.grid.is_rope(cell_under(player));
        let intent = if self.player_climbing && on_rope {
            Intent::ClimbRope { direction: self.pending_move.y }
        } else if self.pending_jump {
            Intent::Jump
        } else if self.pending_move.x.abs() > f32::EPSILON {
            let target = player.position + Vec2::new(self.pending_move.x, 0.0) * 10.0;
            Intent::MoveToward {
                target,
                speed: holdfast_core::entity_baseline(EntityKind::Player).move_speed,
            }
        } else {
            Intent::Idle
        };

        let _ = holdfast_system_physics::step(&self.grid, &mut player, intent, &self.config.physics, dt, &mut self.tally);
        let _ = self.entities.insert(self.player_id, player);
    }

    fn step_creatures(&mut self, dt: f32) {
        let player_position = self.entities.get(&self.player_id).map_or(Vec2::ZERO, |e| e.position);
        let portal_center = Vec2::new(self.portal.center().column() as f32, self.portal.center().row() as f32);
        let snapshot: Vec<(EntityId, Entity)> = self.entities.iter().map(|(&id, &entity)| (id, entity)).collect();

        for (id, mut entity) in snapshot.iter().copied() {
            if !entity.kind.is_creature() {
                continue;
            }
            let intent = holdfast_system_ai::decide_intent(id, &entity, &snapshot, player_position, portal_center, &mut self.world_rng);
            holdfast_system_ai::apply_stranding(&mut entity, dt);
            if entity.is_alive() {
                let _ = holdfast_system_physics::step(&self.grid, &mut entity, intent, &self.config.physics, dt, &mut self.tally);
            }
            let _ = self.entities.insert(id, entity);
        }
    }

    fn step_arrows(&mut self) {
        let dt = self.config.physics.max_delta_time;
        let targets: Vec<(EntityId, Entity)> = self
            .entities
            .iter()
            .filter(|(_, e)| e.kind.is_creature() || e.kind == EntityKind::Player)
            .map(|(&id, &entity)| (id, entity))
            .collect();
        let arrow_ids: Vec<EntityId> = self
            .entities
            .iter()
            .filter(|(_, e)| e.kind == EntityKind::Arrow)
            .map(|(&id, _)| id)
            .collect();

        for id in arrow_ids {
            let Some(mut arrow) = self.entities.get(&id).copied() else { continue };
            let relevant_targets: Vec<(EntityId, Entity)> = targets.iter().copied().filter(|(t, _)| *t != id).collect();
            let outcome =
                holdfast_system_projectiles::step_arrow(&self.grid, &mut arrow, dt, &self.config.physics, &relevant_targets);
            match outcome {
                holdfast_system_projectiles::ArrowOutcome::Flying => {
                    let _ = self.entities.insert(id, arrow);
                }
                holdfast_system_projectiles::ArrowOutcome::StuckInBlock { .. } => {
                    let _ = self.entities.remove(&id);
                }
                holdfast_system_projectiles::ArrowOutcome::HitEntity { id: target_id, damage } => {
                    if let Some(target) = self.entities.get_mut(&target_id) {
                        target.apply_damage(damage);
                    }
                    let _ = self.entities.remove(&id);
                }
            }
        }
    }

    fn resolve_contact_damage(&mut self, events: &mut Vec<Event>) {
        let portal_aabb = self.portal.aabb();
        let mut portal_hit = false;
        for entity in self.entities.values() {
            if entity.kind.is_creature() && entity.aabb().intersects(&portal_aabb) {
                portal_hit = true;
                self.portal.apply_damage(holdfast_core::entity_baseline(entity.kind).contact_damage);
            }
        }
        if portal_hit {
            if self.portal.is_destroyed() {
                events.push(Event::PortalDestroyed);
            } else {
                events.push(Event::PortalDamaged { remaining_health: self.portal.health() });
            }
        }

        let Some(player_aabb) = self.entities.get(&self.player_id).map(Entity::aabb) else {
            return;
        };
        let mut total_player_damage = 0;
        for entity in self.entities.values() {
            if entity.kind.is_creature() && entity.aabb().intersects(&player_aabb) {
                total_player_damage += holdfast_core::entity_baseline(entity.kind).contact_damage;
            }
        }
        if total_player_damage > 0 {
            if let Some(player) = self.entities.get_mut(&self.player_id) {
                player.apply_damage(total_player_damage);
            }
        }
    }

    fn resolve_item_pickups(&mut self) {
        let Some(player_aabb) = self.entities.get(&self.player_id).map(Entity::aabb) else {
            return;
        };
        let picked_up: Vec<(EntityId, MaterialKind)> = self
            .entities
            .iter()
            .filter_map(|(&id, entity)| match entity.kind {
                EntityKind::Item { material } if entity.aabb().intersects(&player_aabb) => Some((id, material)),
                _ => None,
            })
            .collect();

        for (id, material) in picked_up {
            if self.player_inventory.add(material) {
                let _ = self.entities.remove(&id);
            }
        }
    }

    /// Emits `EntityDied` for every entity whose hp just reached zero
    /// (including the player, who is never removed from the map) and
    /// removes every other dead entity.
    fn resolve_deaths(&mut self, events: &mut Vec<Event>) {
        let dead: Vec<EntityId> = self
            .entities
            .iter()
            .filter(|(_, entity)| !entity.is_alive())
            .map(|(&id, _)| id)
            .collect();
        for id in dead {
            events.push(Event::EntityDied { id });
            if id != self.player_id {
                let _ = self.entities.remove(&id);
            }
        }
    }

    fn step_wave_scheduler(&mut self, events: &mut Vec<Event>, dt: f32) {
        let creatures_remaining = self.entities.values().filter(|e| e.kind.is_creature()).count();
        let wave_cleared = self.wave_in_progress && creatures_remaining == 0;
        let portal_destroyed = self.portal.is_destroyed();

        let scheduler_events = self.wave_scheduler.tick(dt, wave_cleared, portal_destroyed, &self.config.waves);
        for event in scheduler_events {
            match event {
                SchedulerEvent::WaveStarted { wave_index } => {
                    self.wave_in_progress = false;
                    self.portal.grow_safety_radius(self.config.waves.portal_radius_growth_per_wave);
                    self.run_aging_pass();
                    events.push(Event::WavePhaseChanged { wave_index });
                }
                SchedulerEvent::SubWaveStarted { wave_index, sub_wave_index } => {
                    self.spawn_sub_wave(wave_index, sub_wave_index);
                    self.wave_in_progress = true;
                }
                SchedulerEvent::AllWavesCleared => events.push(Event::AllWavesCleared),
                SchedulerEvent::GameOver => events.push(Event::PortalDestroyed),
            }
        }
    }

    fn spawn_sub_wave(&mut self, wave_index: u32, _sub_wave_index: u32) {
        let count = creatures_for_sub_wave(wave_index);
        let usable_width = self.grid.width().saturating_sub(2).max(1);
        for i in 0..count {
            let kind = if i % 3 == 0 { EntityKind::ChasePlayer } else { EntityKind::SeekCenter };
            let column = 1 + self.world_rng.uniform_u32(0, usable_width);
            let position = Vec2::new(column as f32, 1.0);
            let id = self.entity_ids.allocate();
            let _ = self.entities.insert(id, spawn::spawn_entity(kind, position));
        }
    }

    fn run_aging_pass(&mut self) {
        holdfast_system_aging::run_pass(
            &mut self.grid,
            &self.portal,
            &mut self.aging_rng,
            &self.config.aging,
            &mut self.change_log,
            &mut self.tally,
        );
    }
}

fn cell_under(entity: Entity) -> Coord {
    let center = entity.aabb().center();
    Coord::new(center.x.max(0.0) as u32, center.y.max(0.0) as u32)
}

fn carve_portal_chamber(grid: &mut Grid, center: Coord, tally: &mut RecoveredErrorTally) {
    for dc in -2..=2 {
        for dr in -2..=2 {
            let Some(coord) = center.offset(dc, dr) else { continue };
            if dr == 2 {
                grid.set(coord, Cell::new_material(MaterialKind::Stone, true), tally);
            } else {
                grid.set(coord, Cell::Air, tally);
            }
        }
    }
}
