//! Entity manager: the per-frame simulation core
//!
//! Owns the shared hazard pool (meteorites, enemies, gadgets, cloud zones)
//! and resolves every interaction between it and the ships handed in by the
//! session. Processing order within a frame is fixed:
//!
//! 1. meteorites (movement, detonation, ship collision, culling)
//! 2. cloud zone expiry
//! 3. ship projectiles against meteorites
//! 4. gadgets
//! 5. enemies
//!
//! Entities are never spliced out mid-pass: resolution marks them dead and
//! each step compacts its collection afterwards. Entities spawned during a
//! pass (shards, split projectiles) join their collection after it.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::collision::{rect_circle_overlap, within_radius};
use super::damage::{self, HitOutcome};
use super::enemy::Enemy;
use super::gadget::{Gadget, GadgetKind};
use super::meteorite::{Meteorite, MeteoriteKind};
use super::projectile::Projectile;
use super::ship::{Ship, WeaponKind};
use super::state::{CloudZone, Field, GameEvent, HitScope, Palette, Status, Tally};
use crate::audio::SoundEffect;
use crate::consts::*;

/// Shared simulation state for one session
#[derive(Debug, Clone)]
pub struct EntityManager {
    pub field: Field,
    pub hit_stun_ms: u64,
    pub meteorites: Vec<Meteorite>,
    pub enemies: Vec<Enemy>,
    pub gadgets: Vec<Gadget>,
    pub clouds: Vec<CloudZone>,
    pub status: Status,
    pub tally: Tally,
    /// Notifications for the host, drained every frame
    pub events: Vec<GameEvent>,
    /// Timestamp of the last update
    pub now_ms: u64,
    rng: Pcg32,
    next_id: u32,
}

impl EntityManager {
    pub fn new(field: Field, scope: HitScope, seed: u64) -> Self {
        Self {
            field,
            hit_stun_ms: HIT_STUN_MS,
            meteorites: Vec::new(),
            enemies: Vec::new(),
            gadgets: Vec::new(),
            clouds: Vec::new(),
            status: Status::new(scope),
            tally: Tally::default(),
            events: Vec::new(),
            now_ms: 0,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    pub fn with_hit_stun(mut self, hit_stun_ms: u64) -> Self {
        self.hit_stun_ms = hit_stun_ms;
        self
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Session RNG; every random decision goes through it
    pub fn rng_mut(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    /// Clear every entity and zone and return to `Playing`. Tallies are kept.
    pub fn reset(&mut self) {
        self.meteorites.clear();
        self.enemies.clear();
        self.gadgets.clear();
        self.clouds.clear();
        self.status = Status::new(self.status.scope);
    }

    /// Take the pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn spawn_meteorite(&mut self, kind: MeteoriteKind, pos: Vec2, target: Option<Vec2>) -> u32 {
        let id = self.next_entity_id();
        log::debug!("Spawn {} meteorite #{} at {:?}", kind.as_str(), id, pos);
        self.meteorites
            .push(Meteorite::spawn(id, kind, pos, target, self.now_ms));
        id
    }

    pub fn spawn_enemy(&mut self, pos: Vec2) -> u32 {
        let id = self.next_entity_id();
        log::debug!("Spawn enemy #{} at {:?}", id, pos);
        self.enemies.push(Enemy::new(id, pos, self.now_ms));
        id
    }

    pub fn spawn_gadget(&mut self, kind: GadgetKind, pos: Vec2) -> u32 {
        let id = self.next_entity_id();
        log::debug!("Spawn {} gadget #{} at {:?}", kind.as_str(), id, pos);
        self.gadgets.push(Gadget::new(id, kind, pos));
        id
    }

    /// Start-of-frame housekeeping: expire timed ship effects and close the
    /// hit-pause window
    pub fn begin_frame(&mut self, ships: &mut [Ship], now: u64) {
        self.now_ms = now;
        for ship in ships.iter_mut() {
            ship.expire_effects(now);
        }
        self.status.tick(now);
    }

    /// Advance one frame and resolve all interactions with `ships`
    pub fn update_all(&mut self, ships: &mut [Ship], now: u64) {
        self.now_ms = now;
        self.step_meteorites(ships, now);
        self.step_clouds(now);
        self.resolve_projectile_meteorites(ships, now);
        self.step_gadgets(ships, now);
        self.step_enemies(ships, now);
    }

    /// Move ship projectiles after collisions are resolved
    pub fn advance_ship_projectiles(&self, ships: &mut [Ship]) {
        for ship in ships.iter_mut() {
            ship.advance_projectiles(&self.field);
        }
    }

    fn step_meteorites(&mut self, ships: &mut [Ship], now: u64) {
        let stun_ms = self.hit_stun_ms;

        // Newest first
        for m in self.meteorites.iter_mut().rev() {
            m.advance();

            if let Some(detonate_at) = m.detonate_at {
                if detonate_at.saturating_sub(now) <= stun_ms {
                    m.shaking = true;
                }
                if now >= detonate_at {
                    m.dead = true;
                    if m.kind == MeteoriteKind::Cloud {
                        self.clouds.push(CloudZone::new(m.pos, now));
                        continue;
                    }

                    log::debug!("Meteorite #{} detonated at {:?}", m.id, m.pos);
                    self.events.push(GameEvent::Explosion {
                        pos: m.pos,
                        palette: m.kind.palette(),
                    });
                    self.events.push(GameEvent::Sound(SoundEffect::Explosion));
                    let radius = m.blast_radius.unwrap_or(m.size);
                    for ship in ships.iter_mut() {
                        if ship.is_alive() && !ship.is_dashing() && within_radius(ship.pos, m.pos, radius) {
                            damage::apply_hit(ship, &mut self.status, now, stun_ms, &mut self.events);
                        }
                    }
                    continue;
                }
            }

            if let Some(ship) = ships
                .iter_mut()
                .find(|s| s.is_alive() && rect_circle_overlap(s.pos, s.size, m.pos, m.radius()))
            {
                m.dead = true;
                self.events.push(GameEvent::Impact {
                    pos: m.pos,
                    palette: m.kind.palette(),
                });
                damage::apply_hit(ship, &mut self.status, now, stun_ms, &mut self.events);
                continue;
            }

            if m.is_out_of_field(&self.field) {
                m.dead = true;
            }
        }

        self.meteorites.retain(|m| !m.dead);
    }

    fn step_clouds(&mut self, now: u64) {
        self.clouds.retain(|c| c.expires_at > now);
        // Particle animation is owned by the host and ticks off the event stream
    }

    fn resolve_projectile_meteorites(&mut self, ships: &mut [Ship], now: u64) {
        let mut shards: Vec<Meteorite> = Vec::new();

        for ship in ships.iter_mut() {
            if !ship.is_alive() {
                continue;
            }
            let weapon = ship.weapon;
            let player = ship.player;
            let pierce = weapon == WeaponKind::Pierce;
            let mut split_products: Vec<Projectile> = Vec::new();

            for p in ship.projectiles.iter_mut().rev() {
                if p.dead {
                    continue;
                }
                for m in self.meteorites.iter_mut().rev() {
                    if m.dead || !rect_circle_overlap(p.pos, Projectile::size(), m.pos, m.radius()) {
                        continue;
                    }

                    self.events.push(GameEvent::Impact {
                        pos: p.pos,
                        palette: m.kind.palette(),
                    });

                    if m.kind == MeteoriteKind::Cloud {
                        self.clouds.push(CloudZone::new(m.pos, now));
                        m.dead = true;
                        if !pierce {
                            p.dead = true;
                        }
                    } else if weapon == WeaponKind::Split && !p.has_split {
                        split_products.extend(p.split());
                        p.dead = true;
                    } else if m.kind == MeteoriteKind::Shards && m.can_split {
                        shards.extend(m.shard_children());
                        m.dead = true;
                        if !pierce {
                            p.dead = true;
                        }
                    } else {
                        m.hp = m.hp.saturating_sub(1);
                        if m.hp == 0 {
                            m.dead = true;
                            let gold = m.kind.gold();
                            self.tally.credit(player, gold);
                            self.events.push(GameEvent::Explosion {
                                pos: m.pos,
                                palette: m.kind.palette(),
                            });
                            self.events.push(GameEvent::Sound(SoundEffect::Explosion));
                            self.events.push(GameEvent::MeteoriteDestroyed {
                                kind: m.kind,
                                player,
                                gold,
                            });
                        }
                        if !pierce {
                            p.dead = true;
                        }
                    }
                    break;
                }
            }

            ship.projectiles.retain(|p| !p.dead);
            ship.projectiles.extend(split_products);
        }

        self.meteorites.retain(|m| !m.dead);
        for mut shard in shards {
            shard.id = self.next_entity_id();
            self.meteorites.push(shard);
        }
    }

    fn step_gadgets(&mut self, ships: &mut [Ship], now: u64) {
        for g in self.gadgets.iter_mut() {
            g.fall();
            if g.consumed {
                continue;
            }
            if let Some(ship) = ships
                .iter_mut()
                .find(|s| s.is_alive() && rect_circle_overlap(s.pos, s.size, g.pos, g.pickup_radius))
            {
                g.consumed = true;
                damage::apply_gadget(g.kind, ship, now, &self.field, &mut self.rng, &mut self.events);
            }
        }

        let field = self.field;
        self.gadgets.retain(|g| !g.consumed && !g.is_out_of_field(&field));
    }

    fn step_enemies(&mut self, ships: &mut [Ship], now: u64) {
        let ship_count = ships.len();

        for (i, enemy) in self.enemies.iter_mut().enumerate() {
            enemy.patrol(&self.field);
            if ship_count > 0 {
                let target = &ships[i.min(ship_count - 1)];
                enemy.aim_at(target.pos);
                if target.is_alive() && enemy.try_fire(now) {
                    self.events.push(GameEvent::Sound(SoundEffect::EnemyShot));
                }
            }
            enemy.advance_projectiles(&self.field);
        }

        // Ship projectiles against enemies
        for ship in ships.iter_mut() {
            if !ship.is_alive() {
                continue;
            }
            let pierce = ship.weapon == WeaponKind::Pierce;
            let player = ship.player;

            for p in ship.projectiles.iter_mut() {
                for enemy in self.enemies.iter_mut().rev() {
                    if enemy.dead || !rect_circle_overlap(p.pos, Projectile::size(), enemy.pos, enemy.radius()) {
                        continue;
                    }
                    self.events.push(GameEvent::Impact {
                        pos: p.pos,
                        palette: Palette::Spark,
                    });
                    if enemy.hit(now) {
                        self.tally.credit(player, ENEMY_GOLD);
                        self.events.push(GameEvent::Explosion {
                            pos: enemy.pos,
                            palette: Palette::Metal,
                        });
                        self.events.push(GameEvent::Sound(SoundEffect::Explosion));
                        self.events.push(GameEvent::EnemyDestroyed { player });
                    }
                    if !pierce {
                        p.dead = true;
                    }
                    break;
                }
            }
            ship.projectiles.retain(|p| !p.dead);
        }

        // Enemy projectiles against ships
        let stun_ms = self.hit_stun_ms;
        for enemy in self.enemies.iter_mut() {
            for p in enemy.projectiles.iter_mut() {
                if let Some(ship) = ships
                    .iter_mut()
                    .find(|s| s.is_alive() && rect_circle_overlap(p.pos, Projectile::size(), s.pos, s.radius()))
                {
                    p.dead = true;
                    self.events.push(GameEvent::Impact {
                        pos: p.pos,
                        palette: Palette::Spark,
                    });
                    damage::apply_hit(ship, &mut self.status, now, stun_ms, &mut self.events);
                }
            }
            enemy.projectiles.retain(|p| !p.dead);
        }

        self.enemies.retain(|e| !e.dead);
    }

    /// Duel pass: each ship's projectiles against the other ship
    pub fn resolve_duel_hits(&mut self, ships: &mut [Ship], now: u64) {
        if ships.len() < 2 {
            return;
        }
        let (first, rest) = ships.split_at_mut(1);
        let (a, b) = (&mut first[0], &mut rest[0]);
        self.projectiles_against_ship(&mut a.projectiles, b, now);
        self.projectiles_against_ship(&mut b.projectiles, a, now);
    }

    fn projectiles_against_ship(&mut self, projectiles: &mut Vec<Projectile>, target: &mut Ship, now: u64) {
        for p in projectiles.iter_mut() {
            if !target.is_alive() {
                break;
            }
            if rect_circle_overlap(p.pos, Projectile::size(), target.pos, target.radius()) {
                p.dead = true;
                self.events.push(GameEvent::Impact {
                    pos: p.pos,
                    palette: Palette::Spark,
                });
                let outcome = damage::apply_hit(target, &mut self.status, now, self.hit_stun_ms, &mut self.events);
                if outcome == HitOutcome::Destroyed {
                    log::info!("Player {} shot down player {}", 2 - target.player, target.player + 1);
                }
            }
        }
        projectiles.retain(|p| !p.dead);
    }
}
