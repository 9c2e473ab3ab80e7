use crate::events::DefenseEvent;
use crate::path;
use crate::world::{Building, DefenseState, Enemy, EnemyId, Explosion, Projectile, World};
use bastion_core::Tick;
use glam::Vec2;
use slotmap::SlotMap;

/// Store the pointer position and recompute the active placement tile.
/// First containing tile wins, in tile array order.
pub fn apply_pointer(state: &mut DefenseState, x: f32, y: f32) {
    let pointer = Vec2::new(x, y);
    state.pointer = Some(pointer);
    state.active_tile = state
        .world
        .tiles
        .iter()
        .position(|tile| tile.contains(pointer));
}

/// Attempt a placement on the active tile. No active tile or an occupied
/// tile is a silent no-op; short coins reject the attempt with a telemetry
/// event. On success the cost is deducted exactly once.
pub fn try_place_building(
    state: &mut DefenseState,
    tick: Tick,
    events: &mut Vec<DefenseEvent>,
) -> bool {
    let Some(index) = state.active_tile else {
        return false;
    };
    if state.world.tiles[index].occupied {
        return false;
    }

    let cost = state.config.building_cost;
    if state.coins < cost {
        events.push(DefenseEvent::InsufficientCoins {
            cost,
            have: state.coins,
        });
        return false;
    }

    state.coins -= cost;

    let tile = &mut state.world.tiles[index];
    tile.occupied = true;
    let pos = tile.pos;

    state.world.buildings.push(Building {
        pos,
        range: state.config.building_range,
        target: None,
        // Ready to fire as soon as a target is acquired.
        next_fire_tick: tick,
        projectiles: Vec::new(),
    });

    events.push(DefenseEvent::BuildingPlaced { x: pos.x, y: pos.y });
    true
}

/// Advance every enemy one step along the path; enemies past the right edge
/// breach: they are removed and cost one heart. Returns early the moment
/// hearts reach zero so nothing mutates after the game-over transition.
pub fn move_enemies(state: &mut DefenseState, events: &mut Vec<DefenseEvent>) {
    let step = state.config.speed_to_step(state.config.enemy_speed);
    let ids: Vec<EnemyId> = state.world.enemies.keys().collect();

    for id in ids {
        {
            let enemy = &mut state.world.enemies[id];
            path::advance(
                &mut enemy.pos,
                &mut enemy.heading,
                &mut enemy.waypoint,
                &state.config.waypoints,
                step,
            );
        }

        if state.world.enemies[id].pos.x > state.config.field_width {
            state.world.enemies.remove(id);
            state.hearts = state.hearts.saturating_sub(1);
            events.push(DefenseEvent::EnemyBreached {
                id,
                hearts_left: state.hearts,
            });

            if state.hearts == 0 {
                events.push(DefenseEvent::GameOver);
                return;
            }
        }
    }
}

/// Advance explosion frames, dropping sprites that completed their lifetime.
pub fn update_explosions(state: &mut DefenseState) {
    state.world.explosions.retain_mut(|explosion| {
        explosion.frame += 1;
        explosion.frame < explosion.max_frames
    });
}

/// Once the field is clear, send in the next wave. The first wave uses the
/// base size; every later wave grows by the configured increment.
pub fn respawn_if_cleared(state: &mut DefenseState, events: &mut Vec<DefenseEvent>) {
    if !state.world.enemies.is_empty() {
        return;
    }
    if state.wave > 0 {
        state.spawn_count += state.config.wave_size_growth;
    }
    spawn_wave(state, state.spawn_count, events);
}

/// Spawn `size` enemies in a staggered line behind the path start, each one
/// `spawn_spacing` further back than the last.
pub fn spawn_wave(state: &mut DefenseState, size: u32, events: &mut Vec<DefenseEvent>) {
    let start = state.config.waypoints.first().copied().unwrap_or(Vec2::ZERO);

    for i in 1..=size {
        let spawn_seq = state.next_spawn_seq;
        state.next_spawn_seq += 1;
        state.world.enemies.insert(Enemy {
            pos: Vec2::new(start.x - state.config.spawn_spacing * i as f32, start.y),
            hp: state.config.enemy_hp,
            radius: state.config.enemy_radius,
            waypoint: 0,
            heading: Vec2::X,
            spawn_seq,
        });
    }

    state.wave += 1;
    events.push(DefenseEvent::WaveSpawned {
        wave: state.wave,
        size,
    });
}

/// Refresh each tile's hover flag from the current pointer position.
pub fn update_tiles(state: &mut DefenseState) {
    let pointer = state.pointer;
    for tile in &mut state.world.tiles {
        tile.hovered = pointer.map_or(false, |p| tile.contains(p));
    }
}

/// Per-building frame: fire if the cooldown elapsed and last frame's target
/// is still alive, reacquire the target, then advance and resolve this
/// building's projectiles.
pub fn update_buildings(state: &mut DefenseState, tick: Tick, events: &mut Vec<DefenseEvent>) {
    let DefenseState {
        config,
        world,
        coins,
        ..
    } = state;
    let World {
        buildings,
        enemies,
        explosions,
        ..
    } = world;

    let fire_interval = config.duration_to_ticks(config.fire_period);
    let projectile_step = config.speed_to_step(config.projectile_speed);
    let half = config.enemy_half_extent;

    for building in buildings.iter_mut() {
        let center = building.center(config.tile_size);

        // Fire at the target locked on the previous frame, aimed at where
        // the enemy is right now. The shot keeps that velocity forever.
        if tick >= building.next_fire_tick {
            if let Some(target_id) = building.target {
                if let Some(enemy) = enemies.get(target_id) {
                    let direction = (enemy.center(half) - center).normalize_or_zero();
                    building.projectiles.push(Projectile {
                        pos: center,
                        vel: direction * projectile_step,
                        radius: config.projectile_radius,
                        target: target_id,
                    });
                    building.next_fire_tick = tick + fire_interval;
                }
            }
        }

        // Reacquire: the earliest-spawned live enemy strictly inside range.
        // No persistence: out of range means the target drops immediately.
        building.target = acquire_target(enemies, center, building.range, half);

        building.projectiles.retain_mut(|projectile| {
            projectile.pos += projectile.vel;

            if let Some(enemy) = enemies.get_mut(projectile.target) {
                let contact = enemy.radius + projectile.radius;
                if enemy.center(half).distance(projectile.pos) < contact {
                    enemy.hp -= config.projectile_damage;
                    if enemy.hp <= 0 {
                        let impact = enemy.center(half);
                        enemies.remove(projectile.target);
                        *coins += config.coins_per_kill;
                        events.push(DefenseEvent::EnemyKilled {
                            id: projectile.target,
                            x: impact.x,
                            y: impact.y,
                        });
                    }
                    explosions.push(Explosion {
                        pos: projectile.pos,
                        frame: 0,
                        max_frames: config.explosion_frames,
                    });
                    return false;
                }
                return true;
            }

            // The target was removed before this shot connected: no collision
            // is possible any more. Keep flying until the shot leaves the
            // field, then drop it.
            projectile.pos.x >= 0.0
                && projectile.pos.x <= config.field_width
                && projectile.pos.y >= 0.0
                && projectile.pos.y <= config.field_height
        });
    }
}

fn acquire_target(
    enemies: &SlotMap<EnemyId, Enemy>,
    center: Vec2,
    range: f32,
    half_extent: f32,
) -> Option<EnemyId> {
    let mut earliest: Option<(u64, EnemyId)> = None;

    for (id, enemy) in enemies.iter() {
        if enemy.center(half_extent).distance(center) >= enemy.radius + range {
            continue;
        }
        if earliest.map_or(true, |(seq, _)| enemy.spawn_seq < seq) {
            earliest = Some((enemy.spawn_seq, id));
        }
    }

    earliest.map(|(_, id)| id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DefenseConfig;

    fn layout_with_tile(col: usize, row: usize) -> Vec<u8> {
        let mut cells = vec![0u8; 20 * 12];
        cells[row * 20 + col] = 14;
        cells
    }

    /// Straight path along y = 384 with one buildable tile at (320, 320);
    /// the building center lands on (352, 352).
    fn test_config() -> DefenseConfig {
        DefenseConfig {
            waypoints: vec![Vec2::new(0.0, 384.0), Vec2::new(1400.0, 384.0)],
            tile_layout: layout_with_tile(5, 5),
            ..DefenseConfig::default()
        }
    }

    fn test_state() -> DefenseState {
        DefenseState::new(test_config())
    }

    fn insert_enemy(state: &mut DefenseState, pos: Vec2, hp: i32, spawn_seq: u64) -> EnemyId {
        state.world.enemies.insert(Enemy {
            pos,
            hp,
            radius: state.config.enemy_radius,
            waypoint: 1,
            heading: Vec2::X,
            spawn_seq,
        })
    }

    fn building_at_tile(state: &DefenseState, target: Option<EnemyId>) -> Building {
        Building {
            pos: state.world.tiles[0].pos,
            range: state.config.building_range,
            target,
            next_fire_tick: Tick::MAX, // never fires unless a test says so
            projectiles: Vec::new(),
        }
    }

    #[test]
    fn pointer_selects_the_first_containing_tile() {
        let mut state = test_state();

        apply_pointer(&mut state, 352.0, 352.0);
        assert_eq!(state.active_tile, Some(0));

        apply_pointer(&mut state, 5.0, 5.0);
        assert_eq!(state.active_tile, None);
    }

    #[test]
    fn hover_flags_follow_the_pointer() {
        let mut state = test_state();

        apply_pointer(&mut state, 352.0, 352.0);
        update_tiles(&mut state);
        assert!(state.world.tiles[0].hovered);

        apply_pointer(&mut state, 5.0, 5.0);
        update_tiles(&mut state);
        assert!(!state.world.tiles[0].hovered);
    }

    #[test]
    fn placement_deducts_the_cost_exactly_once() {
        let mut state = test_state();
        let mut events = Vec::new();

        apply_pointer(&mut state, 352.0, 352.0);
        assert!(try_place_building(&mut state, 1, &mut events));
        assert_eq!(state.coins, 50);
        assert!(state.world.tiles[0].occupied);
        assert_eq!(state.world.buildings.len(), 1);
        assert!(matches!(events[0], DefenseEvent::BuildingPlaced { .. }));

        // Occupied tile: silent no-op.
        assert!(!try_place_building(&mut state, 2, &mut events));
        assert_eq!(state.coins, 50);
        assert_eq!(state.world.buildings.len(), 1);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn placement_without_an_active_tile_is_a_no_op() {
        let mut state = test_state();
        let mut events = Vec::new();

        assert!(!try_place_building(&mut state, 1, &mut events));
        assert_eq!(state.coins, 100);
        assert!(state.world.buildings.is_empty());
        assert!(events.is_empty());
    }

    #[test]
    fn placement_is_rejected_when_coins_run_short() {
        let mut state = test_state();
        state.coins = 49;
        let mut events = Vec::new();

        apply_pointer(&mut state, 352.0, 352.0);
        assert!(!try_place_building(&mut state, 1, &mut events));
        assert_eq!(state.coins, 49);
        assert!(state.world.buildings.is_empty());
        assert!(matches!(
            events[0],
            DefenseEvent::InsufficientCoins { cost: 50, have: 49 }
        ));
    }

    #[test]
    fn first_wave_uses_the_base_size_then_grows_by_two() {
        let mut state = test_state();
        let mut events = Vec::new();

        respawn_if_cleared(&mut state, &mut events);
        assert_eq!(state.world.enemies.len(), 3);
        assert!(matches!(
            events.last(),
            Some(DefenseEvent::WaveSpawned { wave: 1, size: 3 })
        ));

        // a populated field spawns nothing
        respawn_if_cleared(&mut state, &mut events);
        assert_eq!(state.world.enemies.len(), 3);

        state.world.enemies.clear();
        respawn_if_cleared(&mut state, &mut events);
        assert_eq!(state.world.enemies.len(), 5);

        state.world.enemies.clear();
        respawn_if_cleared(&mut state, &mut events);
        assert_eq!(state.world.enemies.len(), 7);
        assert!(matches!(
            events.last(),
            Some(DefenseEvent::WaveSpawned { wave: 3, size: 7 })
        ));
    }

    #[test]
    fn wave_offsets_strictly_increase_behind_the_path_start() {
        let mut state = test_state();
        let mut events = Vec::new();

        respawn_if_cleared(&mut state, &mut events);

        let mut xs: Vec<f32> = state.world.enemies.values().map(|e| e.pos.x).collect();
        xs.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(xs, vec![-450.0, -300.0, -150.0]);
    }

    #[test]
    fn breach_removes_the_enemy_and_costs_a_heart() {
        let mut state = test_state();
        let mut events = Vec::new();

        // Past the last waypoint, one step short of the right edge.
        let id = state.world.enemies.insert(Enemy {
            pos: Vec2::new(1279.5, 384.0),
            hp: 100,
            radius: 50.0,
            waypoint: 2,
            heading: Vec2::X,
            spawn_seq: 0,
        });

        move_enemies(&mut state, &mut events);
        assert!(state.world.enemies.get(id).is_none());
        assert_eq!(state.hearts, 9);
        assert!(matches!(
            events[0],
            DefenseEvent::EnemyBreached { hearts_left: 9, .. }
        ));
    }

    #[test]
    fn game_over_fires_once_when_hearts_reach_zero() {
        let mut state = test_state();
        state.hearts = 1;
        let mut events = Vec::new();

        state.world.enemies.insert(Enemy {
            pos: Vec2::new(1279.5, 384.0),
            hp: 100,
            radius: 50.0,
            waypoint: 2,
            heading: Vec2::X,
            spawn_seq: 0,
        });

        move_enemies(&mut state, &mut events);
        assert_eq!(state.hearts, 0);
        let game_overs = events
            .iter()
            .filter(|e| matches!(e, DefenseEvent::GameOver))
            .count();
        assert_eq!(game_overs, 1);
    }

    #[test]
    fn target_requires_distance_strictly_inside_the_radius_sum() {
        let mut state = test_state();
        // building center (352, 352); radius sum = 50 + 250 = 300
        let building = building_at_tile(&state, None);
        state.world.buildings.push(building);

        // enemy center (352, 652): distance exactly 300 — out
        insert_enemy(&mut state, Vec2::new(302.0, 602.0), 100, 0);
        let mut events = Vec::new();
        update_buildings(&mut state, 1, &mut events);
        assert_eq!(state.world.buildings[0].target, None);

        // one pixel closer — in
        let id = insert_enemy(&mut state, Vec2::new(302.0, 601.0), 100, 1);
        update_buildings(&mut state, 2, &mut events);
        assert_eq!(state.world.buildings[0].target, Some(id));
    }

    #[test]
    fn earliest_spawned_enemy_wins_the_tie_break() {
        let mut state = test_state();
        let building = building_at_tile(&state, None);
        state.world.buildings.push(building);

        // Both in range; the one inserted later carries the earlier spawn_seq
        // and is also farther away. Spawn order must win.
        insert_enemy(&mut state, Vec2::new(300.0, 330.0), 100, 7);
        let earlier = insert_enemy(&mut state, Vec2::new(180.0, 330.0), 100, 2);

        let mut events = Vec::new();
        update_buildings(&mut state, 1, &mut events);
        assert_eq!(state.world.buildings[0].target, Some(earlier));
    }

    #[test]
    fn no_target_means_no_projectiles() {
        let mut state = test_state();
        let mut building = building_at_tile(&state, None);
        building.next_fire_tick = 0; // cooldown always elapsed
        state.world.buildings.push(building);

        let mut events = Vec::new();
        for tick in 1..=10 {
            update_buildings(&mut state, tick, &mut events);
        }
        assert_eq!(state.projectile_count(), 0);
    }

    #[test]
    fn elapsed_cooldown_fires_at_the_locked_target() {
        let mut state = test_state();
        let id = insert_enemy(&mut state, Vec2::new(150.0, 334.0), 100, 0);
        let mut building = building_at_tile(&state, Some(id));
        building.next_fire_tick = 5;
        state.world.buildings.push(building);

        let mut events = Vec::new();
        update_buildings(&mut state, 4, &mut events);
        assert_eq!(state.projectile_count(), 0);

        update_buildings(&mut state, 5, &mut events);
        assert_eq!(state.projectile_count(), 1);

        let building = &state.world.buildings[0];
        // cooldown reset: 2 s at 60 Hz
        assert_eq!(building.next_fire_tick, 125);
        let projectile = &building.projectiles[0];
        assert_eq!(projectile.target, id);
        // aimed from the building center toward the enemy center
        assert!(projectile.vel.x < 0.0);
        assert!(projectile.vel.length() > 0.0);
    }

    #[test]
    fn collision_kills_award_coins_and_spawn_an_explosion() {
        let mut state = test_state();
        let id = insert_enemy(&mut state, Vec2::new(300.0, 384.0), 20, 0);

        let mut building = building_at_tile(&state, Some(id));
        // Shot already next to the enemy center (350, 434).
        building.projectiles.push(Projectile {
            pos: Vec2::new(350.0, 400.0),
            vel: Vec2::ZERO,
            radius: 10.0,
            target: id,
        });
        state.world.buildings.push(building);

        let mut events = Vec::new();
        update_buildings(&mut state, 1, &mut events);

        assert!(state.world.enemies.get(id).is_none());
        assert_eq!(state.coins, 125);
        assert_eq!(state.projectile_count(), 0);
        assert_eq!(state.world.explosions.len(), 1);
        assert_eq!(state.world.explosions[0].pos, Vec2::new(350.0, 400.0));
        assert!(events
            .iter()
            .any(|e| matches!(e, DefenseEvent::EnemyKilled { .. })));
    }

    #[test]
    fn damage_without_a_kill_still_spends_the_projectile() {
        let mut state = test_state();
        let id = insert_enemy(&mut state, Vec2::new(300.0, 384.0), 100, 0);

        let mut building = building_at_tile(&state, Some(id));
        building.projectiles.push(Projectile {
            pos: Vec2::new(350.0, 400.0),
            vel: Vec2::ZERO,
            radius: 10.0,
            target: id,
        });
        state.world.buildings.push(building);

        let mut events = Vec::new();
        update_buildings(&mut state, 1, &mut events);

        assert_eq!(state.world.enemies[id].hp, 80);
        assert_eq!(state.coins, 100);
        assert_eq!(state.projectile_count(), 0);
        assert_eq!(state.world.explosions.len(), 1);
    }

    #[test]
    fn stale_target_causes_no_collision_and_the_shot_flies_off() {
        let mut state = test_state();
        let id = insert_enemy(&mut state, Vec2::new(300.0, 384.0), 20, 0);

        // First building kills the enemy this frame.
        let mut killer = building_at_tile(&state, Some(id));
        killer.projectiles.push(Projectile {
            pos: Vec2::new(350.0, 400.0),
            vel: Vec2::ZERO,
            radius: 10.0,
            target: id,
        });
        state.world.buildings.push(killer);

        // Second building's shot references the same enemy but is nowhere
        // near it yet.
        let mut late = building_at_tile(&state, Some(id));
        late.projectiles.push(Projectile {
            pos: Vec2::new(1270.0, 100.0),
            vel: Vec2::new(5.0, 0.0),
            radius: 10.0,
            target: id,
        });
        state.world.buildings.push(late);

        let mut events = Vec::new();
        update_buildings(&mut state, 1, &mut events);

        // the stale shot neither collided nor exploded
        assert_eq!(state.world.buildings[1].projectiles.len(), 1);
        assert_eq!(state.world.explosions.len(), 1);

        // it despawns once it leaves the field
        update_buildings(&mut state, 2, &mut events);
        update_buildings(&mut state, 3, &mut events);
        assert_eq!(state.world.buildings[1].projectiles.len(), 0);
        assert_eq!(state.world.explosions.len(), 1);
    }

    #[test]
    fn explosions_live_exactly_four_frames() {
        let mut state = test_state();
        state.world.explosions.push(Explosion {
            pos: Vec2::ZERO,
            frame: 0,
            max_frames: 4,
        });

        for _ in 0..3 {
            update_explosions(&mut state);
            assert_eq!(state.world.explosions.len(), 1);
        }
        update_explosions(&mut state);
        assert!(state.world.explosions.is_empty());
    }
}
