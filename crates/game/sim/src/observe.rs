use crate::world::DefenseState;
use bastion_core::Tick;
use bastion_types::{
    BuildingView, DefenseObservation, EnemyView, ExplosionView, Position, ProjectileView,
    TileView,
};

pub fn build_observation(state: &DefenseState, tick: Tick) -> DefenseObservation {
    let config = &state.config;

    let next_wave_size = if state.wave == 0 {
        state.spawn_count
    } else {
        state.spawn_count + config.wave_size_growth
    };

    DefenseObservation {
        tick,
        ticks_per_second: config.tick_hz,

        field_width: config.field_width,
        field_height: config.field_height,
        tile_size: config.tile_size,

        hearts: state.hearts,
        coins: state.coins,
        building_cost: config.building_cost,

        wave: state.wave,
        next_wave_size,

        pointer: state.pointer.map(|p| Position { x: p.x, y: p.y }),

        enemies: state
            .world
            .enemies
            .values()
            .map(|e| EnemyView {
                x: e.pos.x,
                y: e.pos.y,
                hp: e.hp,
                radius: e.radius,
            })
            .collect(),

        buildings: state
            .world
            .buildings
            .iter()
            .map(|b| BuildingView {
                x: b.pos.x,
                y: b.pos.y,
                range: b.range,
                has_target: b.target.is_some(),
            })
            .collect(),

        projectiles: state
            .world
            .buildings
            .iter()
            .flat_map(|b| &b.projectiles)
            .map(|p| ProjectileView {
                x: p.pos.x,
                y: p.pos.y,
                radius: p.radius,
            })
            .collect(),

        explosions: state
            .world
            .explosions
            .iter()
            .map(|e| ExplosionView {
                x: e.pos.x,
                y: e.pos.y,
                frame: e.frame,
                max_frames: e.max_frames,
            })
            .collect(),

        tiles: state
            .world
            .tiles
            .iter()
            .map(|t| TileView {
                x: t.pos.x,
                y: t.pos.y,
                size: t.size,
                occupied: t.occupied,
                hovered: t.hovered,
            })
            .collect(),
    }
}
