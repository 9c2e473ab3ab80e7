use crate::config::DefenseConfig;
use bastion_core::Tick;
use glam::Vec2;
use slotmap::{new_key_type, SlotMap};

new_key_type! { pub struct EnemyId; }

/// An enemy walking the waypoint path. `pos` is the top-left corner of its
/// sprite box; distance checks use the center.
#[derive(Clone, Debug)]
pub struct Enemy {
    pub pos: Vec2,
    pub hp: i32,
    pub radius: f32,
    pub waypoint: usize,
    pub heading: Vec2,
    /// Monotonic spawn counter; target acquisition prefers the smallest.
    pub spawn_seq: u64,
}

impl Enemy {
    pub fn center(&self, half_extent: f32) -> Vec2 {
        self.pos + Vec2::splat(half_extent)
    }
}

/// A shot in flight. Velocity is fixed at launch: a straight shot, not a
/// homing missile. The target id may stop resolving if another shot removes
/// the enemy first; that is handled at collision time.
#[derive(Clone, Debug)]
pub struct Projectile {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub target: EnemyId,
}

/// A stationary defense occupying one placement tile. Owns its projectiles.
#[derive(Clone, Debug)]
pub struct Building {
    pub pos: Vec2,
    pub range: f32,
    pub target: Option<EnemyId>,
    pub next_fire_tick: Tick,
    pub projectiles: Vec<Projectile>,
}

impl Building {
    pub fn center(&self, tile_size: f32) -> Vec2 {
        self.pos + Vec2::splat(tile_size * 0.5)
    }
}

/// A short-lived impact sprite; removed once `frame` reaches `max_frames`.
#[derive(Clone, Debug)]
pub struct Explosion {
    pub pos: Vec2,
    pub frame: u8,
    pub max_frames: u8,
}

/// A grid cell eligible for building placement.
#[derive(Clone, Debug)]
pub struct PlacementTile {
    pub pos: Vec2,
    pub size: f32,
    pub occupied: bool,
    pub hovered: bool,
}

impl PlacementTile {
    pub fn contains(&self, p: Vec2) -> bool {
        p.x > self.pos.x
            && p.x < self.pos.x + self.size
            && p.y > self.pos.y
            && p.y < self.pos.y + self.size
    }
}

#[derive(Clone, Debug)]
pub struct World {
    pub enemies: SlotMap<EnemyId, Enemy>,
    pub buildings: Vec<Building>,
    pub explosions: Vec<Explosion>,
    pub tiles: Vec<PlacementTile>,
}

impl World {
    /// Build the placement tiles from the layout grid; entity collections
    /// start empty.
    pub fn new(config: &DefenseConfig) -> Self {
        let mut tiles = Vec::new();
        for (i, &code) in config.tile_layout.iter().enumerate() {
            if code != config.buildable_code {
                continue;
            }
            let col = i % config.layout_columns;
            let row = i / config.layout_columns;
            tiles.push(PlacementTile {
                pos: Vec2::new(
                    col as f32 * config.tile_size,
                    row as f32 * config.tile_size,
                ),
                size: config.tile_size,
                occupied: false,
                hovered: false,
            });
        }

        Self {
            enemies: SlotMap::with_key(),
            buildings: Vec::new(),
            explosions: Vec::new(),
            tiles,
        }
    }
}

/// The full mutable state of a match.
#[derive(Clone, Debug)]
pub struct DefenseState {
    pub config: DefenseConfig,
    pub tick: Tick,
    pub world: World,

    pub hearts: u32,
    pub coins: u32,

    /// Waves spawned so far; 0 until the first wave enters.
    pub wave: u32,
    /// Size of the most recent wave; grows by `wave_size_growth` per wave.
    pub spawn_count: u32,

    pub pointer: Option<Vec2>,
    /// Index into `world.tiles` of the tile under the pointer.
    pub active_tile: Option<usize>,

    pub next_spawn_seq: u64,
}

impl DefenseState {
    pub fn new(config: DefenseConfig) -> Self {
        let world = World::new(&config);
        Self {
            tick: 0,
            world,
            hearts: config.hearts_start,
            coins: config.coins_start,
            wave: 0,
            spawn_count: config.wave_base_size,
            pointer: None,
            active_tile: None,
            next_spawn_seq: 0,
            config,
        }
    }

    /// Projectiles in flight across all buildings.
    pub fn projectile_count(&self) -> usize {
        self.world
            .buildings
            .iter()
            .map(|b| b.projectiles.len())
            .sum()
    }
}
