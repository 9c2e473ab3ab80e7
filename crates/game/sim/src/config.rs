use bastion_core::Micros;
use glam::Vec2;

/// Static per-match tuning.
///
/// Field coordinates are pixels in a 1280x768 space; the placement layout is
/// a flat sequence of tile codes read in rows of `layout_columns`, one 64 px
/// cell per code. Enemies follow `waypoints` in order and keep their final
/// heading once the list is exhausted, which is how they leave the field.
#[derive(Clone, Debug)]
pub struct DefenseConfig {
    pub field_width: f32,
    pub field_height: f32,
    pub tick_hz: u32,

    pub waypoints: Vec<Vec2>,
    pub tile_layout: Vec<u8>,
    pub layout_columns: usize,
    pub buildable_code: u8,
    pub tile_size: f32,

    // Economy
    pub hearts_start: u32,
    pub coins_start: u32,
    pub coins_per_kill: u32,
    pub building_cost: u32,

    // Waves
    pub wave_base_size: u32,
    pub wave_size_growth: u32,
    pub spawn_spacing: f32,

    // Enemies
    pub enemy_hp: i32,
    pub enemy_speed: f32,
    pub enemy_radius: f32,
    pub enemy_half_extent: f32,

    // Buildings and projectiles
    pub building_range: f32,
    pub fire_period: Micros,
    pub projectile_speed: f32,
    pub projectile_radius: f32,
    pub projectile_damage: i32,

    pub explosion_frames: u8,
}

impl DefenseConfig {
    pub fn duration_to_ticks(&self, d: Micros) -> u64 {
        d.to_ticks(self.tick_hz)
    }

    /// Convert a speed in px/sec to the distance covered in one tick.
    pub fn speed_to_step(&self, px_per_sec: f32) -> f32 {
        px_per_sec / self.tick_hz as f32
    }
}

impl Default for DefenseConfig {
    fn default() -> Self {
        Self {
            field_width: 1280.0,
            field_height: 768.0,
            tick_hz: 60,

            waypoints: default_waypoints(),
            tile_layout: default_layout(),
            layout_columns: LAYOUT_COLUMNS,
            buildable_code: BUILDABLE_CODE,
            tile_size: 64.0,

            hearts_start: 10,
            coins_start: 100,
            coins_per_kill: 25,
            building_cost: 50,

            wave_base_size: 3,
            wave_size_growth: 2,
            spawn_spacing: 150.0,

            enemy_hp: 100,
            enemy_speed: 60.0,
            enemy_radius: 50.0,
            enemy_half_extent: 50.0,

            building_range: 250.0,
            fire_period: Micros::from_secs(2),
            projectile_speed: 300.0,
            projectile_radius: 10.0,
            projectile_damage: 20,

            explosion_frames: 4,
        }
    }
}

const LAYOUT_COLUMNS: usize = 20;
const LAYOUT_ROWS: usize = 12;
const BUILDABLE_CODE: u8 = 14;

/// Default path: enters at the left edge, snakes through the field, and runs
/// off past the right edge. Coordinates steer the enemy sprite's top-left
/// corner, so the last waypoint sits beyond `field_width`.
fn default_waypoints() -> Vec<Vec2> {
    [
        (0.0, 384.0),
        (256.0, 384.0),
        (256.0, 128.0),
        (704.0, 128.0),
        (704.0, 512.0),
        (1088.0, 512.0),
        (1344.0, 512.0),
    ]
    .into_iter()
    .map(|(x, y)| Vec2::new(x, y))
    .collect()
}

/// Default placement layout: buildable shelves along the default path.
fn default_layout() -> Vec<u8> {
    // (column, row) of each buildable cell
    const BUILDABLE: [(usize, usize); 20] = [
        (1, 5),
        (3, 5),
        (1, 8),
        (3, 8),
        (3, 3),
        (5, 4),
        (6, 0),
        (9, 0),
        (6, 3),
        (8, 3),
        (10, 3),
        (10, 5),
        (12, 4),
        (12, 6),
        (13, 6),
        (15, 6),
        (17, 6),
        (13, 9),
        (15, 9),
        (17, 9),
    ];

    let mut cells = vec![0u8; LAYOUT_COLUMNS * LAYOUT_ROWS];
    for &(col, row) in BUILDABLE.iter() {
        cells[row * LAYOUT_COLUMNS + col] = BUILDABLE_CODE;
    }
    cells
}
