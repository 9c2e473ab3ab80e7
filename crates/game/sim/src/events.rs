use crate::world::EnemyId;

#[derive(Clone, Debug)]
pub enum DefenseEvent {
    WaveSpawned {
        wave: u32,
        size: u32,
    },
    BuildingPlaced {
        x: f32,
        y: f32,
    },
    InsufficientCoins {
        cost: u32,
        have: u32,
    },
    EnemyKilled {
        id: EnemyId,
        x: f32,
        y: f32,
    },
    EnemyBreached {
        id: EnemyId,
        hearts_left: u32,
    },
    /// Emitted exactly once, on the tick hearts reach zero.
    GameOver,
}
