use crate::actions::DefenseAction;
use crate::config::DefenseConfig;
use crate::events::DefenseEvent;
use crate::systems;
use crate::world::DefenseState;
use bastion_core::{ActionEnvelope, Game, PlayerId, TerminalOutcome, Tick};

pub struct DefenseGame {
    state: DefenseState,
}

impl DefenseGame {
    pub fn state(&self) -> &DefenseState {
        &self.state
    }
}

impl Game for DefenseGame {
    type Config = DefenseConfig;
    type Action = DefenseAction;
    type Observation = bastion_types::DefenseObservation;
    type Event = DefenseEvent;

    fn new(config: Self::Config, _seed: u64) -> Self {
        Self {
            state: DefenseState::new(config),
        }
    }

    fn step(
        &mut self,
        tick: Tick,
        actions: &[ActionEnvelope<Self::Action>],
        out_events: &mut Vec<Self::Event>,
    ) {
        self.state.tick = tick;

        // 1. Input handlers run to completion before the frame's systems.
        for action in actions {
            match &action.payload {
                DefenseAction::PointerMoved { x, y } => {
                    systems::apply_pointer(&mut self.state, *x, *y);
                }
                DefenseAction::PlaceBuilding => {
                    systems::try_place_building(&mut self.state, tick, out_events);
                }
            }
        }

        // 2. Enemy movement and breach accounting.
        systems::move_enemies(&mut self.state, out_events);
        if self.state.hearts == 0 {
            // Game over: skip the rest of the frame; the host stops
            // scheduling after this tick.
            return;
        }

        // 3. Explosion sprite lifetimes.
        systems::update_explosions(&mut self.state);

        // 4. Next wave once the field is clear.
        systems::respawn_if_cleared(&mut self.state, out_events);

        // 5. Tile hover state.
        systems::update_tiles(&mut self.state);

        // 6. Buildings: fire, retarget, resolve projectiles.
        systems::update_buildings(&mut self.state, tick, out_events);
    }

    fn observe(&self, tick: Tick, _player: PlayerId) -> Self::Observation {
        crate::observe::build_observation(&self.state, tick)
    }

    fn is_terminal(&self) -> Option<TerminalOutcome> {
        (self.state.hearts == 0).then_some(TerminalOutcome::Lose)
    }
}
