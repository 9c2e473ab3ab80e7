use bastion_core::ActionEnvelope;
use bastion_host::MatchHost;
use bastion_sim::{DefenseAction, DefenseConfig, DefenseEvent, DefenseGame};
use std::time::{Duration, Instant};

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let realtime = args.iter().any(|a| a == "--realtime" || a == "-r");

    let config = DefenseConfig::default();
    let tick_hz = config.tick_hz;

    let mut host = MatchHost::<DefenseGame>::new(config, 0, tick_hz);
    let player = host.join_player();

    // Script: hover the first two placement tiles and build on both.
    let tile_centers: Vec<(f32, f32)> = host
        .game()
        .state()
        .world
        .tiles
        .iter()
        .take(2)
        .map(|t| (t.pos.x + t.size / 2.0, t.pos.y + t.size / 2.0))
        .collect();

    let mut action_id = 1;
    let mut tick = 1;
    for (x, y) in tile_centers {
        host.submit(ActionEnvelope {
            player_id: player,
            action_id,
            intended_tick: tick,
            payload: DefenseAction::PointerMoved { x, y },
        });
        action_id += 1;
        tick += 1;

        host.submit(ActionEnvelope {
            player_id: player,
            action_id,
            intended_tick: tick,
            payload: DefenseAction::PlaceBuilding,
        });
        action_id += 1;
        tick += 1;
    }

    println!("Scheduled {} scripted placements", action_id / 2);

    if realtime {
        run_realtime(&mut host, tick_hz);
    } else {
        run_fast(&mut host);
    }
}

fn run_fast(host: &mut MatchHost<DefenseGame>) {
    let max_ticks = 60 * 60 * 5; // 5 minutes at 60 Hz
    let result = host.run_for_ticks(max_ticks);

    println!("=== Defense Simulation Complete ===");
    println!("Outcome: {:?}", result.outcome);
    println!("Final tick: {}", result.final_tick);

    print_state(host);
    print_event_summary(&result.events);
}

fn run_realtime(host: &mut MatchHost<DefenseGame>, tick_hz: u32) {
    let tick_duration = Duration::from_secs_f64(1.0 / tick_hz as f64);
    let mut last_status = Instant::now();
    let mut all_events = Vec::new();

    println!("=== Running in Real-Time Mode ({}Hz) ===", tick_hz);
    println!("Press Ctrl+C to stop\n");

    loop {
        let tick_start = Instant::now();

        let Some(events) = host.step_one_tick() else {
            break; // match is over
        };

        for event in &events {
            print_event(host.current_tick(), event);
        }
        all_events.extend(events);

        if last_status.elapsed() >= Duration::from_secs(1) {
            print_status(host);
            last_status = Instant::now();
        }

        let elapsed = tick_start.elapsed();
        if elapsed < tick_duration {
            std::thread::sleep(tick_duration - elapsed);
        }
    }

    println!("\n=== Defense Simulation Complete ===");
    println!("Outcome: {:?}", host.is_terminal());
    println!("Final tick: {}", host.current_tick());

    print_state(host);
    print_event_summary(&all_events);
}

fn print_state(host: &MatchHost<DefenseGame>) {
    let state = host.game().state();
    println!("Hearts: {}", state.hearts);
    println!("Coins: {}", state.coins);
    println!("Wave: {}", state.wave);
    println!("Enemies on field: {}", state.world.enemies.len());
    println!("Buildings: {}", state.world.buildings.len());
}

fn print_event(tick: u64, event: &DefenseEvent) {
    match event {
        DefenseEvent::WaveSpawned { wave, size } => {
            println!("[{:>6}] === Wave {} entered ({} enemies) ===", tick, wave, size)
        }
        DefenseEvent::BuildingPlaced { x, y } => {
            println!("[{:>6}] Building placed at ({}, {})", tick, x, y)
        }
        DefenseEvent::InsufficientCoins { cost, have } => {
            println!("[{:>6}] Insufficient coins: need {}, have {}", tick, cost, have)
        }
        DefenseEvent::EnemyKilled { x, y, .. } => {
            println!("[{:>6}] Enemy killed at ({:.0}, {:.0})", tick, x, y)
        }
        DefenseEvent::EnemyBreached { hearts_left, .. } => {
            println!("[{:>6}] Enemy breached! {} hearts left", tick, hearts_left)
        }
        DefenseEvent::GameOver => println!("[{:>6}] === GAME OVER ===", tick),
    }
}

fn print_status(host: &MatchHost<DefenseGame>) {
    let state = host.game().state();
    let time_secs = host.current_tick() as f64 / host.tick_hz() as f64;
    println!(
        "  [{:>5.1}s] Wave {}, Enemies: {}, Buildings: {}, Shots: {}, Coins: {}, Hearts: {}",
        time_secs,
        state.wave,
        state.world.enemies.len(),
        state.world.buildings.len(),
        state.projectile_count(),
        state.coins,
        state.hearts
    );
}

fn print_event_summary(events: &[DefenseEvent]) {
    let mut waves = 0;
    let mut placements = 0;
    let mut rejections = 0;
    let mut kills = 0;
    let mut breaches = 0;

    for event in events {
        match event {
            DefenseEvent::WaveSpawned { .. } => waves += 1,
            DefenseEvent::BuildingPlaced { .. } => placements += 1,
            DefenseEvent::InsufficientCoins { .. } => rejections += 1,
            DefenseEvent::EnemyKilled { .. } => kills += 1,
            DefenseEvent::EnemyBreached { .. } => breaches += 1,
            DefenseEvent::GameOver => {}
        }
    }

    println!("\n=== Event Summary ===");
    println!("Waves entered: {}", waves);
    println!("Buildings placed: {}", placements);
    println!("Placements rejected: {}", rejections);
    println!("Enemies killed: {}", kills);
    println!("Enemies breached: {}", breaches);
}
