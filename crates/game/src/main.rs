//! Overrun - headless driver. Loads configuration, runs a scripted session
//! at the configured tick rate and logs how it went.

use anyhow::{Context, Result};
use engine_core::{AssetError, SpriteAtlas, SpriteHandle, SpriteId, Time};
use game::{GameConfig, Roster, World};
use input::{Button, InputBinding, InputHub, InputSnapshot};
use procgen::BiomeTable;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Handles are sheet indices; the real renderer owns the images.
struct SheetAtlas;

impl SpriteAtlas for SheetAtlas {
    fn get_sprite(&self, id: SpriteId) -> Result<SpriteHandle, AssetError> {
        Ok(SpriteHandle(id as u32))
    }
}

/// Stand-in controller: runs right, hops every second, fires in bursts.
fn spawn_scripted_pad(seat: u32, slot: InputBinding, running: Arc<AtomicBool>) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let mut frame: u64 = 0;
        while running.load(Ordering::Relaxed) {
            let mut snapshot = InputSnapshot::new().with_axes(1.0, 0.0);
            snapshot.set_button(Button::Jump, (frame + seat as u64 * 13) % 60 < 4);
            snapshot.set_button(Button::Fire, (frame / 30) % 2 == 0);
            slot.publish(snapshot);
            frame += 1;
            thread::sleep(Duration::from_millis(16));
        }
    })
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut config = GameConfig::load();
    let seed = *config.seed.get_or_insert_with(rand::random);
    log::info!("Starting Overrun (seed {})", seed);

    let table = BiomeTable::load(&config.biome_file)
        .with_context(|| format!("loading biome table {:?}", config.biome_file))?;
    let roster = Roster::load(&config.roster_file)
        .with_context(|| format!("loading roster {:?}", config.roster_file))?;

    let max_ticks = config.max_ticks;
    let tick_rate = config.tick_rate;
    let mut world = World::new(config, &table, &roster, &SheetAtlas).context("building world")?;

    let running = Arc::new(AtomicBool::new(true));
    let mut hub = InputHub::new();
    let mut pads = Vec::new();
    for (seat, (name, _)) in roster.characters().take(2).enumerate() {
        let slot = hub.bind(seat as u32);
        world
            .add_player(name, slot.clone())
            .with_context(|| format!("adding player {}", name))?;
        pads.push(spawn_scripted_pad(seat as u32, slot, running.clone()));
    }

    log::info!("{} scripted controllers attached", hub.len());

    let mut time = Time::new();
    time.set_fixed_rate(tick_rate);
    let log_every = tick_rate.round().max(1.0) as u64;
    'session: loop {
        time.update();
        while time.should_fixed_update() {
            world.update();
            if world.tick() % log_every == 0 {
                log::info!(
                    "tick {}: columns {}..{}, {} entities, can leave: {}",
                    world.tick(),
                    world.camera().visible_start(),
                    world.camera().visible_end(),
                    world.entities().len(),
                    world.can_leave()
                );
            }
            if world.all_players_done_or_dead() || world.tick() >= max_ticks {
                break 'session;
            }
        }
        thread::sleep(time.until_next_fixed());
    }

    running.store(false, Ordering::Relaxed);
    for pad in pads {
        if pad.join().is_err() {
            log::warn!("input thread panicked");
        }
    }

    for status in world.player_statuses() {
        log::info!(
            "{}: {} ({:.0} health)",
            status.name,
            if status.alive { "survived" } else { "fell" },
            status.health
        );
    }
    log::info!("Session over after {} ticks, {} sprites in the last frame", world.tick(), world.draw_list().len());
    Ok(())
}
