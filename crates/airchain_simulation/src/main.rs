//! Headless симуляция AIRCHAIN
//!
//! Прогоняет dash → air bounce → air bounce → landing для нескольких акторов
//! и печатает диагностику. Направления dash'ей берутся из DeterministicRng.

use std::time::Duration;

use airchain_simulation::{
    create_headless_app, log_info, Actor, AirBounceCounter, BounceExecuted, BounceRequested, CaptureVelocity,
    DeterministicRng, GroundContactChanged, MomentumDiagnostics, MomentumPlugin, MotionBody, MotionSource,
    SnapshotStore,
};
use bevy::ecs::event::Events;
use bevy::prelude::*;
use rand::Rng;

const ACTORS: usize = 3;
const DASH_SPEED: f32 = 600.0;

fn main() {
    let seed = 42;
    println!("Starting AIRCHAIN headless simulation (seed: {})", seed);

    let mut app = create_headless_app(seed);
    app.add_plugins(MomentumPlugin);

    let actors: Vec<Entity> = (0..ACTORS).map(|_| app.world_mut().spawn(Actor).id()).collect();

    // Tick 0: takeoff + dash
    for &entity in &actors {
        let angle = app
            .world_mut()
            .resource_mut::<DeterministicRng>()
            .rng
            .gen_range(0.0..std::f32::consts::TAU);
        let dash = Vec3::new(angle.cos(), angle.sin(), 0.0) * DASH_SPEED;

        if let Some(mut body) = app.world_mut().get_mut::<MotionBody>(entity) {
            body.velocity = dash;
        }
        app.world_mut().send_event(GroundContactChanged { entity, grounded: false });
        app.world_mut().send_event(CaptureVelocity::new(entity, dash, MotionSource::Dash));
    }
    step(&mut app, Duration::ZERO);

    // Bounce внутри validity window, второй: уже после (без momentum)
    for delay in [Duration::from_millis(100), Duration::from_millis(250)] {
        for &entity in &actors {
            start_falling(&mut app, entity);
            app.world_mut().send_event(BounceRequested { entity });
        }
        step(&mut app, delay);
    }

    // Третий bounce: сверх лимита
    for &entity in &actors {
        start_falling(&mut app, entity);
        app.world_mut().send_event(BounceRequested { entity });
    }
    step(&mut app, Duration::from_millis(100));

    let events = app.world().resource::<Events<BounceExecuted>>();
    let mut cursor = events.get_cursor();
    for executed in cursor.read(events) {
        log_info(&format!(
            "{:?}: {:?} bounce → {:?} (air {}, momentum {:?})",
            executed.entity, executed.kind, executed.velocity, executed.air_bounces, executed.momentum_source
        ));
    }

    for &entity in &actors {
        app.world_mut().send_event(GroundContactChanged { entity, grounded: true });
    }
    step(&mut app, Duration::from_millis(500));

    let now = app.world().resource::<Time<Fixed>>().elapsed_secs_f64();
    for &entity in &actors {
        let world = app.world();
        let (Some(counter), Some(store)) = (world.get::<AirBounceCounter>(entity), world.get::<SnapshotStore>(entity))
        else {
            continue;
        };
        println!("{:?}: {}", entity, MomentumDiagnostics::read(counter, store, now).summary());
    }

    if let Some(store) = actors.first().and_then(|&entity| app.world().get::<SnapshotStore>(entity)) {
        store.log_contents(now);
    }

    println!("Simulation complete!");
}

/// Гравитация живёт у movement collaborator'а, здесь просто переводим актора в падение
fn start_falling(app: &mut App, entity: Entity) {
    if let Some(mut body) = app.world_mut().get_mut::<MotionBody>(entity) {
        body.velocity.z = -120.0;
    }
}

/// Сдвинуть fixed clock на `delta` и выполнить один FixedUpdate
fn step(app: &mut App, delta: Duration) {
    app.world_mut().resource_mut::<Time<Fixed>>().advance_by(delta);
    app.world_mut().run_schedule(FixedUpdate);
}
