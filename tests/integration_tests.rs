use approx::assert_relative_eq;
use celestial_impulse::*;

fn quiet_world() -> PhysicsWorld {
    PhysicsWorld::new(WorldConfig::without_gravity())
}

#[test]
fn bodies_leaving_the_world_are_removed_at_cleanup() {
    let mut world = quiet_world();
    let runaway = world
        .add_moon(
            1.0,
            None,
            BodyParams::at(DVec2::new(9_999.5, 0.0)).velocity(DVec2::new(1.0, 0.0)),
        )
        .expect("valid moon");
    let stay = world
        .add_moon(1.0, None, BodyParams::at(DVec2::ZERO))
        .expect("valid moon");

    let report = world.step();
    assert_eq!(report.escaped, 1);
    assert_eq!(report.removed, 1);
    assert!(world.body(runaway).is_none());
    assert!(world.body(stay).is_some());
}

#[test]
fn elastic_head_on_bounce_conserves_closing_speed() {
    let mut world = quiet_world();
    let params = BodyParams::default().material(Material::elastic());
    let a = world
        .add_moon(
            10.0,
            None,
            params.clone().velocity(DVec2::new(1.0, 0.0)),
        )
        .expect("valid moon");
    let b = world
        .add_moon(
            10.0,
            None,
            BodyParams {
                position: DVec2::new(19.95, 0.0),
                ..params
            }
            .velocity(DVec2::new(-1.0, 0.0)),
        )
        .expect("valid moon");

    let report = world.step();
    assert_eq!(report.contacts, 1);

    let va = world.body(a).expect("live").velocity;
    let vb = world.body(b).expect("live").velocity;
    assert_relative_eq!(vb.x - va.x, 2.0, epsilon = 1e-6);
    assert_relative_eq!(va.x, -1.0, epsilon = 1e-6);
}

#[test]
fn static_bodies_ignore_impacts() {
    let mut world = quiet_world();
    let anchor = world
        .add_moon(10.0, None, BodyParams::at(DVec2::ZERO).mass(5.0).fixed())
        .expect("valid moon");
    world
        .add_moon(
            10.0,
            None,
            BodyParams::at(DVec2::new(19.0, 0.0)).velocity(DVec2::new(-5.0, 0.0)),
        )
        .expect("valid moon");

    world.step();
    let body = world.body(anchor).expect("live");
    assert_eq!(body.velocity, DVec2::ZERO);
    assert_eq!(body.angular_velocity, 0.0);
    assert_eq!(body.position, DVec2::ZERO);
}

#[test]
fn long_contact_merges_into_one_planet() {
    let config = WorldConfig {
        merge_duration: 2,
        ..WorldConfig::without_gravity()
    };
    let mut world = PhysicsWorld::new(config);
    let a = world
        .add_moon(10.0, None, BodyParams::at(DVec2::ZERO).mass(2.0))
        .expect("valid moon");
    let b = world
        .add_moon(10.0, None, BodyParams::at(DVec2::new(15.0, 0.0)).mass(3.0))
        .expect("valid moon");

    assert_eq!(world.step().merged, 0);
    assert_eq!(world.contact_duration(a, b), 1);
    assert_eq!(world.step().merged, 0);
    assert_eq!(world.contact_duration(a, b), 2);

    let report = world.step();
    assert_eq!(report.merged, 1);
    assert_eq!(report.removed, 2);
    assert_eq!(report.spawned, 1);
    assert!(world.body(a).is_none());
    assert!(world.body(b).is_none());
    assert_eq!(world.len(), 1);

    let merged = world.bodies().values().next().expect("merged body");
    assert_eq!(merged.mass(), 5.0);
    assert_eq!(
        merged.kind,
        BodyKind::Planet {
            population: 0,
            orbit: None
        }
    );
    assert_eq!(merged.age, 0);
}

#[test]
fn separated_pairs_lose_their_contact_history() {
    let mut world = quiet_world();
    let a = world
        .add_moon(10.0, None, BodyParams::at(DVec2::ZERO))
        .expect("valid moon");
    let b = world
        .add_moon(
            10.0,
            None,
            BodyParams::at(DVec2::new(19.0, 0.0)).velocity(DVec2::new(30.0, 0.0)),
        )
        .expect("valid moon");

    world.step();
    assert_eq!(world.contact_duration(a, b), 1);
    world.step();
    assert_eq!(world.contact_duration(a, b), 0);
}

#[test]
fn heavier_star_absorbs_lighter_star_once() {
    let mut world = quiet_world();
    let light = world
        .add_star(10.0, BodyParams::at(DVec2::ZERO).mass(4.0))
        .expect("valid star");
    let heavy = world
        .add_star(10.0, BodyParams::at(DVec2::new(15.0, 0.0)).mass(6.0))
        .expect("valid star");

    let report = world.step();
    assert_eq!(report.absorbed, 1);
    assert!(world.body(light).is_none());
    assert_eq!(world.body(heavy).expect("survivor").mass(), 10.0);
}

#[test]
fn stars_swallow_other_bodies() {
    let mut world = quiet_world();
    let star = world
        .add_star(10.0, BodyParams::at(DVec2::ZERO).mass(10.0))
        .expect("valid star");
    let moon = world
        .add_moon(5.0, None, BodyParams::at(DVec2::new(12.0, 0.0)).mass(1.0))
        .expect("valid moon");

    world.step();
    assert!(world.body(moon).is_none());
    assert_eq!(world.body(star).expect("star").mass(), 11.0);
}

#[test]
fn gravity_pulls_bodies_together() {
    let mut world = PhysicsWorld::default();
    let a = world
        .add_moon(1.0, None, BodyParams::at(DVec2::ZERO).mass(100.0))
        .expect("valid moon");
    let b = world
        .add_moon(1.0, None, BodyParams::at(DVec2::new(100.0, 0.0)).mass(100.0))
        .expect("valid moon");

    world.step();
    let va = world.body(a).expect("live").velocity;
    let vb = world.body(b).expect("live").velocity;
    assert!(va.x > 0.0);
    assert!(vb.x < 0.0);
    assert_relative_eq!(va.x, -vb.x, epsilon = 1e-12);
}

#[test]
fn ages_advance_once_per_tick() {
    let mut world = quiet_world();
    let id = world
        .add_planet(5.0, 10, None, BodyParams::default().age(3))
        .expect("valid planet");
    for _ in 0..4 {
        world.step();
    }
    assert_eq!(world.body(id).expect("live").age, 7);
}

#[test]
fn sequential_and_parallel_detection_agree() {
    let build = |parallel: bool| {
        let mut world = quiet_world();
        world.set_parallel_detection(parallel);
        for i in 0..6 {
            let x = i as f64 * 15.0;
            world
                .add_moon(8.0, None, BodyParams::at(DVec2::new(x, 0.0)))
                .expect("valid moon");
            world
                .add_default_asteroid(BodyParams::at(DVec2::new(x * 10.0, 300.0)))
                .expect("valid asteroid");
        }
        world
    };

    let mut sequential = build(false);
    let mut parallel = build(true);
    assert_eq!(sequential.collect_contacts(), parallel.collect_contacts());
}

#[test]
fn engine_wrapper_runs_ticks() {
    let mut engine = SimulationEngine::new(WorldConfig::without_gravity());
    let id = engine
        .spawn(BodyBlueprint::moon(
            1.0,
            None,
            BodyParams::default().velocity(DVec2::new(1.0, 0.0)),
        ))
        .expect("valid moon");
    let last = engine.run(5).expect("ran ticks");
    assert_eq!(last.tick, 4);
    assert_relative_eq!(engine.body(id).expect("live").position.x, 5.0);
}

#[test]
fn profiler_tracks_the_last_tick() {
    let mut world = quiet_world();
    for i in 0..3 {
        world
            .add_moon(10.0, None, BodyParams::at(DVec2::new(i as f64 * 15.0, 0.0)))
            .expect("valid moon");
    }
    world.step();

    let profiler = *world.profiler();
    assert_eq!(profiler.body_count, 3);
    assert_eq!(profiler.contact_count, 2);
    assert!(profiler.total_tick_time >= profiler.detect_time);
    let phases: std::time::Duration = TickPhase::ALL
        .iter()
        .map(|&phase| profiler.phase_time(phase))
        .sum();
    assert!(phases <= profiler.total_tick_time);
    profiler.report();

    let mut cleared = profiler;
    cleared.reset();
    assert_eq!(cleared.body_count, 0);
}

#[test]
fn both_bodies_of_a_hard_impact_react() {
    let mut world = quiet_world();
    let rock = world
        .add_asteroid(
            vec![
                DVec2::new(-100.0, -100.0),
                DVec2::new(100.0, -100.0),
                DVec2::new(100.0, 100.0),
                DVec2::new(-100.0, 100.0),
            ],
            BodyParams::at(DVec2::ZERO).mass(40.0),
        )
        .expect("valid asteroid");
    let planet = world
        .add_planet(
            20.0,
            500,
            None,
            BodyParams::at(DVec2::new(118.0, 0.0))
                .mass(1.256)
                .velocity(DVec2::new(-100.0, 0.0)),
        )
        .expect("valid planet");

    let report = world.step();
    assert_eq!(report.contacts, 1);
    assert_eq!(report.shattered, 1);
    assert_eq!(report.transformed, 1);
    assert_eq!(report.removed, 2);
    assert_eq!(report.spawned, 3);
    assert!(world.body(rock).is_none());
    assert!(world.body(planet).is_none());
    assert!(world
        .bodies()
        .values()
        .all(|body| body.kind == BodyKind::Asteroid));
}

#[test]
fn touching_stars_merge_mass_once_in_either_order() {
    for (first_mass, second_mass) in [(4.0, 6.0), (6.0, 4.0)] {
        let mut world = quiet_world();
        world
            .add_star(10.0, BodyParams::at(DVec2::ZERO).mass(first_mass))
            .expect("valid star");
        world
            .add_star(10.0, BodyParams::at(DVec2::new(15.0, 0.0)).mass(second_mass))
            .expect("valid star");

        let report = world.step();
        assert_eq!(report.absorbed, 1);
        assert_eq!(report.removed, 1);
        assert_eq!(world.len(), 1);
        let survivor = world.bodies().values().next().expect("survivor");
        assert_eq!(survivor.mass(), 10.0);
    }
}
