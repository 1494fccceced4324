use approx::assert_relative_eq;
use celestial_impulse::{
    fracture::{fragment_outline, random_outline},
    utils::signed_area,
    *,
};
use rand::{rngs::StdRng, SeedableRng};

fn assert_tiles(polygon: &ConvexPolygon) {
    let fragments = fragment_outline(polygon);
    assert!(!fragments.is_empty());
    assert!(fragments.iter().all(|f| signed_area(&f.vertices) > 0.0));
    let total: f64 = fragments.iter().map(|f| f.area).sum();
    assert_relative_eq!(total, polygon.area(), max_relative = 1e-9);
}

#[test]
fn fragments_cover_regular_and_irregular_outlines() {
    for sides in 3..=12 {
        let polygon = ConvexPolygon::regular(sides, 100.0).expect("valid polygon");
        assert_tiles(&polygon);
    }

    let (skewed, _) = ConvexPolygon::from_points(vec![
        DVec2::new(0.0, 0.0),
        DVec2::new(300.0, 10.0),
        DVec2::new(320.0, 40.0),
        DVec2::new(20.0, 60.0),
    ])
    .expect("valid quad");
    assert_tiles(&skewed);
}

#[test]
fn fragments_cover_random_outlines() {
    let config = WorldConfig::default();
    for seed in 0..32 {
        let mut rng = StdRng::seed_from_u64(seed);
        let outline = random_outline(
            &mut rng,
            80.0,
            config.random_vertex_range,
            config.random_angle_variation,
        );
        let (polygon, _) = ConvexPolygon::from_points(outline).expect("convex outline");
        assert_tiles(&polygon);
    }
}

fn square(half: f64) -> Vec<DVec2> {
    vec![
        DVec2::new(-half, -half),
        DVec2::new(half, -half),
        DVec2::new(half, half),
        DVec2::new(-half, half),
    ]
}

#[test]
fn hard_impact_shatters_a_large_asteroid() {
    let mut world = PhysicsWorld::new(WorldConfig::without_gravity());
    let rock = world
        .add_asteroid(square(100.0), BodyParams::at(DVec2::ZERO).mass(40.0))
        .expect("valid asteroid");
    let moon = world
        .add_moon(
            10.0,
            None,
            BodyParams::at(DVec2::new(108.0, 0.0))
                .mass(100.0)
                .velocity(DVec2::new(-50.0, 0.0)),
        )
        .expect("valid moon");

    let report = world.step();
    assert_eq!(report.shattered, 1);
    assert_eq!(report.spawned, 2);
    assert_eq!(report.removed, 1);
    assert!(world.body(rock).is_none());
    assert!(world.body(moon).is_some());

    let fragments: Vec<&Body> = world
        .bodies()
        .values()
        .filter(|body| body.kind == BodyKind::Asteroid)
        .collect();
    assert_eq!(fragments.len(), 2);
    let mass: f64 = fragments.iter().map(|body| body.mass()).sum();
    assert_relative_eq!(mass, 40.0, max_relative = 1e-9);
    assert!(fragments.iter().all(|body| body.age == 0));
}

#[test]
fn small_asteroids_survive_any_impact() {
    let mut world = PhysicsWorld::new(WorldConfig::without_gravity());
    let pebble = world
        .add_asteroid(square(20.0), BodyParams::at(DVec2::ZERO).mass(1.0))
        .expect("valid asteroid");
    world
        .add_moon(
            10.0,
            None,
            BodyParams::at(DVec2::new(28.0, 0.0))
                .mass(100.0)
                .velocity(DVec2::new(-50.0, 0.0)),
        )
        .expect("valid moon");

    let report = world.step();
    assert_eq!(report.shattered, 0);
    assert!(world.body(pebble).is_some());
}

#[test]
fn struck_planet_becomes_an_asteroid() {
    let mut world = PhysicsWorld::new(WorldConfig::without_gravity());
    let planet = world
        .add_planet(
            20.0,
            1_000,
            None,
            BodyParams::at(DVec2::ZERO).named("Crumbly").mass(10.0),
        )
        .expect("valid planet");
    world
        .add_moon(
            10.0,
            None,
            BodyParams::at(DVec2::new(28.0, 0.0))
                .mass(100.0)
                .velocity(DVec2::new(-50.0, 0.0)),
        )
        .expect("valid moon");

    let report = world.step();
    assert_eq!(report.transformed, 1);
    assert_eq!(report.spawned, 1);
    assert!(world.body(planet).is_none());
    assert!(world.find_by_name("Crumbly").is_none());

    let rubble: Vec<&Body> = world
        .bodies()
        .values()
        .filter(|body| body.kind == BodyKind::Asteroid)
        .collect();
    assert_eq!(rubble.len(), 1);
    assert_relative_eq!(rubble[0].mass(), 10.0);
}

#[test]
fn gentle_contact_leaves_planets_whole() {
    let mut world = PhysicsWorld::new(WorldConfig::without_gravity());
    let planet = world
        .add_planet(20.0, 5, None, BodyParams::at(DVec2::ZERO).mass(10.0))
        .expect("valid planet");
    world
        .add_moon(10.0, None, BodyParams::at(DVec2::new(29.5, 0.0)).mass(1.0))
        .expect("valid moon");

    let report = world.step();
    assert_eq!(report.transformed, 0);
    assert!(world.body(planet).is_some());
}
