//! End-to-end world scenarios: draw order, mask suppression, camera motion,
//! determinism and configuration errors.

use image::Rgb;
use motionfield_core::prelude::*;
use motionfield_core::raster::{BLACK, WHITE};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const RED: Rgb<u8> = Rgb([220, 0, 0]);
const TEAL: Rgb<u8> = Rgb([0, 128, 128]);
const BG: Rgb<u8> = Rgb([30, 30, 30]);

fn shape(agent: Agent, geometry: Geometry, color: Rgb<u8>, policy: MotionPolicy) -> Shape {
    Shape::new(agent, geometry, Paint::Flat(color), policy)
}

fn drifting(x: i64, y: i64) -> Agent {
    Agent::new(Vec2::new(x, y), Vec2::new(0, 1), Vec2::ZERO)
}

fn world_with(shapes: Vec<Shape>, size: (u32, u32), view: (u32, u32)) -> World {
    World::new(WorldConfig {
        size: Dimensions::new(size.0, size.1),
        view_size: Dimensions::new(view.0, view.1),
        population: Population::Explicit(shapes),
        background: BackgroundSpec::Solid(BG),
        seed: Some(0),
        ..Default::default()
    })
    .unwrap()
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn static_circle_gives_all_zero_maps() {
    let mut world = world_with(
        vec![shape(
            Agent::at(5, 5),
            Geometry::Circle { radius: 2 },
            RED,
            MotionPolicy::Static,
        )],
        (10, 10),
        (6, 6),
    );
    for _ in 0..10 {
        let map = world.draw_motion_map(2, 2);
        assert_eq!(map.as_slice(), &[0, 0, 0, 0]);
        world.update();
    }
}

#[test]
fn still_rectangle_covers_moving_circle() {
    let mut world = world_with(
        vec![
            shape(
                Agent::at(20, 20),
                Geometry::Rectangle {
                    height: 5,
                    width: 5,
                },
                TEAL,
                MotionPolicy::Static,
            ),
            shape(
                drifting(20, 20),
                Geometry::Circle { radius: 4 },
                RED,
                MotionPolicy::Free,
            ),
        ],
        (40, 40),
        (20, 20),
    );
    // View top-left is (10, 10).
    let frame = world.draw();
    assert_eq!(*frame.get_pixel(10, 10), TEAL);
    assert_eq!(*frame.get_pixel(10, 6), RED);
    assert_eq!(*frame.get_pixel(0, 0), BG);

    let mask = world.draw_motion_mask();
    assert_eq!(*mask.get_pixel(10, 10), BLACK);
    assert_eq!(*mask.get_pixel(10, 6), WHITE);

    // The circle keeps moving while the rectangle stays put.
    world.update();
    assert_eq!(world.agents()[0].position(), Vec2::new(20, 20));
    assert_ne!(world.agents()[1].agent(), &drifting(20, 20));
}

#[test]
fn pan_moves_frame_contents() {
    let mut world = world_with(
        vec![shape(
            Agent::at(30, 20),
            Geometry::Circle { radius: 1 },
            RED,
            MotionPolicy::Static,
        )],
        (60, 40),
        (20, 20),
    );
    // View starts at (20, 10); the dot sits at frame (10, 10).
    assert_eq!(*world.draw().get_pixel(10, 10), RED);

    world
        .view_mut()
        .pan(1, 4, Axis::Horizontal, QueueMode::Append);
    world.update();
    assert_eq!(world.view().corners().0, Vec2::new(24, 10));
    let frame = world.draw();
    assert_eq!(*frame.get_pixel(6, 10), RED);
    assert_eq!(*frame.get_pixel(10, 10), BG);
}

#[test]
fn moving_agent_leaving_view_clears_map() {
    let mut world = world_with(
        vec![shape(
            Agent::new(Vec2::new(29, 15), Vec2::new(6, 0), Vec2::ZERO),
            Geometry::Circle { radius: 1 },
            RED,
            MotionPolicy::Free,
        )],
        (60, 30),
        (20, 10),
    );
    // View spans x in [20, 40).
    assert_eq!(world.draw_motion_map(1, 4).marked_count(), 1);

    let mut left_view = false;
    for _ in 0..40 {
        world.update();
        let x = world.agents()[0].position().x;
        if !(20..40).contains(&x) {
            assert!(world.draw_motion_map(1, 4).is_empty());
            left_view = true;
        }
    }
    assert!(left_view, "agent never left the view");
}

#[test]
fn seeded_worlds_are_deterministic() {
    let config = WorldConfig {
        size: Dimensions::new(160, 120),
        view_size: Dimensions::new(80, 60),
        population: Population::Auto,
        background: BackgroundSpec::Noise,
        spawn_table: SpawnTable::mixed(),
        all_noise: true,
        seed: Some(1234),
        ..Default::default()
    };
    let mut a = World::new(config.clone()).unwrap();
    let mut b = World::new(config).unwrap();
    a.view_mut().shake(20, 1.1, 9.0, Axis::Vertical, QueueMode::Append);
    b.view_mut().shake(20, 1.1, 9.0, Axis::Vertical, QueueMode::Append);

    for _ in 0..20 {
        assert_eq!(a.draw(), b.draw());
        assert_eq!(a.draw_motion_map(16, 16), b.draw_motion_map(16, 16));
        a.update();
        b.update();
    }
    assert_eq!(a.state_hash(), b.state_hash());
}

#[test]
fn configuration_errors_are_reported() {
    let too_big = World::new(WorldConfig {
        size: Dimensions::new(100, 100),
        view_size: Dimensions::new(100, 50),
        ..Default::default()
    });
    assert!(matches!(too_big, Err(SimError::ViewTooLarge { .. })));

    let off_canvas = World::new(WorldConfig {
        size: Dimensions::new(100, 100),
        view_size: Dimensions::new(10, 10),
        population: Population::Explicit(vec![shape(
            Agent::at(5, -1),
            Geometry::Circle { radius: 2 },
            RED,
            MotionPolicy::Free,
        )]),
        ..Default::default()
    });
    assert!(matches!(
        off_canvas,
        Err(SimError::AgentOutOfBounds { index: 0, y: -1, .. })
    ));

    assert!(matches!(
        "12x".parse::<Dimensions>(),
        Err(SimError::InvalidSize(_))
    ));
}
