use approx::assert_relative_eq;
use phys_streaming::bodies::{physics_channel, Body, BodyMotion, LoadState, Pose, TransformDirection};
use phys_streaming::core::{GeometryConfig, StreamingConfig};
use phys_streaming::error::StreamingError;
use phys_streaming::math::{Orientation, Vector3};
use phys_streaming::{Notification, Outbox, World, WorldBorder};
use std::sync::Arc;
use std::thread;

const PIVOT: Vector3 = Vector3::new(0.5, 0.5, 0.5);

#[test]
fn test_new_world_is_empty() {
    let world = World::new(WorldBorder::default()).unwrap();
    assert_eq!(world.body_count(), 0);
    assert!(world.observers().is_empty());
    assert_eq!(world.tick_count(), 0);
    assert_eq!(world.border().max_x, 29_999_984.0);
}

#[test]
fn test_tick_without_observers_leaves_bodies_unloaded() {
    let mut world = World::new(WorldBorder::default()).unwrap();
    let body = world.add_body(BodyMotion::default(), PIVOT, vec![[0, 0, 0], [1, 0, 0]]);
    let mut outbox = Outbox::new();

    world.tick(&mut outbox).unwrap();
    world.tick(&mut outbox).unwrap();

    assert_eq!(world.body(body).unwrap().load_state(), LoadState::Unloaded);
    assert!(outbox.is_empty());
    assert_eq!(world.tick_count(), 2);
}

#[test]
fn test_oversized_body_aborts_tick() {
    let mut world = World::new(WorldBorder::default()).unwrap();
    world.add_body(
        BodyMotion::default(),
        PIVOT,
        vec![[0, 0, 0], [2_000_000, 2_000_000, 2_000_000]],
    );
    world.add_observer(Vector3::ZERO);
    let mut outbox = Outbox::new();

    let err = world.tick(&mut outbox).unwrap_err();
    assert!(matches!(err, StreamingError::GeometryInvariantViolation { .. }));
    assert!(err.is_fatal());
    assert_eq!(world.tick_count(), 0);
}

#[test]
fn test_loaded_body_is_clamped_inside_border() {
    let mut world = World::new(WorldBorder::centered(100.0)).unwrap();
    let motion = BodyMotion::new(Vector3::new(99.0, 10.0, 0.0), Orientation::default());
    let body = world.add_body(motion, PIVOT, vec![[0, 0, 0]]);
    world.add_observer(Vector3::new(99.0, 0.0, 0.0));
    let mut outbox = Outbox::new();

    world.tick(&mut outbox).unwrap();
    let body = world.body(body).unwrap();
    assert_eq!(body.load_state(), LoadState::Loaded);
    assert_relative_eq!(body.motion().position.x, 97.0, epsilon = 1e-9);
    assert_relative_eq!(body.transform().position().x, 97.0, epsilon = 1e-9);
    assert_relative_eq!(body.transform().bounding_box().max.x, 100.0, epsilon = 1e-9);
    assert_relative_eq!(body.motion().position.y, 10.0);
}

#[test]
fn test_body_motion_applies_on_next_tick() {
    let mut world = World::new(WorldBorder::default()).unwrap();
    let body = world.add_body(BodyMotion::default(), PIVOT, vec![[0, 0, 0]]);
    world.add_observer(Vector3::ZERO);
    let mut outbox = Outbox::new();
    world.tick(&mut outbox).unwrap();

    let moved = BodyMotion::new(Vector3::new(4.0, 0.0, 0.0), Orientation::new(0.0, 90.0, 0.0));
    world.set_body_motion(body, moved).unwrap();
    assert_eq!(world.body(body).unwrap().transform().position(), Vector3::ZERO);

    world.tick(&mut outbox).unwrap();
    let transform = world.body(body).unwrap().transform();
    assert_eq!(transform.position(), Vector3::new(4.0, 0.0, 0.0));
    assert!(Arc::ptr_eq(transform.prev_tick(), transform.current_tick()));
    assert_relative_eq!(transform.normals()[3], Vector3::new(0.0, 0.0, -1.0), epsilon = 1e-12);
    assert!(Arc::ptr_eq(transform.current_physics(), transform.current_tick()));
}

#[test]
fn test_physics_source_feeds_body_poses() {
    let mut world = World::new(WorldBorder::default()).unwrap();
    let (writer, reader) = physics_channel();
    let body = Body::new(BodyMotion::default(), PIVOT, vec![[0, 0, 0]], GeometryConfig::default())
        .with_physics_source(reader);
    let body = world.insert_body(body);
    world.add_observer(Vector3::ZERO);
    let mut outbox = Outbox::new();
    world.tick(&mut outbox).unwrap();

    thread::spawn(move || {
        writer.publish(Pose::new(Vector3::new(0.0, 1.0, 0.0), Orientation::default(), PIVOT));
        writer.publish(Pose::new(Vector3::new(0.0, 2.0, 0.0), Orientation::default(), PIVOT));
    })
    .join()
    .unwrap();

    world.tick(&mut outbox).unwrap();
    let transform = world.body(body).unwrap().transform();
    assert_eq!(transform.current_physics().position(), Vector3::new(0.0, 2.0, 0.0));
    assert_eq!(transform.prev_physics().position(), Vector3::new(0.0, 1.0, 0.0));
    assert_eq!(transform.current_tick().position(), Vector3::ZERO);

    // The box follows the physics pose, not the tick pose.
    assert_relative_eq!(transform.bounding_box().center().y, 2.0, epsilon = 1e-9);
}

#[test]
fn test_remote_world_keeps_bounding_boxes() {
    let config = StreamingConfig {
        is_remote: true,
        ..StreamingConfig::default()
    };
    let mut world = World::with_config(WorldBorder::default(), config).unwrap();
    let body = world.add_body(BodyMotion::default(), PIVOT, vec![[0, 0, 0], [8, 8, 8]]);
    world.add_observer(Vector3::ZERO);
    let mut outbox = Outbox::new();
    world.tick(&mut outbox).unwrap();

    let transform = world.body(body).unwrap().transform();
    assert!(transform.is_remote());
    assert_eq!(transform.bounding_box().extents(), Vector3::ZERO);
}

#[test]
fn test_unknown_handles_are_reported() {
    let mut world = World::new(WorldBorder::default()).unwrap();
    let body = world.add_body(BodyMotion::default(), PIVOT, vec![[0, 0, 0]]);
    let observer = world.add_observer(Vector3::ZERO);

    assert!(world.disconnect_observer(observer));
    assert!(!world.disconnect_observer(observer));
    assert!(matches!(
        world.move_observer(observer, Vector3::ZERO),
        Err(StreamingError::ResourceNotFound(_))
    ));

    world.remove_body(body).unwrap();
    assert!(world.body(body).is_err());
    assert!(world.set_body_motion(body, BodyMotion::default()).is_err());
}

#[test]
fn test_physics_backlog_is_dropped_when_body_loads() {
    let mut world = World::new(WorldBorder::default()).unwrap();
    let (writer, reader) = physics_channel();
    let body = Body::new(BodyMotion::default(), PIVOT, vec![[0, 0, 0]], GeometryConfig::default())
        .with_physics_source(reader);
    let body = world.insert_body(body);
    let mut outbox = Outbox::new();

    let integrator = thread::spawn(move || {
        for step in 0..10_000 {
            let x = 5_000.0 + step as f64;
            writer.publish(Pose::new(Vector3::new(x, 0.0, 0.0), Orientation::default(), PIVOT));
        }
        writer
    });
    let writer = integrator.join().unwrap();

    world.add_observer(Vector3::ZERO);
    world.tick(&mut outbox).unwrap();
    {
        let transform = world.body(body).unwrap().transform();
        assert_eq!(transform.current_physics().position(), Vector3::ZERO);
        assert_eq!(transform.prev_physics().position(), Vector3::ZERO);
        assert_relative_eq!(transform.bounding_box().max.x, 3.0, epsilon = 1e-9);
    }

    world.tick(&mut outbox).unwrap();
    let body_ref = world.body(body).unwrap();
    assert_eq!(body_ref.motion().position, Vector3::ZERO);
    assert_eq!(body_ref.transform().current_tick().position(), Vector3::ZERO);

    // Poses published once resident are applied again.
    writer.publish(Pose::new(Vector3::new(0.0, 1.0, 0.0), Orientation::default(), PIVOT));
    world.tick(&mut outbox).unwrap();
    let transform = world.body(body).unwrap().transform();
    assert_eq!(transform.current_physics().position(), Vector3::new(0.0, 1.0, 0.0));
}

#[test]
fn test_unloaded_body_drops_published_poses_each_tick() {
    let mut world = World::new(WorldBorder::default()).unwrap();
    let (writer, reader) = physics_channel();
    let body = Body::new(BodyMotion::default(), PIVOT, vec![[0, 0, 0]], GeometryConfig::default())
        .with_physics_source(reader);
    let body = world.insert_body(body);
    let mut outbox = Outbox::new();

    writer.publish(Pose::new(Vector3::new(900.0, 0.0, 0.0), Orientation::default(), PIVOT));
    world.tick(&mut outbox).unwrap();
    assert_eq!(world.body(body).unwrap().load_state(), LoadState::Unloaded);

    world.add_observer(Vector3::ZERO);
    world.tick(&mut outbox).unwrap();
    let transform = world.body(body).unwrap().transform();
    assert_eq!(transform.current_physics().position(), Vector3::ZERO);
}

#[test]
fn test_first_spawn_pose_is_already_inside_border() {
    let mut world = World::new(WorldBorder::centered(100.0)).unwrap();
    let motion = BodyMotion::new(Vector3::new(99.0, 0.0, 0.0), Orientation::default());
    let body = world.add_body(motion, PIVOT, vec![[0, 0, 0]]);
    let observer = world.add_observer(Vector3::new(99.0, 0.0, 0.0));
    let mut outbox = Outbox::new();

    world.tick(&mut outbox).unwrap();

    let spawns = outbox.of_kind(observer, "spawn");
    assert_eq!(spawns.len(), 1);
    let Notification::Spawn { body: spawned, pose, .. } = spawns[0] else {
        panic!("expected spawn, got {:?}", spawns[0]);
    };
    assert_eq!(*spawned, body);
    assert_relative_eq!(pose.position().x, 97.0, epsilon = 1e-9);

    // The grown box around the cell ends exactly at the border.
    let cell_center = pose.transform_point(Vector3::new(0.5, 0.5, 0.5), TransformDirection::LocalToWorld);
    assert!(cell_center.x + 3.0 <= 100.0 + 1e-9);
}
