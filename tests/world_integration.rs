//! World integration tests
//!
//! Subsystem cadences, deferred capacity snapshots and change notifications
//! as seen by UI/AI collaborators.

use std::cell::RefCell;
use std::rc::Rc;

use arc_anatomy::body::TemplateRegistry;
use arc_anatomy::capacity::CapacityInfo;
use arc_anatomy::core::SimulationConfig;
use arc_anatomy::health::{Damage, DamageType};
use arc_anatomy::scheduler::Scheduled;
use arc_anatomy::simulation::{BodyDamaged, CapacityChanged, PartHpChanged, World};

fn world_with(config: SimulationConfig) -> World {
    World::new(config, TemplateRegistry::with_defaults().unwrap()).unwrap()
}

#[test]
fn test_half_second_subsystem_runs_once_per_five_tenth_ticks() {
    let config = SimulationConfig {
        capacity_update_interval: 0.5,
        ..SimulationConfig::default()
    };
    let mut world = world_with(config);

    let runs: Vec<usize> = (0..100)
        .filter(|_| world.tick(0.1).capacity_updated)
        .collect();

    assert!(runs.len() >= 16 && runs.len() <= 20, "ran {} times", runs.len());
    for pair in runs.windows(2) {
        let gap = pair[1] - pair[0];
        assert!((4..=6).contains(&gap), "gap of {gap} ticks");
    }
}

#[test]
fn test_queue_drains_in_arrival_order_exactly_once() {
    let mut scheduled = Scheduled::new(0.5);
    let mut seen = Vec::new();

    for i in 0..30 {
        scheduled.push(i);
        if let Some(batch) = scheduled.tick(0.1) {
            seen.extend(batch.events);
        }
    }
    if let Some(batch) = scheduled.tick(1.0) {
        seen.extend(batch.events);
    }

    assert_eq!(seen, (0..30).collect::<Vec<_>>());
}

#[test]
fn test_part_events_precede_aggregate_event() {
    let mut world = world_with(SimulationConfig::default());
    let id = world.spawn("humanoid", "Aldric").unwrap();
    let log: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));

    let part_log = Rc::clone(&log);
    world.events.hp_changed.subscribe(move |e: &PartHpChanged| {
        part_log.borrow_mut().push(format!("part:{}", e.change.part_name));
        Ok(true)
    });
    let body_log = Rc::clone(&log);
    world.events.body_damaged.subscribe(move |e: &BodyDamaged| {
        body_log
            .borrow_mut()
            .push(format!("body:{}", e.event.parts.len()));
        Ok(true)
    });

    let event = world
        .damage(id, &Damage::new(DamageType::Piercing, 20.0, 0.5, 0.3))
        .unwrap();

    let log = log.borrow();
    assert_eq!(log.len(), event.parts.len() + 1);
    assert_eq!(log[0], "part:Torso");
    assert_eq!(log.last().unwrap(), &format!("body:{}", event.parts.len()));
}

/// Stand-in for a UI panel that may be closed at any time
#[derive(Default)]
struct CapacityPanel {
    movement: f32,
    updates: usize,
}

#[test]
fn test_closed_view_is_delisted_without_blocking_others() {
    let mut world = world_with(SimulationConfig::default());
    let id = world.spawn("quadruped", "Fang").unwrap();

    let open = Rc::new(RefCell::new(CapacityPanel::default()));
    let closed = Rc::new(RefCell::new(CapacityPanel::default()));
    for panel in [&closed, &open] {
        world
            .events
            .capacity_changed
            .subscribe_weak(panel, |panel: &mut CapacityPanel, e: &CapacityChanged| {
                panel.movement = e.current.movement;
                panel.updates += 1;
                true
            });
    }
    drop(closed);

    world
        .damage(id, &Damage::new(DamageType::Blunt, 500.0, 1.0, 1.0))
        .unwrap();
    world.tick(0.5);

    assert_eq!(open.borrow().updates, 1);
    assert_eq!(open.borrow().movement, 0.0);
    assert_eq!(world.events.capacity_changed.len(), 1);
}

#[test]
fn test_modifier_and_damage_combine_on_next_capacity_update() {
    let mut world = world_with(SimulationConfig::default());
    let id = world.spawn("humanoid", "Aldric").unwrap();

    world
        .add_modifier(id, CapacityInfo::splat(0.5), true, 10.0)
        .unwrap();
    assert_eq!(world.current_capacities(id).unwrap(), CapacityInfo::baseline());

    world.tick(0.5);
    let halved = world.current_capacities(id).unwrap();
    assert!((halved.movement - 0.5).abs() < 1e-5);
    assert!((halved.cognition - 0.5).abs() < 1e-5);
}

#[test]
fn test_natural_healing_restores_health_over_time() {
    let mut world = world_with(SimulationConfig::default());
    let id = world.spawn("humanoid", "Aldric").unwrap();

    world
        .damage(id, &Damage::new(DamageType::Blunt, 20.0, 0.0, 0.0))
        .unwrap();
    let wounded = world.creature(id).unwrap().body().overall_health();

    // Humanoid heals every 5s
    for _ in 0..60 {
        world.tick(0.25);
    }

    let healed = world.creature(id).unwrap().body().overall_health();
    assert!(healed > wounded, "{healed} <= {wounded}");
}
