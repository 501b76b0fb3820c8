//! Headless acquisition demo
//!
//! Builds a small two-vessel world, hands a few crew agents get-item
//! objectives with different policies, and runs the simulation until they
//! finish. Run with RUST_LOG=tidehold=debug to watch the decisions.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use tidehold::acquire::{
    AcquireContext, DirectNavigator, GetItemObjective, GetItemPolicy, ObjectiveStatus, OrderKind,
    SpeechLog,
};
use tidehold::core::types::{EquipSlot, Ident, Team};
use tidehold::entity::agent::Agent;
use tidehold::world::{OpenWater, World};

const PREFABS: &str = r#"[
    {
        "identifier": "wrench",
        "tags": ["tool", "mechanical"],
        "price": 80,
        "preferred_slot": "RightHand",
        "components": [
            {"type": "pickable"},
            {"type": "melee_weapon", "combat_rating": 0.0, "lethal_damage": 15.0}
        ]
    },
    {
        "identifier": "crowbar",
        "tags": ["tool", "weapon"],
        "price": 120,
        "preferred_slot": "RightHand",
        "components": [
            {"type": "pickable"},
            {"type": "melee_weapon", "combat_rating": 40.0, "lethal_damage": 30.0}
        ]
    },
    {
        "identifier": "harpoongun",
        "tags": ["weapon", "ranged"],
        "price": 400,
        "preferred_slot": "RightHand",
        "components": [
            {"type": "pickable"},
            {"type": "ranged_weapon", "combat_rating": 75.0, "lethal_damage": 60.0, "loaded": true}
        ]
    },
    {
        "identifier": "divingmask",
        "tags": ["diving"],
        "price": 60,
        "preferred_slot": "Head",
        "components": [{"type": "pickable"}]
    },
    {
        "identifier": "weldingfuel",
        "tags": ["fuel"],
        "price": 40,
        "max_stack": 4,
        "components": [{"type": "pickable"}]
    },
    {
        "identifier": "cabinet",
        "can_buy": false,
        "components": [{"type": "storage", "slots": 8}]
    },
    {
        "identifier": "toolbox",
        "price": 150,
        "components": [
            {"type": "pickable"},
            {"type": "storage", "slots": 4}
        ]
    }
]"#;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    tracing::info!("Starting Tidehold headless acquisition demo");

    let mut world = World::new();
    let loaded = world
        .prefabs
        .load_from_json(PREFABS)
        .expect("prefab catalog should parse");
    tracing::info!("Loaded {loaded} prefabs");

    let sub = world.add_vessel("Typhon", Team::Crew);
    let outpost = world.add_vessel("Kasse Station", Team::OutpostNpc);
    world.link_vessels(sub, outpost);
    if let Some(vessel) = world.vessels.get_mut(&outpost) {
        vessel.is_outpost = true;
    }
    let sub_hull = world.add_hull(sub);
    let outpost_hull = world.add_hull(outpost);

    // Scatter loose tools around the sub, deterministic per seed
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let wrench = world.prefabs.id_by_identifier(&Ident::new("wrench")).unwrap();
    let crowbar = world.prefabs.id_by_identifier(&Ident::new("crowbar")).unwrap();
    let harpoon = world
        .prefabs
        .id_by_identifier(&Ident::new("harpoongun"))
        .unwrap();
    let mask = world
        .prefabs
        .id_by_identifier(&Ident::new("divingmask"))
        .unwrap();
    let cabinet = world.prefabs.id_by_identifier(&Ident::new("cabinet")).unwrap();
    let toolbox = world.prefabs.id_by_identifier(&Ident::new("toolbox")).unwrap();

    for _ in 0..4 {
        let x = rng.gen_range(-2000.0f32..2000.0);
        world.spawn_loose(wrench, sub, Vec2::new(x, 0.0)).unwrap();
    }
    world
        .spawn_loose(crowbar, sub, Vec2::new(600.0, 0.0))
        .unwrap();
    world
        .spawn_loose(harpoon, sub, Vec2::new(-1500.0, 200.0))
        .unwrap();

    // A mask buried two containers deep
    let locker = world
        .spawn_loose(cabinet, sub, Vec2::new(900.0, 0.0))
        .unwrap();
    let kit = world.spawn_in_container(toolbox, locker).unwrap();
    world.spawn_in_container(mask, kit).unwrap();

    // Outpost stock the crew must not steal
    let shelf = world
        .spawn_loose(cabinet, outpost, Vec2::new(5000.0, 0.0))
        .unwrap();
    for _ in 0..2 {
        let id = world.spawn_in_container(wrench, shelf).unwrap();
        if let Some(item) = world.items.get_mut(id) {
            item.spawned_in_outpost = true;
        }
    }

    // Crew with different errands
    let mechanic = world.add_agent(
        Agent::new("Hekter", Team::Crew).aboard(sub, sub_hull, Vec2::new(0.0, 0.0)),
    );
    let guard = world.add_agent(
        Agent::new("Mara", Team::Crew).aboard(sub, sub_hull, Vec2::new(-200.0, 0.0)),
    );
    let diver = world.add_agent(
        Agent::new("Juno", Team::Crew).aboard(sub, sub_hull, Vec2::new(400.0, 0.0)),
    );
    let clerk = world.add_agent(
        Agent::new("Vess", Team::OutpostNpc).aboard(outpost, outpost_hull, Vec2::new(5200.0, 0.0)),
    );

    let mut objectives = vec![
        (
            "mechanic: two wrenches",
            GetItemObjective::for_tags(mechanic, &[Ident::new("wrench")], GetItemPolicy::default())
                .with_item_count(2),
        ),
        (
            "guard: best weapon",
            GetItemObjective::for_tags(
                guard,
                &[Ident::new("weapon")],
                GetItemPolicy {
                    combat_priority: true,
                    speak_on_failure: true,
                    ..GetItemPolicy::default()
                },
            ),
        ),
        (
            "diver: mask on head",
            GetItemObjective::for_tags(
                diver,
                &[Ident::new("divingmask")],
                GetItemPolicy {
                    wear: true,
                    equip_slot: Some(EquipSlot::Head),
                    ..GetItemPolicy::default()
                },
            ),
        ),
        (
            "clerk: fuel from thin air",
            GetItemObjective::for_tags(
                clerk,
                &[Ident::new("weldingfuel")],
                GetItemPolicy {
                    spawn_if_not_found: true,
                    ..GetItemPolicy::default()
                },
            ),
        ),
    ];

    let mut nav = DirectNavigator::new(150.0);
    let mut speech = SpeechLog::new();
    let paths = OpenWater;
    let mut statuses = vec![ObjectiveStatus::InProgress; objectives.len()];

    for tick in 0..600u64 {
        for (index, (label, objective)) in objectives.iter_mut().enumerate() {
            if statuses[index] != ObjectiveStatus::InProgress {
                continue;
            }
            let mut ctx = AcquireContext {
                nav: &mut nav,
                paths: &paths,
                speech: &mut speech,
                priority: 45.0,
                active_order: OrderKind::None,
                is_current_order: true,
            };
            let status = objective.tick(&mut world, &mut ctx);
            if status != ObjectiveStatus::InProgress {
                tracing::info!(tick, label = %label, ?status, "objective finished");
                statuses[index] = status;
            }
        }
        nav.update(&mut world);
        world.tick();
        if statuses.iter().all(|s| *s != ObjectiveStatus::InProgress) {
            break;
        }
    }

    for ((label, objective), status) in objectives.iter().zip(&statuses) {
        let done = objective.is_completed(&world);
        println!("{label}: {status:?} (completion check: {done})");
    }
    for line in &speech.lines {
        println!("[t{}] {:?} says '{}'", line.tick, line.agent, line.utterance);
    }
}
