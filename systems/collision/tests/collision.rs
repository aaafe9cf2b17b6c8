use droids_core::{Spot, WreckSet};
use droids_system_collision::resolve;
use droids_system_movement::advance_enemies;

#[test]
fn stacked_enemies_become_a_wreck() {
    let moved = [Spot::new(4, 4), Spot::new(4, 4), Spot::new(1, 1)];
    let resolution = resolve(&moved, &WreckSet::new());

    assert_eq!(resolution.destroyed, 2);
    assert_eq!(resolution.survivors, vec![Spot::new(1, 1)]);
    assert!(resolution.wrecks.contains(Spot::new(4, 4)));
    assert_eq!(resolution.wrecks.len(), 1);
    assert_eq!(resolution.sites, vec![Spot::new(4, 4)]);
}

#[test]
fn every_enemy_in_a_pileup_counts() {
    let moved = [Spot::new(2, 2), Spot::new(2, 2), Spot::new(2, 2)];
    let resolution = resolve(&moved, &WreckSet::new());

    assert_eq!(resolution.destroyed, 3);
    assert!(resolution.survivors.is_empty());
    assert_eq!(resolution.wrecks.len(), 1);
}

#[test]
fn lone_enemy_entering_a_wreck_is_destroyed() {
    let wrecks: WreckSet = [Spot::new(0, 3)].into_iter().collect();
    let moved = [Spot::new(0, 3), Spot::new(5, 5)];
    let resolution = resolve(&moved, &wrecks);

    assert_eq!(resolution.destroyed, 1);
    assert_eq!(resolution.survivors, vec![Spot::new(5, 5)]);
    assert_eq!(resolution.wrecks, wrecks);
}

#[test]
fn resolution_leaves_existing_wrecks_untouched() {
    let wrecks: WreckSet = [Spot::new(9, 9)].into_iter().collect();
    let snapshot = wrecks.clone();
    let resolution = resolve(&[Spot::new(1, 1), Spot::new(1, 1)], &wrecks);

    assert_eq!(wrecks, snapshot);
    assert!(snapshot.iter().all(|spot| resolution.wrecks.contains(spot)));
    assert!(resolution.wrecks.contains(Spot::new(1, 1)));
}

#[test]
fn resolution_is_independent_of_enemy_order() {
    let wrecks: WreckSet = [Spot::new(3, 3)].into_iter().collect();
    let moved = [
        Spot::new(1, 1),
        Spot::new(3, 3),
        Spot::new(1, 1),
        Spot::new(6, 2),
        Spot::new(0, 4),
    ];
    let mut reversed = moved;
    reversed.reverse();

    let forward = resolve(&moved, &wrecks);
    let backward = resolve(&reversed, &wrecks);

    assert_eq!(forward.destroyed, backward.destroyed);
    assert_eq!(forward.wrecks, backward.wrecks);
    let mut a = forward.survivors.clone();
    let mut b = backward.survivors.clone();
    a.sort();
    b.sort();
    assert_eq!(a, b);
}

#[test]
fn converging_chasers_collide_after_one_step() {
    let player = Spot::new(2, 1);
    let moved = advance_enemies(player, &[Spot::new(1, 3), Spot::new(3, 3)]);
    assert_eq!(moved, vec![Spot::new(2, 2), Spot::new(2, 2)]);

    let resolution = resolve(&moved, &WreckSet::new());
    assert_eq!(resolution.destroyed, 2);
    assert!(resolution.survivors.is_empty());
}

#[test]
fn empty_input_resolves_to_nothing() {
    let resolution = resolve(&[], &WreckSet::new());
    assert_eq!(resolution.destroyed, 0);
    assert!(resolution.survivors.is_empty());
    assert!(resolution.wrecks.is_empty());
}
