use crate::error::PoolError;
use crate::pool::LandingPool;
use crate::pool::tests::utils::{add_plane, drain_ids};

#[test]
fn test_emergency_then_fuel_order() {
    let mut pool = LandingPool::new();

    add_plane(&mut pool, 1, 50, 1, true);
    add_plane(&mut pool, 2, 15, 2, false);
    add_plane(&mut pool, 3, 30, 3, true);

    assert_eq!(drain_ids(&mut pool), vec![3, 1, 2]);
    assert!(pool.is_empty());
}

#[test]
fn test_arrival_breaks_ties() {
    let mut pool = LandingPool::new();

    add_plane(&mut pool, 1, 40, 3, false);
    add_plane(&mut pool, 2, 40, 1, false);
    add_plane(&mut pool, 3, 40, 2, false);

    assert_eq!(drain_ids(&mut pool), vec![2, 3, 1]);
}

#[test]
fn test_auto_emergency_lands_before_declared_low_fuel() {
    let mut pool = LandingPool::new();

    add_plane(&mut pool, 1, 12, 1, false);
    add_plane(&mut pool, 2, 9, 2, false);

    assert_eq!(drain_ids(&mut pool), vec![2, 1]);
}

#[test]
fn test_peek_does_not_remove() {
    let mut pool = LandingPool::new();

    add_plane(&mut pool, 1, 70, 1, false);
    add_plane(&mut pool, 2, 20, 2, false);

    assert_eq!(pool.peek_highest().map(|p| p.id().0), Ok(2));
    assert_eq!(pool.peek_highest().map(|p| p.id().0), Ok(2));
    assert_eq!(pool.len(), 2);
}

#[test]
fn test_empty_pool_is_checked() {
    let mut pool = LandingPool::new();

    assert_eq!(pool.extract_highest(), Err(PoolError::Empty));
    assert_eq!(pool.extract_highest(), Err(PoolError::Empty));
    assert_eq!(pool.peek_highest(), Err(PoolError::Empty));
    assert_eq!(pool.len(), 0);
    assert_eq!(pool.capacity(), LandingPool::DEFAULT_CAPACITY);
}

#[test]
fn test_last_extract_empties_pool() {
    let mut pool = LandingPool::new();

    add_plane(&mut pool, 1, 70, 1, false);
    assert!(!pool.is_empty());

    assert_eq!(pool.extract_highest().map(|p| p.id().0), Ok(1));
    assert!(pool.is_empty());
    assert_eq!(pool.extract_highest(), Err(PoolError::Empty));
}

#[test]
fn test_capacity_doubles_past_initial() {
    let mut pool = LandingPool::new();

    for i in 1..=10u32 {
        add_plane(&mut pool, i, 50, u64::from(i), false);
    }
    assert_eq!(pool.capacity(), 10);

    add_plane(&mut pool, 11, 50, 11, false);
    assert_eq!(pool.capacity(), 20);

    for i in 12..=25u32 {
        add_plane(&mut pool, i, 50, u64::from(i), false);
    }
    assert_eq!(pool.capacity(), 40);
    assert_eq!(pool.len(), 25);

    drain_ids(&mut pool);
    assert_eq!(pool.capacity(), 40);
}

#[test]
fn test_capacity_growth_keeps_order() {
    let mut pool = LandingPool::with_capacity(2);

    for i in 1..=9u32 {
        add_plane(&mut pool, i, 100 - i64::from(i), u64::from(i), false);
    }

    assert_eq!(pool.capacity(), 16);
    assert_eq!(drain_ids(&mut pool), (1..=9).rev().collect::<Vec<_>>());
}

#[test]
fn test_zero_capacity_is_clamped() {
    let mut pool = LandingPool::with_capacity(0);
    assert_eq!(pool.capacity(), 1);

    add_plane(&mut pool, 1, 50, 1, false);
    add_plane(&mut pool, 2, 50, 2, false);
    assert_eq!(pool.capacity(), 2);
}
