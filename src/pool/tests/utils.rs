use crate::plane::{FuelLevel, Plane, PlaneId, PlaneRecord};
use crate::pool::LandingPool;
use crate::time::Tick;
use proptest::prelude::{Strategy, any};

pub fn plane(id: u32, fuel: i64, arrival: u64, emergency: bool) -> Plane {
    Plane::new(
        PlaneId(id),
        FuelLevel::new(fuel).unwrap(),
        Tick(arrival),
        emergency,
    )
}

pub fn add_plane(pool: &mut LandingPool, id: u32, fuel: i64, arrival: u64, emergency: bool) {
    pool.insert(plane(id, fuel, arrival, emergency));
}

pub fn drain_ids(pool: &mut LandingPool) -> Vec<u32> {
    let mut ids = vec![];
    while let Ok(p) = pool.extract_highest() {
        ids.push(p.id().0);
    }
    ids
}

pub fn sorted(mut records: Vec<PlaneRecord>) -> Vec<PlaneRecord> {
    records.sort_by_key(|r| r.id);
    records
}

/// Planes with unique ids and arrival times, as the session hands them out.
pub fn arb_planes(max: usize) -> impl Strategy<Value = Vec<Plane>> {
    proptest::collection::vec((0..=100i64, any::<bool>()), 0..max).prop_map(|specs| {
        specs
            .into_iter()
            .enumerate()
            .map(|(i, (fuel, emergency))| plane(i as u32 + 1, fuel, i as u64 + 1, emergency))
            .collect()
    })
}
