use crate::error::{LogError, PoolError, StoreError};
use crate::event_log::{Action, EventLog};
use crate::plane::{FuelLevel, Plane, PlaneId};
use crate::pool::LandingPool;
use crate::store::QueueStore;
use crate::time::Tick;
use tracing::{info, warn};

/// One tower shift: the landing pool plus the id counter, arrival clock and the
/// file collaborators it reports to.
pub struct Session {
    pool: LandingPool,
    /// Wider than `PlaneId` so that "no ids left" is representable.
    next_id: u64,
    clock: Tick,
    store: QueueStore,
    log: EventLog,
    log_failures: Vec<LogError>,
}

impl Session {
    pub fn new(pool: LandingPool, store: QueueStore, log: EventLog) -> Session {
        Session {
            pool,
            next_id: 1,
            clock: Tick::default(),
            store,
            log,
            log_failures: vec![],
        }
    }

    pub fn pool(&self) -> &LandingPool {
        &self.pool
    }

    pub fn store(&self) -> &QueueStore {
        &self.store
    }

    pub fn log(&self) -> &EventLog {
        &self.log
    }

    /// Admits a new plane. Fails with [`PoolError::Exhausted`] once ids or arrival
    /// ticks run out; nothing changes in that case.
    pub fn enqueue(&mut self, fuel_level: FuelLevel, emergency: bool) -> Result<Plane, PoolError> {
        let id = u32::try_from(self.next_id)
            .map(PlaneId)
            .map_err(|_| PoolError::Exhausted)?;
        let arrival = self.clock.next().ok_or(PoolError::Exhausted)?;
        self.next_id += 1;
        self.clock = arrival;

        let plane = Plane::new(id, fuel_level, arrival, emergency);
        info!(
            plane = %plane.id(),
            fuel = %plane.fuel_level(),
            arrival = %plane.arrival_time(),
            emergency = plane.is_emergency(),
            "plane enqueued"
        );
        self.pool.insert(plane.clone());
        self.record(Action::Enqueue, Some(&plane));
        Ok(plane)
    }

    pub fn land(&mut self) -> Result<Plane, PoolError> {
        let plane = self.pool.extract_highest()?;
        info!(plane = %plane.id(), canceled = plane.is_canceled(), "plane cleared for landing");
        self.record(Action::Dequeue, Some(&plane));
        Ok(plane)
    }

    pub fn next_to_land(&self) -> Result<&Plane, PoolError> {
        self.pool.peek_highest()
    }

    pub fn runway_free(&self) -> bool {
        self.pool.is_empty()
    }

    pub fn planes(&self) -> impl Iterator<Item = &Plane> {
        self.pool.iter()
    }

    pub fn cancel(&mut self, id: PlaneId) -> Result<Plane, PoolError> {
        let plane = self.pool.cancel(id)?.clone();
        info!(plane = %id, "landing clearance canceled");
        self.record(Action::CancelLanding, Some(&plane));
        Ok(plane)
    }

    pub fn rebuild(&mut self) {
        self.pool.rebuild();
        self.record(Action::Rebuild, None);
    }

    pub fn save(&mut self) -> Result<usize, StoreError> {
        let records = self.pool.snapshot();
        self.store.save(&records)?;
        self.record(Action::Save, None);
        Ok(records.len())
    }

    /// Replaces the pool with the queue file and re-heapifies it. Ids and arrival
    /// times handed out afterwards continue past the highest loaded values.
    pub fn load(&mut self) -> Result<usize, StoreError> {
        let records = self.store.load()?;
        self.pool.restore(&records)?;
        self.pool.rebuild();

        if let Some(max_id) = records.iter().map(|r| r.id).max() {
            self.next_id = self.next_id.max(u64::from(max_id) + 1);
        }
        if let Some(max_arrival) = records.iter().map(|r| r.arrival_time).max() {
            self.clock = self.clock.max(Tick(max_arrival));
        }
        self.record(Action::Load, None);
        Ok(records.len())
    }

    /// Log write failures since the last call. They never abort the operation that
    /// triggered them.
    pub fn take_log_failures(&mut self) -> Vec<LogError> {
        std::mem::take(&mut self.log_failures)
    }

    fn record(&mut self, action: Action, plane: Option<&Plane>) {
        if let Err(e) = self.log.record(action, plane) {
            warn!(%action, error = %e, "failed to write action log");
            self.log_failures.push(e);
        }
    }
}
