use crate::error::{InputError, PoolError};
use crate::plane::{Plane, PlaneId, PlaneRecord};
use tracing::{debug, info};


/// Planes waiting for the runway, kept as a binary max-heap over landing priority.
///
/// The tree lives in a flat vector: children of `i` sit at `2i + 1` and `2i + 2`,
/// the parent at `(i - 1) / 2`. `capacity` is the logical size of the pool and only
/// ever doubles.
#[derive(Debug, Clone)]
pub struct LandingPool {
    planes: Vec<Plane>,
    capacity: usize,
}

impl Default for LandingPool {
    fn default() -> Self {
        LandingPool::new()
    }
}

impl LandingPool {
    pub const DEFAULT_CAPACITY: usize = 10;

    pub fn new() -> LandingPool {
        LandingPool::with_capacity(Self::DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> LandingPool {
        let capacity = capacity.max(1);
        LandingPool {
            planes: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.planes.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_empty(&self) -> bool {
        self.planes.is_empty()
    }

    /// Planes in storage order, which is heap order rather than landing order.
    pub fn iter(&self) -> impl Iterator<Item = &Plane> {
        self.planes.iter()
    }

    pub fn insert(&mut self, plane: Plane) {
        if self.planes.len() >= self.capacity {
            self.grow_to_fit(self.planes.len() + 1);
        }
        debug!(plane = %plane.id(), "admitting plane");
        self.planes.push(plane);
        self.sift_up(self.planes.len() - 1);
        debug_assert!(self.is_heap());
    }

    pub fn peek_highest(&self) -> Result<&Plane, PoolError> {
        self.planes.first().ok_or(PoolError::Empty)
    }

    pub fn extract_highest(&mut self) -> Result<Plane, PoolError> {
        if self.planes.is_empty() {
            return Err(PoolError::Empty);
        }
        let top = self.planes.swap_remove(0);
        if !self.planes.is_empty() {
            self.sift_down(0);
        }
        debug_assert!(self.is_heap());
        Ok(top)
    }

    /// Marks a plane's clearance as canceled. Priority does not depend on the flag,
    /// so the plane keeps its slot.
    pub fn cancel(&mut self, id: PlaneId) -> Result<&Plane, PoolError> {
        let plane = self
            .planes
            .iter_mut()
            .find(|p| p.id() == id)
            .ok_or(PoolError::NotFound(id))?;
        plane.cancel();
        Ok(plane)
    }

    /// Re-establishes the heap invariant over every plane, bottom-up.
    pub fn rebuild(&mut self) {
        for index in (0..self.planes.len() / 2).rev() {
            self.sift_down(index);
        }
        debug_assert!(self.is_heap());
    }

    pub fn snapshot(&self) -> Vec<PlaneRecord> {
        self.planes.iter().map(Plane::to_record).collect()
    }

    /// Replaces the pool contents with `records` in the given order. The result is not
    /// heap-ordered until [`LandingPool::rebuild`] runs. On error the pool is unchanged.
    pub fn restore(&mut self, records: &[PlaneRecord]) -> Result<(), InputError> {
        let planes = records
            .iter()
            .map(Plane::from_record)
            .collect::<Result<Vec<_>, _>>()?;
        let needed = planes.len();
        self.planes = planes;
        if needed > self.capacity {
            self.grow_to_fit(needed);
        }
        Ok(())
    }

    pub fn is_heap(&self) -> bool {
        (1..self.planes.len()).all(|i| !self.planes[i].outranks(&self.planes[(i - 1) / 2]))
    }

    fn grow_to_fit(&mut self, needed: usize) {
        let old = self.capacity;
        while self.capacity < needed {
            self.capacity *= 2;
        }
        self.planes.reserve_exact(self.capacity - self.planes.len());
        info!(from = old, to = self.capacity, "landing pool resized");
    }

    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = (index - 1) / 2;
            if self.planes[index].outranks(&self.planes[parent]) {
                self.planes.swap(index, parent);
                index = parent;
            } else {
                break;
            }
        }
    }

    fn sift_down(&mut self, mut index: usize) {
        let len = self.planes.len();
        loop {
            let left = 2 * index + 1;
            let right = left + 1;
            let mut highest = index;

            if left < len && self.planes[left].outranks(&self.planes[highest]) {
                highest = left;
            }
            if right < len && self.planes[right].outranks(&self.planes[highest]) {
                highest = right;
            }
            if highest == index {
                break;
            }
            self.planes.swap(index, highest);
            index = highest;
        }
    }
}
