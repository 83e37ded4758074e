use crate::error::InputError;
use crate::time::Tick;
use serde::{Deserialize, Serialize};
use std::cmp::{Ordering, Reverse};
use std::fmt;
use std::fmt::Formatter;
use std::str::FromStr;
use tabled::Tabled;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlaneId(pub u32);

impl fmt::Display for PlaneId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PlaneId {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u32>()
            .map(PlaneId)
            .map_err(|_| InputError::NotANumber(s.trim().to_string()))
    }
}

/// Remaining fuel as a percentage, always within `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FuelLevel(u8);

impl FuelLevel {
    pub const MAX: u8 = 100;
    /// Planes below this level are emergencies no matter what the pilot declared.
    pub const EMERGENCY_THRESHOLD: u8 = 10;

    pub fn new(value: i64) -> Result<FuelLevel, InputError> {
        u8::try_from(value)
            .ok()
            .filter(|v| *v <= Self::MAX)
            .map(FuelLevel)
            .ok_or(InputError::FuelOutOfRange(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn is_critical(self) -> bool {
        self.0 < Self::EMERGENCY_THRESHOLD
    }
}

impl fmt::Display for FuelLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for FuelLevel {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        let value = raw
            .parse::<i64>()
            .map_err(|_| InputError::NotANumber(raw.to_string()))?;
        FuelLevel::new(value)
    }
}

/// Landing precedence. A greater `Priority` lands first: emergencies, then lower fuel,
/// then earlier arrival.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Priority {
    emergency: bool,
    fuel_level: Reverse<FuelLevel>,
    arrival_time: Reverse<Tick>,
}

#[derive(Debug, Clone, PartialEq, Eq, Tabled)]
pub struct Plane {
    #[tabled(rename = "ID")]
    id: PlaneId,
    #[tabled(rename = "Fuel")]
    fuel_level: FuelLevel,
    #[tabled(rename = "Arrival")]
    arrival_time: Tick,
    #[tabled(rename = "Emergency")]
    emergency: bool,
    #[tabled(rename = "Canceled")]
    canceled: bool,
}

impl Plane {
    pub fn new(id: PlaneId, fuel_level: FuelLevel, arrival_time: Tick, emergency: bool) -> Plane {
        Plane {
            id,
            fuel_level,
            arrival_time,
            emergency: emergency || fuel_level.is_critical(),
            canceled: false,
        }
    }

    /// Rebuilds a plane exactly as it was persisted, without re-applying the fuel rule.
    pub fn from_record(record: &PlaneRecord) -> Result<Plane, InputError> {
        Ok(Plane {
            id: PlaneId(record.id),
            fuel_level: FuelLevel::new(i64::from(record.fuel_level))?,
            arrival_time: Tick(record.arrival_time),
            emergency: record.emergency,
            canceled: record.canceled,
        })
    }

    pub fn to_record(&self) -> PlaneRecord {
        PlaneRecord {
            id: self.id.0,
            fuel_level: self.fuel_level.value(),
            arrival_time: self.arrival_time.0,
            emergency: self.emergency,
            canceled: self.canceled,
        }
    }

    pub fn id(&self) -> PlaneId {
        self.id
    }

    pub fn fuel_level(&self) -> FuelLevel {
        self.fuel_level
    }

    pub fn arrival_time(&self) -> Tick {
        self.arrival_time
    }

    pub fn is_emergency(&self) -> bool {
        self.emergency
    }

    pub fn is_canceled(&self) -> bool {
        self.canceled
    }

    pub(crate) fn cancel(&mut self) {
        self.canceled = true;
    }

    pub fn priority(&self) -> Priority {
        Priority {
            emergency: self.emergency,
            fuel_level: Reverse(self.fuel_level),
            arrival_time: Reverse(self.arrival_time),
        }
    }

    pub fn outranks(&self, other: &Plane) -> bool {
        self.priority().cmp(&other.priority()) == Ordering::Greater
    }
}

impl fmt::Display for Plane {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "plane {} (fuel {}, arrival {}{}{})",
            self.id,
            self.fuel_level,
            self.arrival_time,
            if self.emergency { ", EMERGENCY" } else { "" },
            if self.canceled { ", canceled" } else { "" },
        )
    }
}

/// Flat form of a plane as exchanged with the queue file and the action log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlaneRecord {
    pub id: u32,
    pub fuel_level: u8,
    pub arrival_time: u64,
    pub emergency: bool,
    pub canceled: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plane(id: u32, fuel: i64, arrival: u64, emergency: bool) -> Plane {
        Plane::new(PlaneId(id), FuelLevel::new(fuel).unwrap(), Tick(arrival), emergency)
    }

    #[test]
    fn test_low_fuel_forces_emergency() {
        assert!(plane(1, 9, 1, false).is_emergency());
        assert!(plane(2, 0, 1, false).is_emergency());
    }

    #[test]
    fn test_threshold_fuel_respects_flag() {
        assert!(!plane(1, 10, 1, false).is_emergency());
        assert!(plane(2, 10, 1, true).is_emergency());
    }

    #[test]
    fn test_fuel_range() {
        assert_eq!(FuelLevel::new(-1), Err(InputError::FuelOutOfRange(-1)));
        assert_eq!(FuelLevel::new(101), Err(InputError::FuelOutOfRange(101)));
        assert_eq!(FuelLevel::new(100).map(FuelLevel::value), Ok(100));
        assert_eq!(FuelLevel::new(0).map(FuelLevel::value), Ok(0));
    }

    #[test]
    fn test_fuel_parse() {
        assert_eq!(" 55 ".parse::<FuelLevel>().map(FuelLevel::value), Ok(55));
        assert_eq!("abc".parse::<FuelLevel>(), Err(InputError::NotANumber("abc".to_string())));
        assert_eq!("250".parse::<FuelLevel>(), Err(InputError::FuelOutOfRange(250)));
    }

    #[test]
    fn test_plane_id_parse() {
        assert_eq!(" 12 ".parse::<PlaneId>(), Ok(PlaneId(12)));
        assert_eq!("twelve".parse::<PlaneId>(), Err(InputError::NotANumber("twelve".to_string())));
    }

    #[test]
    fn test_emergency_beats_fuel() {
        let a = plane(1, 50, 1, true);
        let b = plane(2, 11, 2, false);
        assert!(a.outranks(&b));
        assert!(!b.outranks(&a));
    }

    #[test]
    fn test_lower_fuel_then_earlier_arrival() {
        let low = plane(1, 20, 5, false);
        let high = plane(2, 30, 1, false);
        assert!(low.outranks(&high));

        let early = plane(3, 30, 1, false);
        let late = plane(4, 30, 2, false);
        assert!(early.outranks(&late));
        assert!(!early.outranks(&early.clone()));
    }

    #[test]
    fn test_cancel_touches_only_flag() {
        let mut p = plane(7, 40, 3, false);
        let before = p.to_record();
        p.cancel();
        let after = p.to_record();
        assert!(after.canceled);
        assert_eq!(PlaneRecord { canceled: false, ..after }, before);
    }

    #[test]
    fn test_record_keeps_stored_emergency() {
        let record = PlaneRecord { id: 3, fuel_level: 5, arrival_time: 9, emergency: false, canceled: true };
        let p = Plane::from_record(&record).unwrap();
        assert!(!p.is_emergency());
        assert_eq!(p.to_record(), record);
    }

    #[test]
    fn test_record_rejects_fuel_over_range() {
        let record = PlaneRecord { id: 3, fuel_level: 101, arrival_time: 9, emergency: false, canceled: false };
        assert_eq!(Plane::from_record(&record), Err(InputError::FuelOutOfRange(101)));
    }
}
