//! Sensor sample source
//!
//! A `SensorSnapshot` is the structured reading set the classifier consumes
//! on each ingestion cycle. The production source is a simulator; a real
//! deployment swaps in a hardware-backed `SensorSource`.

use chrono::{Datelike, Local, Timelike};
use rand::Rng;

/// One tick's worth of home-sensor readings.
#[derive(Debug, Clone)]
pub struct SensorSnapshot {
    pub hour_of_day: u8,
    /// Monday = 0 .. Sunday = 6
    pub weekday: u8,

    // Passive-infrared motion counts per room
    pub pir_kitchen: u8,
    pub pir_living_room: u8,
    pub pir_bedroom: u8,
    pub pir_bathroom: u8,
    pub pir_hallway: u8,

    pub bed_pressure: bool,
    pub bed_minutes: u8,
    pub chair_minutes: u8,

    pub fridge_opened: bool,
    pub oven_opened: bool,
    pub front_door_open: bool,

    pub shower_minutes: u8,
    pub toilet_minutes: u8,
    pub sink_minutes: u8,

    pub fall_detected: bool,
}

impl SensorSnapshot {
    /// Total motion activity across all rooms.
    pub fn motion_total(&self) -> u16 {
        self.pir_kitchen as u16
            + self.pir_living_room as u16
            + self.pir_bedroom as u16
            + self.pir_bathroom as u16
            + self.pir_hallway as u16
    }
}

/// Source of sensor snapshots, one per ingestion cycle.
pub trait SensorSource: Send + Sync {
    fn sample(&self) -> SensorSnapshot;
}

/// Randomized stand-in for a real sensor network.
#[derive(Debug, Default)]
pub struct SimulatedSensors;

impl SimulatedSensors {
    pub fn new() -> Self {
        SimulatedSensors
    }
}

impl SensorSource for SimulatedSensors {
    fn sample(&self) -> SensorSnapshot {
        let now = Local::now();
        let mut rng = rand::thread_rng();

        SensorSnapshot {
            hour_of_day: now.hour() as u8,
            weekday: now.weekday().num_days_from_monday() as u8,

            pir_kitchen: rng.gen_range(0..=15),
            pir_living_room: rng.gen_range(0..=10),
            pir_bedroom: rng.gen_range(0..=10),
            pir_bathroom: rng.gen_range(0..=10),
            pir_hallway: rng.gen_range(0..=15),

            bed_pressure: rng.gen_bool(0.5),
            bed_minutes: rng.gen_range(0..=15),
            chair_minutes: rng.gen_range(0..=15),

            fridge_opened: rng.gen_bool(0.5),
            oven_opened: rng.gen_bool(0.5),
            front_door_open: rng.gen_bool(0.5),

            shower_minutes: rng.gen_range(0..=15),
            toilet_minutes: rng.gen_range(0..=15),
            sink_minutes: rng.gen_range(0..=10),

            // Falls are rare: one draw in four
            fall_detected: rng.gen_ratio(1, 4),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulated_ranges() {
        let sensors = SimulatedSensors::new();
        for _ in 0..100 {
            let s = sensors.sample();
            assert!(s.hour_of_day < 24);
            assert!(s.weekday < 7);
            assert!(s.pir_kitchen <= 15);
            assert!(s.pir_living_room <= 10);
            assert!(s.shower_minutes <= 15);
            assert!(s.sink_minutes <= 10);
        }
    }

    #[test]
    fn test_motion_total_sums_all_rooms() {
        let mut s = SimulatedSensors::new().sample();
        s.pir_kitchen = 1;
        s.pir_living_room = 2;
        s.pir_bedroom = 3;
        s.pir_bathroom = 4;
        s.pir_hallway = 5;
        assert_eq!(s.motion_total(), 15);
    }
}
