//! Activity classifier
//!
//! Maps one sensor snapshot to one activity label string. The trained model
//! behind this contract lives outside this repository; `HeuristicClassifier`
//! is a deterministic rule-based stand-in honoring the same input/output
//! contract. The classifier is constructed once at startup and injected by
//! reference into every ingestion loop.

use crate::sensors::SensorSnapshot;

/// Snapshot-to-label classification contract.
pub trait ActivityClassifier: Send + Sync {
    fn predict(&self, snapshot: &SensorSnapshot) -> &'static str;
}

/// Rule-based classifier standing in for the trained model.
///
/// Rules are evaluated top-down; the first match wins. Every label it can
/// produce belongs to one of the two fixed label sets.
#[derive(Debug, Default)]
pub struct HeuristicClassifier;

impl HeuristicClassifier {
    pub fn new() -> Self {
        HeuristicClassifier
    }
}

fn is_night(hour: u8) -> bool {
    hour >= 22 || hour < 6
}

impl ActivityClassifier for HeuristicClassifier {
    fn predict(&self, s: &SensorSnapshot) -> &'static str {
        if s.fall_detected {
            return "Chute";
        }

        if s.bed_pressure {
            if is_night(s.hour_of_day) {
                return "Sommeil_nocturne";
            }
            // Long daytime bed occupancy outside nap range
            if s.bed_minutes >= 12 {
                return "Sommeil_anormal";
            }
            if s.bed_minutes >= 5 {
                return "Sieste_diurne";
            }
        }

        if s.oven_opened {
            return "Preparation_repas";
        }
        if s.fridge_opened {
            // Fridge use around mealtimes reads as a meal, otherwise a snack
            return if matches!(s.hour_of_day, 11..=13 | 18..=20) {
                "Prise_repas"
            } else {
                "Collation"
            };
        }
        // Mealtime with no kitchen activity at all
        if matches!(s.hour_of_day, 12 | 19) && s.pir_kitchen == 0 {
            return "Oubli_repas";
        }

        if s.shower_minutes >= 5 {
            return "Douche";
        }
        if s.toilet_minutes >= 10 {
            return "Toilette_anormale";
        }
        if s.toilet_minutes >= 1 || s.sink_minutes >= 1 {
            return "Utilisation_toilettes";
        }

        if s.front_door_open {
            return if s.motion_total() >= 10 {
                "Retour_domicile"
            } else {
                "Sortie_domicile"
            };
        }

        if s.chair_minutes >= 12 && s.motion_total() <= 2 {
            return "Immobilite_prolongee";
        }
        if s.chair_minutes >= 5 {
            return "Loisir_sedentaires";
        }

        if s.motion_total() >= 30 {
            return "Deplacement_inhabituel";
        }
        if s.motion_total() >= 8 {
            return "Deplacement_interne";
        }

        "Repos_passif"
    }
}
