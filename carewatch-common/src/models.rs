//! Domain models for CareWatch
//!
//! Row structs for the four persistent record types, the status enums that
//! drive their state machines, and the activity categorizer that splits
//! predicted labels into normal and abnormal.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The fixed set of normal activity labels a classifier may produce.
///
/// These double as the only valid categories for manually entered
/// activities.
pub const NORMAL_ACTIVITIES: [&str; 13] = [
    "Sommeil_nocturne",
    "Sieste_diurne",
    "Repos_passif",
    "Preparation_repas",
    "Prise_repas",
    "Collation",
    "Prise_medicaments",
    "Utilisation_toilettes",
    "Douche",
    "Loisir_sedentaires",
    "Deplacement_interne",
    "Sortie_domicile",
    "Retour_domicile",
];

/// The fixed set of abnormal activity labels. Disjoint from the normal set.
pub const ABNORMAL_ACTIVITIES: [&str; 6] = [
    "Immobilite_prolongee",
    "Deplacement_inhabituel",
    "Sommeil_anormal",
    "Oubli_repas",
    "Chute",
    "Toilette_anormale",
];

/// Category assigned to a predicted activity label.
///
/// Serializes with the dashboard's wire spelling: "normal" / "anormal".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "normal")]
    Normal,
    #[serde(rename = "anormal")]
    Abnormal,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Normal => "normal",
            Category::Abnormal => "anormal",
        }
    }
}

/// Categorize a predicted activity label.
///
/// Labels outside both fixed sets categorize as Normal: an unknown label
/// never raises a false alarm. The cost is that it never raises a true one
/// either; callers must not rely on this path for alerting.
pub fn categorize_activity(label: &str) -> Category {
    if ABNORMAL_ACTIVITIES.contains(&label) {
        Category::Abnormal
    } else {
        Category::Normal
    }
}

/// Priority assigned to a stored anomaly: High when the label denotes a
/// fall, Medium otherwise.
pub fn anomaly_priority(label: &str) -> AnomalyPriority {
    if label.to_lowercase().contains("chute") {
        AnomalyPriority::High
    } else {
        AnomalyPriority::Medium
    }
}

/// How an activity record entered the system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(rename_all = "UPPERCASE")]
pub enum ActivitySource {
    /// Entered by the monitored subject through the activities endpoint
    Manual,
    /// Produced by an ingestion loop cycle
    Predicted,
}

/// Stored anomaly priority (distinct from the stream payload's High/Low)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum AnomalyPriority {
    High,
    Medium,
}

/// Anomaly lifecycle: active until explicitly acknowledged, then seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum AnomalyStatus {
    Active,
    Seen,
}

/// Medication intake lifecycle. TO_TAKE may move to either terminal state;
/// TAKEN and MISSED never reverse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IntakeStatus {
    ToTake,
    Taken,
    Missed,
}

/// A single tracked activity, manual or predicted. Immutable once written.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ActivityRecord {
    pub id: String,
    /// Time of day the activity occurred, "HH:MM"
    pub time: String,
    pub date: NaiveDate,
    /// One of the normal activity labels
    pub category: String,
    pub source: ActivitySource,
    pub created_at: String,
    /// Subject (dependent) the record belongs to
    pub created_by: i64,
}

/// An abnormal-activity alert produced by the ingestion loop.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AnomalyRecord {
    pub id: String,
    pub activity_name: String,
    pub time: String,
    pub date: NaiveDate,
    pub priority: AnomalyPriority,
    pub status: AnomalyStatus,
    pub subject_id: i64,
}

/// A scheduled medication intake for a dependent.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct MedicationIntake {
    pub id: i64,
    pub medication_name: String,
    pub dosage: Option<String>,
    pub intake_date: NaiveDate,
    /// Scheduled time of day, "HH:MM"
    pub intake_time: String,
    pub status: IntakeStatus,
    pub dependent_id: i64,
    pub created_at: String,
}

/// Caregiver-to-dependent link. The pair is unique; a dependent may have
/// several caregivers.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Association {
    pub caregiver_id: i64,
    pub dependent_id: i64,
    pub assigned_at: String,
}

/// Self-reported wellbeing of a dependent at check-in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HealthStatusType {
    Well,
    Tired,
    Sick,
    Pain,
    AtHome,
}

/// One health-status check-in entered by a dependent.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct HealthStatusLog {
    pub id: i64,
    pub dependent_id: i64,
    pub status_type: HealthStatusType,
    pub created_at: String,
}
