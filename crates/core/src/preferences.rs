//! User preference profiles.
//!
//! Every field is optional. A missing field leaves the rules of its family
//! inert; an unrecognized value is a parse error. Fields without a rule
//! family (trip duration, crowd tolerance, climate) are carried for
//! renderers and future rules.
//!
//! Values are snake_case. The PascalCase spellings used by older
//! questionnaires (`LovesLocalCuisine`, `HighSafety`, ...) are accepted as
//! aliases.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ProfileError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl Season {
    pub const ALL: [Season; 4] = [
        Season::Spring,
        Season::Summer,
        Season::Autumn,
        Season::Winter,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Autumn => "autumn",
            Season::Winter => "winter",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Budget {
    Low,
    Medium,
    High,
}

/// Experience categories a traveller can like.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Experience {
    NatureScenery,
    CultureHistory,
    CityLife,
    Shopping,
    Adventure,
}

impl Experience {
    pub const ALL: [Experience; 5] = [
        Experience::NatureScenery,
        Experience::CultureHistory,
        Experience::CityLife,
        Experience::Shopping,
        Experience::Adventure,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transport {
    PublicTransport,
    Walking,
    CarTaxi,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrafficPreference {
    LowTraffic,
    MidTraffic,
    HighTraffic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FoodPreference {
    #[serde(alias = "LovesLocalCuisine")]
    LovesLocalCuisine,
    #[serde(alias = "PrefersFamiliarFood")]
    PrefersFamiliarFood,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SafetyPriority {
    #[serde(alias = "HighSafety")]
    HighSafety,
    #[serde(alias = "MediumSafety")]
    MediumSafety,
    #[serde(alias = "LowSafetyConcern")]
    LowSafetyConcern,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Companions {
    Solo,
    Dual,
    Family,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TripDuration {
    Short,
    Medium,
    Long,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrowdTolerance {
    LikesLively,
    PrefersQuiet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Climate {
    Cool,
    Mild,
    Warm,
}

/// A traveller's stated preferences. Immutable input to an inference run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPreferences {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<Budget>,
    #[serde(
        default,
        alias = "prefers_season",
        skip_serializing_if = "Option::is_none"
    )]
    pub preferred_season: Option<Season>,
    #[serde(default)]
    pub likes: Vec<Experience>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transport: Option<Transport>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub traffic_preference: Option<TrafficPreference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub food_preference: Option<FoodPreference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub safety_priority: Option<SafetyPriority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub companions: Option<Companions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trip_duration: Option<TripDuration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crowd_tolerance: Option<CrowdTolerance>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub climate_preference: Option<Climate>,
}

impl UserPreferences {
    pub fn from_toml_str(text: &str) -> Result<Self, ProfileError> {
        Ok(toml::from_str(text)?)
    }

    pub fn from_json_str(text: &str) -> Result<Self, ProfileError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn likes(&self, experience: Experience) -> bool {
        self.likes.contains(&experience)
    }
}
