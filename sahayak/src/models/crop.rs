use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

/// Indian agricultural seasons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Season {
    Kharif,
    Rabi,
    Zaid,
}

impl Season {
    pub fn as_str(&self) -> &'static str {
        match self {
            Season::Kharif => "Kharif",
            Season::Rabi => "Rabi",
            Season::Zaid => "Zaid",
        }
    }

    /// Season for a zero-based month index. June through October is
    /// Kharif (checked first, so June resolves to Kharif rather than
    /// Zaid), March through June is Zaid, the rest is Rabi.
    pub fn for_month0(month0: u32) -> Self {
        if (5..=9).contains(&month0) {
            Season::Kharif
        } else if (2..=5).contains(&month0) {
            Season::Zaid
        } else {
            Season::Rabi
        }
    }

    pub fn current(now: DateTime<Utc>) -> Self {
        Self::for_month0(now.month0())
    }

    /// Season in which a crop planted now would be harvested after
    /// `time_range_months` months.
    pub fn harvest(now: DateTime<Utc>, time_range_months: u32) -> Self {
        Self::for_month0((now.month0() + time_range_months) % 12)
    }
}

impl std::fmt::Display for Season {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Climate summary for a region, used to ground crop suggestions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClimateProfile {
    pub description: String,
    pub rainfall: String,
}

struct RegionClimate {
    region: &'static str,
    rainfall: &'static str,
    description: &'static str,
}

const REGION_CLIMATES: &[RegionClimate] = &[
    RegionClimate {
        region: "punjab",
        rainfall: "moderate",
        description: "Punjab has a subtropical climate with hot summers and cool winters. The region receives moderate rainfall during the monsoon season.",
    },
    RegionClimate {
        region: "maharashtra",
        rainfall: "variable",
        description: "Maharashtra has diverse climate zones ranging from tropical wet in the coastal areas to semi-arid in the interior parts.",
    },
    RegionClimate {
        region: "kerala",
        rainfall: "high",
        description: "Kerala has a tropical climate with high rainfall and humidity throughout the year, making it suitable for plantation crops.",
    },
    RegionClimate {
        region: "gujarat",
        rainfall: "low",
        description: "Gujarat has an arid to semi-arid climate with hot summers, mild winters, and low rainfall, suitable for drought-resistant crops.",
    },
    RegionClimate {
        region: "west bengal",
        rainfall: "high",
        description: "West Bengal has a subtropical climate with high humidity and rainfall, making it ideal for rice cultivation.",
    },
];

const DEFAULT_CLIMATE: RegionClimate = RegionClimate {
    region: "default",
    rainfall: "moderate",
    description: "This region has variable climate conditions with moderate rainfall, suitable for a range of crops.",
};

/// States without their own profile borrow the closest modeled region.
const STATE_REGION_ALIASES: &[(&str, &str)] = &[
    ("andhra pradesh", "maharashtra"),
    ("telangana", "maharashtra"),
    ("tamil nadu", "kerala"),
    ("madhya pradesh", "maharashtra"),
    ("rajasthan", "gujarat"),
    ("haryana", "punjab"),
    ("uttar pradesh", "punjab"),
    ("bihar", "west bengal"),
    ("jharkhand", "west bengal"),
    ("odisha", "west bengal"),
    ("chhattisgarh", "maharashtra"),
    ("assam", "west bengal"),
    ("himachal pradesh", "punjab"),
    ("uttarakhand", "punjab"),
];

/// Climate profile for an Indian state, falling back through region
/// aliases and finally to a generic profile.
pub fn state_climate(state: &str) -> ClimateProfile {
    let state_lower = state.to_lowercase();

    let found = REGION_CLIMATES
        .iter()
        .find(|rc| state_lower.contains(rc.region) || rc.region.contains(state_lower.as_str()))
        .or_else(|| {
            STATE_REGION_ALIASES
                .iter()
                .find(|(alias, _)| *alias == state_lower)
                .and_then(|(_, region)| {
                    REGION_CLIMATES.iter().find(|rc| rc.region == *region)
                })
        })
        .unwrap_or(&DEFAULT_CLIMATE);

    ClimateProfile {
        description: found.description.to_string(),
        rainfall: found.rainfall.to_string(),
    }
}
