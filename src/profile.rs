use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

pub const AGE_RANGE: RangeInclusive<u8> = 10..=80;
pub const HEIGHT_FEET_RANGE: RangeInclusive<u8> = 3..=8;
pub const HEIGHT_INCHES_RANGE: RangeInclusive<u8> = 0..=11;
pub const WEIGHT_LBS_RANGE: RangeInclusive<f64> = 50.0..=500.0;
pub const FATIGUE_RANGE: RangeInclusive<u8> = 1..=10;

pub const DEFAULT_FATIGUE: u8 = 5;

/// Stand-in sent to the service when no injury history was entered
pub const NO_INJURIES: &str = "None";

/// Upper bound (inclusive) of each fatigue band, checked in order
const FATIGUE_BANDS: &[(u8, &str)] = &[(3, "Feeling fresh"), (6, "Somewhat tired")];
const FATIGUE_TOP_BAND: &str = "Very fatigued";

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, strum_macros::Display,
)]
pub enum Sport {
    #[default]
    Snowboarding,
    Skateboarding,
    #[strum(serialize = "BMX")]
    #[serde(rename = "BMX")]
    Bmx,
    Skiing,
    Parkour,
    Surfing,
    Motocross,
    #[strum(serialize = "Rock Climbing")]
    #[serde(rename = "Rock Climbing")]
    RockClimbing,
    Wingsuiting,
    Other,
}

impl Sport {
    pub const ALL: [Sport; 10] = [
        Sport::Snowboarding,
        Sport::Skateboarding,
        Sport::Bmx,
        Sport::Skiing,
        Sport::Parkour,
        Sport::Surfing,
        Sport::Motocross,
        Sport::RockClimbing,
        Sport::Wingsuiting,
        Sport::Other,
    ];

    pub fn next(self) -> Self {
        cycle(&Self::ALL, self, 1)
    }

    pub fn prev(self) -> Self {
        cycle(&Self::ALL, self, Self::ALL.len() - 1)
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, strum_macros::Display,
)]
pub enum SkillLevel {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
    Pro,
}

impl SkillLevel {
    pub const ALL: [SkillLevel; 4] = [
        SkillLevel::Beginner,
        SkillLevel::Intermediate,
        SkillLevel::Advanced,
        SkillLevel::Pro,
    ];

    pub fn next(self) -> Self {
        cycle(&Self::ALL, self, 1)
    }

    pub fn prev(self) -> Self {
        cycle(&Self::ALL, self, Self::ALL.len() - 1)
    }
}

fn cycle<T: Copy + PartialEq>(all: &[T], current: T, step: usize) -> T {
    let idx = all.iter().position(|v| *v == current).unwrap_or(0);
    all[(idx + step) % all.len()]
}

/// Athlete profile as saved from the profile step.
///
/// Handed around by value: the workflow and the submission pipeline each
/// hold their own copy, so an edit never reaches a request already built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub sport: Sport,
    pub skill_level: SkillLevel,
    pub age: u8,
    pub height_feet: u8,
    pub height_inches: u8,
    pub weight_lbs: f64,
    pub fatigue_level: u8,
    pub injury_history: String,
}

impl Profile {
    /// True when every required field sits inside its domain
    pub fn is_complete(&self) -> bool {
        AGE_RANGE.contains(&self.age)
            && HEIGHT_FEET_RANGE.contains(&self.height_feet)
            && HEIGHT_INCHES_RANGE.contains(&self.height_inches)
            && WEIGHT_LBS_RANGE.contains(&self.weight_lbs)
            && FATIGUE_RANGE.contains(&self.fatigue_level)
    }

    /// Injury history as sent over the wire, never empty
    pub fn injury_history_or_default(&self) -> &str {
        let trimmed = self.injury_history.trim();
        if trimmed.is_empty() {
            NO_INJURIES
        } else {
            trimmed
        }
    }
}

/// Qualitative hint for a fatigue level. Display only.
pub fn describe_intensity(value: u8) -> &'static str {
    FATIGUE_BANDS
        .iter()
        .find(|(upper, _)| value <= *upper)
        .map(|(_, label)| *label)
        .unwrap_or(FATIGUE_TOP_BAND)
}

/// Raw contents of the profile form while the user is still typing.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileDraft {
    pub sport: Sport,
    pub skill_level: SkillLevel,
    pub age: String,
    pub height_feet: String,
    pub height_inches: String,
    pub weight_lbs: String,
    pub fatigue_level: u8,
    pub injury_history: String,
}

impl Default for ProfileDraft {
    fn default() -> Self {
        Self {
            sport: Sport::default(),
            skill_level: SkillLevel::default(),
            age: String::new(),
            height_feet: String::new(),
            height_inches: String::new(),
            weight_lbs: String::new(),
            fatigue_level: DEFAULT_FATIGUE,
            injury_history: String::new(),
        }
    }
}

impl ProfileDraft {
    /// Parse the form into a profile. `None` unless every field is present and in range.
    pub fn to_profile(&self) -> Option<Profile> {
        let profile = Profile {
            sport: self.sport,
            skill_level: self.skill_level,
            age: self.age.trim().parse().ok()?,
            height_feet: self.height_feet.trim().parse().ok()?,
            height_inches: self.height_inches.trim().parse().ok()?,
            weight_lbs: self.weight_lbs.trim().parse().ok()?,
            fatigue_level: self.fatigue_level,
            injury_history: self.injury_history.clone(),
        };

        profile.is_complete().then_some(profile)
    }

    pub fn raise_fatigue(&mut self) {
        if self.fatigue_level < *FATIGUE_RANGE.end() {
            self.fatigue_level += 1;
        }
    }

    pub fn lower_fatigue(&mut self) {
        if self.fatigue_level > *FATIGUE_RANGE.start() {
            self.fatigue_level -= 1;
        }
    }
}

impl From<&Profile> for ProfileDraft {
    fn from(profile: &Profile) -> Self {
        Self {
            sport: profile.sport,
            skill_level: profile.skill_level,
            age: profile.age.to_string(),
            height_feet: profile.height_feet.to_string(),
            height_inches: profile.height_inches.to_string(),
            weight_lbs: profile.weight_lbs.to_string(),
            fatigue_level: profile.fatigue_level,
            injury_history: profile.injury_history.clone(),
        }
    }
}
