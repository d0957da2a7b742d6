use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const EXCELLENT_RATIO: f64 = 1.2;
pub const POOR_RATIO: f64 = 0.8;
const SCALE_HEADROOM: f64 = 1.5;
const LOWER_IS_BETTER_FLOOR_FACTOR: f64 = 2.0;
const HIGHER_IS_BETTER_FLOOR: f64 = 3.0;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Directionality {
    #[default]
    HigherIsBetter,
    LowerIsBetter,
}

impl Directionality {
    pub fn goal_marker(&self) -> &'static str {
        match self {
            Self::HigherIsBetter => ">",
            Self::LowerIsBetter => "<",
        }
    }
}

#[derive(Debug, Error)]
#[error("unknown directionality: {0}")]
pub struct DirectionalityParseError(pub String);

impl FromStr for Directionality {
    type Err = DirectionalityParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        match normalized.as_str() {
            "higher_is_better" | "higher" => Ok(Self::HigherIsBetter),
            "lower_is_better" | "lower" => Ok(Self::LowerIsBetter),
            _ => Err(DirectionalityParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    ExcellentValue,
    FairValue,
    PoorValue,
    ExcellentEfficiency,
    StandardRate,
    HighCost,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Up,
    Down,
    Flat,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Positive,
    Neutral,
    Negative,
}

impl Verdict {
    pub fn label(&self) -> &'static str {
        match self {
            Self::ExcellentValue => "Excellent Value",
            Self::FairValue => "Fair Value",
            Self::PoorValue => "Poor Value",
            Self::ExcellentEfficiency => "Excellent Efficiency",
            Self::StandardRate => "Standard Rate",
            Self::HighCost => "High Cost",
        }
    }

    /// Direction of the metric relative to the benchmark. A falling cost is
    /// good news, so `ExcellentEfficiency` trends down.
    pub fn trend(&self) -> Trend {
        match self {
            Self::ExcellentValue | Self::HighCost => Trend::Up,
            Self::PoorValue | Self::ExcellentEfficiency => Trend::Down,
            Self::FairValue | Self::StandardRate => Trend::Flat,
        }
    }

    pub fn tone(&self) -> Tone {
        match self {
            Self::ExcellentValue | Self::ExcellentEfficiency => Tone::Positive,
            Self::FairValue | Self::StandardRate => Tone::Neutral,
            Self::PoorValue | Self::HighCost => Tone::Negative,
        }
    }
}

impl Display for Verdict {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct DisplayScale {
    pub max_scale: f64,
    pub user_percent: f64,
    pub reference_percent: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Classification {
    pub verdict: Verdict,
    pub ratio: f64,
    pub directionality: Directionality,
    pub user_value: f64,
    pub reference_value: f64,
    pub scale: DisplayScale,
}

impl Classification {
    pub fn goal(&self) -> String {
        format!(
            "{} {:.2}",
            self.directionality.goal_marker(),
            self.reference_value
        )
    }
}

pub fn ratio(user_value: f64, reference_value: f64) -> f64 {
    if reference_value > 0.0 {
        user_value / reference_value
    } else {
        0.0
    }
}

pub fn verdict_for_ratio(ratio: f64, directionality: Directionality) -> Verdict {
    match directionality {
        Directionality::HigherIsBetter => {
            if ratio >= EXCELLENT_RATIO {
                Verdict::ExcellentValue
            } else if ratio < POOR_RATIO {
                Verdict::PoorValue
            } else {
                Verdict::FairValue
            }
        }
        Directionality::LowerIsBetter => {
            if ratio <= POOR_RATIO {
                Verdict::ExcellentEfficiency
            } else if ratio >= EXCELLENT_RATIO {
                Verdict::HighCost
            } else {
                Verdict::StandardRate
            }
        }
    }
}

pub fn display_scale(
    user_value: f64,
    reference_value: f64,
    directionality: Directionality,
) -> DisplayScale {
    let safe_user = if user_value.is_finite() {
        user_value
    } else {
        0.0
    };
    let floor = match directionality {
        Directionality::HigherIsBetter => HIGHER_IS_BETTER_FLOOR,
        Directionality::LowerIsBetter => reference_value * LOWER_IS_BETTER_FLOOR_FACTOR,
    };
    let max_scale = safe_user
        .max(reference_value * SCALE_HEADROOM)
        .max(floor);
    DisplayScale {
        max_scale,
        user_percent: percent_of(safe_user, max_scale),
        reference_percent: percent_of(reference_value, max_scale),
    }
}

fn percent_of(value: f64, max_scale: f64) -> f64 {
    if max_scale.is_nan() || max_scale <= 0.0 {
        return 0.0;
    }
    let percent = value / max_scale * 100.0;
    if percent.is_nan() {
        return 0.0;
    }
    percent.clamp(0.0, 100.0)
}

pub fn classify(
    user_value: f64,
    reference_value: f64,
    directionality: Directionality,
) -> Classification {
    let ratio = ratio(user_value, reference_value);
    Classification {
        verdict: verdict_for_ratio(ratio, directionality),
        ratio,
        directionality,
        user_value,
        reference_value,
        scale: display_scale(user_value, reference_value, directionality),
    }
}
