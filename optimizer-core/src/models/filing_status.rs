use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilingStatusCode {
    #[default]
    Single,
    MarriedJoint,
    MarriedSeparate,
    HeadHousehold,
}

impl FilingStatusCode {
    pub fn all() -> &'static [FilingStatusCode] {
        &[
            Self::Single,
            Self::MarriedJoint,
            Self::MarriedSeparate,
            Self::HeadHousehold,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::MarriedJoint => "married_joint",
            Self::MarriedSeparate => "married_separate",
            Self::HeadHousehold => "head_household",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "single" => Some(Self::Single),
            "married_joint" => Some(Self::MarriedJoint),
            "married_separate" => Some(Self::MarriedSeparate),
            "head_household" => Some(Self::HeadHousehold),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Single => "Single",
            Self::MarriedJoint => "Married Filing Jointly",
            Self::MarriedSeparate => "Married Filing Separately",
            Self::HeadHousehold => "Head of Household",
        }
    }
}
