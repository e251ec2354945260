//! 리드 분류 값.

use serde::{Deserialize, Serialize};

/// 리드 유입 경로.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum LeadSource {
    Whatsapp,
    Call,
}

impl LeadSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeadSource::Whatsapp => "whatsapp",
            LeadSource::Call => "call",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "whatsapp" => Some(LeadSource::Whatsapp),
            "call" => Some(LeadSource::Call),
            _ => None,
        }
    }
}

/// 리드 온도.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum LeadStatus {
    Hot,
    #[default]
    Warm,
    Cold,
}

impl LeadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeadStatus::Hot => "hot",
            LeadStatus::Warm => "warm",
            LeadStatus::Cold => "cold",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "hot" => Some(LeadStatus::Hot),
            "warm" => Some(LeadStatus::Warm),
            "cold" => Some(LeadStatus::Cold),
            _ => None,
        }
    }
}
