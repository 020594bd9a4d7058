use serde::{Deserialize, Serialize};

use super::ApiJson;

/// Savings plan
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Plan {
    /// Plan id
    pub id: i64,
    /// Name
    pub name: String,
    /// Free-form description
    pub description: Option<String>,
    /// Category option key
    pub category: Option<String>,
    /// Frequency option key (`"weekly"`, `"monthly"`, ...)
    pub frequency_period: Option<String>,
    /// Last modification timestamp
    pub modified: Option<String>,
    /// Linked job template, empty when unlinked
    pub template_details: Option<TemplateDetails>,
    /// Status of the linked template's last jobs
    pub automation_status: Option<AutomationStatus>,
    /// Savings projections
    pub projections: Option<Projections>,
    /// Remaining members
    #[serde(flatten)]
    pub extra: ApiJson,
}

impl Plan {
    /// Projected savings: cumulative net benefits of the last projected period
    #[must_use]
    pub fn projected_savings(&self) -> Option<f64> {
        self.projections
            .as_ref()?
            .series_stats
            .last()
            .map(|stat| stat.cumulative_net_benefits)
    }

    /// Linked template, if any
    #[must_use]
    pub fn linked_template(&self) -> Option<&TemplateDetails> {
        self.template_details.as_ref().filter(|t| t.id.is_some())
    }
}

/// Job template linked to a plan
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateDetails {
    /// Template id
    pub id: Option<i64>,
    /// Template name
    pub name: Option<String>,
}

/// Last reported automation status
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AutomationStatus {
    /// One status or a list of statuses; `"None"` means not running
    pub status: Option<serde_json::Value>,
    /// Day of last report
    pub last_known_day: Option<String>,
    /// Month of last report
    pub last_known_month: Option<String>,
    /// Year of last report
    pub last_known_year: Option<String>,
    /// Fallback date of last report
    pub last_known_date: Option<String>,
}

impl AutomationStatus {
    /// Reported statuses in order
    #[must_use]
    pub fn statuses(&self) -> Vec<String> {
        match &self.status {
            Some(serde_json::Value::Array(items)) => items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_owned))
                .collect(),
            Some(serde_json::Value::String(s)) => vec![s.clone()],
            _ => Vec::new(),
        }
    }

    /// Most precise known report date
    #[must_use]
    pub fn last_reported(&self) -> Option<&str> {
        self.last_known_day
            .as_deref()
            .or(self.last_known_month.as_deref())
            .or(self.last_known_year.as_deref())
            .or(self.last_known_date.as_deref())
    }
}

/// Savings projections of a plan
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Projections {
    /// One entry per projected period, chronological
    pub series_stats: Vec<SeriesStat>,
}

/// Projection of one period
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SeriesStat {
    /// Net benefits accumulated up to this period
    pub cumulative_net_benefits: f64,
    /// Remaining members
    #[serde(flatten)]
    pub extra: ApiJson,
}
