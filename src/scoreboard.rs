//! Per-tool display state: counters and status badges.
//!
//! Counters are cosmetic running totals bumped after each successful start.
//! Badges flip to `running` on success and back to `active` when the
//! scheduled reset fires.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::backend::ToolKind;
use crate::scheduler::TaskHandle;

const CLICK_SESSIONS_START: u64 = 1200;
const CLICK_BOOST_START: u32 = 15;
const CLICK_BOOST_MAX: u32 = 50;
const CAMPAIGN_RUNS_START: u64 = 85;
const SECURITY_SCORE_START: u8 = 80;
const SECURITY_SCORE_SOFT_MAX: u8 = 95;

// ---------------------------------------------------------------------------
// Risk level
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    #[default]
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Parse a backend-reported level; anything unrecognised is `Low`.
    pub fn parse(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "medium" => Self::Medium,
            "high" => Self::High,
            _ => Self::Low,
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "Low"),
            Self::Medium => write!(f, "Medium"),
            Self::High => write!(f, "High"),
        }
    }
}

// ---------------------------------------------------------------------------
// Counters
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Scoreboard {
    pub click_sessions: u64,
    pub click_boost_pct: u32,
    pub campaign_runs: u64,
    pub security_score: u8,
    pub risk_level: RiskLevel,
}

impl Default for Scoreboard {
    fn default() -> Self {
        Self {
            click_sessions: CLICK_SESSIONS_START,
            click_boost_pct: CLICK_BOOST_START,
            campaign_runs: CAMPAIGN_RUNS_START,
            security_score: SECURITY_SCORE_START,
            risk_level: RiskLevel::Low,
        }
    }
}

impl Scoreboard {
    /// Fold a successful start of `tool` into the counters.
    ///
    /// Returns the new risk level when the safety tool reported one, so the
    /// caller can log it.
    pub fn apply(&mut self, tool: ToolKind, data: Option<&Map<String, Value>>) -> Option<RiskLevel> {
        let field = |name: &str| data.and_then(|d| d.get(name)).and_then(Value::as_u64);
        // Zero counts as unreported, like a missing field.
        let nonzero = |name: &str| field(name).filter(|v| *v > 0);

        match tool {
            ToolKind::Click => {
                self.click_sessions += field("sessions").unwrap_or(500);
                self.click_boost_pct = (self.click_boost_pct + 2).min(CLICK_BOOST_MAX);
                None
            }
            ToolKind::Campaign => {
                self.campaign_runs += field("transactions")
                    .or_else(|| field("sessions"))
                    .unwrap_or(3);
                None
            }
            ToolKind::Safety => {
                let score = match nonzero("risk_score") {
                    Some(risk) => 100u64.saturating_sub(risk),
                    None => u64::from(self.security_score + 5).min(u64::from(SECURITY_SCORE_SOFT_MAX)),
                };
                self.security_score = score.min(100) as u8;

                let level = data
                    .and_then(|d| d.get("risk_level"))
                    .and_then(Value::as_str)
                    .map(RiskLevel::parse)
                    .unwrap_or_default();
                self.risk_level = level;
                Some(level)
            }
            ToolKind::Review => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Badges
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeState {
    #[default]
    Active,
    Running,
}

impl fmt::Display for BadgeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Running => write!(f, "running"),
        }
    }
}

/// Badge per tool plus the pending reset task for running ones.
#[derive(Debug, Default)]
pub struct Badges {
    states: BTreeMap<ToolKind, BadgeState>,
    resets: HashMap<ToolKind, TaskHandle>,
}

impl Badges {
    pub fn state(&self, tool: ToolKind) -> BadgeState {
        self.states.get(&tool).copied().unwrap_or_default()
    }

    /// Mark `tool` running. Returns the previous reset task, which the
    /// caller should cancel.
    pub fn mark_running(&mut self, tool: ToolKind, reset: TaskHandle) -> Option<TaskHandle> {
        self.states.insert(tool, BadgeState::Running);
        self.resets.insert(tool, reset)
    }

    pub fn reset(&mut self, tool: ToolKind) {
        self.states.insert(tool, BadgeState::Active);
        self.resets.remove(&tool);
    }

    /// All tools with their badge, in table order.
    pub fn snapshot(&self) -> Vec<(ToolKind, BadgeState)> {
        ToolKind::ALL
            .into_iter()
            .map(|t| (t, self.state(t)))
            .collect()
    }
}
