use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::domain::normalize_domain;

/// Snapshot of a surface (tab) as reported by the environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveSurface {
    pub surface_id: u64,
    /// Container (window) holding the surface.
    pub container_id: u64,
    #[serde(default)]
    pub url: String,
    /// Whether this surface is the selected one inside its container.
    #[serde(default)]
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusContext {
    pub surface_id: Option<u64>,
    pub container_id: Option<u64>,
    /// Empty when nothing attributable is in front of the user.
    pub domain: String,
    pub last_tick: DateTime<Utc>,
    pub has_attention: bool,
}

/// Keeps track of what the user is looking at. Transitions come from environment notifications,
/// the only thing the ticker touches is [FocusContext::last_tick].
#[derive(Debug)]
pub struct FocusTracker {
    context: FocusContext,
}

impl FocusTracker {
    /// Attention is assumed to be held until the environment says otherwise.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            context: FocusContext {
                surface_id: None,
                container_id: None,
                domain: String::new(),
                last_tick: now,
                has_attention: true,
            },
        }
    }

    pub fn context(&self) -> &FocusContext {
        &self.context
    }

    /// Domain to charge elapsed time to. `None` while unfocused or when the domain is unknown.
    pub fn attributable_domain(&self) -> Option<&str> {
        if self.context.has_attention && !self.context.domain.is_empty() {
            Some(&self.context.domain)
        } else {
            None
        }
    }

    pub fn last_tick(&self) -> DateTime<Utc> {
        self.context.last_tick
    }

    pub fn set_last_tick(&mut self, moment: DateTime<Utc>) {
        self.context.last_tick = moment;
    }

    pub fn focus_gained(&mut self, active: Option<&ActiveSurface>) {
        self.context.has_attention = true;
        self.refresh(active);
    }

    /// Domain is retained so that regaining focus without a fresh report resumes accounting.
    pub fn focus_lost(&mut self) {
        self.context.has_attention = false;
    }

    pub fn surface_activated(&mut self, active: Option<&ActiveSurface>) {
        self.refresh(active);
    }

    /// Navigation inside a surface only matters once it finished loading and if it's the one in
    /// front.
    pub fn surface_updated(&mut self, surface: &ActiveSurface, loaded: bool) {
        if surface.active && loaded {
            self.refresh(Some(surface));
        }
    }

    fn refresh(&mut self, active: Option<&ActiveSurface>) {
        let Some(surface) = active else {
            debug!("Active surface is unknown, keeping {:?}", self.context);
            return;
        };
        self.context.surface_id = Some(surface.surface_id);
        self.context.container_id = Some(surface.container_id);
        self.context.domain = normalize_domain(&surface.url);
        debug!("Focus moved to {:?}", self.context);
    }
}
