//! The engine owns all mutable tracking state: the focus tracker, persisted usage and
//! categories, and the weekly cache. It is driven by [actor::EngineActor], which guarantees that
//! ticks, environment events and requests never interleave.

use futures::{stream, StreamExt, TryStreamExt};
use thiserror::Error;
use tracing::{debug, error, info, instrument, warn};

use crate::{
    tracking::{
        categories::CategoryList,
        focus::FocusTracker,
        ledger::{elapsed_seconds, DayUsage},
        weekly::{WeeklySummary, WEEK_DAYS},
    },
    utils::{clock::Clock, time::days_back_from},
};

use super::{
    protocol::{Message, Response, UNKNOWN_REQUEST},
    sink::SummarySink,
    storage::{key_value::StoreError, state::StateStore},
};

pub mod actor;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Storage(#[from] StoreError),
    #[error("engine is not running")]
    Closed,
}

/// What a single tick did with the elapsed time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    Recorded { domain: String, seconds: u64 },
    Skipped,
}

pub struct Engine {
    state: StateStore,
    tracker: FocusTracker,
    clock: Box<dyn Clock>,
    sink: Option<Box<dyn SummarySink>>,
}

impl Engine {
    /// Creates an engine, writing default categories if this state has never seen any.
    ///
    /// A corrupt initialization marker is reported and left alone. Categories are neither
    /// rewritten nor trusted until the document is repaired; requests touching them fail.
    pub async fn start(
        state: StateStore,
        clock: Box<dyn Clock>,
        sink: Option<Box<dyn SummarySink>>,
    ) -> Result<Self, EngineError> {
        match state.initialize_categories_if_absent().await {
            Ok(_) => {}
            Err(e @ StoreError::Decode { .. }) => {
                error!("Category state is unreadable, leaving it as is: {e}")
            }
            Err(e) => return Err(e.into()),
        }
        let tracker = FocusTracker::new(clock.time());
        Ok(Self {
            state,
            tracker,
            clock,
            sink,
        })
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    pub fn tracker(&self) -> &FocusTracker {
        &self.tracker
    }

    /// Charges time elapsed since the previous tick to the domain in focus, then refreshes the
    /// weekly cache.
    ///
    /// The tick timestamp moves forward together with the usage write. If the write fails the
    /// timestamp stays where it was, so the next tick accounts for the same interval again and
    /// nothing is lost or counted twice.
    #[instrument(skip(self))]
    pub async fn tick(&mut self) -> Result<TickOutcome, EngineError> {
        let now = self.clock.time();
        let seconds = elapsed_seconds(self.tracker.last_tick(), now);

        let outcome = match self.tracker.attributable_domain() {
            Some(domain) => {
                let domain = domain.to_owned();
                let today = self.clock.today();
                let mut usage = self.state.day_usage(today).await?;
                usage.add(&domain, seconds);
                self.state.write_day_usage(today, &usage).await?;
                self.tracker.set_last_tick(now);
                debug!("Added {seconds}s to {domain}");
                TickOutcome::Recorded { domain, seconds }
            }
            None => {
                self.tracker.set_last_tick(now);
                TickOutcome::Skipped
            }
        };

        self.recompute_weekly().await?;
        Ok(outcome)
    }

    /// Rebuilds the weekly summary from scratch and replaces the cached one.
    pub async fn recompute_weekly(&mut self) -> Result<WeeklySummary, EngineError> {
        let days = days_back_from(self.clock.today(), WEEK_DAYS);
        let state = &self.state;
        let usages = stream::iter(days)
            .map(|day| state.day_usage(day))
            .buffered(4)
            .try_collect::<Vec<_>>()
            .await?;
        let categories = self.state.categories().await?;

        let summary = WeeklySummary::aggregate(&usages, &categories);
        self.state.write_weekly_summary(&summary).await?;

        if let Some(sink) = &self.sink {
            sink.submit(&summary);
        }
        Ok(summary)
    }

    pub async fn today(&self) -> Result<DayUsage, EngineError> {
        Ok(self.state.day_usage(self.clock.today()).await?)
    }

    pub async fn weekly(&self) -> Result<WeeklySummary, EngineError> {
        Ok(self.state.weekly_summary().await?)
    }

    pub async fn categories(&self) -> Result<CategoryList, EngineError> {
        Ok(self.state.categories().await?)
    }

    /// Stores new lists and reclassifies the cached totals before returning.
    pub async fn set_categories(&mut self, categories: CategoryList) -> Result<(), EngineError> {
        self.state.replace_categories(&categories).await?;
        info!("Categories replaced");
        self.recompute_weekly().await?;
        Ok(())
    }

    /// Entry point for everything arriving from outside of the daemon.
    pub async fn handle(&mut self, message: Message) -> Response {
        let result = match message {
            Message::GetToday => self.today().await.map(|usage| Response::Today { usage }),
            Message::GetWeekly => self.weekly().await.map(Response::Weekly),
            Message::GetCategories => self.categories().await.map(Response::Categories),
            Message::SetCategories { category_list } => self
                .set_categories(category_list)
                .await
                .map(|_| Response::ack()),
            Message::FocusGained { active } => {
                self.tracker.focus_gained(active.as_ref());
                Ok(Response::ack())
            }
            Message::FocusLost => {
                self.tracker.focus_lost();
                Ok(Response::ack())
            }
            Message::SurfaceActivated { active } => {
                self.tracker.surface_activated(active.as_ref());
                Ok(Response::ack())
            }
            Message::SurfaceUpdated { surface, loaded } => {
                self.tracker.surface_updated(&surface, loaded);
                Ok(Response::ack())
            }
            Message::Unknown => Ok(Response::error(UNKNOWN_REQUEST)),
        };

        result.unwrap_or_else(|e| {
            warn!("Request failed {e:?}");
            Response::error(e)
        })
    }
}
