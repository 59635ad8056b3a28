//! Daily refresh loop and the capability state it maintains.

use std::time::Duration as StdDuration;

use anyhow::{Context, Result};
use chrono::{Days, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use tokio::sync::Mutex;

use renova_core::model::{CategorySettings, ExposedCapabilitySet};
use renova_core::reduce::ReducePolicy;
use renova_core::service::{RefreshContext, RenovaService};
use renova_core::text::Locale;

use crate::config::Config;

/// Owns the exposed capability set across refresh cycles and drives the
/// daily schedule.
pub(crate) struct Agent {
    service: RenovaService,
    settings: CategorySettings,
    locale: Locale,
    policy: ReducePolicy,
    timezone: Tz,
    fire_time: NaiveTime,
    // Doubles as the single-flight guard: a cycle holds the lock from fetch
    // to state swap, and a losing caller is discarded rather than queued.
    exposed: Mutex<ExposedCapabilitySet>,
}

impl Agent {
    pub(crate) fn new(service: RenovaService, config: &Config) -> Result<Self> {
        let timezone: Tz = config
            .schedule
            .timezone
            .parse()
            .map_err(|_tz_err| anyhow::anyhow!("invalid timezone: {}", config.schedule.timezone))?;

        let fire_time = NaiveTime::from_hms_opt(config.schedule.hour, config.schedule.minute, 0)
            .context("schedule hour/minute out of range")?;

        Ok(Self {
            service,
            settings: config.settings(),
            locale: config.display.locale,
            policy: config.policy(),
            timezone,
            fire_time,
            exposed: Mutex::new(ExposedCapabilitySet::new()),
        })
    }

    /// Run one refresh cycle, or discard the call when one is in flight.
    ///
    /// The previous exposed set is only replaced after a complete report
    /// exists; any failure leaves it untouched.
    pub(crate) async fn refresh_once(&self) -> Result<()> {
        let Ok(mut exposed) = self.exposed.try_lock() else {
            tracing::warn!("refresh cycle already in flight, discarding this invocation");
            return Ok(());
        };

        let reference_day = Utc::now().with_timezone(&self.timezone).date_naive();
        let mut context = RefreshContext::for_day(reference_day, self.locale);
        context.policy = self.policy;

        let report = self
            .service
            .refresh(&self.settings, &exposed, context)
            .await?;

        for op in report.diff.clone().into_ops() {
            tracing::debug!(op = ?op, "capability change");
        }
        for (category, display_value) in &report.category_displays {
            tracing::info!(%category, display = %display_value, "next pickup for category");
        }
        match &report.countdown {
            Some(countdown) => tracing::info!(%countdown, "next pickup overall"),
            None => tracing::info!("no upcoming pickup for any enabled category"),
        }
        if !report.target_day_summary.is_empty() {
            tracing::info!(pickups = %report.target_day_summary, "picked up tomorrow");
        }

        *exposed = report.exposed;
        Ok(())
    }

    /// Refresh immediately, then once per day at the configured local time
    /// until interrupted.
    pub(crate) async fn run(&self) -> Result<()> {
        if let Err(error) = self.refresh_once().await {
            tracing::error!(%error, "initial refresh failed, keeping previous state");
        }

        loop {
            let wait = self.duration_until_next_run();
            tracing::info!(seconds = wait.as_secs(), "sleeping until next scheduled refresh");

            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("shutdown requested");
                    break;
                }
                () = tokio::time::sleep(wait) => {
                    if let Err(error) = self.refresh_once().await {
                        tracing::error!(%error, "scheduled refresh failed, keeping previous state");
                    }
                }
            }
        }

        Ok(())
    }

    /// Time left until the next configured fire time in the operational
    /// timezone. Comparisons happen in that timezone, never in the process
    /// default.
    fn duration_until_next_run(&self) -> StdDuration {
        let now = Utc::now().with_timezone(&self.timezone);

        for offset in 0..=2 {
            let Some(day) = now.date_naive().checked_add_days(Days::new(offset)) else {
                continue;
            };
            let naive = day.and_time(self.fire_time);
            if let Some(fire) = self.timezone.from_local_datetime(&naive).earliest()
                && fire > now
            {
                return (fire - now).to_std().unwrap_or(StdDuration::ZERO);
            }
        }

        // Fire time falls into a skipped DST hour on every probed day; try
        // again in a day.
        StdDuration::from_secs(24 * 60 * 60)
    }
}
