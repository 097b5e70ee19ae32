//! Native timer driver.
//!
//! Runs a [`LoaderDismisser`] on tokio timers: the load event is taken to be
//! the moment [`run`] is first polled, and each step fires at its offset from
//! that instant. Steps are awaited in timeline order, which is also the order
//! their delays elapse. A cancel wakes the driver right away; the remaining
//! steps are reported as cancelled without waiting out their offsets.

use tokio::time::{Instant, sleep_until};
use tracing::debug;

use crate::dismisser::{LoaderDismisser, StepOutcome};
use crate::element::LoaderStyle;
use crate::error::Result;
use crate::phase::LoaderPhase;
use crate::timeline::ScheduledStep;

/// What happened during a driven dismissal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DismissReport {
    /// Steps that wrote to the element.
    pub applied: Vec<ScheduledStep>,
    /// Steps skipped because the token was cancelled.
    pub cancelled: Vec<ScheduledStep>,
    /// Phase after the last step.
    pub final_phase: LoaderPhase,
}

impl DismissReport {
    /// Whether every step ran.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.cancelled.is_empty()
    }
}

/// Fire the load event now and apply each step when its offset elapses.
pub async fn run<E: LoaderStyle>(dismisser: &LoaderDismisser<E>) -> Result<DismissReport> {
    let loaded_at = Instant::now();
    let timeline = dismisser.on_load()?;
    let mut report = DismissReport::default();

    for scheduled in timeline {
        let token = dismisser.cancel_token();
        tokio::select! {
            () = sleep_until(loaded_at + scheduled.at) => {}
            () = token.cancelled() => {}
        }

        match dismisser.apply(scheduled)? {
            StepOutcome::Applied(_) => report.applied.push(scheduled),
            StepOutcome::Cancelled => report.cancelled.push(scheduled),
        }
    }

    report.final_phase = dismisser.phase();
    debug!(
        "Loader '{}' driver finished: {} applied, {} cancelled",
        dismisser.config().element_id,
        report.applied.len(),
        report.cancelled.len()
    );

    Ok(report)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use std::time::Duration;

    use tokio::time::sleep;

    use super::*;
    use crate::config::FadeConfig;
    use crate::element::{DisplayMode, MemoryElement};
    use crate::timeline::FadeStep;

    #[tokio::test(start_paused = true)]
    async fn test_production_scenario() {
        let element = MemoryElement::new();
        let dismisser = LoaderDismisser::new(element.clone(), FadeConfig::production()).unwrap();

        let observe = async {
            // Load handled, fade not yet applied.
            let style = element.snapshot();
            assert_eq!(style.opacity, 1.0);
            assert_eq!(style.transition, Some(Duration::from_millis(1000)));

            sleep(Duration::from_millis(500)).await;
            let style = element.snapshot();
            assert_eq!(style.opacity, 0.0);
            assert_eq!(style.display, DisplayMode::Visible);

            sleep(Duration::from_millis(501)).await;
            assert_eq!(element.snapshot().display, DisplayMode::None);
        };

        let (report, ()) = tokio::join!(run(&dismisser), observe);
        let report = report.unwrap();

        assert!(report.is_complete());
        assert_eq!(report.final_phase, LoaderPhase::Hidden);
        let steps: Vec<_> = report.applied.iter().map(|s| s.step).collect();
        assert_eq!(steps, vec![FadeStep::Fade, FadeStep::Hide]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_steps_fire_at_their_offsets() {
        let element = MemoryElement::new();
        let config = FadeConfig::new()
            .with_fade_duration_ms(200)
            .with_opacity_delay_ms(100)
            .with_display_delay_ms(300);
        let dismisser = LoaderDismisser::new(element.clone(), config).unwrap();
        let start = Instant::now();

        let observe = async {
            sleep(Duration::from_millis(99)).await;
            assert_eq!(element.snapshot().opacity, 1.0);

            sleep(Duration::from_millis(2)).await;
            assert_eq!(element.snapshot().opacity, 0.0);

            sleep(Duration::from_millis(198)).await;
            assert_eq!(element.snapshot().display, DisplayMode::Visible);

            sleep(Duration::from_millis(2)).await;
            assert_eq!(element.snapshot().display, DisplayMode::None);
        };

        let (report, ()) = tokio::join!(run(&dismisser), observe);
        assert!(report.unwrap().is_complete());
        assert!(start.elapsed() >= Duration::from_millis(300));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_between_steps() {
        let element = MemoryElement::new();
        let dismisser = LoaderDismisser::new(element.clone(), FadeConfig::compact()).unwrap();

        let teardown = async {
            sleep(Duration::from_millis(200)).await;
            dismisser.cancel();
        };

        let start = Instant::now();
        let (report, ()) = tokio::join!(run(&dismisser), teardown);
        let report = report.unwrap();

        // Returns at the cancel, not at the 400ms hide offset.
        assert_eq!(start.elapsed(), Duration::from_millis(200));
        assert!(!report.is_complete());
        assert_eq!(report.applied.len(), 1);
        assert_eq!(report.cancelled.len(), 1);
        assert_eq!(report.cancelled[0].step, FadeStep::Hide);
        assert_eq!(report.final_phase, LoaderPhase::Faded);
        assert_eq!(element.snapshot().display, DisplayMode::Visible);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_before_run_does_not_wait() {
        let element = MemoryElement::new();
        let dismisser = LoaderDismisser::new(element.clone(), FadeConfig::production()).unwrap();
        dismisser.cancel();

        let start = Instant::now();
        let report = run(&dismisser).await.unwrap();

        assert_eq!(report.cancelled.len(), 2);
        assert!(report.applied.is_empty());
        assert_eq!(start.elapsed(), Duration::ZERO);
        assert_eq!(element.snapshot().transition, None);
    }
}
