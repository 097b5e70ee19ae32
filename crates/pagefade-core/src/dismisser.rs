//! Loader dismissal.
//!
//! [`LoaderDismisser`] owns the loader element handle and applies the fade
//! sequence to it. It does not schedule anything itself: the host calls
//! [`LoaderDismisser::on_load`] when the page has loaded, then arranges for
//! each returned [`ScheduledStep`] to be passed to [`LoaderDismisser::apply`]
//! once its offset has elapsed. The native [`driver`](crate::driver) and the
//! browser front end are two such hosts.

use std::cell::Cell;

use tracing::{debug, info};

use crate::cancel::CancellationToken;
use crate::config::FadeConfig;
use crate::element::{DisplayMode, LoaderStyle};
use crate::error::Result;
use crate::phase::LoaderPhase;
use crate::timeline::{FadeStep, FadeTimeline, ScheduledStep};

/// Result of applying a scheduled step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The style was written; the loader is now in this phase.
    Applied(LoaderPhase),
    /// The token was cancelled; the element was not touched.
    Cancelled,
}

/// Fades out and hides one loader element.
pub struct LoaderDismisser<E> {
    element: E,
    config: FadeConfig,
    phase: Cell<LoaderPhase>,
    token: CancellationToken,
}

impl<E: LoaderStyle> LoaderDismisser<E> {
    /// Create a dismisser for `element`.
    ///
    /// Fails if the configuration does not pass [`FadeConfig::check`]. Hosts
    /// call [`FadeConfig::validate`] once beforehand to log timing concerns.
    pub fn new(element: E, config: FadeConfig) -> Result<Self> {
        Self::with_token(element, config, CancellationToken::new())
    }

    /// Create a dismisser whose steps observe an existing token, so a handle
    /// handed out before the element was found can still cancel it.
    pub fn with_token(element: E, config: FadeConfig, token: CancellationToken) -> Result<Self> {
        config.check()?;
        Ok(Self {
            element,
            config,
            phase: Cell::new(LoaderPhase::Visible),
            token,
        })
    }

    /// Handle the page's load event.
    ///
    /// Sets the opacity transition and returns the steps still to run.
    /// Calling this again re-applies the same sequence.
    pub fn on_load(&self) -> Result<FadeTimeline> {
        let timeline = FadeTimeline::from_config(&self.config);

        if self.token.is_cancelled() {
            debug!("Loader '{}' cancelled before load", self.config.element_id);
            return Ok(timeline);
        }

        self.element.set_transition(self.config.fade_duration())?;
        self.phase.set(LoaderPhase::Fading);

        info!(
            "Dismissing loader '{}': fade {}ms at {}ms, hide at {}ms",
            self.config.element_id,
            self.config.fade_duration_ms,
            self.config.opacity_delay_ms,
            self.config.display_delay_ms
        );

        Ok(timeline)
    }

    /// Apply a scheduled step unless dismissal was cancelled.
    pub fn apply(&self, scheduled: ScheduledStep) -> Result<StepOutcome> {
        if self.token.is_cancelled() {
            debug!(
                "Skipping {} step for loader '{}': cancelled",
                scheduled.step, self.config.element_id
            );
            return Ok(StepOutcome::Cancelled);
        }

        match scheduled.step {
            FadeStep::Fade => self.element.set_opacity(0.0)?,
            FadeStep::Hide => self.element.set_display(DisplayMode::None)?,
        }

        let phase = self.phase.get().after(scheduled.step);
        self.phase.set(phase);
        debug!(
            "Loader '{}' {} at {}ms, now {}",
            self.config.element_id,
            scheduled.step,
            scheduled.at_ms(),
            phase
        );

        Ok(StepOutcome::Applied(phase))
    }

    /// Stop any step that has not run yet.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Token shared with the scheduled steps.
    #[must_use]
    pub fn cancel_token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> LoaderPhase {
        self.phase.get()
    }

    /// The validated configuration.
    #[must_use]
    pub const fn config(&self) -> &FadeConfig {
        &self.config
    }

    /// The element handle.
    #[must_use]
    pub const fn element(&self) -> &E {
        &self.element
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use mockall::Sequence;
    use mockall::predicate::eq;
    use tracing::{Event, Level, Subscriber};
    use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

    use super::*;
    use crate::element::{MemoryElement, MockLoaderStyle};
    use crate::error::Error;

    /// Counts WARN events seen by the subscriber.
    #[derive(Clone, Default)]
    struct WarnCounter(Arc<AtomicUsize>);

    impl<S: Subscriber> Layer<S> for WarnCounter {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            if *event.metadata().level() == Level::WARN {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    /// Validate then build, the way the browser host does.
    fn warnings_for(config: FadeConfig) -> usize {
        let counter = WarnCounter::default();
        let subscriber = tracing_subscriber::registry().with(counter.clone());
        tracing::subscriber::with_default(subscriber, || {
            config.validate().unwrap();
            LoaderDismisser::with_token(MemoryElement::new(), config, CancellationToken::new())
                .unwrap();
        });
        counter.0.load(Ordering::SeqCst)
    }

    #[test]
    fn test_default_config_does_not_warn() {
        assert_eq!(warnings_for(FadeConfig::default()), 0);
        assert_eq!(warnings_for(FadeConfig::compact()), 0);
    }

    #[test]
    fn test_visible_snap_warns_once() {
        let config = FadeConfig::production().with_display_delay_ms(500);
        assert_eq!(warnings_for(config), 1);
    }

    #[test]
    fn test_new_rejects_inverted_delays() {
        let result = LoaderDismisser::new(MemoryElement::new(), FadeConfig::demo());
        assert!(matches!(result, Err(Error::InvertedDelays { .. })));
    }

    #[test]
    fn test_full_sequence_on_mock_element() {
        let mut mock = MockLoaderStyle::new();
        let mut seq = Sequence::new();
        mock.expect_set_transition()
            .with(eq(Duration::from_millis(1000)))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        mock.expect_set_opacity()
            .with(eq(0.0))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        mock.expect_set_display()
            .with(eq(DisplayMode::None))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));

        let dismisser = LoaderDismisser::new(mock, FadeConfig::production()).unwrap();
        assert_eq!(dismisser.phase(), LoaderPhase::Visible);

        let timeline = dismisser.on_load().unwrap();
        assert_eq!(dismisser.phase(), LoaderPhase::Fading);

        let outcomes: Vec<_> = timeline
            .into_iter()
            .map(|step| dismisser.apply(step).unwrap())
            .collect();
        assert_eq!(
            outcomes,
            vec![
                StepOutcome::Applied(LoaderPhase::Faded),
                StepOutcome::Applied(LoaderPhase::Hidden),
            ]
        );
    }

    #[test]
    fn test_cancel_skips_pending_steps() {
        let mut mock = MockLoaderStyle::new();
        mock.expect_set_transition().times(1).returning(|_| Ok(()));
        mock.expect_set_opacity().times(1).returning(|_| Ok(()));
        mock.expect_set_display().never();

        let dismisser = LoaderDismisser::new(mock, FadeConfig::production()).unwrap();
        let steps = dismisser.on_load().unwrap();
        let (fade, hide) = (steps.steps()[0], steps.steps()[1]);

        assert_eq!(
            dismisser.apply(fade).unwrap(),
            StepOutcome::Applied(LoaderPhase::Faded)
        );
        dismisser.cancel();
        assert!(dismisser.cancel_token().is_cancelled());
        assert_eq!(dismisser.apply(hide).unwrap(), StepOutcome::Cancelled);
        assert_eq!(dismisser.phase(), LoaderPhase::Faded);
    }

    #[test]
    fn test_cancel_before_load_leaves_element_untouched() {
        let element = MemoryElement::new();
        let dismisser = LoaderDismisser::new(element.clone(), FadeConfig::compact()).unwrap();

        dismisser.cancel();
        let timeline = dismisser.on_load().unwrap();
        for step in timeline {
            assert_eq!(dismisser.apply(step).unwrap(), StepOutcome::Cancelled);
        }

        assert_eq!(element.snapshot(), crate::element::StyleSnapshot::default());
        assert_eq!(dismisser.phase(), LoaderPhase::Visible);
    }

    #[test]
    fn test_with_token_shares_cancellation() {
        let token = CancellationToken::new();
        let dismisser = LoaderDismisser::with_token(
            MemoryElement::new(),
            FadeConfig::production(),
            token.clone(),
        )
        .unwrap();

        token.cancel();
        let fade = dismisser.on_load().unwrap().steps()[0];
        assert_eq!(dismisser.apply(fade).unwrap(), StepOutcome::Cancelled);
    }

    #[test]
    fn test_second_load_is_harmless() {
        let element = MemoryElement::new();
        let dismisser = LoaderDismisser::new(element.clone(), FadeConfig::compact()).unwrap();

        for _ in 0..2 {
            for step in dismisser.on_load().unwrap() {
                dismisser.apply(step).unwrap();
            }
        }

        let style = element.snapshot();
        assert_eq!(style.opacity, 0.0);
        assert_eq!(style.display, DisplayMode::None);
        assert_eq!(style.transition, Some(Duration::from_millis(400)));
        assert_eq!(dismisser.phase(), LoaderPhase::Hidden);
    }

    #[test]
    fn test_style_error_propagates() {
        let mut mock = MockLoaderStyle::new();
        mock.expect_set_transition()
            .returning(|_| Err(Error::style("transition", "no style declaration")));

        let dismisser = LoaderDismisser::new(mock, FadeConfig::production()).unwrap();
        let err = dismisser.on_load().unwrap_err();
        assert!(matches!(err, Error::Style { .. }));
        assert_eq!(dismisser.phase(), LoaderPhase::Visible);
    }

    #[test]
    fn test_accessors() {
        let config = FadeConfig::compact().with_element_id("loader");
        let dismisser = LoaderDismisser::new(MemoryElement::new(), config.clone()).unwrap();
        assert_eq!(dismisser.config(), &config);
        assert_eq!(dismisser.element().snapshot().opacity, 1.0);
    }
}
