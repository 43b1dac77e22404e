//! Playback chain - ordered actions over one request context
//!
//! A chain runs its actions in declared order. Every action receives the
//! context by value together with a [`ChainControl`] handle and must either
//! hand the context back (`proceed`, `complete`, `terminate`) or keep it
//! (defer). A deferred run picks up again from the following action once the
//! deferring action finds its event during [`PlaybackChain::pump`].

use crate::{
    context::{RequestContext, RequestId, RequestTracker},
    error::PlaybackError,
    events::{NotificationBus, PlaybackNotification},
    services::Sequencer,
};
use aural_core::PlayerState;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Handle an action uses to decide what happens to the context next
pub trait ChainControl {
    /// Hand the context to the next action
    fn proceed(&mut self, context: RequestContext);

    /// Finish the chain successfully
    fn complete(&mut self, context: RequestContext);

    /// Abort the chain and report `error` to observers
    fn terminate(&mut self, context: RequestContext, error: PlaybackError);

    /// Whether `context` is still the request in flight
    fn is_current(&self, context: &RequestContext) -> bool;
}

/// A single step of a playback chain
pub trait ChainAction: Send {
    fn name(&self) -> &'static str;

    fn execute(&mut self, context: RequestContext, chain: &mut dyn ChainControl);

    /// Resume a deferred context if its awaited event has arrived
    ///
    /// Called by [`PlaybackChain::pump`]. Actions that never defer keep the
    /// default, which does nothing.
    fn resume(&mut self, _chain: &mut dyn ChainControl) {}
}

/// What an action decided to do with the context
#[derive(Debug)]
pub enum Transition {
    Proceed(RequestContext),
    Complete(RequestContext),
    Terminate(RequestContext, PlaybackError),
}

/// [`ChainControl`] that records the first decision of a single action call
pub struct ChainStep<'a> {
    tracker: &'a RequestTracker,
    transition: Option<Transition>,
}

impl<'a> ChainStep<'a> {
    pub fn new(tracker: &'a RequestTracker) -> Self {
        Self {
            tracker,
            transition: None,
        }
    }

    pub fn into_transition(self) -> Option<Transition> {
        self.transition
    }

    fn record(&mut self, transition: Transition) {
        if self.transition.is_some() {
            warn!(?transition, "Action decided twice in one step; ignoring");
            return;
        }
        self.transition = Some(transition);
    }
}

impl ChainControl for ChainStep<'_> {
    fn proceed(&mut self, context: RequestContext) {
        self.record(Transition::Proceed(context));
    }

    fn complete(&mut self, context: RequestContext) {
        self.record(Transition::Complete(context));
    }

    fn terminate(&mut self, context: RequestContext, error: PlaybackError) {
        self.record(Transition::Terminate(context, error));
    }

    fn is_current(&self, context: &RequestContext) -> bool {
        self.tracker.is_current(context.id())
    }
}

/// Which trigger a chain serves; selects what completion publishes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainKind {
    StartPlayback,
    StopPlayback,
    TrackCompleted,
}

/// Result of running (or resuming) a chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainOutcome {
    Completed { request: RequestId },
    Terminated { request: RequestId, error: PlaybackError },
    Deferred { request: RequestId },
}

impl ChainOutcome {
    pub fn request(&self) -> RequestId {
        match self {
            Self::Completed { request }
            | Self::Terminated { request, .. }
            | Self::Deferred { request } => *request,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }

    pub fn is_deferred(&self) -> bool {
        matches!(self, Self::Deferred { .. })
    }
}

/// Ordered list of actions plus the chain-level terminals
pub struct PlaybackChain {
    kind: ChainKind,
    actions: Vec<Box<dyn ChainAction>>,
    sequencer: Arc<dyn Sequencer>,
    notifications: Arc<NotificationBus>,
    tracker: Arc<RequestTracker>,
}

impl PlaybackChain {
    pub fn new(
        kind: ChainKind,
        sequencer: Arc<dyn Sequencer>,
        notifications: Arc<NotificationBus>,
        tracker: Arc<RequestTracker>,
    ) -> Self {
        Self {
            kind,
            actions: Vec::new(),
            sequencer,
            notifications,
            tracker,
        }
    }

    /// Append an action. Order is fixed once the chain is built.
    #[must_use]
    pub fn with_action(mut self, action: impl ChainAction + 'static) -> Self {
        self.actions.push(Box::new(action));
        self
    }

    pub fn kind(&self) -> ChainKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn action_names(&self) -> Vec<&'static str> {
        self.actions.iter().map(|action| action.name()).collect()
    }

    /// Start a new run; `context` becomes the request in flight
    pub fn execute(&mut self, context: RequestContext) -> ChainOutcome {
        info!(
            chain = ?self.kind,
            request = %context.id(),
            requested = ?context.requested_track().map(|t| t.id.as_str()),
            "Executing playback chain"
        );
        self.tracker.begin(context.id());
        self.run_from(0, context)
    }

    /// Give every action a chance to resume a deferred context
    ///
    /// Returns the outcome of each run that was resumed, in resume order.
    pub fn pump(&mut self) -> Vec<ChainOutcome> {
        let mut outcomes = Vec::new();

        'scan: loop {
            for index in 0..self.actions.len() {
                let mut step = ChainStep::new(&self.tracker);
                self.actions[index].resume(&mut step);

                if let Some(transition) = step.into_transition() {
                    debug!(
                        chain = ?self.kind,
                        action = self.actions[index].name(),
                        "Resuming deferred chain"
                    );
                    outcomes.push(self.apply(index, transition));
                    continue 'scan;
                }
            }
            break;
        }

        outcomes
    }

    fn run_from(&mut self, mut index: usize, mut context: RequestContext) -> ChainOutcome {
        loop {
            if index >= self.actions.len() {
                // Ran out of actions: implicit completion
                return self.complete(context);
            }
            let action = &mut self.actions[index];

            let request = context.id();
            let name = action.name();
            debug!(chain = ?self.kind, request = %request, action = name, "Running action");

            let mut step = ChainStep::new(&self.tracker);
            action.execute(context, &mut step);

            match step.into_transition() {
                Some(Transition::Proceed(next)) => {
                    context = next;
                    index += 1;
                }
                Some(Transition::Complete(done)) => return self.complete(done),
                Some(Transition::Terminate(failed, error)) => return self.terminate(failed, error),
                None => {
                    debug!(chain = ?self.kind, request = %request, action = name, "Chain deferred");
                    return ChainOutcome::Deferred { request };
                }
            }
        }
    }

    fn apply(&mut self, index: usize, transition: Transition) -> ChainOutcome {
        match transition {
            Transition::Proceed(context) => self.proceed(index, context),
            Transition::Complete(context) => self.complete(context),
            Transition::Terminate(context, error) => self.terminate(context, error),
        }
    }

    /// Continue with the action after `index`
    pub fn proceed(&mut self, index: usize, context: RequestContext) -> ChainOutcome {
        self.run_from(index + 1, context)
    }

    /// Success terminal
    pub fn complete(&mut self, context: RequestContext) -> ChainOutcome {
        let request = context.id();
        info!(chain = ?self.kind, request = %request, "Playback chain completed");

        match self.kind {
            // Start action has already published the transition
            ChainKind::StartPlayback => {}
            ChainKind::StopPlayback => {
                if context.current_track().is_some() {
                    self.notifications
                        .publish(PlaybackNotification::TrackTransitioned {
                            previous_track: context.current_track().cloned(),
                            previous_state: context.current_state(),
                            new_track: None,
                            new_state: PlayerState::Stopped,
                        });
                }
            }
            ChainKind::TrackCompleted => {
                self.notifications.publish(PlaybackNotification::GapsComputed {
                    completed_track: context.current_track().cloned(),
                    gaps: context.gaps().to_vec(),
                });
            }
        }

        self.tracker.finish(request);
        ChainOutcome::Completed { request }
    }

    /// Failure terminal: end the sequence and report the error
    pub fn terminate(&mut self, context: RequestContext, error: PlaybackError) -> ChainOutcome {
        let request = context.id();
        warn!(chain = ?self.kind, request = %request, %error, "Playback chain terminated");

        self.sequencer.end();
        self.notifications
            .publish(PlaybackNotification::TrackNotPlayed {
                track: context.current_track().cloned(),
                error: error.clone(),
            });

        self.tracker.finish(request);
        ChainOutcome::Terminated { request, error }
    }
}

impl std::fmt::Debug for PlaybackChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackChain")
            .field("kind", &self.kind)
            .field("actions", &self.action_names())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::MockSequencer;
    use crate::types::PlaybackParams;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    /// Records its own name, then does what it is told
    struct Scripted {
        name: &'static str,
        log: Arc<Mutex<Vec<&'static str>>>,
        behavior: Behavior,
        deferred: Option<RequestContext>,
        release: Arc<AtomicBool>,
    }

    enum Behavior {
        Proceed,
        Complete,
        Terminate,
        Defer,
    }

    impl Scripted {
        fn new(name: &'static str, log: &Arc<Mutex<Vec<&'static str>>>, behavior: Behavior) -> Self {
            Self {
                name,
                log: Arc::clone(log),
                behavior,
                deferred: None,
                release: Arc::new(AtomicBool::new(false)),
            }
        }

        fn released_by(mut self, release: &Arc<AtomicBool>) -> Self {
            self.release = Arc::clone(release);
            self
        }
    }

    impl ChainAction for Scripted {
        fn name(&self) -> &'static str {
            self.name
        }

        fn execute(&mut self, context: RequestContext, chain: &mut dyn ChainControl) {
            self.log.lock().unwrap().push(self.name);
            match self.behavior {
                Behavior::Proceed => chain.proceed(context),
                Behavior::Complete => chain.complete(context),
                Behavior::Terminate => chain.terminate(context, PlaybackError::NoRequestedTrack),
                Behavior::Defer => self.deferred = Some(context),
            }
        }

        fn resume(&mut self, chain: &mut dyn ChainControl) {
            if self.release.load(Ordering::SeqCst) {
                if let Some(context) = self.deferred.take() {
                    chain.proceed(context);
                }
            }
        }
    }

    fn sequencer(ends: usize) -> Arc<dyn Sequencer> {
        let mut sequencer = MockSequencer::new();
        sequencer.expect_end().times(ends).return_const(());
        Arc::new(sequencer)
    }

    fn context() -> RequestContext {
        RequestContext::new(PlayerState::Stopped, None, None, PlaybackParams::default())
    }

    #[test]
    fn actions_run_in_declared_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let bus = Arc::new(NotificationBus::new());
        let mut chain = PlaybackChain::new(
            ChainKind::StartPlayback,
            sequencer(0),
            bus,
            Arc::new(RequestTracker::new()),
        )
        .with_action(Scripted::new("first", &log, Behavior::Proceed))
        .with_action(Scripted::new("second", &log, Behavior::Proceed))
        .with_action(Scripted::new("third", &log, Behavior::Complete));

        let outcome = chain.execute(context());

        assert!(outcome.is_completed());
        assert_eq!(*log.lock().unwrap(), vec!["first", "second", "third"]);
        assert_eq!(chain.action_names(), vec!["first", "second", "third"]);
    }

    #[test]
    fn running_out_of_actions_completes() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let tracker = Arc::new(RequestTracker::new());
        let mut chain = PlaybackChain::new(
            ChainKind::StartPlayback,
            sequencer(0),
            Arc::new(NotificationBus::new()),
            Arc::clone(&tracker),
        )
        .with_action(Scripted::new("only", &log, Behavior::Proceed));

        let outcome = chain.execute(context());

        assert!(outcome.is_completed());
        assert_eq!(tracker.current(), None);
    }

    #[test]
    fn terminate_ends_sequence_and_skips_remaining_actions() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let bus = Arc::new(NotificationBus::new());
        let notifications = bus.subscribe();
        let mut chain = PlaybackChain::new(
            ChainKind::StartPlayback,
            sequencer(1),
            Arc::clone(&bus),
            Arc::new(RequestTracker::new()),
        )
        .with_action(Scripted::new("fails", &log, Behavior::Terminate))
        .with_action(Scripted::new("never", &log, Behavior::Complete));

        let outcome = chain.execute(context());

        assert!(matches!(
            outcome,
            ChainOutcome::Terminated {
                error: PlaybackError::NoRequestedTrack,
                ..
            }
        ));
        assert_eq!(*log.lock().unwrap(), vec!["fails"]);
        let published: Vec<_> = notifications.try_iter().collect();
        assert_eq!(published.len(), 1);
        assert!(matches!(
            published[0],
            PlaybackNotification::TrackNotPlayed {
                error: PlaybackError::NoRequestedTrack,
                ..
            }
        ));
    }

    #[test]
    fn deferred_run_resumes_after_deferring_action() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let release = Arc::new(AtomicBool::new(false));
        let tracker = Arc::new(RequestTracker::new());
        let mut chain = PlaybackChain::new(
            ChainKind::StartPlayback,
            sequencer(0),
            Arc::new(NotificationBus::new()),
            Arc::clone(&tracker),
        )
        .with_action(Scripted::new("waits", &log, Behavior::Defer).released_by(&release))
        .with_action(Scripted::new("finishes", &log, Behavior::Complete));

        let ctx = context();
        let request = ctx.id();
        assert_eq!(chain.execute(ctx), ChainOutcome::Deferred { request });
        assert_eq!(tracker.current(), Some(request));

        // Event not yet observed
        assert!(chain.pump().is_empty());
        assert_eq!(*log.lock().unwrap(), vec!["waits"]);

        release.store(true, Ordering::SeqCst);
        assert_eq!(chain.pump(), vec![ChainOutcome::Completed { request }]);
        assert!(chain.pump().is_empty());
        assert_eq!(*log.lock().unwrap(), vec!["waits", "finishes"]);
        assert_eq!(tracker.current(), None);
    }

    #[test]
    fn completed_chain_publishes_gaps() {
        let bus = Arc::new(NotificationBus::new());
        let notifications = bus.subscribe();
        let mut chain = PlaybackChain::new(
            ChainKind::TrackCompleted,
            sequencer(0),
            Arc::clone(&bus),
            Arc::new(RequestTracker::new()),
        );

        assert!(chain.is_empty());
        assert!(chain.execute(context()).is_completed());
        assert!(matches!(
            notifications.try_recv(),
            Ok(PlaybackNotification::GapsComputed { ref gaps, .. }) if gaps.is_empty()
        ));
    }
}
