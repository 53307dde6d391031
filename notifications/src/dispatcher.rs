use {
    crate::ProgressView,
    bevy::prelude::*,
    progression_events::{NotificationKind, ProgressionNotification},
    std::panic::{AssertUnwindSafe, catch_unwind},
    thiserror::Error,
};

/// Error a subscriber may return. Logged by the dispatcher, never propagated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct SubscriberError(pub String);

impl From<&str> for SubscriberError {
    fn from(message: &str) -> Self {
        Self(message.to_string())
    }
}

impl From<String> for SubscriberError {
    fn from(message: String) -> Self {
        Self(message)
    }
}

/// An independent observer of progression changes (progress bar, shop tab,
/// popup queue...).
pub trait ProgressionSubscriber: Send + Sync + 'static {
    fn on_notification(
        &mut self,
        notification: &ProgressionNotification,
        view: &ProgressView<'_>,
    ) -> Result<(), SubscriberError>;
}

struct FnSubscriber<F>(F);

impl<F> ProgressionSubscriber for FnSubscriber<F>
where
    F: FnMut(&ProgressionNotification, &ProgressView<'_>) -> Result<(), SubscriberError>
        + Send
        + Sync
        + 'static,
{
    fn on_notification(
        &mut self,
        notification: &ProgressionNotification,
        view: &ProgressView<'_>,
    ) -> Result<(), SubscriberError> {
        (self.0)(notification, view)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct Subscription {
    id: SubscriptionId,
    kinds: Vec<NotificationKind>,
    subscriber: Box<dyn ProgressionSubscriber>,
    failures: u32,
}

/// Delivery counts for one notification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub delivered: usize,
    pub failed: usize,
}

/// Registry of subscribers, keyed by notification kind.
///
/// Delivery order among subscribers of the same kind is unspecified. A
/// subscriber that errors or panics is logged and skipped; the remaining ones
/// still receive the notification.
#[derive(Resource, Default)]
pub struct NotificationDispatcher {
    subscriptions: Vec<Subscription>,
    next_id: u64,
}

impl NotificationDispatcher {
    pub fn subscribe(
        &mut self,
        kinds: &[NotificationKind],
        subscriber: impl ProgressionSubscriber,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscriptions.push(Subscription {
            id,
            kinds: kinds.to_vec(),
            subscriber: Box::new(subscriber),
            failures: 0,
        });
        debug!(?id, ?kinds, "subscriber registered");
        id
    }

    /// Closure flavour of `subscribe`.
    pub fn subscribe_fn<F>(&mut self, kinds: &[NotificationKind], f: F) -> SubscriptionId
    where
        F: FnMut(&ProgressionNotification, &ProgressView<'_>) -> Result<(), SubscriberError>
            + Send
            + Sync
            + 'static,
    {
        self.subscribe(kinds, FnSubscriber(f))
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|s| s.id != id);
        before != self.subscriptions.len()
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// Number of failed deliveries for `id`, `None` if it is not registered.
    pub fn failures(&self, id: SubscriptionId) -> Option<u32> {
        self.subscriptions
            .iter()
            .find(|s| s.id == id)
            .map(|s| s.failures)
    }

    pub fn dispatch(
        &mut self,
        notification: &ProgressionNotification,
        view: &ProgressView<'_>,
    ) -> DispatchReport {
        let kind = notification.kind();
        let mut report = DispatchReport::default();

        for subscription in self
            .subscriptions
            .iter_mut()
            .filter(|s| s.kinds.contains(&kind))
        {
            let subscriber = &mut subscription.subscriber;
            let outcome = catch_unwind(AssertUnwindSafe(|| {
                subscriber.on_notification(notification, view)
            }));

            match outcome {
                Ok(Ok(())) => report.delivered += 1,
                Ok(Err(err)) => {
                    subscription.failures += 1;
                    report.failed += 1;
                    warn!(id = ?subscription.id, ?kind, %err, "subscriber failed");
                }
                Err(_) => {
                    subscription.failures += 1;
                    report.failed += 1;
                    error!(id = ?subscription.id, ?kind, "subscriber panicked");
                }
            }
        }

        trace!(?kind, delivered = report.delivered, failed = report.failed, "dispatched");
        report
    }
}
