//! Notification dispatcher: fans progression changes out to subscribers.
//!
//! The ledger only appends `ProgressionNotification` messages while a change
//! is being applied. `dispatch_notifications` drains them in `PostUpdate`,
//! after every reward of the frame has settled, so subscribers always see
//! committed state.

mod dispatcher;
mod view;

pub use dispatcher::*;
pub use view::*;

use {
    bevy::prelude::*, experience::ExperienceLedger, progression_events::ProgressionNotification,
    unlocks::UnlockResolver,
};

pub struct NotificationsPlugin;

impl Plugin for NotificationsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<NotificationDispatcher>().add_systems(
            PostUpdate,
            dispatch_notifications.run_if(
                resource_exists::<ExperienceLedger>.and(resource_exists::<UnlockResolver>),
            ),
        );
    }
}

/// Drains the outbound queue and delivers each notification in order.
pub fn dispatch_notifications(
    mut reader: MessageReader<ProgressionNotification>,
    mut dispatcher: ResMut<NotificationDispatcher>,
    ledger: Res<ExperienceLedger>,
    resolver: Res<UnlockResolver>,
) {
    let view = ProgressView::new(&ledger, &resolver);
    for notification in reader.read() {
        dispatcher.dispatch(notification, &view);
    }
}
