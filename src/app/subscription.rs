// SPDX-License-Identifier: MPL-2.0
//! Event and timer subscriptions for the application.
//!
//! Native events are routed differently depending on whether the viewer is
//! open: the story strip only cares about dropped files, the viewer also
//! needs keyboard and touch input.

use super::Message;
use crate::config::RECHECK_INTERVAL_SECS;
use crate::ui::story_viewer;
use iced::{event, time, window, Subscription};
use std::time::Duration;

/// Interval of the notification auto-dismiss tick.
const NOTIFICATION_TICK: Duration = Duration::from_millis(100);

/// Creates the native event subscription.
pub fn create_event_subscription(viewer_open: bool) -> Subscription<Message> {
    if viewer_open {
        event::listen_with(|event, status, _window_id| {
            match &event {
                event::Event::Window(window_event) => window_message(window_event),
                // Touch is observed even when a widget captured it, so a swipe
                // that starts on the story surface is still tracked. The viewer
                // drops touches that start outside its frame.
                event::Event::Touch(_) => {
                    Some(Message::Viewer(story_viewer::Message::RawEvent(event)))
                }
                event::Event::Keyboard(_) => match status {
                    event::Status::Ignored => {
                        Some(Message::Viewer(story_viewer::Message::RawEvent(event)))
                    }
                    event::Status::Captured => None,
                },
                _ => None,
            }
        })
    } else {
        event::listen_with(|event, _status, _window_id| match &event {
            event::Event::Window(window_event) => window_message(window_event),
            _ => None,
        })
    }
}

/// Window events the application reacts to whether or not the viewer is open.
fn window_message(event: &window::Event) -> Option<Message> {
    match event {
        window::Event::FileDropped(path) => Some(Message::FileDropped(path.clone())),
        window::Event::Resized(size) => Some(Message::WindowResized(*size)),
        _ => None,
    }
}

/// Periodic expiry recheck, active for the whole application lifetime.
pub fn create_expiry_subscription() -> Subscription<Message> {
    time::every(Duration::from_secs(RECHECK_INTERVAL_SECS)).map(|_| Message::RecheckExpiry)
}

/// Creates a periodic tick subscription for notification auto-dismiss.
pub fn create_tick_subscription(has_notifications: bool) -> Subscription<Message> {
    if has_notifications {
        time::every(NOTIFICATION_TICK).map(Message::Tick)
    } else {
        Subscription::none()
    }
}

/// Viewer progress timer.
pub fn create_viewer_subscription(viewer: &story_viewer::State) -> Subscription<Message> {
    viewer.subscription().map(Message::Viewer)
}
