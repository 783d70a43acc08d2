// SPDX-License-Identifier: MPL-2.0
//! Story viewer component encapsulating state and update logic.
//!
//! The viewer never touches the collection. It knows the id of the story on
//! screen and whether neighbours exist, and reports navigation and deletion
//! intents through [`Effect`].

use super::progress::{Progress, TICK_INTERVAL};
use super::view::frame_bounds;
use crate::domain::StoryId;
use crate::stories::NavigationContext;
use crate::ui::state::{StoryDuration, SwipeDirection, SwipeState, Ticker};
use iced::{event, keyboard, time, touch, Point, Size, Subscription};
use std::time::Instant;

/// Messages emitted by the viewer widgets and routed native events.
#[derive(Debug, Clone)]
pub enum Message {
    /// Progress timer tick.
    Tick(Instant),
    /// Mouse button or finger pressed on the story.
    PointerPressed,
    /// Mouse button released over the story.
    PointerReleased,
    /// Cursor left the story while pressed.
    PointerLeft,
    /// Keyboard and touch events not captured by a widget.
    RawEvent(event::Event),
    NextPressed,
    PreviousPressed,
    ClosePressed,
    DeletePressed,
    DeleteCancelled,
    DeleteConfirmed,
}

/// Side effects the application should perform after handling a viewer message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    NavigateNext,
    NavigatePrevious,
    Close,
    /// Delete the story with this id, then close the viewer.
    DeleteAndClose(StoryId),
}

/// Viewer session phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Playing,
    /// The user is pressing or touching the story.
    Paused,
    /// The delete confirmation dialog is open. Also pauses the timer.
    ConfirmingDelete,
    Closed,
}

/// Complete viewer component state.
#[derive(Debug, Clone)]
pub struct State {
    story: Option<StoryId>,
    navigation: NavigationContext,
    phase: Phase,
    progress: Progress,
    ticker: Ticker,
    swipe: SwipeState,
    /// Window size the frame is laid out in, `None` until first known.
    viewport: Option<Size>,
}

impl Default for State {
    fn default() -> Self {
        Self::new(StoryDuration::default())
    }
}

impl State {
    /// Creates a closed viewer.
    #[must_use]
    pub fn new(duration: StoryDuration) -> Self {
        Self {
            story: None,
            navigation: NavigationContext::default(),
            phase: Phase::Closed,
            progress: Progress::new(duration),
            ticker: Ticker::new(TICK_INTERVAL),
            swipe: SwipeState::default(),
            viewport: None,
        }
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.phase != Phase::Closed
    }

    #[must_use]
    pub fn story(&self) -> Option<&StoryId> {
        self.story.as_ref()
    }

    #[must_use]
    pub fn navigation(&self) -> NavigationContext {
        self.navigation
    }

    #[must_use]
    pub fn progress(&self) -> Progress {
        self.progress
    }

    /// Records the window size so touches outside the story frame are ignored.
    pub fn set_viewport(&mut self, size: Size) {
        self.viewport = Some(size);
    }

    /// Opens the viewer on `story`, starting the timer at `now`.
    pub fn open(&mut self, story: StoryId, navigation: NavigationContext, now: Instant) {
        self.story = Some(story);
        self.navigation = navigation;
        self.restart(now);
    }

    /// Displays `story`.
    ///
    /// A different story restarts progress and playback. The same story only
    /// refreshes the navigation context.
    pub fn show(&mut self, story: StoryId, navigation: NavigationContext, now: Instant) {
        self.navigation = navigation;
        if self.story.as_ref() != Some(&story) || self.phase == Phase::Closed {
            self.story = Some(story);
            self.restart(now);
        }
    }

    /// Closes the viewer and stops its timer.
    pub fn close(&mut self) {
        self.phase = Phase::Closed;
        self.story = None;
        self.ticker.cancel();
        self.swipe.cancel();
        self.progress.reset();
    }

    pub fn handle_message(&mut self, message: Message) -> Effect {
        if self.phase == Phase::Closed {
            return Effect::None;
        }

        match message {
            Message::Tick(now) => self.handle_tick(now),
            Message::PointerPressed => {
                self.pause();
                Effect::None
            }
            Message::PointerReleased | Message::PointerLeft => {
                self.resume();
                Effect::None
            }
            Message::RawEvent(event) => self.handle_raw_event(event),
            Message::NextPressed => Effect::NavigateNext,
            Message::PreviousPressed => Effect::NavigatePrevious,
            Message::ClosePressed => Effect::Close,
            Message::DeletePressed => {
                self.phase = Phase::ConfirmingDelete;
                self.ticker.cancel();
                Effect::None
            }
            Message::DeleteCancelled => {
                if self.phase == Phase::ConfirmingDelete {
                    self.phase = Phase::Playing;
                    self.ticker.start();
                }
                Effect::None
            }
            Message::DeleteConfirmed => match (self.phase, self.story.clone()) {
                (Phase::ConfirmingDelete, Some(id)) => Effect::DeleteAndClose(id),
                _ => Effect::None,
            },
        }
    }

    /// Periodic progress timer, active only while playing.
    pub fn subscription(&self) -> Subscription<Message> {
        if self.phase == Phase::Playing {
            time::every(TICK_INTERVAL).map(Message::Tick)
        } else {
            Subscription::none()
        }
    }

    fn restart(&mut self, now: Instant) {
        self.phase = Phase::Playing;
        self.progress.reset();
        self.swipe.cancel();
        self.ticker.start_at(now);
    }

    fn pause(&mut self) {
        if self.phase == Phase::Playing {
            self.phase = Phase::Paused;
            self.ticker.cancel();
        }
    }

    fn resume(&mut self) {
        if self.phase == Phase::Paused {
            self.phase = Phase::Playing;
            self.ticker.start();
        }
    }

    fn handle_tick(&mut self, now: Instant) -> Effect {
        if self.phase != Phase::Playing {
            return Effect::None;
        }

        let ticks = self.ticker.poll(now);
        if ticks == 0 || !self.progress.advance(ticks) {
            return Effect::None;
        }

        self.progress.reset();
        if self.navigation.has_next {
            Effect::NavigateNext
        } else {
            Effect::Close
        }
    }

    fn handle_raw_event(&mut self, event: event::Event) -> Effect {
        match event {
            event::Event::Keyboard(keyboard_event) => self.handle_keyboard(keyboard_event),
            event::Event::Touch(touch_event) => self.handle_touch(touch_event),
            _ => Effect::None,
        }
    }

    fn handle_keyboard(&mut self, event: keyboard::Event) -> Effect {
        if self.phase == Phase::ConfirmingDelete {
            return Effect::None;
        }

        match event {
            keyboard::Event::KeyPressed {
                key: keyboard::Key::Named(keyboard::key::Named::ArrowRight),
                ..
            } => Effect::NavigateNext,
            keyboard::Event::KeyPressed {
                key: keyboard::Key::Named(keyboard::key::Named::ArrowLeft),
                ..
            } => Effect::NavigatePrevious,
            keyboard::Event::KeyPressed {
                key: keyboard::Key::Named(keyboard::key::Named::Escape),
                ..
            } => Effect::Close,
            _ => Effect::None,
        }
    }

    fn on_story(&self, position: Point) -> bool {
        self.viewport
            .is_none_or(|viewport| frame_bounds(viewport).contains(position))
    }

    fn handle_touch(&mut self, event: touch::Event) -> Effect {
        match event {
            touch::Event::FingerPressed { id, position } => {
                if !self.on_story(position) {
                    return Effect::None;
                }
                self.swipe.begin(id, position);
                self.pause();
                Effect::None
            }
            touch::Event::FingerMoved { .. } => Effect::None,
            touch::Event::FingerLifted { id, position } => {
                if !self.swipe.is_down(id) {
                    return Effect::None;
                }
                let direction = self.swipe.finish(id, position);
                if !self.swipe.is_touching() {
                    self.resume();
                }
                if self.phase == Phase::ConfirmingDelete {
                    return Effect::None;
                }
                match direction {
                    Some(SwipeDirection::Left) => Effect::NavigateNext,
                    Some(SwipeDirection::Right) => Effect::NavigatePrevious,
                    None => Effect::None,
                }
            }
            touch::Event::FingerLost { id, .. } => {
                if !self.swipe.is_down(id) {
                    return Effect::None;
                }
                self.swipe.lose(id);
                if !self.swipe.is_touching() {
                    self.resume();
                }
                Effect::None
            }
        }
    }
}
