// SPDX-License-Identifier: MPL-2.0
//! Application root state and orchestration between the story strip and the
//! viewer.
//!
//! The `App` struct owns the story collection, the viewer session and the
//! decoded images, and translates component messages into collection changes
//! and background tasks (file picking, encoding, decoding).

pub mod config;
mod message;
pub mod paths;
mod subscription;
mod update;
mod view;

pub use message::{Flags, Message};

use crate::domain::{Clock, SystemClock};
use crate::error::UploadError;
use crate::i18n::fluent::I18n;
use crate::media::ImageCache;
use crate::storage::{FileStore, MemoryStore, StoryStorage, StoryStore};
use crate::stories::{Selection, StoryCollection};
use crate::ui::notifications::{self, Notification};
use crate::ui::state::StoryDuration;
use crate::ui::story_viewer;
use crate::ui::theming::ThemeMode;
use iced::{window, Element, Subscription, Task, Theme};
use std::fmt;

/// Root Iced application state.
pub struct App {
    pub i18n: I18n,
    theme_mode: ThemeMode,
    stories: StoryCollection,
    viewer: story_viewer::State,
    /// Index of the story shown in the viewer, `None` while closed.
    selection: Option<Selection>,
    images: ImageCache,
    /// A file is being picked or encoded.
    uploading: bool,
    /// Upload refused by type and not yet acknowledged by the user.
    rejection: Option<UploadError>,
    /// Toast notification manager for user feedback.
    notifications: notifications::Manager,
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("stories", &self.stories.len())
            .field("viewer", &self.viewer.phase())
            .field("selection", &self.selection)
            .field("uploading", &self.uploading)
            .finish()
    }
}

pub const WINDOW_DEFAULT_HEIGHT: u32 = 800;
pub const WINDOW_DEFAULT_WIDTH: u32 = 480;
pub const MIN_WINDOW_HEIGHT: u32 = 480;
pub const MIN_WINDOW_WIDTH: u32 = 320;

/// Builds the window settings.
pub fn window_settings() -> window::Settings {
    window::Settings {
        size: iced::Size::new(WINDOW_DEFAULT_WIDTH as f32, WINDOW_DEFAULT_HEIGHT as f32),
        min_size: Some(iced::Size::new(
            MIN_WINDOW_WIDTH as f32,
            MIN_WINDOW_HEIGHT as f32,
        )),
        ..window::Settings::default()
    }
}

/// Entry point used by `main.rs` to launch the Iced application loop.
pub fn run(flags: Flags) -> iced::Result {
    use std::cell::RefCell;

    // iced 0.14 requires the boot function to be `Fn`; flags are consumed once
    let boot_state = RefCell::new(Some(flags));
    let boot = move || {
        let flags = boot_state.borrow_mut().take().unwrap_or_default();
        App::new(flags)
    };

    iced::application(boot, App::update, App::view)
        .title(App::title)
        .theme(App::theme)
        .window(window_settings())
        .subscription(App::subscription)
        .run()
}

impl App {
    /// Resolves directories, loads settings and the stored collection.
    fn new(flags: Flags) -> (Self, Task<Message>) {
        paths::init_cli_overrides(flags.data_dir.clone(), flags.config_dir.clone());

        let (config, config_warning) = config::load();
        let i18n = I18n::new(flags.lang.clone(), &config);

        let (stories, storage_warning) = match paths::get_app_data_dir() {
            Some(dir) => {
                tracing::info!(dir = %dir.display(), "using data directory");
                let storage = StoryStore::new(FileStore::new(dir));
                (StoryCollection::new(storage, SystemClock), None)
            }
            None => {
                tracing::warn!("no data directory available, stories kept in memory");
                let storage = StoryStore::new(MemoryStore::new());
                (
                    StoryCollection::new(storage, SystemClock),
                    Some("notification-storage-unavailable"),
                )
            }
        };

        let (mut app, task) = Self::with_parts(i18n, &config, stories);

        if let Some(key) = config_warning {
            app.notifications.push(Notification::warning(key));
        }
        if let Some(key) = storage_warning {
            app.notifications.push(Notification::warning(key));
        }

        (app, task)
    }

    /// Builds the application around an existing collection and runs the
    /// first load cycle.
    pub fn with_parts(
        i18n: I18n,
        config: &config::Config,
        stories: StoryCollection,
    ) -> (Self, Task<Message>) {
        let duration = StoryDuration::new(
            config
                .viewer
                .story_duration_secs
                .unwrap_or(config::DEFAULT_STORY_DURATION_SECS),
        );

        let mut viewer = story_viewer::State::new(duration);
        viewer.set_viewport(window_settings().size);

        let mut app = App {
            i18n,
            theme_mode: config.general.theme_mode,
            stories,
            viewer,
            selection: None,
            images: ImageCache::default(),
            uploading: false,
            rejection: None,
            notifications: notifications::Manager::new(),
        };

        let task = update::handle_reload(&mut app.update_context());
        (app, task)
    }

    /// Convenience constructor for a collection with a custom clock.
    pub fn with_storage(
        i18n: I18n,
        config: &config::Config,
        storage: impl StoryStorage + 'static,
        clock: impl Clock + 'static,
    ) -> (Self, Task<Message>) {
        Self::with_parts(i18n, config, StoryCollection::new(storage, clock))
    }

    fn title(&self) -> String {
        self.i18n.tr("window-title")
    }

    fn theme(&self) -> Theme {
        self.theme_mode.theme()
    }

    fn subscription(&self) -> Subscription<Message> {
        Subscription::batch([
            subscription::create_event_subscription(self.viewer.is_open()),
            subscription::create_expiry_subscription(),
            subscription::create_tick_subscription(self.notifications.has_notifications()),
            subscription::create_viewer_subscription(&self.viewer),
        ])
    }

    fn update_context(&mut self) -> update::UpdateContext<'_> {
        update::UpdateContext {
            i18n: &self.i18n,
            stories: &mut self.stories,
            viewer: &mut self.viewer,
            selection: &mut self.selection,
            images: &mut self.images,
            uploading: &mut self.uploading,
            rejection: &mut self.rejection,
            notifications: &mut self.notifications,
        }
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Notification(notification_message) => {
                self.notifications.handle_message(&notification_message);
                Task::none()
            }
            Message::Tick(now) => {
                self.notifications.tick(now);
                Task::none()
            }
            Message::WindowResized(size) => {
                self.viewer.set_viewport(size);
                Task::none()
            }
            message => {
                let mut ctx = self.update_context();
                match message {
                    Message::StoryList(list_message) => {
                        update::handle_story_list_message(&mut ctx, list_message)
                    }
                    Message::Viewer(viewer_message) => {
                        update::handle_viewer_message(&mut ctx, viewer_message)
                    }
                    Message::RecheckExpiry => update::handle_reload(&mut ctx),
                    Message::FileChosen(path) => update::handle_file_chosen(&mut ctx, path),
                    Message::FileDropped(path) => update::handle_file_dropped(&mut ctx, path),
                    Message::UploadEncoded(result) => {
                        update::handle_upload_encoded(&mut ctx, result)
                    }
                    Message::UploadRejectionAcknowledged => {
                        update::handle_upload_rejection_acknowledged(&mut ctx)
                    }
                    Message::ImageDecoded { id, result } => {
                        update::handle_image_decoded(&mut ctx, id, result)
                    }
                    Message::Notification(_) | Message::Tick(_) | Message::WindowResized(_) => {
                        Task::none()
                    }
                }
            }
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        view::view(view::ViewContext {
            i18n: &self.i18n,
            stories: self.stories.stories(),
            images: &self.images,
            uploading: self.uploading,
            viewer: &self.viewer,
            notifications: &self.notifications,
        })
    }

    /// The story collection as currently published.
    #[must_use]
    pub fn stories(&self) -> &StoryCollection {
        &self.stories
    }

    #[must_use]
    pub fn viewer(&self) -> &story_viewer::State {
        &self.viewer
    }

    /// Index of the story shown in the viewer.
    #[must_use]
    pub fn selected_index(&self) -> Option<usize> {
        self.selection.map(Selection::index)
    }

    #[must_use]
    pub fn is_uploading(&self) -> bool {
        self.uploading
    }

    /// Upload refused by type, awaiting acknowledgement.
    #[must_use]
    pub fn pending_rejection(&self) -> Option<&UploadError> {
        self.rejection.as_ref()
    }

    #[must_use]
    pub fn notifications(&self) -> &notifications::Manager {
        &self.notifications
    }

    #[must_use]
    pub fn images(&self) -> &ImageCache {
        &self.images
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ManualClock, StoryId};
    use crate::storage::{KeyValueStore, STORIES_KEY};
    use crate::ui::story_list;
    use crate::ui::story_viewer::{Message as ViewerMessage, Phase};
    use chrono::{Duration as ChronoDuration, TimeZone, Utc};
    use iced::keyboard::key::{Code, Named, Physical};
    use iced::keyboard::{Event as KeyEvent, Key, Location, Modifiers};
    use std::path::PathBuf;
    use std::time::{Duration, Instant};

    const PNG_URL: &str = "data:image/png;base64,iVBORw0KGgo=";

    fn test_app(raw: Option<&str>) -> (App, MemoryStore, ManualClock) {
        let backend = match raw {
            Some(raw) => MemoryStore::with_item(STORIES_KEY, raw),
            None => MemoryStore::new(),
        };
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 5, 2, 12, 0, 0).unwrap());
        let i18n = I18n::new(Some("en-US".into()), &config::Config::default());
        let (app, _task) = App::with_storage(
            i18n,
            &config::Config::default(),
            StoryStore::new(backend.clone()),
            clock.clone(),
        );
        (app, backend, clock)
    }

    fn with_stories(count: usize) -> (App, MemoryStore, ManualClock) {
        let (mut app, backend, clock) = test_app(None);
        for _ in 0..count {
            let _ = app.update(Message::UploadEncoded(Ok(PNG_URL.to_string())));
        }
        (app, backend, clock)
    }

    fn key_press(named: Named, code: Code) -> Message {
        Message::Viewer(ViewerMessage::RawEvent(iced::Event::Keyboard(
            KeyEvent::KeyPressed {
                key: Key::Named(named),
                modified_key: Key::Named(named),
                physical_key: Physical::Code(code),
                location: Location::Standard,
                modifiers: Modifiers::empty(),
                text: None,
                repeat: false,
            },
        )))
    }

    fn stored(backend: &MemoryStore) -> String {
        backend
            .get_item(STORIES_KEY)
            .expect("get")
            .unwrap_or_default()
    }

    #[test]
    fn startup_prunes_expired_stories() {
        let raw = r#"[
            {"id":"old","imageUrl":"data:image/png;base64,","timestamp":"2024-05-01T11:00:00.000Z"},
            {"id":"new","imageUrl":"data:image/png;base64,","timestamp":"2024-05-02T11:00:00.000Z"}
        ]"#;

        let (app, backend, _clock) = test_app(Some(raw));

        assert_eq!(app.stories().len(), 1);
        assert_eq!(app.stories().stories()[0].id, StoryId::new("new"));
        assert!(!stored(&backend).contains("\"old\""));
    }

    #[test]
    fn recheck_prunes_stories_that_aged_out() {
        let (mut app, backend, clock) = with_stories(1);
        clock.advance(ChronoDuration::hours(24));

        let _ = app.update(Message::RecheckExpiry);

        assert!(app.stories().is_empty());
        assert_eq!(stored(&backend), "[]");
    }

    #[test]
    fn corrupt_storage_resets_and_warns() {
        let (app, backend, _clock) = test_app(Some("{not json"));

        assert!(app.stories().is_empty());
        assert_eq!(stored(&backend), "[]");
        assert!(app.notifications().has_notifications());
    }

    #[test]
    fn encoded_upload_is_added_and_persisted() {
        let (app, backend, _clock) = with_stories(1);

        assert_eq!(app.stories().len(), 1);
        assert!(stored(&backend).contains(PNG_URL));
        assert!(!app.is_uploading());
    }

    #[test]
    fn non_image_drop_is_rejected_without_state_change() {
        let (mut app, backend, _clock) = with_stories(1);
        let before = stored(&backend);

        let _ = app.update(Message::FileDropped(PathBuf::from("notes.txt")));

        assert_eq!(app.stories().len(), 1);
        assert_eq!(stored(&backend), before);
        assert!(matches!(
            app.pending_rejection(),
            Some(UploadError::InvalidUploadType { .. })
        ));

        let _ = app.update(Message::UploadRejectionAcknowledged);
        assert!(app.pending_rejection().is_none());
    }

    #[test]
    fn image_drop_starts_encoding() {
        let (mut app, _backend, _clock) = test_app(None);

        let _ = app.update(Message::FileDropped(PathBuf::from("photo.png")));

        assert!(app.is_uploading());
        assert!(app.pending_rejection().is_none());
    }

    #[test]
    fn failed_encode_leaves_collection_unchanged() {
        let (mut app, _backend, _clock) = test_app(None);

        let _ = app.update(Message::UploadEncoded(Err(UploadError::Unreadable(
            "gone".into(),
        ))));

        assert!(app.stories().is_empty());
        assert!(app.notifications().has_notifications());
    }

    #[test]
    fn failed_write_rolls_back_upload() {
        let (mut app, backend, _clock) = test_app(None);
        backend.set_read_only(true);

        let _ = app.update(Message::UploadEncoded(Ok(PNG_URL.to_string())));

        assert!(app.stories().is_empty());
        assert!(app.notifications().has_notifications());
    }

    #[test]
    fn selecting_opens_viewer_with_navigation_context() {
        let (mut app, _backend, _clock) = with_stories(3);

        let _ = app.update(Message::StoryList(story_list::Message::Selected(1)));

        assert_eq!(app.selected_index(), Some(1));
        assert_eq!(app.viewer().phase(), Phase::Playing);
        let nav = app.viewer().navigation();
        assert!(nav.has_prev && nav.has_next);
    }

    #[test]
    fn selecting_out_of_range_is_ignored() {
        let (mut app, _backend, _clock) = with_stories(2);

        let _ = app.update(Message::StoryList(story_list::Message::Selected(5)));

        assert!(!app.viewer().is_open());
        assert_eq!(app.selected_index(), None);
    }

    #[test]
    fn previous_at_first_story_stays() {
        let (mut app, _backend, _clock) = with_stories(2);
        let _ = app.update(Message::StoryList(story_list::Message::Selected(0)));
        let shown = app.viewer().story().cloned();

        let _ = app.update(key_press(Named::ArrowLeft, Code::ArrowLeft));

        assert_eq!(app.selected_index(), Some(0));
        assert_eq!(app.viewer().story().cloned(), shown);
        assert!(app.viewer().is_open());
    }

    #[test]
    fn next_at_last_story_closes_viewer() {
        let (mut app, _backend, _clock) = with_stories(2);
        let _ = app.update(Message::StoryList(story_list::Message::Selected(1)));

        let _ = app.update(key_press(Named::ArrowRight, Code::ArrowRight));

        assert!(!app.viewer().is_open());
        assert_eq!(app.selected_index(), None);
    }

    #[test]
    fn next_moves_to_following_story() {
        let (mut app, _backend, _clock) = with_stories(3);
        let _ = app.update(Message::StoryList(story_list::Message::Selected(0)));

        let _ = app.update(Message::Viewer(ViewerMessage::NextPressed));

        assert_eq!(app.selected_index(), Some(1));
        assert_eq!(
            app.viewer().story(),
            Some(&app.stories().stories()[1].id)
        );
    }

    #[test]
    fn timer_advances_then_closes_at_end() {
        let (mut app, _backend, _clock) = with_stories(2);
        let _ = app.update(Message::StoryList(story_list::Message::Selected(0)));

        // Duration is 5 s; a tick well past that completes the story
        let later = Instant::now() + Duration::from_secs(6);
        let _ = app.update(Message::Viewer(ViewerMessage::Tick(later)));
        assert_eq!(app.selected_index(), Some(1));

        let much_later = later + Duration::from_secs(12);
        let _ = app.update(Message::Viewer(ViewerMessage::Tick(much_later)));
        assert!(!app.viewer().is_open());
    }

    #[test]
    fn confirmed_delete_removes_story_and_closes() {
        let (mut app, backend, _clock) = with_stories(2);
        let _ = app.update(Message::StoryList(story_list::Message::Selected(0)));
        let id = app.stories().stories()[0].id.clone();

        let _ = app.update(Message::Viewer(ViewerMessage::DeletePressed));
        let _ = app.update(Message::Viewer(ViewerMessage::DeleteConfirmed));

        assert!(!app.viewer().is_open());
        assert!(!app.stories().contains(&id));
        assert!(!stored(&backend).contains(id.as_str()));
    }

    #[test]
    fn cancelled_delete_keeps_story() {
        let (mut app, _backend, _clock) = with_stories(1);
        let _ = app.update(Message::StoryList(story_list::Message::Selected(0)));

        let _ = app.update(Message::Viewer(ViewerMessage::DeletePressed));
        let _ = app.update(Message::Viewer(ViewerMessage::DeleteCancelled));

        assert_eq!(app.stories().len(), 1);
        assert_eq!(app.viewer().phase(), Phase::Playing);
    }

    #[test]
    fn prune_of_displayed_story_closes_viewer() {
        let (mut app, _backend, clock) = with_stories(1);
        let _ = app.update(Message::StoryList(story_list::Message::Selected(0)));
        clock.advance(ChronoDuration::hours(25));

        let _ = app.update(Message::RecheckExpiry);

        assert!(!app.viewer().is_open());
    }

    #[test]
    fn prune_before_displayed_story_keeps_it_selected() {
        let (mut app, _backend, clock) = with_stories(1);
        clock.advance(ChronoDuration::hours(12));
        let _ = app.update(Message::UploadEncoded(Ok(PNG_URL.to_string())));
        let _ = app.update(Message::StoryList(story_list::Message::Selected(1)));
        let shown = app.stories().stories()[1].id.clone();
        clock.advance(ChronoDuration::hours(13));

        let _ = app.update(Message::RecheckExpiry);

        assert_eq!(app.stories().len(), 1);
        assert_eq!(app.selected_index(), Some(0));
        assert_eq!(app.viewer().story(), Some(&shown));
        assert!(!app.viewer().navigation().has_prev);
    }

    #[test]
    fn escape_closes_viewer() {
        let (mut app, _backend, _clock) = with_stories(1);
        let _ = app.update(Message::StoryList(story_list::Message::Selected(0)));

        let _ = app.update(key_press(Named::Escape, Code::Escape));

        assert!(!app.viewer().is_open());
    }

    fn touch(event: iced::touch::Event) -> Message {
        Message::Viewer(ViewerMessage::RawEvent(iced::Event::Touch(event)))
    }

    fn swipe_left(app: &mut App, from_x: f32) {
        let id = iced::touch::Finger(1);
        let _ = app.update(touch(iced::touch::Event::FingerPressed {
            id,
            position: iced::Point::new(from_x, 400.0),
        }));
        let _ = app.update(touch(iced::touch::Event::FingerLifted {
            id,
            position: iced::Point::new(from_x - 100.0, 400.0),
        }));
    }

    #[test]
    fn swipe_on_backdrop_after_resize_does_not_navigate() {
        let (mut app, _backend, _clock) = with_stories(2);
        let _ = app.update(Message::StoryList(story_list::Message::Selected(0)));
        let _ = app.update(Message::WindowResized(iced::Size::new(1000.0, 800.0)));

        swipe_left(&mut app, 200.0);
        assert_eq!(app.selected_index(), Some(0));

        swipe_left(&mut app, 600.0);
        assert_eq!(app.selected_index(), Some(1));
    }
}
