use crate::config::ViewerConfig;
use crate::dom;
use crate::error::ViewerError;
use crate::session::{Session, SessionId};
use crate::state::{ContentKind, Direction, PageMetrics, Trigger};
use leptos::logging::{error, log, warn};
use leptos::prelude::*;
use leptos::task::spawn_local;
use wasm_bindgen::JsCast;

/// Handle to the single lightbox on the page. Cheap to copy into event
/// handlers; all state lives in signals owned by the root component.
#[derive(Clone, Copy)]
pub struct Viewer {
    pub session: RwSignal<Option<Session>>,
    pub page: RwSignal<PageMetrics>,
    triggers: StoredValue<Vec<Trigger>>,
    config: StoredValue<ViewerConfig>,
}

impl Viewer {
    pub fn new(config: ViewerConfig) -> Self {
        Self {
            session: RwSignal::new(None),
            page: RwSignal::new(PageMetrics::default()),
            triggers: StoredValue::new(Vec::new()),
            config: StoredValue::new(config),
        }
    }

    pub fn config(&self) -> ViewerConfig {
        self.config.get_value()
    }

    pub fn set_triggers(&self, triggers: Vec<Trigger>) {
        self.triggers.set_value(triggers);
    }

    /// Scan the page for trigger elements and make each one open the viewer
    /// instead of following its link.
    pub fn attach(&self) -> Result<usize, ViewerError> {
        let document = dom::document()?;
        let selector = self.config.with_value(|c| c.trigger_selector.clone());
        let found = dom::scan_triggers(&document, &selector)?;

        let mut triggers = Vec::with_capacity(found.len());
        for (element, trigger) in found {
            let viewer = *self;
            let caption = trigger.caption.clone();
            let url = trigger.url.clone();
            dom::listen(&element, "click", move |ev| {
                ev.prevent_default();
                viewer.show(&caption, &url);
                dom::blur_current_target(&ev);
            })?;
            triggers.push(trigger);
        }

        let count = triggers.len();
        self.set_triggers(triggers);
        log!("lightbox: attached {count} triggers matching {selector:?}");
        Ok(count)
    }

    /// Keep the frame centered while the page moves, and wire keyboard
    /// shortcuts.
    pub fn bind_window(&self) -> Result<(), ViewerError> {
        let window = dom::window()?;
        let viewer = *self;
        dom::listen(&window, "resize", move |_| viewer.position())?;
        dom::listen(&window, "scroll", move |_| viewer.position())?;

        if self.config.with_value(|c| c.keyboard) {
            let document = dom::document()?;
            dom::listen(&document, "keydown", move |ev| {
                let Some(key) = ev.dyn_ref::<web_sys::KeyboardEvent>().map(|k| k.key()) else {
                    return;
                };
                if viewer.session.with_untracked(|s| s.is_none()) {
                    return;
                }
                match key.as_str() {
                    "Escape" => {
                        viewer.remove();
                    }
                    "ArrowLeft" => viewer.navigate(Direction::Previous),
                    "ArrowRight" => viewer.navigate(Direction::Next),
                    _ => {}
                }
            })?;
        }
        Ok(())
    }

    /// Open `url` in the lightbox, replacing whatever is showing.
    pub fn show(&self, caption: &str, url: &str) {
        let opened = self.open(caption, url);
        self.start(opened);
    }

    /// Plan and store a new session. Only touches signals.
    fn open(&self, caption: &str, url: &str) -> Result<Opened, ViewerError> {
        let config = self.config();
        let session = self
            .triggers
            .with_value(|triggers| Session::plan(triggers, caption, url, &config))?;
        let opened = Opened {
            id: session.id,
            kind: session.kind(),
            url: session.url.clone(),
        };
        self.session.set(Some(session));
        Ok(opened)
    }

    fn start(&self, opened: Result<Opened, ViewerError>) {
        let opened = match opened {
            Ok(opened) => opened,
            Err(err) => return self.fail(&err),
        };
        self.position();
        match opened.kind {
            ContentKind::Image => self.load_image(opened.id, opened.url),
            ContentKind::Fragment => self.load_fragment(opened.id, opened.url),
            ContentKind::Unrecognized => warn!("lightbox: no viewer for {}", opened.url),
        }
    }

    fn load_image(&self, id: SessionId, url: String) {
        let viewer = *self;
        spawn_local(async move {
            let loaded = dom::preload_image(&url).await;
            if !viewer.is_current(id) {
                warn!("lightbox: dropping image {url} for superseded session {id}");
                return;
            }
            match loaded {
                Ok(natural) => {
                    viewer.position();
                    let viewport = viewer.page.with_untracked(|p| p.viewport);
                    let config = viewer.config();
                    viewer.update_current(id, |s| s.image_loaded(natural, viewport, &config));
                    viewer.reveal(id);
                }
                Err(err) => viewer.fail(&err),
            }
        });
    }

    fn load_fragment(&self, id: SessionId, url: String) {
        let viewer = *self;
        spawn_local(async move {
            let fetched = dom::fetch_fragment(&url).await;
            if !viewer.is_current(id) {
                warn!("lightbox: dropping fragment {url} for superseded session {id}");
                return;
            }
            match fetched {
                Ok(markup) => {
                    viewer.update_current(id, |s| s.fragment_loaded(markup));
                    viewer.reveal(id);
                }
                Err(err) => viewer.fail(&err),
            }
        });
    }

    fn reveal(&self, id: SessionId) {
        self.position();
        self.update_current(id, Session::reveal);
    }

    /// Re-open the lightbox on the previous or next image of the group.
    pub fn navigate(&self, direction: Direction) {
        if let Some(opened) = self.open_neighbor(direction) {
            self.start(opened);
        }
    }

    fn open_neighbor(&self, direction: Direction) -> Option<Result<Opened, ViewerError>> {
        let neighbor = self
            .session
            .with_untracked(|s| s.as_ref().and_then(|s| s.neighbor(direction)).cloned())?;
        Some(self.open(&neighbor.caption, &neighbor.url))
    }

    /// Fade the frame out, then drop the session. Returns `false` so it can
    /// be used to swallow a click.
    pub fn remove(&self) -> bool {
        let Some(id) = self.begin_close() else {
            return false;
        };
        let viewer = *self;
        let delay = self.config.with_value(|c| c.dismiss_ms);
        spawn_local(async move {
            gloo_timers::future::TimeoutFuture::new(delay).await;
            viewer.finish_close(id);
        });
        false
    }

    fn begin_close(&self) -> Option<SessionId> {
        let id = self.session.with_untracked(|s| s.as_ref().map(|s| s.id))?;
        self.update_current(id, Session::begin_close).then_some(id)
    }

    /// Drop the session once its dismiss animation is over, unless another
    /// session has taken its place meanwhile.
    fn finish_close(&self, id: SessionId) -> bool {
        if !self.is_current(id) {
            return false;
        }
        self.session.set(None);
        true
    }

    pub fn position(&self) {
        self.page.set(dom::page_metrics());
    }

    fn is_current(&self, id: SessionId) -> bool {
        self.session.with_untracked(|s| s.as_ref().is_some_and(|s| s.id == id))
    }

    /// Apply `change` to the live session if it is still `id`.
    fn update_current(&self, id: SessionId, change: impl FnOnce(&mut Session) -> bool) -> bool {
        if !self.is_current(id) {
            return false;
        }
        let mut applied = false;
        self.session.update(|slot| {
            if let Some(session) = slot.as_mut() {
                applied = change(session);
            }
        });
        applied
    }

    fn fail(&self, err: &ViewerError) {
        error!("lightbox: {err}");
        self.rollback();
        dom::alert(&err.to_string());
    }

    fn rollback(&self) {
        self.session.set(None);
    }
}

struct Opened {
    id: SessionId,
    kind: ContentKind,
    url: String,
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Phase;
    use crate::state::Size;

    fn viewer() -> (Owner, Viewer) {
        let owner = Owner::new();
        owner.set();
        let viewer = Viewer::new(ViewerConfig::default());
        viewer.set_triggers(vec![
            Trigger::new("/a.jpg", "A").with_group("g"),
            Trigger::new("/b.jpg", "B").with_group("g"),
            Trigger::new("/c.jpg", "C").with_group("g"),
        ]);
        (owner, viewer)
    }

    fn live(viewer: &Viewer) -> Option<Session> {
        viewer.session.get_untracked()
    }

    mod session_guard_tests {
        use super::*;

        #[test]
        fn opening_replaces_the_live_session() {
            let (_owner, viewer) = viewer();
            let first = viewer.open("A", "/a.jpg").unwrap();
            let second = viewer.open("B", "/b.jpg").unwrap();

            let current = live(&viewer).unwrap();
            assert_ne!(first.id, second.id);
            assert_eq!(current.id, second.id);
            assert_eq!(current.url, "/b.jpg");
        }

        #[test]
        fn superseded_id_cannot_change_live_session() {
            let (_owner, viewer) = viewer();
            let first = viewer.open("A", "/a.jpg").unwrap();
            let second = viewer.open("B", "/b.jpg").unwrap();

            assert!(!viewer.is_current(first.id));
            assert!(viewer.is_current(second.id));
            assert!(!viewer.update_current(first.id, Session::begin_close));

            let current = live(&viewer).unwrap();
            assert_eq!(current.id, second.id);
            assert_eq!(current.phase, Phase::Opening);
        }

        #[test]
        fn late_image_for_old_session_is_dropped() {
            let (_owner, viewer) = viewer();
            let config = ViewerConfig::default();
            let first = viewer.open("A", "/a.jpg").unwrap();
            viewer.open("B", "/b.jpg").unwrap();

            let applied = viewer.update_current(first.id, |s| {
                s.image_loaded(Size::new(100.0, 100.0), Size::new(800.0, 600.0), &config)
            });
            assert!(!applied);
            assert_eq!(live(&viewer).unwrap().frame_size(&config), None);
        }

        #[test]
        fn live_id_applies_changes() {
            let (_owner, viewer) = viewer();
            let config = ViewerConfig::default();
            let opened = viewer.open("A", "/a.jpg").unwrap();

            assert!(viewer.update_current(opened.id, |s| {
                s.image_loaded(Size::new(100.0, 50.0), Size::new(800.0, 600.0), &config)
            }));
            assert_eq!(
                live(&viewer).unwrap().frame_size(&config),
                Some(Size::new(110.0, 60.0))
            );
        }
    }

    mod close_tests {
        use super::*;

        #[test]
        fn close_clears_the_session() {
            let (_owner, viewer) = viewer();
            let opened = viewer.open("A", "/a.jpg").unwrap();

            let closing = viewer.begin_close().unwrap();
            assert_eq!(closing, opened.id);
            assert_eq!(live(&viewer).unwrap().phase, Phase::Closing);

            assert!(viewer.finish_close(closing));
            assert!(live(&viewer).is_none());
        }

        #[test]
        fn dismiss_only_clears_its_own_session() {
            let (_owner, viewer) = viewer();
            viewer.open("A", "/a.jpg").unwrap();
            let closing = viewer.begin_close().unwrap();
            let replacement = viewer.open("B", "/b.jpg").unwrap();

            assert!(!viewer.finish_close(closing));
            let current = live(&viewer).unwrap();
            assert_eq!(current.id, replacement.id);
            assert_eq!(current.phase, Phase::Opening);
        }

        #[test]
        fn closing_twice_is_a_no_op() {
            let (_owner, viewer) = viewer();
            viewer.open("A", "/a.jpg").unwrap();
            assert!(viewer.begin_close().is_some());
            assert!(viewer.begin_close().is_none());
        }

        #[test]
        fn close_without_session_does_nothing() {
            let (_owner, viewer) = viewer();
            assert!(viewer.begin_close().is_none());
            assert!(!viewer.finish_close(SessionId::new()));
        }

        #[test]
        fn rollback_returns_to_closed() {
            let (_owner, viewer) = viewer();
            viewer.open("A", "/a.jpg").unwrap();
            viewer.rollback();
            assert!(live(&viewer).is_none());
        }

        #[test]
        fn failed_plan_does_not_store_a_session() {
            let (_owner, viewer) = viewer();
            let result = viewer.open("Form", "/form.php?width=300");
            assert!(matches!(result, Err(ViewerError::MissingDimension("height"))));
            assert!(live(&viewer).is_none());
        }

        #[test]
        fn unrecognized_url_keeps_backdrop_without_frame() {
            let (_owner, viewer) = viewer();
            let opened = viewer.open("Song", "/song.mp3").unwrap();
            assert_eq!(opened.kind, ContentKind::Unrecognized);

            let current = live(&viewer).unwrap();
            assert!(!current.shows_loading());
            assert_eq!(current.frame_size(&ViewerConfig::default()), None);
        }
    }

    mod navigation_tests {
        use super::*;

        #[test]
        fn next_replaces_session_with_neighbor() {
            let (_owner, viewer) = viewer();
            let first = viewer.open("B", "/b.jpg").unwrap();

            let opened = viewer.open_neighbor(Direction::Next).unwrap().unwrap();
            assert_eq!(opened.url, "/c.jpg");
            assert_ne!(opened.id, first.id);

            let current = live(&viewer).unwrap();
            assert_eq!(current.url, "/c.jpg");
            assert_eq!(current.caption, "C");
            assert_eq!(current.neighbor(Direction::Previous).unwrap().url, "/b.jpg");
        }

        #[test]
        fn previous_walks_back_through_group() {
            let (_owner, viewer) = viewer();
            viewer.open("C", "/c.jpg").unwrap();
            viewer.open_neighbor(Direction::Previous).unwrap().unwrap();
            viewer.open_neighbor(Direction::Previous).unwrap().unwrap();
            assert_eq!(live(&viewer).unwrap().url, "/a.jpg");
        }

        #[test]
        fn end_of_group_leaves_session_alone() {
            let (_owner, viewer) = viewer();
            let last = viewer.open("C", "/c.jpg").unwrap();
            assert!(viewer.open_neighbor(Direction::Next).is_none());
            assert_eq!(live(&viewer).unwrap().id, last.id);
        }

        #[test]
        fn closed_viewer_has_nowhere_to_go() {
            let (_owner, viewer) = viewer();
            assert!(viewer.open_neighbor(Direction::Next).is_none());
        }
    }
}
