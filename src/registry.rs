//! Per-window viewer bookkeeping and event routing.
//!
//! ```text
//!  OS event loop ──▶ ViewerRegistry::route ──▶ viewer by window id
//!                                               │ repaint / resize /
//!                                               ▼ maximize / flip / close
//!                                        rendering backend
//! ```

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::Result;

// ---------------------------------------------------------------------------
// Identifiers and events
// ---------------------------------------------------------------------------

/// Opaque window identifier assigned by the windowing system.
/// Unique and stable for the lifetime of the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowId(pub u32);

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlipAxis {
    Horizontal,
    Vertical,
}

/// Backend-independent event, translated from the windowing system by the
/// event loop before routing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewerEvent {
    /// Global quit request: close every window, stop the loop.
    Quit,
    /// Window was exposed and needs a redraw.
    Redraw(WindowId),
    /// Window was moved; platform decorations must be reapplied.
    Moved(WindowId),
    /// Window close button pressed.
    CloseRequested(WindowId),
    /// Window reached a new size.
    Resized(WindowId),
    /// Primary-button double click inside a window.
    DoubleClick(WindowId),
    /// A file was dropped onto the application.
    Dropped(PathBuf),
    /// Application-level "open file" command.
    OpenRequest,
    /// Flip the window's image across the given axis.
    Flip(WindowId, FlipAxis),
}

// ---------------------------------------------------------------------------
// Capabilities the registry routes to
// ---------------------------------------------------------------------------

/// One open image window. The registry owns implementors exclusively and
/// drops them on close; dropping releases the window and its resources.
pub trait ViewerWindow {
    fn repaint(&mut self) -> Result<()>;
    fn refresh_decorations(&mut self) -> Result<()>;
    fn toggle_maximize(&mut self) -> Result<()>;
    fn flip(&mut self, axis: FlipAxis) -> Result<()>;
    fn source_path(&self) -> &Path;
}

/// Constructs viewers and picks files. Implemented over the real windowing
/// backend by the application; tests substitute a scripted fake.
pub trait ViewerSource<V> {
    /// Build a fully initialized viewer for `path`, keyed by its window id.
    /// Any failure means no viewer was produced.
    fn create(&mut self, path: &Path) -> Result<(WindowId, V)>;

    /// Modal file picker. Empty when the user cancels.
    fn pick(&mut self) -> Vec<PathBuf>;
}

/// A path that could not be opened during a batch, with the reason.
#[derive(Debug)]
pub struct OpenFailure {
    pub path: PathBuf,
    pub reason: anyhow::Error,
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Ownership map from window identifier to viewer, plus the routing policy
/// deciding which viewer an incoming event targets.
pub struct ViewerRegistry<V> {
    viewers: HashMap<WindowId, V>,
    finished: bool,
}

impl<V> Default for ViewerRegistry<V> {
    fn default() -> Self {
        ViewerRegistry {
            viewers: HashMap::new(),
            finished: false,
        }
    }
}

impl<V: ViewerWindow> ViewerRegistry<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.viewers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.viewers.is_empty()
    }

    /// Whether the event loop should terminate.
    pub fn finished(&self) -> bool {
        self.finished
    }

    /// Best-effort batch open: one bad file never blocks the rest.
    /// Failures are logged and returned with the offending path.
    pub fn open<S: ViewerSource<V>>(
        &mut self,
        paths: &[PathBuf],
        source: &mut S,
    ) -> Vec<OpenFailure> {
        let mut failures = Vec::new();
        for path in paths {
            match source.create(path) {
                Ok((id, viewer)) => {
                    log::info!("opened {} in window {id}", path.display());
                    self.viewers.insert(id, viewer);
                }
                Err(reason) => {
                    log::warn!("could not open {}: {reason:#}", path.display());
                    failures.push(OpenFailure {
                        path: path.clone(),
                        reason,
                    });
                }
            }
        }
        failures
    }

    /// Dispatch one event. Quit wins over everything; events addressed to a
    /// window that already closed are dropped.
    pub fn route<S: ViewerSource<V>>(&mut self, event: ViewerEvent, source: &mut S) {
        match event {
            ViewerEvent::Quit => {
                self.close_all();
                self.finished = true;
            }
            ViewerEvent::Redraw(id) | ViewerEvent::Resized(id) => {
                self.with(id, "repaint", |v| v.repaint());
            }
            ViewerEvent::Moved(id) => {
                self.with(id, "decoration refresh", |v| v.refresh_decorations());
            }
            ViewerEvent::CloseRequested(id) => self.close(id),
            ViewerEvent::DoubleClick(id) => {
                self.with(id, "maximize toggle", |v| v.toggle_maximize());
            }
            ViewerEvent::Flip(id, axis) => {
                self.with(id, "flip", |v| v.flip(axis));
            }
            ViewerEvent::Dropped(path) => {
                self.open(std::slice::from_ref(&path), source);
            }
            ViewerEvent::OpenRequest => {
                let picked = source.pick();
                if picked.is_empty() {
                    log::info!("nothing to open");
                } else {
                    self.open(&picked, source);
                }
            }
        }
    }

    /// Repaint a single window, if still open. Called re-entrantly from the
    /// live-resize watch, which must not touch the registry's key set.
    pub fn repaint_window(&mut self, id: WindowId) {
        self.with(id, "repaint", |v| v.repaint());
    }

    /// Remove and drop one viewer. Closing the last one stops the loop.
    pub fn close(&mut self, id: WindowId) {
        match self.viewers.remove(&id) {
            Some(viewer) => {
                log::info!("closed {} (window {id})", viewer.source_path().display());
                if self.viewers.is_empty() {
                    self.finished = true;
                }
            }
            None => log::trace!("close request for already-closed window {id}"),
        }
    }

    /// Drop every viewer. Does not by itself stop the loop.
    pub fn close_all(&mut self) {
        self.viewers.clear();
    }

    fn with(&mut self, id: WindowId, what: &str, op: impl FnOnce(&mut V) -> Result<()>) {
        match self.viewers.get_mut(&id) {
            Some(viewer) => {
                if let Err(err) = op(&mut *viewer) {
                    // Render-path failures are frame-local: log and keep the
                    // viewer open.
                    log::warn!(
                        "{what} failed for {}: {err:#}",
                        viewer.source_path().display()
                    );
                }
            }
            None => log::trace!("dropping {what} event for closed window {id}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[derive(Debug, Default)]
    struct FakeViewer {
        path: PathBuf,
        repaints: usize,
        decorations: usize,
        maximizes: usize,
        flips: Vec<FlipAxis>,
    }

    impl ViewerWindow for FakeViewer {
        fn repaint(&mut self) -> Result<()> {
            self.repaints += 1;
            Ok(())
        }
        fn refresh_decorations(&mut self) -> Result<()> {
            self.decorations += 1;
            Ok(())
        }
        fn toggle_maximize(&mut self) -> Result<()> {
            self.maximizes += 1;
            Ok(())
        }
        fn flip(&mut self, axis: FlipAxis) -> Result<()> {
            self.flips.push(axis);
            Ok(())
        }
        fn source_path(&self) -> &Path {
            &self.path
        }
    }

    struct FakeSource {
        next_id: u32,
        failing: HashSet<PathBuf>,
        picked: Vec<PathBuf>,
    }

    impl FakeSource {
        fn new() -> Self {
            FakeSource {
                next_id: 1,
                failing: HashSet::new(),
                picked: Vec::new(),
            }
        }

        fn failing_on(mut self, path: &str) -> Self {
            self.failing.insert(PathBuf::from(path));
            self
        }
    }

    impl ViewerSource<FakeViewer> for FakeSource {
        fn create(&mut self, path: &Path) -> Result<(WindowId, FakeViewer)> {
            if self.failing.contains(path) {
                anyhow::bail!("decode failed");
            }
            let id = WindowId(self.next_id);
            self.next_id += 1;
            Ok((
                id,
                FakeViewer {
                    path: path.to_path_buf(),
                    ..FakeViewer::default()
                },
            ))
        }

        fn pick(&mut self) -> Vec<PathBuf> {
            std::mem::take(&mut self.picked)
        }
    }

    fn paths(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn batch_open_isolates_failures() {
        let mut source = FakeSource::new().failing_on("b.png");
        let mut registry = ViewerRegistry::new();

        let failures = registry.open(&paths(&["a.png", "b.png", "c.png"]), &mut source);

        assert_eq!(registry.len(), 2);
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].path, PathBuf::from("b.png"));
        assert!(format!("{:#}", failures[0].reason).contains("decode failed"));
    }

    #[test]
    fn close_request_removes_only_the_target() {
        let mut source = FakeSource::new();
        let mut registry = ViewerRegistry::new();
        registry.open(&paths(&["a.png", "b.png"]), &mut source);

        registry.route(ViewerEvent::CloseRequested(WindowId(1)), &mut source);

        assert_eq!(registry.len(), 1);
        assert!(!registry.viewers.contains_key(&WindowId(1)));
        assert!(registry.viewers.contains_key(&WindowId(2)));
        assert!(!registry.finished());
    }

    #[test]
    fn closing_the_last_viewer_stops_the_loop() {
        let mut source = FakeSource::new();
        let mut registry = ViewerRegistry::new();
        registry.open(&paths(&["a.png"]), &mut source);

        registry.route(ViewerEvent::CloseRequested(WindowId(1)), &mut source);

        assert!(registry.is_empty());
        assert!(registry.finished());
    }

    #[test]
    fn events_for_absent_windows_are_dropped() {
        let mut source = FakeSource::new();
        let mut registry = ViewerRegistry::new();
        registry.open(&paths(&["a.png"]), &mut source);

        let ghost = WindowId(99);
        registry.route(ViewerEvent::Redraw(ghost), &mut source);
        registry.route(ViewerEvent::Moved(ghost), &mut source);
        registry.route(ViewerEvent::DoubleClick(ghost), &mut source);
        registry.route(ViewerEvent::CloseRequested(ghost), &mut source);

        assert_eq!(registry.len(), 1);
        assert!(!registry.finished());
    }

    #[test]
    fn stale_close_on_empty_registry_does_not_finish() {
        let mut source = FakeSource::new();
        let mut registry: ViewerRegistry<FakeViewer> = ViewerRegistry::new();

        registry.route(ViewerEvent::CloseRequested(WindowId(7)), &mut source);

        assert!(!registry.finished());
    }

    #[test]
    fn quit_clears_everything_and_stops_the_loop() {
        let mut source = FakeSource::new();
        let mut registry = ViewerRegistry::new();
        registry.open(&paths(&["a.png", "b.png", "c.png"]), &mut source);

        registry.route(ViewerEvent::Quit, &mut source);

        assert!(registry.is_empty());
        assert!(registry.finished());
    }

    #[test]
    fn window_events_reach_the_right_viewer_method() {
        let mut source = FakeSource::new();
        let mut registry = ViewerRegistry::new();
        registry.open(&paths(&["a.png"]), &mut source);
        let id = WindowId(1);

        registry.route(ViewerEvent::Redraw(id), &mut source);
        registry.route(ViewerEvent::Resized(id), &mut source);
        registry.repaint_window(id);
        registry.route(ViewerEvent::Moved(id), &mut source);
        registry.route(ViewerEvent::DoubleClick(id), &mut source);
        registry.route(ViewerEvent::Flip(id, FlipAxis::Horizontal), &mut source);
        registry.route(ViewerEvent::Flip(id, FlipAxis::Vertical), &mut source);

        let viewer = registry.viewers.get(&id).unwrap();
        assert_eq!(viewer.repaints, 3);
        assert_eq!(viewer.decorations, 1);
        assert_eq!(viewer.maximizes, 1);
        assert_eq!(viewer.flips, vec![FlipAxis::Horizontal, FlipAxis::Vertical]);
    }

    #[test]
    fn dropped_file_opens_a_new_viewer() {
        let mut source = FakeSource::new();
        let mut registry: ViewerRegistry<FakeViewer> = ViewerRegistry::new();

        registry.route(ViewerEvent::Dropped(PathBuf::from("d.png")), &mut source);

        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn failed_drop_is_logged_not_fatal() {
        let mut source = FakeSource::new().failing_on("bad.png");
        let mut registry = ViewerRegistry::new();
        registry.open(&paths(&["a.png"]), &mut source);

        registry.route(ViewerEvent::Dropped(PathBuf::from("bad.png")), &mut source);

        assert_eq!(registry.len(), 1);
        assert!(!registry.finished());
    }

    #[test]
    fn open_request_funnels_through_the_picker() {
        let mut source = FakeSource::new();
        source.picked = paths(&["x.png", "y.png"]);
        let mut registry: ViewerRegistry<FakeViewer> = ViewerRegistry::new();

        registry.route(ViewerEvent::OpenRequest, &mut source);
        assert_eq!(registry.len(), 2);

        // Cancelled picker: nothing changes.
        registry.route(ViewerEvent::OpenRequest, &mut source);
        assert_eq!(registry.len(), 2);
    }
}
