use sdl2::video::Window;

// ---------------------------------------------------------------------------
// Native window decorations
// ---------------------------------------------------------------------------

/// Platform decoration hooks. All fire-and-forget and idempotent: the viewer
/// reapplies [`apply_titlebar`](WindowDecorator::apply_titlebar) after every
/// window move, since at least one platform drops the customization then.
pub trait WindowDecorator {
    /// (Re)apply title-bar customization to the window.
    fn apply_titlebar(&self, window: &Window);

    /// Show or hide the native full-screen button.
    fn show_fullscreen_button(&self, window: &Window, visible: bool);

    /// Attach the application menu (Open File, Flip Horizontal/Vertical).
    /// Menu items deliver `MenuCommand` user events to the poll loop.
    fn populate_menu(&self, window: &Window);
}

/// Default decorations: the window keeps whatever the platform gives it.
pub struct StockDecorations;

impl WindowDecorator for StockDecorations {
    fn apply_titlebar(&self, window: &Window) {
        log::trace!("stock titlebar for window #{}", window.id());
    }

    fn show_fullscreen_button(&self, _window: &Window, _visible: bool) {}

    fn populate_menu(&self, _window: &Window) {}
}

/// Decorator for the current platform.
pub fn native() -> &'static dyn WindowDecorator {
    &StockDecorations
}
