use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::thread;
use std::time::Duration;

use anyhow::Result;
use sdl2::event::{Event, WindowEvent};
use sdl2::keyboard::Keycode;
use sdl2::mouse::MouseButton;
use sdl2::VideoSubsystem;

use crate::decor::{self, WindowDecorator};
use crate::dialog;
use crate::error::ViewerError;
use crate::registry::{FlipAxis, ViewerEvent, ViewerRegistry, ViewerSource, WindowId};
use crate::viewer::Viewer;

// ---------------------------------------------------------------------------
// Application event loop
// ---------------------------------------------------------------------------

/// One tick of the bounded-wait poll loop, ≈ 60 Hz.
const FRAME_INTERVAL: Duration = Duration::from_millis(1000 / 60);

/// Menu commands delivered through a registered SDL user event. Platform menu
/// glue pushes these; the keyboard accelerators (O, H, V) mirror them.
#[derive(Debug, Clone, Copy)]
pub enum MenuCommand {
    OpenFile,
    FlipHorizontal(u32),
    FlipVertical(u32),
}

impl From<MenuCommand> for ViewerEvent {
    fn from(command: MenuCommand) -> Self {
        match command {
            MenuCommand::OpenFile => ViewerEvent::OpenRequest,
            MenuCommand::FlipHorizontal(id) => {
                ViewerEvent::Flip(WindowId(id), FlipAxis::Horizontal)
            }
            MenuCommand::FlipVertical(id) => ViewerEvent::Flip(WindowId(id), FlipAxis::Vertical),
        }
    }
}

/// Builds real SDL-backed viewers and drives the native file picker.
struct SdlViewerSource {
    video: VideoSubsystem,
    decor: &'static dyn WindowDecorator,
}

impl ViewerSource<Viewer> for SdlViewerSource {
    fn create(&mut self, path: &Path) -> Result<(WindowId, Viewer)> {
        let viewer = Viewer::create(&self.video, self.decor, path)?;
        Ok((viewer.window_id(), viewer))
    }

    fn pick(&mut self) -> Vec<PathBuf> {
        dialog::pick_images()
    }
}

/// Bring up SDL, open the initial viewers, and run the poll loop until the
/// last window closes or quit is requested.
pub fn run(paths: Vec<PathBuf>) -> Result<()> {
    let sdl = sdl2::init().map_err(ViewerError::Backend)?;
    let video = sdl.video().map_err(ViewerError::Backend)?;
    let events = sdl.event().map_err(ViewerError::Backend)?;
    let mut pump = sdl.event_pump().map_err(ViewerError::Backend)?;

    sdl2::hint::set("SDL_RENDER_VSYNC", "1");
    sdl2::hint::set("SDL_RENDER_SCALE_QUALITY", "best");
    sdl2::hint::set("SDL_VIDEO_ALLOW_SCREENSAVER", "1");

    events
        .register_custom_event::<MenuCommand>()
        .map_err(ViewerError::EventRegistration)?;

    let mut source = SdlViewerSource {
        video,
        decor: decor::native(),
    };

    let paths = if paths.is_empty() { source.pick() } else { paths };
    if paths.is_empty() {
        return Err(ViewerError::NoSelection.into());
    }

    let registry = Rc::new(RefCell::new(ViewerRegistry::new()));
    let failures = registry.borrow_mut().open(&paths, &mut source);
    if registry.borrow().is_empty() {
        // The first failure becomes the exit error.
        return Err(match failures.into_iter().next() {
            Some(failure) => failure
                .reason
                .context(format!("could not open {}", failure.path.display())),
            None => ViewerError::NothingOpened.into(),
        });
    }
    log::info!("{} of {} image(s) open", registry.borrow().len(), paths.len());

    // The poll loop only sees the terminal SizeChanged once the user releases
    // an interactive resize; this watch fires during the drag, so repainting
    // here keeps the image tracking the window. Event pushes dispatch watches
    // synchronously: never re-enter a borrow that may already be held.
    let watch_registry = Rc::clone(&registry);
    let _watch = events.add_event_watch(move |event: Event| {
        if let Event::Window {
            window_id,
            win_event: WindowEvent::SizeChanged(..),
            ..
        } = event
        {
            if let Ok(mut registry) = watch_registry.try_borrow_mut() {
                registry.repaint_window(WindowId(window_id));
            }
        }
    });

    while !registry.borrow().finished() {
        while let Some(event) = pump.poll_event() {
            if let Some(event) = translate(event) {
                registry.borrow_mut().route(event, &mut source);
            }
        }
        thread::sleep(FRAME_INTERVAL);
    }

    Ok(())
}

/// Map raw SDL events onto the registry's event vocabulary.
fn translate(event: Event) -> Option<ViewerEvent> {
    match event {
        Event::Quit { .. } => Some(ViewerEvent::Quit),

        Event::Window {
            window_id,
            win_event,
            ..
        } => {
            let id = WindowId(window_id);
            match win_event {
                WindowEvent::Exposed => Some(ViewerEvent::Redraw(id)),
                WindowEvent::Moved(..) => Some(ViewerEvent::Moved(id)),
                WindowEvent::Close => Some(ViewerEvent::CloseRequested(id)),
                WindowEvent::SizeChanged(..) => Some(ViewerEvent::Resized(id)),
                _ => None,
            }
        }

        Event::MouseButtonDown {
            window_id,
            mouse_btn: MouseButton::Left,
            clicks: 2,
            ..
        } => Some(ViewerEvent::DoubleClick(WindowId(window_id))),

        Event::DropFile { filename, .. } => Some(ViewerEvent::Dropped(PathBuf::from(filename))),

        Event::KeyDown {
            window_id,
            keycode: Some(key),
            ..
        } => {
            let command = match key {
                Keycode::Escape => return Some(ViewerEvent::Quit),
                Keycode::O => MenuCommand::OpenFile,
                Keycode::H => MenuCommand::FlipHorizontal(window_id),
                Keycode::V => MenuCommand::FlipVertical(window_id),
                _ => return None,
            };
            Some(command.into())
        }

        event if event.is_user_event() => event
            .as_user_event_type::<MenuCommand>()
            .map(ViewerEvent::from),

        _ => None,
    }
}
