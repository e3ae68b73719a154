use std::path::{Path, PathBuf};

use anyhow::Result;
use sdl2::pixels::{Color, PixelFormatEnum};
use sdl2::rect::Rect;
use sdl2::render::{Texture, TextureCreator, WindowCanvas};
use sdl2::video::{WindowContext, WindowPos};
use sdl2::VideoSubsystem;

use crate::decor::WindowDecorator;
use crate::error::ViewerError;
use crate::geometry::{fit_inside, Extent};
use crate::loader;
use crate::registry::{FlipAxis, ViewerWindow, WindowId};

// ---------------------------------------------------------------------------
// Viewer: one image, one window
// ---------------------------------------------------------------------------

const BACKDROP: Color = Color::RGB(0xC0, 0xC0, 0xC0);

/// Windows are created at a placeholder size, then resized to the image.
const INITIAL_WIDTH: u32 = 640;
const INITIAL_HEIGHT: u32 = 480;

#[derive(Debug, Default, Clone, Copy)]
struct Orientation {
    horizontal: bool,
    vertical: bool,
}

impl Orientation {
    fn toggle(&mut self, axis: FlipAxis) {
        match axis {
            FlipAxis::Horizontal => self.horizontal = !self.horizontal,
            FlipAxis::Vertical => self.vertical = !self.vertical,
        }
    }
}

/// One open image window: exclusively owns its window, renderer and texture.
/// Either fully constructed or not constructed at all; dropping it releases
/// everything.
pub struct Viewer {
    path: PathBuf,
    video: VideoSubsystem,
    canvas: WindowCanvas,
    _texture_creator: TextureCreator<WindowContext>,
    texture: Texture,
    image_extent: Extent,
    orientation: Orientation,
    maximized: bool,
    decor: &'static dyn WindowDecorator,
}

impl Viewer {
    /// Decode `path` and bring up a window displaying it: sized to the image
    /// (or fit to the usable desktop area when larger), centered, decorated,
    /// painted once.
    pub fn create(
        video: &VideoSubsystem,
        decor: &'static dyn WindowDecorator,
        path: &Path,
    ) -> Result<Viewer> {
        let image = loader::load_image(path)?;

        let title = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let window = video
            .window(&title, INITIAL_WIDTH, INITIAL_HEIGHT)
            .position_centered()
            .resizable()
            .allow_highdpi()
            .build()
            .map_err(|e| ViewerError::Backend(e.to_string()))?;

        let canvas = window
            .into_canvas()
            .accelerated()
            .present_vsync()
            .build()
            .map_err(|e| ViewerError::Backend(e.to_string()))?;

        let texture_creator = canvas.texture_creator();
        let mut texture = texture_creator
            .create_texture_static(
                PixelFormatEnum::RGBA32,
                image.extent.width,
                image.extent.height,
            )
            .map_err(|e| ViewerError::Backend(e.to_string()))?;
        texture
            .update(None, &image.pixels, image.pitch())
            .map_err(|e| ViewerError::Backend(e.to_string()))?;

        let mut viewer = Viewer {
            path: path.to_path_buf(),
            video: video.clone(),
            canvas,
            _texture_creator: texture_creator,
            texture,
            image_extent: image.extent,
            orientation: Orientation::default(),
            maximized: false,
            decor,
        };

        viewer.resize()?;
        viewer.center();
        viewer.decor.apply_titlebar(viewer.canvas.window());
        viewer.decor.show_fullscreen_button(viewer.canvas.window(), true);
        viewer.decor.populate_menu(viewer.canvas.window());
        viewer.redraw()?;

        Ok(viewer)
    }

    pub fn window_id(&self) -> WindowId {
        WindowId(self.canvas.window().id())
    }

    /// Size the window to the image, or to the fit of the image inside the
    /// display's usable bounds when the image is larger than the desktop.
    pub fn resize(&mut self) -> Result<()> {
        let display = self
            .canvas
            .window()
            .display_index()
            .map_err(ViewerError::Backend)?;
        let bounds = self
            .video
            .display_usable_bounds(display)
            .map_err(ViewerError::Backend)?;

        // The usable bounds carry the menu-bar/dock origin; keep clear of it.
        let usable = Extent::new(
            (bounds.width() as i32 - bounds.x()).max(1) as u32,
            (bounds.height() as i32 - bounds.y()).max(1) as u32,
        );

        let target = if self.image_extent.exceeds(usable) {
            let (_, _, w, h) = fit_inside(self.image_extent, usable).to_pixels();
            Extent::new(w.max(1), h.max(1))
        } else {
            self.image_extent
        };

        self.canvas
            .window_mut()
            .set_size(target.width, target.height)
            .map_err(|e| ViewerError::Backend(e.to_string()))?;
        Ok(())
    }

    /// Center the window on its current display.
    pub fn center(&mut self) {
        self.canvas
            .window_mut()
            .set_position(WindowPos::Centered, WindowPos::Centered);
    }

    fn redraw(&mut self) -> Result<(), ViewerError> {
        let (win_w, win_h) = self.canvas.output_size().map_err(ViewerError::Backend)?;
        let dest = fit_inside(self.image_extent, Extent::new(win_w.max(1), win_h.max(1)));
        let (x, y, w, h) = dest.to_pixels();

        self.canvas.set_draw_color(BACKDROP);
        self.canvas.clear();
        self.canvas
            .copy_ex(
                &self.texture,
                None,
                Some(Rect::new(x, y, w.max(1), h.max(1))),
                0.0,
                None,
                self.orientation.horizontal,
                self.orientation.vertical,
            )
            .map_err(ViewerError::Backend)?;
        self.canvas.present();
        Ok(())
    }
}

impl ViewerWindow for Viewer {
    fn repaint(&mut self) -> Result<()> {
        Ok(self.redraw()?)
    }

    fn refresh_decorations(&mut self) -> Result<()> {
        self.decor.apply_titlebar(self.canvas.window());
        Ok(())
    }

    fn toggle_maximize(&mut self) -> Result<()> {
        if self.maximized {
            self.canvas.window_mut().restore();
        } else {
            self.canvas.window_mut().maximize();
        }
        self.maximized = !self.maximized;
        Ok(())
    }

    fn flip(&mut self, axis: FlipAxis) -> Result<()> {
        self.orientation.toggle(axis);
        Ok(self.redraw()?)
    }

    fn source_path(&self) -> &Path {
        &self.path
    }
}
