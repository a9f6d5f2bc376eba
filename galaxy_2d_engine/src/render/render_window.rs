/// RenderWindow - render target drawing to the window back buffer
///
/// The window itself (event loop, OS context, buffer swap) belongs to
/// the windowing layer. This type only needs the surface size, resize
/// notifications and, optionally, a presenter closure that `display`
/// calls to swap buffers.

use std::ops::{Deref, DerefMut};
use glam::UVec2;
use winit::event::WindowEvent;
use crate::{engine_bail, engine_debug};
use crate::error::Result;
use crate::graphics::Image;
use crate::graphics_device::{FramebufferTarget, SharedContext};
use crate::render::pipeline::Pipeline;
use crate::render::render_target::{RenderTarget, Surface};
use crate::resource::Texture;

const SOURCE: &str = "galaxy2d::RenderWindow";

/// Presents the back buffer, typically a buffer swap
pub type Presenter = Box<dyn FnMut() + Send>;

pub struct RenderWindow {
    target: RenderTarget,
    presenter: Option<Presenter>,
}

impl RenderWindow {
    /// Target for a `width` x `height` window surface of `context`
    pub fn new(context: &SharedContext, width: u32, height: u32) -> Result<Self> {
        let pipeline = Pipeline::acquire(context)?;
        let mut target = RenderTarget::new(context, pipeline, UVec2::new(width, height), Surface::Window);
        target.initialize();
        engine_debug!(SOURCE, "Window target {} created ({}x{})", target.id(), width, height);

        Ok(Self { target, presenter: None })
    }

    /// Follow a size change of the window
    ///
    /// The default view is reset to cover the new size; the current view
    /// is re-applied on the next draw.
    pub fn on_resize(&mut self, width: u32, height: u32) {
        self.target.set_size(UVec2::new(width, height));
    }

    /// Forward a window event; returns `true` if it was consumed
    pub fn handle_window_event(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::Resized(size) => {
                self.on_resize(size.width, size.height);
                true
            }
            _ => false,
        }
    }

    pub fn set_presenter(&mut self, presenter: impl FnMut() + Send + 'static) {
        self.presenter = Some(Box::new(presenter));
    }

    /// Finish the frame and hand it to the presenter, if any
    pub fn display(&mut self) {
        let flushed = self.target.with_active_context(|ctx, _| ctx.device_mut().flush());
        if flushed.is_some() {
            if let Some(presenter) = self.presenter.as_mut() {
                presenter();
            }
        }
    }

    /// Copy the whole surface into `texture` at (x, y)
    ///
    /// The texture must belong to the same context and be large enough.
    pub fn to_texture(&mut self, texture: &mut Texture, x: u32, y: u32) -> Result<()> {
        if !texture.context().ptr_eq(self.target.context()) {
            engine_bail!(SOURCE, InvalidArgument, "Texture belongs to another graphics context");
        }

        let size = self.target.size();
        let copied = self.target.with_active_context(|ctx, _| {
            let device = ctx.device_mut();
            device.bind_framebuffer(FramebufferTarget::Read, None);
            texture.update_from_framebuffer(device, x, y, size)
        });

        match copied {
            Some(result) => result,
            None => engine_bail!(SOURCE, BackendError, "Window target could not be activated"),
        }
    }

    /// Capture the whole surface
    pub fn to_image(&mut self) -> Result<Image> {
        let size = self.target.size();
        let mut texture = Texture::with_size(self.target.context(), size.x, size.y)?;
        self.to_texture(&mut texture, 0, 0)?;
        texture.copy_to_image()
    }
}

impl Deref for RenderWindow {
    type Target = RenderTarget;

    fn deref(&self) -> &RenderTarget {
        &self.target
    }
}

impl DerefMut for RenderWindow {
    fn deref_mut(&mut self) -> &mut RenderTarget {
        &mut self.target
    }
}

impl std::fmt::Debug for RenderWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderWindow")
            .field("target", &self.target)
            .field("has_presenter", &self.presenter.is_some())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "render_window_tests.rs"]
mod tests;
