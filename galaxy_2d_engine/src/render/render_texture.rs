/// RenderTexture - render target drawing into a texture
///
/// Drawing goes to a framebuffer object whose color attachment is the
/// owned texture (or a multisample buffer resolved into it). Call
/// `display` once the frame is complete, before the texture is sampled
/// or read back.

use std::ops::{Deref, DerefMut};
use glam::UVec2;
use crate::{engine_debug, engine_err};
use crate::error::Result;
use crate::graphics::ContextSettings;
use crate::graphics_device::SharedContext;
use crate::render::frame_buffer::FrameBuffer;
use crate::render::pipeline::Pipeline;
use crate::render::render_target::{RenderTarget, Surface};
use crate::resource::Texture;

const SOURCE: &str = "galaxy2d::RenderTexture";

pub struct RenderTexture {
    /// Declared first: the framebuffer goes before the texture it renders to
    target: RenderTarget,
    texture: Texture,
}

impl RenderTexture {
    /// Offscreen target of `width` x `height` pixels
    ///
    /// # Errors
    ///
    /// Texture creation errors (zero or oversized dimensions), `Unsupported`
    /// when `settings` asks for anti-aliasing or stencil the device cannot
    /// provide, and framebuffer creation errors. Nothing is left allocated
    /// on failure.
    pub fn new(context: &SharedContext, width: u32, height: u32, settings: &ContextSettings) -> Result<Self> {
        let mut texture = Texture::new(context);
        texture.set_srgb(settings.srgb_capable);
        texture.create(width, height)?;
        texture.set_smooth(false);
        texture.set_fbo_attachment(true);
        let Some(handle) = texture.handle() else {
            return Err(engine_err!(SOURCE, InvalidResource, "Render texture has no GPU storage"));
        };

        let pipeline = Pipeline::acquire(context)?;
        let frame_buffer = {
            let mut ctx = context.lock()?;
            let capabilities = *ctx.capabilities();
            FrameBuffer::create(ctx.device_mut(), &capabilities, width, height, handle, settings)?
        };

        let mut target = RenderTarget::new(
            context,
            pipeline,
            UVec2::new(width, height),
            Surface::Offscreen(frame_buffer),
        );
        target.initialize();
        engine_debug!(SOURCE, "Render texture {} created ({}x{})", target.id(), width, height);

        Ok(Self { target, texture })
    }

    /// Texture holding what was drawn, up to the last `display`
    pub fn texture(&self) -> &Texture {
        &self.texture
    }

    /// Make the drawing done so far visible in the texture
    pub fn display(&mut self) {
        let resolved = self.target.with_active_context(|ctx, surface| {
            if let Surface::Offscreen(frame_buffer) = surface {
                frame_buffer.update_texture(ctx.device_mut());
            }
        });

        if resolved.is_some() {
            // Framebuffer rows come bottom-up
            self.texture.set_pixels_flipped(true);
            self.texture.invalidate_mipmap();
        }
    }

    pub fn set_smooth(&mut self, smooth: bool) {
        self.texture.set_smooth(smooth);
    }

    pub fn is_smooth(&self) -> bool {
        self.texture.is_smooth()
    }

    pub fn set_repeated(&mut self, repeated: bool) {
        self.texture.set_repeated(repeated);
    }

    pub fn is_repeated(&self) -> bool {
        self.texture.is_repeated()
    }

    /// Generate the mipmap levels of the texture from its current content
    pub fn generate_mipmap(&mut self) -> Result<()> {
        self.texture.generate_mipmap()
    }
}

impl Deref for RenderTexture {
    type Target = RenderTarget;

    fn deref(&self) -> &RenderTarget {
        &self.target
    }
}

impl DerefMut for RenderTexture {
    fn deref_mut(&mut self) -> &mut RenderTarget {
        &mut self.target
    }
}

impl std::fmt::Debug for RenderTexture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderTexture")
            .field("target", &self.target)
            .field("texture", &self.texture)
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "render_texture_tests.rs"]
mod tests;
