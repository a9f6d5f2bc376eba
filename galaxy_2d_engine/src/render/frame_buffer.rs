/// FrameBuffer - GPU objects behind an offscreen render target
///
/// Without anti-aliasing the target texture is attached directly as the
/// color buffer of one framebuffer. With anti-aliasing drawing goes to a
/// second framebuffer backed by multisample renderbuffers, and
/// `update_texture` resolves it into the texture with a blit.
///
/// The framebuffer does not hold its context: the owning render target
/// passes the locked device in and calls `destroy` before it goes away.

use glam::UVec2;
use crate::{engine_bail, engine_debug, engine_err};
use crate::error::Result;
use crate::graphics::ContextSettings;
use crate::graphics_device::{
    Attachment, DeviceCapabilities, DeviceFeatures, FramebufferHandle, FramebufferTarget,
    GraphicsDevice, RenderbufferFormat, RenderbufferHandle, TextureHandle,
};

const SOURCE: &str = "galaxy2d::FrameBuffer";

#[derive(Debug)]
pub(crate) struct FrameBuffer {
    /// Framebuffer the texture is attached to
    framebuffer: Option<FramebufferHandle>,
    /// Framebuffer drawn into when multisampling
    multisample_framebuffer: Option<FramebufferHandle>,
    depth_stencil_buffer: Option<RenderbufferHandle>,
    /// Multisample color storage
    color_buffer: Option<RenderbufferHandle>,
    size: UVec2,
    texture: TextureHandle,
    multisample: bool,
    stencil: bool,
}

impl FrameBuffer {
    /// Create the attachments of a `width` x `height` target drawing into `texture`
    ///
    /// Framebuffer bindings are restored before returning. On error every
    /// object created by the attempt is deleted.
    ///
    /// # Errors
    ///
    /// `Unsupported` if the device lacks framebuffer objects or a feature the
    /// settings require, `ResourceExhausted` if an object cannot be created,
    /// `BackendError` if the framebuffer is incomplete.
    pub(crate) fn create(
        device: &mut dyn GraphicsDevice,
        capabilities: &DeviceCapabilities,
        width: u32,
        height: u32,
        texture: TextureHandle,
        settings: &ContextSettings,
    ) -> Result<FrameBuffer> {
        if !capabilities.supports(DeviceFeatures::FRAMEBUFFER_OBJECT) {
            engine_bail!(SOURCE, Unsupported, "Offscreen targets need framebuffer objects");
        }
        let antialiasing = settings.antialiasing_level;
        let multisample_features = DeviceFeatures::FRAMEBUFFER_MULTISAMPLE | DeviceFeatures::FRAMEBUFFER_BLIT;
        if antialiasing > 0 && !capabilities.supports(multisample_features) {
            engine_bail!(SOURCE, Unsupported, "Anti-aliased offscreen targets need multisample framebuffers");
        }
        if settings.stencil_bits > 0 && !capabilities.supports(DeviceFeatures::PACKED_DEPTH_STENCIL) {
            engine_bail!(SOURCE, Unsupported, "Stencil attachments need packed depth/stencil buffers");
        }
        if antialiasing > capabilities.max_samples {
            engine_bail!(
                SOURCE,
                Unsupported,
                "Anti-aliasing level {} exceeds the device maximum of {}",
                antialiasing, capabilities.max_samples
            );
        }

        let mut frame_buffer = FrameBuffer {
            framebuffer: None,
            multisample_framebuffer: None,
            depth_stencil_buffer: None,
            color_buffer: None,
            size: UVec2::new(width, height),
            texture,
            multisample: antialiasing > 0,
            stencil: settings.stencil_bits > 0,
        };

        let previous_read = device.bound_framebuffer(FramebufferTarget::Read);
        let previous_draw = device.bound_framebuffer(FramebufferTarget::Draw);

        let result = frame_buffer
            .create_attachments(device, settings)
            .and_then(|()| frame_buffer.create_frame_buffers(device));

        device.bind_framebuffer(FramebufferTarget::Read, previous_read);
        device.bind_framebuffer(FramebufferTarget::Draw, previous_draw);

        match result {
            Ok(()) => {
                engine_debug!(
                    SOURCE,
                    "Framebuffer created ({}x{}, {} samples, stencil {})",
                    width, height, antialiasing, frame_buffer.stencil
                );
                Ok(frame_buffer)
            }
            Err(error) => {
                frame_buffer.destroy(device);
                Err(error)
            }
        }
    }

    /// Renderbuffers for depth / stencil and, when multisampling, color
    fn create_attachments(&mut self, device: &mut dyn GraphicsDevice, settings: &ContextSettings) -> Result<()> {
        let samples = settings.antialiasing_level;
        let depth_format = if self.stencil {
            Some(RenderbufferFormat::Depth24Stencil8)
        } else if settings.depth_bits > 0 {
            Some(RenderbufferFormat::Depth24)
        } else {
            None
        };

        if let Some(format) = depth_format {
            let renderbuffer = device.create_renderbuffer().ok_or_else(|| {
                engine_err!(SOURCE, ResourceExhausted, "Failed to create the depth/stencil buffer")
            })?;
            self.depth_stencil_buffer = Some(renderbuffer);
            device.renderbuffer_storage(renderbuffer, format, samples, self.size.x, self.size.y);
        }

        if self.multisample {
            let renderbuffer = device.create_renderbuffer().ok_or_else(|| {
                engine_err!(SOURCE, ResourceExhausted, "Failed to create the multisample color buffer")
            })?;
            self.color_buffer = Some(renderbuffer);
            let format = if settings.srgb_capable {
                RenderbufferFormat::Srgb8Alpha8
            } else {
                RenderbufferFormat::Rgba8
            };
            device.renderbuffer_storage(renderbuffer, format, samples, self.size.x, self.size.y);
        }
        Ok(())
    }

    fn create_frame_buffers(&mut self, device: &mut dyn GraphicsDevice) -> Result<()> {
        let framebuffer = device.create_framebuffer().ok_or_else(|| {
            engine_err!(SOURCE, ResourceExhausted, "Failed to create the framebuffer")
        })?;
        self.framebuffer = Some(framebuffer);
        device.bind_framebuffer(FramebufferTarget::Both, Some(framebuffer));

        // Depth and stencil live in the multisample framebuffer when there is one
        if !self.multisample {
            if let Some(depth) = self.depth_stencil_buffer {
                device.framebuffer_renderbuffer(FramebufferTarget::Both, self.depth_attachment(), Some(depth));
            }
        }
        device.framebuffer_texture(FramebufferTarget::Both, Attachment::Color0, Some(self.texture));

        if !device.framebuffer_complete(FramebufferTarget::Both) {
            device.bind_framebuffer(FramebufferTarget::Both, None);
            engine_bail!(SOURCE, BackendError, "Framebuffer is incomplete");
        }

        if !self.multisample {
            return Ok(());
        }

        let multisample = device.create_framebuffer().ok_or_else(|| {
            engine_err!(SOURCE, ResourceExhausted, "Failed to create the multisample framebuffer")
        })?;
        self.multisample_framebuffer = Some(multisample);
        device.bind_framebuffer(FramebufferTarget::Both, Some(multisample));

        device.framebuffer_renderbuffer(FramebufferTarget::Both, Attachment::Color0, self.color_buffer);
        if let Some(depth) = self.depth_stencil_buffer {
            device.framebuffer_renderbuffer(FramebufferTarget::Both, self.depth_attachment(), Some(depth));
        }

        if !device.framebuffer_complete(FramebufferTarget::Both) {
            device.bind_framebuffer(FramebufferTarget::Both, None);
            engine_bail!(SOURCE, BackendError, "Multisample framebuffer is incomplete");
        }
        Ok(())
    }

    /// Bind (or unbind) the framebuffer drawing goes to
    pub(crate) fn activate(&mut self, device: &mut dyn GraphicsDevice, active: bool) -> Result<()> {
        if !active {
            device.bind_framebuffer(FramebufferTarget::Both, None);
            return Ok(());
        }

        match self.draw_framebuffer() {
            Some(framebuffer) => {
                device.bind_framebuffer(FramebufferTarget::Both, Some(framebuffer));
                Ok(())
            }
            None => engine_bail!(SOURCE, InvalidResource, "Framebuffer was destroyed"),
        }
    }

    /// Resolve the multisample buffer into the texture; no-op otherwise
    ///
    /// Leaves the draw framebuffer bound.
    pub(crate) fn update_texture(&mut self, device: &mut dyn GraphicsDevice) {
        let (Some(framebuffer), Some(multisample)) = (self.framebuffer, self.multisample_framebuffer) else {
            return;
        };

        let (w, h) = (self.size.x as i32, self.size.y as i32);
        device.bind_framebuffer(FramebufferTarget::Read, Some(multisample));
        device.bind_framebuffer(FramebufferTarget::Draw, Some(framebuffer));
        device.blit_framebuffer([0, 0, w, h], [0, 0, w, h]);
        device.bind_framebuffer(FramebufferTarget::Both, Some(multisample));
    }

    /// Delete every GPU object; safe to call twice
    pub(crate) fn destroy(&mut self, device: &mut dyn GraphicsDevice) {
        for framebuffer in [self.framebuffer.take(), self.multisample_framebuffer.take()].into_iter().flatten() {
            device.delete_framebuffer(framebuffer);
        }
        for renderbuffer in [self.depth_stencil_buffer.take(), self.color_buffer.take()].into_iter().flatten() {
            device.delete_renderbuffer(renderbuffer);
        }
    }

    // ===== ACCESSORS =====

    fn draw_framebuffer(&self) -> Option<FramebufferHandle> {
        if self.multisample { self.multisample_framebuffer } else { self.framebuffer }
    }

    fn depth_attachment(&self) -> Attachment {
        if self.stencil { Attachment::DepthStencil } else { Attachment::Depth }
    }

    #[cfg(test)]
    pub(crate) fn size(&self) -> UVec2 {
        self.size
    }

    #[cfg(test)]
    pub(crate) fn is_multisample(&self) -> bool {
        self.multisample
    }

    #[cfg(test)]
    pub(crate) fn has_stencil(&self) -> bool {
        self.stencil
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "frame_buffer_tests.rs"]
mod tests;
