/// Texture - image living in GPU memory
///
/// A texture owns one GPU texture object. Its logical size is what the
/// user asked for; its actual size is what was allocated, rounded up to
/// powers of two on devices without NPOT support. Every change of the
/// GPU-visible content gives the texture a new cache id, which is how
/// the pipeline knows whether its texture binding is still current.
///
/// Every operation saves and restores the texture binding of the active
/// unit, so binding caches kept by the pipeline stay truthful.

use glam::UVec2;
use crate::{engine_bail, engine_debug, engine_err, engine_warn};
use crate::error::Result;
use crate::graphics::{Image, IntRect};
use crate::graphics_device::{
    Attachment, DeviceCapabilities, DeviceFeatures, FramebufferTarget, GraphicsDevice,
    SharedContext, TextureFilter, TextureFormat, TextureHandle, TextureWrap,
};
use crate::utils::unique_id::TEXTURE_IDS;

const SOURCE: &str = "galaxy2d::Texture";

pub struct Texture {
    context: SharedContext,
    /// GPU texture object (None until created)
    handle: Option<TextureHandle>,
    /// Logical size
    size: UVec2,
    /// Allocated size (>= size)
    actual_size: UVec2,
    smooth: bool,
    srgb: bool,
    repeated: bool,
    /// Rows are stored bottom-up (content rendered through a framebuffer)
    pixels_flipped: bool,
    /// Color attachment of a render texture
    fbo_attachment: bool,
    has_mipmap: bool,
    /// Identifies the current content, 0 = none
    cache_id: u64,
}

/// Run `f` with `handle` bound on the active unit, then restore the previous binding
fn with_bound<R>(
    device: &mut dyn GraphicsDevice,
    handle: TextureHandle,
    f: impl FnOnce(&mut dyn GraphicsDevice) -> R,
) -> R {
    let previous = device.bound_texture();
    if previous != Some(handle) {
        device.bind_texture(Some(handle));
    }
    let result = f(device);
    if previous != Some(handle) {
        device.bind_texture(previous);
    }
    result
}

impl Texture {
    /// Empty texture; call `create` or `load_from_image` to allocate it
    pub fn new(context: &SharedContext) -> Self {
        Self {
            context: context.clone(),
            handle: None,
            size: UVec2::ZERO,
            actual_size: UVec2::ZERO,
            smooth: false,
            srgb: false,
            repeated: false,
            pixels_flipped: false,
            fbo_attachment: false,
            has_mipmap: false,
            cache_id: TEXTURE_IDS.next_id(),
        }
    }

    /// Texture of the given size, content undefined
    pub fn with_size(context: &SharedContext, width: u32, height: u32) -> Result<Self> {
        let mut texture = Texture::new(context);
        texture.create(width, height)?;
        Ok(texture)
    }

    /// Texture holding `area` of `image` (whole image if `area` is empty)
    pub fn from_image(context: &SharedContext, image: &Image, area: IntRect) -> Result<Self> {
        let mut texture = Texture::new(context);
        texture.load_from_image(image, area)?;
        Ok(texture)
    }

    /// Size a texture must be allocated with on this device
    ///
    /// Saturates at `u32::MAX` when the power of two would not fit.
    pub fn valid_size(capabilities: &DeviceCapabilities, size: u32) -> u32 {
        capabilities.valid_texture_size(size).unwrap_or(u32::MAX)
    }

    /// Largest texture dimension supported by the context's device
    pub fn maximum_size(context: &SharedContext) -> Result<u32> {
        Ok(context.lock()?.capabilities().max_texture_size)
    }

    // ===== CREATION =====

    /// (Re)allocate the texture storage
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` for a zero width or height
    /// - `Unsupported` when the allocation exceeds the maximum texture size
    /// - `ResourceExhausted` when no texture object can be created
    pub fn create(&mut self, width: u32, height: u32) -> Result<()> {
        if width == 0 || height == 0 {
            engine_bail!(SOURCE, InvalidArgument, "Failed to create texture, invalid size ({}x{})", width, height);
        }

        let mut ctx = self.context.lock()?;
        let capabilities = *ctx.capabilities();

        let actual_size = match (
            capabilities.valid_texture_size(width),
            capabilities.valid_texture_size(height),
        ) {
            (Some(w), Some(h)) => UVec2::new(w, h),
            _ => engine_bail!(
                SOURCE,
                Unsupported,
                "Failed to create texture, no power-of-two size can hold {}x{}",
                width, height
            ),
        };
        if actual_size != UVec2::new(width, height) {
            engine_debug!(
                SOURCE,
                "NPOT fallback: {}x{} allocated as {}x{}",
                width, height, actual_size.x, actual_size.y
            );
        }

        let maximum = capabilities.max_texture_size;
        if actual_size.x > maximum || actual_size.y > maximum {
            engine_bail!(
                SOURCE,
                Unsupported,
                "Failed to create texture, its internal size is too high ({}x{}, maximum is {}x{})",
                actual_size.x, actual_size.y, maximum, maximum
            );
        }

        let device = ctx.device_mut();
        let handle = match self.handle {
            Some(handle) => handle,
            None => device
                .create_texture()
                .ok_or_else(|| engine_err!(SOURCE, ResourceExhausted, "Failed to create texture object"))?,
        };
        self.handle = Some(handle);
        self.size = UVec2::new(width, height);
        self.actual_size = actual_size;
        self.pixels_flipped = false;
        self.fbo_attachment = false;

        if self.srgb && !capabilities.supports(DeviceFeatures::TEXTURE_SRGB) {
            engine_warn!(SOURCE, "sRGB textures are not supported, texture will be linear");
            self.srgb = false;
        }

        let format = if self.srgb { TextureFormat::Srgb8Alpha8 } else { TextureFormat::Rgba8 };
        let wrap = self.wrap_mode();
        let filter = self.filter();
        with_bound(device, handle, |device| {
            device.texture_storage(actual_size.x, actual_size.y, format);
            device.set_texture_wrap(wrap);
            device.set_texture_filter(filter, filter);
            device.set_texture_max_level(0);
        });

        self.cache_id = TEXTURE_IDS.next_id();
        self.has_mipmap = false;
        Ok(())
    }

    /// Load `area` of `image`; an empty `area` (or one covering the whole
    /// image) loads everything
    pub fn load_from_image(&mut self, image: &Image, area: IntRect) -> Result<()> {
        let width = image.size().x as i32;
        let height = image.size().y as i32;

        let whole = area.width == 0
            || area.height == 0
            || (area.left <= 0 && area.top <= 0 && area.width >= width && area.height >= height);
        if whole {
            self.create(image.size().x, image.size().y)?;
            return self.update_from_image(image, 0, 0);
        }

        let mut rect = area;
        if rect.left < 0 {
            rect.left = 0;
        }
        if rect.top < 0 {
            rect.top = 0;
        }
        if rect.left.saturating_add(rect.width) > width {
            rect.width = width.saturating_sub(rect.left);
        }
        if rect.top.saturating_add(rect.height) > height {
            rect.height = height.saturating_sub(rect.top);
        }
        if rect.width <= 0 || rect.height <= 0 {
            engine_bail!(
                SOURCE,
                InvalidArgument,
                "Failed to load texture, area ({}, {}, {}, {}) is outside the {}x{} image",
                area.left, area.top, area.width, area.height, width, height
            );
        }

        self.create(rect.width as u32, rect.height as u32)?;
        let handle = self.require_handle()?;
        let filter = self.filter();

        let mut ctx = self.context.lock()?;
        let device = ctx.device_mut();
        with_bound(device, handle, |device| {
            let start = rect.left as usize * 4;
            let end = start + rect.width as usize * 4;
            for row in 0..rect.height {
                let line = &image.row((rect.top + row) as u32)[start..end];
                device.texture_sub_image(0, row as u32, rect.width as u32, 1, line);
            }
            device.set_texture_filter(filter, filter);
        });
        device.flush();

        self.has_mipmap = false;
        Ok(())
    }

    /// Allocate `width` x `height` and upload tightly packed RGBA8 `pixels`
    pub fn load_from_pixels(&mut self, pixels: &[u8], width: u32, height: u32) -> Result<()> {
        self.create(width, height)?;
        self.update_from_pixels(pixels, width, height, 0, 0)
    }

    // ===== UPDATE =====

    /// Replace the whole content with tightly packed RGBA8 `pixels`
    pub fn update(&mut self, pixels: &[u8]) -> Result<()> {
        self.update_from_pixels(pixels, self.size.x, self.size.y, 0, 0)
    }

    /// Replace the `width` x `height` region at (x, y)
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if the region leaves the texture or `pixels` is too short,
    /// `InvalidResource` if the texture was never created.
    pub fn update_from_pixels(&mut self, pixels: &[u8], width: u32, height: u32, x: u32, y: u32) -> Result<()> {
        self.check_region(x, y, width, height)?;
        let required = width as usize * height as usize * 4;
        if pixels.len() < required {
            engine_bail!(SOURCE, InvalidArgument, "Pixel buffer holds {} bytes, region needs {}", pixels.len(), required);
        }
        let handle = self.require_handle()?;
        if width == 0 || height == 0 {
            return Ok(());
        }

        let filter = self.filter();
        let mut ctx = self.context.lock()?;
        let device = ctx.device_mut();
        with_bound(device, handle, |device| {
            device.texture_sub_image(x, y, width, height, &pixels[..required]);
            device.set_texture_filter(filter, filter);
        });
        device.flush();

        self.has_mipmap = false;
        self.pixels_flipped = false;
        self.cache_id = TEXTURE_IDS.next_id();
        Ok(())
    }

    /// Copy `image` to (x, y)
    pub fn update_from_image(&mut self, image: &Image, x: u32, y: u32) -> Result<()> {
        self.update_from_pixels(image.pixels(), image.size().x, image.size().y, x, y)
    }

    /// Copy the content of `source` to (x, y)
    ///
    /// Blits on the GPU when both textures share a context that supports
    /// framebuffer blits, otherwise reads `source` back and uploads it.
    pub fn update_from_texture(&mut self, source: &Texture, x: u32, y: u32) -> Result<()> {
        self.check_region(x, y, source.size.x, source.size.y)?;
        let destination = self.require_handle()?;
        let Some(source_handle) = source.handle else {
            engine_bail!(SOURCE, InvalidResource, "Source texture was never created");
        };

        if self.context.ptr_eq(&source.context) {
            let blit_features = DeviceFeatures::FRAMEBUFFER_OBJECT | DeviceFeatures::FRAMEBUFFER_BLIT;
            let mut ctx = self.context.lock()?;
            if ctx.capabilities().supports(blit_features) {
                let blitted = blit_texture(
                    ctx.device_mut(),
                    source_handle,
                    source.size,
                    source.pixels_flipped,
                    destination,
                    UVec2::new(x, y),
                );
                if blitted {
                    let filter = self.filter();
                    let device = ctx.device_mut();
                    with_bound(device, destination, |device| {
                        device.set_texture_filter(filter, filter);
                    });
                    device.flush();
                    self.has_mipmap = false;
                    self.pixels_flipped = false;
                    self.cache_id = TEXTURE_IDS.next_id();
                    return Ok(());
                }
            }
        }

        let image = source.copy_to_image()?;
        self.update_from_image(&image, x, y)
    }

    /// Copy a `size` region of the bound read framebuffer, from its origin,
    /// to (x, y); the caller holds the context lock
    pub(crate) fn update_from_framebuffer(
        &mut self,
        device: &mut dyn GraphicsDevice,
        x: u32,
        y: u32,
        size: UVec2,
    ) -> Result<()> {
        self.check_region(x, y, size.x, size.y)?;
        let handle = self.require_handle()?;

        let filter = self.filter();
        with_bound(device, handle, |device| {
            device.copy_framebuffer_to_texture(x, y, 0, 0, size.x, size.y);
            device.set_texture_filter(filter, filter);
        });
        device.flush();

        // Framebuffer rows come bottom-up
        self.has_mipmap = false;
        self.pixels_flipped = true;
        self.cache_id = TEXTURE_IDS.next_id();
        Ok(())
    }

    // ===== READ BACK =====

    /// Download the content into an image of the logical size, top row first
    pub fn copy_to_image(&self) -> Result<Image> {
        let Some(handle) = self.handle else {
            return Ok(Image::default());
        };

        let actual = self.actual_size;
        let pixels = {
            let mut ctx = self.context.lock()?;
            with_bound(ctx.device_mut(), handle, |device| device.read_texture(actual.x, actual.y))
        };

        if self.size == actual && !self.pixels_flipped {
            return Image::from_pixels(self.size.x, self.size.y, pixels);
        }

        // Crop the padding and restore top-down row order
        let src_stride = actual.x as usize * 4;
        let dst_stride = self.size.x as usize * 4;
        let mut cropped = Vec::with_capacity(dst_stride * self.size.y as usize);
        for y in 0..self.size.y {
            let src_row = if self.pixels_flipped { self.size.y - 1 - y } else { y } as usize;
            let start = src_row * src_stride;
            cropped.extend_from_slice(&pixels[start..start + dst_stride]);
        }
        Image::from_pixels(self.size.x, self.size.y, cropped)
    }

    // ===== SAMPLING STATE =====

    /// Linear (true) or nearest (false) filtering
    pub fn set_smooth(&mut self, smooth: bool) {
        if smooth == self.smooth {
            return;
        }
        self.smooth = smooth;
        let Some(handle) = self.handle else { return };
        let mag = self.filter();
        let min = self.min_filter();
        if let Ok(mut ctx) = self.context.lock() {
            with_bound(ctx.device_mut(), handle, |device| device.set_texture_filter(mag, min));
        }
    }

    pub fn set_repeated(&mut self, repeated: bool) {
        if repeated == self.repeated {
            return;
        }
        self.repeated = repeated;
        let Some(handle) = self.handle else { return };
        let wrap = self.wrap_mode();
        if let Ok(mut ctx) = self.context.lock() {
            with_bound(ctx.device_mut(), handle, |device| device.set_texture_wrap(wrap));
        }
    }

    /// Store the texture as sRGB; applies on the next `create`
    pub fn set_srgb(&mut self, srgb: bool) {
        self.srgb = srgb;
    }

    /// Build the mipmap chain of the current content
    ///
    /// # Errors
    ///
    /// `Unsupported` without framebuffer object support, `InvalidResource`
    /// if the texture was never created.
    pub fn generate_mipmap(&mut self) -> Result<()> {
        let handle = self.require_handle()?;
        let mut ctx = self.context.lock()?;
        if !ctx.capabilities().supports(DeviceFeatures::FRAMEBUFFER_OBJECT) {
            engine_bail!(SOURCE, Unsupported, "Mipmap generation requires framebuffer object support");
        }
        self.has_mipmap = true;
        let mag = self.filter();
        let min = self.min_filter();
        with_bound(ctx.device_mut(), handle, |device| {
            device.set_texture_max_level(1000);
            device.generate_mipmap();
            device.set_texture_filter(mag, min);
        });
        Ok(())
    }

    /// Drop the mipmap chain (content changed since it was built)
    pub fn invalidate_mipmap(&mut self) {
        if !self.has_mipmap {
            return;
        }
        self.has_mipmap = false;
        let Some(handle) = self.handle else { return };
        let filter = self.filter();
        if let Ok(mut ctx) = self.context.lock() {
            with_bound(ctx.device_mut(), handle, |device| {
                device.set_texture_filter(filter, filter);
                device.set_texture_max_level(0);
            });
        }
    }

    // ===== COPY =====

    /// Exchange contents; both textures get a new cache id
    pub fn swap(&mut self, other: &mut Texture) {
        std::mem::swap(self, other);
        self.cache_id = TEXTURE_IDS.next_id();
        other.cache_id = TEXTURE_IDS.next_id();
    }

    /// New texture with the same settings and a copy of the content
    pub fn try_clone(&self) -> Result<Texture> {
        let mut copy = Texture::new(&self.context);
        copy.smooth = self.smooth;
        copy.srgb = self.srgb;
        copy.repeated = self.repeated;
        if self.handle.is_some() {
            copy.create(self.size.x, self.size.y)?;
            copy.update_from_texture(self, 0, 0)?;
        }
        Ok(copy)
    }

    // ===== ACCESSORS =====

    pub fn size(&self) -> UVec2 {
        self.size
    }

    /// Allocated size, padded on devices without NPOT support
    pub fn actual_size(&self) -> UVec2 {
        self.actual_size
    }

    pub fn handle(&self) -> Option<TextureHandle> {
        self.handle
    }

    pub fn cache_id(&self) -> u64 {
        self.cache_id
    }

    pub fn is_smooth(&self) -> bool {
        self.smooth
    }

    pub fn is_srgb(&self) -> bool {
        self.srgb
    }

    pub fn is_repeated(&self) -> bool {
        self.repeated
    }

    /// Whether rows are stored bottom-up
    pub fn is_flipped(&self) -> bool {
        self.pixels_flipped
    }

    pub fn is_attached_to_fbo(&self) -> bool {
        self.fbo_attachment
    }

    pub fn has_mipmap(&self) -> bool {
        self.has_mipmap
    }

    pub fn context(&self) -> &SharedContext {
        &self.context
    }

    pub(crate) fn set_pixels_flipped(&mut self, flipped: bool) {
        self.pixels_flipped = flipped;
    }

    pub(crate) fn set_fbo_attachment(&mut self, attached: bool) {
        self.fbo_attachment = attached;
    }

    // ===== INTERNALS =====

    fn filter(&self) -> TextureFilter {
        if self.smooth { TextureFilter::Linear } else { TextureFilter::Nearest }
    }

    fn min_filter(&self) -> TextureFilter {
        match (self.has_mipmap, self.smooth) {
            (true, true) => TextureFilter::LinearMipmapLinear,
            (true, false) => TextureFilter::NearestMipmapLinear,
            (false, _) => self.filter(),
        }
    }

    fn wrap_mode(&self) -> TextureWrap {
        if self.repeated { TextureWrap::Repeat } else { TextureWrap::ClampToEdge }
    }

    fn require_handle(&self) -> Result<TextureHandle> {
        match self.handle {
            Some(handle) => Ok(handle),
            None => engine_bail!(SOURCE, InvalidResource, "Texture was never created"),
        }
    }

    fn check_region(&self, x: u32, y: u32, width: u32, height: u32) -> Result<()> {
        let fits = x.checked_add(width).is_some_and(|right| right <= self.size.x)
            && y.checked_add(height).is_some_and(|bottom| bottom <= self.size.y);
        if !fits {
            engine_bail!(
                SOURCE,
                InvalidArgument,
                "Region ({}, {}, {}x{}) is outside the {}x{} texture",
                x, y, width, height, self.size.x, self.size.y
            );
        }
        Ok(())
    }
}

/// Blit `source` into `destination` at `offset` through two temporary
/// framebuffers; framebuffer bindings are restored afterwards
fn blit_texture(
    device: &mut dyn GraphicsDevice,
    source: TextureHandle,
    source_size: UVec2,
    source_flipped: bool,
    destination: TextureHandle,
    offset: UVec2,
) -> bool {
    let (read_fb, draw_fb) = match (device.create_framebuffer(), device.create_framebuffer()) {
        (Some(read_fb), Some(draw_fb)) => (read_fb, draw_fb),
        (read_fb, draw_fb) => {
            for framebuffer in read_fb.into_iter().chain(draw_fb) {
                device.delete_framebuffer(framebuffer);
            }
            engine_warn!(SOURCE, "Cannot create framebuffers for texture copy, falling back to read back");
            return false;
        }
    };

    let previous_read = device.bound_framebuffer(FramebufferTarget::Read);
    let previous_draw = device.bound_framebuffer(FramebufferTarget::Draw);

    device.bind_framebuffer(FramebufferTarget::Read, Some(read_fb));
    device.framebuffer_texture(FramebufferTarget::Read, Attachment::Color0, Some(source));
    device.bind_framebuffer(FramebufferTarget::Draw, Some(draw_fb));
    device.framebuffer_texture(FramebufferTarget::Draw, Attachment::Color0, Some(destination));

    let complete = device.framebuffer_complete(FramebufferTarget::Read)
        && device.framebuffer_complete(FramebufferTarget::Draw);
    if complete {
        let (w, h) = (source_size.x as i32, source_size.y as i32);
        let source_rect = if source_flipped { [0, h, w, 0] } else { [0, 0, w, h] };
        let (x, y) = (offset.x as i32, offset.y as i32);
        device.blit_framebuffer(source_rect, [x, y, x + w, y + h]);
    } else {
        engine_warn!(SOURCE, "Texture copy framebuffers are incomplete, falling back to read back");
    }

    device.bind_framebuffer(FramebufferTarget::Read, previous_read);
    device.bind_framebuffer(FramebufferTarget::Draw, previous_draw);
    device.delete_framebuffer(read_fb);
    device.delete_framebuffer(draw_fb);
    complete
}

impl Drop for Texture {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            if let Ok(mut ctx) = self.context.lock() {
                ctx.device_mut().delete_texture(handle);
            }
        }
    }
}

impl std::fmt::Debug for Texture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Texture")
            .field("handle", &self.handle)
            .field("size", &self.size)
            .field("actual_size", &self.actual_size)
            .field("cache_id", &self.cache_id)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "texture_tests.rs"]
mod tests;
