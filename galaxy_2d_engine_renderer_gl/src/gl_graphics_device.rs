/// GlGraphicsDevice - glow implementation of the GraphicsDevice trait
///
/// Translates engine commands one to one into GL calls. Bindings the core
/// queries (textures per unit, vertex buffer and array, program,
/// framebuffers) are shadowed on the CPU, so queries never round-trip to
/// the driver. The shadow is only truthful as long as every GL call on the
/// context goes through this device.

use galaxy_2d_engine::galaxy2d::device::{
    Attachment, BufferHandle, BufferUsage, Capability, DeviceCapabilities, DeviceFeatures,
    FramebufferHandle, FramebufferTarget, GraphicsDevice, ProgramHandle, RenderbufferFormat,
    RenderbufferHandle, TextureFilter, TextureFormat, TextureHandle, TextureWrap, UniformLocation,
    UniformValue, VertexArrayHandle,
};
use galaxy_2d_engine::galaxy2d::graphics::{
    BlendEquation, BlendFactor, IntRect, PrimitiveType, VertexAttribute,
};
use galaxy_2d_engine::galaxy2d::Result;
use galaxy_2d_engine::{engine_bail, engine_debug, engine_err, engine_error, engine_info, engine_warn};
use glow::{HasContext, PixelPackData, PixelUnpackData};
use rustc_hash::FxHashMap;

use crate::gl_capabilities::{
    build_capabilities, detect_features, supports_vertex_arrays, GlLimits, GlVersion,
};
use crate::gl_conversions::*;

const SOURCE: &str = "galaxy2d::gl";

// ============================================================================
// Handle conversions
// ============================================================================

macro_rules! native_handle {
    ($to_native:ident, $from_native:ident, $handle:ident, $native:ident) => {
        fn $to_native(handle: $handle) -> glow::$native {
            glow::$native(handle.0)
        }

        fn $from_native(native: glow::$native) -> $handle {
            $handle(native.0)
        }
    };
}

// Engine handles wrap the same non-zero names glow does
native_handle!(texture_to_native, texture_from_native, TextureHandle, NativeTexture);
native_handle!(buffer_to_native, buffer_from_native, BufferHandle, NativeBuffer);
native_handle!(vertex_array_to_native, vertex_array_from_native, VertexArrayHandle, NativeVertexArray);
native_handle!(program_to_native, program_from_native, ProgramHandle, NativeProgram);
native_handle!(framebuffer_to_native, framebuffer_from_native, FramebufferHandle, NativeFramebuffer);
native_handle!(renderbuffer_to_native, renderbuffer_from_native, RenderbufferHandle, NativeRenderbuffer);

// ============================================================================
// GlGraphicsDevice
// ============================================================================

/// OpenGL / OpenGL ES device on top of a glow context
///
/// The context must be current on the calling thread for every command.
/// Making it current (and swapping buffers) stays with the windowing code
/// that created it.
pub struct GlGraphicsDevice {
    gl: glow::Context,
    version: GlVersion,
    capabilities: DeviceCapabilities,

    // Shadowed bindings
    active_unit: u32,
    unit_textures: FxHashMap<u32, TextureHandle>,
    vertex_buffer: Option<BufferHandle>,
    vertex_array: Option<VertexArrayHandle>,
    program: Option<ProgramHandle>,
    read_framebuffer: Option<FramebufferHandle>,
    draw_framebuffer: Option<FramebufferHandle>,
}

// SAFETY: the device is only ever used through `SharedContext`, whose mutex
// serializes access; callers keep the GL context current on the thread that
// holds the lock.
unsafe impl Send for GlGraphicsDevice {}

impl GlGraphicsDevice {
    /// Wrap a glow context and detect its capabilities
    ///
    /// # Errors
    ///
    /// Returns `Unsupported` if the context has no vertex array objects
    /// (desktop GL < 3.0 or ES < 3.0 without the extension).
    pub fn new(gl: glow::Context) -> Result<Self> {
        let version = {
            let v = gl.version();
            GlVersion { major: v.major, minor: v.minor, embedded: v.is_embedded }
        };
        let extensions = gl.supported_extensions();

        if !supports_vertex_arrays(version, extensions) {
            engine_bail!(SOURCE, Unsupported, "{} has no vertex array objects", version);
        }

        let features = detect_features(version, extensions);
        let limits = unsafe {
            GlLimits {
                max_texture_size: gl.get_parameter_i32(glow::MAX_TEXTURE_SIZE),
                max_samples: if features.contains(DeviceFeatures::FRAMEBUFFER_MULTISAMPLE) {
                    gl.get_parameter_i32(glow::MAX_SAMPLES)
                } else {
                    0
                },
                max_texture_units: gl.get_parameter_i32(glow::MAX_TEXTURE_IMAGE_UNITS),
            }
        };
        let capabilities = build_capabilities(features, limits);

        unsafe {
            // Pixel rows are tightly packed RGBA8
            gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, 1);
            gl.pixel_store_i32(glow::PACK_ALIGNMENT, 1);
        }

        engine_info!(
            SOURCE,
            "{} device ready (max texture size {}, max samples {}, {} texture units)",
            version, capabilities.max_texture_size, capabilities.max_samples, capabilities.max_texture_units
        );
        engine_debug!(SOURCE, "Detected features: {:?}", capabilities.features);

        Ok(Self {
            gl,
            version,
            capabilities,
            active_unit: 0,
            unit_textures: FxHashMap::default(),
            vertex_buffer: None,
            vertex_array: None,
            program: None,
            read_framebuffer: None,
            draw_framebuffer: None,
        })
    }

    /// The wrapped glow context
    pub fn gl(&self) -> &glow::Context {
        &self.gl
    }

    pub fn version(&self) -> GlVersion {
        self.version
    }

    fn compile_shader(&self, kind: u32, source: &str) -> Result<glow::Shader> {
        let stage = if kind == glow::VERTEX_SHADER { "vertex" } else { "fragment" };
        unsafe {
            let shader = self.gl.create_shader(kind).map_err(|e| {
                engine_err!(SOURCE, ResourceExhausted, "Failed to create {} shader: {}", stage, e)
            })?;
            self.gl.shader_source(shader, source);
            self.gl.compile_shader(shader);
            if !self.gl.get_shader_compile_status(shader) {
                let log = self.gl.get_shader_info_log(shader);
                self.gl.delete_shader(shader);
                engine_bail!(SOURCE, BackendError, "Failed to compile {} shader: {}", stage, log);
            }
            Ok(shader)
        }
    }
}

impl GraphicsDevice for GlGraphicsDevice {
    fn capabilities(&self) -> DeviceCapabilities {
        self.capabilities
    }

    // ===== FIXED-FUNCTION STATE =====

    fn set_enabled(&mut self, capability: Capability, enabled: bool) {
        let cap = capability_to_gl(capability);
        unsafe {
            if enabled {
                self.gl.enable(cap);
            } else {
                self.gl.disable(cap);
            }
        }
    }

    fn blend_func(&mut self, src: BlendFactor, dst: BlendFactor) {
        unsafe { self.gl.blend_func(blend_factor_to_gl(src), blend_factor_to_gl(dst)) };
    }

    fn blend_func_separate(
        &mut self,
        color_src: BlendFactor,
        color_dst: BlendFactor,
        alpha_src: BlendFactor,
        alpha_dst: BlendFactor,
    ) {
        unsafe {
            self.gl.blend_func_separate(
                blend_factor_to_gl(color_src),
                blend_factor_to_gl(color_dst),
                blend_factor_to_gl(alpha_src),
                blend_factor_to_gl(alpha_dst),
            );
        }
    }

    fn blend_equation(&mut self, equation: BlendEquation) {
        unsafe { self.gl.blend_equation(blend_equation_to_gl(equation)) };
    }

    fn blend_equation_separate(&mut self, color: BlendEquation, alpha: BlendEquation) {
        unsafe {
            self.gl.blend_equation_separate(blend_equation_to_gl(color), blend_equation_to_gl(alpha));
        }
    }

    fn viewport(&mut self, rect: IntRect) {
        unsafe { self.gl.viewport(rect.left, rect.top, rect.width, rect.height) };
    }

    fn clear(&mut self, color: [f32; 4]) {
        unsafe {
            self.gl.clear_color(color[0], color[1], color[2], color[3]);
            self.gl.clear(glow::COLOR_BUFFER_BIT);
        }
    }

    fn flush(&mut self) {
        unsafe { self.gl.flush() };
    }

    // ===== TEXTURES =====

    fn create_texture(&mut self) -> Option<TextureHandle> {
        match unsafe { self.gl.create_texture() } {
            Ok(texture) => Some(texture_from_native(texture)),
            Err(e) => {
                engine_error!(SOURCE, "glGenTextures failed: {}", e);
                None
            }
        }
    }

    fn delete_texture(&mut self, texture: TextureHandle) {
        self.unit_textures.retain(|_, bound| *bound != texture);
        unsafe { self.gl.delete_texture(texture_to_native(texture)) };
    }

    fn active_texture(&mut self, unit: u32) {
        if unit >= self.capabilities.max_texture_units {
            engine_warn!(SOURCE, "Texture unit {} out of range", unit);
            return;
        }
        self.active_unit = unit;
        unsafe { self.gl.active_texture(glow::TEXTURE0 + unit) };
    }

    fn bind_texture(&mut self, texture: Option<TextureHandle>) {
        match texture {
            Some(texture) => self.unit_textures.insert(self.active_unit, texture),
            None => self.unit_textures.remove(&self.active_unit),
        };
        unsafe { self.gl.bind_texture(glow::TEXTURE_2D, texture.map(texture_to_native)) };
    }

    fn bound_texture(&self) -> Option<TextureHandle> {
        self.unit_textures.get(&self.active_unit).copied()
    }

    fn texture_storage(&mut self, width: u32, height: u32, format: TextureFormat) {
        unsafe {
            self.gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                texture_format_to_gl(format) as i32,
                gl_int(width),
                gl_int(height),
                0,
                glow::RGBA,
                glow::UNSIGNED_BYTE,
                PixelUnpackData::Slice(None),
            );
        }
    }

    fn texture_sub_image(&mut self, x: u32, y: u32, width: u32, height: u32, pixels: &[u8]) {
        unsafe {
            self.gl.tex_sub_image_2d(
                glow::TEXTURE_2D,
                0,
                gl_int(x),
                gl_int(y),
                gl_int(width),
                gl_int(height),
                glow::RGBA,
                glow::UNSIGNED_BYTE,
                PixelUnpackData::Slice(Some(pixels)),
            );
        }
    }

    fn set_texture_filter(&mut self, mag: TextureFilter, min: TextureFilter) {
        unsafe {
            self.gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MAG_FILTER, texture_filter_to_gl(mag) as i32);
            self.gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MIN_FILTER, texture_filter_to_gl(min) as i32);
        }
    }

    fn set_texture_wrap(&mut self, wrap: TextureWrap) {
        let wrap = texture_wrap_to_gl(wrap) as i32;
        unsafe {
            self.gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_S, wrap);
            self.gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_T, wrap);
        }
    }

    fn set_texture_max_level(&mut self, level: u32) {
        unsafe { self.gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MAX_LEVEL, gl_int(level)) };
    }

    fn generate_mipmap(&mut self) {
        unsafe { self.gl.generate_mipmap(glow::TEXTURE_2D) };
    }

    fn read_texture(&mut self, width: u32, height: u32) -> Vec<u8> {
        let mut pixels = vec![0u8; width as usize * height as usize * 4];
        let Some(texture) = self.bound_texture() else {
            engine_warn!(SOURCE, "read_texture with no texture bound");
            return pixels;
        };

        // ES has no glGetTexImage: read through a temporary framebuffer
        unsafe {
            let framebuffer = match self.gl.create_framebuffer() {
                Ok(framebuffer) => framebuffer,
                Err(e) => {
                    engine_error!(SOURCE, "Failed to create read-back framebuffer: {}", e);
                    return pixels;
                }
            };
            self.gl.bind_framebuffer(glow::READ_FRAMEBUFFER, Some(framebuffer));
            self.gl.framebuffer_texture_2d(
                glow::READ_FRAMEBUFFER,
                glow::COLOR_ATTACHMENT0,
                glow::TEXTURE_2D,
                Some(texture_to_native(texture)),
                0,
            );
            self.gl.read_pixels(
                0,
                0,
                gl_int(width),
                gl_int(height),
                glow::RGBA,
                glow::UNSIGNED_BYTE,
                PixelPackData::Slice(Some(&mut pixels)),
            );
            self.gl.bind_framebuffer(glow::READ_FRAMEBUFFER, self.read_framebuffer.map(framebuffer_to_native));
            self.gl.delete_framebuffer(framebuffer);
        }
        pixels
    }

    fn copy_framebuffer_to_texture(
        &mut self,
        x: u32,
        y: u32,
        src_x: i32,
        src_y: i32,
        width: u32,
        height: u32,
    ) {
        unsafe {
            self.gl.copy_tex_sub_image_2d(
                glow::TEXTURE_2D,
                0,
                gl_int(x),
                gl_int(y),
                src_x,
                src_y,
                gl_int(width),
                gl_int(height),
            );
        }
    }

    // ===== BUFFERS =====

    fn create_buffer(&mut self) -> Option<BufferHandle> {
        match unsafe { self.gl.create_buffer() } {
            Ok(buffer) => Some(buffer_from_native(buffer)),
            Err(e) => {
                engine_error!(SOURCE, "glGenBuffers failed: {}", e);
                None
            }
        }
    }

    fn delete_buffer(&mut self, buffer: BufferHandle) {
        if self.vertex_buffer == Some(buffer) {
            self.vertex_buffer = None;
        }
        unsafe { self.gl.delete_buffer(buffer_to_native(buffer)) };
    }

    fn bind_vertex_buffer(&mut self, buffer: Option<BufferHandle>) {
        self.vertex_buffer = buffer;
        unsafe { self.gl.bind_buffer(glow::ARRAY_BUFFER, buffer.map(buffer_to_native)) };
    }

    fn bound_vertex_buffer(&self) -> Option<BufferHandle> {
        self.vertex_buffer
    }

    fn buffer_data(&mut self, size: usize, usage: BufferUsage) {
        let size = i32::try_from(size).unwrap_or(i32::MAX);
        unsafe { self.gl.buffer_data_size(glow::ARRAY_BUFFER, size, buffer_usage_to_gl(usage)) };
    }

    fn buffer_sub_data(&mut self, offset: usize, data: &[u8]) {
        let offset = i32::try_from(offset).unwrap_or(i32::MAX);
        unsafe { self.gl.buffer_sub_data_u8_slice(glow::ARRAY_BUFFER, offset, data) };
    }

    fn copy_buffer(&mut self, source: BufferHandle, destination: BufferHandle, size: usize) {
        let size = i32::try_from(size).unwrap_or(i32::MAX);
        unsafe {
            self.gl.bind_buffer(glow::COPY_READ_BUFFER, Some(buffer_to_native(source)));
            self.gl.bind_buffer(glow::COPY_WRITE_BUFFER, Some(buffer_to_native(destination)));
            self.gl.copy_buffer_sub_data(glow::COPY_READ_BUFFER, glow::COPY_WRITE_BUFFER, 0, 0, size);
            self.gl.bind_buffer(glow::COPY_READ_BUFFER, None);
            self.gl.bind_buffer(glow::COPY_WRITE_BUFFER, None);
        }
    }

    fn create_vertex_array(&mut self) -> Option<VertexArrayHandle> {
        match unsafe { self.gl.create_vertex_array() } {
            Ok(vertex_array) => Some(vertex_array_from_native(vertex_array)),
            Err(e) => {
                engine_error!(SOURCE, "glGenVertexArrays failed: {}", e);
                None
            }
        }
    }

    fn delete_vertex_array(&mut self, vertex_array: VertexArrayHandle) {
        if self.vertex_array == Some(vertex_array) {
            self.vertex_array = None;
        }
        unsafe { self.gl.delete_vertex_array(vertex_array_to_native(vertex_array)) };
    }

    fn bind_vertex_array(&mut self, vertex_array: Option<VertexArrayHandle>) {
        self.vertex_array = vertex_array;
        unsafe { self.gl.bind_vertex_array(vertex_array.map(vertex_array_to_native)) };
    }

    fn bound_vertex_array(&self) -> Option<VertexArrayHandle> {
        self.vertex_array
    }

    fn vertex_attribute(&mut self, attribute: &VertexAttribute, stride: usize) {
        unsafe {
            self.gl.enable_vertex_attrib_array(attribute.location);
            self.gl.vertex_attrib_pointer_f32(
                attribute.location,
                gl_int(attribute.components),
                attribute_kind_to_gl(attribute.kind),
                attribute.normalized,
                i32::try_from(stride).unwrap_or(i32::MAX),
                i32::try_from(attribute.offset).unwrap_or(i32::MAX),
            );
        }
    }

    // ===== PROGRAMS =====

    fn create_program(
        &mut self,
        vertex_source: &str,
        fragment_source: &str,
        attributes: &[&str],
    ) -> Result<ProgramHandle> {
        let vertex = self.compile_shader(glow::VERTEX_SHADER, vertex_source)?;
        let fragment = match self.compile_shader(glow::FRAGMENT_SHADER, fragment_source) {
            Ok(fragment) => fragment,
            Err(e) => {
                unsafe { self.gl.delete_shader(vertex) };
                return Err(e);
            }
        };

        unsafe {
            let program = match self.gl.create_program() {
                Ok(program) => program,
                Err(e) => {
                    self.gl.delete_shader(vertex);
                    self.gl.delete_shader(fragment);
                    engine_bail!(SOURCE, ResourceExhausted, "Failed to create program: {}", e);
                }
            };

            self.gl.attach_shader(program, vertex);
            self.gl.attach_shader(program, fragment);
            for (location, name) in attributes.iter().enumerate() {
                self.gl.bind_attrib_location(program, location as u32, name);
            }
            self.gl.link_program(program);

            self.gl.detach_shader(program, vertex);
            self.gl.detach_shader(program, fragment);
            self.gl.delete_shader(vertex);
            self.gl.delete_shader(fragment);

            if !self.gl.get_program_link_status(program) {
                let log = self.gl.get_program_info_log(program);
                self.gl.delete_program(program);
                engine_bail!(SOURCE, BackendError, "Failed to link program: {}", log);
            }

            Ok(program_from_native(program))
        }
    }

    fn delete_program(&mut self, program: ProgramHandle) {
        if self.program == Some(program) {
            self.program = None;
        }
        unsafe { self.gl.delete_program(program_to_native(program)) };
    }

    fn use_program(&mut self, program: Option<ProgramHandle>) {
        self.program = program;
        unsafe { self.gl.use_program(program.map(program_to_native)) };
    }

    fn current_program(&self) -> Option<ProgramHandle> {
        self.program
    }

    fn uniform_location(&mut self, program: ProgramHandle, name: &str) -> Option<UniformLocation> {
        unsafe { self.gl.get_uniform_location(program_to_native(program), name) }
            .map(|location| UniformLocation(location.0))
    }

    fn set_uniform(&mut self, location: UniformLocation, value: &UniformValue) {
        let location = glow::NativeUniformLocation(location.0);
        let location = Some(&location);
        unsafe {
            match value {
                UniformValue::Float(x) => self.gl.uniform_1_f32(location, *x),
                UniformValue::Vec2([x, y]) => self.gl.uniform_2_f32(location, *x, *y),
                UniformValue::Vec3([x, y, z]) => self.gl.uniform_3_f32(location, *x, *y, *z),
                UniformValue::Vec4([x, y, z, w]) => self.gl.uniform_4_f32(location, *x, *y, *z, *w),
                UniformValue::Int(x) => self.gl.uniform_1_i32(location, *x),
                UniformValue::IVec2([x, y]) => self.gl.uniform_2_i32(location, *x, *y),
                UniformValue::IVec3([x, y, z]) => self.gl.uniform_3_i32(location, *x, *y, *z),
                UniformValue::IVec4([x, y, z, w]) => self.gl.uniform_4_i32(location, *x, *y, *z, *w),
                UniformValue::Bool(x) => self.gl.uniform_1_i32(location, i32::from(*x)),
                UniformValue::Mat3(m) => self.gl.uniform_matrix_3_f32_slice(location, false, m),
                UniformValue::Mat4(m) => self.gl.uniform_matrix_4_f32_slice(location, false, m),
                UniformValue::FloatArray(v) => self.gl.uniform_1_f32_slice(location, v),
                UniformValue::Vec2Array(v) => self.gl.uniform_2_f32_slice(location, v),
                UniformValue::Vec3Array(v) => self.gl.uniform_3_f32_slice(location, v),
                UniformValue::Vec4Array(v) => self.gl.uniform_4_f32_slice(location, v),
            }
        }
    }

    // ===== FRAMEBUFFERS =====

    fn create_framebuffer(&mut self) -> Option<FramebufferHandle> {
        match unsafe { self.gl.create_framebuffer() } {
            Ok(framebuffer) => Some(framebuffer_from_native(framebuffer)),
            Err(e) => {
                engine_error!(SOURCE, "glGenFramebuffers failed: {}", e);
                None
            }
        }
    }

    fn delete_framebuffer(&mut self, framebuffer: FramebufferHandle) {
        // Deleting a bound framebuffer reverts the binding to 0
        if self.read_framebuffer == Some(framebuffer) {
            self.read_framebuffer = None;
        }
        if self.draw_framebuffer == Some(framebuffer) {
            self.draw_framebuffer = None;
        }
        unsafe { self.gl.delete_framebuffer(framebuffer_to_native(framebuffer)) };
    }

    fn bind_framebuffer(&mut self, target: FramebufferTarget, framebuffer: Option<FramebufferHandle>) {
        match target {
            FramebufferTarget::Read => self.read_framebuffer = framebuffer,
            FramebufferTarget::Draw => self.draw_framebuffer = framebuffer,
            FramebufferTarget::Both => {
                self.read_framebuffer = framebuffer;
                self.draw_framebuffer = framebuffer;
            }
        }
        unsafe {
            self.gl.bind_framebuffer(framebuffer_target_to_gl(target), framebuffer.map(framebuffer_to_native));
        }
    }

    fn bound_framebuffer(&self, target: FramebufferTarget) -> Option<FramebufferHandle> {
        match target {
            FramebufferTarget::Read => self.read_framebuffer,
            FramebufferTarget::Draw | FramebufferTarget::Both => self.draw_framebuffer,
        }
    }

    fn framebuffer_texture(
        &mut self,
        target: FramebufferTarget,
        attachment: Attachment,
        texture: Option<TextureHandle>,
    ) {
        unsafe {
            self.gl.framebuffer_texture_2d(
                framebuffer_target_to_gl(target),
                attachment_to_gl(attachment),
                glow::TEXTURE_2D,
                texture.map(texture_to_native),
                0,
            );
        }
    }

    fn create_renderbuffer(&mut self) -> Option<RenderbufferHandle> {
        match unsafe { self.gl.create_renderbuffer() } {
            Ok(renderbuffer) => Some(renderbuffer_from_native(renderbuffer)),
            Err(e) => {
                engine_error!(SOURCE, "glGenRenderbuffers failed: {}", e);
                None
            }
        }
    }

    fn delete_renderbuffer(&mut self, renderbuffer: RenderbufferHandle) {
        unsafe { self.gl.delete_renderbuffer(renderbuffer_to_native(renderbuffer)) };
    }

    fn renderbuffer_storage(
        &mut self,
        renderbuffer: RenderbufferHandle,
        format: RenderbufferFormat,
        samples: u32,
        width: u32,
        height: u32,
    ) {
        let format = renderbuffer_format_to_gl(format);
        unsafe {
            self.gl.bind_renderbuffer(glow::RENDERBUFFER, Some(renderbuffer_to_native(renderbuffer)));
            if samples > 0 {
                self.gl.renderbuffer_storage_multisample(
                    glow::RENDERBUFFER,
                    gl_int(samples),
                    format,
                    gl_int(width),
                    gl_int(height),
                );
            } else {
                self.gl.renderbuffer_storage(glow::RENDERBUFFER, format, gl_int(width), gl_int(height));
            }
            self.gl.bind_renderbuffer(glow::RENDERBUFFER, None);
        }
    }

    fn framebuffer_renderbuffer(
        &mut self,
        target: FramebufferTarget,
        attachment: Attachment,
        renderbuffer: Option<RenderbufferHandle>,
    ) {
        unsafe {
            self.gl.framebuffer_renderbuffer(
                framebuffer_target_to_gl(target),
                attachment_to_gl(attachment),
                glow::RENDERBUFFER,
                renderbuffer.map(renderbuffer_to_native),
            );
        }
    }

    fn framebuffer_complete(&mut self, target: FramebufferTarget) -> bool {
        let status = unsafe { self.gl.check_framebuffer_status(framebuffer_target_to_gl(target)) };
        if status != glow::FRAMEBUFFER_COMPLETE {
            engine_debug!(SOURCE, "Framebuffer status 0x{:04X}", status);
        }
        status == glow::FRAMEBUFFER_COMPLETE
    }

    fn blit_framebuffer(&mut self, source: [i32; 4], destination: [i32; 4]) {
        unsafe {
            self.gl.blit_framebuffer(
                source[0],
                source[1],
                source[2],
                source[3],
                destination[0],
                destination[1],
                destination[2],
                destination[3],
                glow::COLOR_BUFFER_BIT,
                glow::NEAREST,
            );
        }
    }

    // ===== DRAWING =====

    fn draw_arrays(&mut self, primitive: PrimitiveType, first: usize, count: usize) {
        unsafe {
            self.gl.draw_arrays(
                primitive_to_gl(primitive),
                i32::try_from(first).unwrap_or(i32::MAX),
                i32::try_from(count).unwrap_or(i32::MAX),
            );
        }
    }
}

impl std::fmt::Debug for GlGraphicsDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlGraphicsDevice")
            .field("version", &self.version)
            .field("capabilities", &self.capabilities)
            .finish_non_exhaustive()
    }
}
