/// Mock graphics device for unit tests (no GPU required)
///
/// Records every command as a string (`"name(args)"`) and emulates the
/// parts of a GL driver the render layer relies on: object names with
/// recycling, bindings, texture / renderbuffer / window pixel storage,
/// clears, read-backs, copies and framebuffer blits. Drawing itself is
/// only recorded, nothing is rasterized.
///
/// The state lives behind an `Arc<Mutex<_>>` so a test can keep a probe
/// on it after the device has been moved into a `SharedContext`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use crate::engine_bail;
use crate::error::Result;
use crate::graphics::{BlendEquation, BlendFactor, IntRect, PrimitiveType, VertexAttribute};
use crate::graphics_device::{
    Attachment, BufferHandle, BufferUsage, Capability, DeviceCapabilities, FramebufferHandle,
    FramebufferTarget, GraphicsDevice, ProgramHandle, RenderbufferFormat, RenderbufferHandle,
    SharedContext, TextureFilter, TextureFormat, TextureHandle, TextureWrap, UniformLocation,
    UniformValue, VertexArrayHandle,
};

// ============================================================================
// Mock objects
// ============================================================================

/// Object name allocator, freed names are handed out again (LIFO)
#[derive(Debug, Default)]
pub struct NamePool {
    free: Vec<u32>,
    next: u32,
}

impl NamePool {
    fn alloc(&mut self) -> u32 {
        self.free.pop().unwrap_or_else(|| {
            self.next += 1;
            self.next
        })
    }

    fn free(&mut self, name: u32) {
        self.free.push(name);
    }
}

/// RGBA8 pixel storage
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MockSurface {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl MockSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height, pixels: vec![0; width as usize * height as usize * 4] }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        Some([self.pixels[i], self.pixels[i + 1], self.pixels[i + 2], self.pixels[i + 3]])
    }

    fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        if x < self.width && y < self.height {
            let i = (y as usize * self.width as usize + x as usize) * 4;
            self.pixels[i..i + 4].copy_from_slice(&rgba);
        }
    }
}

#[derive(Debug, Clone)]
pub struct MockTexture {
    pub storage: MockSurface,
    pub format: Option<TextureFormat>,
    pub mag_filter: Option<TextureFilter>,
    pub min_filter: Option<TextureFilter>,
    pub wrap: Option<TextureWrap>,
    pub max_level: u32,
    pub mipmapped: bool,
}

#[derive(Debug, Clone)]
pub struct MockRenderbuffer {
    pub format: Option<RenderbufferFormat>,
    pub samples: u32,
    pub storage: MockSurface,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockAttachment {
    Texture(u32),
    Renderbuffer(u32),
}

#[derive(Debug, Clone, Default)]
pub struct MockFramebuffer {
    pub color: Option<MockAttachment>,
    pub depth: Option<MockAttachment>,
    pub depth_stencil: Option<MockAttachment>,
}

#[derive(Debug, Clone, Default)]
pub struct MockProgram {
    /// Uniform names declared by the sources, location = index
    pub uniforms: Vec<String>,
    pub attributes: Vec<String>,
    pub values: HashMap<u32, UniformValue>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum ObjectKind {
    Texture,
    Buffer,
    VertexArray,
    Program,
    Framebuffer,
    Renderbuffer,
}

// ============================================================================
// Mock state
// ============================================================================

/// Everything the mock device knows
#[derive(Debug)]
pub struct MockDeviceState {
    pub capabilities: DeviceCapabilities,
    /// Recorded commands, `"name(args)"`
    pub commands: Vec<String>,
    /// Invalid uses detected (what a GL debug layer would report)
    pub errors: Vec<String>,

    pools: HashMap<ObjectKind, NamePool>,
    pub textures: HashMap<u32, MockTexture>,
    pub buffers: HashMap<u32, Vec<u8>>,
    pub vertex_arrays: HashMap<u32, Vec<VertexAttribute>>,
    pub programs: HashMap<u32, MockProgram>,
    pub framebuffers: HashMap<u32, MockFramebuffer>,
    pub renderbuffers: HashMap<u32, MockRenderbuffer>,
    /// Default (window) framebuffer color buffer
    pub window: MockSurface,

    pub enabled: HashMap<Capability, bool>,
    pub viewport: Option<IntRect>,
    pub active_unit: u32,
    pub texture_units: HashMap<u32, TextureHandle>,
    pub vertex_buffer: Option<BufferHandle>,
    pub vertex_array: Option<VertexArrayHandle>,
    pub program: Option<ProgramHandle>,
    pub read_framebuffer: Option<FramebufferHandle>,
    pub draw_framebuffer: Option<FramebufferHandle>,

    /// Make the next `create_program` fail
    pub fail_program: bool,
    /// Report every framebuffer as incomplete
    pub fail_framebuffer: bool,
    /// Make creation of this object kind return a null handle
    pub fail_create: Option<&'static str>,
}

impl MockDeviceState {
    fn new(capabilities: DeviceCapabilities) -> Self {
        Self {
            capabilities,
            commands: Vec::new(),
            errors: Vec::new(),
            pools: HashMap::new(),
            textures: HashMap::new(),
            buffers: HashMap::new(),
            vertex_arrays: HashMap::new(),
            programs: HashMap::new(),
            framebuffers: HashMap::new(),
            renderbuffers: HashMap::new(),
            window: MockSurface::new(0, 0),
            enabled: HashMap::new(),
            viewport: None,
            active_unit: 0,
            texture_units: HashMap::new(),
            vertex_buffer: None,
            vertex_array: None,
            program: None,
            read_framebuffer: None,
            draw_framebuffer: None,
            fail_program: false,
            fail_framebuffer: false,
            fail_create: None,
        }
    }

    /// Number of recorded commands called `name`
    pub fn count(&self, name: &str) -> usize {
        self.commands
            .iter()
            .filter(|c| c.split('(').next() == Some(name))
            .count()
    }

    /// Forget recorded commands (state is kept)
    pub fn clear_commands(&mut self) {
        self.commands.clear();
    }

    /// Number of live objects of all kinds
    pub fn live_objects(&self) -> usize {
        self.textures.len()
            + self.buffers.len()
            + self.vertex_arrays.len()
            + self.programs.len()
            + self.framebuffers.len()
            + self.renderbuffers.len()
    }

    pub fn texture(&self, handle: TextureHandle) -> Option<&MockTexture> {
        self.textures.get(&handle.raw())
    }

    pub fn uniform_value(&self, program: ProgramHandle, name: &str) -> Option<&UniformValue> {
        let program = self.programs.get(&program.raw())?;
        let location = program.uniforms.iter().position(|u| u == name)? as u32;
        program.values.get(&location)
    }

    fn record(&mut self, command: String) {
        self.commands.push(command);
    }

    fn error(&mut self, message: String) {
        self.errors.push(message);
    }

    fn alloc(&mut self, kind: ObjectKind, label: &'static str) -> Option<u32> {
        if self.fail_create == Some(label) {
            self.record(format!("{}() -> null", label));
            return None;
        }
        let name = self.pools.entry(kind).or_default().alloc();
        self.record(format!("{}() -> {}", label, name));
        Some(name)
    }

    fn release(&mut self, kind: ObjectKind, name: u32) {
        self.pools.entry(kind).or_default().free(name);
    }

    fn bound_texture_name(&self) -> Option<u32> {
        self.texture_units.get(&self.active_unit).map(|t| t.raw())
    }

    fn framebuffer_for(&self, target: FramebufferTarget) -> Option<FramebufferHandle> {
        match target {
            FramebufferTarget::Read => self.read_framebuffer,
            FramebufferTarget::Draw | FramebufferTarget::Both => self.draw_framebuffer,
        }
    }

    fn surface(&self, attachment: MockAttachment) -> Option<&MockSurface> {
        match attachment {
            MockAttachment::Texture(name) => self.textures.get(&name).map(|t| &t.storage),
            MockAttachment::Renderbuffer(name) => self.renderbuffers.get(&name).map(|r| &r.storage),
        }
    }

    fn surface_mut(&mut self, attachment: MockAttachment) -> Option<&mut MockSurface> {
        match attachment {
            MockAttachment::Texture(name) => self.textures.get_mut(&name).map(|t| &mut t.storage),
            MockAttachment::Renderbuffer(name) => {
                self.renderbuffers.get_mut(&name).map(|r| &mut r.storage)
            }
        }
    }

    /// Color buffer read from / written to through `framebuffer`
    fn color_surface(&self, framebuffer: Option<FramebufferHandle>) -> Option<MockSurface> {
        match framebuffer {
            None => Some(self.window.clone()),
            Some(fb) => {
                let color = self.framebuffers.get(&fb.raw())?.color?;
                self.surface(color).cloned()
            }
        }
    }

    fn color_surface_mut(&mut self, framebuffer: Option<FramebufferHandle>) -> Option<&mut MockSurface> {
        match framebuffer {
            None => Some(&mut self.window),
            Some(fb) => {
                let color = self.framebuffers.get(&fb.raw())?.color?;
                self.surface_mut(color)
            }
        }
    }

    fn attach(&mut self, target: FramebufferTarget, attachment: Attachment, value: Option<MockAttachment>) {
        let Some(fb) = self.framebuffer_for(target) else {
            self.error("attachment on the default framebuffer".to_string());
            return;
        };
        let Some(framebuffer) = self.framebuffers.get_mut(&fb.raw()) else {
            return;
        };
        match attachment {
            Attachment::Color0 => framebuffer.color = value,
            Attachment::Depth => framebuffer.depth = value,
            Attachment::DepthStencil => framebuffer.depth_stencil = value,
        }
    }
}

/// Parse `uniform <type> <name>;` declarations
fn declared_uniforms(sources: &[&str], names: &mut Vec<String>) {
    for source in sources {
        for statement in source.split(';') {
            let tokens: Vec<&str> = statement.split_whitespace().collect();
            if let Some(position) = tokens.iter().position(|t| *t == "uniform") {
                if let Some(name) = tokens.last().filter(|_| tokens.len() > position + 2) {
                    let name = name.split('[').next().unwrap_or(name).to_string();
                    if !names.contains(&name) {
                        names.push(name);
                    }
                }
            }
        }
    }
}

// ============================================================================
// Mock device
// ============================================================================

pub struct MockGraphicsDevice {
    state: Arc<Mutex<MockDeviceState>>,
}

impl MockGraphicsDevice {
    pub fn new() -> Self {
        Self::with_capabilities(DeviceCapabilities::default())
    }

    pub fn with_capabilities(capabilities: DeviceCapabilities) -> Self {
        Self { state: Arc::new(Mutex::new(MockDeviceState::new(capabilities))) }
    }

    /// Shared view on the device state, usable after the device is moved
    pub fn probe(&self) -> MockProbe {
        MockProbe(self.state.clone())
    }

    fn state(&self) -> MutexGuard<'_, MockDeviceState> {
        self.state.lock().unwrap()
    }
}

/// Test-side handle on a mock device's state
#[derive(Clone)]
pub struct MockProbe(Arc<Mutex<MockDeviceState>>);

impl MockProbe {
    pub fn state(&self) -> MutexGuard<'_, MockDeviceState> {
        self.0.lock().unwrap()
    }

    pub fn count(&self, name: &str) -> usize {
        self.state().count(name)
    }

    pub fn clear_commands(&self) {
        self.state().clear_commands();
    }

    pub fn commands(&self) -> Vec<String> {
        self.state().commands.clone()
    }
}

/// New context backed by a mock device, and a probe on that device
pub fn mock_context() -> (SharedContext, MockProbe) {
    mock_context_with(DeviceCapabilities::default())
}

pub fn mock_context_with(capabilities: DeviceCapabilities) -> (SharedContext, MockProbe) {
    let device = MockGraphicsDevice::with_capabilities(capabilities);
    let probe = device.probe();
    (SharedContext::new(device), probe)
}

impl GraphicsDevice for MockGraphicsDevice {
    fn capabilities(&self) -> DeviceCapabilities {
        self.state().capabilities
    }

    // ===== FIXED-FUNCTION STATE =====

    fn set_enabled(&mut self, capability: Capability, enabled: bool) {
        let mut s = self.state();
        s.enabled.insert(capability, enabled);
        s.record(format!("set_enabled({:?}, {})", capability, enabled));
    }

    fn blend_func(&mut self, src: BlendFactor, dst: BlendFactor) {
        self.state().record(format!("blend_func({:?}, {:?})", src, dst));
    }

    fn blend_func_separate(
        &mut self,
        color_src: BlendFactor,
        color_dst: BlendFactor,
        alpha_src: BlendFactor,
        alpha_dst: BlendFactor,
    ) {
        self.state().record(format!(
            "blend_func_separate({:?}, {:?}, {:?}, {:?})",
            color_src, color_dst, alpha_src, alpha_dst
        ));
    }

    fn blend_equation(&mut self, equation: BlendEquation) {
        self.state().record(format!("blend_equation({:?})", equation));
    }

    fn blend_equation_separate(&mut self, color: BlendEquation, alpha: BlendEquation) {
        self.state().record(format!("blend_equation_separate({:?}, {:?})", color, alpha));
    }

    fn viewport(&mut self, rect: IntRect) {
        let mut s = self.state();
        s.viewport = Some(rect);
        s.record(format!("viewport({}, {}, {}, {})", rect.left, rect.top, rect.width, rect.height));
    }

    fn clear(&mut self, color: [f32; 4]) {
        let mut s = self.state();
        s.record(format!("clear({:?})", color));
        let rgba = color.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8);
        let draw = s.draw_framebuffer;
        if let Some(surface) = s.color_surface_mut(draw) {
            for chunk in surface.pixels.chunks_exact_mut(4) {
                chunk.copy_from_slice(&rgba);
            }
        }
    }

    fn flush(&mut self) {
        self.state().record("flush()".to_string());
    }

    // ===== TEXTURES =====

    fn create_texture(&mut self) -> Option<TextureHandle> {
        let mut s = self.state();
        let name = s.alloc(ObjectKind::Texture, "create_texture")?;
        s.textures.insert(
            name,
            MockTexture {
                storage: MockSurface::default(),
                format: None,
                mag_filter: None,
                min_filter: None,
                wrap: None,
                max_level: 1000,
                mipmapped: false,
            },
        );
        TextureHandle::from_raw(name)
    }

    fn delete_texture(&mut self, texture: TextureHandle) {
        let mut s = self.state();
        s.record(format!("delete_texture({})", texture.raw()));
        if s.textures.remove(&texture.raw()).is_none() {
            s.error(format!("delete of unknown texture {}", texture.raw()));
            return;
        }
        s.texture_units.retain(|_, t| *t != texture);
        s.release(ObjectKind::Texture, texture.raw());
    }

    fn active_texture(&mut self, unit: u32) {
        let mut s = self.state();
        s.active_unit = unit;
        s.record(format!("active_texture({})", unit));
    }

    fn bind_texture(&mut self, texture: Option<TextureHandle>) {
        let mut s = self.state();
        s.record(format!("bind_texture({:?})", texture.map(|t| t.raw())));
        let unit = s.active_unit;
        match texture {
            Some(t) => {
                s.texture_units.insert(unit, t);
            }
            None => {
                s.texture_units.remove(&unit);
            }
        }
    }

    fn bound_texture(&self) -> Option<TextureHandle> {
        let s = self.state();
        s.texture_units.get(&s.active_unit).copied()
    }

    fn texture_storage(&mut self, width: u32, height: u32, format: TextureFormat) {
        let mut s = self.state();
        s.record(format!("texture_storage({}, {}, {:?})", width, height, format));
        let Some(name) = s.bound_texture_name() else {
            s.error("texture_storage without bound texture".to_string());
            return;
        };
        if let Some(texture) = s.textures.get_mut(&name) {
            texture.storage = MockSurface::new(width, height);
            texture.format = Some(format);
            texture.mipmapped = false;
        }
    }

    fn texture_sub_image(&mut self, x: u32, y: u32, width: u32, height: u32, pixels: &[u8]) {
        let mut s = self.state();
        s.record(format!("texture_sub_image({}, {}, {}, {})", x, y, width, height));
        let Some(name) = s.bound_texture_name() else {
            s.error("texture_sub_image without bound texture".to_string());
            return;
        };
        let in_range = s.textures.get(&name).is_some_and(|t| {
            x + width <= t.storage.width && y + height <= t.storage.height
        });
        if !in_range || pixels.len() < (width * height * 4) as usize {
            s.error(format!("texture_sub_image out of range on texture {}", name));
            return;
        }
        let Some(texture) = s.textures.get_mut(&name) else { return };
        let storage = &mut texture.storage;
        for row in 0..height {
            for col in 0..width {
                let i = ((row * width + col) * 4) as usize;
                storage.set_pixel(x + col, y + row, [pixels[i], pixels[i + 1], pixels[i + 2], pixels[i + 3]]);
            }
        }
    }

    fn set_texture_filter(&mut self, mag: TextureFilter, min: TextureFilter) {
        let mut s = self.state();
        s.record(format!("set_texture_filter({:?}, {:?})", mag, min));
        if let Some(name) = s.bound_texture_name() {
            if let Some(texture) = s.textures.get_mut(&name) {
                texture.mag_filter = Some(mag);
                texture.min_filter = Some(min);
            }
        }
    }

    fn set_texture_wrap(&mut self, wrap: TextureWrap) {
        let mut s = self.state();
        s.record(format!("set_texture_wrap({:?})", wrap));
        if let Some(name) = s.bound_texture_name() {
            if let Some(texture) = s.textures.get_mut(&name) {
                texture.wrap = Some(wrap);
            }
        }
    }

    fn set_texture_max_level(&mut self, level: u32) {
        let mut s = self.state();
        s.record(format!("set_texture_max_level({})", level));
        if let Some(name) = s.bound_texture_name() {
            if let Some(texture) = s.textures.get_mut(&name) {
                texture.max_level = level;
            }
        }
    }

    fn generate_mipmap(&mut self) {
        let mut s = self.state();
        s.record("generate_mipmap()".to_string());
        if let Some(name) = s.bound_texture_name() {
            if let Some(texture) = s.textures.get_mut(&name) {
                texture.mipmapped = true;
            }
        }
    }

    fn read_texture(&mut self, width: u32, height: u32) -> Vec<u8> {
        let mut s = self.state();
        s.record(format!("read_texture({}, {})", width, height));
        let storage = s
            .bound_texture_name()
            .and_then(|name| s.textures.get(&name))
            .map(|t| t.storage.clone());
        match storage {
            Some(storage) if storage.width == width && storage.height == height => storage.pixels,
            _ => {
                s.error("read_texture size mismatch".to_string());
                vec![0; width as usize * height as usize * 4]
            }
        }
    }

    fn copy_framebuffer_to_texture(&mut self, x: u32, y: u32, src_x: i32, src_y: i32, width: u32, height: u32) {
        let mut s = self.state();
        s.record(format!("copy_framebuffer_to_texture({}, {}, {}, {}, {}, {})", x, y, src_x, src_y, width, height));
        let read = s.read_framebuffer;
        let (Some(source), Some(name)) = (s.color_surface(read), s.bound_texture_name()) else {
            s.error("copy_framebuffer_to_texture without source or texture".to_string());
            return;
        };
        if let Some(texture) = s.textures.get_mut(&name) {
            for row in 0..height {
                for col in 0..width {
                    if let Some(p) = source.pixel((src_x + col as i32) as u32, (src_y + row as i32) as u32) {
                        texture.storage.set_pixel(x + col, y + row, p);
                    }
                }
            }
        }
    }

    // ===== BUFFERS =====

    fn create_buffer(&mut self) -> Option<BufferHandle> {
        let mut s = self.state();
        let name = s.alloc(ObjectKind::Buffer, "create_buffer")?;
        s.buffers.insert(name, Vec::new());
        BufferHandle::from_raw(name)
    }

    fn delete_buffer(&mut self, buffer: BufferHandle) {
        let mut s = self.state();
        s.record(format!("delete_buffer({})", buffer.raw()));
        if s.buffers.remove(&buffer.raw()).is_some() {
            if s.vertex_buffer == Some(buffer) {
                s.vertex_buffer = None;
            }
            s.release(ObjectKind::Buffer, buffer.raw());
        }
    }

    fn bind_vertex_buffer(&mut self, buffer: Option<BufferHandle>) {
        let mut s = self.state();
        s.vertex_buffer = buffer;
        s.record(format!("bind_vertex_buffer({:?})", buffer.map(|b| b.raw())));
    }

    fn bound_vertex_buffer(&self) -> Option<BufferHandle> {
        self.state().vertex_buffer
    }

    fn buffer_data(&mut self, size: usize, usage: BufferUsage) {
        let mut s = self.state();
        s.record(format!("buffer_data({}, {:?})", size, usage));
        match s.vertex_buffer {
            Some(buffer) => {
                s.buffers.insert(buffer.raw(), vec![0; size]);
            }
            None => s.error("buffer_data without bound buffer".to_string()),
        }
    }

    fn buffer_sub_data(&mut self, offset: usize, data: &[u8]) {
        let mut s = self.state();
        s.record(format!("buffer_sub_data({}, {})", offset, data.len()));
        let Some(buffer) = s.vertex_buffer else {
            s.error("buffer_sub_data without bound buffer".to_string());
            return;
        };
        let storage = s.buffers.entry(buffer.raw()).or_default();
        if offset + data.len() > storage.len() {
            s.error(format!("buffer_sub_data overflow on buffer {}", buffer.raw()));
            return;
        }
        storage[offset..offset + data.len()].copy_from_slice(data);
    }

    fn copy_buffer(&mut self, source: BufferHandle, destination: BufferHandle, size: usize) {
        let mut s = self.state();
        s.record(format!("copy_buffer({}, {}, {})", source.raw(), destination.raw(), size));
        let data = s.buffers.get(&source.raw()).map(|b| b[..size.min(b.len())].to_vec());
        match (data, s.buffers.get_mut(&destination.raw())) {
            (Some(data), Some(dst)) if dst.len() >= data.len() => dst[..data.len()].copy_from_slice(&data),
            _ => s.error("copy_buffer out of range".to_string()),
        }
    }

    fn create_vertex_array(&mut self) -> Option<VertexArrayHandle> {
        let mut s = self.state();
        let name = s.alloc(ObjectKind::VertexArray, "create_vertex_array")?;
        s.vertex_arrays.insert(name, Vec::new());
        VertexArrayHandle::from_raw(name)
    }

    fn delete_vertex_array(&mut self, vertex_array: VertexArrayHandle) {
        let mut s = self.state();
        s.record(format!("delete_vertex_array({})", vertex_array.raw()));
        if s.vertex_arrays.remove(&vertex_array.raw()).is_some() {
            if s.vertex_array == Some(vertex_array) {
                s.vertex_array = None;
            }
            s.release(ObjectKind::VertexArray, vertex_array.raw());
        }
    }

    fn bind_vertex_array(&mut self, vertex_array: Option<VertexArrayHandle>) {
        let mut s = self.state();
        s.vertex_array = vertex_array;
        s.record(format!("bind_vertex_array({:?})", vertex_array.map(|v| v.raw())));
    }

    fn bound_vertex_array(&self) -> Option<VertexArrayHandle> {
        self.state().vertex_array
    }

    fn vertex_attribute(&mut self, attribute: &VertexAttribute, stride: usize) {
        let mut s = self.state();
        s.record(format!("vertex_attribute({}, {}, {})", attribute.location, attribute.offset, stride));
        match s.vertex_array {
            Some(vao) => s.vertex_arrays.entry(vao.raw()).or_default().push(*attribute),
            None => s.error("vertex_attribute without bound vertex array".to_string()),
        }
    }

    // ===== PROGRAMS =====

    fn create_program(&mut self, vertex_source: &str, fragment_source: &str, attributes: &[&str]) -> Result<ProgramHandle> {
        let mut s = self.state();
        if s.fail_program {
            s.fail_program = false;
            s.record("create_program() -> failed".to_string());
            engine_bail!("galaxy2d::mock", BackendError, "Failed to link shader program");
        }
        let Some(name) = s.alloc(ObjectKind::Program, "create_program") else {
            engine_bail!("galaxy2d::mock", ResourceExhausted, "Failed to create shader program");
        };
        let mut program = MockProgram {
            attributes: attributes.iter().map(|a| a.to_string()).collect(),
            ..MockProgram::default()
        };
        declared_uniforms(&[vertex_source, fragment_source], &mut program.uniforms);
        s.programs.insert(name, program);
        match ProgramHandle::from_raw(name) {
            Some(handle) => Ok(handle),
            None => engine_bail!("galaxy2d::mock", ResourceExhausted, "null program"),
        }
    }

    fn delete_program(&mut self, program: ProgramHandle) {
        let mut s = self.state();
        s.record(format!("delete_program({})", program.raw()));
        if s.programs.remove(&program.raw()).is_some() {
            if s.program == Some(program) {
                s.program = None;
            }
            s.release(ObjectKind::Program, program.raw());
        }
    }

    fn use_program(&mut self, program: Option<ProgramHandle>) {
        let mut s = self.state();
        s.program = program;
        s.record(format!("use_program({:?})", program.map(|p| p.raw())));
    }

    fn current_program(&self) -> Option<ProgramHandle> {
        self.state().program
    }

    fn uniform_location(&mut self, program: ProgramHandle, name: &str) -> Option<UniformLocation> {
        let s = self.state();
        let program = s.programs.get(&program.raw())?;
        program.uniforms.iter().position(|u| u == name).map(|i| UniformLocation(i as u32))
    }

    fn set_uniform(&mut self, location: UniformLocation, value: &UniformValue) {
        let mut s = self.state();
        let label = s
            .program
            .and_then(|p| s.programs.get(&p.raw()))
            .and_then(|p| p.uniforms.get(location.0 as usize).cloned())
            .unwrap_or_default();
        s.record(format!("set_uniform({}, {:?})", label, value));
        match s.program {
            Some(program) => {
                if let Some(p) = s.programs.get_mut(&program.raw()) {
                    p.values.insert(location.0, value.clone());
                }
            }
            None => s.error("set_uniform without current program".to_string()),
        }
    }

    // ===== FRAMEBUFFERS =====

    fn create_framebuffer(&mut self) -> Option<FramebufferHandle> {
        let mut s = self.state();
        let name = s.alloc(ObjectKind::Framebuffer, "create_framebuffer")?;
        s.framebuffers.insert(name, MockFramebuffer::default());
        FramebufferHandle::from_raw(name)
    }

    fn delete_framebuffer(&mut self, framebuffer: FramebufferHandle) {
        let mut s = self.state();
        s.record(format!("delete_framebuffer({})", framebuffer.raw()));
        if s.framebuffers.remove(&framebuffer.raw()).is_some() {
            if s.read_framebuffer == Some(framebuffer) {
                s.read_framebuffer = None;
            }
            if s.draw_framebuffer == Some(framebuffer) {
                s.draw_framebuffer = None;
            }
            s.release(ObjectKind::Framebuffer, framebuffer.raw());
        }
    }

    fn bind_framebuffer(&mut self, target: FramebufferTarget, framebuffer: Option<FramebufferHandle>) {
        let mut s = self.state();
        s.record(format!("bind_framebuffer({:?}, {:?})", target, framebuffer.map(|f| f.raw())));
        match target {
            FramebufferTarget::Read => s.read_framebuffer = framebuffer,
            FramebufferTarget::Draw => s.draw_framebuffer = framebuffer,
            FramebufferTarget::Both => {
                s.read_framebuffer = framebuffer;
                s.draw_framebuffer = framebuffer;
            }
        }
    }

    fn bound_framebuffer(&self, target: FramebufferTarget) -> Option<FramebufferHandle> {
        self.state().framebuffer_for(target)
    }

    fn framebuffer_texture(&mut self, target: FramebufferTarget, attachment: Attachment, texture: Option<TextureHandle>) {
        let mut s = self.state();
        s.record(format!("framebuffer_texture({:?}, {:?}, {:?})", target, attachment, texture.map(|t| t.raw())));
        s.attach(target, attachment, texture.map(|t| MockAttachment::Texture(t.raw())));
    }

    fn create_renderbuffer(&mut self) -> Option<RenderbufferHandle> {
        let mut s = self.state();
        let name = s.alloc(ObjectKind::Renderbuffer, "create_renderbuffer")?;
        s.renderbuffers.insert(
            name,
            MockRenderbuffer { format: None, samples: 0, storage: MockSurface::default() },
        );
        RenderbufferHandle::from_raw(name)
    }

    fn delete_renderbuffer(&mut self, renderbuffer: RenderbufferHandle) {
        let mut s = self.state();
        s.record(format!("delete_renderbuffer({})", renderbuffer.raw()));
        if s.renderbuffers.remove(&renderbuffer.raw()).is_some() {
            s.release(ObjectKind::Renderbuffer, renderbuffer.raw());
        }
    }

    fn renderbuffer_storage(&mut self, renderbuffer: RenderbufferHandle, format: RenderbufferFormat, samples: u32, width: u32, height: u32) {
        let mut s = self.state();
        s.record(format!("renderbuffer_storage({:?}, {}, {}, {})", format, samples, width, height));
        match s.renderbuffers.get_mut(&renderbuffer.raw()) {
            Some(rb) => {
                rb.format = Some(format);
                rb.samples = samples;
                rb.storage = MockSurface::new(width, height);
            }
            None => s.error(format!("renderbuffer_storage on unknown renderbuffer {}", renderbuffer.raw())),
        }
    }

    fn framebuffer_renderbuffer(&mut self, target: FramebufferTarget, attachment: Attachment, renderbuffer: Option<RenderbufferHandle>) {
        let mut s = self.state();
        s.record(format!("framebuffer_renderbuffer({:?}, {:?}, {:?})", target, attachment, renderbuffer.map(|r| r.raw())));
        s.attach(target, attachment, renderbuffer.map(|r| MockAttachment::Renderbuffer(r.raw())));
    }

    fn framebuffer_complete(&mut self, target: FramebufferTarget) -> bool {
        let mut s = self.state();
        s.record(format!("framebuffer_complete({:?})", target));
        if s.fail_framebuffer {
            return false;
        }
        match s.framebuffer_for(target) {
            None => true,
            Some(fb) => s
                .framebuffers
                .get(&fb.raw())
                .and_then(|f| f.color)
                .and_then(|color| s.surface(color))
                .map(|surface| surface.width > 0 && surface.height > 0)
                .unwrap_or(false),
        }
    }

    fn blit_framebuffer(&mut self, source: [i32; 4], destination: [i32; 4]) {
        let mut s = self.state();
        s.record(format!("blit_framebuffer({:?}, {:?})", source, destination));
        let (read, draw) = (s.read_framebuffer, s.draw_framebuffer);
        let Some(src) = s.color_surface(read) else {
            s.error("blit without readable color buffer".to_string());
            return;
        };
        let Some(dst) = s.color_surface_mut(draw) else {
            return;
        };

        // Nearest sampling; a reversed source range mirrors the copy
        let [mut sx0, mut sy0, mut sx1, mut sy1] = source;
        let [mut dx0, mut dy0, mut dx1, mut dy1] = destination;
        if dx1 < dx0 {
            std::mem::swap(&mut dx0, &mut dx1);
            std::mem::swap(&mut sx0, &mut sx1);
        }
        if dy1 < dy0 {
            std::mem::swap(&mut dy0, &mut dy1);
            std::mem::swap(&mut sy0, &mut sy1);
        }
        let (dw, dh) = ((dx1 - dx0) as f32, (dy1 - dy0) as f32);
        for dy in dy0..dy1 {
            let sy = sy0 as f32 + ((dy - dy0) as f32 + 0.5) * (sy1 - sy0) as f32 / dh;
            for dx in dx0..dx1 {
                let sx = sx0 as f32 + ((dx - dx0) as f32 + 0.5) * (sx1 - sx0) as f32 / dw;
                if sx < 0.0 || sy < 0.0 || dx < 0 || dy < 0 {
                    continue;
                }
                if let Some(p) = src.pixel(sx.floor() as u32, sy.floor() as u32) {
                    dst.set_pixel(dx as u32, dy as u32, p);
                }
            }
        }
    }

    // ===== DRAWING =====

    fn draw_arrays(&mut self, primitive: PrimitiveType, first: usize, count: usize) {
        let mut s = self.state();
        s.record(format!("draw_arrays({:?}, {}, {})", primitive, first, count));
        if s.vertex_array.is_none() {
            s.error("draw_arrays without bound vertex array".to_string());
        }
        if s.program.is_none() {
            s.error("draw_arrays without program".to_string());
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "mock_graphics_device_tests.rs"]
mod tests;
