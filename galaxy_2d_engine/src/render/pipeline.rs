/// Pipeline - built-in program and staging buffer shared by the targets of a context
///
/// Exactly one pipeline exists per graphics context while at least one
/// render target of that context is alive: targets hold it through an
/// `Arc`, the context keeps a `Weak` so the next target can find it.
/// The last target going away destroys it with its GPU objects.
///
/// The pipeline only writes GPU state that differs from what it wrote
/// last (program, texture binding, texture flags). The combined
/// view-projection matrix is uploaded on every draw.

use std::sync::{Arc, Mutex};
use crate::{engine_bail, engine_debug};
use crate::error::Result;
use crate::graphics::{PrimitiveType, Transform, Vertex};
use crate::graphics_device::{
    BufferHandle, BufferUsage, GraphicsDevice, ProgramHandle, SharedContext, UniformLocation,
    UniformValue, VertexArrayHandle,
};
use crate::resource::{Shader, Texture, VertexBuffer};
use crate::view::View;

const SOURCE: &str = "galaxy2d::Pipeline";

/// Vertex capacity of the staging buffer at creation; it grows on demand
const INITIAL_CAPACITY: usize = 1024;

const VERTEX_SHADER: &str = "#version 100
precision mediump float;
uniform mat4 u_view_projection;
uniform bool u_flip_texcoords;
attribute vec2 a_position;
attribute vec4 a_color;
attribute vec2 a_tex_coords;
varying vec4 v_color;
varying vec2 v_tex_coords;
void main()
{
    v_color = a_color;
    v_tex_coords = a_tex_coords;
    if (u_flip_texcoords)
        v_tex_coords.y = 1.0 - v_tex_coords.y;
    gl_Position = u_view_projection * vec4(a_position, 0.0, 1.0);
}
";

const FRAGMENT_SHADER: &str = "#version 100
precision mediump float;
uniform sampler2D u_texture;
uniform bool u_use_texture;
varying vec4 v_color;
varying vec2 v_tex_coords;
void main()
{
    if (u_use_texture)
        gl_FragColor = texture2D(u_texture, v_tex_coords) * v_color;
    else
        gl_FragColor = v_color;
}
";

#[derive(Debug, Clone, Copy)]
struct PipelineUniforms {
    texture: Option<UniformLocation>,
    view_projection: Option<UniformLocation>,
    flip_texcoords: Option<UniformLocation>,
    use_texture: Option<UniformLocation>,
}

pub(crate) struct Pipeline {
    context: SharedContext,
    program: ProgramHandle,
    uniforms: PipelineUniforms,
    vertex_array: VertexArrayHandle,
    vertex_buffer: BufferHandle,
    /// Staging buffer size, in vertices
    capacity: usize,
    projection: Transform,
    model: Transform,
    /// Cache id of the texture bound last (0 = none)
    cache_texture_id: u64,
    cache_flip: bool,
    cache_use_texture: bool,
}

impl Pipeline {
    /// Pipeline of `context`, created if no target holds it
    pub(crate) fn acquire(context: &SharedContext) -> Result<Arc<Mutex<Pipeline>>> {
        let mut ctx = context.lock()?;
        if let Some(pipeline) = ctx.pipeline.upgrade() {
            return Ok(pipeline);
        }

        let pipeline = Pipeline::create(context, ctx.device_mut())?;
        engine_debug!(SOURCE, "Pipeline created for context {}", ctx.id());
        let pipeline = Arc::new(Mutex::new(pipeline));
        ctx.pipeline = Arc::downgrade(&pipeline);
        Ok(pipeline)
    }

    fn create(context: &SharedContext, device: &mut dyn GraphicsDevice) -> Result<Pipeline> {
        let program = device.create_program(VERTEX_SHADER, FRAGMENT_SHADER, &Vertex::ATTRIBUTE_NAMES)?;
        let uniforms = PipelineUniforms {
            texture: device.uniform_location(program, "u_texture"),
            view_projection: device.uniform_location(program, "u_view_projection"),
            flip_texcoords: device.uniform_location(program, "u_flip_texcoords"),
            use_texture: device.uniform_location(program, "u_use_texture"),
        };

        let Some(vertex_array) = device.create_vertex_array() else {
            device.delete_program(program);
            engine_bail!(SOURCE, ResourceExhausted, "Failed to create the pipeline vertex array");
        };
        let Some(vertex_buffer) = device.create_buffer() else {
            device.delete_vertex_array(vertex_array);
            device.delete_program(program);
            engine_bail!(SOURCE, ResourceExhausted, "Failed to create the pipeline vertex buffer");
        };

        // The sampler always reads unit 0
        let previous_program = device.current_program();
        device.use_program(Some(program));
        if let Some(location) = uniforms.texture {
            device.set_uniform(location, &UniformValue::Int(0));
        }
        device.use_program(previous_program);

        let previous_buffer = device.bound_vertex_buffer();
        device.bind_vertex_array(Some(vertex_array));
        device.bind_vertex_buffer(Some(vertex_buffer));
        device.buffer_data(INITIAL_CAPACITY * Vertex::STRIDE, BufferUsage::Stream);
        for attribute in &Vertex::LAYOUT {
            device.vertex_attribute(attribute, Vertex::STRIDE);
        }
        device.bind_vertex_array(None);
        device.bind_vertex_buffer(previous_buffer);

        Ok(Pipeline {
            context: context.clone(),
            program,
            uniforms,
            vertex_array,
            vertex_buffer,
            capacity: INITIAL_CAPACITY,
            projection: Transform::IDENTITY,
            model: Transform::IDENTITY,
            cache_texture_id: 0,
            cache_flip: false,
            cache_use_texture: false,
        })
    }

    // ===== MATRICES =====

    pub(crate) fn apply_current_view(&mut self, view: &View) {
        self.projection = view.transform();
    }

    pub(crate) fn apply_current_transform(&mut self, transform: Transform) {
        self.model = transform;
    }

    fn view_projection(&self) -> UniformValue {
        UniformValue::Mat4((self.projection * self.model).to_cols_array())
    }

    // ===== DRAWING =====

    /// Bind program, texture and uniforms for a draw
    fn pre_draw(&mut self, device: &mut dyn GraphicsDevice, texture: Option<&Texture>, shader: Option<&Shader>) {
        if let Some(shader) = shader {
            shader.bind(device);
            if let Some(texture) = texture {
                if device.bound_texture() != texture.handle() {
                    device.bind_texture(texture.handle());
                }
                self.cache_texture_id = texture.cache_id();
            }
            if let Some(location) = shader.view_projection_location() {
                device.set_uniform(location, &self.view_projection());
            }
            return;
        }

        if device.current_program() != Some(self.program) {
            device.use_program(Some(self.program));
        }

        match texture {
            Some(texture) => {
                if self.cache_texture_id != texture.cache_id() {
                    self.cache_texture_id = texture.cache_id();
                    if device.bound_texture() != texture.handle() {
                        device.active_texture(0);
                        device.bind_texture(texture.handle());
                    }
                }

                let flipped = texture.is_flipped();
                if flipped != self.cache_flip {
                    self.set_uniform(device, self.uniforms.flip_texcoords, UniformValue::Bool(flipped));
                    self.cache_flip = flipped;
                }

                if !self.cache_use_texture {
                    self.set_uniform(device, self.uniforms.use_texture, UniformValue::Bool(true));
                    self.cache_use_texture = true;
                }
            }
            None => {
                if self.cache_use_texture {
                    self.set_uniform(device, self.uniforms.use_texture, UniformValue::Bool(false));
                    self.cache_use_texture = false;
                }
                self.cache_texture_id = 0;
            }
        }

        self.set_uniform(device, self.uniforms.view_projection, self.view_projection());
    }

    /// Release what must not stay bound after a draw
    fn post_draw(&mut self, device: &mut dyn GraphicsDevice, texture: Option<&Texture>, shader: Option<&Shader>) {
        // A texture attached to a framebuffer must be unbound before it is rendered to again
        if texture.is_some_and(|t| t.is_attached_to_fbo()) {
            device.bind_texture(None);
            self.cache_texture_id = 0;
        }
        if shader.is_some() {
            device.use_program(None);
        }
    }

    /// Upload `vertices` to the staging buffer and draw them
    pub(crate) fn draw_vertices(
        &mut self,
        device: &mut dyn GraphicsDevice,
        vertices: &[Vertex],
        primitive_type: PrimitiveType,
        texture: Option<&Texture>,
        shader: Option<&Shader>,
    ) {
        self.pre_draw(device, texture, shader);

        if device.bound_vertex_array() != Some(self.vertex_array) {
            device.bind_vertex_array(Some(self.vertex_array));
        }
        if device.bound_vertex_buffer() != Some(self.vertex_buffer) {
            device.bind_vertex_buffer(Some(self.vertex_buffer));
        }

        if vertices.len() > self.capacity {
            self.capacity = vertices.len().next_power_of_two();
            engine_debug!(SOURCE, "Staging buffer grown to {} vertices", self.capacity);
            device.buffer_data(self.capacity * Vertex::STRIDE, BufferUsage::Stream);
        }
        device.buffer_sub_data(0, bytemuck::cast_slice(vertices));

        Self::draw_primitives(device, primitive_type, 0, vertices.len());

        self.post_draw(device, texture, shader);
    }

    /// Draw `count` vertices of a caller-owned buffer starting at `first`
    pub(crate) fn draw_vertex_buffer(
        &mut self,
        device: &mut dyn GraphicsDevice,
        vertex_buffer: &VertexBuffer,
        first: usize,
        count: usize,
        texture: Option<&Texture>,
        shader: Option<&Shader>,
    ) {
        self.pre_draw(device, texture, shader);

        device.bind_vertex_array(vertex_buffer.vertex_array_handle());
        Self::draw_primitives(device, vertex_buffer.primitive_type(), first, count);
        device.bind_vertex_array(None);

        self.post_draw(device, texture, shader);
    }

    pub(crate) fn draw_primitives(device: &mut dyn GraphicsDevice, primitive_type: PrimitiveType, first: usize, count: usize) {
        device.draw_arrays(primitive_type, first, count);
    }

    fn set_uniform(&self, device: &mut dyn GraphicsDevice, location: Option<UniformLocation>, value: UniformValue) {
        if let Some(location) = location {
            device.set_uniform(location, &value);
        }
    }

    // ===== INTROSPECTION =====

    #[cfg(test)]
    pub(crate) fn program(&self) -> ProgramHandle {
        self.program
    }

    #[cfg(test)]
    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    #[cfg(test)]
    pub(crate) fn cached_texture_id(&self) -> u64 {
        self.cache_texture_id
    }
}

impl Drop for Pipeline {
    fn drop(&mut self) {
        let Ok(mut ctx) = self.context.lock() else { return };
        let device = ctx.device_mut();
        if device.bound_vertex_array() == Some(self.vertex_array) {
            device.bind_vertex_array(None);
        }
        if device.bound_vertex_buffer() == Some(self.vertex_buffer) {
            device.bind_vertex_buffer(None);
        }
        device.delete_buffer(self.vertex_buffer);
        device.delete_vertex_array(self.vertex_array);
        device.delete_program(self.program);
        engine_debug!(SOURCE, "Pipeline destroyed for context {}", ctx.id());
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
