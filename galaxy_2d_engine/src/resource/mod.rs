/// GPU resources: textures, custom shaders and vertex buffers

pub mod texture;
pub mod shader;
pub mod vertex_buffer;

pub use texture::Texture;
pub use shader::Shader;
pub use vertex_buffer::VertexBuffer;
