/*!
# Galaxy 2D Engine

Core types of the Galaxy 2D rendering layer.

This crate turns draw calls (vertex streams with a transform, a blend mode,
an optional texture and an optional shader) into a minimal sequence of GPU
commands. It does not talk to a graphics API itself: every command goes
through the `GraphicsDevice` trait, implemented by a backend crate such as
`galaxy_2d_engine_renderer_gl`.

## Architecture

- **GraphicsDevice**: object-safe GPU command seam (GL-shaped commands, opaque handles)
- **GraphicsContext**: one device plus the state shared by its render targets
- **RenderTarget**: views, coordinate mapping, GPU state cache and the draw contract
- **RenderWindow** / **RenderTexture**: window back buffer and framebuffer-backed targets
- **Pipeline**: built-in program and staging buffer shared by the targets of a context
- **Texture** / **Shader** / **VertexBuffer**: GPU resources

Backend implementations provide concrete types that implement `GraphicsDevice`.
*/

// Internal modules
mod error;
mod engine;
pub mod log;
pub mod utils;
pub mod graphics;
pub mod graphics_device;
pub mod view;
pub mod resource;
pub mod render;

// Main galaxy2d namespace module
pub mod galaxy2d {
    // Error types
    pub use crate::error::{Error, Result};

    // Engine services (logging)
    pub use crate::engine::Engine;

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger, format_entry};
    }

    // Render sub-module: targets, views, draw states and resources
    pub mod render {
        pub use crate::render::*;
        pub use crate::resource::*;
        pub use crate::view::View;
    }

    // Graphics value types
    pub mod graphics {
        pub use crate::graphics::*;
    }

    // Device sub-module, for backend implementations
    pub mod device {
        pub use crate::graphics_device::*;
    }
}

// Re-export math library at crate root
pub use glam;
