/*!
# Galaxy 2D Engine - OpenGL Renderer Backend

OpenGL / OpenGL ES implementation of the galaxy_2d_engine `GraphicsDevice`
trait, built on the glow bindings.

The application creates the GL context (and owns making it current and
swapping buffers), wraps it into a `glow::Context`, then hands it over:

```no_run
use galaxy_2d_engine::galaxy2d::device::SharedContext;
use galaxy_2d_engine::galaxy2d::render::RenderWindow;
use galaxy_2d_engine_renderer_gl::galaxy2d::GlGraphicsDevice;

# fn example(gl: glow::Context) -> galaxy_2d_engine::galaxy2d::Result<()> {
let device = GlGraphicsDevice::new(gl)?;
let context = SharedContext::new(device);
let _window = RenderWindow::new(&context, 800, 600)?;
# Ok(())
# }
```
*/

mod gl_capabilities;
mod gl_conversions;
mod gl_graphics_device;

pub use gl_graphics_device::GlGraphicsDevice;
pub use gl_capabilities::{GlVersion, GlLimits, detect_features, build_capabilities};

pub mod galaxy2d {
    pub use crate::gl_graphics_device::GlGraphicsDevice;
    pub use crate::gl_capabilities::{GlVersion, GlLimits, detect_features, build_capabilities};
}
