pub mod hit;
pub mod object;
pub mod paint;
pub mod record;
pub mod runtime;
pub mod surface;
pub mod vello_backend;
pub mod view;

pub use hit::{hit_test, node_bounds, node_transform};
pub use object::{AsAny, DrawContext, Drawable, SceneObject, Updatable};
pub use record::{DrawCommand, RecordingSurface};
pub use runtime::{FrameRequest, FrameScheduler, RenderSurface};
pub use surface::DrawSurface;
pub use vello_backend::VelloSurface;
pub use view::ViewTransform;
