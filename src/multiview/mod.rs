//! Multi-view geometry: camera models, mosaic projection, and attention
//! triangulation.

pub mod align;
pub mod camera;
pub mod mosaic;
pub mod triangulate;

pub use align::rotation_between;
pub use camera::{load_camera_table, Camera, CameraRecord, CameraTable};
pub use mosaic::{project_to_mosaic, FramePoints, MosaicLayout, MosaicPoints};
pub use triangulate::{intersect_rays, observation_ray, triangulate_attention, Ray};
