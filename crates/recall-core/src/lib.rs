pub mod image;
pub mod intent;
pub mod task;

pub use image::{CreateImage, Image, ImageMatch};
pub use task::Task;
