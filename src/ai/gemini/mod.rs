pub mod client;
pub mod image;
pub mod sse;
pub mod stream;
pub mod types;

pub use image::GeminiImageClient;
