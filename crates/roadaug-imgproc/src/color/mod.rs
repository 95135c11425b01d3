mod gray;
mod hls;

pub use gray::{gray_from_rgb, rgb_from_gray};
pub use hls::{hls_from_rgb, rgb_from_hls};
