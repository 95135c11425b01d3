#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

#[doc(inline)]
pub use roadaug_image as image;

#[doc(inline)]
pub use roadaug_imgproc as imgproc;

#[doc(inline)]
pub use roadaug_io as io;

#[doc(inline)]
pub use roadaug_augment as augment;
