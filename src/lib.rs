#![warn(missing_docs)]
//! A diagnostic harness that repeatedly creates and destroys Vulkan
//! presentation surfaces and swapchains against short-lived native windows.
//!
//! The point of the exercise is to surface resource creation or cleanup
//! failures that only show up under repetition or under a specific Win32
//! window class style (`CS_OWNDC`, none, `CS_PARENTDC`). The instance and
//! logical device are created once; each test iteration builds a window, a
//! surface, probes the surface and builds a swapchain, then tears everything
//! down in reverse order before the next iteration starts.

pub use crate::device::{Device, DeviceConfiguration};
pub use crate::error::ChurnError;
#[cfg(windows)]
pub use crate::harness::run;
pub use crate::harness::{
    DeviceContextStyle, HarnessConfiguration, IterationFailure, StyleFailure, StyleReport,
    ALL_STYLES,
};
pub use crate::instance::{Adapter, Instance, InstanceConfiguration, Version};
pub use crate::probe::{SurfaceProperties, SwapchainSettings};
pub use crate::surface::Surface;
pub use crate::swapchain::Swapchain;
#[cfg(windows)]
pub use crate::window::{Window, WindowClass};

pub(crate) mod device;
pub(crate) mod error;
pub(crate) mod harness;
pub(crate) mod instance;
pub(crate) mod probe;
pub(crate) mod surface;
pub(crate) mod swapchain;
#[cfg(debug_assertions)]
pub(crate) mod vk_debug;
#[cfg(windows)]
pub(crate) mod window;

pub(crate) type Result<T> = std::result::Result<T, ChurnError>;

/// Construct a `*const std::os::raw::c_char` from a string
#[macro_export]
macro_rules! cstr {
    ($s:expr) => {
        concat!($s, "\0") as *const str as *const c_char
    };
}
