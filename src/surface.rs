use erupt::vk;
use raw_window_handle::HasRawWindowHandle;
#[cfg(feature = "tracing")]
use tracing1::error;

use crate::{ChurnError, Instance, Result};

/// A presentation surface bound to one native window.
///
/// The borrow of the instance is what the destructor needs to release the
/// surface, and it statically guarantees that the instance outlives the
/// surface.
#[derive(Debug)]
pub struct Surface<'a> {
    raw: vk::SurfaceKHR,
    instance: &'a Instance,
}

impl<'a> Surface<'a> {
    /// Creates a new `Surface` for the given window.
    pub fn new(
        instance: &'a Instance,
        window_handle: &impl HasRawWindowHandle,
    ) -> Result<Surface<'a>> {
        let raw =
            unsafe { erupt::utils::surface::create_surface(instance.raw(), window_handle, None) }
                .map_err(|err| {
                    #[cfg(feature = "tracing")]
                    error!("Unable to create a surface: {}", err);
                    ChurnError::VkResult(err)
                })?;

        Ok(Self { raw, instance })
    }

    /// The raw Vulkan surface handle.
    #[inline]
    pub(crate) fn raw(&self) -> vk::SurfaceKHR {
        self.raw
    }
}

impl Drop for Surface<'_> {
    fn drop(&mut self) {
        unsafe {
            self.instance.raw().destroy_surface_khr(Some(self.raw), None);
        };
    }
}
