use erupt::vk;
#[cfg(feature = "tracing")]
use tracing1::error;

use crate::probe::SwapchainSettings;
use crate::{ChurnError, Device, Result, Surface};

/// A swapchain bound to one device and one surface, for the lifetime of a
/// single test iteration.
///
/// The borrow of the device guarantees the device outlives the swapchain;
/// the driver requires the surface to outlive it too, which the iteration
/// scope enforces by declaration order.
#[derive(Debug)]
pub struct Swapchain<'a> {
    raw: vk::SwapchainKHR,
    device: &'a Device,
}

impl<'a> Swapchain<'a> {
    /// Creates a new `Swapchain` with the selected parameters.
    ///
    /// A rejection by the driver is reported as
    /// [`ChurnError::SwapchainCreation`] so callers can attribute it to the
    /// window configuration under test.
    pub fn new(
        device: &'a Device,
        surface: &Surface<'_>,
        settings: &SwapchainSettings,
    ) -> Result<Swapchain<'a>> {
        let create_info = vk::SwapchainCreateInfoKHRBuilder::new()
            .surface(surface.raw())
            .min_image_count(settings.image_count)
            .image_format(settings.format)
            .image_color_space(settings.color_space)
            .image_extent(settings.extent)
            .image_array_layers(1)
            .image_usage(vk::ImageUsageFlags::COLOR_ATTACHMENT)
            .image_sharing_mode(vk::SharingMode::EXCLUSIVE)
            .pre_transform(settings.pre_transform)
            .composite_alpha(vk::CompositeAlphaFlagBitsKHR::OPAQUE_KHR)
            .present_mode(settings.present_mode)
            .clipped(true);

        let raw = unsafe { device.raw().create_swapchain_khr(&create_info, None) }.map_err(
            |err| {
                #[cfg(feature = "tracing")]
                error!("Unable to create a swapchain: {}", err);
                ChurnError::SwapchainCreation(err)
            },
        )?;

        Ok(Self { raw, device })
    }
}

impl Drop for Swapchain<'_> {
    fn drop(&mut self) {
        unsafe {
            self.device
                .raw()
                .destroy_swapchain_khr(Some(self.raw), None);
        };
    }
}
