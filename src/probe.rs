use erupt::vk;
#[cfg(feature = "tracing")]
use tracing1::error;

use crate::{Adapter, ChurnError, Instance, Result, Surface};

/// Point-in-time query results for one surface and adapter pair. Recomputed
/// every iteration and discarded after parameter selection.
#[derive(Clone, Debug)]
pub struct SurfaceProperties {
    /// The surface capabilities.
    pub capabilities: vk::SurfaceCapabilitiesKHR,
    /// The supported surface formats, in driver order.
    pub formats: Vec<vk::SurfaceFormatKHR>,
    /// The supported present modes, in driver order.
    pub present_modes: Vec<vk::PresentModeKHR>,
    /// Whether the probed queue family can present to the surface.
    pub presentation_supported: bool,
    queue_family_index: u32,
}

impl SurfaceProperties {
    /// Probes capabilities, formats, present modes and queue family
    /// presentation support for the given surface and adapter.
    pub fn query(
        instance: &Instance,
        adapter: &Adapter,
        surface: &Surface<'_>,
        queue_family_index: u32,
    ) -> Result<SurfaceProperties> {
        let capabilities = unsafe {
            instance
                .raw()
                .get_physical_device_surface_capabilities_khr(adapter.raw, surface.raw())
        }
        .map_err(|err| {
            #[cfg(feature = "tracing")]
            error!("Unable to query the surface capabilities: {}", err);
            ChurnError::VkResult(err)
        })?;

        let formats = unsafe {
            instance
                .raw()
                .get_physical_device_surface_formats_khr(adapter.raw, surface.raw(), None)
        }
        .map_err(|err| {
            #[cfg(feature = "tracing")]
            error!("Unable to query the surface formats: {}", err);
            ChurnError::VkResult(err)
        })?;

        let present_modes = unsafe {
            instance
                .raw()
                .get_physical_device_surface_present_modes_khr(adapter.raw, surface.raw(), None)
        }
        .map_err(|err| {
            #[cfg(feature = "tracing")]
            error!("Unable to query the surface present modes: {}", err);
            ChurnError::VkResult(err)
        })?;

        let presentation_supported = unsafe {
            instance.raw().get_physical_device_surface_support_khr(
                adapter.raw,
                queue_family_index,
                surface.raw(),
            )
        }
        .map_err(|err| {
            #[cfg(feature = "tracing")]
            error!("Unable to query the surface support: {}", err);
            ChurnError::VkResult(err)
        })?;

        Ok(Self {
            capabilities,
            formats: formats.to_vec(),
            present_modes: present_modes.to_vec(),
            presentation_supported,
            queue_family_index,
        })
    }
}

/// The parameters a swapchain is created with.
#[derive(Clone, Copy, Debug)]
pub struct SwapchainSettings {
    /// Number of images, the capabilities' reported minimum.
    pub image_count: u32,
    /// The image format.
    pub format: vk::Format,
    /// The image color space.
    pub color_space: vk::ColorSpaceKHR,
    /// The image extent, the capabilities' reported current extent.
    pub extent: vk::Extent2D,
    /// The present mode.
    pub present_mode: vk::PresentModeKHR,
    /// The surface pre-transform.
    pub pre_transform: vk::SurfaceTransformFlagBitsKHR,
}

impl SwapchainSettings {
    /// Selects swapchain parameters from probed surface properties.
    ///
    /// The policy is deliberately naive: the minimum image count, the first
    /// format and the first present mode the driver returned, the current
    /// extent. Selection is a pure function of the query results, so equal
    /// properties always select equal parameters. Empty lists and missing
    /// presentation support are distinct errors, not out-of-bounds accesses.
    pub fn select(properties: &SurfaceProperties) -> Result<SwapchainSettings> {
        if !properties.presentation_supported {
            return Err(ChurnError::PresentationUnsupported(
                properties.queue_family_index,
            ));
        }

        let format = properties
            .formats
            .first()
            .ok_or(ChurnError::NoSurfaceFormat)?;
        let present_mode = *properties
            .present_modes
            .first()
            .ok_or(ChurnError::NoPresentMode)?;

        let capabilities = &properties.capabilities;
        let pre_transform = if capabilities
            .supported_transforms
            .contains(vk::SurfaceTransformFlagsKHR::IDENTITY_KHR)
        {
            vk::SurfaceTransformFlagBitsKHR::IDENTITY_KHR
        } else {
            capabilities.current_transform
        };

        Ok(Self {
            image_count: capabilities.min_image_count,
            format: format.format,
            color_space: format.color_space,
            extent: capabilities.current_extent,
            present_mode,
            pre_transform,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_properties(
        formats: Vec<vk::SurfaceFormatKHR>,
        present_modes: Vec<vk::PresentModeKHR>,
        presentation_supported: bool,
    ) -> SurfaceProperties {
        let mut capabilities = vk::SurfaceCapabilitiesKHR::default();
        capabilities.min_image_count = 2;
        capabilities.max_image_count = 8;
        capabilities.current_extent = vk::Extent2D {
            width: 500,
            height: 500,
        };
        capabilities.supported_transforms = vk::SurfaceTransformFlagsKHR::IDENTITY_KHR;
        capabilities.current_transform = vk::SurfaceTransformFlagBitsKHR::IDENTITY_KHR;

        SurfaceProperties {
            capabilities,
            formats,
            present_modes,
            presentation_supported,
            queue_family_index: 0,
        }
    }

    fn two_formats() -> Vec<vk::SurfaceFormatKHR> {
        vec![
            vk::SurfaceFormatKHR {
                format: vk::Format::B8G8R8A8_SRGB,
                color_space: vk::ColorSpaceKHR::SRGB_NONLINEAR_KHR,
            },
            vk::SurfaceFormatKHR {
                format: vk::Format::R8G8B8A8_UNORM,
                color_space: vk::ColorSpaceKHR::SRGB_NONLINEAR_KHR,
            },
        ]
    }

    fn two_present_modes() -> Vec<vk::PresentModeKHR> {
        vec![
            vk::PresentModeKHR::MAILBOX_KHR,
            vk::PresentModeKHR::FIFO_KHR,
        ]
    }

    #[test]
    fn selects_first_entries_and_minimum_image_count() {
        let properties = test_properties(two_formats(), two_present_modes(), true);
        let settings = SwapchainSettings::select(&properties).unwrap();

        assert_eq!(settings.image_count, 2);
        assert_eq!(settings.format, vk::Format::B8G8R8A8_SRGB);
        assert_eq!(settings.color_space, vk::ColorSpaceKHR::SRGB_NONLINEAR_KHR);
        assert_eq!(settings.present_mode, vk::PresentModeKHR::MAILBOX_KHR);
        assert_eq!(settings.extent.width, 500);
        assert_eq!(settings.extent.height, 500);
        assert_eq!(
            settings.pre_transform,
            vk::SurfaceTransformFlagBitsKHR::IDENTITY_KHR
        );
    }

    #[test]
    fn selection_is_deterministic() {
        let properties = test_properties(two_formats(), two_present_modes(), true);
        let first = SwapchainSettings::select(&properties).unwrap();
        let second = SwapchainSettings::select(&properties).unwrap();

        assert_eq!(first.image_count, second.image_count);
        assert_eq!(first.format, second.format);
        assert_eq!(first.color_space, second.color_space);
        assert_eq!(first.present_mode, second.present_mode);
        assert_eq!(first.extent.width, second.extent.width);
        assert_eq!(first.extent.height, second.extent.height);
    }

    #[test]
    fn empty_format_list_is_an_error() {
        let properties = test_properties(vec![], two_present_modes(), true);
        let err = SwapchainSettings::select(&properties).unwrap_err();
        assert!(matches!(err, ChurnError::NoSurfaceFormat));
    }

    #[test]
    fn empty_present_mode_list_is_an_error() {
        let properties = test_properties(two_formats(), vec![], true);
        let err = SwapchainSettings::select(&properties).unwrap_err();
        assert!(matches!(err, ChurnError::NoPresentMode));
    }

    #[test]
    fn unsupported_presentation_is_an_error() {
        let properties = test_properties(two_formats(), two_present_modes(), false);
        let err = SwapchainSettings::select(&properties).unwrap_err();
        assert!(matches!(err, ChurnError::PresentationUnsupported(0)));
    }

    #[test]
    fn passes_the_current_extent_through_unchanged() {
        // u32::MAX is the WSI sentinel for "extent is decided by the
        // swapchain"; selection must hand it on verbatim, not second-guess
        // it against the image extent limits.
        let mut properties = test_properties(two_formats(), two_present_modes(), true);
        properties.capabilities.current_extent = vk::Extent2D {
            width: u32::MAX,
            height: u32::MAX,
        };

        let settings = SwapchainSettings::select(&properties).unwrap();
        assert_eq!(settings.extent.width, u32::MAX);
        assert_eq!(settings.extent.height, u32::MAX);
    }

    #[test]
    fn falls_back_to_current_transform() {
        let mut properties = test_properties(two_formats(), two_present_modes(), true);
        properties.capabilities.supported_transforms = vk::SurfaceTransformFlagsKHR::ROTATE_90_KHR;
        properties.capabilities.current_transform =
            vk::SurfaceTransformFlagBitsKHR::ROTATE_90_KHR;

        let settings = SwapchainSettings::select(&properties).unwrap();
        assert_eq!(
            settings.pre_transform,
            vk::SurfaceTransformFlagBitsKHR::ROTATE_90_KHR
        );
    }
}
