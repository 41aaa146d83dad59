use std::os::raw::c_char;

/// Describes how the logical device should be configured.
///
/// The defaults encode the deliberate simplification under test: queue
/// family 0 is assumed to handle both graphics and presentation. Whether the
/// chosen family can actually present is verified per surface by
/// [`SurfaceProperties::query`](crate::SurfaceProperties::query).
#[derive(Clone, Debug)]
pub struct DeviceConfiguration {
    /// The queue family the single device queue is created on.
    pub queue_family_index: u32,
    /// Priority of the single device queue.
    pub queue_priority: f32,
    /// Device extensions to load. The swapchain extension is requested in
    /// addition to these.
    pub extensions: Vec<*const c_char>,
}

impl Default for DeviceConfiguration {
    fn default() -> Self {
        Self {
            queue_family_index: 0,
            queue_priority: 1.0,
            extensions: vec![],
        }
    }
}

/// An opened logical device bound to one queue family. Created once and
/// shared by the whole run; every swapchain must be destroyed before the
/// device is.
#[derive(Debug)]
pub struct Device {
    raw: erupt::DeviceLoader,
    queue_family_index: u32,
}

impl Device {
    pub(crate) fn new(raw: erupt::DeviceLoader, queue_family_index: u32) -> Self {
        Self {
            raw,
            queue_family_index,
        }
    }

    /// The raw Vulkan device handle.
    #[inline]
    pub(crate) fn raw(&self) -> &erupt::DeviceLoader {
        &self.raw
    }

    /// The queue family the device was created on.
    #[inline]
    pub fn queue_family_index(&self) -> u32 {
        self.queue_family_index
    }
}

impl Drop for Device {
    fn drop(&mut self) {
        unsafe {
            self.raw.destroy_device(None);
        };
    }
}
