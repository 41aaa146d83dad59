use std::convert::TryInto;
use std::ffi::CStr;
use std::fmt::Formatter;
use std::os::raw::c_char;

use erupt::vk;
#[cfg(feature = "tracing")]
use tracing1::{error, info, warn};

use crate::device::DeviceConfiguration;
#[cfg(debug_assertions)]
use crate::vk_debug::messenger_callback;
use crate::{ChurnError, Device, Result};

/// Describes how the instance should be configured.
#[derive(Clone, Debug)]
pub struct InstanceConfiguration<'a> {
    /// Name of the application.
    pub app_name: &'a str,
    /// Version of the application.
    pub app_version: Version,
    /// Name of the engine.
    pub engine_name: &'a str,
    /// Version of the engine.
    pub engine_version: Version,
    /// Instance extensions to load. The surface extensions required on the
    /// target platform are requested in addition to these.
    pub extensions: Vec<*const c_char>,
    /// Instance layers to load. Layers the loader does not know are dropped
    /// with a warning.
    pub layers: Vec<*const c_char>,
}

impl Default for InstanceConfiguration<'_> {
    fn default() -> Self {
        Self {
            app_name: "surface-churn",
            app_version: Version {
                major: 0,
                minor: 1,
                patch: 0,
            },
            engine_name: "surface-churn",
            engine_version: Version {
                major: 0,
                minor: 1,
                patch: 0,
            },
            extensions: vec![],
            layers: vec![],
        }
    }
}

/// A version number.
#[derive(Clone, Debug, Copy, Eq, PartialEq)]
pub struct Version {
    /// The version major.
    pub major: u32,
    /// The version minor.
    pub minor: u32,
    /// The version patch.
    pub patch: u32,
}

impl From<Version> for u32 {
    fn from(v: Version) -> Self {
        vk::make_api_version(0, v.major, v.minor, v.patch)
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// A non-owned handle to one enumerated physical device. Only valid as long
/// as the instance it was enumerated from lives.
#[derive(Clone, Debug)]
pub struct Adapter {
    pub(crate) raw: vk::PhysicalDevice,
    /// The adapter name as reported by the driver.
    pub name: String,
    /// The reported device type.
    pub device_type: vk::PhysicalDeviceType,
    /// How many queue families the adapter exposes.
    pub queue_family_count: u32,
}

/// Owns the Vulkan entry point and instance. Created once and shared by the
/// whole run; every surface and the logical device must be destroyed before
/// the instance is.
#[derive(Debug)]
pub struct Instance {
    #[cfg(debug_assertions)]
    debug_messenger: vk::DebugUtilsMessengerEXT,
    raw: erupt::InstanceLoader,
    _entry: erupt::EntryLoader,
}

impl Instance {
    /// Creates a new `Instance`.
    pub fn new(configuration: InstanceConfiguration) -> Result<Instance> {
        let entry = erupt::EntryLoader::new()?;

        let app_name = std::ffi::CString::new(configuration.app_name.to_owned())?;
        let engine_name = std::ffi::CString::new(configuration.engine_name.to_owned())?;

        #[cfg(feature = "tracing")]
        {
            info!("Application name: {}", configuration.app_name);
            info!("Application version: {}", configuration.app_version);
            info!("Requesting Vulkan API version: 1.0.0");
        }

        let app_info = vk::ApplicationInfoBuilder::new()
            .application_name(&app_name)
            .application_version(configuration.app_version.into())
            .engine_name(&engine_name)
            .engine_version(configuration.engine_version.into())
            .api_version(vk::make_api_version(0, 1, 0, 0));

        let available_extensions =
            unsafe { entry.enumerate_instance_extension_properties(None, None) }.map_err(
                |err| {
                    #[cfg(feature = "tracing")]
                    error!("Unable to enumerate instance extensions: {}", err);
                    ChurnError::VkResult(err)
                },
            )?;

        let available_layers =
            unsafe { entry.enumerate_instance_layer_properties(None) }.map_err(|err| {
                #[cfg(feature = "tracing")]
                error!("Unable to enumerate instance layers: {}", err);
                ChurnError::VkResult(err)
            })?;

        let extensions = Self::instance_extensions(&configuration, &available_extensions);
        let layers = Self::instance_layers(&configuration, &available_layers);
        let raw = Self::create_instance(&entry, &app_info, &extensions, &layers)?;

        #[cfg(debug_assertions)]
        let debug_messenger = Self::create_debug_utils(&raw, &available_extensions)?;

        Ok(Self {
            _entry: entry,
            raw,
            #[cfg(debug_assertions)]
            debug_messenger,
        })
    }

    /// The raw Vulkan instance handle.
    #[inline]
    pub(crate) fn raw(&self) -> &erupt::InstanceLoader {
        &self.raw
    }

    /// Enumerates all adapters known to the instance.
    pub fn adapters(&self) -> Result<Vec<Adapter>> {
        let physical_devices =
            unsafe { self.raw.enumerate_physical_devices(None) }.map_err(|err| {
                #[cfg(feature = "tracing")]
                error!("Unable to enumerate the physical devices: {}", err);
                ChurnError::VkResult(err)
            })?;

        if physical_devices.is_empty() {
            return Err(ChurnError::NoAdapter);
        }

        physical_devices
            .iter()
            .map(|physical_device| self.adapter_info(*physical_device))
            .collect()
    }

    /// Selects one adapter by its index in the enumeration order. The index
    /// is validated instead of indexing blindly into the device list.
    pub fn select_adapter(&self, index: usize) -> Result<Adapter> {
        let mut adapters = self.adapters()?;
        let count = adapters.len();
        if index >= count {
            return Err(ChurnError::AdapterIndexOutOfBounds { index, count });
        }

        let adapter = adapters.swap_remove(index);

        #[cfg(feature = "tracing")]
        info!("Using adapter: {} ({:?})", adapter.name, adapter.device_type);

        Ok(adapter)
    }

    fn adapter_info(&self, physical_device: vk::PhysicalDevice) -> Result<Adapter> {
        let properties = unsafe { self.raw.get_physical_device_properties(physical_device) };
        let name =
            unsafe { CStr::from_ptr(properties.device_name.as_ptr()) }.to_string_lossy().into_owned();
        let queue_families = unsafe {
            self.raw
                .get_physical_device_queue_family_properties(physical_device, None)
        };

        Ok(Adapter {
            raw: physical_device,
            name,
            device_type: properties.device_type,
            queue_family_count: queue_families.len().try_into()?,
        })
    }

    /// Creates the logical device bound to one queue family. The swapchain
    /// extension is requested in addition to the configured extensions.
    pub fn create_device(
        &self,
        adapter: &Adapter,
        configuration: DeviceConfiguration,
    ) -> Result<Device> {
        if configuration.queue_family_index >= adapter.queue_family_count {
            return Err(ChurnError::QueueFamilyOutOfBounds {
                index: configuration.queue_family_index,
                count: adapter.queue_family_count,
            });
        }

        let extensions = self.device_extensions(adapter, &configuration)?;

        #[cfg(feature = "tracing")]
        Self::print_extensions("device", &extensions)?;

        let priorities = [configuration.queue_priority];
        let queue_infos = [vk::DeviceQueueCreateInfoBuilder::new()
            .queue_family_index(configuration.queue_family_index)
            .queue_priorities(&priorities)];

        let create_info = vk::DeviceCreateInfoBuilder::new()
            .queue_create_infos(&queue_infos)
            .enabled_extension_names(&extensions);

        let raw =
            unsafe { erupt::DeviceLoader::new(&self.raw, adapter.raw, &create_info, None) }?;

        #[cfg(feature = "tracing")]
        info!(
            "Created logical device on queue family {}",
            configuration.queue_family_index
        );

        Ok(Device::new(raw, configuration.queue_family_index))
    }

    fn create_instance(
        entry: &erupt::EntryLoader,
        app_info: &vk::ApplicationInfoBuilder,
        instance_extensions: &[*const c_char],
        layers: &[*const c_char],
    ) -> Result<erupt::InstanceLoader> {
        #[cfg(feature = "tracing")]
        Self::print_extensions("instance", instance_extensions)?;

        let create_info = vk::InstanceCreateInfoBuilder::new()
            .flags(vk::InstanceCreateFlags::empty())
            .application_info(app_info)
            .enabled_layer_names(layers)
            .enabled_extension_names(instance_extensions);

        unsafe { erupt::InstanceLoader::new(entry, &create_info, None) }.map_err(|err| {
            #[cfg(feature = "tracing")]
            error!("Unable to create Vulkan instance: {}", err);
            ChurnError::LoaderError(err)
        })
    }

    fn instance_extensions(
        configuration: &InstanceConfiguration,
        available_extensions: &[vk::ExtensionProperties],
    ) -> Vec<*const c_char> {
        let mut extensions: Vec<*const c_char> = configuration.extensions.clone();

        extensions.push(vk::KHR_SURFACE_EXTENSION_NAME);
        #[cfg(windows)]
        extensions.push(vk::KHR_WIN32_SURFACE_EXTENSION_NAME);
        #[cfg(debug_assertions)]
        extensions.push(vk::EXT_DEBUG_UTILS_EXTENSION_NAME);

        // Only keep available extensions.
        Self::retain_extensions(available_extensions, &mut extensions);

        extensions
    }

    fn instance_layers(
        configuration: &InstanceConfiguration,
        available_layers: &[vk::LayerProperties],
    ) -> Vec<*const c_char> {
        let mut layers = configuration.layers.clone();

        layers.retain(|layer| {
            let requested = unsafe { CStr::from_ptr(*layer) };
            let found = available_layers.iter().any(|present| unsafe {
                CStr::from_ptr(present.layer_name.as_ptr()) == requested
            });
            if !found {
                #[cfg(feature = "tracing")]
                warn!("Unable to find layer: {}", requested.to_string_lossy());
            }
            found
        });
        layers
    }

    fn device_extensions(
        &self,
        adapter: &Adapter,
        configuration: &DeviceConfiguration,
    ) -> Result<Vec<*const c_char>> {
        let mut extensions: Vec<*const c_char> = configuration.extensions.clone();

        extensions.push(vk::KHR_SWAPCHAIN_EXTENSION_NAME);

        let available_extensions = unsafe {
            self.raw
                .enumerate_device_extension_properties(adapter.raw, None, None)
        }
        .map_err(|err| {
            #[cfg(feature = "tracing")]
            error!(
                "Unable to enumerate the device extension properties: {}",
                err
            );
            ChurnError::VkResult(err)
        })?;

        // Only keep available extensions.
        Self::retain_extensions(&available_extensions, &mut extensions);

        Ok(extensions)
    }

    fn retain_extensions(
        present_extensions: &[vk::ExtensionProperties],
        requested_extensions: &mut Vec<*const c_char>,
    ) {
        requested_extensions.retain(|ext| {
            let extension = unsafe { CStr::from_ptr(*ext) };
            present_extensions.iter().any(|present| unsafe {
                CStr::from_ptr(present.extension_name.as_ptr()) == extension
            })
        });
    }

    #[cfg(feature = "tracing")]
    fn print_extensions(what: &str, extensions: &[*const c_char]) -> Result<()> {
        info!("Loading {} extensions:", what);
        for extension in extensions.iter() {
            let ext = unsafe { CStr::from_ptr(*extension).to_str() }?;
            info!("- {}", ext);
        }
        Ok(())
    }

    #[cfg(debug_assertions)]
    fn create_debug_utils(
        instance: &erupt::InstanceLoader,
        available_extensions: &[vk::ExtensionProperties],
    ) -> Result<vk::DebugUtilsMessengerEXT> {
        let debug_name = unsafe { CStr::from_ptr(vk::EXT_DEBUG_UTILS_EXTENSION_NAME) };
        let debug_utils_found = available_extensions
            .iter()
            .any(|props| unsafe { CStr::from_ptr(props.extension_name.as_ptr()) } == debug_name);

        if !debug_utils_found {
            return Err(ChurnError::DebugUtilsMissing);
        }

        let info = vk::DebugUtilsMessengerCreateInfoEXTBuilder::new()
            .message_severity(
                vk::DebugUtilsMessageSeverityFlagsEXT::ERROR_EXT
                    | vk::DebugUtilsMessageSeverityFlagsEXT::WARNING_EXT,
            )
            .message_type(vk::DebugUtilsMessageTypeFlagsEXT::all())
            .pfn_user_callback(Some(messenger_callback));

        unsafe { instance.create_debug_utils_messenger_ext(&info, None) }.map_err(|err| {
            #[cfg(feature = "tracing")]
            error!("Unable to create the debug utils messenger: {}", err);
            ChurnError::VkResult(err)
        })
    }
}

impl Drop for Instance {
    fn drop(&mut self) {
        unsafe {
            #[cfg(debug_assertions)]
            self.raw
                .destroy_debug_utils_messenger_ext(Some(self.debug_messenger), None);

            self.raw.destroy_instance(None);
        };
    }
}
