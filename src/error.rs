use erupt::vk;
use thiserror::Error;

/// Errors that surface-churn can throw.
#[derive(Error, Debug)]
pub enum ChurnError {
    /// A std::ffi::NulError.
    #[error(transparent)]
    NulError(#[from] std::ffi::NulError),
    /// A std::str::Utf8Error.
    #[error(transparent)]
    Utf8Error(#[from] std::str::Utf8Error),
    /// A std::num::TryFromIntError.
    #[error(transparent)]
    TryFromIntError(#[from] std::num::TryFromIntError),
    /// An erupt::utils::loading::EntryLoaderError.
    #[error(transparent)]
    EntryLoaderError(#[from] erupt::utils::loading::EntryLoaderError),
    /// An erupt::LoaderError.
    #[error(transparent)]
    LoaderError(#[from] erupt::LoaderError),
    /// A Vulkan call returned a non-success code.
    #[error("Vulkan call failed: {0}")]
    VkResult(vk::Result),

    /// The instance enumerated no physical devices at all.
    #[error("no Vulkan adapter available")]
    NoAdapter,
    /// The configured adapter index does not exist.
    #[error("adapter index {index} out of bounds, {count} adapter(s) present")]
    AdapterIndexOutOfBounds {
        /// The requested index.
        index: usize,
        /// How many adapters the instance enumerated.
        count: usize,
    },
    /// The configured queue family index does not exist on the adapter.
    #[error("queue family index {index} out of bounds, adapter has {count} families")]
    QueueFamilyOutOfBounds {
        /// The requested queue family index.
        index: u32,
        /// How many queue families the adapter reports.
        count: u32,
    },
    /// The VK_EXT_debug_utils extension is not present.
    #[error("the debug utils extension is missing")]
    DebugUtilsMissing,

    /// Registering the native window class failed.
    #[error("unable to register the window class: {0}")]
    ClassRegistration(#[source] std::io::Error),
    /// Creating the native window failed.
    #[error("unable to create a native window: {0}")]
    WindowCreation(#[source] std::io::Error),

    /// The driver returned an empty surface format list.
    #[error("the surface reports no supported formats")]
    NoSurfaceFormat,
    /// The driver returned an empty present mode list.
    #[error("the surface reports no present modes")]
    NoPresentMode,
    /// The queue family cannot present to the probed surface.
    #[error("queue family {0} cannot present to the surface")]
    PresentationUnsupported(u32),
    /// Swapchain creation was rejected by the driver. Kept separate from
    /// `VkResult` because some window class styles are known to produce this
    /// outcome reproducibly and callers need to tell the cases apart.
    #[error("swapchain creation failed: {0}")]
    SwapchainCreation(vk::Result),
}
