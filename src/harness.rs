//! The test driver.
//!
//! One shared instance, adapter and logical device for the whole run; per
//! style variant, N fully independent iterations of window, surface, probe
//! and swapchain creation, each torn down in reverse order before the next
//! one starts.

use std::fmt::Formatter;
use std::os::raw::c_char;

#[cfg(all(windows, feature = "tracing"))]
use tracing1::{error, info};

#[cfg(windows)]
use crate::window::{Window, WindowClass};
#[cfg(windows)]
use crate::{
    Device, DeviceConfiguration, Instance, InstanceConfiguration, Surface, SurfaceProperties,
    Swapchain, SwapchainSettings, Version,
};
use crate::ChurnError;
#[cfg(windows)]
use crate::{Adapter, Result};

/// The window class device context styles under test.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DeviceContextStyle {
    /// Every window of the class allocates its own device context (CS_OWNDC).
    OwnDc,
    /// Windows share the common device context (no class style flag).
    Shared,
    /// Windows draw into their parent's device context (CS_PARENTDC).
    ParentDc,
}

impl DeviceContextStyle {
    #[cfg(windows)]
    pub(crate) fn class_suffix(self) -> &'static str {
        match self {
            DeviceContextStyle::OwnDc => "owndc",
            DeviceContextStyle::Shared => "shared",
            DeviceContextStyle::ParentDc => "parentdc",
        }
    }
}

impl std::fmt::Display for DeviceContextStyle {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            DeviceContextStyle::OwnDc => "CS_OWNDC",
            DeviceContextStyle::Shared => "0",
            DeviceContextStyle::ParentDc => "CS_PARENTDC",
        };
        f.write_str(label)
    }
}

/// All styles in the order they are tested.
pub const ALL_STYLES: [DeviceContextStyle; 3] = [
    DeviceContextStyle::OwnDc,
    DeviceContextStyle::Shared,
    DeviceContextStyle::ParentDc,
];

/// Describes how the harness should be configured.
#[derive(Clone, Debug)]
pub struct HarnessConfiguration<'a> {
    /// Application name passed to the instance.
    pub app_name: &'a str,
    /// How many create-probe-destroy cycles to run per style.
    pub iterations: u32,
    /// Which adapter to run against, by enumeration order.
    pub adapter_index: usize,
    /// The queue family the device and the presentation probe use.
    pub queue_family_index: u32,
    /// The styles to test, in order.
    pub styles: Vec<DeviceContextStyle>,
    /// Instance layers to request.
    pub layers: Vec<*const c_char>,
    /// Additional instance extensions to request.
    pub instance_extensions: Vec<*const c_char>,
    /// Additional device extensions to request.
    pub device_extensions: Vec<*const c_char>,
}

impl Default for HarnessConfiguration<'_> {
    fn default() -> Self {
        #[cfg(debug_assertions)]
        let layers = vec![crate::cstr!("VK_LAYER_KHRONOS_validation")];
        #[cfg(not(debug_assertions))]
        let layers = vec![];

        Self {
            app_name: "surface-churn",
            iterations: 50,
            adapter_index: 0,
            queue_family_index: 0,
            styles: ALL_STYLES.to_vec(),
            layers,
            instance_extensions: vec![],
            device_extensions: vec![],
        }
    }
}

/// The first failing iteration of a style loop.
#[derive(Debug)]
pub struct IterationFailure {
    /// The zero-based iteration that failed.
    pub iteration: u32,
    /// What went wrong.
    pub error: ChurnError,
}

impl std::fmt::Display for IterationFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "iteration {}: {}", self.iteration, self.error)
    }
}

/// What ended a style loop before all its iterations ran.
#[derive(Debug)]
pub enum StyleFailure {
    /// The style's window class could not be registered, so no iteration
    /// ever ran.
    ClassRegistration(ChurnError),
    /// One of the iterations failed.
    Iteration(IterationFailure),
}

/// The outcome of one style loop.
#[derive(Debug)]
pub struct StyleReport {
    /// The style that was tested.
    pub style: DeviceContextStyle,
    /// How many iterations completed cleanly.
    pub completed: u32,
    /// The failure that ended the loop early, if any.
    pub failure: Option<StyleFailure>,
}

impl StyleReport {
    /// Whether every iteration of the style loop completed.
    pub fn passed(&self) -> bool {
        self.failure.is_none()
    }
}

impl std::fmt::Display for StyleReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.failure {
            None => write!(f, "classStyle = {} test passed", self.style),
            Some(StyleFailure::ClassRegistration(error)) => write!(
                f,
                "classStyle = {} failed to register its window class: {}",
                self.style, error
            ),
            Some(StyleFailure::Iteration(failure)) => {
                write!(f, "classStyle = {} failed at {}", self.style, failure)
            }
        }
    }
}

/// Runs the whole harness: instance, adapter and device once, then one
/// style loop per configured style.
///
/// A failing iteration ends its style loop and is recorded in that style's
/// report; the remaining styles still run. Only failures to set up the
/// shared instance, adapter or device abort the run itself.
#[cfg(windows)]
pub fn run(configuration: HarnessConfiguration<'_>) -> Result<Vec<StyleReport>> {
    let instance = Instance::new(InstanceConfiguration {
        app_name: configuration.app_name,
        app_version: Version {
            major: 0,
            minor: 1,
            patch: 0,
        },
        engine_name: configuration.app_name,
        engine_version: Version {
            major: 0,
            minor: 1,
            patch: 0,
        },
        extensions: configuration.instance_extensions.clone(),
        layers: configuration.layers.clone(),
    })?;

    let adapter = instance.select_adapter(configuration.adapter_index)?;
    let device = instance.create_device(
        &adapter,
        DeviceConfiguration {
            queue_family_index: configuration.queue_family_index,
            extensions: configuration.device_extensions.clone(),
            ..Default::default()
        },
    )?;

    let mut reports = Vec::with_capacity(configuration.styles.len());
    for style in &configuration.styles {
        reports.push(churn_style(
            &instance,
            &adapter,
            &device,
            *style,
            configuration.iterations,
        ));
    }

    Ok(reports)
}

#[cfg(windows)]
fn churn_style(
    instance: &Instance,
    adapter: &Adapter,
    device: &Device,
    style: DeviceContextStyle,
    iterations: u32,
) -> StyleReport {
    let report = match WindowClass::register(style) {
        Ok(class) => churn_class(instance, adapter, device, &class, style, iterations),
        Err(error) => StyleReport {
            style,
            completed: 0,
            failure: Some(StyleFailure::ClassRegistration(error)),
        },
    };

    #[cfg(feature = "tracing")]
    if report.passed() {
        info!("{}", report);
    } else {
        error!("{}", report);
    }

    report
}

#[cfg(windows)]
fn churn_class(
    instance: &Instance,
    adapter: &Adapter,
    device: &Device,
    class: &WindowClass,
    style: DeviceContextStyle,
    iterations: u32,
) -> StyleReport {
    let title = format!("class={}", style);
    for iteration in 0..iterations {
        if let Err(error) = churn_once(instance, adapter, device, class, &title) {
            return StyleReport {
                style,
                completed: iteration,
                failure: Some(StyleFailure::Iteration(IterationFailure {
                    iteration,
                    error,
                })),
            };
        }
    }

    StyleReport {
        style,
        completed: iterations,
        failure: None,
    }
}

#[cfg(windows)]
fn churn_once(
    instance: &Instance,
    adapter: &Adapter,
    device: &Device,
    class: &WindowClass,
    title: &str,
) -> Result<()> {
    let window = Window::create(class, title)?;
    let surface = Surface::new(instance, &window)?;
    let properties =
        SurfaceProperties::query(instance, adapter, &surface, device.queue_family_index())?;
    let settings = SwapchainSettings::select(&properties)?;
    let _swapchain = Swapchain::new(device, &surface, &settings)?;

    // Scope exit destroys in reverse creation order: swapchain, surface, window.
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_configuration_matches_the_original_run() {
        let configuration = HarnessConfiguration::default();
        assert_eq!(configuration.iterations, 50);
        assert_eq!(configuration.adapter_index, 0);
        assert_eq!(configuration.queue_family_index, 0);
        assert_eq!(configuration.styles, ALL_STYLES.to_vec());
    }

    #[test]
    fn styles_run_in_the_original_order() {
        assert_eq!(
            ALL_STYLES,
            [
                DeviceContextStyle::OwnDc,
                DeviceContextStyle::Shared,
                DeviceContextStyle::ParentDc,
            ]
        );
    }

    #[test]
    fn style_labels_are_literal() {
        assert_eq!(DeviceContextStyle::OwnDc.to_string(), "CS_OWNDC");
        assert_eq!(DeviceContextStyle::Shared.to_string(), "0");
        assert_eq!(DeviceContextStyle::ParentDc.to_string(), "CS_PARENTDC");
    }

    #[test]
    fn pass_line_matches_the_expected_log() {
        let passed = StyleReport {
            style: DeviceContextStyle::OwnDc,
            completed: 50,
            failure: None,
        };
        assert_eq!(passed.to_string(), "classStyle = CS_OWNDC test passed");
    }

    #[test]
    fn reports_distinguish_pass_from_failure() {
        let passed = StyleReport {
            style: DeviceContextStyle::OwnDc,
            completed: 50,
            failure: None,
        };
        assert!(passed.passed());

        let failed = StyleReport {
            style: DeviceContextStyle::Shared,
            completed: 3,
            failure: Some(StyleFailure::Iteration(IterationFailure {
                iteration: 3,
                error: ChurnError::SwapchainCreation(
                    erupt::vk::Result::ERROR_INITIALIZATION_FAILED,
                ),
            })),
        };
        assert!(!failed.passed());
        let failure = match failed.failure {
            Some(StyleFailure::Iteration(failure)) => failure,
            other => panic!("expected an iteration failure, got {:?}", other),
        };
        assert_eq!(failure.iteration, 3);
        assert!(failure
            .error
            .to_string()
            .starts_with("swapchain creation failed"));
    }

    #[test]
    fn failure_display_names_style_and_iteration() {
        let failed = StyleReport {
            style: DeviceContextStyle::Shared,
            completed: 3,
            failure: Some(StyleFailure::Iteration(IterationFailure {
                iteration: 3,
                error: ChurnError::SwapchainCreation(
                    erupt::vk::Result::ERROR_INITIALIZATION_FAILED,
                ),
            })),
        };

        let line = failed.to_string();
        assert!(line.contains("classStyle = 0"));
        assert!(line.contains("iteration 3"));
        assert!(line.contains("swapchain creation failed"));
    }

    #[test]
    fn registration_failure_is_not_an_iteration_failure() {
        let report = StyleReport {
            style: DeviceContextStyle::ParentDc,
            completed: 0,
            failure: Some(StyleFailure::ClassRegistration(
                ChurnError::ClassRegistration(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    "access denied",
                )),
            )),
        };

        assert!(!report.passed());
        assert!(matches!(
            report.failure,
            Some(StyleFailure::ClassRegistration(_))
        ));
        let line = report.to_string();
        assert!(line.contains("classStyle = CS_PARENTDC"));
        assert!(line.contains("window class"));
    }
}
