// These tests need a Vulkan driver and a desktop session, like the harness
// itself. They are gated to Windows because the window classes under test
// only exist there.
#![cfg(windows)]


#[test]
fn instance_and_adapter_enumeration() {
    fixture::initialize_logging();

    let instance =
        surface_churn::Instance::new(surface_churn::InstanceConfiguration::default()).unwrap();
    let adapters = instance.adapters().unwrap();
    assert!(!adapters.is_empty());

    let adapter = instance.select_adapter(0).unwrap();
    assert!(!adapter.name.is_empty());
    assert!(adapter.queue_family_count > 0);
}

#[test]
fn adapter_index_is_validated() {
    fixture::initialize_logging();

    let instance =
        surface_churn::Instance::new(surface_churn::InstanceConfiguration::default()).unwrap();
    let err = instance.select_adapter(usize::MAX).unwrap_err();
    assert!(matches!(
        err,
        surface_churn::ChurnError::AdapterIndexOutOfBounds { .. }
    ));
}

#[test]
fn device_creation() {
    fixture::initialize_logging();

    let instance =
        surface_churn::Instance::new(surface_churn::InstanceConfiguration::default()).unwrap();
    let adapter = instance.select_adapter(0).unwrap();
    let device = instance
        .create_device(&adapter, surface_churn::DeviceConfiguration::default())
        .unwrap();
    assert_eq!(device.queue_family_index(), 0);
}

#[test]
fn short_churn_reports_every_style() {
    let configuration = fixture::test_configuration(2);
    let styles = configuration.styles.clone();

    let reports = surface_churn::run(configuration).unwrap();

    assert_eq!(reports.len(), styles.len());
    for (report, style) in reports.iter().zip(styles) {
        assert_eq!(report.style, style);
        // A style is either clean, stopped exactly at its recorded failing
        // iteration, or never got past class registration.
        match &report.failure {
            None => assert_eq!(report.completed, 2),
            Some(surface_churn::StyleFailure::Iteration(failure)) => {
                assert_eq!(failure.iteration, report.completed)
            }
            Some(surface_churn::StyleFailure::ClassRegistration(_)) => {
                assert_eq!(report.completed, 0)
            }
        }
    }
}
