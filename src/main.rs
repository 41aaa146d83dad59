//! Binary entry point for the churn harness.

fn main() {
    #[cfg(feature = "tracing")]
    {
        // Log level is based on RUST_LOG env var.
        let filter = tracing_subscriber::EnvFilter::from_default_env();
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    std::process::exit(run());
}

#[cfg(windows)]
fn run() -> i32 {
    let configuration = surface_churn::HarnessConfiguration::default();

    match surface_churn::run(configuration) {
        Ok(reports) => {
            let mut code = 0;
            for report in reports.iter().filter(|report| !report.passed()) {
                eprintln!("surface-churn: {}", report);
                code = 1;
            }
            code
        }
        Err(err) => {
            eprintln!("surface-churn: {}", err);
            1
        }
    }
}

#[cfg(not(windows))]
fn run() -> i32 {
    eprintln!("surface-churn exercises Win32 window class styles and only runs on Windows");
    1
}
