// src/output/writer.rs
//! Executes an output plan by performing the actual I/O.

use super::types::{DeliveryTarget, OutputPlan, OutputReport};
use crate::error::DebugBarError;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Delivers the plan's content to every target.
///
/// Individual failures are recorded in the report rather than aborting
/// the remaining targets.
pub fn deliver(plan: &OutputPlan) -> OutputReport {
    let mut report = OutputReport::new();
    let content = plan.content();

    log::info!(
        "Delivering {} bytes to {} targets",
        content.len(),
        plan.targets().len()
    );

    for target in plan.targets() {
        match write_to(target, content) {
            Ok(()) => report.record_delivered(target.clone(), content.len()),
            Err(e) => {
                log::error!("Delivery to {} failed: {}", target, e);
                report.record_failed(target.clone(), e.to_string());
            }
        }
    }

    log::info!(
        "Delivery complete: {} succeeded, {} failed",
        report.delivered().len(),
        report.failed().len()
    );

    report
}

fn write_to(target: &DeliveryTarget, content: &str) -> Result<(), DebugBarError> {
    match target {
        DeliveryTarget::File(path) => write_file(path, content),
        DeliveryTarget::Stdout => print_to_stdout(content),
    }
}

fn write_file(path: &Path, content: &str) -> Result<(), DebugBarError> {
    log::debug!("Writing {} bytes to {}", content.len(), path.display());

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;

    log::info!("Wrote file: {}", path.display());
    Ok(())
}

fn print_to_stdout(content: &str) -> Result<(), DebugBarError> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(content.as_bytes())?;
    stdout.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn scratch(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("debug_bar_writer_{}_{}", name, std::process::id()))
    }

    #[test]
    fn test_deliver_writes_every_file() {
        let first = scratch("first").join("bar.html");
        let second = scratch("second").join("nested").join("bar.html");
        let plan = OutputPlan::new("<div id=\"debug-bar\"></div>")
            .to(DeliveryTarget::File(first.clone()))
            .to(DeliveryTarget::File(second.clone()));

        let report = deliver(&plan);
        assert!(report.is_success());
        assert_eq!(report.delivered().len(), 2);
        assert_eq!(report.bytes_written(), 52);
        for path in [&first, &second] {
            assert_eq!(fs::read_to_string(path).unwrap(), "<div id=\"debug-bar\"></div>");
        }
    }

    #[test]
    fn test_one_failure_does_not_stop_the_rest() {
        // A directory cannot be overwritten as a file.
        let dir = scratch("dir");
        fs::create_dir_all(&dir).unwrap();
        let good = scratch("good").join("bar.html");
        let plan = OutputPlan::new("x")
            .to(DeliveryTarget::File(dir.clone()))
            .to(DeliveryTarget::File(good.clone()));

        let report = deliver(&plan);
        assert!(!report.is_success());
        assert_eq!(report.failed().len(), 1);
        assert_eq!(report.failed()[0].target, DeliveryTarget::File(dir));
        assert_eq!(fs::read_to_string(&good).unwrap(), "x");
        assert!(report.into_result().is_err());
    }
}
