// crates/cli/src/render.rs
//! Human-readable output for a settled lookup.

use std::fmt::Write;

use plate_watch_core::TrackerState;
use plate_watch_types::{JobSnapshot, ViolationDetail};

/// Summary of a completed job and its violations.
pub fn report(snapshot: &JobSnapshot) -> String {
    let Some(report) = &snapshot.result else {
        return format!("Job {} completed without a report\n", snapshot.job_id);
    };

    let mut out = String::new();
    let count = report.violation_count();
    let _ = match count {
        0 => writeln!(
            out,
            "Plate {} ({}): no violations found",
            report.license_plate, report.vehicle_type
        ),
        1 => writeln!(
            out,
            "Plate {} ({}): 1 violation",
            report.license_plate, report.vehicle_type
        ),
        n => writeln!(
            out,
            "Plate {} ({}): {n} violations",
            report.license_plate, report.vehicle_type
        ),
    };

    if count > 0 {
        for (i, detail) in report.violation_details.iter().enumerate() {
            out.push('\n');
            push_detail(&mut out, i + 1, detail);
        }
    }

    if let Some(note) = report.error_message.as_deref().filter(|m| !m.is_empty()) {
        let _ = writeln!(out, "\nnote: {note}");
    }
    out
}

fn push_detail(out: &mut String, index: usize, detail: &ViolationDetail) {
    let behavior = detail.violation_behavior.as_deref().unwrap_or("(unspecified)");
    let _ = writeln!(out, "#{index}  {behavior}");

    let fields = [
        ("time", &detail.violation_time),
        ("location", &detail.violation_location),
        ("vehicle", &detail.vehicle_type),
        ("color", &detail.vehicle_color),
        ("status", &detail.payment_status),
        ("detected by", &detail.detecting_unit),
        ("resolve at", &detail.resolution_location),
    ];
    for (label, value) in fields {
        if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
            let _ = writeln!(out, "    {:<12} {value}", format!("{label}:"));
        }
    }
}

/// One-line explanation of why a lookup did not complete.
pub fn failure(state: &TrackerState) -> String {
    let job = state
        .job
        .as_ref()
        .map(|j| format!("job {}", j.job_id))
        .unwrap_or_else(|| "lookup".to_string());

    match &state.error {
        Some(err) => format!("{job} failed: {err}"),
        None => format!("{job} failed"),
    }
}
