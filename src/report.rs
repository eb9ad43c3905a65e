//! Plain text and HTML rendering of converted values.
use std::fmt::Write;

use crate::calibration::{CalibrationProfile, CalibrationStatus};
use crate::sample::PhysicalSample;
use crate::units::Unit;
use crate::SensorInfo;

/// One labelled line of a report.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub label: String,
    pub value: String,
    pub unit: Option<Unit>,
}

/// Ordered labelled values under a title.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Report {
    pub title: String,
    pub entries: Vec<Entry>,
}

impl Report {
    pub fn new(title: impl Into<String>) -> Self {
        Report {
            title: title.into(),
            entries: Vec::new(),
        }
    }

    pub fn push(&mut self, label: impl Into<String>, value: impl ToString, unit: Option<Unit>) {
        self.entries.push(Entry {
            label: label.into(),
            value: value.to_string(),
            unit,
        });
    }

    pub fn sample(sample: &PhysicalSample) -> Self {
        let mut report = Report::new(sample.kind.title());
        for (label, value) in sample.labelled() {
            let value = match sample.unit {
                Unit::Unitless => format!("{:.6}", value),
                _ => format!("{:.2}", value),
            };
            report.push(label, value, Some(sample.unit));
        }

        report
    }

    pub fn calibration(status: &CalibrationStatus, offsets: Option<&CalibrationProfile>) -> Self {
        let mut report = Report::new("Calibration");
        for (name, level) in status.levels() {
            report.push(
                format!("{} Calibration", name),
                level.description(),
                None,
            );
        }
        if let Some(p) = offsets {
            let axes = ["X", "Y", "Z"];
            for (prefix, offset) in [
                ("Accelerometer", p.acc_offset),
                ("Magnetometer", p.mag_offset),
                ("Gyroscope", p.gyr_offset),
            ] {
                for (axis, value) in axes.iter().zip(offset) {
                    report.push(format!("{} Offset {}", prefix, axis), value, None);
                }
            }
            report.push("Accelerometer Radius", p.acc_radius, None);
            report.push("Magnetometer Radius", p.mag_radius, None);
        }

        report
    }

    pub fn info(info: &SensorInfo) -> Self {
        let mut report = Report::new("Sensor information");
        report.push("Chip ID", format!("{:#04x}", info.chip_id), None);
        report.push("Accelerometer ID", format!("{:#04x}", info.revision.accelerometer), None);
        report.push("Magnetometer ID", format!("{:#04x}", info.revision.magnetometer), None);
        report.push("Gyroscope ID", format!("{:#04x}", info.revision.gyroscope), None);
        report.push("Software Version", format!("{:#06x}", info.revision.software), None);
        report.push("Bootloader Version", format!("{:#04x}", info.revision.bootloader), None);
        report.push("Operation Mode", info.mode, None);
        report.push("Power Mode", info.power_mode, None);
        report.push("Axis Remap", format!("{:?}", info.axis_remap), None);
        report.push("Axis Sign", format!("{:?}", info.axis_sign), None);
        report.push(
            "System Status",
            info.status.map_or("unknown", |s| s.description()),
            None,
        );
        report.push("Self-Test", format!("{:?}", info.self_test), None);
        report.push(
            "System Error",
            info.error.map_or("unknown", |e| e.description()),
            None,
        );
        report.push("Unit Selection", format!("{:?}", info.units), None);
        report.push(
            "Clock Source",
            if info.external_clock { "external" } else { "internal" },
            None,
        );
        report.push(
            "Temperature",
            format!("{:.1}", info.temperature.value),
            Some(info.temperature.unit),
        );
        report.push("Calibration", info.calibration, None);

        report
    }

    /// `label = value unit` lines.
    pub fn render_text(&self) -> String {
        let width = self.entries.iter().map(|e| e.label.len()).max().unwrap_or(0);
        let mut out = String::new();
        for entry in &self.entries {
            let _ = write!(out, "{:>width$} = {}", entry.label, entry.value, width = width);
            if let Some(unit) = entry.unit.filter(|u| *u != Unit::Unitless) {
                let _ = write!(out, " {}", unit);
            }
            out.push('\n');
        }

        out
    }

    /// Minimal HTML table.
    pub fn render_html(&self) -> String {
        let mut out = String::new();
        out.push_str("<table>\n");
        let _ = writeln!(out, "<tr><th colspan=\"3\">{}</th></tr>", escape(&self.title));
        for entry in &self.entries {
            let unit = entry.unit.map(|u| u.symbol()).unwrap_or("");
            let _ = writeln!(
                out,
                "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
                escape(&entry.label),
                escape(&entry.value),
                escape(unit)
            );
        }
        out.push_str("</table>\n");

        out
    }
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
    out
}
