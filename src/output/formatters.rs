//! Output formatting functionality
//!
//! Console sections printed while the pipeline runs, and the renderings of
//! the dump report.

use ansi_term::Colour::{Blue, Cyan, Green, Yellow};
use ansi_term::Style;
use std::collections::BTreeSet;
use std::path::Path;

use crate::error::{Result, ResultExt};
use crate::models::{DependencySet, DumpReport, PruneReport};
use crate::utils::format_size;

/// `***** TITLE *****` banner surrounded by blank lines
pub fn section_header(title: &str, use_colors: bool) -> String {
    let banner = format!("***** {} *****", title);
    if use_colors {
        format!("\n{}\n\n", Blue.bold().paint(banner))
    } else {
        format!("\n{}\n\n", banner)
    }
}

/// File names of `deps`, sorted and deduplicated, as `{a, b, c}`
pub fn format_names(deps: &DependencySet) -> String {
    let names: Vec<String> = deps.names().into_iter().collect();
    format!("{{{}}}\n", names.join(", "))
}

fn label(text: &str, use_colors: bool) -> String {
    if use_colors {
        format!("{}\n", Cyan.bold().paint(format!("@ {}", text)))
    } else {
        format!("@ {}\n", text)
    }
}

fn format_packages(packages: &BTreeSet<String>) -> String {
    let quoted: Vec<String> = packages.iter().map(|p| format!("'{}'", p)).collect();
    format!("[{}]", quoted.join(", "))
}

/// Format the dump breakdown as console text
pub fn format_dump_text(report: &DumpReport, use_colors: bool, verbose: bool) -> String {
    let mut output = String::new();
    let attribution = &report.attribution;

    output.push_str(&label(&format!("{} modules:", report.binding_package), use_colors));
    output.push_str(&format_names(&report.binding_modules));
    output.push('\n');

    output.push_str(&label("other deps:", use_colors));
    output.push_str(&format_names(&report.other_deps));

    if let Some(command) = report.install_command() {
        output.push('\n');
        output.push_str(&label("dpkg resolved packages:", use_colors));
        if use_colors {
            output.push_str(&format!("$ {}\n", Green.paint(command)));
        } else {
            output.push_str(&format!("$ {}\n", command));
        }
    }

    if verbose {
        for (lib, packages) in &attribution.resolution.resolved {
            output.push_str(&format!("  {} <- {}\n", lib, format_packages(packages)));
        }
    }

    output.push('\n');
    output.push_str(&label("recognized as python modules:", use_colors));
    output.push_str(&format_names(&attribution.python_modules));

    output.push('\n');
    output.push_str(&label("total unresolved:", use_colors));
    output.push_str(&format_names(&attribution.unresolved));

    if !attribution.suggestions.is_empty() {
        output.push('\n');
        output.push_str(&label("apt-file suggests:", use_colors));
        output.push('\n');

        for (lib, packages) in &attribution.suggestions {
            let name = Path::new(lib)
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| lib.clone());
            let candidates = if packages.is_empty() && use_colors {
                Yellow.paint("[]").to_string()
            } else {
                format_packages(packages)
            };
            output.push_str(&format!("> {:20}: {}\n", name, candidates));
        }
    }

    output
}

/// Format the dump report as pretty JSON
pub fn format_dump_json(report: &DumpReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Format the dump report as CSV, one row per dependency
pub fn format_dump_csv(report: &DumpReport) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    for row in report.rows() {
        writer.serialize(row)?;
    }

    let bytes = writer
        .into_inner()
        .with_context(|| "Failed to flush CSV output")?;
    String::from_utf8(bytes).with_context(|| "CSV output is not valid UTF-8")
}

/// Summary printed after pruning
pub fn format_prune_summary(report: &PruneReport, binding_package: &str, use_colors: bool) -> String {
    let mut output = String::new();

    if !report.failed.is_empty() {
        let warning = format!("{} files could not be removed:", report.failed.len());
        if use_colors {
            output.push_str(&format!("{}\n", Yellow.bold().paint(warning)));
        } else {
            output.push_str(&format!("{}\n", warning));
        }
        for path in &report.failed {
            output.push_str(&format!("  {}\n", path.display()));
        }
        output.push('\n');
    }

    let before = format_size(report.size_before);
    let after = format_size(report.size_after);
    if use_colors {
        output.push_str(&format!(
            "{} directory size before: {}\n",
            binding_package,
            Style::new().dimmed().paint(before)
        ));
        output.push_str(&format!(
            "{} directory size after: {}\n",
            binding_package,
            Green.bold().paint(after)
        ));
    } else {
        output.push_str(&format!("{} directory size before: {}\n", binding_package, before));
        output.push_str(&format!("{} directory size after: {}\n", binding_package, after));
    }

    output
}
