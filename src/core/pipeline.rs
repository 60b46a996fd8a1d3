//! The trimming pipeline
//!
//! Locate the bundle, sample what the application loads, close that set over
//! the dynamic linker, then either report on it (`--dump`) or delete every
//! binding shared object outside of it.

use chrono::Utc;
use std::io::{self, Write};
use tracing::info;

use crate::core::attribution::AttributionResolver;
use crate::core::elf::ElfResolver;
use crate::core::pruner::Pruner;
use crate::core::runner::CommandRunner;
use crate::core::sampler::DependencySampler;
use crate::core::target::{AppLayout, TargetResolver};
use crate::error::{Result, TrimError};
use crate::models::{DependencySet, DumpReport, OutputFormat, PruneReport, RetainedSet, Settings};
use crate::output::{
    create_formatter, create_writer, format_names, format_prune_summary, section_header, ProgressReporter,
};

/// Everything one run produced
#[derive(Debug, Clone)]
pub struct TrimReport {
    pub layout: AppLayout,
    pub app_deps: DependencySet,
    pub closure: DependencySet,
    pub retained: RetainedSet,
    /// Present in dump mode
    pub dump: Option<DumpReport>,
    /// Present when the binding package was pruned
    pub prune: Option<PruneReport>,
}

pub struct Trimmer<'a, R: CommandRunner> {
    runner: &'a R,
    settings: &'a Settings,
    progress: ProgressReporter,
}

impl<'a, R: CommandRunner> Trimmer<'a, R> {
    pub fn new(runner: &'a R, settings: &'a Settings) -> Self {
        let show_progress = settings.show_progress && !settings.quiet;
        Self {
            runner,
            settings,
            progress: ProgressReporter::new(show_progress),
        }
    }

    /// Run the whole pipeline for `module`, printing the console sections to `console`
    pub fn run(&self, module: &str, console: &mut dyn Write) -> Result<TrimReport> {
        let mut sink = io::sink();
        let console: &mut dyn Write = if self.report_owns_stdout() { &mut sink } else { console };
        let colors = self.settings.use_colors;

        let layout = TargetResolver::new(self.runner, self.settings).resolve()?;

        print(console, &section_header("APP DEPS", colors))?;
        let app_deps = DependencySampler::new(self.runner, self.settings, &layout).sample(module)?;
        print(console, &format_names(&app_deps))?;

        print(console, &section_header("RECURSIVE DEPS", colors))?;
        let closure = ElfResolver::new(self.runner)
            .with_progress(&self.progress)
            .resolve(&app_deps);

        let binding_package = self.settings.binding_package.as_str();
        let (binding_modules, other_deps) = closure.partition(|entry| entry.contains(binding_package));
        let mut retained = RetainedSet::new();
        retained.retain_all(&binding_modules);

        let dump = if self.settings.dump {
            let report = self.dump_report(module, &layout, &app_deps, binding_modules, other_deps);
            self.publish(&report, console)?;
            Some(report)
        } else {
            None
        };

        print(
            console,
            &section_header(&format!("REQUIRED {} ELFs", binding_package), colors),
        )?;
        print(console, &format_names(retained.deps()))?;

        let prune = if self.settings.dump {
            None
        } else {
            print(console, "\nClearing unused dependencies...\n")?;
            let report = Pruner::new(&self.settings.auxiliary_binaries)
                .with_progress(&self.progress)
                .prune(&layout.binding_dir, &retained)?;
            print(console, "Done\n\n")?;
            print(console, &format_prune_summary(&report, binding_package, colors))?;
            print(console, "\n")?;
            Some(report)
        };

        info!(module, retained = retained.len(), "trim finished");

        Ok(TrimReport {
            layout,
            app_deps,
            closure,
            retained,
            dump,
            prune,
        })
    }

    fn dump_report(
        &self,
        module: &str,
        layout: &AppLayout,
        app_deps: &DependencySet,
        binding_modules: DependencySet,
        other_deps: DependencySet,
    ) -> DumpReport {
        let attribution = AttributionResolver::new(self.runner, &layout.packages_dir)
            .with_progress(&self.progress)
            .attribute(&other_deps);

        DumpReport {
            generated_at: Utc::now(),
            module: module.to_string(),
            binding_package: self.settings.binding_package.clone(),
            app_deps: app_deps.clone(),
            binding_modules,
            other_deps,
            attribution,
        }
    }

    /// Text reports go inline with the console sections, everything else
    /// through the configured writer
    fn publish(&self, report: &DumpReport, console: &mut dyn Write) -> Result<()> {
        let formatter = create_formatter(self.settings.output_format, self.settings.use_colors, self.settings.verbose);
        let rendered = formatter.format(report)?;

        match (&self.settings.output_file, self.settings.output_format) {
            (None, OutputFormat::Text) => print(console, &rendered),
            (output_file, _) => create_writer(output_file.as_ref()).write(&rendered),
        }
    }

    /// A machine-readable dump on stdout must not be mixed with console sections
    fn report_owns_stdout(&self) -> bool {
        self.settings.dump
            && self.settings.output_file.is_none()
            && self.settings.output_format != OutputFormat::Text
    }
}

fn print(console: &mut dyn Write, text: &str) -> Result<()> {
    console
        .write_all(text.as_bytes())
        .map_err(|source| TrimError::StdoutWrite { source })
}
