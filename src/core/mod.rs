//! Core pipeline: running the target, resolving its native dependencies and
//! pruning the binding package

pub mod attribution;
pub mod elf;
pub mod pipeline;
pub mod pruner;
pub mod runner;
pub mod sampler;
pub mod target;

pub use attribution::AttributionResolver;
pub use elf::ElfResolver;
pub use pipeline::{TrimReport, Trimmer};
pub use pruner::Pruner;
pub use runner::{CommandRunner, CommandSpec, RunOutcome, ScriptedRunner, SystemRunner};
pub use sampler::DependencySampler;
pub use target::{AppLayout, TargetResolver};
