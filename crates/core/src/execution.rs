//! Task execution module
//!
//! This module contains the bounded-concurrency task runner and the command
//! capability used by task actions to invoke external processes.

pub mod command;
pub mod runner;

pub use command::{CommandOutput, CommandRunner, GitClient, SystemCommandRunner};
pub use runner::{run_tasks, Completion, RunSummary, Task, TaskOutcome, TaskResult};
