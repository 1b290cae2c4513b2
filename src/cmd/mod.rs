//! CLI command implementations.
//!
//! Each submodule owns one or more related `Commands` variants:
//!
//! | Module          | Commands handled                |
//! |-----------------|---------------------------------|
//! | `release`       | `Build`, `Release`, `Tag`       |
//! | `run`           | `Run`                           |
//! | `project`       | `New`                           |
//! | `config`        | `Config`                        |

pub mod config;
pub mod project;
pub mod release;
pub mod run;

pub use config::cmd_config;
pub use project::cmd_new;
pub use release::{cmd_build, cmd_release, cmd_tag};
pub use run::cmd_run;
