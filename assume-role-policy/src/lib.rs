#![deny(warnings, rust_2018_idioms)]
#![forbid(unsafe_code)]

mod args;
mod cli;
pub mod metrics;

pub use self::{
    args::PolicyArgs,
    cli::Args,
    metrics::{EvaluationMetrics, Instrumented},
};
pub use assume_role_policy_core as policy;
pub use assume_role_policy_k8s as k8s;
