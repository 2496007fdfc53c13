use crate::{EvaluationMetrics, PolicyArgs};
use anyhow::Result;
use assume_role_policy_core::{AssumeRolePolicy, Decision};
use assume_role_policy_k8s::{ApiNamespaces, Pod, PodWorkload};
use clap::Parser;
use kube::api::Api;
use prometheus_client::{encoding::text::encode, registry::Registry};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, info_span, Instrument};

/// Checks whether a pod may assume an IAM role.
///
/// Exits with a non-zero status when the role is denied or when the policies could not be
/// evaluated.
#[derive(Debug, Parser)]
#[clap(name = "assume-role-policy", version, about)]
pub struct Args {
    #[clap(
        long,
        default_value = "assume_role_policy=info,warn",
        env = "ASSUME_ROLE_POLICY_LOG"
    )]
    log_level: kubert::LogFilter,

    #[clap(long, default_value = "plain")]
    log_format: kubert::LogFormat,

    #[clap(flatten)]
    client: kubert::ClientArgs,

    #[clap(flatten)]
    policy: PolicyArgs,

    /// Namespace of the requesting pod
    #[clap(long, short = 'n')]
    namespace: String,

    /// Name of the requesting pod
    #[clap(long)]
    pod: String,

    /// Role the pod requests, either a short name or an ARN
    #[clap(long)]
    role: String,

    /// Print evaluation metrics after the decision
    #[clap(long)]
    print_metrics: bool,
}

impl Args {
    #[inline]
    pub async fn parse_and_run() -> Result<Decision> {
        Self::parse().run().await
    }

    pub async fn run(self) -> Result<Decision> {
        let Self {
            log_level,
            log_format,
            client,
            policy,
            namespace,
            pod,
            role,
            print_metrics,
        } = self;

        log_format
            .try_init(log_level)
            .expect("must configure logging");

        let client = client.try_client().await?;

        let mut registry = Registry::default();
        let metrics =
            EvaluationMetrics::register(registry.sub_registry_with_prefix("assume_role_policy"));
        let policies = policy.build(Arc::new(ApiNamespaces::new(client.clone())), &metrics)?;

        let token = CancellationToken::new();
        tokio::spawn({
            let token = token.clone();
            async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    token.cancel();
                }
            }
        });
        let cx = policy.context(token);

        let pod = cx
            .run(Api::<Pod>::namespaced(client, &namespace).get(&pod))
            .await??;

        let decision = policies
            .is_allowed(&cx, &role, &PodWorkload::from(&pod))
            .instrument(info_span!("evaluate", ns = %namespace, %role))
            .await?;

        match &decision {
            Decision::Allowed => {
                info!(%role, "Allowed");
                println!("allowed");
            }
            Decision::Denied(reason) => {
                info!(%role, %reason, "Denied");
                println!("denied: {reason}");
            }
        }

        if print_metrics {
            let mut text = String::new();
            encode(&mut text, &registry)?;
            print!("{text}");
        }

        Ok(decision)
    }
}
