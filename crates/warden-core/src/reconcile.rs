//! Singleton reconciliation.
//!
//! On startup, every running warden instance that manages the same tag is listed. The
//! most recently created one survives; all older ones are stopped (and optionally have
//! their images removed). Per-duplicate failures never block startup unless the
//! [`ReconcilePolicy::Strict`] policy is selected.
use std::{sync::Arc, time::Duration};

use tracing::{debug, info, instrument, warn};
use warden_model::{ContainerView, Filter, Flag, ReconcilePolicy, sort_by_created};

use crate::{
    client::{ClientError, ContainerClient},
    error::CoreError,
    metrics::{MetricsHandle, noop_metrics},
};

/// Grace period given to each duplicate instance before it is killed.
pub const DUPLICATE_STOP_GRACE: Duration = Duration::from_secs(60);

/// Operation attempted against a duplicate instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetireAction {
    Stop,
    RemoveImage,
}

impl RetireAction {
    pub fn as_label(&self) -> &'static str {
        match self {
            RetireAction::Stop => "stop",
            RetireAction::RemoveImage => "remove_image",
        }
    }
}

#[derive(Debug)]
pub struct RetireFailure {
    pub container: ContainerView,
    pub action: RetireAction,
    pub error: ClientError,
}

/// What a reconciliation pass found and did.
#[derive(Debug, Default)]
pub struct ReconcileReport {
    /// The instance left running; `None` when no instance was found.
    pub survivor: Option<ContainerView>,
    /// Duplicates that were stopped successfully, oldest first.
    pub retired: Vec<ContainerView>,
    /// Stop/remove operations that failed.
    pub failures: Vec<RetireFailure>,
}

impl ReconcileReport {
    /// `true` when there was nothing to retire.
    pub fn is_noop(&self) -> bool {
        self.retired.is_empty() && self.failures.is_empty()
    }
}

/// Retires duplicate warden instances through a [`ContainerClient`].
pub struct Reconciler {
    client: Arc<dyn ContainerClient>,
    policy: ReconcilePolicy,
    grace: Duration,
    metrics: MetricsHandle,
}

impl Reconciler {
    pub fn new(client: Arc<dyn ContainerClient>) -> Self {
        Self {
            client,
            policy: ReconcilePolicy::default(),
            grace: DUPLICATE_STOP_GRACE,
            metrics: noop_metrics(),
        }
    }

    pub fn with_policy(mut self, policy: ReconcilePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_metrics(mut self, metrics: MetricsHandle) -> Self {
        self.metrics = metrics;
        self
    }

    /// Ensure at most one warden instance for `tag` keeps running.
    ///
    /// Listing failures are fatal. Stop/remove failures are collected in the report
    /// and, under [`ReconcilePolicy::Strict`], turned into [`CoreError::Retire`] after
    /// every duplicate has been attempted.
    #[instrument(level = "debug", skip(self), fields(policy = %self.policy))]
    pub async fn reconcile(&self, tag: &str, cleanup: Flag) -> Result<ReconcileReport, CoreError> {
        let mut instances = self
            .client
            .list_containers(&Filter::manager_instances(tag))
            .await
            .map_err(CoreError::Listing)?;

        let mut report = ReconcileReport::default();
        if instances.len() <= 1 {
            debug!(found = instances.len(), "no duplicate instances");
            report.survivor = instances.pop();
            return Ok(report);
        }

        sort_by_created(&mut instances);
        let survivor = instances.pop();
        if let Some(s) = &survivor {
            info!(
                survivor = %s.name,
                duplicates = instances.len(),
                "multiple warden instances detected; retiring older ones"
            );
        }
        report.survivor = survivor;

        for dup in instances {
            let stopped = match self.client.stop_container(&dup, self.grace).await {
                Ok(()) => {
                    info!(container = %dup.name, id = %dup.id, "stopped duplicate instance");
                    self.metrics.record_duplicate_retired();
                    true
                }
                Err(e) => {
                    self.fail(&mut report, &dup, RetireAction::Stop, e);
                    false
                }
            };

            if cleanup.is_enabled() {
                match self.client.remove_image(&dup).await {
                    Ok(()) => debug!(container = %dup.name, image = %dup.image, "removed image"),
                    Err(e) => self.fail(&mut report, &dup, RetireAction::RemoveImage, e),
                }
            }

            if stopped {
                report.retired.push(dup);
            }
        }

        if self.policy == ReconcilePolicy::Strict && !report.failures.is_empty() {
            return Err(CoreError::Retire {
                failed: report.failures.len(),
            });
        }
        Ok(report)
    }

    fn fail(
        &self,
        report: &mut ReconcileReport,
        container: &ContainerView,
        action: RetireAction,
        error: ClientError,
    ) {
        warn!(
            container = %container.name,
            id = %container.id,
            action = action.as_label(),
            error = %error,
            "failed to retire duplicate instance"
        );
        self.metrics.record_retire_error(action.as_label());
        report.failures.push(RetireFailure {
            container: container.clone(),
            action,
            error,
        });
    }
}

/// Best-effort reconciliation with default settings.
pub async fn reconcile(
    client: Arc<dyn ContainerClient>,
    tag: &str,
    cleanup: Flag,
) -> Result<ReconcileReport, CoreError> {
    Reconciler::new(client).reconcile(tag, cleanup).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Call {
        Stop(String, Duration),
        RemoveImage(String),
    }

    #[derive(Default)]
    struct FakeClient {
        containers: Vec<ContainerView>,
        fail_list: bool,
        fail_stop_for: Vec<String>,
        fail_remove: bool,
        calls: Mutex<Vec<Call>>,
    }

    impl FakeClient {
        fn with(containers: Vec<ContainerView>) -> Self {
            Self {
                containers,
                ..Default::default()
            }
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn stopped(&self) -> Vec<String> {
            self.calls()
                .into_iter()
                .filter_map(|c| match c {
                    Call::Stop(id, _) => Some(id),
                    _ => None,
                })
                .collect()
        }
    }

    #[async_trait]
    impl ContainerClient for FakeClient {
        async fn list_containers(&self, filter: &Filter) -> Result<Vec<ContainerView>, ClientError> {
            if self.fail_list {
                return Err(ClientError::Unreachable("socket closed".into()));
            }
            Ok(self
                .containers
                .iter()
                .filter(|c| filter.matches(c))
                .cloned()
                .collect())
        }

        async fn stop_container(&self, c: &ContainerView, grace: Duration) -> Result<(), ClientError> {
            self.calls.lock().unwrap().push(Call::Stop(c.id.clone(), grace));
            if self.fail_stop_for.contains(&c.id) {
                return Err(ClientError::Command {
                    command: "stop".into(),
                    stderr: "no such container".into(),
                });
            }
            Ok(())
        }

        async fn remove_image(&self, c: &ContainerView) -> Result<(), ClientError> {
            self.calls.lock().unwrap().push(Call::RemoveImage(c.id.clone()));
            if self.fail_remove {
                return Err(ClientError::Command {
                    command: "image rm".into(),
                    stderr: "image in use".into(),
                });
            }
            Ok(())
        }
    }

    fn instance(id: &str, tag: &str, hour: u32, minute: u32) -> ContainerView {
        ContainerView::new(
            id,
            format!("warden-{id}"),
            format!("img-{id}"),
            Utc.with_ymd_and_hms(2024, 3, 1, hour, minute, 0).unwrap(),
        )
        .as_manager()
        .with_tag(tag)
    }

    async fn run(client: &Arc<FakeClient>, cleanup: bool) -> Result<ReconcileReport, CoreError> {
        let dyn_client: Arc<dyn ContainerClient> = client.clone();
        reconcile(dyn_client, "prod", cleanup.into()).await
    }

    #[tokio::test]
    async fn no_instances_means_no_calls() {
        let client = Arc::new(FakeClient::with(vec![]));
        let report = run(&client, true).await.unwrap();

        assert!(report.survivor.is_none());
        assert!(report.is_noop());
        assert!(client.calls().is_empty());
    }

    #[tokio::test]
    async fn single_instance_means_no_calls() {
        let client = Arc::new(FakeClient::with(vec![instance("a", "prod", 10, 0)]));
        let report = run(&client, true).await.unwrap();

        assert_eq!(report.survivor.unwrap().id, "a");
        assert!(client.calls().is_empty());
    }

    #[tokio::test]
    async fn retires_all_but_latest() {
        let client = Arc::new(FakeClient::with(vec![
            instance("c1000", "prod", 10, 0),
            instance("c1010", "prod", 10, 10),
            instance("c1005", "prod", 10, 5),
        ]));
        let report = run(&client, false).await.unwrap();

        assert_eq!(report.survivor.unwrap().id, "c1010");
        assert_eq!(client.stopped(), ["c1000", "c1005"]);
        assert_eq!(
            client.calls(),
            [
                Call::Stop("c1000".into(), DUPLICATE_STOP_GRACE),
                Call::Stop("c1005".into(), DUPLICATE_STOP_GRACE),
            ]
        );
        let retired: Vec<_> = report.retired.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(retired, ["c1000", "c1005"]);
    }

    #[tokio::test]
    async fn survivor_is_latest_for_every_input_order() {
        let base = [
            instance("t1", "prod", 9, 0),
            instance("t2", "prod", 9, 30),
            instance("t3", "prod", 11, 0),
        ];
        let perms = [[0, 1, 2], [0, 2, 1], [1, 0, 2], [1, 2, 0], [2, 0, 1], [2, 1, 0]];

        for perm in perms {
            let list = perm.iter().map(|&i| base[i].clone()).collect();
            let client = Arc::new(FakeClient::with(list));
            let report = run(&client, false).await.unwrap();

            assert_eq!(report.survivor.unwrap().id, "t3", "permutation {perm:?}");
            assert_eq!(client.stopped().len(), 2);
            assert!(!client.stopped().contains(&"t3".to_string()));
        }
    }

    #[tokio::test]
    async fn cleanup_removes_images_of_duplicates_only() {
        let client = Arc::new(FakeClient::with(vec![
            instance("old", "prod", 8, 0),
            instance("new", "prod", 9, 0),
        ]));
        run(&client, true).await.unwrap();

        assert_eq!(
            client.calls(),
            [
                Call::Stop("old".into(), DUPLICATE_STOP_GRACE),
                Call::RemoveImage("old".into()),
            ]
        );
    }

    #[tokio::test]
    async fn ignores_other_tags_and_non_managers() {
        let mut plain = instance("plain", "prod", 7, 0);
        plain.is_manager = false;

        let client = Arc::new(FakeClient::with(vec![
            instance("other-tag", "staging", 6, 0),
            plain,
            instance("only", "prod", 8, 0),
        ]));
        let report = run(&client, true).await.unwrap();

        assert_eq!(report.survivor.unwrap().id, "only");
        assert!(client.calls().is_empty());
    }

    #[tokio::test]
    async fn listing_failure_is_fatal() {
        let client = Arc::new(FakeClient {
            fail_list: true,
            ..Default::default()
        });
        let err = run(&client, false).await.unwrap_err();

        assert!(matches!(err, CoreError::Listing(ClientError::Unreachable(_))));
        assert!(client.calls().is_empty());
    }

    #[tokio::test]
    async fn stop_failure_does_not_halt_the_loop() {
        let client = Arc::new(FakeClient {
            containers: vec![
                instance("a", "prod", 1, 0),
                instance("b", "prod", 2, 0),
                instance("c", "prod", 3, 0),
            ],
            fail_stop_for: vec!["a".into()],
            fail_remove: true,
            ..Default::default()
        });
        let report = run(&client, true).await.unwrap();

        assert_eq!(client.stopped(), ["a", "b"]);
        assert_eq!(report.failures.len(), 3);
        assert_eq!(report.failures[0].action, RetireAction::Stop);
        let retired: Vec<_> = report.retired.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(retired, ["b"]);
    }

    #[tokio::test]
    async fn strict_policy_reports_failures_after_attempting_all() {
        let client = Arc::new(FakeClient {
            containers: vec![
                instance("a", "prod", 1, 0),
                instance("b", "prod", 2, 0),
                instance("c", "prod", 3, 0),
            ],
            fail_stop_for: vec!["a".into()],
            ..Default::default()
        });
        let dyn_client: Arc<dyn ContainerClient> = client.clone();
        let err = Reconciler::new(dyn_client)
            .with_policy(ReconcilePolicy::Strict)
            .reconcile("prod", Flag::disabled())
            .await
            .unwrap_err();

        assert!(matches!(err, CoreError::Retire { failed: 1 }));
        assert_eq!(client.stopped(), ["a", "b"]);
    }
}
