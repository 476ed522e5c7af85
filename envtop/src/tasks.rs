//! Runs session effects on the tokio runtime.
//!
//! Every load is a spawned task that posts exactly one completion event back
//! into the session's queue. Loads are never cancelled; the reveal timer is,
//! through a `CancellationToken` per schedule.

use std::future::Future;
use std::ops::ControlFlow;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::dao::ResourceClient;
use crate::diff::DiffReport;
use crate::error::Result;
use crate::resolver::Resolver;
use crate::session::{Effect, Event, Load};
use crate::structs::Workload;

pub struct Dispatcher<C> {
    client: C,
    tx: mpsc::UnboundedSender<Event>,
    reveal_timer: Option<CancellationToken>,
}

impl<C> Dispatcher<C>
where
    C: ResourceClient + Clone + 'static,
{
    pub fn new(client: C, tx: mpsc::UnboundedSender<Event>) -> Self {
        Self {
            client,
            tx,
            reveal_timer: None,
        }
    }

    /// Starts `effect`. Breaks when the session asked to quit.
    pub fn dispatch(&mut self, effect: Effect) -> ControlFlow<()> {
        match effect {
            Effect::LoadNamespaces => self.spawn_load(Load::Namespaces, |client| async move {
                client.list_namespaces().await.map(Event::NamespacesLoaded)
            }),
            Effect::LoadApps(namespace) => self.spawn_load(Load::Apps, |client| async move {
                client.list_apps(&namespace).await.map(Event::AppsLoaded)
            }),
            Effect::ResolveEnv(workload) => self.spawn_load(Load::Env, |client| async move {
                Resolver::new(client)
                    .resolve(&workload)
                    .await
                    .map(Event::EnvLoaded)
            }),
            Effect::ResolveDiff {
                workload,
                namespace_a,
                namespace_b,
            } => self.spawn_load(Load::Diff, |client| async move {
                resolve_diff(client, workload, namespace_a, namespace_b)
                    .await
                    .map(Event::DiffLoaded)
            }),
            Effect::ScheduleRevealExpiry { generation, after } => {
                self.schedule_reveal_expiry(generation, after)
            }
            Effect::CancelRevealExpiry => self.cancel_reveal_expiry(),
            Effect::Quit => {
                self.cancel_reveal_expiry();
                return ControlFlow::Break(());
            }
        }
        ControlFlow::Continue(())
    }

    fn spawn_load<F, Fut>(&self, load: Load, f: F)
    where
        F: FnOnce(C) -> Fut,
        Fut: Future<Output = Result<Event>> + Send + 'static,
    {
        let task = f(self.client.clone());
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let event = match task.await {
                Ok(event) => event,
                Err(e) => {
                    warn!(%load, error = %e, "load failed");
                    Event::LoadFailed {
                        load,
                        message: e.to_string(),
                    }
                }
            };
            if tx.send(event).is_err() {
                debug!(%load, "event loop closed before completion");
            }
        });
    }

    fn schedule_reveal_expiry(&mut self, generation: u64, after: Duration) {
        self.cancel_reveal_expiry();
        let token = CancellationToken::new();
        self.reveal_timer = Some(token.clone());

        let tx = self.tx.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => debug!(generation, "reveal timer cancelled"),
                _ = tokio::time::sleep(after) => {
                    tx.send(Event::RevealExpired { generation }).ok();
                }
            }
        });
    }

    fn cancel_reveal_expiry(&mut self) {
        if let Some(token) = self.reveal_timer.take() {
            token.cancel();
        }
    }
}

/// Resolves the same workload in both namespaces and compares the results.
async fn resolve_diff<C: ResourceClient>(
    client: C,
    workload: Workload,
    namespace_a: String,
    namespace_b: String,
) -> Result<DiffReport> {
    let resolver = Resolver::new(client);
    let other = workload.in_namespace(&namespace_b);
    let (a, b) = tokio::try_join!(resolver.resolve(&workload), resolver.resolve(&other))?;
    Ok(DiffReport::new(
        workload.name,
        namespace_a,
        namespace_b,
        &a,
        &b,
    ))
}

#[cfg(test)]
mod tests {
    use k8s_openapi::api::core::v1::{Container, EnvVar, PodSpec};
    use tokio::time::{timeout, Instant};

    use super::*;
    use crate::config::SessionConfig;
    use crate::dao::fake::FakeClient;
    use crate::diff::DiffStatus;
    use crate::session::{Key, Mode, Session};
    use crate::structs::WorkloadKind;

    fn pod(vars: &[(&str, &str)]) -> PodSpec {
        PodSpec {
            containers: vec![Container {
                name: "app".into(),
                env: Some(
                    vars.iter()
                        .map(|(name, value)| EnvVar {
                            name: name.to_string(),
                            value: Some(value.to_string()),
                            value_from: None,
                        })
                        .collect(),
                ),
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    fn setup(client: FakeClient) -> (Dispatcher<FakeClient>, mpsc::UnboundedReceiver<Event>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Dispatcher::new(client, tx), rx)
    }

    #[tokio::test]
    async fn test_load_namespaces_posts_event() {
        let (mut dispatcher, mut rx) = setup(FakeClient::new().namespaces(&["prod", "dev"]));
        assert!(dispatcher.dispatch(Effect::LoadNamespaces).is_continue());
        assert_eq!(
            rx.recv().await,
            Some(Event::NamespacesLoaded(vec!["prod".into(), "dev".into()]))
        );
    }

    #[tokio::test]
    async fn test_failed_resolve_posts_load_failed() {
        let (mut dispatcher, mut rx) = setup(FakeClient::new());
        let ghost = Workload::new("ghost", "prod", WorkloadKind::Deployment);
        dispatcher.dispatch(Effect::ResolveEnv(ghost));
        assert_eq!(
            rx.recv().await,
            Some(Event::LoadFailed {
                load: Load::Env,
                message: "Deployment prod/ghost not found".into(),
            })
        );
    }

    #[tokio::test]
    async fn test_resolve_diff_compares_namespaces() {
        let client = FakeClient::new()
            .workload(
                Workload::new("web", "prod", WorkloadKind::Deployment),
                pod(&[("A", "1"), ("B", "2")]),
            )
            .workload(
                Workload::new("web", "dev", WorkloadKind::Deployment),
                pod(&[("A", "1"), ("B", "3"), ("C", "4")]),
            );
        let (mut dispatcher, mut rx) = setup(client);
        dispatcher.dispatch(Effect::ResolveDiff {
            workload: Workload::new("web", "prod", WorkloadKind::Deployment),
            namespace_a: "prod".into(),
            namespace_b: "dev".into(),
        });

        let Some(Event::DiffLoaded(report)) = rx.recv().await else {
            panic!("expected a diff report");
        };
        let statuses: Vec<DiffStatus> = report.results.iter().map(|r| r.status).collect();
        assert_eq!(
            statuses,
            vec![DiffStatus::Same, DiffStatus::ValueDiff, DiffStatus::OnlyInB]
        );
        assert_eq!(report.namespace_b, "dev");
        assert_eq!(report.summary.only_b, 1);
    }

    #[tokio::test]
    async fn test_quit_breaks() {
        let (mut dispatcher, _rx) = setup(FakeClient::new());
        assert!(dispatcher.dispatch(Effect::Quit).is_break());
    }

    #[tokio::test(start_paused = true)]
    async fn test_reveal_expires_after_timeout() {
        let (mut dispatcher, mut rx) = setup(FakeClient::new());
        let start = Instant::now();
        dispatcher.dispatch(Effect::ScheduleRevealExpiry {
            generation: 7,
            after: Duration::from_secs(30),
        });

        assert!(timeout(Duration::from_secs(29), rx.recv()).await.is_err());
        assert_eq!(rx.recv().await, Some(Event::RevealExpired { generation: 7 }));
        assert!(start.elapsed() >= Duration::from_secs(30));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_reveal_never_fires() {
        let (mut dispatcher, mut rx) = setup(FakeClient::new());
        dispatcher.dispatch(Effect::ScheduleRevealExpiry {
            generation: 1,
            after: Duration::from_secs(30),
        });
        dispatcher.dispatch(Effect::CancelRevealExpiry);

        assert!(timeout(Duration::from_secs(120), rx.recv()).await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_rescheduling_replaces_previous_timer() {
        let (mut dispatcher, mut rx) = setup(FakeClient::new());
        dispatcher.dispatch(Effect::ScheduleRevealExpiry {
            generation: 1,
            after: Duration::from_secs(30),
        });
        dispatcher.dispatch(Effect::ScheduleRevealExpiry {
            generation: 2,
            after: Duration::from_secs(30),
        });

        assert_eq!(rx.recv().await, Some(Event::RevealExpired { generation: 2 }));
        assert!(timeout(Duration::from_secs(120), rx.recv()).await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_session_reveal_auto_expires() {
        let workload = Workload::new("web", "prod", WorkloadKind::Deployment);
        let client = FakeClient::new()
            .namespaces(&["prod"])
            .secret("prod", "sec1", &[("PWD", b"hunter2")])
            .workload(
                workload,
                PodSpec {
                    containers: vec![Container {
                        name: "app".into(),
                        env_from: Some(vec![k8s_openapi::api::core::v1::EnvFromSource {
                            secret_ref: Some(k8s_openapi::api::core::v1::SecretEnvSource {
                                name: "sec1".into(),
                                optional: None,
                            }),
                            ..Default::default()
                        }]),
                        ..Default::default()
                    }],
                    ..Default::default()
                },
            );
        let (mut dispatcher, mut rx) = setup(client);

        fn pump(session: Session, effects: Vec<Effect>, d: &mut Dispatcher<FakeClient>) -> Session {
            for effect in effects {
                let _ = d.dispatch(effect);
            }
            session
        }

        let (mut session, mut pending) = Session::new("ctx", SessionConfig::default());

        // namespaces -> apps -> env
        for _ in 0..3 {
            session = pump(session, std::mem::take(&mut pending), &mut dispatcher);
            let event = rx.recv().await.unwrap();
            let (next, effects) = session.update(event);
            session = next;
            pending = effects;
        }
        assert_eq!(session.env().len(), 1);

        let mut events: Vec<Event> = vec![Key::Tab, Key::Tab, Key::Char('r'), Key::Enter]
            .into_iter()
            .map(Event::Key)
            .collect();
        events.extend("OK".chars().map(|c| Event::Key(Key::Char(c))));
        events.push(Event::Key(Key::Enter));
        for event in events {
            let (next, effects) = session.update(event);
            session = pump(next, effects, &mut dispatcher);
        }
        let Mode::RevealShow(show) = session.mode() else {
            panic!("expected reveal show");
        };
        assert_eq!(show.value, "aHVudGVyMg==");

        let start = Instant::now();
        let event = rx.recv().await.unwrap();
        assert!(start.elapsed() >= Duration::from_secs(30));
        let (session, _) = session.update(event);
        assert!(session.mode().is_normal());
    }
}
