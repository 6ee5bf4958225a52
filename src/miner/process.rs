//! Backend that runs the mining engine as a child process.
//!
//! The engine receives a JSON [`LaunchPlan`] on stdin and runs until it
//! exits or the launcher is asked to shut down.

use std::future::Future;
use std::process::Stdio;

use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use tokio::process::{ChildStdin, Command};
use tracing::{debug, info, instrument, warn};

use super::settings::MinerSettings;
use super::{AnalyticsSettings, MinePlan, MiningBackend};
use crate::error::MinerError;
use crate::selection::Selection;
use crate::utils::shutdown_signal;

/// Document written to the engine's stdin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaunchPlan {
    pub miner: MinerSettings,
    /// Absent when analytics was never requested.
    pub analytics: Option<AnalyticsSettings>,
    pub selection: Selection,
}

/// Runs the engine command.
#[derive(Debug, Clone)]
pub struct ProcessBackend {
    program: String,
    args: Vec<String>,
    analytics: Option<AnalyticsSettings>,
}

impl ProcessBackend {
    /// Parse a whitespace-separated command line.
    pub fn new(command: &str) -> Result<Self, MinerError> {
        let mut parts = command.split_whitespace().map(str::to_owned);
        let program = parts.next().ok_or(MinerError::InvalidCommand)?;

        Ok(Self {
            program,
            args: parts.collect(),
            analytics: None,
        })
    }

    /// Program that will be spawned.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments passed to the program.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Plan that `mine` would send.
    pub fn launch_plan(&self, plan: &MinePlan) -> LaunchPlan {
        LaunchPlan {
            miner: plan.settings.clone(),
            analytics: self.analytics.clone(),
            selection: plan.selection.clone(),
        }
    }
}

impl MiningBackend for ProcessBackend {
    async fn start_analytics(&mut self, analytics: &AnalyticsSettings) -> Result<(), MinerError> {
        info!(
            host = %analytics.host,
            port = analytics.port,
            "Analytics will be served by the miner at http://{}:{}",
            analytics.host,
            analytics.port
        );
        self.analytics = Some(analytics.clone());
        Ok(())
    }

    async fn mine(&mut self, plan: &MinePlan) -> Result<(), MinerError> {
        self.mine_until(plan, shutdown_signal()).await
    }
}

impl ProcessBackend {
    /// Run the engine until it exits or `shutdown` resolves.
    ///
    /// Sending the launch plan is raced against `shutdown` as well, so an
    /// engine that never drains stdin can still be stopped.
    #[instrument(skip(self, plan, shutdown), fields(program = %self.program))]
    pub async fn mine_until<F>(&mut self, plan: &MinePlan, shutdown: F) -> Result<(), MinerError>
    where
        F: Future<Output = ()>,
    {
        let payload = serde_json::to_vec(&self.launch_plan(plan))?;

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| MinerError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        info!(pid = ?child.id(), "Miner started");

        let stdin = child.stdin.take();
        let run = async {
            if let Some(stdin) = stdin {
                send_plan(stdin, &payload).await?;
            }
            Ok::<_, MinerError>(child.wait().await?)
        };

        let status = tokio::select! {
            status = run => Some(status?),
            _ = shutdown => None,
        };

        match status {
            Some(status) if status.success() => {
                info!("Miner exited");
                Ok(())
            }
            Some(status) => Err(MinerError::Exited {
                code: status.code(),
            }),
            None => {
                warn!("Stopping miner");
                child.kill().await?;
                Ok(())
            }
        }
    }
}

/// Write the plan and close stdin.
async fn send_plan(mut stdin: ChildStdin, payload: &[u8]) -> Result<(), MinerError> {
    match stdin.write_all(payload).await {
        Ok(()) => debug!(bytes = payload.len(), "Launch plan sent"),
        Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {
            warn!("Miner closed stdin before reading the launch plan");
        }
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::miner::settings::StreamerSettings;
    use crate::selection::FollowersOrder;

    fn plan() -> MinePlan {
        MinePlan {
            settings: MinerSettings {
                username: "alice".to_string(),
                claim_drops_startup: true,
                priority: Vec::new(),
                enable_analytics: true,
                logger: Default::default(),
                streamer: StreamerSettings::default(),
            },
            selection: Selection::Followers(FollowersOrder::Asc),
        }
    }

    #[test]
    fn command_is_split_on_whitespace() {
        let backend = ProcessBackend::new("  python3 -m  miner_bridge ").unwrap();
        assert_eq!(backend.program(), "python3");
        assert_eq!(backend.args(), ["-m", "miner_bridge"]);
    }

    #[test]
    fn blank_command_is_rejected() {
        assert!(matches!(
            ProcessBackend::new("   "),
            Err(MinerError::InvalidCommand)
        ));
    }

    #[tokio::test]
    async fn launch_plan_includes_analytics_once_started() {
        let mut backend = ProcessBackend::new("miner").unwrap();
        assert!(backend.launch_plan(&plan()).analytics.is_none());

        let analytics = AnalyticsSettings {
            host: "127.0.0.1".to_string(),
            port: 4550,
            refresh: 5,
            days_ago: 7,
        };
        backend.start_analytics(&analytics).await.unwrap();

        let launch = backend.launch_plan(&plan());
        assert_eq!(launch.analytics, Some(analytics));
        assert_eq!(launch.selection, Selection::Followers(FollowersOrder::Asc));
    }

    #[tokio::test]
    async fn missing_program_fails_to_spawn() {
        let mut backend = ProcessBackend::new("/nonexistent/miner-engine").unwrap();
        let err = backend.mine(&plan()).await.unwrap_err();
        assert!(matches!(err, MinerError::Spawn { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn successful_engine_exit_is_ok() {
        let mut backend = ProcessBackend::new("true").unwrap();
        tokio_test::assert_ok!(backend.mine(&plan()).await);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn failing_engine_reports_exit_code() {
        let mut backend = ProcessBackend::new("false").unwrap();
        let err = backend.mine(&plan()).await.unwrap_err();
        assert!(matches!(err, MinerError::Exited { code: Some(1) }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn shutdown_interrupts_engine_that_never_reads_stdin() {
        let mut plan = plan();
        plan.selection = Selection::Explicit(
            (0..20_000)
                .map(|i| crate::selection::ChannelName::new(&format!("streamer_{i}")).unwrap())
                .collect(),
        );
        assert!(serde_json::to_vec(&plan).unwrap().len() > 256 * 1024);

        let mut backend = ProcessBackend::new("sleep 30").unwrap();
        let shutdown = tokio::time::sleep(std::time::Duration::from_millis(200));

        let result = tokio::time::timeout(
            std::time::Duration::from_secs(10),
            backend.mine_until(&plan, shutdown),
        )
        .await
        .expect("shutdown did not interrupt the launch");
        tokio_test::assert_ok!(result);
    }
}
