//! TimeoutSweeper processor.
//!
//! The TimeoutSweeper is responsible for:
//! - Periodically listing pending and active matches
//! - Running `CheckTimeout` on every match past its deadline
//! - Draining the queue afterwards so freed venues are reused
//!
//! The period follows `sweep_interval` of the shared policy and changes as
//! soon as a reload lands.

use crate::config::MatchPolicy;
use crate::controller::{CheckTimeout, DrainQueue, MatchController, TimeoutOutcome};
use crate::engine::timeout::deadline;
use crate::entities::match_record::GetOpenMatches;
use crate::error::MatchError;
use crate::utils::clock::now_utc;
use kanau::processor::Processor;
use tokio::sync::watch;
use tracing::{debug, error, info};

/// One pass of the sweeper.
#[derive(Debug, Clone, Copy)]
pub struct SweepTick;

/// What a single pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub auto_started: usize,
    pub completed: usize,
    pub failed: usize,
    pub paired: usize,
}

impl SweepReport {
    pub fn is_idle(&self) -> bool {
        *self == SweepReport::default()
    }
}

/// Resolves overdue matches on a fixed period.
pub struct TimeoutSweeper {
    controller: MatchController,
}

impl TimeoutSweeper {
    pub fn new(controller: MatchController) -> Self {
        Self { controller }
    }

    /// Run the sweeper until shutdown is signaled.
    pub async fn run(
        self,
        mut shutdown_rx: watch::Receiver<bool>,
        mut policy_rx: watch::Receiver<MatchPolicy>,
    ) {
        let mut interval = policy_rx.borrow().sweep_interval;
        info!(interval_secs = interval.as_secs(), "TimeoutSweeper started");

        loop {
            tokio::select! {
                biased;

                _ = shutdown_rx.changed() => {
                    if *shutdown_rx.borrow() {
                        info!("TimeoutSweeper received shutdown signal");
                        break;
                    }
                }

                Ok(()) = policy_rx.changed() => {
                    interval = policy_rx.borrow().sweep_interval;
                    info!(interval_secs = interval.as_secs(), "TimeoutSweeper picked up new policy");
                }

                _ = tokio::time::sleep(interval) => {
                    match self.process(SweepTick).await {
                        Ok(report) if report.is_idle() => debug!("Sweep found nothing to do"),
                        Ok(report) => info!(
                            auto_started = report.auto_started,
                            completed = report.completed,
                            failed = report.failed,
                            paired = report.paired,
                            "Sweep finished"
                        ),
                        Err(e) => error!(error = %e, "Sweep failed"),
                    }
                }
            }
        }

        info!("TimeoutSweeper shutdown complete");
    }
}

impl Processor<SweepTick> for TimeoutSweeper {
    type Output = SweepReport;
    type Error = MatchError;
    #[tracing::instrument(skip_all, err)]
    async fn process(&self, _cmd: SweepTick) -> Result<SweepReport, MatchError> {
        let policy = self.controller.policy();
        let open = self.controller.database().process(GetOpenMatches).await?;
        let now = now_utc();
        let mut report = SweepReport::default();

        for record in open {
            let due = deadline(&record.timeout_facts(None, None), &policy);
            if !due.is_some_and(|due| now >= due) {
                continue;
            }
            match self
                .controller
                .process(CheckTimeout {
                    match_id: record.id,
                })
                .await
            {
                Ok(TimeoutOutcome::AutoStarted(_)) => report.auto_started += 1,
                Ok(TimeoutOutcome::Completed(_)) => report.completed += 1,
                Ok(TimeoutOutcome::NotDue | TimeoutOutcome::AlreadyCompleted) => {}
                Err(e) => {
                    report.failed += 1;
                    error!(match_id = record.id, error = %e, "Timeout check failed");
                }
            }
        }

        report.paired = self.controller.process(DrainQueue).await?.len();
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_report() {
        assert!(SweepReport::default().is_idle());
        let report = SweepReport {
            paired: 1,
            ..SweepReport::default()
        };
        assert!(!report.is_idle());
    }
}
