use log::{debug, error, info, warn};

use crate::config::HistoryTarget;
use crate::filter::{LineVerdict, SecretFilter, REDACTED_MARKER};
use crate::history;
use crate::merge::merge_histories;
use crate::remote::RemoteStore;

/// How one target's reconciliation cycle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Local file and remote copy both hold the merged result.
    Synced,
    /// Local file was updated but the upload failed; the remote copy stays
    /// behind until a later cycle publishes successfully.
    RemoteStale,
    /// The local overwrite failed; nothing was persisted or published this
    /// cycle.
    Aborted,
}

/// Outcome and line counts for one target's cycle. Created fresh each cycle
/// and only ever logged.
#[derive(Debug)]
pub struct CycleReport {
    pub outcome: CycleOutcome,
    /// Lines in the merged, filtered sequence.
    pub lines: usize,
    /// Lines replaced by the redaction marker.
    pub redacted: usize,
    /// Lines dropped by a block rule.
    pub blocked: usize,
}

/// Runs one download → merge → filter → persist → publish cycle for
/// `target`.
///
/// Download and local-read failures degrade to an empty sequence and the
/// cycle proceeds; a persist failure aborts the cycle before publish; a
/// publish failure leaves the remote copy stale until a later cycle.
pub async fn sync_target<R: RemoteStore>(
    client: &R,
    target: &HistoryTarget,
    filter: Option<&SecretFilter>,
) -> CycleReport {
    let local_path = target.path.as_path();
    let remote_path = target.path.to_string_lossy();

    // A missing or unreachable remote copy is normal before the first
    // successful upload from any machine; sync proceeds from local content.
    let remote_lines = match client.download(&remote_path).await {
        Ok(Some(bytes)) => decode_lines(&bytes),
        Ok(None) => {
            debug!("[{}] no remote copy of {remote_path} yet", target.shell);
            Vec::new()
        }
        Err(err) => {
            warn!(
                "[{}] download of {remote_path} failed: {err:#}",
                target.shell
            );
            Vec::new()
        }
    };

    // A history file that does not exist yet reads as empty.
    let local_lines = match history::read_lines(local_path) {
        Ok(lines) => lines,
        Err(err) => {
            debug!(
                "[{}] no local history at {}: {err}",
                target.shell,
                local_path.display()
            );
            Vec::new()
        }
    };

    let merged = merge_histories(&local_lines, &remote_lines);

    let mut redacted = 0usize;
    let mut blocked = 0usize;
    let kept: Vec<String> = match filter {
        None => merged,
        Some(filter) => merged
            .into_iter()
            .filter_map(|line| match filter.filter_line(&line) {
                LineVerdict::Pass => Some(line),
                LineVerdict::Redact => {
                    redacted += 1;
                    Some(REDACTED_MARKER.to_string())
                }
                LineVerdict::Block => {
                    blocked += 1;
                    None
                }
            })
            .collect(),
    };

    // Persist before publish: the remote only ever receives content the
    // local file already holds.
    if let Err(err) = history::write_lines(local_path, &kept) {
        error!(
            "[{}] persisting {} failed: {err:#}",
            target.shell,
            local_path.display()
        );
        return CycleReport {
            outcome: CycleOutcome::Aborted,
            lines: kept.len(),
            redacted,
            blocked,
        };
    }

    if let Err(err) = client.upload(&remote_path, local_path).await {
        warn!(
            "[{}] publishing {remote_path} failed, remote copy lags until the next successful cycle: {err:#}",
            target.shell
        );
        return CycleReport {
            outcome: CycleOutcome::RemoteStale,
            lines: kept.len(),
            redacted,
            blocked,
        };
    }

    info!(
        "[{}] synced {} ({} lines, {} redacted, {} blocked)",
        target.shell,
        local_path.display(),
        kept.len(),
        redacted,
        blocked
    );
    CycleReport {
        outcome: CycleOutcome::Synced,
        lines: kept.len(),
        redacted,
        blocked,
    }
}

fn decode_lines(bytes: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(bytes)
        .lines()
        .map(str::to_string)
        .collect()
}
