//! # shellsync
//!
//! Keep shell command history in sync across machines through a shared
//! Filebrowser backend.
//!
//! ## Overview
//!
//! `shellsync` runs as a long-lived client on every machine whose history
//! should converge. On a fixed interval it reconciles each configured
//! history file with its remote copy: the remote copy is downloaded, unioned
//! with the local lines into one deduplicated sequence, passed through an
//! optional secret filter, written back atomically, and uploaded again.
//! Because the merge is a content-set union with local-first ordering, every
//! machine syncing against the same backend converges on the same history
//! without any causal conflict resolution.
//!
//! ## Key behaviors
//!
//! - **Union merge**: local ordering wins, remote-only lines append after,
//!   duplicates collapse to their first occurrence
//! - **Secret filtering**: configured regex patterns either redact matching
//!   lines to a fixed marker or drop them before anything is persisted
//! - **Partial-failure tolerance**: an unreachable remote degrades to a
//!   local-only cycle; a failed upload leaves the remote behind until the
//!   next successful pass
//! - **Atomic persistence**: the local file is replaced via temp-file +
//!   rename, never observed half-written
//!
//! ## Architecture
//!
//! The library is organized leaf-first:
//!
//! - Pure merge logic ([`merge`]) and line filtering ([`filter`])
//! - Local file access ([`history`]) and the remote transport ([`remote`])
//! - The cycle controller and interval scheduler ([`sync`])
//! - Ambient concerns ([`config`], [`logger`])

/// YAML configuration schema, loading, and defaults.
///
/// The configuration is read once at startup and immutable afterwards. It
/// names the backend endpoint and credentials, the history files to sync,
/// the sync interval and request timeout, and the secret filter rules.
pub mod config;

/// Secret filtering of history lines.
///
/// An ordered list of regular expressions compiled once at startup, with a
/// single action: `redact` replaces a matching line with a fixed marker,
/// `block` drops it entirely. Construction fails on the first invalid
/// pattern so a partially built filter can never run.
pub mod filter;

/// Local history file access.
///
/// Line-oriented reads and all-or-nothing replacement writes (temp file +
/// atomic rename) for the history files owned by the sync cycle.
pub mod history;

/// Logging setup.
///
/// Console logging controlled via `RUST_LOG`, or file logging when the
/// configuration names a log file.
pub mod logger;

/// The line-set merger.
///
/// A pure function combining two ordered line sequences into one
/// deduplicated sequence with local-first ordering.
pub mod merge;

/// The remote store boundary.
///
/// The [`remote::RemoteStore`] trait is the seam the sync engine talks
/// through; [`remote::FilebrowserClient`] implements it against the
/// Filebrowser HTTP API (JWT login, raw download, multipart upload).
pub mod remote;

/// The synchronization engine.
///
/// One cycle per target per tick: download, merge, filter, persist,
/// publish, with per-phase failure handling; plus the interval scheduler
/// that runs cycles until shutdown.
pub mod sync;
