//! One publish cycle: stored snapshot + new map revision → post text.
//!
//! Analysis failures never abort a cycle. The post goes out without its
//! land-control line, the previous share carries over and the timestamp
//! still advances, so a broken revision is processed exactly once.

use tracing::{info, warn};

use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, StateError};
use crate::metric::{self, ControlMetric};
use crate::post::{self, PostConfig};
use crate::state::{ControlSnapshot, StateStore};

/// A map revision to publish.
#[derive(Debug, Clone, Copy)]
pub struct Revision<'a> {
    /// Map contents (SVG).
    pub svg: &'a str,
    /// Upload time, epoch seconds.
    pub timestamp: i64,
    pub description: Option<&'a str>,
}

/// Everything a publishing step needs for one revision.
#[derive(Debug, Clone, PartialEq)]
pub struct Publication {
    pub media_filename: String,
    pub status: String,
    /// Description chunks, posted as a reply thread in order.
    pub replies: Vec<String>,
    /// Snapshot to persist after publishing.
    pub snapshot: ControlSnapshot,
}

/// Build the publication for `revision` against the previous snapshot.
///
/// Returns `None` when the revision is not newer than the snapshot.
pub fn prepare(
    previous: &ControlSnapshot,
    revision: &Revision<'_>,
    config: &AnalysisConfig,
    post_config: &PostConfig,
) -> Option<Publication> {
    if revision.timestamp <= previous.latest_timestamp {
        info!(
            timestamp = revision.timestamp,
            stored = previous.latest_timestamp,
            "map is not newer than the stored one, nothing to do"
        );
        return None;
    }

    let old_percent = previous.latest_percent_controlled;
    let (percent, land_line) = match measure(revision.svg, config, old_percent) {
        Ok(control) => (
            Some(control.percent),
            Some(control.report_line(&config.tracked().label)),
        ),
        Err(err) => {
            warn!("could not get areas: {err}");
            (old_percent, None)
        }
    };

    let replies = match revision.description {
        Some(description) => {
            let body = post::description_text(post_config, description);
            post::split_description(&body, post_config.max_len)
        }
        None => Vec::new(),
    };

    Some(Publication {
        media_filename: post::media_filename(post_config, revision.timestamp),
        status: post::compose_status(post_config, revision.timestamp, land_line.as_deref()),
        replies,
        snapshot: ControlSnapshot {
            latest_timestamp: revision.timestamp,
            latest_percent_controlled: percent,
            ..previous.clone()
        },
    })
}

/// Load the snapshot, prepare the publication and, when `persist` is set,
/// save the new snapshot.
pub fn run_cycle(
    store: &StateStore,
    revision: &Revision<'_>,
    config: &AnalysisConfig,
    post_config: &PostConfig,
    persist: bool,
) -> Result<Option<Publication>, StateError> {
    let previous = store.load()?;
    let publication = prepare(&previous, revision, config, post_config);
    if let Some(publication) = &publication {
        if persist {
            store.save(&publication.snapshot)?;
        }
    }
    Ok(publication)
}

fn measure(
    svg: &str,
    config: &AnalysisConfig,
    previous: Option<f64>,
) -> Result<ControlMetric, AnalysisError> {
    let areas = crate::analyze(svg, config)?;
    metric::track(&areas, previous)
}
