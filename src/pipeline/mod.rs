//! The core pipeline: parse, deduplicate, classify, verify.
//!
//! Every stage is a pure, synchronous transformation over an in-memory
//! sequence. The only I/O belongs to the boundary collaborators (fetch,
//! audit log, renderer) invoked before and after this module runs.

pub mod classify;
pub mod dedup;

use crate::model::RawRecord;
use crate::parse::record::parse_record;
use crate::pipeline::classify::{classify, Classification};
use crate::pipeline::dedup::deduplicate;
use crate::policy::PolicyConfig;
use crate::verify::{VerificationBuilder, VerificationReport};
use tracing::info;

/// Everything the boundaries need: the classified output plus the finalized
/// verification report gating the renderer.
#[derive(Debug)]
pub struct PipelineOutcome {
    pub classification: Classification,
    pub verification: VerificationReport,
}

/// Run the full core pipeline over an already-materialized record set.
///
/// Deterministic for identical input data regardless of arrival order of the
/// final fingerprint's subjects; a single bad record is counted and excluded,
/// never fatal.
pub fn run(records: &[RawRecord], policy: &PolicyConfig) -> PipelineOutcome {
    let mut builder = VerificationBuilder::new();
    builder.raw_records(records.len());

    let mut advisories = Vec::with_capacity(records.len());
    for raw in records {
        match parse_record(raw, policy) {
            Some(adv) => advisories.push(adv),
            None => builder.parse_failure(if raw.title.is_empty() {
                "<no title>"
            } else {
                raw.title.as_str()
            }),
        }
    }
    builder.parsed_records(advisories.len());
    info!(
        "parsed {} of {} raw records",
        advisories.len(),
        records.len()
    );

    let (deduped, drop_descriptions) = deduplicate(advisories);
    if !drop_descriptions.is_empty() {
        info!("removed {} duplicate record(s)", drop_descriptions.len());
    }
    builder.dedup_outcome(drop_descriptions, deduped.len());

    let classification = classify(deduped, policy);
    let verification = builder.finalize(
        policy,
        &classification.prohibited,
        &classification.high_risk,
    );

    PipelineOutcome {
        classification,
        verification,
    }
}
