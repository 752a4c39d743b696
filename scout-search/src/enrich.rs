//! Bounded-prefix detail enrichment.
//!
//! Search endpoints often return shallow records. [`DetailEnricher`] issues a
//! secondary lookup for the first `bound` records only, concurrently, and
//! hands every record back in input order tagged with whatever detail was
//! obtained. A failed lookup degrades that one record to its shallow form.

use std::future::Future;

use crate::error::ProviderError;

/// Default number of leading records that receive a detail lookup.
pub const DEFAULT_ENRICHMENT_LIMIT: usize = 10;

/// A shallow record together with the outcome of its detail lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum Enriched<S, D> {
    /// The lookup ran and succeeded.
    Detailed {
        /// The original shallow record.
        shallow: S,
        /// The fetched detail.
        detail: D,
    },
    /// No lookup was made (beyond the bound) or it failed.
    Shallow(S),
}

impl<S, D> Enriched<S, D> {
    /// The shallow record.
    pub fn shallow(&self) -> &S {
        match self {
            Self::Detailed { shallow, .. } | Self::Shallow(shallow) => shallow,
        }
    }

    /// The detail, if the lookup succeeded.
    pub fn detail(&self) -> Option<&D> {
        match self {
            Self::Detailed { detail, .. } => Some(detail),
            Self::Shallow(_) => None,
        }
    }
}

/// Runs per-item detail lookups over a bounded prefix.
#[derive(Debug, Clone, Copy)]
pub struct DetailEnricher {
    bound: usize,
}

impl Default for DetailEnricher {
    fn default() -> Self {
        Self::new(DEFAULT_ENRICHMENT_LIMIT)
    }
}

impl DetailEnricher {
    /// An enricher that looks up at most `bound` records.
    pub fn new(bound: usize) -> Self {
        Self { bound }
    }

    /// The configured bound.
    pub fn bound(&self) -> usize {
        self.bound
    }

    /// Enrich `records`, calling `fetch_detail` for the first `bound` only.
    ///
    /// The lookups run concurrently; completion order does not affect the
    /// output, which always has the same length and order as `records`.
    pub async fn enrich<S, D, F, Fut>(
        &self,
        records: Vec<S>,
        fetch_detail: F,
    ) -> Vec<Enriched<S, D>>
    where
        F: Fn(&S) -> Fut,
        Fut: Future<Output = Result<D, ProviderError>>,
    {
        let split = self.bound.min(records.len());
        let mut records = records;
        let remainder = records.split_off(split);

        let lookups = records.iter().map(&fetch_detail);
        let outcomes = futures::future::join_all(lookups).await;

        let mut out = Vec::with_capacity(split + remainder.len());
        for (index, (shallow, outcome)) in records.into_iter().zip(outcomes).enumerate() {
            match outcome {
                Ok(detail) => out.push(Enriched::Detailed { shallow, detail }),
                Err(err) => {
                    tracing::warn!(
                        index,
                        error = %err,
                        "detail lookup failed, keeping shallow record"
                    );
                    out.push(Enriched::Shallow(shallow));
                }
            }
        }
        out.extend(remainder.into_iter().map(Enriched::Shallow));

        tracing::debug!(
            total = out.len(),
            attempted = split,
            "detail enrichment finished"
        );
        out
    }
}
