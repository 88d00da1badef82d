//! Batch sampling that pairs same-label samples within each mini-batch.
//!
//! The core type is [`LabelPairBatchSampler`]: given a labeled dataset, each
//! iteration produces a randomized partition of the dataset's indices into
//! batches built from same-label pairs, with leftover unpaired indices
//! distributed so that at most one batch per epoch is undersized.

pub mod dataset;
pub mod sampler;

pub use dataset::{InMemoryDataset, LabeledDataset};
pub use sampler::{LabelPairBatchSampler, Sampler};
