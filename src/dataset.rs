use std::hash::Hash;
use std::sync::Arc;

/// A `LabeledDataset` provides the minimal view a sampler needs of a dataset:
/// how many samples it holds and, for each sample, its class label.
///
/// Sample payloads are deliberately absent from this contract. Samplers emit
/// indices; the training loop maps those indices back to actual payloads
/// through whatever richer access the concrete dataset offers.
///
/// Implementations must be `Send + Sync` so one dataset instance can be
/// shared across training threads.
pub trait LabeledDataset: Send + Sync {
    /// Class identifier for a sample. Only equality and hashing are required;
    /// no ordering across labels is assumed.
    type Label: Eq + Hash + Clone + Send + Sync;

    /// The iterator type produced by `labels()`.
    type Labels<'a>: Iterator<Item = Self::Label> + 'a
    where
        Self: 'a;

    /// Returns the total number of samples.
    fn len(&self) -> usize;

    /// Iterates over every sample's label, in index order `(0, 1, ..., len-1)`.
    fn labels(&self) -> Self::Labels<'_>;

    /// Checks if the dataset is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A dataset that stores all `(payload, label)` samples in contiguous memory
/// with atomic-reference counting (`Arc<[(T, L)]>`).
///
/// Cloning only bumps the `Arc` counter, so the same dataset can be handed
/// to a sampler and a training loop without duplicating samples.
#[derive(Debug, Clone)]
pub struct InMemoryDataset<T, L> {
    samples: Arc<[(T, L)]>,
}

impl<T, L> InMemoryDataset<T, L> {
    /// Creates a new in-memory dataset from a vector of `(payload, label)` pairs.
    pub fn new(samples: Vec<(T, L)>) -> Self {
        Self {
            samples: samples.into(),
        }
    }

    /// Random-access lookup by index. Returns `None` if out of bounds.
    pub fn get(&self, index: usize) -> Option<&(T, L)> {
        self.samples.get(index)
    }
}

impl<L> InMemoryDataset<(), L> {
    /// Creates a payload-free dataset from labels alone, for embedders that
    /// keep sample payloads elsewhere and only need index sampling.
    pub fn from_labels(labels: Vec<L>) -> Self {
        Self::new(labels.into_iter().map(|label| ((), label)).collect())
    }
}

impl<T, L> LabeledDataset for InMemoryDataset<T, L>
where
    T: Send + Sync,
    L: Eq + Hash + Clone + Send + Sync,
{
    type Label = L;

    type Labels<'a>
        = std::iter::Map<std::slice::Iter<'a, (T, L)>, fn(&(T, L)) -> L>
    where
        Self: 'a;

    fn len(&self) -> usize {
        self.samples.len()
    }

    fn labels(&self) -> Self::Labels<'_> {
        self.samples.iter().map(|(_, label)| label.clone())
    }
}
