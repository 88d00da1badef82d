use anyhow::{ensure, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;

use crate::dataset::LabeledDataset;

/// A `Sampler` defines the strategy for drawing batches of indices from a
/// dataset.
///
/// # Associated type
/// - `Item`: what one draw yields. For batch samplers this is `Vec<usize>`,
///   a mini-batch of dataset indices.
///
/// # Method
/// - `iter()`: returns one finite pass over the dataset. Every call restarts
///   independently with fresh randomness; callers wanting a reproducible
///   stream should use a sampler's RNG-injecting iteration method instead.
///
/// Implementations must be `Send + Sync` so the same sampler instance can be
/// shared across training threads.
pub trait Sampler: Send + Sync {
    type Item: Send;

    fn iter(&self) -> Box<dyn Iterator<Item = Self::Item> + Send + '_>;
}

/// ============================================================================
/// Yields batches of indices in which same-label samples appear as adjacent
/// pairs, for training objectives that need a paired (contrastive) signal
/// inside every mini-batch.
///
/// # Arguments:
/// - `dataset`: Anything implementing [`LabeledDataset`]. Scanned once at
///   construction to group indices by label; only labels are read.
/// - `batch_size`: Number of indices per batch. Must be a positive even
///   integer, since full batches are built from two-index pairs.
///
/// # Algorithm overview
/// Each call to `iter` recomputes from the stored label groups:
/// 1. Shuffle a copy of every label's index list and pair consecutive
///    entries. A label with an odd count leaves one unpaired "single".
/// 2. Shuffle the global pair list and the global singles list.
/// 3. Chunk pairs into batches of `batch_size / 2` pairs each; the final
///    chunk may be short.
/// 4. Top off the last pair-built batch with singles until it is full or
///    singles run out.
/// 5. Chunk any remaining singles into further batches.
/// 6. Shuffle the batch list and yield the batches.
///
/// Every index in `[0, dataset.len())` appears in exactly one batch, and at
/// most one batch per pass is shorter than `batch_size`.
///
/// # Reproducibility
/// The sampler holds no seed. [`Sampler::iter`] draws fresh randomness per
/// call; for a reproducible stream, pass a seeded RNG to
/// [`iter_with_rng`](Self::iter_with_rng). Label groups are stored in
/// first-seen order, so equal seeds give equal batch streams.
///
/// # Example
/// ```ignore
/// let dataset = InMemoryDataset::from_labels(vec![0, 0, 1, 1, 1, 1]);
/// let sampler = LabelPairBatchSampler::new(&dataset, 4)?;
///
/// for epoch in 0..num_epochs {
///     for batch in sampler.iter() {
///         // `batch` is a Vec<usize> of dataset indices, length <= 4,
///         // with same-label indices adjacent in pairs.
///     }
/// }
/// ```
///
/// Mutating the dataset's size after construction is unsupported: emitted
/// indices are only meaningful against the length captured here.
#[derive(Debug, Clone)]
pub struct LabelPairBatchSampler {
    batch_size: usize,
    dataset_len: usize,
    // One index list per distinct label, in first-seen label order. Label
    // values are not retained; pairing only needs the partition.
    groups: Vec<Vec<usize>>,
}

impl LabelPairBatchSampler {
    pub fn new<D: LabeledDataset>(dataset: &D, batch_size: usize) -> Result<Self> {
        ensure!(
            batch_size > 0,
            "batch_size must be > 0, but got batch_size={}",
            batch_size
        );
        ensure!(
            batch_size % 2 == 0,
            "batch_size must be an even value, but got batch_size={}",
            batch_size
        );

        let mut slots: HashMap<D::Label, usize> = HashMap::new();
        let mut groups: Vec<Vec<usize>> = Vec::new();
        for (index, label) in dataset.labels().enumerate() {
            let slot = *slots.entry(label).or_insert_with(|| {
                groups.push(Vec::new());
                groups.len() - 1
            });
            groups[slot].push(index);
        }

        Ok(Self {
            batch_size,
            dataset_len: dataset.len(),
            groups,
        })
    }

    /// Returns the number of underlying samples, not the number of batches.
    /// Training loops use this to assert "samples consumed == length" per epoch.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.dataset_len
    }

    /// The configured batch size.
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Produces one full pass of batches using the caller's RNG.
    ///
    /// This is the seam for reproducibility: inject a seeded `StdRng` to get
    /// the same batch stream every time, or any other `Rng` to control the
    /// randomness source.
    pub fn iter_with_rng<R: Rng + ?Sized>(&self, rng: &mut R) -> std::vec::IntoIter<Vec<usize>> {
        let mut pairs: Vec<[usize; 2]> = Vec::new();
        let mut singles: Vec<usize> = Vec::new();

        for group in &self.groups {
            let mut indices = group.clone();
            indices.shuffle(rng);
            let mut chunks = indices.chunks_exact(2);
            for pair in chunks.by_ref() {
                pairs.push([pair[0], pair[1]]);
            }
            if let Some(&odd) = chunks.remainder().first() {
                singles.push(odd);
            }
        }

        pairs.shuffle(rng);
        singles.shuffle(rng);

        let pairs_per_batch = self.batch_size / 2;
        let mut batches: Vec<Vec<usize>> = pairs
            .chunks(pairs_per_batch)
            .map(|chunk| chunk.iter().flatten().copied().collect())
            .collect();

        // The last pair-built batch might not be full; fill it out with
        // singles before starting singles-only batches. When there are no
        // pair batches at all, every index flows through the singles path.
        if let Some(last) = batches.last_mut() {
            while last.len() < self.batch_size {
                match singles.pop() {
                    Some(index) => last.push(index),
                    None => break,
                }
            }
        }

        batches.extend(singles.chunks(self.batch_size).map(|chunk| chunk.to_vec()));

        batches.shuffle(rng);
        batches.into_iter()
    }
}

impl Sampler for LabelPairBatchSampler {
    type Item = Vec<usize>;

    fn iter(&self) -> Box<dyn Iterator<Item = Vec<usize>> + Send + '_> {
        let mut rng = StdRng::from_rng(&mut rand::rng());
        Box::new(self.iter_with_rng(&mut rng))
    }
}
