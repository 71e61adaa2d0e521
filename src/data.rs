//! Data sources feeding the training loop
//!
//! A source hands out items one at a time and says explicitly where an epoch
//! ends, so the engine never has to guess from iterator exhaustion.

use crate::Result;

/// One pull from a [`DataSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fetch<T> {
    /// Next item
    Item(T),
    /// The current pass over the data is complete; more may follow
    EndOfEpoch,
    /// No more data, ever
    Exhausted,
}

/// Sequential source of training items.
pub trait DataSource {
    /// Item type
    type Item;

    /// Pull the next item or signal.
    fn fetch(&mut self) -> Result<Fetch<Self::Item>>;
}

impl<D: DataSource + ?Sized> DataSource for &mut D {
    type Item = D::Item;

    fn fetch(&mut self) -> Result<Fetch<Self::Item>> {
        (**self).fetch()
    }
}

/// Repeated passes over an in-memory dataset.
///
/// Yields every item, then [`Fetch::EndOfEpoch`], then starts over. With a
/// pass limit it reports [`Fetch::Exhausted`] once that many passes are done;
/// an empty dataset is exhausted from the start.
///
/// # Example
///
/// ```
/// use bucle::data::{DataSource, Epochs, Fetch};
///
/// let mut data = Epochs::new([1, 2]).passes(1);
/// assert_eq!(data.fetch()?, Fetch::Item(1));
/// assert_eq!(data.fetch()?, Fetch::Item(2));
/// assert_eq!(data.fetch()?, Fetch::EndOfEpoch);
/// assert_eq!(data.fetch()?, Fetch::Exhausted);
/// # Ok::<(), bucle::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Epochs<T> {
    items: Vec<T>,
    cursor: usize,
    passes: Option<u64>,
    completed: u64,
}

impl<T: Clone> Epochs<T> {
    /// Cycle over `items` without a pass limit
    pub fn new(items: impl IntoIterator<Item = T>) -> Self {
        Self {
            items: items.into_iter().collect(),
            cursor: 0,
            passes: None,
            completed: 0,
        }
    }

    /// Stop after `passes` full passes
    pub fn passes(mut self, passes: u64) -> Self {
        self.passes = Some(passes);
        self
    }

    /// Full passes completed so far
    pub fn passes_completed(&self) -> u64 {
        self.completed
    }

    /// Rewind to the first item of the first pass
    pub fn reset(&mut self) {
        self.cursor = 0;
        self.completed = 0;
    }

    /// Items per pass
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the dataset is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T: Clone> DataSource for Epochs<T> {
    type Item = T;

    fn fetch(&mut self) -> Result<Fetch<T>> {
        let done = self.passes.is_some_and(|p| self.completed >= p);
        if self.items.is_empty() || done {
            return Ok(Fetch::Exhausted);
        }

        match self.items.get(self.cursor) {
            Some(item) => {
                self.cursor += 1;
                Ok(Fetch::Item(item.clone()))
            }
            None => {
                self.cursor = 0;
                self.completed += 1;
                Ok(Fetch::EndOfEpoch)
            }
        }
    }
}

/// Single pass over any iterator, with no epoch boundaries.
#[derive(Debug, Clone)]
pub struct Stream<I> {
    iter: I,
}

impl<I: Iterator> Stream<I> {
    /// Wrap an iterator
    pub fn new(iter: impl IntoIterator<IntoIter = I>) -> Self {
        Self {
            iter: iter.into_iter(),
        }
    }
}

impl<I: Iterator> DataSource for Stream<I> {
    type Item = I::Item;

    fn fetch(&mut self) -> Result<Fetch<I::Item>> {
        Ok(self.iter.next().map_or(Fetch::Exhausted, Fetch::Item))
    }
}
