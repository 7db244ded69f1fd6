//! A map from typed indices to values, backed by a plain vector.

use std::{fmt, marker::PhantomData};

pub trait Index: Copy {
    fn new(index: usize) -> Self;
    fn value(self) -> usize;
}

pub struct IndexMap<I, T> {
    values: Vec<T>,
    _marker: PhantomData<fn(&I)>,
}

impl<I, T> IndexMap<I, T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bare(values: Vec<T>) -> Self {
        Self {
            values,
            _marker: PhantomData,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.values.last()
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.values.iter()
    }

    pub fn into_values(self) -> impl Iterator<Item = T> {
        self.values.into_iter()
    }
}

impl<I: Index, T> IndexMap<I, T> {
    #[must_use]
    pub fn next_index(&self) -> I {
        I::new(self.values.len())
    }

    pub fn insert(&mut self, value: T) -> I {
        let index = self.next_index();
        self.values.push(value);
        index
    }

    pub fn insert_with(&mut self, constructor: impl FnOnce(I) -> T) -> I {
        let index = self.next_index();
        self.values.push(constructor(index));
        index
    }

    pub fn get(&self, index: I) -> Option<&T> {
        self.values.get(index.value())
    }

    pub fn get_mut(&mut self, index: I) -> Option<&mut T> {
        self.values.get_mut(index.value())
    }

    pub fn iter(&self) -> impl Iterator<Item = (I, &T)> {
        self.values
            .iter()
            .enumerate()
            .map(|(index, value)| (I::new(index), value))
    }

    pub fn indices(&self) -> impl Iterator<Item = I> + '_ {
        (0..self.len()).map(I::new)
    }
}

impl<I, T> Default for IndexMap<I, T> {
    fn default() -> Self {
        Self::bare(Vec::new())
    }
}

impl<I, T: Clone> Clone for IndexMap<I, T> {
    fn clone(&self) -> Self {
        Self::bare(self.values.clone())
    }
}

impl<I: Index, T> std::ops::Index<I> for IndexMap<I, T> {
    type Output = T;

    fn index(&self, index: I) -> &Self::Output {
        &self.values[index.value()]
    }
}

impl<I: Index, T> std::ops::IndexMut<I> for IndexMap<I, T> {
    fn index_mut(&mut self, index: I) -> &mut Self::Output {
        &mut self.values[index.value()]
    }
}

impl<I, T: fmt::Debug> fmt::Debug for IndexMap<I, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.values).finish()
    }
}
