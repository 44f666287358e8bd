use num::Num;
use serde::{Deserialize, Serialize};

/// Sparse vector that treats zero as the implicit value.
/// Holds the indices and values of the non-zero entries.
///
/// Entries are guaranteed to be sorted by ascending index,
/// and no stored value equals zero. Indices are `u32`, so the logical
/// length never exceeds `u32::MAX + 1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpVec<N>
where
    N: Num + Copy,
{
    inds: Vec<u32>,
    vals: Vec<N>,
    len: usize,
}

impl<N> SpVec<N>
where
    N: Num + Copy,
{
    /// All-zero vector of logical length `len`
    #[inline]
    pub fn zeros(len: usize) -> Self {
        SpVec {
            inds: Vec::new(),
            vals: Vec::new(),
            len,
        }
    }

    /// Build from `(index, value)` pairs already sorted by index.
    /// Zero values are skipped.
    pub fn from_sorted_pairs<I>(len: usize, pairs: I) -> Self
    where
        I: IntoIterator<Item = (u32, N)>,
    {
        let mut vec = SpVec::zeros(len);
        for (ind, val) in pairs {
            debug_assert!((ind as usize) < len, "index out of bounds");
            debug_assert!(vec.inds.last().map_or(true, |&last| last < ind), "indices must ascend");
            if val != N::zero() {
                vec.inds.push(ind);
                vec.vals.push(val);
            }
        }
        vec
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of stored (non-zero) entries
    #[inline]
    pub fn nnz(&self) -> usize {
        self.inds.len()
    }

    /// Value at `index`; zero when not stored, `None` past the end
    #[inline]
    pub fn get(&self, index: usize) -> Option<N> {
        if index >= self.len {
            return None;
        }
        let Ok(ind) = u32::try_from(index) else {
            return Some(N::zero());
        };
        match self.inds.binary_search(&ind) {
            Ok(pos) => Some(self.vals[pos]),
            Err(_) => Some(N::zero()),
        }
    }

    /// Iterate the stored entries as `(index, value)` in ascending index order
    #[inline]
    pub fn raw_iter(&self) -> impl ExactSizeIterator<Item = (usize, N)> + '_ {
        self.inds
            .iter()
            .zip(self.vals.iter())
            .map(|(&i, &v)| (i as usize, v))
    }

    /// Iterate every logical element, zeros included
    pub fn iter(&self) -> impl Iterator<Item = N> + '_ {
        let mut stored = self.raw_iter().peekable();
        (0..self.len).map(move |i| match stored.peek() {
            Some(&(ind, val)) if ind == i => {
                stored.next();
                val
            }
            _ => N::zero(),
        })
    }

    /// Map every stored value, keeping the sparsity pattern minus new zeros
    pub fn map_values<M, F>(&self, mut f: F) -> SpVec<M>
    where
        M: Num + Copy,
        F: FnMut(usize, N) -> M,
    {
        SpVec::from_sorted_pairs(
            self.len,
            self.raw_iter().map(|(i, v)| (i as u32, f(i, v))),
        )
    }

    #[inline]
    pub fn shrink_to_fit(&mut self) {
        self.inds.shrink_to_fit();
        self.vals.shrink_to_fit();
    }
}
