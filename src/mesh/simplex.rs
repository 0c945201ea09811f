//! Flat storage for simplices and the edge ("bar") set derived from them.

use std::slice::ChunksExact;

/// An undirected edge between two point indices, smaller index first.
pub type Bar = [usize; 2];

/// A set of simplices, each a tuple of `vertices_per_simplex` point indices.
///
/// Triangles (3 indices) and tetrahedra (4 indices) are stored back to back
/// in a single buffer, which keeps retriangulation a wholesale replacement
/// of one allocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimplexSet {
    vertices_per_simplex: usize,
    indices: Vec<usize>,
}

impl SimplexSet {
    /// Create an empty set of simplices with `vertices_per_simplex` vertices each.
    pub fn new(vertices_per_simplex: usize) -> Self {
        assert!(vertices_per_simplex >= 2, "a simplex needs at least two vertices");
        Self {
            vertices_per_simplex,
            indices: Vec::new(),
        }
    }

    /// Create an empty set sized for `capacity` simplices.
    pub fn with_capacity(vertices_per_simplex: usize, capacity: usize) -> Self {
        let mut set = Self::new(vertices_per_simplex);
        set.indices.reserve(capacity * vertices_per_simplex);
        set
    }

    /// Build from a flat index buffer.
    ///
    /// Returns `None` if the buffer length is not a multiple of
    /// `vertices_per_simplex`.
    pub fn from_flat(vertices_per_simplex: usize, indices: Vec<usize>) -> Option<Self> {
        if vertices_per_simplex < 2 || indices.len() % vertices_per_simplex != 0 {
            return None;
        }
        Some(Self {
            vertices_per_simplex,
            indices,
        })
    }

    /// Number of vertices per simplex (`D + 1`).
    #[inline]
    pub fn vertices_per_simplex(&self) -> usize {
        self.vertices_per_simplex
    }

    /// Number of simplices.
    #[inline]
    pub fn len(&self) -> usize {
        self.indices.len() / self.vertices_per_simplex
    }

    /// Whether the set holds no simplices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Append one simplex.
    pub fn push(&mut self, simplex: &[usize]) {
        assert_eq!(simplex.len(), self.vertices_per_simplex);
        self.indices.extend_from_slice(simplex);
    }

    /// Vertex indices of simplex `i`.
    #[inline]
    pub fn get(&self, i: usize) -> &[usize] {
        let k = self.vertices_per_simplex;
        &self.indices[i * k..(i + 1) * k]
    }

    /// Iterate over simplices as index slices.
    pub fn iter(&self) -> ChunksExact<'_, usize> {
        self.indices.chunks_exact(self.vertices_per_simplex)
    }

    /// Iterate mutably over simplices.
    pub fn iter_mut(&mut self) -> std::slice::ChunksExactMut<'_, usize> {
        self.indices.chunks_exact_mut(self.vertices_per_simplex)
    }

    /// The flat index buffer.
    #[inline]
    pub fn as_flat(&self) -> &[usize] {
        &self.indices
    }

    /// Keep only the simplices for which `keep` returns true.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&[usize]) -> bool,
    {
        let k = self.vertices_per_simplex;
        let mut kept = Vec::with_capacity(self.indices.len());
        for simplex in self.indices.chunks_exact(k) {
            if keep(simplex) {
                kept.extend_from_slice(simplex);
            }
        }
        self.indices = kept;
    }

    /// Largest referenced point index, if any.
    pub fn max_index(&self) -> Option<usize> {
        self.indices.iter().copied().max()
    }

    /// Deduplicated undirected edges of all simplices.
    ///
    /// Every vertex pair of every simplex is canonicalized to
    /// `[min, max]`; the result is sorted and contains each edge once.
    pub fn bars(&self) -> Vec<Bar> {
        let k = self.vertices_per_simplex;
        let mut bars = Vec::with_capacity(self.len() * k * (k - 1) / 2);
        for simplex in self.iter() {
            for i in 0..k {
                for j in (i + 1)..k {
                    let (a, b) = (simplex[i], simplex[j]);
                    bars.push(if a < b { [a, b] } else { [b, a] });
                }
            }
        }
        bars.sort_unstable();
        bars.dedup();
        bars
    }
}

impl<'a> IntoIterator for &'a SimplexSet {
    type Item = &'a [usize];
    type IntoIter = ChunksExact<'a, usize>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_triangles() -> SimplexSet {
        SimplexSet::from_flat(3, vec![0, 1, 2, 2, 1, 3]).unwrap()
    }

    #[test]
    fn test_len_and_get() {
        let set = two_triangles();
        assert_eq!(set.len(), 2);
        assert_eq!(set.get(1), &[2, 1, 3]);
        assert_eq!(set.max_index(), Some(3));
    }

    #[test]
    fn test_from_flat_rejects_ragged() {
        assert!(SimplexSet::from_flat(3, vec![0, 1]).is_none());
    }

    #[test]
    fn test_bars_shared_edge_once() {
        let bars = two_triangles().bars();
        assert_eq!(bars, vec![[0, 1], [0, 2], [1, 2], [1, 3], [2, 3]]);
    }

    #[test]
    fn test_bars_tetrahedron() {
        let set = SimplexSet::from_flat(4, vec![3, 2, 1, 0]).unwrap();
        assert_eq!(set.bars().len(), 6);
    }

    #[test]
    fn test_retain() {
        let mut set = two_triangles();
        set.retain(|s| s.contains(&0));
        assert_eq!(set.len(), 1);
        assert_eq!(set.get(0), &[0, 1, 2]);
    }
}
