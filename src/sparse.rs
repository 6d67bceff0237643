// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025 Bradley M. Bell
// ---------------------------------------------------------------------------
//! Sparsity pattern backends (component C7 support); see `spec.md` §4.8
//! "two backend representations: packed bit matrices and sorted-index
//! sets." `adfn::sparsity` builds and combines both the same way: one row
//! per `Forward`/`Reverse` sparsity "variable", entries are the set of
//! domain (or range) indices a row can depend on.
// ---------------------------------------------------------------------------
use crate::tape::IndexT;

// ---------------------------------------------------------------------------
// BitMatrix
/// A dense sparsity pattern packed one bit per entry, row-major.
#[derive(Clone, Debug)]
pub struct BitMatrix {
    n_row: usize,
    n_col: usize,
    words_per_row: usize,
    bits: Vec<u64>,
}

impl BitMatrix {
    pub fn new(n_row: usize, n_col: usize) -> Self {
        let words_per_row = n_col.div_ceil(64).max(1);
        BitMatrix { n_row, n_col, words_per_row, bits: vec![0u64; n_row * words_per_row] }
    }

    pub fn n_row(&self) -> usize {
        self.n_row
    }
    pub fn n_col(&self) -> usize {
        self.n_col
    }

    fn word_bit(col: usize) -> (usize, u64) {
        (col / 64, 1u64 << (col % 64))
    }

    pub fn get(&self, row: usize, col: usize) -> bool {
        let (w, b) = Self::word_bit(col);
        self.bits[row * self.words_per_row + w] & b != 0
    }

    pub fn set(&mut self, row: usize, col: usize) {
        let (w, b) = Self::word_bit(col);
        self.bits[row * self.words_per_row + w] |= b;
    }

    /// Row `dst |= row src of other`.
    pub fn or_row_from(&mut self, dst: usize, other: &BitMatrix, src: usize) {
        let dst_start = dst * self.words_per_row;
        let src_start = src * other.words_per_row;
        for w in 0..self.words_per_row {
            self.bits[dst_start + w] |= other.bits[src_start + w];
        }
    }

    pub fn row_iter(&self, row: usize) -> impl Iterator<Item = usize> + '_ {
        let start = row * self.words_per_row;
        (0..self.n_col).filter(move |&col| {
            let (w, b) = Self::word_bit(col);
            self.bits[start + w] & b != 0
        })
    }

    pub fn row_is_empty(&self, row: usize) -> bool {
        let start = row * self.words_per_row;
        self.bits[start..start + self.words_per_row].iter().all(|&w| w == 0)
    }
}

// ---------------------------------------------------------------------------
// ListSet
/// A sparsity pattern stored as one sorted, de-duplicated index list per row.
#[derive(Clone, Debug)]
pub struct ListSet {
    n_col: usize,
    rows: Vec<Vec<IndexT>>,
}

impl ListSet {
    pub fn new(n_row: usize, n_col: usize) -> Self {
        ListSet { n_col, rows: vec![Vec::new(); n_row] }
    }

    pub fn n_row(&self) -> usize {
        self.rows.len()
    }
    pub fn n_col(&self) -> usize {
        self.n_col
    }

    pub fn insert(&mut self, row: usize, col: IndexT) {
        let r = &mut self.rows[row];
        match r.binary_search(&col) {
            Ok(_) => {}
            Err(pos) => r.insert(pos, col),
        }
    }

    pub fn union_row_from(&mut self, row: usize, other: &[IndexT]) {
        for &col in other {
            self.insert(row, col);
        }
    }

    pub fn row(&self, row: usize) -> &[IndexT] {
        &self.rows[row]
    }
}

// ---------------------------------------------------------------------------
// SparsityPattern
/// Common interface over the two backends, so `adfn::sparsity` can be
/// written once and instantiated for either representation (`spec.md` §4.8
/// "the choice is orthogonal to the playback algorithm").
pub trait SparsityPattern: Clone {
    fn new(n_row: usize, n_col: usize) -> Self;
    fn n_row(&self) -> usize;
    fn n_col(&self) -> usize;
    fn insert(&mut self, row: usize, col: IndexT);
    /// `self[dst] |= other[src]`.
    fn union_row_from(&mut self, dst: usize, other: &Self, src: usize);
    fn row_vec(&self, row: usize) -> Vec<IndexT>;
}

impl SparsityPattern for BitMatrix {
    fn new(n_row: usize, n_col: usize) -> Self {
        BitMatrix::new(n_row, n_col)
    }
    fn n_row(&self) -> usize {
        self.n_row
    }
    fn n_col(&self) -> usize {
        self.n_col
    }
    fn insert(&mut self, row: usize, col: IndexT) {
        self.set(row, col as usize);
    }
    fn union_row_from(&mut self, dst: usize, other: &Self, src: usize) {
        self.or_row_from(dst, other, src);
    }
    fn row_vec(&self, row: usize) -> Vec<IndexT> {
        self.row_iter(row).map(|c| c as IndexT).collect()
    }
}

impl SparsityPattern for ListSet {
    fn new(n_row: usize, n_col: usize) -> Self {
        ListSet::new(n_row, n_col)
    }
    fn n_row(&self) -> usize {
        self.n_row()
    }
    fn n_col(&self) -> usize {
        self.n_col()
    }
    fn insert(&mut self, row: usize, col: IndexT) {
        ListSet::insert(self, row, col);
    }
    fn union_row_from(&mut self, dst: usize, other: &Self, src: usize) {
        let cols = other.row(src).to_vec();
        self.union_row_from(dst, &cols);
    }
    fn row_vec(&self, row: usize) -> Vec<IndexT> {
        self.row(row).to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bit_matrix_set_get_round_trips() {
        let mut m = BitMatrix::new(2, 130);
        m.set(0, 129);
        assert!(m.get(0, 129));
        assert!(!m.get(0, 128));
        assert!(!m.get(1, 129));
        let row: Vec<usize> = m.row_iter(0).collect();
        assert_eq!(row, vec![129]);
    }

    #[test]
    fn list_set_insert_keeps_sorted_and_deduped() {
        let mut s = ListSet::new(1, 10);
        s.insert(0, 3);
        s.insert(0, 1);
        s.insert(0, 3);
        assert_eq!(s.row(0), &[1, 3]);
    }
}
