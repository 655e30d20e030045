//! Greedy maximum-coverage selection over a [`CoverageMatrix`].
//!
//! Rows sit in a max-heap keyed by `(weight, lowest index)`. Weights only ever
//! shrink, so a popped entry whose stored weight is stale is pushed back with
//! its current weight; the first fresh entry is the true maximum, ties going
//! to the lowest row index.
use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::cover::coverage::CoverageMatrix;

/// One greedy pick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// Row (candidate circle) index.
    pub row: usize,
    /// Spawn points this pick covered that were uncovered before.
    pub newly_covered: Vec<usize>,
}

/// Result of running the greedy loop to completion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GreedyOutcome {
    /// Selected rows in selection order.
    pub rows: Vec<usize>,
    /// Spawn points no candidate could reach.
    pub uncovered: Vec<usize>,
}

pub struct GreedySelector {
    matrix: CoverageMatrix,
    heap: BinaryHeap<(u32, Reverse<usize>)>,
    selected: Vec<usize>,
}

impl GreedySelector {
    pub fn new(matrix: CoverageMatrix) -> Self {
        let heap = matrix
            .weights()
            .iter()
            .enumerate()
            .filter(|&(_, &w)| w > 0)
            .map(|(i, &w)| (w, Reverse(i)))
            .collect();
        Self {
            matrix,
            heap,
            selected: Vec::new(),
        }
    }

    #[inline]
    pub fn matrix(&self) -> &CoverageMatrix {
        &self.matrix
    }

    #[inline]
    pub fn selected(&self) -> &[usize] {
        &self.selected
    }

    /// Pick the next row, or `None` once every point is covered or no row adds coverage.
    pub fn step(&mut self) -> Option<Selection> {
        if self.matrix.uncovered_count() == 0 {
            return None;
        }
        while let Some((stored, Reverse(row))) = self.heap.pop() {
            let current = self.matrix.weight(row);
            if current != stored {
                if current > 0 {
                    self.heap.push((current, Reverse(row)));
                }
                continue;
            }
            let newly_covered = self.matrix.claim_row(row);
            self.selected.push(row);
            return Some(Selection { row, newly_covered });
        }
        None
    }

    /// Run until termination.
    pub fn run(mut self) -> GreedyOutcome {
        while self.step().is_some() {}
        GreedyOutcome {
            uncovered: self.matrix.uncovered_columns(),
            rows: self.selected,
        }
    }
}

/// Convenience wrapper around [`GreedySelector::run`].
pub fn select_cover(matrix: CoverageMatrix) -> GreedyOutcome {
    GreedySelector::new(matrix).run()
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::sampling::rand01;

    fn matrix(rows: &[&[u32]], n: usize) -> CoverageMatrix {
        CoverageMatrix::from_rows(rows.iter().map(|r| r.to_vec()).collect(), n)
    }

    #[test]
    fn picks_heaviest_row_first() {
        let m = matrix(&[&[0], &[0, 1, 2], &[2, 3]], 4);
        let out = select_cover(m);
        assert_eq!(out.rows, vec![1, 2]);
        assert!(out.uncovered.is_empty());
    }

    #[test]
    fn ties_break_to_lowest_index() {
        let m = matrix(&[&[2, 3], &[0, 1], &[4, 5]], 6);
        assert_eq!(select_cover(m).rows, vec![0, 1, 2]);
    }

    #[test]
    fn stale_weights_do_not_win() {
        // Row 0 starts heaviest but loses everything to row 1's pick.
        let m = matrix(&[&[0, 1, 2], &[0, 1, 2, 3], &[4, 5]], 6);
        let mut sel = GreedySelector::new(m);
        let first = sel.step().unwrap();
        assert_eq!(first.row, 1);
        assert_eq!(first.newly_covered, vec![0, 1, 2, 3]);
        assert_eq!(sel.matrix().weight(0), 0);
        assert_eq!(sel.step().unwrap().row, 2);
        assert_eq!(sel.step(), None);
    }

    #[test]
    fn terminates_with_unreachable_points() {
        let m = matrix(&[&[0, 1], &[1]], 4);
        let out = select_cover(m);
        assert_eq!(out.rows, vec![0]);
        assert_eq!(out.uncovered, vec![2, 3]);
    }

    #[test]
    fn empty_matrix_selects_nothing() {
        let out = select_cover(CoverageMatrix::from_rows(Vec::new(), 0));
        assert_eq!(out, GreedyOutcome::default());
    }

    #[test]
    fn weights_never_increase_between_steps() {
        let mut rng = StdRng::seed_from_u64(11);
        let n = 300;
        let rows: Vec<Vec<u32>> = (0..600)
            .map(|_| {
                let len = 1 + (rand01(&mut rng) * 12.0) as usize;
                (0..len).map(|_| (rand01(&mut rng) * n as f64) as u32).collect()
            })
            .collect();
        let mut sel = GreedySelector::new(CoverageMatrix::from_rows(rows, n));

        let mut prev = sel.matrix().weights().to_vec();
        let mut picks = 0;
        while let Some(s) = sel.step() {
            assert!(!s.newly_covered.is_empty());
            let now = sel.matrix().weights();
            assert!(prev.iter().zip(now).all(|(a, b)| b <= a));
            assert_eq!(now[s.row], 0);
            prev = now.to_vec();
            picks += 1;
        }
        assert_eq!(picks, sel.selected().len());
    }

    #[test]
    fn matches_naive_recompute() {
        let mut rng = StdRng::seed_from_u64(21);
        let n = 120;
        let rows: Vec<Vec<u32>> = (0..200)
            .map(|_| {
                (0..1 + (rand01(&mut rng) * 8.0) as usize)
                    .map(|_| (rand01(&mut rng) * n as f64) as u32)
                    .collect()
            })
            .collect();
        let fast = select_cover(CoverageMatrix::from_rows(rows.clone(), n));

        // Reference: recompute every weight from scratch each iteration.
        let reference = CoverageMatrix::from_rows(rows, n);
        let mut covered = vec![false; n];
        let mut picked = Vec::new();
        loop {
            let best = (0..reference.n_rows())
                .map(|i| {
                    let w = reference.row(i).iter().filter(|&&j| !covered[j as usize]).count();
                    (w, Reverse(i))
                })
                .max();
            match best {
                Some((w, Reverse(i))) if w > 0 => {
                    for &j in reference.row(i) {
                        covered[j as usize] = true;
                    }
                    picked.push(i);
                }
                _ => break,
            }
        }
        assert_eq!(fast.rows, picked);
    }
}
