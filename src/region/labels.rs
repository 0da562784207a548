//! Label equivalences produced by a merge run, and how to apply them.

use serde::{Deserialize, Serialize};

use crate::graph::AdjacencyGraph;
use crate::model::{Datum, EdgeSymmetry, Matrix, Weight, WeightFn};
use crate::{Error, Result};

/// Maps every original label to the label that absorbed it.
///
/// While a merge runs, an entry may point at an intermediate label. After
/// [`resolve`](Self::resolve) every entry names the smallest label of its
/// class directly, so `e[e[i]] == e[i]` and `e[i] <= i`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Equivalences(Vec<usize>);

impl Equivalences {
    /// Every label maps to itself.
    pub fn identity(len: usize) -> Self {
        Self((0..len).collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, label: usize) -> Option<usize> {
        self.0.get(label).copied()
    }

    pub(crate) fn set(&mut self, label: usize, target: usize) {
        if let Some(slot) = self.0.get_mut(label) {
            *slot = target;
        }
    }

    /// Follow the chain from `label` while it decreases.
    ///
    /// Labels outside the table are their own representative.
    pub fn representative(&self, label: usize) -> usize {
        let mut j = label;
        while let Some(&next) = self.0.get(j) {
            if next >= j {
                break;
            }
            j = next;
        }
        j
    }

    /// Point every entry straight at its representative.
    ///
    /// Entries are visited in ascending order, so each chain step lands on
    /// an entry that is already resolved.
    pub fn resolve(&mut self) {
        for i in 0..self.0.len() {
            let r = self.representative(i);
            self.0[i] = r;
        }
    }

    /// `true` if every entry is a fixed point no larger than its index.
    pub fn is_resolved(&self) -> bool {
        self.0
            .iter()
            .enumerate()
            .all(|(i, &e)| e <= i && self.0.get(e) == Some(&e))
    }

    /// Renumber the used representatives densely as `0..k`, keeping their
    /// order. Returns the new table and `k`.
    pub fn compact(&self) -> (Equivalences, usize) {
        let mut dense: Vec<Option<usize>> = vec![None; self.0.len()];
        for &e in &self.0 {
            if let Some(slot) = dense.get_mut(e) {
                *slot = Some(0);
            }
        }
        let mut next = 0;
        for slot in dense.iter_mut().flatten() {
            *slot = next;
            next += 1;
        }
        let table = self
            .0
            .iter()
            .map(|&e| dense.get(e).copied().flatten().unwrap_or(e))
            .collect();
        (Equivalences(table), next)
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<usize> {
        self.0
    }
}

impl From<Vec<usize>> for Equivalences {
    fn from(v: Vec<usize>) -> Self {
        Self(v)
    }
}

fn lookup(table: &Equivalences, label: usize) -> Result<usize> {
    table.get(label).ok_or(Error::LabelOutOfRange {
        label,
        len: table.len(),
    })
}

fn mapping(equivalences: &Equivalences, compact: bool) -> (Equivalences, usize) {
    if compact {
        equivalences.compact()
    } else {
        (equivalences.clone(), equivalences.len())
    }
}

/// Relabel `labels` through `equivalences`, optionally compacted first.
pub fn reassign_labels(
    equivalences: &Equivalences,
    labels: &Matrix<usize>,
    compact: bool,
) -> Result<Matrix<usize>> {
    reassign_labels_with_sizes(equivalences, labels, compact).map(|(m, _)| m)
}

/// Like [`reassign_labels`], also counting the pixels of every new label.
pub fn reassign_labels_with_sizes(
    equivalences: &Equivalences,
    labels: &Matrix<usize>,
    compact: bool,
) -> Result<(Matrix<usize>, Vec<usize>)> {
    if labels.is_empty() {
        return Err(Error::EmptyLabels);
    }
    let (table, count) = mapping(equivalences, compact);
    let mut sizes = vec![0usize; count];
    let mut data = Vec::with_capacity(labels.len());
    for &label in labels.data() {
        let new = lookup(&table, label)?;
        if let Some(n) = sizes.get_mut(new) {
            *n += 1;
        }
        data.push(new);
    }
    let relabeled = Matrix::from_vec(labels.rows(), labels.cols(), data)?;
    Ok((relabeled, sizes))
}

/// Dense `(last_valid_id + 1)²` table of edge weights.
///
/// Entry `(a, b)` holds the stored weight of `a -> b`; pairs without a
/// weighted edge hold `no_edge`.
pub fn affinity_matrix<N, W, D, F, S>(graph: &AdjacencyGraph<N, W, D, F, S>, no_edge: W) -> Matrix<W>
where
    N: Datum,
    W: Weight,
    D: Datum,
    F: WeightFn<N, D, W>,
    S: EdgeSymmetry,
{
    let size = graph.last_valid_id().map_or(0, |id| id.index() + 1);
    let mut affinity = Matrix::new_fill(size, size, no_edge);
    for view in graph.edge_list() {
        let Some(w) = view.weight else {
            continue;
        };
        let (a, b) = (view.source.index(), view.target.index());
        affinity[(a, b)] = w;
        if S::SYMMETRIC {
            affinity[(b, a)] = w;
        }
    }
    affinity
}
