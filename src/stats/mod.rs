//! Counting and similarity helpers shared by the analyzers.
pub mod significance;

use indexmap::IndexMap;
use std::collections::BTreeSet;
use std::hash::Hash;

/// Counts items, keeping the order in which each was first seen.
pub fn count_ordered<T, I>(items: I) -> IndexMap<T, usize>
where
    T: Hash + Eq,
    I: IntoIterator<Item = T>,
{
    let mut counts = IndexMap::new();
    for item in items {
        *counts.entry(item).or_insert(0) += 1;
    }
    counts
}

/// The most frequent item. On a tie the one seen first wins.
pub fn mode<T: Clone>(counts: &IndexMap<T, usize>) -> Option<(T, usize)> {
    let mut best: Option<(&T, usize)> = None;
    for (item, &count) in counts {
        match best {
            Some((_, c)) if count <= c => {}
            _ => best = Some((item, count)),
        }
    }
    best.map(|(item, count)| (item.clone(), count))
}

/// Items ordered by count, descending. Ties keep their first-seen order.
pub fn ranked<T: Clone>(counts: &IndexMap<T, usize>, limit: usize) -> Vec<(T, usize)> {
    let mut ranked: Vec<(T, usize)> = counts.iter().map(|(k, v)| (k.clone(), *v)).collect();
    // sort_by is stable
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(limit);
    ranked
}

/// Shannon entropy in nats of a set of counts summing to `total`.
pub fn entropy<I: IntoIterator<Item = usize>>(counts: I, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let total = total as f64;
    counts
        .into_iter()
        .filter(|&c| c > 0)
        .map(|c| {
            let p = c as f64 / total;
            -p * p.ln()
        })
        .sum()
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Pearson correlation coefficient. `None` for fewer than two points, unequal
/// lengths or a constant series.
pub fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    if x.len() != y.len() || x.len() < 2 {
        return None;
    }

    let mx = mean(x);
    let my = mean(y);

    let (mut cov, mut vx, mut vy) = (0.0, 0.0, 0.0);
    for (a, b) in x.iter().zip(y) {
        let dx = a - mx;
        let dy = b - my;
        cov += dx * dy;
        vx += dx * dx;
        vy += dy * dy;
    }

    if vx == 0.0 || vy == 0.0 {
        return None;
    }
    Some(cov / (vx.sqrt() * vy.sqrt()))
}

/// |A ∩ B| / |A ∪ B|, 0 when both sets are empty.
pub fn jaccard<T: Ord>(a: &BTreeSet<T>, b: &BTreeSet<T>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / union as f64
}

/// Symmetric matrix of pairwise Jaccard similarities with 1.0 on the diagonal.
pub fn jaccard_matrix<T: Ord>(sets: &[BTreeSet<T>]) -> Vec<Vec<f64>> {
    let n = sets.len();
    let mut matrix = vec![vec![0.0; n]; n];
    for i in 0..n {
        matrix[i][i] = 1.0;
        for j in (i + 1)..n {
            let similarity = jaccard(&sets[i], &sets[j]);
            matrix[i][j] = similarity;
            matrix[j][i] = similarity;
        }
    }
    matrix
}

/// |A ∩ B| / min(|A|, |B|), 0 when either set is empty.
pub fn overlap_coefficient<T: Ord>(a: &BTreeSet<T>, b: &BTreeSet<T>) -> f64 {
    let smaller = a.len().min(b.len());
    if smaller == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / smaller as f64
}

/// Cosine of the angle between two vectors, 0 if either is zero.
pub fn cosine(x: &[f64], y: &[f64]) -> f64 {
    let dot: f64 = x.iter().zip(y).map(|(a, b)| a * b).sum();
    let nx = x.iter().map(|a| a * a).sum::<f64>().sqrt();
    let ny = y.iter().map(|b| b * b).sum::<f64>().sqrt();
    if nx == 0.0 || ny == 0.0 {
        return 0.0;
    }
    dot / (nx * ny)
}
