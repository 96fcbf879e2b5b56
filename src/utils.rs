mod subscriber;

pub use subscriber::Subscriber;

use ndarray::{Array1, Array2};

use crate::error::{PlanningError, Result};

/// Index of the first maximum, so ties go to the lowest index.
/// An empty input yields 0.
pub fn argmax<T: PartialOrd>(values: impl IntoIterator<Item = T>) -> usize {
    let mut iter = values.into_iter().enumerate();
    let Some((mut result, mut max)) = iter.next() else {
        return 0;
    };
    for (i, v) in iter {
        if v > max {
            max = v;
            result = i;
        }
    }
    result
}

pub fn softmax_to_pdf(q_values: &[f64], inverse_temperature: f64) -> Array1<f64> {
    let scaled: Array1<f64> = q_values.iter().map(|q| q * inverse_temperature).collect();
    let max = scaled.fold(f64::NEG_INFINITY, |m, &x| m.max(x));
    let mut pdf = scaled.mapv(|x| (x - max).exp());
    let total = pdf.sum();
    pdf /= total;
    pdf
}

pub fn pmf_to_cmf(pmf: &[f64]) -> Array1<f64> {
    pmf.iter()
        .scan(0.0, |acc, p| {
            *acc += p;
            Some(*acc)
        })
        .collect()
}

pub fn sample_cmf(cmf: &[f64], random: f64) -> usize {
    cmf.iter().filter(|&&c| random > c).count()
}

/// Abstract action for a unit grid step: 0 for +x, 1 for -x, 2 for +y,
/// 3 for -y. Diagonal, zero or longer steps have none.
pub fn displacement_to_abstract_action(dx: i64, dy: i64) -> Option<usize> {
    match (dx, dy) {
        (1, 0) => Some(0),
        (-1, 0) => Some(1),
        (0, 1) => Some(2),
        (0, -1) => Some(3),
        _ => None,
    }
}

/// KL(p || q) in bits, skipping entries where either side is zero.
pub fn kl_divergence(q: &[f64], p: &[f64]) -> f64 {
    q.iter()
        .zip(p)
        .filter(|(&q_i, &p_i)| p_i > 0.0 && q_i > 0.0)
        .map(|(q_i, p_i)| p_i * (p_i / q_i).log2())
        .sum()
}

/// `q[a] = sum_aa q_abstract[aa] * mapping[a, aa]`
pub fn make_q_primitive(q_abstract: &Array1<f64>, mapping: &Array2<f64>) -> Result<Array1<f64>> {
    let (n_primitive, n_abstract) = mapping.dim();
    if q_abstract.len() != n_abstract {
        return Err(PlanningError::ShapeMismatch {
            what: "abstract action values",
            expected: format!("{n_abstract} entries"),
            found: format!("{} entries ({n_primitive} primitive actions)", q_abstract.len()),
        });
    }
    Ok(mapping.dot(q_abstract))
}

#[inline(always)]
pub fn from_2d_to_1d(ncol: usize, row: usize, col: usize) -> usize {
    row * ncol + col
}

#[inline(always)]
pub fn from_1d_to_2d(ncol: usize, pos: usize) -> (usize, usize) {
    (pos / ncol, pos % ncol)
}

/// Cell reached by moving left, down, right or up (actions 0 to 3) from
/// `(row, col)`, staying put at the borders.
#[inline(always)]
pub fn inc(nrow: usize, ncol: usize, row: usize, col: usize, a: usize) -> (usize, usize) {
    match a {
        0 => (row, col.saturating_sub(1)),
        1 => ((row + 1).min(nrow - 1), col),
        2 => (row, (col + 1).min(ncol - 1)),
        3 => (row.saturating_sub(1), col),
        _ => (row, col),
    }
}
