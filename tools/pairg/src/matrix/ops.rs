//! Boolean semiring algebra on CRS matrices
//!
//! `add` is OR, `multiply` composes relations (walks of length a then b give
//! walks of length a + b). Both run a symbolic pass that sizes every output
//! row, an exclusive scan, and a numeric pass that fills the rows. Every
//! result is row-sorted and duplicate-free, whatever the input ordering.

use pairg_common::{Error, Result};
use std::borrow::Cow;
use tracing::debug;

use super::csr::BoolCsr;
use super::exec::{exclusive_scan, RowExecutor};

/// Dense per-worker accumulator over the output columns of one row
struct RowMask {
    seen: Vec<bool>,
    touched: Vec<u32>,
}

impl RowMask {
    fn new(n_cols: usize) -> Self {
        Self {
            seen: vec![false; n_cols],
            touched: Vec::new(),
        }
    }

    #[inline]
    fn insert(&mut self, col: u32) {
        let slot = &mut self.seen[col as usize];
        if !*slot {
            *slot = true;
            self.touched.push(col);
        }
    }

    fn len(&self) -> usize {
        self.touched.len()
    }

    fn clear(&mut self) {
        for &col in &self.touched {
            self.seen[col as usize] = false;
        }
        self.touched.clear();
    }

    /// Write the distinct columns, ascending, into `row` and reset.
    fn drain_sorted_into(&mut self, row: &mut [u32]) {
        self.touched.sort_unstable();
        row.copy_from_slice(&self.touched);
        self.clear();
    }
}

/// Symbolic + numeric driver shared by `add` and `multiply`.
///
/// `candidates(i, emit)` must emit every output column of row `i`, in any
/// order and with any multiplicity; it is called once per phase.
fn two_phase<F>(exec: &RowExecutor, n_rows: usize, n_cols: usize, candidates: F) -> BoolCsr
where
    F: Fn(usize, &mut dyn FnMut(u32)) + Sync + Send,
{
    let counts = exec.map_rows(
        n_rows,
        || RowMask::new(n_cols),
        |mask, i| {
            candidates(i, &mut |col: u32| mask.insert(col));
            let count = mask.len();
            mask.clear();
            count
        },
    );

    let offsets = exclusive_scan(&counts);
    let mut columns = vec![0u32; offsets[n_rows] as usize];

    exec.for_each_row_mut(
        &offsets,
        &mut columns,
        || RowMask::new(n_cols),
        |mask, i, row| {
            candidates(i, &mut |col: u32| mask.insert(col));
            debug_assert_eq!(mask.len(), row.len());
            mask.drain_sorted_into(row);
        },
    );

    BoolCsr::from_parts_unchecked(n_rows, n_cols, offsets, columns)
}

/// Boolean union `A + B`; operands must have identical shapes.
pub fn add(exec: &RowExecutor, a: &BoolCsr, b: &BoolCsr) -> Result<BoolCsr> {
    if a.shape() != b.shape() {
        return Err(Error::DimensionMismatch {
            op: "add",
            left: a.shape(),
            right: b.shape(),
        });
    }

    Ok(two_phase(exec, a.n_rows(), a.n_cols(), |i, emit| {
        for &col in a.row(i) {
            emit(col);
        }
        for &col in b.row(i) {
            emit(col);
        }
    }))
}

/// Boolean product: C(i,j) = 1 iff A(i,k) and B(k,j) for some k.
pub fn multiply(exec: &RowExecutor, a: &BoolCsr, b: &BoolCsr) -> Result<BoolCsr> {
    if a.n_cols() != b.n_rows() {
        return Err(Error::DimensionMismatch {
            op: "multiply",
            left: a.shape(),
            right: b.shape(),
        });
    }

    Ok(two_phase(exec, a.n_rows(), b.n_cols(), |i, emit| {
        for &k in a.row(i) {
            for &col in b.row(k as usize) {
                emit(col);
            }
        }
    }))
}

/// `A^n` by square-and-multiply; `A^0` is the identity.
pub fn power(exec: &RowExecutor, a: &BoolCsr, n: u32) -> Result<BoolCsr> {
    if !a.is_square() {
        return Err(Error::DimensionMismatch {
            op: "power",
            left: a.shape(),
            right: a.shape(),
        });
    }

    let mut result = BoolCsr::identity(a.n_rows());
    let mut base = Cow::Borrowed(a);
    let mut exp = n;
    let mut step = 0u32;

    while exp > 0 {
        if exp & 1 == 1 {
            exec.check_cancelled()?;
            result = multiply(exec, &result, &base)?;
            debug!(exponent = n, step, nnz = result.nnz(), "power: multiplied result");
        }
        exp >>= 1;
        if exp == 0 {
            break;
        }
        exec.check_cancelled()?;
        base = Cow::Owned(multiply(exec, &base, &base)?);
        step += 1;
        debug!(exponent = n, step, nnz = base.nnz(), "power: squared base");
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exec() -> RowExecutor {
        RowExecutor::with_threads(2).unwrap()
    }

    fn from_rows(n: usize, rows: &[&[u32]]) -> BoolCsr {
        let mut offsets = vec![0u64];
        let mut columns = Vec::new();
        for row in rows {
            columns.extend_from_slice(row);
            offsets.push(columns.len() as u64);
        }
        BoolCsr::from_parts(rows.len(), n, offsets, columns).unwrap()
    }

    /// Directed chain 0 -> 1 -> ... -> n-1
    fn chain(n: usize) -> BoolCsr {
        let rows: Vec<Vec<u32>> = (0..n)
            .map(|i| if i + 1 < n { vec![i as u32 + 1] } else { vec![] })
            .collect();
        let refs: Vec<&[u32]> = rows.iter().map(|r| r.as_slice()).collect();
        from_rows(n, &refs)
    }

    #[test]
    fn test_add_deduplicates_and_sorts() {
        let a = from_rows(4, &[&[3, 1, 1], &[], &[2], &[0]]);
        let b = from_rows(4, &[&[1, 0], &[2], &[2], &[]]);
        let c = add(&exec(), &a, &b).unwrap();

        assert_eq!(c.row(0), &[0, 1, 3]);
        assert_eq!(c.row(1), &[2]);
        assert_eq!(c.row(2), &[2]);
        assert_eq!(c.row(3), &[0]);
        assert_eq!(c.nnz(), 6);
        assert!(c.is_row_sorted());
    }

    #[test]
    fn test_add_identity_gives_step_or_stay() {
        let a = chain(3);
        let b = add(&exec(), &a, &BoolCsr::identity(3)).unwrap();
        assert_eq!(b.row(0), &[0, 1]);
        assert_eq!(b.row(1), &[1, 2]);
        assert_eq!(b.row(2), &[2]);
    }

    #[test]
    fn test_add_dimension_mismatch() {
        let err = add(&exec(), &BoolCsr::identity(3), &BoolCsr::identity(4)).unwrap_err();
        assert!(matches!(err, Error::DimensionMismatch { op: "add", .. }));
    }

    #[test]
    fn test_multiply_composes_relations() {
        // 0 -> {1, 2}, 1 -> {3}, 2 -> {3}, 3 -> {}
        let a = from_rows(4, &[&[2, 1], &[3], &[3], &[]]);
        let c = multiply(&exec(), &a, &a).unwrap();

        // two paths 0 -> 3 collapse to one entry
        assert_eq!(c.row(0), &[3]);
        assert!(c.row(1).is_empty());
        assert!(c.row(2).is_empty());
        assert_eq!(c.nnz(), 1);
    }

    #[test]
    fn test_multiply_by_identity_sorts_rows() {
        let a = from_rows(3, &[&[2, 0, 2], &[1], &[]]);
        let c = multiply(&exec(), &a, &BoolCsr::identity(3)).unwrap();
        assert_eq!(c.row(0), &[0, 2]);
        assert_eq!(c.row(1), &[1]);
    }

    #[test]
    fn test_multiply_rectangular() {
        // 2x3 times 3x2
        let a = from_rows(3, &[&[0, 2], &[1]]);
        let b = from_rows(2, &[&[1], &[0], &[0, 1]]);
        let c = multiply(&exec(), &a, &b).unwrap();
        assert_eq!(c.shape(), (2, 2));
        assert_eq!(c.row(0), &[0, 1]);
        assert_eq!(c.row(1), &[0]);
    }

    #[test]
    fn test_multiply_dimension_mismatch() {
        let a = from_rows(3, &[&[0], &[1]]);
        let err = multiply(&exec(), &a, &a).unwrap_err();
        assert!(matches!(
            err,
            Error::DimensionMismatch {
                op: "multiply",
                left: (2, 3),
                right: (2, 3)
            }
        ));
    }

    #[test]
    fn test_power_zero_is_identity() {
        let a = from_rows(3, &[&[0, 1, 2], &[0], &[1]]);
        assert_eq!(power(&exec(), &a, 0).unwrap(), BoolCsr::identity(3));
    }

    #[test]
    fn test_power_one_normalizes() {
        let a = from_rows(3, &[&[2, 1, 2], &[0], &[]]);
        let p = power(&exec(), &a, 1).unwrap();
        assert_eq!(p.row(0), &[1, 2]);
        assert_eq!(p.row(1), &[0]);
    }

    #[test]
    fn test_power_on_chain_shifts_diagonal() {
        let a = chain(10);
        for n in [2u32, 3, 5, 7, 9] {
            let p = power(&exec(), &a, n).unwrap();
            for i in 0..10usize {
                let expected: Vec<u32> = if i + (n as usize) < 10 {
                    vec![(i + n as usize) as u32]
                } else {
                    vec![]
                };
                assert_eq!(p.row(i), expected.as_slice(), "n={n} row={i}");
            }
        }
        assert_eq!(power(&exec(), &a, 10).unwrap().nnz(), 0);
    }

    #[test]
    fn test_power_matches_repeated_multiply() {
        let a = from_rows(5, &[&[1, 3], &[2], &[0, 4], &[3], &[1]]);
        let e = exec();
        let mut expected = BoolCsr::identity(5);
        for n in 0..9u32 {
            assert_eq!(power(&e, &a, n).unwrap(), expected, "n={n}");
            expected = multiply(&e, &expected, &a).unwrap();
        }
    }

    #[test]
    fn test_power_rejects_non_square() {
        let a = from_rows(3, &[&[0], &[1]]);
        assert!(matches!(
            power(&exec(), &a, 2),
            Err(Error::DimensionMismatch { op: "power", .. })
        ));
    }

    #[test]
    fn test_power_honours_cancellation() {
        let e = exec();
        e.cancel_flag().cancel();
        assert!(matches!(power(&e, &chain(4), 3), Err(Error::Cancelled)));
        // no multiply needed for the zeroth power
        assert!(power(&e, &chain(4), 0).is_ok());
    }
}
