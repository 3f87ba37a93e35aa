//! Vector algebra over flat views
//!
//! Every operation works on any [`FlatVector`]: plain arrays, nested block
//! vectors, sparse vectors and heterogeneous vectors alike. Two operands are
//! aligned by flat offset, so they may have different nesting as long as
//! their flat dimensions agree.

use bcrs_core::{check_dimensions, Field, FlatMatrix, FlatVector, IndexAccess, IndexPath, Result};

use crate::access::{apply_at_index_zip, AtIndexZip, IndexCursor};

fn to_dense<V>(v: &V) -> Vec<V::Scalar>
where
    V: FlatVector + ?Sized,
{
    let mut dense = vec![V::Scalar::ZERO; v.flat_dim()];
    v.flat_for_each(0, &mut |x, k| dense[k] = *x);
    dense
}

/// Euclidean scalar product `a . b`
pub fn dot<A, B>(a: &A, b: &B) -> Result<A::Scalar>
where
    A: FlatVector + ?Sized,
    B: FlatVector<Scalar = A::Scalar> + ?Sized,
{
    let dense = to_dense(a);
    check_dimensions("dot", dense.len(), b.flat_dim())?;
    let mut sum = A::Scalar::ZERO;
    b.flat_for_each(0, &mut |y, k| sum += dense[k] * *y);
    Ok(sum)
}

/// Scalar product restricted to the flat positions where `mask` is true
pub fn masked_dot<A, B>(a: &A, b: &B, mask: &[bool]) -> Result<A::Scalar>
where
    A: FlatVector + ?Sized,
    B: FlatVector<Scalar = A::Scalar> + ?Sized,
{
    let dense = to_dense(a);
    check_dimensions("masked_dot", dense.len(), b.flat_dim())?;
    check_dimensions("masked_dot mask", dense.len(), mask.len())?;
    let mut sum = A::Scalar::ZERO;
    b.flat_for_each(0, &mut |y, k| {
        if mask[k] {
            sum += dense[k] * *y;
        }
    });
    Ok(sum)
}

/// Scalar product leaving out the entries addressed by `skip`
///
/// Each multi-index in `skip` removes the scalar or the whole sub-block it
/// addresses. Indices are assumed distinct and non-overlapping.
pub fn dot_skipping<A, B, I>(a: &A, b: &B, skip: I) -> Result<<A as FlatVector>::Scalar>
where
    A: FlatVector + IndexAccess<Scalar = <A as FlatVector>::Scalar>,
    B: FlatVector<Scalar = <A as FlatVector>::Scalar>
        + IndexAccess<Scalar = <A as FlatVector>::Scalar>,
    I: IntoIterator,
    I::Item: IndexPath,
{
    let full = dot(a, b)?;
    let mut skipped = SubDot(<A as FlatVector>::Scalar::ZERO);
    for index in skip {
        apply_at_index_zip(&index, a, b, &mut skipped)?;
    }
    Ok(full - skipped.0)
}

struct SubDot<K>(K);

impl<K: Field> AtIndexZip<K, K> for SubDot<K> {
    fn reached<A, B>(&mut self, a: &A, b: &B, cursor: IndexCursor<'_>) -> Result<()>
    where
        A: IndexAccess<Scalar = K> + ?Sized,
        B: IndexAccess<Scalar = K> + ?Sized,
    {
        // a flat index arrives unwalked
        if cursor.depth() == 0 && !cursor.rest().is_empty() {
            return apply_at_index_zip(cursor.rest(), a, b, self);
        }
        let mut xs = Vec::new();
        a.for_each_scalar(&mut |x| xs.push(*x));
        let mut k = 0;
        b.for_each_scalar(&mut |y| {
            if let Some(x) = xs.get(k) {
                self.0 += *x * *y;
            }
            k += 1;
        });
        Ok(())
    }
}

/// Squared Euclidean norm
pub fn two_norm2<V: FlatVector + ?Sized>(v: &V) -> f64 {
    let mut sum = 0.0;
    v.flat_for_each(0, &mut |x, _| {
        let x = x.to_f64();
        sum += x * x;
    });
    sum
}

/// Euclidean norm
pub fn two_norm<V: FlatVector + ?Sized>(v: &V) -> f64 {
    two_norm2(v).sqrt()
}

/// Largest absolute value of any stored scalar
pub fn infinity_norm<V: FlatVector + ?Sized>(v: &V) -> f64 {
    let mut max = 0.0f64;
    v.flat_for_each(0, &mut |x, _| max = max.max(x.abs_f64()));
    max
}

/// Set every stored scalar to `value`
pub fn fill<V: FlatVector + ?Sized>(v: &mut V, value: V::Scalar) {
    v.flat_for_each_mut(0, &mut |x, _| *x = value);
}

/// `v *= alpha`
pub fn scale<V: FlatVector + ?Sized>(v: &mut V, alpha: V::Scalar) {
    v.flat_for_each_mut(0, &mut |x, _| *x *= alpha);
}

/// `y += alpha * x`
///
/// Positions not stored in `y` are left out.
pub fn axpy<Y, X>(y: &mut Y, alpha: Y::Scalar, x: &X) -> Result<()>
where
    Y: FlatVector + ?Sized,
    X: FlatVector<Scalar = Y::Scalar> + ?Sized,
{
    let dense = to_dense(x);
    check_dimensions("axpy", y.flat_dim(), dense.len())?;
    y.flat_for_each_mut(0, &mut |v, k| *v += alpha * dense[k]);
    Ok(())
}

/// `y = A x` on the flat views of the operands
///
/// Positions not stored in `y` are left out.
pub fn flat_mv<M, X, Y>(a: &M, x: &X, y: &mut Y) -> Result<()>
where
    M: FlatMatrix + ?Sized,
    X: FlatVector<Scalar = M::Scalar> + ?Sized,
    Y: FlatVector<Scalar = M::Scalar> + ?Sized,
{
    let dense_x = to_dense(x);
    let (rows, cols) = a.flat_shape();
    check_dimensions("flat_mv cols", cols, dense_x.len())?;
    check_dimensions("flat_mv rows", rows, y.flat_dim())?;
    let mut dense_y = vec![M::Scalar::ZERO; rows];
    a.flat_for_each(0, 0, &mut |value, r, c| dense_y[r] += *value * dense_x[c]);
    y.flat_for_each_mut(0, &mut |v, k| *v = dense_y[k]);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BcrsMatrix, FieldMatrix, SparseVector};
    use approx::assert_relative_eq;
    use bcrs_core::BcrsError;

    #[test]
    fn test_dot_across_nesting() {
        let a = vec![[1.0, 2.0], [3.0, 4.0]];
        let b = [1.0, 1.0, 2.0, 2.0];
        assert_eq!(dot(&a, &b), Ok(17.0));
        assert_eq!(
            dot(&a, &[1.0, 2.0]),
            Err(BcrsError::DimensionMismatch {
                context: "dot",
                expected: 4,
                found: 2
            })
        );
    }

    #[test]
    fn test_norms() {
        let v = vec![3.0, -4.0];
        assert_relative_eq!(two_norm2(&v), 25.0);
        assert_relative_eq!(two_norm(&v), 5.0);
        assert_relative_eq!(infinity_norm(&v), 4.0);
    }

    #[test]
    fn test_sparse_dot_and_axpy() {
        let s = SparseVector::from_entries(4, [(1, 2.0), (3, -1.0)]).unwrap();
        let d = vec![1.0, 2.0, 3.0, 4.0];
        assert_eq!(dot(&s, &d), Ok(0.0));
        assert_eq!(dot(&d, &s), Ok(0.0));

        let mut y = d.clone();
        axpy(&mut y, 2.0, &s).unwrap();
        assert_eq!(y, vec![1.0, 6.0, 3.0, 2.0]);
        scale(&mut y, 0.5);
        assert_eq!(y, vec![0.5, 3.0, 1.5, 1.0]);
        fill(&mut y, 1.0);
        assert_eq!(y, vec![1.0; 4]);
    }

    #[test]
    fn test_masked_and_skipping_dot() {
        let a = vec![[1.0, 2.0], [3.0, 4.0]];
        let b = vec![[1.0, 1.0], [1.0, 1.0]];
        let mask = [true, false, false, true];
        assert_eq!(masked_dot(&a, &b, &mask), Ok(5.0));
        assert_eq!(dot_skipping(&a, &b, [[0usize, 1], [1, 0]]), Ok(5.0));
        assert_eq!(dot_skipping(&a, &b, [[1usize]]), Ok(3.0));
        assert_eq!(dot_skipping(&a, &b, [1usize]), Ok(3.0));
    }

    #[test]
    fn test_flat_mv_with_block_matrix() {
        let mut m = BcrsMatrix::<FieldMatrix<f64, 2, 2>>::implicit(2, 2, 2, 0.0).unwrap();
        *m.entry(0, 0).unwrap() = FieldMatrix::diagonal(2.0);
        *m.entry(1, 0).unwrap() = FieldMatrix::filled(1.0);
        *m.entry(1, 1).unwrap() = FieldMatrix::diagonal(3.0);
        m.compress().unwrap();

        let x = vec![[1.0, 2.0], [3.0, 4.0]];
        let mut y = vec![[0.0; 2]; 2];
        flat_mv(&m, &x, &mut y).unwrap();
        assert_eq!(y, vec![[2.0, 4.0], [12.0, 15.0]]);
    }
}
