//! Example assembling a block Laplacian and solving it with conjugate gradients
//!
//! This example demonstrates the implicit build mode, the flat matrix-vector
//! product and the scalar CSR export handed to direct solvers.

use bcrs::{
    axpy, dot, flat_mv, scale, two_norm, BcrsMatrix, FieldMatrix, ImplicitMatrixBuilder, Result,
};

type Block = FieldMatrix<f64, 2, 2>;

fn main() -> Result<()> {
    let n = 64;

    // Two decoupled 1D Laplacians interleaved in 2x2 blocks
    let mut matrix = BcrsMatrix::<Block>::new();
    {
        let mut builder = ImplicitMatrixBuilder::with_size(&mut matrix, n, n, 3, 0.0)?;
        for i in 0..n {
            let mut row = builder.row(i)?;
            *row.entry(i)? += Block::diagonal(2.0);
            if i > 0 {
                *row.entry(i - 1)? += Block::diagonal(-1.0);
            }
            if i + 1 < n {
                *row.entry(i + 1)? += Block::diagonal(-1.0);
            }
        }
    }
    let stats = matrix.compress()?;
    println!(
        "Compressed {}x{} blocks: avg {:.2} per row, max {}, memory ratio {:.2}",
        matrix.n(),
        matrix.m(),
        stats.avg,
        stats.maximum,
        stats.mem_ratio
    );

    let b = vec![[1.0, 0.5]; n];
    let x = conjugate_gradient(&matrix, &b, 1e-10, 500)?;
    println!("x[n/2] = {:?}", x[n / 2]);

    let csr = matrix.to_scalar_csr()?;
    println!(
        "Scalar {} export: {}x{} with {} entries",
        csr.format,
        csr.rows,
        csr.cols,
        csr.nnz()
    );
    Ok(())
}

fn conjugate_gradient(
    a: &BcrsMatrix<Block>,
    b: &[[f64; 2]],
    tolerance: f64,
    max_iterations: usize,
) -> Result<Vec<[f64; 2]>> {
    let mut x = vec![[0.0; 2]; b.len()];
    let mut r = b.to_vec();
    let mut p = r.clone();
    let mut q = vec![[0.0; 2]; b.len()];
    let mut rho = dot(&r, &r)?;

    for iteration in 0..max_iterations {
        if rho.sqrt() < tolerance {
            println!("Converged after {iteration} iterations");
            break;
        }
        flat_mv(a, &p, &mut q)?;
        let alpha = rho / dot(&p, &q)?;
        axpy(&mut x, alpha, &p)?;
        axpy(&mut r, -alpha, &q)?;
        let next = dot(&r, &r)?;
        scale(&mut p, next / rho);
        axpy(&mut p, 1.0, &r)?;
        rho = next;
    }
    println!("Residual norm: {:.3e}", two_norm(&r));
    Ok(x)
}
