//! Algebraic properties of the GF(2) kernel and solver.

use otc::gf2::solve::{kron, solve, unvectorize, vectorize};
use otc::gf2::{in_image, BitMatrix};
use proptest::collection::vec;
use proptest::prelude::*;

fn matrix(rows: usize, cols: usize) -> impl Strategy<Value = BitMatrix> {
    vec(vec(any::<bool>(), cols), rows).prop_map(|rows| BitMatrix::canonicalize(&rows).unwrap())
}

fn any_matrix() -> impl Strategy<Value = BitMatrix> {
    (1usize..7, 1usize..7).prop_flat_map(|(r, c)| matrix(r, c))
}

proptest! {
    #[test]
    fn canonicalize_is_idempotent(rows in vec(vec(-5i64..5, 4), 1..6)) {
        let once = BitMatrix::canonicalize(&rows).unwrap();
        let twice = BitMatrix::canonicalize(&once.to_rows()).unwrap();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn multiply_is_associative(
        (a, b, c) in (1usize..6, 1usize..6, 1usize..6, 1usize..6)
            .prop_flat_map(|(p, q, r, s)| (matrix(p, q), matrix(q, r), matrix(r, s)))
    ) {
        let left = a.multiply(&b).unwrap().multiply(&c).unwrap();
        let right = a.multiply(&b.multiply(&c).unwrap()).unwrap();
        prop_assert_eq!(left, right);
    }

    #[test]
    fn zero_vector_is_always_in_the_image(b in any_matrix()) {
        let zero = BitMatrix::zeros(b.rows(), 1);
        prop_assert!(in_image(&b, &zero).unwrap());
    }

    #[test]
    fn image_membership_agrees_with_solvability(
        (b, v) in any_matrix().prop_flat_map(|b| {
            let rows = b.rows();
            (Just(b), matrix(rows, 1))
        })
    ) {
        prop_assert_eq!(in_image(&b, &v).unwrap(), solve(&b, &v).is_ok());
    }

    #[test]
    fn solutions_satisfy_the_system(
        (a, rhs) in any_matrix().prop_flat_map(|a| {
            let rows = a.rows();
            (Just(a), matrix(rows, 1))
        })
    ) {
        match solve(&a, &rhs) {
            Ok(x) => prop_assert_eq!(a.multiply(&x).unwrap(), rhs),
            Err(e) => prop_assert!(e.is_inconsistent()),
        }
    }

    #[test]
    fn consistent_systems_are_solved(
        (a, x0) in any_matrix().prop_flat_map(|a| {
            let cols = a.cols();
            (Just(a), matrix(cols, 1))
        })
    ) {
        let rhs = a.multiply(&x0).unwrap();
        let x = solve(&a, &rhs).unwrap();
        prop_assert_eq!(a.multiply(&x).unwrap(), rhs);
    }

    #[test]
    fn rank_is_bounded_and_transpose_invariant(a in any_matrix()) {
        let r = a.rank();
        prop_assert!(r <= a.rows().min(a.cols()));
        prop_assert_eq!(r, a.transpose().rank());
    }

    #[test]
    fn vectorize_round_trips(a in any_matrix()) {
        let v = vectorize(&a);
        prop_assert_eq!(unvectorize(&v, a.rows(), a.cols()).unwrap(), a);
    }

    #[test]
    fn kronecker_vectorization_identity(
        (d, j) in (1usize..5, 1usize..5, 1usize..5)
            .prop_flat_map(|(p, q, r)| (matrix(p, q), matrix(q, r)))
    ) {
        // vec(d·J) = (I ⊗ d)·vec(J)
        let lhs = vectorize(&d.multiply(&j).unwrap());
        let rhs = kron(&BitMatrix::identity(j.cols()), &d).multiply(&vectorize(&j)).unwrap();
        prop_assert_eq!(lhs, rhs);
    }

    #[test]
    fn kronecker_right_factor_identity(
        (j, d) in (1usize..5, 1usize..5, 1usize..5)
            .prop_flat_map(|(p, q, r)| (matrix(p, q), matrix(q, r)))
    ) {
        // vec(J·d) = (dᵀ ⊗ I)·vec(J)
        let lhs = vectorize(&j.multiply(&d).unwrap());
        let rhs = kron(&d.transpose(), &BitMatrix::identity(j.rows()))
            .multiply(&vectorize(&j))
            .unwrap();
        prop_assert_eq!(lhs, rhs);
    }
}

#[test]
fn known_inconsistent_system() {
    let a = BitMatrix::canonicalize(&[[0u8]]).unwrap();
    let b = BitMatrix::canonicalize(&[[1u8]]).unwrap();
    assert!(solve(&a, &b).unwrap_err().is_inconsistent());
}

#[test]
fn empty_boundary_and_empty_vector() {
    let b = BitMatrix::zeros(0, 0);
    let v = BitMatrix::zeros(0, 1);
    assert!(in_image(&b, &v).unwrap());
}

#[test]
fn empty_boundary_and_nonempty_vector_is_a_mismatch() {
    let b = BitMatrix::zeros(0, 3);
    let v = BitMatrix::column(&[1u8, 0]);
    assert!(matches!(
        in_image(&b, &v),
        Err(otc::Error::DimensionMismatch { left: 0, right: 2, .. })
    ));
}
