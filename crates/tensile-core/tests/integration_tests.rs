//! Integration tests for tensile-core.
//!
//! End-to-end scenarios across the descriptor, addressing, reshape, and
//! view layers, including the boundary behaviors the layout contracts pin
//! down.

use approx::assert_relative_eq;
use tensile_core::{address, NdArray, Order, ShapeDescriptor};

fn iota(shape: &[usize]) -> NdArray<f64> {
    let len: usize = shape.iter().product();
    NdArray::from_vec((1..=len).map(|x| x as f64).collect(), shape).unwrap()
}

#[test]
fn transpose_then_flatten_copies_in_view_order() {
    // The canonical scenario: [2,3] row-major 1..6, transposed, then
    // flattened. The flatten cannot reuse the buffer and must read the
    // transposed view's own element order.
    let a = iota(&[2, 3]);
    let t = a.transpose().unwrap();

    assert_eq!(t.shape(), &[3, 2]);
    assert_eq!(t.at(&[1, 0]).unwrap(), 2.0);
    assert_eq!(t.at(&[1, 0]).unwrap(), a.at(&[0, 1]).unwrap());

    let flat = t.reshape(&[6]).unwrap();
    assert_eq!(flat.to_vec_row_major(), vec![1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
}

#[test]
fn contiguity_detection_on_dense_and_transposed() {
    let a = iota(&[2, 3, 4]);
    assert_eq!(a.element_wise_stride(), 1);
    assert_eq!(a.order(), Order::RowMajor);
    assert!(a.is_contiguous_in_buffer(Order::RowMajor));

    let t = a.transpose().unwrap();
    // Full reversal of a dense C block is exactly the F-contiguous layout.
    assert!(t.is_contiguous_in_buffer(Order::ColMajor));
    assert!(!t.is_contiguous_in_buffer(Order::RowMajor));
    assert_eq!(t.order(), Order::ColMajor);

    // A partial permutation is contiguous in neither order.
    let p = a.permute(&[1, 0, 2]).unwrap();
    assert!(!p.is_contiguous_in_buffer(Order::RowMajor));
    assert!(!p.is_contiguous_in_buffer(Order::ColMajor));
    assert_eq!(p.element_wise_stride(), -1);
}

#[test]
fn aliasing_through_views_and_dup() {
    let a = iota(&[2, 3]);
    let mut s = a.slice(0, 1).unwrap();
    s.put_scalar(&[0, 1], 50.0).unwrap();
    assert_eq!(a.at(&[1, 1]).unwrap(), 50.0);

    let mut t = a.transpose().unwrap();
    t.put_scalar(&[2, 0], 60.0).unwrap();
    assert_eq!(a.at(&[0, 2]).unwrap(), 60.0);

    let mut d = a.dup();
    d.put_scalar(&[0, 0], -1.0).unwrap();
    assert_eq!(a.at(&[0, 0]).unwrap(), 1.0);
}

#[test]
fn scalar_boundaries() {
    let s = NdArray::scalar(5.0f64);
    assert_eq!(s.shape(), &[1, 1]);
    for dim in [-1isize, 0, 1] {
        assert_eq!(s.descriptor().size(dim).unwrap(), 1);
    }
    assert!(s.descriptor().size(2).is_err());
    assert!(s.descriptor().size(-2).is_err());
}

#[test]
fn slice_upper_bound_is_exclusive() {
    let a = iota(&[2, 3]);
    assert!(a.slice(0, 1).is_ok());
    assert!(a.slice(0, 2).is_err());
    assert!(a.slice(1, 3).is_err());
}

#[test]
fn reshape_total_length_precondition() {
    let a = iota(&[2, 3]);
    let err = a.reshape(&[4, 2]).unwrap_err();
    let msg = format!("{err:#}");
    assert!(msg.contains("6"), "diagnostic should name totals: {msg}");
}

#[test]
fn reshape_no_copy_and_copy_paths_agree() {
    // Same logical result whether or not the no-copy path is taken.
    let a = iota(&[2, 3, 4]);
    let direct = a.reshape(&[4, 6]).unwrap();

    // Force the copy path through a non-contiguous view of equal contents.
    let scrambled = a.permute(&[1, 0, 2]).unwrap().permute(&[1, 0, 2]).unwrap();
    let forced = scrambled.dup().reshape(&[4, 6]).unwrap();
    for (d, f) in direct
        .to_vec_row_major()
        .into_iter()
        .zip(forced.to_vec_row_major())
    {
        assert_relative_eq!(d, f);
    }
}

#[test]
fn f_order_flatten_of_c_array() {
    let a = iota(&[2, 3]);
    // Reading a C-layout matrix in F order flattens column by column.
    let flat = a.reshape_with_order(&[6], Order::ColMajor).unwrap();
    assert_eq!(flat.to_vec_in_order(Order::ColMajor), vec![1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
}

#[test]
fn packed_descriptor_is_the_wire_header() {
    let a = iota(&[2, 3]);
    let t = a.transpose().unwrap();
    let packed = t.descriptor().to_packed();
    // The transpose is F-contiguous, so it carries a unit flat stride
    // under its own ('f') interpretation.
    assert_eq!(packed, vec![2, 3, 2, 1, 3, 0, 1, 'f' as i64]);
    let back = ShapeDescriptor::from_packed(&packed).unwrap();
    assert_eq!(&back, t.descriptor());
}

#[test]
fn views_materialize_before_serialization() {
    // A view must not expose unrelated buffer regions: dup() yields an
    // offset-zero dense block covering exactly the view's elements.
    let a = iota(&[4, 5]);
    let block = a.sub_array(&[1, 2], &[2, 3], &[5, 1]).unwrap();
    assert!(block.is_view());
    let materialized = block.dup();
    assert!(!materialized.is_view());
    assert_eq!(materialized.offset(), 0);
    assert_eq!(materialized.len(), 6);
    assert_eq!(
        materialized.to_vec_row_major(),
        vec![8.0, 9.0, 10.0, 13.0, 14.0, 15.0]
    );
}

#[test]
fn tad_matches_manual_slices() {
    let a = iota(&[2, 3, 4]);
    for i in 0..a.tensors_along_dimension(&[2]).unwrap() {
        let tad = a.tensor_along_dimension(i, &[2]).unwrap();
        let row: Vec<f64> = (0..4).map(|k| a.at(&[i / 3, i % 3, k]).unwrap()).collect();
        assert_eq!(tad.to_vec_row_major(), row);
    }
}

#[test]
fn addressing_roundtrip_on_strided_view() {
    let a = iota(&[3, 4, 5]);
    let v = a.permute(&[2, 0, 1]).unwrap();
    let desc = v.descriptor();
    for i in 0..v.len() {
        let idx = address::linear_to_indices(desc.shape(), i, desc.order()).unwrap();
        assert_eq!(
            address::offset_for(desc, &idx).unwrap(),
            address::offset_of_linear(desc, i).unwrap()
        );
    }
}

#[test]
fn assign_through_transposed_view_mutates_parent() {
    let a = iota(&[2, 3]);
    let mut t = a.transpose().unwrap();
    let src = NdArray::from_vec(vec![10.0, 20.0, 30.0, 40.0, 50.0, 60.0], &[3, 2]).unwrap();
    t.assign(&src).unwrap();
    assert_eq!(t.to_vec_row_major(), src.to_vec_row_major());
    // Parent sees the writes at transposed positions.
    assert_eq!(a.at(&[0, 0]).unwrap(), 10.0);
    assert_eq!(a.at(&[1, 0]).unwrap(), 20.0);
    assert_eq!(a.at(&[0, 1]).unwrap(), 30.0);
}

#[test]
fn in_place_permute_is_private_to_the_view() {
    let mut a = iota(&[2, 3, 4]);
    let watcher = a.clone();
    a.permute_in_place(&[2, 1, 0]).unwrap();
    assert_eq!(a.shape(), &[4, 3, 2]);
    assert_eq!(watcher.shape(), &[2, 3, 4]);
    // Buffer contents are still shared.
    a.put_scalar(&[3, 2, 1], 0.0).unwrap();
    assert_eq!(watcher.at(&[1, 2, 3]).unwrap(), 0.0);
}
