use tensr_core::{DType, Device, Error, Tensor};

fn f32s(data: Vec<f32>, dims: &[usize]) -> Tensor {
    Tensor::from_vec(data, dims, Device::Cpu).unwrap()
}

#[test]
fn sum_all() {
    let a = Tensor::ones([2, 3], DType::F32, Device::Cpu).unwrap();
    let s = a.sum(&[], false).unwrap();
    assert_eq!(s.dims(), &[1]);
    assert_eq!(s.to_flat_vec::<f32>().unwrap(), vec![6.0]);
}

#[test]
fn sum_all_keepdims() {
    let a = Tensor::ones([2, 3], DType::F32, Device::Cpu).unwrap();
    let s = a.sum(&[], true).unwrap();
    assert_eq!(s.dims(), &[1, 1]);
    assert_eq!(s.to_flat_vec::<f32>().unwrap(), vec![6.0]);
}

#[test]
fn sum_per_axis() {
    // [[1, 2, 3], [4, 5, 6]]
    let a = f32s(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]);

    let rows = a.sum(&[0], false).unwrap();
    assert_eq!(rows.dims(), &[3]);
    assert_eq!(rows.to_flat_vec::<f32>().unwrap(), vec![5.0, 7.0, 9.0]);

    let cols = a.sum(&[1], false).unwrap();
    assert_eq!(cols.dims(), &[2]);
    assert_eq!(cols.to_flat_vec::<f32>().unwrap(), vec![6.0, 15.0]);

    let cols_kept = a.sum(&[1], true).unwrap();
    assert_eq!(cols_kept.dims(), &[2, 1]);
    assert_eq!(cols_kept.to_flat_vec::<f32>().unwrap(), vec![6.0, 15.0]);
}

#[test]
fn sum_multiple_axes() {
    let data: Vec<f32> = (0..24).map(|i| i as f32).collect();
    let a = f32s(data, &[2, 3, 4]);
    let s = a.sum(&[0, 2], false).unwrap();
    assert_eq!(s.dims(), &[3]);
    // Middle-axis slices of 0..24 arranged as [2, 3, 4].
    assert_eq!(s.to_flat_vec::<f32>().unwrap(), vec![60.0, 92.0, 124.0]);
}

#[test]
fn sum_explicit_all_axes_drops_to_one() {
    let a = Tensor::ones([2, 2], DType::F64, Device::Cpu).unwrap();
    let s = a.sum(&[0, 1], false).unwrap();
    assert_eq!(s.dims(), &[1]);
    assert_eq!(s.to_flat_vec::<f64>().unwrap(), vec![4.0]);
}

#[test]
fn sum_over_transposed_view() {
    let a = f32s(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]);
    let t = a.transpose(&[]).unwrap(); // [3, 2]
    // Summing the view's axis 0 equals summing the base's axis 1.
    let s = t.sum(&[0], false).unwrap();
    assert_eq!(s.dims(), &[2]);
    assert_eq!(s.to_flat_vec::<f32>().unwrap(), vec![6.0, 15.0]);
}

#[test]
fn sum_validates_axes() {
    let a = Tensor::ones([2, 3], DType::F32, Device::Cpu).unwrap();
    assert!(matches!(
        a.sum(&[2], false),
        Err(Error::InvalidAxis { .. })
    ));
    assert!(matches!(
        a.sum(&[0, 0], false),
        Err(Error::Degenerate { .. })
    ));
    let b = Tensor::full([2], 1.0, DType::Bool, Device::Cpu).unwrap();
    assert!(matches!(
        b.sum(&[], false),
        Err(Error::UnsupportedDType { .. })
    ));
}

#[test]
fn mean_basic() {
    let a = Tensor::ones([2, 3], DType::F32, Device::Cpu).unwrap();
    let m = a.mean(&[], false).unwrap();
    assert_eq!(m.to_flat_vec::<f32>().unwrap(), vec![1.0]);

    let b = f32s(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]);
    let rows = b.mean(&[1], false).unwrap();
    assert_eq!(rows.to_flat_vec::<f32>().unwrap(), vec![2.0, 5.0]);
}

#[test]
fn mean_rejects_integers_and_empty() {
    let a = Tensor::ones([3], DType::I32, Device::Cpu).unwrap();
    assert!(matches!(
        a.mean(&[], false),
        Err(Error::UnsupportedDType { .. })
    ));
    let e = Tensor::zeros([0], DType::F32, Device::Cpu).unwrap();
    assert!(matches!(e.mean(&[], false), Err(Error::Degenerate { .. })));
}

#[test]
fn max_min() {
    let a = f32s(vec![3.0, -1.0, 7.0, 2.0], &[4]);
    assert_eq!(
        a.max(&[], false).unwrap().to_flat_vec::<f32>().unwrap(),
        vec![7.0]
    );
    assert_eq!(
        a.min(&[], false).unwrap().to_flat_vec::<f32>().unwrap(),
        vec![-1.0]
    );

    let b = f32s(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]);
    assert_eq!(
        b.max(&[0], false).unwrap().to_flat_vec::<f32>().unwrap(),
        vec![4.0, 5.0, 6.0]
    );
    assert_eq!(
        b.min(&[1], false).unwrap().to_flat_vec::<f32>().unwrap(),
        vec![1.0, 4.0]
    );

    let neg = Tensor::from_vec(vec![-5i32, -2, -9], [3], Device::Cpu).unwrap();
    assert_eq!(
        neg.max(&[], false).unwrap().to_flat_vec::<i32>().unwrap(),
        vec![-2]
    );
}

#[test]
fn max_min_reject_empty() {
    let e = Tensor::zeros([0], DType::F32, Device::Cpu).unwrap();
    assert!(matches!(e.max(&[], false), Err(Error::Degenerate { .. })));
    assert!(matches!(e.min(&[], false), Err(Error::Degenerate { .. })));
}

#[test]
fn argmax_argmin() {
    let a = f32s(vec![1.0, 5.0, 3.0, 9.0, 2.0], &[5]);
    let amax = a.argmax().unwrap();
    assert_eq!(amax.dtype(), DType::I64);
    assert_eq!(amax.dims(), &[1]);
    assert_eq!(amax.to_flat_vec::<i64>().unwrap(), vec![3]);
    assert_eq!(a.argmin().unwrap().to_flat_vec::<i64>().unwrap(), vec![0]);
}

#[test]
fn argmax_ties_keep_first() {
    let a = f32s(vec![2.0, 9.0, 9.0, 1.0], &[4]);
    assert_eq!(a.argmax().unwrap().to_flat_vec::<i64>().unwrap(), vec![1]);
}

#[test]
fn argmax_uses_logical_order_on_views() {
    // Buffer [[1, 9], [4, 2]]; the transpose reads 1, 4, 9, 2, so the
    // maximum sits at logical position 2.
    let a = f32s(vec![1.0, 9.0, 4.0, 2.0], &[2, 2]);
    let t = a.transpose(&[]).unwrap();
    assert_eq!(t.argmax().unwrap().to_flat_vec::<i64>().unwrap(), vec![2]);
}

#[test]
fn argmax_rejects_empty() {
    let e = Tensor::zeros([0], DType::F32, Device::Cpu).unwrap();
    assert!(matches!(e.argmax(), Err(Error::Degenerate { .. })));
}
