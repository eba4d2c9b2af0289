use tensr_core::{DType, Device, Error, Tensor};

fn f32s(data: Vec<f32>, dims: &[usize]) -> Tensor {
    Tensor::from_vec(data, dims, Device::Cpu).unwrap()
}

#[test]
fn add_sub_mul_div() {
    let a = f32s(vec![1.0, 2.0, 3.0, 4.0], &[2, 2]);
    let b = f32s(vec![4.0, 3.0, 2.0, 1.0], &[2, 2]);

    assert_eq!(
        a.add(&b).unwrap().to_flat_vec::<f32>().unwrap(),
        vec![5.0, 5.0, 5.0, 5.0]
    );
    assert_eq!(
        a.sub(&b).unwrap().to_flat_vec::<f32>().unwrap(),
        vec![-3.0, -1.0, 1.0, 3.0]
    );
    assert_eq!(
        a.mul(&b).unwrap().to_flat_vec::<f32>().unwrap(),
        vec![4.0, 6.0, 6.0, 4.0]
    );
    assert_eq!(
        a.div(&b).unwrap().to_flat_vec::<f32>().unwrap(),
        vec![0.25, 2.0 / 3.0, 1.5, 4.0]
    );
}

#[test]
fn integer_arithmetic() {
    let a = Tensor::from_vec(vec![10i64, 20, 30], [3], Device::Cpu).unwrap();
    let b = Tensor::from_vec(vec![3i64, 4, 5], [3], Device::Cpu).unwrap();
    assert_eq!(
        a.div(&b).unwrap().to_flat_vec::<i64>().unwrap(),
        vec![3, 5, 6]
    );
}

#[test]
fn binary_op_rejects_size_mismatch() {
    let a = Tensor::zeros([2, 3], DType::F32, Device::Cpu).unwrap();
    let b = Tensor::zeros([2, 2], DType::F32, Device::Cpu).unwrap();
    assert!(matches!(a.add(&b), Err(Error::ShapeMismatch { .. })));
}

#[test]
fn binary_op_rejects_dtype_mismatch() {
    let a = Tensor::zeros([4], DType::F32, Device::Cpu).unwrap();
    let b = Tensor::zeros([4], DType::F64, Device::Cpu).unwrap();
    assert!(matches!(a.add(&b), Err(Error::DTypeMismatch { .. })));
}

#[test]
fn arithmetic_rejects_bool() {
    let a = Tensor::full([2], 1.0, DType::Bool, Device::Cpu).unwrap();
    let b = Tensor::full([2], 1.0, DType::Bool, Device::Cpu).unwrap();
    assert!(matches!(a.add(&b), Err(Error::UnsupportedDType { .. })));
}

#[test]
fn same_element_count_different_shape_pairs_positionally() {
    // Pairing is positional in logical order; only the counts must agree.
    let a = f32s(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]);
    let b = f32s(vec![1.0, 1.0, 1.0, 1.0, 1.0, 1.0], &[6]);
    let c = a.add(&b).unwrap();
    assert_eq!(c.dims(), &[2, 3]);
    assert_eq!(
        c.to_flat_vec::<f32>().unwrap(),
        vec![2.0, 3.0, 4.0, 5.0, 6.0, 7.0]
    );
}

#[test]
fn ops_walk_strided_views() {
    // [[1, 2, 3], [4, 5, 6]] transposed is [[1, 4], [2, 5], [3, 6]].
    let a = f32s(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]);
    let at = a.transpose(&[]).unwrap();
    let b = f32s(vec![10.0, 40.0, 20.0, 50.0, 30.0, 60.0], &[3, 2]);
    let c = at.add(&b).unwrap();
    assert_eq!(
        c.to_flat_vec::<f32>().unwrap(),
        vec![11.0, 44.0, 22.0, 55.0, 33.0, 66.0]
    );
}

#[test]
fn comparisons_yield_bool() {
    let a = f32s(vec![1.0, 5.0, 3.0], &[3]);
    let b = f32s(vec![2.0, 5.0, 1.0], &[3]);

    let lt = a.less(&b).unwrap();
    assert_eq!(lt.dtype(), DType::Bool);
    assert_eq!(lt.to_flat_vec::<bool>().unwrap(), vec![true, false, false]);

    let eq = a.equal(&b).unwrap();
    assert_eq!(eq.to_flat_vec::<bool>().unwrap(), vec![false, true, false]);

    let ge = a.greater_equal(&b).unwrap();
    assert_eq!(ge.to_flat_vec::<bool>().unwrap(), vec![false, true, true]);
}

#[test]
fn logical_ops() {
    let a = Tensor::from_vec(vec![true, true, false, false], [4], Device::Cpu).unwrap();
    let b = Tensor::from_vec(vec![true, false, true, false], [4], Device::Cpu).unwrap();

    assert_eq!(
        a.logical_and(&b).unwrap().to_flat_vec::<bool>().unwrap(),
        vec![true, false, false, false]
    );
    assert_eq!(
        a.logical_or(&b).unwrap().to_flat_vec::<bool>().unwrap(),
        vec![true, true, true, false]
    );
    assert_eq!(
        a.logical_not().unwrap().to_flat_vec::<bool>().unwrap(),
        vec![false, false, true, true]
    );

    let ints = Tensor::from_vec(vec![1i32, 0], [2], Device::Cpu).unwrap();
    assert!(matches!(
        ints.logical_not(),
        Err(Error::UnsupportedDType { .. })
    ));
}

#[test]
fn unary_float_math() {
    let a = f32s(vec![1.0, 4.0, 9.0], &[3]);
    assert_eq!(
        a.sqrt().unwrap().to_flat_vec::<f32>().unwrap(),
        vec![1.0, 2.0, 3.0]
    );

    let e = f32s(vec![0.0, 1.0], &[2]);
    let exp = e.exp().unwrap().to_flat_vec::<f32>().unwrap();
    assert!((exp[0] - 1.0).abs() < 1e-6);
    assert!((exp[1] - std::f32::consts::E).abs() < 1e-6);

    let logged = exp_then_log(&e);
    for (x, y) in logged.iter().zip([0.0f32, 1.0]) {
        assert!((x - y).abs() < 1e-6);
    }

    let ints = Tensor::ones([2], DType::I32, Device::Cpu).unwrap();
    assert!(matches!(ints.sqrt(), Err(Error::UnsupportedDType { .. })));
}

fn exp_then_log(t: &Tensor) -> Vec<f32> {
    t.exp().unwrap().log().unwrap().to_flat_vec::<f32>().unwrap()
}

#[test]
fn pow_abs_neg() {
    let a = f32s(vec![1.0, 2.0, 3.0], &[3]);
    assert_eq!(
        a.pow(2.0).unwrap().to_flat_vec::<f32>().unwrap(),
        vec![1.0, 4.0, 9.0]
    );

    let b = Tensor::from_vec(vec![-1i32, 2, -3], [3], Device::Cpu).unwrap();
    assert_eq!(b.abs().unwrap().to_flat_vec::<i32>().unwrap(), vec![1, 2, 3]);
    assert_eq!(
        b.neg().unwrap().to_flat_vec::<i32>().unwrap(),
        vec![1, -2, 3]
    );

    let u = Tensor::ones([2], DType::U8, Device::Cpu).unwrap();
    assert!(matches!(u.neg(), Err(Error::UnsupportedDType { .. })));
}

#[test]
fn ops_accept_aliasing_operands() {
    // Both operands are the same tensor, or views of one buffer; the op
    // must complete (a single storage lock) and compute element-wise.
    let a = f32s(vec![1.0, 2.0, 3.0, 4.0], &[2, 2]);
    assert_eq!(
        a.add(&a).unwrap().to_flat_vec::<f32>().unwrap(),
        vec![2.0, 4.0, 6.0, 8.0]
    );
    assert_eq!(
        a.equal(&a).unwrap().to_flat_vec::<bool>().unwrap(),
        vec![true; 4]
    );

    let at = a.transpose(&[]).unwrap();
    assert_eq!(
        a.mul(&at).unwrap().to_flat_vec::<f32>().unwrap(),
        vec![1.0, 6.0, 6.0, 16.0]
    );

    let b = Tensor::from_vec(vec![true, false], [2], Device::Cpu).unwrap();
    assert_eq!(
        b.logical_and(&b).unwrap().to_flat_vec::<bool>().unwrap(),
        vec![true, false]
    );
}

#[test]
fn operands_are_never_mutated() {
    let a = f32s(vec![1.0, 2.0], &[2]);
    let b = f32s(vec![3.0, 4.0], &[2]);
    let c = a.add(&b).unwrap();
    assert!(!c.shares_storage(&a));
    assert_eq!(a.to_flat_vec::<f32>().unwrap(), vec![1.0, 2.0]);
    assert_eq!(b.to_flat_vec::<f32>().unwrap(), vec![3.0, 4.0]);
}

#[test]
fn dot_product() {
    let a = f32s(vec![1.0, 2.0, 3.0], &[3]);
    let b = f32s(vec![4.0, 5.0, 6.0], &[3]);
    let d = a.dot(&b).unwrap();
    assert_eq!(d.dims(), &[1]);
    assert_eq!(d.to_flat_vec::<f32>().unwrap(), vec![32.0]);

    let m = Tensor::zeros([2, 2], DType::F32, Device::Cpu).unwrap();
    assert!(matches!(m.dot(&b), Err(Error::RankMismatch { .. })));

    let short = f32s(vec![1.0], &[1]);
    assert!(matches!(a.dot(&short), Err(Error::ShapeMismatch { .. })));
}

#[test]
fn matmul_known_product() {
    let a = f32s(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]);
    let b = f32s(vec![7.0, 8.0, 9.0, 10.0, 11.0, 12.0], &[3, 2]);
    let c = a.matmul(&b).unwrap();
    assert_eq!(c.dims(), &[2, 2]);
    assert_eq!(
        c.to_flat_vec::<f32>().unwrap(),
        vec![58.0, 64.0, 139.0, 154.0]
    );
}

#[test]
fn matmul_identity() {
    let a = Tensor::from_vec(vec![1.0f64, 2.0, 3.0, 4.0], [2, 2], Device::Cpu).unwrap();
    let i = Tensor::eye(2, DType::F64, Device::Cpu).unwrap();
    let c = a.matmul(&i).unwrap();
    assert_eq!(c.to_flat_vec::<f64>().unwrap(), vec![1.0, 2.0, 3.0, 4.0]);
}

#[test]
fn matmul_transposed_view() {
    let a = f32s(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]);
    let at = a.transpose(&[]).unwrap(); // [3, 2] view
    let c = at.matmul(&a).unwrap();
    assert_eq!(c.dims(), &[3, 3]);
    // A^T A for A = [[1,2,3],[4,5,6]].
    assert_eq!(
        c.to_flat_vec::<f32>().unwrap(),
        vec![17.0, 22.0, 27.0, 22.0, 29.0, 36.0, 27.0, 36.0, 45.0]
    );
}

#[test]
fn matmul_integer() {
    let a = Tensor::from_vec(vec![1i32, 2, 3, 4], [2, 2], Device::Cpu).unwrap();
    let b = Tensor::from_vec(vec![5i32, 6, 7, 8], [2, 2], Device::Cpu).unwrap();
    let c = a.matmul(&b).unwrap();
    assert_eq!(c.to_flat_vec::<i32>().unwrap(), vec![19, 22, 43, 50]);
}

#[test]
fn dot_and_matmul_accept_aliasing_operands() {
    let v = f32s(vec![1.0, 2.0, 3.0], &[3]);
    assert_eq!(v.dot(&v).unwrap().to_flat_vec::<f32>().unwrap(), vec![14.0]);

    let a = f32s(vec![1.0, 2.0, 3.0, 4.0], &[2, 2]);
    let sq = a.matmul(&a).unwrap();
    assert_eq!(sq.to_flat_vec::<f32>().unwrap(), vec![7.0, 10.0, 15.0, 22.0]);
}

#[test]
fn matmul_rejects_bad_inner_dim() {
    let a = Tensor::zeros([2, 3], DType::F32, Device::Cpu).unwrap();
    let b = Tensor::zeros([2, 3], DType::F32, Device::Cpu).unwrap();
    assert!(matches!(a.matmul(&b), Err(Error::ShapeMismatch { .. })));
}

#[test]
fn factorizations_report_unsupported() {
    let a = Tensor::eye(2, DType::F64, Device::Cpu).unwrap();
    assert!(matches!(a.det(), Err(Error::Unsupported(_))));
    assert!(matches!(a.inv(), Err(Error::Unsupported(_))));
    assert!(matches!(a.svd(), Err(Error::Unsupported(_))));
    assert!(matches!(a.fft(), Err(Error::Unsupported(_))));
}
