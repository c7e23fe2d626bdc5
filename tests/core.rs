use wgdispatch::heuristics::{
    compute_elements_per_thread_for_conv, compute_workgroup_size_for_conv, conv_dims,
    select_conv_config, select_elements_per_thread_for_conv, select_workgroup_size_for_conv,
    select_workgroup_size_for_matmul,
};
use wgdispatch::*;

#[test]
fn test_tiles_fit_evenly() {
    assert!(tiles_fit_evenly(&[2, 3], &[4, 9]).unwrap());
    assert!(!tiles_fit_evenly(&[2, 4], &[4, 9]).unwrap());
    assert!(matches!(
        tiles_fit_evenly(&[2], &[4, 9]),
        Err(DispatchError::RankMismatch {
            tile_rank: 1,
            shape_rank: 2
        })
    ));
}

#[test]
fn test_dispatch_single_axis() {
    let layout = DispatchLayout::new([0, 1]);

    let count = compute_dispatch(
        &layout,
        &[8, 8],
        WorkgroupSize::new(8, 8, 1),
        ElementsPerThread::default(),
    );
    assert_eq!(count.as_array(), [8, 1, 1]);

    // 64 elements on X, 4 threads per workgroup along X.
    let count = compute_dispatch(
        &layout,
        &[8, 8],
        WorkgroupSize::new(4, 4, 1),
        ElementsPerThread::default(),
    );
    assert_eq!(count.as_array(), [16, 1, 1]);
}

#[test]
fn test_dispatch_two_axes() {
    let layout = DispatchLayout::new([0]).with_y([1]);
    let count = compute_dispatch(
        &layout,
        &[8, 8],
        WorkgroupSize::new(8, 8, 1),
        ElementsPerThread::default(),
    );
    assert_eq!(count.as_array(), [1, 1, 1]);
}

#[test]
fn test_dispatch_with_elements_per_thread() {
    let layout = DispatchLayout::new([0]).with_y([1]).with_z([2]);
    let count = compute_dispatch(
        &layout,
        &[100, 33, 5],
        WorkgroupSize::new(16, 4, 1),
        ElementsPerThread::new(2, 4, 2),
    );
    // ceil(100 / 32), ceil(33 / 16), ceil(5 / 2)
    assert_eq!(count.as_array(), [4, 3, 3]);
}

#[test]
fn test_conv_workgroup_size() {
    assert_eq!(select_workgroup_size_for_conv(4, 10).as_array(), [4, 16, 1]);
    assert_eq!(select_workgroup_size_for_conv(10, 4).as_array(), [16, 4, 1]);
    assert_eq!(select_workgroup_size_for_conv(10, 10).as_array(), [16, 16, 1]);
}

#[test]
fn test_conv_elements_per_thread() {
    assert_eq!(select_elements_per_thread_for_conv(4, 10).as_array(), [1, 2, 1]);
    assert_eq!(select_elements_per_thread_for_conv(10, 4).as_array(), [2, 1, 1]);
    assert_eq!(select_elements_per_thread_for_conv(10, 10).as_array(), [2, 2, 1]);
}

#[test]
fn test_conv_selectors_agree() {
    for dim0 in 0..12 {
        for dim1 in 0..12 {
            let (size, work) = select_conv_config(dim0, dim1);
            assert_eq!(size, select_workgroup_size_for_conv(dim0, dim1));
            assert_eq!(work, select_elements_per_thread_for_conv(dim0, dim1));
        }
    }
}

#[test]
fn test_conv_from_layout() {
    // NHWC output of 1x2x2x64: X packs N*H*W = 4, Y packs C = 64.
    let shape = [1, 2, 2, 64];
    let layout = DispatchLayout::new([0, 1, 2]).with_y([3]);
    assert_eq!(conv_dims(&layout, &shape), (4, 64));
    assert_eq!(compute_workgroup_size_for_conv(&layout, &shape).as_array(), [4, 16, 1]);
    assert_eq!(compute_elements_per_thread_for_conv(&layout, &shape).as_array(), [1, 2, 1]);
}

#[test]
fn test_matmul_workgroup_size() {
    assert_eq!(select_workgroup_size_for_matmul(1, 50, 20).as_array(), [32, 1, 1]);
    assert_eq!(select_workgroup_size_for_matmul(20, 50, 1).as_array(), [1, 32, 1]);
    assert_eq!(select_workgroup_size_for_matmul(20, 50, 20).as_array(), [8, 8, 1]);
}

#[test]
fn test_matmul_ignores_inner_dim() {
    for inner in [0, 1, 7, 4096] {
        assert_eq!(select_workgroup_size_for_matmul(20, inner, 20).as_array(), [8, 8, 1]);
        assert_eq!(select_workgroup_size_for_matmul(1, inner, 20).as_array(), [32, 1, 1]);
    }
}

#[test]
fn test_byte_width() {
    assert_eq!(ElementType::Float32.byte_width(), 4);
    assert_eq!(ElementType::Complex64.byte_width(), 8);
    assert_eq!(byte_width("int32").unwrap(), 4);
    assert!(matches!(
        byte_width("unknown"),
        Err(DispatchError::UnknownElementType(_))
    ));
}

#[test]
fn test_reinterpret_float32_roundtrip() {
    let values = [1.5f32, -0.0, f32::MIN_POSITIVE, f32::INFINITY, 3.25e-7];
    let raw: &[u8] = bytemuck::cast_slice(&values);

    let view = reinterpret_buffer(raw, ElementType::Float32).unwrap();
    assert!(view.is_borrowed());
    let TypedView::Float32(decoded) = view else {
        panic!("expected float32 view");
    };
    let expected: Vec<u32> = values.iter().map(|v| v.to_bits()).collect();
    let actual: Vec<u32> = decoded.iter().map(|v| v.to_bits()).collect();
    assert_eq!(actual, expected);
}

#[test]
fn test_reinterpret_int32_and_string() {
    let values = [3i32, -2, 1000];
    let raw: &[u8] = bytemuck::cast_slice(&values);

    let view = element::reinterpret_buffer_tagged(raw, "int32").unwrap();
    assert_eq!(view, TypedView::Int32(values.to_vec().into()));

    let view = element::reinterpret_buffer_tagged(raw, "string").unwrap();
    assert_eq!(view, TypedView::Uint8(vec![3, 254, 232]));
}

#[test]
fn test_element_type_parse() {
    for ty in [
        ElementType::Float32,
        ElementType::Int32,
        ElementType::Bool,
        ElementType::String,
        ElementType::Complex64,
    ] {
        assert_eq!(ty.to_string().parse::<ElementType>().unwrap(), ty);
    }
    assert!("float64".parse::<ElementType>().is_err());
}
