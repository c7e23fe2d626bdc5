//! The zero-extent policy is process-wide, so everything touching it lives
//! in one test.

use wgdispatch::dispatch::compute_dispatch_with_configured_policy;
use wgdispatch::policy::{ZeroExtentPolicy, set_zero_extent_policy, zero_extent_policy};
use wgdispatch::{DispatchError, DispatchLayout, ElementsPerThread, WorkgroupSize};

#[test]
fn test_configured_policy() {
    let layout = DispatchLayout::new([0, 1]);
    let run = |shape: &[usize]| {
        compute_dispatch_with_configured_policy(
            &layout,
            shape,
            WorkgroupSize::new(64, 1, 1),
            ElementsPerThread::default(),
        )
    };

    assert_eq!(zero_extent_policy(), ZeroExtentPolicy::LaunchNothing);
    assert!(run(&[0, 3]).unwrap().is_empty());

    set_zero_extent_policy(ZeroExtentPolicy::Reject);
    assert_eq!(zero_extent_policy(), ZeroExtentPolicy::Reject);
    assert!(matches!(run(&[0, 3]), Err(DispatchError::ZeroExtent { .. })));
    assert_eq!(run(&[2, 3]).unwrap().as_array(), [1, 1, 1]);

    set_zero_extent_policy(ZeroExtentPolicy::LaunchNothing);
    assert!(run(&[0, 3]).is_ok());
}
