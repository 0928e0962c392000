//! Typed view extraction across every element type, rank and access mode.

use proptest::prelude::*;
use stratus_core::{DataType, FieldIdentifier, FieldScalar, FieldTag, Layout, Units, MAX_RANK};
use stratus_field::{Device, Field, FieldError, Host, MemoryModel, MemorySpace};

const TYPES: [DataType; 3] = [DataType::Int, DataType::Float, DataType::Double];

fn make_field(extents: &[usize], data_type: DataType, pack: usize) -> Field {
    let tags = vec![FieldTag::Component; extents.len()];
    let fid = FieldIdentifier::new(
        "f",
        Layout::new(&tags, extents).unwrap(),
        Units::nondimensional(),
        "physics",
    );
    let f = Field::with_options(fid, data_type, MemoryModel::Unified);
    f.request_allocation(pack).unwrap();
    f.allocate_view().unwrap();
    f
}

/// Outcome of a view request with the view itself already released.
fn outcome<V>(r: Result<V, FieldError>) -> Result<(), FieldError> {
    r.map(drop)
}

fn check<T: FieldScalar, const N: usize, S: MemorySpace>(f: &Field) {
    let type_ok = T::DATA_TYPE == f.data_type();
    let rank_ok = N == f.layout().rank();

    let read = outcome(f.get_view::<T, N, S>());
    let write = outcome(f.get_view_mut::<T, N, S>());

    for (r, mutable) in [(read, false), (write, true)] {
        match r {
            Ok(()) => {
                assert!(type_ok && rank_ok);
                assert!(!(mutable && f.is_read_only()));
            }
            Err(FieldError::TypeMismatch { requested, stored, .. }) => {
                assert!(!type_ok);
                assert_eq!(requested, T::DATA_TYPE);
                assert_eq!(stored, f.data_type());
            }
            Err(FieldError::RankMismatch { requested, stored, .. }) => {
                assert!(type_ok && !rank_ok);
                assert_eq!(requested, N);
                assert_eq!(stored, f.layout().rank());
            }
            Err(FieldError::ReadOnly { .. }) => {
                assert!(mutable && f.is_read_only() && type_ok && rank_ok);
            }
            Err(other) => panic!("unexpected error {other}"),
        }
    }
}

fn check_ranks<T: FieldScalar, S: MemorySpace>(f: &Field) {
    check::<T, 0, S>(f);
    check::<T, 1, S>(f);
    check::<T, 2, S>(f);
    check::<T, 3, S>(f);
    check::<T, 4, S>(f);
    check::<T, 5, S>(f);
    check::<T, 6, S>(f);
}

fn check_everything(f: &Field) {
    check_ranks::<i32, Host>(f);
    check_ranks::<f32, Host>(f);
    check_ranks::<f64, Host>(f);
    check_ranks::<i32, Device>(f);
    check_ranks::<f32, Device>(f);
    check_ranks::<f64, Device>(f);
}

#[test]
fn view_succeeds_only_for_matching_type_and_rank() {
    for rank in 0..=MAX_RANK {
        let extents: Vec<usize> = (0..rank).map(|d| d % 3 + 1).collect();
        for dt in TYPES {
            let f = make_field(&extents, dt, 2);
            check_everything(&f);
            check_everything(&f.get_const());
        }
    }
}

#[test]
fn rank_zero_field_holds_one_value() {
    let f = make_field(&[], DataType::Double, 4);
    f.get_view_mut::<f64, 0, Host>().unwrap()[[]] = 42.0;
    let v = f.get_view::<f64, 0, Host>().unwrap();
    assert_eq!(v[[]], 42.0);
    assert_eq!(v.as_slice().len(), 1);
}

#[test]
fn six_dimensional_indexing() {
    let extents = [2, 1, 3, 2, 1, 5];
    let f = make_field(&extents, DataType::Int, 4);
    {
        let mut v = f.get_view_mut::<i32, 6, Host>().unwrap();
        v[[1, 0, 2, 1, 0, 4]] = 7;
        assert_eq!(v.padded_extents(), [2, 1, 3, 2, 1, 8]);
        assert!(v.get([1, 0, 2, 1, 0, 5]).is_none());
    }
    let v = f.get_view::<i32, 6, Host>().unwrap();
    assert_eq!(v[[1, 0, 2, 1, 0, 4]], 7);
    assert_eq!(v.as_slice().iter().filter(|&&x| x == 7).count(), 1);
}

#[test]
fn packs_align_with_rows() {
    let f = make_field(&[3, 5], DataType::Double, 4);
    let v = f.get_view::<f64, 2, Host>().unwrap();
    assert_eq!(v.rows().len(), 3);
    assert!(v.rows().all(|r| r.len() == 8));
    assert_eq!(v.packs().count(), 6);
    assert!(v.packs().all(|p| p.len() == 4));
    assert_eq!(v.subview(2).map(<[f64]>::len), Some(8));
    assert!(v.subview(3).is_none());
}

proptest! {
    #[test]
    fn random_shapes_obey_view_checks(
        extents in prop::collection::vec(1usize..4, 0..=MAX_RANK),
        dt in prop::sample::select(TYPES.to_vec()),
        pack in 1usize..6,
    ) {
        let f = make_field(&extents, dt, pack);
        check_everything(&f);
    }
}
