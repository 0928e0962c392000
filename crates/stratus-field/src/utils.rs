//! Comparison and reduction helpers over field contents.
//!
//! All helpers read the host space and visit logical elements only;
//! padding is ignored. They are meant for verification, not kernels.

use stratus_core::FieldScalar;

use crate::error::FieldError;
use crate::field::Field;
use crate::index::LogicalOffsets;
use crate::space::MemSpaceKind;
use crate::storage::{with_scalar_type, Busy};

fn check_comparable(a: &Field, b: &Field) -> Result<(), FieldError> {
    if a.layout().extents() != b.layout().extents() {
        return Err(FieldError::LayoutMismatch {
            left: a.layout().to_string(),
            right: b.layout().to_string(),
        });
    }
    if a.data_type() != b.data_type() {
        return Err(FieldError::TypeMismatch {
            field: b.name().to_string(),
            requested: a.data_type(),
            stored: b.data_type(),
        });
    }
    Ok(())
}

/// Walk the logical elements of `a` and `b` pairwise; stop at the first
/// pair for which `same` is false.
fn all_pairs<T: FieldScalar>(
    a: &Field,
    b: &Field,
    same: impl Fn(T, T) -> bool,
) -> Result<bool, FieldError> {
    let busy = |f: &Field| FieldError::ViewBusy {
        field: f.name().to_string(),
    };
    let (pa, _) = a.padded_geometry()?;
    let (pb, _) = b.padded_geometry()?;
    let (Some(sa), Some(sb)) = (
        a.storage(MemSpaceKind::Host)?.downcast::<T>(),
        b.storage(MemSpaceKind::Host)?.downcast::<T>(),
    ) else {
        return Err(FieldError::TypeMismatch {
            field: a.name().to_string(),
            requested: T::DATA_TYPE,
            stored: a.data_type(),
        });
    };
    let da = sa.try_read().map_err(|Busy| busy(a))?;
    let db = sb.try_read().map_err(|Busy| busy(b))?;
    let extents = a.layout().extents();
    Ok(LogicalOffsets::new(extents, &pa)
        .zip(LogicalOffsets::new(extents, &pb))
        .all(|(i, j)| same(da[i], db[j])))
}

/// Whether two fields hold bitwise-equal logical contents.
///
/// The fields must have the same extents and element type; pack sizes
/// may differ.
pub fn views_are_equal(a: &Field, b: &Field) -> Result<bool, FieldError> {
    check_comparable(a, b)?;
    with_scalar_type!(a.data_type(), T => all_pairs::<T>(a, b, |x, y| x == y))
}

/// Whether two fields agree element-wise within relative tolerance `tol`.
///
/// Elements `x` and `y` agree when `|x - y| <= tol * max(|x|, |y|, 1)`.
pub fn views_are_approx_equal(a: &Field, b: &Field, tol: f64) -> Result<bool, FieldError> {
    check_comparable(a, b)?;
    with_scalar_type!(a.data_type(), T => all_pairs::<T>(a, b, |x, y| {
        let (x, y) = (x.to_f64(), y.to_f64());
        (x - y).abs() <= tol * x.abs().max(y.abs()).max(1.0)
    }))
}

fn fold_logical<T: FieldScalar, A>(
    f: &Field,
    init: A,
    op: impl Fn(A, T) -> A,
) -> Result<A, FieldError> {
    if T::DATA_TYPE != f.data_type() {
        return Err(FieldError::TypeMismatch {
            field: f.name().to_string(),
            requested: T::DATA_TYPE,
            stored: f.data_type(),
        });
    }
    let (padded, _) = f.padded_geometry()?;
    let Some(storage) = f.storage(MemSpaceKind::Host)?.downcast::<T>() else {
        return Err(FieldError::TypeMismatch {
            field: f.name().to_string(),
            requested: T::DATA_TYPE,
            stored: f.data_type(),
        });
    };
    let data = storage.try_read().map_err(|Busy| FieldError::ViewBusy {
        field: f.name().to_string(),
    })?;
    Ok(LogicalOffsets::new(f.layout().extents(), &padded).fold(init, |acc, i| op(acc, data[i])))
}

/// Smallest logical element, or `None` for an empty field.
pub fn field_min<T: FieldScalar>(f: &Field) -> Result<Option<T>, FieldError> {
    fold_logical::<T, Option<T>>(f, None, |acc, x| match acc {
        Some(m) if m <= x => Some(m),
        _ => Some(x),
    })
}

/// Largest logical element, or `None` for an empty field.
pub fn field_max<T: FieldScalar>(f: &Field) -> Result<Option<T>, FieldError> {
    fold_logical::<T, Option<T>>(f, None, |acc, x| match acc {
        Some(m) if m >= x => Some(m),
        _ => Some(x),
    })
}

/// Sum of the logical elements, accumulated in `f64`.
pub fn field_sum(f: &Field) -> Result<f64, FieldError> {
    with_scalar_type!(f.data_type(), T => fold_logical::<T, f64>(f, 0.0, |acc, x| acc + x.to_f64()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::space::{Host, MemoryModel};
    use stratus_core::{DataType, FieldIdentifier, FieldTag, Layout, Units};

    fn field(name: &str, ncols: usize, nlevs: usize, pack: usize) -> Field {
        let layout = Layout::new(&[FieldTag::Column, FieldTag::Level], &[ncols, nlevs]).unwrap();
        let f = Field::new(FieldIdentifier::new(name, layout, Units::pascal(), "physics"));
        f.request_allocation(pack).unwrap();
        f.allocate_view().unwrap();
        f
    }

    fn fill_ramp(f: &Field) {
        let mut v = f.get_view_mut::<f64, 2, Host>().unwrap();
        let [nc, nl] = v.extents();
        for i in 0..nc {
            for k in 0..nl {
                v[[i, k]] = (i * nl + k) as f64 - 3.0;
            }
        }
    }

    #[test]
    fn padding_does_not_affect_equality() {
        let a = field("p", 2, 5, 4);
        let b = field("p", 2, 5, 1);
        fill_ramp(&a);
        fill_ramp(&b);
        a.get_view_mut::<f64, 2, Host>().unwrap().as_mut_slice()[7] = 99.0;
        assert!(views_are_equal(&a, &b).unwrap());
    }

    #[test]
    fn single_difference_detected() {
        let a = field("p", 2, 5, 4);
        let b = field("p", 2, 5, 4);
        fill_ramp(&a);
        fill_ramp(&b);
        b.get_view_mut::<f64, 2, Host>().unwrap()[[1, 4]] += 1e-3;
        assert!(!views_are_equal(&a, &b).unwrap());
        assert!(views_are_approx_equal(&a, &b, 1e-2).unwrap());
        assert!(!views_are_approx_equal(&a, &b, 1e-6).unwrap());
    }

    #[test]
    fn shape_mismatch_is_an_error() {
        let a = field("p", 2, 5, 4);
        let b = field("p", 5, 2, 4);
        assert!(matches!(
            views_are_equal(&a, &b),
            Err(FieldError::LayoutMismatch { .. })
        ));
    }

    #[test]
    fn type_mismatch_is_an_error() {
        let a = field("p", 1, 3, 1);
        let layout = a.layout().clone();
        let b = Field::with_options(
            FieldIdentifier::new("p", layout, Units::pascal(), "physics"),
            DataType::Float,
            MemoryModel::Unified,
        );
        b.request_allocation(1).unwrap();
        b.allocate_view().unwrap();
        assert!(matches!(
            views_are_equal(&a, &b),
            Err(FieldError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn reductions_skip_padding() {
        let f = field("p", 2, 5, 4);
        f.deep_copy::<f64, Host>(-100.0).unwrap();
        fill_ramp(&f);
        assert_eq!(field_min::<f64>(&f).unwrap(), Some(-3.0));
        assert_eq!(field_max::<f64>(&f).unwrap(), Some(6.0));
        assert_eq!(field_sum(&f).unwrap(), (0..10).map(|x| x as f64 - 3.0).sum::<f64>());
        assert!(matches!(
            field_min::<i32>(&f),
            Err(FieldError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn empty_field_has_no_extrema() {
        let f = field("p", 0, 5, 4);
        assert_eq!(field_max::<f64>(&f).unwrap(), None);
        assert_eq!(field_sum(&f).unwrap(), 0.0);
    }
}
