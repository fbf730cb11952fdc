//! Per-cell fiber orientation vectors.

use crate::error::TensorError;

/// Per-cell unit fiber direction(s).
///
/// One vector per cell for simple anisotropy; three mutually
/// orthogonal eigenvectors (fiber, sheet, sheet-normal) for
/// three-eigenvector anatomies. An all-zero vector encodes isotropic
/// coupling at that cell — the default when no fiber file is supplied.
///
/// Vectors are normalized at construction; zero vectors stay zero so
/// downstream stages can detect undefined orientation.
#[derive(Debug, Clone)]
pub struct OrientationField {
    primary: Vec<[f64; 3]>,
    sheet: Option<Vec<[f64; 3]>>,
    normal: Option<Vec<[f64; 3]>>,
}

/// Normalize in place; zero vectors pass through, non-finite entries error.
fn normalize(
    field: &'static str,
    mut vectors: Vec<[f64; 3]>,
) -> Result<Vec<[f64; 3]>, TensorError> {
    for (cell, v) in vectors.iter_mut().enumerate() {
        if v.iter().any(|c| !c.is_finite()) {
            return Err(TensorError::NonFinite { field, cell });
        }
        let norm = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
        if norm > 0.0 {
            v[0] /= norm;
            v[1] /= norm;
            v[2] /= norm;
        }
    }
    Ok(vectors)
}

impl OrientationField {
    /// An isotropic field: every cell's orientation is the zero vector.
    pub fn isotropic(cells: usize) -> Self {
        Self {
            primary: vec![[0.0; 3]; cells],
            sheet: None,
            normal: None,
        }
    }

    /// Build from per-cell primary fiber vectors.
    pub fn from_primary(primary: Vec<[f64; 3]>) -> Result<Self, TensorError> {
        Ok(Self {
            primary: normalize("orientation", primary)?,
            sheet: None,
            normal: None,
        })
    }

    /// Build a three-eigenvector field (fiber, sheet, sheet-normal).
    ///
    /// All three arrays must have the same length.
    pub fn with_eigenvectors(
        primary: Vec<[f64; 3]>,
        sheet: Vec<[f64; 3]>,
        normal: Vec<[f64; 3]>,
    ) -> Result<Self, TensorError> {
        let cells = primary.len();
        if sheet.len() != cells {
            return Err(TensorError::LengthMismatch {
                field: "sheet orientation",
                expected: cells,
                got: sheet.len(),
            });
        }
        if normal.len() != cells {
            return Err(TensorError::LengthMismatch {
                field: "normal orientation",
                expected: cells,
                got: normal.len(),
            });
        }
        Ok(Self {
            primary: normalize("orientation", primary)?,
            sheet: Some(normalize("sheet orientation", sheet)?),
            normal: Some(normalize("normal orientation", normal)?),
        })
    }

    /// Number of cells covered.
    pub fn len(&self) -> usize {
        self.primary.len()
    }

    /// Whether the field covers zero cells.
    pub fn is_empty(&self) -> bool {
        self.primary.is_empty()
    }

    /// Whether sheet/normal eigenvectors are present.
    pub fn three_eigenvector(&self) -> bool {
        self.sheet.is_some()
    }

    /// The primary (fiber) unit vector at a cell; zero when undefined.
    pub fn primary(&self, cell: usize) -> [f64; 3] {
        self.primary[cell]
    }

    /// The sheet unit vector at a cell, if eigenvectors were supplied.
    pub fn sheet(&self, cell: usize) -> Option<[f64; 3]> {
        self.sheet.as_ref().map(|s| s[cell])
    }

    /// The sheet-normal unit vector at a cell, if supplied.
    pub fn normal(&self, cell: usize) -> Option<[f64; 3]> {
        self.normal.as_ref().map(|s| s[cell])
    }

    /// Whether every supplied vector at this cell is zero (no defined
    /// orientation; couple isotropically).
    pub fn is_undefined(&self, cell: usize) -> bool {
        let zero = |v: [f64; 3]| v == [0.0; 3];
        zero(self.primary[cell])
            && self.sheet(cell).is_none_or(zero)
            && self.normal(cell).is_none_or(zero)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vectors_are_normalized() {
        let f = OrientationField::from_primary(vec![[3.0, 0.0, 4.0]]).unwrap();
        let v = f.primary(0);
        assert!((v[0] - 0.6).abs() < 1e-12);
        assert!((v[2] - 0.8).abs() < 1e-12);
    }

    #[test]
    fn zero_vectors_stay_zero() {
        let f = OrientationField::from_primary(vec![[0.0; 3], [1.0, 0.0, 0.0]]).unwrap();
        assert!(f.is_undefined(0));
        assert!(!f.is_undefined(1));
    }

    #[test]
    fn isotropic_default_is_all_undefined() {
        let f = OrientationField::isotropic(5);
        assert_eq!(f.len(), 5);
        assert!(!f.three_eigenvector());
        assert!((0..5).all(|c| f.is_undefined(c)));
    }

    #[test]
    fn nan_vector_rejected() {
        let err = OrientationField::from_primary(vec![[f64::NAN, 0.0, 0.0]]).unwrap_err();
        assert!(matches!(
            err,
            TensorError::NonFinite {
                field: "orientation",
                cell: 0
            }
        ));
    }

    #[test]
    fn eigenvector_length_mismatch_rejected() {
        let err = OrientationField::with_eigenvectors(
            vec![[1.0, 0.0, 0.0]; 3],
            vec![[0.0, 1.0, 0.0]; 2],
            vec![[0.0, 0.0, 1.0]; 3],
        )
        .unwrap_err();
        assert!(matches!(err, TensorError::LengthMismatch { got: 2, .. }));
    }
}
