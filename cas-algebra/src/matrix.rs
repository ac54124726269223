//! A rectangular container of expressions.
//!
//! The system solver reports its solutions as a [`Matrix`]: one row per independent solution, one
//! column per requested variable.

use crate::error::InvalidOperation;
use crate::symbolic::expr::{Entity, ONE};
use crate::symbolic::simplify::simplify;
use cas_error::Error;
use std::fmt;
use std::ops::Index;

/// A non-empty rectangular matrix of [`Entity`], stored in row-major order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    elements: Vec<Entity>,
}

impl Matrix {
    /// Creates a matrix from its rows.
    ///
    /// Returns [`InvalidOperation`] if there are no rows, no columns, or rows of different lengths.
    pub fn new(rows: Vec<Vec<Entity>>) -> Result<Self, Error> {
        let cols = rows.first().map(Vec::len).unwrap_or(0);
        if cols == 0 {
            return Err(InvalidOperation::new("a matrix must have at least one row and one column").into());
        }
        if let Some((index, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != cols) {
            return Err(InvalidOperation::new(format!(
                "row {} has {} elements, but the first row has {}",
                index, row.len(), cols,
            )).into());
        }

        Ok(Self {
            rows: rows.len(),
            cols,
            elements: rows.into_iter().flatten().collect(),
        })
    }

    /// The number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// The number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns the element at the given position, or [`None`] if it is out of bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<&Entity> {
        (row < self.rows && col < self.cols).then(|| &self.elements[row * self.cols + col])
    }

    /// Returns the given row, or [`None`] if it is out of bounds.
    pub fn row(&self, row: usize) -> Option<&[Entity]> {
        (row < self.rows).then(|| &self.elements[row * self.cols..(row + 1) * self.cols])
    }

    /// Returns an iterator over the rows.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[Entity]> {
        self.elements.chunks(self.cols)
    }

    /// The transpose of the matrix.
    pub fn transpose(&self) -> Matrix {
        let elements = (0..self.cols)
            .flat_map(|col| (0..self.rows).map(move |row| (row, col)))
            .map(|(row, col)| self[(row, col)].clone())
            .collect();
        Matrix { rows: self.cols, cols: self.rows, elements }
    }

    /// The simplified matrix product `self * other`.
    ///
    /// Returns [`InvalidOperation`] if the number of columns of `self` differs from the number of
    /// rows of `other`.
    pub fn multiply(&self, other: &Matrix) -> Result<Matrix, Error> {
        if self.cols != other.rows {
            return Err(InvalidOperation::new(format!(
                "cannot multiply a {}x{} matrix by a {}x{} matrix",
                self.rows, self.cols, other.rows, other.cols,
            )).into());
        }

        let mut elements = Vec::with_capacity(self.rows * other.cols);
        for row in 0..self.rows {
            for col in 0..other.cols {
                let sum = Entity::sum((0..self.cols).map(|k| &self[(row, k)] * &other[(k, col)]));
                elements.push(simplify(&sum)?);
            }
        }
        Ok(Matrix { rows: self.rows, cols: other.cols, elements })
    }

    /// The simplified determinant, by cofactor expansion along the first row.
    ///
    /// Returns [`InvalidOperation`] if the matrix is not square.
    pub fn determinant(&self) -> Result<Entity, Error> {
        if self.rows != self.cols {
            return Err(InvalidOperation::new(format!(
                "the determinant of a {}x{} matrix is undefined",
                self.rows, self.cols,
            )).into());
        }

        let rows = self.iter_rows().map(<[Entity]>::to_vec).collect::<Vec<_>>();
        simplify(&cofactor_expansion(&rows))
    }
}

/// The unsimplified determinant of a square matrix.
fn cofactor_expansion(rows: &[Vec<Entity>]) -> Entity {
    match rows.len() {
        0 => ONE.clone(),
        1 => rows[0][0].clone(),
        n => Entity::sum((0..n).map(|col| {
            let minor = rows[1..].iter()
                .map(|row| row.iter()
                    .enumerate()
                    .filter(|(k, _)| *k != col)
                    .map(|(_, e)| e.clone())
                    .collect())
                .collect::<Vec<_>>();
            let term = &rows[0][col] * &cofactor_expansion(&minor);
            if col % 2 == 0 {
                term
            } else {
                -term
            }
        })),
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = Entity;

    fn index(&self, (row, col): (usize, usize)) -> &Entity {
        assert!(row < self.rows && col < self.cols, "index ({}, {}) out of bounds", row, col);
        &self.elements[row * self.cols + col]
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, row) in self.iter_rows().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "[")?;
            for (j, element) in row.iter().enumerate() {
                if j > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", element)?;
            }
            write!(f, "]")?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn int_matrix(rows: &[&[i64]]) -> Matrix {
        Matrix::new(rows.iter()
            .map(|row| row.iter().map(|n| Entity::integer(*n)).collect())
            .collect())
            .unwrap()
    }

    #[test]
    fn shape_checks() {
        assert!(Matrix::new(vec![]).unwrap_err().is::<InvalidOperation>());
        assert!(Matrix::new(vec![vec![]]).unwrap_err().is::<InvalidOperation>());
        assert!(Matrix::new(vec![vec![ONE.clone()], vec![]]).unwrap_err().is::<InvalidOperation>());

        let m = int_matrix(&[&[1, 2, 3], &[4, 5, 6]]);
        assert_eq!((m.rows(), m.cols()), (2, 3));
        assert_eq!(m.get(1, 2), Some(&Entity::integer(6)));
        assert_eq!(m.get(2, 0), None);
        assert_eq!(m.transpose().row(2), Some(&[Entity::integer(3), Entity::integer(6)][..]));
        assert!(m.determinant().unwrap_err().is::<InvalidOperation>());
        assert!(m.multiply(&m).unwrap_err().is::<InvalidOperation>());
    }

    #[test]
    fn product() {
        let a = int_matrix(&[&[1, 2], &[3, 4]]);
        let b = int_matrix(&[&[0, 1], &[1, 0]]);
        assert_eq!(a.multiply(&b).unwrap(), int_matrix(&[&[2, 1], &[4, 3]]));
    }

    #[test]
    fn determinants() {
        assert_eq!(int_matrix(&[&[1, 2], &[3, 4]]).determinant().unwrap(), Entity::integer(-2));
        assert_eq!(
            int_matrix(&[&[2, 0, 1], &[1, 3, 2], &[1, 1, 2]]).determinant().unwrap(),
            Entity::integer(6),
        );

        let x = Entity::var("x");
        let symbolic = Matrix::new(vec![
            vec![x.clone(), ONE.clone()],
            vec![ONE.clone(), x.clone()],
        ]).unwrap();
        let det = symbolic.determinant().unwrap();
        let vars = std::collections::HashMap::from([("x".to_string(), crate::Number::integer(3))]);
        assert_eq!(crate::symbolic::evaluate_with(&det, &vars).unwrap(), crate::Number::integer(8));
        assert_eq!(symbolic.to_string(), "[[x, 1], [1, x]]");
    }
}
