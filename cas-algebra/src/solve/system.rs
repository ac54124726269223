//! Systems of equations.

use crate::cancel::check_cancelled;
use crate::matrix::Matrix;
use crate::symbolic::expr::{Entity, Node};
use crate::symbolic::simplify::simplify;
use cas_error::Error;
use std::collections::BTreeMap;
use tracing::debug;
use super::{normalize, solve_equation};

/// The outcome of solving a system of equations.
#[derive(Debug, Clone, PartialEq)]
pub enum SystemSolution {
    /// The solutions, one row per solution and one column per variable, in the order the
    /// variables were requested.
    Solved(Matrix),

    /// The system was solved, and it has no solution.
    Empty,

    /// No equation could be solved for any of the remaining variables.
    NotFound,
}

impl SystemSolution {
    /// Returns the table of solutions, if any were found.
    pub fn matrix(&self) -> Option<&Matrix> {
        match self {
            Self::Solved(matrix) => Some(matrix),
            _ => None,
        }
    }
}

/// One solution: a value for every solved variable.
type Row = BTreeMap<String, Entity>;

/// Returns `true` if the expression is a number that is not zero, making `expr = 0` false.
fn contradicts(expr: &Entity) -> bool {
    expr.as_number().is_some_and(|n| !n.is_effectively_zero())
}

/// Solves the equations for the variables, one equation and one variable at a time.
///
/// Returns [`None`] if the system could not be solved.
fn solve_rows(equations: &[Entity], variables: &[String]) -> Result<Option<Vec<Row>>, Error> {
    check_cancelled()?;
    if equations.iter().any(contradicts) {
        return Ok(Some(Vec::new()));
    }
    let equations = equations.iter().filter(|eq| !eq.is_zero()).cloned().collect::<Vec<_>>();
    if variables.is_empty() {
        return Ok(Some(vec![Row::new()]));
    }

    for (index, equation) in equations.iter().enumerate() {
        for var in variables.iter().filter(|var| equation.contains_variable(var)) {
            let set = solve_equation(equation, var)?;
            let Node::FiniteSet(roots) = set.node() else {
                continue;
            };
            if roots.is_empty() {
                continue;
            }
            debug!(equation = %equation, var = %var, roots = roots.len(), "eliminating variable");

            let remaining = variables.iter().filter(|v| *v != var).cloned().collect::<Vec<_>>();
            if let Some(rows) = substitute_roots(&equations, index, var, roots, &remaining)? {
                return Ok(Some(rows));
            }
        }
    }

    Ok(None)
}

/// Substitutes every root of `var` into the other equations and solves them for the remaining
/// variables. Returns [`None`] if any branch cannot be solved.
fn substitute_roots(
    equations: &[Entity],
    solved: usize,
    var: &str,
    roots: &[Entity],
    remaining: &[String],
) -> Result<Option<Vec<Row>>, Error> {
    let mut rows = Vec::new();
    for root in roots {
        let others = equations.iter()
            .enumerate()
            .filter(|(index, _)| *index != solved)
            .map(|(_, eq)| simplify(&eq.substitute(var, root)))
            .collect::<Result<Vec<_>, _>>()?;

        let Some(branch) = solve_rows(&others, remaining)? else {
            return Ok(None);
        };
        for mut row in branch {
            // the root may depend on variables solved further down
            let value = row.iter().fold(root.clone(), |value, (name, solution)| value.substitute(name, solution));
            row.insert(var.to_string(), simplify(&value)?);
            rows.push(row);
        }
    }
    Ok(Some(rows))
}

/// Solves a system of equations for the given variables.
///
/// Each equation is either an [`Entity::equation`] or an expression that must be zero. The
/// variables not listed are treated as constants.
pub fn solve(equations: &[Entity], variables: &[&str]) -> Result<SystemSolution, Error> {
    let equations = equations.iter()
        .map(|eq| simplify(&normalize(eq)))
        .collect::<Result<Vec<_>, _>>()?;
    let variables = variables.iter().map(|var| var.to_string()).collect::<Vec<_>>();

    let Some(rows) = solve_rows(&equations, &variables)? else {
        return Ok(SystemSolution::NotFound);
    };
    if rows.is_empty() {
        return Ok(SystemSolution::Empty);
    }

    let table = rows.into_iter()
        .map(|row| variables.iter()
            .map(|var| row.get(var).cloned().unwrap_or_else(|| Entity::var(var.as_str())))
            .collect())
        .collect();
    Ok(SystemSolution::Solved(Matrix::new(table)?))
}

#[cfg(test)]
mod tests {
    use crate::numeric::Number;
    use crate::symbolic::eval::evaluate_with;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use super::*;

    fn var(name: &str) -> Entity {
        Entity::var(name)
    }

    #[test]
    fn quadratic_system() {
        // a + b = 0, a^2 - b + c = 0
        let (a, b, c) = (var("a"), var("b"), var("c"));
        let equations = [&a + &b, Entity::pow(a.clone(), Entity::integer(2)) - &b + &c];
        let solution = solve(&equations, &["a", "b"]).unwrap();
        let matrix = solution.matrix().unwrap();
        assert_eq!((matrix.rows(), matrix.cols()), (2, 2));

        // with c = -2, b^2 - b - 2 = 0 has the roots 2 and -1
        let vars = HashMap::from([("c".to_string(), Number::integer(-2))]);
        let mut values = matrix.iter_rows()
            .map(|row| {
                let a = evaluate_with(&row[0], &vars).unwrap().to_i64().unwrap();
                let b = evaluate_with(&row[1], &vars).unwrap().to_i64().unwrap();
                (a, b)
            })
            .collect::<Vec<_>>();
        values.sort();
        assert_eq!(values, vec![(-2, 2), (1, -1)]);
    }

    #[test]
    fn linear_system() {
        // x + y = 3, x - y = 1
        let (x, y) = (var("x"), var("y"));
        let equations = [
            Entity::equation(&x + &y, Entity::integer(3)),
            Entity::equation(&x - &y, Entity::integer(1)),
        ];
        let solution = solve(&equations, &["y", "x"]).unwrap();
        assert_eq!(
            solution,
            SystemSolution::Solved(Matrix::new(vec![vec![Entity::integer(1), Entity::integer(2)]]).unwrap()),
        );
    }

    #[test]
    fn inconsistent_and_unsolvable() {
        let x = var("x");
        let equations = [&x - Entity::integer(1), &x - Entity::integer(2)];
        assert_eq!(solve(&equations, &["x"]).unwrap(), SystemSolution::Empty);

        // `x + sin(x) + y` has no root in closed form, and Newton needs every variable bound
        let hard = [&x + Entity::sin(x.clone()) + var("y")];
        assert_eq!(solve(&hard, &["x"]).unwrap(), SystemSolution::NotFound);
    }
}
