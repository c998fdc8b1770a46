//! Integration tests for forward-mode automatic differentiation.

use approx::assert_relative_eq;
use nalgebra::DVector;
use numkit::autodiff::forward::{
    create_dual_variable, create_dual_variable_vec, make_jacobian, Dual,
};
use numkit::autodiff::{create_diff_variable_vector, differentiate_vector};

#[test]
fn test_scalar_derivative_of_composed_expression() {
    let value = 0.789;
    let x = create_dual_variable(value);

    // f(x) = sqrt(x^2 + 1) * exp(-x)
    let result = (x.clone() * x.clone() + 1.0).sqrt() * (-x).exp();

    let expected = (value / (value * value + 1.0).sqrt()) * (-value).exp()
        - (value * value + 1.0).sqrt() * (-value).exp();
    assert_relative_eq!(*result.diff(), expected, epsilon = 1e-12);
}

#[test]
fn test_forward_and_backward_jacobians_agree() {
    let values = [1.234, 2.345];

    // Forward mode: one dual variable per input, tangents as unit vectors.
    let x0 = create_dual_variable_vec(values[0], 2, 0);
    let x1 = create_dual_variable_vec(values[1], 2, 1);
    let forward_outputs: DVector<Dual<f64, DVector<f64>>> = DVector::from_vec(vec![
        x0.clone() * x1.clone(),
        x0.clone() / x1.clone(),
    ]);
    let forward_jacobian = make_jacobian(&forward_outputs);

    // Backward mode over the same expressions.
    let x = create_diff_variable_vector(&DVector::from_vec(values.to_vec()));
    let backward_outputs = DVector::from_vec(vec![&x[0] * &x[1], &x[0] / &x[1]]);
    let backward_jacobian = differentiate_vector(&backward_outputs, &x).unwrap();

    assert_eq!(forward_jacobian.shape(), backward_jacobian.shape());
    for i in 0..2 {
        for j in 0..2 {
            assert_relative_eq!(
                forward_jacobian[(i, j)],
                backward_jacobian[(i, j)],
                epsilon = 1e-12
            );
        }
    }
}
