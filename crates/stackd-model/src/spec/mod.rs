mod application;
pub use application::Application;

mod constraint;
pub use constraint::{Constraint, ConstraintOperator};
