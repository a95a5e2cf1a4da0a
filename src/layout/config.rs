//! Search tolerances for the layout pass.
//!
//! The placement searches converge against these named constants. The
//! radial and circular fixtures are sensitive to the exact convergence
//! behavior, so treat changes here as behavior changes, not tuning.

/// Convergence bound for the radial/circular bisections, measured as the
/// movement of the candidate center between iterations. Measuring movement
/// rather than the raw search parameter keeps convergence meaningful when
/// the rotation center is astronomically far away (the parameter interval
/// then maps to huge distances).
pub const SEARCH_TOLERANCE: f64 = 1e-9;

/// Step size for the linear overlap-avoidance walk.
pub const LINEAR_SEARCH_STEP: f64 = 0.1;

/// Tolerance for touching-edge equalities (e.g. `target.miny ==
/// reference.maxy + padding` after a downward placement).
pub const EDGE_TOLERANCE: f64 = 1e-6;

/// Hard cap on bisection iterations. Bisection halves the interval each
/// step, so this is generous even for the degenerate far-center cases.
pub const SEARCH_MAX_ITERATIONS: usize = 256;

/// Upper bound of the outer radial scale search; the inner search mirrors
/// it as a lower bound.
pub const RADIAL_SCALE_BOUND: f64 = 1e9;
