use crate::common::{DomainError, DomainResult};

use super::types::GenerateRequest;

fn invalid(reason: String) -> DomainError {
    DomainError::Validation { reason }
}

/// Reject malformed or out-of-bounds geometric input before planning.
/// The planner itself is total over everything that passes here.
pub fn validate_request(request: &GenerateRequest) -> DomainResult<()> {
    if !request.wall_width.is_finite() || !request.wall_height.is_finite() || !request.step.is_finite() {
        return Err(invalid("Wall dimensions and step must be finite numbers".to_string()));
    }
    if request.wall_width <= 0.0 || request.wall_height <= 0.0 {
        return Err(invalid("Wall dimensions must be positive".to_string()));
    }
    if request.step <= 0.0 {
        return Err(invalid("Step size must be positive".to_string()));
    }
    if request.step > request.wall_width.min(request.wall_height) {
        return Err(invalid("Step size too large for wall dimensions".to_string()));
    }

    for (i, obs) in request.obstacles.iter().enumerate() {
        if [obs.x, obs.y, obs.width, obs.height].iter().any(|v| !v.is_finite()) {
            return Err(invalid(format!("Obstacle {} has non-finite coordinates", i)));
        }
        if obs.width <= 0.0 || obs.height <= 0.0 {
            return Err(invalid(format!("Obstacle {} has invalid dimensions", i)));
        }
        if obs.x < 0.0
            || obs.y < 0.0
            || obs.x + obs.width > request.wall_width
            || obs.y + obs.height > request.wall_height
        {
            return Err(invalid(format!("Obstacle {} is outside wall boundaries", i)));
        }
    }

    Ok(())
}
