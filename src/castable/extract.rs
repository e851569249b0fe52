use crate::castable::assignment::Assignment;
use crate::castable::backend::Model;
use crate::castable::encode::VariableLayout;
use crate::castable::error::CastError;
use crate::castable::matrix::CompatibilityMatrix;
use crate::log::targets::EXTRACTION as LOG_EXTRACTION;

/// Recover the position -> source mapping from a model of the encoding.
///
/// When several sources are true for one position the lowest index wins. A
/// model that names an unknown variable, an incompatible pair, a source at two
/// positions, or leaves a position unpaid did not come from a correct solve of
/// the encoding and is reported as a solver failure.
pub fn extract_assignment(
    model: &Model,
    layout: &VariableLayout,
    matrix: &CompatibilityMatrix,
) -> Result<Assignment, CastError> {
    let mut slots: Vec<Option<usize>> = vec![None; layout.positions()];
    let mut committed: Vec<Option<usize>> = vec![None; layout.sources()];

    for variable in model.positive() {
        let (source, position) = layout.decode(variable).ok_or_else(|| {
            CastError::SolverFailure(format!("model names unknown variable {}", variable))
        })?;

        if !matrix.get(source, position) {
            return Err(CastError::SolverFailure(format!(
                "model pays position {} with incompatible source {}",
                position, source
            )));
        }

        if let Some(previous) = committed[source] {
            return Err(CastError::SolverFailure(format!(
                "model commits source {} to positions {} and {}",
                source, previous, position
            )));
        }
        committed[source] = Some(position);

        match slots[position] {
            Some(existing) if existing < source => {}
            _ => slots[position] = Some(source),
        }
    }

    let sources = slots
        .into_iter()
        .enumerate()
        .map(|(position, slot)| {
            slot.ok_or_else(|| {
                CastError::SolverFailure(format!("model leaves position {} unpaid", position))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let assignment = Assignment::from_sources(sources);
    log::trace!(target: LOG_EXTRACTION, "Extracted {}", assignment);
    Ok(assignment)
}
