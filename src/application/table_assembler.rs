// Table assembler - Binds requested names to positional response values
use crate::domain::reading::{CurrentReading, CurrentSection, DecodedResponse, HourlySection};
use crate::domain::table::{AssembledTable, AssemblyError, TimeAxis};
use crate::domain::variables::VariableRequest;

/// Bind each requested name to its scalar in the current section.
/// Missing-data sentinels pass through unchanged.
pub fn assemble_current(
    names: &VariableRequest,
    section: &CurrentSection,
) -> Result<CurrentReading, AssemblyError> {
    if names.len() != section.len() {
        return Err(AssemblyError::VariableCountMismatch {
            section: "current",
            names: names.len(),
            values: section.len(),
        });
    }

    let values = names
        .iter()
        .zip((0..section.len()).filter_map(|i| section.value_at(i)))
        .map(|(name, value)| (name.to_string(), value))
        .collect();

    Ok(CurrentReading::new(section.time(), values))
}

/// Build the hourly table: "date" expanded from the section's own axis,
/// then one column per requested name in request order.
pub fn assemble_hourly(
    names: &VariableRequest,
    section: &HourlySection,
) -> Result<AssembledTable, AssemblyError> {
    if names.len() != section.len() {
        return Err(AssemblyError::VariableCountMismatch {
            section: "hourly",
            names: names.len(),
            values: section.len(),
        });
    }

    let axis = TimeAxis::new(section.time(), section.time_end(), section.interval());
    let expected = axis.len()?;
    let columns: Vec<(&str, &[f64])> = names
        .iter()
        .zip((0..section.len()).filter_map(|i| section.array_at(i)))
        .collect();

    // Check every column before expanding the axis
    for (name, array) in &columns {
        if array.len() != expected {
            return Err(AssemblyError::LengthMismatch {
                column: name.to_string(),
                expected,
                actual: array.len(),
            });
        }
    }

    let mut table = AssembledTable::new(&axis.timestamps()?)?;
    for (name, array) in columns {
        table.push_column(name, array.to_vec())?;
    }

    Ok(table)
}

/// Assemble both sections of a response. A section may only be absent when
/// nothing was requested from it.
pub fn assemble_response(
    response: &DecodedResponse,
    current_names: &VariableRequest,
    hourly_names: &VariableRequest,
) -> Result<(Option<CurrentReading>, Option<AssembledTable>), AssemblyError> {
    let current = match &response.current {
        Some(section) => Some(assemble_current(current_names, section)?),
        None if current_names.is_empty() => None,
        None => return Err(AssemblyError::MissingSection("current")),
    };

    let hourly = match &response.hourly {
        Some(section) => Some(assemble_hourly(hourly_names, section)?),
        None if hourly_names.is_empty() => None,
        None => return Err(AssemblyError::MissingSection("hourly")),
    };

    Ok((current, hourly))
}
