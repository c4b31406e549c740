use crate::types::{ViewFlags, WorkRole};

/// Roles the user may clock in as, in the fixed order mechanic, general,
/// truck, tasco
pub fn roles(flags: &ViewFlags) -> Vec<WorkRole> {
    WorkRole::all()
        .iter()
        .copied()
        .filter(|role| flags.allows(*role))
        .collect()
}
