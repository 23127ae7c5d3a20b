use apollo_compiler::ast::Definition;

use crate::collect::is_root_type;

/// Builds the seed definition list for pool completion.
///
/// Root operation types (`Query`, `Mutation`, `Subscription`) from every
/// visited file come first, in visit order, followed by the root file's
/// other admitted definitions. Walking that concatenation, the first
/// definition under each name is kept and the field lists of subsequent
/// same-named definitions are appended onto it, so root types declared
/// across several files merge field-wise.
pub(crate) fn merge_root_types(type_definitions: &[Vec<Definition>]) -> Vec<Definition> {
    let root_types = type_definitions
        .iter()
        .flatten()
        .filter(|definition| named_root_type(definition));
    let root_file_others = type_definitions
        .first()
        .into_iter()
        .flatten()
        .filter(|definition| !named_root_type(definition));

    let mut seed: Vec<Definition> = Vec::new();
    for definition in root_types.chain(root_file_others) {
        let existing = seed.iter_mut().find(|candidate| {
            candidate.name().is_some() && candidate.name() == definition.name()
        });
        match existing {
            Some(existing) => append_fields(existing, definition),
            None => seed.push(definition.clone()),
        }
    }
    seed
}

/// The work list for pool completion: every admitted definition from
/// every file, in visit order, with root-type entries replaced by their
/// merged seed versions. Expansion has to see the merged field lists;
/// the unmerged per-file copies would hide fields contributed by other
/// files from the reference walk.
pub(crate) fn initial_work_list(
    type_definitions: &[Vec<Definition>],
    seed: &[Definition],
) -> Vec<Definition> {
    type_definitions
        .iter()
        .flatten()
        .map(|definition| {
            if named_root_type(definition) {
                seed.iter()
                    .find(|candidate| candidate.name() == definition.name())
                    .cloned()
                    .unwrap_or_else(|| definition.clone())
            } else {
                definition.clone()
            }
        })
        .collect()
}

fn named_root_type(definition: &Definition) -> bool {
    definition
        .name()
        .is_some_and(|name| is_root_type(name.as_str()))
}

fn append_fields(existing: &mut Definition, incoming: &Definition) {
    if let (
        Definition::ObjectTypeDefinition(existing),
        Definition::ObjectTypeDefinition(incoming),
    ) = (existing, incoming)
    {
        existing
            .make_mut()
            .fields
            .extend(incoming.fields.iter().cloned());
    }
}
