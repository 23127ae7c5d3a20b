use std::collections::VecDeque;

use apollo_compiler::ast::Definition;
use apollo_compiler::ast::Directive;
use apollo_compiler::ast::DirectiveList;
use apollo_compiler::ast::Type;
use apollo_compiler::Name;
use indexmap::IndexMap;
use indexmap::IndexSet;
use itertools::Itertools;

use crate::error::ImportError;

/// Type names the schema language defines implicitly.
const BUILTIN_TYPES: [&str; 5] = ["String", "Float", "Int", "Boolean", "ID"];

/// Directive names the schema language defines implicitly.
const BUILTIN_DIRECTIVES: [&str; 3] = ["deprecated", "skip", "include"];

fn is_builtin_type(name: &str) -> bool {
    BUILTIN_TYPES.contains(&name)
}

fn is_builtin_directive(name: &str) -> bool {
    BUILTIN_DIRECTIVES.contains(&name)
}

/// Expands `seed` to a fixed point over the type-reference graph.
///
/// `all_definitions` is the authoritative lookup pool (every admissible
/// definition from every visited file); `work_list` holds the
/// definitions whose references still need walking. Each popped
/// definition is expanded by kind: referenced field and argument types,
/// implemented interfaces, union members, and applied directives are
/// resolved by name and appended to both the pool and the work list.
/// Every referenced name must be a built-in or resolvable, otherwise the
/// expansion fails. Interfaces additionally back-fill every object in
/// `all_definitions` that implements them.
///
/// Each name is expanded at most once and the name universe is bounded
/// by `all_definitions`, so the loop terminates on any input, cyclic
/// reference graphs included. The returned pool is deduplicated by name,
/// first occurrence winning.
pub(crate) fn complete_definition_pool(
    all_definitions: &[Definition],
    seed: Vec<Definition>,
    work_list: Vec<Definition>,
) -> Result<Vec<Definition>, ImportError> {
    // Later same-named definitions overwrite earlier ones.
    let schema_map: IndexMap<&str, &Definition> = all_definitions
        .iter()
        .filter_map(|definition| definition.name().map(|name| (name.as_str(), definition)))
        .collect();

    let mut pool = seed;
    let mut pending: VecDeque<Definition> = work_list.into();
    let mut visited: IndexSet<String> = IndexSet::new();

    while let Some(definition) = pending.pop_front() {
        let Some(name) = definition.name() else {
            continue;
        };
        if !visited.insert(name.to_string()) {
            continue;
        }

        let mut expansion = Expansion {
            all_definitions,
            schema_map: &schema_map,
            pool: &pool,
            extensions: Vec::new(),
        };
        expansion.expand(&definition)?;
        let extensions = expansion.extensions;
        pending.extend(extensions.iter().cloned());
        pool.extend(extensions);
    }

    Ok(pool
        .into_iter()
        .unique_by(|definition| definition.name().cloned())
        .collect())
}

/// One expansion step: the references of a single definition. `pool` is
/// the surviving set as of the start of the step; newly resolved
/// definitions land in `extensions` (duplicates are fine, the final
/// name dedup drops them).
struct Expansion<'a> {
    all_definitions: &'a [Definition],
    schema_map: &'a IndexMap<&'a str, &'a Definition>,
    pool: &'a [Definition],
    extensions: Vec<Definition>,
}

impl Expansion<'_> {
    fn expand(&mut self, definition: &Definition) -> Result<(), ImportError> {
        if !matches!(definition, Definition::DirectiveDefinition(_)) {
            for application in definition.directives().iter() {
                self.collect_directive(application)?;
            }
        }

        match definition {
            Definition::InputObjectTypeDefinition(input) => {
                for field in &input.fields {
                    self.collect_node(&field.name, &field.ty, &field.directives)?;
                }
            }
            Definition::InterfaceTypeDefinition(interface) => {
                for field in &interface.fields {
                    self.collect_node(&field.name, &field.ty, &field.directives)?;
                }
                // Objects implementing a surviving interface survive too,
                // whether or not anything imported them by name.
                for candidate in self.all_definitions {
                    if let Definition::ObjectTypeDefinition(object) = candidate {
                        if object
                            .implements_interfaces
                            .iter()
                            .any(|implemented| implemented == &interface.name)
                        {
                            self.extensions.push(candidate.clone());
                        }
                    }
                }
            }
            Definition::UnionTypeDefinition(union_type) => {
                for member in &union_type.members {
                    if !self.in_pool(member.as_str()) {
                        let Some(found) = self.schema_map.get(member.as_str()) else {
                            return Err(ImportError::MissingUnionMember {
                                name: member.to_string(),
                            });
                        };
                        self.extensions.push((*found).clone());
                    }
                }
            }
            Definition::ObjectTypeDefinition(object) => {
                for interface_name in &object.implements_interfaces {
                    if !self.in_pool(interface_name.as_str()) {
                        let Some(found) = self.schema_map.get(interface_name.as_str()) else {
                            return Err(ImportError::MissingInterface {
                                name: interface_name.to_string(),
                            });
                        };
                        self.extensions.push((*found).clone());
                    }
                }
                for field in &object.fields {
                    self.collect_node(&field.name, &field.ty, &field.directives)?;
                    for argument in &field.arguments {
                        self.collect_node(&argument.name, &argument.ty, &argument.directives)?;
                    }
                }
            }
            // Scalars and enums reference nothing beyond their applied
            // directives; directive definitions expand to nothing here
            // (their argument types are chased at application sites).
            _ => {}
        }
        Ok(())
    }

    /// Resolves one typed node (field, argument, or input value):
    /// descends through list and non-null wrappers to the named leaf,
    /// pulls the named definition in if it is neither built in nor
    /// already surviving, then resolves the node's applied directives.
    fn collect_node(
        &mut self,
        owner: &Name,
        ty: &Type,
        directives: &DirectiveList,
    ) -> Result<(), ImportError> {
        let type_name = ty.inner_named_type();
        if !is_builtin_type(type_name.as_str()) && !self.in_pool(type_name.as_str()) {
            let Some(found) = self.schema_map.get(type_name.as_str()) else {
                return Err(ImportError::MissingFieldType {
                    field: owner.to_string(),
                    type_name: type_name.to_string(),
                });
            };
            self.extensions.push((*found).clone());
        }
        for application in directives.iter() {
            self.collect_directive(application)?;
        }
        Ok(())
    }

    fn collect_directive(&mut self, application: &Directive) -> Result<(), ImportError> {
        let directive_name = application.name.as_str();
        if is_builtin_directive(directive_name) || self.in_pool(directive_name) {
            return Ok(());
        }
        let Some(found) = self.schema_map.get(directive_name) else {
            return Err(ImportError::MissingDirective {
                name: directive_name.to_owned(),
            });
        };
        if let Definition::DirectiveDefinition(directive) = found {
            for argument in &directive.arguments {
                self.collect_node(&argument.name, &argument.ty, &argument.directives)?;
            }
        }
        self.extensions.push((*found).clone());
        Ok(())
    }

    fn in_pool(&self, name: &str) -> bool {
        self.pool
            .iter()
            .any(|definition| definition.name().is_some_and(|n| n.as_str() == name))
    }
}
