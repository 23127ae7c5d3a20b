use apollo_compiler::ast::Definition;
use apollo_compiler::ast::Document;
use apollo_compiler::Name;
use indexmap::IndexMap;
use indexmap::IndexSet;

use crate::error::ImportError;
use crate::imports::scan_imports;
use crate::imports::ImportStatement;
use crate::resolve::resolve_import;
use crate::resolve::ResolvedSource;

pub(crate) fn is_root_type(name: &str) -> bool {
    matches!(name, "Query" | "Mutation" | "Subscription")
}

/// True for the definition kinds that can be imported and bundled. Schema
/// definitions, operations, fragments, and extensions are discarded.
pub(crate) fn is_admissible(definition: &Definition) -> bool {
    matches!(
        definition,
        Definition::ScalarTypeDefinition(_)
            | Definition::ObjectTypeDefinition(_)
            | Definition::InterfaceTypeDefinition(_)
            | Definition::EnumTypeDefinition(_)
            | Definition::UnionTypeDefinition(_)
            | Definition::InputObjectTypeDefinition(_)
            | Definition::DirectiveDefinition(_)
    )
}

/// Parses one source into an AST document. A source with no non-comment,
/// non-blank lines is legal and yields an empty document.
pub(crate) fn parse_document(sdl: &str, path: &str) -> Result<Document, ImportError> {
    if is_effectively_empty(sdl) {
        return Ok(Document::new());
    }
    Document::parse(sdl, path).map_err(|rejected| ImportError::AstParse {
        message: rejected.errors.to_string(),
    })
}

fn is_effectively_empty(sdl: &str) -> bool {
    sdl.lines()
        .map(str::trim)
        .all(|line| line.is_empty() || line.starts_with('#'))
}

/// The two parallel per-file accumulators produced by a traversal, in
/// visit order. Entry 0 is always the root file, entered with a wildcard
/// import, so both of its entries hold the root file's full admissible
/// set.
pub(crate) struct Collected {
    pub(crate) all_definitions: Vec<Vec<Definition>>,
    pub(crate) type_definitions: Vec<Vec<Definition>>,
}

/// Depth-first traversal of the import graph starting at the root source.
///
/// Each visited source contributes its full admissible definition list to
/// `all_definitions` and the subset admitted by the incoming import set
/// to `type_definitions`. An import statement is followed at most once
/// per importing source, which both terminates cycles and lets two files
/// pull different subsets from a shared dependency.
pub(crate) fn collect_definitions(
    root_sdl: &str,
    root_key: &str,
    sources: &IndexMap<String, String>,
) -> Result<Collected, ImportError> {
    let mut collector = Collector {
        all_definitions: Vec::new(),
        type_definitions: Vec::new(),
        processed: IndexMap::new(),
        sources,
    };
    let wildcard = vec!["*".to_owned()];
    collector.visit(&wildcard, root_sdl, root_key)?;
    Ok(Collected {
        all_definitions: collector.all_definitions,
        type_definitions: collector.type_definitions,
    })
}

struct Collector<'a> {
    all_definitions: Vec<Vec<Definition>>,
    type_definitions: Vec<Vec<Definition>>,
    /// Statements already followed, keyed by the canonical key of the
    /// importing source. The pair space is finite, which bounds the
    /// recursion.
    processed: IndexMap<String, IndexSet<ImportStatement>>,
    sources: &'a IndexMap<String, String>,
}

impl Collector<'_> {
    fn visit(&mut self, imports: &[String], sdl: &str, key: &str) -> Result<(), ImportError> {
        tracing::debug!(source = %key, "collecting definitions");
        let document = parse_document(sdl, key)?;
        let admissible: Vec<Definition> = document
            .definitions
            .iter()
            .filter(|definition| is_admissible(definition))
            .cloned()
            .collect();
        self.all_definitions.push(admissible.clone());
        let filtered = self.filter_by_imports(imports, &admissible);
        self.type_definitions.push(filtered);

        for statement in scan_imports(sdl)? {
            let newly_followed = self
                .processed
                .entry(key.to_owned())
                .or_default()
                .insert(statement.clone());
            if newly_followed {
                let ResolvedSource {
                    key: target_key,
                    sdl: target_sdl,
                } = resolve_import(key, &statement.from, self.sources)?;
                self.visit(&statement.imports, &target_sdl, &target_key)?;
            }
        }
        Ok(())
    }

    /// Applies an incoming import set to a file's admissible definitions.
    ///
    /// A lone wildcard admits everything for the root file; for a nested
    /// file it admits only object types whose names are already known
    /// from previously visited files (root operation types excluded), so
    /// a nested `import *` re-exports needed types without dragging in
    /// unrelated ones. An explicit list keeps definitions matching any
    /// selector head and restricts field lists for dotted selectors.
    fn filter_by_imports(&self, imports: &[String], definitions: &[Definition]) -> Vec<Definition> {
        if imports.iter().any(|import| import == "*") {
            if imports.len() == 1 && self.all_definitions.len() > 1 {
                let previously_known: IndexSet<&str> = self.all_definitions
                    [..self.all_definitions.len() - 1]
                    .iter()
                    .flatten()
                    .filter_map(Definition::name)
                    .map(Name::as_str)
                    .filter(|name| !is_root_type(name))
                    .collect();
                return definitions
                    .iter()
                    .filter(|definition| {
                        matches!(definition, Definition::ObjectTypeDefinition(_))
                            && definition
                                .name()
                                .is_some_and(|name| previously_known.contains(name.as_str()))
                    })
                    .cloned()
                    .collect();
            }
            return definitions.to_vec();
        }

        let heads: Vec<&str> = imports
            .iter()
            .filter_map(|import| import.split('.').next())
            .collect();
        let mut kept: Vec<Definition> = definitions
            .iter()
            .filter(|definition| {
                definition
                    .name()
                    .is_some_and(|name| heads.contains(&name.as_str()))
            })
            .cloned()
            .collect();

        let mut field_selections: IndexMap<&str, Vec<&str>> = IndexMap::new();
        for import in imports {
            if let Some((head, field)) = import.split_once('.') {
                field_selections.entry(head).or_default().push(field);
            }
        }
        for (type_name, fields) in &field_selections {
            if fields.contains(&"*") {
                continue;
            }
            if let Some(definition) = kept.iter_mut().find(|definition| {
                definition
                    .name()
                    .is_some_and(|name| name.as_str() == *type_name)
            }) {
                restrict_fields(definition, fields);
            }
        }
        kept
    }
}

fn restrict_fields(definition: &mut Definition, fields: &[&str]) {
    match definition {
        Definition::ObjectTypeDefinition(object) => {
            object
                .make_mut()
                .fields
                .retain(|field| fields.contains(&field.name.as_str()));
        }
        Definition::InterfaceTypeDefinition(interface) => {
            interface
                .make_mut()
                .fields
                .retain(|field| fields.contains(&field.name.as_str()));
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sources(entries: &[(&str, &str)]) -> IndexMap<String, String> {
        entries
            .iter()
            .map(|(key, sdl)| (key.to_string(), sdl.to_string()))
            .collect()
    }

    fn names(definitions: &[Definition]) -> Vec<String> {
        definitions
            .iter()
            .filter_map(|definition| definition.name().map(|name| name.to_string()))
            .collect()
    }

    #[test]
    fn root_file_is_collected_in_full() {
        let collected = collect_definitions(
            "type Query { id: ID }\ntype Extra { n: Int }",
            "root",
            &IndexMap::new(),
        )
        .unwrap();
        assert_eq!(names(&collected.all_definitions[0]), ["Query", "Extra"]);
        assert_eq!(names(&collected.type_definitions[0]), ["Query", "Extra"]);
    }

    #[test]
    fn explicit_imports_admit_matching_names_only() {
        let map = sources(&[("b", "type B { x: String }\ntype Unrelated { y: Int }")]);
        let collected =
            collect_definitions("# import B from \"b\"\ntype A { b: B }", "a", &map).unwrap();
        assert_eq!(names(&collected.all_definitions[1]), ["B", "Unrelated"]);
        assert_eq!(names(&collected.type_definitions[1]), ["B"]);
    }

    #[test]
    fn dotted_imports_restrict_field_lists() {
        let map = sources(&[("b", "type Query { posts: [Int] hello: String }")]);
        let collected = collect_definitions(
            "# import Query.posts from \"b\"\ntype Query { local: ID }",
            "a",
            &map,
        )
        .unwrap();
        let Definition::ObjectTypeDefinition(query) = &collected.type_definitions[1][0] else {
            panic!("expected an object type");
        };
        let fields: Vec<&str> = query.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(fields, ["posts"]);
    }

    #[test]
    fn nested_wildcard_admits_only_previously_known_objects() {
        let map = sources(&[
            ("b", "# import * from \"c\"\ntype B { x: String }"),
            ("c", "type B { x: String }\ntype Unrelated { y: Int }"),
        ]);
        let collected =
            collect_definitions("# import B from \"b\"\ntype A { b: B }", "a", &map).unwrap();
        // c is visited third; only its B is already known from a and b.
        assert_eq!(names(&collected.type_definitions[2]), ["B"]);
    }

    #[test]
    fn repeated_statements_are_followed_once() {
        let map = sources(&[("b", "type B { x: String }")]);
        let collected = collect_definitions(
            "# import B from \"b\"\n# import B from \"b\"\ntype A { b: B }",
            "a",
            &map,
        )
        .unwrap();
        assert_eq!(collected.all_definitions.len(), 2);
    }

    #[test]
    fn distinct_statements_to_the_same_source_pull_their_own_subsets() {
        let map = sources(&[("b", "type B { x: String }\ntype C { y: Int }")]);
        let collected = collect_definitions(
            "# import B from \"b\"\n# import C from \"b\"\ntype A { b: B c: C }",
            "a",
            &map,
        )
        .unwrap();
        assert_eq!(names(&collected.type_definitions[1]), ["B"]);
        assert_eq!(names(&collected.type_definitions[2]), ["C"]);
    }

    #[test]
    fn cycles_terminate() {
        let map = sources(&[
            ("a", "# import B from \"b\"\ntype A { b: B }"),
            ("b", "# import A from \"a\"\ntype B { a: A }"),
        ]);
        let collected =
            collect_definitions("# import B from \"b\"\ntype A { b: B }", "a", &map).unwrap();
        assert_eq!(collected.all_definitions.len(), 3);
    }

    #[test]
    fn empty_sources_yield_empty_documents() {
        let map = sources(&[("b", "# only a comment\n\n")]);
        let collected =
            collect_definitions("# import * from \"b\"\ntype A { id: ID }", "a", &map).unwrap();
        assert!(collected.all_definitions[1].is_empty());
    }
}
