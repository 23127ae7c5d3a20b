//! Bundling for modular GraphQL SDL.
//!
//! Schema authors split a schema across files and declare dependencies
//! between them with comment-form import directives:
//!
//! ```graphql
//! # import Post, Comment from "posts.graphql"
//! # import * from "shared.graphql"
//! ```
//!
//! [`import_schema`] resolves those imports transitively, keeps from each
//! file only what was asked for, merges the root operation types
//! (`Query`, `Mutation`, `Subscription`) field-wise across files, and
//! prints a single self-contained schema: every type referenced by a
//! surviving definition is present, and nothing unrelated leaks through.
//!
//! Sources are `.graphql` files resolved relative to their importer, or
//! logical names served from an in-memory map:
//!
//! ```
//! use indexmap::IndexMap;
//!
//! let sources: IndexMap<String, String> = IndexMap::from([
//!     (
//!         "root".to_owned(),
//!         "# import B from \"b\"\ntype A { b: B }".to_owned(),
//!     ),
//!     ("b".to_owned(), "type B { id: ID! }".to_owned()),
//! ]);
//! let bundled = graphql_import::import_schema_with_sources("root", &sources).unwrap();
//! assert!(bundled.contains("type B"));
//! ```

mod closure;
mod collect;
mod error;
mod imports;
mod merge;
mod resolve;

use indexmap::IndexMap;
use tracing::instrument;

pub use crate::error::ImportError;
pub use crate::imports::parse_import_line;
pub use crate::imports::scan_imports;
pub use crate::imports::ImportStatement;

/// Bundles a schema into a single self-contained document and returns
/// the printed SDL.
///
/// `schema` is a path to a `.graphql` file, or literal SDL. Imports of
/// logical (non-path) names fail without a source map; use
/// [`import_schema_with_sources`] to supply one.
#[instrument(skip_all)]
pub fn import_schema(schema: &str) -> Result<String, ImportError> {
    bundle(schema, &IndexMap::new())
}

/// Like [`import_schema`], with an in-memory map serving logical source
/// names. `schema` may itself be one of the map's keys.
#[instrument(skip_all)]
pub fn import_schema_with_sources(
    schema: &str,
    sources: &IndexMap<String, String>,
) -> Result<String, ImportError> {
    bundle(schema, sources)
}

fn bundle(schema: &str, sources: &IndexMap<String, String>) -> Result<String, ImportError> {
    let root = resolve::read_root(schema, sources)?;
    let mut document = collect::parse_document(&root.sdl, &root.key)?;

    let collected = collect::collect_definitions(&root.sdl, &root.key, sources)?;
    tracing::debug!(
        sources = collected.all_definitions.len(),
        "collected definitions"
    );

    let seed = merge::merge_root_types(&collected.type_definitions);
    let work_list = merge::initial_work_list(&collected.type_definitions, &seed);
    let all_definitions: Vec<_> = collected.all_definitions.into_iter().flatten().collect();

    let pool = closure::complete_definition_pool(&all_definitions, seed, work_list)?;
    tracing::debug!(definitions = pool.len(), "definition pool closed");

    document.definitions = pool;
    Ok(document.to_string())
}
