use std::io;

/// Errors surfaced while bundling a schema. All of them abort the current
/// top-level invocation; there is no partial output.
///
/// The messages of the `Missing*` variants are stable: they name the
/// unresolved schema element and are matched on by callers.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    /// A comment line started like an import directive but did not match
    /// the directive grammar, named an empty source, or listed no names.
    #[error("cannot parse import expression: {line}")]
    MalformedImport { line: String },

    /// A field or argument names a type that is neither built in nor
    /// declared in any visited source.
    #[error("Field {field}: Couldn't find type {type_name} in any of the schemas.")]
    MissingFieldType { field: String, type_name: String },

    /// An object declares `implements X` and `X` cannot be resolved.
    #[error("Couldn't find interface {name} in any of the schemas.")]
    MissingInterface { name: String },

    /// A union lists a member type that cannot be resolved.
    #[error("Couldn't find type {name} in any of the schemas.")]
    MissingUnionMember { name: String },

    /// A directive application names a directive that is neither built in
    /// nor defined in any visited source.
    #[error("Directive {name}: Couldn't find type {name} in any of the schemas.")]
    MissingDirective { name: String },

    /// A filesystem source could not be read, and the package-style
    /// module lookup did not recover it.
    #[error("could not read schema source `{path}`")]
    SourceRead {
        path: String,
        #[source]
        source: io::Error,
    },

    /// An import named a logical source that the caller-supplied source
    /// map does not contain.
    #[error("no schema found for `{name}`")]
    SchemaNotFound { name: String },

    /// The underlying SDL parser rejected a source document.
    #[error("failed to parse schema document: {message}")]
    AstParse { message: String },
}
