use std::sync::LazyLock;

use regex::Regex;

use crate::error::ImportError;

/// Matches one import directive with the comment marker already stripped:
/// a `*` wildcard or a comma-separated list of names (bare or dotted with
/// a field name or `*`), followed by a quoted source. The quote pair is
/// enforced by the alternation, so a mixed pair never matches.
static IMPORT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^import\s+(?P<imports>\*|\w+(?:\.(?:\w+|\*))?(?:\s*,\s*\w+(?:\.(?:\w+|\*))?)*)\s+from\s+(?:'(?P<single>[^']*)'|"(?P<double>[^"]*)")\s*;?\s*$"#,
    )
    .expect("import pattern must be valid")
});

/// One parsed import directive.
///
/// `imports` is either the single wildcard sentinel `"*"` or a non-empty
/// list of identifiers; an identifier is a bare type name (`User`) or a
/// dotted field selector on a root type (`Query.posts`, `Query.*`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImportStatement {
    pub imports: Vec<String>,
    pub from: String,
}

/// Parses a single import directive, e.g. `import A, B from "other.graphql"`.
///
/// The input is the logical line with the leading `#` comment marker and
/// surrounding whitespace already removed. Single and double quotes are
/// accepted, as is a trailing `;`.
pub fn parse_import_line(line: &str) -> Result<ImportStatement, ImportError> {
    let malformed = || ImportError::MalformedImport {
        line: line.trim().to_owned(),
    };

    let captures = IMPORT_PATTERN.captures(line.trim()).ok_or_else(malformed)?;
    let from = captures
        .name("single")
        .or_else(|| captures.name("double"))
        .map(|quoted| quoted.as_str())
        .unwrap_or_default();
    if from.is_empty() {
        return Err(malformed());
    }

    let raw = &captures["imports"];
    let imports = if raw == "*" {
        vec!["*".to_owned()]
    } else {
        raw.split(',').map(|name| name.trim().to_owned()).collect()
    };

    Ok(ImportStatement {
        imports,
        from: from.to_owned(),
    })
}

/// Scans raw SDL text for import-directive comment lines and returns the
/// parsed statements in source order.
///
/// A directive is a line whose trimmed form starts with `# import ` or
/// `#import ` (the space after the keyword is required). Other comment
/// lines are ignored; the SDL itself is not parsed. A matching line that
/// fails to parse aborts the scan.
pub fn scan_imports(sdl: &str) -> Result<Vec<ImportStatement>, ImportError> {
    let mut statements = Vec::new();
    for line in sdl.lines() {
        let line = line.trim();
        let rest = if let Some(rest) = line.strip_prefix("# import ") {
            rest
        } else if let Some(rest) = line.strip_prefix("#import ") {
            rest
        } else {
            continue;
        };
        statements.push(parse_import_line(&format!("import {rest}"))?);
    }
    Ok(statements)
}
