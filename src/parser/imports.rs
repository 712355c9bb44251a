//! Component bindings declared in a template file.
//!
//! A capitalized tag is only a component when the file binds that identifier
//! to another file. Two declaration forms are recognised, either on their own
//! or wrapped in a `{{ ... }}` block:
//!
//! ```text
//! {{ const Nav = require('./components/Nav.abell'); }}
//! import Footer from './components/Footer.abell';
//! ```
//!
//! `var`, `let` and `const` are all accepted for the `require` form.

use std::ops::Range;
use std::sync::OnceLock;

use regex::Regex;

/// One binding from identifier to component file specifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    /// Bound identifier, e.g. `Nav`
    pub identifier: String,
    /// Specifier exactly as written, e.g. `./components/Nav.abell`
    pub specifier: String,
    /// Byte span of the whole declaration
    pub span: Range<usize>,
}

/// All bindings declared in one file, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportTable {
    imports: Vec<Import>,
}

fn declaration_regex() -> &'static Regex {
    static DECLARATION: OnceLock<Regex> = OnceLock::new();
    DECLARATION.get_or_init(|| {
        Regex::new(
            r#"(?:\b(?:var|let|const)\s+(?P<req>[A-Za-z_$][\w$]*)\s*=\s*require\(\s*['"](?P<req_path>[^'"]+)['"]\s*\)|\bimport\s+(?P<imp>[A-Za-z_$][\w$]*)\s+from\s+['"](?P<imp_path>[^'"]+)['"])[ \t]*;?"#,
        )
        .expect("import declaration pattern is valid")
    })
}

fn empty_block_regex() -> &'static Regex {
    static EMPTY_BLOCK: OnceLock<Regex> = OnceLock::new();
    EMPTY_BLOCK
        .get_or_init(|| Regex::new(r"\{\{\s*\}\}").expect("empty block pattern is valid"))
}

impl ImportTable {
    /// Collect every binding declared in `text`.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let imports = declaration_regex()
            .captures_iter(text)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let (identifier, specifier) = match (caps.name("req"), caps.name("req_path")) {
                    (Some(id), Some(path)) => (id, path),
                    _ => (caps.name("imp")?, caps.name("imp_path")?),
                };
                Some(Import {
                    identifier: identifier.as_str().to_string(),
                    specifier: specifier.as_str().to_string(),
                    span: whole.range(),
                })
            })
            .collect::<Vec<_>>();

        tracing::trace!("found {} import declaration(s)", imports.len());
        Self {
            imports,
        }
    }

    /// Binding for `identifier`. A later declaration shadows an earlier one.
    #[must_use]
    pub fn get(&self, identifier: &str) -> Option<&Import> {
        self.imports.iter().rev().find(|import| import.identifier == identifier)
    }

    /// Whether `identifier` is bound in this file.
    #[must_use]
    pub fn contains(&self, identifier: &str) -> bool {
        self.get(identifier).is_some()
    }

    /// Bindings in source order.
    pub fn iter(&self) -> impl Iterator<Item = &Import> {
        self.imports.iter()
    }

    /// Number of declarations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.imports.len()
    }

    /// Whether the file declares no bindings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.imports.is_empty()
    }

    /// Remove import declarations from `text`, along with any `{{ }}` block
    /// left empty by the removal, so the rest can go to the render engine.
    #[must_use]
    pub fn strip(text: &str) -> String {
        let without_declarations = declaration_regex().replace_all(text, "");
        empty_block_regex().replace_all(&without_declarations, "").into_owned()
    }
}
