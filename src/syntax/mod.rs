//! Tree-sitter front end: parsed source files grouped into a project.

pub mod ast;
pub mod outline;
pub mod resolve;

use crate::util;
use anyhow::{Result, anyhow};
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;
use tree_sitter::{Node, Parser, Tree};

const MODULE_EXTENSIONS: &[&str] = &["ts", "tsx", "js", "jsx", "mjs", "cjs", "mts", "cts"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Javascript,
    Typescript,
    Tsx,
}

impl Language {
    pub fn from_path(path: &str) -> Option<Self> {
        let ext = Path::new(path).extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "js" | "jsx" | "mjs" | "cjs" => Some(Language::Javascript),
            "ts" | "mts" | "cts" => Some(Language::Typescript),
            "tsx" => Some(Language::Tsx),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Javascript => "javascript",
            Language::Typescript => "typescript",
            Language::Tsx => "tsx",
        }
    }
}

/// One parser per grammar; not `Sync`, so each worker thread owns its own.
pub struct SourceParser {
    javascript: Parser,
    typescript: Parser,
    tsx: Parser,
}

impl SourceParser {
    pub fn new() -> Result<Self> {
        let mut javascript = Parser::new();
        javascript.set_language(&tree_sitter_javascript::LANGUAGE.into())?;
        let mut typescript = Parser::new();
        typescript.set_language(&tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into())?;
        let mut tsx = Parser::new();
        tsx.set_language(&tree_sitter_typescript::LANGUAGE_TSX.into())?;
        Ok(Self {
            javascript,
            typescript,
            tsx,
        })
    }

    pub fn parse(&mut self, rel_path: &str, source: String) -> Result<SourceFile> {
        let language = Language::from_path(rel_path)
            .ok_or_else(|| anyhow!("unsupported source file {rel_path}"))?;
        let parser = match language {
            Language::Javascript => &mut self.javascript,
            Language::Typescript => &mut self.typescript,
            Language::Tsx => &mut self.tsx,
        };
        let tree = parser
            .parse(&source, None)
            .ok_or_else(|| anyhow!("parser returned no tree for {rel_path}"))?;
        Ok(SourceFile {
            rel_path: rel_path.to_string(),
            language,
            source,
            tree,
        })
    }
}

pub struct SourceFile {
    pub rel_path: String,
    pub language: Language,
    pub source: String,
    tree: Tree,
}

impl SourceFile {
    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    pub fn text(&self, node: Node<'_>) -> &str {
        ast::node_text(node, &self.source)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileId(pub usize);

/// All parsed files of one repository.
pub struct Project {
    pub name: String,
    files: Vec<SourceFile>,
    by_path: HashMap<String, FileId>,
}

impl Project {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            files: Vec::new(),
            by_path: HashMap::new(),
        }
    }

    pub fn add(&mut self, file: SourceFile) -> FileId {
        if let Some(existing) = self.by_path.get(&file.rel_path) {
            let id = *existing;
            self.files[id.0] = file;
            return id;
        }
        let id = FileId(self.files.len());
        self.by_path.insert(file.rel_path.clone(), id);
        self.files.push(file);
        id
    }

    pub fn file(&self, id: FileId) -> &SourceFile {
        &self.files[id.0]
    }

    pub fn file_id(&self, rel_path: &str) -> Option<FileId> {
        self.by_path.get(rel_path).copied()
    }

    pub fn files(&self) -> impl Iterator<Item = (FileId, &SourceFile)> {
        self.files
            .iter()
            .enumerate()
            .map(|(idx, file)| (FileId(idx), file))
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Resolve an import specifier written in `from` to a project file.
    ///
    /// Only relative specifiers (`./x`, `../x`) and root-anchored ones (`/x`) are
    /// project files; bare specifiers are packages and yield `None`.
    pub fn lookup_module(&self, from: FileId, specifier: &str) -> Option<FileId> {
        let target = specifier
            .split(['?', '#'])
            .next()
            .unwrap_or(specifier)
            .trim();
        if target.is_empty() {
            return None;
        }
        let is_relative = target.starts_with("./")
            || target.starts_with("../")
            || target == "."
            || target == "..";
        let base_dir = if target.starts_with('/') {
            String::new()
        } else if is_relative {
            let from_path = &self.file(from).rel_path;
            match from_path.rfind('/') {
                Some(idx) => from_path[..idx].to_string(),
                None => String::new(),
            }
        } else {
            return None;
        };
        let rel = util::join_rel_path(&base_dir, target.trim_start_matches('/'))?;
        if let Some(id) = self.file_id(&rel) {
            return Some(id);
        }
        for ext in MODULE_EXTENSIONS {
            if let Some(id) = self.file_id(&format!("{rel}.{ext}")) {
                return Some(id);
            }
        }
        for ext in MODULE_EXTENSIONS {
            let candidate = if rel.is_empty() {
                format!("index.{ext}")
            } else {
                format!("{rel}/index.{ext}")
            };
            if let Some(id) = self.file_id(&candidate) {
                return Some(id);
            }
        }
        None
    }
}
