//! Document and workspace symbol listings.

use crate::analysis::results::{Location, Range, SymbolInformation, SymbolKind};
use crate::analysis::service::{JavaLanguageService, ServiceResult};
use crate::facility::trees::{SymbolTree, SymbolTreeKind};
use crate::store::FileStore;

/// Ceiling on workspace-symbol results.
pub(crate) const WORKSPACE_SYMBOL_LIMIT: usize = 50;

impl JavaLanguageService {
    pub fn document_symbols(&mut self, uri: &str) -> ServiceResult<Vec<SymbolInformation>> {
        if !FileStore::is_java_file(uri) {
            return Ok(Vec::new());
        }
        let parse = self.update_parse(uri)?;
        Ok(parse
            .document_symbols()
            .into_iter()
            .map(symbol_information)
            .collect())
    }

    pub fn workspace_symbols(&mut self, query: &str) -> ServiceResult<Vec<SymbolInformation>> {
        let compiler = self.facility()?;
        Ok(compiler
            .find_symbols(query, WORKSPACE_SYMBOL_LIMIT)
            .into_iter()
            .map(symbol_information)
            .collect())
    }
}

fn symbol_information(tree: SymbolTree) -> SymbolInformation {
    SymbolInformation {
        name: tree.name,
        kind: symbol_kind(tree.kind),
        container_name: tree.container,
        location: Location {
            uri: tree.uri,
            range: Range::from_span(tree.span),
        },
    }
}

fn symbol_kind(kind: SymbolTreeKind) -> SymbolKind {
    match kind {
        SymbolTreeKind::AnnotationType | SymbolTreeKind::Class => SymbolKind::Class,
        SymbolTreeKind::Enum => SymbolKind::Enum,
        SymbolTreeKind::Interface => SymbolKind::Interface,
        SymbolTreeKind::Method => SymbolKind::Method,
        SymbolTreeKind::TypeParameter => SymbolKind::TypeParameter,
        // Symbol listings only surface fields, never locals.
        SymbolTreeKind::Variable => SymbolKind::Field,
    }
}
