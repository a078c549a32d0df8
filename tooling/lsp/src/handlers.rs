//! JSON-RPC method dispatch.
//!
//! Each handler parses its params by hand, calls one dispatcher operation,
//! and renders the typed reply into protocol JSON. Protocol positions are
//! 0-based on the wire and stay 0-based across this boundary; the dispatcher
//! owns the conversion to compiler coordinates.

use std::collections::BTreeSet;
use std::path::PathBuf;

use serde_json::{Map, Value, json};
use tracing::warn;

use javelin::analysis::results::{
    CodeLens, Command, CompletionItem, CompletionItemKind, DiagnosticTag, FoldingRangeKind,
    InsertTextFormat, Location, MarkedString, PublishedDiagnostic, Range, Severity,
    SignatureHelpReply, SymbolInformation, SymbolKind, TextEdit,
};
use javelin::analysis::{JavaLanguageService, ServiceError, WatchEventKind};
use javelin::store::{ContentChange, uri_to_path};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerAction {
    Continue,
    Exit,
}

pub fn handle_message(
    service: &mut JavaLanguageService,
    message: Value,
) -> (HandlerAction, Option<Value>) {
    let method = message.get("method").and_then(Value::as_str);
    let id = message.get("id").cloned();
    let params = message.get("params");

    match method {
        Some("initialize") => {
            if let Some(root) = params
                .and_then(|p| p.get("rootUri"))
                .and_then(Value::as_str)
                .and_then(uri_to_path)
            {
                service.initialize(root);
            }
            let response = ok_response(
                id,
                json!({
                    "capabilities": {
                        "textDocumentSync": 2,
                        "hoverProvider": true,
                        "completionProvider": {
                            "resolveProvider": true,
                            "triggerCharacters": ["."]
                        },
                        "signatureHelpProvider": {
                            "triggerCharacters": ["(", ","]
                        },
                        "referencesProvider": true,
                        "definitionProvider": true,
                        "workspaceSymbolProvider": true,
                        "documentSymbolProvider": true,
                        "documentFormattingProvider": true,
                        "codeLensProvider": {
                            "resolveProvider": true
                        },
                        "foldingRangeProvider": true
                    },
                    "serverInfo": {
                        "name": "javelin-lsp",
                        "version": env!("CARGO_PKG_VERSION")
                    }
                }),
            );
            (HandlerAction::Continue, response)
        }
        Some("initialized") => {
            service.initialized();
            (HandlerAction::Continue, None)
        }
        Some("shutdown") => {
            service.shutdown();
            (HandlerAction::Continue, ok_response(id, Value::Null))
        }
        Some("exit") => (HandlerAction::Exit, None),
        Some("workspace/symbol") => {
            let query = params
                .and_then(|p| p.get("query"))
                .and_then(Value::as_str)
                .unwrap_or_default();
            let reply = service.workspace_symbols(query);
            (
                HandlerAction::Continue,
                service_response(id, reply, |symbols| {
                    Value::Array(symbols.iter().map(symbol_json).collect())
                }),
            )
        }
        Some("workspace/didChangeConfiguration") => {
            apply_configuration(service, params);
            (HandlerAction::Continue, None)
        }
        Some("workspace/didChangeWatchedFiles") => {
            let changes = params
                .and_then(|p| p.get("changes"))
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default();
            for change in changes {
                let Some(uri) = change.get("uri").and_then(Value::as_str) else {
                    continue;
                };
                let kind = match change.get("type").and_then(Value::as_u64) {
                    Some(1) => WatchEventKind::Created,
                    Some(2) => WatchEventKind::Changed,
                    Some(3) => WatchEventKind::Deleted,
                    _ => continue,
                };
                service.did_change_watched_file(uri, kind);
            }
            (HandlerAction::Continue, None)
        }
        Some("textDocument/didOpen") => {
            if let Some((uri, version, text)) = parse_did_open(params) {
                service.did_open(&uri, text, version);
            }
            (HandlerAction::Continue, None)
        }
        Some("textDocument/didChange") => {
            if let Some((uri, version, changes)) = parse_did_change(params) {
                service.did_change(&uri, version, changes);
            }
            (HandlerAction::Continue, None)
        }
        Some("textDocument/didClose") => {
            if let Some(uri) = parse_text_document_uri(params) {
                service.did_close(&uri);
            }
            (HandlerAction::Continue, None)
        }
        Some("textDocument/didSave") => {
            if let Some(uri) = parse_text_document_uri(params) {
                if let Err(error) = service.did_save(&uri) {
                    warn!("Lint on save failed: {error}");
                }
            }
            (HandlerAction::Continue, None)
        }
        Some("textDocument/completion") => {
            let Some((uri, line, character)) = parse_position_params(params) else {
                return (HandlerAction::Continue, invalid_params(id));
            };
            let reply = service.completion(&uri, line, character);
            (
                HandlerAction::Continue,
                service_response(id, reply, |maybe| match maybe {
                    Some(list) => json!({
                        "isIncomplete": list.is_incomplete,
                        "items": list.items.iter().map(completion_item_json).collect::<Vec<_>>()
                    }),
                    None => Value::Null,
                }),
            )
        }
        Some("completionItem/resolve") => {
            let item = params.cloned().unwrap_or(Value::Null);
            let resolved = resolve_completion_item(service, item);
            (HandlerAction::Continue, ok_response(id, resolved))
        }
        Some("textDocument/hover") => {
            let Some((uri, line, character)) = parse_position_params(params) else {
                return (HandlerAction::Continue, invalid_params(id));
            };
            let reply = service.hover(&uri, line, character);
            (
                HandlerAction::Continue,
                service_response(id, reply, |maybe| match maybe {
                    Some(contents) => json!({
                        "contents": contents.iter().map(marked_string_json).collect::<Vec<_>>()
                    }),
                    None => Value::Null,
                }),
            )
        }
        Some("textDocument/signatureHelp") => {
            let Some((uri, line, character)) = parse_position_params(params) else {
                return (HandlerAction::Continue, invalid_params(id));
            };
            let reply = service.signature_help(&uri, line, character);
            (
                HandlerAction::Continue,
                service_response(id, reply, |maybe| match maybe {
                    Some(help) => signature_help_json(help),
                    None => Value::Null,
                }),
            )
        }
        Some("textDocument/definition") => {
            let Some((uri, line, character)) = parse_position_params(params) else {
                return (HandlerAction::Continue, invalid_params(id));
            };
            let reply = service.goto_definition(&uri, line, character);
            (
                HandlerAction::Continue,
                service_response(id, reply, locations_json),
            )
        }
        Some("textDocument/references") => {
            let Some((uri, line, character)) = parse_position_params(params) else {
                return (HandlerAction::Continue, invalid_params(id));
            };
            let reply = service.find_references(&uri, line, character);
            (
                HandlerAction::Continue,
                service_response(id, reply, locations_json),
            )
        }
        Some("textDocument/documentSymbol") => {
            let Some(uri) = parse_text_document_uri(params) else {
                return (HandlerAction::Continue, invalid_params(id));
            };
            let reply = service.document_symbols(&uri);
            (
                HandlerAction::Continue,
                service_response(id, reply, |symbols| {
                    Value::Array(symbols.iter().map(symbol_json).collect())
                }),
            )
        }
        Some("textDocument/codeLens") => {
            let Some(uri) = parse_text_document_uri(params) else {
                return (HandlerAction::Continue, invalid_params(id));
            };
            let reply = service.code_lenses(&uri);
            (
                HandlerAction::Continue,
                service_response(id, reply, |lenses| {
                    Value::Array(lenses.iter().map(code_lens_json).collect())
                }),
            )
        }
        Some("codeLens/resolve") => {
            let lens = params.cloned().unwrap_or(Value::Null);
            let resolved = resolve_code_lens_item(service, lens);
            match resolved {
                Ok(value) => (HandlerAction::Continue, ok_response(id, value)),
                Err(error) => (HandlerAction::Continue, internal_error(id, &error)),
            }
        }
        Some("textDocument/formatting") => {
            let Some(uri) = parse_text_document_uri(params) else {
                return (HandlerAction::Continue, invalid_params(id));
            };
            let reply = service.formatting(&uri);
            (
                HandlerAction::Continue,
                service_response(id, reply, |edits| {
                    Value::Array(edits.iter().map(text_edit_json).collect())
                }),
            )
        }
        Some("textDocument/foldingRange") => {
            let Some(uri) = parse_text_document_uri(params) else {
                return (HandlerAction::Continue, invalid_params(id));
            };
            let reply = service.folding_ranges(&uri);
            (
                HandlerAction::Continue,
                service_response(id, reply, |folds| {
                    Value::Array(
                        folds
                            .iter()
                            .map(|f| {
                                json!({
                                    "startLine": f.start_line,
                                    "startCharacter": f.start_character,
                                    "endLine": f.end_line,
                                    "endCharacter": f.end_character,
                                    "kind": folding_kind_str(f.kind)
                                })
                            })
                            .collect(),
                    )
                }),
            )
        }
        Some("textDocument/prepareRename") | Some("textDocument/rename") => {
            let response = id.map(|id| {
                json!({
                    "jsonrpc": "2.0",
                    "id": id,
                    "error": {
                        "code": -32001,
                        "message": "rename is not implemented"
                    }
                })
            });
            (HandlerAction::Continue, response)
        }
        Some(_) => {
            let response = id.map(|id| {
                json!({
                    "jsonrpc": "2.0",
                    "id": id,
                    "error": {
                        "code": -32601,
                        "message": "method not found"
                    }
                })
            });
            (HandlerAction::Continue, response)
        }
        None => {
            let response = id.map(|id| {
                json!({
                    "jsonrpc": "2.0",
                    "id": id,
                    "error": {
                        "code": -32600,
                        "message": "invalid request"
                    }
                })
            });
            (HandlerAction::Continue, response)
        }
    }
}

fn resolve_completion_item(service: &mut JavaLanguageService, item: Value) -> Value {
    let Some(data) = item.get("data").and_then(Value::as_str) else {
        return item;
    };
    let Some(resolution) = service.resolve_completion(data) else {
        return item;
    };
    let mut object = match item {
        Value::Object(object) => object,
        other => return other,
    };
    if let Some(detail) = resolution.detail {
        object.insert("detail".to_string(), json!(detail));
    }
    if let Some(documentation) = resolution.documentation {
        object.insert(
            "documentation".to_string(),
            json!({"kind": "markdown", "value": documentation}),
        );
    }
    Value::Object(object)
}

fn resolve_code_lens_item(
    service: &mut JavaLanguageService,
    lens: Value,
) -> Result<Value, ServiceError> {
    let data = lens
        .get("data")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    let Some(command) = service.resolve_code_lens(&data)? else {
        return Ok(lens);
    };
    let mut object = match lens {
        Value::Object(object) => object,
        other => return Ok(other),
    };
    object.insert("command".to_string(), command_json(&command));
    Ok(Value::Object(object))
}

fn apply_configuration(service: &mut JavaLanguageService, params: Option<&Value>) {
    let Some(java) = params
        .and_then(|p| p.get("settings"))
        .and_then(|s| s.get("java"))
    else {
        return;
    };
    if let Some(deps) = java.get("externalDependencies").and_then(Value::as_array) {
        let deps: BTreeSet<String> = deps
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect();
        service.set_external_dependencies(deps);
    }
    if let Some(paths) = java.get("classPath").and_then(Value::as_array) {
        let class_path: BTreeSet<PathBuf> = paths
            .iter()
            .filter_map(Value::as_str)
            .map(|p| std::path::absolute(p).unwrap_or_else(|_| PathBuf::from(p)))
            .collect();
        service.set_class_path(class_path);
    }
}

fn parse_text_document_uri(params: Option<&Value>) -> Option<String> {
    Some(
        params?
            .get("textDocument")?
            .get("uri")?
            .as_str()?
            .to_string(),
    )
}

fn parse_position_params(params: Option<&Value>) -> Option<(String, u32, u32)> {
    let params = params?;
    let uri = params.get("textDocument")?.get("uri")?.as_str()?.to_string();
    let position = params.get("position")?;
    let line = u32::try_from(position.get("line")?.as_u64()?).ok()?;
    let character = u32::try_from(position.get("character")?.as_u64()?).ok()?;
    Some((uri, line, character))
}

fn parse_did_open(params: Option<&Value>) -> Option<(String, i32, String)> {
    let doc = params?.get("textDocument")?;
    let uri = doc.get("uri")?.as_str()?.to_string();
    let version = i32::try_from(doc.get("version")?.as_i64()?).ok()?;
    let text = doc.get("text")?.as_str()?.to_string();
    Some((uri, version, text))
}

fn parse_did_change(params: Option<&Value>) -> Option<(String, i32, Vec<ContentChange>)> {
    let params = params?;
    let doc = params.get("textDocument")?;
    let uri = doc.get("uri")?.as_str()?.to_string();
    let version = i32::try_from(doc.get("version")?.as_i64()?).ok()?;
    let raw = params.get("contentChanges")?.as_array()?;
    let mut changes = Vec::with_capacity(raw.len());
    for change in raw {
        let text = change.get("text")?.as_str()?.to_string();
        let range = change.get("range").and_then(parse_range);
        changes.push(ContentChange { range, text });
    }
    Some((uri, version, changes))
}

fn parse_range(value: &Value) -> Option<Range> {
    let parse_position = |v: &Value| -> Option<javelin::analysis::results::Position> {
        Some(javelin::analysis::results::Position::new(
            u32::try_from(v.get("line")?.as_u64()?).ok()?,
            u32::try_from(v.get("character")?.as_u64()?).ok()?,
        ))
    };
    Some(Range::new(
        parse_position(value.get("start")?)?,
        parse_position(value.get("end")?)?,
    ))
}

fn ok_response(id: Option<Value>, result: Value) -> Option<Value> {
    id.map(|id| json!({"jsonrpc": "2.0", "id": id, "result": result}))
}

fn invalid_params(id: Option<Value>) -> Option<Value> {
    id.map(|id| {
        json!({
            "jsonrpc": "2.0",
            "id": id,
            "error": {"code": -32602, "message": "invalid params"}
        })
    })
}

fn internal_error(id: Option<Value>, error: &ServiceError) -> Option<Value> {
    id.map(|id| {
        json!({
            "jsonrpc": "2.0",
            "id": id,
            "error": {"code": -32603, "message": error.to_string()}
        })
    })
}

fn service_response<T>(
    id: Option<Value>,
    reply: Result<T, ServiceError>,
    render: impl FnOnce(T) -> Value,
) -> Option<Value> {
    match reply {
        Ok(value) => ok_response(id, render(value)),
        Err(error) => internal_error(id, &error),
    }
}

fn range_json(range: Range) -> Value {
    json!({
        "start": {"line": range.start.line, "character": range.start.character},
        "end": {"line": range.end.line, "character": range.end.character}
    })
}

fn location_json(location: &Location) -> Value {
    json!({"uri": location.uri, "range": range_json(location.range)})
}

fn locations_json(locations: Option<Vec<Location>>) -> Value {
    match locations {
        Some(list) => Value::Array(list.iter().map(location_json).collect()),
        None => Value::Null,
    }
}

fn completion_item_json(item: &CompletionItem) -> Value {
    let mut object = Map::new();
    object.insert("label".to_string(), json!(item.label));
    if let Some(kind) = item.kind {
        object.insert("kind".to_string(), json!(completion_kind_code(kind)));
    }
    if let Some(detail) = &item.detail {
        object.insert("detail".to_string(), json!(detail));
    }
    if let Some(sort_text) = &item.sort_text {
        object.insert("sortText".to_string(), json!(sort_text));
    }
    if let Some(insert_text) = &item.insert_text {
        object.insert("insertText".to_string(), json!(insert_text));
    }
    if let Some(format) = item.insert_text_format {
        object.insert(
            "insertTextFormat".to_string(),
            json!(match format {
                InsertTextFormat::PlainText => 1,
                InsertTextFormat::Snippet => 2,
            }),
        );
    }
    if let Some(data) = &item.data {
        object.insert("data".to_string(), json!(data));
    }
    Value::Object(object)
}

fn completion_kind_code(kind: CompletionItemKind) -> u32 {
    match kind {
        CompletionItemKind::Method => 2,
        CompletionItemKind::Function => 3,
        CompletionItemKind::Constructor => 4,
        CompletionItemKind::Field => 5,
        CompletionItemKind::Variable => 6,
        CompletionItemKind::Class => 7,
        CompletionItemKind::Interface => 8,
        CompletionItemKind::Module => 9,
        CompletionItemKind::Property => 10,
        CompletionItemKind::Enum => 13,
        CompletionItemKind::Keyword => 14,
        CompletionItemKind::Snippet => 15,
        CompletionItemKind::EnumMember => 20,
        CompletionItemKind::TypeParameter => 25,
    }
}

fn marked_string_json(marked: &MarkedString) -> Value {
    match &marked.language {
        Some(language) => json!({"language": language, "value": marked.value}),
        None => json!(marked.value),
    }
}

fn signature_help_json(help: SignatureHelpReply) -> Value {
    json!({
        "signatures": help.signatures.iter().map(|signature| {
            json!({
                "label": signature.label,
                "parameters": signature.parameters.iter().map(|parameter| {
                    let mut object = Map::new();
                    object.insert("label".to_string(), json!(parameter.label));
                    if let Some(documentation) = &parameter.documentation {
                        object.insert(
                            "documentation".to_string(),
                            json!({"kind": "markdown", "value": documentation}),
                        );
                    }
                    Value::Object(object)
                }).collect::<Vec<_>>()
            })
        }).collect::<Vec<_>>(),
        "activeSignature": help.active_signature,
        "activeParameter": help.active_parameter
    })
}

fn symbol_json(symbol: &SymbolInformation) -> Value {
    let mut object = Map::new();
    object.insert("name".to_string(), json!(symbol.name));
    object.insert("kind".to_string(), json!(symbol_kind_code(symbol.kind)));
    object.insert("location".to_string(), location_json(&symbol.location));
    if let Some(container) = &symbol.container_name {
        object.insert("containerName".to_string(), json!(container));
    }
    Value::Object(object)
}

fn symbol_kind_code(kind: SymbolKind) -> u32 {
    match kind {
        SymbolKind::Class => 5,
        SymbolKind::Method => 6,
        SymbolKind::Field => 8,
        SymbolKind::Enum => 10,
        SymbolKind::Interface => 11,
        SymbolKind::TypeParameter => 26,
    }
}

fn code_lens_json(lens: &CodeLens) -> Value {
    let mut object = Map::new();
    object.insert("range".to_string(), range_json(lens.range));
    if let Some(command) = &lens.command {
        object.insert("command".to_string(), command_json(command));
    }
    if let Some(data) = &lens.data {
        object.insert("data".to_string(), Value::Array(data.clone()));
    }
    Value::Object(object)
}

fn command_json(command: &Command) -> Value {
    json!({
        "title": command.title,
        "command": command.command,
        "arguments": command.arguments
    })
}

fn text_edit_json(edit: &TextEdit) -> Value {
    json!({"range": range_json(edit.range), "newText": edit.new_text})
}

fn folding_kind_str(kind: FoldingRangeKind) -> &'static str {
    match kind {
        FoldingRangeKind::Comment => "comment",
        FoldingRangeKind::Imports => "imports",
        FoldingRangeKind::Region => "region",
    }
}

pub(crate) fn publish_notification(uri: &str, diagnostics: &[PublishedDiagnostic]) -> Value {
    let list: Vec<Value> = diagnostics
        .iter()
        .map(|diagnostic| {
            let mut object = Map::new();
            object.insert("range".to_string(), range_json(diagnostic.range));
            object.insert(
                "severity".to_string(),
                json!(match diagnostic.severity {
                    Severity::Error => 1,
                    Severity::Warning => 2,
                    Severity::Information => 3,
                    Severity::Hint => 4,
                }),
            );
            object.insert("code".to_string(), json!(diagnostic.code));
            object.insert("message".to_string(), json!(diagnostic.message));
            if !diagnostic.tags.is_empty() {
                let tags: Vec<u32> = diagnostic
                    .tags
                    .iter()
                    .map(|tag| match tag {
                        DiagnosticTag::Unnecessary => 1,
                    })
                    .collect();
                object.insert("tags".to_string(), json!(tags));
            }
            Value::Object(object)
        })
        .collect();
    json!({
        "jsonrpc": "2.0",
        "method": "textDocument/publishDiagnostics",
        "params": {"uri": uri, "diagnostics": list}
    })
}
