//! Preprocessing: `#ifdef` conditionals and `include` splicing.
//!
//! Produces one flat token stream for a whole translation unit. Every token
//! remembers which physical file it came from and its byte offset there, so
//! the parser can resolve positions back to the real source line/column:
//! an included declaration is located in the included file, not in the file
//! that pulled it in.

use std::fs;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashSet;
use smol_str::SmolStr;
use text_size::TextSize;
use tracing::trace;

use super::lexer::{Lexer, TokenKind};
use super::ParseFailure;
use crate::base::LineIndex;

/// One physical file that contributed tokens to the stream.
#[derive(Debug)]
pub struct SourceFile {
    /// Display path, as resolved (config path for the root file, search
    /// result for included files).
    pub path: String,
    pub line_index: LineIndex,
}

/// A preprocessed token: kind, text, and provenance.
#[derive(Debug, Clone)]
pub struct PToken {
    pub kind: TokenKind,
    pub text: SmolStr,
    /// Index into [`TokenStream::files`].
    pub file: u32,
    /// Byte offset within that file.
    pub offset: TextSize,
}

/// The preprocessed translation unit: all contributing files plus the
/// spliced token stream. `files[0]` is always the root file.
#[derive(Debug, Default)]
pub struct TokenStream {
    pub files: Vec<SourceFile>,
    pub tokens: Vec<PToken>,
}

/// Reads, lexes, and preprocesses `path` and everything it includes.
pub fn preprocess(
    path: &Path,
    defines: &FxHashSet<String>,
    include_dirs: &[PathBuf],
) -> Result<TokenStream, ParseFailure> {
    let mut stream = TokenStream::default();
    let mut active = Vec::new();
    expand(path, defines, include_dirs, &mut active, &mut stream)?;
    Ok(stream)
}

/// Lexes one file into the stream, recursing into its includes.
///
/// `active` is the stack of files currently being expanded, for cycle
/// detection.
fn expand(
    path: &Path,
    defines: &FxHashSet<String>,
    include_dirs: &[PathBuf],
    active: &mut Vec<PathBuf>,
    out: &mut TokenStream,
) -> Result<(), ParseFailure> {
    let display_path = path.display().to_string();
    let text = fs::read_to_string(path).map_err(|source| ParseFailure::Io {
        path: display_path.clone(),
        source,
    })?;

    let file_idx = out.files.len() as u32;
    out.files.push(SourceFile {
        path: display_path.clone(),
        line_index: LineIndex::new(&text),
    });
    active.push(normalize(path));

    let tokens: Vec<_> = Lexer::new(&text).collect();
    // Depth of #ifdef blocks we are inside of (all of them taken).
    let mut cond_depth = 0usize;

    let mut i = 0;
    while i < tokens.len() {
        let token = &tokens[i];
        match token.kind {
            TokenKind::IfdefDirective => {
                let name = directive_name(token.text);
                if defines.contains(name) {
                    cond_depth += 1;
                } else {
                    trace!(file = %display_path, name, "skipping inactive #ifdef block");
                    i = skip_conditional(&tokens, i, &display_path)?;
                    continue;
                }
            }
            TokenKind::EndifDirective => {
                if cond_depth == 0 {
                    let (line, column) = position(out, file_idx, token.offset);
                    return Err(ParseFailure::Syntax {
                        path: display_path,
                        line,
                        column,
                        message: "#endif without matching #ifdef".into(),
                    });
                }
                cond_depth -= 1;
            }
            TokenKind::IncludeKw => {
                let target = match tokens.get(i + 1) {
                    Some(t) if t.kind == TokenKind::String => t,
                    other => {
                        let offset = other.map_or(token.offset, |t| t.offset);
                        let (line, column) = position(out, file_idx, offset);
                        return Err(ParseFailure::Syntax {
                            path: display_path,
                            line,
                            column,
                            message: "expected string literal after include".into(),
                        });
                    }
                };
                let name = target.text.trim_matches('"');
                let resolved = resolve_include(name, path, include_dirs).ok_or_else(|| {
                    ParseFailure::IncludeNotFound {
                        path: display_path.clone(),
                        name: name.to_owned(),
                    }
                })?;
                if active.contains(&normalize(&resolved)) {
                    return Err(ParseFailure::IncludeCycle {
                        path: display_path,
                        name: name.to_owned(),
                    });
                }
                expand(&resolved, defines, include_dirs, active, out)?;
                i += 2;
                continue;
            }
            TokenKind::Error => {
                let (line, column) = position(out, file_idx, token.offset);
                return Err(ParseFailure::Syntax {
                    path: display_path,
                    line,
                    column,
                    message: format!("unrecognized token {:?}", token.text),
                });
            }
            _ => {
                out.tokens.push(PToken {
                    kind: token.kind,
                    text: SmolStr::new(token.text),
                    file: file_idx,
                    offset: token.offset,
                });
            }
        }
        i += 1;
    }

    if cond_depth != 0 {
        return Err(ParseFailure::UnterminatedConditional { path: display_path });
    }

    active.pop();
    Ok(())
}

/// Skips an inactive `#ifdef` block, honoring nesting. `start` is the index
/// of the opening directive; returns the index just past the matching
/// `#endif`.
fn skip_conditional(
    tokens: &[super::lexer::Token<'_>],
    start: usize,
    path: &str,
) -> Result<usize, ParseFailure> {
    let mut depth = 1usize;
    let mut i = start + 1;
    while i < tokens.len() {
        match tokens[i].kind {
            TokenKind::IfdefDirective => depth += 1,
            TokenKind::EndifDirective => {
                depth -= 1;
                if depth == 0 {
                    return Ok(i + 1);
                }
            }
            _ => {}
        }
        i += 1;
    }
    Err(ParseFailure::UnterminatedConditional {
        path: path.to_owned(),
    })
}

/// Pulls the symbol name out of a `#ifdef NAME` token.
fn directive_name(text: &str) -> &str {
    text["#ifdef".len()..].trim()
}

/// Finds an included file: `-I` directories in order, then the directory of
/// the including file.
fn resolve_include(name: &str, including: &Path, include_dirs: &[PathBuf]) -> Option<PathBuf> {
    for dir in include_dirs {
        let candidate = dir.join(name);
        if candidate.is_file() {
            return Some(candidate);
        }
    }
    let sibling = including.parent().unwrap_or(Path::new("")).join(name);
    sibling.is_file().then_some(sibling)
}

/// Canonical form for cycle detection; falls back to the literal path for
/// files the OS cannot canonicalize.
fn normalize(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

/// 1-based line/column of an offset within one of the stream's files.
fn position(stream: &TokenStream, file: u32, offset: TextSize) -> (u32, u32) {
    let lc = stream.files[file as usize].line_index.line_col(offset);
    (lc.line + 1, lc.col + 1)
}
