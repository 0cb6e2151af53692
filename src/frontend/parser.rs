//! Recursive-descent parser for the preprocessed token stream.
//!
//! Builds the arena tree and resolves name uses against the declarations
//! seen so far (file scope, plus one nested scope per function body). An
//! unresolved name is not an error: the node simply keeps no identifier and
//! no referenced declaration, and the indexer skips it.
//!
//! USR scheme: `f:<name>` / `v:<name>` / `t:<name>` for top-level symbols,
//! `f:<fn>::v:<name>` (or `::t:`) for function locals. Identical top-level
//! declarations in different files (the normal outcome of including the
//! same file twice) therefore collapse onto one identifier.

use rustc_hash::FxHashMap;
use smol_str::SmolStr;

use super::ParseFailure;
use super::lexer::TokenKind;
use super::preprocess::{PToken, TokenStream};
use super::tree::{NodeData, NodeId, NodeKind, SyntaxTree};
use crate::base::SourceLocation;

/// Parses a preprocessed translation unit into a syntax tree.
pub fn parse(stream: &TokenStream) -> Result<SyntaxTree, ParseFailure> {
    Parser::new(stream).parse_source_file()
}

struct Parser<'a> {
    stream: &'a TokenStream,
    pos: usize,
    tree: SyntaxTree,
    /// Innermost scope last. Lookup walks outward; insertion shadows.
    scopes: Vec<FxHashMap<SmolStr, NodeId>>,
}

impl<'a> Parser<'a> {
    fn new(stream: &'a TokenStream) -> Self {
        Self {
            stream,
            pos: 0,
            tree: SyntaxTree::new(),
            scopes: vec![FxHashMap::default()],
        }
    }

    fn parse_source_file(mut self) -> Result<SyntaxTree, ParseFailure> {
        let Some(root_file) = self.stream.files.first() else {
            return Ok(self.tree);
        };
        let root_loc = SourceLocation::new(root_file.path.clone(), 1, 1);
        let root = self
            .tree
            .push(NodeData::new(NodeKind::SourceFile, None, root_loc));

        while self.peek().is_some() {
            self.parse_item(root, None)?;
        }
        Ok(self.tree)
    }

    /// One declaration or statement. `enclosing` is the USR of the function
    /// whose body we are in, if any.
    fn parse_item(&mut self, parent: NodeId, enclosing: Option<&str>) -> Result<(), ParseFailure> {
        // parse_source_file only calls with a pending token.
        let token = self.bump().expect("parse_item called at end of input");
        match token.kind {
            TokenKind::FnKw => self.parse_fn(parent, enclosing, token),
            TokenKind::VarKw => self.parse_simple_decl(parent, enclosing, NodeKind::VarDecl, 'v'),
            TokenKind::TypeKw => self.parse_simple_decl(parent, enclosing, NodeKind::TypeDecl, 't'),
            TokenKind::Ident => self.parse_stmt(parent, token),
            _ => {
                let loc = self.loc(token);
                self.err(
                    &loc,
                    format!("expected declaration or statement, found {:?}", token.text),
                )
            }
        }
    }

    fn parse_fn(
        &mut self,
        parent: NodeId,
        enclosing: Option<&str>,
        fn_kw: &'a PToken,
    ) -> Result<(), ParseFailure> {
        if enclosing.is_some() {
            let loc = self.loc(fn_kw);
            return self.err(&loc, "function declarations are only allowed at the top level");
        }
        let name = self.expect(TokenKind::Ident, "function name")?;
        let usr = SmolStr::new(format!("f:{}", name.text));
        let loc = self.loc(name);
        let func = self
            .tree
            .push(NodeData::new(NodeKind::FunctionDecl, Some(usr.clone()), loc));
        self.tree.add_child(parent, func);
        self.bind(&name.text, func);

        let lbrace = self.expect(TokenKind::LBrace, "{")?;
        let block_loc = self.loc(lbrace);
        let block = self
            .tree
            .push(NodeData::new(NodeKind::CompoundStmt, None, block_loc));
        self.tree.add_child(func, block);

        self.scopes.push(FxHashMap::default());
        loop {
            match self.peek() {
                None => {
                    let loc = self.eof_loc();
                    return self.err(&loc, "expected } before end of file");
                }
                Some(t) if t.kind == TokenKind::RBrace => {
                    self.bump();
                    break;
                }
                Some(_) => self.parse_item(block, Some(usr.as_str()))?,
            }
        }
        self.scopes.pop();
        Ok(())
    }

    fn parse_simple_decl(
        &mut self,
        parent: NodeId,
        enclosing: Option<&str>,
        kind: NodeKind,
        tag: char,
    ) -> Result<(), ParseFailure> {
        let name = self.expect(TokenKind::Ident, "name")?;
        self.expect(TokenKind::Semi, ";")?;

        let usr = match enclosing {
            Some(fn_usr) => SmolStr::new(format!("{fn_usr}::{tag}:{}", name.text)),
            None => SmolStr::new(format!("{tag}:{}", name.text)),
        };
        let loc = self.loc(name);
        let decl = self.tree.push(NodeData::new(kind, Some(usr), loc));
        self.tree.add_child(parent, decl);
        self.bind(&name.text, decl);
        Ok(())
    }

    /// `name;` (a reference) or `name(arg, ...);` (a call).
    fn parse_stmt(&mut self, parent: NodeId, name: &'a PToken) -> Result<(), ParseFailure> {
        let loc = self.loc(name);
        let is_call = self
            .peek()
            .is_some_and(|t| t.kind == TokenKind::LParen);

        if !is_call {
            self.expect(TokenKind::Semi, ";")?;
            let use_site = self.tree.push(NodeData::new(NodeKind::DeclRefExpr, None, loc));
            if let Some(decl) = self.lookup(&name.text) {
                self.tree.set_referenced(use_site, decl);
            }
            self.tree.add_child(parent, use_site);
            return Ok(());
        }

        self.bump(); // (
        let call = self.tree.push(NodeData::new(NodeKind::CallExpr, None, loc));
        if let Some(decl) = self.lookup(&name.text) {
            self.tree.set_referenced(call, decl);
        }
        self.tree.add_child(parent, call);

        if self.peek().is_some_and(|t| t.kind == TokenKind::RParen) {
            self.bump();
        } else {
            loop {
                let arg = self.expect(TokenKind::Ident, "argument name")?;
                let arg_loc = self.loc(arg);
                let arg_node = self
                    .tree
                    .push(NodeData::new(NodeKind::DeclRefExpr, None, arg_loc));
                if let Some(decl) = self.lookup(&arg.text) {
                    self.tree.set_referenced(arg_node, decl);
                }
                self.tree.add_child(call, arg_node);

                match self.bump() {
                    Some(t) if t.kind == TokenKind::Comma => continue,
                    Some(t) if t.kind == TokenKind::RParen => break,
                    Some(t) => {
                        let loc = self.loc(t);
                        return self.err(&loc, format!("expected , or ), found {:?}", t.text));
                    }
                    None => {
                        let loc = self.eof_loc();
                        return self.err(&loc, "expected ) before end of file");
                    }
                }
            }
        }
        self.expect(TokenKind::Semi, ";")?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Scopes
    // ------------------------------------------------------------------

    fn bind(&mut self, name: &str, decl: NodeId) {
        // Redeclaration shadows; the front end stays lenient.
        self.scopes
            .last_mut()
            .expect("scope stack is never empty")
            .insert(SmolStr::new(name), decl);
    }

    fn lookup(&self, name: &str) -> Option<NodeId> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(name).copied())
    }

    // ------------------------------------------------------------------
    // Token cursor
    // ------------------------------------------------------------------

    fn peek(&self) -> Option<&'a PToken> {
        self.stream.tokens.get(self.pos)
    }

    fn bump(&mut self) -> Option<&'a PToken> {
        let token = self.stream.tokens.get(self.pos);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> Result<&'a PToken, ParseFailure> {
        match self.bump() {
            Some(t) if t.kind == kind => Ok(t),
            Some(t) => {
                let loc = self.loc(t);
                self.err(&loc, format!("expected {what}, found {:?}", t.text))
            }
            None => {
                let loc = self.eof_loc();
                self.err(&loc, format!("expected {what}, found end of file"))
            }
        }
    }

    // ------------------------------------------------------------------
    // Locations and errors
    // ------------------------------------------------------------------

    fn loc(&self, token: &PToken) -> SourceLocation {
        let file = &self.stream.files[token.file as usize];
        let lc = file.line_index.line_col(token.offset);
        SourceLocation::new(file.path.clone(), lc.line + 1, lc.col + 1)
    }

    fn eof_loc(&self) -> SourceLocation {
        match self.stream.tokens.last() {
            Some(token) => self.loc(token),
            None => SourceLocation::new(
                self.stream
                    .files
                    .first()
                    .map(|f| f.path.clone())
                    .unwrap_or_default(),
                1,
                1,
            ),
        }
    }

    fn err<T>(&self, loc: &SourceLocation, message: impl Into<String>) -> Result<T, ParseFailure> {
        Err(ParseFailure::Syntax {
            path: loc.path.clone(),
            line: loc.line,
            column: loc.column,
            message: message.into(),
        })
    }
}
