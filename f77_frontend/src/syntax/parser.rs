//! Recursive-descent parser
//!
//! One method per grammar rule. Each method consumes exactly the tokens of
//! its construct and leaves the lookahead on the first token after it. The
//! first mismatch aborts the parse.

use super::error::{SyntaxError, SyntaxResult};
use super::trace::{ParseEvent, ParseTrace};
use crate::config::compile_time::syntax::MAX_PARSE_DEPTH;
use crate::grammar::{Terminal, ARITHMETIC_OPERATORS, RELATIONAL_OPERATORS};
use crate::tokens::{Category, Token, TokenCursor};
use crate::{log_debug, log_error};

pub struct RecursiveDescentParser<I: Iterator<Item = Token>> {
    cursor: TokenCursor<I>,
    depth: usize,
    max_depth: usize,
    trace: ParseTrace,
}

impl<I: Iterator<Item = Token>> RecursiveDescentParser<I> {
    pub fn new(tokens: impl IntoIterator<IntoIter = I, Item = Token>) -> Self {
        Self {
            cursor: TokenCursor::new(tokens),
            depth: 0,
            max_depth: MAX_PARSE_DEPTH,
            trace: ParseTrace::new(),
        }
    }

    /// Lower the IF nesting limit
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth.min(MAX_PARSE_DEPTH);
        self
    }

    pub fn trace(&self) -> &ParseTrace {
        &self.trace
    }

    pub fn into_trace(self) -> ParseTrace {
        self.trace
    }

    /// Parse a whole program. On success returns a confirmation naming it.
    pub fn parse(&mut self) -> SyntaxResult<String> {
        let result = self.program();
        match &result {
            Ok(_) => log_debug!("Recursive descent accepted input",
                "tokens" => self.cursor.consumed(),
                "trace_entries" => self.trace.len()
            ),
            Err(e) => log_error!(e.error_code(), &e.to_string(), span = e.span().unwrap_or_default(),
                "parser" => "recursive_descent"
            ),
        }
        result
    }

    // ========================================================================
    // Token handling
    // ========================================================================

    fn current(&self) -> &Token {
        self.cursor.current()
    }

    fn at(&self, terminal: &Terminal) -> bool {
        terminal.matches(self.current())
    }

    fn at_keyword(&self, kind: &str) -> bool {
        self.current().is(Category::Keyword, kind)
    }

    fn at_operator_in(&self, kinds: &[&str]) -> bool {
        let token = self.current();
        token.category == Category::Operator && kinds.contains(&token.kind.as_str())
    }

    /// Take the lookahead if it is `expected`, otherwise fail without moving
    fn consume(&mut self, expected: &Terminal) -> SyntaxResult<Token> {
        if self.at(expected) {
            Ok(self.cursor.advance())
        } else {
            Err(SyntaxError::unexpected(expected, self.current()))
        }
    }

    /// Run `rule` one IF block deeper, failing once the nesting limit is reached
    fn descend<T>(&mut self, rule: impl FnOnce(&mut Self) -> SyntaxResult<T>) -> SyntaxResult<T> {
        if self.depth >= self.max_depth {
            return Err(SyntaxError::MaxRecursionDepth {
                limit: self.max_depth,
                span: self.current().span,
            });
        }
        self.depth += 1;
        let result = rule(self);
        self.depth -= 1;
        result
    }

    // ========================================================================
    // Grammar rules
    // ========================================================================

    /// program ::= PROGRAM ID declarations executable END EOF
    fn program(&mut self) -> SyntaxResult<String> {
        self.consume(&Terminal::keyword("PROGRAM"))?;
        let name = self.consume(&Terminal::ident())?.lexeme;
        self.trace.record(ParseEvent::ProgramStart { name: name.clone() });

        self.declarations()?;
        self.executable()?;

        self.consume(&Terminal::keyword("END"))?;
        self.consume(&Terminal::eof())?;
        self.trace.record(ParseEvent::ProgramEnd { name: name.clone() });

        Ok(format!("Program '{}' parsed successfully", name))
    }

    /// declarations ::= declaration*
    fn declarations(&mut self) -> SyntaxResult<()> {
        while self.at_keyword("INTEGER") || self.at_keyword("REAL") {
            self.declaration()?;
        }
        Ok(())
    }

    /// declaration ::= (INTEGER | REAL) ID
    fn declaration(&mut self) -> SyntaxResult<()> {
        let type_token = if self.at_keyword("INTEGER") {
            self.consume(&Terminal::keyword("INTEGER"))?
        } else {
            self.consume(&Terminal::keyword("REAL"))?
        };
        let name = self.consume(&Terminal::ident())?.lexeme;
        self.trace.record(ParseEvent::Declaration {
            type_name: type_token.kind,
            name,
        });
        Ok(())
    }

    /// executable ::= statement*
    fn executable(&mut self) -> SyntaxResult<()> {
        while self.at(&Terminal::ident()) || self.at_keyword("IF") {
            self.statement()?;
        }
        Ok(())
    }

    /// statement ::= assignment | conditional
    fn statement(&mut self) -> SyntaxResult<()> {
        if self.at_keyword("IF") {
            self.descend(Self::conditional)
        } else {
            self.assignment()
        }
    }

    /// assignment ::= ID ASSIGN expr
    fn assignment(&mut self) -> SyntaxResult<()> {
        let target = self.consume(&Terminal::ident())?.lexeme;
        self.consume(&Terminal::operator("ASSIGN"))?;
        self.trace.record(ParseEvent::Assignment { target });
        self.expr()
    }

    /// conditional ::= IF LPAREN logical_expr RPAREN THEN executable ENDIF
    fn conditional(&mut self) -> SyntaxResult<()> {
        let if_token = self.consume(&Terminal::keyword("IF"))?;
        self.trace.record(ParseEvent::IfBegin {
            line: if_token.line(),
        });

        self.consume(&Terminal::punct("LPAREN"))?;
        self.logical_expr()?;
        self.consume(&Terminal::punct("RPAREN"))?;
        self.consume(&Terminal::keyword("THEN"))?;

        self.executable()?;

        self.consume(&Terminal::keyword("ENDIF"))?;
        self.trace.record(ParseEvent::IfEnd);
        Ok(())
    }

    /// logical_expr ::= expr relop expr
    fn logical_expr(&mut self) -> SyntaxResult<()> {
        self.expr()?;

        if !self.at_operator_in(&RELATIONAL_OPERATORS) {
            return Err(SyntaxError::unexpected("relational operator", self.current()));
        }
        let op = self.cursor.advance();
        self.trace
            .record(ParseEvent::RelationalOperator { lexeme: op.lexeme });

        self.expr()
    }

    /// expr ::= term (arithop expr)?
    ///
    /// The right-recursive tail is walked as a loop; only IF blocks nest.
    fn expr(&mut self) -> SyntaxResult<()> {
        self.term()?;
        while self.at_operator_in(&ARITHMETIC_OPERATORS) {
            self.cursor.advance();
            self.term()?;
        }
        Ok(())
    }

    /// term ::= ID | INT | REAL literal
    fn term(&mut self) -> SyntaxResult<()> {
        let token = self.current();
        let is_term = matches!(
            token.category,
            Category::Ident | Category::LitInt | Category::LitReal
        );
        if !is_term {
            return Err(SyntaxError::unexpected("term (ID, INT or REAL literal)", token));
        }
        self.cursor.advance();
        Ok(())
    }
}

/// Parse `tokens` with a fresh recursive-descent parser
pub fn parse_program(tokens: impl IntoIterator<Item = Token>) -> SyntaxResult<String> {
    RecursiveDescentParser::new(tokens).parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexical::tokenize;
    use crate::tokens::{kinds, TokenStreamBuilder};
    use assert_matches::assert_matches;

    const SMALL: &str = "  PROGRAM P\n  INTEGER X\n  X = 1 + 2\n  END\n";

    #[test]
    fn test_accepts_small_program() {
        let mut parser = RecursiveDescentParser::new(tokenize(SMALL));
        assert_eq!(parser.parse().unwrap(), "Program 'P' parsed successfully");

        let events = parser.trace().entries();
        assert_eq!(
            events.first(),
            Some(&ParseEvent::ProgramStart { name: "P".into() })
        );
        assert!(events.contains(&ParseEvent::Declaration {
            type_name: "INTEGER".into(),
            name: "X".into()
        }));
        assert!(events.contains(&ParseEvent::Assignment { target: "X".into() }));
    }

    #[test]
    fn test_missing_end_reports_eof() {
        let err = parse_program(tokenize("  PROGRAM P\n  X = 1\n")).unwrap_err();
        assert_eq!(err.expected(), Some("END"));
        assert_eq!(err.found_kind(), Some(kinds::EOF));
    }

    #[test]
    fn test_real_keyword_is_not_a_term() {
        let tokens = TokenStreamBuilder::new()
            .keyword("PROGRAM")
            .ident("P")
            .ident("X")
            .operator("ASSIGN", "=")
            .keyword("REAL")
            .keyword("END")
            .build();
        let err = parse_program(tokens).unwrap_err();
        assert_matches!(err, SyntaxError::UnexpectedToken { ref found, .. } if found == "REAL");
    }

    #[test]
    fn test_relational_operator_required() {
        let source = "  PROGRAM P\n  IF (X + 1) THEN\n  ENDIF\n  END";
        let err = parse_program(tokenize(source)).unwrap_err();
        assert_eq!(err.expected(), Some("relational operator"));
        assert_eq!(err.found_kind(), Some("RPAREN"));
    }

    #[test]
    fn test_trailing_tokens_rejected() {
        let err = parse_program(tokenize("  PROGRAM P\n  END\n  X = 1")).unwrap_err();
        assert_eq!(err.expected(), Some("EOF"));
    }

    #[test]
    fn test_stream_without_eof_gets_synthetic_one() {
        let tokens = TokenStreamBuilder::new()
            .keyword("PROGRAM")
            .ident("P")
            .keyword("END")
            .build_without_eof();
        assert!(parse_program(tokens).is_ok());
    }

    #[test]
    fn test_nesting_limit() {
        let mut builder = TokenStreamBuilder::new().keyword("PROGRAM").ident("P");
        for _ in 0..20 {
            builder = builder
                .keyword("IF")
                .punct("LPAREN", "(")
                .ident("X")
                .operator("GT", ".GT.")
                .int(0)
                .punct("RPAREN", ")")
                .keyword("THEN");
        }
        for _ in 0..20 {
            builder = builder.keyword("ENDIF");
        }
        let tokens = builder.keyword("END").build();

        assert!(RecursiveDescentParser::new(tokens.clone()).parse().is_ok());

        let err = RecursiveDescentParser::new(tokens)
            .with_max_depth(10)
            .parse()
            .unwrap_err();
        assert_matches!(err, SyntaxError::MaxRecursionDepth { limit: 10, .. });
    }

    #[test]
    fn test_nesting_limit_counts_if_blocks_only() {
        let nested = |depth: usize| {
            let mut builder = TokenStreamBuilder::new().keyword("PROGRAM").ident("P");
            for _ in 0..depth {
                builder = builder
                    .keyword("IF")
                    .punct("LPAREN", "(")
                    .ident("X")
                    .operator("GT", ".GT.")
                    .int(0)
                    .punct("RPAREN", ")")
                    .keyword("THEN");
            }
            for _ in 0..depth {
                builder = builder.keyword("ENDIF");
            }
            builder.keyword("END").build()
        };

        assert!(RecursiveDescentParser::new(nested(3)).with_max_depth(3).parse().is_ok());
        let err = RecursiveDescentParser::new(nested(4))
            .with_max_depth(3)
            .parse()
            .unwrap_err();
        assert_matches!(err, SyntaxError::MaxRecursionDepth { limit: 3, .. });
    }

    #[test]
    fn test_long_expression_is_not_charged_depth() {
        let terms: Vec<String> = (0..2 * MAX_PARSE_DEPTH).map(|i| i.to_string()).collect();
        let source = format!("  PROGRAM P\n  X = {}\n  END\n", terms.join(" + "));

        let result = RecursiveDescentParser::new(tokenize(&source))
            .with_max_depth(1)
            .parse();
        assert!(result.is_ok());
    }
}
