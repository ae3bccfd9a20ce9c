//! Lexing
//!
//!     Wiki markup is line oriented at the block level and delimiter oriented inside a line, so
//!     scanning happens in two layers:
//!
//!         1. Line classification. Each source line is inspected for its line-start marker
//!            (heading `=` runs, `----`, list prefixes, table markers, a leading space, `<pre>`).
//!            See [scanner](scanner).
//!         2. Inline tokenization of the rest of the line using a logos lexer over the inline
//!            delimiter alphabet (`''`, `[[`, `{{`, `|`, ...). See [tokens](tokens).
//!
//!     The result is one flat stream of [`Token`]s with byte spans into the source. Line ends
//!     are folded into `Newline(n)` tokens, where `n > 1` means blank lines were crossed.
//!
//!     Scanning never fails. Anything that is not a known marker is a `Text` token, and the
//!     parser decides whether an opener that never closes is literal text after all.

pub mod scanner;
pub mod tokens;

pub use scanner::{scan, Scanner};
pub use tokens::{tokenize_inline, EmphasisDelimiter, InlineToken, SpannedToken, TableMarker, Token};
