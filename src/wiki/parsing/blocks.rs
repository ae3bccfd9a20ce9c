//! Block parsing
//!
//!     Recursive descent over classified lines. Consecutive lines of the same kind are grouped
//!     into one container:
//!
//!         Paragraph   consecutive text lines, up to a blank line or another kind of line
//!         List        consecutive list lines; each prefix character is one nesting level
//!         Table       everything from `{|` to its matching `|}`, nested tables included
//!         Pre         consecutive space-indented lines
//!
//!     List prefixes are read one character per depth. At each depth, a run of lines sharing
//!     the same `*` or `#` forms one list, and a run of `;`/`:` forms one definition list.
//!     Lines with a longer prefix nest inside the last item at that depth; if there is no item
//!     yet, an empty one is created to hold them.

use super::inlines::{parse_inline, push_inline};
use super::lines::{Line, LineKind};
use super::{Construct, DebugGate, Recovery};
use crate::wiki::ast::{
    Block, Definition, DefinitionEntry, DefinitionList, Heading, Inline, InlineContent, List,
    ListItem, ListKind, Paragraph, Preformatted, References, Table, TableCell, TableRow,
};
use crate::wiki::lexing::{SpannedToken, TableMarker, Token};

pub struct BlockParser<'r> {
    gate: DebugGate,
    recoveries: &'r mut Vec<Recovery>,
}

/// A list line split into its prefix characters.
struct ListEntry<'l> {
    prefix: Vec<char>,
    line: &'l Line,
}

impl<'r> BlockParser<'r> {
    pub fn new(gate: DebugGate, recoveries: &'r mut Vec<Recovery>) -> Self {
        Self { gate, recoveries }
    }

    pub fn parse(&mut self, lines: &[Line]) -> Vec<Block> {
        let mut blocks = Vec::new();
        let mut i = 0;

        while let Some(line) = lines.get(i) {
            if self.gate.at(DebugGate::LOOKAHEAD) && !line.is_blank() {
                tracing::debug!(target: "wikitrans::parser", line = i, kind = ?line.kind, at = line.span.start, "lookahead");
            }
            match &line.kind {
                LineKind::Blank => i += 1,
                LineKind::Heading(level) => {
                    let content = self.inline(&line.tokens);
                    blocks.push(Block::Heading(Heading::new(*level as usize, content)));
                    i += 1;
                }
                LineKind::Rule => {
                    blocks.push(Block::HorizontalRule);
                    i += 1;
                }
                LineKind::References => {
                    blocks.push(Block::References(References::default()));
                    i += 1;
                }
                LineKind::PreBlock(text) => {
                    let text = text.strip_suffix('\n').unwrap_or(text);
                    blocks.push(Block::Preformatted(Preformatted::new(text)));
                    i += 1;
                }
                LineKind::Pre(_) => {
                    let end = run_end(lines, i, |l| matches!(l.kind, LineKind::Pre(_)));
                    let text = lines[i..end]
                        .iter()
                        .filter_map(|l| match &l.kind {
                            LineKind::Pre(text) => Some(text.as_str()),
                            _ => None,
                        })
                        .collect::<Vec<_>>()
                        .join("\n");
                    blocks.push(Block::Preformatted(Preformatted::new(text)));
                    i = end;
                }
                LineKind::List(_) => {
                    let end = run_end(lines, i, |l| matches!(l.kind, LineKind::List(_)));
                    self.enter("list");
                    blocks.extend(self.list_run(&lines[i..end]));
                    self.leave("list");
                    i = end;
                }
                LineKind::Table(TableMarker::Open) => match find_table_end(lines, i) {
                    Some(end) => {
                        self.enter("table");
                        if let Some(table) = self.table(&lines[i + 1..end]) {
                            blocks.push(Block::Table(table));
                        }
                        self.leave("table");
                        i = end + 1;
                    }
                    None => {
                        self.recoveries.push(Recovery {
                            construct: Construct::Table,
                            span: marker_span(line),
                        });
                        let end = run_end(lines, i + 1, is_paragraph_line);
                        blocks.extend(self.paragraph(&lines[i..end]));
                        i = end;
                    }
                },
                LineKind::Table(_) | LineKind::Paragraph => {
                    let end = run_end(lines, i, is_paragraph_line).max(i + 1);
                    blocks.extend(self.paragraph(&lines[i..end]));
                    i = end;
                }
            }
        }

        blocks
    }

    fn enter(&self, construct: &str) {
        if self.gate.at(DebugGate::ENTER_LEAVE) {
            tracing::trace!(target: "wikitrans::parser", construct, "enter");
        }
    }

    fn leave(&self, construct: &str) {
        if self.gate.at(DebugGate::ENTER_LEAVE) {
            tracing::trace!(target: "wikitrans::parser", construct, "leave");
        }
    }

    fn inline(&mut self, tokens: &[SpannedToken]) -> InlineContent {
        parse_inline(tokens, self.gate, self.recoveries)
    }

    /// Text lines joined into one paragraph. Table marker lines outside a table are literal.
    /// A paragraph that is nothing but one template becomes a block template.
    fn paragraph(&mut self, lines: &[Line]) -> Option<Block> {
        let mut content = InlineContent::new();
        for line in lines {
            let line_content = self.inline(&literal_tokens(line));
            if line_content.is_empty() {
                continue;
            }
            if !content.is_empty() {
                push_inline(&mut content, Inline::text("\n"));
            }
            for node in line_content {
                push_inline(&mut content, node);
            }
        }

        if content.is_empty() {
            return None;
        }
        if let [Inline::Template(template)] = content.as_slice() {
            return Some(Block::Template(template.clone()));
        }
        Some(Block::Paragraph(Paragraph::new(content)))
    }

    /// Blocks for the text on a single container line.
    fn line_blocks(&mut self, tokens: &[SpannedToken]) -> Vec<Block> {
        let content = self.inline(tokens);
        if content.is_empty() {
            Vec::new()
        } else {
            vec![Block::Paragraph(Paragraph::new(content))]
        }
    }

    fn list_run(&mut self, lines: &[Line]) -> Vec<Block> {
        let entries: Vec<ListEntry> = lines
            .iter()
            .filter_map(|line| match &line.kind {
                LineKind::List(prefix) => Some(ListEntry {
                    prefix: prefix.chars().collect(),
                    line,
                }),
                _ => None,
            })
            .collect();
        self.nested(&entries, 0)
    }

    /// Containers for entries whose prefixes are all longer than `depth`.
    fn nested(&mut self, entries: &[ListEntry], depth: usize) -> Vec<Block> {
        let mut blocks = Vec::new();
        let mut i = 0;

        while i < entries.len() {
            let marker = entries[i].prefix[depth];
            let is_definition = matches!(marker, ';' | ':');
            let len = entries[i..]
                .iter()
                .take_while(|e| {
                    let c = e.prefix[depth];
                    if is_definition {
                        matches!(c, ';' | ':')
                    } else {
                        c == marker
                    }
                })
                .count();
            let run = &entries[i..i + len];

            if is_definition {
                if let Some(list) = self.definition_list(run, depth) {
                    blocks.push(Block::DefinitionList(list));
                }
            } else {
                let kind = ListKind::from_marker(marker).unwrap_or(ListKind::Unordered);
                if let Some(list) = self.list(run, depth, kind) {
                    blocks.push(Block::List(list));
                }
            }
            i += len;
        }

        blocks
    }

    /// Length of the run of entries starting at `from` that nest below `depth`.
    fn deeper_run(entries: &[ListEntry], from: usize, depth: usize) -> usize {
        entries[from..]
            .iter()
            .take_while(|e| e.prefix.len() > depth + 1)
            .count()
    }

    fn list(&mut self, run: &[ListEntry], depth: usize, kind: ListKind) -> Option<List> {
        let mut items: Vec<ListItem> = Vec::new();
        let mut j = 0;

        while j < run.len() {
            if run[j].prefix.len() == depth + 1 {
                items.push(ListItem::new(self.line_blocks(&run[j].line.tokens)));
                j += 1;
                continue;
            }
            let len = Self::deeper_run(run, j, depth);
            let nested = self.nested(&run[j..j + len], depth + 1);
            if items.is_empty() {
                items.push(ListItem::default());
            }
            if let Some(item) = items.last_mut() {
                item.blocks.extend(nested);
            }
            j += len;
        }

        List::new(kind, items)
    }

    fn definition_list(&mut self, run: &[ListEntry], depth: usize) -> Option<DefinitionList> {
        let mut entries: Vec<DefinitionEntry> = Vec::new();
        let mut j = 0;

        while j < run.len() {
            let entry = &run[j];
            if entry.prefix.len() > depth + 1 {
                let len = Self::deeper_run(run, j, depth);
                let nested = self.nested(&run[j..j + len], depth + 1);
                if entries.is_empty() {
                    entries.push(DefinitionEntry::without_term());
                }
                if let Some(last) = entries.last_mut() {
                    if last.definitions.is_empty() {
                        last.definitions.push(Definition::default());
                    }
                    if let Some(def) = last.definitions.last_mut() {
                        def.blocks.extend(nested);
                    }
                }
                j += len;
                continue;
            }

            if entry.prefix[depth] == ';' {
                let (term, definition) = split_definition(&entry.line.tokens);
                let term = self.inline(&term);
                let mut new_entry = if term.is_empty() {
                    DefinitionEntry::without_term()
                } else {
                    DefinitionEntry::with_term(term)
                };
                if let Some(tokens) = definition {
                    new_entry
                        .definitions
                        .push(Definition::new(self.line_blocks(&tokens)));
                }
                entries.push(new_entry);
            } else {
                let definition = Definition::new(self.line_blocks(&entry.line.tokens));
                match entries.last_mut() {
                    Some(last) => last.definitions.push(definition),
                    None => {
                        let mut new_entry = DefinitionEntry::without_term();
                        new_entry.definitions.push(definition);
                        entries.push(new_entry);
                    }
                }
            }
            j += 1;
        }

        DefinitionList::new(entries)
    }

    /// Build a table from the lines between `{|` and its matching `|}`.
    fn table(&mut self, lines: &[Line]) -> Option<Table> {
        let mut caption = None;
        let mut rows: Vec<TableRow> = Vec::new();
        let mut cells: Vec<TableCell> = Vec::new();
        let mut open_cell: Option<(bool, Vec<Line>)> = None;
        let mut k = 0;

        while let Some(line) = lines.get(k) {
            match &line.kind {
                LineKind::Table(TableMarker::Open) => {
                    let end = find_table_end(lines, k).unwrap_or(lines.len() - 1);
                    let body = open_cell.get_or_insert_with(|| (false, Vec::new()));
                    body.1.extend_from_slice(&lines[k..=end]);
                    k = end + 1;
                    continue;
                }
                LineKind::Table(TableMarker::Row) => {
                    self.close_cell(&mut open_cell, &mut cells);
                    rows.push(TableRow {
                        cells: std::mem::take(&mut cells),
                    });
                }
                LineKind::Table(TableMarker::Caption) => {
                    self.close_cell(&mut open_cell, &mut cells);
                    let content = self.inline(&strip_attributes(&line.tokens));
                    caption = (!content.is_empty()).then_some(content);
                }
                LineKind::Table(marker @ (TableMarker::Cell | TableMarker::Header)) => {
                    self.close_cell(&mut open_cell, &mut cells);
                    let header = *marker == TableMarker::Header;
                    let mut chunks = split_cells(&line.tokens, header);
                    let last = chunks.pop().unwrap_or_default();
                    for chunk in chunks {
                        let blocks = self.parse(&[Line::paragraph(strip_attributes(&chunk))]);
                        cells.push(TableCell::new(header, blocks));
                    }
                    open_cell = Some((header, vec![Line::paragraph(strip_attributes(&last))]));
                }
                LineKind::Table(TableMarker::Close) => {}
                _ => {
                    // Content before the first cell has nowhere to go.
                    if let Some((_, body)) = open_cell.as_mut() {
                        body.push(line.clone());
                    }
                }
            }
            k += 1;
        }

        self.close_cell(&mut open_cell, &mut cells);
        rows.push(TableRow { cells });
        Table::new(caption, rows)
    }

    fn close_cell(&mut self, open_cell: &mut Option<(bool, Vec<Line>)>, cells: &mut Vec<TableCell>) {
        if let Some((header, body)) = open_cell.take() {
            let blocks = self.parse(&body);
            cells.push(TableCell::new(header, blocks));
        }
    }
}

/// Index one past the run of lines starting at `from` that satisfy `pred`.
fn run_end(lines: &[Line], from: usize, pred: impl Fn(&Line) -> bool) -> usize {
    from + lines[from..].iter().take_while(|l| pred(l)).count()
}

fn is_paragraph_line(line: &Line) -> bool {
    matches!(line.kind, LineKind::Paragraph)
        || matches!(&line.kind, LineKind::Table(marker) if *marker != TableMarker::Open)
}

/// Index of the `|}` line closing the `{|` at `open`, counting nested tables.
fn find_table_end(lines: &[Line], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (k, line) in lines.iter().enumerate().skip(open) {
        match line.kind {
            LineKind::Table(TableMarker::Open) => depth += 1,
            LineKind::Table(TableMarker::Close) => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(k);
                }
            }
            _ => {}
        }
    }
    None
}

fn marker_span(line: &Line) -> logos::Span {
    match &line.kind {
        LineKind::Table(marker) => line.span.start..line.span.start + marker.as_str().len(),
        _ => line.span.clone(),
    }
}

/// A line's tokens, with a table marker outside any table put back as literal text.
fn literal_tokens(line: &Line) -> Vec<SpannedToken> {
    match &line.kind {
        LineKind::Table(marker) => {
            let mut tokens = vec![(Token::text(marker.as_str()), marker_span(line))];
            tokens.extend(line.tokens.iter().cloned());
            tokens
        }
        _ => line.tokens.clone(),
    }
}

fn nesting(depth: usize, token: &Token) -> usize {
    match token {
        Token::LinkOpen
        | Token::ExtLinkOpen
        | Token::TemplateOpen
        | Token::RefOpen(_)
        | Token::CodeOpen(_) => depth + 1,
        Token::LinkClose
        | Token::ExtLinkClose
        | Token::TemplateClose
        | Token::RefClose
        | Token::CodeClose(_) => depth.saturating_sub(1),
        _ => depth,
    }
}

/// Split `; term : definition` at the first `:` outside links and templates.
fn split_definition(tokens: &[SpannedToken]) -> (Vec<SpannedToken>, Option<Vec<SpannedToken>>) {
    let mut depth = 0;
    for (i, (token, span)) in tokens.iter().enumerate() {
        if let (Token::Text(text), 0) = (token, depth) {
            if let Some(at) = text.find(':') {
                let mut term = tokens[..i].to_vec();
                if at > 0 {
                    term.push((Token::text(&text[..at]), span.start..span.start + at));
                }
                let mut definition = Vec::new();
                let after = &text[at + 1..];
                if !after.is_empty() {
                    let from = (span.start + at + 1).min(span.end);
                    definition.push((Token::text(after), from..span.end));
                }
                definition.extend_from_slice(&tokens[i + 1..]);
                return (term, Some(definition));
            }
        }
        depth = nesting(depth, token);
    }
    (tokens.to_vec(), None)
}

/// Split a cell line at top-level `||` (and `!!` on header lines).
fn split_cells(tokens: &[SpannedToken], header: bool) -> Vec<Vec<SpannedToken>> {
    let mut chunks = vec![Vec::new()];
    let mut depth = 0;
    for (token, span) in tokens {
        let separator = depth == 0
            && (matches!(token, Token::DoublePipe) || (header && matches!(token, Token::DoubleBang)));
        if separator {
            chunks.push(Vec::new());
            continue;
        }
        depth = nesting(depth, token);
        if let Some(chunk) = chunks.last_mut() {
            chunk.push((token.clone(), span.clone()));
        }
    }
    chunks
}

/// Drop an attribute prefix: everything up to the first top-level `|`.
fn strip_attributes(tokens: &[SpannedToken]) -> Vec<SpannedToken> {
    let mut depth = 0;
    for (i, (token, _)) in tokens.iter().enumerate() {
        if depth == 0 && matches!(token, Token::Pipe) {
            return tokens[i + 1..].to_vec();
        }
        depth = nesting(depth, token);
    }
    tokens.to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wiki::lexing::scan;
    use crate::wiki::parsing::group_lines;

    fn parse(source: &str) -> (Vec<Block>, Vec<Recovery>) {
        let lines = group_lines(scan(source));
        let mut recoveries = Vec::new();
        let blocks = BlockParser::new(DebugGate::default(), &mut recoveries).parse(&lines);
        (blocks, recoveries)
    }

    fn blocks(source: &str) -> Vec<Block> {
        parse(source).0
    }

    fn para(text: &str) -> Block {
        Block::Paragraph(Paragraph::new(vec![Inline::text(text)]))
    }

    #[test]
    fn test_paragraphs_split_on_blank_lines() {
        assert_eq!(
            blocks("one\ntwo\n\nthree"),
            vec![para("one\ntwo"), para("three")]
        );
    }

    #[test]
    fn test_simple_list() {
        let blocks = blocks("* a\n* b\n");
        assert_eq!(blocks.len(), 1);
        let list = blocks[0].as_list().unwrap();
        assert_eq!(list.kind, ListKind::Unordered);
        assert_eq!(list.items[0].blocks, vec![para("a")]);
        assert_eq!(list.items[1].blocks, vec![para("b")]);
    }

    #[test]
    fn test_mixed_prefixes_nest() {
        let blocks = blocks("# one\n#* sub\n#: note\n# two\n");
        let list = blocks[0].as_list().unwrap();
        assert!(list.is_ordered());
        assert_eq!(list.items.len(), 2);

        let first = &list.items[0].blocks;
        assert_eq!(first[0], para("one"));
        assert_eq!(first[1].as_list().unwrap().items[0].blocks, vec![para("sub")]);
        let note = first[2].as_definition_list().unwrap();
        assert_eq!(note.entries[0].term, None);
        assert_eq!(note.entries[0].definitions[0].blocks, vec![para("note")]);
    }

    #[test]
    fn test_deeper_line_without_parent_gets_empty_item() {
        let blocks = blocks("** deep\n");
        let outer = blocks[0].as_list().unwrap();
        assert_eq!(outer.items.len(), 1);
        let inner = outer.items[0].blocks[0].as_list().unwrap();
        assert_eq!(inner.items[0].blocks, vec![para("deep")]);
    }

    #[test]
    fn test_definition_list_forms() {
        let blocks = blocks("; term : inline def\n; other\n: first\n: second\n");
        let list = blocks[0].as_definition_list().unwrap();
        assert_eq!(list.entries.len(), 2);
        assert_eq!(list.entries[0].term, Some(vec![Inline::text("term")]));
        assert_eq!(list.entries[0].definitions[0].blocks, vec![para("inline def")]);
        assert_eq!(list.entries[1].definitions.len(), 2);
    }

    #[test]
    fn test_definition_split_skips_colons_in_links() {
        let blocks = blocks(";[[w:Foo]] : bar\n");
        let entry = &blocks[0].as_definition_list().unwrap().entries[0];
        assert!(matches!(entry.term.as_deref(), Some([Inline::InternalLink(_)])));
        assert_eq!(entry.definitions[0].blocks, vec![para("bar")]);
    }

    #[test]
    fn test_table_with_caption_and_inline_cells() {
        let source = "{| class=\"wikitable\"\n|+ Caption\n! A !! B\n|-\n| style=\"x\" | 1 || 2\n|}\n";
        let blocks = blocks(source);
        let table = blocks[0].as_table().unwrap();
        assert_eq!(table.caption, Some(vec![Inline::text("Caption")]));
        assert_eq!(table.rows.len(), 2);
        assert!(table.rows[0].is_header());
        assert_eq!(table.rows[0].cells[1].blocks, vec![para("B")]);
        assert_eq!(table.rows[1].cells[0].blocks, vec![para("1")]);
        assert_eq!(table.rows[1].cells[1].blocks, vec![para("2")]);
    }

    #[test]
    fn test_nested_table_inside_cell() {
        let source = "{|\n| outer\n{|\n| inner\n|}\n|}\n";
        let blocks = blocks(source);
        let table = blocks[0].as_table().unwrap();
        let cell = &table.rows[0].cells[0];
        assert_eq!(cell.blocks[0], para("outer"));
        let inner = cell.blocks[1].as_table().unwrap();
        assert_eq!(inner.rows[0].cells[0].blocks, vec![para("inner")]);
    }

    #[test]
    fn test_empty_table_is_dropped() {
        assert!(blocks("{|\n|-\n|}\n").is_empty());
    }

    #[test]
    fn test_unterminated_table_is_literal() {
        let (blocks, recoveries) = parse("{| x\n| a\n");
        assert_eq!(blocks, vec![para("{| x\n| a")]);
        assert_eq!(recoveries[0].construct, Construct::Table);
    }

    #[test]
    fn test_template_paragraph_becomes_block() {
        let blocks = blocks("{{en-noun|s}}\n");
        match &blocks[0] {
            Block::Template(t) => assert_eq!(t.name, "en-noun"),
            other => panic!("expected block template, got {other:?}"),
        }
    }

    #[test]
    fn test_unclosed_template_leaves_following_list() {
        let blocks = blocks("intro {{oops\n* a\n* b\n");
        assert_eq!(blocks[0], para("intro {{oops"));
        assert_eq!(blocks[1].as_list().unwrap().items.len(), 2);
    }

    #[test]
    fn test_preformatted_runs() {
        assert_eq!(
            blocks(" a\n  b\nc"),
            vec![Block::Preformatted(Preformatted::new("a\n b")), para("c")]
        );
    }

    #[test]
    fn test_heading_and_rule() {
        assert_eq!(
            blocks("== T ==\n----\n"),
            vec![
                Block::Heading(Heading::new(2, vec![Inline::text("T")])),
                Block::HorizontalRule,
            ]
        );
    }
}
