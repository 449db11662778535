//! Renders a [`Tree`] as CyBuf text.
//!
//! Compact mode joins entries with the configured separator:
//!
//! ```text
//! {Name: "Wuhan University" Age: 120}
//! ```
//!
//! Indented mode puts each entry on its own line, prefixed by the indent
//! string once per nesting level:
//!
//! ```text
//! {
//! 	Name: "Wuhan University"
//! 	Age: 120
//! }
//! ```

use crate::tree::{Node, NodeId, Tree};
use crate::CybufOptions;

pub(crate) fn render(tree: &Tree, options: &CybufOptions) -> String {
    // Roughly eight bytes of output per node is a fair first guess.
    let mut writer = Writer {
        output: String::with_capacity(tree.len() * 8),
        options,
    };
    writer.write_node(tree, tree.root(), 0);
    writer.output
}

struct Writer<'o> {
    output: String,
    options: &'o CybufOptions,
}

impl Writer<'_> {
    fn write_node(&mut self, tree: &Tree, id: NodeId, depth: usize) {
        match tree.node(id) {
            Node::Nil => self.output.push_str("nil"),
            Node::Bool(b) => self.output.push_str(if *b { "true" } else { "false" }),
            Node::Number(n) => self.output.push_str(&n.to_string()),
            Node::String(s) => self.write_string(s),
            Node::Array(items) => {
                self.output.push('[');
                for (i, &child) in items.iter().enumerate() {
                    self.write_entry_break(i, depth);
                    self.write_node(tree, child, depth + 1);
                }
                self.write_close(items.is_empty(), depth, ']');
            }
            Node::Object(entries) => {
                self.output.push('{');
                for (i, (key, child)) in entries.iter().enumerate() {
                    self.write_entry_break(i, depth);
                    self.output.push_str(key);
                    self.output.push_str(": ");
                    self.write_node(tree, *child, depth + 1);
                }
                self.write_close(entries.is_empty(), depth, '}');
            }
        }
    }

    /// Whatever goes in front of the `index`-th entry of a container at `depth`.
    fn write_entry_break(&mut self, index: usize, depth: usize) {
        match &self.options.indent {
            Some(indent) => {
                self.output.push('\n');
                indent.write_levels(&mut self.output, depth + 1);
            }
            None if index > 0 => self.output.push(self.options.separator.as_char()),
            None => {}
        }
    }

    fn write_close(&mut self, empty: bool, depth: usize, bracket: char) {
        if let (Some(indent), false) = (&self.options.indent, empty) {
            self.output.push('\n');
            indent.write_levels(&mut self.output, depth);
        }
        self.output.push(bracket);
    }

    fn write_string(&mut self, s: &str) {
        self.output.reserve(s.len() + 2);
        self.output.push('"');
        for ch in s.chars() {
            match ch {
                '"' => self.output.push_str("\\\""),
                '\\' => self.output.push_str("\\\\"),
                '\n' => self.output.push_str("\\n"),
                '\r' => self.output.push_str("\\r"),
                '\t' => self.output.push_str("\\t"),
                '\u{0008}' => self.output.push_str("\\b"),
                '\u{000C}' => self.output.push_str("\\f"),
                '\0' => self.output.push_str("\\0"),
                c if c.is_control() => {
                    self.output.push_str(&format!("\\u{:04x}", c as u32));
                }
                c => self.output.push(c),
            }
        }
        self.output.push('"');
    }
}
