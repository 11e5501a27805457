use std::iter::Peekable;
use std::str::Chars;

use sha2::{Digest, Sha256};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentStyle {
    CStyle,
    Hash,
}

pub fn content_hash(bytes: &[u8]) -> u128 {
    let digest = Sha256::digest(bytes);
    let mut head = [0u8; 16];
    head.copy_from_slice(&digest[..16]);
    u128::from_be_bytes(head)
}

pub fn format_content_hash(hash: u128) -> String {
    format!("{hash:032x}")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Code,
    LineComment,
    BlockComment,
    Quoted(char),
    Heredoc,
}

struct Collapsed {
    out: String,
    pending_space: bool,
}

impl Collapsed {
    fn push(&mut self, ch: char) {
        if ch.is_whitespace() {
            self.pending_space = true;
            return;
        }
        if self.pending_space && !self.out.is_empty() {
            self.out.push(' ');
        }
        self.pending_space = false;
        self.out.push(ch);
    }

    fn gap(&mut self) {
        self.pending_space = true;
    }
}

/// Strips comments and collapses whitespace runs to one space.
pub fn clean_content(text: &str, style: CommentStyle) -> String {
    let mut out = Collapsed {
        out: String::with_capacity(text.len()),
        pending_space: false,
    };
    let mut state = State::Code;
    let mut prev: Option<char> = None;
    let mut chars = text.chars().peekable();
    let mut pending_heredoc: Option<String> = None;
    let mut delimiter = String::new();
    let mut line = String::new();

    while let Some(ch) = chars.next() {
        match state {
            State::Code => match (style, ch) {
                (CommentStyle::CStyle, '/') if chars.peek() == Some(&'/') => {
                    chars.next();
                    state = State::LineComment;
                }
                (CommentStyle::CStyle, '/') if chars.peek() == Some(&'*') => {
                    chars.next();
                    state = State::BlockComment;
                }
                (CommentStyle::Hash, '#') if prev.is_none_or(char::is_whitespace) => {
                    state = State::LineComment;
                }
                (CommentStyle::Hash, '<') if chars.peek() == Some(&'<') => {
                    chars.next();
                    out.push('<');
                    out.push('<');
                    if let Some(third) = chars.next_if_eq(&'<') {
                        out.push(third);
                    } else if let Some(word) = heredoc_word(&mut chars, &mut out) {
                        pending_heredoc = Some(word);
                    }
                }
                (_, '"' | '\'' | '`') => {
                    state = State::Quoted(ch);
                    out.push(ch);
                }
                _ => out.push(ch),
            },
            State::LineComment => {
                if ch == '\n' {
                    state = State::Code;
                    out.gap();
                }
            }
            State::BlockComment => {
                if ch == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    state = State::Code;
                    out.gap();
                }
            }
            State::Quoted(quote) => {
                out.push(ch);
                if ch == '\\' {
                    if let Some(escaped) = chars.next() {
                        out.push(escaped);
                    }
                } else if ch == quote || (ch == '\n' && quote != '`' && style == CommentStyle::CStyle)
                {
                    state = State::Code;
                }
            }
            State::Heredoc => {
                out.push(ch);
                if ch == '\n' {
                    if line.trim_start_matches('\t').trim_end_matches('\r') == delimiter {
                        state = State::Code;
                    }
                    line.clear();
                } else {
                    line.push(ch);
                }
            }
        }
        // The body starts on the line after the `<<WORD` redirection.
        if ch == '\n'
            && state == State::Code
            && let Some(word) = pending_heredoc.take()
        {
            delimiter = word;
            state = State::Heredoc;
        }
        prev = Some(ch);
    }

    out.out
}

/// Reads the delimiter after `<<` or `<<-`. The body it introduces is kept verbatim.
fn heredoc_word(chars: &mut Peekable<Chars<'_>>, out: &mut Collapsed) -> Option<String> {
    if let Some(dash) = chars.next_if_eq(&'-') {
        out.push(dash);
    }
    while let Some(ch) = chars.next_if(|c| matches!(*c, ' ' | '\t')) {
        out.push(ch);
    }
    let mut word = String::new();
    match chars.peek().copied() {
        Some(quote @ ('\'' | '"')) => {
            chars.next();
            out.push(quote);
            while let Some(ch) = chars.next_if(|c| *c != quote && *c != '\n') {
                out.push(ch);
                word.push(ch);
            }
            if let Some(ch) = chars.next_if_eq(&quote) {
                out.push(ch);
            }
        }
        Some(first) if first.is_alphabetic() || first == '_' => {
            while let Some(ch) = chars.next_if(|c| c.is_alphanumeric() || *c == '_') {
                out.push(ch);
                word.push(ch);
            }
        }
        _ => {}
    }
    (!word.is_empty()).then_some(word)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_bytes_hash_equal() {
        let a = content_hash(b"function a() {}\n");
        let b = content_hash(b"function a() {}\n");
        assert_eq!(a, b);
        assert_ne!(a, content_hash(b"function a() {} \n"));
    }

    #[test]
    fn hash_formats_as_32_hex_chars() {
        let hex = format_content_hash(content_hash(b""));
        assert_eq!(hex.len(), 32);
        // SHA-256("") starts with e3b0c442...
        assert!(hex.starts_with("e3b0c44298fc1c14"));
    }

    #[test]
    fn strips_c_style_comments_and_collapses_whitespace() {
        let input = "/**\n * Title: x\n */\nfunction  run(a,\n b) {\n  // note\n  return a + b; /* tail */\n}\n";
        assert_eq!(
            clean_content(input, CommentStyle::CStyle),
            "function run(a, b) { return a + b; }"
        );
    }

    #[test]
    fn keeps_comment_markers_inside_strings() {
        let input = "var url = \"https://example.com/*x*/\"; // gone";
        assert_eq!(
            clean_content(input, CommentStyle::CStyle),
            "var url = \"https://example.com/*x*/\";"
        );
    }

    #[test]
    fn comment_between_tokens_leaves_a_gap() {
        assert_eq!(clean_content("a/*x*/b", CommentStyle::CStyle), "a b");
    }

    #[test]
    fn hash_comments_only_at_word_start() {
        let input = "#!/bin/bash\n# header\necho \"${#arr[@]}\" # trailing\ncount=$#\n";
        assert_eq!(
            clean_content(input, CommentStyle::Hash),
            "echo \"${#arr[@]}\" count=$#"
        );
    }

    #[test]
    fn whitespace_only_differences_clean_identically() {
        let a = "function f() {\n  return 1;\n}\n";
        let b = "function f() { return 1; }";
        assert_eq!(
            clean_content(a, CommentStyle::CStyle),
            clean_content(b, CommentStyle::CStyle)
        );
    }

    #[test]
    fn unterminated_block_comment_drops_the_rest() {
        assert_eq!(clean_content("a /* never closed", CommentStyle::CStyle), "a");
    }

    #[test]
    fn apostrophe_in_heredoc_keeps_later_comments_stripped() {
        let a = "cat <<EOF\nIt's done\nEOF\n# comment one\necho hi\n";
        let b = "cat <<EOF\nIt's done\nEOF\n# a totally different comment\necho hi\n";
        let cleaned = clean_content(a, CommentStyle::Hash);
        assert_eq!(cleaned, "cat <<EOF It's done EOF echo hi");
        assert_eq!(cleaned, clean_content(b, CommentStyle::Hash));
    }

    #[test]
    fn heredoc_body_is_kept_verbatim() {
        let input = "cat <<-'END' > out.txt # note\n\t# not a comment\n\tEND\nrm -f x # gone\n";
        assert_eq!(
            clean_content(input, CommentStyle::Hash),
            "cat <<-'END' > out.txt # not a comment END rm -f x"
        );
    }

    #[test]
    fn shifts_and_here_strings_are_not_heredocs() {
        let input = "x=$((1 << 2)) # shift\ngrep a <<< \"$s\" # here-string\necho done # end\n";
        assert_eq!(
            clean_content(input, CommentStyle::Hash),
            "x=$((1 << 2)) grep a <<< \"$s\" echo done"
        );
    }
}
